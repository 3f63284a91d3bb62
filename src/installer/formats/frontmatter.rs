//! Shared frontmatter scanning helpers.
//!
//! Blueprint markdown carries YAML frontmatter between `---` fences. The
//! format converters rewrite it line by line instead of parsing and
//! re-emitting YAML: unknown fields must survive byte-for-byte, and the
//! upstream files only use flat `key: value` pairs plus block arrays.

/// A split markdown document: trimmed frontmatter text and the raw remainder
#[derive(Debug)]
pub struct Frontmatter<'a> {
    /// Field lines between the fences, outer whitespace trimmed
    pub fields: &'a str,
    /// Everything after the closing fence, leading newline included
    pub body: &'a str,
}

/// Split content into frontmatter and body. Returns `None` when the content
/// does not open with `---` or the closing fence is missing.
pub fn split(content: &str) -> Option<Frontmatter<'_>> {
    if !content.starts_with("---") {
        return None;
    }
    let end = content[3..].find("---")? + 3;
    Some(Frontmatter {
        fields: content[3..end].trim(),
        body: &content[end + 3..],
    })
}

/// Reassemble a document from rewritten field lines and the original body
pub fn rebuild(lines: &[String], body: &str) -> String {
    format!("---\n{}\n---{}", lines.join("\n").trim(), body)
}

/// Whether the scanner is between fields or inside a block array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    Fields,
    ArrayItems,
}

/// How a line behaves while the scanner is inside a block array
#[derive(Debug, PartialEq, Eq)]
pub enum ItemLine<'a> {
    /// `- value`: an array item
    Item(&'a str),
    /// Blank or a bare dash: stays inside the array, line is dropped
    Skip,
    /// A non-item line: the array ended and the line belongs to the fields
    End,
}

/// Classify a trimmed line under array scanning
pub fn classify_item_line(trimmed: &str) -> ItemLine<'_> {
    if let Some(item) = trimmed.strip_prefix("- ") {
        ItemLine::Item(item.trim())
    } else if !trimmed.is_empty() && !trimmed.starts_with('-') {
        ItemLine::End
    } else {
        ItemLine::Skip
    }
}

/// Split an inline comma-separated value into trimmed, non-empty entries
pub fn split_comma_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|t| !t.is_empty())
}
