//! Copy passes that project the source tree into each runtime's layout.
//!
//! Three layouts exist: a mirrored tree (claude, gemini, and the shared
//! docs tree), a flattened single-directory layout (opencode commands),
//! and a numbered skill-per-directory layout (cursor commands). Agent
//! definitions are a fourth, flat pass shared by all runtimes. Every
//! markdown file is rewritten on the way through: path-prefix token,
//! attribution policy, then the runtime's format conversion.

use std::path::Path;

use walkdir::WalkDir;

use crate::common::fs;
use crate::error::{Result, file_read_failed};
use crate::installer::attribution::Attribution;
use crate::installer::formats::{cursor, gemini, opencode};
use crate::installer::interaction;
use crate::runtime::{Runtime, forward_slashes};

/// A registered interaction rule whose marker found no match in the file it
/// is anchored to. Surfaced as a warning: it means the upstream wording
/// drifted and the conversion silently did nothing.
#[derive(Debug, PartialEq)]
pub struct MarkerMiss {
    pub file: String,
    pub rule: &'static str,
}

/// Mirror a source tree into `dest_dir`, transforming markdown per runtime.
///
/// The destination is removed and rebuilt from scratch so no file from a
/// previous version survives. `tree_label` is the tree's path relative to
/// the source root ("commands/bp", "blueprint"), used to key interaction
/// rules for cursor.
pub fn mirror_tree(
    src_dir: &Path,
    dest_dir: &Path,
    tree_label: &str,
    runtime: Runtime,
    path_prefix: &str,
    attribution: &Attribution,
) -> Result<Vec<MarkerMiss>> {
    fs::remove_dir_all_if_exists(dest_dir)?;
    fs::create_dir_all(dest_dir)?;

    let mut misses = Vec::new();

    for entry in WalkDir::new(src_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let rel = match entry.path().strip_prefix(src_dir) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest_path = dest_dir.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)?;
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        if entry.path().extension().and_then(|e| e.to_str()) != Some("md") {
            fs::copy(entry.path(), &dest_path)?;
            continue;
        }

        let content = fs::read_to_string(entry.path())?;
        let content = content.replace("~/.claude/", path_prefix);
        let content = attribution.apply(&content);

        match runtime {
            Runtime::Claude => fs::write(&dest_path, content)?,
            Runtime::Opencode => fs::write(&dest_path, opencode::convert(&content))?,
            Runtime::Gemini => {
                let stripped = gemini::strip_sub_tags(&content);
                let toml = gemini::command_to_toml(&stripped);
                fs::write(&dest_path.with_extension("toml"), toml)?;
            }
            Runtime::Cursor => {
                let rel_label = format!("{}/{}", tree_label, forward_slashes(rel));
                let (converted, missed) = interaction::apply(&content, &rel_label);
                for rule in missed {
                    misses.push(MarkerMiss {
                        file: rel_label.clone(),
                        rule,
                    });
                }
                let converted = cursor::convert_command_references(&converted);
                fs::write(&dest_path, converted)?;
            }
        }
    }

    Ok(misses)
}

/// Copy commands into a single flat directory, folding subdirectory names
/// into a growing filename prefix (`debug/start.md` becomes
/// `bp-debug-start.md`). Stale files sharing the active prefix are removed
/// first; unrelated files in the destination are preserved.
pub fn flatten_commands(
    src_dir: &Path,
    dest_dir: &Path,
    prefix: &str,
    path_prefix: &str,
    attribution: &Attribution,
) -> Result<()> {
    if !src_dir.exists() {
        return Ok(());
    }

    if dest_dir.exists() {
        for name in dir_names(dest_dir)? {
            if name.starts_with(&format!("{prefix}-")) && name.ends_with(".md") {
                fs::remove_file_if_exists(&dest_dir.join(&name))?;
            }
        }
    } else {
        fs::create_dir_all(dest_dir)?;
    }

    for entry in std::fs::read_dir(src_dir)
        .map_err(|e| file_read_failed(src_dir.display().to_string(), e.to_string()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let src_path = entry.path();

        if src_path.is_dir() {
            flatten_commands(
                &src_path,
                dest_dir,
                &format!("{prefix}-{name}"),
                path_prefix,
                attribution,
            )?;
        } else if let Some(base) = name.strip_suffix(".md") {
            let content = fs::read_to_string(&src_path)?;
            let content = content.replace("~/.claude/", path_prefix);
            let content = content.replace("~/.opencode/", path_prefix);
            let content = attribution.apply(&content);
            let content = opencode::convert(&content);
            fs::write(&dest_dir.join(format!("{prefix}-{base}.md")), content)?;
        }
    }

    Ok(())
}

/// Copy each top-level command file into its own numbered skill directory
/// (`help.md` becomes `bp-27-help/SKILL.md`). Existing `bp-` skill
/// directories are removed first; other skills are preserved. Returns the
/// number of skills written plus any interaction-marker misses.
pub fn copy_skills(
    src_dir: &Path,
    dest_dir: &Path,
    path_prefix: &str,
    attribution: &Attribution,
) -> Result<(usize, Vec<MarkerMiss>)> {
    if !src_dir.exists() {
        return Ok((0, Vec::new()));
    }

    if dest_dir.exists() {
        for name in dir_names(dest_dir)? {
            let path = dest_dir.join(&name);
            if name.starts_with("bp-") && path.is_dir() {
                fs::remove_dir_all_if_exists(&path)?;
            }
        }
    }

    let mut installed = 0;
    let mut misses = Vec::new();

    for entry in std::fs::read_dir(src_dir)
        .map_err(|e| file_read_failed(src_dir.display().to_string(), e.to_string()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(command) = name.strip_suffix(".md") else {
            continue;
        };
        if !entry.path().is_file() {
            continue;
        }

        let content = fs::read_to_string(&entry.path())?;
        let content = cursor::convert_skill(&content, path_prefix);
        let rel_label = format!("commands/bp/{name}");
        let (content, missed) = interaction::apply(&content, &rel_label);
        for rule in missed {
            misses.push(MarkerMiss {
                file: rel_label.clone(),
                rule,
            });
        }
        let content = attribution.apply(&content);

        let skill_dir = dest_dir.join(cursor::skill_dir_name(command));
        fs::write(&skill_dir.join("SKILL.md"), content)?;
        installed += 1;
    }

    Ok((installed, misses))
}

/// Replace Blueprint-owned agent files in a flat agents directory,
/// converting frontmatter for the target runtime. Files not matching the
/// Blueprint prefix are left alone.
pub fn copy_agents(
    src_dir: &Path,
    dest_dir: &Path,
    runtime: Runtime,
    path_prefix: &str,
    attribution: &Attribution,
) -> Result<()> {
    fs::create_dir_all(dest_dir)?;

    for name in dir_names(dest_dir)? {
        if name.starts_with("bp-") && name.ends_with(".md") {
            fs::remove_file_if_exists(&dest_dir.join(&name))?;
        }
    }

    for entry in std::fs::read_dir(src_dir)
        .map_err(|e| file_read_failed(src_dir.display().to_string(), e.to_string()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.path().is_file() || !name.ends_with(".md") {
            continue;
        }

        let content = fs::read_to_string(&entry.path())?;
        let content = content.replace("~/.claude/", path_prefix);
        let content = attribution.apply(&content);
        let content = match runtime {
            Runtime::Claude => content,
            Runtime::Opencode => opencode::convert(&content),
            Runtime::Gemini => gemini::convert_agent(&content),
            Runtime::Cursor => cursor::convert_agent(&content, path_prefix),
        };
        fs::write(&dest_dir.join(&name), content)?;
    }

    Ok(())
}

fn dir_names(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| file_read_failed(dir.display().to_string(), e.to_string()))?;
    let mut names = Vec::new();
    for entry in entries {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
