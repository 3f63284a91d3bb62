//! Commit-attribution handling for installed content.
//!
//! Workflow documents instruct the agent to add a `Co-Authored-By` trailer
//! to commits. Users opt out (or customize the trailer) through their
//! runtime's settings, so every file write runs the content through the
//! resolved policy first.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde_json::Value;

use crate::error::Result;
use crate::runtime::Runtime;
use crate::settings;

/// How `Co-Authored-By` lines in installed content are handled
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    /// Leave content unchanged
    Keep,
    /// Strip attribution lines together with the preceding blank line
    Remove,
    /// Rewrite attribution lines with a custom trailer value
    Replace(String),
}

// Line content is matched with [^\r\n]* so a CRLF terminator survives the edit
static ATTRIBUTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Co-Authored-By:[^\r\n]*").unwrap());
static ATTRIBUTION_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\r?\n){2}Co-Authored-By:[^\r\n]*").unwrap());

impl Attribution {
    pub fn apply(&self, content: &str) -> String {
        match self {
            Attribution::Keep => content.to_string(),
            Attribution::Remove => ATTRIBUTION_BLOCK.replace_all(content, "").into_owned(),
            Attribution::Replace(custom) => {
                let trailer = format!("Co-Authored-By: {custom}");
                ATTRIBUTION_LINE
                    .replace_all(content, NoExpand(&trailer))
                    .into_owned()
            }
        }
    }
}

/// Resolves each runtime's attribution policy from its settings, at most
/// once per install invocation. Carried through the copy passes instead of
/// living in process-global state.
pub struct AttributionContext {
    explicit_config_dir: Option<String>,
    resolved: HashMap<Runtime, Attribution>,
}

impl AttributionContext {
    pub fn new(explicit_config_dir: Option<&str>) -> Self {
        Self {
            explicit_config_dir: explicit_config_dir.map(String::from),
            resolved: HashMap::new(),
        }
    }

    /// The policy for a runtime, reading its global settings on first use.
    pub fn resolve(&mut self, runtime: Runtime) -> Result<Attribution> {
        if let Some(found) = self.resolved.get(&runtime) {
            return Ok(found.clone());
        }
        let policy = self.load(runtime)?;
        self.resolved.insert(runtime, policy.clone());
        Ok(policy)
    }

    fn load(&self, runtime: Runtime) -> Result<Attribution> {
        if runtime == Runtime::Opencode {
            // Opted out via a single boolean in the global opencode.json
            let config_path = Runtime::Opencode.global_dir(None)?.join("opencode.json");
            let config = settings::read(&config_path)?;
            let disabled =
                config.get("disable_ai_attribution").and_then(Value::as_bool) == Some(true);
            return Ok(if disabled {
                Attribution::Remove
            } else {
                Attribution::Keep
            });
        }

        let settings_path = runtime
            .global_dir(self.explicit_config_dir.as_deref())?
            .join("settings.json");
        let settings = settings::read(&settings_path)?;
        let commit = settings.get("attribution").and_then(|a| a.get("commit"));
        Ok(match commit {
            None => Attribution::Keep,
            Some(Value::Null) => Attribution::Remove,
            Some(Value::String(s)) if s.is_empty() => Attribution::Remove,
            Some(Value::String(s)) => Attribution::Replace(s.clone()),
            Some(other) => Attribution::Replace(other.to_string()),
        })
    }
}
