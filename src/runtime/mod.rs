//! Runtime registry: the assistant platforms Blueprint can deploy into.
//!
//! Each runtime owns a config directory layout, an env-var resolution chain
//! and a command projection shape. All runtime-specific constants live here
//! as immutable data so the rest of the installer stays table-driven.

use std::path::{Path, PathBuf};

use crate::error::{BlueprintError, Result};

/// All supported runtimes, in installation order
pub const ALL_RUNTIMES: [Runtime; 4] = [
    Runtime::Claude,
    Runtime::Opencode,
    Runtime::Gemini,
    Runtime::Cursor,
];

/// A target assistant runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Runtime {
    Claude,
    Opencode,
    Gemini,
    Cursor,
}

/// How command files are laid out inside a runtime's config directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandLayout {
    /// `commands/bp/<name>.md`, invoked as `/bp:<name>`
    Nested,
    /// `command/bp-<name>.md`, invoked as `/bp-<name>`
    Flattened,
    /// `skills/bp-NN-<name>/SKILL.md`, invoked as `/bp-NN-<name>`
    NumberedSkills,
}

impl Runtime {
    /// Identifier used in CLI flags and messages
    pub fn id(self) -> &'static str {
        match self {
            Runtime::Claude => "claude",
            Runtime::Opencode => "opencode",
            Runtime::Gemini => "gemini",
            Runtime::Cursor => "cursor",
        }
    }

    /// Human-readable name for status output
    pub fn label(self) -> &'static str {
        match self {
            Runtime::Claude => "Claude Code",
            Runtime::Opencode => "OpenCode",
            Runtime::Gemini => "Gemini",
            Runtime::Cursor => "Cursor",
        }
    }

    /// Directory name used for local installs (`./.claude` etc.)
    pub fn dir_name(self) -> &'static str {
        match self {
            Runtime::Claude => ".claude",
            Runtime::Opencode => ".opencode",
            Runtime::Gemini => ".gemini",
            Runtime::Cursor => ".cursor",
        }
    }

    pub fn command_layout(self) -> CommandLayout {
        match self {
            Runtime::Claude | Runtime::Gemini => CommandLayout::Nested,
            Runtime::Opencode => CommandLayout::Flattened,
            Runtime::Cursor => CommandLayout::NumberedSkills,
        }
    }

    /// Whether hook scripts are copied into `<config>/hooks/`
    pub fn installs_hook_scripts(self) -> bool {
        !matches!(self, Runtime::Cursor)
    }

    /// Whether settings.json carries the SessionStart hook and statusline entries
    pub fn wires_session_hooks(self) -> bool {
        matches!(self, Runtime::Claude | Runtime::Gemini)
    }

    /// Slash command shown in the post-install message
    pub fn help_command(self) -> &'static str {
        match self {
            Runtime::Opencode => "/bp-help",
            Runtime::Cursor => "/bp-27-help",
            Runtime::Claude | Runtime::Gemini => "/bp:help",
        }
    }

    /// Resolve the global config directory for this runtime.
    ///
    /// An explicit directory (from `--config-dir`) wins over env vars for
    /// every runtime. OpenCode follows the XDG chain
    /// `OPENCODE_CONFIG_DIR` > `dirname(OPENCODE_CONFIG)` > `$XDG_CONFIG_HOME/opencode`
    /// > `~/.config/opencode`; the others use `<RUNTIME>_CONFIG_DIR` then a
    /// home-relative default.
    pub fn global_dir(self, explicit: Option<&str>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return expand_tilde(dir);
        }

        if self == Runtime::Opencode {
            return opencode_global_dir();
        }

        let env_name = match self {
            Runtime::Claude => "CLAUDE_CONFIG_DIR",
            Runtime::Gemini => "GEMINI_CONFIG_DIR",
            Runtime::Cursor => "CURSOR_CONFIG_DIR",
            Runtime::Opencode => unreachable!(),
        };
        if let Some(dir) = env_non_empty(env_name) {
            return expand_tilde(&dir);
        }

        Ok(home_dir()?.join(self.dir_name()))
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Where an installation lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The runtime's config directory (`~/.claude`, `~/.config/opencode`, ...)
    Global,
    /// `./<dir_name>` under the current working directory
    Local,
}

/// A fully resolved installation target
#[derive(Debug, Clone)]
pub struct Target {
    pub runtime: Runtime,
    pub location: Location,
    /// Absolute config directory files are written into
    pub dir: PathBuf,
    /// Prefix substituted for `~/.claude/` inside deployed markdown
    pub path_prefix: String,
}

impl Target {
    pub fn resolve(
        runtime: Runtime,
        location: Location,
        explicit_config_dir: Option<&str>,
    ) -> Result<Self> {
        match location {
            Location::Global => {
                let dir = runtime.global_dir(explicit_config_dir)?;
                let path_prefix = format!("{}/", forward_slashes(&dir));
                Ok(Self {
                    runtime,
                    location,
                    dir,
                    path_prefix,
                })
            }
            Location::Local => {
                let cwd = std::env::current_dir()?;
                Ok(Self {
                    runtime,
                    location,
                    dir: cwd.join(runtime.dir_name()),
                    path_prefix: format!("./{}/", runtime.dir_name()),
                })
            }
        }
    }

    pub fn is_global(&self) -> bool {
        self.location == Location::Global
    }

    /// Label for status output: the home-shortened absolute dir for global
    /// installs, a cwd-relative form for local ones.
    pub fn location_label(&self) -> String {
        match self.location {
            Location::Global => home_shortened(&self.dir),
            Location::Local => format!("./{}", self.runtime.dir_name()),
        }
    }
}

/// Shell command that invokes a hook script from settings.json.
///
/// Global installs embed the absolute config dir with forward slashes so the
/// command survives Windows shells that do not expand `$HOME`. Local installs
/// reference the project-relative directory name.
pub fn hook_command(target: &Target, script: &str) -> String {
    if target.is_global() {
        format!("node \"{}/hooks/{}\"", forward_slashes(&target.dir), script)
    } else {
        format!("node {}/hooks/{}", target.runtime.dir_name(), script)
    }
}

/// Render a path with forward slashes regardless of platform
pub fn forward_slashes(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// Replace a leading home directory with `~` for display
pub fn home_shortened(path: &Path) -> String {
    let display = path.display().to_string();
    match dirs::home_dir() {
        Some(home) => display.replacen(&home.display().to_string(), "~", 1),
        None => display,
    }
}

/// Expand a leading `~/` to the home directory. Shells do not expand tildes
/// inside env var values handed to us, so config dir chains need this.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(BlueprintError::HomeDirNotFound)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn opencode_global_dir() -> Result<PathBuf> {
    if let Some(dir) = env_non_empty("OPENCODE_CONFIG_DIR") {
        return expand_tilde(&dir);
    }

    // OPENCODE_CONFIG points at the config file itself; use its directory
    if let Some(config) = env_non_empty("OPENCODE_CONFIG") {
        let expanded = expand_tilde(&config)?;
        let parent = match expanded.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        return Ok(parent);
    }

    if let Some(xdg) = env_non_empty("XDG_CONFIG_HOME") {
        return Ok(expand_tilde(&xdg)?.join("opencode"));
    }

    Ok(home_dir()?.join(".config").join("opencode"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            "CLAUDE_CONFIG_DIR",
            "GEMINI_CONFIG_DIR",
            "CURSOR_CONFIG_DIR",
            "OPENCODE_CONFIG_DIR",
            "OPENCODE_CONFIG",
            "XDG_CONFIG_HOME",
        ] {
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    fn test_dir_names() {
        assert_eq!(Runtime::Claude.dir_name(), ".claude");
        assert_eq!(Runtime::Opencode.dir_name(), ".opencode");
        assert_eq!(Runtime::Gemini.dir_name(), ".gemini");
        assert_eq!(Runtime::Cursor.dir_name(), ".cursor");
    }

    #[test]
    fn test_command_layouts() {
        assert_eq!(Runtime::Claude.command_layout(), CommandLayout::Nested);
        assert_eq!(Runtime::Gemini.command_layout(), CommandLayout::Nested);
        assert_eq!(Runtime::Opencode.command_layout(), CommandLayout::Flattened);
        assert_eq!(
            Runtime::Cursor.command_layout(),
            CommandLayout::NumberedSkills
        );
    }

    #[test]
    fn test_hook_script_coverage() {
        assert!(Runtime::Claude.installs_hook_scripts());
        assert!(Runtime::Opencode.installs_hook_scripts());
        assert!(Runtime::Gemini.installs_hook_scripts());
        assert!(!Runtime::Cursor.installs_hook_scripts());

        assert!(Runtime::Claude.wires_session_hooks());
        assert!(Runtime::Gemini.wires_session_hooks());
        assert!(!Runtime::Opencode.wires_session_hooks());
        assert!(!Runtime::Cursor.wires_session_hooks());
    }

    #[test]
    #[serial]
    fn test_explicit_config_dir_wins() {
        clear_env();
        unsafe { std::env::set_var("CLAUDE_CONFIG_DIR", "/tmp/env-claude") };
        let dir = Runtime::Claude.global_dir(Some("/tmp/explicit")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/explicit"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_config_dir_used() {
        clear_env();
        unsafe { std::env::set_var("GEMINI_CONFIG_DIR", "/tmp/env-gemini") };
        let dir = Runtime::Gemini.global_dir(None).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/env-gemini"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_default_global_dir_under_home() {
        clear_env();
        let dir = Runtime::Claude.global_dir(None).unwrap();
        assert!(dir.ends_with(".claude"));
    }

    #[test]
    #[serial]
    fn test_opencode_chain_priority() {
        clear_env();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg") };
        assert_eq!(
            Runtime::Opencode.global_dir(None).unwrap(),
            PathBuf::from("/tmp/xdg/opencode")
        );

        unsafe { std::env::set_var("OPENCODE_CONFIG", "/tmp/oc/opencode.json") };
        assert_eq!(
            Runtime::Opencode.global_dir(None).unwrap(),
            PathBuf::from("/tmp/oc")
        );

        unsafe { std::env::set_var("OPENCODE_CONFIG_DIR", "/tmp/oc-dir") };
        assert_eq!(
            Runtime::Opencode.global_dir(None).unwrap(),
            PathBuf::from("/tmp/oc-dir")
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~/x/y").unwrap(), home.join("x/y"));
        assert_eq!(expand_tilde("/abs/path").unwrap(), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel").unwrap(), PathBuf::from("rel"));
    }

    #[test]
    #[serial]
    fn test_target_resolve_global_prefix() {
        clear_env();
        unsafe { std::env::set_var("CLAUDE_CONFIG_DIR", "/tmp/bp-claude") };
        let target = Target::resolve(Runtime::Claude, Location::Global, None).unwrap();
        assert_eq!(target.dir, PathBuf::from("/tmp/bp-claude"));
        assert_eq!(target.path_prefix, "/tmp/bp-claude/");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_target_resolve_local_prefix() {
        clear_env();
        let target = Target::resolve(Runtime::Opencode, Location::Local, None).unwrap();
        assert!(target.dir.ends_with(".opencode"));
        assert_eq!(target.path_prefix, "./.opencode/");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_home_shortened() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(home_shortened(&home.join("x")), "~/x");
        assert_eq!(
            home_shortened(Path::new("/tmp/elsewhere")),
            "/tmp/elsewhere"
        );
    }

    #[test]
    #[serial]
    fn test_hook_command_shapes() {
        clear_env();
        unsafe { std::env::set_var("CLAUDE_CONFIG_DIR", "/tmp/bp-claude") };
        let global = Target::resolve(Runtime::Claude, Location::Global, None).unwrap();
        assert_eq!(
            hook_command(&global, "bp-statusline.js"),
            "node \"/tmp/bp-claude/hooks/bp-statusline.js\""
        );

        let local = Target::resolve(Runtime::Claude, Location::Local, None).unwrap();
        assert_eq!(
            hook_command(&local, "bp-check-update.js"),
            "node .claude/hooks/bp-check-update.js"
        );
        clear_env();
    }
}
