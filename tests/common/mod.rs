//! Common test utilities for Blueprint integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Fabricate a Blueprint source checkout under `source/` and return its root.
    ///
    /// The tree carries every piece the installer knows how to deploy:
    /// nested commands, the docs tree, agents, bundled hooks and a changelog.
    pub fn create_source_tree(&self) -> PathBuf {
        let root = self.path.join("source");

        self.write_file(
            "source/commands/bp/help.md",
            "---\nname: bp:help\ndescription: Show Blueprint help\nallowed-tools:\n  - Read\n---\n\
             Read ~/.claude/blueprint/core.md and explain /bp:help usage.\n",
        );
        self.write_file(
            "source/commands/bp/plan/create.md",
            "---\nname: bp:plan\ndescription: Create a plan\n---\n\
             Write the plan next to ~/.claude/blueprint/workflows/execute.md.\n",
        );
        self.write_file(
            "source/blueprint/core.md",
            "# Blueprint Core\n\nEverything lives under ~/.claude/blueprint/.\n",
        );
        self.write_file(
            "source/blueprint/workflows/execute.md",
            "# Execute\n\nCommit with:\n\nCo-Authored-By: Blueprint <bp@example.com>\n",
        );
        self.write_file(
            "source/agents/bp-executor.md",
            "---\nname: bp-executor\ndescription: Executes plans\ntools: Read, Bash\ncolor: red\n---\n\
             Follow ~/.claude/blueprint/core.md.\n",
        );
        self.write_file("source/hooks/dist/bp-statusline.js", "console.log('line')\n");
        self.write_file("source/hooks/dist/bp-check-update.js", "console.log('chk')\n");
        self.write_file("source/CHANGELOG.md", "# Changelog\n\n## 1.9.4\n");

        root
    }

    /// Path for a fake runtime config directory inside the workspace.
    /// The directory itself is not created; the installer does that.
    pub fn config_dir(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Parse a workspace file as JSON
    pub fn read_json(&self, path: &str) -> serde_json::Value {
        serde_json::from_str(&self.read_file(path)).expect("Failed to parse JSON file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Names of the entries directly under a workspace directory
    pub fn dir_entries(&self, path: &str) -> Vec<String> {
        let dir = self.path.join(path);
        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .expect("Failed to read directory")
            .map(|e| e.expect("Failed to read entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_workspace_source_tree() {
        let workspace = TestWorkspace::new();
        let root = workspace.create_source_tree();
        assert!(root.join("commands/bp/help.md").is_file());
        assert!(root.join("blueprint/workflows/execute.md").is_file());
        assert!(root.join("hooks/dist/bp-statusline.js").is_file());
    }

    #[test]
    fn test_workspace_read_json() {
        let workspace = TestWorkspace::new();
        workspace.write_file("settings.json", r#"{"model": "opus"}"#);
        assert_eq!(workspace.read_json("settings.json")["model"], "opus");
    }
}
