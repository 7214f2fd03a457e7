use crate::io::read_optional;
use crate::paths;
use std::path::{Path, PathBuf};

/// Sentinel file the assistant writes when it needs a human decision.
///
/// Its existence blocks every new generation. Only a human clears it, by
/// deleting the file.
#[derive(Debug, Clone)]
pub struct ConflictGate {
    path: PathBuf,
}

impl ConflictGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_root(root: &Path) -> Self {
        Self::new(paths::conflict_path(root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_present(&self) -> bool {
        self.path.exists()
    }

    /// The conflict description, or `None` when no conflict is flagged.
    ///
    /// A sentinel that exists but cannot be read still blocks; its
    /// description is then empty.
    pub fn read(&self) -> Option<String> {
        if !self.is_present() {
            return None;
        }
        Some(read_optional(&self.path).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn absent_sentinel_is_no_conflict() {
        let dir = TempDir::new().unwrap();
        let gate = ConflictGate::for_root(dir.path());
        assert!(!gate.is_present());
        assert!(gate.read().is_none());
    }

    #[test]
    fn present_sentinel_returns_content_verbatim() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".ukko")).unwrap();
        let gate = ConflictGate::for_root(dir.path());
        std::fs::write(gate.path(), "disagreement on schema\n\n- detail").unwrap();

        assert!(gate.is_present());
        assert_eq!(
            gate.read().as_deref(),
            Some("disagreement on schema\n\n- detail")
        );
    }

    #[test]
    fn deleting_sentinel_clears_conflict() {
        let dir = TempDir::new().unwrap();
        let gate = ConflictGate::new(dir.path().join("CONFLICT.md"));
        std::fs::write(gate.path(), "x").unwrap();
        assert!(gate.is_present());
        std::fs::remove_file(gate.path()).unwrap();
        assert!(!gate.is_present());
    }
}
