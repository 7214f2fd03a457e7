use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const UKKO_DIR: &str = ".ukko";
pub const PLANNING_DIR: &str = ".ukko/planning";

pub const CONFIG_FILE: &str = ".ukko/config.yaml";
pub const PRD_FILE: &str = ".ukko/PRD.md";
pub const CONFLICT_FILE: &str = ".ukko/CONFLICT.md";
pub const PLANNING_GUIDE: &str = ".ukko/planning/planning-guide.md";

pub const CLAUDE_MD: &str = "CLAUDE.md";
pub const CLAUDE_MD_BACKUP: &str = "CLAUDE.md.bak";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn ukko_dir(root: &Path) -> PathBuf {
    root.join(UKKO_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn prd_path(root: &Path) -> PathBuf {
    root.join(PRD_FILE)
}

pub fn conflict_path(root: &Path) -> PathBuf {
    root.join(CONFLICT_FILE)
}

pub fn planning_guide_path(root: &Path) -> PathBuf {
    root.join(PLANNING_GUIDE)
}

pub fn claude_md_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_MD)
}

pub fn claude_md_backup_path(root: &Path) -> PathBuf {
    root.join(CLAUDE_MD_BACKUP)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
