use std::path::{Path, PathBuf};

/// Layout of a qdbg installation root (`$QDBG_HOME`, `~/.qdbg` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QdbgHome {
    root: PathBuf,
}

impl QdbgHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        match std::env::var_os("QDBG_HOME").filter(|v| !v.is_empty()) {
            Some(root) => Self::new(root),
            None => Self::new(
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".qdbg"),
            ),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn lib(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn lib_backup(&self) -> PathBuf {
        self.root.join("lib-backup")
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join("env")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}
