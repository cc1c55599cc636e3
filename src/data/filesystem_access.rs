//! Represents the system directories snapshots can be written under.

use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FsAccess {
    Cache,
}

impl FsAccess {
    /// Default capture directory, `<cache>/bvr/captures`, created on demand.
    pub fn captures_dir() -> anyhow::Result<PathBuf> {
        Self::Cache.path_with_subs(&["captures"])
    }

    /// Base path for the directory type with the `bvr` subdirectory appended.
    fn get_path(&self) -> anyhow::Result<PathBuf> {
        let base_path = match self {
            FsAccess::Cache => dirs::cache_dir(),
        };

        let mut path = base_path.ok_or_else(|| {
            anyhow::anyhow!("No {:?} directory available on this system", self)
        })?;
        path.push("bvr");
        Ok(path)
    }

    /// Constructs a path to the `bvr` directory with the provided subdirectories, creating it automatically.
    ///
    /// Example: `~/.cache/bvr/captures`.
    pub fn path_with_subs(&self, subs: &[&str]) -> anyhow::Result<PathBuf> {
        let mut d = self.get_path()?;
        for sub in subs {
            d.push(sub);
        }
        create_directory(&d)?;
        Ok(d)
    }
}

/// Creates the specified directory if it does not exist.
pub fn create_directory(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
