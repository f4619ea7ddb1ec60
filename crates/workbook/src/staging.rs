//! Write-to-temp-then-rename file replacement.
//!
//! A [`StagedFile`] holds fully written bytes in a sibling temporary file.
//! Nothing is visible at the target path until [`StagedFile::commit`] renames
//! it into place. Dropping an uncommitted stage removes the temporary.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::StoreError;

#[derive(Debug)]
pub struct StagedFile {
    tmp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Write `bytes` next to `target` and fsync them.
    pub fn write(target: &Path, bytes: &[u8]) -> Result<Self, StoreError> {
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file_name = target
            .file_name()
            .ok_or_else(|| StoreError::InvalidFormat(format!("not a file path: {}", target.display())))?
            .to_string_lossy();
        let tmp_path = target.with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::now_v7()));

        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        Ok(Self {
            tmp_path,
            target: target.to_path_buf(),
            committed: false,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically replace the target with the staged bytes.
    pub fn commit(mut self) -> Result<(), StoreError> {
        fs::rename(&self.tmp_path, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_replaces_target_and_drop_discards_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("teams.json");
        fs::write(&target, b"old").unwrap();

        let staged = StagedFile::write(&target, b"new").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"old");
        staged.commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");

        let abandoned = StagedFile::write(&target, b"never").unwrap();
        drop(abandoned);
        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
