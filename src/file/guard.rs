//! Lock check and backup-then-restore writes.
//!
//! yWriter places `<project>.lock` next to a project it has open. The codec
//! only ever checks for that file; it never creates or removes it. Before a
//! project is overwritten the old file is renamed to `<project>.bak`, which
//! is restored if the write fails and left in place if it succeeds.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::constants::{BACKUP_SUFFIX, LOCK_SUFFIX};

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of the lock sentinel: the full file name plus `.lock`.
pub fn lock_path(path: &Path) -> PathBuf {
    with_suffix(path, LOCK_SUFFIX)
}

/// Path of the backup copy: the full file name plus `.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, BACKUP_SUFFIX)
}

/// Checks whether yWriter has the project open.
pub fn is_locked(path: &Path) -> bool {
    lock_path(path).is_file()
}

/// Fails if yWriter has the project open.
///
/// # Errors
///
/// Returns an error if the lock sentinel exists.
pub fn ensure_unlocked(path: &Path) -> Result<()> {
    if is_locked(path) {
        bail!(
            "yWriter seems to be open. Please close first: {}",
            path.display()
        );
    }
    Ok(())
}

/// Writes `path` through `write`, keeping the previous file as a backup.
///
/// An existing file is renamed to its backup path first. If `write` fails,
/// the backup is moved back so the project is never left half-written.
///
/// # Errors
///
/// Returns an error if the existing file cannot be moved aside, if `write`
/// fails, or if the backup cannot be restored after a failed write.
pub fn write_with_backup<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let backup = backup_path(path);
    let backed_up = path.is_file();
    if backed_up {
        fs::rename(path, &backup)
            .with_context(|| format!("Cannot overwrite file: {}", path.display()))?;
    }

    if let Err(err) = write(path) {
        if backed_up {
            warn!("Write to {} failed, restoring backup", path.display());
            fs::rename(&backup, path).with_context(|| {
                format!(
                    "Cannot write file: {} (restoring {} failed as well)",
                    path.display(),
                    backup.display()
                )
            })?;
        }
        return Err(err).with_context(|| format!("Cannot write file: {}", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suffixes_append_to_full_name() {
        let path = Path::new("/books/novel.yw7");
        assert_eq!(lock_path(path), PathBuf::from("/books/novel.yw7.lock"));
        assert_eq!(backup_path(path), PathBuf::from("/books/novel.yw7.bak"));
    }

    #[test]
    fn test_lock_detection() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("novel.yw7");
        assert!(!is_locked(&path));
        assert!(ensure_unlocked(&path).is_ok());

        fs::write(lock_path(&path), "").unwrap();
        assert!(is_locked(&path));
        let err = ensure_unlocked(&path).unwrap_err();
        assert!(err.to_string().contains("yWriter seems to be open"));
    }

    #[test]
    fn test_successful_write_keeps_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("novel.yw7");
        fs::write(&path, "old").unwrap();

        write_with_backup(&path, |target| fs::write(target, "new")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "old");
    }

    #[test]
    fn test_failed_write_restores_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("novel.yw7");
        fs::write(&path, "old").unwrap();

        let result = write_with_backup(&path, |target| {
            fs::write(target, "partial")?;
            Err(io::Error::other("disk full"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_new_file_needs_no_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("novel.yw7");

        write_with_backup(&path, |target| fs::write(target, "new")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!backup_path(&path).exists());
    }
}
