use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, SyncError};

/// Files making up the Launchpad database, WAL included.
pub const DB_FILES: [&str; 3] = ["db", "db-shm", "db-wal"];

/// The per-user temporary directory reported by `getconf DARWIN_USER_DIR`.
pub fn darwin_user_dir() -> Result<PathBuf> {
    let output = Command::new("getconf").arg("DARWIN_USER_DIR").output()?;
    if !output.status.success() {
        return Err(SyncError::Shell(format!(
            "getconf DARWIN_USER_DIR exited with {}",
            output.status
        )));
    }
    let dir = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if dir.is_empty() {
        return Err(SyncError::Shell("getconf DARWIN_USER_DIR printed nothing".into()));
    }
    Ok(PathBuf::from(dir))
}

fn launchpad_db_dir() -> Result<PathBuf> {
    Ok(darwin_user_dir()?.join("com.apple.dock.launchpad").join("db"))
}

pub fn launchpad_db_path() -> Result<PathBuf> { Ok(launchpad_db_dir()?.join(DB_FILES[0])) }
