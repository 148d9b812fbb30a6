use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::sys::paths::DB_FILES;

/// Process-level side effects the binary triggers around a build.
pub trait Shell {
    /// Makes the Dock re-read (or recreate) its Launchpad database.
    fn restart_dock(&mut self) -> Result<()>;

    fn wait(&mut self, duration: Duration) { std::thread::sleep(duration) }
}

/// The real Dock, restarted with `killall`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dock;

impl Shell for Dock {
    fn restart_dock(&mut self) -> Result<()> {
        info!("Restarting the Dock");
        let status = Command::new("killall").arg("Dock").status()?;
        if status.success() {
            Ok(())
        } else {
            Err(SyncError::Shell(format!("killall Dock exited with {status}")))
        }
    }
}

/// Deletes the database files in `db_dir` and restarts the Dock so it writes
/// a fresh database, then waits `settle` for it to finish.
pub fn rebuild_database(shell: &mut dyn Shell, db_dir: &Path, settle: Duration) -> Result<()> {
    info!(dir = %db_dir.display(), "Deleting Launchpad database files");
    for file in DB_FILES {
        let path = db_dir.join(file);
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    shell.restart_dock()?;
    shell.wait(settle);
    Ok(())
}
