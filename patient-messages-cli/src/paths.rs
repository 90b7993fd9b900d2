//! Log file location and rotation.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "ward";
const APPLICATION: &str = "patient-messages";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

/// Directory the log files live in, or None if no home directory is known.
///
/// - Linux: `$XDG_CACHE_HOME/patient-messages` or `~/.cache/patient-messages`
/// - macOS: `~/Library/Caches/org.ward.patient-messages`
/// - Windows: `C:\Users\<User>\AppData\Local\ward\patient-messages\cache`
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Outcome of a rotation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Rotation {
    /// Where the previous `latest.log` was moved, if there was one.
    pub archived: Option<PathBuf>,
    /// Number of archived logs deleted to stay under the limit.
    pub removed: usize,
}

/// Prepare `dir` for a fresh `latest.log` and return its path.
///
/// Creates the directory, archives the previous run's log under a
/// timestamped name and prunes archives beyond [`MAX_OLD_LOGS`].
pub fn prepare_log_file(dir: &Path) -> io::Result<(PathBuf, Rotation)> {
    fs::create_dir_all(dir)?;
    let rotation = rotate_logs_in(dir)?;
    Ok((dir.join(LATEST_LOG), rotation))
}

fn rotate_logs_in(dir: &Path) -> io::Result<Rotation> {
    let latest = dir.join(LATEST_LOG);

    let archived = if latest.exists() {
        let target = archive_path(dir, &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
        fs::rename(&latest, &target)?;
        Some(target)
    } else {
        None
    };

    let removed = prune_archives(dir, MAX_OLD_LOGS)?;
    Ok(Rotation { archived, removed })
}

/// First free `<stamp>.log`, `<stamp>-1.log`, ... in `dir`.
fn archive_path(dir: &Path, stamp: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}.log", stamp));
    let mut n = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{}-{}.log", stamp, n));
        n += 1;
    }
    candidate
}

/// Delete the oldest archived logs beyond `keep`. Returns how many were removed.
fn prune_archives(dir: &Path, keep: usize) -> io::Result<usize> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.ends_with(".log") && name != LATEST_LOG {
            let modified = entry.metadata()?.modified()?;
            logs.push((modified, entry.path()));
        }
    }

    if logs.len() <= keep {
        return Ok(0);
    }

    // Oldest first
    logs.sort();
    let excess = logs.len() - keep;
    for (_, path) in logs.iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(excess)
}
