use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "docseek.log";
const ARCHIVE_PREFIX: &str = "docseek-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Routes `tracing` output to `<log_dir>/docseek.log`. Stdout is reserved
/// for the host transport, so nothing here ever writes there.
pub fn init(log_dir: &Path) -> Result<PathBuf, std::io::Error> {
    let file = open_log_file(log_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    install_panic_hook();
    Ok(log_file_path(log_dir))
}

/// Fallback when the log directory is unusable.
pub fn init_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    install_panic_hook();
}

pub fn open_log_file(log_dir: &Path) -> Result<File, std::io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_file_path(log_dir);
    rotate_if_needed(&log_path, log_dir)?;

    OpenOptions::new().create(true).append(true).open(&log_path)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn rotate_if_needed(log_path: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
    let meta = match fs::metadata(log_path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    if meta.len() < MAX_LOG_BYTES {
        return Ok(());
    }

    let archived = log_dir.join(format!("{ARCHIVE_PREFIX}{}.log", now_secs()));
    fs::rename(log_path, archived)?;
    prune_old_archives(log_dir)
}

fn prune_old_archives(log_dir: &Path) -> Result<(), std::io::Error> {
    let mut archives = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(ARCHIVE_PREFIX) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();

    archives.sort();
    let excess = archives.len().saturating_sub(MAX_ARCHIVES);
    for oldest in archives.drain(..excess) {
        let _ = fs::remove_file(oldest);
    }
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            tracing::error!(%location, %payload, "panic");
            prior(panic_info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::{log_file_path, open_log_file, MAX_ARCHIVES, MAX_LOG_BYTES};

    #[test]
    fn oversized_log_is_archived_before_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        std::fs::write(&path, vec![b'x'; MAX_LOG_BYTES as usize]).unwrap();

        let file = open_log_file(dir.path()).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 0);

        let archived = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("docseek-"))
            .count();
        assert_eq!(archived, 1);
    }

    #[test]
    fn keeps_at_most_max_archives() {
        let dir = tempfile::tempdir().unwrap();
        for stamp in 0..(MAX_ARCHIVES + 3) {
            std::fs::write(dir.path().join(format!("docseek-{stamp:04}.log")), b"old").unwrap();
        }
        std::fs::write(log_file_path(dir.path()), vec![b'x'; MAX_LOG_BYTES as usize]).unwrap();

        open_log_file(dir.path()).unwrap();

        let mut archives: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("docseek-"))
            .collect();
        archives.sort();
        assert_eq!(archives.len(), MAX_ARCHIVES);
        assert!(!archives.contains(&"docseek-0000.log".to_string()));
    }

    #[test]
    fn small_log_is_appended_in_place() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(log_file_path(dir.path()), b"earlier\n").unwrap();
        let file = open_log_file(dir.path()).unwrap();
        assert_eq!(file.metadata().unwrap().len(), 8);
    }
}
