use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("empty path")]
    EmptyPath,
    #[error("path does not exist: {}", .0.display())]
    MissingPath(PathBuf),
    #[error("failed to open: {message}")]
    LaunchFailed { message: String, code: Option<i32> },
}

/// Hands a file to the OS default handler.
pub trait FileOpener {
    fn open(&self, path: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileOpener;

impl FileOpener for SystemFileOpener {
    fn open(&self, path: &str) -> Result<(), LaunchError> {
        launch_path(path)
    }
}

pub fn launch_path(path: &str) -> Result<(), LaunchError> {
    let candidate = validate_launch_path(path)?;
    open_with_default_handler(&candidate)
}

pub fn validate_launch_path(path: &str) -> Result<PathBuf, LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyPath);
    }

    let candidate = Path::new(trimmed);
    if !candidate.exists() {
        return Err(LaunchError::MissingPath(candidate.to_path_buf()));
    }

    Ok(candidate.to_path_buf())
}

#[cfg(target_os = "windows")]
fn open_with_default_handler(path: &Path) -> Result<(), LaunchError> {
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let verb = to_wide("open");
    let target = to_wide(&path.to_string_lossy());
    let result = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            target.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    } as isize;

    // ShellExecuteW reports success with values above 32.
    if result <= 32 {
        return Err(LaunchError::LaunchFailed {
            message: format!("ShellExecuteW failed for {}", path.display()),
            code: Some(result as i32),
        });
    }

    Ok(())
}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(not(target_os = "windows"))]
fn open_with_default_handler(path: &Path) -> Result<(), LaunchError> {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    let status = std::process::Command::new(program)
        .arg(path)
        .status()
        .map_err(|error| LaunchError::LaunchFailed {
            message: format!("failed to run {program}: {error}"),
            code: None,
        })?;

    if !status.success() {
        return Err(LaunchError::LaunchFailed {
            message: format!("{program} exited with {status}"),
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_launch_path, FileOpener, LaunchError, SystemFileOpener};

    #[test]
    fn rejects_blank_path() {
        assert_eq!(validate_launch_path("   "), Err(LaunchError::EmptyPath));
        assert_eq!(SystemFileOpener.open(""), Err(LaunchError::EmptyPath));
    }

    #[test]
    fn missing_path_is_reported_with_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.pdf");
        let result = SystemFileOpener.open(missing.to_str().unwrap());
        assert_eq!(result, Err(LaunchError::MissingPath(missing)));
    }

    #[test]
    fn existing_path_validates_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("present.txt");
        std::fs::write(&file, b"ok").unwrap();

        let padded = format!("  {}  ", file.display());
        assert_eq!(validate_launch_path(&padded), Ok(file));
    }
}
