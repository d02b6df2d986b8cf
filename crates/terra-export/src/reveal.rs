//! Best-effort "show in folder" for freshly written exports.

use std::path::Path;

/// Ask the platform file manager to show `path`.
///
/// Supported on Windows (Explorer) and macOS (Finder). Elsewhere this only
/// logs. Failures are logged and never propagated.
pub fn reveal_in_file_manager(path: &Path) {
    match reveal_command(path) {
        Some(mut command) => {
            if let Err(e) = command.spawn() {
                tracing::warn!(path = %path.display(), "could not open file manager: {e}");
            }
        }
        None => tracing::info!(
            path = %path.display(),
            "revealing files in a file manager is not supported on this platform"
        ),
    }
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Option<std::process::Command> {
    let mut command = std::process::Command::new("explorer.exe");
    let mut arg = std::ffi::OsString::from("/select,");
    arg.push(path.as_os_str());
    command.arg(arg);
    Some(command)
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Option<std::process::Command> {
    let mut command = std::process::Command::new("open");
    command.arg("-R").arg(path);
    Some(command)
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(_path: &Path) -> Option<std::process::Command> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_command_matches_platform() {
        let command = reveal_command(Path::new("exports").join("a.png").as_path());
        if cfg!(any(target_os = "windows", target_os = "macos")) {
            assert!(command.is_some());
        } else {
            assert!(command.is_none());
        }
    }
}
