//! Hand a path to whatever the desktop uses to open it.
//!
//! Windows goes straight to `ShellExecuteW`; no shell ever sees the path.
//! macOS and Linux run `open` / `xdg-open` with the path as a single argument.

use std::io;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Something that can open a file or folder outside this program.
pub trait Open {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Platform opener, picked once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    Windows,
    Mac,
    Linux,
}

impl Opener {
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Opener::Windows
        } else if cfg!(target_os = "macos") {
            Opener::Mac
        } else {
            Opener::Linux
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Opener::Windows => "ShellExecuteW",
            Opener::Mac => "open",
            Opener::Linux => "xdg-open",
        }
    }

    /// The command that opens `path`, not yet started. Windows has none.
    pub fn command(self, path: &Path) -> Option<Command> {
        match self {
            Opener::Windows => None,
            Opener::Mac | Opener::Linux => {
                let mut cmd = Command::new(self.program());
                cmd.arg(path);
                Some(cmd)
            }
        }
    }

    fn launch(self, path: &Path) -> io::Result<()> {
        let Some(mut cmd) = self.command(path) else {
            return shell_execute(path);
        };
        let status = cmd.status()?;
        if !status.success() {
            warn!(program = self.program(), path = %path.display(), %status, "opener exited unsuccessfully");
        }
        Ok(())
    }
}

impl Default for Opener {
    fn default() -> Self {
        Self::detect()
    }
}

impl Open for Opener {
    /// Launch failures are errors; the exit status is only logged.
    fn open(&self, path: &Path) -> Result<()> {
        debug!(program = self.program(), path = %path.display(), "opening");
        self.launch(path).map_err(|source| Error::Open {
            program: self.program(),
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(windows)]
fn shell_execute(path: &Path) -> io::Result<()> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::Shell::ShellExecuteW;
    use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    let wide = |s: &OsStr| s.encode_wide().chain(Some(0)).collect::<Vec<u16>>();
    let operation = wide(OsStr::new("open"));
    let file = wide(path.as_os_str());

    let instance = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            operation.as_ptr(),
            file.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    };

    // Anything up to 32 is an error code rather than a handle.
    let code = instance as isize;
    if code > 32 {
        Ok(())
    } else {
        Err(io::Error::from_raw_os_error(code as i32))
    }
}

#[cfg(not(windows))]
fn shell_execute(_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "ShellExecuteW is only available on Windows",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn test_detect_matches_target() {
        let opener = Opener::detect();
        #[cfg(target_os = "windows")]
        assert_eq!(opener, Opener::Windows);
        #[cfg(target_os = "macos")]
        assert_eq!(opener, Opener::Mac);
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        assert_eq!(opener, Opener::Linux);
    }

    #[test]
    fn test_commands_per_platform() {
        let path = Path::new("/tmp/some file.txt");

        let cmd = Opener::Linux.command(path).unwrap();
        assert_eq!(cmd.get_program(), "xdg-open");
        assert_eq!(args(&cmd), vec![path.as_os_str()]);

        let cmd = Opener::Mac.command(path).unwrap();
        assert_eq!(cmd.get_program(), "open");
        assert_eq!(args(&cmd), vec![path.as_os_str()]);
    }

    #[test]
    fn test_windows_never_builds_a_shell_command() {
        let path = Path::new(r"C:\dl\a&calc");
        assert!(Opener::Windows.command(path).is_none());
        assert_eq!(Opener::Windows.program(), "ShellExecuteW");
    }

    #[test]
    fn test_shell_metacharacters_stay_one_argument() {
        let path = Path::new("/tmp/a&calc;rm -rf x|y");
        let cmd = Opener::Linux.command(path).unwrap();
        assert_eq!(args(&cmd), vec![path.as_os_str()]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_windows_opener_elsewhere_fails_to_launch() {
        let err = Opener::Windows.open(Path::new(r"C:\dl\a&calc")).unwrap_err();
        assert!(matches!(err, Error::Open { program: "ShellExecuteW", .. }));
    }
}
