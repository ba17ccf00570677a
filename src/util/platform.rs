//! Operating system detection.
//!
//! The kernel reports its name in `/proc/sys/kernel/ostype`, the same value
//! `uname -s` prints. Reading it through `FileSystem` keeps the check testable.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::collector::traits::FileSystem;

/// Kernel name required to run.
pub const LINUX_OSTYPE: &str = "Linux";

/// Error returned when the host cannot run the dashboard.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("ibtop can only run on the Linux operating system")]
    NotLinux,
    #[error("ibtop can only run on the Linux operating system (kernel reports {0:?})")]
    UnexpectedOsType(String),
    #[error("ibtop can only run on the Linux operating system (unable to read {}: {source})", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Checks that the process runs on a Linux kernel.
///
/// # Arguments
/// * `fs` - Filesystem implementation (real or mock)
/// * `proc_path` - Base path to proc filesystem (usually "/proc")
pub fn ensure_linux<F: FileSystem>(fs: &F, proc_path: impl AsRef<Path>) -> Result<(), PlatformError> {
    if !cfg!(target_os = "linux") && !cfg!(test) {
        return Err(PlatformError::NotLinux);
    }

    let path = proc_path.as_ref().join("sys/kernel/ostype");
    let content = fs
        .read_to_string(&path)
        .map_err(|source| PlatformError::Unreadable { path, source })?;

    let ostype = content.trim();
    if ostype == LINUX_OSTYPE {
        Ok(())
    } else {
        Err(PlatformError::UnexpectedOsType(ostype.to_string()))
    }
}
