//! Utility modules for ibtop.

mod platform;

pub use platform::{LINUX_OSTYPE, PlatformError, ensure_linux};
