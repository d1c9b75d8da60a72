//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API so the rest of the
//! codebase can remain platform-agnostic.

#[cfg(unix)]
mod common_unix;
mod temp;
#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{free_space_bytes, open_log_file_secure_append, write_config_secure_new_0600};

#[cfg(not(unix))]
pub use windows::{free_space_bytes, open_log_file_secure_append, write_config_secure_new_0600};
