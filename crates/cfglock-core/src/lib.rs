// Core modules
pub mod config;
pub mod lock;

// Re-export commonly used types
pub use config::{ConfigError, LockConfig, TimeoutPolicy};
pub use lock::{acquire_lock, FileLock, LockError, LockGuard};
