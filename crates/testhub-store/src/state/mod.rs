//! Key-value state provider implementations.

#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "file")]
pub use file::FileStateProvider;
#[cfg(feature = "memory")]
pub use memory::MemoryStateProvider;
