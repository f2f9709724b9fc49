//! Blob store implementations for shared files.

pub mod fs;

pub use fs::FileSystemBlobStore;
