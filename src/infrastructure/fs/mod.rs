//! File System Implementations
//!
//! Hashing, copying and home-directory resolution for local disks.

mod copy;
pub mod hasher;
mod home;

pub use copy::{atomic_write, copy_artifact, remove_path};
pub use hasher::{sorted_files, Sha256Hasher, CHUNK_SIZE};
pub use home::{expand_home, tether_data_dir, tether_home_dir, TETHER_TEST_HOME_VAR};
