//! Property tests for Tether.
//!
//! Properties use randomized input generation to protect invariants like
//! "hashing ignores where and in what order files were written" and
//! "one record per identity".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/content_hash.rs"]
mod content_hash;

#[path = "properties/record_identity.rs"]
mod record_identity;

#[path = "properties/safe_paths.rs"]
mod safe_paths;
