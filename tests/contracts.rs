//! Contract tests for Tether.
//!
//! Contracts are invariants that must ALWAYS hold, mostly around the on-disk
//! record format other tools and older versions share with us.
//!
//! Run with: cargo test --test contracts

mod common;

#[path = "contracts/record_file.rs"]
mod record_file;

#[path = "contracts/json_output.rs"]
mod json_output;
