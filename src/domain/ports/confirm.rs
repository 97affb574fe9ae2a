//! Overwrite confirmation port
//!
//! Deploys ask before replacing existing content when `overwrite` is off.
//! Non-interactive callers use `AlwaysConfirm` or `NeverConfirm`.

use std::path::Path;

use crate::domain::value_objects::ArtifactId;

/// What the confirmation is about
#[derive(Debug, Clone)]
pub struct ConfirmContext<'a> {
    pub artifact: &'a ArtifactId,
    pub profile_id: &'a str,
    /// Existing on-disk destination that would be replaced
    pub destination: &'a Path,
}

pub trait ConfirmOverwrite: Send + Sync {
    /// Return true to replace the existing content
    fn confirm(&self, context: &ConfirmContext) -> bool;
}

/// Always overwrite. Default for automated callers.
pub struct AlwaysConfirm;

impl ConfirmOverwrite for AlwaysConfirm {
    fn confirm(&self, _context: &ConfirmContext) -> bool {
        true
    }
}

/// Never overwrite; existing destinations are skipped.
pub struct NeverConfirm;

impl ConfirmOverwrite for NeverConfirm {
    fn confirm(&self, _context: &ConfirmContext) -> bool {
        false
    }
}
