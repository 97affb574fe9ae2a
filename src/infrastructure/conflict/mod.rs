//! Infrastructure implementations for ConfirmOverwrite

mod interactive;

pub use interactive::InteractiveConfirm;
