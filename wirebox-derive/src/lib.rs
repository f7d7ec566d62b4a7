//! Derive macros for wirebox.

pub use wirebox_macros::Inject;
