//! # Wirebox Support
//!
//! Shared utilities for the wirebox crates.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - "Did you mean?" lookups over registered dependency names

pub mod rendering;
