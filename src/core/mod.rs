//! Core types and error handling for mavin
//!
//! Everything fatal in mavin is expressed as a [`MavinError`]. The CLI turns
//! any failure into an [`ErrorContext`] with [`user_friendly_error`] before
//! printing it.

pub mod error;

pub use error::{ErrorContext, MavinError, ReverseDependent, user_friendly_error};
