#![forbid(unsafe_code)]

//! Core types for dsigcheck: the shared error type, XML-DSig namespace and
//! element names, and the algorithm URIs the validator understands.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, KeySelectionError};
