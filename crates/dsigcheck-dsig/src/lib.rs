#![forbid(unsafe_code)]

//! XML Digital Signature validation.
//!
//! [`SignatureEngine`] is the boundary the validation driver talks to:
//! unmarshal a `Signature` element, run core validation, and answer the
//! signature-value and per-reference questions separately. [`DomEngine`]
//! is the implementation shipped with the workspace.

pub mod context;
pub mod dom;
pub mod engine;
pub mod reference;
pub mod signature;
pub mod transforms;

pub use context::ValidateContext;
pub use dom::DomEngine;
pub use engine::{engine_by_name, SignatureEngine, DEFAULT_ENGINE};
pub use signature::{Reference, SignedInfo, TransformSpec, XmlSignature};
