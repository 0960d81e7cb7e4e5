#![forbid(unsafe_code)]

//! dsigcheck: validate every XML-DSig signature in a document and report
//! the outcome per signature, per signature value and per reference.

pub mod report;
pub mod settings;
pub mod telemetry;
pub mod validate;

pub use dsigcheck_c14n as c14n;
pub use dsigcheck_core as core;
pub use dsigcheck_crypto as crypto;
pub use dsigcheck_dsig as dsig;
pub use dsigcheck_keys as keys;
pub use dsigcheck_xml as xml;

pub use report::{SignatureOutcome, SignatureReport};
pub use settings::Settings;
pub use validate::Validator;

/// Validate the file named in `settings` with the engine it selects and
/// the `KeyValue`/X.509 key selector.
pub fn run(settings: &Settings) -> Result<Vec<SignatureReport>, core::Error> {
    let engine = dsig::engine_by_name(&settings.engine)?;
    tracing::info!(engine = engine.name(), file = %settings.file.display(), "validating");
    let selector = keys::KeyValueKeySelector;
    Validator::new(engine.as_ref(), &selector)
        .with_id_attrs(settings.id_attrs.iter().cloned())
        .validate_file(&settings.file)
}
