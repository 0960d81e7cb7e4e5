#![forbid(unsafe_code)]

//! Per-signature validation outcomes and their text form.

use std::fmt;

/// The outcome for one `Signature` element, by document position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureReport {
    /// Zero-based position among the document's signatures.
    pub index: usize,
    pub outcome: SignatureOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
    /// Core validation passed.
    Valid,
    /// Core validation failed; each part was then checked on its own.
    Invalid {
        signature_value: bool,
        /// One entry per `Reference`, in `SignedInfo` order.
        references: Vec<bool>,
    },
    /// The engine could not read the `Signature` element.
    Unreadable { reason: String },
}

impl SignatureReport {
    pub fn is_valid(&self) -> bool {
        self.outcome == SignatureOutcome::Valid
    }
}

impl fmt::Display for SignatureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = self.index;
        match &self.outcome {
            SignatureOutcome::Valid => write!(f, "Signature {i} passed core validation"),
            SignatureOutcome::Invalid {
                signature_value,
                references,
            } => {
                writeln!(f, "Signature {i} failed core validation")?;
                write!(f, "Signature {i} validation status: {signature_value}")?;
                for (j, valid) in references.iter().enumerate() {
                    write!(f, "\nSignature {i} ref['{j}'] validity status: {valid}")?;
                }
                Ok(())
            }
            SignatureOutcome::Unreadable { reason } => {
                writeln!(f, "Signature {i} failed core validation")?;
                write!(f, "Signature {i} could not be unmarshaled: {reason}")
            }
        }
    }
}
