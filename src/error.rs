use core::fmt::{self, Display, Formatter};

/// Errors created by this library
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The supplied proof is not of the expected suite
    TypeMismatch {
        /// The suite type that was required
        expected: String,
        /// The suite type that was found
        found: String,
    },
    /// Malformed base64 or byte input
    DecodeError(String),
    /// A revealed statement is not present in the source document
    Reconciliation(String),
    /// The proof does not reference a verification method
    MissingReference,
    /// The referenced verification method could not be resolved
    NotFound(String),
    /// The referenced verification method has been revoked
    Revoked(String),
    /// The signature primitive rejected its input or the proof
    PrimitiveFailure(String),
    /// The proof purpose policy rejected the proof
    PurposeFailure(String),
    /// The document or proof object is not shaped as expected
    InvalidDocument(String),
    /// Key material could not be parsed
    InvalidKey(&'static str),
    /// JSON (de)serialization failed
    SerdeError(String),
    /// Any other failure
    General(&'static str),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => write!(
                f,
                "proof type mismatch: expected '{}', found '{}'",
                expected, found
            ),
            Self::DecodeError(reason) => write!(f, "decode error: {}", reason),
            Self::Reconciliation(statement) => write!(
                f,
                "revealed statement not present in source document: {}",
                statement
            ),
            Self::MissingReference => write!(f, "no \"verificationMethod\" found in proof"),
            Self::NotFound(id) => write!(f, "verification method '{}' not found", id),
            Self::Revoked(id) => write!(f, "verification method '{}' has been revoked", id),
            Self::PrimitiveFailure(reason) => write!(f, "signature primitive failure: {}", reason),
            Self::PurposeFailure(reason) => write!(f, "proof purpose failure: {}", reason),
            Self::InvalidDocument(reason) => write!(f, "invalid document: {}", reason),
            Self::InvalidKey(reason) => write!(f, "invalid key: {}", reason),
            Self::SerdeError(reason) => write!(f, "serialization error: {}", reason),
            Self::General(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeError(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::DecodeError(err.to_string())
    }
}
