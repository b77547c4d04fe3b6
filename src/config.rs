use crate::purpose::ASSERTION_METHOD;
use crate::statement::DEFAULT_BLANK_NODE_PREFIX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The smallest nonce, in bytes, generated for a derived proof
pub const MIN_NONCE_LENGTH: usize = 50;

/// Suite wide settings
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiteOptions {
    /// The IRI prefix blank node labels are wrapped in while framing
    pub blank_node_prefix: String,
    /// The length of generated nonces, never less than [`MIN_NONCE_LENGTH`]
    pub nonce_length: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            blank_node_prefix: DEFAULT_BLANK_NODE_PREFIX.to_string(),
            nonce_length: MIN_NONCE_LENGTH,
        }
    }
}

impl SuiteOptions {
    /// The nonce length actually used
    pub fn effective_nonce_length(&self) -> usize {
        self.nonce_length.max(MIN_NONCE_LENGTH)
    }
}

/// Per call options for deriving a proof
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Use this nonce instead of generating one
    pub nonce: Option<Vec<u8>>,
}

impl DeriveOptions {
    /// Derive with an explicit nonce
    pub fn with_nonce<B: AsRef<[u8]>>(nonce: B) -> Self {
        Self {
            nonce: Some(nonce.as_ref().to_vec()),
        }
    }
}

/// Per call options for signing a document
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOptions {
    /// The verification method the signature is made with
    pub verification_method: String,
    /// The creation time, omitted from the proof when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// The proof purpose term, omitted from the proof when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
}

impl SignOptions {
    /// Sign now, for `assertionMethod`
    pub fn new(verification_method: &str) -> Self {
        Self {
            verification_method: verification_method.to_string(),
            created: Some(Utc::now()),
            proof_purpose: Some(ASSERTION_METHOD.to_string()),
        }
    }
}
