mod bbs_bls_signature_2020;

pub use bbs_bls_signature_2020::*;

use crate::error::Error;
use crate::processor::ProcessingContext;
use crate::statement::StatementList;
use crate::verification_method::VerificationMethod;
use crate::LdbbsResult;
use serde_json::{Map, Value};

/// The document property holding an attached proof
pub const PROOF_PROPERTY: &str = "proof";
/// The base64 signature field of an issuer proof
pub const SIGNATURE_FIELD: &str = "signature";
/// Fields that only exist on a derived proof and are never signed
pub const DISCLOSURE_FIELDS: [&str; 4] = ["proof", "nonce", "revealStatements", "totalStatements"];

/// The base signature suites a derived proof can be created from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignatureSuite {
    /// BBS+ signatures over canonical statements with BLS12-381 G2 keys
    BbsBlsSignature2020,
}

impl SignatureSuite {
    /// Every supported suite
    pub const ALL: [Self; 1] = [Self::BbsBlsSignature2020];

    /// The proof `type` of a base signature
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BbsBlsSignature2020 => "BbsBlsSignature2020",
        }
    }

    /// The proof `type` of a proof derived from this suite's signature
    pub fn derived_type_name(&self) -> &'static str {
        match self {
            Self::BbsBlsSignature2020 => "BbsBlsSignatureProof2020",
        }
    }

    /// Look up the suite for a base signature type
    pub fn from_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.type_name() == name)
    }

    /// Look up the suite for a derived proof type
    pub fn from_derived_type(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.derived_type_name() == name)
    }

    /// Attach the collaborators this suite needs
    pub fn bind(self, context: ProcessingContext<'_>) -> BoundSuite<'_> {
        match self {
            Self::BbsBlsSignature2020 => {
                BoundSuite::BbsBlsSignature2020(BbsBlsSignature2020::new(context))
            }
        }
    }
}

/// What the derive and verify paths need from a base signature suite
pub trait SuiteCapabilities {
    /// The suite these capabilities belong to
    fn suite(&self) -> SignatureSuite;

    /// Canonical statements of a document body, without any attached proof
    fn canonicalize_document(&self, document: &Value) -> LdbbsResult<StatementList>;

    /// Canonical statements of proof metadata, without signature or
    /// disclosure-only fields, under the document's `@context`
    fn canonicalize_proof(&self, proof: &Value, document: &Value) -> LdbbsResult<StatementList>;

    /// Resolve the verification method a proof references
    fn resolve_verification_method(&self, proof: &Value) -> LdbbsResult<VerificationMethod>;
}

/// A suite bound to its collaborators
pub enum BoundSuite<'a> {
    /// See [`BbsBlsSignature2020`]
    BbsBlsSignature2020(BbsBlsSignature2020<'a>),
}

impl SuiteCapabilities for BoundSuite<'_> {
    fn suite(&self) -> SignatureSuite {
        match self {
            Self::BbsBlsSignature2020(s) => s.suite(),
        }
    }

    fn canonicalize_document(&self, document: &Value) -> LdbbsResult<StatementList> {
        match self {
            Self::BbsBlsSignature2020(s) => s.canonicalize_document(document),
        }
    }

    fn canonicalize_proof(&self, proof: &Value, document: &Value) -> LdbbsResult<StatementList> {
        match self {
            Self::BbsBlsSignature2020(s) => s.canonicalize_proof(proof, document),
        }
    }

    fn resolve_verification_method(&self, proof: &Value) -> LdbbsResult<VerificationMethod> {
        match self {
            Self::BbsBlsSignature2020(s) => s.resolve_verification_method(proof),
        }
    }
}

/// Split a document into its body and the attached proof
pub fn split_proof(document: &Value) -> LdbbsResult<(Value, Value)> {
    let mut body = document
        .as_object()
        .cloned()
        .ok_or_else(|| Error::InvalidDocument("document must be a JSON object".to_string()))?;
    match body.remove(PROOF_PROPERTY) {
        Some(proof @ Value::Object(_)) => Ok((Value::Object(body), proof)),
        Some(_) => Err(Error::InvalidDocument(
            "document proof must be a single JSON object".to_string(),
        )),
        None => Err(Error::InvalidDocument("document has no proof".to_string())),
    }
}

/// Attach `proof` to a document body
pub fn attach_proof(document: &Value, proof: Value) -> LdbbsResult<Value> {
    let mut body = document
        .as_object()
        .cloned()
        .ok_or_else(|| Error::InvalidDocument("document must be a JSON object".to_string()))?;
    body.insert(PROOF_PROPERTY.to_string(), proof);
    Ok(Value::Object(body))
}

/// The proof's `type`, or an empty string
pub(crate) fn proof_type(proof: &Value) -> &str {
    proof.get("type").and_then(Value::as_str).unwrap_or_default()
}

/// Copy of an object with the given keys removed
pub(crate) fn without_keys(value: &Value, keys: &[&str]) -> LdbbsResult<Map<String, Value>> {
    let mut map = value
        .as_object()
        .cloned()
        .ok_or_else(|| Error::InvalidDocument("expected a JSON object".to_string()))?;
    for key in keys {
        map.remove(*key);
    }
    Ok(map)
}
