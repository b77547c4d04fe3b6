mod derive;
mod verify;

pub use derive::*;
pub use verify::*;

use crate::config::SuiteOptions;
use crate::error::Error;
use crate::primitive::{BbsPrimitive, SignaturePrimitive};
use crate::processor::ProcessingContext;
use crate::statement::{BlankNodeStabilizer, RevealIndices};
use crate::suite::{BoundSuite, SignatureSuite, SuiteCapabilities};
use crate::LdbbsResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

static BBS: BbsPrimitive = BbsPrimitive;

/// The proof object attached to a derived document
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedProof {
    /// The derived proof type
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Base64 encoded proof of knowledge
    pub proof: String,
    /// Disclosed positions in the signed message list
    pub reveal_statements: RevealIndices,
    /// The number of messages the issuer signed
    pub total_statements: usize,
    /// Base64 encoded nonce the proof is bound to
    pub nonce: String,
    /// Issuer proof fields carried over from the base signature
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl DerivedProof {
    /// The decoded proof of knowledge
    pub fn proof_bytes(&self) -> LdbbsResult<Vec<u8>> {
        Ok(STANDARD.decode(&self.proof)?)
    }

    /// The decoded nonce
    pub fn nonce_bytes(&self) -> LdbbsResult<Vec<u8>> {
        Ok(STANDARD.decode(&self.nonce)?)
    }

    /// The issuer proof metadata as it was signed, typed as the base suite
    pub fn signed_metadata(&self, suite: SignatureSuite) -> Value {
        let mut metadata = self.metadata.clone();
        metadata.insert("type".to_string(), Value::from(suite.type_name()));
        Value::Object(metadata)
    }
}

/// The outcome of a verification. Failures never escape as errors, the
/// cause is kept in `error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// True only if every check passed
    pub verified: bool,
    /// The first failed check
    pub error: Option<Error>,
}

impl VerificationResult {
    /// A successful verification
    pub fn success() -> Self {
        Self {
            verified: true,
            error: None,
        }
    }

    /// A failed verification
    pub fn failure(error: Error) -> Self {
        Self {
            verified: false,
            error: Some(error),
        }
    }
}

impl From<LdbbsResult<()>> for VerificationResult {
    fn from(result: LdbbsResult<()>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => Self::failure(e),
        }
    }
}

/// Selective disclosure proofs derived from a base BBS+ signature.
///
/// Holds the collaborators for derive and verify calls; each call works on
/// its own copies of the input documents.
pub struct BbsBlsSignatureProof2020<'a> {
    context: ProcessingContext<'a>,
    base: BoundSuite<'a>,
    primitive: &'a dyn SignaturePrimitive,
    options: SuiteOptions,
    stabilizer: BlankNodeStabilizer,
}

impl<'a> BbsBlsSignatureProof2020<'a> {
    /// Proofs derived from `BbsBlsSignature2020` signatures
    pub fn new(context: ProcessingContext<'a>) -> Self {
        Self::for_suite(SignatureSuite::BbsBlsSignature2020, context)
    }

    /// Proofs derived from signatures of `suite`
    pub fn for_suite(suite: SignatureSuite, context: ProcessingContext<'a>) -> Self {
        let options = SuiteOptions::default();
        Self {
            context,
            base: suite.bind(context),
            primitive: &BBS,
            stabilizer: BlankNodeStabilizer::new(&options.blank_node_prefix),
            options,
        }
    }

    /// Use a different proof primitive
    pub fn with_primitive(mut self, primitive: &'a dyn SignaturePrimitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// Replace the suite options
    pub fn with_options(mut self, options: SuiteOptions) -> Self {
        self.stabilizer = BlankNodeStabilizer::new(&options.blank_node_prefix);
        self.options = options;
        self
    }

    /// The base signature suite
    pub fn suite(&self) -> SignatureSuite {
        self.base.suite()
    }

    /// The derived proof type this instance produces
    pub fn type_name(&self) -> &'static str {
        self.suite().derived_type_name()
    }

    /// The current options
    pub fn options(&self) -> &SuiteOptions {
        &self.options
    }
}
