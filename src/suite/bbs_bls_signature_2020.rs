use super::{
    attach_proof, proof_type, split_proof, without_keys, SignatureSuite, SuiteCapabilities,
    DISCLOSURE_FIELDS, SIGNATURE_FIELD,
};
use crate::config::SignOptions;
use crate::error::Error;
use crate::key_pair::Bls12381G2KeyPair;
use crate::primitive::{BbsPrimitive, SigningPrimitive};
use crate::processor::ProcessingContext;
use crate::proof::VerificationResult;
use crate::purpose::{ProofPurpose, PurposeContext};
use crate::statement::{MessageSet, StatementList};
use crate::verification_method::{VerificationMethod, VerificationMethodResolver};
use crate::LdbbsResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::SecondsFormat;
use log::debug;
use serde_json::{Map, Value};

static BBS: BbsPrimitive = BbsPrimitive;

/// BBS+ signatures over the canonical statements of a document.
///
/// The signed messages are the proof metadata statements followed by the
/// document statements.
#[derive(Copy, Clone)]
pub struct BbsBlsSignature2020<'a> {
    context: ProcessingContext<'a>,
    primitive: &'a dyn SigningPrimitive,
}

impl<'a> BbsBlsSignature2020<'a> {
    /// Create the suite with the BBS+ signing primitive
    pub fn new(context: ProcessingContext<'a>) -> Self {
        Self {
            context,
            primitive: &BBS,
        }
    }

    /// Use a different signing primitive
    pub fn with_primitive(mut self, primitive: &'a dyn SigningPrimitive) -> Self {
        self.primitive = primitive;
        self
    }

    /// The messages a signature over `document` with `proof` covers
    pub fn messages(&self, proof: &Value, document: &Value) -> LdbbsResult<MessageSet> {
        Ok(MessageSet::new(
            self.canonicalize_proof(proof, document)?,
            self.canonicalize_document(document)?,
        ))
    }

    /// Sign `document` and return it with the proof attached
    pub fn sign(
        &self,
        document: &Value,
        key_pair: &Bls12381G2KeyPair,
        options: &SignOptions,
    ) -> LdbbsResult<Value> {
        let secret_key = key_pair
            .secret_key_bytes()
            .ok_or(Error::InvalidKey("key pair has no secret key"))?;
        let body = Value::Object(without_keys(document, &[super::PROOF_PROPERTY])?);

        let mut proof = Map::new();
        proof.insert(
            "type".to_string(),
            Value::from(SignatureSuite::BbsBlsSignature2020.type_name()),
        );
        if let Some(created) = options.created {
            proof.insert(
                "created".to_string(),
                Value::from(created.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        proof.insert(
            "verificationMethod".to_string(),
            Value::from(options.verification_method.as_str()),
        );
        if let Some(purpose) = &options.proof_purpose {
            proof.insert("proofPurpose".to_string(), Value::from(purpose.as_str()));
        }
        let mut proof = Value::Object(proof);

        let messages = self.messages(&proof, &body)?;
        debug!(
            "signing {} proof and {} document statements",
            messages.proof.len(),
            messages.document.len()
        );
        let signature = self.primitive.sign(&secret_key, &messages.combined())?;
        proof[SIGNATURE_FIELD] = Value::from(STANDARD.encode(signature));

        attach_proof(&body, proof)
    }

    /// Verify the base signature attached to `document`. Never fails, the
    /// outcome is reported in the result.
    pub fn verify_signature(
        &self,
        document: &Value,
        purpose: &dyn ProofPurpose,
    ) -> VerificationResult {
        VerificationResult::from(self.try_verify_signature(document, purpose))
    }

    fn try_verify_signature(&self, document: &Value, purpose: &dyn ProofPurpose) -> LdbbsResult<()> {
        let (body, proof) = split_proof(document)?;
        let expected = SignatureSuite::BbsBlsSignature2020.type_name();
        if proof_type(&proof) != expected {
            return Err(Error::TypeMismatch {
                expected: expected.to_string(),
                found: proof_type(&proof).to_string(),
            });
        }
        let signature = proof
            .get(SIGNATURE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::DecodeError("proof has no signature".to_string()))?;
        let signature = STANDARD.decode(signature)?;

        let messages = self.messages(&proof, &body)?;
        let method = self.resolve_verification_method(&proof)?;
        let key = Bls12381G2KeyPair::from_verification_method(&method)?;
        if !self
            .primitive
            .verify(&signature, &key.public_key_bytes(), &messages.combined())?
        {
            return Err(Error::PrimitiveFailure("invalid signature".to_string()));
        }

        purpose.validate(
            &proof,
            &PurposeContext {
                document: &body,
                verification_method: &method,
                loader: self.context.loader,
            },
        )
    }
}

impl SuiteCapabilities for BbsBlsSignature2020<'_> {
    fn suite(&self) -> SignatureSuite {
        SignatureSuite::BbsBlsSignature2020
    }

    fn canonicalize_document(&self, document: &Value) -> LdbbsResult<StatementList> {
        let body = without_keys(document, &[super::PROOF_PROPERTY])?;
        self.context.canonicalize(&Value::Object(body))
    }

    fn canonicalize_proof(&self, proof: &Value, document: &Value) -> LdbbsResult<StatementList> {
        let mut keys = vec![SIGNATURE_FIELD];
        keys.extend(DISCLOSURE_FIELDS);
        let mut proof = without_keys(proof, &keys)?;
        if let Some(context) = document.get("@context") {
            proof.insert("@context".to_string(), context.clone());
        }
        self.context.canonicalize(&Value::Object(proof))
    }

    fn resolve_verification_method(&self, proof: &Value) -> LdbbsResult<VerificationMethod> {
        VerificationMethodResolver::new(self.context.loader).resolve(proof)
    }
}
