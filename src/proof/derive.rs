use super::{BbsBlsSignatureProof2020, DerivedProof};
use crate::config::DeriveOptions;
use crate::error::Error;
use crate::key_pair::Bls12381G2KeyPair;
use crate::processor::ProcessingContext;
use crate::statement::{reveal_indices, MessageSet, StatementList};
use crate::suite::{
    attach_proof, proof_type, split_proof, without_keys, SignatureSuite, SuiteCapabilities,
    DISCLOSURE_FIELDS, SIGNATURE_FIELD,
};
use crate::LdbbsResult;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;
use rand::{rngs::OsRng, RngCore};
use serde_json::Value;

/// The framed reveal document and its canonical statements
#[derive(Clone, Debug, PartialEq)]
pub struct RevealSubgraph {
    /// The framed document, blank nodes appear under their stabilized ids
    pub document: Value,
    /// Canonical statements of `document`
    pub statements: StatementList,
}

/// Fail with [`Error::TypeMismatch`] unless `proof` is a `suite` signature
pub fn assert_compatible_proof_type(proof: &Value, suite: SignatureSuite) -> LdbbsResult<()> {
    let found = proof_type(proof);
    if found == suite.type_name() {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            expected: suite.type_name().to_string(),
            found: found.to_string(),
        })
    }
}

/// Decode the base64 signature of an issuer proof
pub fn extract_signature(proof: &Value) -> LdbbsResult<Vec<u8>> {
    let encoded = proof
        .get(SIGNATURE_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::DecodeError("proof has no signature".to_string()))?;
    Ok(STANDARD.decode(encoded)?)
}

/// Derive a proof from a document with an embedded base signature, picking
/// the suite from the signature's type
pub fn derive_proof(
    context: ProcessingContext<'_>,
    signed_document: &Value,
    reveal_template: &Value,
    options: &DeriveOptions,
) -> LdbbsResult<Value> {
    let (_, proof) = split_proof(signed_document)?;
    let suite = SignatureSuite::from_type(proof_type(&proof)).ok_or_else(|| {
        Error::TypeMismatch {
            expected: SignatureSuite::BbsBlsSignature2020.type_name().to_string(),
            found: proof_type(&proof).to_string(),
        }
    })?;
    BbsBlsSignatureProof2020::for_suite(suite, context).derive_proof(
        signed_document,
        reveal_template,
        options,
    )
}

impl BbsBlsSignatureProof2020<'_> {
    /// Derive from a document with the base signature embedded under `proof`
    pub fn derive_proof(
        &self,
        signed_document: &Value,
        reveal_template: &Value,
        options: &DeriveOptions,
    ) -> LdbbsResult<Value> {
        let (document, proof) = split_proof(signed_document)?;
        self.derive(&document, &proof, reveal_template, options)
    }

    /// Derive a selective disclosure proof.
    ///
    /// Returns the document framed by `reveal_template` with the derived
    /// proof attached. Any failure aborts the derivation.
    pub fn derive(
        &self,
        document: &Value,
        proof: &Value,
        reveal_template: &Value,
        options: &DeriveOptions,
    ) -> LdbbsResult<Value> {
        assert_compatible_proof_type(proof, self.suite())?;
        let signature = extract_signature(proof)?;

        let messages = MessageSet::new(
            self.base.canonicalize_proof(proof, document)?,
            self.base.canonicalize_document(document)?,
        );
        debug!(
            "deriving from {} proof and {} document statements",
            messages.proof.len(),
            messages.document.len()
        );

        let stabilized = self.stabilizer.stabilize_all(&messages.document);
        let revealed = self.build_reveal_subgraph(&stabilized, reveal_template)?;
        let indices = reveal_indices(&stabilized, &revealed.statements, messages.proof.len())?;
        debug!("revealing {} of {} statements", indices.len(), messages.total());

        let nonce = self.resolve_nonce(options.nonce.as_deref());
        let method = self.base.resolve_verification_method(proof)?;
        let key = Bls12381G2KeyPair::from_verification_method(&method)?;
        let proof_bytes = self.primitive.create_proof(
            &signature,
            &key.public_key_bytes(),
            &messages.combined(),
            &nonce,
            &indices,
        )?;

        let mut metadata = without_keys(proof, &["type", SIGNATURE_FIELD])?;
        for field in DISCLOSURE_FIELDS {
            metadata.remove(field);
        }
        let derived = DerivedProof {
            proof_type: self.type_name().to_string(),
            proof: STANDARD.encode(proof_bytes),
            reveal_statements: indices,
            total_statements: messages.total(),
            nonce: STANDARD.encode(&nonce),
            metadata,
        };
        attach_proof(&revealed.document, serde_json::to_value(derived)?)
    }

    /// Frame the stabilized document statements against `reveal_template`
    /// and canonicalize the result
    pub fn build_reveal_subgraph(
        &self,
        stabilized: &StatementList,
        reveal_template: &Value,
    ) -> LdbbsResult<RevealSubgraph> {
        let graph = self.context.from_rdf(stabilized)?;
        let document = self.context.frame(&graph, reveal_template)?;
        let statements = self.base.canonicalize_document(&document)?;
        Ok(RevealSubgraph {
            document,
            statements,
        })
    }

    /// The supplied nonce, or fresh random bytes
    pub fn resolve_nonce(&self, supplied: Option<&[u8]>) -> Vec<u8> {
        match supplied {
            Some(nonce) => nonce.to_vec(),
            None => {
                let mut nonce = vec![0u8; self.options.effective_nonce_length()];
                OsRng.fill_bytes(&mut nonce);
                nonce
            }
        }
    }
}
