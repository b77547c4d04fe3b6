use super::{BbsBlsSignatureProof2020, DerivedProof, VerificationResult};
use crate::error::Error;
use crate::key_pair::Bls12381G2KeyPair;
use crate::processor::ProcessingContext;
use crate::purpose::{ProofPurpose, PurposeContext};
use crate::statement::MessageSet;
use crate::suite::{proof_type, split_proof, SignatureSuite, SuiteCapabilities};
use crate::LdbbsResult;
use log::debug;
use serde_json::Value;

/// Verify a derived document, picking the suite from the proof's type
pub fn verify_derived(
    context: ProcessingContext<'_>,
    document: &Value,
    purpose: &dyn ProofPurpose,
) -> VerificationResult {
    let suite = split_proof(document).and_then(|(_, proof)| {
        SignatureSuite::from_derived_type(proof_type(&proof)).ok_or_else(|| Error::TypeMismatch {
            expected: SignatureSuite::BbsBlsSignature2020
                .derived_type_name()
                .to_string(),
            found: proof_type(&proof).to_string(),
        })
    });
    match suite {
        Ok(suite) => BbsBlsSignatureProof2020::for_suite(suite, context).verify(document, purpose),
        Err(e) => VerificationResult::failure(e),
    }
}

impl BbsBlsSignatureProof2020<'_> {
    /// Verify a document with a derived proof embedded under `proof`
    pub fn verify(&self, document: &Value, purpose: &dyn ProofPurpose) -> VerificationResult {
        VerificationResult::from(
            split_proof(document)
                .and_then(|(document, proof)| self.try_verify(&document, &proof, purpose)),
        )
    }

    /// Verify `proof` over the revealed `document`. Never fails, the outcome
    /// is reported in the result.
    pub fn verify_proof(
        &self,
        document: &Value,
        proof: &Value,
        purpose: &dyn ProofPurpose,
    ) -> VerificationResult {
        VerificationResult::from(self.try_verify(document, proof, purpose))
    }

    fn try_verify(
        &self,
        document: &Value,
        proof: &Value,
        purpose: &dyn ProofPurpose,
    ) -> LdbbsResult<()> {
        if proof_type(proof) != self.type_name() {
            return Err(Error::TypeMismatch {
                expected: self.type_name().to_string(),
                found: proof_type(proof).to_string(),
            });
        }
        let derived: DerivedProof = serde_json::from_value(proof.clone())
            .map_err(|e| Error::InvalidDocument(e.to_string()))?;
        let proof_bytes = derived.proof_bytes()?;
        let nonce = derived.nonce_bytes()?;
        let signed_metadata = derived.signed_metadata(self.suite());

        let document_statements = self.base.canonicalize_document(document)?;
        let messages = MessageSet::new(
            self.base.canonicalize_proof(&signed_metadata, document)?,
            self.stabilizer.unstabilize_all(&document_statements),
        );
        let statements = messages.combined();
        debug!(
            "verifying {} disclosed statements of {}",
            statements.len(),
            derived.total_statements
        );
        if statements.len() != derived.reveal_statements.len() {
            return Err(Error::Reconciliation(format!(
                "{} statements disclosed but {} reveal indices given",
                statements.len(),
                derived.reveal_statements.len()
            )));
        }
        derived
            .reveal_statements
            .validate(messages.proof.len(), derived.total_statements)?;

        let method = self.base.resolve_verification_method(&signed_metadata)?;
        let key = Bls12381G2KeyPair::from_verification_method(&method)?;
        let valid = self.primitive.verify_proof(
            &proof_bytes,
            &key.public_key_bytes(),
            derived.total_statements,
            &statements,
            &nonce,
            &derived.reveal_statements,
        )?;
        if !valid {
            return Err(Error::PrimitiveFailure("invalid proof".to_string()));
        }

        purpose.validate(
            proof,
            &PurposeContext {
                document,
                verification_method: &method,
                loader: self.context.loader,
            },
        )
    }
}
