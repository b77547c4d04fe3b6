use crate::error::Error;
use crate::knox::bbs::{hash_message, BbsScheme, PokSignatureProof, PublicKey, SecretKey, Signature};
use crate::statement::RevealIndices;
use crate::LdbbsResult;
use log::debug;
use rand::rngs::OsRng;
use std::collections::BTreeSet;

/// The BBS+ proof operations the derive and verify paths drive.
///
/// Messages are canonical statements; `revealed` indexes the full message
/// list the signature was created over.
pub trait SignaturePrimitive: Send + Sync {
    /// Prove possession of `signature` over `messages` while disclosing only
    /// the messages at `revealed`
    fn create_proof(
        &self,
        signature: &[u8],
        public_key: &[u8],
        messages: &[String],
        nonce: &[u8],
        revealed: &RevealIndices,
    ) -> LdbbsResult<Vec<u8>>;

    /// Check a proof. `messages[k]` is the disclosed message at position
    /// `revealed[k]` of a signature over `message_count` messages.
    ///
    /// Returns `Ok(false)` for a well formed but invalid proof.
    fn verify_proof(
        &self,
        proof: &[u8],
        public_key: &[u8],
        message_count: usize,
        messages: &[String],
        nonce: &[u8],
        revealed: &RevealIndices,
    ) -> LdbbsResult<bool>;
}

/// Issuer side BBS+ operations over full message lists
pub trait SigningPrimitive: Send + Sync {
    /// Sign every message
    fn sign(&self, secret_key: &[u8], messages: &[String]) -> LdbbsResult<Vec<u8>>;

    /// Verify a signature over every message
    fn verify(&self, signature: &[u8], public_key: &[u8], messages: &[String]) -> LdbbsResult<bool>;
}

/// BBS+ over BLS12-381 with G2 public keys
#[derive(Clone, Copy, Debug, Default)]
pub struct BbsPrimitive;

impl BbsPrimitive {
    fn public_key(bytes: &[u8]) -> LdbbsResult<PublicKey> {
        PublicKey::from_bytes(bytes)
            .ok_or_else(|| Error::PrimitiveFailure("malformed public key".to_string()))
    }

    fn signature(bytes: &[u8]) -> LdbbsResult<Signature> {
        Signature::from_bytes(bytes)
            .ok_or_else(|| Error::PrimitiveFailure("malformed signature".to_string()))
    }
}

impl SignaturePrimitive for BbsPrimitive {
    fn create_proof(
        &self,
        signature: &[u8],
        public_key: &[u8],
        messages: &[String],
        nonce: &[u8],
        revealed: &RevealIndices,
    ) -> LdbbsResult<Vec<u8>> {
        let signature = Self::signature(signature)?;
        let pk = Self::public_key(public_key)?;
        let msgs = messages.iter().map(hash_message).collect::<Vec<_>>();

        let revealed_set = revealed.as_slice().iter().copied().collect::<BTreeSet<_>>();
        if revealed_set.len() != revealed.len() {
            return Err(Error::PrimitiveFailure(
                "revealed indices contain duplicates".to_string(),
            ));
        }
        let proof = BbsScheme::create_proof(&signature, &pk, &msgs, &revealed_set, nonce, OsRng)?;
        Ok(proof.to_bytes())
    }

    fn verify_proof(
        &self,
        proof: &[u8],
        public_key: &[u8],
        message_count: usize,
        messages: &[String],
        nonce: &[u8],
        revealed: &RevealIndices,
    ) -> LdbbsResult<bool> {
        let proof = PokSignatureProof::from_bytes(proof)
            .ok_or_else(|| Error::PrimitiveFailure("malformed proof".to_string()))?;
        let pk = Self::public_key(public_key)?;
        if messages.len() != revealed.len() {
            return Err(Error::PrimitiveFailure(format!(
                "{} messages supplied for {} revealed indices",
                messages.len(),
                revealed.len()
            )));
        }
        let disclosed = revealed
            .as_slice()
            .iter()
            .zip(messages)
            .map(|(i, m)| (*i, hash_message(m)))
            .collect::<Vec<_>>();
        match BbsScheme::verify_proof(&proof, &pk, message_count, &disclosed, nonce) {
            Ok(()) => Ok(true),
            Err(err) => {
                debug!("proof rejected: {}", err);
                Ok(false)
            }
        }
    }
}

impl SigningPrimitive for BbsPrimitive {
    fn sign(&self, secret_key: &[u8], messages: &[String]) -> LdbbsResult<Vec<u8>> {
        let sk = SecretKey::from_bytes(secret_key).ok_or(Error::InvalidKey("malformed secret key"))?;
        let msgs = messages.iter().map(hash_message).collect::<Vec<_>>();
        let signature = BbsScheme::sign(&sk, &msgs)?;
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, signature: &[u8], public_key: &[u8], messages: &[String]) -> LdbbsResult<bool> {
        let signature = Self::signature(signature)?;
        let pk = Self::public_key(public_key)?;
        let msgs = messages.iter().map(hash_message).collect::<Vec<_>>();
        Ok(BbsScheme::verify(&signature, &pk, &msgs).is_ok())
    }
}
