use super::{MessageGenerators, PokSignature, PokSignatureProof, PublicKey, SecretKey, Signature};
use crate::error::Error;
use crate::knox::short_group_sig_core::ProofMessage;
use crate::LdbbsResult;
use blsful::inner_types::Scalar;
use log::trace;
use rand_core::{CryptoRng, RngCore};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

/// BBS signatures over a variable number of messages.
///
/// The issuer signs every message; the prover later discloses any subset in
/// a zero-knowledge proof bound to a verifier nonce.
#[derive(Debug, Copy, Clone)]
pub struct BbsScheme;

impl BbsScheme {
    /// Create a new key pair
    pub fn new_keys(rng: impl RngCore + CryptoRng) -> (PublicKey, SecretKey) {
        let sk = SecretKey::random(rng);
        (sk.public_key(), sk)
    }

    /// Sign all messages
    pub fn sign(sk: &SecretKey, msgs: &[Scalar]) -> LdbbsResult<Signature> {
        let generators = Self::generators(msgs.len())?;
        trace!("signing {} messages", msgs.len());
        Signature::new(sk, &generators, msgs)
    }

    /// Verify a signature over all messages
    pub fn verify(signature: &Signature, pk: &PublicKey, msgs: &[Scalar]) -> LdbbsResult<()> {
        let generators = Self::generators(msgs.len())?;
        if signature.verify(pk, &generators, msgs).into() {
            Ok(())
        } else {
            Err(Error::PrimitiveFailure("invalid signature".to_string()))
        }
    }

    /// Create a selective disclosure proof revealing the messages at `revealed`
    pub fn create_proof(
        signature: &Signature,
        pk: &PublicKey,
        msgs: &[Scalar],
        revealed: &BTreeSet<usize>,
        nonce: &[u8],
        rng: impl RngCore + CryptoRng,
    ) -> LdbbsResult<PokSignatureProof> {
        let generators = Self::generators(msgs.len())?;
        if let Some(idx) = revealed.iter().find(|i| **i >= msgs.len()) {
            return Err(Error::PrimitiveFailure(format!(
                "revealed index {} out of range for {} messages",
                idx,
                msgs.len()
            )));
        }
        if signature.verify(pk, &generators, msgs).unwrap_u8() == 0 {
            return Err(Error::PrimitiveFailure(
                "signature does not cover the supplied messages".to_string(),
            ));
        }

        let messages = msgs
            .iter()
            .enumerate()
            .map(|(i, m)| {
                if revealed.contains(&i) {
                    ProofMessage::Revealed(*m)
                } else {
                    ProofMessage::Hidden(*m)
                }
            })
            .collect::<Vec<_>>();
        trace!(
            "creating proof revealing {} of {} messages",
            revealed.len(),
            msgs.len()
        );
        let pok = PokSignature::commit(signature, &generators, &messages, rng)?;
        pok.generate_proof(pk, nonce)
    }

    /// Verify a selective disclosure proof for a signature over
    /// `message_count` messages
    pub fn verify_proof(
        proof: &PokSignatureProof,
        pk: &PublicKey,
        message_count: usize,
        revealed: &[(usize, Scalar)],
        nonce: &[u8],
    ) -> LdbbsResult<()> {
        // one response per hidden message plus the randomizer and e
        let hidden = proof.proof.len().checked_sub(2).ok_or_else(|| {
            Error::PrimitiveFailure("proof has too few responses".to_string())
        })?;
        if hidden.checked_add(revealed.len()) != Some(message_count) {
            return Err(Error::PrimitiveFailure(format!(
                "proof covers {} messages, {} claimed",
                hidden + revealed.len(),
                message_count
            )));
        }
        let generators = Self::generators(message_count)?;
        let mut revealed = revealed.to_vec();
        revealed.sort_by_key(|(i, _)| *i);
        proof.verify(pk, &generators, &revealed, nonce)
    }

    fn generators(count: usize) -> LdbbsResult<MessageGenerators> {
        NonZeroUsize::new(count)
            .map(MessageGenerators::new)
            .ok_or_else(|| Error::PrimitiveFailure("no messages".to_string()))
    }
}
