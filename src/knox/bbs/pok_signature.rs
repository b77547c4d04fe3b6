use super::pok_signature_proof::compute_challenge;
use super::signature::compute_b;
use super::{MessageGenerators, PokSignatureProof, PublicKey, Signature};
use crate::error::Error;
use crate::knox::short_group_sig_core::{ProofCommittedBuilder, ProofMessage};
use crate::LdbbsResult;
use blsful::inner_types::{Field, G1Projective, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Proof of Knowledge of a Signature that is used by the prover
/// to construct `PokSignatureProof`.
///
/// With `A' = A * r` and `B' = B * r - A' * e` the prover shows knowledge of
/// the hidden messages, `r` and `e` in
/// `B' = C * r + sum(H_j * m_j * r) - A' * e`
/// where `C = P1 + sum(H_i * m_i)` over the revealed messages.
pub struct PokSignature {
    proof: ProofCommittedBuilder,
    a_bar: G1Projective,
    b_bar: G1Projective,
    secrets: Vec<Scalar>,
    revealed: Vec<(usize, Scalar)>,
}

impl PokSignature {
    /// Commit to the hidden messages and the randomized signature
    pub fn commit(
        signature: &Signature,
        generators: &MessageGenerators,
        messages: &[ProofMessage],
        mut rng: impl RngCore + CryptoRng,
    ) -> LdbbsResult<Self> {
        if messages.len() != generators.len() {
            return Err(Error::PrimitiveFailure(format!(
                "expected {} messages, got {}",
                generators.len(),
                messages.len()
            )));
        }
        let msgs = messages.iter().map(|m| m.get_message()).collect::<Vec<_>>();

        let signature_randomizer = Scalar::random(&mut rng);
        let b = compute_b(generators, &msgs);
        let a_bar = signature.a * signature_randomizer;
        let b_bar = b * signature_randomizer - a_bar * signature.e;

        let mut proof = ProofCommittedBuilder::new();
        let mut secrets = Vec::with_capacity(msgs.len() + 2);
        let mut revealed = Vec::with_capacity(msgs.len());

        for (i, m) in messages.iter().enumerate() {
            match m {
                ProofMessage::Hidden(msg) => {
                    proof.commit_random(generators.0[i], &mut rng);
                    secrets.push(*msg * signature_randomizer);
                }
                ProofMessage::Revealed(msg) => revealed.push((i, *msg)),
            }
        }
        proof.commit_random(revealed_commitment(generators, &revealed), &mut rng);
        secrets.push(signature_randomizer);
        proof.commit_random(a_bar, &mut rng);
        secrets.push(-signature.e);

        Ok(Self {
            proof,
            a_bar,
            b_bar,
            secrets,
            revealed,
        })
    }

    /// The revealed messages with their indices
    pub fn revealed_messages(&self) -> &[(usize, Scalar)] {
        &self.revealed
    }

    /// Finish the proof, binding it to the public key and nonce
    pub fn generate_proof(
        mut self,
        public_key: &PublicKey,
        nonce: &[u8],
    ) -> LdbbsResult<PokSignatureProof> {
        let challenge = compute_challenge(
            public_key,
            self.secrets.len() + self.revealed.len() - 2,
            &self.revealed,
            &self.a_bar,
            &self.b_bar,
            &self.proof.commitment(),
            nonce,
        );
        let proof = self.proof.generate_proof(challenge, &self.secrets);
        self.secrets.zeroize();
        Ok(PokSignatureProof {
            a_bar: self.a_bar,
            b_bar: self.b_bar,
            challenge,
            proof: proof?,
        })
    }
}

/// `C = P1 + sum(H_i * m_i)` over the revealed messages
pub(crate) fn revealed_commitment(
    generators: &MessageGenerators,
    revealed: &[(usize, Scalar)],
) -> G1Projective {
    let points = revealed
        .iter()
        .map(|(i, _)| generators.0[*i])
        .collect::<Vec<_>>();
    let msgs = revealed.iter().map(|(_, m)| *m).collect::<Vec<_>>();
    if points.is_empty() {
        G1Projective::GENERATOR
    } else {
        G1Projective::GENERATOR + G1Projective::sum_of_products(&points, &msgs)
    }
}
