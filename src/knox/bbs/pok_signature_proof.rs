use super::pok_signature::revealed_commitment;
use super::{MessageGenerators, PublicKey};
use crate::error::Error;
use crate::LdbbsResult;
use blsful::inner_types::{
    multi_miller_loop, Curve, G1Affine, G1Projective, G2Affine, G2Prepared, Group,
    MillerLoopResult, Scalar,
};
use elliptic_curve::group::prime::PrimeCurveAffine;
use merlin::Transcript;
use std::collections::BTreeSet;

/// The actual proof that is sent from prover to verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokSignatureProof {
    pub(crate) a_bar: G1Projective,
    pub(crate) b_bar: G1Projective,
    pub(crate) challenge: Scalar,
    pub(crate) proof: Vec<Scalar>,
}

impl PokSignatureProof {
    /// Verify the proof against the revealed messages.
    ///
    /// `revealed_messages` must be sorted by index.
    pub fn verify(
        &self,
        public_key: &PublicKey,
        generators: &MessageGenerators,
        revealed_messages: &[(usize, Scalar)],
        nonce: &[u8],
    ) -> LdbbsResult<()> {
        if (self.a_bar.is_identity() | self.b_bar.is_identity()).into() {
            return Err(Error::PrimitiveFailure("invalid proof - identity".to_string()));
        }
        if public_key.is_invalid().into() {
            return Err(Error::InvalidKey("invalid public key"));
        }
        let mut known = BTreeSet::new();
        for (idx, _) in revealed_messages {
            if *idx >= generators.len() || !known.insert(*idx) {
                return Err(Error::PrimitiveFailure(format!(
                    "invalid revealed message index {}",
                    idx
                )));
            }
        }
        if self.proof.len() != generators.len() - known.len() + 2 {
            return Err(Error::PrimitiveFailure(
                "proof does not match the number of hidden messages".to_string(),
            ));
        }

        let mut points = Vec::with_capacity(self.proof.len());
        for (idx, h) in generators.0.iter().enumerate() {
            if !known.contains(&idx) {
                points.push(*h);
            }
        }
        points.push(revealed_commitment(generators, revealed_messages));
        points.push(self.a_bar);
        let commitment =
            G1Projective::sum_of_products(&points, &self.proof) - self.b_bar * self.challenge;

        let challenge = compute_challenge(
            public_key,
            generators.len(),
            revealed_messages,
            &self.a_bar,
            &self.b_bar,
            &commitment,
            nonce,
        );
        if challenge != self.challenge {
            return Err(Error::PrimitiveFailure(
                "invalid proof - invalid messages".to_string(),
            ));
        }

        let res = multi_miller_loop(&[
            (
                &self.a_bar.to_affine(),
                &G2Prepared::from(public_key.0.to_affine()),
            ),
            (
                &self.b_bar.to_affine(),
                &G2Prepared::from(-G2Affine::generator()),
            ),
        ])
        .final_exponentiation()
        .is_identity()
        .unwrap_u8()
            == 1;

        if res {
            Ok(())
        } else {
            Err(Error::PrimitiveFailure(
                "invalid proof - signature proof".to_string(),
            ))
        }
    }

    /// Store the proof as a sequence of bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(48 * 2 + 32 * (self.proof.len() + 1));

        buffer.extend_from_slice(&self.a_bar.to_affine().to_compressed());
        buffer.extend_from_slice(&self.b_bar.to_affine().to_compressed());
        buffer.extend_from_slice(&self.challenge.to_be_bytes());
        for scalar in &self.proof {
            buffer.extend_from_slice(&scalar.to_be_bytes());
        }
        buffer
    }

    /// Convert a byte sequence into a Signature Proof of Knowledge
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Option<Self> {
        // a_bar, b_bar, challenge and at least the randomizer and e responses
        const MIN_SIZE: usize = 48 * 2 + 32 * 3;
        let buffer = bytes.as_ref();
        if buffer.len() < MIN_SIZE || (buffer.len() - 96) % 32 != 0 {
            return None;
        }

        let a_bar = point_from_bytes(&buffer[..48])?;
        let b_bar = point_from_bytes(&buffer[48..96])?;
        let mut scalars = buffer[96..]
            .chunks_exact(32)
            .map(scalar_from_bytes)
            .collect::<Option<Vec<_>>>()?;
        let challenge = scalars.remove(0);

        Some(Self {
            a_bar,
            b_bar,
            challenge,
            proof: scalars,
        })
    }
}

fn point_from_bytes(bytes: &[u8]) -> Option<G1Projective> {
    let bytes = <[u8; 48]>::try_from(bytes).ok()?;
    Option::<G1Affine>::from(G1Affine::from_compressed(&bytes)).map(G1Projective::from)
}

fn scalar_from_bytes(bytes: &[u8]) -> Option<Scalar> {
    let bytes = <[u8; 32]>::try_from(bytes).ok()?;
    Option::<Scalar>::from(Scalar::from_be_bytes(&bytes))
}

/// The fiat-shamir challenge shared by prover and verifier
pub(crate) fn compute_challenge(
    public_key: &PublicKey,
    message_count: usize,
    revealed_messages: &[(usize, Scalar)],
    a_bar: &G1Projective,
    b_bar: &G1Projective,
    commitment: &G1Projective,
    nonce: &[u8],
) -> Scalar {
    let mut transcript = Transcript::new(b"ldbbs signature proof of knowledge");
    transcript.append_message(b"public key", &public_key.to_bytes());
    transcript.append_u64(b"message count", message_count as u64);
    for (idx, msg) in revealed_messages {
        transcript.append_u64(b"revealed index", *idx as u64);
        transcript.append_message(b"revealed message", &msg.to_be_bytes());
    }
    transcript.append_message(b"a_bar", &a_bar.to_affine().to_compressed());
    transcript.append_message(b"b_bar", &b_bar.to_affine().to_compressed());
    transcript.append_message(b"commitment", &commitment.to_affine().to_compressed());
    transcript.append_message(b"nonce", nonce);

    let mut okm = [0u8; 64];
    transcript.challenge_bytes(b"challenge bytes", &mut okm);
    Scalar::from_bytes_wide(&okm)
}
