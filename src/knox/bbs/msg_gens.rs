use blsful::inner_types::{G1Projective, Scalar};
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, Expander};
use sha2::Sha256;
use std::num::NonZeroUsize;

const API_ID: &[u8] = b"BBS_BLS12381G1_XMD:SHA-256_SSWU_RO_H2G_HM2S_";
const MAP_MSG_DST: &[u8] = b"MAP_MSG_TO_SCALAR_AS_HASH_";

/// Map an arbitrary byte message, such as a canonical statement, to a scalar
pub fn hash_message<B: AsRef<[u8]>>(message: B) -> Scalar {
    let dst = [API_ID, MAP_MSG_DST].concat();
    Scalar::hash::<ExpandMsgXmd<Sha256>>(message.as_ref(), &dst)
}

/// The message generators used for signing and proofs
///
/// Generators are derived deterministically from the message count, so the
/// signer, prover and verifier agree on them given `totalStatements`.
#[derive(Debug, Clone)]
pub struct MessageGenerators(pub(crate) Vec<G1Projective>);

impl MessageGenerators {
    /// Create a new set of message generators
    pub fn new(count: NonZeroUsize) -> Self {
        const SEED_DST: &[u8] = b"SIG_GENERATOR_SEED_";
        const GENERATOR_DST: &[u8] = b"SIG_GENERATOR_DST_";
        const GENERATOR_SEED: &[u8] = b"MESSAGE_GENERATOR_SEED";

        let seed_dst = [API_ID, SEED_DST].concat();
        let generator_seed = [API_ID, GENERATOR_SEED].concat();
        let generator_dst = [API_ID, GENERATOR_DST].concat();

        let count = count.get();
        let mut generators = Vec::with_capacity(count);

        let binding = [seed_dst.as_slice()];
        let mut v = [0u8; 40];
        let mut v_expander =
            ExpandMsgXmd::<Sha256>::expand_message(&[&generator_seed], &binding, 32)
                .expect("Failed to expand message");
        v_expander.fill_bytes(&mut v[..32]);

        let mut inner_v = [0u8; 32];
        for i in 0..count {
            v[32..].copy_from_slice(&(i as u64).to_be_bytes());
            let mut inner_v_expander = ExpandMsgXmd::<Sha256>::expand_message(&[&v], &binding, 32)
                .expect("Failed to expand message");
            inner_v_expander.fill_bytes(&mut inner_v);
            let g_i = G1Projective::hash::<ExpandMsgXmd<Sha256>>(&inner_v, &generator_dst);
            generators.push(g_i);
        }

        Self(generators)
    }

    /// The number of generators
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no generators
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
