use super::{MessageGenerators, PublicKey, SecretKey};
use crate::error::Error;
use crate::LdbbsResult;
use blsful::inner_types::{
    multi_miller_loop, Curve, Field, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective,
    Group, MillerLoopResult, Scalar,
};
use elliptic_curve::{group::prime::PrimeCurveAffine, hash2curve::ExpandMsgXmd};
use sha2::Sha256;
use subtle::Choice;

const DST: &[u8] = b"H2S_";

/// A BBS signature
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    pub(crate) a: G1Projective,
    pub(crate) e: Scalar,
}

impl Signature {
    /// The size in bytes of the signature
    pub const BYTES: usize = 80;

    /// Generate a new signature where all messages are known to the signer
    pub fn new(sk: &SecretKey, generators: &MessageGenerators, msgs: &[Scalar]) -> LdbbsResult<Self> {
        if sk.is_invalid() {
            return Err(Error::InvalidKey("invalid secret key"));
        }
        if msgs.is_empty() || msgs.len() != generators.len() {
            return Err(Error::General("message count does not match generators"));
        }

        let pub_key = PublicKey::from(sk);
        let domain = domain_calculation(&pub_key, generators);
        let e = compute_e(sk, msgs, domain);

        // only fails if sk + e is zero
        let ske = Option::<Scalar>::from((sk.0 + e).invert())
            .ok_or(Error::General("Invalid signature"))?;

        let b = compute_b(generators, msgs);
        Ok(Self { a: b * ske, e })
    }

    /// Verify a signature
    pub fn verify(&self, pk: &PublicKey, generators: &MessageGenerators, msgs: &[Scalar]) -> Choice {
        if (pk.is_invalid() | self.is_invalid()).into() {
            return Choice::from(0);
        }
        if msgs.is_empty() || msgs.len() != generators.len() {
            return Choice::from(0);
        }

        let b = compute_b(generators, msgs);
        let lhs_pk = G2Projective::GENERATOR * self.e + pk.0;

        multi_miller_loop(&[
            (&self.a.to_affine(), &G2Prepared::from(lhs_pk.to_affine())),
            (&b.to_affine(), &G2Prepared::from(-G2Affine::generator())),
        ])
        .final_exponentiation()
        .is_identity()
    }

    /// Check if the signature is invalid
    pub fn is_invalid(&self) -> Choice {
        self.a.is_identity() | self.e.is_zero()
    }

    /// Convert the signature to bytes, `A || e`
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut out = [0u8; Self::BYTES];
        out[..48].copy_from_slice(&self.a.to_affine().to_compressed());
        out[48..].copy_from_slice(&self.e.to_be_bytes());
        out
    }

    /// Convert bytes to a signature
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Option<Self> {
        let bytes = bytes.as_ref();
        if bytes.len() != Self::BYTES {
            return None;
        }
        let a_bytes = <[u8; 48]>::try_from(&bytes[..48]).ok()?;
        let e_bytes = <[u8; 32]>::try_from(&bytes[48..]).ok()?;
        let a = Option::<G1Affine>::from(G1Affine::from_compressed(&a_bytes))?;
        let e = Option::<Scalar>::from(Scalar::from_be_bytes(&e_bytes))?;
        let sig = Self {
            a: G1Projective::from(a),
            e,
        };
        if sig.is_invalid().into() {
            return None;
        }
        Some(sig)
    }
}

/// `B = P1 + sum(H_i * m_i)`
pub(crate) fn compute_b(generators: &MessageGenerators, msgs: &[Scalar]) -> G1Projective {
    G1Projective::GENERATOR + G1Projective::sum_of_products(&generators.0, msgs)
}

pub(crate) fn compute_e(sk: &SecretKey, msgs: &[Scalar], domain: Scalar) -> Scalar {
    let mut bytes = Vec::with_capacity(32 * msgs.len() + 64);
    bytes.extend_from_slice(&sk.to_bytes());
    for msg in msgs {
        bytes.extend_from_slice(&msg.to_be_bytes());
    }
    bytes.extend_from_slice(&domain.to_be_bytes());
    Scalar::hash::<ExpandMsgXmd<Sha256>>(&bytes, DST)
}

pub(crate) fn domain_calculation(pk: &PublicKey, generators: &MessageGenerators) -> Scalar {
    let mut bytes = Vec::with_capacity(8 + 96 + 48 * (generators.len() + 1));
    bytes.extend_from_slice(&pk.to_bytes());
    bytes.extend_from_slice(&(generators.len() as u64).to_be_bytes());
    bytes.extend_from_slice(&G1Projective::GENERATOR.to_affine().to_compressed());
    for gen in &generators.0 {
        bytes.extend_from_slice(&gen.to_affine().to_compressed());
    }
    Scalar::hash::<ExpandMsgXmd<Sha256>>(&bytes, DST)
}
