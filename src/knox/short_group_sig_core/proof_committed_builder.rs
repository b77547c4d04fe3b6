use crate::error::Error;
use crate::LdbbsResult;
use blsful::inner_types::{Field, G1Projective, Scalar};
use rand_core::RngCore;

/// A builder struct for creating a proof of knowledge
/// of messages in a vector commitment
/// each message has a blinding factor
#[derive(Debug, Default)]
pub struct ProofCommittedBuilder {
    points: Vec<G1Projective>,
    scalars: Vec<Scalar>,
}

impl ProofCommittedBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a specified point and generate a random blinding factor
    pub fn commit_random(&mut self, point: G1Projective, rng: impl RngCore) {
        self.points.push(point);
        self.scalars.push(Scalar::random(rng));
    }

    /// Commit a specified point with the specified scalar
    pub fn commit(&mut self, point: G1Projective, scalar: Scalar) {
        self.points.push(point);
        self.scalars.push(scalar);
    }

    /// The commitment to all blinding factors, used for the fiat-shamir challenge
    pub fn commitment(&self) -> G1Projective {
        G1Projective::sum_of_products(&self.points, &self.scalars)
    }

    /// Generate the Schnorr responses given the specified secrets
    /// by computing p = r + c * s
    pub fn generate_proof(&self, challenge: Scalar, secrets: &[Scalar]) -> LdbbsResult<Vec<Scalar>> {
        if secrets.len() != self.scalars.len() {
            return Err(Error::General("secret count does not match commitments"));
        }
        Ok(self
            .scalars
            .iter()
            .zip(secrets)
            .map(|(r, s)| *r + *s * challenge)
            .collect())
    }
}
