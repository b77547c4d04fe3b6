use super::PublicKey;
use crate::knox::Knox;
use blsful::inner_types::{Field, Scalar};
use rand_chacha::ChaChaRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use sha3::Shake128;
use zeroize::Zeroize;

/// The secret key for BBS signatures
///
/// See <https://eprint.iacr.org/2023/275.pdf>
#[derive(Clone, Debug, Default, Eq, PartialEq, Zeroize)]
pub struct SecretKey(pub(crate) Scalar);

impl SecretKey {
    /// The size in bytes of the secret key
    pub const BYTES: usize = 32;

    /// Compute a secret key from a hash
    pub fn hash<B: AsRef<[u8]>>(data: B) -> Self {
        const SALT: &[u8] = b"BBS-SIG-KEYGEN-SALT-";
        let data = data.as_ref();
        let mut input = Vec::with_capacity(SALT.len() + data.len());
        input.extend_from_slice(SALT);
        input.extend_from_slice(data);

        let mut okm = [0u8; 32];
        Knox::xof_digest::<Shake128>(&input, &mut okm);
        let rng = ChaChaRng::from_seed(okm);
        okm.zeroize();
        input.zeroize();
        Self(Scalar::random(rng))
    }

    /// Compute a secret key from a CS-PRNG
    pub fn random(rng: impl RngCore + CryptoRng) -> Self {
        Self(Scalar::random(rng))
    }

    /// The public key for this secret key
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from(self)
    }

    /// Convert the secret key to bytes
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_be_bytes()
    }

    /// Convert a byte sequence into the secret key
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Option<Self> {
        let bytes = <[u8; Self::BYTES]>::try_from(bytes.as_ref()).ok()?;
        Option::<Scalar>::from(Scalar::from_be_bytes(&bytes)).map(Self)
    }

    /// Check if the secret key is invalid
    pub fn is_invalid(&self) -> bool {
        self.0.is_zero().into()
    }
}
