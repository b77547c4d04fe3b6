use super::SecretKey;
use crate::error::Error;
use blsful::inner_types::{G2Projective, Group};
use subtle::Choice;

/// BBS public key
///
/// See <https://eprint.iacr.org/2023/275.pdf>
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PublicKey(pub(crate) G2Projective);

impl From<&SecretKey> for PublicKey {
    fn from(sk: &SecretKey) -> Self {
        Self(G2Projective::GENERATOR * sk.0)
    }
}

impl From<PublicKey> for Vec<u8> {
    fn from(pk: PublicKey) -> Self {
        pk.to_bytes().to_vec()
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes).ok_or(Error::InvalidKey("invalid public key"))
    }
}

impl TryFrom<&Vec<u8>> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl PublicKey {
    /// The size in bytes of a compressed public key
    pub const BYTES: usize = 96;

    /// Check if this public key is invalid
    pub fn is_invalid(&self) -> Choice {
        self.0.is_identity()
    }

    /// Get the bytes of this public key
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_compressed()
    }

    /// Convert a byte sequence into the public key
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Option<Self> {
        let bytes = <[u8; Self::BYTES]>::try_from(bytes.as_ref()).ok()?;
        let pk = Option::<G2Projective>::from(G2Projective::from_compressed(&bytes)).map(Self)?;
        if pk.is_invalid().into() {
            return None;
        }
        Some(pk)
    }
}
