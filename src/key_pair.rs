use crate::error::Error;
use crate::knox::bbs::{BbsScheme, PublicKey, SecretKey};
use crate::verification_method::VerificationMethod;
use crate::LdbbsResult;
use rand_core::{CryptoRng, RngCore};
use serde_json::{json, Value};

/// The verification method type for BLS12-381 G2 keys
pub const BLS12381_G2_KEY_2020: &str = "Bls12381G2Key2020";

/// A BLS12-381 key pair with a G2 public key, addressable as a verification
/// method
#[derive(Clone, Debug)]
pub struct Bls12381G2KeyPair {
    /// The verification method identifier
    pub id: String,
    /// The controller of the key
    pub controller: String,
    public_key: PublicKey,
    secret_key: Option<SecretKey>,
}

impl Bls12381G2KeyPair {
    /// Generate a new key pair
    pub fn generate(id: &str, controller: &str, rng: impl RngCore + CryptoRng) -> Self {
        let (public_key, secret_key) = BbsScheme::new_keys(rng);
        Self {
            id: id.to_string(),
            controller: controller.to_string(),
            public_key,
            secret_key: Some(secret_key),
        }
    }

    /// Deterministically derive a key pair from a seed
    pub fn from_seed<B: AsRef<[u8]>>(id: &str, controller: &str, seed: B) -> Self {
        let secret_key = SecretKey::hash(seed);
        Self {
            id: id.to_string(),
            controller: controller.to_string(),
            public_key: secret_key.public_key(),
            secret_key: Some(secret_key),
        }
    }

    /// A verify-only key pair from a resolved verification method
    pub fn from_verification_method(method: &VerificationMethod) -> LdbbsResult<Self> {
        if method.key_type != BLS12381_G2_KEY_2020 {
            return Err(Error::InvalidKey("unsupported verification method type"));
        }
        let bytes = method.public_key_bytes()?;
        let public_key = PublicKey::try_from(bytes.as_slice())?;
        Ok(Self {
            id: method.id.clone(),
            controller: method.controller.clone().unwrap_or_default(),
            public_key,
            secret_key: None,
        })
    }

    /// The compressed public key
    pub fn public_key_bytes(&self) -> [u8; PublicKey::BYTES] {
        self.public_key.to_bytes()
    }

    /// The secret key bytes, if this pair can sign
    pub fn secret_key_bytes(&self) -> Option<[u8; SecretKey::BYTES]> {
        self.secret_key.as_ref().map(SecretKey::to_bytes)
    }

    /// The verification method document for this key
    pub fn to_verification_method(&self) -> Value {
        json!({
            "id": self.id,
            "type": BLS12381_G2_KEY_2020,
            "controller": self.controller,
            "publicKeyHex": hex::encode(self.public_key_bytes()),
        })
    }
}
