use crate::error::Error;
use crate::processor::DocumentLoader;
use crate::LdbbsResult;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved key material referenced by a proof
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// The method identifier
    pub id: String,
    /// The key type, e.g. `Bls12381G2Key2020`
    #[serde(rename = "type")]
    pub key_type: String,
    /// The entity controlling the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// The hex encoded public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    /// Present once the key has been revoked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked: Option<Value>,
}

impl VerificationMethod {
    /// Decode the public key bytes
    pub fn public_key_bytes(&self) -> LdbbsResult<Vec<u8>> {
        let encoded = self
            .public_key_hex
            .as_deref()
            .ok_or(Error::InvalidKey("verification method has no publicKeyHex"))?;
        Ok(hex::decode(encoded)?)
    }
}

/// Extract the verification method identifier from a proof.
///
/// The reference is either a plain identifier or an embedded object's `id`.
pub fn method_reference(proof: &Value) -> LdbbsResult<String> {
    match proof.get("verificationMethod") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Object(method)) => method
            .get("id")
            .or_else(|| method.get("@id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(Error::MissingReference),
        _ => Err(Error::MissingReference),
    }
}

/// Resolves and validates the verification method referenced by a proof
#[derive(Copy, Clone)]
pub struct VerificationMethodResolver<'a> {
    loader: &'a dyn DocumentLoader,
}

impl<'a> VerificationMethodResolver<'a> {
    /// Create a resolver over the given loader
    pub fn new(loader: &'a dyn DocumentLoader) -> Self {
        Self { loader }
    }

    /// Resolve the method referenced by `proof`, rejecting revoked keys
    pub fn resolve(&self, proof: &Value) -> LdbbsResult<VerificationMethod> {
        let id = method_reference(proof)?;
        let document = self
            .loader
            .load(&id)?
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        // the loaded document may be the method itself or a controller
        // document embedding it
        let node = find_node(&document, &id).ok_or_else(|| Error::NotFound(id.clone()))?;
        if node.get("revoked").map_or(false, |r| !r.is_null()) {
            debug!("verification method '{}' is revoked", id);
            return Err(Error::Revoked(id));
        }
        serde_json::from_value(node.clone()).map_err(|e| {
            Error::InvalidDocument(format!("verification method '{}': {}", id, e))
        })
    }
}

/// Find the node object with the given identifier anywhere in `document`
pub(crate) fn find_node<'v>(document: &'v Value, id: &str) -> Option<&'v Value> {
    match document {
        Value::Object(map) => {
            let node_id = map.get("id").or_else(|| map.get("@id"));
            if node_id.and_then(Value::as_str) == Some(id) && map.len() > 1 {
                return Some(document);
            }
            map.values().find_map(|v| find_node(v, id))
        }
        Value::Array(items) => items.iter().find_map(|v| find_node(v, id)),
        _ => None,
    }
}
