use crate::error::Error;
use crate::processor::DocumentLoader;
use crate::verification_method::VerificationMethod;
use crate::LdbbsResult;
use serde_json::Value;

/// The default proof purpose term
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// What a purpose policy may look at besides the proof itself
#[derive(Copy, Clone)]
pub struct PurposeContext<'a> {
    /// The document the proof is attached to
    pub document: &'a Value,
    /// The resolved verification method
    pub verification_method: &'a VerificationMethod,
    /// Document resolution for controller lookups
    pub loader: &'a dyn DocumentLoader,
}

/// A pluggable policy asserting why, and by whom, a proof was created.
///
/// Validated independently of the cryptographic check; a failure here
/// fails verification even when the proof itself is valid.
pub trait ProofPurpose: Send + Sync {
    /// `Ok(())` if the proof satisfies the policy, otherwise
    /// [`Error::PurposeFailure`] with the reason
    fn validate(&self, proof: &Value, context: &PurposeContext<'_>) -> LdbbsResult<()>;
}

/// Checks the proof purpose term and that the key's controller authorizes
/// the verification method for that purpose.
#[derive(Clone, Debug)]
pub struct ControllerProofPurpose {
    term: String,
    controller: Option<Value>,
}

impl Default for ControllerProofPurpose {
    fn default() -> Self {
        Self::assertion_method()
    }
}

impl ControllerProofPurpose {
    /// A purpose for the given term, e.g. `authentication`
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            controller: None,
        }
    }

    /// The `assertionMethod` purpose used for issued credentials
    pub fn assertion_method() -> Self {
        Self::new(ASSERTION_METHOD)
    }

    /// Use this controller document instead of loading it
    pub fn with_controller(mut self, controller: Value) -> Self {
        self.controller = Some(controller);
        self
    }

    /// The purpose term
    pub fn term(&self) -> &str {
        &self.term
    }

    fn authorizes(&self, controller: &Value, method_id: &str) -> bool {
        let entries = match controller.get(&self.term) {
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(entry) => std::slice::from_ref(entry),
            None => return false,
        };
        entries.iter().any(|entry| match entry {
            Value::String(id) => id == method_id,
            Value::Object(method) => {
                method.get("id").and_then(Value::as_str) == Some(method_id)
            }
            _ => false,
        })
    }
}

impl ProofPurpose for ControllerProofPurpose {
    fn validate(&self, proof: &Value, context: &PurposeContext<'_>) -> LdbbsResult<()> {
        let term = proof.get("proofPurpose").and_then(Value::as_str);
        if term != Some(self.term.as_str()) {
            return Err(Error::PurposeFailure(format!(
                "expected proof purpose '{}', found {:?}",
                self.term, term
            )));
        }

        let method = context.verification_method;
        let loaded;
        let controller = match &self.controller {
            Some(controller) => controller,
            None => {
                let controller_id = method.controller.as_deref().ok_or_else(|| {
                    Error::PurposeFailure(format!(
                        "verification method '{}' has no controller",
                        method.id
                    ))
                })?;
                loaded = context.loader.load(controller_id)?.ok_or_else(|| {
                    Error::PurposeFailure(format!(
                        "controller '{}' could not be loaded",
                        controller_id
                    ))
                })?;
                &loaded
            }
        };

        if self.authorizes(controller, &method.id) {
            Ok(())
        } else {
            Err(Error::PurposeFailure(format!(
                "verification method '{}' not authorized by its controller for '{}'",
                method.id, self.term
            )))
        }
    }
}
