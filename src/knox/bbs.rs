mod msg_gens;
mod pok_signature;
mod pok_signature_proof;
mod public_key;
mod scheme;
mod secret_key;
mod signature;

pub use msg_gens::*;
pub use pok_signature::*;
pub use pok_signature_proof::*;
pub use public_key::*;
pub use scheme::*;
pub use secret_key::*;
pub use signature::*;
