//! Selective disclosure proofs for linked data documents signed with BBS+.
//!
//! A holder takes an issuer signed document, chooses what to reveal with a
//! frame, and derives a zero knowledge proof that the revealed statements
//! were signed. A verifier checks the derived proof against the revealed
//! document only.
#![warn(missing_docs)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Suite and call options
pub mod config;
/// Key pairs usable as verification methods
pub mod key_pair;
/// The BBS+ signature scheme
pub mod knox;
/// Signature primitive adapters
pub mod primitive;
/// External graph processing and document loading
pub mod processor;
/// Derived proofs: derive and verify
pub mod proof;
/// Proof purpose policies
pub mod purpose;
/// Canonical statements, reveal indices and blank node handling
pub mod statement;
/// Base signature suites
pub mod suite;
/// Verification method resolution
pub mod verification_method;

mod error;

pub use error::Error;

/// Result type for this crate
pub type LdbbsResult<T> = Result<T, Error>;

/// Common imports
pub mod prelude {
    pub use super::config::*;
    pub use super::key_pair::*;
    pub use super::primitive::*;
    pub use super::processor::*;
    pub use super::proof::*;
    pub use super::purpose::*;
    pub use super::statement::*;
    pub use super::suite::*;
    pub use super::verification_method::*;
    pub use super::{Error, LdbbsResult};
}
