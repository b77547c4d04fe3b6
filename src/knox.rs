/// BBS signatures and proofs of knowledge
pub mod bbs;
/// Operations for short group signatures
pub mod short_group_sig_core;

use sha3::digest::{ExtendableOutput, Update, XofReader};

/// General purpose crypto operations
pub struct Knox {}

impl Knox {
    /// Compute a variable length hash
    pub fn xof_digest<X: Default + ExtendableOutput + Update>(input: &[u8], output: &mut [u8]) {
        let mut r = X::default().chain(input).finalize_xof();
        r.read(output);
    }
}
