use blsful::inner_types::Scalar;

/// A message classification by the prover
#[derive(Copy, Clone, Debug)]
pub enum ProofMessage {
    /// Message will be revealed to a verifier
    Revealed(Scalar),
    /// Message will be hidden from a verifier, blinded specifically for this proof
    Hidden(Scalar),
}

impl ProofMessage {
    /// Extract the internal message
    pub fn get_message(&self) -> Scalar {
        match *self {
            ProofMessage::Revealed(r) => r,
            ProofMessage::Hidden(h) => h,
        }
    }

    /// True if the message is disclosed
    pub fn is_revealed(&self) -> bool {
        matches!(self, ProofMessage::Revealed(_))
    }
}
