mod blank_node;
mod index;

pub use blank_node::*;
pub use index::*;

use serde::{Deserialize, Serialize};

/// An ordered list of canonical statements, one N-Quad per entry.
///
/// Order is significant: it is the order produced by the canonicalization
/// algorithm and is what the signer, holder and verifier index into.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct StatementList(pub(crate) Vec<String>);

impl StatementList {
    /// Split canonical output into statements, dropping empty lines
    pub fn from_canonical(canonical: &str) -> Self {
        Self(
            canonical
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(|line| line.to_string())
                .collect(),
        )
    }

    /// The number of statements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no statements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the statements in order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Join the statements back into newline separated canonical form
    pub fn to_canonical(&self) -> String {
        let mut out = String::with_capacity(self.0.iter().map(|s| s.len() + 1).sum());
        for statement in &self.0 {
            out.push_str(statement);
            out.push('\n');
        }
        out
    }

    /// Unwrap into the inner statements
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl AsRef<[String]> for StatementList {
    fn as_ref(&self) -> &[String] {
        self.0.as_ref()
    }
}

impl From<Vec<String>> for StatementList {
    fn from(statements: Vec<String>) -> Self {
        Self(statements)
    }
}

impl FromIterator<String> for StatementList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The messages a signature covers: proof statements followed by document
/// statements. This ordering is the indexing contract shared by signer,
/// holder and verifier.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MessageSet {
    /// Statements from the proof metadata, always revealed
    pub proof: StatementList,
    /// Statements from the document body, selectively revealed
    pub document: StatementList,
}

impl MessageSet {
    /// Create a new message set
    pub fn new(proof: StatementList, document: StatementList) -> Self {
        Self { proof, document }
    }

    /// The total number of messages
    pub fn total(&self) -> usize {
        self.proof.len() + self.document.len()
    }

    /// `proof ++ document`
    pub fn combined(&self) -> Vec<String> {
        self.proof
            .iter()
            .chain(self.document.iter())
            .cloned()
            .collect()
    }
}
