use super::StatementList;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// The namespace canonical blank node labels are wrapped in
pub const DEFAULT_BLANK_NODE_PREFIX: &str = "urn:bnid:";

/// Matches one RDF term of an N-Quads line: a literal (with optional
/// datatype or language), an IRI, or a blank node label.
const TERM_PATTERN: &str =
    r#""(?:[^"\\]|\\.)*"(?:\^\^<[^>]*>|@[A-Za-z0-9-]+)?|<[^>]*>|_:[A-Za-z0-9_.\-]+"#;

static TERMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TERM_PATTERN).expect("a valid term pattern"));

/// Gives canonical blank node labels a temporary IRI so they survive a
/// statements -> graph -> framed graph -> statements round trip.
///
/// `_:c14n0` becomes `<urn:bnid:_:c14n0>` and back again. The rewrite is a
/// per-line substitution of whole terms: literals are never touched and the
/// number and order of statements is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlankNodeStabilizer {
    prefix: String,
}

impl Default for BlankNodeStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_BLANK_NODE_PREFIX)
    }
}

impl BlankNodeStabilizer {
    /// Create a stabilizer for the given IRI prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// The IRI prefix blank node labels are wrapped in
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Wrap every blank node label in the statement
    pub fn stabilize(&self, statement: &str) -> String {
        TERMS
            .replace_all(statement, |caps: &Captures| {
                let term = &caps[0];
                if term.starts_with("_:") {
                    format!("<{}{}>", self.prefix, term)
                } else {
                    term.to_string()
                }
            })
            .into_owned()
    }

    /// Strip the wrapper added by [`stabilize`](Self::stabilize)
    pub fn unstabilize(&self, statement: &str) -> String {
        TERMS
            .replace_all(statement, |caps: &Captures| {
                let term = &caps[0];
                match self.wrapped_label(term) {
                    Some(label) => label.to_string(),
                    None => term.to_string(),
                }
            })
            .into_owned()
    }

    /// Apply [`stabilize`](Self::stabilize) to every statement
    pub fn stabilize_all(&self, statements: &StatementList) -> StatementList {
        statements.iter().map(|s| self.stabilize(s)).collect()
    }

    /// Apply [`unstabilize`](Self::unstabilize) to every statement
    pub fn unstabilize_all(&self, statements: &StatementList) -> StatementList {
        statements.iter().map(|s| self.unstabilize(s)).collect()
    }

    fn wrapped_label<'a>(&self, term: &'a str) -> Option<&'a str> {
        let label = term
            .strip_prefix('<')?
            .strip_suffix('>')?
            .strip_prefix(self.prefix.as_str())?;
        if label.starts_with("_:") && label.len() > 2 {
            Some(label)
        } else {
            None
        }
    }
}
