use super::StatementList;
use crate::error::Error;
use crate::LdbbsResult;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Positions within the combined message list that are disclosed.
///
/// The first entries always cover every proof statement, followed by the
/// document statements in the order the reveal document produced them.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RevealIndices(pub(crate) Vec<usize>);

impl RevealIndices {
    /// The disclosed positions
    pub fn as_slice(&self) -> &[usize] {
        self.0.as_slice()
    }

    /// The number of disclosed positions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is disclosed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the indices against the combined message list they claim to
    /// index: every proof statement is present, nothing repeats and nothing
    /// is out of range.
    pub fn validate(&self, proof_statement_count: usize, total: usize) -> LdbbsResult<()> {
        if proof_statement_count > total {
            return Err(Error::Reconciliation(format!(
                "{} proof statements exceed {} total statements",
                proof_statement_count, total
            )));
        }
        let mut seen = BTreeSet::new();
        for &idx in &self.0 {
            if idx >= total {
                return Err(Error::Reconciliation(format!(
                    "reveal index {} out of range for {} statements",
                    idx, total
                )));
            }
            if !seen.insert(idx) {
                return Err(Error::Reconciliation(format!(
                    "reveal index {} appears more than once",
                    idx
                )));
            }
        }
        if (0..proof_statement_count).any(|i| !seen.contains(&i)) {
            return Err(Error::Reconciliation(
                "reveal indices do not disclose every proof statement".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<Vec<usize>> for RevealIndices {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl AsRef<[usize]> for RevealIndices {
    fn as_ref(&self) -> &[usize] {
        self.0.as_ref()
    }
}

/// Map the statements of a framed reveal document back onto positions in
/// the combined message list.
///
/// `document` is the full (stabilized) document statement list and
/// `revealed` the canonical statements of the reveal document. Positions are
/// offset by `proof_statement_count` and preceded by every proof index.
/// A revealed statement absent from `document` fails with
/// [`Error::Reconciliation`].
pub fn reveal_indices(
    document: &StatementList,
    revealed: &StatementList,
    proof_statement_count: usize,
) -> LdbbsResult<RevealIndices> {
    // canonical output never repeats a statement, so the first position wins
    let positions = document.iter().collect::<IndexSet<_>>();

    let mut indices = Vec::with_capacity(proof_statement_count + revealed.len());
    indices.extend(0..proof_statement_count);
    for statement in revealed.iter() {
        let position = positions
            .get_index_of(statement)
            .ok_or_else(|| Error::Reconciliation(statement.clone()))?;
        indices.push(proof_statement_count + position);
    }
    Ok(RevealIndices(indices))
}
