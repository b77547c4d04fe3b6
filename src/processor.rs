use crate::statement::StatementList;
use crate::LdbbsResult;
use serde_json::Value;

/// Resolves identifiers to linked data documents.
///
/// Used by canonicalization, framing and verification method resolution.
pub trait DocumentLoader: Send + Sync {
    /// Load the document for `id`, `None` if nothing is known about it
    fn load(&self, id: &str) -> LdbbsResult<Option<Value>>;
}

/// The graph processing operations this crate consumes but does not
/// implement: canonicalization, conversion from RDF and framing.
pub trait GraphProcessor: Send + Sync {
    /// Canonicalize a graph into newline separated N-Quads.
    ///
    /// The output must be deterministic for a given graph.
    fn canonicalize(&self, graph: &Value, loader: &dyn DocumentLoader) -> LdbbsResult<String>;

    /// Convert newline separated N-Quads back into a graph document
    fn from_rdf(&self, statements: &str) -> LdbbsResult<Value>;

    /// Select the subgraph of `graph` matching `template`
    fn frame(
        &self,
        graph: &Value,
        template: &Value,
        loader: &dyn DocumentLoader,
    ) -> LdbbsResult<Value>;
}

/// The external collaborators a suite needs for one derive or verify call
#[derive(Copy, Clone)]
pub struct ProcessingContext<'a> {
    /// Canonicalization and framing
    pub processor: &'a dyn GraphProcessor,
    /// Document resolution
    pub loader: &'a dyn DocumentLoader,
}

impl<'a> ProcessingContext<'a> {
    /// Bundle a processor and a loader
    pub fn new(processor: &'a dyn GraphProcessor, loader: &'a dyn DocumentLoader) -> Self {
        Self { processor, loader }
    }

    /// Canonicalize `graph` into a statement list
    pub fn canonicalize(&self, graph: &Value) -> LdbbsResult<StatementList> {
        let canonical = self.processor.canonicalize(graph, self.loader)?;
        Ok(StatementList::from_canonical(&canonical))
    }

    /// Convert statements back into a graph document
    pub fn from_rdf(&self, statements: &StatementList) -> LdbbsResult<Value> {
        self.processor.from_rdf(&statements.to_canonical())
    }

    /// Frame `graph` against `template`
    pub fn frame(&self, graph: &Value, template: &Value) -> LdbbsResult<Value> {
        self.processor.frame(graph, template, self.loader)
    }
}
