#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ldbbs::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const VOCAB: &str = "https://example.org/vocab#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

pub const ISSUER: &str = "did:example:issuer";
pub const KEY_ID: &str = "did:example:issuer#key-1";

pub fn setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The full IRI of a vocabulary term
pub fn vocab(term: &str) -> String {
    expand(term)
}

fn expand(term: &str) -> String {
    if term.contains(':') {
        term.to_string()
    } else {
        format!("{}{}", VOCAB, term)
    }
}

fn one_or_many(value: &Value) -> &[Value] {
    match value {
        Value::Array(values) => values.as_slice(),
        v => std::slice::from_ref(v),
    }
}

fn invalid<S: Into<String>>(msg: S) -> Error {
    Error::InvalidDocument(msg.into())
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    fn plain(value: &str) -> Self {
        Self::Literal {
            value: value.to_string(),
            datatype: None,
            language: None,
        }
    }

    fn typed(value: String, datatype: &str) -> Self {
        Self::Literal {
            value,
            datatype: Some(datatype.to_string()),
            language: None,
        }
    }

    fn to_nquad(&self) -> String {
        match self {
            Self::Iri(iri) => format!("<{}>", iri),
            Self::Blank(label) => label.clone(),
            Self::Literal {
                value,
                datatype,
                language,
            } => {
                let mut out = String::from("\"");
                for c in value.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '"' => out.push_str("\\\""),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        c => out.push(c),
                    }
                }
                out.push('"');
                if let Some(dt) = datatype {
                    out.push_str(&format!("^^<{}>", dt));
                } else if let Some(lang) = language {
                    out.push('@');
                    out.push_str(lang);
                }
                out
            }
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Iri(iri) => json!({ "@id": iri }),
            Self::Blank(label) => json!({ "@id": label }),
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } => json!({ "@value": value, "@type": dt }),
            Self::Literal {
                value,
                language: Some(lang),
                ..
            } => json!({ "@value": value, "@language": lang }),
            Self::Literal { value, .. } => Value::from(value.as_str()),
        }
    }
}

/// Flattens a JSON graph into sorted N-Quads. Blank nodes are labelled
/// `_:c14nN` in traversal order, which is stable for a given input.
#[derive(Default)]
struct Canonicalizer {
    labels: HashMap<String, String>,
    next: usize,
    quads: BTreeSet<String>,
}

impl Canonicalizer {
    fn fresh(&mut self) -> Term {
        let label = format!("_:c14n{}", self.next);
        self.next += 1;
        Term::Blank(label)
    }

    fn relabel(&mut self, label: &str) -> Term {
        if let Some(l) = self.labels.get(label) {
            return Term::Blank(l.clone());
        }
        let term = self.fresh();
        if let Term::Blank(l) = &term {
            self.labels.insert(label.to_string(), l.clone());
        }
        term
    }

    fn subject(&mut self, node: &Map<String, Value>) -> Term {
        match node.get("@id").or_else(|| node.get("id")).and_then(Value::as_str) {
            Some(id) if id.starts_with("_:") => self.relabel(id),
            Some(id) => Term::Iri(id.to_string()),
            None => self.fresh(),
        }
    }

    fn push(&mut self, subject: &Term, predicate: &str, object: &Term) {
        self.quads.insert(format!(
            "{} <{}> {} .",
            subject.to_nquad(),
            predicate,
            object.to_nquad()
        ));
    }

    fn node(&mut self, node: &Map<String, Value>) -> LdbbsResult<Term> {
        let subject = self.subject(node);
        for (key, value) in node {
            match key.as_str() {
                "@context" | "@id" | "id" => {}
                "@graph" => {
                    for item in one_or_many(value) {
                        let item = item
                            .as_object()
                            .ok_or_else(|| invalid("@graph entries must be objects"))?;
                        self.node(item)?;
                    }
                }
                "@type" | "type" => {
                    for t in one_or_many(value) {
                        let t = t.as_str().ok_or_else(|| invalid("types must be strings"))?;
                        self.push(&subject, RDF_TYPE, &Term::Iri(expand(t)));
                    }
                }
                _ => {
                    let predicate = expand(key);
                    for v in one_or_many(value) {
                        if let Some(object) = self.value(v)? {
                            self.push(&subject, &predicate, &object);
                        }
                    }
                }
            }
        }
        Ok(subject)
    }

    fn value(&mut self, value: &Value) -> LdbbsResult<Option<Term>> {
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(Term::plain(s)),
            Value::Bool(b) => Some(Term::typed(b.to_string(), XSD_BOOLEAN)),
            Value::Number(n) if n.is_f64() => Some(Term::typed(n.to_string(), XSD_DOUBLE)),
            Value::Number(n) => Some(Term::typed(n.to_string(), XSD_INTEGER)),
            Value::Array(_) => return Err(invalid("nested arrays are not supported")),
            Value::Object(obj) => {
                if let Some(v) = obj.get("@value") {
                    let lexical = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    Some(Term::Literal {
                        value: lexical,
                        datatype: obj.get("@type").and_then(Value::as_str).map(expand),
                        language: obj
                            .get("@language")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                } else if obj.len() == 1 && (obj.contains_key("@id") || obj.contains_key("id")) {
                    Some(self.subject(obj))
                } else {
                    Some(self.node(obj)?)
                }
            }
        })
    }
}

fn parse_term(input: &str) -> LdbbsResult<(Term, &str)> {
    let input = input.trim_start();
    if let Some(rest) = input.strip_prefix('<') {
        let end = rest.find('>').ok_or_else(|| invalid("unterminated IRI"))?;
        return Ok((Term::Iri(rest[..end].to_string()), &rest[end + 1..]));
    }
    if input.starts_with("_:") {
        let end = input.find(char::is_whitespace).unwrap_or(input.len());
        return Ok((Term::Blank(input[..end].to_string()), &input[end..]));
    }
    let rest = input
        .strip_prefix('"')
        .ok_or_else(|| invalid(format!("unexpected term: {}", input)))?;
    let mut value = String::new();
    let mut chars = rest.char_indices();
    let mut end = None;
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(i);
                break;
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, c)) => value.push(c),
                None => return Err(invalid("dangling escape")),
            },
            c => value.push(c),
        }
    }
    let end = end.ok_or_else(|| invalid("unterminated literal"))?;
    let rest = &rest[end + 1..];
    if let Some(dt) = rest.strip_prefix("^^<") {
        let close = dt.find('>').ok_or_else(|| invalid("unterminated datatype"))?;
        return Ok((Term::typed(value, &dt[..close]), &dt[close + 1..]));
    }
    if let Some(lang) = rest.strip_prefix('@') {
        let close = lang.find(char::is_whitespace).unwrap_or(lang.len());
        return Ok((
            Term::Literal {
                value,
                datatype: None,
                language: Some(lang[..close].to_string()),
            },
            &lang[close..],
        ));
    }
    Ok((Term::Literal {
        value,
        datatype: None,
        language: None,
    }, rest))
}

fn parse_quad(line: &str) -> LdbbsResult<(Term, String, Term)> {
    let (subject, rest) = parse_term(line)?;
    let (predicate, rest) = parse_term(rest)?;
    let (object, rest) = parse_term(rest)?;
    if rest.trim() != "." {
        return Err(invalid(format!("unsupported statement: {}", line)));
    }
    match predicate {
        Term::Iri(p) => Ok((subject, p, object)),
        _ => Err(invalid("predicates must be IRIs")),
    }
}

fn node_id(term: &Term) -> LdbbsResult<String> {
    match term {
        Term::Iri(id) | Term::Blank(id) => Ok(id.clone()),
        Term::Literal { .. } => Err(invalid("literal subject")),
    }
}

fn push_value(node: &mut Map<String, Value>, key: &str, value: Value) {
    if let Value::Array(values) = node
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        values.push(value);
    }
}

/// Frames `{"@graph": [...]}` documents produced by `from_rdf`.
///
/// Supports matching on `type` and `@id`, `@explicit` (inherited by
/// embedded frames), `@default` for absent properties, and embedding of
/// referenced nodes.
struct Framer<'g> {
    nodes: BTreeMap<&'g str, &'g Map<String, Value>>,
}

impl<'g> Framer<'g> {
    fn new(graph: &'g Value) -> LdbbsResult<Self> {
        let mut nodes = BTreeMap::new();
        let items = match graph.get("@graph") {
            Some(items) => one_or_many(items),
            None => one_or_many(graph),
        };
        for item in items {
            let node = item
                .as_object()
                .ok_or_else(|| invalid("graph nodes must be objects"))?;
            let id = node
                .get("@id")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid("graph nodes must have an @id"))?;
            nodes.insert(id, node);
        }
        Ok(Self { nodes })
    }

    fn frame_types(frame: &Map<String, Value>) -> Vec<String> {
        frame
            .get("type")
            .or_else(|| frame.get("@type"))
            .map(|t| {
                one_or_many(t)
                    .iter()
                    .filter_map(Value::as_str)
                    .map(expand)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn matches(node: &Map<String, Value>, frame: &Map<String, Value>) -> bool {
        let types = Self::frame_types(frame);
        if !types.is_empty() {
            let node_types = node.get("@type").map(one_or_many).unwrap_or_default();
            if !node_types
                .iter()
                .filter_map(Value::as_str)
                .any(|t| types.iter().any(|f| f == t))
            {
                return false;
            }
        }
        match frame.get("@id").or_else(|| frame.get("id")).and_then(Value::as_str) {
            Some(id) => node.get("@id").and_then(Value::as_str) == Some(id),
            None => true,
        }
    }

    fn frame(&self, template: &Map<String, Value>) -> LdbbsResult<Value> {
        let explicit = template
            .get("@explicit")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let mut out = Vec::new();
        for (id, node) in &self.nodes {
            if Self::matches(node, template) {
                out.push(self.embed(id, template, explicit, &mut Vec::new())?);
            }
        }
        let mut result = if out.len() == 1 {
            match out.pop() {
                Some(Value::Object(node)) => node,
                _ => return Err(invalid("framed node must be an object")),
            }
        } else {
            let mut m = Map::new();
            m.insert("@graph".to_string(), Value::Array(out));
            m
        };
        if let Some(context) = template.get("@context") {
            result.insert("@context".to_string(), context.clone());
        }
        Ok(Value::Object(result))
    }

    fn embed(
        &self,
        id: &str,
        frame: &Map<String, Value>,
        explicit: bool,
        stack: &mut Vec<String>,
    ) -> LdbbsResult<Value> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| invalid(format!("unknown node {}", id)))?;
        let explicit = frame
            .get("@explicit")
            .and_then(Value::as_bool)
            .unwrap_or(explicit);
        stack.push(id.to_string());

        let mut out = Map::new();
        out.insert("@id".to_string(), Value::from(id));
        if let Some(types) = node.get("@type") {
            if !explicit || frame.contains_key("type") || frame.contains_key("@type") {
                out.insert("@type".to_string(), types.clone());
            }
        }
        for (key, sub) in frame {
            if key.starts_with('@') || key == "id" || key == "type" {
                continue;
            }
            let property = expand(key);
            match node.get(&property) {
                Some(values) => {
                    let values = self.values(values, Some(sub), explicit, stack)?;
                    out.insert(property, values);
                }
                None => {
                    if let Some(default) = sub.get("@default") {
                        out.insert(property, Value::Array(vec![default.clone()]));
                    }
                }
            }
        }
        if !explicit {
            for (property, values) in node.iter() {
                if property.starts_with('@') || out.contains_key(property) {
                    continue;
                }
                let values = self.values(values, None, explicit, stack)?;
                out.insert(property.clone(), values);
            }
        }
        stack.pop();
        Ok(Value::Object(out))
    }

    fn values(
        &self,
        values: &Value,
        sub: Option<&Value>,
        explicit: bool,
        stack: &mut Vec<String>,
    ) -> LdbbsResult<Value> {
        let empty = Map::new();
        let subframe = match sub {
            Some(Value::Object(f)) => f,
            Some(Value::Array(fs)) => fs.first().and_then(Value::as_object).unwrap_or(&empty),
            _ => &empty,
        };
        let mut out = Vec::new();
        for value in one_or_many(values) {
            let reference = value
                .as_object()
                .filter(|o| o.len() == 1)
                .and_then(|o| o.get("@id"))
                .and_then(Value::as_str)
                .filter(|id| self.nodes.contains_key(*id) && !stack.iter().any(|s| s == id));
            match reference {
                Some(id) => out.push(self.embed(id, subframe, explicit, stack)?),
                None => out.push(value.clone()),
            }
        }
        Ok(Value::Array(out))
    }
}

/// A small deterministic JSON ⇄ N-Quads processor for tests
#[derive(Copy, Clone, Debug, Default)]
pub struct ToyProcessor;

impl GraphProcessor for ToyProcessor {
    fn canonicalize(&self, graph: &Value, _loader: &dyn DocumentLoader) -> LdbbsResult<String> {
        let node = graph
            .as_object()
            .ok_or_else(|| invalid("graph must be an object"))?;
        let mut c = Canonicalizer::default();
        c.node(node)?;
        let mut out = String::new();
        for quad in c.quads {
            out.push_str(&quad);
            out.push('\n');
        }
        Ok(out)
    }

    fn from_rdf(&self, statements: &str) -> LdbbsResult<Value> {
        let mut nodes: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
        for line in statements.lines().filter(|l| !l.trim().is_empty()) {
            let (subject, predicate, object) = parse_quad(line)?;
            let id = node_id(&subject)?;
            let node = nodes.entry(id.clone()).or_insert_with(|| {
                let mut m = Map::new();
                m.insert("@id".to_string(), Value::from(id));
                m
            });
            match (&object, predicate == RDF_TYPE) {
                (Term::Iri(t), true) => push_value(node, "@type", Value::from(t.as_str())),
                _ => push_value(node, &predicate, object.to_json()),
            }
        }
        Ok(json!({ "@graph": nodes.into_values().map(Value::Object).collect::<Vec<_>>() }))
    }

    fn frame(
        &self,
        graph: &Value,
        template: &Value,
        _loader: &dyn DocumentLoader,
    ) -> LdbbsResult<Value> {
        let template = template
            .as_object()
            .ok_or_else(|| invalid("frame must be an object"))?;
        Framer::new(graph)?.frame(template)
    }
}

/// Serves documents from memory. Identifiers with a fragment fall back to
/// the document without it.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<String, Value>,
}

impl MemoryLoader {
    pub fn with(mut self, id: &str, document: Value) -> Self {
        self.documents.insert(id.to_string(), document);
        self
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, id: &str) -> LdbbsResult<Option<Value>> {
        let base = id.split('#').next().unwrap_or(id);
        Ok(self
            .documents
            .get(id)
            .or_else(|| self.documents.get(base))
            .cloned())
    }
}

/// Accepts every proof
pub struct AcceptAnyPurpose;

impl ProofPurpose for AcceptAnyPurpose {
    fn validate(&self, _proof: &Value, _context: &PurposeContext<'_>) -> LdbbsResult<()> {
        Ok(())
    }
}

pub fn issuer_key() -> Bls12381G2KeyPair {
    Bls12381G2KeyPair::from_seed(KEY_ID, ISSUER, b"ldbbs integration test issuer key")
}

pub fn controller_document(key: &Bls12381G2KeyPair, revoked: bool) -> Value {
    let mut method = key.to_verification_method();
    if revoked {
        method["revoked"] = Value::from("2021-06-01T00:00:00Z");
    }
    json!({
        "@context": "https://www.w3.org/ns/did/v1",
        "id": ISSUER,
        "verificationMethod": [method],
        "assertionMethod": [KEY_ID],
    })
}

pub fn issuer_loader(key: &Bls12381G2KeyPair) -> MemoryLoader {
    MemoryLoader::default().with(ISSUER, controller_document(key, false))
}

pub fn revoked_loader(key: &Bls12381G2KeyPair) -> MemoryLoader {
    MemoryLoader::default().with(ISSUER, controller_document(key, true))
}

pub fn sign_options() -> SignOptions {
    SignOptions {
        verification_method: KEY_ID.to_string(),
        created: Utc.with_ymd_and_hms(2020, 4, 2, 18, 48, 36).single(),
        proof_purpose: Some(ASSERTION_METHOD.to_string()),
    }
}

pub fn credential() -> Value {
    json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://example.org/context/v1"
        ],
        "id": "urn:credential:prc:1",
        "type": ["VerifiableCredential", "PermanentResidentCard"],
        "issuer": { "id": ISSUER },
        "issuanceDate": "2019-12-03T12:19:52Z",
        "credentialSubject": {
            "id": "did:example:alice",
            "type": "Person",
            "givenName": "Alice",
            "familyName": "Smith",
            "birthYear": 1990,
            "resident": true,
            "address": {
                "type": "PostalAddress",
                "streetAddress": "1 Main St",
                "addressLocality": "Springfield"
            }
        }
    })
}

/// Reveals the card type, issuer and the subject's given name and address
pub fn reveal_template() -> Value {
    json!({
        "@context": [
            "https://www.w3.org/2018/credentials/v1",
            "https://example.org/context/v1"
        ],
        "type": "PermanentResidentCard",
        "@explicit": true,
        "issuer": {},
        "credentialSubject": {
            "type": "Person",
            "givenName": {},
            "address": { "@explicit": false }
        }
    })
}

pub fn sign(
    context: ProcessingContext<'_>,
    document: &Value,
    key: &Bls12381G2KeyPair,
    options: &SignOptions,
) -> LdbbsResult<Value> {
    BbsBlsSignature2020::new(context).sign(document, key, options)
}
