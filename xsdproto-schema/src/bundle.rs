//! Namespace bundles and shared-vocabulary version context.
//!
//! All documents sharing a target namespace are folded into one
//! [`NamespaceBundle`]. Declarations are appended as-is; deduplication by
//! name happens at emission time, using each declaration's [`Origin`].

use crate::types::{ComplexTypeDecl, ElementDecl, SchemaDocument, SimpleTypeDecl};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Origin {
    /// Reached from the spec's own entry document.
    Primary,
    /// Reached from an additional (shared or supporting) entry document.
    Auxiliary,
}

/// A declaration tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Declared<T> {
    /// The declaration.
    pub decl: T,
    /// Where it was loaded from.
    pub origin: Origin,
}

impl<T> Declared<T> {
    /// Returns true if the declaration came from the primary schema.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.origin == Origin::Primary
    }
}

/// Selected revision of the shared vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VocabularyVersion {
    /// Current published revision.
    Latest,
    /// Date-stamped revision, e.g. `20200108`.
    Dated(String),
}

impl VocabularyVersion {
    /// Returns the version token used in unit names (`latest` or the date).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Latest => "latest",
            Self::Dated(date) => date,
        }
    }
}

impl fmt::Display for VocabularyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy extracting a version tag from a `schemaLocation`.
///
/// Returning `None` selects [`VocabularyVersion::Latest`].
pub trait VersionResolver {
    /// Resolves the version tag carried by a schema location.
    fn resolve(&self, schema_location: &str) -> Option<String>;
}

impl<F> VersionResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, schema_location: &str) -> Option<String> {
        self(schema_location)
    }
}

/// Resolves `<prefix>YYYYMMDD.xsd` file names to their 8-digit date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStampResolver {
    prefix: String,
}

impl DateStampResolver {
    /// Creates a resolver for file names starting with `prefix` (e.g. `avs_`).
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for DateStampResolver {
    fn default() -> Self {
        Self::new("avs_")
    }
}

impl VersionResolver for DateStampResolver {
    fn resolve(&self, schema_location: &str) -> Option<String> {
        let file_name = schema_location
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(schema_location);
        let (_, rest) = file_name.split_once(self.prefix.as_str())?;
        let token = rest.split('.').next().unwrap_or(rest);

        if token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit()) {
            Some(token.to_string())
        } else {
            None
        }
    }
}

/// Description of the shared enumeration vocabulary.
///
/// The vocabulary is published in several versioned documents whose
/// namespaces follow slightly different shapes; any of them is treated
/// as the same logical dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedVocabulary {
    /// Namespaces under which the vocabulary is published.
    pub namespaces: Vec<String>,
    /// Namespace path segments identifying the vocabulary.
    pub path_segments: Vec<String>,
    /// Conventional QName prefix used for vocabulary types.
    pub qname_prefix: String,
    /// Name of the spec that compiles the vocabulary itself.
    pub spec_name: String,
}

impl SharedVocabulary {
    /// DDEX Allowed-Value-Sets.
    #[must_use]
    pub fn ddex_avs() -> Self {
        Self {
            namespaces: vec![
                "http://ddex.net/xml/avs/avs".to_string(),
                "http://ddex.net/xml/allowed-value-sets".to_string(),
            ],
            path_segments: vec![
                "avs".to_string(),
                "allowed-value-sets".to_string(),
                "allowed_value_sets".to_string(),
            ],
            qname_prefix: "avs".to_string(),
            spec_name: "avs".to_string(),
        }
    }

    /// Returns true if `namespace` is one of the vocabulary namespaces.
    #[must_use]
    pub fn is_shared_namespace(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|ns| ns == namespace)
    }

    /// Returns true if a namespace path segment identifies the vocabulary.
    #[must_use]
    pub fn is_shared_segment(&self, segment: &str) -> bool {
        self.path_segments.iter().any(|s| s == segment)
    }
}

impl Default for SharedVocabulary {
    fn default() -> Self {
        Self::ddex_avs()
    }
}

/// All declarations sharing one target namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceBundle {
    /// Target namespace (bundle key).
    pub target_namespace: String,
    /// Top-level elements, in load order.
    pub elements: Vec<Declared<ElementDecl>>,
    /// Complex types, in load order.
    pub complex_types: Vec<Declared<ComplexTypeDecl>>,
    /// Simple types, in load order.
    pub simple_types: Vec<Declared<SimpleTypeDecl>>,
    /// Namespaces this bundle imports.
    pub imports: BTreeSet<String>,
    /// Shared-vocabulary revision selected by this bundle's import, if any.
    pub vocabulary_version: Option<VocabularyVersion>,
    /// Prefix bindings of all merged documents (first binding wins).
    pub prefixes: BTreeMap<String, String>,
    /// Number of documents merged into the bundle.
    pub document_count: usize,
}

impl NamespaceBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            elements: Vec::new(),
            complex_types: Vec::new(),
            simple_types: Vec::new(),
            imports: BTreeSet::new(),
            vocabulary_version: None,
            prefixes: BTreeMap::new(),
            document_count: 0,
        }
    }

    /// Appends the declarations of a document to the bundle.
    pub fn merge(&mut self, doc: SchemaDocument, origin: Origin) {
        self.elements
            .extend(doc.elements.into_iter().map(|decl| Declared { decl, origin }));
        self.complex_types
            .extend(doc.complex_types.into_iter().map(|decl| Declared { decl, origin }));
        self.simple_types
            .extend(doc.simple_types.into_iter().map(|decl| Declared { decl, origin }));

        for (prefix, namespace) in doc.prefixes {
            self.prefixes.entry(prefix).or_insert(namespace);
        }
        self.document_count += 1;
    }

    /// Records a dependency on another namespace.
    ///
    /// Returns false (and records nothing) for a self-import.
    pub fn add_import(&mut self, namespace: &str) -> bool {
        if namespace == self.target_namespace {
            return false;
        }
        self.imports.insert(namespace.to_string());
        true
    }

    /// Resolves a prefix through the merged `xmlns` bindings.
    #[must_use]
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Returns the names of all named complex types, inline-typed elements
    /// and simple types declared in the bundle.
    #[must_use]
    pub fn declared_names(&self) -> BTreeSet<&str> {
        let elements = self
            .elements
            .iter()
            .filter(|e| e.decl.complex_type.is_some())
            .map(|e| e.decl.name.as_str());
        let complex = self
            .complex_types
            .iter()
            .filter(|c| !c.decl.is_anonymous())
            .map(|c| c.decl.name.as_str());
        let simple = self
            .simple_types
            .iter()
            .filter(|s| !s.decl.name.is_empty())
            .map(|s| s.decl.name.as_str());

        elements.chain(complex).chain(simple).collect()
    }
}
