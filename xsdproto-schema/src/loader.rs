//! Schema graph loader.
//!
//! Starting from one or more entry documents, the loader follows
//! `xs:include` and located `xs:import` declarations, parses every
//! reachable file exactly once and folds it into the bundle of its target
//! namespace.

use crate::bundle::{
    DateStampResolver, NamespaceBundle, Origin, SharedVocabulary, VersionResolver,
    VocabularyVersion,
};
use crate::error::LoadError;
use crate::parser::parse_schema_document;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// The loaded, namespace-keyed schema graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    bundles: BTreeMap<String, NamespaceBundle>,
    files: Vec<PathBuf>,
    entry_namespace: Option<String>,
}

impl SchemaGraph {
    /// Returns the bundles keyed by namespace, in sorted order.
    #[must_use]
    pub fn bundles(&self) -> &BTreeMap<String, NamespaceBundle> {
        &self.bundles
    }

    /// Looks up the bundle of a namespace.
    #[must_use]
    pub fn bundle(&self, namespace: &str) -> Option<&NamespaceBundle> {
        self.bundles.get(namespace)
    }

    /// Returns the loaded namespaces in sorted order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }

    /// Returns the canonical paths of all loaded files, in load order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Returns the target namespace of the first primary entry document.
    #[must_use]
    pub fn entry_namespace(&self) -> Option<&str> {
        self.entry_namespace.as_deref()
    }

    /// Consumes the graph, returning its bundles.
    #[must_use]
    pub fn into_bundles(self) -> BTreeMap<String, NamespaceBundle> {
        self.bundles
    }
}

/// Recursive include/import loader.
pub struct SchemaGraphLoader {
    shared: SharedVocabulary,
    resolver: Box<dyn VersionResolver>,
    file_namespaces: HashMap<PathBuf, String>,
    graph: SchemaGraph,
}

impl SchemaGraphLoader {
    /// Creates a loader using the date-stamp version resolver.
    #[must_use]
    pub fn new(shared: SharedVocabulary) -> Self {
        Self {
            shared,
            resolver: Box::new(DateStampResolver::default()),
            file_namespaces: HashMap::new(),
            graph: SchemaGraph::default(),
        }
    }

    /// Replaces the shared-vocabulary version resolver.
    #[must_use]
    pub fn with_version_resolver(mut self, resolver: impl VersionResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Loads the spec's own entry document and everything it reaches.
    ///
    /// # Errors
    /// Returns `LoadError` if any reachable file cannot be read or parsed.
    pub fn load_primary(&mut self, path: &Path) -> Result<&str, LoadError> {
        let namespace = self.load(path, Origin::Primary)?;
        let entry = self.graph.entry_namespace.get_or_insert(namespace);
        Ok(entry.as_str())
    }

    /// Loads a supporting entry document whose declarations never override
    /// same-named primary declarations.
    ///
    /// # Errors
    /// Returns `LoadError` if any reachable file cannot be read or parsed.
    pub fn load_auxiliary(&mut self, path: &Path) -> Result<String, LoadError> {
        self.load(path, Origin::Auxiliary)
    }

    /// Finishes loading and returns the graph.
    #[must_use]
    pub fn finish(self) -> SchemaGraph {
        self.graph
    }

    fn load(&mut self, path: &Path, origin: Origin) -> Result<String, LoadError> {
        let canonical = std::fs::canonicalize(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(namespace) = self.file_namespaces.get(&canonical) {
            return Ok(namespace.clone());
        }

        let xml = std::fs::read_to_string(&canonical).map_err(|source| LoadError::Read {
            path: canonical.clone(),
            source,
        })?;
        let mut doc = parse_schema_document(&xml).map_err(|source| LoadError::Parse {
            path: canonical.clone(),
            source,
        })?;

        let namespace = doc.target_namespace.clone();
        self.file_namespaces.insert(canonical.clone(), namespace.clone());
        self.graph.files.push(canonical.clone());
        tracing::debug!("Loaded {} into {}", canonical.display(), namespace);

        let includes = std::mem::take(&mut doc.includes);
        let imports = std::mem::take(&mut doc.imports);

        let bundle = self
            .graph
            .bundles
            .entry(namespace.clone())
            .or_insert_with(|| NamespaceBundle::new(namespace.clone()));
        bundle.merge(doc, origin);

        for import in &imports {
            let Some(imported) = import.namespace.as_deref() else {
                continue;
            };
            if !bundle.add_import(imported) {
                continue;
            }
            if self.shared.is_shared_namespace(imported) {
                if let Some(location) = import.schema_location.as_deref() {
                    let version = self
                        .resolver
                        .resolve(location)
                        .map_or(VocabularyVersion::Latest, VocabularyVersion::Dated);
                    bundle.vocabulary_version = Some(version);
                }
            }
        }

        let base_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        for include in &includes {
            self.load(&base_dir.join(&include.schema_location), origin)?;
        }

        for import in &imports {
            let Some(location) = import.schema_location.as_deref() else {
                continue;
            };
            if let Some(imported) = import.namespace.as_deref() {
                if self.shared.is_shared_namespace(imported) {
                    tracing::debug!("Not following shared vocabulary import {}", location);
                    continue;
                }
            }
            self.load(&base_dir.join(location), origin)?;
        }

        Ok(namespace)
    }
}

/// Loads the schema graph reachable from a single entry document.
///
/// # Arguments
/// * `path` - Entry XSD file
/// * `shared` - Shared vocabulary description
///
/// # Errors
/// Returns `LoadError` if any reachable file cannot be read or parsed.
pub fn load_schema_graph(path: &Path, shared: SharedVocabulary) -> Result<SchemaGraph, LoadError> {
    let mut loader = SchemaGraphLoader::new(shared);
    loader.load_primary(path)?;
    Ok(loader.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create dir");
        }
        fs::write(&path, body).expect("Failed to write schema");
        path
    }

    fn schema(namespace: &str, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="{namespace}">
{body}
</xs:schema>"#
        )
    }

    #[test]
    fn test_include_merges_same_namespace() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            &schema(
                "urn:ns1",
                r#"<xs:include schemaLocation="common.xsd"/>
<xs:complexType name="Message"/>"#,
            ),
        );
        write(
            dir.path(),
            "common.xsd",
            &schema("urn:ns1", r#"<xs:complexType name="Header"/>"#),
        );

        let graph = load_schema_graph(&entry, SharedVocabulary::default()).expect("load");

        assert_eq!(graph.bundles().len(), 1);
        let bundle = graph.bundle("urn:ns1").expect("bundle");
        assert_eq!(bundle.document_count, 2);
        let names: Vec<&str> = bundle
            .complex_types
            .iter()
            .map(|c| c.decl.name.as_str())
            .collect();
        assert_eq!(names, ["Message", "Header"]);
        assert_eq!(graph.entry_namespace(), Some("urn:ns1"));
    }

    #[test]
    fn test_mutual_includes_load_once() {
        let dir = tempdir().expect("Failed to create temp dir");
        let a = write(
            dir.path(),
            "a.xsd",
            &schema(
                "urn:ns",
                r#"<xs:include schemaLocation="b.xsd"/>
<xs:complexType name="A"/>"#,
            ),
        );
        write(
            dir.path(),
            "b.xsd",
            &schema(
                "urn:ns",
                r#"<xs:include schemaLocation="./a.xsd"/>
<xs:complexType name="B"/>"#,
            ),
        );

        let graph = load_schema_graph(&a, SharedVocabulary::default()).expect("load");

        assert_eq!(graph.files().len(), 2);
        let bundle = graph.bundle("urn:ns").expect("bundle");
        assert_eq!(bundle.complex_types.len(), 2);
        assert_eq!(bundle.document_count, 2);
    }

    #[test]
    fn test_import_creates_dependency_and_bundle() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "file1.xsd",
            &schema(
                "urn:ns1",
                r#"<xs:import namespace="urn:ns2" schemaLocation="sub/file3.xsd"/>
<xs:import namespace="urn:external"/>
<xs:import namespace="urn:ns1"/>"#,
            ),
        );
        write(
            dir.path(),
            "sub/file3.xsd",
            &schema("urn:ns2", r#"<xs:complexType name="Party"/>"#),
        );

        let graph = load_schema_graph(&entry, SharedVocabulary::default()).expect("load");

        let namespaces: Vec<&str> = graph.namespaces().collect();
        assert_eq!(namespaces, ["urn:ns1", "urn:ns2"]);

        let ns1 = graph.bundle("urn:ns1").expect("ns1");
        let imports: Vec<&str> = ns1.imports.iter().map(String::as_str).collect();
        assert_eq!(imports, ["urn:external", "urn:ns2"]);
        assert!(graph.bundle("urn:ns2").expect("ns2").imports.is_empty());
    }

    #[test]
    fn test_shared_vocabulary_version_context() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "ern/release-notification.xsd",
            &schema(
                "http://ddex.net/xml/ern/383",
                r#"<xs:import namespace="http://ddex.net/xml/avs/avs" schemaLocation="../avs_20200108.xsd"/>"#,
            ),
        );

        let graph = load_schema_graph(&entry, SharedVocabulary::default()).expect("load");

        // The vocabulary file itself is not followed.
        assert_eq!(graph.bundles().len(), 1);
        let bundle = graph.bundle("http://ddex.net/xml/ern/383").expect("bundle");
        assert!(bundle.imports.contains("http://ddex.net/xml/avs/avs"));
        assert_eq!(
            bundle.vocabulary_version,
            Some(VocabularyVersion::Dated("20200108".to_string()))
        );
    }

    #[test]
    fn test_shared_vocabulary_undated_is_latest() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            &schema(
                "http://ddex.net/xml/ern/43",
                r#"<xs:import namespace="http://ddex.net/xml/avs/avs" schemaLocation="avs.xsd"/>"#,
            ),
        );

        let graph = load_schema_graph(&entry, SharedVocabulary::default()).expect("load");
        let bundle = graph.bundle("http://ddex.net/xml/ern/43").expect("bundle");
        assert_eq!(bundle.vocabulary_version, Some(VocabularyVersion::Latest));
    }

    #[test]
    fn test_shared_vocabulary_without_location() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            &schema(
                "http://ddex.net/xml/ern/43",
                r#"<xs:import namespace="http://ddex.net/xml/avs/avs"/>"#,
            ),
        );

        let graph = load_schema_graph(&entry, SharedVocabulary::default()).expect("load");
        let bundle = graph.bundle("http://ddex.net/xml/ern/43").expect("bundle");
        assert!(bundle.imports.contains("http://ddex.net/xml/avs/avs"));
        assert_eq!(bundle.vocabulary_version, None);
    }

    #[test]
    fn test_custom_version_resolver() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            &schema(
                "http://ddex.net/xml/ern/43",
                r#"<xs:import namespace="http://ddex.net/xml/allowed-value-sets" schemaLocation="avs-v7.xsd"/>"#,
            ),
        );

        let mut loader = SchemaGraphLoader::new(SharedVocabulary::default())
            .with_version_resolver(|_: &str| Some("7".to_string()));
        loader.load_primary(&entry).expect("load");
        let graph = loader.finish();

        let bundle = graph.bundle("http://ddex.net/xml/ern/43").expect("bundle");
        assert_eq!(
            bundle.vocabulary_version,
            Some(VocabularyVersion::Dated("7".to_string()))
        );
    }

    #[test]
    fn test_auxiliary_origin() {
        let dir = tempdir().expect("Failed to create temp dir");
        let primary = write(
            dir.path(),
            "primary.xsd",
            &schema("urn:ns", r#"<xs:complexType name="Foo"/>"#),
        );
        let auxiliary = write(
            dir.path(),
            "shared/aux.xsd",
            &schema("urn:ns", r#"<xs:complexType name="Foo"/>"#),
        );

        let mut loader = SchemaGraphLoader::new(SharedVocabulary::default());
        loader.load_primary(&primary).expect("primary");
        loader.load_auxiliary(&auxiliary).expect("auxiliary");
        let graph = loader.finish();

        let bundle = graph.bundle("urn:ns").expect("bundle");
        let origins: Vec<Origin> = bundle.complex_types.iter().map(|c| c.origin).collect();
        assert_eq!(origins, [Origin::Primary, Origin::Auxiliary]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            &schema("urn:ns", r#"<xs:include schemaLocation="missing.xsd"/>"#),
        );

        let err = load_schema_graph(&entry, SharedVocabulary::default()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.path().ends_with("missing.xsd"));
    }

    #[test]
    fn test_missing_target_namespace_reports_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let entry = write(
            dir.path(),
            "main.xsd",
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#,
        );

        let err = load_schema_graph(&entry, SharedVocabulary::default()).unwrap_err();
        match err {
            LoadError::Parse { path, source } => {
                assert!(path.ends_with("main.xsd"));
                assert!(matches!(source, ParseError::MissingTargetNamespace));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
