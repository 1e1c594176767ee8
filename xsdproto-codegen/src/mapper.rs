//! Namespace → compilation unit mapping.
//!
//! Every namespace maps to exactly one unit (proto package), whose runtime
//! import path and output file path are derived from the unit name alone.
//! Two independent passes therefore always agree on the file a cross-unit
//! import points at.

use std::collections::BTreeMap;
use url::Url;
use xsdproto_schema::{SharedVocabulary, VocabularyVersion};

/// Output location of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitInfo {
    /// Proto package name, e.g. `ddex.ern.v43`.
    pub unit_name: String,
    /// Runtime import path written as `go_package`.
    pub runtime_path: String,
    /// POSIX path of the output file relative to the output root.
    pub file_path: String,
}

/// The spec whose graph is being mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecContext<'a> {
    /// Spec family name, e.g. `ern`.
    pub name: &'a str,
    /// Spec version, e.g. `43` or `latest`.
    pub version: &'a str,
    /// Target namespace of the spec's entry document.
    pub entry_namespace: Option<&'a str>,
}

impl<'a> SpecContext<'a> {
    /// Creates a context without an entry namespace.
    #[must_use]
    pub fn new(name: &'a str, version: &'a str) -> Self {
        Self {
            name,
            version,
            entry_namespace: None,
        }
    }

    /// Sets the entry document namespace.
    #[must_use]
    pub fn with_entry_namespace(mut self, namespace: &'a str) -> Self {
        self.entry_namespace = Some(namespace);
        self
    }
}

/// Mapping conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    /// Host of the consortium namespaces.
    pub consortium_host: String,
    /// First path segment of consortium namespaces.
    pub schema_root: String,
    /// First segment of every consortium unit name.
    pub unit_root: String,
    /// Prefix of every runtime import path.
    pub runtime_root: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            consortium_host: "ddex.net".to_string(),
            schema_root: "xml".to_string(),
            unit_root: "ddex".to_string(),
            runtime_root: "github.com/alecsavvy/ddex-go/gen".to_string(),
        }
    }
}

/// Deterministic namespace → unit mapper.
#[derive(Debug, Clone, Default)]
pub struct NamespaceMapper {
    config: MapperConfig,
    shared: SharedVocabulary,
}

impl NamespaceMapper {
    /// Creates a mapper.
    #[must_use]
    pub fn new(config: MapperConfig, shared: SharedVocabulary) -> Self {
        Self { config, shared }
    }

    /// Returns the mapping conventions.
    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Maps a namespace to its unit.
    #[must_use]
    pub fn unit_for(&self, namespace: &str, spec: &SpecContext<'_>) -> UnitInfo {
        self.unit_info(&self.unit_name(namespace, spec))
    }

    /// Maps every namespace of a graph, keyed by namespace.
    pub fn map_all<'n>(
        &self,
        namespaces: impl IntoIterator<Item = &'n str>,
        spec: &SpecContext<'_>,
    ) -> BTreeMap<String, UnitInfo> {
        namespaces
            .into_iter()
            .map(|ns| (ns.to_string(), self.unit_for(ns, spec)))
            .collect()
    }

    /// Computes the unit name of a namespace.
    #[must_use]
    pub fn unit_name(&self, namespace: &str, spec: &SpecContext<'_>) -> String {
        let (host, segments) = split_namespace(namespace);

        if host == self.config.consortium_host
            && segments.len() >= 2
            && segments[0] == self.config.schema_root
        {
            let family = segments[1].as_str();
            if self.shared.is_shared_segment(family) {
                let base = format!("{}.{}", self.config.unit_root, self.shared.spec_name);
                if spec.name == self.shared.spec_name {
                    return format!("{}.v{}", base, sanitize_token(spec.version));
                }
                return base;
            }
            if segments.len() >= 3 && is_digits(&segments[2]) {
                return format!(
                    "{}.{}.v{}",
                    self.config.unit_root,
                    sanitize_segment(family),
                    segments[2]
                );
            }
        }

        if spec.entry_namespace == Some(namespace) {
            return format!(
                "{}.{}.v{}",
                self.config.unit_root,
                sanitize_segment(spec.name),
                sanitize_token(strip_leading_v(spec.version))
            );
        }

        fallback_unit_name(&host, &segments)
    }

    /// Returns the unit of a shared-vocabulary revision.
    #[must_use]
    pub fn shared_unit(&self, version: &VocabularyVersion) -> UnitInfo {
        self.unit_info(&format!(
            "{}.{}.v{}",
            self.config.unit_root,
            self.shared.spec_name,
            sanitize_token(version.as_str())
        ))
    }

    /// Derives runtime and file paths from a unit name.
    #[must_use]
    pub fn unit_info(&self, unit_name: &str) -> UnitInfo {
        let segments: Vec<&str> = unit_name.split('.').filter(|s| !s.is_empty()).collect();
        let dir = segments.join("/");
        let stem = segments.last().copied().unwrap_or("unknown");

        let file_path = if dir.is_empty() {
            format!("{stem}.proto")
        } else {
            format!("{dir}/{stem}.proto")
        };
        let runtime_path = match (self.config.runtime_root.trim_end_matches('/'), dir.is_empty()) {
            ("", _) => dir,
            (root, true) => root.to_string(),
            (root, false) => format!("{root}/{dir}"),
        };

        UnitInfo {
            unit_name: unit_name.to_string(),
            runtime_path,
            file_path,
        }
    }
}

/// Splits a namespace into host and path segments.
///
/// Hierarchical URLs yield their host and `/` segments; opaque URIs such as
/// URNs yield an empty host and their `:`-separated parts.
fn split_namespace(namespace: &str) -> (String, Vec<String>) {
    match Url::parse(namespace) {
        Ok(url) if !url.cannot_be_a_base() => {
            let host = url.host_str().unwrap_or_default().to_string();
            let segments = url.path_segments().map(non_empty).unwrap_or_default();
            (host, segments)
        }
        Ok(url) => (String::new(), non_empty(url.path().split(':'))),
        Err(_) => (
            String::new(),
            non_empty(namespace.split(|c| c == '/' || c == ':')),
        ),
    }
}

fn non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn fallback_unit_name(host: &str, segments: &[String]) -> String {
    let mut parts: Vec<String> = if host.is_empty() {
        vec!["unknown".to_string()]
    } else {
        host.split('.').rev().map(sanitize_segment).collect()
    };

    let last = segments.len().saturating_sub(1);
    for (i, segment) in segments.iter().enumerate() {
        if i == last && is_digits(segment) {
            parts.push(format!("v{segment}"));
        } else {
            parts.push(sanitize_segment(segment));
        }
    }

    parts.retain(|p| !p.is_empty());
    parts.join(".")
}

/// Replaces characters not allowed in a package segment.
fn sanitize_token(token: &str) -> String {
    token
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Sanitizes a free-standing segment; a leading digit gets a `v` prefix.
fn sanitize_segment(segment: &str) -> String {
    let cleaned = sanitize_token(segment);
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("v{cleaned}")
    } else {
        cleaned
    }
}

fn strip_leading_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> NamespaceMapper {
        NamespaceMapper::default()
    }

    #[test]
    fn test_family_namespace() {
        let spec = SpecContext::new("ern", "43");
        let unit = mapper().unit_for("http://ddex.net/xml/ern/43", &spec);
        assert_eq!(unit.unit_name, "ddex.ern.v43");
        assert_eq!(unit.file_path, "ddex/ern/v43/v43.proto");
        assert_eq!(
            unit.runtime_path,
            "github.com/alecsavvy/ddex-go/gen/ddex/ern/v43"
        );
    }

    #[test]
    fn test_family_namespace_independent_of_spec() {
        let spec = SpecContext::new("ern", "43");
        assert_eq!(
            mapper().unit_name("http://ddex.net/xml/mead/11", &spec),
            "ddex.mead.v11"
        );
    }

    #[test]
    fn test_shared_vocabulary_namespaces() {
        let ern = SpecContext::new("ern", "383");
        let avs = SpecContext::new("avs", "20200108");
        let m = mapper();

        assert_eq!(m.unit_name("http://ddex.net/xml/avs/avs", &ern), "ddex.avs");
        assert_eq!(
            m.unit_name("http://ddex.net/xml/allowed-value-sets", &ern),
            "ddex.avs"
        );
        assert_eq!(
            m.unit_name("http://ddex.net/xml/avs/avs", &avs),
            "ddex.avs.v20200108"
        );
        let latest = SpecContext::new("avs", "latest");
        assert_eq!(
            m.unit_name("http://ddex.net/xml/allowed_value_sets", &latest),
            "ddex.avs.vlatest"
        );
    }

    #[test]
    fn test_shared_unit_matches_vocabulary_spec() {
        let m = mapper();
        let avs = SpecContext::new("avs", "20200108");
        let compiled = m.unit_for("http://ddex.net/xml/avs/avs", &avs);
        let referenced = m.shared_unit(&VocabularyVersion::Dated("20200108".to_string()));
        assert_eq!(compiled, referenced);

        let latest = m.shared_unit(&VocabularyVersion::Latest);
        assert_eq!(latest.file_path, "ddex/avs/vlatest/vlatest.proto");
    }

    #[test]
    fn test_version_tokens_get_single_v_prefix() {
        let m = mapper();

        let dated = m.shared_unit(&VocabularyVersion::Dated("20200108".to_string()));
        assert_eq!(dated.unit_name, "ddex.avs.v20200108");
        assert_eq!(dated.file_path, "ddex/avs/v20200108/v20200108.proto");
        assert_eq!(
            dated.runtime_path,
            "github.com/alecsavvy/ddex-go/gen/ddex/avs/v20200108"
        );

        let spec = SpecContext::new("pie", "10").with_entry_namespace("http://example.org/pie");
        let pie = m.unit_for("http://example.org/pie", &spec);
        assert_eq!(pie.unit_name, "ddex.pie.v10");
        assert_eq!(pie.file_path, "ddex/pie/v10/v10.proto");

        let odd = SpecContext::new("ern", "4.3").with_entry_namespace("urn:ern");
        assert_eq!(m.unit_name("urn:ern", &odd), "ddex.ern.v4_3");
    }

    #[test]
    fn test_entry_namespace_pins_spec_unit() {
        let spec = SpecContext::new("pie", "v10").with_entry_namespace("http://example.org/pie");
        assert_eq!(
            mapper().unit_name("http://example.org/pie", &spec),
            "ddex.pie.v10"
        );
    }

    #[test]
    fn test_generic_fallback() {
        let spec = SpecContext::new("ern", "43");
        let m = mapper();
        assert_eq!(
            m.unit_name("http://example.com/schemas/music-meta/2", &spec),
            "com.example.schemas.music_meta.v2"
        );
        assert_eq!(
            m.unit_name("http://ddex.net/other/thing", &spec),
            "net.ddex.other.thing"
        );
        assert_eq!(m.unit_name("urn:ns1", &spec), "unknown.ns1");
        assert_eq!(m.unit_name("urn:acme:2024:ids", &spec), "unknown.acme.v2024.ids");
    }

    #[test]
    fn test_unit_info_paths() {
        let config = MapperConfig {
            runtime_root: String::new(),
            ..MapperConfig::default()
        };
        let m = NamespaceMapper::new(config, SharedVocabulary::default());
        let info = m.unit_info("a.b.c");
        assert_eq!(info.file_path, "a/b/c/c.proto");
        assert_eq!(info.runtime_path, "a/b/c");
    }

    #[test]
    fn test_map_all_is_keyed_by_namespace() {
        let spec = SpecContext::new("ern", "43");
        let units = mapper().map_all(["urn:b", "http://ddex.net/xml/ern/43"], &spec);
        let keys: Vec<&str> = units.keys().map(String::as_str).collect();
        assert_eq!(keys, ["http://ddex.net/xml/ern/43", "urn:b"]);
    }
}
