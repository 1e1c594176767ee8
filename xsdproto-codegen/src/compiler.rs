//! Spec compilation driver.
//!
//! A spec is one named, versioned member of the schema family. Compiling a
//! spec validates its inputs, loads its schema graph, generates one unit per
//! namespace and only then writes the unit files, so a failing spec never
//! leaves partial output behind.

use crate::config::{CompilerBuilder, CompilerConfig, UnresolvedPolicy};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::CodegenError;
use crate::generator::{GeneratedUnit, UnitGenerator};
use crate::mapper::{NamespaceMapper, SpecContext};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use xsdproto_schema::SchemaGraphLoader;

/// One spec to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDescriptor {
    /// Family name, e.g. `ern`.
    pub name: String,
    /// Version, e.g. `43`.
    pub version: String,
    /// Entry document file name.
    pub entry_file: String,
    /// Supporting entry documents, relative to the schema root. Their
    /// declarations never override same-named primary declarations.
    pub auxiliary: Vec<String>,
}

impl SpecDescriptor {
    /// Creates a spec without auxiliary entries.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        entry_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            entry_file: entry_file.into(),
            auxiliary: Vec::new(),
        }
    }

    /// Adds a supporting entry document.
    #[must_use]
    pub fn with_auxiliary(mut self, path: impl Into<String>) -> Self {
        self.auxiliary.push(path.into());
        self
    }

    /// The DDEX spec list, shared vocabulary first so it exists before any
    /// spec importing it.
    #[must_use]
    pub fn ddex_defaults() -> Vec<Self> {
        vec![
            Self::new("avs", "latest", "allowed-value-sets.xsd"),
            Self::new("avs", "20200108", "avs_20200108.xsd"),
            Self::new("ern", "43", "release-notification.xsd"),
            Self::new("ern", "432", "release-notification.xsd"),
            Self::new("mead", "11", "media-enrichment-and-description.xsd"),
            Self::new("pie", "10", "party-identification-and-enrichment.xsd"),
            Self::new("ern", "383", "release-notification.xsd"),
        ]
    }
}

impl fmt::Display for SpecDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// In-memory result of generating one spec.
#[derive(Debug, Clone)]
pub struct GeneratedSpec {
    /// The spec.
    pub spec: SpecDescriptor,
    /// Resolved entry document.
    pub entry_path: PathBuf,
    /// Canonical paths of every loaded schema file.
    pub source_files: Vec<PathBuf>,
    /// One unit per namespace, in namespace order.
    pub units: Vec<GeneratedUnit>,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

impl GeneratedSpec {
    /// Looks up the unit generated for a namespace.
    #[must_use]
    pub fn unit(&self, namespace: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.namespace == namespace)
    }
}

/// Result of compiling one spec to disk.
#[derive(Debug, Clone)]
pub struct CompileReport {
    /// The spec.
    pub spec: SpecDescriptor,
    /// Written file per namespace.
    pub outputs: BTreeMap<String, PathBuf>,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

/// XSD → proto3 compiler.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
    mapper: NamespaceMapper,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl Compiler {
    /// Creates a compiler.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        let mapper = NamespaceMapper::new(config.mapper.clone(), config.shared_vocabulary.clone());
        Self { config, mapper }
    }

    /// Returns a builder.
    #[must_use]
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the namespace mapper.
    #[must_use]
    pub fn mapper(&self) -> &NamespaceMapper {
        &self.mapper
    }

    fn is_shared_spec(&self, spec: &SpecDescriptor) -> bool {
        spec.name == self.config.shared_vocabulary.spec_name
    }

    /// Returns the directory holding a spec's entry document.
    ///
    /// Shared-vocabulary documents live directly under the schema root;
    /// every other spec lives in `<root>/<name>v<version>`.
    #[must_use]
    pub fn spec_dir(&self, spec: &SpecDescriptor) -> PathBuf {
        if self.is_shared_spec(spec) {
            self.config.schema_root.clone()
        } else {
            self.config
                .schema_root
                .join(format!("{}v{}", spec.name, spec.version))
        }
    }

    /// Checks that a spec's inputs exist and returns its entry document.
    ///
    /// The entry file is tried as given, then with `-` replaced by `_`.
    ///
    /// # Errors
    /// Returns an input-missing `CodegenError` naming the attempted paths.
    pub fn validate(&self, spec: &SpecDescriptor) -> Result<PathBuf, CodegenError> {
        let dir = self.spec_dir(spec);
        let entry = dir.join(&spec.entry_file);

        let entry = if self.is_shared_spec(spec) {
            if !entry.is_file() {
                return Err(CodegenError::SharedEntryNotFound { path: entry });
            }
            entry
        } else {
            if !dir.is_dir() {
                return Err(CodegenError::SchemaDirectoryMissing { path: dir });
            }
            if entry.is_file() {
                entry
            } else {
                let alternate = dir.join(spec.entry_file.replace('-', "_"));
                if !alternate.is_file() {
                    return Err(CodegenError::EntryNotFound {
                        tried: entry,
                        alternate,
                    });
                }
                alternate
            }
        };

        for auxiliary in &spec.auxiliary {
            let path = self.config.schema_root.join(auxiliary);
            if !path.is_file() {
                return Err(CodegenError::SharedEntryNotFound { path });
            }
        }

        Ok(entry)
    }

    /// Generates every unit of a spec in memory.
    ///
    /// # Errors
    /// Returns `CodegenError` if inputs are missing, a schema cannot be
    /// loaded, two namespaces map to one file, or the strict policy rejects
    /// unresolved types.
    pub fn generate(&self, spec: &SpecDescriptor) -> Result<GeneratedSpec, CodegenError> {
        tracing::info!("Converting {} to protobuf", spec);

        let entry_path = self.validate(spec)?;
        let shared = &self.config.shared_vocabulary;

        let mut loader = SchemaGraphLoader::new(shared.clone());
        loader.load_primary(&entry_path)?;
        for auxiliary in &spec.auxiliary {
            loader.load_auxiliary(&self.config.schema_root.join(auxiliary))?;
        }
        let graph = loader.finish();
        tracing::debug!(
            "Loaded {} file(s) into {} namespace(s)",
            graph.files().len(),
            graph.bundles().len()
        );

        let mut context = SpecContext::new(&spec.name, &spec.version);
        if let Some(namespace) = graph.entry_namespace() {
            context = context.with_entry_namespace(namespace);
        }
        let units = self.mapper.map_all(graph.namespaces(), &context);

        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for (namespace, unit) in &units {
            if let Some(other) = claimed.insert(unit.file_path.as_str(), namespace.as_str()) {
                return Err(CodegenError::generation(format!(
                    "namespaces {} and {} both map to {}",
                    other, namespace, unit.file_path
                )));
            }
        }

        let generator = UnitGenerator::new(graph.bundles(), &units, &self.mapper, shared);
        let mut diagnostics = Diagnostics::new();
        let mut generated = Vec::with_capacity(units.len());
        for namespace in graph.namespaces() {
            generated.push(generator.generate(namespace, &mut diagnostics)?);
        }

        if self.config.unresolved_policy == UnresolvedPolicy::Strict {
            let count = diagnostics.count(DiagnosticKind::UnresolvedType);
            if let Some(first) = diagnostics.of_kind(DiagnosticKind::UnresolvedType).next() {
                return Err(CodegenError::UnresolvedTypes {
                    count,
                    first: first.to_string(),
                });
            }
        }

        Ok(GeneratedSpec {
            spec: spec.clone(),
            entry_path,
            source_files: graph.files().to_vec(),
            units: generated,
            diagnostics,
        })
    }

    /// Writes generated units under the output root.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if a directory or file cannot be written.
    pub fn write(&self, generated: GeneratedSpec) -> Result<CompileReport, CodegenError> {
        let mut outputs = BTreeMap::new();

        for unit in &generated.units {
            let path = output_path(&self.config.output_root, &unit.unit.file_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &unit.content)?;
            tracing::info!("Generated {}", path.display());
            outputs.insert(unit.namespace.clone(), path);
        }

        Ok(CompileReport {
            spec: generated.spec,
            outputs,
            diagnostics: generated.diagnostics,
        })
    }

    /// Generates a spec, then writes its units.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation or writing fails; nothing is
    /// written when generation fails.
    pub fn compile_spec(&self, spec: &SpecDescriptor) -> Result<CompileReport, CodegenError> {
        let generated = self.generate(spec)?;
        self.write(generated)
    }

    /// Compiles specs in order, stopping at the first failure.
    ///
    /// Output of specs completed before the failure stays on disk.
    ///
    /// # Errors
    /// Returns the first spec's `CodegenError`.
    pub fn compile_all(
        &self,
        specs: &[SpecDescriptor],
    ) -> Result<Vec<CompileReport>, CodegenError> {
        let mut reports = Vec::with_capacity(specs.len());
        for spec in specs {
            let report = self.compile_spec(spec).inspect_err(|err| {
                tracing::error!("Failed to convert {}: {}", spec, err);
            })?;
            reports.push(report);
        }
        Ok(reports)
    }
}

fn output_path(root: &Path, file_path: &str) -> PathBuf {
    file_path
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
