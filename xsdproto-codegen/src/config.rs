//! Compiler configuration and builder.

use crate::compiler::Compiler;
use crate::mapper::MapperConfig;
use std::path::PathBuf;
use xsdproto_schema::SharedVocabulary;

/// What to do with type references that resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnresolvedPolicy {
    /// Emit a local reference and record a diagnostic.
    #[default]
    BestEffort,
    /// Fail the spec if any reference stays unresolved.
    Strict,
}

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Directory holding `<name>v<version>/` spec directories and the
    /// shared-vocabulary documents.
    pub schema_root: PathBuf,
    /// Directory unit files are written under.
    pub output_root: PathBuf,
    /// Namespace mapping conventions.
    pub mapper: MapperConfig,
    /// Shared vocabulary description.
    pub shared_vocabulary: SharedVocabulary,
    /// Unresolved type policy.
    pub unresolved_policy: UnresolvedPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            schema_root: PathBuf::from("xsd"),
            output_root: PathBuf::from("proto"),
            mapper: MapperConfig::default(),
            shared_vocabulary: SharedVocabulary::default(),
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }
}

/// Builder for configuring and creating a compiler.
#[derive(Debug, Clone, Default)]
pub struct CompilerBuilder {
    config: CompilerConfig,
}

impl CompilerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema root directory.
    #[must_use]
    pub fn schema_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_root = path.into();
        self
    }

    /// Sets the output root directory.
    #[must_use]
    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_root = path.into();
        self
    }

    /// Sets the namespace mapping conventions.
    #[must_use]
    pub fn mapper(mut self, mapper: MapperConfig) -> Self {
        self.config.mapper = mapper;
        self
    }

    /// Sets the runtime import path prefix.
    #[must_use]
    pub fn runtime_root(mut self, root: impl Into<String>) -> Self {
        self.config.mapper.runtime_root = root.into();
        self
    }

    /// Sets the shared vocabulary description.
    #[must_use]
    pub fn shared_vocabulary(mut self, shared: SharedVocabulary) -> Self {
        self.config.shared_vocabulary = shared;
        self
    }

    /// Sets the unresolved type policy.
    #[must_use]
    pub fn unresolved_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.config.unresolved_policy = policy;
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Builds the compiler.
    #[must_use]
    pub fn build(self) -> Compiler {
        Compiler::new(self.config)
    }
}
