//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types.
//!
//! ```ignore
//! use xsdproto::prelude::*;
//! ```

// Schema types
pub use xsdproto_schema::{
    LoadError, NamespaceBundle, Origin, ParseError, SchemaGraph, SchemaGraphLoader,
    SharedVocabulary, VersionResolver, VocabularyVersion,
};

// Compiler types
pub use xsdproto_codegen::{
    CodegenError, CompileReport, Compiler, CompilerBuilder, CompilerConfig, Diagnostic,
    DiagnosticKind, Diagnostics, GeneratedSpec, GeneratedUnit, MapperConfig, SpecDescriptor,
    UnresolvedPolicy,
};
