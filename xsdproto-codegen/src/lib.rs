//! # xsdproto Codegen
//!
//! proto3 code generation from XSD schema graphs.
//!
//! This crate provides:
//! - Namespace → compilation unit mapping
//! - XSD → proto3 type translation
//! - Message and enum generation with XML binding annotations
//! - The per-spec compiler driver

pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod proto;
pub mod translator;

pub use compiler::{CompileReport, Compiler, GeneratedSpec, SpecDescriptor};
pub use config::{CompilerBuilder, CompilerConfig, UnresolvedPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::CodegenError;
pub use generator::{GeneratedUnit, UnitGenerator};
pub use mapper::{MapperConfig, NamespaceMapper, SpecContext, UnitInfo};
pub use translator::{ScalarType, TypeRef, TypeTranslator};

/// Compiles one spec with the given configuration.
///
/// # Arguments
/// * `config` - Compiler settings
/// * `spec` - Spec to compile
///
/// # Returns
/// The written files and collected diagnostics.
///
/// # Errors
/// Returns `CodegenError` if validation, loading, generation or writing fails.
pub fn compile_spec(
    config: CompilerConfig,
    spec: &SpecDescriptor,
) -> Result<CompileReport, CodegenError> {
    Compiler::new(config).compile_spec(spec)
}

/// Compiles the default DDEX spec list, stopping at the first failure.
///
/// # Errors
/// Returns the first failing spec's `CodegenError`.
pub fn compile_ddex(config: CompilerConfig) -> Result<Vec<CompileReport>, CodegenError> {
    Compiler::new(config).compile_all(&SpecDescriptor::ddex_defaults())
}
