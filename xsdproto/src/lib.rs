//! # xsdproto
//!
//! XSD → proto3 schema compiler for the DDEX message family.
//!
//! xsdproto resolves a multi-file, multi-namespace XSD graph, maps every
//! namespace onto one proto3 package and emits messages and enums whose
//! fields carry the original XML names as `// @gotags:` annotations.
//!
//! ## Quick Start
//!
//! ```ignore
//! use xsdproto::prelude::*;
//!
//! let compiler = Compiler::builder()
//!     .schema_root("xsd")
//!     .output_root("proto")
//!     .build();
//!
//! for report in compiler.compile_all(&SpecDescriptor::ddex_defaults())? {
//!     println!("{}: {} file(s)", report.spec, report.outputs.len());
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - XSD model, parser, graph loader and namespace bundles
//! - [`codegen`] - Unit mapping, type translation, emission and the driver

pub mod prelude;

/// XSD schema model and graph loading.
pub mod schema {
    pub use xsdproto_schema::*;
}

/// proto3 generation and the compiler driver.
pub mod codegen {
    pub use xsdproto_codegen::*;
}

// Re-export commonly used items at the crate root
pub use xsdproto_codegen::{
    CodegenError, CompileReport, Compiler, CompilerBuilder, SpecDescriptor, compile_ddex,
    compile_spec,
};
pub use xsdproto_schema::{SharedVocabulary, load_schema_graph};
