//! # xsdproto Schema
//!
//! XSD schema model, parser and graph loader.
//!
//! This crate provides:
//! - Parsing of individual XSD documents into a typed model
//! - Recursive include/import resolution across files and namespaces
//! - Per-namespace aggregation of declarations into bundles
//! - Version context for the shared enumeration vocabulary

pub mod bundle;
pub mod error;
pub mod loader;
pub mod parser;
pub mod types;

pub use bundle::{
    DateStampResolver, Declared, NamespaceBundle, Origin, SharedVocabulary, VersionResolver,
    VocabularyVersion,
};
pub use error::{LoadError, ParseError};
pub use loader::{SchemaGraph, SchemaGraphLoader, load_schema_graph};
pub use parser::parse_schema_document;
pub use types::{
    AttributeDecl, AttributeUse, ComplexTypeDecl, ContentModel, ElementDecl, ImportDecl,
    IncludeDecl, MaxOccurs, Restriction, SchemaDocument, SimpleContentExtension, SimpleTypeDecl,
    XML_SCHEMA_NS, split_qname,
};
