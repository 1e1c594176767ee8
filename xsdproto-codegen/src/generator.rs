//! Per-unit file synthesis.
//!
//! A unit file is the header, the sorted cross-unit imports and the
//! declarations of one bundle, in this order: messages for inline-typed
//! top-level elements, messages for named complex types, enums.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::CodegenError;
use crate::mapper::{NamespaceMapper, UnitInfo};
use crate::naming::type_name;
use crate::proto::{Declaration, EnumGenerator, MessageGenerator};
use crate::translator::TypeTranslator;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use xsdproto_schema::{
    ComplexTypeDecl, NamespaceBundle, Origin, SharedVocabulary, SimpleTypeDecl,
    VocabularyVersion,
};

/// The rendered output of one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Source namespace.
    pub namespace: String,
    /// Unit the namespace maps to.
    pub unit: UnitInfo,
    /// Imported file paths, sorted.
    pub imports: Vec<String>,
    /// Emitted declarations, in file order.
    pub declarations: Vec<Declaration>,
    /// Complete file content.
    pub content: String,
}

impl GeneratedUnit {
    /// Looks up a declaration by name.
    #[must_use]
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name() == name)
    }
}

/// Generator for unit files of one schema graph.
pub struct UnitGenerator<'a> {
    bundles: &'a BTreeMap<String, NamespaceBundle>,
    units: &'a BTreeMap<String, UnitInfo>,
    mapper: &'a NamespaceMapper,
    shared: &'a SharedVocabulary,
}

impl<'a> UnitGenerator<'a> {
    /// Creates a new unit generator.
    #[must_use]
    pub fn new(
        bundles: &'a BTreeMap<String, NamespaceBundle>,
        units: &'a BTreeMap<String, UnitInfo>,
        mapper: &'a NamespaceMapper,
        shared: &'a SharedVocabulary,
    ) -> Self {
        Self {
            bundles,
            units,
            mapper,
            shared,
        }
    }

    /// Generates the unit of one namespace.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if the namespace was not loaded or
    /// has no unit.
    pub fn generate(
        &self,
        namespace: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<GeneratedUnit, CodegenError> {
        let bundle = self
            .bundles
            .get(namespace)
            .ok_or_else(|| CodegenError::generation(format!("no bundle for {}", namespace)))?;
        let unit = self
            .units
            .get(namespace)
            .ok_or_else(|| CodegenError::generation(format!("no unit for {}", namespace)))?;

        let translator = TypeTranslator::new(bundle, self.bundles, self.units, self.shared);
        let declarations = self.declarations(bundle, &translator, diagnostics);
        let imports = self.imports(bundle, unit, &declarations, diagnostics);

        let mut output = String::new();
        output.push_str("syntax = \"proto3\";\n\n");
        output.push_str(&format!("package {};\n\n", unit.unit_name));
        output.push_str(&format!("option go_package = \"{}\";\n\n", unit.runtime_path));
        output.push_str(&format!("// Target namespace: {}\n\n", bundle.target_namespace));

        for import in &imports {
            output.push_str(&format!("import \"{}\";\n", import));
        }
        if !imports.is_empty() {
            output.push('\n');
        }

        for declaration in &declarations {
            output.push_str(&declaration.render());
            output.push_str("\n\n");
        }

        let mut content = output.trim_end().to_string();
        content.push('\n');

        Ok(GeneratedUnit {
            namespace: namespace.to_string(),
            unit: unit.clone(),
            imports,
            declarations,
            content,
        })
    }

    fn declarations(
        &self,
        bundle: &NamespaceBundle,
        translator: &TypeTranslator<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Declaration> {
        let messages = MessageGenerator::new(translator, &bundle.target_namespace);
        let mut registry = DeclarationRegistry::default();

        for element in &bundle.elements {
            if let Some(complex_type) = element.decl.complex_type.as_deref() {
                registry.offer(
                    &element.decl.name,
                    element.origin,
                    Source::Complex(complex_type),
                );
            }
        }
        for complex_type in &bundle.complex_types {
            if !complex_type.decl.is_anonymous() {
                registry.offer(
                    &complex_type.decl.name,
                    complex_type.origin,
                    Source::Complex(&complex_type.decl),
                );
            }
        }
        for simple_type in &bundle.simple_types {
            if simple_type.decl.is_enumeration() {
                registry.offer(
                    &simple_type.decl.name,
                    simple_type.origin,
                    Source::Simple(&simple_type.decl),
                );
            }
        }

        registry
            .into_winners(&bundle.target_namespace)
            .into_iter()
            .filter_map(|(xsd_name, source)| match source {
                Source::Complex(complex_type) => Some(Declaration::Message(messages.generate(
                    xsd_name,
                    complex_type,
                    diagnostics,
                ))),
                Source::Simple(simple_type) => {
                    EnumGenerator::generate(simple_type).map(Declaration::Enum)
                }
            })
            .collect()
    }

    fn imports(
        &self,
        bundle: &NamespaceBundle,
        unit: &UnitInfo,
        declarations: &[Declaration],
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let mut imports = BTreeSet::new();

        for namespace in &bundle.imports {
            if self.shared.is_shared_namespace(namespace) {
                let version = match &bundle.vocabulary_version {
                    Some(version) => version.clone(),
                    None => {
                        diagnostics.push(
                            DiagnosticKind::MissingVersionContext,
                            bundle.target_namespace.as_str(),
                            format!("import of {} carries no version; using latest", namespace),
                        );
                        VocabularyVersion::Latest
                    }
                };
                imports.insert(self.mapper.shared_unit(&version).file_path);
            } else if let Some(info) = self.units.get(namespace) {
                imports.insert(info.file_path.clone());
            } else {
                tracing::debug!(
                    "Import of {} from {} has no loaded schema",
                    namespace,
                    bundle.target_namespace
                );
            }
        }

        let referenced = declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Message(message) => Some(message),
                Declaration::Enum(_) => None,
            })
            .flat_map(|message| message.fields())
            .filter_map(|field| field.ty.external_unit());
        for unit_name in referenced {
            if let Some(info) = self.units.values().find(|u| u.unit_name == unit_name) {
                imports.insert(info.file_path.clone());
            }
        }

        imports.remove(&unit.file_path);
        imports.into_iter().collect()
    }
}

#[derive(Clone, Copy)]
enum Source<'b> {
    Complex(&'b ComplexTypeDecl),
    Simple(&'b SimpleTypeDecl),
}

/// Unit-wide declaration names.
///
/// Messages and enums share one name space. A primary declaration beats
/// an auxiliary one; otherwise the first occurrence wins.
#[derive(Default)]
struct DeclarationRegistry<'b> {
    offers: Vec<(&'b str, Origin, Source<'b>)>,
    winners: HashMap<String, usize>,
}

impl<'b> DeclarationRegistry<'b> {
    fn offer(&mut self, xsd_name: &'b str, origin: Origin, source: Source<'b>) {
        let index = self.offers.len();
        self.offers.push((xsd_name, origin, source));

        let winner = self.winners.entry(type_name(xsd_name)).or_insert(index);
        if self.offers[*winner].1 == Origin::Auxiliary && origin == Origin::Primary {
            *winner = index;
        }
    }

    fn into_winners(self, namespace: &str) -> Vec<(&'b str, Source<'b>)> {
        let mut winners = Vec::with_capacity(self.winners.len());
        for (index, (xsd_name, origin, source)) in self.offers.iter().enumerate() {
            if self.winners.get(&type_name(xsd_name)) == Some(&index) {
                winners.push((*xsd_name, *source));
            } else {
                tracing::debug!(
                    "Skipping duplicate {:?} declaration {} in {}",
                    origin,
                    xsd_name,
                    namespace
                );
            }
        }
        winners
    }
}
