//! XSD type reference → proto3 type translation.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mapper::UnitInfo;
use crate::naming::type_name;
use std::collections::BTreeMap;
use std::fmt;
use xsdproto_schema::{NamespaceBundle, SharedVocabulary, XML_SCHEMA_NS, split_qname};

/// Restriction chains longer than this are cut short to `string`.
const MAX_RESTRICTION_DEPTH: usize = 8;

/// proto3 scalar types produced by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `string`.
    String,
    /// `int32`.
    Int32,
    /// `int64`.
    Int64,
    /// `bool`.
    Bool,
    /// `double`.
    Double,
    /// `bytes`.
    Bytes,
}

impl ScalarType {
    /// Returns the proto3 keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::Double => "double",
            Self::Bytes => "bytes",
        }
    }
}

/// A translated field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Built-in scalar.
    Scalar(ScalarType),
    /// Message or enum of the unit being emitted.
    Local(String),
    /// Message or enum of another unit.
    External {
        /// Package of the declaring unit.
        unit: String,
        /// Declaration name.
        name: String,
    },
}

impl TypeRef {
    /// Returns true for scalar types.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the unit a cross-unit reference points at.
    #[must_use]
    pub fn external_unit(&self) -> Option<&str> {
        match self {
            Self::External { unit, .. } => Some(unit),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => f.write_str(scalar.as_str()),
            Self::Local(name) => f.write_str(name),
            Self::External { unit, name } => write!(f, "{}.{}", unit, name),
        }
    }
}

/// Maps a core XSD built-in local name to its proto3 scalar.
///
/// The local name decides regardless of prefix.
#[must_use]
pub fn primitive_type(local_name: &str) -> Option<ScalarType> {
    let scalar = match local_name {
        "string" | "normalizedString" | "token" | "anyURI" | "NMTOKEN" => ScalarType::String,
        "int" | "integer" | "positiveInteger" | "PositiveInteger" => ScalarType::Int32,
        "long" => ScalarType::Int64,
        "boolean" => ScalarType::Bool,
        // Kept textual so no precision is lost.
        "decimal" | "float" => ScalarType::String,
        "double" => ScalarType::Double,
        "dateTime" | "date" | "time" | "duration" | "gYear" | "GYear" | "ddex_IsoDate"
        | "Ddex_IsoDate" => ScalarType::String,
        "base64Binary" => ScalarType::Bytes,
        _ => return None,
    };
    Some(scalar)
}

/// Maps further XML Schema built-ins whose local names are common enough
/// to collide with user types (`Name`, `ID`, ...).
///
/// Only consulted for XML Schema qualified or undeclared unprefixed names.
#[must_use]
pub fn xml_schema_type(local_name: &str) -> Option<ScalarType> {
    let scalar = match local_name {
        "Name" | "NCName" | "ID" | "IDREF" | "language" | "gYearMonth" => ScalarType::String,
        "nonNegativeInteger" | "short" | "byte" => ScalarType::Int32,
        "hexBinary" => ScalarType::Bytes,
        _ => return None,
    };
    Some(scalar)
}

/// Translates type references found in one bundle.
pub struct TypeTranslator<'a> {
    bundle: &'a NamespaceBundle,
    bundles: &'a BTreeMap<String, NamespaceBundle>,
    units: &'a BTreeMap<String, UnitInfo>,
    shared: &'a SharedVocabulary,
}

impl<'a> TypeTranslator<'a> {
    /// Creates a translator for references made from `bundle`.
    ///
    /// # Arguments
    /// * `bundle` - Bundle being emitted
    /// * `bundles` - All bundles of the graph, keyed by namespace
    /// * `units` - Unit of every namespace in the graph
    /// * `shared` - Shared vocabulary description
    #[must_use]
    pub fn new(
        bundle: &'a NamespaceBundle,
        bundles: &'a BTreeMap<String, NamespaceBundle>,
        units: &'a BTreeMap<String, UnitInfo>,
        shared: &'a SharedVocabulary,
    ) -> Self {
        Self {
            bundle,
            bundles,
            units,
            shared,
        }
    }

    /// Translates a qualified type name.
    ///
    /// Never fails: unknown references become local references and are
    /// reported through `diagnostics`.
    pub fn translate(&self, qname: &str, diagnostics: &mut Diagnostics) -> TypeRef {
        self.translate_in(self.bundle, qname, 0, diagnostics)
    }

    fn translate_in(
        &self,
        context: &'a NamespaceBundle,
        qname: &str,
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> TypeRef {
        let (prefix, local) = split_qname(qname);
        let bound = prefix.and_then(|p| context.namespace_for_prefix(p));

        let schema_qualified = match prefix {
            Some(p) => {
                bound == Some(XML_SCHEMA_NS) || (bound.is_none() && matches!(p, "xs" | "xsd"))
            }
            None => false,
        };
        if schema_qualified {
            let scalar = primitive_type(local)
                .or_else(|| xml_schema_type(local))
                .unwrap_or_else(|| {
                    tracing::debug!("Unknown XML Schema type {} mapped to string", qname);
                    ScalarType::String
                });
            return TypeRef::Scalar(scalar);
        }

        if let Some(scalar) = primitive_type(local) {
            return TypeRef::Scalar(scalar);
        }

        let Some(prefix) = prefix else {
            let builtin =
                xml_schema_type(local).filter(|_| !context.declared_names().contains(local));
            if let Some(scalar) = builtin {
                return TypeRef::Scalar(scalar);
            }
            return self.resolve_declared(context, local, depth, diagnostics);
        };

        // Vocabulary values travel as literal XML text.
        if prefix == self.shared.qname_prefix
            || bound.is_some_and(|ns| self.shared.is_shared_namespace(ns))
        {
            return TypeRef::Scalar(ScalarType::String);
        }

        let namespace = match bound {
            Some(ns) => self.bundles.get_key_value(ns).map(|(k, _)| k.as_str()),
            None => self.match_prefix(prefix),
        };

        match namespace.and_then(|ns| self.bundles.get(ns)) {
            Some(target) => self.resolve_declared(target, local, depth, diagnostics),
            None => {
                tracing::debug!(
                    "Prefix {} of {} matches no loaded namespace",
                    prefix,
                    qname
                );
                self.resolve_declared(context, local, depth, diagnostics)
            }
        }
    }

    /// First namespace (in sorted order) containing the prefix, ignoring case.
    fn match_prefix(&self, prefix: &str) -> Option<&'a str> {
        let needle = prefix.to_lowercase();
        self.bundles
            .keys()
            .find(|ns| ns.to_lowercase().contains(&needle))
            .map(String::as_str)
    }

    /// Resolves a local name declared (or expected) in `owner`.
    fn resolve_declared(
        &self,
        owner: &'a NamespaceBundle,
        local: &str,
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> TypeRef {
        let simple = owner
            .simple_types
            .iter()
            .filter(|s| s.decl.name == local && !s.decl.is_enumeration())
            .min_by_key(|s| s.origin);

        if let Some(simple) = simple {
            return match simple.decl.restriction.as_ref() {
                Some(r) if !r.base.is_empty() && depth < MAX_RESTRICTION_DEPTH => {
                    self.translate_in(owner, &r.base, depth + 1, diagnostics)
                }
                _ => TypeRef::Scalar(ScalarType::String),
            };
        }

        if !owner.declared_names().contains(local) {
            diagnostics.push(
                DiagnosticKind::UnresolvedType,
                self.bundle.target_namespace.as_str(),
                format!(
                    "type {} is not declared in {}; treating as local message",
                    local, owner.target_namespace
                ),
            );
        }

        let name = type_name(local);
        if owner.target_namespace == self.bundle.target_namespace {
            return TypeRef::Local(name);
        }
        match self.units.get(&owner.target_namespace) {
            Some(unit) => TypeRef::External {
                unit: unit.unit_name.clone(),
                name,
            },
            None => TypeRef::Local(name),
        }
    }
}
