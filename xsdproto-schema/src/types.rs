//! Schema model types.
//!
//! This module contains the in-memory representation of one parsed XSD
//! document: top-level elements, complex and simple types, attributes and
//! the include/import declarations that link documents together.

use std::collections::BTreeMap;

/// The XML Schema namespace.
pub const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// One parsed XSD document.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    /// Target namespace (never empty after a successful parse).
    pub target_namespace: String,
    /// Top-level element declarations.
    pub elements: Vec<ElementDecl>,
    /// Top-level complex type declarations.
    pub complex_types: Vec<ComplexTypeDecl>,
    /// Top-level simple type declarations.
    pub simple_types: Vec<SimpleTypeDecl>,
    /// `xs:import` declarations.
    pub imports: Vec<ImportDecl>,
    /// `xs:include` declarations.
    pub includes: Vec<IncludeDecl>,
    /// `xmlns:prefix` bindings declared on the schema root.
    pub prefixes: BTreeMap<String, String>,
}

impl SchemaDocument {
    /// Creates an empty document for the given target namespace.
    #[must_use]
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            ..Self::default()
        }
    }

    /// Resolves a namespace prefix declared on the schema root.
    #[must_use]
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }
}

/// `maxOccurs` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxOccurs {
    /// Bounded upper limit.
    Bounded(u32),
    /// `maxOccurs="unbounded"`.
    Unbounded,
}

impl Default for MaxOccurs {
    fn default() -> Self {
        Self::Bounded(1)
    }
}

impl MaxOccurs {
    /// Parses a `maxOccurs` attribute value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "unbounded" => Some(Self::Unbounded),
            other => other.parse().ok().map(Self::Bounded),
        }
    }

    /// Returns true if more than one occurrence is allowed.
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(n) => *n > 1,
        }
    }
}

/// Element declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    /// Element name.
    pub name: String,
    /// Referenced type as written in the schema (e.g. `xs:string`, `ern:Party`).
    pub type_name: Option<String>,
    /// `minOccurs` (defaults to 1).
    pub min_occurs: u32,
    /// `maxOccurs` (defaults to 1).
    pub max_occurs: MaxOccurs,
    /// Anonymous complex type declared inline.
    pub complex_type: Option<Box<ComplexTypeDecl>>,
}

impl ElementDecl {
    /// Creates an element with default cardinality and no type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            min_occurs: 1,
            max_occurs: MaxOccurs::default(),
            complex_type: None,
        }
    }

    /// Sets the referenced type.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets `maxOccurs`.
    #[must_use]
    pub fn with_max_occurs(mut self, max_occurs: MaxOccurs) -> Self {
        self.max_occurs = max_occurs;
        self
    }

    /// Returns true if `minOccurs="0"`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.min_occurs == 0
    }

    /// Returns true if `maxOccurs="unbounded"`.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_occurs == MaxOccurs::Unbounded
    }
}

/// Content model of a complex type, decided once at parse time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContentModel {
    /// No child elements and no text content.
    #[default]
    Empty,
    /// `xs:sequence` of elements, in document order.
    Sequence(Vec<ElementDecl>),
    /// `xs:choice` of elements; exactly one may be present.
    Choice(Vec<ElementDecl>),
    /// `xs:simpleContent` extension: text value plus attributes.
    SimpleContent(SimpleContentExtension),
}

/// `xs:simpleContent/xs:extension`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleContentExtension {
    /// Base type of the text content.
    pub base: String,
    /// Attributes added by the extension.
    pub attributes: Vec<AttributeDecl>,
}

/// Complex type declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplexTypeDecl {
    /// Type name (empty for anonymous types).
    pub name: String,
    /// Content model.
    pub content: ContentModel,
    /// Attributes declared on the complex type itself.
    pub attributes: Vec<AttributeDecl>,
}

impl ComplexTypeDecl {
    /// Creates a named complex type with empty content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true if the type is anonymous.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the sequence elements, if the content model is a sequence.
    #[must_use]
    pub fn sequence(&self) -> Option<&[ElementDecl]> {
        match &self.content {
            ContentModel::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the choice options, if the content model is a choice.
    #[must_use]
    pub fn choice(&self) -> Option<&[ElementDecl]> {
        match &self.content {
            ContentModel::Choice(elements) => Some(elements),
            _ => None,
        }
    }

    /// Returns the simple-content extension, if any.
    #[must_use]
    pub fn simple_content(&self) -> Option<&SimpleContentExtension> {
        match &self.content {
            ContentModel::SimpleContent(ext) => Some(ext),
            _ => None,
        }
    }
}

/// Simple type declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimpleTypeDecl {
    /// Type name.
    pub name: String,
    /// Restriction, if any.
    pub restriction: Option<Restriction>,
}

impl SimpleTypeDecl {
    /// Returns the enumeration literals, empty if the type is not an enumeration.
    #[must_use]
    pub fn enumeration_values(&self) -> &[String] {
        self.restriction
            .as_ref()
            .map(|r| r.enumerations.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if this is a named enumeration-restricted type.
    #[must_use]
    pub fn is_enumeration(&self) -> bool {
        !self.name.is_empty() && !self.enumeration_values().is_empty()
    }
}

/// `xs:restriction` of a simple type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Restriction {
    /// Base type.
    pub base: String,
    /// Enumeration literals, in source order.
    pub enumerations: Vec<String>,
}

/// Attribute `use`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeUse {
    /// Attribute may be omitted.
    #[default]
    Optional,
    /// Attribute must be present.
    Required,
    /// Attribute must not appear.
    Prohibited,
}

impl AttributeUse {
    /// Parses an attribute `use` value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }
}

/// Attribute declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    /// Attribute name.
    pub name: String,
    /// Referenced type.
    pub type_name: Option<String>,
    /// Attribute use.
    pub use_: AttributeUse,
}

impl AttributeDecl {
    /// Creates an optional, untyped attribute.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            use_: AttributeUse::Optional,
        }
    }

    /// Returns true if `use="required"`.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.use_ == AttributeUse::Required
    }
}

/// `xs:import` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDecl {
    /// Imported namespace.
    pub namespace: Option<String>,
    /// Schema location, relative to the importing file.
    pub schema_location: Option<String>,
}

/// `xs:include` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDecl {
    /// Schema location, relative to the including file.
    pub schema_location: String,
}

/// Splits a qualified name into its optional prefix and local part.
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_occurs_parse() {
        assert_eq!(MaxOccurs::parse("unbounded"), Some(MaxOccurs::Unbounded));
        assert_eq!(MaxOccurs::parse("1"), Some(MaxOccurs::Bounded(1)));
        assert_eq!(MaxOccurs::parse("5"), Some(MaxOccurs::Bounded(5)));
        assert_eq!(MaxOccurs::parse("many"), None);
        assert!(MaxOccurs::Unbounded.is_multiple());
        assert!(MaxOccurs::Bounded(3).is_multiple());
        assert!(!MaxOccurs::default().is_multiple());
    }

    #[test]
    fn test_attribute_use_parse() {
        assert_eq!(AttributeUse::parse("required"), Some(AttributeUse::Required));
        assert_eq!(AttributeUse::parse("optional"), Some(AttributeUse::Optional));
        assert_eq!(
            AttributeUse::parse("prohibited"),
            Some(AttributeUse::Prohibited)
        );
        assert_eq!(AttributeUse::parse("sometimes"), None);
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("xs:string"), (Some("xs"), "string"));
        assert_eq!(split_qname("Party"), (None, "Party"));
    }

    #[test]
    fn test_simple_type_enumeration() {
        let mut st = SimpleTypeDecl {
            name: "Status".to_string(),
            restriction: Some(Restriction {
                base: "xs:string".to_string(),
                enumerations: vec!["OK".to_string()],
            }),
        };
        assert!(st.is_enumeration());

        st.restriction = Some(Restriction {
            base: "xs:string".to_string(),
            enumerations: Vec::new(),
        });
        assert!(!st.is_enumeration());

        st.restriction = None;
        assert!(st.enumeration_values().is_empty());
    }

    #[test]
    fn test_complex_type_content_accessors() {
        let mut ct = ComplexTypeDecl::new("Header");
        assert!(ct.sequence().is_none());

        ct.content = ContentModel::Sequence(vec![ElementDecl::new("Id").with_type("xs:string")]);
        assert_eq!(ct.sequence().map(<[ElementDecl]>::len), Some(1));
        assert!(ct.choice().is_none());
        assert!(ct.simple_content().is_none());
        assert!(!ct.is_anonymous());
    }
}
