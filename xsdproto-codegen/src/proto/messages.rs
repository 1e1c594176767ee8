//! Message generation from complex types.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::naming::{field_name, type_name};
use crate::proto::decl::{FieldDecl, MessageDecl, MessageItem, OneofDecl, XmlBinding};
use crate::translator::{ScalarType, TypeRef, TypeTranslator};
use std::collections::HashSet;
use xsdproto_schema::{AttributeDecl, AttributeUse, ComplexTypeDecl, ContentModel, ElementDecl};

/// Name of the group holding choice members.
pub const CHOICE_ONEOF: &str = "choice";

/// Name of the synthetic text-content field.
pub const TEXT_FIELD: &str = "value";

/// Generator for message declarations.
pub struct MessageGenerator<'a> {
    translator: &'a TypeTranslator<'a>,
    namespace: &'a str,
}

impl<'a> MessageGenerator<'a> {
    /// Creates a new message generator.
    #[must_use]
    pub fn new(translator: &'a TypeTranslator<'a>, namespace: &'a str) -> Self {
        Self {
            translator,
            namespace,
        }
    }

    /// Generates the message for a complex type.
    ///
    /// # Arguments
    /// * `name` - XSD name of the type (or of the element owning it)
    /// * `complex_type` - Type definition
    /// * `diagnostics` - Sink for unresolved types and name collisions
    pub fn generate(
        &self,
        name: &str,
        complex_type: &ComplexTypeDecl,
        diagnostics: &mut Diagnostics,
    ) -> MessageDecl {
        let message_name = type_name(name);
        let mut fields = FieldAllocator::new(self.namespace, message_name.clone());
        let mut items = Vec::new();

        match &complex_type.content {
            ContentModel::Empty => {}
            ContentModel::Sequence(elements) => {
                for element in elements.iter().filter(|e| has_name(e)) {
                    let field = self.element_field(element, true, &mut fields, diagnostics);
                    items.push(MessageItem::Field(field));
                }
            }
            ContentModel::Choice(elements) => {
                let members: Vec<FieldDecl> = elements
                    .iter()
                    .filter(|e| has_name(e))
                    .map(|element| self.element_field(element, false, &mut fields, diagnostics))
                    .collect();
                if !members.is_empty() {
                    items.push(MessageItem::Oneof(OneofDecl {
                        name: CHOICE_ONEOF.to_string(),
                        fields: members,
                    }));
                }
            }
            ContentModel::SimpleContent(extension) => {
                // Text content stays textual whatever the extension base.
                let (name, number) = fields.allocate(TEXT_FIELD, diagnostics);
                items.push(MessageItem::Field(FieldDecl {
                    name,
                    ty: TypeRef::Scalar(ScalarType::String),
                    number,
                    repeated: false,
                    xml_name: String::new(),
                    binding: XmlBinding::Text,
                }));

                for attribute in &extension.attributes {
                    if let Some(field) = self.attribute_field(attribute, &mut fields, diagnostics) {
                        items.push(MessageItem::Field(field));
                    }
                }
            }
        }

        for attribute in &complex_type.attributes {
            if let Some(field) = self.attribute_field(attribute, &mut fields, diagnostics) {
                items.push(MessageItem::Field(field));
            }
        }

        MessageDecl {
            name: message_name,
            items,
        }
    }

    fn element_field(
        &self,
        element: &ElementDecl,
        allow_repeated: bool,
        fields: &mut FieldAllocator<'_>,
        diagnostics: &mut Diagnostics,
    ) -> FieldDecl {
        let (name, number) = fields.allocate(&field_name(&element.name), diagnostics);
        FieldDecl {
            name,
            ty: self.field_type(element.type_name.as_deref(), diagnostics),
            number,
            repeated: allow_repeated && element.max_occurs.is_multiple(),
            xml_name: element.name.clone(),
            binding: XmlBinding::Element,
        }
    }

    fn attribute_field(
        &self,
        attribute: &AttributeDecl,
        fields: &mut FieldAllocator<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Option<FieldDecl> {
        if attribute.name.is_empty() {
            tracing::debug!("Skipping attribute without name in {}", fields.message);
            return None;
        }
        if attribute.use_ == AttributeUse::Prohibited {
            return None;
        }

        let (name, number) = fields.allocate(&field_name(&attribute.name), diagnostics);
        Some(FieldDecl {
            name,
            ty: self.field_type(attribute.type_name.as_deref(), diagnostics),
            number,
            repeated: false,
            xml_name: attribute.name.clone(),
            binding: XmlBinding::Attribute,
        })
    }

    fn field_type(&self, type_name: Option<&str>, diagnostics: &mut Diagnostics) -> TypeRef {
        match type_name {
            Some(qname) if !qname.is_empty() => self.translator.translate(qname, diagnostics),
            _ => TypeRef::Scalar(ScalarType::String),
        }
    }
}

fn has_name(element: &ElementDecl) -> bool {
    if element.name.is_empty() {
        tracing::debug!("Skipping element without name");
        return false;
    }
    true
}

/// Hands out field numbers and message-unique field names.
struct FieldAllocator<'a> {
    namespace: &'a str,
    message: String,
    used: HashSet<String>,
    next_number: u32,
}

impl<'a> FieldAllocator<'a> {
    fn new(namespace: &'a str, message: String) -> Self {
        Self {
            namespace,
            message,
            used: HashSet::new(),
            next_number: 1,
        }
    }

    fn allocate(&mut self, base: &str, diagnostics: &mut Diagnostics) -> (String, u32) {
        let mut name = base.to_string();
        let mut suffix = 1;
        while self.used.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        if name != base {
            diagnostics.push(
                DiagnosticKind::NameCollision,
                self.namespace,
                format!("field {} of {} renamed to {}", base, self.message, name),
            );
        }

        self.used.insert(name.clone());
        let number = self.next_number;
        self.next_number += 1;
        (name, number)
    }
}
