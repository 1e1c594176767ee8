//! proto3 declaration model and rendering.

use crate::translator::TypeRef;

/// How a field maps back onto the XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlBinding {
    /// Child element.
    Element,
    /// Attribute.
    Attribute,
    /// Text content of a simple-content type.
    Text,
}

impl XmlBinding {
    /// Returns the struct tag carried by the `@gotags` annotation.
    #[must_use]
    pub fn tag(&self, xml_name: &str) -> String {
        match self {
            Self::Element => format!("xml:\"{}\"", xml_name),
            Self::Attribute => format!("xml:\"{},attr\"", xml_name),
            Self::Text => "xml:\",chardata\"".to_string(),
        }
    }
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// proto field name.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Field number.
    pub number: u32,
    /// Emitted as `repeated`.
    pub repeated: bool,
    /// Original XSD element or attribute name.
    pub xml_name: String,
    /// XML binding kind.
    pub binding: XmlBinding,
}

impl FieldDecl {
    fn render(&self, indent: &str, output: &mut String) {
        output.push_str(&format!(
            "{}// @gotags: {}\n",
            indent,
            self.binding.tag(&self.xml_name)
        ));
        let label = if self.repeated { "repeated " } else { "" };
        output.push_str(&format!(
            "{}{}{} {} = {};\n",
            indent, label, self.ty, self.name, self.number
        ));
    }
}

/// An exclusive-choice group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDecl {
    /// Group name.
    pub name: String,
    /// Member fields, never repeated.
    pub fields: Vec<FieldDecl>,
}

/// One entry of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageItem {
    /// Plain field.
    Field(FieldDecl),
    /// `oneof` group.
    Oneof(OneofDecl),
}

/// A message declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDecl {
    /// Message name.
    pub name: String,
    /// Body, in emission order.
    pub items: Vec<MessageItem>,
}

impl MessageDecl {
    /// Iterates over every field, including `oneof` members, in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.items.iter().flat_map(|item| match item {
            MessageItem::Field(field) => std::slice::from_ref(field).iter(),
            MessageItem::Oneof(oneof) => oneof.fields.iter(),
        })
    }

    /// Looks up a field by proto name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields().find(|f| f.name == name)
    }

    /// Returns the `oneof` groups.
    pub fn oneofs(&self) -> impl Iterator<Item = &OneofDecl> {
        self.items.iter().filter_map(|item| match item {
            MessageItem::Oneof(oneof) => Some(oneof),
            MessageItem::Field(_) => None,
        })
    }

    /// Renders the declaration.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("message {} {{\n", self.name));

        for item in &self.items {
            match item {
                MessageItem::Field(field) => field.render("  ", &mut output),
                MessageItem::Oneof(oneof) => {
                    output.push_str(&format!("  oneof {} {{\n", oneof.name));
                    for field in &oneof.fields {
                        field.render("    ", &mut output);
                    }
                    output.push_str("  }\n");
                }
            }
        }

        output.push('}');
        output
    }
}

/// An enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name, including the enum prefix.
    pub name: String,
    /// Member value.
    pub number: i32,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
    /// Members, sentinel first.
    pub members: Vec<EnumMember>,
}

impl EnumDecl {
    /// Renders the declaration.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("enum {} {{\n", self.name));
        for member in &self.members {
            output.push_str(&format!("  {} = {};\n", member.name, member.number));
        }
        output.push('}');
        output
    }
}

/// A top-level declaration of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `message`.
    Message(MessageDecl),
    /// `enum`.
    Enum(EnumDecl),
}

impl Declaration {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Message(m) => &m.name,
            Self::Enum(e) => &e.name,
        }
    }

    /// Renders the declaration.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Message(m) => m.render(),
            Self::Enum(e) => e.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::ScalarType;

    fn field(name: &str, number: u32, binding: XmlBinding) -> FieldDecl {
        FieldDecl {
            name: name.to_string(),
            ty: TypeRef::Scalar(ScalarType::String),
            number,
            repeated: false,
            xml_name: name.to_string(),
            binding,
        }
    }

    #[test]
    fn test_binding_tags() {
        assert_eq!(XmlBinding::Element.tag("Title"), r#"xml:"Title""#);
        assert_eq!(XmlBinding::Attribute.tag("IsDefault"), r#"xml:"IsDefault,attr""#);
        assert_eq!(XmlBinding::Text.tag("ignored"), r#"xml:",chardata""#);
    }

    #[test]
    fn test_render_message() {
        let mut title = field("title", 1, XmlBinding::Element);
        title.repeated = true;
        title.xml_name = "Title".to_string();

        let msg = MessageDecl {
            name: "Release".to_string(),
            items: vec![
                MessageItem::Field(title),
                MessageItem::Oneof(OneofDecl {
                    name: "choice".to_string(),
                    fields: vec![field("a", 2, XmlBinding::Element)],
                }),
                MessageItem::Field(field("lang", 3, XmlBinding::Attribute)),
            ],
        };

        let expected = "message Release {
  // @gotags: xml:\"Title\"
  repeated string title = 1;
  oneof choice {
    // @gotags: xml:\"a\"
    string a = 2;
  }
  // @gotags: xml:\"lang,attr\"
  string lang = 3;
}";
        assert_eq!(msg.render(), expected);
        assert_eq!(msg.fields().count(), 3);
        assert_eq!(msg.field("a").map(|f| f.number), Some(2));
        assert_eq!(msg.oneofs().count(), 1);
    }

    #[test]
    fn test_render_enum() {
        let decl = Declaration::Enum(EnumDecl {
            name: "Status".to_string(),
            members: vec![
                EnumMember {
                    name: "STATUS_UNSPECIFIED".to_string(),
                    number: 0,
                },
                EnumMember {
                    name: "STATUS_OK".to_string(),
                    number: 1,
                },
            ],
        });
        assert_eq!(decl.name(), "Status");
        assert_eq!(
            decl.render(),
            "enum Status {\n  STATUS_UNSPECIFIED = 0;\n  STATUS_OK = 1;\n}"
        );
    }
}
