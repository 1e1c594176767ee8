//! XSD document parser.
//!
//! This module parses a single XML Schema document into a
//! [`SchemaDocument`]. Only the constructs the compiler translates are
//! extracted; annotations, groups and other particles are skipped.

use crate::error::ParseError;
use crate::types::{
    AttributeDecl, AttributeUse, ComplexTypeDecl, ContentModel, ElementDecl, ImportDecl,
    IncludeDecl, MaxOccurs, Restriction, SchemaDocument, SimpleContentExtension, SimpleTypeDecl,
};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Parses an XSD document from a string.
///
/// # Arguments
/// * `xml` - XSD document content
///
/// # Returns
/// Parsed schema document or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, the root is not a
/// `schema` element, or the schema has no `targetNamespace`.
pub fn parse_schema_document(xml: &str) -> Result<SchemaDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e)?;
                if name != "schema" {
                    return Err(unexpected_root(&name));
                }
                let mut doc = parse_schema_root(e)?;
                parse_schema_children(&mut reader, &mut doc)?;
                return Ok(doc);
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e)?;
                if name != "schema" {
                    return Err(unexpected_root(&name));
                }
                return parse_schema_root(e);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Err(ParseError::InvalidStructure {
        message: "No schema element found".to_string(),
    })
}

fn unexpected_root(name: &str) -> ParseError {
    ParseError::InvalidStructure {
        message: format!("root element is '{}', expected 'schema'", name),
    }
}

/// Parses the schema root attributes: target namespace and prefix bindings.
fn parse_schema_root(e: &BytesStart<'_>) -> Result<SchemaDocument, ParseError> {
    let mut doc = SchemaDocument::default();

    for (key, value) in attributes(e)? {
        if key == "targetNamespace" {
            doc.target_namespace = value;
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            doc.prefixes.insert(prefix.to_string(), value);
        }
    }

    if doc.target_namespace.trim().is_empty() {
        return Err(ParseError::MissingTargetNamespace);
    }

    Ok(doc)
}

/// Parses the top-level declarations of the schema.
fn parse_schema_children(
    reader: &mut Reader<&[u8]>,
    doc: &mut SchemaDocument,
) -> Result<(), ParseError> {
    for_each_child(reader, |reader, name, e, empty| match name {
        "element" => {
            doc.elements.push(parse_element(reader, e, empty)?);
            Ok(true)
        }
        "complexType" => {
            doc.complex_types.push(parse_complex_type(reader, e, empty)?);
            Ok(true)
        }
        "simpleType" => {
            doc.simple_types.push(parse_simple_type(reader, e, empty)?);
            Ok(true)
        }
        "import" => {
            doc.imports.push(parse_import(e)?);
            Ok(false)
        }
        "include" => {
            doc.includes.push(parse_include(e)?);
            Ok(false)
        }
        _ => Ok(false),
    })
}

/// Parses an element declaration.
fn parse_element(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<ElementDecl, ParseError> {
    let mut element = ElementDecl::new(String::new());

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => element.name = value,
            "type" => element.type_name = Some(value),
            "minOccurs" => {
                element.min_occurs = value
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::invalid_attr("element", "minOccurs", &value))?
            }
            "maxOccurs" => {
                element.max_occurs = MaxOccurs::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("element", "maxOccurs", &value))?
            }
            _ => {}
        }
    }

    if !empty {
        for_each_child(reader, |reader, name, e, empty| match name {
            "complexType" => {
                element.complex_type = Some(Box::new(parse_complex_type(reader, e, empty)?));
                Ok(true)
            }
            _ => Ok(false),
        })?;
    }

    Ok(element)
}

/// Parses a complex type definition (named or anonymous).
fn parse_complex_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<ComplexTypeDecl, ParseError> {
    let mut complex_type = ComplexTypeDecl::default();

    for (key, value) in attributes(e)? {
        if key == "name" {
            complex_type.name = value;
        }
    }

    if empty {
        return Ok(complex_type);
    }

    for_each_child(reader, |reader, name, e, empty| match name {
        "sequence" => {
            complex_type.content = ContentModel::Sequence(parse_particles(reader, empty)?);
            Ok(true)
        }
        "choice" => {
            complex_type.content = ContentModel::Choice(parse_particles(reader, empty)?);
            Ok(true)
        }
        "simpleContent" => {
            if let Some(ext) = parse_simple_content(reader, empty)? {
                complex_type.content = ContentModel::SimpleContent(ext);
            }
            Ok(true)
        }
        "attribute" => {
            complex_type.attributes.push(parse_attribute(reader, e, empty)?);
            Ok(true)
        }
        _ => Ok(false),
    })?;

    Ok(complex_type)
}

/// Parses the direct element children of a `sequence` or `choice`.
///
/// Nested model groups are skipped.
fn parse_particles(
    reader: &mut Reader<&[u8]>,
    empty: bool,
) -> Result<Vec<ElementDecl>, ParseError> {
    let mut elements = Vec::new();
    if empty {
        return Ok(elements);
    }

    for_each_child(reader, |reader, name, e, empty| match name {
        "element" => {
            elements.push(parse_element(reader, e, empty)?);
            Ok(true)
        }
        "sequence" | "choice" | "group" | "any" => {
            tracing::debug!("Skipping nested '{}' particle", name);
            Ok(false)
        }
        _ => Ok(false),
    })?;

    Ok(elements)
}

/// Parses `simpleContent`, returning its extension if present.
fn parse_simple_content(
    reader: &mut Reader<&[u8]>,
    empty: bool,
) -> Result<Option<SimpleContentExtension>, ParseError> {
    if empty {
        return Ok(None);
    }

    let mut extension = None;

    for_each_child(reader, |reader, name, e, empty| match name {
        "extension" => {
            let mut ext = SimpleContentExtension::default();
            for (key, value) in attributes(e)? {
                if key == "base" {
                    ext.base = value;
                }
            }
            if !empty {
                for_each_child(reader, |reader, name, e, empty| match name {
                    "attribute" => {
                        ext.attributes.push(parse_attribute(reader, e, empty)?);
                        Ok(true)
                    }
                    _ => Ok(false),
                })?;
            }
            extension = Some(ext);
            Ok(true)
        }
        _ => Ok(false),
    })?;

    Ok(extension)
}

/// Parses an attribute declaration.
fn parse_attribute(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<AttributeDecl, ParseError> {
    let mut attribute = AttributeDecl::new(String::new());

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => attribute.name = value,
            "type" => attribute.type_name = Some(value),
            "use" => {
                attribute.use_ = AttributeUse::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("attribute", "use", &value))?
            }
            _ => {}
        }
    }

    if !empty {
        skip_to_end(reader)?;
    }

    Ok(attribute)
}

/// Parses a simple type and its enumeration restriction.
fn parse_simple_type(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<SimpleTypeDecl, ParseError> {
    let mut simple_type = SimpleTypeDecl::default();

    for (key, value) in attributes(e)? {
        if key == "name" {
            simple_type.name = value;
        }
    }

    if empty {
        return Ok(simple_type);
    }

    for_each_child(reader, |reader, name, e, empty| match name {
        "restriction" => {
            let mut restriction = Restriction::default();
            for (key, value) in attributes(e)? {
                if key == "base" {
                    restriction.base = value;
                }
            }
            if !empty {
                for_each_child(reader, |_, name, e, _| {
                    if name == "enumeration" {
                        let value = attributes(e)?
                            .into_iter()
                            .find(|(key, _)| key == "value")
                            .map(|(_, value)| value)
                            .ok_or_else(|| ParseError::missing_attr("enumeration", "value"))?;
                        restriction.enumerations.push(value);
                    }
                    Ok(false)
                })?;
            }
            simple_type.restriction = Some(restriction);
            Ok(true)
        }
        _ => Ok(false),
    })?;

    Ok(simple_type)
}

/// Parses an import declaration.
fn parse_import(e: &BytesStart<'_>) -> Result<ImportDecl, ParseError> {
    let mut import = ImportDecl::default();

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "namespace" if !value.is_empty() => import.namespace = Some(value),
            "schemaLocation" if !value.is_empty() => import.schema_location = Some(value),
            _ => {}
        }
    }

    Ok(import)
}

/// Parses an include declaration.
fn parse_include(e: &BytesStart<'_>) -> Result<IncludeDecl, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(key, value)| key == "schemaLocation" && !value.is_empty())
        .map(|(_, schema_location)| IncludeDecl { schema_location })
        .ok_or_else(|| ParseError::missing_attr("include", "schemaLocation"))
}

/// Returns the local (unprefixed) name of a tag.
fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.local_name();
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

/// Collects the attributes of a tag as unescaped `(key, value)` pairs.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut out = Vec::new();

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;
        let value = quick_xml::escape::unescape(raw)?;
        out.push((key.to_string(), value.into_owned()));
    }

    Ok(out)
}

/// Visits each child of the current element until its end tag.
///
/// The callback receives the child's local name and whether it was an
/// empty tag, and returns `true` if it consumed the child's subtree;
/// otherwise the subtree is skipped.
fn for_each_child<F>(reader: &mut Reader<&[u8]>, mut on_child: F) -> Result<(), ParseError>
where
    F: FnMut(&mut Reader<&[u8]>, &str, &BytesStart<'_>, bool) -> Result<bool, ParseError>,
{
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e)?;
                if !on_child(reader, &name, e, false)? {
                    skip_to_end(reader)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e)?;
                on_child(reader, &name, e, true)?;
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
