//! `.ts` catalog reader built on `quick-xml` events.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

use super::error::CatalogError;
use super::model::{
    Catalog,
    Context,
    LENGTH_VARIANT_SEPARATOR,
    Location,
    LocationLine,
    Message,
    TranslationStatus,
};
use crate::types::{
    LineIndex,
    SourcePosition,
};

/// Generic element tree produced from the XML event stream.
#[derive(Debug)]
struct Element {
    /// Tag name.
    name: String,
    /// Unescaped attributes in document order.
    attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    children: Vec<Node>,
    /// Start of the opening tag.
    position: SourcePosition,
}

/// A child of an [`Element`].
#[derive(Debug)]
enum Node {
    /// Nested element
    Element(Element),
    /// Unescaped character data
    Text(String),
}

impl Element {
    /// Value of the attribute `name`.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Text content, with Qt `<byte value="..."/>` escapes resolved.
    ///
    /// Other child elements are not part of the text.
    fn text(&self) -> Result<String, CatalogError> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(chunk) => text.push_str(chunk),
                Node::Element(element) if element.name == "byte" => {
                    text.push(byte_value(element)?);
                }
                Node::Element(_) => {}
            }
        }
        Ok(text)
    }
}

/// Decodes `<byte value="x1b"/>` (hex) or `<byte value="27"/>` (decimal).
fn byte_value(element: &Element) -> Result<char, CatalogError> {
    let raw = element.attribute("value").unwrap_or_default();
    let code = raw.strip_prefix('x').map_or_else(
        || raw.parse::<u32>().ok(),
        |hex| u32::from_str_radix(hex, 16).ok(),
    );

    code.and_then(char::from_u32).ok_or_else(|| CatalogError::InvalidAttribute {
        attribute: "value",
        value: raw.to_string(),
        position: element.position,
    })
}

/// XML end-of-line handling: `\r\n` and a lone `\r` become `\n`.
fn normalize_line_ends(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Decodes raw character data or an attribute value.
///
/// Line ends are normalized before entities are resolved, so `&#13;` still yields a CR.
fn decode_text(raw: &[u8], position: SourcePosition) -> Result<String, CatalogError> {
    let raw = String::from_utf8_lossy(raw);
    let text = quick_xml::escape::unescape(&normalize_line_ends(&raw))
        .map_err(|e| CatalogError::Xml { position, source: e.into() })?
        .into_owned();
    Ok(text)
}

/// Offset of the reader in the input, as `usize`.
fn reader_offset(reader: &Reader<&[u8]>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

/// Starts an element from its opening tag.
fn open_element(start: &BytesStart<'_>, position: SourcePosition) -> Result<Element, CatalogError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| CatalogError::Xml { position, source: e.into() })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        attributes.push((key, decode_text(&attribute.value, position)?));
    }

    Ok(Element { name, attributes, children: Vec::new(), position })
}

/// Hangs a closed element on its parent, or makes it the root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CatalogError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(CatalogError::TrailingContent {
            found: element.name,
            position: element.position,
        });
    }
    *root = Some(element);
    Ok(())
}

/// Builds the element tree. Also reports whether a DOCTYPE was present.
fn build_tree(text: &str) -> Result<(Element, bool), CatalogError> {
    let lines = LineIndex::new(text);
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    let mut has_doctype = false;

    loop {
        let position = lines.position(reader_offset(&reader));
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                let position = lines.position(reader_offset(&reader));
                return Err(CatalogError::Xml { position, source });
            }
        };

        match event {
            Event::Start(start) => stack.push(open_element(&start, position)?),
            Event::Empty(start) => {
                let element = open_element(&start, position)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    continue;
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(chunk) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(decode_text(&chunk.into_inner(), position)?));
                }
            }
            Event::CData(chunk) => {
                if let Some(parent) = stack.last_mut() {
                    let chunk = String::from_utf8_lossy(&chunk.into_inner()).into_owned();
                    parent.children.push(Node::Text(normalize_line_ends(&chunk).into_owned()));
                }
            }
            Event::DocType(_) => has_doctype = true,
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(CatalogError::UnclosedElement { element: open.name });
    }
    let root = root.ok_or(CatalogError::MissingRoot)?;
    Ok((root, has_doctype))
}

/// Returns the single child named `name`, or `None`.
///
/// More than one such child is an error.
fn unique_child<'a>(
    parent: &'a Element,
    parent_name: &'static str,
    name: &'static str,
) -> Result<Option<&'a Element>, CatalogError> {
    let mut found = None;
    for element in parent.elements().filter(|element| element.name == name) {
        if found.is_some() {
            return Err(CatalogError::DuplicateElement {
                element: name,
                parent: parent_name,
                position: element.position,
            });
        }
        found = Some(element);
    }
    Ok(found)
}

/// Like [`unique_child`], but the child must exist.
fn required_child<'a>(
    parent: &'a Element,
    parent_name: &'static str,
    name: &'static str,
) -> Result<&'a Element, CatalogError> {
    unique_child(parent, parent_name, name)?.ok_or(CatalogError::MissingElement {
        element: name,
        parent: parent_name,
        position: parent.position,
    })
}

/// Text of an optional unique child.
fn optional_text(
    parent: &Element,
    parent_name: &'static str,
    name: &'static str,
) -> Result<Option<String>, CatalogError> {
    unique_child(parent, parent_name, name)?.map(Element::text).transpose()
}

/// Reads `<location filename=".." line=".."/>`. Both attributes are optional.
fn read_location(element: &Element) -> Result<Location, CatalogError> {
    let line = element
        .attribute("line")
        .map(|raw| {
            LocationLine::parse(raw).ok_or_else(|| CatalogError::InvalidAttribute {
                attribute: "line",
                value: raw.to_string(),
                position: element.position,
            })
        })
        .transpose()?;

    Ok(Location { filename: element.attribute("filename").map(ToString::to_string), line })
}

/// Text of a `<translation>` or `<numerusform>`.
///
/// `<lengthvariant>` children are joined with [`LENGTH_VARIANT_SEPARATOR`].
fn variant_text(element: &Element) -> Result<String, CatalogError> {
    let variants = element
        .elements()
        .filter(|child| child.name == "lengthvariant")
        .map(Element::text)
        .collect::<Result<Vec<_>, _>>()?;

    if variants.is_empty() {
        return element.text();
    }
    Ok(variants.join(LENGTH_VARIANT_SEPARATOR.to_string().as_str()))
}

/// Fills the translation text, numerus forms and status of `message`.
fn read_translation(element: &Element, message: &mut Message) -> Result<(), CatalogError> {
    if let Some(kind) = element.attribute("type") {
        message.status =
            TranslationStatus::from_attribute(kind).ok_or_else(|| CatalogError::InvalidAttribute {
                attribute: "type",
                value: kind.to_string(),
                position: element.position,
            })?;
    }

    message.numerus_forms = element
        .elements()
        .filter(|child| child.name == "numerusform")
        .map(variant_text)
        .collect::<Result<_, _>>()?;

    // Whitespace between <numerusform>s is layout, not a translation.
    if message.numerus_forms.is_empty() {
        message.translation = variant_text(element)?;
    }
    Ok(())
}

/// Reads one `<message>`.
fn read_message(element: &Element) -> Result<Message, CatalogError> {
    let mut message = Message {
        id: element.attribute("id").map(ToString::to_string),
        numerus: element.attribute("numerus") == Some("yes"),
        source: required_child(element, "message", "source")?.text()?,
        old_source: optional_text(element, "message", "oldsource")?,
        comment: optional_text(element, "message", "comment")?,
        old_comment: optional_text(element, "message", "oldcomment")?,
        extra_comment: optional_text(element, "message", "extracomment")?,
        translator_comment: optional_text(element, "message", "translatorcomment")?,
        position: element.position,
        ..Message::default()
    };

    for child in element.elements() {
        match child.name.as_str() {
            "location" => message.locations.push(read_location(child)?),
            "source" | "oldsource" | "comment" | "oldcomment" | "extracomment"
            | "translatorcomment" | "translation" => {}
            other => tracing::debug!(element = other, "Skipping unknown element in <message>"),
        }
    }

    read_translation(required_child(element, "message", "translation")?, &mut message)?;
    Ok(message)
}

/// Reads one `<context>` with its messages.
fn read_context(element: &Element) -> Result<Context, CatalogError> {
    let name = required_child(element, "context", "name")?.text()?;

    let mut messages = Vec::new();
    for child in element.elements() {
        match child.name.as_str() {
            "message" => messages.push(read_message(child)?),
            "name" => {}
            other => {
                tracing::debug!(element = other, context = %name, "Skipping unknown element in <context>");
            }
        }
    }

    Ok(Context { name, messages, position: element.position })
}

/// Parses the text of a `.ts` document.
///
/// # Errors
/// Returns an error if the document is not well-formed XML or does not follow the
/// `.ts` structure. A catalog either loads completely or not at all.
pub fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let (root, has_doctype) = build_tree(text)?;
    if root.name != "TS" {
        return Err(CatalogError::UnexpectedRoot { found: root.name });
    }

    let mut contexts = Vec::new();
    for child in root.elements() {
        match child.name.as_str() {
            "context" => contexts.push(read_context(child)?),
            other => tracing::debug!(element = other, "Skipping unknown element in <TS>"),
        }
    }

    Ok(Catalog {
        version: root.attribute("version").map(ToString::to_string),
        language: root.attribute("language").map(ToString::to_string),
        source_language: root.attribute("sourcelanguage").map(ToString::to_string),
        has_doctype,
        contexts,
    })
}

/// Reads and parses a `.ts` file.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    tracing::debug!(path = %path.display(), "Loading catalog");
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}
