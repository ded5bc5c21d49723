//! Serializes a [`Catalog`] in the layout `lupdate` writes.

use super::model::{
    Catalog,
    Context,
    LENGTH_VARIANT_SEPARATOR,
    Message,
    length_variants,
};

const INDENT: &str = "    ";

/// Appends `text` as XML character data.
///
/// Control characters other than tab and newline are not allowed in XML 1.0 text and are
/// written as Qt `<byte value="xNN"/>` elements.
fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' => out.push(ch),
            ch if ch.is_ascii_control() && ch != '\u{7f}' => {
                out.push_str(&format!("<byte value=\"x{:x}\"/>", u32::from(ch)));
            }
            ch => out.push(ch),
        }
    }
}

/// Appends ` name="value"` with the value escaped for an attribute.
fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            ch if ch.is_ascii_control() => out.push_str(&format!("&#x{:x};", u32::from(ch))),
            ch => out.push(ch),
        }
    }
    out.push('"');
}

/// Appends `<name>text</name>` on its own line.
fn push_element(out: &mut String, depth: usize, name: &str, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push('<');
    out.push_str(name);
    out.push('>');
    push_text(out, text);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Appends the element only when the text is present.
fn push_optional(out: &mut String, depth: usize, name: &str, text: Option<&String>) {
    if let Some(text) = text {
        push_element(out, depth, name, text);
    }
}

/// Appends the content of a `<translation>` or `<numerusform>` opened at `depth`,
/// followed by its closing tag.
///
/// `type` and other attributes are already written, the opening tag is not yet closed.
fn push_variants(out: &mut String, depth: usize, name: &str, text: &str) {
    if text.contains(LENGTH_VARIANT_SEPARATOR) {
        push_attribute(out, "variants", "yes");
        out.push_str(">\n");
        for variant in length_variants(text) {
            push_element(out, depth + 1, "lengthvariant", variant);
        }
        out.push_str(&INDENT.repeat(depth));
    } else {
        out.push('>');
        push_text(out, text);
    }
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Appends `<translation>` with its status and numerus forms.
fn push_translation(out: &mut String, message: &Message) {
    out.push_str(&INDENT.repeat(2));
    out.push_str("<translation");
    if let Some(kind) = message.status.as_attribute() {
        push_attribute(out, "type", kind);
    }

    if message.numerus_forms.is_empty() {
        push_variants(out, 2, "translation", &message.translation);
        return;
    }

    out.push_str(">\n");
    for form in &message.numerus_forms {
        out.push_str(&INDENT.repeat(3));
        out.push_str("<numerusform");
        push_variants(out, 3, "numerusform", form);
    }
    out.push_str(&INDENT.repeat(2));
    out.push_str("</translation>\n");
}

/// Appends one `<message>` block.
fn push_message(out: &mut String, message: &Message) {
    out.push_str(INDENT);
    out.push_str("<message");
    if let Some(id) = &message.id {
        push_attribute(out, "id", id);
    }
    if message.numerus {
        push_attribute(out, "numerus", "yes");
    }
    out.push_str(">\n");

    for location in &message.locations {
        out.push_str(&INDENT.repeat(2));
        out.push_str("<location");
        if let Some(filename) = &location.filename {
            push_attribute(out, "filename", filename);
        }
        if let Some(line) = location.line {
            push_attribute(out, "line", &line.to_string());
        }
        out.push_str("/>\n");
    }

    push_element(out, 2, "source", &message.source);
    push_optional(out, 2, "oldsource", message.old_source.as_ref());
    push_optional(out, 2, "comment", message.comment.as_ref());
    push_optional(out, 2, "oldcomment", message.old_comment.as_ref());
    push_optional(out, 2, "extracomment", message.extra_comment.as_ref());
    push_optional(out, 2, "translatorcomment", message.translator_comment.as_ref());
    push_translation(out, message);

    out.push_str(INDENT);
    out.push_str("</message>\n");
}

/// Appends one `<context>` block.
fn push_context(out: &mut String, context: &Context) {
    out.push_str("<context>\n");
    push_element(out, 1, "name", &context.name);
    for message in &context.messages {
        push_message(out, message);
    }
    out.push_str("</context>\n");
}

/// Renders the catalog as a `.ts` document.
#[must_use]
pub fn write_catalog(catalog: &Catalog) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    if catalog.has_doctype {
        out.push_str("<!DOCTYPE TS>\n");
    }

    out.push_str("<TS");
    if let Some(version) = &catalog.version {
        push_attribute(&mut out, "version", version);
    }
    if let Some(language) = &catalog.language {
        push_attribute(&mut out, "language", language);
    }
    if let Some(source_language) = &catalog.source_language {
        push_attribute(&mut out, "sourcelanguage", source_language);
    }
    out.push_str(">\n");

    for context in &catalog.contexts {
        push_context(&mut out, context);
    }
    out.push_str("</TS>\n");
    out
}
