//! XHTML output: an XML serializing sink and the document envelope.
//!
//! [`XmlWriter`] turns events into bytes through `quick-xml`.
//! [`XhtmlDocument`] is a decorator placed in front of any sink that wraps
//! a document's content in `html`/`head`/`body`, with the document metadata
//! as `<meta>` entries in the head.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::MarkupError;
use crate::metadata::{self, Metadata};
use crate::sink::MarkupSink;

/// XHTML namespace for the root `html` element.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

// ============================================================================
// XmlWriter
// ============================================================================

/// Sink that serializes events as XML text.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    declaration: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Compact writer that emits an XML declaration on document start.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            declaration: true,
        }
    }

    /// Writer that indents nested elements.
    pub fn indented(inner: W, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
            declaration: true,
        }
    }

    /// Skip the `<?xml ...?>` declaration.
    pub fn without_declaration(mut self) -> Self {
        self.declaration = false;
        self
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> MarkupSink for XmlWriter<W> {
    fn start_document(&mut self) -> Result<(), MarkupError> {
        if self.declaration {
            self.writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), MarkupError> {
        self.writer.get_mut().flush()?;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError> {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.writer.write_event(Event::Start(start))?;
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), MarkupError> {
        if text.is_empty() {
            return Ok(());
        }
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }
}

// ============================================================================
// XhtmlDocument
// ============================================================================

/// Decorator that adds the XHTML envelope around document content.
///
/// Metadata is captured when the decorator is built, so later changes to
/// the record do not reach the head.
pub struct XhtmlDocument<S> {
    inner: S,
    title: String,
    meta: Vec<(String, String)>,
}

impl<S: MarkupSink> XhtmlDocument<S> {
    /// Envelope with an empty head.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            title: String::new(),
            meta: Vec::new(),
        }
    }

    /// Envelope whose head carries the given metadata.
    pub fn with_metadata(inner: S, md: &Metadata) -> Self {
        Self {
            inner,
            title: md.get(metadata::TITLE).unwrap_or_default().to_string(),
            meta: md
                .iter()
                .filter(|(name, _)| *name != metadata::TITLE)
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: MarkupSink> MarkupSink for XhtmlDocument<S> {
    fn start_document(&mut self) -> Result<(), MarkupError> {
        self.inner.start_document()?;
        self.inner.start_element("html", &[("xmlns", XHTML_NS)])?;
        self.inner.start_element("head", &[])?;
        for (name, content) in &self.meta {
            self.inner
                .start_element("meta", &[("name", name.as_str()), ("content", content.as_str())])?;
            self.inner.end_element("meta")?;
        }
        self.inner.element("title", &self.title)?;
        self.inner.end_element("head")?;
        self.inner.start_element("body", &[])
    }

    fn end_document(&mut self) -> Result<(), MarkupError> {
        self.inner.end_element("body")?;
        self.inner.end_element("html")?;
        self.inner.end_document()
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError> {
        self.inner.start_element(name, attrs)
    }

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError> {
        self.inner.end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), MarkupError> {
        self.inner.characters(text)
    }
}
