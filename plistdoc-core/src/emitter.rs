//! Depth-first walk of a [`ValueTree`] into markup events.
//!
//! Each node becomes a matched start/end pair; scalars carry one text
//! event. `data` nodes are written as base64 and then offered to the
//! embedded extractor, which may write more markup into the same sink.
//!
//! ```text
//! Dictionary  dict  (key, value)*
//! Sequence    array value*
//! Set         set   value*
//! Text        string  characters
//! Number      number  canonical text
//! Timestamp   date    yyyy-MM-ddTHH:mm:ss+HHmm
//! RawData     data    base64, then extractor
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset};
use log::{debug, trace};

use crate::error::{Error, Result};
use crate::event::ElementKind;
use crate::extractor::{EmbeddedExtractor, EmbeddedStream};
use crate::metadata::Metadata;
use crate::sink::MarkupSink;
use crate::value::ValueTree;

/// `yyyy-MM-ddTHH:mm:ss±HHmm`: numeric offset, never `Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Render a timestamp in its own offset.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Walk `root` into `sink`, dispatching `data` blobs to `extractor`.
///
/// Emits only the tree itself; the enclosing `plist` element and the
/// document events are the caller's.
pub fn emit(
    root: ValueTree,
    sink: &mut dyn MarkupSink,
    extractor: &mut dyn EmbeddedExtractor,
) -> Result<()> {
    TreeEmitter::new(sink, extractor).visit(root)
}

/// Per-walk state: the sink and extractor handles.
///
/// Created for one walk and dropped with it.
pub struct TreeEmitter<'a> {
    sink: &'a mut dyn MarkupSink,
    extractor: &'a mut dyn EmbeddedExtractor,
    depth: usize,
}

impl<'a> TreeEmitter<'a> {
    pub fn new(sink: &'a mut dyn MarkupSink, extractor: &'a mut dyn EmbeddedExtractor) -> Self {
        Self {
            sink,
            extractor,
            depth: 0,
        }
    }

    /// Visit a node and its descendants, consuming it.
    pub fn visit(&mut self, node: ValueTree) -> Result<()> {
        let kind = node.element_kind();
        trace!("visit {} at depth {}", kind.name(), self.depth);

        self.open(kind)?;
        self.depth += 1;
        match node {
            ValueTree::Dictionary(entries) => {
                for (key, value) in entries {
                    self.sink.element(ElementKind::Key.name(), &key)?;
                    self.visit(value)?;
                }
            }
            ValueTree::Sequence(items) | ValueTree::Set(items) => {
                for item in items {
                    self.visit(item)?;
                }
            }
            ValueTree::Text(s) => self.sink.characters(&s)?,
            ValueTree::Number(n) => self.sink.characters(&n.to_string())?,
            ValueTree::Timestamp(date) => self.sink.characters(&format_date(&date))?,
            ValueTree::RawData(bytes) => self.handle_data(&bytes)?,
        }
        self.depth -= 1;
        self.close(kind)
    }

    fn handle_data(&mut self, bytes: &[u8]) -> Result<()> {
        self.sink.characters(&STANDARD.encode(bytes))?;

        let mut metadata = Metadata::new();
        if !self.extractor.should_process(&metadata) {
            trace!("extractor declined {} byte blob", bytes.len());
            return Ok(());
        }

        debug!("dispatching {} byte blob to extractor", bytes.len());
        let mut stream = EmbeddedStream::new(bytes);
        self.extractor
            .process(&mut stream, &mut *self.sink, &mut metadata, false)
            .map_err(Error::Extraction)
    }

    fn open(&mut self, kind: ElementKind) -> Result<()> {
        self.sink.start_element(kind.name(), &[])?;
        Ok(())
    }

    fn close(&mut self, kind: ElementKind) -> Result<()> {
        self.sink.end_element(kind.name())?;
        Ok(())
    }
}
