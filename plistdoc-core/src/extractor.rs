//! Embedded extraction - what happens to `data` blobs found in a plist.
//!
//! The walker asks an [`EmbeddedExtractor`] two things about each blob:
//! whether it should be processed at all, and if so, to process it. The
//! extractor may write its own markup into the same sink, which is how a
//! plist nested inside a `data` node ends up inline in the outer document.

use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

use log::{debug, trace};

use crate::detect::{PlistFormat, OCTET_STREAM};
use crate::error::BoxError;
use crate::metadata::{self, Metadata};
use crate::parser::{ParseOptions, PListParser};
use crate::sink::MarkupSink;

/// Policy and processing for embedded blobs.
pub trait EmbeddedExtractor {
    /// Decide whether a blob should be processed. Must not have side effects.
    fn should_process(&self, metadata: &Metadata) -> bool;

    /// Process a blob, writing any output into `sink`.
    ///
    /// `top_level` is false when the output belongs inside an enclosing
    /// document; the extractor must then not start a new document.
    fn process(
        &mut self,
        stream: &mut EmbeddedStream<'_>,
        sink: &mut dyn MarkupSink,
        metadata: &mut Metadata,
        top_level: bool,
    ) -> Result<(), BoxError>;
}

// ============================================================================
// EmbeddedStream
// ============================================================================

/// Seekable view over the bytes of one blob.
///
/// Lives for exactly one `process` call; dropping it releases the view on
/// every exit path.
pub struct EmbeddedStream<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> EmbeddedStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// The whole blob, independent of the read position.
    pub fn as_slice(&self) -> &'a [u8] {
        self.cursor.get_ref()
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}

impl Read for EmbeddedStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl BufRead for EmbeddedStream<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.cursor.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.cursor.consume(amt)
    }
}

impl Seek for EmbeddedStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for EmbeddedStream<'_> {
    fn drop(&mut self) {
        trace!("released embedded stream ({} bytes)", self.len());
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// Extractor that declines every blob.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipEmbedded;

impl EmbeddedExtractor for SkipEmbedded {
    fn should_process(&self, _metadata: &Metadata) -> bool {
        false
    }

    fn process(
        &mut self,
        _stream: &mut EmbeddedStream<'_>,
        _sink: &mut dyn MarkupSink,
        _metadata: &mut Metadata,
        _top_level: bool,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Extractor that renders plists found inside `data` blobs.
///
/// Nested plists are parsed into the enclosing sink inside a
/// `<div class="package-entry">`. Other blobs only get their content type
/// recorded. Nesting stops at `max_depth`.
#[derive(Debug, Clone)]
pub struct NestedPlistExtractor {
    parser: PListParser,
    depth: usize,
    processed: usize,
}

impl NestedPlistExtractor {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            parser: PListParser::with_options(options),
            depth: 0,
            processed: 0,
        }
    }

    /// Number of nested plists rendered so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Current nesting depth; zero outside of `process`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn render_inline(
        &mut self,
        parser: &PListParser,
        stream: &mut EmbeddedStream<'_>,
        sink: &mut dyn MarkupSink,
        metadata: &mut Metadata,
    ) -> Result<(), BoxError> {
        sink.start_element("div", &[("class", "package-entry")])?;
        parser.parse_embedded(&mut *stream, &mut *sink, metadata, self)?;
        sink.end_element("div")?;
        Ok(())
    }
}

impl Default for NestedPlistExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedExtractor for NestedPlistExtractor {
    fn should_process(&self, _metadata: &Metadata) -> bool {
        self.depth < self.parser.options().max_embedded_depth
    }

    fn process(
        &mut self,
        stream: &mut EmbeddedStream<'_>,
        sink: &mut dyn MarkupSink,
        metadata: &mut Metadata,
        top_level: bool,
    ) -> Result<(), BoxError> {
        let Some(format) = PlistFormat::sniff(stream.as_slice()) else {
            metadata.set(metadata::CONTENT_TYPE, OCTET_STREAM);
            trace!("embedded blob of {} bytes is not a plist", stream.len());
            return Ok(());
        };
        metadata.set(metadata::CONTENT_TYPE, format.media_type());
        metadata.set(metadata::EMBEDDED_RESOURCE_TYPE, "INLINE");
        debug!("parsing nested {:?} plist at depth {}", format, self.depth + 1);

        let parser = self.parser.clone();
        self.depth += 1;
        let result = if top_level {
            parser
                .parse(stream.as_slice().to_vec().into(), sink, metadata, self)
                .map_err(BoxError::from)
        } else {
            self.render_inline(&parser, stream, sink, metadata)
        };
        self.depth -= 1;
        result?;

        self.processed += 1;
        Ok(())
    }
}
