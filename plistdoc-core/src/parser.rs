//! Document entry points: decode a plist source and walk it into a sink.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use log::debug;

use crate::detect::BPLIST_MEDIA_TYPE;
use crate::emitter::emit;
use crate::error::{DecodeError, Result};
use crate::event::ElementKind;
use crate::extractor::{EmbeddedExtractor, SkipEmbedded};
use crate::metadata::Metadata;
use crate::sink::MarkupSink;
use crate::value::ValueTree;
use crate::xhtml::XhtmlDocument;

static SUPPORTED_TYPES: &[&str] = &[BPLIST_MEDIA_TYPE];

// ============================================================================
// Input
// ============================================================================

/// Where a plist document comes from.
pub enum InputSource {
    /// Whole document in memory.
    Bytes(Vec<u8>),
    /// File on disk, decoded directly from the file.
    Path(PathBuf),
    /// Any reader. Buffered to memory first, since decoding needs to seek.
    Reader(Box<dyn Read>),
}

impl InputSource {
    pub fn reader(reader: impl Read + 'static) -> Self {
        InputSource::Reader(Box::new(reader))
    }

    fn decode(self) -> std::result::Result<plist::Value, DecodeError> {
        let value = match self {
            InputSource::Bytes(bytes) => plist::Value::from_reader(Cursor::new(bytes))?,
            InputSource::Path(path) => {
                let file = File::open(&path)?;
                plist::Value::from_reader(BufReader::new(file))?
            }
            InputSource::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                plist::Value::from_reader(Cursor::new(bytes))?
            }
        };
        Ok(value)
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            InputSource::Path(p) => write!(f, "Path({})", p.display()),
            InputSource::Reader(_) => f.write_str("Reader"),
        }
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(bytes: Vec<u8>) -> Self {
        InputSource::Bytes(bytes)
    }
}

impl From<&[u8]> for InputSource {
    fn from(bytes: &[u8]) -> Self {
        InputSource::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        InputSource::Path(path)
    }
}

impl From<&Path> for InputSource {
    fn from(path: &Path) -> Self {
        InputSource::Path(path.to_path_buf())
    }
}

// ============================================================================
// Options
// ============================================================================

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Offer `data` blobs to the extractor. When false every blob is
    /// declined and only its base64 text is written.
    pub extract_embedded: bool,
    /// How deep plists nested in `data` blobs are followed.
    pub max_embedded_depth: usize,
    /// Write document metadata into the XHTML head.
    pub emit_metadata: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            extract_embedded: true,
            max_embedded_depth: 8,
            emit_metadata: true,
        }
    }
}

impl ParseOptions {
    pub fn with_extract_embedded(mut self, extract: bool) -> Self {
        self.extract_embedded = extract;
        self
    }

    pub fn with_max_embedded_depth(mut self, depth: usize) -> Self {
        self.max_embedded_depth = depth;
        self
    }

    pub fn with_emit_metadata(mut self, emit: bool) -> Self {
        self.emit_metadata = emit;
        self
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parser for binary and XML property lists.
#[derive(Debug, Clone, Default)]
pub struct PListParser {
    options: ParseOptions,
}

impl PListParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Media types this parser is registered for.
    pub fn supported_types() -> &'static [&'static str] {
        SUPPORTED_TYPES
    }

    /// Parse a whole document.
    ///
    /// The input is decoded before anything is written, so a decode failure
    /// leaves the sink untouched. The output is an XHTML document whose body
    /// holds exactly one `plist` element.
    pub fn parse(
        &self,
        input: InputSource,
        sink: &mut dyn MarkupSink,
        metadata: &mut Metadata,
        extractor: &mut dyn EmbeddedExtractor,
    ) -> Result<()> {
        debug!("parsing plist document from {:?}", input);
        let root = ValueTree::from_plist(input.decode()?)?;

        let mut xhtml = if self.options.emit_metadata {
            XhtmlDocument::with_metadata(sink, metadata)
        } else {
            XhtmlDocument::new(sink)
        };
        xhtml.start_document()?;
        self.emit_plist(root, &mut xhtml, extractor)?;
        xhtml.end_document()?;
        debug!("finished plist document");
        Ok(())
    }

    /// Parse a document nested inside another one.
    ///
    /// Writes the `plist` element straight into `sink` with no document
    /// events and no XHTML envelope.
    pub fn parse_embedded<R: Read + Seek>(
        &self,
        reader: R,
        sink: &mut dyn MarkupSink,
        _metadata: &mut Metadata,
        extractor: &mut dyn EmbeddedExtractor,
    ) -> Result<()> {
        let value = plist::Value::from_reader(reader).map_err(DecodeError::from)?;
        let root = ValueTree::from_plist(value)?;
        self.emit_plist(root, sink, extractor)
    }

    fn emit_plist(
        &self,
        root: ValueTree,
        sink: &mut dyn MarkupSink,
        extractor: &mut dyn EmbeddedExtractor,
    ) -> Result<()> {
        let plist = ElementKind::Plist.name();
        sink.start_element(plist, &[])?;
        if self.options.extract_embedded {
            emit(root, sink, extractor)?;
        } else {
            emit(root, sink, &mut SkipEmbedded)?;
        }
        sink.end_element(plist)?;
        Ok(())
    }
}

/// Parse a document with default options.
pub fn parse_document(
    input: impl Into<InputSource>,
    sink: &mut dyn MarkupSink,
    metadata: &mut Metadata,
    extractor: &mut dyn EmbeddedExtractor,
) -> Result<()> {
    PListParser::new().parse(input.into(), sink, metadata, extractor)
}
