//! plistdoc core
//!
//! Renders Apple property lists (binary or XML) as a stream of XHTML markup
//! events, handing any embedded `data` blobs to a pluggable extractor.
//!
//! # Architecture
//!
//! - **parser.rs** - Document entry points, input sources, options
//! - **emitter.rs** - Depth-first walk of a value tree into markup events
//! - **value.rs** - Closed value tree converted from decoder output
//! - **event.rs** - Markup events and the plist element vocabulary
//! - **sink.rs** - MarkupSink trait and the in-memory recorder
//! - **xhtml.rs** - XML writer and the XHTML document envelope
//! - **extractor.rs** - Embedded extraction trait and implementations
//! - **detect.rs** - Plist format sniffing for embedded blobs
//! - **metadata.rs** - Document metadata record
//! - **error.rs** - Error taxonomy
//!
//! # Example
//!
//! ```
//! use plistdoc_core::{parse_document, EventRecorder, Metadata, SkipEmbedded};
//!
//! let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
//! <plist version="1.0"><dict><key>name</key><string>plistdoc</string></dict></plist>"#;
//!
//! let mut sink = EventRecorder::new();
//! parse_document(xml.as_slice(), &mut sink, &mut Metadata::new(), &mut SkipEmbedded).unwrap();
//! assert!(sink.events().iter().any(|e| e.name() == Some("dict")));
//! ```

pub mod detect;
pub mod emitter;
pub mod error;
pub mod event;
pub mod extractor;
pub mod metadata;
pub mod parser;
pub mod sink;
pub mod value;
pub mod xhtml;

pub use detect::PlistFormat;
pub use emitter::{emit, format_date, TreeEmitter, DATE_FORMAT};
pub use error::{BoxError, DecodeError, Error, MarkupError, Result};
pub use event::{ElementKind, MarkupEvent};
pub use extractor::{EmbeddedExtractor, EmbeddedStream, NestedPlistExtractor, SkipEmbedded};
pub use metadata::Metadata;
pub use parser::{parse_document, InputSource, PListParser, ParseOptions};
pub use sink::{EventRecorder, MarkupSink};
pub use value::{Number, ValueTree};
pub use xhtml::{XhtmlDocument, XmlWriter};
