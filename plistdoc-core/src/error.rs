//! Error taxonomy for plist document walks.
//!
//! Every failure is fatal for the document being walked: the recursive walk
//! unwinds immediately and nothing is retried. The one non-error early exit
//! is an extractor declining a data blob, which is ordinary control flow.

use thiserror::Error;

/// Boxed error returned by embedded extractors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a document walk.
#[derive(Error, Debug)]
pub enum Error {
    /// The raw input could not be decoded into a value tree.
    #[error("problem parsing root: {0}")]
    Decode(#[from] DecodeError),

    /// The decoder produced a value kind the walker does not know how to render.
    #[error("unsupported plist value: {kind}")]
    UnsupportedShape { kind: &'static str },

    /// The markup sink refused an event.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// The embedded extractor failed while processing a data blob.
    #[error("embedded extraction failed: {0}")]
    Extraction(#[source] BoxError),
}

impl Error {
    /// Wrap an extractor failure.
    pub fn extraction<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Extraction(err.into())
    }
}

/// Decoder-side failures: malformed structure or I/O while reading the source.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Plist(#[from] plist::Error),

    #[error("failed to read plist source: {0}")]
    Io(#[from] std::io::Error),
}

impl From<plist::Error> for Error {
    fn from(err: plist::Error) -> Self {
        Error::Decode(DecodeError::Plist(err))
    }
}

/// A markup sink failed to accept an event.
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("markup write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The sink was already finished or otherwise closed.
    #[error("markup sink closed: {0}")]
    Closed(String),

    /// Element open/close events did not pair up.
    #[error("mismatched end element: expected </{expected}>, got </{found}>")]
    Mismatched { expected: String, found: String },
}
