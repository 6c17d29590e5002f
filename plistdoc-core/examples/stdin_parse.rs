//! Render a plist read from stdin as XHTML on stdout.
//!
//!     cargo run --example stdin_parse < Info.plist
//!
//! Nested plists inside `data` blobs are rendered inline. Set
//! `RUST_LOG=debug` to see the walk.

use std::io::{self, Read};
use std::process::ExitCode;

use plistdoc_core::metadata::RESOURCE_NAME;
use plistdoc_core::{parse_document, Metadata, NestedPlistExtractor, XmlWriter};

fn main() -> ExitCode {
    env_logger::init();

    let mut input = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut input) {
        eprintln!("error reading stdin: {}", e);
        return ExitCode::FAILURE;
    }

    let mut metadata = Metadata::new();
    metadata.set(RESOURCE_NAME, "stdin");
    let mut out = XmlWriter::indented(io::stdout().lock(), 2);
    let mut extractor = NestedPlistExtractor::new();

    match parse_document(input, &mut out, &mut metadata, &mut extractor) {
        Ok(()) => {
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
