//! Print the markup events recorded for a plist file, indented by depth.
//!
//!     cargo run --example show_events -- path/to/file.plist

use std::path::PathBuf;

use plistdoc_core::{parse_document, EventRecorder, MarkupEvent, Metadata, NestedPlistExtractor};

fn main() {
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: show_events <file.plist>");
        std::process::exit(2);
    };

    let mut rec = EventRecorder::new();
    let mut extractor = NestedPlistExtractor::new();
    if let Err(e) = parse_document(path, &mut rec, &mut Metadata::new(), &mut extractor) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    let mut depth = 0usize;
    for event in rec.events() {
        if let MarkupEvent::End { .. } = event {
            depth = depth.saturating_sub(1);
        }
        println!("{:width$}{:?}", "", event, width = depth * 2);
        if let MarkupEvent::Start { .. } = event {
            depth += 1;
        }
    }
    eprintln!("{} events, {} nested plists", rec.events().len(), extractor.processed());
}
