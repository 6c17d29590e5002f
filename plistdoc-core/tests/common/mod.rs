//! Test infrastructure for plistdoc
//!
//! Provides stub collaborators, stochastic tree generation, and event helpers.
#![allow(dead_code)]

mod generators;
mod harness;

pub use generators::Gen;
pub use harness::{
    body, compact, pdict, rebuild, shape_of, to_binary, to_xml, Call, FailingSink,
    RecordingExtractor, Shape,
};
