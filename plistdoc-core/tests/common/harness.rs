//! Test harness: stub collaborators and event-stream helpers

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use plistdoc_core::{
    format_date, BoxError, EmbeddedExtractor, EmbeddedStream, EventRecorder, MarkupError,
    ElementKind, MarkupEvent, MarkupSink, Metadata, ValueTree,
};
use std::io::Read;

// =============================================================================
// Recording extractor
// =============================================================================

/// One `process` call seen by [`RecordingExtractor`]
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub bytes: Vec<u8>,
    pub top_level: bool,
    pub metadata_was_empty: bool,
}

/// Extractor stub that records what it is asked to do
#[derive(Debug, Default)]
pub struct RecordingExtractor {
    pub accept: bool,
    /// Fail the n-th `process` call (0-based)
    pub fail_on: Option<usize>,
    /// Text written into the sink on each successful call
    pub marker: Option<String>,
    pub asked: std::cell::Cell<usize>,
    pub calls: Vec<Call>,
}

impl RecordingExtractor {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn failing_on(n: usize) -> Self {
        Self {
            accept: true,
            fail_on: Some(n),
            ..Self::default()
        }
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }
}

impl EmbeddedExtractor for RecordingExtractor {
    fn should_process(&self, metadata: &Metadata) -> bool {
        assert!(metadata.is_empty(), "embedded metadata must start empty");
        self.asked.set(self.asked.get() + 1);
        self.accept
    }

    fn process(
        &mut self,
        stream: &mut EmbeddedStream<'_>,
        sink: &mut dyn MarkupSink,
        metadata: &mut Metadata,
        top_level: bool,
    ) -> Result<(), BoxError> {
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        let index = self.calls.len();
        self.calls.push(Call {
            bytes,
            top_level,
            metadata_was_empty: metadata.is_empty(),
        });
        metadata.set("X-Recorded", index.to_string());

        if self.fail_on == Some(index) {
            return Err(format!("extractor failed on blob {}", index).into());
        }
        if let Some(marker) = &self.marker {
            sink.element("p", marker)?;
        }
        Ok(())
    }
}

// =============================================================================
// Failing sink
// =============================================================================

/// Sink that accepts `budget` events, then fails every call
pub struct FailingSink {
    pub inner: EventRecorder,
    budget: usize,
}

impl FailingSink {
    pub fn new(budget: usize) -> Self {
        Self {
            inner: EventRecorder::new(),
            budget,
        }
    }

    fn spend(&mut self) -> Result<(), MarkupError> {
        if self.budget == 0 {
            return Err(MarkupError::Closed("downstream closed".into()));
        }
        self.budget -= 1;
        Ok(())
    }
}

impl MarkupSink for FailingSink {
    fn start_document(&mut self) -> Result<(), MarkupError> {
        self.spend()?;
        self.inner.start_document()
    }

    fn end_document(&mut self) -> Result<(), MarkupError> {
        self.spend()?;
        self.inner.end_document()
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError> {
        self.spend()?;
        self.inner.start_element(name, attrs)
    }

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError> {
        self.spend()?;
        self.inner.end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), MarkupError> {
        self.spend()?;
        self.inner.characters(text)
    }
}

// =============================================================================
// Event helpers
// =============================================================================

/// Events strictly inside the XHTML `body`
pub fn body(events: &[MarkupEvent]) -> &[MarkupEvent] {
    let start = events
        .iter()
        .position(|e| *e == MarkupEvent::start("body"))
        .expect("no <body> start");
    let end = events
        .iter()
        .rposition(|e| *e == MarkupEvent::end("body"))
        .expect("no </body> end");
    &events[start + 1..end]
}

/// Compact rendering: `dict`, `/dict`, `"text"`
pub fn compact(events: &[MarkupEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| match e {
            MarkupEvent::StartDocument => "#doc".to_string(),
            MarkupEvent::EndDocument => "/#doc".to_string(),
            MarkupEvent::Start { name, .. } => name.clone(),
            MarkupEvent::End { name } => format!("/{}", name),
            MarkupEvent::Text(t) => format!("{:?}", t),
        })
        .collect()
}

/// Element-kind view of a tree, with scalars in their rendered text form
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Dict(Vec<(String, Shape)>),
    Array(Vec<Shape>),
    Set(Vec<Shape>),
    String(String),
    Number(String),
    Date(String),
    Data(String),
}

/// What a tree should look like once rendered
pub fn shape_of(tree: &ValueTree) -> Shape {
    match tree {
        ValueTree::Dictionary(entries) => Shape::Dict(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), shape_of(v)))
                .collect(),
        ),
        ValueTree::Sequence(items) => Shape::Array(items.iter().map(shape_of).collect()),
        ValueTree::Set(items) => Shape::Set(items.iter().map(shape_of).collect()),
        ValueTree::Text(s) => Shape::String(s.clone()),
        ValueTree::Number(n) => Shape::Number(n.to_string()),
        ValueTree::Timestamp(d) => Shape::Date(format_date(d)),
        ValueTree::RawData(b) => Shape::Data(STANDARD.encode(b)),
    }
}

/// Rebuild a tree shape from the events of exactly one plist value.
///
/// Panics on anything that is not a well-formed pre-order encoding.
pub fn rebuild(events: &[MarkupEvent]) -> Shape {
    let mut pos = 0;
    let shape = rebuild_at(events, &mut pos);
    assert_eq!(pos, events.len(), "trailing events after value");
    shape
}

fn rebuild_at(events: &[MarkupEvent], pos: &mut usize) -> Shape {
    let name = match &events[*pos] {
        MarkupEvent::Start { name, .. } => name.clone(),
        other => panic!("expected element start at {}, got {:?}", pos, other),
    };
    *pos += 1;

    let kind = ElementKind::from_name(&name)
        .unwrap_or_else(|| panic!("unexpected element <{}>", name));
    if kind.is_container() {
        assert!(
            !matches!(events[*pos], MarkupEvent::Text(_)),
            "text directly inside <{}>",
            name
        );
    }

    let shape = match name.as_str() {
        "dict" => {
            let mut entries = Vec::new();
            while events[*pos] != MarkupEvent::end("dict") {
                assert_eq!(events[*pos], MarkupEvent::start("key"), "key must precede value");
                *pos += 1;
                let key = take_text(events, pos);
                assert_eq!(events[*pos], MarkupEvent::end("key"));
                *pos += 1;
                entries.push((key, rebuild_at(events, pos)));
            }
            Shape::Dict(entries)
        }
        "array" | "set" => {
            let mut items = Vec::new();
            while events[*pos] != MarkupEvent::end(name.as_str()) {
                items.push(rebuild_at(events, pos));
            }
            if name == "array" {
                Shape::Array(items)
            } else {
                Shape::Set(items)
            }
        }
        "string" => Shape::String(take_text(events, pos)),
        "number" => Shape::Number(take_text(events, pos)),
        "date" => Shape::Date(take_text(events, pos)),
        "data" => Shape::Data(take_text(events, pos)),
        other => panic!("unexpected element <{}>", other),
    };

    assert_eq!(events[*pos], MarkupEvent::end(name.as_str()), "unbalanced <{}>", name);
    *pos += 1;
    shape
}

fn take_text(events: &[MarkupEvent], pos: &mut usize) -> String {
    match &events[*pos] {
        MarkupEvent::Text(t) => {
            *pos += 1;
            t.clone()
        }
        _ => String::new(),
    }
}

// =============================================================================
// Plist fixtures
// =============================================================================

pub fn to_binary(value: &plist::Value) -> Vec<u8> {
    let mut buf = Vec::new();
    value.to_writer_binary(&mut buf).unwrap();
    buf
}

pub fn to_xml(value: &plist::Value) -> Vec<u8> {
    let mut buf = Vec::new();
    value.to_writer_xml(&mut buf).unwrap();
    buf
}

/// Build a plist dictionary from pairs
pub fn pdict(entries: Vec<(&str, plist::Value)>) -> plist::Value {
    let mut dict = plist::Dictionary::new();
    for (k, v) in entries {
        dict.insert(k.to_string(), v);
    }
    plist::Value::Dictionary(dict)
}
