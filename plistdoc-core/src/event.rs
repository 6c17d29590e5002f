//! Markup events - the output of a plist document walk.
//!
//! This is a SAX-style event model: events are emitted as the walker
//! visits nodes, with no accumulation. Structure is represented by
//! start/end event pairs.
//!
//! A dictionary with one entry emits:
//! ```text
//! Start("dict")
//! Start("key") Text("name") End("key")
//! Start("string") Text("value") End("string")
//! End("dict")
//! ```

use phf::phf_map;

/// Elements of the plist markup vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Plist,
    Dict,
    Key,
    Array,
    Set,
    String,
    Number,
    Date,
    Data,
}

static ELEMENT_NAMES: phf::Map<&'static str, ElementKind> = phf_map! {
    "plist" => ElementKind::Plist,
    "dict" => ElementKind::Dict,
    "key" => ElementKind::Key,
    "array" => ElementKind::Array,
    "set" => ElementKind::Set,
    "string" => ElementKind::String,
    "number" => ElementKind::Number,
    "date" => ElementKind::Date,
    "data" => ElementKind::Data,
};

impl ElementKind {
    /// Element name as written to the markup stream.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Plist => "plist",
            ElementKind::Dict => "dict",
            ElementKind::Key => "key",
            ElementKind::Array => "array",
            ElementKind::Set => "set",
            ElementKind::String => "string",
            ElementKind::Number => "number",
            ElementKind::Date => "date",
            ElementKind::Data => "data",
        }
    }

    /// Look up a plist element by name. XHTML envelope elements return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        ELEMENT_NAMES.get(name).copied()
    }

    /// Check if this element holds child elements rather than text.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ElementKind::Plist | ElementKind::Dict | ElementKind::Array | ElementKind::Set
        )
    }
}

/// An owned markup event, as captured by [`crate::sink::EventRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    StartDocument,
    EndDocument,

    /// Element start with attributes in declaration order.
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },

    /// Element end.
    End {
        name: String,
    },

    /// Character content, unescaped.
    Text(String),
}

impl MarkupEvent {
    /// Element start without attributes.
    pub fn start(name: impl Into<String>) -> Self {
        MarkupEvent::Start {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        MarkupEvent::End { name: name.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        MarkupEvent::Text(content.into())
    }

    /// Element name for start/end events.
    pub fn name(&self) -> Option<&str> {
        match self {
            MarkupEvent::Start { name, .. } | MarkupEvent::End { name } => Some(name),
            _ => None,
        }
    }

    /// Plist element kind for start/end events in the plist vocabulary.
    pub fn element_kind(&self) -> Option<ElementKind> {
        self.name().and_then(ElementKind::from_name)
    }
}
