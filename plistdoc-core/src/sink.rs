//! Markup sinks - consumers of the walker's events.
//!
//! The walker never writes bytes itself; it pushes open/close/text events
//! into a [`MarkupSink`]. Serialization, escaping and buffering belong to
//! the sink.

use crate::error::MarkupError;
use crate::event::MarkupEvent;

/// Consumer of structured markup events.
///
/// Element events must nest: every `start_element` is matched by an
/// `end_element` with the same name.
pub trait MarkupSink {
    fn start_document(&mut self) -> Result<(), MarkupError>;

    fn end_document(&mut self) -> Result<(), MarkupError>;

    /// Open an element. Attributes are written in slice order.
    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError>;

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError>;

    /// Character content. The sink is responsible for escaping.
    fn characters(&mut self, text: &str) -> Result<(), MarkupError>;

    /// Element with text content and no attributes.
    fn element(&mut self, name: &str, text: &str) -> Result<(), MarkupError> {
        self.start_element(name, &[])?;
        self.characters(text)?;
        self.end_element(name)
    }
}

impl<S: MarkupSink + ?Sized> MarkupSink for &mut S {
    fn start_document(&mut self) -> Result<(), MarkupError> {
        (**self).start_document()
    }

    fn end_document(&mut self) -> Result<(), MarkupError> {
        (**self).end_document()
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError> {
        (**self).start_element(name, attrs)
    }

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError> {
        (**self).end_element(name)
    }

    fn characters(&mut self, text: &str) -> Result<(), MarkupError> {
        (**self).characters(text)
    }
}

// ============================================================================
// EventRecorder
// ============================================================================

/// Sink that keeps every event in memory.
///
/// Checks element nesting as events arrive and refuses events once the
/// document has ended.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<MarkupEvent>,
    open: Vec<String>,
    finished: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> &[MarkupEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<MarkupEvent> {
        self.events
    }

    /// Current element nesting depth.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn push(&mut self, event: MarkupEvent) -> Result<(), MarkupError> {
        if self.finished {
            return Err(MarkupError::Closed("event after end of document".into()));
        }
        self.events.push(event);
        Ok(())
    }
}

impl MarkupSink for EventRecorder {
    fn start_document(&mut self) -> Result<(), MarkupError> {
        self.push(MarkupEvent::StartDocument)
    }

    fn end_document(&mut self) -> Result<(), MarkupError> {
        if let Some(open) = self.open.last() {
            return Err(MarkupError::Mismatched {
                expected: open.clone(),
                found: "#document".into(),
            });
        }
        self.push(MarkupEvent::EndDocument)?;
        self.finished = true;
        Ok(())
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), MarkupError> {
        self.push(MarkupEvent::Start {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), MarkupError> {
        match self.open.pop() {
            Some(open) if open == name => self.push(MarkupEvent::end(name)),
            Some(open) => Err(MarkupError::Mismatched {
                expected: open,
                found: name.to_string(),
            }),
            None => Err(MarkupError::Mismatched {
                expected: String::new(),
                found: name.to_string(),
            }),
        }
    }

    fn characters(&mut self, text: &str) -> Result<(), MarkupError> {
        if text.is_empty() && !self.finished {
            return Ok(());
        }
        // Adjacent text is merged, as a SAX consumer would see it.
        if let Some(MarkupEvent::Text(prev)) = self.events.last_mut() {
            if !self.finished {
                prev.push_str(text);
                return Ok(());
            }
        }
        self.push(MarkupEvent::text(text))
    }
}
