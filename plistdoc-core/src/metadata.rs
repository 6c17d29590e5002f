//! Document metadata record.
//!
//! A small ordered multimap of string names to string values. One record
//! belongs to the document being parsed; each embedded blob gets a fresh,
//! empty one.

/// Media type of the document or embedded resource.
pub const CONTENT_TYPE: &str = "Content-Type";
/// File name of an embedded resource, when known.
pub const RESOURCE_NAME: &str = "resourceName";
/// Document title, written to the XHTML `<title>`.
pub const TITLE: &str = "dc:title";
/// How an embedded resource was attached (`ATTACHMENT`, `INLINE`).
pub const EMBEDDED_RESOURCE_TYPE: &str = "embeddedResourceType";

/// Ordered, multi-valued metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, Vec<String>)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the name.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Replace all values for the name with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(i) => self.entries[i].1 = vec![value.into()],
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// First value for the name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .and_then(|i| self.entries[i].1.first())
            .map(String::as_str)
    }

    /// All values for the name, empty if absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(i) => &self.entries[i].1,
            None => &[],
        }
    }

    /// Remove a name and its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Every (name, value) pair, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(n, vs)| vs.iter().map(move |v| (n.as_str(), v.as_str())))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}
