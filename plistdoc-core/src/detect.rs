//! Plist format sniffing for embedded blobs.

use memchr::memmem;

/// Bytes of a buffer's head searched for XML plist markers.
const SNIFF_LEN: usize = 1024;

const BINARY_MAGIC: &[u8] = b"bplist00";

/// Media type of binary plists.
pub const BPLIST_MEDIA_TYPE: &str = "application/x-bplist";
/// Media type of XML plists.
pub const XML_PLIST_MEDIA_TYPE: &str = "application/x-plist";
/// Media type recorded for blobs that are not plists.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Encoding of a plist document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlistFormat {
    Binary,
    Xml,
}

impl PlistFormat {
    /// Identify a plist from the start of a buffer.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(BINARY_MAGIC) {
            return Some(PlistFormat::Binary);
        }

        let head = &bytes[..bytes.len().min(SNIFF_LEN)];
        let trimmed = skip_bom_and_space(head);
        if !trimmed.starts_with(b"<") {
            return None;
        }
        if memmem::find(head, b"<plist").is_some()
            || memmem::find(head, b"<!DOCTYPE plist").is_some()
        {
            return Some(PlistFormat::Xml);
        }
        None
    }

    pub fn media_type(self) -> &'static str {
        match self {
            PlistFormat::Binary => BPLIST_MEDIA_TYPE,
            PlistFormat::Xml => XML_PLIST_MEDIA_TYPE,
        }
    }
}

fn skip_bom_and_space(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}
