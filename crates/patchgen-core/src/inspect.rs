//! Read-only diagnostic view of a decoded binary section.
//!
//! The report exposes the header fields under several numeric readings and an
//! optional dump of the payload, for poking at the format by hand. Nothing here
//! feeds back into generation.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use crate::binary::{BinaryError, HeaderField, ParsedBinarySection, parse_binary_section};

/// Word layout for payload dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordFormat {
    /// Little-endian `u16`.
    U16,
    /// Little-endian `u32`.
    U32,
    /// Little-endian `f32`.
    F32,
}

impl WordFormat {
    /// Bytes per word.
    pub const fn size(self) -> usize {
        match self {
            WordFormat::U16 => 2,
            WordFormat::U32 | WordFormat::F32 => 4,
        }
    }
}

/// What the payload part of a report should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Dump payload words in this layout.
    pub words: Option<WordFormat>,
    /// Maximum number of words to dump.
    pub max_words: usize,
    /// Include the payload re-encoded as standard base64.
    pub include_base64: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            words: None,
            max_words: 64,
            include_base64: false,
        }
    }
}

/// Readings of one header field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderFieldReport {
    /// Token as written.
    pub token: String,
    /// Decoded bytes as lowercase hex.
    pub hex: String,
    /// Number of decoded bytes.
    pub byte_length: usize,
    /// Unsigned big-endian value (1-6 or 8 bytes).
    pub unsigned_be: Option<u64>,
    /// Unsigned little-endian value (1-6 or 8 bytes).
    pub unsigned_le: Option<u64>,
    /// `f32` big-endian (4 bytes only).
    pub float_be: Option<f32>,
    /// `f32` little-endian (4 bytes only).
    pub float_le: Option<f32>,
    /// Text, when every byte is printable ASCII.
    pub ascii: Option<String>,
}

impl HeaderFieldReport {
    fn from_field(field: &HeaderField) -> Self {
        let bytes = &field.bytes;
        let unsigned_le = match bytes.len() {
            1..=6 | 8 => Some(
                bytes
                    .iter()
                    .rev()
                    .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)),
            ),
            _ => None,
        };
        let (float_be, float_le) = match <[u8; 4]>::try_from(bytes.as_slice()) {
            Ok(word) => (Some(f32::from_be_bytes(word)), Some(f32::from_le_bytes(word))),
            Err(_) => (None, None),
        };
        let ascii = (!bytes.is_empty() && bytes.iter().all(|b| (0x20..=0x7E).contains(b)))
            .then(|| bytes.iter().map(|&b| char::from(b)).collect());

        Self {
            token: field.token.clone(),
            hex: to_hex(bytes),
            byte_length: bytes.len(),
            unsigned_be: field.decimal,
            unsigned_le,
            float_be,
            float_le,
            ascii,
        }
    }
}

/// Payload words in the requested layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "values", rename_all = "lowercase")]
pub enum PayloadWords {
    /// Little-endian `u16` words.
    U16(Vec<u16>),
    /// Little-endian `u32` words.
    U32(Vec<u32>),
    /// Little-endian `f32` words.
    F32(Vec<f32>),
}

impl PayloadWords {
    /// Number of words dumped.
    pub fn len(&self) -> usize {
        match self {
            PayloadWords::U16(v) => v.len(),
            PayloadWords::U32(v) => v.len(),
            PayloadWords::F32(v) => v.len(),
        }
    }

    /// Whether no words were dumped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadReport {
    /// Decoded payload length.
    pub byte_length: usize,
    /// Leading words, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<PayloadWords>,
    /// Standard base64 of the payload, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

/// Full diagnostic report of a binary section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryReport {
    /// Declared uncompressed size from the header annotation.
    pub declared_uncompressed_size: Option<u64>,
    /// Header length in bytes.
    pub header_byte_length: usize,
    /// Combined header and payload length in bytes.
    pub combined_byte_length: usize,
    /// Per-field readings.
    pub header_fields: Vec<HeaderFieldReport>,
    /// Tokens outside the nibble alphabet.
    pub undecoded_tokens: Vec<String>,
    /// Payload summary.
    pub payload: PayloadReport,
}

impl BinaryReport {
    /// Build a report from an already decoded section.
    pub fn from_parsed(parsed: &ParsedBinarySection, options: &InspectOptions) -> Self {
        let payload = &parsed.payload_bytes;
        Self {
            declared_uncompressed_size: parsed.declared_uncompressed_size,
            header_byte_length: parsed.header_bytes.len(),
            combined_byte_length: parsed.combined_bytes.len(),
            header_fields: parsed
                .header_fields
                .iter()
                .map(HeaderFieldReport::from_field)
                .collect(),
            undecoded_tokens: parsed.undecoded_tokens.clone(),
            payload: PayloadReport {
                byte_length: payload.len(),
                words: options
                    .words
                    .map(|format| payload_words(payload, format, options.max_words)),
                base64: options.include_base64.then(|| STANDARD.encode(payload)),
            },
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Decode `section` and build its diagnostic report.
pub fn inspect_binary_section(
    section: &str,
    options: &InspectOptions,
) -> Result<BinaryReport, BinaryError> {
    let parsed = parse_binary_section(section)?;
    Ok(BinaryReport::from_parsed(&parsed, options))
}

/// Read up to `max` little-endian words from the start of `bytes`.
pub fn payload_words(bytes: &[u8], format: WordFormat, max: usize) -> PayloadWords {
    let chunks = bytes.chunks_exact(format.size()).take(max);
    match format {
        WordFormat::U16 => {
            PayloadWords::U16(chunks.map(|c| u16::from_le_bytes([c[0], c[1]])).collect())
        }
        WordFormat::U32 => PayloadWords::U32(
            chunks
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        WordFormat::F32 => PayloadWords::F32(
            chunks
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
