//! Decoder for the compressed binary section appended to some presets.
//!
//! The section is a reverse-engineered format with two regions split at the
//! **last** colon of the text:
//!
//! - **Header**: colon/newline separated tokens, each a run of nibble symbols
//!   (`a`..`p` = 0..15, two symbols per byte), plus an optional
//!   `$$$$<digits>` size annotation.
//! - **Payload**: a custom 6-bit alphabet (`!`, `0-9`, `=`, `A-Z`, `a-z`)
//!   packed big-endian into bytes.
//!
//! The split is positional; it holds because the payload alphabet never
//! contains a colon. There is no encoder: generation only copies or swaps
//! whole sections.

use thiserror::Error;

/// Header nibble symbols, value = position.
pub const NIBBLE_ALPHABET: &[u8; 16] = b"abcdefghijklmnop";

/// Payload symbols, value = position.
pub const PAYLOAD_ALPHABET: &[u8; 64] =
    b"!0123456789=ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Prefix of the declared uncompressed size annotation.
pub const SIZE_MARKER: &str = "$$$$";

/// Characters of payload context reported on each side of a bad symbol.
const ERROR_CONTEXT: usize = 8;

/// Binary section decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BinaryError {
    /// Nothing but whitespace.
    #[error("binary section is empty")]
    Empty,

    /// No colon separating header and payload.
    #[error("binary section has no ':' separating header and payload")]
    NoBoundary,

    /// Nothing after the last colon.
    #[error("binary section payload is empty")]
    EmptyPayload,

    /// A payload character outside the alphabet.
    #[error("invalid payload symbol '{symbol}' at position {position} (near \"{context}\")")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// Character position within the payload.
        position: usize,
        /// Payload text surrounding the symbol.
        context: String,
    },
}

/// A decoded header token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Token text as found in the header.
    pub token: String,
    /// Decoded bytes.
    pub bytes: Vec<u8>,
    /// Unsigned big-endian reading, for 1-6 or 8 bytes.
    pub decimal: Option<u64>,
}

/// A decoded binary section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedBinarySection {
    /// Size from the `$$$$<digits>` annotation. Informational only.
    pub declared_uncompressed_size: Option<u64>,
    /// Header tokens that decoded cleanly, in order.
    pub header_fields: Vec<HeaderField>,
    /// Header tokens with symbols outside the nibble alphabet.
    pub undecoded_tokens: Vec<String>,
    /// Concatenated header field bytes.
    pub header_bytes: Vec<u8>,
    /// Decoded payload bytes.
    pub payload_bytes: Vec<u8>,
    /// `header_bytes` followed by `payload_bytes`.
    pub combined_bytes: Vec<u8>,
}

/// Decode a binary section.
///
/// ```rust
/// use patchgen_core::parse_binary_section;
///
/// let parsed = parse_binary_section("bc:$$$$3\n:ABCD").unwrap();
/// assert_eq!(parsed.declared_uncompressed_size, Some(3));
/// assert_eq!(parsed.header_bytes, vec![0x12]);
/// assert_eq!(parsed.payload_bytes.len(), 3);
/// ```
pub fn parse_binary_section(section: &str) -> Result<ParsedBinarySection, BinaryError> {
    let normalized: String = section.chars().filter(|&c| c != '\r').collect();
    let normalized = normalized.trim_end_matches('\0');
    if normalized.trim().is_empty() {
        return Err(BinaryError::Empty);
    }

    let boundary = normalized.rfind(':').ok_or(BinaryError::NoBoundary)?;
    let header_area = &normalized[..boundary];
    let payload_area: String = normalized[boundary + 1..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if payload_area.is_empty() {
        return Err(BinaryError::EmptyPayload);
    }

    let (declared_uncompressed_size, header_area) = extract_size_marker(header_area);

    let mut parsed = ParsedBinarySection {
        declared_uncompressed_size,
        ..ParsedBinarySection::default()
    };
    for token in header_area
        .split([':', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        match decode_nibbles(token) {
            Some(bytes) => {
                parsed.header_bytes.extend_from_slice(&bytes);
                parsed.header_fields.push(HeaderField {
                    token: token.to_string(),
                    decimal: big_endian_decimal(&bytes),
                    bytes,
                });
            }
            None => parsed.undecoded_tokens.push(token.to_string()),
        }
    }

    parsed.payload_bytes = decode_payload(&payload_area)?;
    parsed.combined_bytes = parsed
        .header_bytes
        .iter()
        .chain(&parsed.payload_bytes)
        .copied()
        .collect();
    Ok(parsed)
}

/// Remove the first `$$$$<digits>` fragment, returning its value.
fn extract_size_marker(header: &str) -> (Option<u64>, String) {
    let mut search_from = 0;
    while let Some(offset) = header[search_from..].find(SIZE_MARKER) {
        let start = search_from + offset;
        let digits_start = start + SIZE_MARKER.len();
        let digits_len = header[digits_start..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if digits_len > 0 {
            let end = digits_start + digits_len;
            let size = header[digits_start..end].parse().ok();
            let mut rest = String::with_capacity(header.len());
            rest.push_str(&header[..start]);
            rest.push_str(&header[end..]);
            return (size, rest);
        }
        search_from = digits_start;
    }
    (None, header.to_string())
}

/// Decode a nibble token, `None` if any symbol is outside the alphabet.
///
/// An odd number of nibbles is left-padded with a zero nibble.
pub fn decode_nibbles(token: &str) -> Option<Vec<u8>> {
    let mut nibbles = token
        .bytes()
        .map(|b| NIBBLE_ALPHABET.iter().position(|&s| s == b).map(|v| v as u8))
        .collect::<Option<Vec<u8>>>()?;
    if nibbles.len() % 2 == 1 {
        nibbles.insert(0, 0);
    }
    Some(
        nibbles
            .chunks_exact(2)
            .map(|pair| (pair[0] << 4) | pair[1])
            .collect(),
    )
}

/// Unsigned big-endian value of 1-6 or exactly 8 bytes.
pub fn big_endian_decimal(bytes: &[u8]) -> Option<u64> {
    match bytes.len() {
        1..=6 | 8 => Some(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))),
        _ => None,
    }
}

/// Decode payload text into bytes.
///
/// Each symbol contributes six bits to a big-endian accumulator, drained
/// eight bits at a time. Leftover bits at the end are dropped.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, BinaryError> {
    let mut bytes = Vec::with_capacity(payload.len() * 3 / 4);
    let mut accumulator: u32 = 0;
    let mut bits = 0u32;

    for (position, symbol) in payload.chars().enumerate() {
        let value = payload_value(symbol).ok_or_else(|| BinaryError::InvalidSymbol {
            symbol,
            position,
            context: payload
                .chars()
                .skip(position.saturating_sub(ERROR_CONTEXT))
                .take(ERROR_CONTEXT * 2 + 1)
                .collect(),
        })?;
        accumulator = (accumulator << 6) | u32::from(value);
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            bytes.push((accumulator >> bits) as u8);
            accumulator &= (1 << bits) - 1;
        }
    }
    Ok(bytes)
}

fn payload_value(symbol: char) -> Option<u8> {
    if !symbol.is_ascii() {
        return None;
    }
    PAYLOAD_ALPHABET
        .iter()
        .position(|&s| s == symbol as u8)
        .map(|v| v as u8)
}
