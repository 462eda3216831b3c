//! Text decoding with a prioritized fallback chain.
//!
//! Exports from citation databases arrive in whatever encoding the exporting
//! tool chose. [`decode`] tries each configured encoding in order and uses the
//! first one that decodes the whole document without error.
//!
//! # Example
//!
//! ```
//! use bibmetrics::encoding::{decode, TextEncoding, DEFAULT_ENCODINGS};
//!
//! let (text, used) = decode(b"Caf\xe9", DEFAULT_ENCODINGS).unwrap();
//! assert_eq!(text, "Café");
//! assert_eq!(used, TextEncoding::Windows1252);
//! ```

use crate::{BiblioError, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Encodings the decoder knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Strict UTF-8. A leading byte-order mark is stripped.
    #[serde(rename = "utf-8")]
    Utf8,
    /// UTF-16 with a mandatory little- or big-endian byte-order mark.
    #[serde(rename = "utf-16")]
    Utf16,
    #[serde(rename = "windows-1252")]
    Windows1252,
    /// ISO-8859-1, every byte mapped to the code point of the same value.
    #[serde(rename = "latin-1")]
    Latin1,
}

/// Chain used when the caller does not configure one.
pub const DEFAULT_ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Windows1252,
];

impl TextEncoding {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16 => "UTF-16",
            TextEncoding::Windows1252 => "Windows-1252",
            TextEncoding::Latin1 => "Latin-1",
        }
    }

    /// Decode the whole input, or `None` if it is not valid in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let text = UTF_8.decode_without_bom_handling_and_without_replacement(bytes)?;
                Some(text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string())
            }
            TextEncoding::Utf16 => {
                let (encoding, bom_length) = Encoding::for_bom(bytes)?;
                if encoding != UTF_16LE && encoding != UTF_16BE {
                    return None;
                }
                encoding
                    .decode_without_bom_handling_and_without_replacement(&bytes[bom_length..])
                    .map(|text| text.into_owned())
            }
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode `bytes` with the first encoding of `chain` that accepts them.
///
/// # Errors
///
/// Returns [`BiblioError::Decode`] listing the attempted encodings when none
/// of them succeeds, or when `chain` is empty.
pub fn decode(bytes: &[u8], chain: &[TextEncoding]) -> Result<(String, TextEncoding)> {
    for encoding in chain {
        if let Some(text) = encoding.decode(bytes) {
            debug!(encoding = %encoding, bytes = bytes.len(), "decoded input");
            return Ok((text, *encoding));
        }
        debug!(encoding = %encoding, "encoding rejected input");
    }

    Err(BiblioError::Decode {
        attempted: chain.to_vec(),
    })
}
