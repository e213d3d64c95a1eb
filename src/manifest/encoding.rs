//! Byte-order-mark detection for manifest files.
//!
//! modDesc.xml files exported by the GIANTS Editor usually carry a UTF-8 BOM,
//! and hand-edited ones are sometimes saved as UTF-16 by Windows editors.
//! quick-xml only reads UTF-8, so everything is decoded up front.

use std::fs;
use std::path::Path;

use super::ManifestError;

const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Text encoding of a manifest, as announced by its BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf16Le,
    Utf16Be,
    Utf8Bom,
    Utf8,
}

impl TextEncoding {
    /// Length of the BOM that announces this encoding.
    fn bom_len(&self) -> usize {
        match self {
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => 2,
            TextEncoding::Utf8Bom => 3,
            TextEncoding::Utf8 => 0,
        }
    }
}

/// Detect the encoding of a byte buffer from its BOM.
pub fn detect_encoding(bytes: &[u8]) -> TextEncoding {
    if bytes.starts_with(&UTF16_LE_BOM) {
        TextEncoding::Utf16Le
    } else if bytes.starts_with(&UTF16_BE_BOM) {
        TextEncoding::Utf16Be
    } else if bytes.starts_with(&UTF8_BOM) {
        TextEncoding::Utf8Bom
    } else {
        TextEncoding::Utf8
    }
}

/// Read a manifest file into a UTF-8 string.
pub fn read_manifest_text(path: &Path) -> Result<String, ManifestError> {
    let bytes = fs::read(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode_manifest_bytes(&bytes).map_err(|reason| ManifestError::Encoding {
        path: path.to_path_buf(),
        reason,
    })
}

/// Decode raw manifest bytes, returning a short reason on failure.
pub fn decode_manifest_bytes(bytes: &[u8]) -> Result<String, String> {
    let encoding = detect_encoding(bytes);
    let body = &bytes[encoding.bom_len()..];

    match encoding {
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            let codec = if encoding == TextEncoding::Utf16Le {
                encoding_rs::UTF_16LE
            } else {
                encoding_rs::UTF_16BE
            };
            let (text, _, had_errors) = codec.decode(body);
            if had_errors {
                return Err(format!("malformed {}", codec.name()));
            }
            Ok(text.into_owned())
        }
        TextEncoding::Utf8Bom | TextEncoding::Utf8 => String::from_utf8(body.to_vec())
            .map_err(|e| format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to())),
    }
}
