//! Text encodings used to decode raw line bytes.

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Locale variables consulted for the preferred encoding, in priority order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

/// An ASCII-compatible text encoding.
///
/// Lines are split on the `\n` byte before decoding, which is only sound for
/// encodings where that byte never appears inside a multi-byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Strict UTF-8; invalid sequences are an error.
    #[default]
    Utf8,
    /// 7-bit ASCII; bytes above `0x7f` are an error.
    Ascii,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    /// Resolves the platform's preferred encoding from the locale environment.
    ///
    /// Falls back to UTF-8 when no locale is set, when the locale carries no
    /// codeset (`C`, `POSIX`), or when the codeset is not supported.
    pub fn preferred() -> Self {
        LOCALE_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|value| !value.is_empty())
            .map(|locale| Self::from_locale(&locale))
            .unwrap_or_default()
    }

    /// Extracts the codeset from a locale name such as `de_DE.ISO-8859-1@euro`.
    pub(crate) fn from_locale(locale: &str) -> Self {
        locale
            .split_once('.')
            .map(|(_, rest)| rest.split('@').next().unwrap_or(rest))
            .and_then(|codeset| codeset.parse().ok())
            .unwrap_or_default()
    }

    /// Canonical label of the encoding.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Length of `bytes` without a trailing, still incomplete multi-byte
    /// sequence. Invalid bytes are left in so that decoding reports them.
    pub(crate) fn complete_prefix_len(&self, bytes: &[u8]) -> usize {
        match self {
            Encoding::Utf8 => match std::str::from_utf8(bytes) {
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                _ => bytes.len(),
            },
            Encoding::Ascii | Encoding::Latin1 => bytes.len(),
        }
    }

    /// Decodes one raw line, terminator included.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        match self {
            Encoding::Utf8 => Ok(String::from_utf8(bytes)?),
            Encoding::Ascii => {
                if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(Error::Decode {
                        encoding: self.name(),
                        position,
                    });
                }
                Ok(String::from_utf8(bytes)?)
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");

        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" | "ansi-x3.4-1968" | "646" => Ok(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" | "cp819" => {
                Ok(Encoding::Latin1)
            }
            _ => Err(Error::UnsupportedEncoding {
                label: label.to_string(),
            }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
