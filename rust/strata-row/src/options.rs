//! Text decoding options.

use serde::{Deserialize, Serialize};
use strata_common::{Result, error::Error, verify_arg};

/// Default separators by nesting level: `\x02` for the items of a top-level
/// collection, `\x03` one level deeper (also map key/value), and so on.
pub const DEFAULT_SEPARATORS: [u8; 7] = [2, 3, 4, 5, 6, 7, 8];

pub const DEFAULT_NULL_SEQUENCE: &str = "\\N";

/// Options controlling how text-encoded column values are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDecodeOptions {
    /// Byte sequence that decodes to null at any nesting level.
    pub null_sequence: String,
    /// Collection separators, indexed by nesting level.
    pub separators: Vec<u8>,
    /// Whether an empty collection span decodes to null rather than to an
    /// empty collection. Empty primitive spans are null unless the kind is
    /// string or binary.
    pub empty_as_null: bool,
}

impl Default for TextDecodeOptions {
    fn default() -> Self {
        TextDecodeOptions {
            null_sequence: DEFAULT_NULL_SEQUENCE.to_string(),
            separators: DEFAULT_SEPARATORS.to_vec(),
            empty_as_null: true,
        }
    }
}

impl TextDecodeOptions {
    /// Loads options from a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<TextDecodeOptions> {
        let options: TextDecodeOptions = serde_json::from_str(json)
            .map_err(|e| Error::invalid_arg("options", e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(separators, !self.separators.is_empty());
        let mut seen = [false; 256];
        for &sep in &self.separators {
            if std::mem::replace(&mut seen[sep as usize], true) {
                return Err(Error::invalid_arg(
                    "separators",
                    format!("separator {sep:#04x} appears more than once"),
                ));
            }
        }
        Ok(())
    }

    /// Returns the separator for the given nesting level.
    pub fn separator(&self, level: usize) -> Result<u8> {
        self.separators.get(level).copied().ok_or_else(|| {
            Error::invalid_arg(
                "level",
                format!(
                    "nesting level {level} exceeds the {} configured separators",
                    self.separators.len()
                ),
            )
        })
    }

    pub fn is_null_sequence(&self, bytes: &[u8]) -> bool {
        bytes == self.null_sequence.as_bytes()
    }
}
