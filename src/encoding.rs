use crate::errors::ConvertError;
use clap::ValueEnum;
use serde_derive::Deserialize;
use std::path::Path;

/// Character sets the converter can read and write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
pub enum Charset {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "iso-8859-1", alias = "latin1", alias = "latin-1", alias = "ISO-8859-1")]
    #[value(name = "iso-8859-1", alias = "latin1", alias = "latin-1")]
    Latin1,
    #[serde(rename = "us-ascii", alias = "ascii", alias = "US-ASCII")]
    #[value(name = "us-ascii", alias = "ascii")]
    Ascii,
}

impl Charset {
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
            Charset::Ascii => "us-ascii",
        }
    }

    pub fn decode(self, bytes: &[u8], path: &Path) -> Result<String, ConvertError> {
        match self {
            Charset::Utf8 => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|err| self.mismatch(path, err.to_string()))?;
                Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(self.mismatch(
                    path,
                    format!("byte 0x{:02x} at offset {offset}", bytes[offset]),
                )),
                None => Ok(bytes.iter().map(|&b| b as char).collect()),
            },
        }
    }

    pub fn encode(self, text: &str, path: &Path) -> Result<Vec<u8>, ConvertError> {
        let limit = match self {
            Charset::Utf8 => return Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => 0xff,
            Charset::Ascii => 0x7f,
        };

        let mut out = Vec::with_capacity(text.len());
        for (line, content) in text.split('\n').enumerate() {
            if line > 0 {
                out.push(b'\n');
            }
            for c in content.chars() {
                if c as u32 > limit {
                    return Err(self.mismatch(
                        path,
                        format!("character {c:?} (U+{:04X}) on line {}", c as u32, line + 1),
                    ));
                }
                out.push(c as u8);
            }
        }
        Ok(out)
    }

    fn mismatch(self, path: &Path, detail: String) -> ConvertError {
        ConvertError::EncodingMismatch {
            path: path.to_path_buf(),
            charset: self,
            detail,
        }
    }
}
