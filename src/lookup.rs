use crate::encoding::Charset;
use crate::errors::ConvertError;
use crate::model::{LookupEntry, LookupTable};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Reads a lookup table: one `<match><delimiter><replacement>` row per line, in file order.
///
/// Blank lines are skipped. Fields are trimmed and empty ones dropped before counting, so a
/// row needs two non-blank fields or it fails with `MalformedRow`. Fields past the second
/// are ignored.
pub fn load(path: &Path, delimiter: &str) -> Result<LookupTable, ConvertError> {
    let bytes = fs::read(path).map_err(|err| ConvertError::io(path, err))?;
    let text = Charset::Utf8.decode(&bytes, path)?;

    let table = parse(&text, delimiter, path)?;
    if table.is_empty() {
        warn!("{} has no entries", path.display());
    }
    info!("loaded {} entries from {}", table.len(), path.display());
    Ok(table)
}

pub fn parse(text: &str, delimiter: &str, path: &Path) -> Result<LookupTable, ConvertError> {
    let mut entries = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split(delimiter)
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        match fields.as_slice() {
            [match_text, replacement, rest @ ..] => {
                if !rest.is_empty() {
                    debug!(
                        "{}:{}: ignoring {} extra field(s)",
                        path.display(),
                        index + 1,
                        rest.len()
                    );
                }
                entries.push(LookupEntry::new(match_text, replacement));
            }
            _ => {
                return Err(ConvertError::MalformedRow {
                    path: path.to_path_buf(),
                    line: index + 1,
                    content: line.to_string(),
                })
            }
        }
    }

    Ok(LookupTable::new(entries))
}
