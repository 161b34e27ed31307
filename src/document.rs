use crate::encoding::Charset;
use crate::errors::ConvertError;
use crate::model::Document;
use log::info;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

pub fn read_document(path: &Path, charset: Charset) -> Result<Document, ConvertError> {
    let bytes = fs::read(path).map_err(|err| ConvertError::io(path, err))?;
    let document = Document::parse(&charset.decode(&bytes, path)?);
    info!(
        "read {} lines from {}",
        document.lines.len(),
        path.display()
    );
    Ok(document)
}

/// Writes the document next to `path` first and renames it into place, so a failed
/// run never leaves a truncated output behind.
pub fn write_document(
    path: &Path,
    document: &Document,
    charset: Charset,
) -> Result<(), ConvertError> {
    let bytes = charset.encode(&document.render(), path)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Keep an existing output's mode; a fresh one gets 0666 minus the umask like File::create.
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(
            existing
                .clone()
                .unwrap_or_else(|| fs::Permissions::from_mode(0o666)),
        );
    }
    let mut file = builder
        .tempfile_in(dir)
        .map_err(|err| ConvertError::io(dir, err))?;
    if let Some(permissions) = existing {
        fs::set_permissions(file.path(), permissions)
            .map_err(|err| ConvertError::io(file.path(), err))?;
    }
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|err| ConvertError::io(file.path(), err))?;
    file.persist(path)
        .map_err(|err| ConvertError::io(path, err.error))?;

    info!(
        "wrote {} lines to {} as {}",
        document.lines.len(),
        path.display(),
        charset.name()
    );
    Ok(())
}
