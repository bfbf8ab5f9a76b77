use crate::error::{ReadError, WriteError};
use shared::datamall::ParkingRecord;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replaces `path` with the records as a pretty-printed JSON array.
///
/// The file is written next to its destination and renamed into place, so a
/// failed run leaves the previous file intact.
pub fn write_records(path: &Path, records: &[ParkingRecord]) -> Result<(), WriteError> {
    let json = serde_json::to_vec_pretty(records)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&json)?;
    match fs::metadata(path) {
        Ok(existing) => file.as_file().set_permissions(existing.permissions())?,
        Err(e) if e.kind() == ErrorKind::NotFound => set_shareable_permissions(file.as_file())?,
        Err(e) => return Err(e.into()),
    }
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(())
}

// Temp files are created 0600; the published artifact is read by other users.
#[cfg(unix)]
fn set_shareable_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_shareable_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Reads a JSON array of records. A missing file yields `None`.
pub fn read_records(path: &Path) -> Result<Option<Vec<ParkingRecord>>, ReadError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ReadError::Io {
                path: path.display().to_string(),
                source,
            });
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| ReadError::Deserialize {
            path: path.display().to_string(),
            source,
        })
}
