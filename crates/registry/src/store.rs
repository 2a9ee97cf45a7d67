//! On-disk registry encoding: a single JSON object mapping channel id to
//! display name.

use std::{collections::HashMap, io, path::Path};

use tracing::{debug, warn};

/// Read the persisted registry. Fails soft: an absent file, an unreadable
/// file, or malformed JSON all yield an empty registry, never an error.
pub fn load(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no registry file, starting empty");
            return HashMap::new();
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable registry file, starting empty");
            return HashMap::new();
        },
    };
    match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed registry file, starting empty");
            HashMap::new()
        },
    }
}

/// Overwrite the persisted registry atomically: serialize into a temp file in
/// the same directory, then rename over the target, so a concurrent `load`
/// never observes a partial write.
pub fn save(path: &Path, registry: &HashMap<String, String>) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        },
        _ => Path::new("."),
    };

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer(tmp.as_file(), registry).map_err(io::Error::from)?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), entries = registry.len(), "registry saved");
    Ok(())
}
