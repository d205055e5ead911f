//! Gzip-compressed tar archive helpers
//!
//! Building is deterministic: entry headers carry fixed mtime/uid/gid and
//! the gzip stream is written without a filename, so the same inputs always
//! produce byte-identical output.

use crate::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Read;
use std::path::Path;

/// Build a `.tar.gz` from directory paths and (path, contents) file pairs.
///
/// Directories are appended before files so extraction creates the tree in
/// order. Paths are archive-relative and use `/` separators.
pub fn build_tar_gz(dirs: &[&str], files: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for dir in dirs {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        let path = if dir.ends_with('/') {
            dir.to_string()
        } else {
            format!("{}/", dir)
        };
        builder.append_data(&mut header, path, std::io::empty())?;
    }

    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        builder.append_data(&mut header, path, *contents)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

/// Read a single regular-file member out of a `.tar.gz` buffer.
///
/// Fails with [`Error::NotFound`] when no regular file exists at `wanted`,
/// and with [`Error::InvalidInput`] when the buffer is not a readable
/// gzipped tarball.
pub fn read_file_from_tar_gz(bytes: &[u8], wanted: &str) -> Result<Vec<u8>> {
    let decoder = GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);

    let entries = archive
        .entries()
        .map_err(|e| Error::InvalidInput(format!("Unreadable archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::InvalidInput(format!("Unreadable archive: {}", e)))?;

        let path = match entry.path() {
            Ok(path) => path.into_owned(),
            Err(_) => continue,
        };
        let Some(path) = normalize_entry_path(&path) else {
            continue;
        };

        if path == wanted && entry.header().entry_type() == tar::EntryType::Regular {
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents)?;
            return Ok(contents);
        }
    }

    Err(Error::NotFound(format!("No regular file at {} in archive", wanted)))
}

/// Normalize an entry path to a `/`-joined string of its normal components.
///
/// Strips leading `./` and trailing `/`; returns None for paths with no
/// normal components or with non-UTF-8 segments.
pub fn normalize_entry_path(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            std::path::Component::Normal(part) => parts.push(part.to_str()?),
            std::path::Component::CurDir => {}
            // Absolute or parent-escaping paths never match an expected entry
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
