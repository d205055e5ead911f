//! Tarball structure validator for the tar-creation mission
//!
//! Streams once over the archive entries: file contents are read only for
//! paths the mission expects, so memory stays bounded by the expected file
//! set rather than the upload size.

use crate::archive::normalize_entry_path;
use crate::config::TarMissionConfig;
use crate::validators::{ValidationError, ValidationResult};
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::io::Read;
use tracing::debug;

/// Validates that an uploaded `.tar.gz` matches the mission structure:
/// a single correctly-named wrapper directory containing every expected
/// file with exact byte contents. Extra entries are tolerated.
pub struct TarballValidator<'a> {
    mission: &'a TarMissionConfig,
}

impl<'a> TarballValidator<'a> {
    pub fn new(mission: &'a TarMissionConfig) -> Self {
        Self { mission }
    }

    /// Validate raw upload bytes as a gzipped tarball
    pub fn validate(&self, bytes: &[u8]) -> ValidationResult {
        let decoder = GzDecoder::new(bytes);
        let mut archive = tar::Archive::new(decoder);
        let entries = archive
            .entries()
            .map_err(|_| ValidationError::NotAValidArchive)?;

        let wrapper = self.mission.wrapper_dir_name.as_str();
        // Top-level directory names in scan order
        let mut top_level_dirs: Vec<String> = Vec::new();
        // Relative expected path -> actual bytes found in the archive
        let mut found: BTreeMap<String, Vec<u8>> = BTreeMap::new();

        for entry in entries {
            let mut entry = entry.map_err(|_| ValidationError::NotAValidArchive)?;

            let path = match entry.path() {
                Ok(path) => path.into_owned(),
                Err(_) => return Err(ValidationError::NotAValidArchive),
            };
            // Entries like "./" normalize to nothing; they carry no structure
            let Some(path) = normalize_entry_path(&path) else {
                continue;
            };

            let entry_type = entry.header().entry_type();
            let mut parts = path.split('/');
            let top = parts.next().unwrap_or_default().to_string();
            let rest: Vec<&str> = parts.collect();

            if rest.is_empty() {
                if entry_type == tar::EntryType::Directory && !top_level_dirs.contains(&top) {
                    debug!("top-level directory: {}", top);
                    top_level_dirs.push(top);
                }
                continue;
            }

            // Only regular files under the expected wrapper can satisfy a
            // required path; anything else (symlink, directory) does not.
            if entry_type == tar::EntryType::Regular && top == wrapper {
                let relative = rest.join("/");
                if self.mission.files.contains_key(&relative) {
                    let mut contents = Vec::with_capacity(entry.size() as usize);
                    entry
                        .read_to_end(&mut contents)
                        .map_err(|_| ValidationError::NotAValidArchive)?;
                    found.insert(relative, contents);
                }
            }
        }

        if top_level_dirs.is_empty() {
            return Err(ValidationError::MissingWrapperDirectory);
        }
        if !top_level_dirs.iter().any(|dir| dir == wrapper) {
            return Err(ValidationError::WrongWrapperDirectoryName {
                found: top_level_dirs[0].clone(),
            });
        }

        for (relative, expected) in &self.mission.files {
            match found.get(relative) {
                None => {
                    return Err(ValidationError::MissingExpectedFile {
                        path: relative.clone(),
                    })
                }
                Some(actual) if actual != expected => {
                    return Err(ValidationError::IncorrectFileContents {
                        path: relative.clone(),
                    })
                }
                Some(_) => debug!("{} matches expected contents", relative),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::build_tar_gz;
    use crate::config::MissionConfig;

    fn mission() -> TarMissionConfig {
        MissionConfig::default().tar
    }

    /// Archive laid out exactly as the mission expects
    fn good_tarball(mission: &TarMissionConfig) -> Vec<u8> {
        let files: Vec<(String, &[u8])> = mission
            .files
            .iter()
            .map(|(path, contents)| (mission.expected_path(path), contents.as_slice()))
            .collect();
        let files: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(path, contents)| (path.as_str(), *contents))
            .collect();
        build_tar_gz(&[mission.wrapper_dir_name.as_str()], &files).unwrap()
    }

    #[test]
    fn good_tarball_passes() {
        let mission = mission();
        let bytes = good_tarball(&mission);
        TarballValidator::new(&mission).validate(&bytes).unwrap();
    }

    #[test]
    fn missing_wrapper_directory_is_reported() {
        let mission = mission();
        // Files at the top level, no directory entry at all
        let bytes = build_tar_gz(&[], &[("hello.c", b"whatever".as_slice())]).unwrap();
        let err = TarballValidator::new(&mission).validate(&bytes).unwrap_err();
        assert_eq!(err, ValidationError::MissingWrapperDirectory);
    }

    #[test]
    fn arbitrary_bytes_are_rejected() {
        let mission = mission();
        let err = TarballValidator::new(&mission)
            .validate(b"these bytes are neither gzip nor tar")
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAValidArchive);
    }

    #[test]
    fn uncompressed_tar_is_rejected() {
        let mission = mission();
        // A structurally fine tar stream, but never gzipped
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_mtime(0);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{}/", mission.wrapper_dir_name),
                std::io::empty(),
            )
            .unwrap();
        let plain_tar = builder.into_inner().unwrap();

        let err = TarballValidator::new(&mission)
            .validate(&plain_tar)
            .unwrap_err();
        assert_eq!(err, ValidationError::NotAValidArchive);
    }

    #[test]
    fn misnamed_wrapper_directory_is_reported() {
        let mission = mission();
        let files: Vec<(String, Vec<u8>)> = mission
            .files
            .iter()
            .map(|(path, contents)| (format!("wrongname-9.9/{}", path), contents.clone()))
            .collect();
        let files: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
            .collect();
        let bytes = build_tar_gz(&["wrongname-9.9"], &files).unwrap();

        let err = TarballValidator::new(&mission).validate(&bytes).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongWrapperDirectoryName {
                found: "wrongname-9.9".to_string()
            }
        );
    }

    #[test]
    fn altered_file_contents_name_the_offender() {
        let mission = mission();
        let mut entries: Vec<(String, Vec<u8>)> = mission
            .files
            .iter()
            .map(|(path, contents)| (mission.expected_path(path), contents.clone()))
            .collect();
        for (path, contents) in &mut entries {
            if path.ends_with("hello.c") {
                *contents = b"tampered".to_vec();
            }
        }
        let files: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
            .collect();
        let bytes = build_tar_gz(&[mission.wrapper_dir_name.as_str()], &files).unwrap();

        let err = TarballValidator::new(&mission).validate(&bytes).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IncorrectFileContents {
                path: "hello.c".to_string()
            }
        );
    }

    #[test]
    fn missing_expected_file_is_reported() {
        let mission = mission();
        let bytes = build_tar_gz(&[mission.wrapper_dir_name.as_str()], &[]).unwrap();
        let err = TarballValidator::new(&mission).validate(&bytes).unwrap_err();
        assert!(matches!(err, ValidationError::MissingExpectedFile { .. }));
    }

    #[test]
    fn extra_files_are_tolerated() {
        let mission = mission();
        let mut entries: Vec<(String, Vec<u8>)> = mission
            .files
            .iter()
            .map(|(path, contents)| (mission.expected_path(path), contents.clone()))
            .collect();
        entries.push((mission.expected_path("NOTES.txt"), b"scratch".to_vec()));
        let files: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
            .collect();
        let bytes = build_tar_gz(&[mission.wrapper_dir_name.as_str()], &files).unwrap();

        TarballValidator::new(&mission).validate(&bytes).unwrap();
    }

    #[test]
    fn expected_path_that_is_a_directory_counts_as_missing() {
        let mission = mission();
        // Satisfy every expected file except hello.c, which appears as a
        // directory instead of a regular file.
        let mut entries: Vec<(String, Vec<u8>)> = mission
            .files
            .iter()
            .filter(|(path, _)| path.as_str() != "hello.c")
            .map(|(path, contents)| (mission.expected_path(path), contents.clone()))
            .collect();
        entries.push((
            format!("{}/hello.c/inner.txt", mission.wrapper_dir_name),
            b"nested".to_vec(),
        ));
        let files: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
            .collect();
        let dirs = [
            mission.wrapper_dir_name.clone(),
            mission.expected_path("hello.c"),
        ];
        let dirs: Vec<&str> = dirs.iter().map(String::as_str).collect();
        let bytes = build_tar_gz(&dirs, &files).unwrap();

        let err = TarballValidator::new(&mission).validate(&bytes).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingExpectedFile {
                path: "hello.c".to_string()
            }
        );
    }

    #[test]
    fn expected_wrapper_wins_over_extra_top_level_dirs() {
        let mission = mission();
        let mut entries: Vec<(String, Vec<u8>)> = mission
            .files
            .iter()
            .map(|(path, contents)| (mission.expected_path(path), contents.clone()))
            .collect();
        entries.push(("extras/readme.txt".to_string(), b"extra".to_vec()));
        let files: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(path, contents)| (path.as_str(), contents.as_slice()))
            .collect();
        let bytes = build_tar_gz(
            &["extras", mission.wrapper_dir_name.as_str()],
            &files,
        )
        .unwrap();

        TarballValidator::new(&mission).validate(&bytes).unwrap();
    }
}
