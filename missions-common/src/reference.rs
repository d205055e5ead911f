//! Reference archive provider for the extraction mission
//!
//! Builds the canonical downloadable tarball once at startup and extracts
//! the wanted member's bytes from it, so the comparison target is exactly
//! what a user extracting the download will see. Construction is
//! deterministic: the same configuration always yields the same bytes.

use crate::archive::{build_tar_gz, read_file_from_tar_gz};
use crate::config::UntarMissionConfig;
use crate::Result;

/// The canonical tarball served for the extraction mission, plus the
/// expected bytes of the member the user is asked to extract.
#[derive(Debug, Clone)]
pub struct ReferenceArchive {
    tarball_name: String,
    bytes: Vec<u8>,
    wanted_path: String,
    wanted_bytes: Vec<u8>,
}

impl ReferenceArchive {
    /// Build the reference tarball from configuration
    pub fn build(config: &UntarMissionConfig) -> Result<Self> {
        // Cumulative parent prefixes so nested wanted paths extract cleanly
        let mut dirs: Vec<String> = Vec::new();
        if let Some(parent) = config.wanted_file_dir() {
            let mut prefix = String::new();
            for part in parent.split('/') {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(part);
                dirs.push(prefix.clone());
            }
        }
        let dirs: Vec<&str> = dirs.iter().map(String::as_str).collect();

        let bytes = build_tar_gz(
            &dirs,
            &[(config.file_we_want.as_str(), config.file_contents.as_slice())],
        )?;

        // Extract the wanted member back out of the built archive rather
        // than trusting the input bytes; the round trip also proves the
        // member is reachable as a regular file.
        let wanted_bytes = read_file_from_tar_gz(&bytes, &config.file_we_want)?;

        Ok(Self {
            tarball_name: config.tarball_name.clone(),
            bytes,
            wanted_path: config.file_we_want.clone(),
            wanted_bytes,
        })
    }

    /// Filename the tarball is served under
    pub fn tarball_name(&self) -> &str {
        &self.tarball_name
    }

    /// Raw tarball bytes offered for download
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Archive path of the member the user must extract
    pub fn wanted_path(&self) -> &str {
        &self.wanted_path
    }

    /// Expected bytes of the extracted member
    pub fn wanted_bytes(&self) -> &[u8] {
        &self.wanted_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissionConfig;

    #[test]
    fn wanted_bytes_match_configured_contents() {
        let config = MissionConfig::default().untar;
        let reference = ReferenceArchive::build(&config).unwrap();
        assert_eq!(reference.wanted_bytes(), config.file_contents.as_slice());
        assert_eq!(reference.wanted_path(), "ghello-0.4/ghello.c");
        assert_eq!(reference.tarball_name(), "ghello-0.4.tar.gz");
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let config = MissionConfig::default().untar;
        let first = ReferenceArchive::build(&config).unwrap();
        let second = ReferenceArchive::build(&config).unwrap();
        assert_eq!(first.bytes(), second.bytes());
    }

    #[test]
    fn wanted_member_is_extractable_from_served_bytes() {
        let config = MissionConfig::default().untar;
        let reference = ReferenceArchive::build(&config).unwrap();
        let extracted =
            crate::archive::read_file_from_tar_gz(reference.bytes(), reference.wanted_path())
                .unwrap();
        assert_eq!(extracted, reference.wanted_bytes());
    }
}
