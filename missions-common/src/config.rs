//! Mission configuration loading
//!
//! Mission constants (wrapper directory name, expected file set, reference
//! tarball name, wanted file path) are loaded once at process start and are
//! immutable afterwards. An optional TOML file overrides the compiled
//! defaults, resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. MISSIONS_CONFIG environment variable
//! 3. Platform config directory (missions/config.toml)
//! 4. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Step name recorded when the tarball-creation mission succeeds
pub const STEP_TAR: &str = "tar";

/// Step name recorded when the extraction mission succeeds
pub const STEP_TAR_EXTRACT: &str = "tar_extract";

const DEFAULT_WRAPPER_DIR_NAME: &str = "myproject-0.1";

const DEFAULT_HELLO_C: &str = "#include <stdio.h>

int main(void)
{
    printf(\"Hello World!\\n\");
    return 0;
}
";

const DEFAULT_MAKEFILE: &str = "hello: hello.c
\tgcc -Wall -o hello hello.c

clean:
\trm -f hello
";

const DEFAULT_TARBALL_NAME: &str = "ghello-0.4.tar.gz";
const DEFAULT_FILE_WE_WANT: &str = "ghello-0.4/ghello.c";

const DEFAULT_GHELLO_C: &str = "#include <stdio.h>

int main(void)
{
    printf(\"Hello, World! I am the greatest hello of all.\\n\");
    return 0;
}
";

/// Configuration for the tarball-creation mission
#[derive(Debug, Clone)]
pub struct TarMissionConfig {
    /// Name of the single top-level directory every entry must live under
    pub wrapper_dir_name: String,
    /// Relative path inside the wrapper directory -> exact expected bytes
    pub files: BTreeMap<String, Vec<u8>>,
}

impl TarMissionConfig {
    /// Full archive path of an expected file (`<wrapper>/<relative>`)
    pub fn expected_path(&self, relative: &str) -> String {
        format!("{}/{}", self.wrapper_dir_name, relative)
    }
}

/// Configuration for the extraction mission
#[derive(Debug, Clone)]
pub struct UntarMissionConfig {
    /// Filename the reference tarball is served under
    pub tarball_name: String,
    /// Archive path of the member the user is asked to extract
    pub file_we_want: String,
    /// Bytes the wanted member carries in the reference tarball
    pub file_contents: Vec<u8>,
}

impl UntarMissionConfig {
    /// Basename of the wanted member (the filename the user re-uploads)
    pub fn wanted_file_name(&self) -> &str {
        self.file_we_want
            .rsplit('/')
            .next()
            .unwrap_or(&self.file_we_want)
    }

    /// Directory component of the wanted member's archive path, if any
    pub fn wanted_file_dir(&self) -> Option<&str> {
        self.file_we_want.rsplit_once('/').map(|(dir, _)| dir)
    }
}

/// Immutable mission configuration, shared across handlers via `Arc`
#[derive(Debug, Clone)]
pub struct MissionConfig {
    pub tar: TarMissionConfig,
    pub untar: UntarMissionConfig,
}

impl Default for MissionConfig {
    fn default() -> Self {
        let mut files = BTreeMap::new();
        files.insert("hello.c".to_string(), DEFAULT_HELLO_C.as_bytes().to_vec());
        files.insert("Makefile".to_string(), DEFAULT_MAKEFILE.as_bytes().to_vec());

        Self {
            tar: TarMissionConfig {
                wrapper_dir_name: DEFAULT_WRAPPER_DIR_NAME.to_string(),
                files,
            },
            untar: UntarMissionConfig {
                tarball_name: DEFAULT_TARBALL_NAME.to_string(),
                file_we_want: DEFAULT_FILE_WE_WANT.to_string(),
                file_contents: DEFAULT_GHELLO_C.as_bytes().to_vec(),
            },
        }
    }
}

/// TOML representation: every field optional, merged onto the defaults
#[derive(Debug, Deserialize)]
struct ConfigFile {
    tar: Option<TarSection>,
    untar: Option<UntarSection>,
}

#[derive(Debug, Deserialize)]
struct TarSection {
    wrapper_dir_name: Option<String>,
    /// File contents are given as TOML strings
    files: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct UntarSection {
    tarball_name: Option<String>,
    file_we_want: Option<String>,
    /// Contents of the wanted member, given as a TOML string
    file_contents: Option<String>,
}

impl MissionConfig {
    /// Load configuration following the priority order above
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_file(cli_path) {
            Some(path) => {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a TOML override document and merge it onto the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;

        let mut config = Self::default();

        if let Some(tar) = file.tar {
            if let Some(name) = tar.wrapper_dir_name {
                config.tar.wrapper_dir_name = name;
            }
            if let Some(files) = tar.files {
                config.tar.files = files
                    .into_iter()
                    .map(|(path, contents)| (path, contents.into_bytes()))
                    .collect();
            }
        }

        if let Some(untar) = file.untar {
            if let Some(name) = untar.tarball_name {
                config.untar.tarball_name = name;
            }
            if let Some(path) = untar.file_we_want {
                config.untar.file_we_want = path;
            }
            if let Some(contents) = untar.file_contents {
                config.untar.file_contents = contents.into_bytes();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no mission could be completed against
    fn validate(&self) -> Result<()> {
        if self.tar.wrapper_dir_name.is_empty() || self.tar.wrapper_dir_name.contains('/') {
            return Err(Error::Config(format!(
                "Invalid wrapper directory name: {:?}",
                self.tar.wrapper_dir_name
            )));
        }
        if self.tar.files.is_empty() {
            return Err(Error::Config(
                "Tar mission requires at least one expected file".to_string(),
            ));
        }
        if self.untar.file_we_want.is_empty() {
            return Err(Error::Config(
                "Extraction mission requires a wanted file path".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the config file path, if any exists
///
/// Priority: CLI argument, then MISSIONS_CONFIG, then the platform config
/// directory. Returns None when no file is configured (defaults apply).
fn resolve_config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("MISSIONS_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Platform config directory
    if let Some(path) = dirs::config_dir().map(|d| d.join("missions").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    None
}
