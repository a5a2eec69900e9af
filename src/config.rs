//! TOML configuration for new datasets.
//!
//! Every key is optional; missing keys fall back to the defaults listed on
//! [`DatasetSection`].
//!
//! ```toml
//! # lasframe.toml
//! [dataset]
//! format_version = "1.2"
//! point_format = 3
//! unit_scale = [0.01, 0.01, 0.01]
//! system_identifier = "survey rig 2"
//! generating_software = "acquisition suite"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::header::{HeaderError, HeaderModel, Version, IDENTITY_UNIT_SCALE};
use crate::schema::{PointFormat, GENERATING_SOFTWARE};

/// Errors raised while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid TOML for this schema
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Point format id outside 0..=10
    #[error("Unknown point format {0}")]
    UnknownPointFormat(u8),

    /// The configured values do not form a valid header
    #[error("Invalid header settings: {0}")]
    Header(#[from] HeaderError),
}

/// Root of a `lasframe.toml` file
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Settings for newly created datasets
    #[serde(default)]
    pub dataset: DatasetSection,
}

/// The `[dataset]` table
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSection {
    /// LAS version as `"major.minor"` (default `"1.4"`)
    pub format_version: Option<String>,

    /// Point data record format 0..=10 (default 0)
    pub point_format: Option<u8>,

    /// Scale applied to x, y and z (default `[1.0, 1.0, 1.0]`)
    pub unit_scale: Option<[f64; 3]>,

    /// System identifier written to the header (default empty)
    pub system_identifier: Option<String>,

    /// Generating software written to the header (default this crate and version)
    pub generating_software: Option<String>,
}

impl DatasetConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Configured version, or 1.4
    pub fn version(&self) -> Result<Version, ConfigError> {
        match &self.dataset.format_version {
            Some(text) => Ok(text.parse()?),
            None => Ok(Version::default()),
        }
    }

    /// Configured point format, or format 0
    pub fn point_format(&self) -> Result<PointFormat, ConfigError> {
        let id = self.dataset.point_format.unwrap_or(0);
        PointFormat::new(id).ok_or(ConfigError::UnknownPointFormat(id))
    }

    /// Builds an empty header (no points, no records) from the settings
    pub fn header(&self) -> Result<HeaderModel, ConfigError> {
        let section = &self.dataset;
        let header = HeaderModel::new(self.version()?, self.point_format()?)?
            .with_unit_scale(section.unit_scale.unwrap_or(IDENTITY_UNIT_SCALE))?
            .with_system_identifier(section.system_identifier.clone().unwrap_or_default())
            .with_generating_software(
                section
                    .generating_software
                    .clone()
                    .unwrap_or_else(|| GENERATING_SOFTWARE.to_string()),
            );
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [dataset]
            format_version = "1.2"
            point_format = 3
            unit_scale = [0.01, 0.01, 0.001]
            system_identifier = "rig"
            generating_software = "tests"
        "#;

        let config = DatasetConfig::from_str(toml).unwrap();
        let header = config.header().unwrap();
        assert_eq!(header.version(), Version::new(1, 2));
        assert_eq!(header.point_format().id(), 3);
        assert_eq!(header.unit_scale(), [0.01, 0.01, 0.001]);
        assert_eq!(header.system_identifier(), "rig");
        assert_eq!(header.generating_software(), "tests");
        assert_eq!(header.record_length(), 34);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DatasetConfig::from_str("").unwrap();
        assert_eq!(config, DatasetConfig::default());

        let header = config.header().unwrap();
        assert_eq!(header.version(), Version::new(1, 4));
        assert_eq!(header.point_format().id(), 0);
        assert_eq!(header.unit_scale(), IDENTITY_UNIT_SCALE);
        assert_eq!(header.generating_software(), GENERATING_SOFTWARE);
    }

    #[test]
    fn test_invalid_settings() {
        let config = DatasetConfig::from_str("[dataset]\npoint_format = 11").unwrap();
        assert!(matches!(config.header(), Err(ConfigError::UnknownPointFormat(11))));

        let config = DatasetConfig::from_str("[dataset]\nformat_version = \"1.2\"\npoint_format = 6").unwrap();
        assert!(matches!(
            config.header(),
            Err(ConfigError::Header(HeaderError::UnsupportedPointFormat { .. }))
        ));

        let config = DatasetConfig::from_str("[dataset]\nunit_scale = [1.0, -1.0, 1.0]").unwrap();
        assert!(matches!(
            config.header(),
            Err(ConfigError::Header(HeaderError::InvalidUnitScale(_)))
        ));

        assert!(matches!(
            DatasetConfig::from_str("[dataset]\ncolour = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dataset]\npoint_format = 1").unwrap();

        let config = DatasetConfig::from_file(file.path()).unwrap();
        assert_eq!(config.point_format().unwrap().id(), 1);

        let missing = file.path().with_extension("missing");
        assert!(matches!(DatasetConfig::from_file(&missing), Err(ConfigError::Io { .. })));
    }
}
