//! Roster layout configuration
//!
//! The roster format is positional: labels live in a fixed column, markers
//! in another, day columns start at a fixed index. All of those positions and
//! the display constants of the output are gathered here so they can be
//! overridden from a TOML file.
//!
//! ```toml
//! default_year = 2026
//! first_day_column = 5
//!
//! [fill_font]
//! name = "Segoe UI"
//! size = 8.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sheet::{ColIndex, RowIndex};
use crate::style::Font;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid layout file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid layout: {0}")]
    Invalid(String),
}

/// Font family and size used for written cells
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub size: f64,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn to_font(&self) -> Font {
        Font::new(self.name.clone(), self.size)
    }
}

/// Positions and display constants of a roster sheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Column holding identities, group markers and the substitute ledger
    pub label_column: ColIndex,
    /// Column holding row markers (`Act. jour`, `Hor.`, `Nom`)
    pub marker_column: ColIndex,
    /// First day column
    pub first_day_column: ColIndex,
    /// Last day column used when no day header is found
    pub fallback_last_day_column: ColIndex,
    /// Row holding the day headers
    pub header_row: RowIndex,
    /// Row where a stray `Nom/` header may survive filtering
    pub residual_header_row: RowIndex,
    /// Year used when no `dd/mm/yyyy` date appears in the label column
    pub default_year: i32,
    /// Number of leading columns merged per block
    pub merged_columns: ColIndex,
    /// Rows per schedule block once the name rows are inserted
    pub block_height: u32,
    /// Font of the inserted `Nom` / `Prénom` labels
    pub label_font: FontSpec,
    /// Font of the names written into day columns
    pub fill_font: FontSpec,
    /// Height of an hours row whose ranges fit on one or two lines
    pub hours_row_height: f64,
    /// Height of an hours row with split date fragments or several breaks
    pub hours_row_height_tall: f64,
    /// Width of the identity column in the output
    pub label_column_width: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            label_column: 1,
            marker_column: 4,
            first_day_column: 5,
            fallback_last_day_column: 34,
            header_row: 1,
            residual_header_row: 4,
            default_year: 2025,
            merged_columns: 3,
            block_height: 5,
            label_font: FontSpec::new("Segoe UI", 14.0),
            fill_font: FontSpec::new("Segoe UI", 8.0),
            hours_row_height: 40.0,
            hours_row_height_tall: 80.0,
            label_column_width: 50.0,
        }
    }
}

impl Layout {
    /// Parse a layout from TOML; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let layout: Layout = toml::from_str(input)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load a layout file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject positions that cannot describe a roster
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_column == 0 || self.marker_column == 0 || self.first_day_column == 0 {
            return Err(ConfigError::Invalid("columns are 1-based".into()));
        }
        if self.first_day_column <= self.marker_column {
            return Err(ConfigError::Invalid(format!(
                "first_day_column ({}) must come after marker_column ({})",
                self.first_day_column, self.marker_column
            )));
        }
        if self.fallback_last_day_column < self.first_day_column {
            return Err(ConfigError::Invalid(format!(
                "fallback_last_day_column ({}) is before first_day_column ({})",
                self.fallback_last_day_column, self.first_day_column
            )));
        }
        if self.header_row == 0 {
            return Err(ConfigError::Invalid("header_row is 1-based".into()));
        }
        // Name rows sit at offsets 3 and 4 from the identity row
        if self.block_height < 5 {
            return Err(ConfigError::Invalid(format!(
                "block_height must be at least 5, got {}",
                self.block_height
            )));
        }
        Ok(())
    }

    /// Fallback day range used when the header row is empty
    pub fn fallback_day_columns(&self) -> Vec<ColIndex> {
        (self.first_day_column..=self.fallback_last_day_column).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn default_layout_is_valid() {
        let layout = Layout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.fallback_day_columns().len(), 30);
        assert_eq!(layout.fallback_day_columns().first(), Some(&5));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let layout = Layout::from_toml_str(
            r#"
            default_year = 2026

            [fill_font]
            name = "Calibri"
            size = 9.0
            "#,
        )
        .unwrap();
        assert_eq!(layout.default_year, 2026);
        assert_eq!(layout.fill_font, FontSpec::new("Calibri", 9.0));
        assert_eq!(layout.first_day_column, 5);
        assert_eq!(layout.label_font, FontSpec::new("Segoe UI", 14.0));
    }

    #[test]
    fn invalid_positions_rejected() {
        let err = Layout::from_toml_str("first_day_column = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Layout::from_toml_str("block_height = 3").unwrap_err();
        assert!(err.to_string().contains("block_height"));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = Layout::from_toml_str("default_year = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "label_column_width = 42.0").unwrap();
        let layout = Layout::load(file.path()).unwrap();
        assert_eq!(layout.label_column_width, 42.0);
    }

    #[test]
    fn load_missing_file() {
        let err = Layout::load(Path::new("/nonexistent/layout.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
