//! Board configuration.
//!
//! Settings are read from a TOML file (by default `flapboard.toml` in the
//! working directory) with environment overrides, then validated and
//! resolved into a [`BoardSpec`].
//!
//! ```toml
//! line_length = 12
//! characters = "abcdefghijklmnopqrstuvwxyz0123456789!?"
//! show_grid = false
//! show_controls = true
//!
//! [[lines]]
//! text = "Hello!"
//! alignment = "left"
//! pad = 1
//! ```

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Alignment, Alphabet, BoardSpec, LineDescriptor, DEFAULT_CHARACTERS, DEFAULT_LINE_LENGTH};
use crate::ui::colors::parse_color;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "flapboard.toml";

/// Environment variable prefix for overrides (`FLAPBOARD__LINE_LENGTH=8`).
pub const ENV_PREFIX: &str = "FLAPBOARD";

/// Longest line the board accepts.
pub const MAX_LINE_LENGTH: usize = 256;

/// Errors that can occur when loading board configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] ::config::ConfigError),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// Line length outside `1..=MAX_LINE_LENGTH`.
    #[error("line length must be between 1 and 256, got {0}")]
    InvalidLineLength(usize),

    /// A line color could not be parsed.
    #[error("line {line}: unrecognised color {color:?}")]
    InvalidColor {
        /// Zero-based line index
        line: usize,
        /// The offending value
        color: String,
    },

    /// The character set contains something a slot cannot show.
    #[error("characters may not contain control characters: {0:?}")]
    InvalidCharacters(String),
}

fn default_lines() -> Vec<LineSettings> {
    vec![
        LineSettings::new("Hello!").with_pad(1),
        LineSettings::new("Fern UI")
            .with_alignment(Alignment::Right)
            .with_pad(2),
        LineSettings::new("Splitflap")
            .with_alignment(Alignment::Right)
            .with_pad(3),
        LineSettings {
            color: Some("hsl(44, 82%, 49%)".to_string()),
            ..LineSettings::new("Component")
                .with_alignment(Alignment::Right)
                .with_pad(4)
        },
    ]
}

fn default_line_length() -> usize {
    DEFAULT_LINE_LENGTH
}

fn default_characters() -> String {
    DEFAULT_CHARACTERS.to_string()
}

fn default_pad() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// One line as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineSettings {
    /// Text shown on play
    pub text: String,
    /// Color string; the terminal foreground when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Edge the text hugs
    #[serde(default)]
    pub alignment: Alignment,
    /// Extra spin cycles per flip
    #[serde(default = "default_pad")]
    pub pad: u32,
}

impl LineSettings {
    /// Left-aligned line with padding factor 1.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            alignment: Alignment::Left,
            pad: default_pad(),
        }
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the padding factor.
    pub fn with_pad(mut self, pad: u32) -> Self {
        self.pad = pad;
        self
    }

    /// Characters of the text the alphabet cannot show, in order, without
    /// repeats.
    pub fn unshowable(&self, alphabet: &Alphabet, fold_case: bool) -> String {
        let mut missing = String::new();
        for c in self.text.chars() {
            let c = if fold_case { c.to_lowercase().next().unwrap_or(c) } else { c };
            if !alphabet.contains(c) && !missing.contains(c) {
                missing.push(c);
            }
        }
        missing
    }

    /// Parse a `TEXT[:left|right[:PAD]]` descriptor.
    ///
    /// Trailing segments that are not an alignment (and pad) stay part of
    /// the text, so `"12:30"` is the text `12:30`.
    pub fn parse_descriptor(input: &str) -> Self {
        let parts: Vec<&str> = input.split(':').collect();
        let alignment_of = |s: &str| match s.to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "right" => Some(Alignment::Right),
            _ => None,
        };

        if parts.len() >= 3 {
            let n = parts.len();
            if let (Some(alignment), Ok(pad)) = (alignment_of(parts[n - 2]), parts[n - 1].parse::<u32>())
            {
                return Self::new(parts[..n - 2].join(":"))
                    .with_alignment(alignment)
                    .with_pad(pad);
            }
        }
        if parts.len() >= 2 {
            let n = parts.len();
            if let Some(alignment) = alignment_of(parts[n - 1]) {
                return Self::new(parts[..n - 1].join(":")).with_alignment(alignment);
            }
        }
        Self::new(input)
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardSettings {
    /// Slots per line
    #[serde(default = "default_line_length")]
    pub line_length: usize,
    /// Characters the slots cycle through
    #[serde(default = "default_characters")]
    pub characters: String,
    /// Draw the background grid
    #[serde(default)]
    pub show_grid: bool,
    /// Offer the Play and Blank actions
    #[serde(default = "default_true")]
    pub show_controls: bool,
    /// Lower-case line text before playing it
    #[serde(default = "default_true")]
    pub fold_case: bool,
    /// Lines, top to bottom
    #[serde(default = "default_lines")]
    pub lines: Vec<LineSettings>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            line_length: default_line_length(),
            characters: default_characters(),
            show_grid: false,
            show_controls: true,
            fold_case: true,
            lines: default_lines(),
        }
    }
}

impl BoardSettings {
    /// Load settings from a TOML file with `FLAPBOARD__` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, the path is not valid
    /// UTF-8, or the contents do not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path_str.to_string()));
        }

        let settings = Self::from_sources(Some(path_str))?;
        tracing::debug!(path = %path.display(), lines = settings.lines.len(), "configuration loaded");
        Ok(settings)
    }

    /// Parse settings from inline TOML, without environment overrides.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from `path`, or from `flapboard.toml` in the working directory
    /// when it exists, or fall back to the defaults. Environment overrides
    /// apply in every case.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        tracing::debug!("no configuration file, using defaults");
        Self::from_sources(None)
    }

    fn from_sources(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Check the settings without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LINE_LENGTH).contains(&self.line_length) {
            return Err(ConfigError::InvalidLineLength(self.line_length));
        }
        if self.characters.chars().any(char::is_control) {
            return Err(ConfigError::InvalidCharacters(self.characters.clone()));
        }
        for (i, line) in self.lines.iter().enumerate() {
            if let Some(color) = &line.color {
                if parse_color(color).is_none() {
                    return Err(ConfigError::InvalidColor {
                        line: i,
                        color: color.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate and resolve into a board spec.
    pub fn to_spec(&self) -> Result<BoardSpec, ConfigError> {
        self.validate()?;
        let alphabet = Alphabet::new(&self.characters);
        let lines = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let missing = line.unshowable(&alphabet, self.fold_case);
                if !missing.is_empty() {
                    tracing::warn!(line = i, missing = %missing, "characters not on the flaps will show as blanks");
                }
                let mut descriptor = LineDescriptor::new(line.text.clone())
                    .with_alignment(line.alignment)
                    .with_pad(line.pad);
                if let Some(color) = line.color.as_deref().and_then(parse_color) {
                    descriptor = descriptor.with_color(color);
                }
                descriptor
            })
            .collect();

        Ok(BoardSpec {
            lines,
            line_length: self.line_length,
            characters: self.characters.clone(),
            show_grid: self.show_grid,
            show_controls: self.show_controls,
            fold_case: self.fold_case,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_unshowable_characters() {
        let alphabet = Alphabet::new("abc");
        let line = LineSettings::new("Ab#c#d");
        assert_eq!(line.unshowable(&alphabet, true), "#d");
        assert_eq!(line.unshowable(&alphabet, false), "A#d");
        assert!(LineSettings::new("cab").unshowable(&alphabet, true).is_empty());
    }

    #[test]
    fn test_defaults_match_demo_board() {
        let settings = BoardSettings::default();
        assert_eq!(settings.line_length, 12);
        assert_eq!(settings.characters, DEFAULT_CHARACTERS);
        assert!(!settings.show_grid);
        assert!(settings.show_controls);
        let texts: Vec<&str> = settings.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello!", "Fern UI", "Splitflap", "Component"]);
        assert_eq!(settings.lines[3].pad, 4);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = BoardSettings::from_toml_str("").unwrap();
        assert_eq!(settings, BoardSettings::default());
    }

    #[test]
    fn test_parse_lines() {
        let settings = BoardSettings::from_toml_str(
            r#"
            line_length = 6
            show_grid = true

            [[lines]]
            text = "Hi"
            alignment = "right"

            [[lines]]
            text = "yo"
            color = "cyan"
            pad = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.line_length, 6);
        assert!(settings.show_grid);
        assert_eq!(settings.lines.len(), 2);
        assert_eq!(settings.lines[0].alignment, Alignment::Right);
        assert_eq!(settings.lines[0].pad, 1);
        assert_eq!(settings.lines[1].color.as_deref(), Some("cyan"));
        assert_eq!(settings.lines[1].pad, 3);
    }

    #[test]
    fn test_bad_alignment_fails_to_parse() {
        let result = BoardSettings::from_toml_str(
            r#"
            [[lines]]
            text = "x"
            alignment = "center"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_line_length() {
        let settings = BoardSettings {
            line_length: 0,
            ..BoardSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidLineLength(0))
        ));
    }

    #[test]
    fn test_validate_color() {
        let mut settings = BoardSettings::default();
        settings.lines[1].color = Some("plaid".to_string());
        match settings.validate() {
            Err(ConfigError::InvalidColor { line, color }) => {
                assert_eq!(line, 1);
                assert_eq!(color, "plaid");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validate_characters() {
        let settings = BoardSettings {
            characters: "ab\ncd".to_string(),
            ..BoardSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_to_spec_resolves_colors() {
        let spec = BoardSettings::default().to_spec().unwrap();
        assert_eq!(spec.lines.len(), 4);
        assert_eq!(spec.lines[0].color, Color::Reset);
        assert_eq!(spec.lines[3].color, Color::Rgb(227, 173, 22));
        assert_eq!(spec.lines[3].alignment, Alignment::Right);
    }

    #[test]
    fn test_load_missing_file() {
        let result = BoardSettings::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(&path, "line_length = 20\ncharacters = \"xyz\"\n").unwrap();

        let settings = BoardSettings::load(&path).unwrap();
        assert_eq!(settings.line_length, 20);
        assert_eq!(settings.characters, "xyz");
        assert_eq!(settings.lines.len(), 4);
    }

    #[test]
    fn test_parse_descriptor() {
        assert_eq!(LineSettings::parse_descriptor("Hello"), LineSettings::new("Hello"));
        assert_eq!(
            LineSettings::parse_descriptor("Hi:right"),
            LineSettings::new("Hi").with_alignment(Alignment::Right)
        );
        assert_eq!(
            LineSettings::parse_descriptor("Gate 4:right:3"),
            LineSettings::new("Gate 4")
                .with_alignment(Alignment::Right)
                .with_pad(3)
        );
        assert_eq!(
            LineSettings::parse_descriptor("12:30"),
            LineSettings::new("12:30")
        );
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let settings = BoardSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("[[lines]]"));
        assert_eq!(BoardSettings::from_toml_str(&text).unwrap(), settings);
    }
}
