use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::encoding::EncodingKind;

/// Configuration for turning patterns into automata.
///
/// Every field has a default value, so a configuration file only needs to
/// contain the settings that differ from the defaults. For example:
///
/// ```toml
/// [builder]
/// case_sensitive = false
/// encoding = "utf-16le"
///
/// [parser]
/// dot_matches_new_line = false
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Automaton builder configuration.
    pub builder: BuilderConfig,
    /// Parser configuration.
    pub parser: ParserConfig,
}

/// Automaton builder configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderConfig {
    /// If false, ASCII letters in literals and classes match both cases.
    pub case_sensitive: bool,
    /// Encoding used for converting literals into bytes.
    pub encoding: EncodingKind,
    /// Number of vertices reserved in advance in the automaton.
    pub size_hint: usize,
}

/// Parser configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Dot (.) matches newline characters.
    pub dot_matches_new_line: bool,
    /// Patterns are literal strings, not regular expressions.
    pub fixed_string: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            case_sensitive: true,
            encoding: EncodingKind::Ascii,
            size_hint: 0,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { dot_matches_new_line: true, fixed_string: false }
    }
}

/// Load config file from a given path. Path must contain a valid TOML file or
/// this function will propagate the error. Settings missing from the file
/// take their default values.
pub fn load_config_from_file(
    config_file: &Path,
) -> Result<Config, figment::Error> {
    let config: Config =
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file_exact(config_file))
            .extract()?;
    Ok(config)
}

/// Like [`load_config_from_file`], but the TOML document is passed as a
/// string.
pub fn load_config_from_str(toml: &str) -> Result<Config, figment::Error> {
    let config: Config =
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(toml))
            .extract()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::{load_config_from_file, load_config_from_str, Config};
    use crate::encoding::EncodingKind;

    #[test]
    fn defaults() {
        let config = load_config_from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert!(config.builder.case_sensitive);
        assert!(config.parser.dot_matches_new_line);
        assert_eq!(config.builder.encoding, EncodingKind::Ascii);
    }

    #[test]
    fn partial_config() {
        let config = load_config_from_str(
            r#"
[builder]
case_sensitive = false
encoding = "utf-16le"
size_hint = 64
"#,
        )
        .unwrap();

        assert!(!config.builder.case_sensitive);
        assert_eq!(config.builder.encoding, EncodingKind::Utf16Le);
        assert_eq!(config.builder.size_hint, 64);
        assert!(config.parser.dot_matches_new_line);
        assert!(!config.parser.fixed_string);
    }

    #[test]
    fn invalid_config() {
        assert!(load_config_from_str("[builder]\nencoding = \"ebcdic\"")
            .is_err());
        assert!(load_config_from_str("[parser]\nfixed_string = 1").is_err());
    }

    #[test]
    fn config_file() {
        let path = std::env::temp_dir()
            .join(format!("regraph-config-{}.toml", std::process::id()));

        fs::write(&path, "[parser]\nfixed_string = true\n").unwrap();

        let config = load_config_from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(config.parser.fixed_string);
        assert!(config.builder.case_sensitive);

        assert!(load_config_from_file(&path).is_err());
    }
}
