use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{validator::DEFAULT_ORIGIN_CODES, DatetimeLayouts, QueryMode};

/// Who is running the tool.
///
/// When set, query responses are written to a file named after the operator
/// rather than to a fixed filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Operator identifier, e.g. a staff or student number.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Configuration for validation, querying and output.
///
/// The choices where more than one reasonable behaviour exists (which
/// timestamp layouts are accepted, how range-like query constraints are
/// read) are made here explicitly rather than baked into the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Airport codes a flight may depart from.
    origin_codes: Vec<String>,

    /// Timestamp layouts accepted on input and in queries.
    datetime_layouts: DatetimeLayouts,

    /// How departure, arrival and price constraints are interpreted.
    query_mode: QueryMode,

    /// Operator identity used to name query response files.
    pub operator: Option<Operator>,

    /// Where rejected and skipped input lines are logged.
    pub errors_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin_codes: default_origin_codes(),
            datetime_layouts: DatetimeLayouts::default(),
            query_mode: QueryMode::default(),
            operator: None,
            errors_path: default_errors_path(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the origin allow-list.
    #[must_use]
    pub fn origin_codes(&self) -> &[String] {
        &self.origin_codes
    }

    /// Returns the accepted timestamp layouts.
    #[must_use]
    pub const fn datetime_layouts(&self) -> DatetimeLayouts {
        self.datetime_layouts
    }

    /// Sets the accepted timestamp layouts.
    pub const fn set_datetime_layouts(&mut self, layouts: DatetimeLayouts) {
        self.datetime_layouts = layouts;
    }

    /// Returns the query interpretation.
    #[must_use]
    pub const fn query_mode(&self) -> QueryMode {
        self.query_mode
    }

    /// Sets the query interpretation.
    pub const fn set_query_mode(&mut self, mode: QueryMode) {
        self.query_mode = mode;
    }

    /// Replaces the origin allow-list.
    ///
    /// Codes are normalized to uppercase and duplicates are dropped.
    pub fn set_origin_codes<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.origin_codes.clear();
        for code in codes {
            let code = code.as_ref().to_uppercase();
            if !self.origin_codes.contains(&code) {
                self.origin_codes.push(code);
            }
        }
    }
}

fn default_origin_codes() -> Vec<String> {
    DEFAULT_ORIGIN_CODES.map(String::from).to_vec()
}

fn default_errors_path() -> PathBuf {
    PathBuf::from("errors.txt")
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_origin_codes")]
        origin_codes: Vec<String>,

        #[serde(default)]
        datetime_layouts: DatetimeLayouts,

        #[serde(default)]
        query_mode: QueryMode,

        #[serde(default = "default_errors_path")]
        errors_path: PathBuf,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<Operator>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                origin_codes,
                datetime_layouts,
                query_mode,
                operator,
                errors_path,
            } => {
                let mut config = Self {
                    origin_codes: Vec::new(),
                    datetime_layouts,
                    query_mode,
                    operator,
                    errors_path,
                };
                config.set_origin_codes(origin_codes);
                config
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            origin_codes: config.origin_codes,
            datetime_layouts: config.datetime_layouts,
            query_mode: config.query_mode,
            operator: config.operator,
            errors_path: config.errors_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\norigin_codes = [\"RIX\", \"OSL\"]\ndatetime_layouts = \"compact\"\nquery_mode = \"literal\"\nerrors_path = \"rejects.log\"\n\n[operator]\nid = \"231ADB234\"\nfirst_name = \"Ada\"\nlast_name = \"Lovelace\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.origin_codes(), &["RIX".to_string(), "OSL".to_string()]);
        assert_eq!(config.datetime_layouts(), DatetimeLayouts::Compact);
        assert_eq!(config.query_mode(), QueryMode::Literal);
        assert_eq!(config.errors_path, PathBuf::from("rejects.log"));
        assert_eq!(config.operator.unwrap().first_name, "Ada");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nquery_mode = \"fuzzy\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn loaded_origin_codes_are_normalized() {
        let config: Config =
            toml::from_str("_version = \"1\"\norigin_codes = [\"lhr\", \"LHR\", \"Rix\"]\n")
                .unwrap();
        assert_eq!(config.origin_codes(), &["LHR".to_string(), "RIX".to_string()]);
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("flights.toml");

        let mut config = Config::default();
        config.set_origin_codes(["rix", "RIX", "hel"]);
        config.set_query_mode(QueryMode::Literal);
        config.operator = Some(Operator {
            id: "42".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        });
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.origin_codes(), &["RIX".to_string(), "HEL".to_string()]);
    }
}
