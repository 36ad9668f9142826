//! symsub_options: `symsub.json` parsing and analyzer options.
//!
//! A project file names the sources to rewrite, the input values used when
//! folding branches, and how rewritten code is printed. Command-line flags
//! override anything read from the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use symsub_printer::PrinterOptions;
use thiserror::Error;

/// Name of the project file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "symsub.json";

/// Output formatting, as written in the project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterSettings {
    pub indent: Option<String>,
    pub new_line: Option<String>,
    pub trailing_newline: Option<bool>,
}

/// The `symsub.json` file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymsubConfig {
    pub printer: Option<PrinterSettings>,
    pub files: Option<Vec<String>>,
    /// Values for the free identifiers of conditional tests.
    pub input: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for '{option}': {reason}")]
    InvalidValue { option: &'static str, reason: String },
}

impl SymsubConfig {
    /// The file `symsub init` writes.
    pub fn default_project() -> Self {
        Self {
            printer: Some(PrinterSettings {
                indent: Some("    ".to_string()),
                new_line: Some("\n".to_string()),
                trailing_newline: Some(false),
            }),
            files: Some(vec!["src/main.js".to_string()]),
            input: Some(serde_json::Map::new()),
        }
    }

    /// Printer options with unset values taken from the defaults.
    pub fn printer_options(&self) -> PrinterOptions {
        let mut options = PrinterOptions::default();
        if let Some(settings) = &self.printer {
            if let Some(indent) = &settings.indent {
                options.indent_str = indent.clone();
            }
            if let Some(new_line) = &settings.new_line {
                options.new_line = new_line.clone();
            }
            if let Some(trailing_newline) = settings.trailing_newline {
                options.trailing_newline = trailing_newline;
            }
        }
        options
    }

    /// Source files, resolved against the directory holding the project file.
    pub fn resolved_files(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.files
            .iter()
            .flatten()
            .map(|file| base_dir.join(file))
            .collect()
    }

    fn validate(&self) -> Result<(), OptionsError> {
        let Some(settings) = &self.printer else {
            return Ok(());
        };
        if let Some(indent) = &settings.indent {
            if !indent.chars().all(|c| c == ' ' || c == '\t') {
                return Err(OptionsError::InvalidValue {
                    option: "printer.indent",
                    reason: "only spaces and tabs are allowed".to_string(),
                });
            }
        }
        if let Some(new_line) = &settings.new_line {
            if new_line != "\n" && new_line != "\r\n" {
                return Err(OptionsError::InvalidValue {
                    option: "printer.newLine",
                    reason: format!("expected \"\\n\" or \"\\r\\n\", found {:?}", new_line),
                });
            }
        }
        Ok(())
    }
}

/// Parse a project file from a string.
pub fn parse_config(content: &str) -> Result<SymsubConfig, OptionsError> {
    let config: SymsubConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Parse a project file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<SymsubConfig, OptionsError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Pretty-printed JSON for a project file, with a trailing newline.
pub fn write_config(config: &SymsubConfig) -> Result<String, OptionsError> {
    let mut text = serde_json::to_string_pretty(config)?;
    text.push('\n');
    Ok(text)
}
