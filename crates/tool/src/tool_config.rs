//! The migration tool's configuration file.
//!
//! The file is an INI document with the migration settings in the `alembic`
//! section and logger, handler and formatter sections after it. It is
//! regenerated on every invocation from the application config and read
//! back by the migration tool CLI and by the stamp step.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use config::{ConfigError, File, FileFormat};
use tracing::debug;

use crate::error::ToolResult;

/// Name of the section holding `script_location` and the database URL.
pub const PRIMARY_SECTION: &str = "alembic";
/// Key of the script directory in the primary section.
pub const SCRIPT_LOCATION_KEY: &str = "script_location";
/// Key of the database URL in the primary section.
pub const DATABASE_URL_KEY: &str = "sqlalchemy.url";

/// Formatter block appended after the generated sections.
const GENERIC_FORMATTER: &str = "[formatter_generic]\n\
datefmt = %H:%M:%S\n\
format = %(levelname)-5.5s [%(name)s] %(message)s\n";

/// One `[name]` block with its `key = value` lines in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    /// Section name without brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a key in this section.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An ordered INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section.
    #[must_use]
    pub fn section<'a>(
        mut self,
        name: &str,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.sections.push(IniSection {
            name: name.to_owned(),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        });
        self
    }

    /// Sections in write order.
    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    /// Looks up `key` in the section called `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)
            .and_then(|s| s.get(key))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds the generated part of the migration tool config.
pub fn tool_config_document(script_location: &Path, database_url: &str) -> IniDocument {
    let script_location = script_location.to_string_lossy().into_owned();

    IniDocument::new()
        .section(
            PRIMARY_SECTION,
            [
                (SCRIPT_LOCATION_KEY, script_location.as_str()),
                (DATABASE_URL_KEY, database_url),
            ],
        )
        .section("loggers", [("keys", "root,sqlalchemy,alembic")])
        .section("handlers", [("keys", "console")])
        .section("formatters", [("keys", "generic, impaf")])
        .section(
            "logger_root",
            [("level", "WARN"), ("handlers", "console"), ("qualname", "")],
        )
        .section(
            "logger_sqlalchemy",
            [("level", "WARN"), ("handlers", ""), ("qualname", "sea_orm")],
        )
        .section(
            "logger_alembic",
            [("level", "INFO"), ("handlers", ""), ("qualname", "dbstrap_tool")],
        )
        .section(
            "handler_console",
            [
                ("class", "StreamHandler"),
                ("args", "(sys.stderr,)"),
                ("level", "NOTSET"),
                ("formatter", "impaf"),
            ],
        )
        .section("formatter_impaf", [("format", "[Alembic] %(message)s")])
}

/// Writes the migration tool config to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_tool_config(
    path: &Path,
    script_location: &Path,
    database_url: &str,
) -> ToolResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut contents = tool_config_document(script_location, database_url).to_string();
    contents.push_str(GENERIC_FORMATTER);
    fs::write(path, contents)?;

    debug!(path = %path.display(), "Wrote migration tool config");
    Ok(())
}

/// A logger declared in the `loggers` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSpec {
    /// Name listed in `loggers.keys`.
    pub name: String,
    /// Python-style level, e.g. `WARN`.
    pub level: String,
    /// Target the level applies to; empty for the root logger.
    pub qualname: String,
}

/// Migration tool settings loaded from a generated config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    path: PathBuf,
    script_location: PathBuf,
    database_url: String,
    loggers: Vec<LoggerSpec>,
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

impl ToolConfig {
    /// Loads the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid INI, or lacks
    /// the primary section keys.
    pub fn load(path: &Path) -> ToolResult<Self> {
        let sections: Sections = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()?
            .try_deserialize()?;

        let script_location = required(&sections, PRIMARY_SECTION, SCRIPT_LOCATION_KEY)?;
        let database_url = required(&sections, PRIMARY_SECTION, DATABASE_URL_KEY)?;

        let loggers = sections
            .get("loggers")
            .and_then(|s| s.get("keys"))
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .filter_map(|name| {
                        let section = sections.get(&format!("logger_{name}"))?;
                        Some(LoggerSpec {
                            name: name.to_owned(),
                            level: section.get("level").cloned().unwrap_or_default(),
                            qualname: section.get("qualname").cloned().unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            script_location: PathBuf::from(script_location),
            database_url,
            loggers,
        })
    }

    /// File this config was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Migration script directory.
    pub fn script_location(&self) -> &Path {
        &self.script_location
    }

    /// Database connection URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Loggers in declaration order.
    pub fn loggers(&self) -> &[LoggerSpec] {
        &self.loggers
    }

    /// Renders the logger sections as an `EnvFilter` directive string.
    ///
    /// The root logger's level becomes the default directive and every
    /// logger with a `qualname` adds `qualname=level`.
    pub fn log_filter(&self) -> String {
        let mut directives = Vec::with_capacity(self.loggers.len());
        for logger in &self.loggers {
            let level = filter_level(&logger.level);
            if logger.qualname.is_empty() {
                directives.insert(0, level);
            } else {
                directives.push(format!("{}={level}", logger.qualname));
            }
        }
        directives.join(",")
    }
}

fn required(sections: &Sections, section: &str, key: &str) -> ToolResult<String> {
    sections
        .get(section)
        .and_then(|s| s.get(key))
        .cloned()
        .ok_or_else(|| ConfigError::NotFound(format!("{section}.{key}")).into())
}

/// Maps a Python logging level name to a `tracing` level name.
fn filter_level(level: &str) -> String {
    match level.to_ascii_uppercase().as_str() {
        "WARN" | "WARNING" => "warn".to_owned(),
        "NOTSET" => "trace".to_owned(),
        "CRITICAL" | "FATAL" => "error".to_owned(),
        other => other.to_ascii_lowercase(),
    }
}

#[cfg(test)]
#[path = "tool_config_tests.rs"]
mod tests;
