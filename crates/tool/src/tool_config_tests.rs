use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use super::*;

const URL: &str = "sqlite://url";

fn write_to_temp(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("migrate.ini");
    write_tool_config(&path, Path::new("/tmp/versions"), URL).expect("write config");
    path
}

#[test]
fn test_write_tool_config_creates_non_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = write_to_temp(&dir);

    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn test_write_tool_config_contains_expected_sections() {
    let dir = TempDir::new().unwrap();
    let contents = fs::read_to_string(write_to_temp(&dir)).unwrap();

    for section in [
        "[alembic]",
        "[loggers]",
        "[handlers]",
        "[formatters]",
        "[logger_root]",
        "[logger_sqlalchemy]",
        "[logger_alembic]",
        "[handler_console]",
        "[formatter_impaf]",
        "[formatter_generic]",
    ] {
        assert!(contents.contains(section), "missing {section}");
    }
    assert!(contents.contains("script_location = /tmp/versions\n"));
    assert!(contents.contains("sqlalchemy.url = sqlite://url\n"));
    assert!(contents.contains("format = [Alembic] %(message)s\n"));
    assert!(contents.ends_with(
        "[formatter_generic]\n\
         datefmt = %H:%M:%S\n\
         format = %(levelname)-5.5s [%(name)s] %(message)s\n"
    ));
}

#[test]
fn test_write_tool_config_overwrites_and_creates_parent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("migrate.ini");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "stale").unwrap();

    write_tool_config(&path, Path::new("versions"), URL).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("stale"));
    assert!(contents.starts_with("[alembic]\n"));
}

#[test]
fn test_write_tool_config_into_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("migrate.ini");

    write_tool_config(&path, Path::new("versions"), URL).unwrap();

    assert!(path.exists());
}

#[test]
fn test_document_lookup_and_empty_values() {
    let doc = tool_config_document(Path::new("/srv/versions"), URL);

    assert_eq!(doc.get("alembic", "script_location"), Some("/srv/versions"));
    assert_eq!(doc.get("loggers", "keys"), Some("root,sqlalchemy,alembic"));
    assert_eq!(doc.get("logger_root", "qualname"), Some(""));
    assert_eq!(doc.get("handler_console", "formatter"), Some("impaf"));
    assert_eq!(doc.get("missing", "keys"), None);
    assert_eq!(doc.sections().len(), 9);
    let rendered = doc.to_string();
    let root_logger = "[logger_root]\nlevel = WARN\nhandlers = console\nqualname = \n\n";
    assert!(rendered.contains(root_logger));
}

#[test]
fn test_load_reads_back_primary_section() {
    let dir = TempDir::new().unwrap();
    let path = write_to_temp(&dir);

    let config = ToolConfig::load(&path).expect("load config");

    assert_eq!(config.path(), path.as_path());
    assert_eq!(config.database_url(), URL);
    assert_eq!(config.script_location(), Path::new("/tmp/versions"));
    assert_eq!(
        config
            .loggers()
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>(),
        ["root", "sqlalchemy", "alembic"]
    );
}

#[test]
fn test_log_filter_from_generated_file() {
    let dir = TempDir::new().unwrap();
    let config = ToolConfig::load(&write_to_temp(&dir)).unwrap();

    assert_eq!(config.log_filter(), "warn,sea_orm=warn,dbstrap_tool=info");
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    let err = ToolConfig::load(&dir.path().join("absent.ini")).unwrap_err();

    assert!(matches!(err, crate::ToolError::Config(_)));
}

#[test]
fn test_load_without_database_url_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.ini");
    fs::write(&path, "[alembic]\nscript_location = versions\n").unwrap();

    let err = ToolConfig::load(&path).unwrap_err();

    assert!(err.to_string().contains("sqlalchemy.url"));
}

#[rstest]
#[case("WARN", "warn")]
#[case("WARNING", "warn")]
#[case("INFO", "info")]
#[case("DEBUG", "debug")]
#[case("ERROR", "error")]
#[case("CRITICAL", "error")]
#[case("NOTSET", "trace")]
fn test_filter_level(#[case] level: &str, #[case] expected: &str) {
    assert_eq!(filter_level(level), expected);
}
