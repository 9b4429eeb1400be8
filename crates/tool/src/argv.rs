//! Argument rewriting for the migration tool CLI.

use std::ffi::OsString;
use std::path::Path;

/// Program name used when the argument list is empty.
pub const DEFAULT_PROGRAM: &str = "migrate";

/// Points the migration tool at the generated config file.
///
/// Inserts `-c <ini_path>` right after the program name. When the command
/// line contains `init`, the versions directory is appended so that `init`
/// creates the configured script location.
pub fn rewrite_args<I, T>(args: I, ini_path: &Path, versions: &Path) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args
        .next()
        .unwrap_or_else(|| OsString::from(DEFAULT_PROGRAM));

    let mut rewritten = vec![program, OsString::from("-c"), ini_path.into()];
    rewritten.extend(args);

    if rewritten.iter().skip(3).any(|arg| arg == "init") {
        rewritten.push(versions.into());
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn rewrite(args: &[&str]) -> Vec<OsString> {
        rewrite_args(
            args.iter().copied(),
            Path::new("/tmp/myini"),
            Path::new("/tmp/versions"),
        )
    }

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_inserts_config_flag_after_program() {
        assert_eq!(rewrite(&["alembic"]), os(&["alembic", "-c", "/tmp/myini"]));
    }

    #[test]
    fn test_init_appends_versions_directory() {
        assert_eq!(
            rewrite(&["alembic", "init"]),
            os(&["alembic", "-c", "/tmp/myini", "init", "/tmp/versions"])
        );
    }

    #[rstest]
    #[case(&["migrate", "up"], &["migrate", "-c", "/tmp/myini", "up"])]
    #[case(&["migrate", "down", "-n", "2"], &["migrate", "-c", "/tmp/myini", "down", "-n", "2"])]
    #[case(&["migrate", "stamp", "head"], &["migrate", "-c", "/tmp/myini", "stamp", "head"])]
    fn test_other_commands_keep_their_arguments(
        #[case] input: &[&str],
        #[case] expected: &[&str],
    ) {
        assert_eq!(rewrite(input), os(expected));
    }

    #[test]
    fn test_empty_args_use_default_program() {
        assert_eq!(
            rewrite(&[]),
            os(&[DEFAULT_PROGRAM, "-c", "/tmp/myini"])
        );
    }

    #[test]
    fn test_program_named_init_is_not_a_command() {
        assert_eq!(rewrite(&["init"]), os(&["init", "-c", "/tmp/myini"]));
    }
}
