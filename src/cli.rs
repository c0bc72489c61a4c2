use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};

/// Interactive terminal task manager.
/// Tasks are stored in tasks.json under the config directory unless --file is given.
#[derive(Debug, Parser)]
#[command(name = "terminaltask", version, about = "Interactive terminal task manager")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `terminaltask=trace`. Defaults to RUST_LOG, then `info`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Draw without colors.
    #[arg(long)]
    pub no_color: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Write the completion script for `shell` to stdout.
pub fn print_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag_exits_before_the_session() {
        let err = Cli::try_parse_from(["terminaltask", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        assert!(err.to_string().contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "terminaltask",
            "--file",
            "/tmp/t.json",
            "--log-level",
            "debug",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/t.json")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.no_color);
        assert!(cli.completions.is_none());

        let cli = Cli::try_parse_from(["terminaltask", "--completions", "bash"]).unwrap();
        assert_eq!(cli.completions, Some(Shell::Bash));
    }

    #[test]
    fn test_no_args_starts_the_session() {
        let cli = Cli::try_parse_from(["terminaltask"]).unwrap();
        assert!(cli.file.is_none() && cli.completions.is_none());
    }
}
