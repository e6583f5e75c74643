//! Command-line interface definition for `fob-surface`.
//!
//! One command: analyze the package at `PACKAGE_PATH`, write the report
//! JSON to a timestamped file and echo it on stdout.

mod validation;

use std::path::PathBuf;

use clap::Parser;
use indexmap::IndexMap;

pub use validation::parse_exposures;

/// fob-surface - public API surface reports for JavaScript/TypeScript packages
#[derive(Parser, Debug)]
#[command(
    name = "fob-surface",
    version,
    about = "Report the public API surface of a JavaScript/TypeScript package",
    long_about = "Walks every module reachable from a package's entry points and federated\n\
                  exposures, classifies each export as value, type or exposure, and records\n\
                  whether it is documented and whether it originates in a dependency."
)]
pub struct Cli {
    /// Package directory (must contain package.json)
    #[arg(value_name = "PACKAGE_PATH")]
    pub package_path: Option<PathBuf>,

    /// Explicit exposure map as JSON, e.g. '{"./Button":"./src/Button.js"}'
    ///
    /// Targets are relative to the package directory. Skips configuration
    /// file discovery.
    #[arg(long, value_name = "JSON", value_parser = parse_exposures)]
    pub exposes: Option<IndexMap<String, String>>,

    /// Scan only this build configuration file for an exposure map
    ///
    /// Relative paths are taken from the package directory.
    #[arg(long, value_name = "FILE")]
    pub exposes_config: Option<PathBuf>,

    /// Directory the report file is written to
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Configuration file (default: fob-surface.config.json in the package)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Glob used to discover build configuration files
    #[arg(long, value_name = "GLOB")]
    pub config_glob: Option<String>,

    /// Stop after analyzing this many modules
    #[arg(long, value_name = "N")]
    pub max_modules: Option<usize>,

    /// Do not print the report JSON to stdout
    #[arg(long)]
    pub no_echo: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_package_path_is_optional() {
        let cli = Cli::try_parse_from(["fob-surface"]).unwrap();
        assert!(cli.package_path.is_none());
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "fob-surface",
            "./pkg",
            "--exposes",
            r#"{"./Button":"./src/Button.js"}"#,
            "--out-dir",
            "out",
            "--no-echo",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.package_path, Some(PathBuf::from("./pkg")));
        assert_eq!(
            cli.exposes.unwrap().get("./Button").map(String::as_str),
            Some("./src/Button.js")
        );
        assert_eq!(cli.out_dir, Some(PathBuf::from("out")));
        assert!(cli.no_echo);
        assert!(cli.verbose);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["fob-surface", ".", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_bad_exposures_json_is_rejected() {
        assert!(Cli::try_parse_from(["fob-surface", ".", "--exposes", "[1, 2]"]).is_err());
    }
}
