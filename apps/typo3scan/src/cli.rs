//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "typo3scan",
    version,
    about = "Scan a path for deprecated TYPO3 code",
    long_about = "typo3scan reports breaking changes, deprecations and other TYPO3 core API changes used in a source tree.\n\nConfiguration precedence: CLI > typo3scan.toml > defaults.",
    after_help = "Examples:\n  typo3scan scan ~/tmp/source\n  typo3scan scan --target 8 ~/tmp/source\n  typo3scan scan --target 8 --report-file ~/tmp/report.txt ~/tmp/source\n  typo3scan scan --target 7 --format markdown ~/tmp/source\n  typo3scan scan --indicators weak --target 7 --format markdown ~/tmp/source\n  typo3scan scan --format markdown --template-path ~/path/to/templates ~/tmp/source\n  typo3scan scan --target 7 --only breaking --format markdown ~/tmp/source",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current typo3scan version.")]
    Version,
    /// Scan a path for deprecated code
    #[command(
        about = "Scan a path for deprecated code",
        long_about = "Run the matchers of the target TYPO3 version over PATH and render a report. Exits 1 when matches remain after filtering."
    )]
    Scan {
        #[arg(help = "Path to scan")]
        path: PathBuf,
        #[arg(short, long, help = "TYPO3 version to target: 7|8|9|10 (default: 10)")]
        target: Option<String>,
        #[arg(
            short,
            long,
            help = "Only report: [breaking, deprecation, important, feature] changes (comma separated)"
        )]
        only: Option<String>,
        #[arg(short, long, help = "Only report: [strong, weak] matches (comma separated)")]
        indicators: Option<String>,
        #[arg(short, long, help = "Output format: plain|markdown|json or a custom template name")]
        format: Option<String>,
        #[arg(
            short,
            long,
            alias = "reportFile",
            help = "Write the report to this file instead of stdout"
        )]
        report_file: Option<PathBuf>,
        #[arg(long, alias = "templatePath", help = "Directory with <format>.hbs templates")]
        template_path: Option<PathBuf>,
        #[arg(long, help = "Path to typo3scan.toml|yaml (default: discovered)")]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "typo3scan", "scan", "-t", "8", "-o", "breaking", "-i", "weak", "-f", "markdown",
            "-r", "out.md", "--template-path", "tpl", "src",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Scan {
                path,
                target,
                only,
                indicators,
                format,
                report_file,
                template_path,
                config,
            } => {
                assert_eq!(path, PathBuf::from("src"));
                assert_eq!(target.as_deref(), Some("8"));
                assert_eq!(only.as_deref(), Some("breaking"));
                assert_eq!(indicators.as_deref(), Some("weak"));
                assert_eq!(format.as_deref(), Some("markdown"));
                assert_eq!(report_file, Some(PathBuf::from("out.md")));
                assert_eq!(template_path, Some(PathBuf::from("tpl")));
                assert!(config.is_none());
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_camel_case_flag_aliases() {
        let cli = Cli::try_parse_from([
            "typo3scan", "scan", "--reportFile", "out.txt", "--templatePath", "tpl", "src",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Scan {
                report_file,
                template_path,
                ..
            } => {
                assert_eq!(report_file, Some(PathBuf::from("out.txt")));
                assert_eq!(template_path, Some(PathBuf::from("tpl")));
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_requires_path() {
        assert!(Cli::try_parse_from(["typo3scan", "scan"]).is_err());
    }
}
