//! typo3scan CLI binary entry point.
//! Resolves configuration, runs the scan and writes the report.

use clap::Parser;
use typo3scan::cli::{Cli, Commands};
use typo3scan::config::CliOverrides;
use typo3scan::scan::{self, EXIT_ERROR};
use typo3scan::utils;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
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
            let overrides = CliOverrides {
                config,
                target,
                only,
                indicators,
                format,
                template_path,
            };
            let cwd = match std::env::current_dir() {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(EXIT_ERROR);
                }
            };
            match scan::run_scan(&path, &overrides, report_file.as_deref(), &cwd) {
                Ok(total) => std::process::exit(scan::exit_code(total)),
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(EXIT_ERROR);
                }
            }
        }
    }
}
