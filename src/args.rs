use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "agestamp")]
#[command(about = "rename and copy media files by their age relative to a reference date")]
pub struct Cli {
    /// Input directory to scan
    #[arg(default_value = "./input")]
    pub input_dir: PathBuf,

    /// Output directory (cleared and recreated before processing)
    #[arg(default_value = "./output")]
    pub output_dir: PathBuf,

    /// Reference date, YYYY-MM-DD
    #[arg(default_value = "2022-11-01")]
    pub reference_date: String,

    /// Keyword for the optional parent-directory filter (asked interactively)
    #[arg(long, default_value = "Muscu")]
    pub keyword: String,
}

/// Validated run configuration, threaded through every component.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reference_date: NaiveDate,
    pub keyword: String,
}

impl Config {
    /// Validate command line arguments into a run configuration.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let reference_date = NaiveDate::parse_from_str(&cli.reference_date, "%Y-%m-%d")
            .with_context(|| {
                format!(
                    "Invalid reference date {:?}, expected YYYY-MM-DD",
                    cli.reference_date
                )
            })?;

        if !cli.input_dir.exists() {
            bail!("Input directory does not exist: {}", cli.input_dir.display());
        }
        if !cli.input_dir.is_dir() {
            bail!("Input path is not a directory: {}", cli.input_dir.display());
        }

        Ok(Config {
            input_dir: cli.input_dir,
            output_dir: cli.output_dir,
            reference_date,
            keyword: cli.keyword,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(reference: &str) -> Cli {
        Cli {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./out"),
            reference_date: reference.to_string(),
            keyword: "Muscu".to_string(),
        }
    }

    #[test]
    fn test_reference_date_parsing() {
        let config = Config::from_cli(cli("2022-11-01")).unwrap();
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2022, 11, 1).unwrap()
        );
    }

    #[test]
    fn test_malformed_reference_date_is_an_error() {
        assert!(Config::from_cli(cli("01/11/2022")).is_err());
        assert!(Config::from_cli(cli("2022-13-01")).is_err());
        assert!(Config::from_cli(cli("not a date")).is_err());
    }

    #[test]
    fn test_missing_input_directory_is_an_error() {
        let mut bad = cli("2022-11-01");
        bad.input_dir = PathBuf::from("/definitely/not/here");
        assert!(Config::from_cli(bad).is_err());
    }
}
