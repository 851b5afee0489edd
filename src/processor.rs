use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::args::Config;
use crate::filename::{age_token, renamed_file_name};
use crate::metadata::{resolve_date, MediaKind};

/// Run log appended in the working directory after each successful run.
const LOG_FILE: &str = "log.txt";

pub struct Processor {
    config: Config,
    filter_by_keyword: bool,
    stats: ProcessingStats,
}

#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub total_files: usize,
    pub copied: usize,
    pub unknown_dates: usize,
}

impl Processor {
    pub fn new(config: Config, filter_by_keyword: bool) -> Self {
        Processor {
            config,
            filter_by_keyword,
            stats: ProcessingStats::default(),
        }
    }

    /// Remove any previous output tree and recreate it empty. Destructive;
    /// callers must get a confirmation first.
    pub fn clear_output(&self) -> Result<()> {
        if self.config.output_dir.exists() {
            fs::remove_dir_all(&self.config.output_dir).with_context(|| {
                format!(
                    "Failed to clear output directory: {}",
                    self.config.output_dir.display()
                )
            })?;
        }
        fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.config.output_dir.display()
            )
        })?;
        Ok(())
    }

    /// Process every collected file, one at a time: resolve its date, encode
    /// the age token, and copy it to both destinations.
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files();
        self.stats.total_files = files.len();
        println!("Found {} files to process", files.len());

        for path in files {
            self.copy_file(&path)?;
        }
        Ok(())
    }

    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry_result in WalkDir::new(&self.config.input_dir) {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    if let Some(path) = err.path() {
                        eprintln!("Warning: Failed to access {}: {}", path.display(), err);
                    } else {
                        eprintln!("Warning: Walk error: {}", err);
                    }
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            // Skip AppleDouble files (._*) and .DS_Store (macOS metadata)
            if filename.starts_with("._") || filename == ".DS_Store" {
                continue;
            }

            if self.filter_by_keyword && !self.parent_matches_keyword(path) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files
    }

    /// The filter matches on the immediate parent directory name only.
    fn parent_matches_keyword(&self, path: &Path) -> bool {
        path.parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(|name| name.starts_with(&self.config.keyword))
            .unwrap_or(false)
    }

    fn copy_file(&mut self, path: &Path) -> Result<()> {
        let kind = MediaKind::from_path(path);
        let timestamp = resolve_date(path, kind)?;
        if timestamp.is_none() {
            self.stats.unknown_dates += 1;
        }

        let token = age_token(timestamp, self.config.reference_date);
        let new_name = renamed_file_name(path, &token);

        // Mirror the file's position relative to the input root
        let relative_dir = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .strip_prefix(&self.config.input_dir)
            .unwrap_or_else(|_| Path::new(""));
        let dest_dir = self.config.output_dir.join(relative_dir);
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;

        let mirrored = dest_dir.join(&new_name);
        fs::copy(path, &mirrored).with_context(|| {
            format!("Failed to copy {} to {}", path.display(), mirrored.display())
        })?;

        // Second copy, flattened directly under the output root. Skipped when
        // it would be the mirrored file itself.
        let flattened = self.config.output_dir.join(&new_name);
        if flattened != mirrored {
            fs::copy(&mirrored, &flattened).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    mirrored.display(),
                    flattened.display()
                )
            })?;
        }

        self.stats.copied += 1;
        println!("✓ Copied: {} -> {}", path.display(), mirrored.display());
        Ok(())
    }

    /// Append one `YYYY-MM-DD HH:MM:SS` line to the run log.
    pub fn append_run_log(&self) -> Result<()> {
        let mut log = OpenOptions::new()
            .append(true)
            .create(true)
            .open(LOG_FILE)
            .with_context(|| format!("Failed to open {}", LOG_FILE))?;
        writeln!(log, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        Ok(())
    }

    pub fn print_summary(&self) {
        println!();
        println!("=== PROCESSING COMPLETE ===");
        println!("Total files scanned: {}", self.stats.total_files);
        println!("Copied: {}", self.stats.copied);
        println!("Missing capture date: {}", self.stats.unknown_dates);
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

/// Ask a y/n question on stdout and read the answer from stdin. Only a plain
/// `y` counts as yes.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} (y/n): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "y")
}
