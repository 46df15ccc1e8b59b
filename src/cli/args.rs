//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Course materials downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "course-downloader",
    version,
    about = "Download course materials from a university portal",
    long_about = "A CLI tool that logs into a university portal, enumerates enrolled\n\
                  courses, and downloads every posted material, skipping files that\n\
                  are already present locally."
)]
pub struct Args {
    /// Base directory for downloaded materials.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Student ID. Prompted for interactively if not given.
    #[arg(short = 's', long = "student-id", env = "PORTAL_STUDENT_ID")]
    pub student_id: Option<String>,

    /// Portal base URL.
    #[arg(long = "portal-url", env = "PORTAL_URL")]
    pub portal_url: Option<String>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "PORTAL_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Maximum concurrent downloads within one course.
    #[arg(short = 'j', long = "concurrency")]
    pub max_concurrent_downloads: Option<usize>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Don't log skipped (already present) files.
    #[arg(long)]
    pub hide_skipped: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(ref dir) = self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(ref url) = self.portal_url {
            config.portal.base_url = url.clone();
        }

        if let Some(ref agent) = self.user_agent {
            config.portal.user_agent = agent.clone();
        }

        if let Some(max) = self.max_concurrent_downloads {
            config.options.max_concurrent_downloads = max;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }

        if self.hide_skipped {
            config.options.show_skipped_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("course-downloader").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_merge_overrides_config() {
        let mut config = Config::default();
        let args = args(&["-d", "/tmp/materials", "-j", "4", "--quiet"]);
        args.merge_into_config(&mut config);

        assert_eq!(
            config.options.download_directory,
            Some(PathBuf::from("/tmp/materials"))
        );
        assert_eq!(config.options.max_concurrent_downloads, 4);
        assert!(!config.options.show_downloads);
        assert!(config.options.show_skipped_downloads);
    }

    #[test]
    fn test_merge_keeps_defaults_when_unset() {
        let mut config = Config::default();
        let before = config.portal.base_url.clone();
        args(&[]).merge_into_config(&mut config);
        assert_eq!(config.portal.base_url, before);
        assert_eq!(config.options.max_concurrent_downloads, 8);
    }
}
