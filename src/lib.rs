//! Course Downloader - download course materials from a university portal.
//!
//! This library authenticates against a university web portal, enumerates a
//! student's enrolled courses, and downloads each course's posted materials,
//! skipping files already present on disk.
//!
//! # Features
//!
//! - Cookie bridge from the login session to a reusable download transport
//! - Redirect-aware, two-phase file fetches (signed download URLs)
//! - Atomic temp-file writes: a failed download never leaves partial files
//! - Bounded concurrent downloads per course
//! - Idempotent re-runs: existing files are skipped, never re-fetched
//!
//! # Example
//!
//! ```no_run
//! use course_downloader::{
//!     config::Config,
//!     portal::{Credential, HttpPortal},
//!     runner::SessionRunner,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(std::path::Path::new("config.toml"))?;
//!     let portal = HttpPortal::new(&config)?;
//!     let credential = Credential::new("12-34567-8".into(), "secret".into());
//!
//!     let runner = SessionRunner::new(config);
//!     let stats = runner.run(&portal, &credential).await?;
//!     println!("{} files downloaded", stats.success_count);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod portal;
pub mod runner;
pub mod transport;

// Re-exports for convenience
pub use config::Config;
pub use download::{CourseSummary, DownloadOutcome, RunStats};
pub use error::{Error, Result};
pub use portal::{CookieSet, CourseRef, Credential, MaterialDescriptor, PortalClient};
pub use runner::SessionRunner;
pub use transport::Transport;
