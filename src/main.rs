//! Course Downloader - CLI entry point.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use course_downloader::{
    cli::Args,
    config::{validate_config, validate_student_id, Config},
    error::{exit_codes, Error, Result},
    output::{print_banner, print_config_summary, print_error, print_run_stats, print_success, print_warning},
    portal::{Credential, HttpPortal},
    runner::SessionRunner,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Login(_) => ExitCode::from(exit_codes::LOGIN_ERROR as u8),
                Error::Download(_) | Error::NoRedirectTarget(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    // Print configuration summary
    print_config_summary(
        &config.portal.base_url,
        &config.download_directory().display().to_string(),
        config.options.max_concurrent_downloads,
    );

    // Collect credentials; never persisted, held only for the login call
    let student_id = match args.student_id {
        Some(ref id) => id.clone(),
        None => prompt_student_id()?,
    };
    validate_student_id(&student_id)?;

    let password = rpassword::prompt_password("Password: ")?;
    let credential = Credential::new(student_id.trim().to_string(), password);

    // Run the session
    let portal = HttpPortal::new(&config)?;
    let runner = SessionRunner::new(config);
    let stats = runner.run(&portal, &credential).await?;

    print_run_stats(&stats);
    print_success("Download complete");

    if stats.courses_failed > 0 {
        return Err(Error::Download(format!(
            "{} course(s) failed",
            stats.courses_failed
        )));
    }

    Ok(())
}

/// Prompt for the student ID on stdin.
fn prompt_student_id() -> Result<String> {
    print!("Enter student ID: ");
    io::stdout().flush()?;

    let mut student_id = String::new();
    io::stdin().read_line(&mut student_id)?;
    Ok(student_id.trim().to_string())
}
