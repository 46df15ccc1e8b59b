//! Top-level session orchestration.

use crate::config::Config;
use crate::download::{process_course, RunStats};
use crate::error::Result;
use crate::output::print_course_summary;
use crate::portal::{Credential, PortalClient};
use crate::transport::Transport;

/// Runs one full session: login, cookie bridge, course enumeration, and
/// sequential per-course processing.
///
/// Control flow walks NotStarted → LoggedIn → SessionActive → one
/// Processing step per course → Closed. Only a login failure is fatal; a
/// discovery failure degrades to an empty course set, and each course's
/// failure is contained at its own boundary. The portal session is closed
/// on every exit path.
pub struct SessionRunner {
    config: Config,
}

impl SessionRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the session to completion and return aggregated statistics.
    pub async fn run(
        &self,
        portal: &dyn PortalClient,
        credential: &Credential,
    ) -> Result<RunStats> {
        let result = self.run_session(portal, credential).await;
        portal.close().await;
        result
    }

    async fn run_session(
        &self,
        portal: &dyn PortalClient,
        credential: &Credential,
    ) -> Result<RunStats> {
        // Fatal on failure: no downloads may happen without a session.
        let cookies = portal.login(credential).await?;

        // Cookie bridge: the one-time handover from the login session to
        // the reusable download transport.
        let transport = Transport::new(cookies, &self.config)?;

        let courses = match portal.list_courses().await {
            Ok(courses) => courses,
            Err(e) => {
                tracing::error!("Error getting courses: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Found {} courses", courses.len());
        for course in &courses {
            tracing::info!("- {}", course.display_name);
        }

        let mut stats = RunStats::default();

        // Courses are strictly sequential; only materials within a course
        // run concurrently. The portal session is never touched from
        // inside the download tasks.
        for course in &courses {
            match process_course(portal, &transport, &self.config, course).await {
                Ok(summary) => {
                    print_course_summary(&summary);
                    stats.add_course(&summary);
                }
                Err(e) => {
                    tracing::error!("Error processing {}: {}", course.display_name, e);
                    stats.mark_course_failed();
                }
            }
        }

        Ok(stats)
    }
}
