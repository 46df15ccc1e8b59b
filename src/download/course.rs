//! Per-course material processing and concurrent download fan-out.

use std::path::PathBuf;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;

use crate::config::Config;
use crate::download::engine;
use crate::download::state::{CourseSummary, DownloadOutcome};
use crate::error::{Error, Result};
use crate::fs::paths::{course_dir, ensure_dir, material_path};
use crate::fs::sanitize;
use crate::portal::{CourseRef, PortalClient};
use crate::transport::Transport;

/// One pending download: a source URL and its final destination.
#[derive(Debug, Clone)]
struct DownloadTask {
    source_url: String,
    destination_path: PathBuf,
}

/// Process one course: create its directory, list its materials, skip
/// already-downloaded files, and download the rest concurrently.
///
/// A failing download never aborts its siblings; their outcomes are only
/// aggregated after all of them have settled. Errors returned here are
/// course-level (listing timeout or fetch failure) and are contained at
/// the caller's course boundary.
pub async fn process_course(
    portal: &dyn PortalClient,
    transport: &Transport,
    config: &Config,
    course: &CourseRef,
) -> Result<CourseSummary> {
    tracing::info!("Processing: {}", course.display_name);

    let dir = course_dir(&config.download_directory(), &course.display_name);
    ensure_dir(&dir).await?;

    // The materials listing is collaborator territory; a page that never
    // settles is a course-level failure, bounded by the page-wait budget.
    let page_wait = Duration::from_secs(config.portal.page_wait_secs);
    let materials = timeout(page_wait, portal.list_materials(course))
        .await
        .map_err(|_| Error::PageWait(course.display_name.clone()))?
        .map_err(|e| Error::CourseProcessing {
            course: course.display_name.clone(),
            message: e.to_string(),
        })?;

    let mut summary = CourseSummary::new(course.display_name.clone());
    let mut tasks = Vec::new();

    for material in &materials {
        let destination = material_path(&dir, &material.display_name);

        // Pre-existing files are treated as already downloaded, never
        // re-fetched or verified against the declared size.
        if destination.exists() {
            summary.record(&DownloadOutcome::Skipped);
            if config.options.show_skipped_downloads {
                tracing::info!("Skipped existing: {}", sanitize(&material.display_name));
            }
            continue;
        }

        tracing::debug!(
            "Queued {} ({})",
            material.display_name,
            material.declared_size
        );
        tasks.push(DownloadTask {
            source_url: material.source_url.clone(),
            destination_path: destination,
        });
    }

    if tasks.is_empty() {
        tracing::info!("No new files to download");
        return Ok(summary);
    }

    let show_progress = config.options.show_downloads;
    let outcomes: Vec<DownloadOutcome> = stream::iter(tasks)
        .map(|task| async move {
            engine::download(
                transport,
                &task.source_url,
                &task.destination_path,
                show_progress,
            )
            .await
        })
        .buffer_unordered(config.options.max_concurrent_downloads)
        .collect()
        .await;

    for outcome in &outcomes {
        summary.record(outcome);
    }

    tracing::info!(
        "Downloaded {} of {} files for {}",
        summary.success_count,
        summary.total_dispatched(),
        course.display_name
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::{CookieSet, Credential, MaterialDescriptor};
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Portal stub serving a fixed material list.
    struct StubPortal {
        materials: Vec<MaterialDescriptor>,
        listing_delay: Option<Duration>,
    }

    impl StubPortal {
        fn new(materials: Vec<MaterialDescriptor>) -> Self {
            Self {
                materials,
                listing_delay: None,
            }
        }
    }

    #[async_trait]
    impl PortalClient for StubPortal {
        async fn login(&self, _credential: &Credential) -> Result<CookieSet> {
            Ok(CookieSet::from_pairs([("sessionid", "stub")]))
        }

        async fn list_courses(&self) -> Result<Vec<CourseRef>> {
            Ok(Vec::new())
        }

        async fn list_materials(&self, _course: &CourseRef) -> Result<Vec<MaterialDescriptor>> {
            if let Some(delay) = self.listing_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.materials.clone())
        }

        async fn close(&self) {}
    }

    fn material(server: &MockServer, name: &str, route: &str) -> MaterialDescriptor {
        MaterialDescriptor {
            display_name: name.to_string(),
            source_url: format!("{}{}", server.uri(), route),
            declared_size: "1 KB".to_string(),
        }
    }

    fn test_config(base_dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.options.download_directory = Some(base_dir.to_path_buf());
        config.options.show_downloads = false;
        config
    }

    fn transport() -> Transport {
        Transport::new(CookieSet::from_pairs([("s", "1")]), &Config::default()).unwrap()
    }

    fn course() -> CourseRef {
        CourseRef {
            display_name: "Data Structures".into(),
            materials_url: "https://portal.example.edu/course/1#notesTab".into(),
        }
    }

    async fn mount_ok(server: &MockServer, route: &str, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let server = MockServer::start().await;
        for i in [1, 2, 4, 5] {
            mount_ok(&server, &format!("/m{}", i), b"content").await;
        }
        Mock::given(method("GET"))
            .and(path("/m3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let materials = (1..=5)
            .map(|i| material(&server, &format!("file{}.pdf", i), &format!("/m{}", i)))
            .collect();
        let portal = StubPortal::new(materials);

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let summary = process_course(&portal, &transport(), &config, &course())
            .await
            .unwrap();

        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.failed_count, 1);
        assert_eq!(summary.skipped_count, 0);
    }

    #[tokio::test]
    async fn test_existing_file_is_never_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seen"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let portal = StubPortal::new(vec![material(&server, "already.pdf", "/seen")]);

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let course_path = course_dir(dir.path(), "Data Structures");
        std::fs::create_dir_all(&course_path).unwrap();
        std::fs::write(course_path.join("already.pdf"), b"old").unwrap();

        let summary = process_course(&portal, &transport(), &config, &course())
            .await
            .unwrap();

        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.total_dispatched(), 0);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_second_run_skips_everything() {
        let server = MockServer::start().await;
        mount_ok(&server, "/a", b"a").await;
        mount_ok(&server, "/b", b"b").await;

        let portal = StubPortal::new(vec![
            material(&server, "a.pdf", "/a"),
            material(&server, "b.pdf", "/b"),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let transport = transport();

        let first = process_course(&portal, &transport, &config, &course())
            .await
            .unwrap();
        assert_eq!(first.success_count, 2);
        assert_eq!(first.skipped_count, 0);

        let second = process_course(&portal, &transport, &config, &course())
            .await
            .unwrap();
        assert_eq!(second.success_count, 0);
        assert_eq!(second.skipped_count, 2);
    }

    #[tokio::test]
    async fn test_listing_timeout_is_a_course_failure() {
        let mut portal = StubPortal::new(Vec::new());
        portal.listing_delay = Some(Duration::from_secs(5));

        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.portal.page_wait_secs = 0;

        let result = process_course(&portal, &transport(), &config, &course()).await;
        assert!(matches!(result, Err(Error::PageWait(_))));
    }

    #[tokio::test]
    async fn test_material_names_are_sanitized() {
        let server = MockServer::start().await;
        mount_ok(&server, "/w1", b"week one").await;

        let portal = StubPortal::new(vec![material(&server, "Week%201/Notes?.pdf", "/w1")]);

        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let summary = process_course(&portal, &transport(), &config, &course())
            .await
            .unwrap();

        assert_eq!(summary.success_count, 1);
        let expected = course_dir(dir.path(), "Data Structures").join("Week 1_Notes_.pdf");
        assert!(expected.is_file());
    }
}
