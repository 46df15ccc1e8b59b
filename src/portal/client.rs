//! Portal client contract and its HTTP implementation.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::portal::types::{CookieSet, CourseRef, Credential, MaterialDescriptor};

/// External collaborator contract consumed by the download core.
///
/// Implementations are only ever driven by the sequential outer loop; the
/// concurrent download tasks never touch the portal session.
#[async_trait]
pub trait PortalClient: Send + Sync {
    /// Authenticate and return the harvested session cookies.
    async fn login(&self, credential: &Credential) -> Result<CookieSet>;

    /// Enumerate enrolled courses. Courses without a parseable label or a
    /// materials link are silently excluded.
    async fn list_courses(&self) -> Result<Vec<CourseRef>>;

    /// List the materials posted on a course's materials tab.
    async fn list_materials(&self, course: &CourseRef) -> Result<Vec<MaterialDescriptor>>;

    /// Release the portal session. Must be safe to call on every exit path.
    async fn close(&self);
}

/// Course label pattern: the title between the section dash and the
/// trailing bracketed metadata, e.g. `"00123 - Data Structures [A]"`.
const COURSE_LABEL_PATTERN: &str = r"-\s*(.+?)\s*\[";

/// One course panel: panel body text followed by the materials-tab link.
const COURSE_PANEL_PATTERN: &str = concat!(
    r#"(?s)<div[^>]*class="[^"]*course-list-panel[^"]*"[^>]*>(.*?)</div>"#,
    r#".*?<a[^>]*href="([^"]*#notesTab[^"]*)""#
);

/// One materials table row: link cell (href + display name) then size cell.
const MATERIAL_ROW_PATTERN: &str = concat!(
    r#"(?s)<tr[^>]*>\s*<td[^>]*>.*?</td>\s*"#,
    r#"<td[^>]*>\s*<a[^>]*href="([^"]+)"[^>]*>(.*?)</a>\s*</td>\s*"#,
    r#"<td[^>]*>(.*?)</td>"#
);

/// HTTP implementation of the portal contract.
///
/// Thin, site-specific glue: a cookie-jarred client for the login form and
/// regex extraction over the returned pages. All of it is replaceable
/// without touching the download core.
pub struct HttpPortal {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    course_panel: Regex,
    course_label: Regex,
    material_row: Regex,
}

impl HttpPortal {
    /// Create a portal client against the configured base URL.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.portal.base_url)?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(&config.portal.user_agent)
            .cookie_provider(Arc::clone(&jar))
            .timeout(std::time::Duration::from_secs(
                config.portal.request_timeout_secs,
            ))
            .build()
            .map_err(|e| Error::Login(format!("Failed to create portal client: {}", e)))?;

        let course_panel = Regex::new(COURSE_PANEL_PATTERN).unwrap();
        let course_label = Regex::new(COURSE_LABEL_PATTERN).unwrap();
        let material_row = Regex::new(MATERIAL_ROW_PATTERN).unwrap();

        Ok(Self {
            client,
            jar,
            base_url,
            course_panel,
            course_label,
            material_row,
        })
    }

    /// Harvest the jar's cookies for the portal origin into a CookieSet.
    fn harvest_cookies(&self) -> CookieSet {
        let header = match self.jar.cookies(&self.base_url) {
            Some(header) => header,
            None => return CookieSet::default(),
        };

        let pairs: Vec<(String, String)> = header
            .to_str()
            .unwrap_or_default()
            .split("; ")
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        CookieSet::from_pairs(pairs)
    }

    /// Resolve a possibly relative portal link against the base URL.
    fn resolve_url(&self, href: &str) -> Result<String> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Ok(href.to_string());
        }
        Ok(self.base_url.join(href)?.to_string())
    }

    /// Extract the clean course label from a panel's body text.
    fn parse_course_label(&self, panel_text: &str) -> Option<String> {
        let text = strip_tags(panel_text);
        self.course_label
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|label| !label.is_empty())
    }
}

#[async_trait]
impl PortalClient for HttpPortal {
    async fn login(&self, credential: &Credential) -> Result<CookieSet> {
        tracing::info!("Loading {}", self.base_url);

        let response = self
            .client
            .post(self.base_url.clone())
            .form(&[
                ("UserName", credential.student_id.as_str()),
                ("Password", credential.password()),
            ])
            .send()
            .await
            .map_err(|e| Error::Login(format!("login request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Login(format!("login response unreadable: {}", e)))?;

        // The landing page after a successful login carries the course list.
        if !status.is_success() || !body.contains("StudentCourseList") {
            return Err(Error::Login(format!(
                "portal rejected credentials (status {})",
                status
            )));
        }

        let cookies = self.harvest_cookies();
        if cookies.is_empty() {
            return Err(Error::Login("no session cookies after login".into()));
        }

        tracing::info!("Login successful");
        Ok(cookies)
    }

    async fn list_courses(&self) -> Result<Vec<CourseRef>> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| Error::Discovery(format!("course page fetch failed: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Discovery(format!("course page unreadable: {}", e)))?;

        let mut courses = Vec::new();
        for caps in self.course_panel.captures_iter(&body) {
            let (Some(panel), Some(href)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            // Panels without a clean label or materials link are excluded.
            let Some(display_name) = self.parse_course_label(panel.as_str()) else {
                tracing::debug!("Skipping course panel without a parseable label");
                continue;
            };
            let Ok(materials_url) = self.resolve_url(href.as_str()) else {
                tracing::debug!("Skipping course '{}' with unresolvable link", display_name);
                continue;
            };

            courses.push(CourseRef {
                display_name,
                materials_url,
            });
        }

        Ok(courses)
    }

    async fn list_materials(&self, course: &CourseRef) -> Result<Vec<MaterialDescriptor>> {
        let response = self
            .client
            .get(&course.materials_url)
            .send()
            .await
            .map_err(|e| Error::Discovery(format!("materials page fetch failed: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::Discovery(format!("materials page unreadable: {}", e)))?;

        let mut materials = Vec::new();
        for caps in self.material_row.captures_iter(&body) {
            let (Some(href), Some(name), Some(size)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };

            let display_name = strip_tags(name.as_str()).trim().to_string();
            if display_name.is_empty() {
                continue;
            }
            let Ok(source_url) = self.resolve_url(href.as_str()) else {
                tracing::debug!("Skipping material '{}' with unresolvable link", display_name);
                continue;
            };

            materials.push(MaterialDescriptor {
                display_name,
                source_url,
                declared_size: strip_tags(size.as_str()).trim().to_string(),
            });
        }

        Ok(materials)
    }

    async fn close(&self) {
        // Connections are released on drop; nothing to tear down server-side.
        tracing::debug!("Portal session closed");
    }
}

/// Remove markup from an extracted HTML fragment.
fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.portal.base_url = base_url.to_string();
        config
    }

    fn portal(base_url: &str) -> HttpPortal {
        HttpPortal::new(&test_config(base_url)).unwrap()
    }

    #[test]
    fn test_parse_course_label() {
        let portal = portal("https://portal.example.edu/");
        assert_eq!(
            portal.parse_course_label("00123 - Data Structures [A] (Sec 1)"),
            Some("Data Structures".to_string())
        );
        assert_eq!(portal.parse_course_label("no dash or bracket"), None);
    }

    #[test]
    fn test_parse_course_label_strips_markup() {
        let portal = portal("https://portal.example.edu/");
        assert_eq!(
            portal.parse_course_label("<b>00123</b> - <span>Networks</span> [B]"),
            Some("Networks".to_string())
        );
    }

    #[test]
    fn test_resolve_relative_url() {
        let portal = portal("https://portal.example.edu/Student/");
        assert_eq!(
            portal.resolve_url("Course/View?id=5#notesTab").unwrap(),
            "https://portal.example.edu/Student/Course/View?id=5#notesTab"
        );
        assert_eq!(
            portal.resolve_url("https://files.example.edu/a.pdf").unwrap(),
            "https://files.example.edu/a.pdf"
        );
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<a href=\"x\">Week 1</a>"), "Week 1");
        assert_eq!(strip_tags("plain"), "plain");
    }

    #[tokio::test]
    async fn test_list_courses_excludes_unparseable_panels() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let html = r##"
            <div class="panel panel-primary">
              <div class="panel-body course-list-panel">00123 - Data Structures [A]</div>
              <a href="/Student/Course?id=1#notesTab">Notes</a>
            </div>
            <div class="panel panel-primary">
              <div class="panel-body course-list-panel">malformed entry</div>
              <a href="/Student/Course?id=2#notesTab">Notes</a>
            </div>
        "##;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let portal = portal(&server.uri());
        let courses = portal.list_courses().await.unwrap();

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].display_name, "Data Structures");
        assert!(courses[0].materials_url.contains("#notesTab"));
    }

    #[tokio::test]
    async fn test_list_materials_parses_rows() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let html = r##"
            <table class="table"><tbody>
              <tr><td>#</td>
                  <td><a href="/download?id=9">Week%201.pdf</a></td>
                  <td>1.2 MB</td></tr>
            </tbody></table>
        "##;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let portal = portal(&server.uri());
        let course = CourseRef {
            display_name: "Data Structures".into(),
            materials_url: format!("{}/course", server.uri()),
        };
        let materials = portal.list_materials(&course).await.unwrap();

        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].display_name, "Week%201.pdf");
        assert_eq!(materials[0].declared_size, "1.2 MB");
        assert!(materials[0].source_url.ends_with("/download?id=9"));
    }
}
