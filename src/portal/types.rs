//! Data types exchanged with the portal collaborators.

use std::collections::BTreeMap;
use std::fmt;

/// Login credentials for the portal.
///
/// Ephemeral: held only for the login call, never persisted. The password
/// is redacted in Debug output to prevent accidental logging.
#[derive(Clone)]
pub struct Credential {
    /// Student ID used as the portal username.
    pub student_id: String,
    /// Portal password (sensitive — never log).
    password: String,
}

impl Credential {
    #[must_use]
    pub fn new(student_id: String, password: String) -> Self {
        Self {
            student_id,
            password,
        }
    }

    /// Returns the password.
    ///
    /// The return value is sensitive — avoid logging it.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("student_id", &self.student_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// The authenticated cookie set harvested after a successful login.
///
/// Produced once by the login step and consumed exactly once to build the
/// download transport. Immutable after creation. A `BTreeMap` keeps the
/// serialized header deterministic.
#[derive(Debug, Clone, Default)]
pub struct CookieSet {
    cookies: BTreeMap<String, String>,
}

impl CookieSet {
    /// Build a cookie set from name/value pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            cookies: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Serialize to a `Cookie` header value: `name=value` pairs joined by `; `.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One enrolled course, as discovered by course enumeration.
///
/// `display_name` may contain characters illegal in filesystem paths and
/// must be sanitized before use as a directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub display_name: String,
    /// Link to the course's materials tab.
    pub materials_url: String,
}

/// One downloadable material posted in a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDescriptor {
    /// May be percent-encoded and contain illegal path characters.
    pub display_name: String,
    pub source_url: String,
    /// Size string as presented by the origin. Informational only, never
    /// used to verify download integrity.
    pub declared_size: String,
}
