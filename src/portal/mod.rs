//! Portal collaborators: login, course enumeration, material discovery.
//!
//! The download core never talks to the portal DOM directly. It consumes
//! the [`PortalClient`] contract: an authenticated cookie set plus a
//! mapping from course to material descriptors. [`HttpPortal`] is the thin
//! site-specific implementation of that contract.

pub mod client;
pub mod types;

pub use client::{HttpPortal, PortalClient};
pub use types::{CookieSet, CourseRef, Credential, MaterialDescriptor};
