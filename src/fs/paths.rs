//! Path and directory management for downloaded materials.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::sanitize;

/// Directory for one course: `base_dir/<sanitized course name>`.
pub fn course_dir(base_dir: &Path, course_name: &str) -> PathBuf {
    base_dir.join(sanitize(course_name))
}

/// Destination for one material: `course_dir/<sanitized material name>`.
pub fn material_path(course_dir: &Path, material_name: &str) -> PathBuf {
    course_dir.join(sanitize(material_name))
}

/// The temporary path a download streams into before the atomic rename.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut name = final_path.as_os_str().to_owned();
    name.push(".temp");
    PathBuf::from(name)
}

/// Ensure a directory exists. Creating an existing directory is not an error.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_dir_sanitizes_name() {
        let dir = course_dir(Path::new("/data"), "C++: Advanced");
        assert_eq!(dir, PathBuf::from("/data/C++_ Advanced"));
    }

    #[test]
    fn test_material_path_sanitizes_name() {
        let path = material_path(Path::new("/data/Networks"), "Week%201/Intro?.pdf");
        assert_eq!(path, PathBuf::from("/data/Networks/Week 1_Intro_.pdf"));
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        let path = temp_path(Path::new("/data/Networks/notes.pdf"));
        assert_eq!(path, PathBuf::from("/data/Networks/notes.pdf.temp"));
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let target = base.path().join("a/b");
        ensure_dir(&target).await.unwrap();
        ensure_dir(&target).await.unwrap();
        assert!(target.is_dir());
    }
}
