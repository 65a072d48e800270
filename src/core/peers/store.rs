//! Submission storage backends

use super::{CourseGradeRow, PeerError, Submission, SubmissionRow};
use crate::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where peer submissions are kept
pub trait SubmissionStore {
    /// Validate and store a submission with its course grades.
    ///
    /// # Errors
    /// Returns an error if the submission is invalid or cannot be persisted.
    fn insert(&mut self, submission: Submission) -> Result<u64, PeerError>;

    /// All stored submission rows
    fn submissions(&self) -> &[SubmissionRow];

    /// All stored course grade rows
    fn course_grades(&self) -> &[CourseGradeRow];

    /// Number of stored submissions
    fn count(&self) -> usize {
        self.submissions().len()
    }
}

/// In-memory store with sequential identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    submissions: Vec<SubmissionRow>,
    #[serde(default)]
    course_grades: Vec<CourseGradeRow>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> Result<u64, PeerError> {
        match self.submissions.iter().map(|s| s.id).max() {
            None => Ok(1),
            Some(id) => id
                .checked_add(1)
                .ok_or_else(|| PeerError::InvalidRow(format!("no identifier after {id}"))),
        }
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&mut self, submission: Submission) -> Result<u64, PeerError> {
        submission.validate()?;

        let id = self.next_id()?;
        self.course_grades.extend(
            submission
                .courses
                .iter()
                .map(|course| CourseGradeRow::from_course(id, course)),
        );
        self.submissions.push(SubmissionRow {
            id,
            program: submission.program,
            term: submission.term,
            gpa: submission.gpa,
            total_courses: submission.total_courses,
        });
        debug!("Stored submission {id}");
        Ok(id)
    }

    fn submissions(&self) -> &[SubmissionRow] {
        &self.submissions
    }

    fn course_grades(&self) -> &[CourseGradeRow] {
        &self.course_grades
    }
}

/// JSON document on disk, rewritten after every insert
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    rows: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PeerError> {
        let path = path.as_ref().to_path_buf();
        let rows = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            MemoryStore::new()
        };
        info!(
            "Opened submission store {} ({} submissions)",
            path.display(),
            rows.count()
        );
        Ok(Self { path, rows })
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, rows: &MemoryStore) -> Result<(), PeerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(rows)?)?;
        Ok(())
    }
}

impl SubmissionStore for JsonFileStore {
    fn insert(&mut self, submission: Submission) -> Result<u64, PeerError> {
        // Write the updated document before replacing the in-memory copy
        let mut updated = self.rows.clone();
        let id = updated.insert(submission)?;
        self.save(&updated)?;
        self.rows = updated;
        Ok(id)
    }

    fn submissions(&self) -> &[SubmissionRow] {
        self.rows.submissions()
    }

    fn course_grades(&self) -> &[CourseGradeRow] {
        self.rows.course_grades()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Course;
    use tempfile::TempDir;

    fn sample(program: &str, gpa: f64) -> Submission {
        let courses = vec![
            Course::new("CS 135", "Designing Functional Programs", "A", 0.5).with_term("Fall 2022"),
            Course::new("MATH 135", "Algebra", "B", 0.5).with_term("Fall 2022"),
        ];
        Submission::from_courses(program, "Fall 2022", gpa, &courses)
    }

    #[test]
    fn test_memory_store_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        assert_eq!(store.insert(sample("Computer Science", 3.5)).unwrap(), 1);
        assert_eq!(store.insert(sample("Mathematics", 3.0)).unwrap(), 2);

        assert_eq!(store.count(), 2);
        assert_eq!(store.course_grades().len(), 4);
        assert!(store.course_grades()[2..].iter().all(|g| g.submission_id == 2));
    }

    #[test]
    fn test_memory_store_rejects_invalid() {
        let mut store = MemoryStore::new();
        assert!(store.insert(sample("", 3.0)).is_err());
        assert_eq!(store.count(), 0);
        assert!(store.course_grades().is_empty());
    }

    #[test]
    fn test_json_store_persists_between_opens() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("submissions.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.count(), 0);
        store.insert(sample("Computer Science", 3.5)).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.count(), 1);
        assert_eq!(reopened.submissions()[0].program, "Computer Science");
        assert_eq!(reopened.course_grades().len(), 2);
    }

    #[test]
    fn test_json_store_keeps_gpa_bits() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("submissions.json");
        let gpa = 10.9 / 3.0;

        let mut store = JsonFileStore::open(&path).unwrap();
        store.insert(sample("Computer Science", gpa)).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.submissions()[0].gpa.to_bits(), gpa.to_bits());
    }

    #[test]
    fn test_insert_after_max_id_is_rejected() {
        let seeded = r#"{"submissions":[{"id":18446744073709551615,"program":"Computer Science","term":"Fall 2022","gpa":3.0,"total_courses":0}]}"#;
        let mut store: MemoryStore = serde_json::from_str(seeded).unwrap();

        let err = store.insert(sample("Computer Science", 3.5)).unwrap_err();
        assert!(matches!(err, PeerError::InvalidRow(_)));
        assert_eq!(store.count(), 1);
        assert!(store.course_grades().is_empty());
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("submissions.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(PeerError::Json(_))));
    }
}
