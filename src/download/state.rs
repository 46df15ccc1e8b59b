//! Download result aggregation.

/// Outcome of one material download.
///
/// Explicit variants instead of caught exceptions: every task settles into
/// one of these, and summaries are built by folding over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was fully written to its final path.
    Success,
    /// The download failed; the final path was left untouched.
    Failed(String),
    /// The file already existed; no download was attempted.
    Skipped,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success)
    }
}

/// Per-course download summary.
#[derive(Debug, Clone, Default)]
pub struct CourseSummary {
    pub course_name: String,
    pub success_count: u64,
    pub failed_count: u64,
    pub skipped_count: u64,
}

impl CourseSummary {
    pub fn new(course_name: String) -> Self {
        Self {
            course_name,
            ..Default::default()
        }
    }

    /// Fold one settled outcome into the summary.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success => self.success_count += 1,
            DownloadOutcome::Failed(_) => self.failed_count += 1,
            DownloadOutcome::Skipped => self.skipped_count += 1,
        }
    }

    /// Number of downloads actually dispatched (skips excluded).
    pub fn total_dispatched(&self) -> u64 {
        self.success_count + self.failed_count
    }
}

/// Statistics across the whole run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub courses_processed: u64,
    pub courses_failed: u64,
    pub success_count: u64,
    pub failed_count: u64,
    pub skipped_count: u64,
}

impl RunStats {
    /// Add a completed course's summary.
    pub fn add_course(&mut self, summary: &CourseSummary) {
        self.courses_processed += 1;
        self.success_count += summary.success_count;
        self.failed_count += summary.failed_count;
        self.skipped_count += summary.skipped_count;
    }

    /// Mark a course as failed at the course boundary.
    pub fn mark_course_failed(&mut self) {
        self.courses_failed += 1;
    }
}
