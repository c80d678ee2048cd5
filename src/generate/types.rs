use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateSummary {
    pub output: String,
    pub pages: usize,
    pub pages_failed: usize,
    pub episodes: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// What one archive page contributed.
#[derive(Debug, Default)]
pub struct PageYield {
    pub records: Vec<crate::extract::EpisodeRecord>,
    pub skipped: usize,
}
