//! A project as read from disk: the novel plus its word-count log.

use super::novel::Novel;
use super::wordcount::WordCountLog;

/// What a format reader produces and a format writer consumes.
///
/// `wc_pending` holds log corrections computed while reading a novx file
/// (the actual word count diverged from the latest logged entry). The novx
/// writer merges them; the yw7 writer copies the log verbatim.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub novel: Novel,
    pub wc_log: WordCountLog,
    pub wc_pending: WordCountLog,
}

impl Project {
    pub fn new(novel: Novel) -> Self {
        Self {
            novel,
            wc_log: WordCountLog::new(),
            wc_pending: WordCountLog::new(),
        }
    }
}
