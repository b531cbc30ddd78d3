//! Analysis result types and the merge rule

use serde::{Deserialize, Serialize};

/// Number of headings found at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCount {
    pub level: u8,
    pub count: usize,
}

/// Link reachability counts, by occurrence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub internal: usize,
    pub external: usize,
    pub inaccessible: usize,
}

impl LinkStats {
    pub fn is_zero(&self) -> bool {
        self.internal == 0 && self.external == 0 && self.inaccessible == 0
    }

    pub fn total(&self) -> usize {
        self.internal + self.external + self.inaccessible
    }
}

/// Consolidated facts about one page
///
/// The default value is the identity element for [`AnalyzeResult::merge`].
/// Each strategy fills a fresh instance and the coordinator folds them into
/// one accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResult {
    pub html_version: String,
    pub title: String,
    pub headings: Vec<HeadingCount>,
    pub links: LinkStats,
    pub login_form: bool,
}

impl AnalyzeResult {
    /// Folds a partial result into this one
    ///
    /// A field is overwritten only when the partial carries a present value:
    /// a non-empty string or sequence, non-zero link stats, or `true`.
    pub fn merge(&mut self, partial: AnalyzeResult) {
        if !partial.html_version.is_empty() {
            self.html_version = partial.html_version;
        }
        if !partial.title.is_empty() {
            self.title = partial.title;
        }
        if !partial.headings.is_empty() {
            self.headings = partial.headings;
        }
        if !partial.links.is_zero() {
            self.links = partial.links;
        }
        if partial.login_form {
            self.login_form = true;
        }
    }
}
