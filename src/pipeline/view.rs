//! Result-set view — search, sort, and pagination over a settled batch.
//!
//! View state is purely derived: rendering never mutates records or
//! verdicts, and the same final state yields the same slice regardless
//! of the order the fields were set in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::pipeline::types::{Batch, ClassificationVerdict, EmailRecord, VerdictLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Sender,
    Subject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Search, sort, and page selection for the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-indexed; rendering clamps it to the available range.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_field: SortField::Date,
            sort_direction: SortDirection::Desc,
            current_page: 1,
        }
    }
}

impl ViewState {
    /// New state with an updated search term; the page resets to 1
    /// since the matching set changes.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self.current_page = 1;
        self
    }

    /// Toggle sorting on a field: selecting the active field flips the
    /// direction, selecting a new field sorts ascending.
    pub fn toggle_sort(mut self, field: SortField) -> Self {
        if self.sort_field == field {
            self.sort_direction = match self.sort_direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page.max(1);
        self
    }

    /// Apply filter, sort, and pagination over the batch.
    pub fn render<'a>(&self, batch: &'a Batch, page_size: usize) -> PageView<'a> {
        let page_size = page_size.max(1);
        let term = self.search_term.to_lowercase();

        let mut matching: Vec<&EmailRecord> = batch
            .emails
            .iter()
            .filter(|email| matches_term(email, &term))
            .collect();
        matching.sort_by(|a, b| compare(a, b, self.sort_field, self.sort_direction));

        let total_matching = matching.len();
        let total_pages = total_matching.div_ceil(page_size);
        let page = self.current_page.clamp(1, total_pages.max(1));

        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total_matching);
        let entries = matching[start.min(total_matching)..end]
            .iter()
            .map(|email| EmailWithVerdict {
                email,
                verdict: batch.verdict_for(&email.id),
            })
            .collect();

        let (first_index, last_index) = if total_matching == 0 {
            (0, 0)
        } else {
            (start + 1, end)
        };

        PageView {
            entries,
            page,
            total_pages,
            total_matching,
            first_index,
            last_index,
        }
    }
}

/// One displayed email joined with its verdict, resolved by email id.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailWithVerdict<'a> {
    pub email: &'a EmailRecord,
    pub verdict: Option<&'a ClassificationVerdict>,
}

impl EmailWithVerdict<'_> {
    pub fn label(&self) -> VerdictLabel {
        self.verdict
            .map(|v| v.label)
            .unwrap_or(VerdictLabel::Indeterminate)
    }
}

/// The slice of the filtered+sorted sequence for one page, plus
/// pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub entries: Vec<EmailWithVerdict<'a>>,
    /// Effective page after clamping, 1-indexed.
    pub page: usize,
    pub total_pages: usize,
    pub total_matching: usize,
    /// 1-based display index of the first entry, 0 when empty.
    pub first_index: usize,
    /// 1-based display index of the last entry, 0 when empty.
    pub last_index: usize,
}

/// Case-insensitive substring match against sender, subject, and body.
/// An empty term matches everything.
fn matches_term(email: &EmailRecord, lowercase_term: &str) -> bool {
    email.sender.to_lowercase().contains(lowercase_term)
        || email.subject.to_lowercase().contains(lowercase_term)
        || email.body_text.to_lowercase().contains(lowercase_term)
}

fn compare(a: &EmailRecord, b: &EmailRecord, field: SortField, direction: SortDirection) -> Ordering {
    let ordering = match field {
        // `None` (unknown date) sorts as the oldest.
        SortField::Date => a.timestamp.cmp(&b.timestamp),
        SortField::Sender => a.sender.cmp(&b.sender),
        SortField::Subject => a.subject.cmp(&b.subject),
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
