//! Temporal pattern extraction — hourly activity histogram.

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::pipeline::types::EmailRecord;

/// Count of emails received per hour of day (0–23) within one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternHistogram {
    buckets: BTreeMap<u32, u32>,
}

impl PatternHistogram {
    pub fn count(&self, hour: u32) -> u32 {
        self.buckets.get(&hour).copied().unwrap_or(0)
    }

    /// Non-empty buckets in ascending hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.buckets.iter().map(|(&hour, &count)| (hour, count))
    }

    pub fn total(&self) -> u32 {
        self.buckets.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Bucket every record with a known timestamp by its local hour of day.
///
/// Records with unknown timestamps are excluded.
pub fn hourly_histogram(records: &[EmailRecord]) -> PatternHistogram {
    let mut buckets = BTreeMap::new();
    for record in records {
        if let Some(ts) = record.timestamp {
            *buckets.entry(ts.hour()).or_insert(0) += 1;
        }
    }
    PatternHistogram { buckets }
}
