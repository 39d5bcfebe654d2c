//! Offline cache usage reporting

use serde::{Deserialize, Serialize};

/// Size of the offline audio cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineCacheUsage {
    /// Number of saved tracks
    pub entries: usize,

    /// Sum of stored response body sizes
    pub total_bytes: u64,
}

impl OfflineCacheUsage {
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Returns average bytes per saved track.
    pub fn average_entry_size(&self) -> u64 {
        if self.entries == 0 {
            0
        } else {
            self.total_bytes / self.entries as u64
        }
    }

    /// Calculate usage as a percentage of a host-reported quota.
    pub fn usage_percentage(&self, quota_bytes: u64) -> f64 {
        if quota_bytes == 0 {
            return 0.0;
        }

        (self.total_bytes as f64 / quota_bytes as f64) * 100.0
    }
}
