use serde::{Deserialize, Serialize};

/// Database statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub uptime_secs: u32,

    // Storage metrics
    pub index_pages: usize,
    pub index_records: u64,
    pub payload_pages: usize,
    pub payload_bytes: u64,

    // Traffic counters
    pub deals_added: u64,
    pub queries_served: u64,
}
