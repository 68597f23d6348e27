/// Geometry and expiry of one paged table
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub max_pages: usize,
    /// Record slots per page; byte capacity per page for the payload table
    pub records_per_page: u32,
    pub expiry_secs: u32,
    /// Allow evicting the oldest page even while it is still live
    pub evict_live_pages: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            max_pages: 1000,              // 1k pages x 10k records = 10m deals
            records_per_page: 10_000,
            expiry_secs: 60,
            evict_live_pages: false,
        }
    }
}

/// Full deal database geometry
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub deal_index: TableConfig,
    pub deal_payload: TableConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            deal_index: TableConfig::default(),
            // payload pages are byte slabs; expiry must not undercut the index
            deal_payload: TableConfig {
                max_pages: 10_000,
                records_per_page: 3_200_000,
                expiry_secs: 60,
                evict_live_pages: false,
            },
        }
    }
}
