use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::core::clock::Clock;
use crate::core::config::TableConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Locator;
use crate::table::page::Page;

/// Append-only store of fixed-size records partitioned into expiring pages.
///
/// The writer appends to the newest page and allocates a fresh one when it
/// fills up, evicting the oldest page only once it has expired (or always,
/// with `evict_live_pages`). Scans walk every live page; expired pages are
/// invisible and get reclaimed on the next allocation. One writer, any
/// number of readers.
pub struct Table<R> {
    config: TableConfig,
    clock: Arc<dyn Clock>,
    pages: RwLock<Vec<Arc<Page<R>>>>,
    next_page_id: AtomicU32,
}

impl<R: Copy> Table<R> {
    pub fn new(config: TableConfig, clock: Arc<dyn Clock>) -> Self {
        Table {
            config,
            clock,
            pages: RwLock::new(Vec::new()),
            next_page_id: AtomicU32::new(0),
        }
    }

    pub fn now(&self) -> u32 {
        self.clock.now_sec()
    }

    pub fn expiry_secs(&self) -> u32 {
        self.config.expiry_secs
    }

    pub fn append(&self, record: R) -> Result<Locator> {
        let now = self.now();

        // fast path: the newest page still has room and has not aged out
        if let Some(page) = self.pages.read().last() {
            if !page.is_expired(now, self.config.expiry_secs) {
                if let Some(index) = page.push(record) {
                    return Ok(Locator { page_id: page.id, index, size: 1 });
                }
            }
        }

        let page = self.allocate_page(now)?;
        match page.push(record) {
            Some(index) => Ok(Locator { page_id: page.id, index, size: 1 }),
            None => Err(Error::new(
                ErrorKind::Internal,
                "freshly allocated page rejected a record".to_string(),
            )),
        }
    }

    fn allocate_page(&self, now: u32) -> Result<Arc<Page<R>>> {
        let mut pages = self.pages.write();

        // drop pages that aged out since the last allocation
        pages.retain(|page| {
            let expired = page.is_expired(now, self.config.expiry_secs);
            if expired {
                debug!("reclaiming expired page {}", page.id);
            }
            !expired
        });

        if pages.len() >= self.config.max_pages {
            if !self.config.evict_live_pages {
                return Err(Error::new(
                    ErrorKind::TableFull,
                    "all pages are live and eviction is disabled".to_string(),
                ));
            }
            // the front page is always the oldest
            let dropped = pages.remove(0);
            debug!("evicted live page {} created at {}", dropped.id, dropped.created_at);
        }

        let id = self.next_page_id.fetch_add(1, Ordering::Relaxed);
        let page = Arc::new(Page::new(id, now, self.config.records_per_page));
        debug!("allocated page {}", id);
        pages.push(page.clone());
        Ok(page)
    }

    /// Record at `locator`, copied out; Expired once the page aged out
    pub fn read(&self, locator: &Locator) -> Result<R> {
        let now = self.now();
        let pages = self.pages.read();
        let page = pages
            .iter()
            .find(|page| page.id == locator.page_id)
            .filter(|page| !page.is_expired(now, self.config.expiry_secs))
            .ok_or_else(|| {
                Error::new(ErrorKind::Expired, format!("page {} has expired", locator.page_id))
            })?;
        page.get(locator.index).ok_or_else(|| {
            Error::new(
                ErrorKind::Internal,
                format!("record {}:{} out of range", locator.page_id, locator.index),
            )
        })
    }

    /// Visit the records of every page live at `now`
    pub fn scan_at<F: FnMut(&[R])>(&self, now: u32, mut visitor: F) {
        let pages: Vec<Arc<Page<R>>> = self.pages.read().clone();
        for page in pages {
            if page.is_expired(now, self.config.expiry_secs) {
                continue;
            }
            page.with_records(|records| visitor(records));
        }
    }

    /// Visit every live page; `now` is computed once at entry
    pub fn scan<F: FnMut(&[R])>(&self, visitor: F) {
        self.scan_at(self.now(), visitor)
    }

    pub fn truncate(&self) {
        self.pages.write().clear();
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    pub fn record_count(&self) -> u64 {
        self.pages.read().iter().map(|page| u64::from(page.used())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    fn small_table(max_pages: usize, records_per_page: u32) -> (Table<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1000));
        let config = TableConfig {
            max_pages,
            records_per_page,
            expiry_secs: 60,
            evict_live_pages: false,
        };
        (Table::new(config, clock.clone()), clock)
    }

    #[test]
    fn append_and_read_round_trip() {
        let (table, _clock) = small_table(4, 2);
        let a = table.append(11).unwrap();
        let b = table.append(22).unwrap();
        let c = table.append(33).unwrap();
        assert_eq!((a.page_id, a.index), (0, 0));
        assert_eq!((b.page_id, b.index), (0, 1));
        assert_eq!((c.page_id, c.index), (1, 0));
        assert_eq!(table.read(&b).unwrap(), 22);
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.record_count(), 3);
    }

    #[test]
    fn read_after_expiry_fails() {
        let (table, clock) = small_table(4, 2);
        let locator = table.append(11).unwrap();
        clock.advance(61);
        let err = table.read(&locator).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expired);
    }

    #[test]
    fn scan_skips_expired_pages() {
        let (table, clock) = small_table(8, 2);
        table.append(1).unwrap();
        table.append(2).unwrap();
        clock.advance(61);
        table.append(3).unwrap();

        let mut seen = Vec::new();
        table.scan(|records| seen.extend_from_slice(records));
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn full_table_rejects_appends() {
        let (table, _clock) = small_table(2, 2);
        for value in 0..4 {
            table.append(value).unwrap();
        }
        let err = table.append(99).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TableFull);
    }

    #[test]
    fn expired_pages_are_reclaimed_on_allocation() {
        let (table, clock) = small_table(2, 2);
        for value in 0..4 {
            table.append(value).unwrap();
        }
        clock.advance(61);
        table.append(5).unwrap();
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn live_eviction_when_configured() {
        let clock = Arc::new(ManualClock::new(1000));
        let config = TableConfig {
            max_pages: 2,
            records_per_page: 1,
            expiry_secs: 60,
            evict_live_pages: true,
        };
        let table: Table<u32> = Table::new(config, clock);
        for value in 0..3 {
            table.append(value).unwrap();
        }
        assert_eq!(table.page_count(), 2);
        let mut seen = Vec::new();
        table.scan(|records| seen.extend_from_slice(records));
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn truncate_drops_everything() {
        let (table, _clock) = small_table(4, 2);
        table.append(1).unwrap();
        table.truncate();
        assert_eq!(table.page_count(), 0);
        let mut seen = Vec::new();
        table.scan(|records: &[u32]| seen.extend_from_slice(records));
        assert!(seen.is_empty());
    }
}
