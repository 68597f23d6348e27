use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::core::clock::Clock;
use crate::core::config::TableConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::Locator;
use crate::table::page::PayloadPage;

/// Paged store for opaque variable-length byte slabs.
///
/// Same page lifecycle as [`crate::table::fixed::Table`]; a page here is a
/// byte arena (`records_per_page` is its byte capacity) and a locator
/// addresses `(page, offset, len)`. The engine never interprets the bytes.
pub struct PayloadTable {
    config: TableConfig,
    clock: Arc<dyn Clock>,
    pages: RwLock<Vec<Arc<PayloadPage>>>,
    next_page_id: AtomicU32,
}

impl PayloadTable {
    pub fn new(config: TableConfig, clock: Arc<dyn Clock>) -> Self {
        PayloadTable {
            config,
            clock,
            pages: RwLock::new(Vec::new()),
            next_page_id: AtomicU32::new(0),
        }
    }

    pub fn append(&self, data: &[u8]) -> Result<Locator> {
        if data.len() > self.config.records_per_page as usize {
            return Err(Error::new(
                ErrorKind::InvalidSize,
                format!("payload of {} bytes exceeds page capacity", data.len()),
            ));
        }
        let now = self.clock.now_sec();

        if let Some(page) = self.pages.read().last() {
            if !page.is_expired(now, self.config.expiry_secs) {
                if let Some(offset) = page.push(data) {
                    return Ok(Locator {
                        page_id: page.id,
                        index: offset,
                        size: data.len() as u32,
                    });
                }
            }
        }

        let page = self.allocate_page(now)?;
        match page.push(data) {
            Some(offset) => Ok(Locator {
                page_id: page.id,
                index: offset,
                size: data.len() as u32,
            }),
            None => Err(Error::new(
                ErrorKind::Internal,
                "freshly allocated payload page rejected a slab".to_string(),
            )),
        }
    }

    fn allocate_page(&self, now: u32) -> Result<Arc<PayloadPage>> {
        let mut pages = self.pages.write();

        pages.retain(|page| {
            let expired = page.is_expired(now, self.config.expiry_secs);
            if expired {
                debug!("reclaiming expired payload page {}", page.id);
            }
            !expired
        });

        if pages.len() >= self.config.max_pages {
            if !self.config.evict_live_pages {
                return Err(Error::new(
                    ErrorKind::TableFull,
                    "all payload pages are live and eviction is disabled".to_string(),
                ));
            }
            let dropped = pages.remove(0);
            debug!("evicted live payload page {}", dropped.id);
        }

        let id = self.next_page_id.fetch_add(1, Ordering::Relaxed);
        let page = Arc::new(PayloadPage::new(id, now, self.config.records_per_page));
        pages.push(page.clone());
        Ok(page)
    }

    /// Fresh copy of the slab at `locator`; Expired once the page aged out
    pub fn read(&self, locator: &Locator) -> Result<Vec<u8>> {
        let now = self.clock.now_sec();
        let pages = self.pages.read();
        let page = pages
            .iter()
            .find(|page| page.id == locator.page_id)
            .filter(|page| !page.is_expired(now, self.config.expiry_secs))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Expired,
                    format!("payload page {} has expired", locator.page_id),
                )
            })?;
        page.get(locator.index, locator.size).ok_or_else(|| {
            Error::new(
                ErrorKind::Internal,
                format!("payload {}:{} out of range", locator.page_id, locator.index),
            )
        })
    }

    pub fn truncate(&self) {
        self.pages.write().clear();
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    pub fn byte_count(&self) -> u64 {
        self.pages.read().iter().map(|page| u64::from(page.used())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    fn small_table(page_bytes: u32) -> (PayloadTable, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1000));
        let config = TableConfig {
            max_pages: 4,
            records_per_page: page_bytes,
            expiry_secs: 60,
            evict_live_pages: false,
        };
        (PayloadTable::new(config, clock.clone()), clock)
    }

    #[test]
    fn slab_round_trip() {
        let (table, _clock) = small_table(16);
        let a = table.append(b"7, 7, 7").unwrap();
        let b = table.append(b"1, 2, 3").unwrap();
        assert_eq!(table.read(&a).unwrap(), b"7, 7, 7");
        assert_eq!(table.read(&b).unwrap(), b"1, 2, 3");
    }

    #[test]
    fn slab_spills_to_next_page() {
        let (table, _clock) = small_table(8);
        table.append(b"abcde").unwrap();
        let b = table.append(b"fghij").unwrap();
        assert_eq!(b.page_id, 1);
        assert_eq!(b.index, 0);
        assert_eq!(table.read(&b).unwrap(), b"fghij");
    }

    #[test]
    fn oversized_slab_is_rejected() {
        let (table, _clock) = small_table(8);
        let err = table.append(b"way too large").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSize);
    }

    #[test]
    fn read_after_expiry_fails() {
        let (table, clock) = small_table(16);
        let locator = table.append(b"payload").unwrap();
        clock.advance(61);
        assert_eq!(table.read(&locator).unwrap_err().kind, ErrorKind::Expired);
    }

    #[test]
    fn empty_slab_is_stored() {
        let (table, _clock) = small_table(16);
        let locator = table.append(b"").unwrap();
        assert_eq!(locator.size, 0);
        assert_eq!(table.read(&locator).unwrap(), Vec::<u8>::new());
    }
}
