use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;

use crate::codecs::{date, place};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::DatabaseConfig;
use crate::core::error::Result;
use crate::core::stats::DatabaseStats;
use crate::core::types::{Deal, DealFlags, DealInfo};
use crate::query::filters::{FilterSet, SearchParams};
use crate::search::aggregator::Aggregator;
use crate::search::by_country::CheapestByCountry;
use crate::search::by_date::CheapestByDate;
use crate::search::by_destination::CheapestByDestination;
use crate::search::scan::run_search;
use crate::table::fixed::Table;
use crate::table::payload::PayloadTable;

/// Deal search engine facade.
///
/// Pairs the fixed-record deal index with the variable-payload table,
/// encodes external arguments through the codecs, routes queries to the
/// right aggregator and hydrates results by re-reading the payload table.
/// Single writer, any number of concurrent readers.
pub struct DealsDatabase {
    clock: Arc<dyn Clock>,
    index: Table<DealInfo>,
    payload: PayloadTable,
    started_at: u32,
    deals_added: AtomicU64,
    queries_served: AtomicU64,
}

impl DealsDatabase {
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: DatabaseConfig, clock: Arc<dyn Clock>) -> Self {
        let started_at = clock.now_sec();
        DealsDatabase {
            index: Table::new(config.deal_index, clock.clone()),
            payload: PayloadTable::new(config.deal_payload, clock.clone()),
            clock,
            started_at,
            deals_added: AtomicU64::new(0),
            queries_served: AtomicU64::new(0),
        }
    }

    /// Ingest one deal; false when an argument does not encode or the
    /// tables are full.
    ///
    /// `destination_country` may be empty when unknown (such deals are
    /// invisible to the by-country search); an empty `return_date` makes
    /// the deal one-way. The payload is stored opaquely and comes back
    /// byte for byte on hydration.
    #[allow(clippy::too_many_arguments)]
    pub fn add_deal(
        &self,
        origin: &str,
        destination: &str,
        destination_country: &str,
        departure_date: &str,
        return_date: &str,
        direct_flight: bool,
        price: u32,
        payload: &[u8],
    ) -> bool {
        let origin_code = place::place_to_code(origin);
        if origin_code == 0 {
            warn!("rejected deal: bad origin {:?}", origin);
            return false;
        }
        let destination_code = place::place_to_code(destination);
        if destination_code == 0 {
            warn!("rejected deal: bad destination {:?}", destination);
            return false;
        }
        let country_code = if destination_country.is_empty() {
            0
        } else {
            let code = place::country_to_code(destination_country);
            if code == 0 {
                warn!("rejected deal: bad destination country {:?}", destination_country);
                return false;
            }
            code
        };
        let departure_date_int = date::date_to_int(departure_date);
        if departure_date_int == 0 {
            warn!("rejected deal: bad departure date {:?}", departure_date);
            return false;
        }
        let return_date_int = date::date_to_int(return_date);
        if return_date_int == 0 && !return_date.is_empty() {
            warn!("rejected deal: bad return date {:?}", return_date);
            return false;
        }

        let locator = match self.payload.append(payload) {
            Ok(locator) => locator,
            Err(err) => {
                warn!("rejected deal: payload append failed: {}", err);
                return false;
            }
        };

        let stay_days = if return_date_int != 0 {
            date::days_between(departure_date, return_date).min(255) as u8
        } else {
            u8::MAX
        };

        let info = DealInfo {
            timestamp: self.clock.now_sec(),
            origin: origin_code,
            destination: destination_code,
            destination_country: country_code,
            departure_date: departure_date_int,
            return_date: return_date_int,
            stay_days,
            flags: DealFlags {
                direct: direct_flight,
                overridden: false,
                departure_day_of_week: date::day_of_week_from_date(departure_date),
                return_day_of_week: date::day_of_week_from_date(return_date),
            },
            price,
            payload: locator,
        };

        match self.index.append(info) {
            Ok(_) => {
                self.deals_added.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(err) => {
                warn!("rejected deal: index append failed: {}", err);
                false
            }
        }
    }

    /// Cheapest deal per destination city, sorted by price
    pub fn search_cheapest(&self, params: &SearchParams) -> Result<Vec<Deal>> {
        self.run_query(params, CheapestByDestination::new())
    }

    /// Cheapest deal per (destination, departure date) cell, sorted by date
    pub fn search_cheapest_day_by_day(&self, params: &SearchParams) -> Result<Vec<Deal>> {
        self.run_query(params, CheapestByDate::new())
    }

    /// Cheapest deal per destination country, sorted by country code
    pub fn search_cheapest_by_country(&self, params: &SearchParams) -> Result<Vec<Deal>> {
        self.run_query(params, CheapestByCountry::new())
    }

    fn run_query<A: Aggregator>(&self, params: &SearchParams, mut aggregator: A) -> Result<Vec<Deal>> {
        let mut filters = FilterSet::new();
        filters.apply(params, self.clock.now_sec());
        let found = run_search(&self.index, &filters, &mut aggregator)?;
        self.queries_served.fetch_add(1, Ordering::Relaxed);
        Ok(self.hydrate(found))
    }

    /// Decode index records and copy their payload bytes back in.
    /// A locator whose page expired mid-flight yields an empty payload.
    fn hydrate(&self, found: Vec<DealInfo>) -> Vec<Deal> {
        found
            .into_iter()
            .map(|deal| Deal {
                timestamp: deal.timestamp,
                origin: place::code_to_place(deal.origin),
                destination: place::code_to_place(deal.destination),
                destination_country: place::code_to_country(deal.destination_country),
                departure_date: date::int_to_date(deal.departure_date),
                return_date: date::int_to_date(deal.return_date),
                stay_days: deal.stay_days,
                flags: deal.flags,
                price: deal.price,
                payload: self.payload.read(&deal.payload).unwrap_or_default(),
            })
            .collect()
    }

    /// Drop every page of both tables
    pub fn truncate(&self) {
        self.payload.truncate();
        self.index.truncate();
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            uptime_secs: self.clock.now_sec().saturating_sub(self.started_at),
            index_pages: self.index.page_count(),
            index_records: self.index.record_count(),
            payload_pages: self.payload.page_count(),
            payload_bytes: self.payload.byte_count(),
            deals_added: self.deals_added.load(Ordering::Relaxed),
            queries_served: self.queries_served.load(Ordering::Relaxed),
        }
    }
}
