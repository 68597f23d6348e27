use std::sync::Arc;

use log::warn;

use crate::codecs::{date, locale, place};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::TableConfig;
use crate::core::error::Result;
use crate::core::types::DstInfo;
use crate::query::filters::FilterSet;
use crate::table::fixed::Table;
use crate::topdst::query::{run_top_query, TopDestination};

/// Popularity index: counts how often a (locale, destination, departure
/// date) tuple has been observed and answers top-N queries per locale.
pub struct TopDstDatabase {
    index: Table<DstInfo>,
}

impl TopDstDatabase {
    pub fn new(config: TableConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TableConfig, clock: Arc<dyn Clock>) -> Self {
        TopDstDatabase {
            index: Table::new(config, clock),
        }
    }

    /// Record one observation; false when an argument does not encode
    pub fn add_destination(&self, locale_str: &str, destination: &str, departure_date: &str) -> bool {
        let locale_code = locale::locale_to_code(locale_str);
        if locale_code == 0 {
            warn!("rejected observation: bad locale {:?}", locale_str);
            return false;
        }
        let destination_code = place::place_to_code(destination);
        if destination_code == 0 {
            warn!("rejected observation: bad destination {:?}", destination);
            return false;
        }
        let departure_date_int = date::date_to_int(departure_date);
        if departure_date_int == 0 {
            warn!("rejected observation: bad departure date {:?}", departure_date);
            return false;
        }

        let info = DstInfo {
            locale: locale_code,
            destination: destination_code,
            departure_date: departure_date_int,
        };
        match self.index.append(info) {
            Ok(_) => true,
            Err(err) => {
                warn!("observation append failed: {}", err);
                false
            }
        }
    }

    /// Top destinations for a locale within a departure-date window
    pub fn top_by_locale(
        &self,
        locale_str: &str,
        departure_date_from: &str,
        departure_date_to: &str,
        limit: u16,
    ) -> Result<Vec<TopDestination>> {
        let mut filters = FilterSet::new();
        filters
            .locale(locale_str)
            .departure_dates(departure_date_from, departure_date_to)
            .result_limit(limit);
        run_top_query(&self.index, &filters)
    }

    pub fn truncate(&self) {
        self.index.truncate();
    }
}
