use ahash::AHashMap;
use std::collections::hash_map::Entry;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DealInfo;
use crate::query::filters::FilterSet;
use crate::search::aggregator::{replace_cheapest, retained, Aggregator, SearchContext};

/// Output cells cap: destinations times days in the departure window
const MAX_RESULT_CELLS: u32 = 1098;

/// Min-price per (destination, departure date) pair.
///
/// Every cell of the requested grid may end up in the output, so the
/// query must bound it up front: a destination list and a departure
/// window are mandatory and their product is capped. No early price
/// skip; a city-wide expensive deal can still be the cheapest of its
/// day.
pub struct CheapestByDate {
    groups: AHashMap<u32, AHashMap<u32, DealInfo>>,
}

impl CheapestByDate {
    pub fn new() -> Self {
        CheapestByDate {
            groups: AHashMap::new(),
        }
    }
}

impl Default for CheapestByDate {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for CheapestByDate {
    fn pre_search(&mut self, filters: &FilterSet, ctx: &SearchContext) -> Result<()> {
        if !filters.filter_destination {
            return Err(Error::new(
                ErrorKind::BadRequest,
                "destinations list must be specified".to_string(),
            ));
        }
        if !filters.filter_departure_date || filters.departure_date_values.duration == 0 {
            return Err(Error::new(
                ErrorKind::BadRequest,
                "departure dates interval must be specified".to_string(),
            ));
        }
        let cells = u32::from(ctx.result_destinations_count) * filters.departure_date_values.duration;
        if cells > MAX_RESULT_CELLS {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                "too many deals requested, reduce destinations or the dates range".to_string(),
            ));
        }
        Ok(())
    }

    fn reduce(&mut self, deal: &DealInfo) {
        let dates = self.groups.entry(deal.destination).or_default();
        match dates.entry(deal.departure_date) {
            Entry::Occupied(mut slot) => replace_cheapest(slot.get_mut(), deal),
            Entry::Vacant(slot) => {
                slot.insert(retained(deal));
            }
        }
    }

    fn post_search(&mut self) -> Vec<DealInfo> {
        let mut result: Vec<DealInfo> = self
            .groups
            .values()
            .flat_map(|dates| dates.values().copied())
            .collect();
        result.sort_by_key(|deal| deal.departure_date);
        result
    }
}
