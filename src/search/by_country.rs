use ahash::AHashMap;
use std::collections::hash_map::Entry;

use crate::core::error::Result;
use crate::core::types::DealInfo;
use crate::query::filters::FilterSet;
use crate::search::aggregator::{
    replace_cheapest, retained, Aggregator, GroupLimiter, SearchContext,
};

/// Min-price per destination country.
///
/// Records without a country (field 0) carry no group key and are skipped.
pub struct CheapestByCountry {
    groups: AHashMap<u32, DealInfo>,
    limiter: GroupLimiter,
}

impl CheapestByCountry {
    pub fn new() -> Self {
        CheapestByCountry {
            groups: AHashMap::new(),
            limiter: GroupLimiter::rising(0),
        }
    }
}

impl Default for CheapestByCountry {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for CheapestByCountry {
    fn pre_search(&mut self, _filters: &FilterSet, ctx: &SearchContext) -> Result<()> {
        self.limiter = GroupLimiter::rising(ctx.result_destinations_count as usize);
        Ok(())
    }

    fn reduce(&mut self, deal: &DealInfo) {
        if deal.destination_country == 0 {
            return;
        }
        if self.limiter.should_skip(self.groups.len(), deal.price) {
            return;
        }
        match self.groups.entry(deal.destination_country) {
            Entry::Occupied(mut slot) => replace_cheapest(slot.get_mut(), deal),
            Entry::Vacant(slot) => {
                slot.insert(retained(deal));
            }
        }
    }

    fn post_search(&mut self) -> Vec<DealInfo> {
        let mut result: Vec<DealInfo> = self.groups.values().copied().collect();
        result.sort_by_key(|deal| deal.destination_country);
        result
    }
}
