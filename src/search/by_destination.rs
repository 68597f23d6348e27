use ahash::AHashMap;
use std::collections::hash_map::Entry;

use crate::core::error::Result;
use crate::core::types::DealInfo;
use crate::query::filters::FilterSet;
use crate::search::aggregator::{
    replace_cheapest, retained, Aggregator, GroupLimiter, SearchContext,
};

/// Min-price per destination city
pub struct CheapestByDestination {
    groups: AHashMap<u32, DealInfo>,
    limiter: GroupLimiter,
    result_destinations_count: u16,
    result_limit: u16,
}

impl CheapestByDestination {
    pub fn new() -> Self {
        CheapestByDestination {
            groups: AHashMap::new(),
            limiter: GroupLimiter::tightening(0),
            result_destinations_count: 0,
            result_limit: 0,
        }
    }
}

impl Default for CheapestByDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for CheapestByDestination {
    fn pre_search(&mut self, _filters: &FilterSet, ctx: &SearchContext) -> Result<()> {
        self.result_destinations_count = ctx.result_destinations_count;
        self.result_limit = ctx.result_limit;
        self.limiter = GroupLimiter::tightening(ctx.result_destinations_count as usize);
        Ok(())
    }

    fn reduce(&mut self, deal: &DealInfo) {
        if self.limiter.should_skip(self.groups.len(), deal.price) {
            return;
        }
        match self.groups.entry(deal.destination) {
            Entry::Occupied(mut slot) => replace_cheapest(slot.get_mut(), deal),
            Entry::Vacant(slot) => {
                slot.insert(retained(deal));
            }
        }
    }

    fn post_search(&mut self) -> Vec<DealInfo> {
        let mut result: Vec<DealInfo> = self.groups.values().copied().collect();
        result.sort_by_key(|deal| deal.price);
        result.truncate(self.result_destinations_count as usize);
        result.truncate(self.result_limit as usize);
        result
    }
}
