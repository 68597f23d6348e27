use crate::core::error::Result;
use crate::core::types::DealInfo;
use crate::query::filters::FilterSet;

/// Figures the scan driver computes once per query for the aggregator
#[derive(Debug, Clone, Copy)]
pub struct SearchContext {
    /// Number of groups the query may emit
    pub result_destinations_count: u16,
    pub result_limit: u16,
}

/// Group-by-and-minimise strategy plugged into the scan driver.
///
/// `pre_search` may reject the query, `reduce` folds one record that
/// survived the universal filters, `post_search` orders and truncates
/// the grouped result.
pub trait Aggregator {
    fn pre_search(&mut self, filters: &FilterSet, ctx: &SearchContext) -> Result<()>;
    fn reduce(&mut self, deal: &DealInfo);
    fn post_search(&mut self) -> Vec<DealInfo>;
}

/// A candidate entering an empty group slot starts with `overridden`
/// clear
pub(crate) fn retained(deal: &DealInfo) -> DealInfo {
    let mut kept = *deal;
    kept.flags.overridden = false;
    kept
}

/// Shared replace policy for an occupied group slot: keep the cheapest
/// deal, preferring the freshest record on exact price/date/stops ties
pub(crate) fn replace_cheapest(current: &mut DealInfo, deal: &DealInfo) {
    if deal.price < current.price {
        *current = retained(deal);
    } else if deal.price == current.price
        && deal.departure_date == current.departure_date
        && deal.return_date == current.return_date
        && deal.flags.direct == current.flags.direct
    {
        *current = *deal;
        current.flags.overridden = true;
    }
}

/// Early skip once the group map is saturated.
///
/// Tracks the running maximum of grouped prices; past the group budget a
/// candidate at or above that ceiling cannot improve any group the final
/// sort would keep. The two aggregations that use it treat the ceiling
/// differently once saturated: the by-destination search pulls it down to
/// each surviving candidate, the by-country search leaves it where it is.
#[derive(Debug)]
pub(crate) struct GroupLimiter {
    max_groups: usize,
    grouped_max_price: u32,
    tighten: bool,
}

impl GroupLimiter {
    /// Saturated ceiling follows each surviving candidate down
    pub fn tightening(max_groups: usize) -> Self {
        GroupLimiter {
            max_groups,
            grouped_max_price: 0,
            tighten: true,
        }
    }

    /// Ceiling only ever rises; saturation just stops raising it
    pub fn rising(max_groups: usize) -> Self {
        GroupLimiter {
            max_groups,
            grouped_max_price: 0,
            tighten: false,
        }
    }

    /// True when the candidate can be dropped before the map lookup
    pub fn should_skip(&mut self, group_count: usize, price: u32) -> bool {
        if group_count > self.max_groups {
            if price >= self.grouped_max_price {
                return true;
            }
            if self.tighten {
                self.grouped_max_price = price;
                return false;
            }
        }
        if price > self.grouped_max_price {
            self.grouped_max_price = price;
        }
        false
    }
}
