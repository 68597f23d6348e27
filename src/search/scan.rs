use crate::core::error::Result;
use crate::core::types::DealInfo;
use crate::query::filters::FilterSet;
use crate::search::aggregator::{Aggregator, SearchContext};
use crate::table::fixed::Table;

/// Common search superstructure: validate the query, walk every live page
/// of the deal index once, apply the universal filters in scan order and
/// feed surviving records to the aggregator.
pub fn run_search<A: Aggregator>(
    table: &Table<DealInfo>,
    filters: &FilterSet,
    aggregator: &mut A,
) -> Result<Vec<DealInfo>> {
    filters.ensure_valid()?;

    let ctx = SearchContext {
        result_destinations_count: filters.result_destinations_count(),
        result_limit: filters.result_limit_value(),
    };
    aggregator.pre_search(filters, &ctx)?;

    let now = table.now();
    let expiry = table.expiry_secs();
    table.scan_at(now, |records| {
        for deal in records {
            // a page may still hold records that aged out before the page
            if deal.timestamp + expiry < now {
                continue;
            }
            if !filters.matches(deal) {
                continue;
            }
            aggregator.reduce(deal);
        }
    });

    Ok(aggregator.post_search())
}
