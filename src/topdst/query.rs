use serde::{Deserialize, Serialize};

use crate::codecs::place;
use crate::core::error::Result;
use crate::core::types::DstInfo;
use crate::query::filters::FilterSet;
use crate::table::fixed::Table;

/// Observation count for one destination within the queried window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopDestination {
    pub destination: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
struct DstCount {
    destination: u32,
    count: u32,
}

/// Count observations per destination over all live pages and keep the
/// top ones.
///
/// The hit list is a linear vector on purpose: a locale observes a small
/// set of destinations. Swap it for a hash map if that stops being true.
pub(crate) fn run_top_query(table: &Table<DstInfo>, filters: &FilterSet) -> Result<Vec<TopDestination>> {
    filters.ensure_valid()?;

    let mut hits: Vec<DstCount> = Vec::new();
    table.scan(|records| {
        for info in records {
            if filters.filter_locale && filters.locale_value != info.locale {
                continue;
            }
            if filters.filter_departure_date
                && !filters.departure_date_values.contains(info.departure_date)
            {
                continue;
            }
            match hits.iter_mut().find(|hit| hit.destination == info.destination) {
                Some(hit) => hit.count += 1,
                None => hits.push(DstCount {
                    destination: info.destination,
                    count: 1,
                }),
            }
        }
    });

    hits.sort_by(|a, b| b.count.cmp(&a.count));
    hits.truncate(filters.result_limit_value() as usize);

    Ok(hits
        .into_iter()
        .map(|hit| TopDestination {
            destination: place::code_to_place(hit.destination),
            count: hit.count,
        })
        .collect())
}
