pub mod codecs;
pub mod core;
pub mod query;
pub mod search;
pub mod table;
pub mod topdst;

/*
┌──────────────────────────────────────────────────────────────────────┐
│                        DEALDB LAYER MAP                              │
└──────────────────────────────────────────────────────────────────────┘

  core::database::DealsDatabase          topdst::database::TopDstDatabase
      │  add_deal / search_* / truncate      │  add_destination / top_by_locale
      │                                      │
      ├── table::fixed::Table<DealInfo>      └── table::fixed::Table<DstInfo>
      ├── table::payload::PayloadTable
      │       (expiring pages, single writer, many readers)
      │
      ├── query::filters::FilterSet     validated filter parameters
      │
      └── search::scan::run_search      one pass over all live pages
              │
              ├── search::by_destination::CheapestByDestination
              ├── search::by_country::CheapestByCountry
              └── search::by_date::CheapestByDate
                      (group-by + min-price, freshest-on-tie replace)

  codecs::{place, locale, date, weekday}   textual ↔ packed integer forms
  core::{clock, config, error, stats}      ambient plumbing
*/
