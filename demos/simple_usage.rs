/// Walks the main dealdb operations: ingest, the three cheapest
/// searches, the popularity index and database statistics.

use dealdb::core::config::{DatabaseConfig, TableConfig};
use dealdb::core::database::DealsDatabase;
use dealdb::query::filters::SearchParams;
use dealdb::topdst::database::TopDstDatabase;

fn main() {
    env_logger::init();

    println!("Creating deal database...");
    let db = DealsDatabase::new(DatabaseConfig::default());

    println!("Ingesting deals...");
    db.add_deal("MOW", "MAD", "ES", "2016-05-01", "2016-05-21", true, 5000, b"deal:mad");
    db.add_deal("MOW", "MAD", "ES", "2016-05-02", "2016-05-20", false, 4200, b"deal:mad-cheap");
    db.add_deal("MOW", "BER", "DE", "2016-06-01", "2016-06-11", true, 6000, b"deal:ber");
    db.add_deal("MOW", "PAR", "FR", "2016-07-01", "", true, 3100, b"deal:par-oneway");

    let params = SearchParams {
        origin: "MOW".to_string(),
        destinations: "MAD,BER,PAR".to_string(),
        limit: 10,
        ..SearchParams::default()
    };

    println!("\nCheapest per destination:");
    match db.search_cheapest(&params) {
        Ok(deals) => {
            for deal in &deals {
                println!("  {}  payload={:?}", deal, String::from_utf8_lossy(&deal.payload));
            }
        }
        Err(err) => println!("  search failed: {}", err),
    }

    println!("\nCheapest day by day (May window):");
    let day_by_day = SearchParams {
        departure_date_from: "2016-05-01".to_string(),
        departure_date_to: "2016-05-07".to_string(),
        ..params.clone()
    };
    match db.search_cheapest_day_by_day(&day_by_day) {
        Ok(deals) => {
            for deal in &deals {
                println!("  {}", deal);
            }
        }
        Err(err) => println!("  search failed: {}", err),
    }

    println!("\nCheapest per country:");
    match db.search_cheapest_by_country(&SearchParams {
        origin: "MOW".to_string(),
        limit: 10,
        ..SearchParams::default()
    }) {
        Ok(deals) => {
            for deal in &deals {
                println!("  [{}] {}", deal.destination_country, deal);
            }
        }
        Err(err) => println!("  search failed: {}", err),
    }

    println!("\nPopularity index:");
    let top = TopDstDatabase::new(TableConfig::default());
    top.add_destination("ru", "MAD", "2016-05-01");
    top.add_destination("ru", "MAD", "2016-05-02");
    top.add_destination("ru", "BER", "2016-06-01");
    match top.top_by_locale("ru", "", "", 10) {
        Ok(hits) => {
            for hit in &hits {
                println!("  {} seen {} times", hit.destination, hit.count);
            }
        }
        Err(err) => println!("  query failed: {}", err),
    }

    let stats = db.stats();
    println!("\nStatistics:");
    println!("  deals added:     {}", stats.deals_added);
    println!("  queries served:  {}", stats.queries_served);
    println!("  index pages:     {}", stats.index_pages);
    println!("  payload bytes:   {}", stats.payload_bytes);
}
