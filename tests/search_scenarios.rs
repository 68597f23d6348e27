//! End-to-end search scenarios over a large randomised corpus.
//!
//! Mirrors production traffic: a burst of soon-to-expire deals, a few
//! known-cheapest ones, then heavy noise priced above them.

use std::sync::Arc;

use rand::Rng;

use dealdb::codecs::{date, weekday};
use dealdb::core::clock::ManualClock;
use dealdb::core::config::DatabaseConfig;
use dealdb::core::database::DealsDatabase;
use dealdb::core::types::Threelean;
use dealdb::query::filters::SearchParams;

const NOISE_BATCH: usize = 50_000;
const DUMB_PAYLOAD: &[u8] = b"1, 2, 3, 4, 5, 6, 7, 8";
const CHECK_PAYLOAD: &[u8] = b"7, 7, 7";

const ORIGINS: [&str; 9] = ["MOW", "MAD", "BER", "LON", "PAR", "LAX", "LED", "FRA", "BAR"];

fn random_origin(rng: &mut impl Rng) -> &'static str {
    ORIGINS[rng.gen_range(0..ORIGINS.len())]
}

fn random_price(rng: &mut impl Rng, min_price: u32) -> u32 {
    min_price + rng.gen_range(0..=0xFFFF)
}

fn random_date(rng: &mut impl Rng, year: u32) -> String {
    let month: u32 = 1 + rng.gen_range(0..=3) + rng.gen_range(0..=3) + rng.gen_range(0..=3);
    let day: u32 = 1 + rng.gen_range(0..=7) + rng.gen_range(0..=7) + rng.gen_range(0..=7);
    date::int_to_date(year * 10_000 + month * 100 + day)
}

struct GoldenDeal {
    destination: &'static str,
    departure_date: &'static str,
    return_date: &'static str,
    price: u32,
}

static GOLDEN: [GoldenDeal; 3] = [
    GoldenDeal {
        destination: "MAD",
        departure_date: "2016-05-01",
        return_date: "2016-05-21",
        price: 5000,
    },
    GoldenDeal {
        destination: "BER",
        departure_date: "2016-06-01",
        return_date: "2016-06-11",
        price: 6000,
    },
    GoldenDeal {
        destination: "PAR",
        departure_date: "2016-07-01",
        return_date: "2016-07-15",
        price: 7000,
    },
];

/// 150k deals that will expire, the three golden deals, then 200k live
/// noise deals priced strictly above every golden price
fn build_corpus() -> (DealsDatabase, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let db = DealsDatabase::with_clock(DatabaseConfig::default(), clock.clone());
    let mut rng = rand::thread_rng();

    for _ in 0..NOISE_BATCH {
        for min_price in [1000, 2000, 3000] {
            db.add_deal(
                random_origin(&mut rng),
                random_origin(&mut rng),
                "",
                &random_date(&mut rng, 2016),
                &random_date(&mut rng, 2016),
                true,
                random_price(&mut rng, min_price),
                DUMB_PAYLOAD,
            );
        }
    }

    // everything above ages out; the golden deals stay fresh
    clock.advance(1000);

    for golden in &GOLDEN {
        assert!(db.add_deal(
            "MOW",
            golden.destination,
            "",
            golden.departure_date,
            golden.return_date,
            true,
            golden.price,
            CHECK_PAYLOAD,
        ));
    }

    clock.advance(5);

    for _ in 0..NOISE_BATCH {
        db.add_deal(
            random_origin(&mut rng),
            "MAD",
            "",
            &random_date(&mut rng, 2015),
            &random_date(&mut rng, 2015),
            true,
            random_price(&mut rng, 5100),
            DUMB_PAYLOAD,
        );
        db.add_deal(
            random_origin(&mut rng),
            "BER",
            "",
            &random_date(&mut rng, 2016),
            &random_date(&mut rng, 2016),
            true,
            random_price(&mut rng, 6200),
            DUMB_PAYLOAD,
        );
        db.add_deal(
            random_origin(&mut rng),
            "PAR",
            "",
            &random_date(&mut rng, 2016),
            &random_date(&mut rng, 2016),
            true,
            random_price(&mut rng, 7200),
            DUMB_PAYLOAD,
        );
        db.add_deal(
            random_origin(&mut rng),
            random_origin(&mut rng),
            "",
            &random_date(&mut rng, 2016),
            &random_date(&mut rng, 2016),
            rng.gen(),
            random_price(&mut rng, 8000),
            DUMB_PAYLOAD,
        );
    }

    (db, clock)
}

#[test]
fn cheapest_by_destination_finds_the_golden_deals() {
    let (db, _clock) = build_corpus();

    let params = SearchParams {
        origin: "MOW".to_string(),
        destinations: "AAA,PAR,BER,MAD".to_string(),
        limit: 10,
        ..SearchParams::default()
    };
    let result = db.search_cheapest(&params).unwrap();

    assert_eq!(result.len(), 3);
    for golden in &GOLDEN {
        let hits: Vec<_> = result
            .iter()
            .filter(|deal| deal.destination == golden.destination)
            .collect();
        assert_eq!(hits.len(), 1, "one result for {}", golden.destination);
        let deal = hits[0];

        assert_eq!(deal.departure_date, golden.departure_date);
        assert_eq!(deal.return_date, golden.return_date);
        if deal.flags.overridden {
            // a fresher equally-priced record with the same shape
            assert_eq!(deal.price, golden.price);
            assert_eq!(deal.payload, DUMB_PAYLOAD);
        } else {
            assert_eq!(deal.price, golden.price);
            assert_eq!(deal.payload, CHECK_PAYLOAD);
        }
    }
}

#[test]
fn cheapest_by_destination_with_date_windows() {
    let (db, _clock) = build_corpus();

    let params = SearchParams {
        origin: "MOW".to_string(),
        destinations: "AAA,PAR,BER,MAD".to_string(),
        departure_date_from: "2016-06-01".to_string(),
        departure_date_to: "2016-06-23".to_string(),
        return_date_from: "2016-06-10".to_string(),
        return_date_to: "2016-06-22".to_string(),
        limit: 10,
        ..SearchParams::default()
    };
    let result = db.search_cheapest(&params).unwrap();

    assert!(result.len() <= 3);
    let mut city_count = [0usize; 3];

    for deal in &result {
        assert!(date::date_to_int(&deal.departure_date) >= 20160601);
        assert!(date::date_to_int(&deal.departure_date) <= 20160623);
        assert!(date::date_to_int(&deal.return_date) >= 20160610);
        assert!(date::date_to_int(&deal.return_date) <= 20160622);

        match deal.destination.as_str() {
            "MAD" => {
                city_count[0] += 1;
                // Madrid noise in this window is generic noise only
                assert!(deal.price >= 8000);
                assert_eq!(deal.payload, DUMB_PAYLOAD);
            }
            "BER" => {
                city_count[1] += 1;
                if deal.flags.overridden {
                    assert_eq!(deal.price, 6000);
                    assert_eq!(deal.payload, DUMB_PAYLOAD);
                } else {
                    assert_eq!(deal.price, 6000);
                    assert_eq!(deal.payload, CHECK_PAYLOAD);
                }
                assert_eq!(deal.departure_date, "2016-06-01");
                assert_eq!(deal.return_date, "2016-06-11");
            }
            "PAR" => {
                city_count[2] += 1;
                // the golden Paris deal departs in July, outside this window
                assert!(deal.price >= 7200);
                assert_eq!(deal.payload, DUMB_PAYLOAD);
            }
            other => panic!("unexpected destination {}", other),
        }
    }

    assert!(city_count[0] <= 1);
    assert_eq!(city_count[1], 1);
    assert!(city_count[2] <= 1);
}

#[test]
fn every_enabled_filter_holds_on_every_result() {
    let (db, _clock) = build_corpus();

    let params = SearchParams {
        origin: "MOW".to_string(),
        departure_days_of_week: "fri,sat,sun".to_string(),
        return_days_of_week: "sat,sun,mon".to_string(),
        stay_from: 4,
        stay_to: 18,
        direct_flights: Threelean::False,
        price_from: 9100,
        price_to: 19200,
        limit: 2000,
        ..SearchParams::default()
    };
    let result = db.search_cheapest(&params).unwrap();

    for deal in &result {
        assert!(deal.price >= 9100 && deal.price <= 19200);
        assert!(deal.stay_days >= 4 && deal.stay_days <= 18);
        assert!(!deal.flags.direct);

        let dep_day = weekday::day_of_week_to_str(deal.flags.departure_day_of_week);
        let ret_day = weekday::day_of_week_to_str(deal.flags.return_day_of_week);
        assert!(matches!(dep_day, "fri" | "sat" | "sun"), "bad departure day {}", dep_day);
        assert!(matches!(ret_day, "sat" | "sun" | "mon"), "bad return day {}", ret_day);

        // flag bits agree with the stored dates
        assert_eq!(
            deal.flags.departure_day_of_week,
            date::day_of_week_from_date(&deal.departure_date)
        );
    }
}
