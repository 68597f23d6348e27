use ahash::AHashSet;
use log::{debug, warn};

use crate::codecs::{date, locale, place, weekday};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DealInfo, Threelean};
use crate::query::types::{DateRange, PriceRange, StayRange};

pub const DEFAULT_RESULT_LIMIT: u16 = 20;

/// The full cheapest-search parameter tuple of the public query API.
///
/// Empty strings disable the corresponding filter; zeros disable the
/// numeric ones; `Threelean::Undefined` disables the flag filters.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub origin: String,
    pub destinations: String,
    pub departure_date_from: String,
    pub departure_date_to: String,
    pub departure_days_of_week: String,
    pub return_date_from: String,
    pub return_date_to: String,
    pub return_days_of_week: String,
    pub stay_from: u16,
    pub stay_to: u16,
    pub direct_flights: Threelean,
    pub price_from: u32,
    pub price_to: u32,
    pub limit: u16,
    pub max_lifetime_sec: u32,
    pub roundtrip_flights: Threelean,
}

/// Validated set of enabled filters for one search.
///
/// Setters reject malformed input by flagging the whole query broken;
/// [`FilterSet::ensure_valid`] turns that flag into a request error
/// before any scan starts.
#[derive(Debug, Clone)]
pub struct FilterSet {
    pub(crate) filter_origin: bool,
    pub(crate) origin_value: u32,

    pub(crate) filter_destination: bool,
    pub(crate) destination_values: AHashSet<u32>,

    pub(crate) filter_departure_date: bool,
    pub(crate) departure_date_values: DateRange,

    pub(crate) filter_return_date: bool,
    pub(crate) return_date_values: DateRange,

    pub(crate) filter_timestamp: bool,
    pub(crate) timestamp_value: u32,

    pub(crate) filter_stops: bool,
    pub(crate) direct_flights_flag: bool,

    pub(crate) filter_roundtrip: bool,
    pub(crate) roundtrip_flag: bool,

    pub(crate) filter_departure_weekdays: bool,
    pub(crate) departure_weekdays_bitmask: u8,

    pub(crate) filter_return_weekdays: bool,
    pub(crate) return_weekdays_bitmask: u8,

    pub(crate) filter_stay_days: bool,
    pub(crate) stay_days_values: StayRange,

    pub(crate) filter_price: bool,
    pub(crate) price_values: PriceRange,

    pub(crate) filter_locale: bool,
    pub(crate) locale_value: u16,

    pub(crate) limit: u16,
    pub(crate) query_is_broken: bool,
}

impl Default for FilterSet {
    fn default() -> Self {
        FilterSet {
            filter_origin: false,
            origin_value: 0,
            filter_destination: false,
            destination_values: AHashSet::new(),
            filter_departure_date: false,
            departure_date_values: DateRange::default(),
            filter_return_date: false,
            return_date_values: DateRange::default(),
            filter_timestamp: false,
            timestamp_value: 0,
            filter_stops: false,
            direct_flights_flag: false,
            filter_roundtrip: false,
            roundtrip_flag: false,
            filter_departure_weekdays: false,
            departure_weekdays_bitmask: 0,
            filter_return_weekdays: false,
            return_weekdays_bitmask: 0,
            filter_stay_days: false,
            stay_days_values: StayRange::default(),
            filter_price: false,
            price_values: PriceRange::default(),
            filter_locale: false,
            locale_value: 0,
            limit: DEFAULT_RESULT_LIMIT,
            query_is_broken: false,
        }
    }
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 3-letter origin; empty input leaves the filter off
    pub fn origin(&mut self, origin: &str) -> &mut Self {
        if origin.is_empty() {
            return self;
        }
        let code = place::place_to_code(origin);
        if code == 0 {
            warn!("broken query: bad origin {:?}", origin);
            self.query_is_broken = true;
            return self;
        }
        self.filter_origin = true;
        self.origin_value = code;
        self
    }

    /// CSV of 3-letter destinations; invalid tokens are dropped, and the
    /// filter stays off when none survive
    pub fn destinations(&mut self, destinations: &str) -> &mut Self {
        if destinations.is_empty() {
            return self;
        }
        let mut values = AHashSet::new();
        for token in destinations.split(',') {
            let code = place::place_to_code(token.trim());
            if code == 0 {
                debug!("dropping bad destination {:?}", token);
                continue;
            }
            values.insert(code);
        }
        if values.is_empty() {
            return self;
        }
        self.filter_destination = true;
        self.destination_values = values;
        self
    }

    /// Departure date window; both ends empty disables the filter
    pub fn departure_dates(&mut self, from: &str, to: &str) -> &mut Self {
        match Self::date_range(from, to) {
            Ok(Some(range)) => {
                self.filter_departure_date = true;
                self.departure_date_values = range;
            }
            Ok(None) => {}
            Err(()) => {
                warn!("broken query: bad departure dates {:?}..{:?}", from, to);
                self.query_is_broken = true;
            }
        }
        self
    }

    /// Return date window; both ends empty disables the filter
    pub fn return_dates(&mut self, from: &str, to: &str) -> &mut Self {
        match Self::date_range(from, to) {
            Ok(Some(range)) => {
                self.filter_return_date = true;
                self.return_date_values = range;
            }
            Ok(None) => {}
            Err(()) => {
                warn!("broken query: bad return dates {:?}..{:?}", from, to);
                self.query_is_broken = true;
            }
        }
        self
    }

    fn date_range(from: &str, to: &str) -> std::result::Result<Option<DateRange>, ()> {
        if from.is_empty() && to.is_empty() {
            return Ok(None);
        }
        let from_int = date::date_to_int(from);
        let to_int = date::date_to_int(to);
        if from_int == 0 || to_int == 0 || from_int > to_int {
            return Err(());
        }
        Ok(Some(DateRange {
            from: from_int,
            to: to_int,
            duration: date::days_between(from, to) + 1,
        }))
    }

    /// CSV of departure weekday names; an unknown token breaks the query
    pub fn departure_weekdays(&mut self, days_of_week: &str) -> &mut Self {
        if days_of_week.is_empty() {
            return self;
        }
        match weekday::weekdays_bitmask(days_of_week) {
            Some(mask) => {
                self.filter_departure_weekdays = true;
                self.departure_weekdays_bitmask = mask;
            }
            None => {
                warn!("broken query: bad departure weekdays {:?}", days_of_week);
                self.query_is_broken = true;
            }
        }
        self
    }

    /// CSV of return weekday names; an unknown token breaks the query
    pub fn return_weekdays(&mut self, days_of_week: &str) -> &mut Self {
        if days_of_week.is_empty() {
            return self;
        }
        match weekday::weekdays_bitmask(days_of_week) {
            Some(mask) => {
                self.filter_return_weekdays = true;
                self.return_weekdays_bitmask = mask;
            }
            None => {
                warn!("broken query: bad return weekdays {:?}", days_of_week);
                self.query_is_broken = true;
            }
        }
        self
    }

    /// Stay-length window in days, clamped to 255; zeros disable it
    pub fn stay_days(&mut self, from: u16, to: u16) -> &mut Self {
        if from == 0 && to == 0 {
            return self;
        }
        if from > to {
            warn!("broken query: inverted stay range {}..{}", from, to);
            self.query_is_broken = true;
            return self;
        }
        self.filter_stay_days = true;
        self.stay_days_values = StayRange {
            from: from.min(255) as u8,
            to: to.min(255) as u8,
        };
        self
    }

    /// Keep only direct or only connecting flights
    pub fn direct_flights(&mut self, direct: Threelean) -> &mut Self {
        if direct != Threelean::Undefined {
            self.filter_stops = true;
            self.direct_flights_flag = direct == Threelean::True;
        }
        self
    }

    /// Keep only round-trip or only one-way deals
    pub fn roundtrip_flights(&mut self, roundtrip: Threelean) -> &mut Self {
        if roundtrip != Threelean::Undefined {
            self.filter_roundtrip = true;
            self.roundtrip_flag = roundtrip == Threelean::True;
        }
        self
    }

    /// Price window; zeros disable it, `to == 0` leaves it open above
    pub fn price(&mut self, from: u32, to: u32) -> &mut Self {
        if from == 0 && to == 0 {
            return self;
        }
        if to != 0 && from > to {
            warn!("broken query: inverted price range {}..{}", from, to);
            self.query_is_broken = true;
            return self;
        }
        self.filter_price = true;
        self.price_values = PriceRange { from, to };
        self
    }

    /// 2-letter locale, used by the top-destinations index only
    pub fn locale(&mut self, locale_str: &str) -> &mut Self {
        if locale_str.is_empty() {
            return self;
        }
        let code = locale::locale_to_code(locale_str);
        if code == 0 {
            warn!("broken query: bad locale {:?}", locale_str);
            self.query_is_broken = true;
            return self;
        }
        self.filter_locale = true;
        self.locale_value = code;
        self
    }

    /// Result count cap; 0 keeps the default of 20
    pub fn result_limit(&mut self, limit: u16) -> &mut Self {
        if limit != 0 {
            self.limit = limit;
        }
        self
    }

    /// Ignore records ingested more than `max_lifetime_sec` before `now`
    pub fn max_lifetime(&mut self, max_lifetime_sec: u32, now: u32) -> &mut Self {
        if max_lifetime_sec == 0 {
            return self;
        }
        self.filter_timestamp = true;
        self.timestamp_value = now.saturating_sub(max_lifetime_sec);
        self
    }

    /// Apply the whole public parameter tuple in one go
    pub fn apply(&mut self, params: &SearchParams, now: u32) -> &mut Self {
        self.origin(&params.origin)
            .destinations(&params.destinations)
            .departure_dates(&params.departure_date_from, &params.departure_date_to)
            .departure_weekdays(&params.departure_days_of_week)
            .return_dates(&params.return_date_from, &params.return_date_to)
            .return_weekdays(&params.return_days_of_week)
            .stay_days(params.stay_from, params.stay_to)
            .direct_flights(params.direct_flights)
            .price(params.price_from, params.price_to)
            .result_limit(params.limit)
            .max_lifetime(params.max_lifetime_sec, now)
            .roundtrip_flights(params.roundtrip_flights)
    }

    /// Fail fast before any scan when a setter rejected its input
    pub fn ensure_valid(&self) -> Result<()> {
        if self.query_is_broken {
            return Err(Error::new(
                ErrorKind::BadRequest,
                "query has inconsistent parameters".to_string(),
            ));
        }
        Ok(())
    }

    pub fn result_limit_value(&self) -> u16 {
        self.limit
    }

    /// Number of groups the aggregators may emit: the destination set
    /// size when that filter is on, the result limit otherwise
    pub fn result_destinations_count(&self) -> u16 {
        if self.filter_destination {
            self.destination_values.len().min(u16::MAX as usize) as u16
        } else {
            self.limit
        }
    }

    /// Universal record filter, evaluated cheapest first
    pub(crate) fn matches(&self, deal: &DealInfo) -> bool {
        if self.filter_origin && self.origin_value != deal.origin {
            return false;
        }
        if self.filter_timestamp && self.timestamp_value > deal.timestamp {
            return false;
        }
        if self.filter_roundtrip {
            if self.roundtrip_flag {
                if deal.return_date == 0 {
                    return false;
                }
            } else if deal.return_date != 0 {
                return false;
            }
        }
        if self.filter_destination && !self.destination_values.contains(&deal.destination) {
            return false;
        }
        if self.filter_departure_date && !self.departure_date_values.contains(deal.departure_date) {
            return false;
        }
        if self.filter_return_date && !self.return_date_values.contains(deal.return_date) {
            return false;
        }
        if self.filter_stay_days
            && deal.return_date != 0
            && !self.stay_days_values.contains(deal.stay_days)
        {
            return false;
        }
        if self.filter_stops && self.direct_flights_flag != deal.flags.direct {
            return false;
        }
        if self.filter_price && !self.price_values.contains(deal.price) {
            return false;
        }
        if self.filter_departure_weekdays
            && (1u8 << deal.flags.departure_day_of_week) & self.departure_weekdays_bitmask == 0
        {
            return false;
        }
        if self.filter_return_weekdays
            && deal.return_date != 0
            && (1u8 << deal.flags.return_day_of_week) & self.return_weekdays_bitmask == 0
        {
            return false;
        }
        true
    }
}
