use std::fmt;
use serde::{Deserialize, Serialize};

/// Position of a record or payload slab inside a paged table.
///
/// `index` is a record slot for fixed-record tables and a byte offset for
/// the payload table; `size` is a record count or a byte length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Locator {
    pub page_id: u32,
    pub index: u32,
    pub size: u32,
}

/// Per-deal flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DealFlags {
    pub direct: bool,
    /// Set only by aggregator replacement, never by ingest
    pub overridden: bool,
    /// 0 = Monday .. 6 = Sunday; 7 when no date applies
    pub departure_day_of_week: u8,
    pub return_day_of_week: u8,
}

/// Fixed-size deal index record
#[derive(Debug, Clone, Copy, Default)]
pub struct DealInfo {
    /// Ingest time, seconds since epoch; drives per-record expiry
    pub timestamp: u32,
    pub origin: u32,
    pub destination: u32,
    /// Optional; 0 when the ingest path did not know the country
    pub destination_country: u32,
    /// YYYYMMDD as integer
    pub departure_date: u32,
    /// YYYYMMDD as integer; 0 means one-way
    pub return_date: u32,
    /// Clamped to 255; 255 denotes "not applicable"
    pub stay_days: u8,
    pub flags: DealFlags,
    pub price: u32,
    pub payload: Locator,
}

/// Record of the top-destinations popularity index
#[derive(Debug, Clone, Copy, Default)]
pub struct DstInfo {
    pub locale: u16,
    pub destination: u32,
    pub departure_date: u32,
}

/// Three-valued filter switch; `Undefined` leaves the filter off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Threelean {
    True,
    False,
    #[default]
    Undefined,
}

impl From<bool> for Threelean {
    fn from(value: bool) -> Self {
        if value {
            Threelean::True
        } else {
            Threelean::False
        }
    }
}

/// Hydrated deal returned to callers.
///
/// Dates and codes are decoded back to their textual forms and the
/// payload bytes are freshly copied out of the payload table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub timestamp: u32,
    pub origin: String,
    pub destination: String,
    /// Empty when the country was not supplied at ingest
    pub destination_country: String,
    pub departure_date: String,
    /// Empty for one-way deals
    pub return_date: String,
    pub stay_days: u8,
    pub flags: DealFlags,
    pub price: u32,
    pub payload: Vec<u8>,
}

impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}){}-{}({}) : {}",
            self.departure_date, self.origin, self.destination, self.return_date, self.price
        )
    }
}
