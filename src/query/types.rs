/// Inclusive encoded-date interval with its length in days
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: u32,
    pub to: u32,
    /// Days from `from` to `to`, inclusive of both ends
    pub duration: u32,
}

impl DateRange {
    pub fn contains(&self, date: u32) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Inclusive stay-length interval in days
#[derive(Debug, Clone, Copy, Default)]
pub struct StayRange {
    pub from: u8,
    pub to: u8,
}

impl StayRange {
    pub fn contains(&self, days: u8) -> bool {
        days >= self.from && days <= self.to
    }
}

/// Inclusive price interval; `to == 0` leaves the upper bound open
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceRange {
    pub from: u32,
    pub to: u32,
}

impl PriceRange {
    pub fn contains(&self, price: u32) -> bool {
        price >= self.from && (self.to == 0 || price <= self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_bounds_are_inclusive() {
        let range = DateRange { from: 20160601, to: 20160623, duration: 23 };
        assert!(range.contains(20160601));
        assert!(range.contains(20160623));
        assert!(!range.contains(20160531));
        assert!(!range.contains(20160624));
    }

    #[test]
    fn price_range_open_upper_bound() {
        let range = PriceRange { from: 100, to: 0 };
        assert!(range.contains(100));
        assert!(range.contains(u32::MAX));
        assert!(!range.contains(99));
    }
}
