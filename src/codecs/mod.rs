pub mod date;
pub mod locale;
pub mod place;
pub mod weekday;
