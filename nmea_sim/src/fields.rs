use chrono::{DateTime, Utc};

/// A fix position preformatted in the legacy degrees+minutes wire shape.
///
/// The text is rendered once, then shared by every position-bearing sentence
/// of an epoch so they all report the same fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// `ddmm.mmmm`, degrees zero-padded to 2 digits
    pub latitude: String,
    /// Hemisphere, `N` or `S`
    pub ns: char,
    /// `dddmm.mmmm`, degrees zero-padded to 3 digits
    pub longitude: String,
    /// Hemisphere, `E` or `W`
    pub ew: char,
}

impl Location {
    /// Build a location from signed decimal degrees. Zero maps to the
    /// positive hemisphere (`N`/`E`).
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: format_latitude(latitude),
            ns: if latitude >= 0.0 { 'N' } else { 'S' },
            longitude: format_longitude(longitude),
            ew: if longitude >= 0.0 { 'E' } else { 'W' },
        }
    }
}

/// Render signed degrees as `ddmm.mmmm` (hemisphere handled separately).
pub fn format_latitude(degrees: f64) -> String {
    let degrees = degrees.abs();
    let whole = degrees.trunc();
    let minutes = (degrees - whole) * 60.0;
    format!("{:02}{minutes:07.4}", whole as u32)
}

/// Render signed degrees as `dddmm.mmmm` (hemisphere handled separately).
pub fn format_longitude(degrees: f64) -> String {
    let degrees = degrees.abs();
    let whole = degrees.trunc();
    let minutes = (degrees - whole) * 60.0;
    format!("{:03}{minutes:07.4}", whole as u32)
}

/// Render a UTC timestamp as the `HHMMSS` time-of-day field.
pub fn utc_time(at: &DateTime<Utc>) -> String {
    at.format("%H%M%S").to_string()
}

/// Render a UTC timestamp as the `DDMMYY` date field.
pub fn utc_date(at: &DateTime<Utc>) -> String {
    at.format("%d%m%y").to_string()
}
