use core::fmt;

use crate::{
    checksum::checksum_str,
    constants::{
        GSA_PRN_SLOTS, GSV_SATS_PER_SENTENCE, NMEA_CHECKSUM_CHAR, NMEA_END_CHAR_1,
        NMEA_END_CHAR_2, NMEA_SYNC_CHAR,
    },
    fields::Location,
    satellites::Constellation,
};

/// A complete framed sentence: `$<body>*<CC>\r\n`.
///
/// Constructing packets happens through the `Builder` structs of this module,
/// for example:
/// ```
/// use nmea_sim::{GllBuilder, Location};
///
/// let location = Location::from_degrees(48.1173, 11.5166);
/// let sentence = GllBuilder {
///     time: "123519",
///     location: &location,
/// }
/// .into_sentence();
/// assert!(sentence.as_str().starts_with("$GPGLL,"));
/// assert!(sentence.as_str().ends_with("\r\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence(String);

impl Sentence {
    /// Frame a body with the sync character, checksum delimiter, two-digit
    /// checksum and line terminator. The body must not contain `$` or `*`.
    pub fn new(body: &str) -> Self {
        debug_assert!(
            !body.contains([NMEA_SYNC_CHAR as char, NMEA_CHECKSUM_CHAR as char]),
            "sentence body contains a framing character: {body:?}"
        );
        let mut text = String::with_capacity(body.len() + 6);
        text.push(NMEA_SYNC_CHAR as char);
        text.push_str(body);
        text.push(NMEA_CHECKSUM_CHAR as char);
        text.push_str(&checksum_str(body));
        text.push(NMEA_END_CHAR_1 as char);
        text.push(NMEA_END_CHAR_2 as char);
        Sentence(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Fix-data (`GGA`) sentence builder.
pub struct GgaBuilder<'a> {
    /// UTC time of fix, `HHMMSS`
    pub time: &'a str,
    pub location: &'a Location,
    /// Fix quality indicator, 0..=5
    pub fix_quality: u8,
    /// Satellites used for the fix; rendered without padding
    pub satellites_used: u8,
    pub hdop: f64,
    /// Antenna altitude above mean sea level, meters
    pub altitude: f64,
    /// Geoid separation, meters
    pub geoid_separation: f64,
}

impl GgaBuilder<'_> {
    pub fn into_sentence(self) -> Sentence {
        let body = format!(
            "GPGGA,{},{},{},{},{},{},{},{:.1},{:.1},M,{:.1},M,,,",
            self.time,
            self.location.latitude,
            self.location.ns,
            self.location.longitude,
            self.location.ew,
            self.fix_quality,
            self.satellites_used,
            self.hdop,
            self.altitude,
            self.geoid_separation,
        );
        Sentence::new(&body)
    }
}

/// Recommended-minimum (`RMC`) sentence builder. Status is always `A`
/// (valid); the trailing variation and mode fields stay empty.
pub struct RmcBuilder<'a> {
    /// UTC time of fix, `HHMMSS`
    pub time: &'a str,
    /// UTC date of fix, `DDMMYY`
    pub date: &'a str,
    pub location: &'a Location,
    pub speed_knots: f64,
    pub course_degrees: f64,
}

impl RmcBuilder<'_> {
    pub fn into_sentence(self) -> Sentence {
        let body = format!(
            "GPRMC,{},A,{},{},{},{},{:.1},{:.1},{},,,",
            self.time,
            self.location.latitude,
            self.location.ns,
            self.location.longitude,
            self.location.ew,
            self.speed_knots,
            self.course_degrees,
            self.date,
        );
        Sentence::new(&body)
    }
}

/// Geographic-position (`GLL`) sentence builder.
pub struct GllBuilder<'a> {
    /// UTC time of fix, `HHMMSS`
    pub time: &'a str,
    pub location: &'a Location,
}

impl GllBuilder<'_> {
    pub fn into_sentence(self) -> Sentence {
        let body = format!(
            "GPGLL,{},{},{},{},{},A",
            self.location.latitude,
            self.location.ns,
            self.location.longitude,
            self.location.ew,
            self.time,
        );
        Sentence::new(&body)
    }
}

/// Active-satellites (`GSA`) sentence builder.
///
/// The sentence always carries exactly [`GSA_PRN_SLOTS`] PRN fields; slots
/// beyond `used_prns` render empty. `used_prns` must not exceed the slot
/// count.
pub struct GsaBuilder<'a> {
    /// Fix type, 1..=3
    pub fix_type: u8,
    pub used_prns: &'a [u16],
    pub pdop: f64,
    pub hdop: f64,
    pub vdop: f64,
}

impl GsaBuilder<'_> {
    pub fn into_sentence(self) -> Sentence {
        debug_assert!(self.used_prns.len() <= GSA_PRN_SLOTS);
        let mut slots = String::new();
        for index in 0..GSA_PRN_SLOTS {
            slots.push(',');
            if let Some(prn) = self.used_prns.get(index) {
                slots.push_str(&prn.to_string());
            }
        }
        let body = format!(
            "GPGSA,A,{}{slots},{:.1},{:.1},{:.1}",
            self.fix_type, self.pdop, self.hdop, self.vdop,
        );
        Sentence::new(&body)
    }
}

/// One satellite entry of a satellites-in-view sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsvEntry {
    pub prn: u16,
    /// Elevation above horizon, 0..=90 degrees
    pub elevation: u8,
    /// Azimuth from true north, 0..=359 degrees
    pub azimuth: u16,
    /// Signal-to-noise ratio, 0..=50 dB
    pub snr: u8,
}

/// Satellites-in-view (`GSV`) group builder for one constellation.
pub struct GsvBuilder<'a> {
    pub constellation: Constellation,
    pub satellites: &'a [GsvEntry],
}

impl GsvBuilder<'_> {
    /// Render the in-view group, at most [`GSV_SATS_PER_SENTENCE`] satellites
    /// per sentence. Every sentence of the group repeats the group size and
    /// total satellite count; a short final sentence pads each missing
    /// satellite with three empty fields. An empty satellite list renders no
    /// sentences at all.
    pub fn into_sentences(self) -> Vec<Sentence> {
        let total = self.satellites.len();
        if total == 0 {
            return Vec::new();
        }
        let id = self.constellation.gsv_sentence_id();
        let total_messages = total.div_ceil(GSV_SATS_PER_SENTENCE);
        let mut sentences = Vec::with_capacity(total_messages);
        for (index, chunk) in self.satellites.chunks(GSV_SATS_PER_SENTENCE).enumerate() {
            let mut body = format!("{id},{total_messages},{},{total}", index + 1);
            for sat in chunk {
                body.push_str(&format!(
                    ",{},{},{},{}",
                    sat.prn, sat.elevation, sat.azimuth, sat.snr
                ));
            }
            for _ in chunk.len()..GSV_SATS_PER_SENTENCE {
                body.push_str(",,,");
            }
            sentences.push(Sentence::new(&body));
        }
        sentences
    }
}

/// Calibrated vehicle-frame readings of the vendor inertial sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleFrame {
    pub accel: [f64; 3],
    pub gyro: [f64; 3],
}

/// Vendor inertial (`NFIMU`) sentence builder.
///
/// `vehicle` present renders calibration status 1 followed by the six
/// vehicle-frame fields; absent renders status 0 with the six fields empty.
pub struct NfimuBuilder {
    /// Sensor temperature, degrees Celsius
    pub temperature: f64,
    /// Raw accelerometer readings, x/y/z
    pub accel: [f64; 3],
    /// Raw gyroscope readings, x/y/z
    pub gyro: [f64; 3],
    pub vehicle: Option<VehicleFrame>,
}

impl NfimuBuilder {
    pub fn into_sentence(self) -> Sentence {
        let mut body = format!(
            "NFIMU,{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            u8::from(self.vehicle.is_some()),
            self.temperature,
            self.accel[0],
            self.accel[1],
            self.accel[2],
            self.gyro[0],
            self.gyro[1],
            self.gyro[2],
        );
        match self.vehicle {
            Some(vehicle) => {
                body.push_str(&format!(
                    ",{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                    vehicle.accel[0],
                    vehicle.accel[1],
                    vehicle.accel[2],
                    vehicle.gyro[0],
                    vehicle.gyro[1],
                    vehicle.gyro[2],
                ));
            },
            None => body.push_str(",,,,,,"),
        }
        Sentence::new(&body)
    }
}
