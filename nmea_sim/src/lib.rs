//! # nmea_sim
//!
//! This crate generates synthetic NMEA 0183 output resembling a
//! multi-constellation GNSS receiver, and replays previously recorded
//! sentence logs in receiver-like bursts. It is the engine behind the
//! `nmea-sim` binary, which feeds the output to a named pipe, a serial
//! port, or a pseudo-terminal.
//!
//! Generating sentences
//! ====================
//!
//! One epoch at a time, through [`EpochGenerator`]:
//! ```
//! use nmea_sim::EpochGenerator;
//!
//! let mut generator = EpochGenerator::with_seed(42);
//! let block = generator.next_epoch();
//! assert!(block.starts_with("$GPRMC,"));
//! for line in block.lines() {
//!     assert!(line.starts_with('$'));
//! }
//! ```
//! Individual sentences are built through the `Builder` structs, for
//! example:
//! ```
//! use nmea_sim::{GgaBuilder, Location};
//!
//! let location = Location::from_degrees(48.1173, 11.5166);
//! let sentence = GgaBuilder {
//!     time: "123519",
//!     location: &location,
//!     fix_quality: 1,
//!     satellites_used: 8,
//!     hdop: 0.9,
//!     altitude: 545.4,
//!     geoid_separation: 46.9,
//! }
//! .into_sentence();
//! assert!(sentence.as_str().ends_with("\r\n"));
//! ```
//!
//! Replaying logs
//! ==============
//!
//! [`CycleReader`] slices a recorded log into receiver bursts at RMC
//! sentence boundaries:
//! ```
//! use std::io::Cursor;
//! use nmea_sim::{CycleReader, ShutdownToken};
//!
//! let log = "$GPRMC,1*56\r\n$GPGGA,1*4B\r\n";
//! let mut reader = CycleReader::new(Cursor::new(log));
//! let shutdown = ShutdownToken::new();
//! let cycle = reader.next_cycle(&shutdown).unwrap().unwrap();
//! assert_eq!(cycle.len(), 2);
//! ```

pub use crate::{
    checksum::{checksum, checksum_str, NmeaChecksumCalc},
    epoch::EpochGenerator,
    fields::{format_latitude, format_longitude, utc_date, utc_time, Location},
    replay::{is_cycle_delimiter, CycleReader, ReplayCycle},
    satellites::{generate_catalog, Constellation, Satellite},
    sentences::{
        GgaBuilder, GllBuilder, GsaBuilder, GsvBuilder, GsvEntry, NfimuBuilder, RmcBuilder,
        Sentence, VehicleFrame,
    },
    shutdown::ShutdownToken,
};

pub mod constants;

mod checksum;
mod epoch;
mod fields;
mod replay;
mod satellites;
mod sentences;
mod shutdown;
