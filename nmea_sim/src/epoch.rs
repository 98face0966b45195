use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    fields::{utc_date, utc_time, Location},
    satellites::{generate_catalog, Constellation},
    sentences::{
        GgaBuilder, GllBuilder, GsaBuilder, GsvBuilder, GsvEntry, NfimuBuilder, RmcBuilder,
        Sentence, VehicleFrame,
    },
};

/// Produces one epoch of synthetic sentences per call.
///
/// Every epoch draws a fresh position and satellite catalog, then renders a
/// burst in fixed order: RMC, GGA, GSA, the per-constellation GSV groups,
/// GLL, NFIMU. All position-bearing sentences of an epoch share the same
/// location and timestamp.
pub struct EpochGenerator {
    rng: StdRng,
}

impl EpochGenerator {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Seeded construction for reproducible bursts.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Render the next epoch against the current UTC wall clock as one text
    /// block of CRLF-terminated sentences.
    pub fn next_epoch(&mut self) -> String {
        self.epoch_at(&Utc::now())
    }

    /// Render the next epoch pinned to the given UTC instant.
    pub fn epoch_at(&mut self, at: &DateTime<Utc>) -> String {
        let time = utc_time(at);
        let date = utc_date(at);
        let location = Location::from_degrees(
            self.rng.random_range(-90.0..=90.0),
            self.rng.random_range(-180.0..=180.0),
        );
        let catalog = generate_catalog(&mut self.rng);

        let mut block = String::new();
        block.push_str(
            RmcBuilder {
                time: &time,
                date: &date,
                location: &location,
                speed_knots: self.rng.random_range(0.0..=100.0),
                course_degrees: self.rng.random_range(0.0..=360.0),
            }
            .into_sentence()
            .as_str(),
        );
        block.push_str(
            GgaBuilder {
                time: &time,
                location: &location,
                fix_quality: self.rng.random_range(0..=5),
                satellites_used: self.rng.random_range(4..=12),
                hdop: self.rng.random_range(0.5..=2.5),
                altitude: self.rng.random_range(10.0..=100.0),
                geoid_separation: self.rng.random_range(-50.0..=50.0),
            }
            .into_sentence()
            .as_str(),
        );

        // The fix uses the leading satellites of the catalog, whatever
        // constellation they belong to
        let used: Vec<u16> = catalog
            .iter()
            .take(self.rng.random_range(4..=12))
            .map(|sat| sat.prn)
            .collect();
        block.push_str(
            GsaBuilder {
                fix_type: self.rng.random_range(1..=3),
                used_prns: &used,
                pdop: self.rng.random_range(1.0..=5.0),
                hdop: self.rng.random_range(1.0..=5.0),
                vdop: self.rng.random_range(1.0..=5.0),
            }
            .into_sentence()
            .as_str(),
        );

        for constellation in Constellation::ALL {
            let entries: Vec<GsvEntry> = catalog
                .iter()
                .filter(|sat| sat.constellation == constellation)
                .map(|sat| GsvEntry {
                    prn: sat.prn,
                    elevation: self.rng.random_range(0..=90),
                    azimuth: self.rng.random_range(0..=359),
                    snr: self.rng.random_range(0..=50),
                })
                .collect();
            let group = GsvBuilder {
                constellation,
                satellites: &entries,
            }
            .into_sentences();
            for sentence in group {
                block.push_str(sentence.as_str());
            }
        }

        block.push_str(
            GllBuilder {
                time: &time,
                location: &location,
            }
            .into_sentence()
            .as_str(),
        );
        block.push_str(self.nfimu().as_str());
        block
    }

    fn nfimu(&mut self) -> Sentence {
        let accel = [
            self.rng.random_range(-100.0..=100.0),
            self.rng.random_range(-100.0..=100.0),
            self.rng.random_range(-100.0..=100.0),
        ];
        let gyro = [
            self.rng.random_range(-2.0 * PI..=2.0 * PI),
            self.rng.random_range(-2.0 * PI..=2.0 * PI),
            self.rng.random_range(-2.0 * PI..=2.0 * PI),
        ];
        let calibrated = self.rng.random_range(0..=1) == 1;
        let vehicle = calibrated.then(|| VehicleFrame {
            accel: accel.map(|axis| axis + self.rng.random_range(-10.0..=10.0)),
            gyro: gyro.map(|axis| axis + self.rng.random_range(-0.2 * PI..=0.2 * PI)),
        });
        NfimuBuilder {
            temperature: self.rng.random_range(10.0..=80.0),
            accel,
            gyro,
            vehicle,
        }
        .into_sentence()
    }
}

impl Default for EpochGenerator {
    fn default() -> Self {
        Self::new()
    }
}
