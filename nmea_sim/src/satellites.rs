use core::ops::RangeInclusive;

use rand::Rng;

/// GNSS constellations modeled by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    BeiDou,
    Qzss,
}

impl Constellation {
    /// Fixed emission order for per-constellation sentences.
    pub const ALL: [Constellation; 5] = [
        Constellation::Gps,
        Constellation::Glonass,
        Constellation::Galileo,
        Constellation::BeiDou,
        Constellation::Qzss,
    ];

    /// Inclusive PRN band assigned to this constellation.
    pub const fn prn_band(self) -> RangeInclusive<u16> {
        match self {
            Constellation::Gps => 1..=32,
            Constellation::Glonass => 65..=96,
            Constellation::Galileo => 201..=237,
            Constellation::BeiDou => 301..=336,
            Constellation::Qzss => 193..=200,
        }
    }

    /// How many satellites of this constellation one epoch may carry.
    pub const fn count_range(self) -> RangeInclusive<usize> {
        match self {
            Constellation::Qzss => 1..=4,
            _ => 4..=12,
        }
    }

    /// Fixed 5-character id of this constellation's satellites-in-view
    /// sentences (talker + `GSV`).
    pub const fn gsv_sentence_id(self) -> &'static str {
        match self {
            Constellation::Gps => "GPGSV",
            Constellation::Glonass => "GLGSV",
            Constellation::Galileo => "GAGSV",
            Constellation::BeiDou => "GBGSV",
            Constellation::Qzss => "GQGSV",
        }
    }
}

/// One satellite of a per-epoch catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Satellite {
    pub prn: u16,
    pub constellation: Constellation,
}

/// Draw a fresh catalog: for each constellation in [`Constellation::ALL`]
/// order, a random count of satellites with PRNs drawn uniformly from the
/// band. Duplicate PRNs are possible; nothing deduplicates them.
pub fn generate_catalog(rng: &mut impl Rng) -> Vec<Satellite> {
    let mut satellites = Vec::new();
    for constellation in Constellation::ALL {
        let count = rng.random_range(constellation.count_range());
        for _ in 0..count {
            satellites.push(Satellite {
                prn: rng.random_range(constellation.prn_band()),
                constellation,
            });
        }
    }
    satellites
}
