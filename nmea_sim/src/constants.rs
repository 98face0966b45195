pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_CHECKSUM_CHAR: u8 = 0x2a; // '*'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub const NMEA_MAX_SENTENCE_LENGTH: usize = 82; // Maximum NMEA sentence length

pub const GSA_PRN_SLOTS: usize = 12; // Fixed number of PRN fields in a GSA sentence
pub const GSV_SATS_PER_SENTENCE: usize = 4; // Satellites carried per GSV group member

// Sentence headers recognized as replay cycle delimiters
pub(crate) const RMC_DELIMITERS: [&str; 5] = ["$GPRMC", "$GNRMC", "$GLRMC", "$GRRMC", "$GGRMC"];
