/// NMEA 0183 [XOR checksum](https://en.wikipedia.org/wiki/NMEA_0183#Checksum) calculator supporting both streaming and single-shot use
#[derive(Default)]
pub struct NmeaChecksumCalc {
    value: u8,
}

impl NmeaChecksumCalc {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.value ^= byte;
    }

    /// Get the current checksum result
    pub const fn result(self) -> u8 {
        self.value
    }
}

/// Compute the checksum of a complete sentence body, the text strictly
/// between `$` and `*`.
pub const fn checksum(body: &[u8]) -> u8 {
    let mut calc = NmeaChecksumCalc::new();
    calc.update(body);
    calc.result()
}

/// Compute a body checksum rendered as the two uppercase hex digits that
/// follow `*` on the wire.
pub fn checksum_str(body: &str) -> String {
    format!("{:02X}", checksum(body.as_bytes()))
}
