use chrono::{TimeZone, Utc};
use nmea_sim::{Constellation, EpochGenerator, GsaBuilder, GsvBuilder, GsvEntry};

/// Independent XOR checksum, kept separate from the library implementation
/// on purpose.
fn xor_checksum(body: &str) -> String {
    let mut value = 0u8;
    for byte in body.bytes() {
        value ^= byte;
    }
    format!("{value:02X}")
}

/// Split a wire line (terminator already stripped) into body and checksum,
/// asserting the framing shape on the way.
fn split_frame(line: &str) -> (&str, &str) {
    assert!(line.starts_with('$'), "missing sync char: {line}");
    assert_eq!(line.matches('*').count(), 1, "bad delimiters: {line}");
    let star = line.find('*').unwrap();
    assert_eq!(star, line.len() - 3, "checksum not two digits: {line}");
    (&line[1..star], &line[star + 1..])
}

#[test]
fn test_every_generated_sentence_is_framed_and_checksummed() {
    let mut generator = EpochGenerator::with_seed(2024);
    let at = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
    for _ in 0..25 {
        let block = generator.epoch_at(&at);
        assert!(block.ends_with("\r\n"));
        for line in block.lines() {
            let (body, cc) = split_frame(line);
            assert_eq!(cc, xor_checksum(body), "checksum mismatch in {line}");
        }
    }
}

#[test]
fn test_standard_sentences_fit_the_line_limit() {
    let mut generator = EpochGenerator::with_seed(7);
    let at = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
    for _ in 0..25 {
        let block = generator.epoch_at(&at);
        for line in block.lines().filter(|line| !line.starts_with("$NFIMU")) {
            // +2 for the stripped CRLF
            assert!(
                line.len() + 2 <= nmea_sim::constants::NMEA_MAX_SENTENCE_LENGTH,
                "overlong sentence: {line}"
            );
        }
    }
}

#[test]
fn test_gsa_always_emits_twelve_slots() {
    let prns: Vec<u16> = (1..=12).collect();
    for k in 4..=12 {
        let sentence = GsaBuilder {
            fix_type: 3,
            used_prns: &prns[..k],
            pdop: 1.8,
            hdop: 1.2,
            vdop: 2.1,
        }
        .into_sentence();
        let line = sentence.as_str().trim_end();
        let (body, _) = split_frame(line);
        let fields: Vec<&str> = body.split(',').collect();
        assert_eq!(fields.len(), 18, "GSA field count for k={k}");
        let slots = &fields[3..15];
        let filled = slots.iter().filter(|slot| !slot.is_empty()).count();
        assert_eq!(filled, k, "filled slots for k={k}");
        assert!(slots[..k].iter().all(|slot| !slot.is_empty()));
        assert!(slots[k..].iter().all(|slot| slot.is_empty()));
    }
}

#[test]
fn test_gsv_partitioning_and_padding() {
    for n in 1..=12usize {
        let satellites: Vec<GsvEntry> = (0..n)
            .map(|i| GsvEntry {
                prn: 65 + i as u16,
                elevation: 45,
                azimuth: 180,
                snr: 33,
            })
            .collect();
        let sentences = GsvBuilder {
            constellation: Constellation::Glonass,
            satellites: &satellites,
        }
        .into_sentences();

        assert_eq!(sentences.len(), n.div_ceil(4), "group size for n={n}");
        for (index, sentence) in sentences.iter().enumerate() {
            let line = sentence.as_str().trim_end();
            let (body, _) = split_frame(line);
            let fields: Vec<&str> = body.split(',').collect();
            assert_eq!(fields[0], "GLGSV");
            assert_eq!(fields[1], sentences.len().to_string());
            assert_eq!(fields[2], (index + 1).to_string());
            assert_eq!(fields[3], n.to_string());

            let sats_here = (n - index * 4).min(4);
            // 4 header fields, 4 per satellite, 3 per missing slot
            assert_eq!(fields.len(), 4 + 4 * sats_here + 3 * (4 - sats_here));
            let empties = fields.iter().filter(|field| field.is_empty()).count();
            assert_eq!(empties, 3 * (4 - sats_here));
        }
    }
}

#[test]
fn test_epoch_gsv_groups_follow_constellation_order() {
    let mut generator = EpochGenerator::with_seed(5);
    let at = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
    let block = generator.epoch_at(&at);
    let gsv_ids: Vec<&str> = block
        .lines()
        .filter(|line| line[1..6].ends_with("GSV"))
        .map(|line| &line[1..3])
        .collect();

    let mut seen = Vec::new();
    for id in &gsv_ids {
        if seen.last() != Some(id) {
            seen.push(*id);
        }
    }
    assert_eq!(seen, ["GP", "GL", "GA", "GB", "GQ"]);
}

#[test]
fn test_epoch_nfimu_calibration_consistency() {
    let mut generator = EpochGenerator::with_seed(11);
    let at = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
    let mut saw_calibrated = false;
    let mut saw_uncalibrated = false;
    for _ in 0..50 {
        let block = generator.epoch_at(&at);
        let line = block
            .lines()
            .find(|line| line.starts_with("$NFIMU"))
            .expect("epoch without NFIMU");
        let (body, _) = split_frame(line);
        let fields: Vec<&str> = body.split(',').collect();
        assert_eq!(fields.len(), 15);
        match fields[1] {
            "1" => {
                saw_calibrated = true;
                assert!(fields[9..15].iter().all(|f| f.parse::<f64>().is_ok()));
            },
            "0" => {
                saw_uncalibrated = true;
                assert!(fields[9..15].iter().all(|f| f.is_empty()));
            },
            other => panic!("unexpected calibration status {other}"),
        }
    }
    assert!(saw_calibrated && saw_uncalibrated);
}
