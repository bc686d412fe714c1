use trackmsg_core::{
    DecoderConfig, FieldName, Locale, MessageError, ParseOutcome, ParseStatus, decode_bytes,
    decode_hex_message, decode_mixed,
};

struct Message<'a> {
    marker: u8,
    timestamp: &'a str,
    lat_hemisphere: u8,
    lat: &'a str,
    lon_hemisphere: u8,
    lon: &'a str,
    altitude: &'a str,
    separator: u8,
    text: &'a [u8],
}

impl Default for Message<'_> {
    fn default() -> Self {
        Self {
            marker: 0xA4,
            timestamp: "08:15:42",
            lat_hemisphere: b'N',
            lat: "4005.76783",
            lon_hemisphere: b'E',
            lon: "11623.12345",
            altitude: "+00099.5",
            separator: b'-',
            text: b"",
        }
    }
}

impl Message<'_> {
    fn bytes(&self) -> Vec<u8> {
        let mut out = vec![self.marker];
        out.extend_from_slice(self.timestamp.as_bytes());
        out.push(self.lat_hemisphere);
        out.extend_from_slice(self.lat.as_bytes());
        out.push(self.lon_hemisphere);
        out.extend_from_slice(self.lon.as_bytes());
        out.extend_from_slice(self.altitude.as_bytes());
        out.push(self.separator);
        out.extend_from_slice(self.text);
        out
    }

    fn hex(&self) -> String {
        hex_upper(&self.bytes())
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn decoded(outcome: ParseOutcome) -> trackmsg_core::DecodedMessage {
    match outcome {
        ParseOutcome::Decoded(message) => message,
        ParseOutcome::Fatal(err) => panic!("unexpected fatal outcome: {err}"),
    }
}

#[test]
fn well_formed_messages_decode_within_coordinate_ranges() {
    let lats = ["0000.00000", "4005.76783", "8959.99999", "9000.00000", "3351.50000"];
    let lons = ["00000.00000", "11623.12345", "17959.99999", "18000.00000", "07430.25000"];
    let hemispheres = [(b'N', b'E'), (b'S', b'W'), (b'N', b'W'), (b'S', b'E')];
    for (lat_hemisphere, lon_hemisphere) in hemispheres {
        for lat in lats {
            for lon in lons {
                let message = Message {
                    lat_hemisphere,
                    lat,
                    lon_hemisphere,
                    lon,
                    text: b"status ok",
                    ..Message::default()
                };
                let outcome = decode_hex_message(&message.hex());
                assert_eq!(outcome.status(), ParseStatus::Success, "{lat} {lon}");
                let fields = decoded(outcome).fields;
                let lat_value = fields.latitude.decimal.expect("latitude decimal");
                let lon_value = fields.longitude.decimal.expect("longitude decimal");
                assert!((-90.0..=90.0).contains(&lat_value), "{lat_value}");
                assert!((-180.0..=180.0).contains(&lon_value), "{lon_value}");
            }
        }
    }
}

#[test]
fn every_short_buffer_is_fatal_and_names_first_missing_field() {
    let full = Message::default().bytes();
    for len in 0..41 {
        let outcome = decode_bytes(&full[..len], &DecoderConfig::default());
        let expected = match len {
            0..=8 => FieldName::Timestamp,
            9 => FieldName::LatHemisphere,
            10..=19 => FieldName::LatValue,
            20 => FieldName::LonHemisphere,
            21..=31 => FieldName::LonValue,
            32..=39 => FieldName::Altitude,
            _ => FieldName::Separator,
        };
        match outcome {
            ParseOutcome::Fatal(MessageError::TooShort { field, .. }) => {
                assert_eq!(field, expected, "len {len}");
            }
            other => panic!("len {len}: expected fatal, got {other:?}"),
        }
    }
}

#[test]
fn odd_length_and_non_hex_input_is_fatal() {
    let valid = Message::default().hex();
    let inputs = [
        valid[..valid.len() - 1].to_string(),
        format!("{valid}G0"),
        "not hex at all".to_string(),
        "A".to_string(),
    ];
    for input in inputs {
        let outcome = decode_hex_message(&input);
        assert!(
            matches!(outcome, ParseOutcome::Fatal(MessageError::InvalidHex(_))),
            "{input}"
        );
        assert_eq!(outcome.to_record().error.as_deref(), Some("invalid hex"));
    }
}

#[test]
fn reference_latitude_converts_to_decimal_degrees() {
    let fields = decoded(decode_hex_message(&Message::default().hex())).fields;
    assert_eq!(fields.latitude.decimal, Some(40.096130));
    assert!(fields.latitude.display.contains('°'));
    assert!(fields.latitude.display.contains('\''));
}

#[test]
fn altitude_display_has_sign_and_unit() {
    for (raw, display) in [("+00099.5", "+99.5 m"), ("-00010.2", "-10.2 m")] {
        let message = Message {
            altitude: raw,
            ..Message::default()
        };
        let fields = decoded(decode_hex_message(&message.hex())).fields;
        assert_eq!(fields.altitude.display, display);
    }
}

#[test]
fn plus_separator_is_a_warning_not_fatal() {
    let message = Message {
        separator: 0x2B,
        ..Message::default()
    };
    let outcome = decode_hex_message(&message.hex());
    assert_eq!(outcome.status(), ParseStatus::SuccessWithWarnings);
    let record = outcome.to_record();
    assert_eq!(record.warnings.len(), 1);
    assert!(record.warnings[0].message.contains("separator"));
}

#[test]
fn slicer_warnings_precede_normalizer_warnings() {
    let message = Message {
        marker: 0x00,
        lat_hemisphere: b'Q',
        lon: "1162312345A",
        separator: b'_',
        text: &[0xD6, 0xD0, 0x07],
        ..Message::default()
    };
    let outcome = decode_hex_message(&message.hex());
    assert_eq!(outcome.status(), ParseStatus::SuccessWithWarnings);
    let ids: Vec<_> = outcome.warnings().iter().map(|w| w.id()).collect();
    assert_eq!(
        ids,
        vec![
            "TM-MARKER",
            "TM-HEMISPHERE",
            "TM-SEPARATOR",
            "TM-COORDINATE",
            "TM-TEXT-ESCAPE"
        ]
    );
    let fields = decoded(outcome).fields;
    assert_eq!(fields.latitude.display, "Q40°05.76783'");
    assert_eq!(fields.longitude.decimal, None);
    assert_eq!(fields.text, "中[07]");
    assert_eq!(fields.text_hex, "D6D007");
}

#[test]
fn non_ascii_field_is_escaped_and_flagged() {
    let mut bytes = Message::default().bytes();
    bytes[12] = 0x80;
    let outcome = decode_bytes(&bytes, &DecoderConfig::default());
    let ids: Vec<_> = outcome.warnings().iter().map(|w| w.id()).collect();
    assert_eq!(ids, vec!["TM-ASCII", "TM-COORDINATE"]);
    let fields = decoded(outcome).fields;
    assert_eq!(fields.raw[2].name, FieldName::LatValue);
    assert!(!fields.raw[2].ok);
    assert_eq!(fields.raw[2].text, "[34][30][80][35][2E][37][36][37][38][33]");
}

#[test]
fn trailing_ascii_after_invalid_lead_is_kept() {
    // Neither pair is a GBK character; the trail byte must survive as ASCII.
    let decoded = decode_mixed(&[0xB0, b'!']);
    assert_eq!(decoded.text, "[B0]!");
    let decoded = decode_mixed(&[0x81, b'1']);
    assert_eq!(decoded.text, "[81]1");
    let decoded = decode_mixed(b"AB");
    assert_eq!(decoded.text, "AB");
}

#[test]
fn user_defined_gbk_pair_in_text_is_a_warning() {
    let message = Message {
        text: &[0xAA, 0xA1],
        ..Message::default()
    };
    let outcome = decode_hex_message(&message.hex());
    assert_eq!(outcome.status(), ParseStatus::SuccessWithWarnings);
    let ids: Vec<_> = outcome.warnings().iter().map(|w| w.id()).collect();
    assert_eq!(ids, vec!["TM-TEXT-ESCAPE"]);
    assert_eq!(decoded(outcome).fields.text, "[AA][A1]");
}

#[test]
fn escape_count_is_bounded_by_input_length() {
    let inputs: [&[u8]; 4] = [&[], &[0xFF; 16], &[0x81, 0x30, 0x81], b"plain ascii"];
    for input in inputs {
        let decoded = decode_mixed(input);
        assert!(decoded.escapes <= input.len());
    }
}

#[test]
fn english_locale_display() {
    let config = DecoderConfig {
        locale: Locale::En,
        ..DecoderConfig::default()
    };
    let message = Message {
        lat_hemisphere: b'S',
        lon_hemisphere: b'W',
        ..Message::default()
    };
    let fields = decoded(decode_bytes(&message.bytes(), &config)).fields;
    assert_eq!(fields.latitude.display, "South 40°05.76783'");
    assert_eq!(fields.latitude.decimal, Some(-40.096130));
    assert_eq!(fields.longitude.display, "West 116°23.12345'");
}

#[test]
fn concurrent_decoding_is_independent() {
    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = [b'a' + i];
                let message = Message {
                    text: &text,
                    ..Message::default()
                };
                let fields = decoded(decode_hex_message(&message.hex())).fields;
                (i, fields.text)
            })
        })
        .collect();
    for handle in handles {
        let (i, text) = handle.join().expect("thread");
        assert_eq!(text, char::from(b'a' + i).to_string());
    }
}
