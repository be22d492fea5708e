use sensorport_core::payload::{FieldReading, decode_field, extract_integer, is_valid};
use sensorport_core::{DecodeError, FieldKind, FieldValue, PORTS, decode, layout_for};
use serde_json::json;

#[test]
fn battery_port_decodes_millivolts() {
    let record = decode(&[0x0C, 0x80], 1).unwrap();
    assert_eq!(serde_json::to_value(&record).unwrap(), json!({ "battery": 3200.0 }));
}

#[test]
fn full_sensor_port_consumes_thirteen_bytes() {
    assert_eq!(layout_for(9).unwrap().payload_len(), 2 + 2 + 1 + 4 + 4);
    assert!(decode(&[0u8; 13], 9).is_ok());
    for len in 0..13 {
        let err = decode(&vec![0u8; len], 9).unwrap_err();
        assert!(matches!(err, DecodeError::BufferTooShort { needed: 13, .. }), "len {len}");
    }
}

#[test]
fn unknown_port_yields_no_record() {
    let err = decode(&[0x0C, 0x80], 999).unwrap_err();
    assert_eq!(err, DecodeError::UnknownPort { port: 999 });
    assert_eq!(err.to_string(), "unknown port: 999");
}

#[test]
fn location_port_decodes_coordinate_pair() {
    let mut payload = 100_000i32.to_be_bytes().to_vec();
    payload.extend_from_slice(&(-200_000i32).to_be_bytes());
    let record = decode(&payload, 50).unwrap();
    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({ "location": { "value": 0, "context": { "lat": 10.0, "lng": -20.0 } } })
    );
}

#[test]
fn every_port_decodes_a_zeroed_payload() {
    for layout in PORTS {
        let payload = vec![0u8; layout.payload_len()];
        let record = decode(&payload, layout.port).unwrap();
        let present: Vec<_> = record.entries().map(|(field, _)| field).collect();
        let expected: Vec<_> = layout.fields().collect();
        assert_eq!(present, expected, "port {}", layout.port);
    }
}

#[test]
fn absent_and_invalid_fields_differ() {
    let record = decode(&[0x7F, 0x7F], 2).unwrap();
    assert_eq!(record.get(FieldKind::Temperature), Some(&FieldValue::Invalid));
    assert_eq!(record.get(FieldKind::Battery), None);
    let value = serde_json::to_value(&record).unwrap();
    assert!(value["temperature"].is_null());
    assert!(value.get("battery").is_none());
}

#[test]
fn codec_is_usable_on_its_own() {
    assert_eq!(extract_integer(&[0x00, 0x00, 0x00, 0x00], 0, 4, false).unwrap(), 0);
    assert!(!is_valid(0xFFFF_FFFF, 4, false).unwrap());
    assert!(is_valid(0xFFFF_FFFE, 4, false).unwrap());

    let reading = decode_field(FieldKind::Pressure.schema(), &[0x00, 0x01, 0x8B, 0xCD], 0).unwrap();
    assert_eq!(reading, FieldReading::Single(Some(101_325.0)));
}

#[test]
fn codec_rejects_widths_it_cannot_hold() {
    let bytes = [0x80u8; 17];
    for width in [0, 9, 17] {
        let err = extract_integer(&bytes, 0, width, true).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedWidth { width });
        assert!(is_valid(0, width, false).is_err());
    }
}

#[test]
fn field_values_expose_numbers_and_invalid_state() {
    // port 8: temperature, humidity, pressure, gas
    let mut payload = 2150i16.to_be_bytes().to_vec();
    payload.push(0xFF);
    payload.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
    payload.extend_from_slice(&52_000u32.to_be_bytes());
    let record = decode(&payload, 8).unwrap();

    let temperature = record.get(FieldKind::Temperature).unwrap();
    assert_eq!(temperature.as_number(), Some(21.5));
    assert!(!temperature.is_invalid());

    let pressure = record.get(FieldKind::Pressure).unwrap();
    assert!(pressure.is_invalid());
    assert_eq!(pressure.as_number(), None);

    assert_eq!(record.gas.as_ref().and_then(FieldValue::as_number), Some(52_000.0));
    assert_eq!(record.humidity.as_ref().and_then(FieldValue::as_number), Some(100.0));
}
