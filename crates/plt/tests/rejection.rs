//! Integration tests for rejection of unsupported content
//!
//! Streams here are assembled by hand, byte by byte, so the reader is
//! checked against the wire layout itself rather than against the writer.

use rstest::rstest;
use tectools_plt::{DataLocation, Error, FieldValues, PltReader};

fn push_i32(buffer: &mut Vec<u8>, value: i32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

fn push_f32(buffer: &mut Vec<u8>, value: f32) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

fn push_f64(buffer: &mut Vec<u8>, value: f64) {
    buffer.extend_from_slice(&value.to_le_bytes());
}

fn push_string(buffer: &mut Vec<u8>, string: &str) {
    for character in string.chars() {
        push_i32(buffer, character as i32);
    }
    push_i32(buffer, 0);
}

/// File prologue with a single variable "p"
fn file_header() -> Vec<u8> {
    let mut buffer = b"#!TDV112".to_vec();
    push_i32(&mut buffer, 1); // byte order
    push_i32(&mut buffer, 0); // file type
    push_string(&mut buffer, "hand built");
    push_i32(&mut buffer, 1); // variable count
    push_string(&mut buffer, "p");
    buffer
}

/// Zone record up to and including the connection count
fn zone_record(buffer: &mut Vec<u8>, zone_type: i32) {
    push_f32(buffer, 299.0);
    push_string(buffer, "zone");
    push_i32(buffer, -1); // parent zone
    push_i32(buffer, -1); // strand id
    push_f64(buffer, 0.0); // solution time
    push_i32(buffer, -1); // reserved
    push_i32(buffer, zone_type);
    push_i32(buffer, 0); // all variables node centred
    push_i32(buffer, 0); // face neighbour count
    push_i32(buffer, 0); // user defined connections
}

/// A complete, valid stream: one ordered 2x2x1 zone of four floats
fn valid_stream() -> Vec<u8> {
    let mut buffer = file_header();
    zone_record(&mut buffer, 0);
    push_i32(&mut buffer, 2); // imax
    push_i32(&mut buffer, 2); // jmax
    push_i32(&mut buffer, 1); // kmax
    push_i32(&mut buffer, 0); // no auxiliary records
    push_f32(&mut buffer, 357.0); // end of header

    push_f32(&mut buffer, 299.0);
    push_i32(&mut buffer, 1); // float format
    push_i32(&mut buffer, 0); // no passive variables
    push_i32(&mut buffer, 0); // no variable sharing
    push_i32(&mut buffer, -1); // share zone number
    push_f64(&mut buffer, 1.0); // min
    push_f64(&mut buffer, 4.0); // max
    for value in [1.0f32, 2.0, 3.0, 4.0] {
        push_f32(&mut buffer, value);
    }
    buffer
}

#[test]
fn decodes_a_hand_built_stream() {
    let plt = PltReader::new().decode(valid_stream().as_slice()).unwrap();

    assert_eq!(plt.title, "hand built");
    assert_eq!(plt.names(), ["p"]);
    assert_eq!(plt.location(0), Some(DataLocation::Node));
    assert_eq!(
        plt.values(0),
        Some(&FieldValues::Float(vec![1.0, 2.0, 3.0, 4.0]))
    );
    assert_eq!(plt.zones[0].variables[0].min, 1.0);
    assert_eq!(plt.zones[0].variables[0].max, 4.0);
}

#[test]
fn rejects_a_bad_version_tag() {
    let mut buffer = valid_stream();
    buffer[..8].copy_from_slice(b"#!TDV191");

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(
        matches!(result, Err(Error::UnsupportedVersion { ref found }) if found.as_str() == "#!TDV191")
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
#[case(7)]
fn rejects_finite_element_zones(#[case] zone_type: i32) {
    let mut buffer = file_header();
    zone_record(&mut buffer, zone_type);

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(
        result,
        Err(Error::UnsupportedZoneType { tag, .. }) if tag == zone_type
    ));
}

#[test]
fn rejects_an_unknown_zone_type_tag() {
    let mut buffer = file_header();
    zone_record(&mut buffer, 12);

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnknownZoneType(12))));
}

#[test]
fn rejects_a_geometry_record() {
    let mut buffer = file_header();
    push_f32(&mut buffer, 399.0);

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnsupportedGeometryRecord)));
}

#[test]
fn rejects_an_unknown_section_marker() {
    let mut buffer = file_header();
    push_f32(&mut buffer, 123.0);

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnknownMarker(marker)) if marker == 123.0));
}

#[test]
fn rejects_face_neighbours() {
    let mut buffer = file_header();
    push_f32(&mut buffer, 299.0);
    push_string(&mut buffer, "zone");
    push_i32(&mut buffer, -1);
    push_i32(&mut buffer, -1);
    push_f64(&mut buffer, 0.0);
    push_i32(&mut buffer, -1);
    push_i32(&mut buffer, 0); // ordered
    push_i32(&mut buffer, 0); // all node centred
    push_i32(&mut buffer, 6); // face neighbours present

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnsupportedFaceNeighbours(6))));
}

#[test]
fn rejects_auxiliary_data() {
    let mut buffer = file_header();
    zone_record(&mut buffer, 0);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 1);
    push_i32(&mut buffer, 1); // auxiliary record follows

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnsupportedAuxiliaryData(1))));
}

#[rstest]
#[case::passive(1, 0)]
#[case::sharing(0, 1)]
fn rejects_passive_and_shared_variables(#[case] passive: i32, #[case] sharing: i32) {
    let mut buffer = file_header();
    zone_record(&mut buffer, 0);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 1);
    push_i32(&mut buffer, 0);
    push_f32(&mut buffer, 357.0);

    push_f32(&mut buffer, 299.0);
    push_i32(&mut buffer, 1); // float format
    push_i32(&mut buffer, passive);
    if passive == 0 {
        push_i32(&mut buffer, sharing);
    }

    let result = PltReader::new().decode(buffer.as_slice());
    match (passive, sharing) {
        (1, _) => assert!(matches!(result, Err(Error::UnsupportedPassiveVariables(1)))),
        (_, 1) => assert!(matches!(result, Err(Error::UnsupportedVariableSharing(1)))),
        _ => unreachable!(),
    }
}

#[test]
fn rejects_an_unrecognised_format_tag() {
    let mut buffer = file_header();
    zone_record(&mut buffer, 0);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 2);
    push_i32(&mut buffer, 1);
    push_i32(&mut buffer, 0);
    push_f32(&mut buffer, 357.0);

    push_f32(&mut buffer, 299.0);
    push_i32(&mut buffer, 9); // not a known format

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::UnknownVariableFormat(9))));
}

#[test]
fn rejects_a_truncated_payload() {
    let mut buffer = valid_stream();
    // cut the last value short
    buffer.truncate(buffer.len() - 2);

    let result = PltReader::new().decode(buffer.as_slice());
    assert!(matches!(result, Err(Error::IOError(_))));
}

#[test]
fn explicit_location_list_is_honoured() {
    // same zone but with an explicit cell centred location list
    let mut buffer = file_header();
    push_f32(&mut buffer, 299.0);
    push_string(&mut buffer, "zone");
    push_i32(&mut buffer, -1);
    push_i32(&mut buffer, -1);
    push_f64(&mut buffer, 0.0);
    push_i32(&mut buffer, -1);
    push_i32(&mut buffer, 0); // ordered
    push_i32(&mut buffer, 1); // explicit location list
    push_i32(&mut buffer, 1); // cell centred
    push_i32(&mut buffer, 0); // face neighbours
    push_i32(&mut buffer, 0); // connections
    push_i32(&mut buffer, 3); // imax
    push_i32(&mut buffer, 3); // jmax
    push_i32(&mut buffer, 2); // kmax
    push_i32(&mut buffer, 0); // no auxiliary records
    push_f32(&mut buffer, 357.0);

    push_f32(&mut buffer, 299.0);
    push_i32(&mut buffer, 2); // double format
    push_i32(&mut buffer, 0);
    push_i32(&mut buffer, 0);
    push_i32(&mut buffer, -1);
    push_f64(&mut buffer, 0.0); // min
    push_f64(&mut buffer, 8.0); // max
    // stored block spans (3, 3, 1)
    for value in [1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0] {
        push_f64(&mut buffer, value);
    }

    let plt = PltReader::new().decode(buffer.as_slice()).unwrap();

    assert_eq!(plt.location(0), Some(DataLocation::Cell));
    // trimmed back to the logical (2, 2, 1) cells
    assert_eq!(
        plt.values(0),
        Some(&FieldValues::Double(vec![1.0, 2.0, 3.0, 4.0]))
    );
}
