//! Error classification and message quality

mod common;

use collada_geometry::{ColladaParser, Error, StreamErrorCode, load_collada};
use common::{document, geometry, triangle_body};

#[test]
fn test_unsupported_version_message() {
    let xml = document("1.5.0", &geometry(Some("g"), &triangle_body()));
    let err = ColladaParser::new().parse_str(&xml).unwrap_err();

    assert!(err.is_format_error());
    assert!(!err.is_stream_error());
    let msg = err.to_string();
    assert!(msg.contains("[E4001]"), "unexpected message: {msg}");
    assert!(msg.contains("1.5.0"));
    assert!(msg.contains("1.4"));
}

#[test]
fn test_version_gate_runs_before_geometry() {
    // Broken markup after the root is never reached: the root is checked on open
    let xml = document("2.0.0", "<geometry id=\"g\"><mesh><broken");
    let err = ColladaParser::new().parse_str(&xml).unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_supported_version_passes() {
    let xml = document("1.4.1", &geometry(Some("g"), &triangle_body()));
    assert!(ColladaParser::new().parse_str(&xml).is_ok());

    let xml = document("1.4.0", "");
    assert!(ColladaParser::new().parse_str(&xml).unwrap().is_empty());
}

#[test]
fn test_short_version_is_invalid() {
    let xml = document("1.4", "");
    let err = ColladaParser::new().parse_str(&xml).unwrap_err();
    assert!(matches!(err, Error::InvalidVersion(ref v) if v == "1.4"));
    assert!(err.to_string().contains("[E2004]"));
}

#[test]
fn test_mismatched_tags_report_line() {
    let xml = "<COLLADA version=\"1.4.1\">\n<library_geometries>\n</library_visual_scenes>\n</COLLADA>";
    let err = ColladaParser::new().parse_str(xml).unwrap_err();

    assert!(err.is_stream_error());
    assert!(!err.is_format_error());
    let stream = err.as_stream_error().unwrap();
    assert_eq!(stream.code, StreamErrorCode::IllFormed);
    assert!(stream.line >= 2, "line {}", stream.line);
    assert!(err.to_string().contains("[E2001]"));
}

#[test]
fn test_truncated_document_is_stream_error() {
    let xml = document("1.4.1", &geometry(Some("g"), &triangle_body()));
    let truncated = &xml[..xml.len() / 2];
    let err = load_collada(truncated.as_bytes()).unwrap_err();
    assert!(err.is_stream_error());
}

#[test]
fn test_undefined_entity_is_stream_error() {
    let xml = document("1.4.1", "<geometry id=\"g\">&nbsp;</geometry>");
    let err = ColladaParser::new().parse_str(&xml).unwrap_err();
    let stream = err.as_stream_error().unwrap();
    assert_eq!(stream.code, StreamErrorCode::Escape);
}

#[test]
fn test_malformed_content_is_not_an_error() {
    let body = r##"
        <source id=""><float_array id="">1 2 3</float_array></source>
        <source id="s"><float_array id="f">not numbers</float_array>
          <technique_common><accessor source="#f"><param type="float"/><param name="X"/></accessor></technique_common>
        </source>
        <vertices id="verts"><input semantic="POSITION" source="#s"/></vertices>
        <polylist><input semantic="VERTEX" source="#verts"/><vcount>4</vcount><p>0 1 2 3</p></polylist>
        <triangles><input semantic="NORMAL" source="#s"/><p>0 1 2</p></triangles>
        <triangles><input semantic="VERTEX" source="#verts"/><p></p></triangles>"##;
    let xml = document("1.4.1", &geometry(Some("noisy"), body));
    let geometries = ColladaParser::new().parse_str(&xml).unwrap();
    assert!(geometries.is_empty());
}
