//! Shared fixtures for integration tests
//!
//! Documents are assembled from small pieces so each test only spells out the
//! part of the geometry it is about.

#![allow(dead_code)]

/// Wrap geometry elements in a COLLADA root and geometry library
pub fn document(version: &str, geometries: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<COLLADA xmlns="http://www.collada.org/2005/11/COLLADASchema" version="{version}">
  <asset><unit name="meter" meter="1"/><up_axis>Z_UP</up_axis></asset>
  <library_geometries>
{geometries}
  </library_geometries>
  <library_visual_scenes/>
</COLLADA>"#
    )
}

/// A position source with an XYZ accessor over `values`
pub fn position_source(source_id: &str, array_id: &str, values: &str) -> String {
    let count = values.split_whitespace().count() / 3;
    format!(
        r##"<source id="{source_id}">
  <float_array id="{array_id}" count="{len}">{values}</float_array>
  <technique_common>
    <accessor source="#{array_id}" count="{count}" stride="3">
      <param name="X" type="float"/>
      <param name="Y" type="float"/>
      <param name="Z" type="float"/>
    </accessor>
  </technique_common>
</source>"##,
        len = count * 3,
    )
}

/// A `<vertices>` element binding POSITION to `source_id`
pub fn vertices(id: &str, source_id: &str) -> String {
    format!(r##"<vertices id="{id}"><input semantic="POSITION" source="#{source_id}"/></vertices>"##)
}

/// A `<polylist>` with a single VERTEX input at offset 0
pub fn polylist(material: &str, vcount: &str, p: &str) -> String {
    format!(
        r##"<polylist material="{material}" count="1">
  <input semantic="VERTEX" source="#verts" offset="0"/>
  <vcount>{vcount}</vcount>
  <p>{p}</p>
</polylist>"##
    )
}

/// A `<triangles>` batch with a single VERTEX input at offset 0
pub fn triangles(material: &str, p: &str) -> String {
    format!(
        r##"<triangles material="{material}" count="1">
  <input semantic="VERTEX" source="#verts" offset="0"/>
  <p>{p}</p>
</triangles>"##
    )
}

/// A `<geometry>` around a mesh body; `id` of `None` omits the attribute
pub fn geometry(id: Option<&str>, body: &str) -> String {
    let id = id.map(|id| format!(r#" id="{id}""#)).unwrap_or_default();
    format!("<geometry{id}><mesh>\n{body}\n</mesh></geometry>")
}

/// A complete single-triangle mesh body
pub fn triangle_body() -> String {
    format!(
        "{}\n{}\n{}",
        position_source("positions", "positions-array", "0 0 0 1 0 0 0 1 0"),
        vertices("verts", "positions"),
        polylist("Material", "3", "0 1 2"),
    )
}
