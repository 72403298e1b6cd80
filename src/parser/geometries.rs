//! Listeners that rebuild meshes from `<library_geometries>`

use tracing::{debug, trace};

use super::Session;
use super::accumulators::BatchKind;
use crate::router::{Router, Tag};

const GEOMETRY: &str = "/COLLADA/library_geometries/geometry";
const SOURCE: &str = "/COLLADA/library_geometries/geometry/mesh/source";
const FLOAT_ARRAY: &str = "/COLLADA/library_geometries/geometry/mesh/source/float_array";
const ACCESSOR: &str =
    "/COLLADA/library_geometries/geometry/mesh/source/technique_common/accessor";
const PARAM: &str =
    "/COLLADA/library_geometries/geometry/mesh/source/technique_common/accessor/param";
const VERTICES: &str = "/COLLADA/library_geometries/geometry/mesh/vertices";
const VERTICES_INPUT: &str = "/COLLADA/library_geometries/geometry/mesh/vertices/input";
const POLYLIST: &str = "/COLLADA/library_geometries/geometry/mesh/polylist";
const TRIANGLES: &str = "/COLLADA/library_geometries/geometry/mesh/triangles";

/// Register every geometry listener on `router`
pub(crate) fn register(router: &mut Router<Session>) {
    router.listen_for(
        GEOMETRY,
        Tag::new()
            .opened(|_, attrs, s: &mut Session| {
                s.scratch.mesh.begin(attrs.get("id"));
                Ok(())
            })
            .closed(|_, s: &mut Session| {
                if let Some(mesh) = s.scratch.mesh.commit() {
                    let id = mesh.id.clone();
                    let parts = mesh.parts.len();
                    if s.geometries.insert(mesh) {
                        trace!(%id, parts, "geometry");
                    } else {
                        debug!(%id, "dropping duplicate geometry id");
                    }
                }
                s.scratch.reset();
                Ok(())
            }),
    );

    // The accessor is keyed by the id of its <source>, so the source element
    // drives the accessor accumulator.
    router.listen_for(
        SOURCE,
        Tag::new()
            .opened(|_, attrs, s: &mut Session| {
                s.scratch.accessor.begin(attrs.get("id"));
                Ok(())
            })
            .closed(|_, s: &mut Session| {
                if let Some((id, accessor)) = s.scratch.accessor.commit() {
                    s.scratch.mesh.add_accessor(id, accessor);
                }
                Ok(())
            }),
    );

    router.listen_for(
        FLOAT_ARRAY,
        Tag::new()
            .opened(|_, attrs, s: &mut Session| {
                s.scratch.source.begin(attrs.get("id"));
                Ok(())
            })
            .text(|_, chunk, s: &mut Session| {
                s.scratch.source.push_text(chunk);
                Ok(())
            })
            .closed(|_, s: &mut Session| {
                if let Some((id, data)) = s.scratch.source.commit() {
                    s.scratch.mesh.add_source(id, data);
                }
                Ok(())
            }),
    );

    router.listen_for(
        ACCESSOR,
        Tag::new().opened(|_, attrs, s: &mut Session| {
            s.scratch.accessor.bind(
                attrs.get("source"),
                attrs.get("count"),
                attrs.get("stride"),
                attrs.get("offset"),
            );
            Ok(())
        }),
    );

    router.listen_for(
        PARAM,
        Tag::new().opened(|_, attrs, s: &mut Session| {
            s.scratch
                .accessor
                .param(attrs.get("name"), attrs.has("type"));
            Ok(())
        }),
    );

    router.listen_for(
        VERTICES,
        Tag::new().opened(|_, attrs, s: &mut Session| {
            let link = &mut s.scratch.mesh.vertices;
            link.id.clear();
            link.id.push_str(attrs.get("id"));
            Ok(())
        }),
    );

    router.listen_for(
        VERTICES_INPUT,
        Tag::new().opened(|_, attrs, s: &mut Session| {
            let source = attrs.get("source");
            if attrs.get("semantic") == "POSITION" && !source.is_empty() {
                let link = &mut s.scratch.mesh.vertices;
                link.accessor.clear();
                link.accessor.push_str(source);
            }
            Ok(())
        }),
    );

    register_batch(router, POLYLIST, BatchKind::Polylist);
    register_batch(router, TRIANGLES, BatchKind::Triangles);
}

/// Listeners for one index batch element and its `input`, `vcount` and `p` children
fn register_batch(router: &mut Router<Session>, base: &str, kind: BatchKind) {
    router.listen_for(
        base,
        Tag::new()
            .opened(move |_, attrs, s: &mut Session| {
                s.scratch.index.begin(kind, attrs.get("material"));
                Ok(())
            })
            .closed(|_, s: &mut Session| {
                if let Some(part) = s.scratch.index.commit() {
                    s.scratch.mesh.add_part(part);
                }
                Ok(())
            }),
    );

    router.listen_for(
        format!("{base}/input"),
        Tag::new().opened(|_, attrs, s: &mut Session| {
            s.scratch.index.bind_input(
                attrs.get("semantic"),
                attrs.get("source"),
                attrs.get("offset"),
            );
            Ok(())
        }),
    );

    if kind == BatchKind::Polylist {
        router.listen_for(
            format!("{base}/vcount"),
            Tag::new()
                .opened(|_, _, s: &mut Session| {
                    s.scratch.index.begin_vcount();
                    Ok(())
                })
                .text(|_, chunk, s: &mut Session| {
                    s.scratch.index.push_vcount(chunk);
                    Ok(())
                }),
        );
    }

    router.listen_for(
        format!("{base}/p"),
        Tag::new()
            .opened(|_, _, s: &mut Session| {
                s.scratch.index.begin_p();
                Ok(())
            })
            .text(|_, chunk, s: &mut Session| {
                s.scratch.index.push_p(chunk);
                Ok(())
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParserConfig;

    fn session_router() -> (Router<Session>, Session) {
        let mut router = Router::new();
        register(&mut router);
        (router, Session::new(ParserConfig::new().max_version()))
    }

    #[test]
    fn test_registered_patterns() {
        let (router, _) = session_router();
        let mut patterns: Vec<&str> = router.patterns().collect();
        patterns.sort_unstable();
        assert!(patterns.contains(&PARAM));
        assert!(patterns.contains(&"/COLLADA/library_geometries/geometry/mesh/polylist/vcount"));
        assert!(!patterns.contains(&"/COLLADA/library_geometries/geometry/mesh/triangles/vcount"));
        assert_eq!(router.listener_count(), 14);
    }

    #[test]
    fn test_geometry_outside_library_is_ignored() {
        let (mut router, mut session) = session_router();
        router
            .run_str(
                r##"<COLLADA><geometry id="g"><mesh><triangles><input semantic="VERTEX" source="#v"/><p>0 1 2</p></triangles></mesh></geometry></COLLADA>"##,
                &mut session,
            )
            .unwrap();
        assert!(session.geometries.is_empty());
        assert!(session.scratch.is_empty());
    }

    #[test]
    fn test_vertices_binds_position_only() {
        let (mut router, mut session) = session_router();
        router
            .run_str(
                r##"<COLLADA><library_geometries><geometry id="g"><mesh>
                    <vertices id="verts">
                      <input semantic="NORMAL" source="#normals"/>
                      <input semantic="POSITION" source="#positions"/>
                    </vertices>
                    <triangles><input semantic="VERTEX" source="#verts"/><p>0 1 2</p></triangles>
                </mesh></geometry></library_geometries></COLLADA>"##,
                &mut session,
            )
            .unwrap();
        let mesh = session.geometries.get("g").unwrap();
        assert_eq!(mesh.vertices.id, "verts");
        assert_eq!(mesh.vertices.accessor, "#positions");
    }
}
