#![no_main]

use collada_geometry::ColladaParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must yield either geometry or an error, never a panic
    let mut parser = ColladaParser::new();
    if let Ok(geometries) = parser.parse_slice(data) {
        for (_, mesh) in &geometries {
            let _ = mesh.positions();
            let _ = mesh.triangle_count();
        }
    }

    let _ = parser.parse_chunks(data.chunks(7));
});
