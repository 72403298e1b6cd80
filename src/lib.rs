//! # collada-geometry
//!
//! Streaming extraction of triangle meshes from COLLADA (`.dae`) documents.
//!
//! The document is never materialized as a tree. A single forward pass over the
//! XML drives a path-indexed [`router::Router`]: listeners registered on exact
//! element paths fill a handful of scratch accumulators, which are committed
//! into the output (or dropped) as their elements close.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Constant memory per geometry, independent of document size
//! - Input as a string, a byte slice, any reader, a file, or a chunk sequence
//! - Reusable path router for other XML vocabularies
//! - Lenient: malformed geometries are skipped, well-formed ones are kept
//!
//! ## Example
//!
//! ```no_run
//! use collada_geometry::load_collada;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("scene.dae")?;
//! let geometries = load_collada(file)?;
//!
//! for (id, mesh) in &geometries {
//!     println!("{id}: {} triangles", mesh.triangle_count());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod parser;
pub mod router;
pub mod tokenizer;

pub use error::{Error, Result, StreamError, StreamErrorCode};
pub use model::{
    Accessor, AccessorMap, FloatSource, Geometries, Input, Mesh, ParserConfig, SourceMap, Version,
    VertexIndex, VertexLink,
};
pub use parser::{ColladaParser, parse_version};

use std::io::Read;

/// Parse a COLLADA document from a reader with the default configuration
///
/// Shorthand for [`ColladaParser::new`] followed by
/// [`ColladaParser::parse_reader`].
pub fn load_collada<R: Read>(reader: R) -> Result<Geometries> {
    ColladaParser::new().parse_reader(reader)
}
