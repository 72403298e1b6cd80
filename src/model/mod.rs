//! Data structures produced by geometry extraction

mod config;
mod mesh;

pub use config::{DEFAULT_BUFFER_SIZE, ParserConfig, Version};
pub use mesh::{
    Accessor, AccessorMap, FloatSource, Geometries, Input, Mesh, SourceMap, VertexIndex,
    VertexLink,
};
