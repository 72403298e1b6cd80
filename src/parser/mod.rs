//! Streaming COLLADA geometry extraction
//!
//! [`ColladaParser`] wires the geometry listeners into a [`Router`] and runs it
//! over a document. Nothing is kept of the document except the accumulators
//! of the geometry currently being read.

mod accumulators;
mod geometries;
mod numeric;
mod version;

pub use version::parse_version;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::{Geometries, ParserConfig, Version};
use crate::router::{Router, Tag};
use crate::tokenizer::ChunkReader;
use accumulators::Scratch;
use version::check_max_version;

/// Root element path carrying the format version
const ROOT: &str = "/COLLADA";

/// Mutable state of one parse
pub(crate) struct Session {
    max_version: Version,
    pub(crate) scratch: Scratch,
    pub(crate) geometries: Geometries,
}

impl Session {
    pub(crate) fn new(max_version: Version) -> Self {
        Self {
            max_version,
            scratch: Scratch::default(),
            geometries: Geometries::new(),
        }
    }
}

/// Extracts triangle meshes from COLLADA documents
///
/// A parser can be reused; every parse starts from empty accumulators and
/// fresh occurrence counters.
///
/// # Example
///
/// ```
/// use collada_geometry::ColladaParser;
///
/// # fn main() -> collada_geometry::Result<()> {
/// let xml = r##"<COLLADA version="1.4.1"><library_geometries>
///   <geometry id="tri"><mesh>
///     <source id="pos-src">
///       <float_array id="pos">0 0 0 1 0 0 0 1 0</float_array>
///       <technique_common>
///         <accessor source="#pos" count="3" stride="3">
///           <param name="X" type="float"/>
///           <param name="Y" type="float"/>
///           <param name="Z" type="float"/>
///         </accessor>
///       </technique_common>
///     </source>
///     <vertices id="verts"><input semantic="POSITION" source="#pos-src"/></vertices>
///     <triangles count="1"><input semantic="VERTEX" source="#verts" offset="0"/><p>0 1 2</p></triangles>
///   </mesh></geometry>
/// </library_geometries></COLLADA>"##;
///
/// let mut parser = ColladaParser::new();
/// let geometries = parser.parse_str(xml)?;
/// let mesh = geometries.get("tri").unwrap();
/// assert_eq!(mesh.triangle_count(), 1);
/// assert_eq!(mesh.positions().unwrap()[1], [1.0, 0.0, 0.0]);
/// # Ok(())
/// # }
/// ```
pub struct ColladaParser {
    config: ParserConfig,
    router: Router<Session>,
}

impl ColladaParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::new())
    }

    /// Create a parser with a custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        let mut router = Router::new();
        router.listen_for(
            ROOT,
            Tag::new().opened(|_, attrs, s: &mut Session| {
                check_max_version(attrs.get("version"), s.max_version)
            }),
        );
        geometries::register(&mut router);
        Self { config, router }
    }

    /// The configuration this parser was built with
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a complete in-memory document
    pub fn parse_str(&mut self, xml: &str) -> Result<Geometries> {
        self.run(xml.as_bytes())
    }

    /// Parse a complete in-memory document given as bytes
    pub fn parse_slice(&mut self, bytes: &[u8]) -> Result<Geometries> {
        self.run(bytes)
    }

    /// Parse a document streamed from `reader`
    ///
    /// The reader is buffered with [`ParserConfig::buffer_size`] bytes.
    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Result<Geometries> {
        let source = BufReader::with_capacity(self.config.buffer_size(), reader);
        self.run(source)
    }

    /// Parse a document delivered as a sequence of byte chunks
    ///
    /// The end of the iterator marks the final chunk. Chunk boundaries may fall
    /// anywhere, including inside a tag or a number.
    pub fn parse_chunks<I, B>(&mut self, chunks: I) -> Result<Geometries>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        self.parse_reader(ChunkReader::new(chunks))
    }

    /// Open and parse the file at `path`
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Geometries> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening COLLADA file");
        let file = File::open(path)?;
        self.parse_reader(file)
    }

    fn run<R: BufRead>(&mut self, source: R) -> Result<Geometries> {
        let max_version = self.config.max_version();
        debug!(%max_version, "parsing COLLADA geometry");

        let mut session = Session::new(max_version);
        self.router.run(source, &mut session)?;

        debug!(meshes = session.geometries.len(), "finished COLLADA geometry");
        Ok(session.geometries)
    }
}

impl Default for ColladaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColladaParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColladaParser")
            .field("config", &self.config)
            .field("listeners", &self.router.listener_count())
            .finish()
    }
}
