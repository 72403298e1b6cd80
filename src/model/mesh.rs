//! Mesh records extracted from `<library_geometries>`

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A flat float array from a `<float_array>` element
pub type FloatSource = Vec<f32>;

/// Sources keyed by `<float_array>` id
pub type SourceMap = BTreeMap<String, FloatSource>;

/// Accessors keyed by the id of their enclosing `<source>`
pub type AccessorMap = BTreeMap<String, Accessor>;

/// Strip the `#` that COLLADA puts in front of local URI fragments
fn fragment(reference: &str) -> &str {
    reference.strip_prefix('#').unwrap_or(reference)
}

/// Reinterprets a flat float array as a strided sequence of elements
///
/// The first three *named* `<param>` children select which components of each
/// element are meaningful; their positions within the element are stored in
/// `a_index`, `b_index` and `c_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Reference to the float array (usually `#some-id`)
    pub source: String,
    /// Number of elements
    pub count: usize,
    /// Number of floats per element
    pub stride: usize,
    /// Index of the first float of the first element
    pub offset: usize,
    /// Position of the first named param, or [`Accessor::NOT_PRESENT`]
    pub a_index: usize,
    /// Position of the second named param, or [`Accessor::NOT_PRESENT`]
    pub b_index: usize,
    /// Position of the third named param, or [`Accessor::NOT_PRESENT`]
    pub c_index: usize,
}

impl Accessor {
    /// Sentinel for a component slot with no matching param
    pub const NOT_PRESENT: usize = usize::MAX;

    /// Create an accessor with no params
    pub fn new() -> Self {
        Self {
            source: String::new(),
            count: 0,
            stride: 0,
            offset: 0,
            a_index: Self::NOT_PRESENT,
            b_index: Self::NOT_PRESENT,
            c_index: Self::NOT_PRESENT,
        }
    }

    /// Read the (a, b, c) components of element `index` from `data`
    ///
    /// Slots without a param read as `0.0`. Returns `None` when `index` is out
    /// of range or a present slot points past the end of `data`.
    pub fn read(&self, data: &[f32], index: usize) -> Option<[f32; 3]> {
        if index >= self.count {
            return None;
        }
        let base = self.offset.checked_add(index.checked_mul(self.stride)?)?;
        let component = |slot: usize| -> Option<f32> {
            if slot == Self::NOT_PRESENT {
                Some(0.0)
            } else {
                data.get(base.checked_add(slot)?).copied()
            }
        };
        Some([
            component(self.a_index)?,
            component(self.b_index)?,
            component(self.c_index)?,
        ])
    }
}

impl Default for Accessor {
    fn default() -> Self {
        Self::new()
    }
}

/// The `<vertices>` element: binds the POSITION semantic to an accessor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLink {
    /// Id of the `<vertices>` element
    pub id: String,
    /// Reference to the `<source>` holding positions
    pub accessor: String,
}

/// One `<input>` binding of an index batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    /// Reference to a `<source>` or `<vertices>` element
    pub accessor: String,
    /// Column of this input within each index tuple
    pub offset: usize,
}

/// A triangle-only index batch from a `<polylist>` or `<triangles>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexIndex {
    /// Material symbol of the batch
    pub material: String,
    /// The VERTEX input; always present on accepted batches
    pub position: Option<Input>,
    /// The NORMAL input
    pub normals: Option<Input>,
    /// The TEXCOORD input
    pub tex_coords: Option<Input>,
    /// Flattened index tuples
    pub indices: Vec<u32>,
}

impl VertexIndex {
    /// Number of interleaved columns per vertex, derived from the input offsets
    ///
    /// Saturates at `usize::MAX` for absurd offsets.
    pub fn tuple_width(&self) -> usize {
        [&self.position, &self.normals, &self.tex_coords]
            .into_iter()
            .flatten()
            .map(|input| input.offset.saturating_add(1))
            .max()
            .unwrap_or(1)
    }

    /// Number of triangles in the batch
    ///
    /// Zero when the tuple width is too large to form a single triangle.
    pub fn triangle_count(&self) -> usize {
        match self.tuple_width().checked_mul(3) {
            Some(stride) if stride > 0 => self.indices.len() / stride,
            _ => 0,
        }
    }
}

/// A mesh reconstructed from one `<geometry>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Id of the `<geometry>` element
    pub id: String,
    /// Float arrays keyed by id
    pub sources: SourceMap,
    /// Accessors keyed by the id of their `<source>`
    pub accessors: AccessorMap,
    /// The `<vertices>` link
    pub vertices: VertexLink,
    /// Accepted triangle batches, in document order
    pub parts: Vec<VertexIndex>,
}

impl Mesh {
    /// Look up an accessor by `<source>` reference (`#id` or `id`)
    pub fn accessor(&self, reference: &str) -> Option<&Accessor> {
        self.accessors.get(fragment(reference))
    }

    /// Look up a float array by reference (`#id` or `id`)
    pub fn source(&self, reference: &str) -> Option<&FloatSource> {
        self.sources.get(fragment(reference))
    }

    /// The accessor bound to POSITION by the `<vertices>` element
    pub fn position_accessor(&self) -> Option<&Accessor> {
        self.accessor(&self.vertices.accessor)
    }

    /// Resolve all positions through the vertex link
    ///
    /// Returns `None` when any link in the chain is missing or out of range.
    pub fn positions(&self) -> Option<Vec<[f32; 3]>> {
        let accessor = self.position_accessor()?;
        let data = self.source(&accessor.source)?;
        (0..accessor.count).map(|i| accessor.read(data, i)).collect()
    }

    /// Total number of triangles over all parts
    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(VertexIndex::triangle_count).sum()
    }
}

/// The output of a parse: every accepted mesh keyed by geometry id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometries {
    meshes: BTreeMap<String, Mesh>,
}

impl Geometries {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mesh unless one with the same id already exists
    ///
    /// Returns `false` when the id was taken; the first definition wins.
    pub(crate) fn insert(&mut self, mesh: Mesh) -> bool {
        match self.meshes.entry(mesh.id.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(mesh);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Look up a mesh by geometry id
    pub fn get(&self, id: &str) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    /// Number of meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True if no mesh was accepted
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate meshes ordered by id
    pub fn iter(&self) -> btree_map::Iter<'_, String, Mesh> {
        self.meshes.iter()
    }

    /// Take the underlying map
    pub fn into_inner(self) -> BTreeMap<String, Mesh> {
        self.meshes
    }
}

impl<'a> IntoIterator for &'a Geometries {
    type Item = (&'a String, &'a Mesh);
    type IntoIter = btree_map::Iter<'a, String, Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.iter()
    }
}

impl IntoIterator for Geometries {
    type Item = (String, Mesh);
    type IntoIter = btree_map::IntoIter<String, Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.into_iter()
    }
}
