//! Scratch records filled across open/text/close callbacks
//!
//! Each accumulator starts `Empty`, becomes `Collecting` when its element
//! opens, and is committed (or dropped) and reset when the element closes.
//! Text buffers are cleared rather than reallocated, so one set of
//! accumulators serves a whole parse.

use std::collections::btree_map::Entry;
use std::mem;

use tracing::{debug, trace};

use super::numeric::{all_triangles, parse_floats, parse_indices, parse_unsigned_prefix};
use crate::model::{
    Accessor, AccessorMap, FloatSource, Input, Mesh, SourceMap, VertexIndex, VertexLink,
};

/// Lifecycle of an accumulator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    /// Reset; no element is being collected
    #[default]
    Empty,
    /// Between the element's open and close
    Collecting,
}

/// Append a text chunk, separating it from the text of a previous element
fn push_separated(buffer: &mut String, first_chunk: &mut bool, chunk: &str) {
    if *first_chunk && !buffer.is_empty() {
        buffer.push(' ');
    }
    *first_chunk = false;
    buffer.push_str(chunk);
}

/// The `<geometry>` being reconstructed
#[derive(Debug, Default)]
pub(crate) struct MeshAccumulator {
    pub(crate) phase: Phase,
    pub(crate) id: String,
    sources: SourceMap,
    accessors: AccessorMap,
    pub(crate) vertices: VertexLink,
    parts: Vec<VertexIndex>,
}

impl MeshAccumulator {
    pub(crate) fn begin(&mut self, id: &str) {
        self.reset();
        self.phase = Phase::Collecting;
        self.id.push_str(id);
    }

    pub(crate) fn add_source(&mut self, id: String, data: FloatSource) {
        if let Entry::Vacant(slot) = self.sources.entry(id) {
            slot.insert(data);
        }
    }

    pub(crate) fn add_accessor(&mut self, id: String, accessor: Accessor) {
        if let Entry::Vacant(slot) = self.accessors.entry(id) {
            slot.insert(accessor);
        }
    }

    pub(crate) fn add_part(&mut self, part: VertexIndex) {
        self.parts.push(part);
    }

    /// Produce the mesh if it has an id and at least one part, then reset
    pub(crate) fn commit(&mut self) -> Option<Mesh> {
        let mesh = if self.phase == Phase::Collecting && !self.id.is_empty() && !self.parts.is_empty()
        {
            Some(Mesh {
                id: self.id.clone(),
                sources: mem::take(&mut self.sources),
                accessors: mem::take(&mut self.accessors),
                vertices: mem::take(&mut self.vertices),
                parts: mem::take(&mut self.parts),
            })
        } else {
            debug!(
                id = %self.id,
                parts = self.parts.len(),
                "dropping geometry without id or triangle parts"
            );
            None
        };
        self.reset();
        mesh
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.id.clear();
        self.sources.clear();
        self.accessors.clear();
        self.vertices = VertexLink::default();
        self.parts.clear();
    }
}

/// A `<float_array>` whose text is still arriving
#[derive(Debug, Default)]
pub(crate) struct SourceAccumulator {
    pub(crate) phase: Phase,
    pub(crate) id: String,
    text: String,
}

impl SourceAccumulator {
    pub(crate) fn begin(&mut self, id: &str) {
        self.reset();
        self.phase = Phase::Collecting;
        self.id.push_str(id);
    }

    pub(crate) fn push_text(&mut self, chunk: &str) {
        if self.phase == Phase::Collecting {
            self.text.push_str(chunk);
        }
    }

    /// Parse the buffered text; yields `(id, values)` if both are non-empty
    pub(crate) fn commit(&mut self) -> Option<(String, FloatSource)> {
        let mut committed = None;
        if self.phase == Phase::Collecting && !self.id.is_empty() {
            let mut values = FloatSource::new();
            parse_floats(&self.text, &mut values);
            if values.is_empty() {
                debug!(id = %self.id, "dropping float array without values");
            } else {
                trace!(id = %self.id, len = values.len(), "float array");
                committed = Some((mem::take(&mut self.id), values));
            }
        } else {
            debug!("dropping float array without id");
        }
        self.reset();
        committed
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.id.clear();
        self.text.clear();
    }
}

/// The accessor of a `<source>` element
#[derive(Debug)]
pub(crate) struct AccessorAccumulator {
    pub(crate) phase: Phase,
    pub(crate) id: String,
    valid_params: usize,
    param_index: usize,
    pub(crate) data: Accessor,
}

impl Default for AccessorAccumulator {
    fn default() -> Self {
        Self {
            phase: Phase::Empty,
            id: String::new(),
            valid_params: 0,
            param_index: 0,
            data: Accessor::new(),
        }
    }
}

impl AccessorAccumulator {
    pub(crate) fn begin(&mut self, id: &str) {
        self.reset();
        self.phase = Phase::Collecting;
        self.id.push_str(id);
    }

    /// Record the attributes of `<accessor>`
    pub(crate) fn bind(&mut self, source: &str, count: &str, stride: &str, offset: &str) {
        self.data.source.clear();
        self.data.source.push_str(source);
        self.data.count = parse_unsigned_prefix(count);
        self.data.stride = parse_unsigned_prefix(stride);
        self.data.offset = parse_unsigned_prefix(offset);
    }

    /// Record one `<param>`
    ///
    /// Params without a name (or without a type) are spacers: they take up a
    /// position in the element but fill no slot.
    pub(crate) fn param(&mut self, name: &str, has_type: bool) {
        if !name.is_empty() && has_type {
            let slot = match self.valid_params {
                0 => Some(&mut self.data.a_index),
                1 => Some(&mut self.data.b_index),
                2 => Some(&mut self.data.c_index),
                _ => None,
            };
            if let Some(slot) = slot {
                *slot = self.param_index;
            }
            self.valid_params += 1;
        }
        self.param_index += 1;
    }

    /// Yields `(source id, accessor)` if the source has an id and a named param
    pub(crate) fn commit(&mut self) -> Option<(String, Accessor)> {
        let committed = if self.phase == Phase::Collecting
            && !self.id.is_empty()
            && self.valid_params > 0
        {
            trace!(id = %self.id, params = self.valid_params, "accessor");
            Some((mem::take(&mut self.id), mem::take(&mut self.data)))
        } else {
            debug!(id = %self.id, "dropping source without id or named params");
            None
        };
        self.reset();
        committed
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.id.clear();
        self.valid_params = 0;
        self.param_index = 0;
        self.data = Accessor::new();
    }
}

/// Which primitive element an index batch comes from
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BatchKind {
    /// `<polylist>`: face sizes come from `<vcount>`
    #[default]
    Polylist,
    /// `<triangles>`: every face is a triangle
    Triangles,
}

/// A `<polylist>` or `<triangles>` batch
#[derive(Debug, Default)]
pub(crate) struct IndexAccumulator {
    pub(crate) phase: Phase,
    kind: BatchKind,
    pub(crate) data: VertexIndex,
    vcount: String,
    p: String,
    vcount_started: bool,
    p_started: bool,
}

impl IndexAccumulator {
    pub(crate) fn begin(&mut self, kind: BatchKind, material: &str) {
        self.reset();
        self.phase = Phase::Collecting;
        self.kind = kind;
        self.data.material.push_str(material);
    }

    /// Bind an `<input>`; semantics other than VERTEX, NORMAL and TEXCOORD are ignored
    pub(crate) fn bind_input(&mut self, semantic: &str, source: &str, offset: &str) {
        if source.is_empty() {
            return;
        }
        let slot = match semantic {
            "VERTEX" => &mut self.data.position,
            "NORMAL" => &mut self.data.normals,
            "TEXCOORD" => &mut self.data.tex_coords,
            _ => return,
        };
        *slot = Some(Input {
            accessor: source.to_string(),
            offset: parse_unsigned_prefix(offset),
        });
    }

    pub(crate) fn begin_vcount(&mut self) {
        self.vcount_started = true;
    }

    pub(crate) fn push_vcount(&mut self, chunk: &str) {
        push_separated(&mut self.vcount, &mut self.vcount_started, chunk);
    }

    pub(crate) fn begin_p(&mut self) {
        self.p_started = true;
    }

    pub(crate) fn push_p(&mut self, chunk: &str) {
        push_separated(&mut self.p, &mut self.p_started, chunk);
    }

    /// Parse both buffers and yield the batch if it is a usable triangle list
    pub(crate) fn commit(&mut self) -> Option<VertexIndex> {
        let mut committed = None;
        if self.phase == Phase::Collecting {
            let triangles_only = match self.kind {
                BatchKind::Polylist => all_triangles(&self.vcount),
                BatchKind::Triangles => true,
            };
            let mut indices = mem::take(&mut self.data.indices);
            indices.clear();
            parse_indices(&self.p, &mut indices);

            if !triangles_only {
                debug!(material = %self.data.material, "dropping polylist with non-triangle faces");
            } else if indices.is_empty() {
                debug!(material = %self.data.material, "dropping index batch without indices");
            } else if self.data.position.is_none() {
                debug!(material = %self.data.material, "dropping index batch without VERTEX input");
            } else {
                trace!(
                    material = %self.data.material,
                    indices = indices.len(),
                    "index batch"
                );
                self.data.indices = indices;
                committed = Some(mem::take(&mut self.data));
            }
        }
        self.reset();
        committed
    }

    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Empty;
        self.kind = BatchKind::Polylist;
        self.data = VertexIndex::default();
        self.vcount.clear();
        self.p.clear();
        self.vcount_started = false;
        self.p_started = false;
    }
}

/// All accumulators of one parse
#[derive(Debug, Default)]
pub(crate) struct Scratch {
    pub(crate) mesh: MeshAccumulator,
    pub(crate) source: SourceAccumulator,
    pub(crate) accessor: AccessorAccumulator,
    pub(crate) index: IndexAccumulator,
}

impl Scratch {
    pub(crate) fn reset(&mut self) {
        self.mesh.reset();
        self.source.reset();
        self.accessor.reset();
        self.index.reset();
    }

    /// True if every accumulator is back in its empty state
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.mesh.phase == Phase::Empty
            && self.mesh.id.is_empty()
            && self.mesh.parts.is_empty()
            && self.source.phase == Phase::Empty
            && self.accessor.phase == Phase::Empty
            && self.index.phase == Phase::Empty
    }
}
