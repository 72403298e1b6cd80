//! Tracking the absolute path of the innermost open element

/// Position of a dispatched element within the document
///
/// Handed to every callback; borrows the router's path buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Path<'a> {
    /// Name of the element
    pub name: &'a str,
    /// Absolute path, e.g. `/COLLADA/library_geometries/geometry`
    pub path: &'a str,
    /// Nesting depth; the root element has depth 1
    pub depth: usize,
    /// How many times the receiving listener has seen its pattern open,
    /// counting the current element (the first occurrence is 1)
    pub instance: usize,
}

/// Stack of open element names, kept as one `/`-joined string
///
/// `marks` holds the length of `path` before each push, so popping is a
/// truncate and never reallocates.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathTracker {
    path: String,
    marks: Vec<usize>,
}

impl PathTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: &str) {
        self.marks.push(self.path.len());
        self.path.push('/');
        self.path.push_str(name);
    }

    /// Pop the innermost element; a no-op at the document level
    pub(crate) fn pop(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.path.truncate(mark);
        }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    /// Name of the innermost open element, or `""` at the document level
    pub(crate) fn name(&self) -> &str {
        match self.marks.last() {
            Some(&mark) => &self.path[mark + 1..],
            None => "",
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.marks.len()
    }

    pub(crate) fn clear(&mut self) {
        self.path.clear();
        self.marks.clear();
    }
}
