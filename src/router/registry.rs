//! Listener registry: path patterns mapped to callbacks

use std::collections::HashMap;
use std::fmt;

use super::{Attributes, Path};
use crate::error::Result;

type OpenedFn<S> = Box<dyn FnMut(&Path<'_>, &Attributes<'_>, &mut S) -> Result<()>>;
type ClosedFn<S> = Box<dyn FnMut(&Path<'_>, &mut S) -> Result<()>>;
type TextFn<S> = Box<dyn FnMut(&Path<'_>, &str, &mut S) -> Result<()>>;

/// Up to three callbacks for one element path
///
/// `S` is the session state every callback receives mutably; callbacks own no
/// state of their own beyond what they capture.
///
/// # Example
///
/// ```
/// use collada_geometry::router::Tag;
///
/// let tag: Tag<Vec<String>> = Tag::new()
///     .opened(|path, attrs, seen: &mut Vec<String>| {
///         seen.push(format!("{}#{}", path.name, attrs.get("id")));
///         Ok(())
///     })
///     .text(|_, chunk, seen: &mut Vec<String>| {
///         seen.push(chunk.to_string());
///         Ok(())
///     });
/// # let _ = tag;
/// ```
pub struct Tag<S> {
    pub(crate) opened: Option<OpenedFn<S>>,
    pub(crate) closed: Option<ClosedFn<S>>,
    pub(crate) text: Option<TextFn<S>>,
}

impl<S> Tag<S> {
    /// A tag with no callbacks bound
    pub fn new() -> Self {
        Self {
            opened: None,
            closed: None,
            text: None,
        }
    }

    /// Bind the open callback; receives the element's attributes
    pub fn opened<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Path<'_>, &Attributes<'_>, &mut S) -> Result<()> + 'static,
    {
        self.opened = Some(Box::new(f));
        self
    }

    /// Bind the close callback
    pub fn closed<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Path<'_>, &mut S) -> Result<()> + 'static,
    {
        self.closed = Some(Box::new(f));
        self
    }

    /// Bind the text callback
    ///
    /// Called once per raw text chunk of the element itself (never for text of
    /// its descendants). An element's text may arrive in several chunks.
    pub fn text<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Path<'_>, &str, &mut S) -> Result<()> + 'static,
    {
        self.text = Some(Box::new(f));
        self
    }
}

impl<S> Default for Tag<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Tag<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("opened", &self.opened.is_some())
            .field("closed", &self.closed.is_some())
            .field("text", &self.text.is_some())
            .finish()
    }
}

/// A registered tag plus its occurrence counter
pub(crate) struct Listener<S> {
    pub(crate) tag: Tag<S>,
    pub(crate) instances: usize,
}

/// Multimap from absolute path to listeners, in registration order
pub(crate) struct Registry<S> {
    listeners: HashMap<String, Vec<Listener<S>>>,
}

impl<S> Registry<S> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, pattern: impl Into<String>, tag: Tag<S>) {
        self.listeners
            .entry(pattern.into())
            .or_default()
            .push(Listener { tag, instances: 0 });
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut Vec<Listener<S>>> {
        self.listeners.get_mut(path)
    }

    /// Occurrence counters of the listeners on `pattern`, in registration order
    pub(crate) fn instances(&self, pattern: &str) -> Vec<usize> {
        self.listeners
            .get(pattern)
            .map(|list| list.iter().map(|l| l.instances).collect())
            .unwrap_or_default()
    }

    pub(crate) fn reset_counters(&mut self) {
        for listener in self.listeners.values_mut().flatten() {
            listener.instances = 0;
        }
    }

    pub(crate) fn patterns(&self) -> impl Iterator<Item = &str> {
        self.listeners.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}
