//! Path-indexed event routing
//!
//! A [`Router`] turns the flat open/close/text stream of the tokenizer into
//! callbacks registered against absolute element paths. Patterns are exact,
//! root-anchored and `/`-separated (`/COLLADA/library_geometries/geometry`);
//! there are no wildcards. A callback fires only when the current path equals
//! its pattern, never for ancestors or descendants.
//!
//! # Example
//!
//! ```
//! use collada_geometry::router::{Router, Tag};
//!
//! # fn main() -> collada_geometry::Result<()> {
//! let mut router: Router<Vec<String>> = Router::new();
//! router.listen_for(
//!     "/doc/item",
//!     Tag::new().opened(|path, attrs, names: &mut Vec<String>| {
//!         names.push(format!("{}:{}", path.instance, attrs.get("name")));
//!         Ok(())
//!     }),
//! );
//!
//! let mut names = Vec::new();
//! router.run_str(r#"<doc><item name="a"/><other><item name="x"/></other><item name="b"/></doc>"#, &mut names)?;
//! assert_eq!(names, vec!["1:a", "2:b"]);
//! # Ok(())
//! # }
//! ```

mod attributes;
mod path;
mod registry;

pub use attributes::{Attribute, Attributes};
pub use path::Path;
pub use registry::Tag;

use std::io::BufRead;

use crate::error::Result;
use crate::tokenizer::{self, XmlHandler};
use path::PathTracker;
use registry::Registry;

/// Dispatches tokenizer events to the listeners registered for the current path
///
/// `S` is the mutable session state handed to every callback. The router owns
/// its registry outright, so independent routers never share listeners.
pub struct Router<S> {
    tracker: PathTracker,
    registry: Registry<S>,
}

impl<S> Router<S> {
    /// Create a router with no listeners
    pub fn new() -> Self {
        Self {
            tracker: PathTracker::new(),
            registry: Registry::new(),
        }
    }

    /// Register `tag` for the absolute path `pattern`
    ///
    /// Several tags may share a pattern; they fire in registration order.
    /// Registration is only possible between runs, since a running router is
    /// mutably borrowed for the whole parse.
    pub fn listen_for(&mut self, pattern: impl Into<String>, tag: Tag<S>) -> &mut Self {
        self.registry.insert(pattern, tag);
        self
    }

    /// Occurrence counters of the listeners on `pattern`, in registration order
    pub fn instances(&self, pattern: &str) -> Vec<usize> {
        self.registry.instances(pattern)
    }

    /// All registered patterns, in no particular order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.registry.patterns()
    }

    /// Total number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Absolute path of the innermost open element
    pub fn current_path(&self) -> &str {
        self.tracker.path()
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.tracker.depth()
    }

    /// Forget the open-element stack and zero every occurrence counter
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.registry.reset_counters();
    }

    /// Handle an element opening
    pub fn open(&mut self, name: &str, attributes: &Attributes<'_>, state: &mut S) -> Result<()> {
        self.tracker.push(name);
        let Some(listeners) = self.registry.get_mut(self.tracker.path()) else {
            return Ok(());
        };
        let depth = self.tracker.depth();
        for listener in listeners.iter_mut() {
            listener.instances += 1;
            if let Some(opened) = listener.tag.opened.as_mut() {
                let path = Path {
                    name,
                    path: self.tracker.path(),
                    depth,
                    instance: listener.instances,
                };
                opened(&path, attributes, state)?;
            }
        }
        Ok(())
    }

    /// Handle a text chunk of the innermost open element
    pub fn text(&mut self, chunk: &str, state: &mut S) -> Result<()> {
        let Some(listeners) = self.registry.get_mut(self.tracker.path()) else {
            return Ok(());
        };
        let depth = self.tracker.depth();
        for listener in listeners.iter_mut() {
            if let Some(text) = listener.tag.text.as_mut() {
                let path = Path {
                    name: self.tracker.name(),
                    path: self.tracker.path(),
                    depth,
                    instance: listener.instances,
                };
                text(&path, chunk, state)?;
            }
        }
        Ok(())
    }

    /// Handle the innermost open element closing
    pub fn close(&mut self, state: &mut S) -> Result<()> {
        if let Some(listeners) = self.registry.get_mut(self.tracker.path()) {
            let depth = self.tracker.depth();
            for listener in listeners.iter_mut() {
                if let Some(closed) = listener.tag.closed.as_mut() {
                    let path = Path {
                        name: self.tracker.name(),
                        path: self.tracker.path(),
                        depth,
                        instance: listener.instances,
                    };
                    closed(&path, state)?;
                }
            }
        }
        self.tracker.pop();
        Ok(())
    }

    /// Tokenize `source` and dispatch every event
    ///
    /// Counters and the path stack are reset first, so each run is an
    /// independent parse.
    pub fn run<R: BufRead>(&mut self, source: R, state: &mut S) -> Result<()> {
        self.reset();
        let mut dispatch = Dispatch {
            router: self,
            state,
        };
        tokenizer::tokenize(source, &mut dispatch)
    }

    /// Convenience wrapper around [`Router::run`] for in-memory documents
    pub fn run_str(&mut self, xml: &str, state: &mut S) -> Result<()> {
        self.run(xml.as_bytes(), state)
    }
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Binds a router to its session state for the duration of one run
struct Dispatch<'a, S> {
    router: &'a mut Router<S>,
    state: &'a mut S,
}

impl<S> XmlHandler for Dispatch<'_, S> {
    fn start_element(&mut self, name: &str, attributes: &Attributes<'_>) -> Result<()> {
        self.router.open(name, attributes, self.state)
    }

    fn end_element(&mut self, _name: &str) -> Result<()> {
        self.router.close(self.state)
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        self.router.text(text, self.state)
    }
}
