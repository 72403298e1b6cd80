//! Read-only attribute view for the element being opened

/// One attribute of the element being opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Qualified attribute name
    pub name: &'a str,
    /// Unescaped value
    pub value: &'a str,
}

/// The attributes of the element being opened, in document order
///
/// The view borrows the tokenizer's scratch storage and only lives for the
/// duration of the open callback. Copy out anything that must outlive it.
#[derive(Debug, Clone, Copy)]
pub struct Attributes<'a> {
    pairs: &'a [(String, String)],
}

impl<'a> Attributes<'a> {
    /// Wrap a list of `(name, value)` pairs
    pub fn new(pairs: &'a [(String, String)]) -> Self {
        Self { pairs }
    }

    /// An empty attribute list
    pub fn empty() -> Self {
        Self { pairs: &[] }
    }

    /// Value of the first attribute named exactly `name`, or `""` if absent
    pub fn get(&self, name: &str) -> &'a str {
        self.find(name).unwrap_or("")
    }

    /// Value of the first attribute named exactly `name`
    pub fn find(&self, name: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// True if an attribute named exactly `name` is present, even with an empty value
    pub fn has(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if the element has no attributes
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate attributes in document order
    pub fn iter(&self) -> impl Iterator<Item = Attribute<'a>> + 'a {
        self.pairs.iter().map(|(name, value)| Attribute {
            name: name.as_str(),
            value: value.as_str(),
        })
    }
}
