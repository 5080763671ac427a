//! Path parameter storage.
//!
//! Routers hand matched path segments to the binder as [`Params`]. Storage
//! uses a small vector so the common case (1-4 parameters) stays on the stack.

use smallvec::SmallVec;

const INLINE_PARAMS: usize = 4;

/// Named path parameters captured by a router.
///
/// # Example
///
/// ```rust
/// use reqbind_core::Params;
///
/// let mut params = Params::new();
/// params.push("id", "1");
///
/// assert_eq!(params.get("id"), Some("1"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter. Setting a name twice replaces the earlier value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("slug", "hello");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("slug"), Some("hello"));
    }

    #[test]
    fn test_push_replaces_existing() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("id", "2");

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("2"));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let params: Params = (0..10).map(|i| (format!("p{i}"), i.to_string())).collect();

        assert_eq!(params.len(), 10);
        assert_eq!(params.get("p9"), Some("9"));
        assert_eq!(params.iter().next(), Some(("p0", "0")));
    }

    #[test]
    fn test_empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.get("id"), None);
    }
}
