//! Positional route parameters captured by the winning pattern.

/// Ordered capture groups of the last successful dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<String>,
}

impl Params {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// The capture at `index` (0 is the first parenthesized group).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn all(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_access() {
        let params = Params::new(vec!["alice".into(), "42".into()]);
        assert_eq!(params.get(0), Some("alice"));
        assert_eq!(params.get(1), Some("42"));
        assert_eq!(params.get(2), None);
        assert_eq!(params.iter().collect::<Vec<_>>(), vec!["alice", "42"]);
    }

    #[test]
    fn test_default_is_empty() {
        let params = Params::default();
        assert!(params.is_empty());
        assert_eq!(params.get(0), None);
    }
}
