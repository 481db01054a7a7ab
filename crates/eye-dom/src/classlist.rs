//! DOMTokenList (classList)
//!
//! Ordered, duplicate-free set of class tokens backing the `class` attribute.

/// Space-separated token set for an element's classes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMTokenList {
    tokens: Vec<String>,
}

impl DOMTokenList {
    /// Create empty token list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `class` attribute value, dropping repeated tokens
    pub fn parse(value: &str) -> Self {
        let mut list = Self::new();
        for token in value.split_whitespace() {
            list.add(token);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Add a token; returns false when it was already present or blank
    pub fn add(&mut self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Remove a token; returns whether it was present
    pub fn remove(&mut self, token: &str) -> bool {
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        self.tokens.len() != before
    }

    /// Toggle token, returns the new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> bool {
        let on = force.unwrap_or(!self.contains(token));
        if on {
            self.add(token);
        } else {
            self.remove(token);
        }
        on
    }

    /// Replace `old` in place, keeping its position
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.tokens.iter().position(|t| t == old) else {
            return false;
        };
        if self.contains(new) {
            self.tokens.remove(pos);
        } else {
            self.tokens[pos] = new.to_string();
        }
        true
    }

    /// Serialized attribute value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl std::fmt::Display for DOMTokenList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dedups() {
        let list = DOMTokenList::parse("card  card active ");
        assert_eq!(list.len(), 2);
        assert_eq!(list.value(), "card active");
    }

    #[test]
    fn test_add_remove() {
        let mut list = DOMTokenList::new();
        assert!(list.add("foo"));
        assert!(!list.add("foo"));
        assert!(!list.add("   "));
        assert!(list.remove("foo"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle_force() {
        let mut list = DOMTokenList::new();
        assert!(list.toggle("open", None));
        assert!(list.toggle("open", Some(true)));
        assert!(!list.toggle("open", None));
        assert!(!list.contains("open"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut list = DOMTokenList::parse("a b c");
        assert!(list.replace("b", "x"));
        assert_eq!(list.value(), "a x c");
        assert!(list.replace("x", "c"));
        assert_eq!(list.value(), "a c");
        assert!(!list.replace("missing", "y"));
    }
}
