//! Ordered request parameters with explicit absence.

/// Ordered request parameters.
///
/// A key mapped to `None` is explicitly absent: it is kept in the query so
/// callers can see it was considered, but it is never sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    params: Vec<(&'static str, Option<String>)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter (builder form).
    pub fn with(mut self, key: &'static str, value: Option<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a parameter, replacing any previous value for the key.
    pub fn set(&mut self, key: &'static str, value: Option<String>) {
        if let Some(slot) = self.params.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.params.push((key, value));
        }
    }

    /// Returns the value of a present parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns true if the key was set, even to `None`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.params.iter().any(|(k, _)| *k == key)
    }

    /// Iterates over all parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        self.params.iter().map(|(k, v)| (*k, v.as_deref()))
    }

    /// Encodes present parameters as an `application/x-www-form-urlencoded`
    /// body, in insertion order.
    pub fn encode_form(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.params {
            let Some(value) = value else { continue };
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut query = Query::new()
            .with("f", Some("json".to_string()))
            .with("where", None);
        query.set("f", Some("pjson".to_string()));

        let keys: Vec<_> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["f", "where"]);
        assert_eq!(query.get("f"), Some("pjson"));
    }

    #[test]
    fn test_absent_vs_missing() {
        let query = Query::new().with("adds", None);
        assert!(query.contains_key("adds"));
        assert_eq!(query.get("adds"), None);
        assert!(!query.contains_key("updates"));
    }

    #[test]
    fn test_encode_form_omits_absent_keys() {
        let query = Query::new()
            .with("f", Some("json".to_string()))
            .with("adds", None)
            .with("deletes", Some("\"1\",\"2\"".to_string()))
            .with("where", Some("name = 'A & B'".to_string()));

        assert_eq!(
            query.encode_form(),
            "f=json&deletes=%221%22%2C%222%22&where=name%20%3D%20%27A%20%26%20B%27"
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(Query::new().with("adds", None).encode_form(), "");
    }
}
