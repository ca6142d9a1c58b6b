//! Query-string construction.
//!
//! Parameters live in a `BTreeMap`, so serialization order is the
//! lexicographic key order and the same mapping always produces the same
//! URL. Empty values are dropped: a cleared filter means "no filter".

use std::collections::BTreeMap;

/// An ordered set of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    /// Insert the parameter only when `value` is `Some`.
    pub fn set_opt<V: ToString>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// True when serializing would produce no query string.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// Serialize as `k1=v1&k2=v2` without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the query string to `path`, adding `?` only when needed.
    pub fn append_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_serialize_in_sorted_order() {
        let params: QueryParams = [("type", "running"), ("end_date", "2024-02-01"), ("user", "3")]
            .into_iter()
            .collect();
        assert_eq!(
            params.to_query_string(),
            "end_date=2024-02-01&type=running&user=3"
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a: QueryParams = [("b", "2"), ("a", "1")].into_iter().collect();
        let b: QueryParams = [("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(a.to_query_string(), b.to_query_string());
    }

    #[test]
    fn values_are_percent_encoded() {
        let params: QueryParams = [("q", "strength training & yoga")].into_iter().collect();
        assert_eq!(params.to_query_string(), "q=strength%20training%20%26%20yoga");
    }

    #[test]
    fn empty_values_are_skipped() {
        let params: QueryParams = [("fitness_level", ""), ("activity_type", "yoga")]
            .into_iter()
            .collect();
        assert_eq!(params.to_query_string(), "activity_type=yoga");
    }

    #[test]
    fn empty_params_leave_path_untouched() {
        let params: QueryParams = [("fitness_level", "")].into_iter().collect();
        assert!(params.is_empty());
        assert_eq!(params.append_to("/workouts/"), "/workouts/");
        assert_eq!(QueryParams::new().append_to("/workouts/"), "/workouts/");
    }

    #[test]
    fn set_opt_skips_none() {
        let mut params = QueryParams::new();
        params.set_opt("limit", Some(20)).set_opt("page", None::<u32>);
        assert_eq!(params.append_to("/leaderboard/"), "/leaderboard/?limit=20");
    }
}
