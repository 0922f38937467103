use std::collections::BTreeMap;

/// Query parameter that names the repository whose edit dialog is open
pub const CUSTOM_REPOSITORY_PARAM: &str = "customRepository";

/// Query-string state of the current view.
///
/// The repository panel reads and writes [`CUSTOM_REPOSITORY_PARAM`] here;
/// the owner of the location decides what else lives in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    query: BTreeMap<String, String>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=1&b=2` (a leading `?` is allowed)
    pub fn from_query(query: &str) -> Self {
        let query = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();
        Self { query }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.query.remove(key)
    }

    pub fn to_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}
