use std::fmt;

/// A `GET` request in the minimal text protocol the score service speaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    host: String,
    path: String,
    query: Vec<(String, String)>,
}

impl Request {
    pub fn get(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter. Parameters are sent in insertion order.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Path plus query string, as sent on the request line.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\n\r\n",
            self.target(),
            self.host
        )
        .into_bytes()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.target())
    }
}
