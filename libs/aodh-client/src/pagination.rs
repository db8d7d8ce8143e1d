//! Query-string helpers for list endpoints

use std::collections::BTreeMap;

/// `limit` / `marker` / `sort` options of the v2 list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Maximum number of items to return
    pub limit: Option<u32>,
    /// Id of the last item of the previous page
    pub marker: Option<String>,
    /// Sort keys such as `name:asc`
    pub sorts: Vec<String>,
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sorts.push(sort.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.marker.is_none() && self.sorts.is_empty()
    }

    /// Render as `limit=<n>&marker=<m>&sort=<s>...`, empty when no option is set
    ///
    /// # Examples
    /// ```
    /// use aodh_client::PaginationOptions;
    ///
    /// let options = PaginationOptions::new().limit(10).sort("name:asc");
    /// assert_eq!(options.to_query_string(), "limit=10&sort=name%3Aasc");
    /// assert_eq!(PaginationOptions::new().to_query_string(), "");
    /// ```
    pub fn to_query_string(&self) -> String {
        let mut options = Vec::new();
        if let Some(limit) = self.limit {
            options.push(format!("limit={}", limit));
        }
        if let Some(marker) = &self.marker {
            options.push(format!("marker={}", encode(marker)));
        }
        for sort in &self.sorts {
            options.push(format!("sort={}", encode(sort)));
        }
        options.join("&")
    }
}

/// Translate a field→value filter set into `q.field`/`q.op`/`q.value` clauses
///
/// Keys are visited in sorted order so the URL is deterministic.
pub fn filters_to_query(filters: &BTreeMap<String, String>) -> String {
    filters
        .iter()
        .map(|(field, value)| {
            format!(
                "q.field={}&q.op=eq&q.value={}",
                encode(field),
                encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append non-empty query parts to `path`, adding `?` only when needed
pub fn with_query(path: &str, parts: &[String]) -> String {
    let parts: Vec<&str> = parts
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, parts.join("&"))
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
