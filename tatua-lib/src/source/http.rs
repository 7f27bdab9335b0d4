//! HTTP record source

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::RecordSource;
use crate::error::Error;
use crate::error::FetchError;
use crate::model::Record;

/// Fetches delegated query results from an HTTP endpoint.
///
/// The query suffix is appended to the endpoint URL. The response body may
/// be a JSON array of records or an object wrapping the array in `value`,
/// `records` or `tickets`.
///
/// This source is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tatua_lib::source::HttpSource;
///
/// let source = HttpSource::builder()
///     .url("https://example.com/api/tickets")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let records = source.fetch("?sort=id:desc").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpSource {
    inner: Arc<HttpSourceInner>,
}

#[derive(Debug)]
struct HttpSourceInner {
    endpoint: Url,
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpSource {
    /// Creates a new builder for constructing a source.
    pub fn builder() -> HttpSourceBuilder<Missing> {
        HttpSourceBuilder::new()
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Returns the full request URL for a query suffix.
    pub fn request_url(&self, query: &str) -> String {
        join_query(&self.inner.endpoint, query)
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn fetch(&self, query: &str) -> Result<Vec<Record>, Error> {
        let url = self.request_url(query);
        log::debug!("GET {}", url);

        let mut request = self.inner.http_client.get(&url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| match self.inner.timeout {
            Some(timeout) if e.is_timeout() => FetchError::Timeout(timeout),
            _ => FetchError::Network(e),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, body).into());
        }

        let body = response.text().await.map_err(FetchError::from)?;
        Ok(parse_records(&body)?)
    }
}

/// Appends a query suffix to an endpoint, merging with any existing query.
pub fn join_query(endpoint: &Url, query: &str) -> String {
    let params = query.strip_prefix('?').unwrap_or(query);
    if params.is_empty() {
        return endpoint.to_string();
    }
    match endpoint.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", endpoint, params),
        _ => {
            let mut base = endpoint.to_string();
            if base.ends_with('?') {
                base.pop();
            }
            format!("{}?{}", base, params)
        }
    }
}

/// Reads records out of a response body.
pub fn parse_records(body: &str) -> Result<Vec<Record>, FetchError> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::parse_with_body(e.to_string(), body))?;

    let array = match json {
        serde_json::Value::Array(_) => json,
        serde_json::Value::Object(mut map) => ["value", "records", "tickets"]
            .iter()
            .find_map(|key| map.remove(*key).filter(|v| v.is_array()))
            .ok_or_else(|| FetchError::parse("Response object has no record array"))?,
        _ => return Err(FetchError::parse("Response is not a record collection")),
    };

    serde_json::from_value(array).map_err(|e| FetchError::parse(e.to_string()))
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpSource`].
///
/// # Required Fields
///
/// - `url` - The endpoint answering delegated queries
pub struct HttpSourceBuilder<U> {
    url: U,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpSourceBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the endpoint URL.
    pub fn url(self, url: impl Into<String>) -> HttpSourceBuilder<Set<String>> {
        HttpSourceBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpSourceBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpSourceBuilder<U> {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpSourceBuilder<Set<String>> {
    /// Builds the [`HttpSource`].
    pub fn build(self) -> Result<HttpSource, FetchError> {
        let endpoint =
            Url::parse(&self.url.0).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpSource {
            inner: Arc::new(HttpSourceInner {
                endpoint,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_query() {
        let plain = Url::parse("https://example.com/tickets").unwrap();
        assert_eq!(
            join_query(&plain, "?sort=age:desc"),
            "https://example.com/tickets?sort=age:desc"
        );
        assert_eq!(join_query(&plain, ""), "https://example.com/tickets");

        let with_query = Url::parse("https://example.com/tickets?key=abc").unwrap();
        assert_eq!(
            join_query(&with_query, "?sort=age:desc"),
            "https://example.com/tickets?key=abc&sort=age:desc"
        );
    }

    #[test]
    fn test_parse_records_shapes() {
        let bare = parse_records(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(bare.len(), 2);

        let wrapped = parse_records(r#"{"@count": 1, "value": [{"id": 7}]}"#).unwrap();
        assert_eq!(wrapped[0].id_text(), "7");

        let tickets = parse_records(r#"{"tickets": [{"id": 3, "subject": "Printer"}]}"#).unwrap();
        assert_eq!(tickets[0].text("subject"), "Printer");
    }

    #[test]
    fn test_parse_records_keeps_at_keys() {
        let records = parse_records(r#"[{"id": 1, "@handle": "ann", "name": "Ann"}]"#).unwrap();
        let keys: Vec<_> = records[0].keys().collect();
        assert_eq!(keys, vec!["id", "@handle", "name"]);
    }

    #[test]
    fn test_parse_records_errors() {
        let err = parse_records("not json").unwrap_err();
        assert!(matches!(err, FetchError::Parse { body: Some(_), .. }));
        assert!(parse_records(r#"{"items": []}"#).is_err());
        assert!(parse_records("42").is_err());
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = HttpSource::builder().url("not a url").build().unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_builds() {
        let source = HttpSource::builder()
            .url("http://localhost:8080/tickets")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(source.endpoint().path(), "/tickets");
        assert_eq!(
            source.request_url("?filter=id:eq:1"),
            "http://localhost:8080/tickets?filter=id:eq:1"
        );
    }
}
