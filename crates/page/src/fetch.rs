//! Resource fetching.
//!
//! [`Fetch`] stands in for the browser's `fetch`: it resolves to a [`Response`] for any status,
//! and only fails on transport errors. [`fetch_text`] applies the "2xx or error" policy every
//! caller in this workspace uses.
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use tracing::{debug, warn};

/// A fetched resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Checks if the status is 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fetch errors
pub enum FetchError {
    /// The resource answered with a non 2xx status
    Status { url: String, status: u16 },
    /// The resource couldn't be reached at all
    Transport { url: String, reason: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { url, status } => write!(f, "'{}' answered with status {}", url, status),
            Self::Transport { url, reason } => write!(f, "Failed to fetch '{}': {}", url, reason),
        }
    }
}
impl std::error::Error for FetchError {}

#[async_trait]
pub trait Fetch: Send + Sync {
    /// Request a resource, any status counts as a successful fetch
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError>;
}

/// Fetch a resource and return its body.
///
/// # Errors
/// Returns [`FetchError::Status`] if the resource didn't answer with a 2xx status, or the
/// transport error of the underlying fetcher.
pub async fn fetch_text(fetcher: &dyn Fetch, url: &Url) -> Result<String, FetchError> {
    let res = fetcher.fetch(url).await?;
    debug!(url = %url, status = res.status, "Fetched resource");
    if !res.ok() {
        return Err(FetchError::Status { url: url.to_string(), status: res.status });
    }
    Ok(res.body)
}

/// Fetcher over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher without a request timeout, a hung request never resolves
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self { client: ClientBuilder::new().build()? })
    }

    /// Create a fetcher whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self { client: ClientBuilder::new().timeout(timeout).build()? })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        let transport = |why: reqwest::Error| {
            request_error_log(&why, url.as_str());
            FetchError::Transport { url: url.to_string(), reason: why.to_string() }
        };
        let res = self.client.get(url.clone()).send().await.map_err(transport)?;
        let status = res.status().as_u16();
        let body = res.text().await.map_err(transport)?;
        Ok(Response { status, body })
    }
}

/// Logs [`reqwest::Error`]
fn request_error_log(err: &reqwest::Error, ctx: &str) {
    if err.is_timeout() {
        warn!("Timeout when requesting {}: {}", ctx, err);
    } else if err.is_request() {
        warn!("Requesting {} failed: {}", ctx, err);
    } else if err.is_connect() {
        warn!("Failed to connect when requesting {}: {}", ctx, err);
    } else {
        warn!("Error when requesting {}: {}", ctx, err);
    }
}

/// Fetcher serving a site directory from disk.
///
/// The url path is mapped under `root`, a path ending in `/` serves its `index.html`. Missing
/// files answer with status 404.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_path(&self, url: &Url) -> Result<PathBuf, FetchError> {
        let mut path = self.root.clone();
        let mut segments = url.path_segments().map(|s| s.collect::<Vec<_>>()).unwrap_or_default();
        if segments.last().map_or(true, |s| s.is_empty()) {
            segments.pop();
            segments.push("index.html");
        }
        for seg in segments {
            let seg = util::string::decode_component(seg).map_err(|why| FetchError::Transport {
                url: url.to_string(),
                reason: format!("{:#}", why),
            })?;
            if seg.is_empty() || seg == "." || seg == ".." || seg.contains('/') || seg.contains('\\') {
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    reason: format!("Refusing to serve path segment '{}'", seg),
                });
            }
            path.push(seg);
        }
        Ok(path)
    }
}

#[async_trait]
impl Fetch for DirFetcher {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        let path = self.file_path(url)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Response::new(200, body)),
            Err(why) if why.kind() == std::io::ErrorKind::NotFound => Ok(Response::new(404, "Not Found")),
            Err(why) => Err(FetchError::Transport { url: url.to_string(), reason: why.to_string() }),
        }
    }
}

/// Fetcher answering from a fixed table keyed by url path, unknown paths answer 404.
/// ```
/// use page::fetch::{fetch_text, MemoryFetcher, FetchError};
/// use page::Url;
///
/// # tokio_test_block(async {
/// let fetcher = MemoryFetcher::new()
///     .with("/data/members.json", 200, "[]")
///     .with_failure("/partials/nav.html", "connection reset");
/// let base = Url::parse("https://guild.test/").unwrap();
///
/// let body = fetch_text(&fetcher, &base.join("data/members.json").unwrap()).await;
/// assert_eq!(body.unwrap(), "[]");
/// let missing = fetch_text(&fetcher, &base.join("nope.html").unwrap()).await;
/// assert!(matches!(missing, Err(FetchError::Status { status: 404, .. })));
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Result<Response, String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with a response
    pub fn with(mut self, path: &str, status: u16, body: &str) -> Self {
        self.responses.insert(path.to_string(), Ok(Response::new(status, body)));
        self
    }

    /// Fail every request to `path` with a transport error
    pub fn with_failure(mut self, path: &str, reason: &str) -> Self {
        self.responses.insert(path.to_string(), Err(reason.to_string()));
        self
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch(&self, url: &Url) -> Result<Response, FetchError> {
        match self.responses.get(url.path()) {
            Some(Ok(res)) => Ok(res.clone()),
            Some(Err(reason)) => Err(FetchError::Transport { url: url.to_string(), reason: reason.clone() }),
            None => Ok(Response::new(404, "Not Found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_fetcher_reports_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/members.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"nickname":"Foo"}]"#))
            .mount(&server)
            .await;
        let fetcher = HttpFetcher::new().unwrap();
        let base = Url::parse(&server.uri()).unwrap();

        let body = fetch_text(&fetcher, &base.join("/data/members.json").unwrap()).await.unwrap();
        assert_eq!(body, r#"[{"nickname":"Foo"}]"#);

        let err = fetch_text(&fetcher, &base.join("/missing.html").unwrap()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn http_fetcher_transport_error() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/index.html").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn dir_fetcher_serves_files_and_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<main></main>").unwrap();
        std::fs::write(dir.path().join("partials/nav.html"), "<nav></nav>").unwrap();
        let fetcher = DirFetcher::new(dir.path());
        let base = Url::parse("http://localhost/").unwrap();

        assert_eq!(fetch_text(&fetcher, &base).await.unwrap(), "<main></main>");
        let nav = base.join("partials/nav.html").unwrap();
        assert_eq!(fetch_text(&fetcher, &nav).await.unwrap(), "<nav></nav>");
        let missing = fetcher.fetch(&base.join("partials/footer.html").unwrap()).await.unwrap();
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn dir_fetcher_refuses_encoded_separators() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DirFetcher::new(dir.path());
        let url = Url::parse("http://localhost/..%2Fsecret").unwrap();
        assert!(matches!(fetcher.fetch(&url).await, Err(FetchError::Transport { .. })));
    }
}
