use crate::SurfaceError;
use std::time::Duration;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Issues the GET requests of a sampling run.
///
/// Implementations are shared by every worker of the pool.
pub trait Transport: Sync {
    /// Sends `GET url?query` and returns the reply, whatever its
    /// status.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::Connectivity`] if no reply was received.
    fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<Reply, SurfaceError>;
}

/// [`Transport`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Returns a transport whose requests give up after `timeout`, or
    /// never if `None`.
    pub fn new(timeout: Option<Duration>) -> Result<Self, SurfaceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<Reply, SurfaceError> {
        let connectivity = |e: reqwest::Error| SurfaceError::Connectivity {
            url: url.to_owned(),
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(connectivity)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(connectivity)?.to_vec();
        Ok(Reply { status, body })
    }
}
