use super::Client;
use crate::error::{FetchError, Result};
use http::{
    header::{HeaderMap, HeaderName},
    HeaderValue,
};
use rquest::Client as RquestClient;
use std::str::FromStr;
use std::time::Duration;

pub struct ClientBuilder {
    timeout: Duration,
    headers: HeaderMap,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            headers: HeaderMap::new(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let header_name = HeaderName::from_str(key.as_ref())
            .map_err(|e| FetchError::BuildError(format!("Invalid header name: {}", e)))?;

        let header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|e| FetchError::BuildError(format!("Invalid header value: {}", e)))?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> Result<Client> {
        if self.timeout.is_zero() {
            return Err(FetchError::BuildError("Timeout must be greater than 0".to_string()).into());
        }

        let mut inner = RquestClient::builder()
            .build()
            .map_err(|e| FetchError::BuildError(format!("Failed to build client: {}", e)))?;

        // Set the headers on the client
        *inner.as_mut().headers() = self.headers;

        Ok(Client {
            inner,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_header_names() {
        assert!(ClientBuilder::new().header("bad header", "x").is_err());
        assert!(ClientBuilder::new().header("user-agent", "kyuukou/0.1").is_ok());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(ClientBuilder::new().timeout(Duration::ZERO).build().is_err());
    }
}
