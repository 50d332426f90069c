mod builder;

use crate::error::{FetchError, Result};
pub use crate::log_info;
pub use builder::ClientBuilder;
use rquest::Client as RquestClient;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

#[derive(Debug)]
pub struct ClientResponse {
    pub status: u16,
    /// Raw body bytes; the page is not UTF-8, so decoding is left to the caller.
    pub body: Vec<u8>,
}

pub struct Client {
    inner: RquestClient,
    timeout: Duration,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// GET `url`, bounded by the configured timeout. Non-2xx statuses are errors.
    pub async fn get(&self, url: &str) -> Result<ClientResponse> {
        let url = parse_url(url)?;

        match timeout(self.timeout, self.request(&url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
            .into()),
        }
    }

    async fn request(&self, url: &Url) -> Result<ClientResponse> {
        log_info!("[client] GET {}", url);

        let response = self
            .inner
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(FetchError::ResponseError {
                status_code: status,
                url: url.to_string(),
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| {
            FetchError::RequestFailed(format!("Failed to read response body: {}", e))
        })?;

        log_info!(
            "[client] Received response: Status: {}, Content Length: {} bytes",
            status,
            body.len()
        );

        Ok(ClientResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!("unsupported scheme `{}` in {}", scheme, url)).into()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AppError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a local port and returns its URL.
    pub(crate) async fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=Shift_JIS\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/kyuukou.html", addr)
    }

    #[tokio::test]
    async fn returns_raw_body_bytes() {
        let body = vec![0x82, 0xa0, b'x'];
        let url = serve_once("200 OK", body.clone()).await;

        let client = Client::builder().build().unwrap();
        let response = client.get(&url).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, body);
    }

    #[tokio::test]
    async fn non_success_status_is_a_fetch_error() {
        let url = serve_once("404 Not Found", b"gone".to_vec()).await;

        let client = Client::builder().build().unwrap();
        let err = client.get(&url).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Fetch(FetchError::ResponseError {
                status_code: 404,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let err = client
            .get(&format!("http://{}/", addr))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Fetch(FetchError::Timeout { .. })));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(parse_url("ftp://example.com/file").is_err());
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("http://kyoumu.office.uec.ac.jp/kyuukou/kyuukou.html").is_ok());
    }
}
