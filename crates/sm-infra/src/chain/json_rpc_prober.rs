//! Chain endpoint prober speaking Ethereum JSON-RPC over HTTP(S) or WebSocket.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;

use sm_core::ports::{ChainProbePort, ProbeError};
use sm_core::ChainId;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Vec<serde_json::Value>,
}

const CHAIN_ID_REQUEST: RpcRequest<'static> = RpcRequest {
    jsonrpc: "2.0",
    id: 1,
    method: "eth_chainId",
    params: Vec::new(),
};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Http,
    WebSocket,
}

/// Asks the endpoint for `eth_chainId`.
///
/// Anything that prevents a request from completing is `Unreachable`; an
/// answer that is not a valid chain id (or not the expected one) is `Rejected`.
pub struct JsonRpcChainProber {
    client: reqwest::Client,
    timeout: Duration,
    expected_chain_id: Option<ChainId>,
}

impl JsonRpcChainProber {
    pub fn new(timeout: Duration, expected_chain_id: Option<ChainId>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {e}"))?;
        Ok(Self {
            client,
            timeout,
            expected_chain_id,
        })
    }

    fn parse_url(endpoint: &str) -> Result<(reqwest::Url, Transport), ProbeError> {
        let url = reqwest::Url::parse(endpoint.trim())
            .map_err(|e| ProbeError::Unreachable(format!("invalid URL: {e}")))?;
        let transport = match url.scheme() {
            "http" | "https" => Transport::Http,
            "ws" | "wss" => Transport::WebSocket,
            other => {
                return Err(ProbeError::Unreachable(format!(
                    "unsupported URL scheme: {other}"
                )))
            }
        };
        Ok((url, transport))
    }

    fn timed_out(&self) -> ProbeError {
        ProbeError::Unreachable(format!("no answer within {:?}", self.timeout))
    }

    async fn call_http(&self, url: reqwest::Url) -> Result<RpcResponse, ProbeError> {
        let response = self
            .client
            .post(url)
            .json(&CHAIN_ID_REQUEST)
            .send()
            .await
            .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Rejected(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| ProbeError::Rejected(format!("invalid JSON-RPC response: {e}")))
    }

    async fn call_websocket(&self, url: reqwest::Url) -> Result<RpcResponse, ProbeError> {
        let (mut stream, _) = tokio::time::timeout(
            self.timeout,
            tokio_tungstenite::connect_async(url.as_str()),
        )
        .await
        .map_err(|_| self.timed_out())?
        .map_err(|e| match e {
            WsError::Http(response) => ProbeError::Rejected(format!("HTTP {}", response.status())),
            other => ProbeError::Unreachable(other.to_string()),
        })?;

        let request = serde_json::to_string(&CHAIN_ID_REQUEST)
            .map_err(|e| ProbeError::Rejected(format!("encode request: {e}")))?;
        stream
            .send(Message::Text(request))
            .await
            .map_err(|e| ProbeError::Unreachable(e.to_string()))?;

        let reply = tokio::time::timeout(self.timeout, next_payload(&mut stream))
            .await
            .map_err(|_| self.timed_out())??;

        if let Err(e) = stream.close(None).await {
            debug!(error = %e, "websocket close failed");
        }

        serde_json::from_slice(&reply)
            .map_err(|e| ProbeError::Rejected(format!("invalid JSON-RPC response: {e}")))
    }
}

#[async_trait]
impl ChainProbePort for JsonRpcChainProber {
    async fn probe(&self, endpoint: &str) -> Result<ChainId, ProbeError> {
        let (url, transport) = Self::parse_url(endpoint)?;
        let body = match transport {
            Transport::Http => self.call_http(url).await?,
            Transport::WebSocket => self.call_websocket(url).await?,
        };

        if let Some(error) = body.error {
            return Err(ProbeError::Rejected(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        let raw = body
            .result
            .ok_or_else(|| ProbeError::Rejected("RPC response missing result".to_string()))?;
        let chain_id = parse_hex_quantity(&raw)
            .map(ChainId)
            .ok_or_else(|| ProbeError::Rejected(format!("invalid chain id: {raw}")))?;
        debug!(%endpoint, %chain_id, ?transport, "eth_chainId answered");

        match self.expected_chain_id {
            Some(expected) if expected != chain_id => Err(ProbeError::Rejected(format!(
                "chain id {chain_id}, expected {expected}"
            ))),
            _ => Ok(chain_id),
        }
    }
}

/// First data frame on the socket; pings and pongs are skipped.
async fn next_payload<S>(stream: &mut S) -> Result<Vec<u8>, ProbeError>
where
    S: futures_util::Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(message) = stream.next().await {
        match message.map_err(|e| ProbeError::Unreachable(e.to_string()))? {
            Message::Text(text) => return Ok(text.into_bytes()),
            Message::Binary(bytes) => return Ok(bytes),
            Message::Close(_) => break,
            _ => continue,
        }
    }
    Err(ProbeError::Rejected("connection closed before answering".to_string()))
}

/// `0x`-prefixed hex quantity as used by Ethereum JSON-RPC.
fn parse_hex_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn prober(expected: Option<ChainId>) -> JsonRpcChainProber {
        JsonRpcChainProber::new(Duration::from_secs(5), expected).unwrap()
    }

    #[test]
    fn hex_quantities() {
        assert_eq!(parse_hex_quantity("0x64"), Some(100));
        assert_eq!(parse_hex_quantity("0x1"), Some(1));
        assert_eq!(parse_hex_quantity("0x"), None);
        assert_eq!(parse_hex_quantity("64"), None);
        assert_eq!(parse_hex_quantity("0xzz"), None);
    }

    #[tokio::test]
    async fn answers_with_chain_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"method": "eth_chainId"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x64"}"#)
            .create_async()
            .await;

        let chain_id = prober(Some(ChainId(100)))
            .probe(&server.url())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(chain_id, ChainId(100));
    }

    #[tokio::test]
    async fn wrong_chain_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#)
            .create_async()
            .await;

        let err = prober(Some(ChainId(100)))
            .probe(&server.url())
            .await
            .unwrap_err();

        assert_eq!(err, ProbeError::Rejected("chain id 1, expected 100".to_string()));
    }

    #[tokio::test]
    async fn rpc_error_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"method not found"}}"#,
            )
            .create_async()
            .await;

        let err = prober(None).probe(&server.url()).await.unwrap_err();

        assert_eq!(
            err,
            ProbeError::Rejected("RPC error -32601: method not found".to_string())
        );
    }

    #[tokio::test]
    async fn http_error_and_garbage_are_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/down")
            .with_status(503)
            .create_async()
            .await;
        server
            .mock("POST", "/html")
            .with_status(200)
            .with_body("<html>hello</html>")
            .create_async()
            .await;

        let prober = prober(None);
        let down = prober
            .probe(&format!("{}/down", server.url()))
            .await
            .unwrap_err();
        let html = prober
            .probe(&format!("{}/html", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(down, ProbeError::Rejected(ref d) if d.contains("503")));
        assert!(matches!(html, ProbeError::Rejected(_)));
    }

    /// Serves one websocket connection, answering the first request with `reply`.
    async fn websocket_server(reply: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
            while let Some(Ok(message)) = ws.next().await {
                if let Message::Text(text) = message {
                    assert!(text.contains("eth_chainId"));
                    ws.send(Message::Text(reply.to_string())).await.unwrap();
                    break;
                }
            }
        });
        format!("ws://{addr}")
    }

    #[test]
    fn websocket_schemes_are_accepted() {
        let (_, transport) =
            JsonRpcChainProber::parse_url("wss://gnosis-rpc.publicnode.com").unwrap();
        assert_eq!(transport, Transport::WebSocket);
        let (_, transport) = JsonRpcChainProber::parse_url("ws://127.0.0.1:8546").unwrap();
        assert_eq!(transport, Transport::WebSocket);
    }

    #[tokio::test]
    async fn websocket_endpoint_answers_with_chain_id() {
        let url = websocket_server(r#"{"jsonrpc":"2.0","id":1,"result":"0x64"}"#).await;

        let chain_id = prober(Some(ChainId(100))).probe(&url).await.unwrap();

        assert_eq!(chain_id, ChainId(100));
    }

    #[tokio::test]
    async fn websocket_wrong_chain_is_rejected() {
        let url = websocket_server(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#).await;

        let err = prober(Some(ChainId(100))).probe(&url).await.unwrap_err();

        assert_eq!(err, ProbeError::Rejected("chain id 1, expected 100".to_string()));
    }

    #[tokio::test]
    async fn bad_urls_and_closed_ports_are_unreachable() {
        let prober = prober(None);

        assert!(matches!(
            prober.probe("not a url").await,
            Err(ProbeError::Unreachable(_))
        ));
        assert!(matches!(
            prober.probe("ftp://example.org").await,
            Err(ProbeError::Unreachable(_))
        ));

        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        assert!(matches!(
            prober.probe(&format!("http://127.0.0.1:{port}")).await,
            Err(ProbeError::Unreachable(_))
        ));
        assert!(matches!(
            prober.probe(&format!("ws://127.0.0.1:{port}")).await,
            Err(ProbeError::Unreachable(_))
        ));
    }
}
