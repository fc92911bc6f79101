// src/blockchain/services/faucet.rs
//
// Websocket transport for the BNB Chain testnet faucet.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

pub const DEFAULT_FAUCET_WS_URL: &str = "wss://testnet.bnbchain.org/faucet-smart/api";
pub const FAUCET_CHAIN: &str = "bscTestnet";
pub const FAUCET_TOKENS: [&str; 6] = ["BNB", "BTC", "BUSD", "DAI", "ETH", "USDC"];

#[async_trait]
pub trait FaucetTransport: Send + Sync {
    async fn open(&self, url: &str) -> Result<Box<dyn FaucetSession>>;
}

/// One open faucet conversation.
#[async_trait]
pub trait FaucetSession: Send {
    async fn send(&mut self, frame: Value) -> Result<()>;

    /// Next JSON frame, or `None` once the peer has closed the socket.
    async fn next_message(&mut self) -> Result<Option<Value>>;

    async fn close(&mut self) -> Result<()>;
}

/// What a faucet frame means for the pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaucetReply {
    Accepted,
    Funded(String),
    Failed(String),
    Other,
}

pub fn request_frame(recipient: &str, symbol: &str) -> Value {
    json!({
        "tier": 0,
        "url": recipient,
        "symbol": symbol,
        "captcha": "noCaptchaToken",
    })
}

pub fn classify_frame(frame: &Value) -> FaucetReply {
    match frame.get("success").and_then(Value::as_bool) {
        Some(false) => FaucetReply::Failed(
            frame
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("faucet request failed")
                .to_string(),
        ),
        Some(true) => {
            let requests = frame.get("requests").and_then(Value::as_array);
            match requests {
                None => FaucetReply::Accepted,
                Some(list) if list.is_empty() => FaucetReply::Accepted,
                Some(list) => match list[0]["tx"]["hash"].as_str() {
                    Some(hash) => FaucetReply::Funded(hash.to_string()),
                    None => FaucetReply::Other,
                },
            }
        }
        None => FaucetReply::Other,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WsFaucetTransport;

#[async_trait]
impl FaucetTransport for WsFaucetTransport {
    async fn open(&self, url: &str) -> Result<Box<dyn FaucetSession>> {
        let (stream, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to faucet at {}", url))?;
        info!("Connected to faucet {}", url);
        Ok(Box::new(WsFaucetSession { stream }))
    }
}

struct WsFaucetSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl FaucetSession for WsFaucetSession {
    async fn send(&mut self, frame: Value) -> Result<()> {
        self.stream
            .send(Message::Text(frame.to_string()))
            .await
            .context("Failed to send faucet request")
    }

    async fn next_message(&mut self) -> Result<Option<Value>> {
        while let Some(msg) = self.stream.next().await {
            match msg.context("faucet socket error")? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Binary(bytes) => return Ok(Some(serde_json::from_slice(&bytes)?)),
                Message::Close(_) => return Ok(None),
                other => debug!("ignoring faucet frame {:?}", other),
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.stream.close(None).await.context("Failed to close faucet socket")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_classified() {
        assert_eq!(
            classify_frame(&json!({"success": true, "requests": []})),
            FaucetReply::Accepted
        );
        assert_eq!(
            classify_frame(&json!({"success": true, "requests": [{"tx": {"hash": "0xabc"}}]})),
            FaucetReply::Funded("0xabc".into())
        );
        assert_eq!(
            classify_frame(&json!({"success": false, "error": "rate limited"})),
            FaucetReply::Failed("rate limited".into())
        );
        assert_eq!(classify_frame(&json!({"ping": 1})), FaucetReply::Other);
    }

    #[test]
    fn request_frame_shape() {
        let frame = request_frame("0x01", "BNB");
        assert_eq!(frame["tier"], 0);
        assert_eq!(frame["captcha"], "noCaptchaToken");
    }
}
