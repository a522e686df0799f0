//! Thin client for the Bee node HTTP API.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use sm_core::{IdentityAddress, NodeMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub bee_mode: String,
    pub mode: NodeMode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeResponse {
    bee_mode: String,
}

#[derive(Debug, Deserialize)]
struct AddressesResponse {
    ethereum: String,
}

#[derive(Debug, Deserialize)]
struct PeersResponse {
    #[serde(default)]
    peers: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    available_balance: Value,
}

pub struct BeeApiClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl BeeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .with_context(|| format!("invalid node API URL: {base_url}"))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to create HTTP client: {e}"))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("invalid API path: {path}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {path} returned HTTP {status}"));
        }
        response
            .json()
            .await
            .with_context(|| format!("GET {path} returned an unexpected body"))
    }

    /// True once the API answers `/health` with a success status.
    pub async fn is_healthy(&self) -> bool {
        let Ok(url) = self.base_url.join("health") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn node_info(&self) -> Result<NodeInfo> {
        let body: NodeResponse = self.get("node").await?;
        let mode = match body.bee_mode.as_str() {
            "light" | "full" => NodeMode::Payment,
            "ultra-light" => NodeMode::Minimal,
            other => return Err(anyhow!("unknown bee mode: {other}")),
        };
        Ok(NodeInfo {
            bee_mode: body.bee_mode,
            mode,
        })
    }

    pub async fn identity_address(&self) -> Result<IdentityAddress> {
        let body: AddressesResponse = self.get("addresses").await?;
        Ok(IdentityAddress::new(body.ethereum))
    }

    pub async fn connected_peers(&self) -> Result<usize> {
        let body: PeersResponse = self.get("peers").await?;
        Ok(body.peers.len())
    }

    pub async fn chequebook_balance(&self) -> Result<String> {
        let body: BalanceResponse = self.get("chequebook/balance").await?;
        Ok(match body.available_balance {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
