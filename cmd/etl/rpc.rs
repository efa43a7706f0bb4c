//! The two read-only JSON-RPC calls the ETL needs to bootstrap: the chain
//! id (used as the network key of the processing-status row) and the
//! genesis block hash.

use ethereum_types::H256;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcClientError {
    #[error("rpc request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("rpc server returned an error: {0}")]
    Server(String),
    #[error("malformed rpc response: {0}")]
    MalformedResponse(String),
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    message: String,
}

pub struct EthClient {
    client: Client,
    url: String,
}

impl EthClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    async fn send_request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcClientError> {
        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcClientError::Server(error.message));
        }
        response
            .result
            .ok_or_else(|| RpcClientError::MalformedResponse("no result".to_string()))
    }

    fn quantity_from(value: &serde_json::Value) -> Result<u64, RpcClientError> {
        let hex = value
            .as_str()
            .ok_or_else(|| RpcClientError::MalformedResponse("expected a string".to_string()))?;
        u64::from_str_radix(hex.trim_start_matches("0x"), 16)
            .map_err(|e| RpcClientError::MalformedResponse(e.to_string()))
    }

    pub async fn get_chain_id(&self) -> Result<u64, RpcClientError> {
        let result = self.send_request("eth_chainId", json!([])).await?;
        Self::quantity_from(&result)
    }

    pub async fn get_block_hash_by_number(
        &self,
        block_number: u64,
    ) -> Result<H256, RpcClientError> {
        let result = self
            .send_request(
                "eth_getBlockByNumber",
                json!([format!("{block_number:#x}"), false]),
            )
            .await?;
        let hash = result
            .get("hash")
            .and_then(|h| h.as_str())
            .ok_or_else(|| RpcClientError::MalformedResponse("block has no hash".to_string()))?;
        H256::from_str(hash.trim_start_matches("0x"))
            .map_err(|e| RpcClientError::MalformedResponse(e.to_string()))
    }
}
