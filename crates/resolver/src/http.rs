//! # HTTPリゾルバー
//!
//! Universal Resolver互換のHTTPエンドポイントから識別子を取得する。
//! DIDもリソースURIも `GET {base_url}/{identifier}` で取得する。

use ovcv_types::DidResolutionResult;

use crate::config::ResolverConfig;
use crate::{DidResolver, ResolverError};

/// reqwestによる[`DidResolver`]実装。
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResolver {
    /// 設定からクライアントを構築する。
    pub fn new(config: &ResolverConfig) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ResolverError::Config(format!("HTTPクライアントの構築に失敗: {e}")))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// 既存のクライアントを使う。
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 識別子の取得URL。
    pub fn identifier_url(&self, identifier: &str) -> String {
        format!("{}/{}", self.base_url, identifier.trim_start_matches('/'))
    }

    /// GETしてJSONとして返す。ステータスは呼び出し側で判定する。
    async fn get_json(&self, url: &str) -> Result<(u16, serde_json::Value), ResolverError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ResolverError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| ResolverError::Request {
                url: url.to_string(),
                source,
            })?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok((status, value)),
            Err(_) if !(200..300).contains(&status) => Err(ResolverError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            Err(e) => Err(ResolverError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl DidResolver for HttpResolver {
    async fn resolve(&self, did: &str) -> Result<DidResolutionResult, ResolverError> {
        let url = self.identifier_url(did);
        let (status, value) = self.get_json(&url).await?;

        let resolution: DidResolutionResult =
            serde_json::from_value(value).map_err(|e| ResolverError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;

        // 解決失敗時はエラー本文にdidResolutionMetadata.errorが入る
        if let Some(error) = resolution.did_resolution_metadata.error.clone() {
            tracing::warn!(did, %error, "DIDの解決に失敗");
            return Err(ResolverError::NotResolved {
                did: did.to_string(),
                error,
            });
        }
        if !(200..300).contains(&status) {
            return Err(ResolverError::HttpStatus { url, status });
        }

        tracing::debug!(
            did,
            resources = resolution.did_document_metadata.linked_resource_metadata.len(),
            "DIDを解決しました"
        );
        Ok(resolution)
    }

    async fn fetch_resource(
        &self,
        resource_uri: &str,
    ) -> Result<serde_json::Value, ResolverError> {
        let url = self.identifier_url(resource_uri);
        let (status, value) = self.get_json(&url).await?;
        if !(200..300).contains(&status) {
            return Err(ResolverError::HttpStatus { url, status });
        }
        Ok(value)
    }
}
