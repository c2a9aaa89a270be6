//! # リゾルバー設定
//!
//! 環境変数からの設定読み込み。

use std::time::Duration;

use crate::ResolverError;

/// 既定のDIDリゾルバー（cheqd Universal Resolver）。
pub const DEFAULT_RESOLVER_URL: &str = "https://resolver.cheqd.net/1.0/identifiers";

/// 既定のリクエストタイムアウト（秒）。
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// リゾルバーURLの環境変数名。
pub const ENV_RESOLVER_URL: &str = "OV_RESOLVER_URL";

/// タイムアウト秒数の環境変数名。
pub const ENV_RESOLVER_TIMEOUT_SECS: &str = "OV_RESOLVER_TIMEOUT_SECS";

/// リゾルバークライアントの設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// 識別子を連結するベースURL（末尾の`/`は除去済み）
    pub base_url: String,
    /// 1リクエストあたりのタイムアウト
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RESOLVER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ResolverConfig {
    /// 環境変数から設定を読み込む。未設定の項目は既定値。
    pub fn from_env() -> Result<Self, ResolverError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ResolverError> {
        let base_url = lookup(ENV_RESOLVER_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESOLVER_URL.to_string());

        let timeout_secs = match lookup(ENV_RESOLVER_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ResolverError::Config(format!(
                    "{ENV_RESOLVER_TIMEOUT_SECS}は秒数（整数）である必要があります: {raw:?}"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(base_url, Duration::from_secs(timeout_secs)))
    }

    /// 設定を作成する。ベースURL末尾の`/`は除去する。
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}
