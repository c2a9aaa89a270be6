//! # OV Content Viewer DIDリゾルバークライアント
//!
//! DIDと、そのDIDにリンクされたコンテンツ登録レコードをリモートのリゾルバーから取得し、
//! 表示用の[`ContentView`]を構築する。
//!
//! ## 処理フロー
//! 1. `GET {base_url}/{did}` でDIDを解決する
//! 2. リンクリソースから最新の`Content-Registration-Record`を選ぶ
//! 3. `GET {base_url}/{resourceURI}` で登録レコードを取得する
//! 4. 登録レコードから[`ContentView`]を構築する
//!
//! ## リゾルバー実装
//! - [`HttpResolver`]: reqwestによるHTTP実装（本番用）
//! - テストでは[`DidResolver`]を実装したモックを差し替える

pub mod config;
pub mod http;

pub use config::ResolverConfig;
pub use http::HttpResolver;

use ovcv_core::registration::{decode_registration_record, latest_registration_resource};
use ovcv_core::{ContentView, CoreError};
use ovcv_types::DidResolutionResult;

/// リゾルバーのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// リクエスト送信・受信に失敗（接続失敗、タイムアウト等）
    #[error("リゾルバーへのリクエストに失敗 ({url}): {source}")]
    Request {
        /// リクエストURL
        url: String,
        /// 原因
        #[source]
        source: reqwest::Error,
    },
    /// 2xx以外のステータス
    #[error("リゾルバーがHTTPエラーを返しました: ステータス {status} ({url})")]
    HttpStatus {
        /// リクエストURL
        url: String,
        /// HTTPステータスコード
        status: u16,
    },
    /// レスポンスがJSONとして解釈できない
    #[error("リゾルバーのレスポンスを解釈できません ({url}): {message}")]
    Decode {
        /// リクエストURL
        url: String,
        /// 詳細
        message: String,
    },
    /// リゾルバーがDIDの解決エラーを報告した
    #[error("DIDを解決できません ({did}): {error}")]
    NotResolved {
        /// 対象DID
        did: String,
        /// `didResolutionMetadata.error`
        error: String,
    },
    /// 登録レコードの処理に失敗
    #[error(transparent)]
    Core(#[from] CoreError),
    /// 設定が不正
    #[error("設定が不正です: {0}")]
    Config(String),
}

/// DIDとリンクリソースを取得するリゾルバー。
///
/// HTTP、ローカルのフィクスチャ等、取得方法を差し替えられるよう抽象化する。
#[async_trait::async_trait]
pub trait DidResolver: Send + Sync {
    /// DIDを解決する。
    async fn resolve(&self, did: &str) -> Result<DidResolutionResult, ResolverError>;

    /// リンクリソース本体をJSONとして取得する。
    async fn fetch_resource(&self, resource_uri: &str)
        -> Result<serde_json::Value, ResolverError>;
}

/// DIDを解決し、最新のコンテンツ登録ビューを返す。
/// 登録コンテンツが無い場合は`Ok(None)`。
pub async fn load_content_view<R>(
    resolver: &R,
    did: &str,
) -> Result<Option<ContentView>, ResolverError>
where
    R: DidResolver + ?Sized,
{
    tracing::info!(did, "DIDを解決中");
    let resolution = resolver.resolve(did).await?;
    load_content_view_from_resolution(resolver, &resolution).await
}

/// 解決済みのDIDから最新のコンテンツ登録ビューを返す。
/// 登録コンテンツが無い場合は`Ok(None)`。
pub async fn load_content_view_from_resolution<R>(
    resolver: &R,
    resolution: &DidResolutionResult,
) -> Result<Option<ContentView>, ResolverError>
where
    R: DidResolver + ?Sized,
{
    let Some(resource) = latest_registration_resource(&resolution.did_document_metadata) else {
        tracing::info!("このDIDには登録済みコンテンツがありません");
        return Ok(None);
    };

    tracing::info!(resource_uri = %resource.resource_uri, "登録レコードを取得中");
    let response = resolver.fetch_resource(&resource.resource_uri).await?;
    let record = decode_registration_record(response)?;
    let view = ContentView::from_record(&record);

    if let Some(barcode) = &view.barcode {
        if !barcode.is_complete() {
            tracing::warn!(
                fragments = barcode.swatches.len(),
                "カラーコードの断片数が24ではありません"
            );
        }
    }
    Ok(Some(view))
}
