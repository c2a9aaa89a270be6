//! # コンテンツ登録ビュー
//!
//! DIDにリンクされたコンテンツ登録レコードを選び、表示用のビューを構築する。
//!
//! ## 処理フロー
//! 1. リンクリソースから最新の`Content-Registration-Record`を選ぶ
//! 2. リゾルバーのレスポンスから登録レコードを取り出す（`contentStream`埋め込み or 直接）
//! 3. 登録コンテンツ・発行者・アイデンティティ・フィンガープリント・バーコードをまとめる

use chrono::{DateTime, Utc};
use ovcv_types::{
    CredentialSubject, DidDocumentMetadata, IssuerProfile, LinkedResourceMetadata,
    RegisteredContent, RegistrationRecord, VerifiedIdentity, CONTENT_REGISTRATION_RESOURCE_TYPE,
    IDENTITY_CRYPTO_WALLET, IDENTITY_DOCUMENT_VERIFICATION, IDENTITY_SOCIAL_MEDIA,
};
use serde::Serialize;

use crate::barcode::ColorBarcode;
use crate::fingerprint::{fingerprints, Fingerprint};
use crate::CoreError;

/// 発行者名が無い場合の表示名。
pub const DEFAULT_ISSUER_NAME: &str = "OriginVault";
/// 発行者画像が無い場合のアバター。
pub const DEFAULT_ISSUER_IMAGE: &str = "https://originvault.io/favicon.ico";
/// 発行者説明が無い場合の説明文。
pub const DEFAULT_ISSUER_DESCRIPTION: &str =
    "OriginVault is a platform for creating and managing decentralized identities.";
/// 発行者WebサイトURLが無い場合のリンク。
pub const DEFAULT_ISSUER_WEBSITE: &str = "https://create.originvault.me";

// ---------------------------------------------------------------------------
// レコードの取得
// ---------------------------------------------------------------------------

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 最新の`Content-Registration-Record`を選ぶ。
///
/// `created`が新しいものを優先する。日時が解釈できないリソースは最も古いものとして扱い、
/// 同時刻の場合は一覧の先頭側を選ぶ。
pub fn latest_registration_resource(
    metadata: &DidDocumentMetadata,
) -> Option<&LinkedResourceMetadata> {
    metadata
        .linked_resource_metadata
        .iter()
        .filter(|r| r.resource_type == CONTENT_REGISTRATION_RESOURCE_TYPE)
        // max_by_keyは同値の最後を返すため、逆順にして先頭側を残す
        .rev()
        .max_by_key(|r| r.created.as_deref().and_then(parse_timestamp))
}

/// リゾルバーのレスポンスから登録レコードを取り出す。
///
/// `didResolutionMetadata.contentStream`にJSON文字列（またはオブジェクト）として
/// 埋め込まれていればそれを、無ければレスポンス自体を登録レコードとして解釈する。
pub fn decode_registration_record(
    response: serde_json::Value,
) -> Result<RegistrationRecord, CoreError> {
    let embedded = match response.pointer("/didResolutionMetadata/contentStream") {
        Some(serde_json::Value::String(stream)) => Some(
            serde_json::from_str::<serde_json::Value>(stream)
                .map_err(|e| CoreError::MalformedRecord(format!("contentStream: {e}")))?,
        ),
        Some(stream @ serde_json::Value::Object(_)) => Some(stream.clone()),
        _ => None,
    };
    let value = embedded.unwrap_or(response);
    serde_json::from_value(value).map_err(|e| CoreError::MalformedRecord(e.to_string()))
}

// ---------------------------------------------------------------------------
// ビュー
// ---------------------------------------------------------------------------

/// 発行者（作成者プロフィール）の表示情報。欠落項目はデフォルト値で埋める。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuerView {
    /// 発行者DID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 表示名
    pub name: String,
    /// アバター画像URL
    pub image: String,
    /// 説明文
    pub description: String,
    /// WebサイトURL
    pub website: String,
}

impl IssuerView {
    fn from_profile(id: Option<&str>, profile: Option<&IssuerProfile>) -> Self {
        Self {
            id: id.map(str::to_string),
            name: or_default(profile.and_then(|p| p.name.as_ref()), DEFAULT_ISSUER_NAME),
            image: or_default(profile.and_then(|p| p.image.as_ref()), DEFAULT_ISSUER_IMAGE),
            description: or_default(
                profile.and_then(|p| p.description.as_ref()),
                DEFAULT_ISSUER_DESCRIPTION,
            ),
            website: or_default(profile.and_then(|p| p.website.as_ref()), DEFAULT_ISSUER_WEBSITE),
        }
    }
}

fn or_default(value: Option<&String>, default: &str) -> String {
    value.cloned().unwrap_or_else(|| default.to_string())
}

impl Default for IssuerView {
    fn default() -> Self {
        Self::from_profile(None, None)
    }
}

/// 連携済みSNSアカウント。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    /// プロバイダーID (例: "google")
    pub provider_id: String,
    /// プロバイダー名 (例: "Google")
    pub provider_name: String,
    /// ツールチップ表示 (`"{プロバイダー名}: {ユーザー名 or アドレス}"`)
    pub label: String,
    /// プロバイダーのURL
    pub link: String,
}

/// 連携済み暗号ウォレット。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// 表示名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 表示するURI（無ければアドレス）
    pub display: String,
    /// コピー用アドレス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// 作成者の検証済みアイデンティティの要約。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    /// 本人確認書類による検証済みか
    pub government_id_verified: bool,
    /// 連携済みSNSアカウント
    pub social_accounts: Vec<SocialAccount>,
    /// 連携済みウォレット
    pub wallets: Vec<Wallet>,
}

impl IdentitySummary {
    /// 検証済みアイデンティティの一覧を分類する。
    pub fn from_identities(identities: &[VerifiedIdentity]) -> Self {
        let government_id_verified = identities
            .iter()
            .any(|v| v.identity_type == IDENTITY_DOCUMENT_VERIFICATION);

        let social_accounts = identities
            .iter()
            .filter(|v| v.identity_type == IDENTITY_SOCIAL_MEDIA)
            .map(|v| {
                let provider = v.provider.clone().unwrap_or_default();
                let handle = v
                    .username
                    .as_deref()
                    .or(v.address.as_deref())
                    .unwrap_or_default();
                SocialAccount {
                    label: format!("{}: {handle}", provider.name),
                    link: format!("https://{}.com/", provider.id),
                    provider_id: provider.id,
                    provider_name: provider.name,
                }
            })
            .collect();

        let wallets = identities
            .iter()
            .filter(|v| v.identity_type == IDENTITY_CRYPTO_WALLET)
            .filter_map(|v| {
                let display = v.uri.as_ref().or(v.address.as_ref())?.clone();
                Some(Wallet {
                    name: v.name.clone(),
                    display,
                    address: v.address.clone(),
                })
            })
            .collect();

        Self {
            government_id_verified,
            social_accounts,
            wallets,
        }
    }
}

/// 登録コンテンツの表示用ビュー。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    /// 登録コンテンツ本体
    pub content: RegisteredContentView,
    /// 知覚ハッシュのフィンガープリント（soft, medium, precise）
    pub fingerprints: Vec<Fingerprint>,
    /// カラーバーコード
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<ColorBarcode>,
    /// 発行者
    pub issuer: IssuerView,
    /// 作成者のアイデンティティ
    pub identities: IdentitySummary,
    /// 発行日時（VCの`issuanceDate`、無ければ登録日時）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    /// 有効期限
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

/// 登録コンテンツの識別情報。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredContentView {
    /// リソースID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// ファイル名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// プレビューURL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// ニーモニックID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic_id: Option<String>,
    /// コンテンツハッシュ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// 登録ユーザー名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 登録ステータス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<&RegisteredContent> for RegisteredContentView {
    fn from(content: &RegisteredContent) -> Self {
        Self {
            id: content.id.clone(),
            file_name: content.file_name.clone(),
            public_path: content.public_path.clone(),
            mnemonic_id: content.mnemonic_id.clone(),
            content_hash: content.content_hash.clone(),
            username: content.username.clone(),
            status: content.status.clone(),
        }
    }
}

impl ContentView {
    /// 登録レコードからビューを構築する。
    ///
    /// 登録コンテンツが複数ある場合は先頭のみを使う。色の妥当性はここでは検証しない。
    pub fn from_record(record: &RegistrationRecord) -> Self {
        let vc = record.vc.as_ref();
        let subject = vc
            .and_then(|vc| vc.credential_subject.as_ref())
            .cloned()
            .unwrap_or_else(CredentialSubject::default);
        let content = subject
            .registered_content
            .first()
            .cloned()
            .unwrap_or_default();

        let issuer = vc
            .and_then(|vc| vc.issuer.as_ref())
            .map(|issuer| IssuerView::from_profile(issuer.id(), issuer.profile()))
            .unwrap_or_default();

        let issued_at = vc
            .and_then(|vc| vc.issuance_date.clone())
            .or_else(|| content.created_at.clone());
        let expires_at = vc.and_then(|vc| vc.expiration_date.clone());

        Self {
            fingerprints: content
                .perceptual_hashes
                .as_ref()
                .map(fingerprints)
                .unwrap_or_default(),
            barcode: content
                .color_code
                .as_ref()
                .map(|code| ColorBarcode::new(code.as_str(), content.color.clone())),
            content: RegisteredContentView::from(&content),
            issuer,
            identities: IdentitySummary::from_identities(&subject.verified_identities),
            issued_at,
            expires_at,
        }
    }
}
