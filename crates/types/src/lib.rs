//! # OV Content Viewer 共有型定義
//!
//! DIDリゾルバーのレスポンス、コンテンツ登録クレデンシャル、
//! C2PAマニフェストのJSON構造をRust構造体として提供する。
//!
//! ## 命名規則
//! - ワイヤ上のフィールド名はcamelCase（リゾルバー・クレデンシャルのJSONに合わせる）
//! - ワイヤ上ではほぼ全フィールドが省略可能。欠落はデフォルト値として扱う

use serde::{Deserialize, Serialize};

/// コンテンツ登録レコードのリンクリソース種別。
pub const CONTENT_REGISTRATION_RESOURCE_TYPE: &str = "Content-Registration-Record";

/// 本人確認書類による検証を示すアイデンティティ種別。
pub const IDENTITY_DOCUMENT_VERIFICATION: &str = "cawg.document_verification";

/// SNSアカウント連携を示すアイデンティティ種別。
pub const IDENTITY_SOCIAL_MEDIA: &str = "cawg.social_media";

/// 暗号ウォレット連携を示すアイデンティティ種別。
pub const IDENTITY_CRYPTO_WALLET: &str = "cawg.crypto_wallet";

// ---------------------------------------------------------------------------
// DID解決結果
// ---------------------------------------------------------------------------

/// DIDリゾルバーが返す解決結果。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidResolutionResult {
    /// DIDドキュメント本体（このクレートでは解釈しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_document: Option<serde_json::Value>,
    /// DIDドキュメントのメタデータ（リンクリソース一覧を含む）
    #[serde(default)]
    pub did_document_metadata: DidDocumentMetadata,
    /// 解決処理のメタデータ
    #[serde(default)]
    pub did_resolution_metadata: DidResolutionMetadata,
}

/// DIDドキュメントのメタデータ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocumentMetadata {
    /// 作成日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// DIDにリンクされたリソースの一覧
    #[serde(default)]
    pub linked_resource_metadata: Vec<LinkedResourceMetadata>,
}

/// DIDにリンクされたリソースのメタデータ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedResourceMetadata {
    /// リソースURI（リゾルバーに渡して本体を取得する）
    #[serde(rename = "resourceURI", default)]
    pub resource_uri: String,
    /// リソースコレクションID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_collection_id: Option<String>,
    /// リソースID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// リソース名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// リソース種別 (例: "Content-Registration-Record")
    #[serde(default)]
    pub resource_type: String,
    /// MIMEタイプ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// リソースバージョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    /// 作成日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// 解決処理のメタデータ。
/// リソース取得時は`content_stream`にリソース本体が入る場合がある。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidResolutionMetadata {
    /// レスポンスのコンテンツタイプ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// リソース本体（JSON文字列、またはJSONオブジェクト）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_stream: Option<serde_json::Value>,
    /// 解決エラー
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// コンテンツ登録クレデンシャル
// ---------------------------------------------------------------------------

/// コンテンツ登録レコード（JWT形式のVCをJSON展開したもの）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// 発行者DID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// サブジェクト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// 有効開始時刻（UNIX秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// 有効期限（UNIX秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// 発行時刻（UNIX秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// JWT ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// クレデンシャル本体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc: Option<ContentRegistrationCredential>,
    /// 証明（このクレートでは検証しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<serde_json::Value>,
}

/// コンテンツ登録Verifiable Credential。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRegistrationCredential {
    /// JSON-LDコンテキスト（文字列・オブジェクトの混在があるため未解釈のまま保持）
    #[serde(rename = "@context", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub context: serde_json::Value,
    /// クレデンシャル種別
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    /// 発行者（DID文字列またはプロフィールオブジェクト）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<CredentialIssuer>,
    /// 発行日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,
    /// 有効期限（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    /// 有効開始日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// クレデンシャルサブジェクト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_subject: Option<CredentialSubject>,
}

/// VCの`issuer`フィールド。DID文字列のみの場合とプロフィール付きの場合がある。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialIssuer {
    /// DID文字列のみ
    Id(String),
    /// 表示用プロフィール付き
    Profile(IssuerProfile),
}

impl CredentialIssuer {
    /// プロフィールを返す。DID文字列のみの場合は`None`。
    pub fn profile(&self) -> Option<&IssuerProfile> {
        match self {
            CredentialIssuer::Id(_) => None,
            CredentialIssuer::Profile(profile) => Some(profile),
        }
    }

    /// 発行者のDIDを返す。
    pub fn id(&self) -> Option<&str> {
        match self {
            CredentialIssuer::Id(id) => Some(id),
            CredentialIssuer::Profile(profile) => profile.id.as_deref(),
        }
    }
}

/// 発行者プロフィール。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuerProfile {
    /// 発行者DID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 表示名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// アバター画像URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// 説明文
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// WebサイトURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// クレデンシャルサブジェクト。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    /// サブジェクトID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 作成者に紐づく検証済みアイデンティティ
    #[serde(default)]
    pub verified_identities: Vec<VerifiedIdentity>,
    /// 登録済みコンテンツ
    #[serde(default)]
    pub registered_content: Vec<RegisteredContent>,
}

/// 検証済みアイデンティティ（CAWGアイデンティティアサーション形式）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    /// 種別 (例: "cawg.social_media")
    #[serde(rename = "type", default)]
    pub identity_type: String,
    /// 表示名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// アドレス（メールアドレス、ウォレットアドレス等）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// URI（DID等）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// 検証日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    /// 検証プロバイダー
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<IdentityProvider>,
    /// ユーザー名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 検証方法 (例: "OAuth", "Biometric")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// アイデンティティ検証プロバイダー。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityProvider {
    /// プロバイダーID (例: "google")
    #[serde(default)]
    pub id: String,
    /// 表示名 (例: "Google")
    #[serde(default)]
    pub name: String,
    /// プロバイダー種別 (例: "OAuthProvider")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
}

/// 登録済みコンテンツ。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredContent {
    /// リソースID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// コンテンツハッシュ（SHA-256、16進数）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    /// ファイル名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// 登録ユーザー名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 公開URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// バーコード背景色（`#rrggbb`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// カラーコード（`-`区切りの6桁16進数フラグメント24個）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    /// 登録日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// 登録ステータス (例: "pending")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// ニーモニックID (例: "wage-spoon-flower-birth-barely")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic_id: Option<String>,
    /// 知覚ハッシュ（3段階の精度）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perceptual_hashes: Option<PerceptualHashes>,
}

/// 3段階の精度で算出された知覚ハッシュ（16進数文字列）。
/// soft が最も粗く、precise が最も精密。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptualHashes {
    /// 粗い知覚ハッシュ
    #[serde(default)]
    pub soft: String,
    /// 標準の知覚ハッシュ
    #[serde(default)]
    pub medium: String,
    /// 精密な知覚ハッシュ
    #[serde(default)]
    pub precise: String,
}

// ---------------------------------------------------------------------------
// C2PAマニフェスト
// ---------------------------------------------------------------------------

/// 表示用に取り込むC2PAマニフェスト。
/// camelCase・snake_caseどちらのフィールド名も受け付ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct C2paManifest {
    /// 署名情報
    #[serde(default, alias = "signature_info", skip_serializing_if = "Option::is_none")]
    pub signature_info: Option<SignatureInfo>,
    /// クレーム生成器 (例: "OriginVault_App/1.0 c2pa-rs/0.49")
    #[serde(default, alias = "claim_generator", skip_serializing_if = "Option::is_none")]
    pub claim_generator: Option<String>,
    /// 保管庫UUID
    #[serde(rename = "vaultUUID", default, skip_serializing_if = "Option::is_none")]
    pub vault_uuid: Option<String>,
    /// cheqd上のDID
    #[serde(rename = "cheqdDID", default, skip_serializing_if = "Option::is_none")]
    pub cheqd_did: Option<String>,
    /// アサーションストア（`{"data": [...]}`）。形式が不定のためJSONのまま保持する
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertions: Option<serde_json::Value>,
}

/// マニフェストの署名情報。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// 署名者
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// 署名日時（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// アサーションストアの個別アサーション。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestAssertion {
    /// アサーションラベル (例: "c2pa.actions", "c2pa.cloud-data")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// アサーション本体
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_record_deserialize() {
        let json = serde_json::json!({
            "iss": "did:cheqd:mainnet:123456789abcdef",
            "iat": 1712412000,
            "vc": {
                "@context": ["https://www.w3.org/2018/credentials/v1", { "cawg": "https://cawg.io/identity/" }],
                "type": ["VerifiableCredential", "ContentRegistration"],
                "issuer": { "id": "did:cheqd:mainnet:123456789abcdef", "name": "@originvault/ov-vault-agent" },
                "issuanceDate": "2025-04-06T15:00:00.000Z",
                "credentialSubject": {
                    "verifiedIdentities": [{
                        "type": "cawg.social_media",
                        "address": "demo@originvault.me",
                        "provider": { "id": "google", "name": "Google", "type": "OAuthProvider" },
                        "username": "demo"
                    }],
                    "registeredContent": [{
                        "contentHash": "da515579",
                        "colorCode": "fd1628-384919",
                        "perceptualHashes": { "soft": "c33ce1c3a3c3e781", "medium": "f80f", "precise": "ff00" }
                    }]
                }
            }
        });

        let record: RegistrationRecord = serde_json::from_value(json).unwrap();
        let vc = record.vc.unwrap();
        assert_eq!(vc.types, vec!["VerifiableCredential", "ContentRegistration"]);
        assert_eq!(vc.context.as_array().map(Vec::len), Some(2));
        let issuer = vc.issuer.unwrap();
        assert_eq!(issuer.id(), Some("did:cheqd:mainnet:123456789abcdef"));
        assert_eq!(
            issuer.profile().unwrap().name.as_deref(),
            Some("@originvault/ov-vault-agent")
        );

        let subject = vc.credential_subject.unwrap();
        assert_eq!(subject.verified_identities[0].identity_type, IDENTITY_SOCIAL_MEDIA);
        assert_eq!(subject.verified_identities[0].provider.as_ref().unwrap().id, "google");
        let content = &subject.registered_content[0];
        assert_eq!(content.color_code.as_deref(), Some("fd1628-384919"));
        assert_eq!(content.perceptual_hashes.as_ref().unwrap().soft, "c33ce1c3a3c3e781");
    }

    #[test]
    fn test_issuer_as_plain_did() {
        let json = serde_json::json!({ "issuer": "did:key:z6Mk" });
        let vc: ContentRegistrationCredential = serde_json::from_value(json).unwrap();
        let issuer = vc.issuer.unwrap();
        assert_eq!(issuer.id(), Some("did:key:z6Mk"));
        assert!(issuer.profile().is_none());
    }

    #[test]
    fn test_resolution_result_linked_resources() {
        let json = serde_json::json!({
            "didDocumentMetadata": {
                "linkedResourceMetadata": [{
                    "resourceURI": "did:cheqd:mainnet:abc/resources/0a7f",
                    "resourceType": CONTENT_REGISTRATION_RESOURCE_TYPE,
                    "created": "2025-04-06T15:00:00Z"
                }]
            }
        });
        let result: DidResolutionResult = serde_json::from_value(json).unwrap();
        let resources = &result.did_document_metadata.linked_resource_metadata;
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].resource_uri, "did:cheqd:mainnet:abc/resources/0a7f");
        assert!(result.did_resolution_metadata.content_stream.is_none());
    }

    #[test]
    fn test_manifest_accepts_snake_case() {
        let json = serde_json::json!({
            "signature_info": { "issuer": "OriginVault", "time": "2025-04-06T15:00:00Z" },
            "claim_generator": "OriginVault_App/1.0",
            "vaultUUID": "0a7f3452"
        });
        let manifest: C2paManifest = serde_json::from_value(json).unwrap();
        assert_eq!(
            manifest.signature_info.unwrap().issuer.as_deref(),
            Some("OriginVault")
        );
        assert_eq!(manifest.claim_generator.as_deref(), Some("OriginVault_App/1.0"));
        assert_eq!(manifest.vault_uuid.as_deref(), Some("0a7f3452"));
    }
}
