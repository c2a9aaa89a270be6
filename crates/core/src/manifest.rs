//! # C2PAマニフェスト要約
//!
//! Content Credentialとして表示する項目をマニフェストから抽出する。
//!
//! ## 抽出対象
//! - `c2pa.actions`系アサーション: 使用されたAIツール（`softwareAgent`）と操作
//! - `c2pa.cloud-data`アサーション: クラウド上のデータの所在・サイズ
//! - 署名情報、クレーム生成器、保管庫UUID、cheqd DID

use chrono::{DateTime, Utc};
use ovcv_types::{C2paManifest, ManifestAssertion};
use serde::Serialize;

/// クラウドデータのアサーションラベル。
pub const CLOUD_DATA_LABEL: &str = "c2pa.cloud-data";

/// 値が無い項目の表示。
pub const NOT_APPLICABLE: &str = "N/A";

/// 保管庫UUID・DIDが無い場合の表示。
pub const NOT_AVAILABLE: &str = "Not available";

/// 署名日時が無い場合の表示。
pub const UNKNOWN_DATE: &str = "Unknown";

/// `c2pa.cloud-data`アサーションの表示項目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudData {
    /// コンテンツタイプ
    pub content_type: String,
    /// データのハッシュ
    pub hash: String,
    /// データのURL
    pub url: String,
    /// メタデータの説明
    pub metadata: String,
    /// サイズ（例: "1,234 bytes"）
    pub size: String,
}

/// アサーションストアから抽出した表示項目。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionSummary {
    /// 使用されたAIツール（出現順、重複なし）
    pub ai_tools: Vec<String>,
    /// 実施された操作とデジタルソース種別（出現順、重複なし）
    pub actions: Vec<String>,
    /// クラウドデータ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_data: Option<CloudData>,
}

/// マニフェストの表示用要約。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    /// 署名者
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_by: Option<String>,
    /// 署名日時（表示用に整形済み）
    pub issued_on: String,
    /// 保管庫UUID
    #[serde(rename = "vaultUUID")]
    pub vault_uuid: String,
    /// cheqd DID
    #[serde(rename = "cheqdDID")]
    pub cheqd_did: String,
    /// 使用したアプリ・デバイス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_used: Option<String>,
    /// アサーションの要約
    #[serde(flatten)]
    pub assertions: AssertionSummary,
}

impl ManifestSummary {
    /// マニフェストから要約を構築する。
    pub fn from_manifest(manifest: &C2paManifest) -> Self {
        let signature = manifest.signature_info.as_ref();
        Self {
            issued_by: signature.and_then(|s| s.issuer.clone()),
            issued_on: format_signature_time(signature.and_then(|s| s.time.as_deref())),
            vault_uuid: manifest
                .vault_uuid
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            cheqd_did: manifest
                .cheqd_did
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            app_used: manifest.claim_generator.as_deref().map(app_name),
            assertions: summarize_assertions(manifest.assertions.as_ref()),
        }
    }
}

/// クレーム生成器の先頭語を表示名にする（`_`と`/`は空白に置換）。
///
/// 例: `"OriginVault_App/1.0 c2pa-rs/0.49"` → `"OriginVault App 1.0"`
pub fn app_name(claim_generator: &str) -> String {
    claim_generator
        .split(' ')
        .next()
        .unwrap_or_default()
        .replace(['_', '/'], " ")
}

/// 署名日時を`Apr 6, 2025, 3:00 PM UTC`形式に整形する。
/// 未設定なら`Unknown`、解釈できなければ元の文字列を返す。
pub fn format_signature_time(time: Option<&str>) -> String {
    let Some(time) = time.filter(|t| !t.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };
    match DateTime::parse_from_rfc3339(time) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .format("%b %-d, %Y, %-I:%M %p UTC")
            .to_string(),
        Err(_) => time.to_string(),
    }
}

/// アサーションストア（`{"data": [...]}`）から表示項目を抽出する。
/// `data`が配列でない場合は空の要約を返す。
pub fn summarize_assertions(assertions: Option<&serde_json::Value>) -> AssertionSummary {
    let Some(entries) = assertions
        .and_then(|a| a.get("data"))
        .and_then(serde_json::Value::as_array)
    else {
        return AssertionSummary::default();
    };

    let mut summary = AssertionSummary::default();
    for entry in entries {
        let Ok(assertion) = serde_json::from_value::<ManifestAssertion>(entry.clone()) else {
            continue;
        };
        let data = assertion.data.as_ref();

        if let Some(actions) = data
            .and_then(|d| d.get("actions"))
            .and_then(serde_json::Value::as_array)
        {
            for action in actions {
                if let Some(agent) = action.get("softwareAgent").and_then(software_agent_name) {
                    push_unique(&mut summary.ai_tools, agent);
                }
                for key in ["action", "digitalSourceType"] {
                    if let Some(value) = action.get(key).and_then(serde_json::Value::as_str) {
                        push_unique(&mut summary.actions, value.to_string());
                    }
                }
            }
        }

        if assertion.label.as_deref() == Some(CLOUD_DATA_LABEL) {
            summary.cloud_data = Some(cloud_data(data));
        }
    }
    summary
}

/// `softwareAgent`は文字列（C2PA 1.x）または`{name, version}`（2.x）。
fn software_agent_name(agent: &serde_json::Value) -> Option<String> {
    match agent {
        serde_json::Value::String(name) => Some(name.clone()),
        serde_json::Value::Object(map) => map
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn cloud_data(data: Option<&serde_json::Value>) -> CloudData {
    let text = |pointer: &str| {
        data.and_then(|d| d.pointer(pointer))
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(NOT_APPLICABLE)
            .to_string()
    };
    CloudData {
        content_type: text("/content_type"),
        hash: text("/location/hash"),
        url: text("/location/url"),
        metadata: text("/metadata/description"),
        size: format_size(data.and_then(|d| d.get("size"))),
    }
}

/// サイズを`1,234 bytes`形式にする。0・空・未設定は`N/A`。
fn format_size(size: Option<&serde_json::Value>) -> String {
    let rendered = match size {
        Some(serde_json::Value::Number(n)) => match n.as_u64() {
            Some(0) => None,
            Some(bytes) => Some(group_thousands(bytes)),
            None => n.as_f64().filter(|v| *v != 0.0).map(|v| v.to_string()),
        },
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };
    match rendered {
        Some(text) => format!("{text} bytes"),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
