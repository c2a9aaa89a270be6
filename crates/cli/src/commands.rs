//! サブコマンドの実装。
//!
//! 各コマンドはI/Oを行わず[`Report`]を返す。ファイル読み込みと出力は`main`が担う。

use std::fmt::Write as _;

use ovcv_core::barcode::COLOR_CODE_FRAGMENTS;
use ovcv_core::fingerprint::{fingerprints as build_fingerprints, Fingerprint};
use ovcv_core::integrity::{content_color, verify_content_hash};
use ovcv_core::manifest::ManifestSummary;
use ovcv_core::{contrasting_text_color, hash_to_color, ColorBarcode, ContentView};
use ovcv_resolver::{load_content_view, DidResolver};
use ovcv_types::{C2paManifest, PerceptualHashes};
use serde::Serialize;

/// コマンドの結果。JSON表現とテキスト表現を持つ。
#[derive(Debug)]
pub struct Report {
    json: serde_json::Value,
    text: String,
}

impl Report {
    fn new(value: &impl Serialize, text: String) -> anyhow::Result<Self> {
        Ok(Self {
            json: serde_json::to_value(value)?,
            text,
        })
    }

    /// 出力文字列。`json`が真なら整形済みJSON。
    pub fn render(&self, json: bool) -> anyhow::Result<String> {
        if json {
            Ok(serde_json::to_string_pretty(&self.json)?)
        } else {
            Ok(self.text.trim_end().to_string())
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ColorOutput<'a> {
    input: &'a str,
    color: ovcv_core::Color,
    text_color: ovcv_core::Color,
    brightness: ovcv_core::Brightness,
}

/// `color <input>`
pub fn color(input: &str) -> anyhow::Result<Report> {
    let color = hash_to_color(input);
    let output = ColorOutput {
        input,
        color,
        text_color: color.contrasting_text(),
        brightness: color.brightness_class(),
    };
    Report::new(&output, color.to_string())
}

/// `contrast <color>`
pub fn contrast(background: &str) -> anyhow::Result<Report> {
    let text_color = contrasting_text_color(background)?;
    let output = serde_json::json!({
        "background": background,
        "textColor": text_color,
    });
    Report::new(&output, text_color.to_string())
}

/// `barcode <code>`
pub fn barcode(code: &str) -> anyhow::Result<Report> {
    let barcode = ColorBarcode::new(code, None);
    if !barcode.is_complete() {
        tracing::warn!(
            fragments = barcode.swatches.len(),
            expected = COLOR_CODE_FRAGMENTS,
            "カラーコードの断片数が想定と異なります"
        );
    }

    let mut text = String::new();
    for swatch in &barcode.swatches {
        match swatch.text_color() {
            Ok(text_color) => writeln!(text, "{swatch}\ttext {text_color}")?,
            Err(e) => writeln!(text, "{swatch}\t{e}")?,
        }
    }
    Report::new(&barcode, text)
}

/// `fingerprints <soft> <medium> <precise>`
pub fn fingerprints(soft: String, medium: String, precise: String) -> anyhow::Result<Report> {
    let hashes = PerceptualHashes {
        soft,
        medium,
        precise,
    };
    let fingerprints = build_fingerprints(&hashes);
    let mut text = String::new();
    write_fingerprints(&mut text, &fingerprints)?;
    Report::new(&fingerprints, text)
}

fn write_fingerprints(out: &mut String, fingerprints: &[Fingerprint]) -> std::fmt::Result {
    for fp in fingerprints {
        writeln!(
            out,
            "{:<8}{}  text {}  {}",
            fp.precision.label(),
            fp.color,
            fp.text_color,
            fp.hash
        )?;
    }
    Ok(())
}

/// `view <did>`
pub async fn view<R>(resolver: &R, did: &str) -> anyhow::Result<Report>
where
    R: DidResolver + ?Sized,
{
    let Some(view) = load_content_view(resolver, did).await? else {
        return Report::new(
            &serde_json::Value::Null,
            format!("{did} に登録済みコンテンツはありません"),
        );
    };
    let text = render_view(&view)?;
    Report::new(&view, text)
}

fn render_view(view: &ContentView) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let content = &view.content;
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    writeln!(out, "File:         {}", or_na(&content.file_name))?;
    writeln!(out, "Content hash: {}", or_na(&content.content_hash))?;
    writeln!(out, "Mnemonic:     {}", or_na(&content.mnemonic_id))?;
    writeln!(out, "Status:       {}", or_na(&content.status))?;
    writeln!(out, "Issued:       {}", or_na(&view.issued_at))?;
    if let Some(expires_at) = &view.expires_at {
        writeln!(out, "Expires:      {expires_at}")?;
    }
    writeln!(out, "Issuer:       {} <{}>", view.issuer.name, view.issuer.website)?;

    let identities = &view.identities;
    writeln!(
        out,
        "Government ID: {}",
        if identities.government_id_verified {
            "verified"
        } else {
            "not verified"
        }
    )?;
    for account in &identities.social_accounts {
        writeln!(out, "Social:       {} {}", account.provider_name, account.label)?;
    }
    for wallet in &identities.wallets {
        writeln!(out, "Wallet:       {}", wallet.display)?;
    }

    if !view.fingerprints.is_empty() {
        writeln!(out, "\nFingerprints")?;
        write_fingerprints(&mut out, &view.fingerprints)?;
    }
    if let Some(barcode) = &view.barcode {
        let swatches: Vec<&str> = barcode.swatches.iter().map(|s| s.as_str()).collect();
        writeln!(out, "\nColor code ({} swatches)", swatches.len())?;
        writeln!(out, "{}", swatches.join(" "))?;
    }
    Ok(out)
}

/// `manifest <path>`。`raw`はマニフェストJSON。
pub fn manifest(raw: &str) -> anyhow::Result<Report> {
    let manifest: C2paManifest = serde_json::from_str(raw)?;
    let summary = ManifestSummary::from_manifest(&manifest);

    let mut text = String::new();
    writeln!(text, "Issued by: {}", summary.issued_by.as_deref().unwrap_or("N/A"))?;
    writeln!(text, "Issued on: {}", summary.issued_on)?;
    writeln!(text, "Vault UUID: {}", summary.vault_uuid)?;
    writeln!(text, "cheqd DID: {}", summary.cheqd_did)?;
    if let Some(app) = &summary.app_used {
        writeln!(text, "App used: {app}")?;
    }
    if !summary.assertions.ai_tools.is_empty() {
        writeln!(text, "AI tools: {}", summary.assertions.ai_tools.join(", "))?;
    }
    if !summary.assertions.actions.is_empty() {
        writeln!(text, "Actions: {}", summary.assertions.actions.join(", "))?;
    }
    if let Some(cloud) = &summary.assertions.cloud_data {
        writeln!(text, "Cloud data: {} ({}, {})", cloud.url, cloud.content_type, cloud.size)?;
    }
    Report::new(&summary, text)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOutput {
    content_hash: String,
    matches: bool,
    color: ovcv_core::Color,
}

/// `verify-file <path> <expected-hash>`。不一致はエラー。
pub fn verify_file(content: &[u8], expected_hash: &str) -> anyhow::Result<Report> {
    let content_hash = verify_content_hash(content, expected_hash)?;
    let output = VerifyOutput {
        content_hash,
        matches: true,
        color: content_color(content),
    };
    let text = format!("OK {}", output.content_hash);
    Report::new(&output, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovcv_resolver::ResolverError;
    use ovcv_types::DidResolutionResult;

    #[test]
    fn test_color_report() {
        let report = color("test").unwrap();
        assert_eq!(report.render(false).unwrap(), "#9e6865");
        let json: serde_json::Value =
            serde_json::from_str(&report.render(true).unwrap()).unwrap();
        assert_eq!(json["color"], "#9e6865");
        assert_eq!(json["textColor"], "#ffffff");
        assert_eq!(json["brightness"], "dark");
    }

    #[test]
    fn test_contrast_report() {
        assert_eq!(contrast("#ffffff").unwrap().render(false).unwrap(), "#000000");
        assert_eq!(contrast("000000").unwrap().render(false).unwrap(), "#ffffff");
        assert!(contrast("zzz").is_err());
    }

    #[test]
    fn test_barcode_report() {
        let report = barcode("aa0000-ffffff").unwrap();
        assert_eq!(
            report.render(false).unwrap(),
            "#aa0000\ttext #ffffff\n#ffffff\ttext #000000"
        );
        assert_eq!(report.json["swatches"][1], "#ffffff");
    }

    #[test]
    fn test_barcode_report_keeps_invalid_fragment() {
        let report = barcode("aa0000-xyz").unwrap();
        let text = report.render(false).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("#xyz\t"));
    }

    #[test]
    fn test_fingerprints_report() {
        let report = fingerprints(
            "test".to_string(),
            String::new(),
            "c33ce1c3a3c3e781".to_string(),
        )
        .unwrap();
        let json = &report.json;
        assert_eq!(json[0]["precision"], "soft");
        assert_eq!(json[0]["color"], "#9e6865");
        assert_eq!(json[1]["color"], "#001505");
        assert_eq!(json[2]["color"], "#51056c");
        assert_eq!(report.render(false).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_manifest_report() {
        let raw = serde_json::json!({
            "signatureInfo": { "issuer": "OriginVault", "time": "2025-04-06T15:00:00Z" },
            "claimGenerator": "OriginVault_App/1.0 c2pa-rs/0.49",
            "vaultUUID": "vault-1",
            "assertions": { "data": [
                { "label": "c2pa.actions", "data": { "actions": [
                    { "action": "c2pa.created", "softwareAgent": "Image Creator" }
                ] } }
            ] }
        })
        .to_string();
        let report = manifest(&raw).unwrap();
        let text = report.render(false).unwrap();
        assert!(text.contains("Issued by: OriginVault"));
        assert!(text.contains("Issued on: Apr 6, 2025, 3:00 PM UTC"));
        assert!(text.contains("App used: OriginVault App 1.0"));
        assert!(text.contains("cheqd DID: Not available"));
        assert!(text.contains("AI tools: Image Creator"));
        assert!(text.contains("Actions: c2pa.created"));
        assert_eq!(report.json["vaultUUID"], "vault-1");
    }

    #[test]
    fn test_manifest_report_invalid_json() {
        assert!(manifest("not json").is_err());
    }

    #[test]
    fn test_verify_file() {
        let report = verify_file(
            b"hello",
            "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824",
        )
        .unwrap();
        assert_eq!(
            report.render(false).unwrap(),
            "OK 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(report.json["matches"], true);
    }

    #[test]
    fn test_verify_file_mismatch() {
        let err = verify_file(b"hello", "00").unwrap_err();
        assert!(err.downcast_ref::<ovcv_core::CoreError>().is_some());
    }

    /// 固定の応答を返すリゾルバー
    struct FixedResolver {
        resolution: serde_json::Value,
        record: serde_json::Value,
    }

    #[async_trait::async_trait]
    impl DidResolver for FixedResolver {
        async fn resolve(&self, did: &str) -> Result<DidResolutionResult, ResolverError> {
            serde_json::from_value(self.resolution.clone()).map_err(|e| ResolverError::Decode {
                url: did.to_string(),
                message: e.to_string(),
            })
        }

        async fn fetch_resource(
            &self,
            _resource_uri: &str,
        ) -> Result<serde_json::Value, ResolverError> {
            Ok(self.record.clone())
        }
    }

    #[tokio::test]
    async fn test_view_report() {
        let resolver = FixedResolver {
            resolution: serde_json::json!({
                "didDocumentMetadata": { "linkedResourceMetadata": [
                    { "resourceURI": "r1", "resourceType": "Content-Registration-Record" }
                ] }
            }),
            record: serde_json::json!({
                "vc": { "credentialSubject": { "registeredContent": [{
                    "fileName": "photo.png",
                    "colorCode": "aa0000-00bb00",
                    "perceptualHashes": { "soft": "test", "medium": "", "precise": "a" }
                }] } }
            }),
        };
        let report = view(&resolver, "did:cheqd:testnet:1").await.unwrap();
        let text = report.render(false).unwrap();
        assert!(text.contains("File:         photo.png"));
        assert!(text.contains("#aa0000 #00bb00"));
        assert!(text.contains("#02b606"));
        assert_eq!(report.json["content"]["fileName"], "photo.png");
    }

    #[tokio::test]
    async fn test_view_report_without_registration() {
        let resolver = FixedResolver {
            resolution: serde_json::json!({}),
            record: serde_json::Value::Null,
        };
        let report = view(&resolver, "did:cheqd:testnet:1").await.unwrap();
        assert_eq!(report.render(true).unwrap(), "null");
    }
}
