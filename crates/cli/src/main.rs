//! # ovcv
//!
//! コンテンツ来歴ビューアーのコマンドラインツール。
//!
//! ## 環境変数
//! - `OV_RESOLVER_URL`: DIDリゾルバーのベースURL（既定: cheqd Universal Resolver）
//! - `OV_RESOLVER_TIMEOUT_SECS`: リクエストタイムアウト秒数（既定: 30）
//! - `RUST_LOG`: ログレベル（ログは標準エラー出力）

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ovcv_resolver::{HttpResolver, ResolverConfig};

/// OV Content Viewer CLI
#[derive(Parser, Debug)]
#[command(name = "ovcv")]
#[command(version)]
#[command(about = "Inspect OriginVault content registrations and color fingerprints")]
struct Cli {
    /// 結果をJSONで出力する
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 任意の文字列から決定的に色を導出する
    Color {
        /// 入力文字列（知覚ハッシュ等）
        input: String,
    },
    /// 背景色に対して読みやすい文字色（黒/白）を返す
    Contrast {
        /// 背景色（#RRGGBB、`#`省略可）
        color: String,
    },
    /// `-`区切りのカラーコードをスウォッチに分割する
    Barcode {
        /// カラーコード
        code: String,
    },
    /// 3精度の知覚ハッシュからフィンガープリントを表示する
    Fingerprints {
        /// soft ハッシュ
        soft: String,
        /// medium ハッシュ
        medium: String,
        /// precise ハッシュ
        precise: String,
    },
    /// DIDを解決し、最新のコンテンツ登録を表示する
    View {
        /// 対象DID
        did: String,
        /// リゾルバーのベースURL（OV_RESOLVER_URLより優先）
        #[arg(long, value_name = "URL")]
        resolver_url: Option<String>,
        /// タイムアウト秒数（OV_RESOLVER_TIMEOUT_SECSより優先）
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
    },
    /// C2PAマニフェスト（JSON）を要約する
    Manifest {
        /// マニフェストJSONファイル
        path: PathBuf,
    },
    /// ファイルのSHA-256が登録済みハッシュと一致するか検証する
    VerifyFile {
        /// 対象ファイル
        path: PathBuf,
        /// 期待するコンテンツハッシュ（16進数）
        expected_hash: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let report = match cli.command {
        Command::Color { input } => commands::color(&input)?,
        Command::Contrast { color } => commands::contrast(&color)?,
        Command::Barcode { code } => commands::barcode(&code)?,
        Command::Fingerprints {
            soft,
            medium,
            precise,
        } => commands::fingerprints(soft, medium, precise)?,
        Command::View {
            did,
            resolver_url,
            timeout_secs,
        } => {
            let mut config = ResolverConfig::from_env()?;
            if let Some(url) = resolver_url {
                config = ResolverConfig::new(url, config.timeout);
            }
            if let Some(secs) = timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }
            tracing::debug!(base_url = %config.base_url, "リゾルバー設定");
            let resolver = HttpResolver::new(&config)?;
            commands::view(&resolver, &did).await?
        }
        Command::Manifest { path } => {
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                anyhow::anyhow!("マニフェストを読み込めません ({}): {e}", path.display())
            })?;
            commands::manifest(&raw)?
        }
        Command::VerifyFile {
            path,
            expected_hash,
        } => {
            let content = std::fs::read(&path).map_err(|e| {
                anyhow::anyhow!("ファイルを読み込めません ({}): {e}", path.display())
            })?;
            commands::verify_file(&content, &expected_hash)?
        }
    };

    println!("{}", report.render(cli.json)?);
    Ok(())
}
