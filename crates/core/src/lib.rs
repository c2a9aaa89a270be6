//! # OV Content Viewer Core
//!
//! コンテンツ来歴ビューアーの表示データを構築する純粋関数群。
//!
//! ## 構成
//! - [`fingerprint`]: 任意の文字列（知覚ハッシュ等）から決定的に色を導出する（djb2）
//! - [`barcode`]: 24フラグメントのカラーコードをスウォッチ列に分割する
//! - [`registration`]: コンテンツ登録クレデンシャルから表示用ビューを構築する
//! - [`manifest`]: C2PAマニフェストの要約
//! - [`integrity`]: コンテンツハッシュ（SHA-256）の照合
//!
//! I/Oは一切行わない。全関数はスレッドセーフで、同じ入力に対して常に同じ結果を返す。

pub mod barcode;
pub mod fingerprint;
pub mod integrity;
pub mod manifest;
pub mod registration;

pub use barcode::{split_color_code, ColorBarcode, Swatch};
pub use fingerprint::{contrasting_text_color, hash_to_color, Brightness, Color};
pub use registration::ContentView;

/// Coreモジュールのエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// 6桁16進数（`#`省略可）として解釈できない色文字列
    #[error("カラー形式が不正です: {0:?}")]
    InvalidColorFormat(String),
    /// 登録レコードのJSON構造が不正
    #[error("登録レコードの形式が不正です: {0}")]
    MalformedRecord(String),
    /// コンテンツハッシュの不一致
    #[error("コンテンツハッシュが一致しません: 期待値 {expected}, 実際 {actual}")]
    ContentHashMismatch {
        /// 登録済みのハッシュ
        expected: String,
        /// コンテンツから算出したハッシュ
        actual: String,
    },
}
