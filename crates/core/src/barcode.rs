//! # カラーバーコード
//!
//! ファイルを24の断片に分け、それぞれを色で表したもの（`-`区切りの6桁16進数）。
//! 断片の並び順がそのまま左から右への描画順になる。
//!
//! 分割時には検証しない。不正な断片は、色として解釈する段階
//! （[`Swatch::color`]、[`ColorBarcode::validate`]）で
//! [`CoreError::InvalidColorFormat`]として表面化する。

use std::fmt;

use serde::Serialize;

use crate::fingerprint::Color;
use crate::CoreError;

/// カラーコードを構成する断片数。
pub const COLOR_CODE_FRAGMENTS: usize = 24;

/// カラーコードの区切り文字。
pub const COLOR_CODE_SEPARATOR: char = '-';

/// カラーコードの1断片。`#`を前置した未検証の色文字列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Swatch(String);

impl Swatch {
    /// `#`付きの文字列
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 色として解釈する。
    pub fn color(&self) -> Result<Color, CoreError> {
        self.0.parse()
    }

    /// この断片を背景にしたときの文字色。
    pub fn text_color(&self) -> Result<Color, CoreError> {
        Ok(self.color()?.contrasting_text())
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// カラーコードを断片ごとに分割し、`#`を前置する。順序は入力のまま。
///
/// ```
/// use ovcv_core::split_color_code;
///
/// let swatches = split_color_code("aa0000-00bb00-0000cc");
/// let colors: Vec<&str> = swatches.iter().map(|s| s.as_str()).collect();
/// assert_eq!(colors, ["#aa0000", "#00bb00", "#0000cc"]);
/// ```
pub fn split_color_code(code: &str) -> Vec<Swatch> {
    code.split(COLOR_CODE_SEPARATOR)
        .map(|fragment| Swatch(format!("#{fragment}")))
        .collect()
}

/// 表示用のカラーバーコード。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBarcode {
    /// 元のカラーコード（コピー用）
    pub color_code: String,
    /// 枠の背景色（登録レコードの`color`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// 描画順の断片
    pub swatches: Vec<Swatch>,
}

impl ColorBarcode {
    /// カラーコードからバーコードを構築する。
    pub fn new(color_code: impl Into<String>, background: Option<String>) -> Self {
        let color_code = color_code.into();
        let swatches = split_color_code(&color_code);
        Self {
            color_code,
            background,
            swatches,
        }
    }

    /// 断片数がちょうど24であるか。
    pub fn is_complete(&self) -> bool {
        self.swatches.len() == COLOR_CODE_FRAGMENTS
    }

    /// 全断片を色として解釈する。最初の不正な断片でエラーを返す。
    pub fn validate(&self) -> Result<Vec<Color>, CoreError> {
        self.swatches.iter().map(Swatch::color).collect()
    }

    /// 背景色を解釈する。未設定なら`None`。
    pub fn background_color(&self) -> Option<Result<Color, CoreError>> {
        self.background.as_deref().map(|s| s.parse::<Color>())
    }
}
