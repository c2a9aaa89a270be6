//! # フィンガープリント色
//!
//! 任意の文字列をdjb2でハッシュし、24ビットRGB色に写像する。
//! 同じハッシュ値から同じ色が再導出できることで、利用者が目視で照合できる。
//!
//! ## ビット配置（互換性のため固定）
//! - `r = (h >> 16) & 0xff`
//! - `g = (h >> 8) & 0xff`
//! - `b = h & 0xff`
//!
//! `h`は32ビット符号付き整数のラップアラウンド演算で累積したdjb2値。

use std::fmt;
use std::str::FromStr;

use ovcv_types::PerceptualHashes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CoreError;

/// djb2の初期値。
const DJB2_SEED: i32 = 5381;

/// 知覚輝度の重み（ITU-R BT.601）。合計1000。
const LUMA_WEIGHT_R: u32 = 299;
const LUMA_WEIGHT_G: u32 = 587;
const LUMA_WEIGHT_B: u32 = 114;

/// 輝度の閾値。これを「超える」場合のみ明るい色とみなす。
const BRIGHTNESS_THRESHOLD: u32 = 128;

/// 色の値を調べる外部サービスのURL。
pub const COLOR_LOOKUP_BASE_URL: &str = "https://www.color-hex.com/color/";

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// 24ビットRGB色。文字列表現は`#rrggbb`（小文字）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

/// 色の明暗。前景色（黒/白）の選択に使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brightness {
    /// 明るい背景（黒文字）
    Light,
    /// 暗い背景（白文字）
    Dark,
}

impl Color {
    /// 黒 (`#000000`)
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// 白 (`#ffffff`)
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    /// RGBチャンネルから色を作成する。
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 赤チャンネル
    pub fn r(&self) -> u8 {
        self.r
    }

    /// 緑チャンネル
    pub fn g(&self) -> u8 {
        self.g
    }

    /// 青チャンネル
    pub fn b(&self) -> u8 {
        self.b
    }

    /// `#`なしの6桁16進数。
    pub fn to_hex(&self) -> String {
        hex::encode([self.r, self.g, self.b])
    }

    /// 重み付き輝度の1000倍（整数）。
    fn weighted_luma(&self) -> u32 {
        u32::from(self.r) * LUMA_WEIGHT_R
            + u32::from(self.g) * LUMA_WEIGHT_G
            + u32::from(self.b) * LUMA_WEIGHT_B
    }

    /// 知覚輝度 `(R*299 + G*587 + B*114) / 1000`。範囲は0.0〜255.0。
    pub fn brightness(&self) -> f64 {
        f64::from(self.weighted_luma()) / 1000.0
    }

    /// 明暗の分類。輝度がちょうど128の場合は`Dark`。
    pub fn brightness_class(&self) -> Brightness {
        // 1000倍した整数で比較し、浮動小数点の丸めを避ける
        if self.weighted_luma() > BRIGHTNESS_THRESHOLD * 1000 {
            Brightness::Light
        } else {
            Brightness::Dark
        }
    }

    /// この色を背景にしたときに読みやすい文字色（黒または白）。
    pub fn contrasting_text(&self) -> Color {
        match self.brightness_class() {
            Brightness::Light => Color::BLACK,
            Brightness::Dark => Color::WHITE,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = CoreError;

    /// `#rrggbb`または`rrggbb`を解釈する。大文字・小文字どちらも可。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return Err(CoreError::InvalidColorFormat(s.to_string()));
        }
        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb)
            .map_err(|_| CoreError::InvalidColorFormat(s.to_string()))?;
        Ok(Color::new(rgb[0], rgb[1], rgb[2]))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// ハッシュ → 色
// ---------------------------------------------------------------------------

/// djb2ハッシュ（`hash * 33 + unit`）を32ビット符号付き整数で計算する。
///
/// 文字はUTF-16コードユニット単位で処理する。BMP内の文字ではコードポイントと一致する。
pub fn djb2(input: &str) -> i32 {
    input.encode_utf16().fold(DJB2_SEED, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// 任意の文字列から決定的に色を導出する。失敗しない。
///
/// ```
/// use ovcv_core::hash_to_color;
///
/// assert_eq!(hash_to_color("test").to_string(), "#9e6865");
/// assert_eq!(hash_to_color("").to_string(), "#001505");
/// ```
pub fn hash_to_color(input: &str) -> Color {
    // 2の補数表現のビット列をそのまま扱う
    let hash = djb2(input) as u32;
    Color::new((hash >> 16) as u8, (hash >> 8) as u8, hash as u8)
}

/// 背景色に対して読みやすい文字色（`#000000`または`#ffffff`）を返す。
///
/// # エラー
/// 背景色が6桁16進数として解釈できない場合は[`CoreError::InvalidColorFormat`]。
pub fn contrasting_text_color(background: &str) -> Result<Color, CoreError> {
    let color: Color = background.parse()?;
    Ok(color.contrasting_text())
}

// ---------------------------------------------------------------------------
// 知覚ハッシュのフィンガープリント
// ---------------------------------------------------------------------------

/// 知覚ハッシュの精度。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 粗い（部分一致の検出向け）
    Soft,
    /// 標準
    Medium,
    /// 精密（完全一致の検出向け）
    Precise,
}

impl Precision {
    /// 表示ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Precision::Soft => "soft",
            Precision::Medium => "medium",
            Precision::Precise => "precise",
        }
    }
}

/// 背景色と前景色の組。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    /// 背景色
    pub background: Color,
    /// 前景色
    pub foreground: Color,
}

/// 1つの知覚ハッシュから導出したカラーフィンガープリント。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// 精度
    pub precision: Precision,
    /// 元の知覚ハッシュ
    pub hash: String,
    /// ハッシュから導出した色
    pub color: Color,
    /// `color`上で読みやすい文字色
    pub text_color: Color,
}

impl Fingerprint {
    /// 知覚ハッシュからフィンガープリントを作成する。
    pub fn new(precision: Precision, hash: impl Into<String>) -> Self {
        let hash = hash.into();
        let color = hash_to_color(&hash);
        Self {
            precision,
            text_color: color.contrasting_text(),
            hash,
            color,
        }
    }

    /// 表示配色。ホバー中は背景と前景が入れ替わる。
    pub fn palette(&self, hovered: bool) -> Palette {
        if hovered {
            Palette {
                background: self.text_color,
                foreground: self.color,
            }
        } else {
            Palette {
                background: self.color,
                foreground: self.text_color,
            }
        }
    }

    /// 色の詳細ページのURL。
    pub fn lookup_url(&self) -> String {
        format!("{COLOR_LOOKUP_BASE_URL}{}", self.color.to_hex())
    }
}

/// soft → medium → precise の順でフィンガープリントを作成する。
pub fn fingerprints(hashes: &PerceptualHashes) -> Vec<Fingerprint> {
    vec![
        Fingerprint::new(Precision::Soft, hashes.soft.as_str()),
        Fingerprint::new(Precision::Medium, hashes.medium.as_str()),
        Fingerprint::new(Precision::Precise, hashes.precise.as_str()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 既知の描画結果と一致することを確認
    #[test]
    fn test_hash_to_color_known_vectors() {
        assert_eq!(hash_to_color("").to_string(), "#001505");
        assert_eq!(hash_to_color("test").to_string(), "#9e6865");
        assert_eq!(hash_to_color("c33ce1c3a3c3e781").to_string(), "#51056c");
        assert_eq!(
            hash_to_color("f80fe1c3cff11c20be21bc07b80fb80f181ddc19e633f80ff813ffffc003c003")
                .to_string(),
            "#f3cf9b"
        );
    }

    #[test]
    fn test_djb2_wraps_32bit() {
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("test") as u32, 0x7c9e_6865);
        // 長い入力でもパニックせず32ビットで折り返す
        let long = "f".repeat(10_000);
        assert_eq!(djb2(&long), djb2(&long));
    }

    /// BMP外の文字はサロゲートペアの2ユニットとして累積される
    #[test]
    fn test_hash_to_color_non_bmp() {
        assert_eq!(hash_to_color("😀").to_string(), "#762822");
    }

    #[test]
    fn test_hash_to_color_format() {
        for input in ["", "a", "hello", "日本語", "😀", "-", "#ffffff"] {
            let s = hash_to_color(input).to_string();
            assert_eq!(s.len(), 7, "{input:?} → {s}");
            assert!(s.starts_with('#'));
            assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_hash_to_color_deterministic() {
        let hash = "ff003ff8000ff07f07e1dec387f7e3078080dff3b9dfc0019f804d";
        assert_eq!(hash_to_color(hash), hash_to_color(hash));
    }

    #[test]
    fn test_contrast_black_and_white() {
        assert_eq!(contrasting_text_color("#000000").unwrap().to_string(), "#ffffff");
        assert_eq!(contrasting_text_color("#ffffff").unwrap().to_string(), "#000000");
    }

    /// 輝度がちょうど128の場合は白文字
    #[test]
    fn test_contrast_threshold_boundary() {
        let gray: Color = "#808080".parse().unwrap();
        assert_eq!(gray.brightness(), 128.0);
        assert_eq!(gray.brightness_class(), Brightness::Dark);
        assert_eq!(contrasting_text_color("#808080").unwrap(), Color::WHITE);
        // 129 → 黒文字
        assert_eq!(contrasting_text_color("#818181").unwrap(), Color::BLACK);
    }

    #[test]
    fn test_contrast_accepts_case_and_missing_hash() {
        assert_eq!(contrasting_text_color("F3CF9B").unwrap(), Color::BLACK);
        assert_eq!(contrasting_text_color("#f3cf9b").unwrap(), Color::BLACK);
        assert_eq!(contrasting_text_color("#51056C").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_contrast_rejects_malformed() {
        for bad in ["", "#", "#fff", "#gggggg", "#1234567", "##123456", "#12 456", "#ａｂｃ"] {
            assert_eq!(
                contrasting_text_color(bad),
                Err(CoreError::InvalidColorFormat(bad.to_string())),
                "{bad:?} は拒否されるべき"
            );
        }
    }

    #[test]
    fn test_color_serde_as_string() {
        let color = Color::new(0xfd, 0x16, 0x28);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#fd1628\"");
        let back: Color = serde_json::from_str("\"#FD1628\"").unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn test_fingerprint_palette_inverts_on_hover() {
        let fp = Fingerprint::new(Precision::Soft, "c33ce1c3a3c3e781");
        assert_eq!(fp.color.to_string(), "#51056c");
        assert_eq!(fp.text_color, Color::WHITE);

        let idle = fp.palette(false);
        assert_eq!(idle.background, fp.color);
        assert_eq!(idle.foreground, Color::WHITE);

        let hovered = fp.palette(true);
        assert_eq!(hovered.background, Color::WHITE);
        assert_eq!(hovered.foreground, fp.color);

        assert_eq!(fp.lookup_url(), "https://www.color-hex.com/color/51056c");
    }

    #[test]
    fn test_fingerprints_order() {
        let hashes = PerceptualHashes {
            soft: "a".to_string(),
            medium: "b".to_string(),
            precise: "c".to_string(),
        };
        let prints = fingerprints(&hashes);
        let labels: Vec<_> = prints.iter().map(|p| p.precision.label()).collect();
        assert_eq!(labels, vec!["soft", "medium", "precise"]);
        assert_eq!(prints[2].hash, "c");
    }
}
