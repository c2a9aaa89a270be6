//! # コンテンツハッシュ照合
//!
//! 登録レコードの`contentHash`はファイル全体のSHA-256（小文字16進数）。

use sha2::{Digest, Sha256};

use crate::fingerprint::{hash_to_color, Color};
use crate::CoreError;

/// コンテンツのSHA-256を小文字16進数で返す。
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// コンテンツが登録済みハッシュと一致するか検証し、算出したハッシュを返す。
/// 大文字・小文字、`0x`接頭辞の有無は区別しない。
pub fn verify_content_hash(content: &[u8], expected: &str) -> Result<String, CoreError> {
    let actual = content_hash(content);
    let normalized = expected.trim();
    let normalized = normalized
        .strip_prefix("0x")
        .unwrap_or(normalized)
        .to_ascii_lowercase();
    if normalized != actual {
        return Err(CoreError::ContentHashMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(actual)
}

/// コンテンツハッシュから導出した色（ビジュアルフィンガープリント）。
pub fn content_color(content: &[u8]) -> Color {
    hash_to_color(&content_hash(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_content_hash() {
        assert_eq!(content_hash(b"hello"), HELLO_SHA256);
    }

    #[test]
    fn test_verify_content_hash_match() {
        assert_eq!(verify_content_hash(b"hello", HELLO_SHA256).unwrap(), HELLO_SHA256);
        let upper = format!("0x{}", HELLO_SHA256.to_ascii_uppercase());
        assert!(verify_content_hash(b"hello", &upper).is_ok());
    }

    #[test]
    fn test_verify_content_hash_mismatch() {
        let err = verify_content_hash(b"hello!", HELLO_SHA256).unwrap_err();
        match err {
            CoreError::ContentHashMismatch { expected, actual } => {
                assert_eq!(expected, HELLO_SHA256);
                assert_ne!(actual, HELLO_SHA256);
            }
            other => panic!("ContentHashMismatchが期待される: {other:?}"),
        }
    }

    #[test]
    fn test_content_color_matches_hash_color() {
        assert_eq!(content_color(b"hello"), hash_to_color(HELLO_SHA256));
    }
}
