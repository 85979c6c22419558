//! Unit tests for [`openai_client::mask_token`].
//!
//! API keys and channel tokens are only ever logged through this function.

use openai_client::mask_token;

/// **Test: Tokens of length <= 11 are fully masked.**
#[test]
fn mask_token_short_is_fully_masked() {
    assert_eq!(mask_token(""), "***");
    assert_eq!(mask_token("sk-12345"), "***");
    assert_eq!(mask_token("abcdefghijk"), "***");
}

/// **Test: Longer tokens keep the first 7 and last 4 characters.**
#[test]
fn mask_token_long_shows_head_and_tail() {
    assert_eq!(mask_token("abcdefghijkl"), "abcdefg***ijkl");
    let key = "sk-proj-1234567890abcdefghijklmnopqrstuvwxyz";
    let masked = mask_token(key);
    assert_eq!(masked, "sk-proj***wxyz");
    assert!(!masked.contains("1234567890"));
}

/// **Test: Non-ASCII input is fully masked instead of being sliced mid-character.**
#[test]
fn mask_token_non_ascii_is_fully_masked() {
    assert_eq!(mask_token("トークントークントークン"), "***");
}
