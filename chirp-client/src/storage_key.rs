/// Collision-resistant attachment key derivation
///
/// Uploaded files are stored under `{prefix}/{token}_{filename}` where
/// the token is drawn from a cryptographically strong source. The token
/// keeps concurrent uploads of the same filename from colliding and
/// keeps stored keys non-enumerable.
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

/// Token length in symbols
pub const TOKEN_LEN: usize = 16;

/// Random 16-symbol token over `[a-zA-Z0-9]`
pub fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Full storage key for an attachment
pub fn attachment_key(prefix: &str, filename: &str) -> String {
    format!(
        "{}/{}_{}",
        prefix.trim_end_matches('/'),
        generate_token(),
        filename
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tokens_are_sixteen_alphanumeric_symbols() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ten_thousand_tokens_have_no_duplicates() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn attachment_key_prefixes_the_filename() {
        let key = attachment_key("images", "sunrise.png");
        assert!(key.starts_with("images/"));
        assert!(key.ends_with("_sunrise.png"));
        // prefix + '/' + token + '_' + filename
        assert_eq!(key.len(), "images/".len() + TOKEN_LEN + "_sunrise.png".len());
    }

    #[test]
    fn trailing_slash_on_prefix_is_normalized() {
        let key = attachment_key("images/", "a.png");
        assert!(!key.contains("//"));
    }
}
