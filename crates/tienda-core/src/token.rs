//! Short random tokens for object keys.

use rand::Rng;

use crate::constants::TOKEN_BYTES;

/// Generate a short random token: 8 lowercase hex characters.
///
/// Uniqueness is probabilistic, not enforced: 32 bits of randomness keeps
/// the collision chance negligible at expected upload volume, and keys
/// additionally embed the filename slug. Callers needing a hard guarantee
/// must check against the store before use.
pub fn short_token() -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..TOKEN_BYTES).map(|_| rng.random()).collect();
    hex::encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = short_token();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token, token.to_lowercase());
    }

    #[test]
    fn test_tokens_vary() {
        let a = short_token();
        let b = short_token();
        // 1-in-4-billion flake odds; acceptable for a smoke test.
        assert_ne!(a, b);
    }
}
