use commonware_cryptography::{sha256::Sha256, Hasher};

/// Length of a hex-encoded [`digest`] output (SHA-256, 32 bytes).
pub const DIGEST_HEX_LEN: usize = 64;

/// SHA-256 of the UTF-8 bytes of `input`, as lowercase hex.
pub fn digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    commonware_utils::hex(hasher.finalize().as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            digest("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_digest_shape() {
        for input in ["", "a", "{\"balances\":{},\"nonces\":{}}"] {
            let out = digest(input);
            assert_eq!(out.len(), DIGEST_HEX_LEN);
            assert!(out
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
        assert_ne!(digest("a"), digest("b"));
    }
}
