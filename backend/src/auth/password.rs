/// bcrypt work factor for stored password hashes.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, HASH_COST)
}

/// Checks `password` against a stored hash. Anything that is not a valid
/// bcrypt hash (such as the placeholder of implicit donors) never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PLACEHOLDER_PASSWORD_HASH;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn placeholder_hash_never_authenticates() {
        assert!(!verify_password("", PLACEHOLDER_PASSWORD_HASH));
        assert!(!verify_password("placeholder_hash", PLACEHOLDER_PASSWORD_HASH));
    }
}
