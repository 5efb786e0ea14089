use bcrypt::{BcryptError, DEFAULT_COST, hash, verify};

const COST: u32 = if cfg!(test) { 4 } else { DEFAULT_COST };

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, COST)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password() {
        let hashed = hash_password("doctor123").unwrap();

        assert!(verify_password("doctor123", &hashed));
        assert!(!verify_password("doctor1234", &hashed));
        assert!(!verify_password("doctor123", "doctor123"));
    }
}
