//! Argon2id password hashing with a configurable cost.

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

#[derive(Clone, Default)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    /// `iterations` is the Argon2 t_cost, `memory_kib` the m_cost.
    pub fn new(iterations: u32, memory_kib: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| AppError::Config(format!("argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Verification reads the cost from the stored hash, so hashes made under an
    /// older cost setting keep working.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordService {
        PasswordService::new(1, 1024).unwrap()
    }

    #[test]
    fn hash_and_verify_password() {
        let svc = cheap();
        let hash = svc.hash_password("mypassword").unwrap();
        assert_ne!(hash, "mypassword");
        assert!(svc.verify_password("mypassword", &hash).unwrap());
        assert!(!svc.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let svc = cheap();
        let a = svc.hash_password("secret").unwrap();
        let b = svc.hash_password("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn cost_is_recorded_in_hash() {
        let hash = PasswordService::new(3, 2048).unwrap().hash_password("x").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=2048,t=3,"));
        // a service configured differently still verifies it
        assert!(cheap().verify_password("x", &hash).unwrap());
    }

    #[test]
    fn rejects_invalid_params() {
        assert!(matches!(PasswordService::new(0, 1024), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(cheap().verify_password("anything", "not-a-valid-hash").is_err());
    }
}
