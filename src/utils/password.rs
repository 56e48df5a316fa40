use crate::config::AppConfig;
use crate::errors::SchoolError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use rand::seq::SliceRandom;

const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!@#$%";

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, SchoolError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| SchoolError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SchoolError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 生成满足密码策略的随机密码，去掉了易混淆的 0/O、1/l/I
pub fn generate_password(length: usize) -> String {
    let length = length.max(8);
    let mut rng = rand::rng();
    let pick = |set: &[u8], rng: &mut rand::rngs::ThreadRng| set[rng.random_range(0..set.len())];

    let mut bytes = vec![
        pick(UPPER, &mut rng),
        pick(LOWER, &mut rng),
        pick(DIGITS, &mut rng),
    ];
    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SYMBOLS].concat();
    while bytes.len() < length {
        bytes.push(pick(all.as_slice(), &mut rng));
    }
    bytes.shuffle(&mut rng);
    bytes.into_iter().map(char::from).collect()
}

/// 验证密码，参数从哈希串本身读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Clase2025x").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Clase2025x", &hash));
        assert!(!verify_password("clase2025x", &hash));
    }

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let pwd = generate_password(16);
            assert_eq!(pwd.chars().count(), 16);
            assert!(crate::utils::validate::password_violations(&pwd).is_empty());
            assert!(!pwd.contains(['0', 'O', '1', 'l', 'I']));
        }
        assert_eq!(generate_password(4).len(), 8);
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
