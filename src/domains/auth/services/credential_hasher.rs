use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::shared::config::HashingConfig;
use crate::shared::errors::AuthError;

/// 비밀값 해싱 서비스 (비밀번호, Refresh Token 공용)
/// One-way salted hashing for passwords and refresh-token secrets
///
/// 결과는 PHC 문자열 형식입니다:
/// `$argon2id$v=19$m=65536,t=1,p=2$<salt>$<hash>`
/// 파라미터와 salt가 문자열에 포함되므로 검증 시 별도 저장이 필요 없습니다.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(config: HashingConfig) -> Result<Self, argon2::Error> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(config.output_len),
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// 비밀값 해싱 (16바이트 랜덤 salt)
    /// Hash a secret with a fresh 16-byte random salt
    pub fn hash(&self, secret: &[u8]) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(secret, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHashingFailed(e.to_string()))
    }

    /// 비밀값 검증
    /// Verify a secret against an encoded hash
    ///
    /// 해시 문자열에 포함된 파라미터로 다시 계산합니다. 형식이 잘못된 해시는
    /// 에러 대신 `false`를 반환합니다.
    pub fn verify(&self, secret: &[u8], encoded_hash: &str) -> bool {
        let parsed = match PasswordHash::new(encoded_hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return false;
        }

        self.argon2.verify_password(secret, &parsed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> CredentialHasher {
        CredentialHasher::new(HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            output_len: 32,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_round_trip() {
        let hasher = fast_hasher();
        for secret in ["pw123", "", "정말 긴 비밀번호 with spaces and 🦀"] {
            let encoded = hasher.hash(secret.as_bytes()).unwrap();
            assert!(hasher.verify(secret.as_bytes(), &encoded), "secret {:?}", secret);
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let hasher = fast_hasher();
        let encoded = hasher.hash(b"pw123").unwrap();

        assert!(!hasher.verify(b"pw124", &encoded));
        assert!(!hasher.verify(b"PW123", &encoded));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = fast_hasher();
        let first = hasher.hash(b"same").unwrap();
        let second = hasher.hash(b"same").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(b"same", &first));
        assert!(hasher.verify(b"same", &second));
    }

    #[test]
    fn test_encoded_form_embeds_parameters() {
        let encoded = fast_hasher().hash(b"pw").unwrap();
        assert!(encoded.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        // 다른 비용 파라미터로 만든 해시도 검증 가능해야 함
        let encoded = fast_hasher().hash(b"pw").unwrap();
        let other = CredentialHasher::new(HashingConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
            output_len: 32,
        })
        .unwrap();

        assert!(other.verify(b"pw", &encoded));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        let hasher = fast_hasher();
        for garbage in [
            "",
            "not-a-hash",
            "$argon2id$v=19$m=abc$$",
            "$argon2i$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g",
            "$bcrypt$whatever",
        ] {
            assert!(!hasher.verify(b"pw", garbage), "garbage {:?}", garbage);
        }
    }
}
