//! Password hashing and verification using Argon2id.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::AuthError;

/// Hash a plaintext password into an Argon2id PHC-format digest with
/// a fresh random salt (default parameters: 19 MiB memory, 2
/// iterations, 1 lane).
///
/// If `pepper` is provided it is prepended to the password before
/// hashing. Empty passwords are refused with `EmptyPassword`.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::EmptyPassword);
    }

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(input, &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| AuthError::Crypto(format!("hash error: {e}")))
}

/// Verify a plaintext password against an Argon2id PHC-format digest.
///
/// If `pepper` is provided it is prepended to the password before
/// verification — this must match the pepper used during hashing.
///
/// Returns `false` on mismatch and on a malformed digest alike; this
/// function never fails.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> bool {
    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let Ok(parsed_hash) = argon2::PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(input, &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let hash = hash_password("hunter2", None).unwrap();
        assert!(verify_password("hunter2", &hash, None));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("hunter2", None).unwrap();
        assert!(!verify_password("wrong", &hash, None));
    }

    #[test]
    fn pepper_is_applied() {
        let hash = hash_password("hunter2", Some("pepper!")).unwrap();
        assert!(verify_password("hunter2", &hash, Some("pepper!")));
        // Without pepper should fail.
        assert!(!verify_password("hunter2", &hash, None));
    }

    #[test]
    fn malformed_digest_is_a_mismatch() {
        assert!(!verify_password("pw", "not-a-hash", None));
        assert!(!verify_password("pw", "", None));
    }

    #[test]
    fn empty_password_is_refused() {
        let result = hash_password("", None);
        assert!(matches!(result, Err(AuthError::EmptyPassword)));
    }

    #[test]
    fn digest_embeds_argon2id_params() {
        let hash = hash_password("hunter2", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let h1 = hash_password("hunter2", None).unwrap();
        let h2 = hash_password("hunter2", None).unwrap();
        assert_ne!(h1, h2);
    }
}
