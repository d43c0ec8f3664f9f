//! One-time verification codes.
//!
//! Codes are six decimal digits. Only an HMAC-SHA256 digest keyed by a server
//! secret is stored, so a leaked `users` table does not reveal pending codes.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const OTP_DIGITS: usize = 6;

/// Generates a zero-padded six-digit code.
pub fn generate_otp() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{:0width$}", n, width = OTP_DIGITS)
}

/// Keyed hashing and constant-time comparison of one-time codes.
#[derive(Clone)]
pub struct OtpHasher {
    secret: Vec<u8>,
}

impl OtpHasher {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length")
    }

    /// Returns the 64-character lowercase hex digest of `code`.
    pub fn hash(&self, code: &str) -> String {
        let mut mac = self.mac();
        mac.update(code.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Compares `code` against a stored digest in constant time.
    pub fn verify(&self, code: &str, digest: &str) -> bool {
        let Ok(expected) = hex::decode(digest) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(code.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
