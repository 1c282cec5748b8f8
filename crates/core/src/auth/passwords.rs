use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use super::{decode_hex, encode_hex};

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "v1";
const SALT_LEN: usize = 16;

/// Produce a stored credential in the form `v1$<salt-hex>$<digest-hex>`
/// where the digest is HMAC-SHA256 keyed by a fresh random salt.
pub fn hash_password(plain: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = keyed_digest(&salt, plain.as_bytes());
    format!("{SCHEME}${}${}", encode_hex(&salt), encode_hex(&digest))
}

/// Verify a plaintext password against a stored credential. Malformed or
/// unknown-scheme values verify false rather than erroring; the HMAC
/// comparison is constant-time.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt_hex), Some(digest_hex)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let (Some(salt), Some(digest)) = (decode_hex(salt_hex), decode_hex(digest_hex)) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(&salt) else {
        return false;
    };
    mac.update(plain.as_bytes());
    mac.verify_slice(&digest).is_ok()
}

fn keyed_digest(salt: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(salt).expect("hmac accepts any key length");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}
