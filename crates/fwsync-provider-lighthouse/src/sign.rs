//! TC3-HMAC-SHA256 request signing
//!
//! Implements the provider's signature v3 scheme: a canonical request is
//! hashed into a string-to-sign, which is signed with a key derived from
//! the secret key through the date/service/tc3_request HMAC chain. The
//! resulting signature is packed into an `Authorization` header value.
//!
//! All requests here are JSON POSTs to `/` with `content-type;host` as the
//! signed header set, which keeps the canonical request static apart from
//! the payload hash.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "TC3-HMAC-SHA256";

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

fn hmac_sha256(key: &[u8], input: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(input.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Build the complete `Authorization` header value for one request
#[allow(clippy::too_many_arguments)]
pub fn authorization_header(
    host: &str,
    content_type: &str,
    payload: &str,
    timestamp: i64,
    date: &str,
    secret_id: &str,
    secret_key: &str,
    service: &str,
) -> String {
    let canonical_request = canonical_request(host, content_type, payload);
    let string_to_sign = string_to_sign(&canonical_request, timestamp, date, service);
    let signature = signature(secret_key, &string_to_sign, date, service);
    let credential_scope = format!("{date}/{service}/tc3_request");
    format!(
        "{ALGORITHM} Credential={secret_id}/{credential_scope}, \
         SignedHeaders=content-type;host, Signature={signature}"
    )
}

/// Step 1: the canonical request string
///
/// POST to `/` with an empty query string; only `content-type` and `host`
/// are signed.
fn canonical_request(host: &str, content_type: &str, payload: &str) -> String {
    let canonical_headers = format!("content-type:{content_type}\nhost:{host}\n");
    let hashed_payload = sha256_hex(payload);
    format!("POST\n/\n\n{canonical_headers}\ncontent-type;host\n{hashed_payload}")
}

/// Step 2: the string to sign
fn string_to_sign(canonical_request: &str, timestamp: i64, date: &str, service: &str) -> String {
    let credential_scope = format!("{date}/{service}/tc3_request");
    let hashed_canonical_request = sha256_hex(canonical_request);
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{hashed_canonical_request}")
}

/// Step 3: the signature, via the TC3 key-derivation chain
fn signature(secret_key: &str, string_to_sign: &str, date: &str, service: &str) -> String {
    let secret_date = hmac_sha256(format!("TC3{secret_key}").as_bytes(), date);
    let secret_service = hmac_sha256(&secret_date, service);
    let secret_signing = hmac_sha256(&secret_service, "tc3_request");
    hex::encode(hmac_sha256(&secret_signing, string_to_sign))
}
