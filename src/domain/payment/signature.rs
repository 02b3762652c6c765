//! Unitpay request signature computation and verification.
//!
//! The provider binds every notification and payment form to a shared secret
//! with a keyed SHA-256 over the parameter values: the values are taken in
//! ascending key order, prefixed by the API method name, suffixed by the
//! secret, and joined with the literal `{up}` delimiter. The identical
//! construction is used on the outbound and inbound sides; any asymmetry
//! here would be a protocol bug.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Delimiter the provider inserts between signed parts.
pub const SIGNATURE_DELIMITER: &str = "{up}";

/// Parameter names that carry the signature itself and are excluded from it.
const SIGNATURE_KEYS: [&str; 2] = ["sign", "signature"];

/// Request parameters in ascending key order.
///
/// `BTreeMap` iteration order is byte-wise ascending on the key, which is
/// exactly the ordering the provider signs over.
pub type ParamMap = BTreeMap<String, String>;

/// Computes the signature for `method` over `params`.
///
/// The `sign`/`signature` keys are removed, remaining values are taken in
/// ascending key order, and the digest is computed over
/// `method {up} v1 {up} … {up} vn {up} secret` as lowercase hex.
pub fn sign(method: &str, params: &ParamMap, secret: &str) -> String {
    let parts = std::iter::once(method)
        .chain(
            params
                .iter()
                .filter(|(key, _)| !SIGNATURE_KEYS.contains(&key.as_str()))
                .map(|(_, value)| value.as_str()),
        )
        .chain(std::iter::once(secret));

    digest_joined(parts)
}

/// Verifies `params["signature"]` against the expected signature.
///
/// Fails closed: a missing signature key yields `false`, never an error.
/// Comparison is constant-time so timing cannot leak the expected digest.
pub fn verify(params: &ParamMap, method: &str, secret: &str) -> bool {
    let provided = match params.get("signature") {
        Some(signature) => signature,
        None => return false,
    };

    let expected = sign(method, params, secret);
    constant_time_eq(provided.as_bytes(), expected.as_bytes())
}

/// SHA-256 lowercase hex over `parts` joined with [`SIGNATURE_DELIMITER`].
///
/// The payment form signs a fixed value sequence without a method prefix, so
/// this primitive is shared with the form builder rather than private to
/// [`sign`].
pub fn digest_joined<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let joined = parts.into_iter().collect::<Vec<_>>().join(SIGNATURE_DELIMITER);
    hex::encode(Sha256::digest(joined.as_bytes()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "s3cr3t";

    fn params(pairs: &[(&str, &str)]) -> ParamMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sign_uses_values_in_ascending_key_order() {
        // Keys deliberately inserted out of order; the digest must match a
        // manual computation over the sorted value sequence.
        let p = params(&[("orderSum", "1500.00"), ("account", "42"), ("orderCurrency", "RUB")]);

        let expected = digest_joined(["pay", "42", "RUB", "1500.00", SECRET]);
        assert_eq!(sign("pay", &p, SECRET), expected);
    }

    #[test]
    fn sign_excludes_signature_keys() {
        let mut with_signature = params(&[("account", "42"), ("orderSum", "10.00")]);
        let without = with_signature.clone();

        with_signature.insert("signature".to_string(), "deadbeef".to_string());
        with_signature.insert("sign".to_string(), "cafebabe".to_string());

        assert_eq!(sign("check", &with_signature, SECRET), sign("check", &without, SECRET));
    }

    #[test]
    fn sign_produces_lowercase_hex_sha256() {
        let digest = sign("check", &params(&[("a", "1")]), SECRET);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn verify_round_trip() {
        let mut p = params(&[("orderSum", "99.90"), ("orderCurrency", "EUR"), ("account", "7")]);
        let signature = sign("pay", &p, SECRET);
        p.insert("signature".to_string(), signature);

        assert!(verify(&p, "pay", SECRET));
    }

    #[test]
    fn verify_rejects_tampered_value() {
        let mut p = params(&[("orderSum", "99.90"), ("account", "7")]);
        let signature = sign("pay", &p, SECRET);
        p.insert("signature".to_string(), signature);
        p.insert("orderSum".to_string(), "999.90".to_string());

        assert!(!verify(&p, "pay", SECRET));
    }

    #[test]
    fn verify_rejects_wrong_method() {
        let mut p = params(&[("account", "7")]);
        let signature = sign("pay", &p, SECRET);
        p.insert("signature".to_string(), signature);

        assert!(!verify(&p, "check", SECRET));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let mut p = params(&[("account", "7")]);
        let signature = sign("pay", &p, SECRET);
        p.insert("signature".to_string(), signature);

        assert!(!verify(&p, "pay", "other"));
    }

    #[test]
    fn verify_fails_closed_without_signature_key() {
        let p = params(&[("account", "7"), ("orderSum", "1.00")]);
        assert!(!verify(&p, "pay", SECRET));
    }

    #[test]
    fn verify_rejects_malformed_signature_value() {
        let mut p = params(&[("account", "7")]);
        p.insert("signature".to_string(), "not-hex-at-all".to_string());
        assert!(!verify(&p, "pay", SECRET));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            entries in proptest::collection::btree_map("[a-zA-Z0-9_]{1,12}", "[ -~]{0,24}", 0..8),
            method in "[a-z]{1,10}",
            secret in "[ -~]{1,32}",
        ) {
            let mut p: ParamMap = entries;
            let signature = sign(&method, &p, &secret);
            p.insert("signature".to_string(), signature);
            prop_assert!(verify(&p, &method, &secret));
        }

        #[test]
        fn prop_secret_sensitivity(
            entries in proptest::collection::btree_map("[a-zA-Z0-9_]{1,12}", "[ -~]{0,24}", 0..8),
            method in "[a-z]{1,10}",
        ) {
            let mut p: ParamMap = entries;
            let signature = sign(&method, &p, "secret-a");
            p.insert("signature".to_string(), signature);
            prop_assert!(!verify(&p, &method, "secret-b"));
        }
    }
}
