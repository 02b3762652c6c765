//! Wire-format parsing for the provider callback.
//!
//! The provider mixes transports: redirect-style calls carry flat query
//! parameters, background calls wrap the signed fields in a
//! `params[key]=value` envelope, and either may arrive as GET query or POST
//! form. The adapter flattens everything to ordered key/value pairs first,
//! then folds them into a [`CallbackRequest`].

use crate::application::handlers::payment::CallbackRequest;

/// Folds raw key/value pairs into a callback request.
///
/// Later pairs override earlier ones, so callers append form-body pairs
/// after query pairs to get POST-overrides-GET semantics. `order_id` is a
/// fallback spelling of `account` used by the redirect flows.
pub fn parse_callback_pairs<I>(pairs: I) -> CallbackRequest
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut request = CallbackRequest::default();

    for (key, value) in pairs {
        match key.as_str() {
            "action" => request.action = Some(value),
            "method" => request.method = Some(value),
            "account" => request.account = Some(value),
            "order_id" => {
                if request.account.is_none() {
                    request.account = Some(value);
                }
            }
            _ => {
                if let Some(inner) = envelope_key(&key) {
                    request.params.insert(inner.to_string(), value);
                }
                // Anything else is provider noise; ignored.
            }
        }
    }

    request
}

/// `params[signature]` -> `signature`.
fn envelope_key(key: &str) -> Option<&str> {
    key.strip_prefix("params[")?.strip_suffix(']')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_background_envelope() {
        let request = parse_callback_pairs(pairs(&[
            ("method", "pay"),
            ("params[account]", "42"),
            ("params[orderSum]", "1500.00"),
            ("params[orderCurrency]", "RUB"),
            ("params[signature]", "abc123"),
        ]));

        assert_eq!(request.method.as_deref(), Some("pay"));
        assert_eq!(request.action, None);
        assert_eq!(request.params.get("account").map(String::as_str), Some("42"));
        assert_eq!(
            request.params.get("signature").map(String::as_str),
            Some("abc123")
        );
    }

    #[test]
    fn parses_redirect_query() {
        let request = parse_callback_pairs(pairs(&[("action", "success"), ("account", "42")]));

        assert_eq!(request.action.as_deref(), Some("success"));
        assert_eq!(request.account.as_deref(), Some("42"));
        assert!(request.params.is_empty());
    }

    #[test]
    fn order_id_is_a_fallback_for_account() {
        let request = parse_callback_pairs(pairs(&[("action", "fail"), ("order_id", "7")]));
        assert_eq!(request.account.as_deref(), Some("7"));

        let both = parse_callback_pairs(pairs(&[("account", "42"), ("order_id", "7")]));
        assert_eq!(both.account.as_deref(), Some("42"));
    }

    #[test]
    fn later_pairs_override_earlier_ones() {
        let request = parse_callback_pairs(pairs(&[("method", "check"), ("method", "pay")]));
        assert_eq!(request.method.as_deref(), Some("pay"));
    }

    #[test]
    fn malformed_envelope_keys_are_ignored() {
        let request = parse_callback_pairs(pairs(&[
            ("params[open", "x"),
            ("paramsaccount]", "y"),
            ("unrelated", "z"),
        ]));
        assert!(request.params.is_empty());
    }
}
