//! Vendor endpoint URLs with caller-supplied path segments.

use crate::error::{PaymentError, PaymentResult};
use url::Url;

/// Append path segments to a vendor base URL.
///
/// Each segment is percent-encoded on its own, so an id holding `/`, `?`
/// or `#` stays inside its segment. Empty, `.` and `..` segments are
/// rejected since they would change which endpoint is addressed.
pub fn vendor_url(base: &str, segments: &[&str]) -> PaymentResult<String> {
    let mut url = Url::parse(base)
        .map_err(|e| PaymentError::Configuration(format!("Invalid base URL {}: {}", base, e)))?;

    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(PaymentError::InvalidRequest(format!(
            "Invalid path segment: {:?}",
            bad
        )));
    }

    url.path_segments_mut()
        .map_err(|_| {
            PaymentError::Configuration(format!("Base URL cannot hold a path: {}", base))
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_segments() {
        assert_eq!(
            vendor_url("https://api.cashfree.com/pg", &["orders", "ORD1"]).unwrap(),
            "https://api.cashfree.com/pg/orders/ORD1"
        );
        assert_eq!(
            vendor_url("http://127.0.0.1:7000/", &["orders"]).unwrap(),
            "http://127.0.0.1:7000/orders"
        );
    }

    #[test]
    fn test_reserved_characters_stay_in_segment() {
        assert_eq!(
            vendor_url("https://api.cashfree.com/pg", &["orders", "ORD1/refunds"]).unwrap(),
            "https://api.cashfree.com/pg/orders/ORD1%2Frefunds"
        );
        assert_eq!(
            vendor_url("https://x.example/order", &["A?b=1#c", "status"]).unwrap(),
            "https://x.example/order/A%3Fb=1%23c/status"
        );
    }

    #[test]
    fn test_rejects_traversal_segments() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                vendor_url("https://api.cashfree.com/pg", &["orders", id]),
                Err(PaymentError::InvalidRequest(_))
            ));
        }
        assert!(matches!(
            vendor_url("not a url", &["orders"]),
            Err(PaymentError::Configuration(_))
        ));
    }
}
