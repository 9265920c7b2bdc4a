use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::errors::ServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance between the signed timestamp and now, in seconds.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Checks the `Stripe-Signature` header of a webhook delivery.
///
/// The header looks like `t=1700000000,v1=<hex>,v1=<hex>`; the signed payload
/// is `{t}.{raw body}` under HMAC-SHA256 with the endpoint secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: u64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    fn mac(&self, timestamp: &str, payload: &[u8]) -> Result<HmacSha256, ServiceError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| ServiceError::Internal(format!("invalid webhook secret: {e}")))?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac)
    }

    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> Result<(), ServiceError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            ServiceError::WebhookSignature("missing timestamp in signature header".into())
        })?;
        if signatures.is_empty() {
            return Err(ServiceError::WebhookSignature(
                "no v1 signature in signature header".into(),
            ));
        }

        let signed_at: i64 = timestamp
            .parse()
            .map_err(|_| ServiceError::WebhookSignature("malformed timestamp".into()))?;
        let skew = now.checked_sub(signed_at).map(i64::unsigned_abs);
        if skew.is_none_or(|skew| skew > self.tolerance_secs) {
            return Err(ServiceError::WebhookSignature(
                "timestamp outside the tolerance zone".into(),
            ));
        }

        for signature in signatures {
            let Ok(expected) = hex::decode(signature) else {
                continue;
            };
            if self.mac(timestamp, payload)?.verify_slice(&expected).is_ok() {
                return Ok(());
            }
        }

        Err(ServiceError::WebhookSignature(
            "no signature matches the payload".into(),
        ))
    }

    /// Produces a header value the way Stripe signs deliveries.
    #[cfg(test)]
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> Result<String, ServiceError> {
        let digest = self
            .mac(&timestamp.to_string(), payload)?
            .finalize()
            .into_bytes();
        Ok(format!("t={timestamp},v1={}", hex::encode(digest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn accepts_its_own_signature() -> TestResult {
        let verifier = WebhookVerifier::new("whsec_test");
        let payload = br#"{"type":"payment_intent.succeeded"}"#;

        let header = verifier.sign(payload, NOW)?;

        verifier.verify(payload, &header, NOW + 10)?;
        Ok(())
    }

    #[test]
    fn accepts_when_any_v1_signature_matches() -> TestResult {
        let verifier = WebhookVerifier::new("whsec_test");
        let payload = b"{}";
        let good = verifier.sign(payload, NOW)?;
        let good_sig = good.split_once(",v1=").map(|(_, s)| s).unwrap_or_default();

        let header = format!("t={NOW},v1=deadbeef,v1={good_sig}");

        verifier.verify(payload, &header, NOW)?;
        Ok(())
    }

    #[test]
    fn rejects_tampered_payload() -> TestResult {
        let verifier = WebhookVerifier::new("whsec_test");
        let header = verifier.sign(b"{\"amount\":1}", NOW)?;

        let result = verifier.verify(b"{\"amount\":2}", &header, NOW);

        assert!(matches!(result, Err(ServiceError::WebhookSignature(_))));
        Ok(())
    }

    #[test]
    fn rejects_other_secret_and_stale_timestamps() -> TestResult {
        let signer = WebhookVerifier::new("whsec_one");
        let verifier = WebhookVerifier::new("whsec_two");
        let header = signer.sign(b"{}", NOW)?;

        assert!(verifier.verify(b"{}", &header, NOW).is_err());
        assert!(signer.verify(b"{}", &header, NOW + 301).is_err());
        assert!(signer.verify(b"{}", &header, NOW + 300).is_ok());
        Ok(())
    }

    #[test]
    fn rejects_timestamps_at_the_edges_of_i64() {
        let verifier = WebhookVerifier::new("whsec_test");

        for header in [
            format!("t={},v1=00", i64::MIN),
            format!("t={},v1=00", i64::MAX),
        ] {
            for now in [NOW, i64::MIN, i64::MAX, -NOW] {
                assert!(
                    matches!(
                        verifier.verify(b"{}", &header, now),
                        Err(ServiceError::WebhookSignature(_))
                    ),
                    "header {header:?} at {now} should be rejected"
                );
            }
        }
    }

    #[test]
    fn rejects_malformed_headers() {
        let verifier = WebhookVerifier::new("whsec_test");
        let unsigned = format!("t={NOW}");

        for header in ["", "v1=abc", "t=abc,v1=00", unsigned.as_str()] {
            assert!(
                matches!(
                    verifier.verify(b"{}", header, NOW),
                    Err(ServiceError::WebhookSignature(_))
                ),
                "header {header:?} should be rejected"
            );
        }
    }
}
