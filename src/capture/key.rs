//! Content-addressed keys for capture expressions
//!
//! A [`ContentKey`] names one distinct `(sample, capture length)` pair. The
//! same pair on any number of ingresses always yields the same key, so all
//! of their hostnames land in one shared map file and one rule pair.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace tag mixed into every request-capture key
pub const REQUEST_CAPTURE_TAG: &str = "RC";

/// 64-bit identifier of a capture expression
///
/// Displays as its decimal value, which is also the map file stem and the
/// rule-set key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(u64);

impl ContentKey {
    /// Derive the key for a request capture sample and length
    ///
    /// Case of the sample does not affect the key. The composite is folded
    /// with [`str::to_lowercase`], so ASCII samples hash to the same values
    /// the proxy controller has always written to disk. Outside ASCII the
    /// full Unicode mapping applies: `İ` folds to `i\u{307}` and a
    /// word-final `Σ` to `ς`, where a per-character simple mapping yields
    /// `i` and `σ`. Keys for such samples may not match map files written
    /// by other controller builds.
    ///
    /// ```
    /// use ingress_capture::capture::ContentKey;
    ///
    /// let a = ContentKey::request_capture("hdr(User-Agent)", 128);
    /// let b = ContentKey::request_capture("HDR(user-agent)", 128);
    /// assert_eq!(a, b);
    /// assert_ne!(a, ContentKey::request_capture("hdr(User-Agent)", 64));
    /// ```
    #[must_use]
    pub fn request_capture(sample: &str, capture_len: i64) -> Self {
        let composite = format!("{REQUEST_CAPTURE_TAG}-{sample}-{capture_len}");
        Self(fnv1a_hash(composite.to_lowercase().as_bytes()))
    }

    /// Raw 64-bit value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ContentKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FNV-1a hash function (64-bit)
///
/// Seedless, so keys stay stable across restarts.
fn fnv1a_hash(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_hash() {
        assert_eq!(fnv1a_hash(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_hash(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_hash(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_key_hashes_lowercased_composite() {
        let key = ContentKey::request_capture("X-Forwarded-For", 128);
        assert_eq!(key.value(), fnv1a_hash(b"rc-x-forwarded-for-128"));
    }

    #[test]
    fn test_key_deterministic() {
        let a = ContentKey::request_capture("foo", 128);
        let b = ContentKey::request_capture("foo", 128);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_case_insensitive() {
        assert_eq!(
            ContentKey::request_capture("Cookie(SessionID)", 32),
            ContentKey::request_capture("cookie(sessionid)", 32)
        );
    }

    #[test]
    fn test_key_folds_non_ascii_case() {
        assert_eq!(
            ContentKey::request_capture("hdr(X-Grüße-Ä)", 64),
            ContentKey::request_capture("HDR(x-GRÜßE-ä)", 64)
        );
        let key = ContentKey::request_capture("Ä", 128);
        assert_eq!(key.value(), fnv1a_hash("rc-ä-128".as_bytes()));
    }

    #[test]
    fn test_key_uses_full_unicode_lowercase() {
        let key = ContentKey::request_capture("İ", 128);
        assert_eq!(key.value(), fnv1a_hash("rc-i\u{307}-128".as_bytes()));
        assert_ne!(key.value(), fnv1a_hash(b"rc-i-128"));
    }

    #[test]
    fn test_key_depends_on_length_and_sample() {
        let base = ContentKey::request_capture("foo", 128);
        assert_ne!(base, ContentKey::request_capture("foo", 127));
        assert_ne!(base, ContentKey::request_capture("bar", 128));
    }

    #[test]
    fn test_display_is_decimal() {
        let key = ContentKey::from(42);
        assert_eq!(key.to_string(), "42");
        let key = ContentKey::from(u64::MAX);
        assert_eq!(key.to_string(), "18446744073709551615");
    }
}
