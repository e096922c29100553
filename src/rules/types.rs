//! Proxy rule types and pending rule sets
//!
//! - [`HttpRequestRule`]: an `http-request` rule in a frontend
//! - [`TcpRequestRule`]: a `tcp-request` rule in a frontend
//! - [`RuleSets`]: rules produced by one reconciliation pass, keyed by the
//!   decimal content key, plus the per-layer modified flags

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotations::Status;
use crate::capture::ContentKey;

/// Condition keyword shared by every generated rule
pub const COND_IF: &str = "if";

/// `http-request` rule action type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpRequestRuleType {
    /// `http-request capture <sample> len <length>`
    Capture,
}

impl fmt::Display for HttpRequestRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture => write!(f, "capture"),
        }
    }
}

/// `tcp-request` rule type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TcpRequestRuleType {
    /// `tcp-request content <action>`
    Content,
}

impl fmt::Display for TcpRequestRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
        }
    }
}

/// HTTP-layer rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestRule {
    /// Position within the frontend rule list
    pub id: i64,

    /// Rule action type
    #[serde(rename = "type")]
    pub rule_type: HttpRequestRuleType,

    /// Sample expression to capture
    pub capture_sample: String,

    /// Maximum captured length
    pub capture_len: i64,

    /// Condition keyword
    pub cond: String,

    /// Condition expression
    pub cond_test: String,
}

impl HttpRequestRule {
    /// Capture `sample` for requests whose Host header is listed in `map_file`
    pub fn capture(sample: impl Into<String>, capture_len: i64, map_file: &Path) -> Self {
        Self {
            id: 0,
            rule_type: HttpRequestRuleType::Capture,
            capture_sample: sample.into(),
            capture_len,
            cond: COND_IF.to_string(),
            cond_test: format!("{{ req.hdr(Host) -f {} }}", map_file.display()),
        }
    }
}

impl fmt::Display for HttpRequestRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "http-request {} {} len {} {} {}",
            self.rule_type, self.capture_sample, self.capture_len, self.cond, self.cond_test
        )
    }
}

/// Connection-layer rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpRequestRule {
    /// Position within the frontend rule list
    pub id: i64,

    /// Rule type
    #[serde(rename = "type")]
    pub rule_type: TcpRequestRuleType,

    /// Action text
    pub action: String,

    /// Condition keyword
    pub cond: String,

    /// Condition expression
    pub cond_test: String,
}

impl TcpRequestRule {
    /// Capture `sample` for connections whose SNI is listed in `map_file`
    pub fn capture(sample: &str, capture_len: i64, map_file: &Path) -> Self {
        Self {
            id: 0,
            rule_type: TcpRequestRuleType::Content,
            action: format!("capture {sample} len {capture_len}"),
            cond: COND_IF.to_string(),
            cond_test: format!("{{ req_ssl_sni -f {} }}", map_file.display()),
        }
    }
}

impl fmt::Display for TcpRequestRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tcp-request {} {} {} {}",
            self.rule_type, self.action, self.cond, self.cond_test
        )
    }
}

/// Pending rules and modified flags for one reconciliation pass
///
/// The flags are only ever raised here; the render pipeline lowers them
/// with [`RuleSets::clear_status`] after rebuilding a layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSets {
    /// HTTP-layer rules keyed by decimal content key
    pub http_requests: BTreeMap<String, Vec<HttpRequestRule>>,

    /// Connection-layer rules keyed by decimal content key
    pub tcp_requests: BTreeMap<String, Vec<TcpRequestRule>>,

    /// Whether the HTTP-layer section must be rebuilt
    pub http_requests_status: Status,

    /// Whether the connection-layer section must be rebuilt
    pub tcp_requests_status: Status,
}

impl RuleSets {
    /// Create empty rule sets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise both layer flags
    pub fn mark_modified(&mut self) {
        self.http_requests_status = Status::Modified;
        self.tcp_requests_status = Status::Modified;
    }

    /// Lower both layer flags
    pub fn clear_status(&mut self) {
        self.http_requests_status = Status::Empty;
        self.tcp_requests_status = Status::Empty;
    }

    /// Check if either layer needs a rebuild
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        !self.http_requests_status.is_empty() || !self.tcp_requests_status.is_empty()
    }

    /// Store the rule pair for `key`, replacing any earlier pair
    pub fn insert(&mut self, key: ContentKey, http: HttpRequestRule, tcp: TcpRequestRule) {
        let key = key.to_string();
        self.http_requests.insert(key.clone(), vec![http]);
        self.tcp_requests.insert(key, vec![tcp]);
    }

    /// HTTP-layer rules for `key`
    #[must_use]
    pub fn http(&self, key: ContentKey) -> Option<&[HttpRequestRule]> {
        self.http_requests.get(&key.to_string()).map(Vec::as_slice)
    }

    /// Connection-layer rules for `key`
    #[must_use]
    pub fn tcp(&self, key: ContentKey) -> Option<&[TcpRequestRule]> {
        self.tcp_requests.get(&key.to_string()).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_http_capture_rule() {
        let rule = HttpRequestRule::capture("hdr(User-Agent)", 64, &PathBuf::from("/maps/1.lst"));
        assert_eq!(rule.id, 0);
        assert_eq!(rule.rule_type, HttpRequestRuleType::Capture);
        assert_eq!(rule.cond, "if");
        assert_eq!(rule.cond_test, "{ req.hdr(Host) -f /maps/1.lst }");
        assert_eq!(
            rule.to_string(),
            "http-request capture hdr(User-Agent) len 64 if { req.hdr(Host) -f /maps/1.lst }"
        );
    }

    #[test]
    fn test_tcp_capture_rule() {
        let rule = TcpRequestRule::capture("req.payload(0,10)", 10, &PathBuf::from("/maps/1.lst"));
        assert_eq!(rule.rule_type, TcpRequestRuleType::Content);
        assert_eq!(rule.action, "capture req.payload(0,10) len 10");
        assert_eq!(rule.cond_test, "{ req_ssl_sni -f /maps/1.lst }");
    }

    #[test]
    fn test_serialized_field_names() {
        let rule = HttpRequestRule::capture("foo", 128, &PathBuf::from("/m/2.lst"));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "capture");
        assert_eq!(json["capture_len"], 128);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut sets = RuleSets::new();
        let key = ContentKey::from(9);
        let path = PathBuf::from("/m/9.lst");
        sets.insert(
            key,
            HttpRequestRule::capture("a", 1, &path),
            TcpRequestRule::capture("a", 1, &path),
        );
        sets.insert(
            key,
            HttpRequestRule::capture("b", 2, &path),
            TcpRequestRule::capture("b", 2, &path),
        );

        let http = sets.http(key).unwrap();
        assert_eq!(http.len(), 1);
        assert_eq!(http[0].capture_sample, "b");
        assert_eq!(sets.tcp(key).unwrap().len(), 1);
        assert_eq!(sets.http_requests.keys().next().map(String::as_str), Some("9"));
    }

    #[test]
    fn test_flags() {
        let mut sets = RuleSets::new();
        assert!(!sets.is_modified());
        sets.mark_modified();
        assert_eq!(sets.http_requests_status, Status::Modified);
        assert_eq!(sets.tcp_requests_status, Status::Modified);
        sets.clear_status();
        assert!(!sets.is_modified());
    }
}
