//! End-to-end tests for request capture passes
//!
//! These drive the public API the way a controller reconciliation loop
//! does: one `MapFiles` store and one `RuleSets` value per pass, shared by
//! every ingress in that pass.
//!
//! ```bash
//! cargo test --test capture_pass
//! ```

use ingress_capture::annotations::{Annotations, Status, REQUEST_CAPTURE, REQUEST_CAPTURE_LEN};
use ingress_capture::capture::{ContentKey, RequestCapture};
use ingress_capture::ingress::Ingress;
use ingress_capture::maps::MapFiles;
use ingress_capture::rules::{HttpRequestRuleType, RuleSets, TcpRequestRuleType};

const MAP_DIR: &str = "/etc/haproxy/maps";

fn ingress_with_capture(name: &str, hosts: &[&str], capture: &str, status: Status) -> Ingress {
    let mut ingress = Ingress::new("default", name).with_status(status);
    for host in hosts {
        ingress = ingress.with_host(*host);
    }
    ingress.annotations.insert(REQUEST_CAPTURE, capture);
    ingress
}

// ============================================================================
// Directive examples
// ============================================================================

#[test]
fn test_two_samples_two_hosts() {
    let ingress = ingress_with_capture("web", &["a.com", "b.com"], "X-Forwarded-For\nfoo", Status::Added);
    let global = Annotations::new();
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    let outcome = RequestCapture::new(&global)
        .apply(&ingress, &mut maps, &mut rules)
        .expect("directive present");

    let xff = ContentKey::request_capture("x-forwarded-for", 128);
    let foo = ContentKey::request_capture("foo", 128);
    assert_eq!(outcome.emitted, vec![xff, foo]);

    for key in [xff, foo] {
        assert_eq!(maps.content(key).as_deref(), Some("a.com\nb.com\n"));

        let http = rules.http(key).expect("http rule");
        assert_eq!(http.len(), 1);
        assert_eq!(http[0].rule_type, HttpRequestRuleType::Capture);
        assert_eq!(http[0].capture_len, 128);
        assert_eq!(
            http[0].cond_test,
            format!("{{ req.hdr(Host) -f {MAP_DIR}/{key}.lst }}")
        );

        let tcp = rules.tcp(key).expect("tcp rule");
        assert_eq!(tcp[0].rule_type, TcpRequestRuleType::Content);
        assert_eq!(tcp[0].cond_test, format!("{{ req_ssl_sni -f {MAP_DIR}/{key}.lst }}"));
    }
    assert_eq!(rules.tcp(xff).unwrap()[0].action, "capture X-Forwarded-For len 128");
    assert_eq!(rules.http_requests_status, Status::Modified);
    assert_eq!(rules.tcp_requests_status, Status::Modified);
}

#[test]
fn test_deleted_directive_emits_nothing() {
    let mut ingress = ingress_with_capture("web", &["a.com"], "foo\nbar\n", Status::Modified);
    ingress
        .annotations
        .insert_with_status(REQUEST_CAPTURE, "foo\nbar\n", Status::Deleted);
    let global = Annotations::new();
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    let outcome = RequestCapture::new(&global)
        .apply(&ingress, &mut maps, &mut rules)
        .unwrap();

    assert_eq!(outcome.status, Status::Deleted);
    assert!(rules.http_requests.is_empty());
    assert!(rules.tcp_requests.is_empty());
    assert!(rules.is_modified());

    let foo = ContentKey::request_capture("foo", 128);
    assert_eq!(maps.modified_keys().collect::<Vec<_>>(), vec![foo]);
    assert!(!maps.get(foo).unwrap().contains("a.com"));
}

#[test]
fn test_malformed_length_uses_default() {
    let mut ingress = ingress_with_capture("web", &["a.com"], "foo", Status::Added);
    ingress.annotations.insert(REQUEST_CAPTURE_LEN, "abc");
    let global = Annotations::new();
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    let outcome = RequestCapture::new(&global)
        .apply(&ingress, &mut maps, &mut rules)
        .unwrap();

    assert_eq!(outcome.capture_len, 128);
    assert_eq!(outcome.emitted, vec![ContentKey::request_capture("foo", 128)]);
}

#[test]
fn test_length_from_global_layer() {
    let ingress = ingress_with_capture("web", &["a.com"], "foo", Status::Added);
    let global: Annotations = [(REQUEST_CAPTURE_LEN, "32")].into_iter().collect();
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    RequestCapture::new(&global)
        .apply(&ingress, &mut maps, &mut rules)
        .unwrap();

    let key = ContentKey::request_capture("foo", 32);
    assert_eq!(rules.tcp(key).unwrap()[0].action, "capture foo len 32");
}

// ============================================================================
// Sharing and idempotence
// ============================================================================

#[test]
fn test_same_expression_shares_map_file() {
    let web = ingress_with_capture("web", &["a.com"], "hdr(User-Agent)", Status::Added);
    let api = ingress_with_capture("api", &["b.com", "c.com"], "HDR(User-Agent)", Status::Empty);
    let global = Annotations::new();
    let handler = RequestCapture::new(&global);
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    handler.apply(&web, &mut maps, &mut rules).unwrap();
    handler.apply(&api, &mut maps, &mut rules).unwrap();

    assert_eq!(maps.len(), 1);
    let key = ContentKey::request_capture("hdr(user-agent)", 128);
    assert_eq!(maps.content(key).as_deref(), Some("a.com\nb.com\nc.com\n"));
    assert_eq!(rules.http_requests.len(), 1);
}

#[test]
fn test_repeated_pass_is_idempotent() {
    let ingress = ingress_with_capture("web", &["a.com", "b.com"], "foo\nbar", Status::Added);
    let global = Annotations::new();
    let handler = RequestCapture::new(&global);
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    handler.apply(&ingress, &mut maps, &mut rules).unwrap();
    let first_rules = rules.clone();
    let first_maps: Vec<_> = maps.iter().map(|(k, f)| (k, f.content())).collect();

    handler.apply(&ingress, &mut maps, &mut rules).unwrap();
    let second_maps: Vec<_> = maps.iter().map(|(k, f)| (k, f.content())).collect();

    assert_eq!(rules, first_rules);
    assert_eq!(second_maps, first_maps);
}

#[test]
fn test_deletion_keeps_earlier_registrations() {
    let global = Annotations::new();
    let handler = RequestCapture::new(&global);
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    let added = ingress_with_capture("web", &["a.com"], "foo", Status::Added);
    handler.apply(&added, &mut maps, &mut rules).unwrap();

    let deleted = ingress_with_capture("web", &["a.com"], "foo", Status::Deleted);
    handler.apply(&deleted, &mut maps, &mut rules).unwrap();

    let key = ContentKey::request_capture("foo", 128);
    assert!(maps.get(key).unwrap().contains("a.com"));
    assert!(rules.http(key).is_some());
}

#[test]
fn test_render_cycle_clears_flags() {
    let ingress = ingress_with_capture("web", &["a.com"], "foo", Status::Added);
    let global = Annotations::new();
    let handler = RequestCapture::new(&global);
    let mut maps = MapFiles::new(MAP_DIR);
    let mut rules = RuleSets::new();

    handler.apply(&ingress, &mut maps, &mut rules).unwrap();
    assert_eq!(maps.modified_keys().count(), 1);

    maps.clean();
    rules.clear_status();

    let unchanged = ingress.clone().with_status(Status::Empty);
    handler.apply(&unchanged, &mut maps, &mut rules).unwrap();
    assert_eq!(maps.modified_keys().count(), 0);
    assert!(!rules.is_modified());
}
