//! Frontend `maxconn` update tests

use ingress_capture::error::FrontendError;
use ingress_capture::frontend::{handle_maxconn, Frontend, FrontendMode, FrontendStore, InMemoryFrontendStore};

#[test]
fn test_missing_listener_aborts_remaining() {
    let store: InMemoryFrontendStore = [Frontend::new("web-1")].into_iter().collect();

    let err = handle_maxconn(&store, Some(5000), &["web-1", "web-2"]).unwrap_err();

    assert!(matches!(err, FrontendError::NotFound { ref name } if name == "web-2"));
    assert_eq!(store.get("web-1").unwrap().maxconn, Some(5000));
    assert!(store.get("web-2").is_err());
}

#[test]
fn test_other_settings_untouched() {
    let mut fe = Frontend::new("ssl").with_mode(FrontendMode::Tcp);
    fe.default_backend = Some("default-backend".into());
    let store: InMemoryFrontendStore = [fe].into_iter().collect();

    handle_maxconn(&store, Some(100), &["ssl"]).unwrap();

    let fe = store.get("ssl").unwrap();
    assert_eq!(fe.maxconn, Some(100));
    assert_eq!(fe.mode, FrontendMode::Tcp);
    assert_eq!(fe.default_backend.as_deref(), Some("default-backend"));
}

#[test]
fn test_works_through_trait_object() {
    let store: InMemoryFrontendStore = [Frontend::new("http")].into_iter().collect();
    let dyn_store: &dyn FrontendStore = &store;

    handle_maxconn(dyn_store, Some(1), &["http"]).unwrap();
    assert_eq!(store.get("http").unwrap().maxconn, Some(1));
}
