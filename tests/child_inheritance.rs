//! Inheritance and override semantics across a live client hierarchy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cluster_client::{
    Auth, Client, ClientConfig, ConfigOverrides, EventKind, SequenceRequestIds,
};

mod common;
use common::{start_programmable_backend, MockResponse, ReceivedRequest};

/// Backend that records every request head it sees.
async fn recording_backend() -> (std::net::SocketAddr, Arc<Mutex<Vec<ReceivedRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = seen.clone();
    let addr = start_programmable_backend(move |request| {
        let record = record.clone();
        async move {
            record.lock().unwrap().push(request);
            MockResponse::ok(r#"{"ok":true}"#)
        }
    })
    .await;
    (addr, seen)
}

fn config_for(addr: std::net::SocketAddr, name: &str) -> ClientConfig {
    ClientConfig {
        nodes: vec![common::node_url(addr)],
        name: name.into(),
        max_retries: 0,
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn test_child_headers_replace_parent_headers_entirely() {
    let (addr, seen) = recording_backend().await;

    let mut config = config_for(addr, "parent");
    config.headers.insert("x-foo".into(), "bar".into());
    let client = Client::new(config).unwrap();

    let mut child_headers = HashMap::new();
    child_headers.insert("x-baz".to_string(), "faz".to_string());
    let child = client.child(ConfigOverrides::new().with_headers(child_headers));

    child.info().await.unwrap();
    client.info().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);

    // Child sends only its own set, not the union.
    assert_eq!(seen[0].headers.get("x-baz").unwrap(), "faz");
    assert!(!seen[0].headers.contains_key("x-foo"));

    // Parent is untouched by the child's override.
    assert_eq!(seen[1].headers.get("x-foo").unwrap(), "bar");
    assert!(!seen[1].headers.contains_key("x-baz"));
}

#[tokio::test]
async fn test_auth_override_selects_authorization_scheme() {
    let (addr, seen) = recording_backend().await;

    let mut config = config_for(addr, "parent");
    config.auth = Auth::Basic {
        username: "foo".into(),
        password: "bar".into(),
    };
    let client = Client::new(config).unwrap();
    let child = client.child(ConfigOverrides::new().with_auth(Auth::ApiKey("foobar".into())));

    client.info().await.unwrap();
    child.info().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].headers.get("authorization").unwrap(),
        "Basic Zm9vOmJhcg=="
    );
    assert_eq!(seen[1].headers.get("authorization").unwrap(), "ApiKey foobar");
}

#[tokio::test]
async fn test_request_ids_follow_each_instances_generator() {
    let (addr, seen) = recording_backend().await;

    let config = ClientConfig {
        request_ids: Arc::new(SequenceRequestIds::new("trace-1")),
        ..config_for(addr, "parent")
    };
    let client = Client::new(config).unwrap();
    let child =
        client.child(ConfigOverrides::new().with_request_ids(SequenceRequestIds::new("trace-2")));

    // Interleaved calls must draw from independent sequences.
    client.info().await.unwrap();
    child.info().await.unwrap();
    client.info().await.unwrap();
    child.info().await.unwrap();

    let ids: Vec<String> = seen
        .lock()
        .unwrap()
        .iter()
        .map(|request| request.headers.get("x-request-id").unwrap().clone())
        .collect();
    assert_eq!(ids, vec!["trace-1-0", "trace-2-0", "trace-1-1", "trace-2-1"]);
}

#[tokio::test]
async fn test_names_and_events_across_the_hierarchy() {
    let (addr, _seen) = recording_backend().await;

    let client = Client::new(config_for(addr, "root")).unwrap();
    let observed = Arc::new(Mutex::new(Vec::new()));

    let o = observed.clone();
    client.on(EventKind::Response, move |err, meta| {
        assert!(err.is_none());
        o.lock()
            .unwrap()
            .push((meta.client.clone(), meta.request_id.clone()));
    });

    let child = client.child(
        ConfigOverrides::new()
            .with_name("child")
            .with_request_ids(SequenceRequestIds::new("c")),
    );
    let grandchild = child.child(
        ConfigOverrides::new()
            .with_name("grandchild")
            .with_request_ids(SequenceRequestIds::new("g")),
    );

    client.info().await.unwrap();
    child.info().await.unwrap();
    grandchild.info().await.unwrap();

    let observed = observed.lock().unwrap();
    let names: Vec<&str> = observed.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["root", "child", "grandchild"]);
    assert_eq!(observed[1].1, "c-0");
    assert_eq!(observed[2].1, "g-0");
}

#[tokio::test]
async fn test_child_listener_observes_grandchild_traffic() {
    let (addr, _seen) = recording_backend().await;

    let client = Client::new(config_for(addr, "root")).unwrap();
    let child = client.child(ConfigOverrides::new().with_name("child"));
    let grandchild = child.child(ConfigOverrides::new().with_name("grandchild"));

    let observed = Arc::new(Mutex::new(Vec::new()));
    let o = observed.clone();
    child.on(EventKind::Request, move |_, meta| {
        o.lock().unwrap().push(meta.client.clone());
    });

    grandchild.info().await.unwrap();

    // Same channel object shared by the whole tree, not relationship-aware.
    assert_eq!(*observed.lock().unwrap(), vec!["grandchild"]);
}

#[tokio::test]
async fn test_unspecified_fields_inherit_resolved_values() {
    let (addr, _seen) = recording_backend().await;

    let mut config = config_for(addr, "parent");
    config.request_timeout_ms = 1234;
    config.headers.insert("x-team".into(), "search".into());
    let client = Client::new(config).unwrap();

    let child = client.child(ConfigOverrides::new().with_name("child"));
    assert_eq!(child.config().request_timeout_ms, 1234);
    assert_eq!(child.config().headers.get("x-team").unwrap(), "search");
    assert_eq!(child.config().nodes, client.config().nodes);
    assert_eq!(child.name(), "child");
    assert_eq!(client.name(), "parent");
}
