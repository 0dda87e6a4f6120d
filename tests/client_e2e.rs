#![allow(missing_docs)]

//! End-to-end engine tests over the scripted transport.
//!
//! Exercises: single round trip, the synthetic request-time header,
//! multiplexed key preservation, whole-group abort on one failing
//! transfer, handle release guarantees, drive-loop edge cases, and the
//! single/multi dispatch seam.

#[macro_use]
mod common;

use common::*;
use std::time::Duration;
use wiremux::lab::ScriptedTransport;
use wiremux::{
    Client, ClientConfig, ClientError, Inbound, Method, MultiRequest, Outbound, Progress,
    Request, RequestKey, SendRequest, REQUEST_TIME_HEADER,
};

fn init_test(test_name: &str) {
    init_test_logging();
    test_phase!(test_name);
}

// ============================================================================
// Section 1: Single execution
// ============================================================================

#[test]
fn e2e_single_get_round_trip() {
    init_test("e2e_single_get_round_trip");

    test_section!("setup");
    let transport = ScriptedTransport::new(vec![ok_delivery("hello")]);
    let mut client = Client::new(transport);

    test_section!("execute");
    let response = client.execute(&get_request("/")).unwrap();
    tracing::info!(status = response.status, "response received");

    test_section!("verify");
    assert_with_log!(response.status == 200, "status is 200", 200, response.status);
    assert_eq!(response.first_header("Content-Type"), Some("text/plain"));
    assert_eq!(response.body, b"hello");
    test_complete!("e2e_single_get_round_trip");
}

#[test]
fn e2e_request_time_header_present_and_formatted() {
    init_test("e2e_request_time_header_present_and_formatted");

    let transport = ScriptedTransport::new(vec![ok_delivery("x")]);
    let mut client = Client::new(transport);
    let response = client.execute(&get_request("/")).unwrap();

    let value = response
        .first_header(REQUEST_TIME_HEADER)
        .expect("synthetic request-time header missing");
    tracing::info!(value, "request time header");

    // The scripted elapsed time of 123456 us renders as millis with three
    // decimal places.
    assert_eq!(value, "123.456 ms");
    let millis: f64 = value.strip_suffix(" ms").unwrap().parse().unwrap();
    assert!(millis > 0.0);
    test_complete!("e2e_request_time_header_present_and_formatted");
}

#[test]
fn e2e_single_network_failure_surfaces_request_and_code() {
    init_test("e2e_single_network_failure_surfaces_request_and_code");

    let transport = ScriptedTransport::new(vec![failure(7, "connection refused")]);
    let releases = transport.release_counter();
    let mut client = Client::new(transport);

    let err = client.execute(&get_request("/down")).unwrap_err();
    match err {
        ClientError::Network(network) => {
            assert_eq!(network.request.uri, "https://example.test/down");
            assert_eq!(network.code, 7);
            assert!(network.message.contains("refused"));
        }
        other => panic!("expected network error, got {other:?}"),
    }
    assert_with_log!(releases.count() == 1, "handle released", 1, releases.count());
    test_complete!("e2e_single_network_failure_surfaces_request_and_code");
}

#[test]
fn e2e_sequential_sends_use_fresh_handles() {
    init_test("e2e_sequential_sends_use_fresh_handles");

    let transport = ScriptedTransport::new(vec![ok_delivery("first"), ok_delivery("second")]);
    let releases = transport.release_counter();
    let mut client = Client::new(transport);

    assert_eq!(client.execute(&get_request("/1")).unwrap().body, b"first");
    assert_eq!(releases.count(), 1);
    assert_eq!(client.execute(&get_request("/2")).unwrap().body, b"second");
    assert_eq!(releases.count(), 2);
    test_complete!("e2e_sequential_sends_use_fresh_handles");
}

// ============================================================================
// Section 2: Multiplexed execution
// ============================================================================

#[test]
fn e2e_multi_preserves_key_set() {
    init_test("e2e_multi_preserves_key_set");

    test_section!("setup");
    let transport =
        ScriptedTransport::new(vec![ok_delivery("x"), ok_delivery("y"), ok_delivery("z")]);
    let mut client = Client::new(transport);

    let multi = MultiRequest::new(vec![
        ("left".into(), get_request("/x")),
        (RequestKey::Ordinal(9), get_request("/y")),
        ("right".into(), get_request("/z")),
    ])
    .unwrap();

    test_section!("execute");
    let responses = client.execute_multi(&multi).unwrap();

    test_section!("verify");
    assert_with_log!(responses.len() == 3, "all keys answered", 3, responses.len());
    let mut expected: Vec<RequestKey> = multi.keys().cloned().collect();
    let mut actual: Vec<RequestKey> = responses.keys().cloned().collect();
    expected.sort();
    actual.sort();
    assert_eq!(expected, actual);
    assert_eq!(responses.get(&"left".into()).unwrap().body, b"x");
    assert_eq!(responses.get(&RequestKey::Ordinal(9)).unwrap().body, b"y");
    assert_eq!(responses.get(&"right".into()).unwrap().body, b"z");
    test_complete!("e2e_multi_preserves_key_set");
}

#[test]
fn e2e_multi_single_failure_aborts_group_and_releases_all_handles() {
    init_test("e2e_multi_single_failure_aborts_group_and_releases_all_handles");

    test_section!("setup");
    let transport = ScriptedTransport::new(vec![
        ok_delivery("x"),
        failure(6, "could not resolve host"),
    ]);
    let releases = transport.release_counter();
    let mut client = Client::new(transport);

    let multi = MultiRequest::new(vec![
        ("a".into(), get_request("/x")),
        ("b".into(), Request::new(Method::Get, "https://bad.test/y")),
    ])
    .unwrap();

    test_section!("execute");
    let err = client.execute_multi(&multi).unwrap_err();

    test_section!("verify");
    match err {
        ClientError::Network(network) => {
            assert_eq!(network.request.uri, "https://bad.test/y");
            assert_eq!(network.code, 6);
        }
        other => panic!("expected network error, got {other:?}"),
    }
    assert_with_log!(
        releases.count() == 2,
        "every handle released despite the abort",
        2,
        releases.count()
    );
    test_complete!("e2e_multi_single_failure_aborts_group_and_releases_all_handles");
}

#[test]
fn e2e_multi_fatal_session_status() {
    init_test("e2e_multi_fatal_session_status");

    let transport =
        ScriptedTransport::new(vec![ok_delivery("x")]).with_fatal_session(3, "out of memory");
    let releases = transport.release_counter();
    let mut client = Client::new(transport);

    let multi = MultiRequest::new(vec![("a".into(), get_request("/x"))]).unwrap();
    let err = client.execute_multi(&multi).unwrap_err();

    match err {
        ClientError::Session { code, message } => {
            assert_eq!(code, 3);
            assert!(message.contains("out of memory"));
        }
        other => panic!("expected session error, got {other:?}"),
    }
    assert_with_log!(releases.count() == 1, "handle released", 1, releases.count());
    test_complete!("e2e_multi_fatal_session_status");
}

#[test]
fn e2e_drive_loop_handles_spurious_and_empty_polls() {
    init_test("e2e_drive_loop_handles_spurious_and_empty_polls");

    let transport = ScriptedTransport::new(vec![ok_delivery("x"), ok_delivery("y")])
        .with_advance_plan(vec![
            Progress::Again,
            Progress::Running(2),
            Progress::Again,
            Progress::Running(1),
            Progress::Running(0),
        ])
        .with_wait_plan(vec![0, 1]);
    let mut client = Client::with_config(
        transport,
        ClientConfig {
            poll_sleep: Duration::from_micros(10),
            ..ClientConfig::default()
        },
    );

    let multi = MultiRequest::new(vec![
        ("a".into(), get_request("/x")),
        ("b".into(), get_request("/y")),
    ])
    .unwrap();

    let responses = client.execute_multi(&multi).unwrap();
    assert_eq!(responses.len(), 2);
    test_complete!("e2e_drive_loop_handles_spurious_and_empty_polls");
}

// ============================================================================
// Section 3: Dispatch seam
// ============================================================================

#[test]
fn e2e_dispatch_single_and_multi() {
    init_test("e2e_dispatch_single_and_multi");

    let transport = ScriptedTransport::new(vec![ok_delivery("solo")]);
    let mut client = Client::new(transport);
    match client
        .dispatch(&Outbound::Single(get_request("/solo")))
        .unwrap()
    {
        Inbound::Single(response) => assert_eq!(response.body, b"solo"),
        Inbound::Multi(_) => panic!("expected single response"),
    }

    let transport = ScriptedTransport::new(vec![ok_delivery("a"), ok_delivery("b")]);
    let mut client = Client::new(transport);
    let multi = MultiRequest::new(vec![
        ("a".into(), get_request("/a")),
        ("b".into(), get_request("/b")),
    ])
    .unwrap();
    match client.dispatch(&Outbound::Multi(multi)).unwrap() {
        Inbound::Multi(responses) => assert_eq!(responses.len(), 2),
        Inbound::Single(_) => panic!("expected multi response"),
    }
    test_complete!("e2e_dispatch_single_and_multi");
}

#[test]
fn e2e_send_request_trait_matches_execute() {
    init_test("e2e_send_request_trait_matches_execute");

    let transport = ScriptedTransport::new(vec![ok_delivery("via trait")]);
    let mut client = Client::new(transport);
    let response = client.send_request(&get_request("/")).unwrap();
    assert_eq!(response.body, b"via trait");
    test_complete!("e2e_send_request_trait_matches_execute");
}
