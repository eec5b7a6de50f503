use didapp_app::{checkpoint_digest, AppConfig, Application, ResultCode};
use didapp_core::wire;
use didapp_core::{Address, RegistryEntry};
use didapp_storage::Storage;

fn raw(text: &str) -> Vec<u8> {
    wire::encode_text(text).into_bytes()
}

fn new_app() -> Application {
    let storage = Storage::open_temporary().unwrap();
    let config = AppConfig {
        flush_on_commit: false,
    };
    Application::new(storage, config).unwrap()
}

fn get_request(app: &Application, id: &str) -> serde_json::Value {
    let query = raw(&format!(r#"GetRequest|{{"requestId":"{}"}}"#, id));
    let result = app.query(&query).unwrap();
    serde_json::from_slice(&result.value.expect("request should exist")).unwrap()
}

#[test]
fn test_register_then_query_destination() {
    let mut app = new_app();

    let outcome = app
        .deliver_tx(&raw(
            r#"RegisterMsgDestination|{"subjects":[{"namespace":"ns1","id":"u1"}],"host":"10.0.0.1","port":"80"}"#,
        ))
        .unwrap();
    assert!(outcome.is_ok());
    app.commit().unwrap();

    let result = app
        .query(&raw(r#"GetMsgDestination|{"namespace":"ns1","id":"u1"}"#))
        .unwrap();
    let entry: RegistryEntry = serde_json::from_slice(&result.value.unwrap()).unwrap();
    assert_eq!(entry.addresses(), &[Address::new("10.0.0.1", "80")]);
}

#[test]
fn test_repeated_registration_has_no_duplicates() {
    let mut app = new_app();
    let tx = raw(
        r#"RegisterMsgDestination|{"subjects":[{"namespace":"ns1","id":"u1"}],"host":"10.0.0.1","port":"80"}"#,
    );

    for _ in 0..3 {
        assert!(app.deliver_tx(&tx).unwrap().is_ok());
    }
    app.commit().unwrap();
    for _ in 0..2 {
        assert!(app.deliver_tx(&tx).unwrap().is_ok());
    }
    app.commit().unwrap();

    let result = app
        .query(&raw(r#"GetMsgDestination|{"namespace":"ns1","id":"u1"}"#))
        .unwrap();
    let entry: RegistryEntry = serde_json::from_slice(&result.value.unwrap()).unwrap();
    assert_eq!(entry.len(), 1);
    // Every accepted transaction counts, even when it changed nothing
    assert_eq!(app.info().data, r#"{"size":5}"#);
}

#[test]
fn test_request_reaches_complete() {
    let mut app = new_app();

    let txs = [
        r#"CreateRequest|{"requestId":"r1","minimumApprovals":2,"payloadDigest":"abc"}"#,
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"sig-a"}"#,
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"sig-b"}"#,
    ];
    for tx in txs {
        assert!(app.deliver_tx(&raw(tx)).unwrap().is_ok());
    }
    app.commit().unwrap();

    let value = get_request(&app, "r1");
    assert_eq!(value["status"], "complete");
    assert_eq!(value["payloadDigest"], "abc");
}

#[test]
fn test_request_status_transitions() {
    let mut app = new_app();

    app.deliver_tx(&raw(
        r#"CreateRequest|{"requestId":"r1","minimumApprovals":3,"payloadDigest":"abc"}"#,
    ))
    .unwrap();
    app.deliver_tx(&raw(
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"s1"}"#,
    ))
    .unwrap();
    app.commit().unwrap();
    assert_eq!(get_request(&app, "r1")["status"], "pending");

    app.deliver_tx(&raw(
        r#"CreateIdpResponse|{"requestId":"r1","status":"reject","signature":"s2"}"#,
    ))
    .unwrap();
    app.deliver_tx(&raw(
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"s3"}"#,
    ))
    .unwrap();
    app.deliver_tx(&raw(
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"s4"}"#,
    ))
    .unwrap();
    app.commit().unwrap();
    assert_eq!(get_request(&app, "r1")["status"], "reject");
}

#[test]
fn test_duplicate_create_resets_request() {
    let mut app = new_app();
    let create = raw(r#"CreateRequest|{"requestId":"r1","minimumApprovals":1,"payloadDigest":"abc"}"#);

    app.deliver_tx(&create).unwrap();
    app.deliver_tx(&raw(
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"s1"}"#,
    ))
    .unwrap();
    app.deliver_tx(&create).unwrap();
    app.commit().unwrap();

    assert_eq!(get_request(&app, "r1")["status"], "pending");
}

#[test]
fn test_subjects_with_separator_do_not_share_entries() {
    let mut app = new_app();

    let outcome = app
        .deliver_tx(&raw(
            r#"RegisterMsgDestination|{"subjects":[{"namespace":"a|b","id":"c"}],"host":"10.0.0.9","port":"1"}"#,
        ))
        .unwrap();
    assert_eq!(outcome.code, ResultCode::InvalidPayload);

    let outcome = app
        .deliver_tx(&raw(
            r#"RegisterMsgDestination|{"subjects":[{"namespace":"a","id":"b|c"}],"host":"10.0.0.1","port":"2"}"#,
        ))
        .unwrap();
    assert!(outcome.is_ok());
    app.commit().unwrap();

    let result = app
        .query(&raw(r#"GetMsgDestination|{"namespace":"a","id":"b|c"}"#))
        .unwrap();
    let entry: RegistryEntry = serde_json::from_slice(&result.value.unwrap()).unwrap();
    assert_eq!(entry.addresses(), &[Address::new("10.0.0.1", "2")]);

    let result = app
        .query(&raw(r#"GetMsgDestination|{"namespace":"a|b","id":"c"}"#))
        .unwrap();
    assert!(result.value.is_none());
}

#[test]
fn test_get_request_never_created() {
    let app = new_app();
    let result = app.query(&raw(r#"GetRequest|{"requestId":"nope"}"#)).unwrap();
    assert_eq!(result.code, ResultCode::NotFound);
    assert!(result.value.is_none());
}

#[test]
fn test_malformed_transactions_do_not_mutate() {
    let mut app = new_app();

    let bad = [
        raw("RegisterMsgDestination"),
        raw(r#"RegisterMsgDestination|{"subjects":"#),
        raw(r#"CreateIdpResponse|{"requestId":"missing","status":"accept","signature":"s"}"#),
        raw(r#"SetKey|{"k":"v"}"#),
        b"!!".to_vec(),
    ];
    for tx in &bad {
        assert!(!app.deliver_tx(tx).unwrap().is_ok());
    }
    assert_eq!(app.state().size, 0);
    assert_eq!(app.pending_writes(), 0);

    app.commit().unwrap();
    assert_eq!(app.info().data, r#"{"size":0}"#);
}

#[test]
fn test_replicas_agree_on_digests() {
    let txs = [
        r#"RegisterMsgDestination|{"subjects":[{"namespace":"ns1","id":"u1"},{"namespace":"ns1","id":"u2"}],"host":"10.0.0.1","port":"80"}"#,
        r#"CreateRequest|{"requestId":"r1","minimumApprovals":1,"payloadDigest":"abc"}"#,
        r#"NotAMethod|{}"#,
        r#"CreateIdpResponse|{"requestId":"r1","status":"accept","signature":"s"}"#,
    ];

    let mut a = new_app();
    let mut b = new_app();
    let mut digests = (Vec::new(), Vec::new());

    for block in txs.chunks(2) {
        for tx in block {
            let left = a.deliver_tx(&raw(tx)).unwrap();
            let right = b.deliver_tx(&raw(tx)).unwrap();
            assert_eq!(left, right);
        }
        digests.0.push(a.commit().unwrap());
        digests.1.push(b.commit().unwrap());
    }

    assert_eq!(digests.0, digests.1);
    assert_eq!(a.info(), b.info());
    assert_eq!(a.info().last_block_height, 2);
    assert_eq!(a.info().last_block_app_hash, checkpoint_digest(3));
}
