use claim::{assert_err, assert_ok};
use mailchimp_subscriber::domain::{Subscriber, SubscriberEmail, SubscriberError};
use serde_json::{Value, json};

use crate::helpers::{fields, subscriber};

#[test]
fn end_to_end_payload_drops_null_merge_fields() {
    let subscriber = subscriber(
        "a@b.com",
        json!({"FNAME": "Jo", "LNAME": null}),
        json!({"language": "en"}),
    );

    let body = assert_ok!(serde_json::to_value(&subscriber));
    assert_eq!(
        body,
        json!({"email_address": "a@b.com", "merge_fields": {"FNAME": "Jo"}, "language": "en"})
    );
}

#[test]
fn serialized_body_keeps_payload_key_order() {
    let subscriber = subscriber(
        "a@b.com",
        json!({"FNAME": "Jo"}),
        json!({"status": "pending", "email_type": "text"}),
    );

    let body = assert_ok!(serde_json::to_string(&subscriber));
    assert_eq!(
        body,
        r#"{"email_address":"a@b.com","merge_fields":{"FNAME":"Jo"},"status":"pending","email_type":"text"}"#
    );
}

#[test]
fn chunked_notes_reach_the_payload() {
    let mut subscriber = subscriber("a@b.com", json!({}), json!({"status": "subscribed"}));
    subscriber.set_merge_field_value("NOTES", "first;second;third", Some(4), Some(";"));

    assert_eq!(
        Value::Object(subscriber.format()),
        json!({
            "email_address": "a@b.com",
            "merge_fields": {"NOTES_1": "first", "NOTES_2": "second", "NOTES_3": "third", "NOTES_4": ""},
            "status": "subscribed"
        })
    );
}

#[test]
fn replacing_merge_fields_with_only_nulls_removes_them_from_the_payload() {
    let mut subscriber = subscriber("a@b.com", json!({"FNAME": "Jo"}), json!({}));
    let stored = subscriber.set_merge_fields(fields(json!({"FNAME": null})));
    assert!(stored.is_empty());

    assert_eq!(Value::Object(subscriber.format()), json!({"email_address": "a@b.com"}));
}

#[test]
fn unknown_merge_field_lookup_fails() {
    let subscriber = subscriber("a@b.com", json!({"FNAME": "Jo"}), json!({}));
    let outcome = subscriber.merge_field_value("BIRTHDAY", Value::Null);

    let err = assert_err!(outcome);
    assert!(matches!(err, SubscriberError::PreconditionFailed(ref key) if key == "BIRTHDAY"));
}

#[test]
fn validated_email_flows_into_the_payload() {
    let email = assert_ok!(SubscriberEmail::parse("ursula@example.com".to_string()));
    let subscriber = Subscriber::new(email, fields(json!({})), fields(json!({})));

    assert_eq!(
        Value::Object(subscriber.format()),
        json!({"email_address": "ursula@example.com"})
    );
}
