//! Wire protocol tests
//!
//! Verify that the frames clients send and receive keep the event names and
//! payload shapes the web client depends on.

use planpal_core::{Message, Snowflake};
use planpal_gateway::ClientAction;
use planpal_realtime::ServerEvent;

fn sample_message() -> Message {
    Message::new(
        Snowflake::new(1),
        Snowflake::new(100),
        Snowflake::new(200),
        "Dinner at 7?".to_string(),
    )
}

#[test]
fn test_client_action_names() {
    let cases = [
        (r#"{"type":"join:event","data":{"event_id":"100"}}"#, "join"),
        (r#"{"type":"leave:event","data":{"event_id":"100"}}"#, "leave"),
        (
            r#"{"type":"message:create","data":{"event_id":"100","text":"hi"}}"#,
            "create",
        ),
        (
            r#"{"type":"message:update","data":{"message_id":"1","text":"hi"}}"#,
            "update",
        ),
        (r#"{"type":"message:delete","data":{"message_id":"1"}}"#, "delete"),
        (
            r#"{"type":"message:reaction:set","data":{"message_id":"1","emoji":"👍"}}"#,
            "set",
        ),
        (
            r#"{"type":"message:reaction:clear","data":{"message_id":"1"}}"#,
            "clear",
        ),
        (r#"{"type":"typing","data":{"event_id":"100"}}"#, "typing"),
    ];

    for (json, label) in cases {
        assert!(
            serde_json::from_str::<ClientAction>(json).is_ok(),
            "failed to parse {label} frame"
        );
    }
}

#[test]
fn test_server_frame_shapes() {
    let message = sample_message();

    let create = serde_json::to_value(ServerEvent::MessageCreate(message.clone())).unwrap();
    assert_eq!(create["type"], "message:create");
    assert_eq!(create["data"]["id"], "1");
    assert_eq!(create["data"]["event_id"], "100");
    assert_eq!(create["data"]["text"], "Dinner at 7?");
    assert!(create["data"]["reactions"].as_array().unwrap().is_empty());

    let delete = serde_json::to_value(ServerEvent::MessageDelete {
        message_id: message.id,
        event_id: message.event_id,
    })
    .unwrap();
    assert_eq!(delete["type"], "message:delete");
    assert_eq!(delete["data"]["message_id"], "1");

    let error = serde_json::to_value(ServerEvent::error("NOT_A_MEMBER", "nope")).unwrap();
    assert_eq!(error["type"], "error");
    assert_eq!(error["data"]["code"], "NOT_A_MEMBER");
}

#[test]
fn test_snowflake_ids_are_strings_on_the_wire() {
    // i64 ids exceed JavaScript's safe integer range, so they must travel as
    // strings.
    let message = sample_message();
    let json = serde_json::to_value(&message).unwrap();
    assert!(json["id"].is_string());
    assert!(json["sender_id"].is_string());
}
