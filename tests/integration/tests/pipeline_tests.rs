//! Realtime pipeline tests
//!
//! Exercise the full router + registry pipeline over in-memory fakes:
//! authorization, mutation, and the broadcasts live connections observe.
//!
//! Run with: cargo test -p integration-tests --test pipeline_tests

use integration_tests::{
    TestPipeline, EVENT_A, EVENT_B, MEMBER_ALICE, MEMBER_BOB, OUTSIDER, VANISHED_EVENT,
};
use planpal_core::{DomainError, PageQuery, Snowflake};
use planpal_realtime::ServerEvent;
use std::time::Duration;

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_repeat_reaction_replaces_not_appends() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "Dinner at 7?")
        .await
        .unwrap();

    pipeline
        .router
        .set_reaction(MEMBER_BOB, message.id, "👍")
        .await
        .unwrap();
    let updated = pipeline
        .router
        .set_reaction(MEMBER_BOB, message.id, "🎉")
        .await
        .unwrap();

    assert_eq!(updated.reactions.len(), 1);
    assert_eq!(updated.reactions[0].user_id, MEMBER_BOB);
    assert_eq!(updated.reactions[0].emoji, "🎉");
}

#[tokio::test]
async fn test_concurrent_reactions_from_different_users_both_land() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "hello")
        .await
        .unwrap();

    let r1 = pipeline.router.clone();
    let r2 = pipeline.router.clone();
    let id = message.id;
    let (a, b) = tokio::join!(
        tokio::spawn(async move { r1.set_reaction(MEMBER_ALICE, id, "👍").await }),
        tokio::spawn(async move { r2.set_reaction(MEMBER_BOB, id, "🎉").await }),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    let stored = pipeline.store.find_message(message.id).await.unwrap();
    assert_eq!(stored.reactions.len(), 2);
}

#[tokio::test]
async fn test_clear_absent_reaction_is_noop() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "hello")
        .await
        .unwrap();
    pipeline
        .router
        .set_reaction(MEMBER_ALICE, message.id, "👍")
        .await
        .unwrap();

    // Bob never reacted; clearing must succeed and change nothing.
    let cleared = pipeline
        .router
        .clear_reaction(MEMBER_BOB, message.id)
        .await
        .unwrap();

    assert_eq!(cleared.reactions.len(), 1);
    assert_eq!(cleared.reactions[0].user_id, MEMBER_ALICE);
}

#[tokio::test]
async fn test_invalid_emoji_rejected() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "hello")
        .await
        .unwrap();

    let err = pipeline
        .router
        .set_reaction(MEMBER_ALICE, message.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidEmoji));
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_non_member_create_fails_without_side_effects() {
    let pipeline = TestPipeline::new();
    let (_conn, mut rx) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;

    let err = pipeline
        .router
        .create_message(OUTSIDER, EVENT_A, "let me in")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotAMember));
    assert!(pipeline.store.is_empty().await);
    assert!(rx.try_recv().is_err(), "no broadcast must occur");
}

#[tokio::test]
async fn test_vanished_event_is_not_found() {
    let pipeline = TestPipeline::new();
    let err = pipeline
        .router
        .create_message(MEMBER_ALICE, VANISHED_EVENT, "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EventNotFound(_)));
    assert!(pipeline.store.is_empty().await);
}

#[tokio::test]
async fn test_membership_is_checked_before_event_existence() {
    // Probing an arbitrary event id reveals nothing about whether it exists.
    let pipeline = TestPipeline::new();
    let err = pipeline
        .router
        .create_message(MEMBER_ALICE, Snowflake::new(9999), "hi")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotAMember));
}

#[tokio::test]
async fn test_edit_and_delete_are_sender_only() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_BOB, EVENT_A, "original")
        .await
        .unwrap();

    // Alice owns the group but did not send the message.
    let err = pipeline
        .router
        .update_message(MEMBER_ALICE, message.id, "edited")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotMessageSender));

    let err = pipeline
        .router
        .delete_message(MEMBER_ALICE, message.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotMessageSender));

    let stored = pipeline.store.find_message(message.id).await.unwrap();
    assert_eq!(stored.text, "original");
    assert!(!stored.is_edited());
}

// ============================================================================
// Ordering
// ============================================================================

#[tokio::test]
async fn test_listing_is_most_recent_first() {
    let pipeline = TestPipeline::new();
    let m1 = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "one")
        .await
        .unwrap();
    let m2 = pipeline
        .router
        .create_message(MEMBER_BOB, EVENT_A, "two")
        .await
        .unwrap();
    let m3 = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "three")
        .await
        .unwrap();

    let listed = pipeline
        .router
        .list_messages(MEMBER_ALICE, EVENT_A, PageQuery::default())
        .await
        .unwrap();

    let ids: Vec<Snowflake> = listed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![m3.id, m2.id, m1.id]);
}

#[tokio::test]
async fn test_paging_is_stateless_and_restartable() {
    let pipeline = TestPipeline::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        let m = pipeline
            .router
            .create_message(MEMBER_ALICE, EVENT_A, &format!("msg {i}"))
            .await
            .unwrap();
        ids.push(m.id);
    }
    ids.reverse();

    let page1 = pipeline
        .router
        .list_messages(MEMBER_ALICE, EVENT_A, PageQuery::new(1, 2))
        .await
        .unwrap();
    let page2 = pipeline
        .router
        .list_messages(MEMBER_ALICE, EVENT_A, PageQuery::new(2, 2))
        .await
        .unwrap();
    let page3 = pipeline
        .router
        .list_messages(MEMBER_ALICE, EVENT_A, PageQuery::new(3, 2))
        .await
        .unwrap();

    let collected: Vec<Snowflake> = page1
        .iter()
        .chain(&page2)
        .chain(&page3)
        .map(|m| m.id)
        .collect();
    assert_eq!(collected, ids);
}

// ============================================================================
// Broadcast fidelity and scoping
// ============================================================================

#[tokio::test]
async fn test_all_subscribers_receive_identical_frames() {
    let pipeline = TestPipeline::new();
    let (_conn_a, mut rx_a) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;
    let (_conn_b, mut rx_b) = pipeline.connect_and_join(MEMBER_BOB, EVENT_A).await;

    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "hello everyone")
        .await
        .unwrap();

    let frame_a = rx_a.try_recv().unwrap();
    let frame_b = rx_b.try_recv().unwrap();

    // Both subscribers, including the sender's own connection, see the same
    // committed message.
    assert_eq!(
        serde_json::to_value(&frame_a).unwrap(),
        serde_json::to_value(&frame_b).unwrap()
    );
    match frame_a {
        ServerEvent::MessageCreate(broadcast) => assert_eq!(broadcast, message),
        other => panic!("unexpected frame: {other:?}"),
    }
}

#[tokio::test]
async fn test_broadcasts_never_leak_across_events() {
    let pipeline = TestPipeline::new();
    let (_conn_a, mut rx_a) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;
    let (_conn_b, mut rx_b) = pipeline.connect_and_join(MEMBER_BOB, EVENT_B).await;

    pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "only for A")
        .await
        .unwrap();

    assert!(rx_a.try_recv().is_ok());
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn test_reaction_broadcast_carries_full_message() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "react to me")
        .await
        .unwrap();

    let (_conn, mut rx) = pipeline.connect_and_join(MEMBER_BOB, EVENT_A).await;
    pipeline
        .router
        .set_reaction(MEMBER_BOB, message.id, "👍")
        .await
        .unwrap();

    match rx.try_recv().unwrap() {
        ServerEvent::MessageReaction(broadcast) => {
            assert_eq!(broadcast.id, message.id);
            assert_eq!(broadcast.text, "react to me");
            assert_eq!(broadcast.reactions.len(), 1);
        }
        other => panic!("unexpected frame: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_broadcasts_bare_id() {
    let pipeline = TestPipeline::new();
    let message = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "short lived")
        .await
        .unwrap();

    let (_conn, mut rx) = pipeline.connect_and_join(MEMBER_BOB, EVENT_A).await;
    pipeline
        .router
        .delete_message(MEMBER_ALICE, message.id)
        .await
        .unwrap();

    match rx.try_recv().unwrap() {
        ServerEvent::MessageDelete {
            message_id,
            event_id,
        } => {
            assert_eq!(message_id, message.id);
            assert_eq!(event_id, EVENT_A);
        }
        other => panic!("unexpected frame: {other:?}"),
    }
    assert!(pipeline.store.is_empty().await);
}

#[tokio::test]
async fn test_typing_excludes_origin_connection() {
    let pipeline = TestPipeline::new();
    let (conn_a, mut rx_a) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;
    let (_conn_b, mut rx_b) = pipeline.connect_and_join(MEMBER_BOB, EVENT_A).await;

    pipeline.router.typing(conn_a, MEMBER_ALICE, EVENT_A).await.unwrap();

    assert!(rx_a.try_recv().is_err());
    match rx_b.try_recv().unwrap() {
        ServerEvent::Typing { user_id, event_id } => {
            assert_eq!(user_id, MEMBER_ALICE);
            assert_eq!(event_id, EVENT_A);
        }
        other => panic!("unexpected frame: {other:?}"),
    }
}

// ============================================================================
// Connection lifecycle
// ============================================================================

#[tokio::test]
async fn test_disconnect_drops_all_subscriptions() {
    let pipeline = TestPipeline::new();
    let (conn, mut rx) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;
    pipeline.router.join(conn, MEMBER_ALICE, EVENT_B).await.unwrap();

    pipeline.router.disconnect(conn);

    pipeline
        .router
        .create_message(MEMBER_BOB, EVENT_A, "after disconnect")
        .await
        .unwrap();
    pipeline
        .router
        .create_message(MEMBER_BOB, EVENT_B, "after disconnect")
        .await
        .unwrap();

    assert!(rx.try_recv().is_err());
    assert_eq!(pipeline.router.registry().subscriber_count(EVENT_A), 0);
    assert_eq!(pipeline.router.registry().subscriber_count(EVENT_B), 0);
}

#[tokio::test]
async fn test_join_requires_membership_and_leaves_registry_clean() {
    let pipeline = TestPipeline::new();
    let (conn, _rx) = pipeline.connect(OUTSIDER);

    let err = pipeline.router.join(conn, OUTSIDER, EVENT_A).await.unwrap_err();
    assert!(matches!(err, DomainError::NotAMember));
    assert_eq!(pipeline.router.registry().subscriber_count(EVENT_A), 0);
}

#[tokio::test]
async fn test_rejoin_after_leave_is_idempotent() {
    let pipeline = TestPipeline::new();
    let (conn, mut rx) = pipeline.connect_and_join(MEMBER_ALICE, EVENT_A).await;

    pipeline.router.leave(conn, EVENT_A);
    pipeline.router.join(conn, MEMBER_ALICE, EVENT_A).await.unwrap();
    pipeline.router.join(conn, MEMBER_ALICE, EVENT_A).await.unwrap();

    pipeline
        .router
        .create_message(MEMBER_BOB, EVENT_A, "once only")
        .await
        .unwrap();

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err(), "duplicate join must not duplicate frames");
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_slow_gate_fails_transient() {
    let pipeline =
        TestPipeline::with_gate_delay(Duration::from_secs(60), Duration::from_millis(20));

    let err = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "hi")
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert!(pipeline.store.is_empty().await);
}

#[tokio::test]
async fn test_empty_and_oversized_text_rejected() {
    let pipeline = TestPipeline::new();

    let err = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, "  \n ")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyText));

    let long = "x".repeat(2001);
    let err = pipeline
        .router
        .create_message(MEMBER_ALICE, EVENT_A, &long)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TextTooLong { .. }));

    assert!(pipeline.store.is_empty().await);
}
