//! Lead capture scenario integration tests
//!
//! These tests run complete conversations through the router with the Gemini
//! oracle and webhook sink pointed at mock servers.

use AutoStream::handlers::{ConversationRouter, FALLBACK_REPLY, GREETING_REPLY};
use AutoStream::services::knowledge::{PRICING_ANSWER, REFUND_ANSWER};
use AutoStream::state::scenarios::{
    ALREADY_CAPTURED, CONFIRMATION, PROMPT_EMAIL, PROMPT_NAME, PROMPT_PLATFORM,
};
use AutoStream::state::SessionStore;

use crate::helpers::*;
use crate::integration::{init_test_logging, send};

async fn setup() -> (TestContext, ConversationRouter, SessionStore) {
    init_test_logging();
    let ctx = TestContext::new().await;
    let router = ConversationRouter::from_services(&ctx.services().await);
    (ctx, router, SessionStore::new())
}

#[tokio::test]
async fn test_complete_lead_capture() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_label_for(TRIGGER, "HIGH_INTENT").await;
    ctx.gemini.mock_default_label("GREETING").await;
    ctx.mock_webhook(200, 1).await;

    let mut replies = Vec::new();
    for text in lead_capture_script() {
        replies.push(send(&router, &store, "default", text).await);
    }

    assert_eq!(replies, vec![PROMPT_NAME, PROMPT_EMAIL, PROMPT_PLATFORM, CONFIRMATION]);

    let session = store.snapshot("default").await.unwrap();
    assert_eq!(session.lead.name(), Some(NAME));
    assert_eq!(session.lead.email(), Some(EMAIL));
    assert_eq!(session.lead.platform(), Some(PLATFORM));
    assert_eq!(session.history.len(), 4);

    // Only the trigger was classified; the rest were pinned to high intent
    assert_eq!(ctx.gemini.request_count().await, 1);

    let leads = ctx.delivered_leads().await;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0]["name"], NAME);
    assert_eq!(leads[0]["email"], EMAIL);
    assert_eq!(leads[0]["platform"], PLATFORM);
    assert_eq!(leads[0]["session_id"], "default");
}

#[tokio::test]
async fn test_refund_question_is_case_insensitive() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_default_label("INFO").await;

    let lower = send(&router, &store, "s1", REFUND_QUESTION).await;
    let upper = send(&router, &store, "s1", &REFUND_QUESTION.to_uppercase()).await;

    assert_eq!(lower, REFUND_ANSWER);
    assert_eq!(upper, REFUND_ANSWER);
}

#[tokio::test]
async fn test_message_after_capture_is_acknowledged_only() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_label_for(TRIGGER, "HIGH_INTENT").await;
    ctx.gemini.mock_default_label("INFO").await;
    ctx.mock_webhook(200, 1).await;

    for text in lead_capture_script() {
        send(&router, &store, "default", text).await;
    }

    assert_eq!(send(&router, &store, "default", "what does it cost?").await, ALREADY_CAPTURED);
    assert_eq!(send(&router, &store, "default", "hello?").await, ALREADY_CAPTURED);

    let session = store.snapshot("default").await.unwrap();
    assert_eq!(session.lead.name(), Some(NAME));
    assert_eq!(session.history.len(), 6);
    assert_eq!(ctx.delivered_leads().await.len(), 1);
}

#[tokio::test]
async fn test_unrecognized_label_gets_fallback() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_label_for("gibberish", "").await;
    ctx.gemini.mock_default_label("MAYBE_BUY").await;

    assert_eq!(send(&router, &store, "s1", "gibberish").await, FALLBACK_REPLY);
    assert_eq!(send(&router, &store, "s1", "something else").await, FALLBACK_REPLY);

    let session = store.snapshot("s1").await.unwrap();
    assert!(!session.is_collecting_lead);
    assert_eq!(session.history.len(), 2);
}

#[tokio::test]
async fn test_oracle_outage_gets_fallback() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_failure(503).await;

    assert_eq!(send(&router, &store, "s1", GREETING).await, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_greeting_then_pricing_then_signup() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_label_for(GREETING, "GREETING").await;
    ctx.gemini.mock_label_for("pricing plans", "INFO").await;
    ctx.gemini.mock_label_for("start a Pro account", "HIGH_INTENT").await;

    assert_eq!(send(&router, &store, "s1", GREETING).await, GREETING_REPLY);
    assert_eq!(send(&router, &store, "s1", "tell me about your pricing plans").await, PRICING_ANSWER);
    assert_eq!(send(&router, &store, "s1", "ok, I'd like to start a Pro account").await, PROMPT_NAME);

    let session = store.snapshot("s1").await.unwrap();
    assert!(session.is_collecting_lead);
    assert_eq!(session.lead.name(), None);
}

#[tokio::test]
async fn test_webhook_rejection_still_confirms() {
    let (ctx, router, store) = setup().await;
    ctx.gemini.mock_default_label("HIGH_INTENT").await;
    ctx.mock_webhook(500, 1).await;

    let mut last_reply = String::new();
    for text in lead_capture_script() {
        last_reply = send(&router, &store, "s1", text).await;
    }

    assert_eq!(last_reply, CONFIRMATION);
    let session = store.snapshot("s1").await.unwrap();
    assert!(session.is_lead_captured());
}
