//! Integration tests module
//!
//! This module contains the integration tests for the AutoStream assistant,
//! organized by functionality and conversation scenarios.


use std::sync::Once;

use AutoStream::handlers::ConversationRouter;
use AutoStream::state::SessionStore;

static INIT: Once = Once::new();

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Route one message the way the HTTP handler does: under the session lock
pub async fn send(router: &ConversationRouter, store: &SessionStore, session_id: &str, text: &str) -> String {
    let mut session = store.lock(session_id).await;
    router.route(&mut session, text).await.reply
}
