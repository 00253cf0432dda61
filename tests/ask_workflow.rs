mod common;

use common::{
    ask_request,
    harness,
    FailingStore,
    FakeQa,
    RecordingReplies,
    UnreachableStore,
    RESPONSE_URL,
};
use docs_askbot::cache::{ conversation_key, ConversationStore };
use docs_askbot::models::chat::{ ConversationRecord, FIELD_COUNTER };
use docs_askbot::qa::NO_ANSWER_FOUND;
use docs_askbot::workflow::{ AskOutcome, AskWorkflow };
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "U2147483697";
const CHANNEL: &str = "C024BE91L";

fn key() -> String {
    conversation_key("docs_bot:user_id:channel_id", USER, CHANNEL)
}

async fn stored_record(store: &dyn ConversationStore) -> ConversationRecord {
    let fields = store.get(&key()).await.unwrap().expect("record stored");
    ConversationRecord::from_fields(&fields).unwrap()
}

#[tokio::test]
async fn first_question_opens_a_conversation() {
    let h = harness();

    let outcome = h.workflow.run(ask_request(USER, "ask How do I install Palette?")).await;

    assert_eq!(outcome, AskOutcome::Answered);
    assert_eq!(h.qa.creates(), 1);
    let asks = h.qa.asks();
    assert_eq!(asks.len(), 1);
    assert_eq!(asks[0].question, "How do I install Palette?");
    assert!(asks[0].history.is_empty());
    assert_eq!(asks[0].conversation_id, 100);

    let record = stored_record(h.store.as_ref()).await;
    assert_eq!(record.counter, 1);
    assert_eq!(record.conversation_id, 100);
    assert_eq!(record.user_id, USER);
    assert_eq!(record.channel_id, CHANNEL);
    assert_eq!(record.history.len(), 1);
    assert_eq!(record.history[0].prompt, "How do I install Palette?");
    assert_eq!(record.last_answer, "Use the palette CLI.");
    assert!(h.store.ttl(&key()).await.unwrap() > Duration::from_secs(890));

    let replies = h.replies.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].0, RESPONSE_URL);
    let payload = replies[0].1.to_string();
    assert!(payload.contains("Use the palette CLI."));
    assert!(payload.contains("\"value\":\"5000\""));
    assert!(h.replies.error_replies().is_empty());
}

#[tokio::test]
async fn follow_up_question_sends_prior_history() {
    let h = harness();

    h.workflow.run(ask_request(USER, "ask What is Palette?")).await;
    let outcome = h.workflow.run(ask_request(USER, "ask And how do I install it?")).await;

    assert_eq!(outcome, AskOutcome::Answered);
    assert_eq!(h.qa.creates(), 1);
    let asks = h.qa.asks();
    assert_eq!(asks[1].history.len(), 1);
    assert_eq!(asks[1].history[0].prompt, "What is Palette?");
    assert_eq!(asks[1].conversation_id, asks[0].conversation_id);

    let record = stored_record(h.store.as_ref()).await;
    assert_eq!(record.counter, 2);
    assert_eq!(record.history.len(), 2);
    assert_eq!(record.last_question, "And how do I install it?");
}

#[tokio::test]
async fn conversations_are_scoped_per_user() {
    let h = harness();

    h.workflow.run(ask_request(USER, "ask first")).await;
    h.workflow.run(ask_request("U0OTHER", "ask second")).await;

    assert_eq!(h.qa.creates(), 2);
    assert!(h.qa.asks()[1].history.is_empty());
}

#[tokio::test]
async fn provider_failure_sends_only_the_apology() {
    let h = harness();
    h.qa.fail_ask.store(true, Ordering::SeqCst);

    let outcome = h.workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert!(h.store.get(&key()).await.unwrap().is_none());
    assert!(h.replies.replies().is_empty());
    assert_eq!(h.replies.error_replies(), vec![(RESPONSE_URL.to_string(), false)]);
}

#[tokio::test]
async fn conversation_creation_failure_sends_the_apology() {
    let h = harness();
    h.qa.fail_create.store(true, Ordering::SeqCst);

    let outcome = h.workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert!(h.qa.asks().is_empty());
    assert_eq!(h.replies.error_replies().len(), 1);
}

#[tokio::test]
async fn cache_write_failure_withholds_the_answer() {
    let qa = Arc::new(FakeQa::new());
    let replies = Arc::new(RecordingReplies::default());
    let workflow = AskWorkflow::new(
        Arc::new(FailingStore),
        qa.clone(),
        replies.clone(),
        common::settings()
    );

    let outcome = workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert_eq!(qa.asks().len(), 1);
    assert!(replies.replies().is_empty());
    assert_eq!(replies.error_replies().len(), 1);
}

#[tokio::test]
async fn cache_read_failure_aborts_before_the_provider() {
    let qa = Arc::new(FakeQa::new());
    let replies = Arc::new(RecordingReplies::default());
    let workflow = AskWorkflow::new(
        Arc::new(UnreachableStore),
        qa.clone(),
        replies.clone(),
        common::settings()
    );

    let outcome = workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert_eq!(qa.creates(), 0);
    assert!(qa.asks().is_empty());
    assert!(replies.replies().is_empty());
    assert_eq!(replies.error_replies(), vec![(RESPONSE_URL.to_string(), false)]);
}

#[tokio::test]
async fn keyword_without_question_is_an_error() {
    let h = harness();

    let outcome = h.workflow.run(ask_request(USER, "ask   ")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert_eq!(h.qa.creates(), 0);
    assert!(h.qa.asks().is_empty());
    assert_eq!(h.replies.error_replies().len(), 1);
}

#[tokio::test]
async fn malformed_cached_record_is_reported_not_reset() {
    let h = harness();
    let mut fields: HashMap<String, String> = HashMap::new();
    fields.insert("UserID".into(), USER.into());
    fields.insert("ChannelID".into(), CHANNEL.into());
    fields.insert("ConversationID".into(), "100".into());
    fields.insert("Question".into(), "q".into());
    fields.insert("Answer".into(), "a".into());
    fields.insert("History".into(), "[]".into());
    fields.insert(FIELD_COUNTER.into(), "many".into());
    let pairs: Vec<(String, String)> = fields.into_iter().collect();
    h.store.put(&key(), &pairs, Duration::from_secs(60)).await.unwrap();

    let outcome = h.workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert!(h.qa.asks().is_empty());
    assert_eq!(h.replies.error_replies().len(), 1);
}

#[tokio::test]
async fn no_answer_sentinel_is_still_recorded() {
    let h = harness();
    *h.qa.answer.lock().unwrap() = NO_ANSWER_FOUND.to_string();

    let outcome = h.workflow.run(ask_request(USER, "ask something obscure")).await;

    assert_eq!(outcome, AskOutcome::Answered);
    let record = stored_record(h.store.as_ref()).await;
    assert_eq!(record.last_answer, NO_ANSWER_FOUND);
    assert_eq!(record.history[0].response, NO_ANSWER_FOUND);
}

#[tokio::test]
async fn private_ask_failure_keeps_the_apology_private() {
    let h = harness();
    h.qa.fail_ask.store(true, Ordering::SeqCst);
    let mut req = ask_request(USER, "pask anything");
    req.is_private = true;

    h.workflow.run(req).await;

    assert_eq!(h.replies.error_replies(), vec![(RESPONSE_URL.to_string(), true)]);
}

#[tokio::test]
async fn failed_delivery_falls_back_to_the_apology() {
    let h = harness();
    h.replies.fail_reply.store(true, Ordering::SeqCst);

    let outcome = h.workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Failed);
    assert_eq!(h.replies.error_replies().len(), 1);
}

#[tokio::test]
async fn undeliverable_apology_is_reported() {
    let h = harness();
    h.qa.fail_ask.store(true, Ordering::SeqCst);
    h.replies.fail_error_reply.store(true, Ordering::SeqCst);

    let outcome = h.workflow.run(ask_request(USER, "ask anything")).await;

    assert_eq!(outcome, AskOutcome::Undelivered);
}

#[tokio::test]
async fn concurrent_turns_for_one_user_do_not_lose_updates() {
    let h = harness();

    let first = h.workflow.spawn(ask_request(USER, "ask one"));
    let second = h.workflow.spawn(ask_request(USER, "ask two"));
    assert_eq!(first.await.unwrap(), AskOutcome::Answered);
    assert_eq!(second.await.unwrap(), AskOutcome::Answered);

    assert_eq!(h.qa.creates(), 1);
    let record = stored_record(h.store.as_ref()).await;
    assert_eq!(record.counter, 2);
    assert_eq!(record.history.len(), 2);
}
