//! Response engine integration tests
//!
//! Exercises the local keyword cascade through the public engine trait and
//! the upstream message-list construction used by the chat proxy.

use talkie_gateway::history::ConversationTurn;
use talkie_gateway::prompt::{build_messages, SYSTEM_PROMPT};
use talkie_gateway::{LocalEngine, ResponseEngine};

async fn reply(message: &str) -> String {
    LocalEngine::new()
        .respond(message, &[])
        .await
        .expect("local engine never fails")
}

#[tokio::test]
async fn test_greeting_regardless_of_case() {
    assert!(reply("Hello there").await.starts_with("Hello!"));
    assert!(reply("hi, how are you").await.starts_with("Hello!"));
    assert!(reply("HELLO").await.starts_with("Hello!"));
}

#[tokio::test]
async fn test_arithmetic_multiplication() {
    assert!(reply("what is 25 times 4").await.contains("100"));
}

#[tokio::test]
async fn test_arithmetic_division_by_zero() {
    // f64 semantics propagate: positive infinity displays as "inf"
    assert!(reply("what is 10 divided by 0").await.contains("inf"));
}

#[tokio::test]
async fn test_times_is_not_the_time_branch() {
    let text = reply("what is 25 times 4").await;
    assert!(!text.contains("The current time is"));

    let text = reply("what time is it").await;
    assert!(text.contains("The current time is"));
}

#[tokio::test]
async fn test_fallback_echoes_and_admits_learning() {
    let text = reply("recommend a hiking trail").await;
    assert!(text.contains("recommend a hiking trail"));
    assert!(text.contains("still learning"));
}

#[tokio::test]
async fn test_local_engine_ignores_history() {
    let history = vec![
        ConversationTurn::user("what is 2 plus 2"),
        ConversationTurn::assistant("2 plus 2 is 4."),
    ];

    let engine = LocalEngine::new();
    assert!(!engine.retains_history());

    let text = engine.respond("Hello", &history).await.unwrap();
    assert!(text.starts_with("Hello!"));
}

#[test]
fn test_message_list_starts_with_system_instruction() {
    let messages = build_messages(&[], "hello");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[0].content, SYSTEM_PROMPT);
    assert_eq!(messages[1].role, "user");
    assert_eq!(messages[1].content, "hello");
}

#[test]
fn test_long_history_trimmed_to_last_ten() {
    let history: Vec<ConversationTurn> = (0..13)
        .map(|i| {
            if i % 2 == 0 {
                ConversationTurn::user(format!("user {i}"))
            } else {
                ConversationTurn::assistant(format!("assistant {i}"))
            }
        })
        .collect();

    let messages = build_messages(&history, "newest");

    // system + exactly ten history turns + the new message
    assert_eq!(messages.len(), 12);
    // Oldest of the window first, unmodified
    assert_eq!(messages[1].content, "assistant 3");
    assert_eq!(messages[10].content, "user 12");
    assert_eq!(messages[11].content, "newest");
}
