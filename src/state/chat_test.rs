use super::*;

// =============================================================
// ChatState defaults
// =============================================================

#[test]
fn chat_state_default_is_idle() {
    let state = ChatState::default();
    assert!(state.messages.is_empty());
    assert!(state.session_id.is_none());
    assert!(!state.loading);
    assert!(state.streaming.is_empty());
}

// =============================================================
// ChatMessage
// =============================================================

#[test]
fn chat_message_constructors_set_role() {
    assert_eq!(ChatMessage::user("hi").role, ChatRole::User);
    assert_eq!(ChatMessage::assistant("hello").role, ChatRole::Assistant);
}

#[test]
fn chat_message_ids_are_unique() {
    let a = ChatMessage::user("same");
    let b = ChatMessage::user("same");
    assert_ne!(a.id, b.id);
}

#[test]
fn failure_message_is_fixed_assistant_text() {
    let msg = ChatMessage::failure();
    assert_eq!(msg.role, ChatRole::Assistant);
    assert_eq!(msg.content, "Sorry, I encountered an error. Please try again.");
}

#[test]
fn chat_role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"assistant\"");
    assert_eq!(serde_json::from_str::<ChatRole>("\"user\"").unwrap(), ChatRole::User);
}
