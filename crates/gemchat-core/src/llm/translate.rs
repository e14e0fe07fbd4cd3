use crate::llm::traits::{Content, Message};

/// Map the stored history plus the newest prompt to `generateContent` turns.
///
/// `history` must not contain the newest prompt. Prior turns keep their order;
/// the prompt is always the final `user` turn.
pub fn build_contents(history: &[Message], prompt: &str) -> Vec<Content> {
    history
        .iter()
        .map(Content::from)
        .chain(std::iter::once(Content::user(prompt)))
        .collect()
}
