//! Rolling conversation history for the chat command

use std::collections::VecDeque;

/// Keeps the most recent question/answer exchanges
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    exchanges: VecDeque<(String, String)>,
    max_exchanges: usize,
}

impl ConversationHistory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            exchanges: VecDeque::with_capacity(max_exchanges),
            max_exchanges,
        }
    }

    /// Add an exchange, dropping the oldest ones beyond the limit
    pub fn push(&mut self, question: &str, answer: &str) {
        if self.max_exchanges == 0 {
            return;
        }
        while self.exchanges.len() >= self.max_exchanges {
            self.exchanges.pop_front();
        }
        self.exchanges
            .push_back((question.to_string(), answer.to_string()));
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Render as `User:`/`Assistant:` lines, `None` when empty
    pub fn render(&self) -> Option<String> {
        if self.exchanges.is_empty() {
            return None;
        }

        let lines: Vec<String> = self
            .exchanges
            .iter()
            .map(|(question, answer)| format!("User: {}\nAssistant: {}", question, answer))
            .collect();
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_latest_exchanges() {
        let mut history = ConversationHistory::new(2);
        assert_eq!(history.render(), None);

        history.push("one", "1");
        history.push("two", "2");
        history.push("three", "3");

        assert_eq!(
            history.render().unwrap(),
            "User: two\nAssistant: 2\nUser: three\nAssistant: 3"
        );
    }

    #[test]
    fn test_clear_and_zero_limit() {
        let mut history = ConversationHistory::new(2);
        history.push("q", "a");
        history.clear();
        assert!(history.is_empty());

        let mut disabled = ConversationHistory::new(0);
        disabled.push("q", "a");
        assert_eq!(disabled.render(), None);
    }
}
