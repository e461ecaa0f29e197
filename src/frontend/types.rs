use crate::conversation::{Message, Role};

/// A line in the browser's chat window. Errors are shown here but never enter
/// the session transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatLine {
    pub kind: LineKind,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineKind {
    User,
    Assistant,
    Error,
}

impl ChatLine {
    pub fn new(kind: LineKind, content: String) -> ChatLine {
        ChatLine { kind, content }
    }

    pub fn user(content: String) -> ChatLine {
        ChatLine::new(LineKind::User, content)
    }

    pub fn assistant(content: String) -> ChatLine {
        ChatLine::new(LineKind::Assistant, content)
    }

    pub fn error(content: String) -> ChatLine {
        ChatLine::new(LineKind::Error, content)
    }
}

impl From<&Message> for ChatLine {
    fn from(message: &Message) -> Self {
        let kind = match message.role() {
            Role::User => LineKind::User,
            // system text is filtered out before display; treat it as the bot if it slips through
            Role::Assistant | Role::System => LineKind::Assistant,
        };
        ChatLine::new(kind, message.content().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_map_to_line_kinds() {
        assert_eq!(ChatLine::from(&Message::user("oi")).kind, LineKind::User);
        let line = ChatLine::from(&Message::assistant("Olá, time!"));
        assert_eq!(line, ChatLine::assistant("Olá, time!".into()));
    }
}
