//! Message normalization for models that require strictly alternating roles.

use super::types::{ChatRole, Message};

const FILLER: &str = "_";
const SYSTEM_PREFIX: &str = "SYSTEM: ";

/// Rewrites `messages` so that, after an optional leading system message, roles
/// alternate user/assistant starting with user.
///
/// Content is trimmed and empty turns are dropped. Later system turns become
/// user turns prefixed with `SYSTEM: `. Consecutive user turns are merged with a
/// newline; consecutive assistant turns are separated by a `_` user filler. The
/// result always contains at least one non-system turn.
pub fn strict_format(messages: Vec<Message>) -> Vec<Message> {
    let mut iter = messages.into_iter().peekable();
    let mut out = Vec::new();

    if let Some(first) = iter.next_if(|m| m.role == ChatRole::System) {
        out.push(Message::system(first.content.trim()));
    }
    let head = out.len();

    for msg in iter {
        let content = msg.content.trim();
        if content.is_empty() {
            continue;
        }
        let (role, content) = match msg.role {
            ChatRole::System => (ChatRole::User, format!("{SYSTEM_PREFIX}{content}")),
            role => (role, content.to_string()),
        };

        let last_role = out.last().filter(|_| out.len() > head).map(|m| m.role);
        match (last_role, role) {
            (Some(ChatRole::User), ChatRole::User) => {
                if let Some(last) = out.last_mut() {
                    last.content.push('\n');
                    last.content.push_str(&content);
                }
            }
            (Some(ChatRole::Assistant) | None, ChatRole::Assistant) => {
                out.push(Message::user(FILLER));
                out.push(Message::new(role, content));
            }
            _ => out.push(Message::new(role, content)),
        }
    }

    if out.len() == head {
        out.push(Message::user(FILLER));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_alternates(messages: &[Message]) {
        let tail = match messages.first() {
            Some(m) if m.role == ChatRole::System => &messages[1..],
            _ => messages,
        };
        assert!(!tail.is_empty());
        for (i, m) in tail.iter().enumerate() {
            let expected = if i % 2 == 0 {
                ChatRole::User
            } else {
                ChatRole::Assistant
            };
            assert_eq!(m.role, expected, "position {i} in {tail:?}");
            assert!(!m.content.is_empty());
        }
    }

    #[test]
    fn keeps_leading_system_message_first() {
        let out = strict_format(vec![
            Message::system("be terse"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);

        assert_eq!(
            out,
            vec![
                Message::system("be terse"),
                Message::user("hi"),
                Message::assistant("hello"),
            ]
        );
    }

    #[test]
    fn merges_consecutive_user_turns() {
        let out = strict_format(vec![
            Message::system("sys"),
            Message::user("one"),
            Message::user("two"),
            Message::assistant("ok"),
        ]);

        assert_eq!(out[1], Message::user("one\ntwo"));
        assert_alternates(&out);
    }

    #[test]
    fn separates_consecutive_assistant_turns_with_filler() {
        let out = strict_format(vec![
            Message::system("sys"),
            Message::user("q"),
            Message::assistant("a1"),
            Message::assistant("a2"),
        ]);

        assert_eq!(
            &out[1..],
            &[
                Message::user("q"),
                Message::assistant("a1"),
                Message::user("_"),
                Message::assistant("a2"),
            ]
        );
        assert_alternates(&out);
    }

    #[test]
    fn leading_assistant_gets_user_filler() {
        let out = strict_format(vec![Message::system("sys"), Message::assistant("hey")]);

        assert_eq!(&out[1..], &[Message::user("_"), Message::assistant("hey")]);
    }

    #[test]
    fn drops_empty_turns_and_rewrites_later_system_turns() {
        let out = strict_format(vec![
            Message::system("  sys  "),
            Message::user("   "),
            Message::system("note"),
            Message::assistant(""),
            Message::user("question"),
        ]);

        assert_eq!(
            out,
            vec![
                Message::system("sys"),
                Message::user("SYSTEM: note\nquestion"),
            ]
        );
    }

    #[test]
    fn empty_conversation_gets_single_filler() {
        let out = strict_format(vec![Message::system("sys")]);
        assert_eq!(out, vec![Message::system("sys"), Message::user("_")]);

        assert_eq!(strict_format(Vec::new()), vec![Message::user("_")]);
    }

    #[test]
    fn mixed_history_always_alternates() {
        let out = strict_format(vec![
            Message::system("sys"),
            Message::assistant("a"),
            Message::assistant("b"),
            Message::user("c"),
            Message::user(""),
            Message::system("d"),
            Message::assistant("e"),
            Message::user("f"),
        ]);

        assert_eq!(out[0], Message::system("sys"));
        assert_alternates(&out);
    }
}
