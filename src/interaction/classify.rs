//! Keyword triage of a single message.

use crate::base::types::{Keywords, Reply, ReplyKind};

/// Returns `true` if `text` contains any of `keywords` as a substring.
fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    keywords.iter().any(|kw| text.contains(kw.as_ref()))
}

/// Picks the reply for a message, if any.
///
/// Rules are checked in priority order and the first match wins:
/// danger words, then buy words, then FAQ entries in declaration order.
/// Matching is case-sensitive substring containment, so a keyword also
/// matches inside a longer word.
pub fn classify(text: &str, keywords: &Keywords) -> Option<Reply> {
    if contains_any(text, &keywords.danger_words) {
        return Some(Reply {
            kind: ReplyKind::Danger,
            text: keywords.danger_reply.clone(),
        });
    }

    if contains_any(text, &keywords.buy_words) {
        return Some(Reply {
            kind: ReplyKind::Buy,
            text: keywords.buy_reply.clone(),
        });
    }

    keywords.faq.iter().enumerate().find(|(_, entry)| contains_any(text, &entry.keywords)).map(|(index, entry)| Reply {
        kind: ReplyKind::Faq(index),
        text: entry.reply.clone(),
    })
}

// Tests.
