//! Ownership classification
//!
//! Runs after every transcript has been parsed: one-to-one messages are
//! split into outgoing and incoming by comparing their sender against the
//! nicknames the user claims as their own.

use crate::models::MessageKind;
use crate::store::LogStore;

/// Messages decided by [`classify_ownership`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    /// Messages now marked outgoing
    pub outgoing: usize,
    /// Messages now marked incoming
    pub incoming: usize,
}

/// Resolve every [`MessageKind::Unknown`] message in the store
pub fn classify_ownership(store: &mut LogStore, self_nicks: &[String]) -> Classification {
    let mut result = Classification::default();

    for message in store.messages_mut().filter(|m| m.kind == MessageKind::Unknown) {
        if self_nicks.iter().any(|nick| *nick == message.sender) {
            message.kind = MessageKind::Outgoing;
            result.outgoing += 1;
        } else {
            message.kind = MessageKind::Incoming;
            result.incoming += 1;
        }
    }

    tracing::info!(outgoing = result.outgoing, incoming = result.incoming, "Classified messages");
    result
}

/// Distinct sender names in first-seen order
#[must_use]
pub fn sender_names(store: &LogStore) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for (_, _, contact) in store.contacts() {
        for message in &contact.messages {
            if !names.contains(&message.sender.as_str()) {
                names.push(&message.sender);
            }
        }
    }
    names
}

/// Split a comma-separated nickname answer, trimming each entry
#[must_use]
pub fn parse_nicknames(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|nick| !nick.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use crate::normalize::ingest;

    fn store_with(group_chat: bool, senders: &[&str]) -> LogStore {
        let mut store = LogStore::new();
        let dir = if group_chat { "room.chat" } else { "them@example.org" };
        let contact = store.resolve_names("jabber", "me@example.org", dir);
        for (i, sender) in senders.iter().enumerate() {
            let record = RawRecord::new(Some(*sender), i64::try_from(i).unwrap(), Some("text"));
            assert!(ingest(store.contact_mut(contact), record));
        }
        store
    }

    fn kinds(store: &LogStore) -> Vec<MessageKind> {
        store
            .contacts()
            .flat_map(|(_, _, c)| c.messages.iter().map(|m| m.kind))
            .collect()
    }

    #[test]
    fn test_self_nick_marks_outgoing() {
        let mut store = store_with(false, &["me", "them"]);
        let result = classify_ownership(&mut store, &["me".to_string()]);

        assert_eq!(result, Classification { outgoing: 1, incoming: 1 });
        assert_eq!(kinds(&store), [MessageKind::Outgoing, MessageKind::Incoming]);
    }

    #[test]
    fn test_group_chat_is_untouched() {
        let mut store = store_with(true, &["me", "them"]);
        let result = classify_ownership(&mut store, &["me".to_string()]);

        assert_eq!(result, Classification::default());
        assert_eq!(kinds(&store), [MessageKind::GroupChat, MessageKind::GroupChat]);
    }

    #[test]
    fn test_sender_names_are_distinct_in_first_seen_order() {
        let store = store_with(false, &["them", "me", "them", "other"]);
        assert_eq!(sender_names(&store), ["them", "me", "other"]);
    }

    #[test]
    fn test_parse_nicknames() {
        assert_eq!(parse_nicknames(" me , myself,,I \n"), ["me", "myself", "I"]);
        assert!(parse_nicknames("   ").is_empty());
    }
}
