//! Data models for the in-memory transcript tree
//!
//! Protocols own accounts, accounts own contacts, contacts own the messages
//! parsed from their transcripts. Parsers emit [`RawRecord`]s which the
//! normalizer turns into [`Message`]s.

use serde::Serialize;

/// How a message maps onto the destination log table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKind {
    /// One-to-one message whose direction has not been decided yet
    Unknown,
    /// Message in a multi-user chat room
    GroupChat,
    /// One-to-one message written by the other party
    Incoming,
    /// One-to-one message written by the local user
    Outgoing,
}

impl MessageKind {
    /// Kind code stored in the destination `logs.kind` column
    #[must_use]
    pub const fn code(self) -> Option<i64> {
        match self {
            Self::Unknown => None,
            Self::GroupChat => Some(2),
            Self::Incoming => Some(4),
            Self::Outgoing => Some(6),
        }
    }
}

/// A timestamped line extracted from a transcript, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Sender name, absent for status lines
    pub sender: Option<String>,
    /// Unix timestamp (UTC seconds)
    pub timestamp: i64,
    /// Plain-text body
    pub body: Option<String>,
}

impl RawRecord {
    /// Build a record from borrowed parts
    #[must_use]
    pub fn new(sender: Option<&str>, timestamp: i64, body: Option<&str>) -> Self {
        Self {
            sender: sender.map(ToString::to_string),
            timestamp,
            body: body.map(ToString::to_string),
        }
    }
}

/// A normalized chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Name of the message sender
    pub sender: String,
    /// Unix timestamp (UTC seconds)
    pub timestamp: i64,
    /// Direction or room classification
    pub kind: MessageKind,
    /// Message text content
    pub body: Option<String>,
    /// Subject line (never present in transcripts)
    pub subject: Option<String>,
}

/// A conversation partner or chat room under an account
#[derive(Debug, Clone)]
pub struct Contact {
    /// Contact identifier (buddy name or room name without suffix)
    pub name: String,
    /// True when the transcript directory denotes a chat room
    pub is_group_chat: bool,
    aliases: Vec<String>,
    /// Messages in parse order
    pub messages: Vec<Message>,
}

impl Contact {
    /// Create an empty contact
    #[must_use]
    pub fn new(name: &str, is_group_chat: bool) -> Self {
        Self {
            name: name.to_string(),
            is_group_chat,
            aliases: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Sender names seen for this contact, in first-seen order
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Record a sender name; names already known are ignored
    pub fn add_alias(&mut self, alias: &str) {
        if !self.knows_alias(alias) {
            self.aliases.push(alias.to_string());
        }
    }

    /// Whether `alias` has been seen as a sender for this contact
    #[must_use]
    pub fn knows_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|known| known == alias)
    }
}

/// A local account under a protocol
#[derive(Debug, Clone)]
pub struct Account {
    /// Account name (directory name)
    pub name: String,
    /// Contacts in first-seen order
    pub contacts: Vec<Contact>,
}

impl Account {
    /// Create an account with no contacts
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            contacts: Vec::new(),
        }
    }
}

/// A messaging protocol (`jabber`, `icq`, ...)
#[derive(Debug, Clone)]
pub struct Protocol {
    /// Protocol name (directory name)
    pub name: String,
    /// Accounts in first-seen order
    pub accounts: Vec<Account>,
}

impl Protocol {
    /// Create a protocol with no accounts
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accounts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(MessageKind::Unknown.code(), None);
        assert_eq!(MessageKind::GroupChat.code(), Some(2));
        assert_eq!(MessageKind::Incoming.code(), Some(4));
        assert_eq!(MessageKind::Outgoing.code(), Some(6));
    }

    #[test]
    fn test_aliases_keep_first_seen_order() {
        let mut contact = Contact::new("bob@example.org", false);
        contact.add_alias("Bob");
        contact.add_alias("me");
        contact.add_alias("Bob");

        assert_eq!(contact.aliases(), ["Bob".to_string(), "me".to_string()]);
        assert!(contact.knows_alias("me"));
        assert!(!contact.knows_alias("Alice"));
    }
}
