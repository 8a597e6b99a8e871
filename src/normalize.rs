//! Action and status line normalization
//!
//! Turns a [`RawRecord`] into a [`Message`] on its contact, or drops it.
//! Pidgin writes `/me` actions as `***Name does X`; when the transcript was
//! HTML the bold markup around the name renders as `*****Name** does X`.
//! Both shapes are rewritten back to `/me does X` once `Name` is a known alias.

use crate::models::{Contact, Message, MessageKind, RawRecord};

/// Prefix Pidgin puts in front of action lines
pub const ACTION_MARKER: &str = "***";
/// Canonical action command
pub const ME_COMMAND: &str = "/me";
/// Sender prefix of automated "message received from" notices
pub const RECEIVED_NOTICE_PREFIX: &str = "The following message received from";
/// Sender of encryption failure notices
pub const ENCRYPTION_ERROR_SENDER: &str = "OTR Error";

/// Rewrite the action prefix of `text` for the first known alias it names.
///
/// Returns the alias and the rewritten text. Aliases are tried in first-seen
/// order and every occurrence of the matched prefix is replaced.
fn rewrite_action(text: &str, aliases: &[String]) -> Option<(String, String)> {
    let mut rewritten = text.to_string();
    let mut resolved = None;

    for alias in aliases {
        let plain = format!("{ACTION_MARKER}{alias}");
        let bold = format!("{ACTION_MARKER}**{alias}**");
        if rewritten.starts_with(&plain) || rewritten.starts_with(&bold) {
            rewritten = rewritten
                .replace(&bold, ME_COMMAND)
                .replace(&plain, ME_COMMAND);
            resolved = Some(alias.clone());
        }
    }

    resolved.map(|alias| (alias, rewritten))
}

/// Status notices and sender-less lines never become messages
fn is_dropped(sender: Option<&str>) -> bool {
    match sender {
        None | Some("") => true,
        Some(name) => name.starts_with(RECEIVED_NOTICE_PREFIX) || name == ENCRYPTION_ERROR_SENDER,
    }
}

/// Normalize `record` and append the resulting message to `contact`.
///
/// Returns `false` when the record was a status line and got dropped.
pub fn ingest(contact: &mut Contact, record: RawRecord) -> bool {
    let RawRecord {
        mut sender,
        timestamp,
        mut body,
    } = record;

    if let Some(text) = body.as_deref().filter(|t| t.starts_with(ACTION_MARKER)) {
        if let Some((alias, rewritten)) = rewrite_action(text, contact.aliases()) {
            sender = Some(alias);
            body = Some(rewritten);
        }
    }

    if is_dropped(sender.as_deref()) {
        return false;
    }
    let Some(mut sender) = sender else {
        return false;
    };

    if sender.starts_with(ACTION_MARKER) {
        if let Some((alias, rewritten)) = rewrite_action(&sender, contact.aliases()) {
            body = Some(rewritten);
            sender = alias;
        }
    }

    contact.add_alias(&sender);
    let kind = if contact.is_group_chat {
        MessageKind::GroupChat
    } else {
        MessageKind::Unknown
    };

    contact.messages.push(Message {
        sender,
        timestamp,
        kind,
        body,
        subject: None,
    });
    true
}
