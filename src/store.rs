//! In-memory log store and identity resolution
//!
//! The store is built once per run: every transcript directory is resolved to
//! a [`ContactRef`] and the parsed messages accumulate on that contact.

use std::collections::HashMap;
use std::path::{Component, Path};

use crate::error::{ImportError, Result};
use crate::models::{Account, Contact, Message, Protocol};

/// Directory suffix marking a multi-user chat room
pub const GROUP_CHAT_SUFFIX: &str = ".chat";

/// Stable handle to a contact inside a [`LogStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactRef {
    protocol: usize,
    account: usize,
    contact: usize,
}

/// Protocol -> account -> contact -> message tree
#[derive(Debug, Default)]
pub struct LogStore {
    protocols: Vec<Protocol>,
    index: HashMap<(String, String, String), ContactRef>,
}

impl LogStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a `<protocol>/<account>/<contact>[.chat]` directory to its contact
    ///
    /// Only the last three path components are used, so absolute and
    /// relative paths resolve the same way.
    pub fn resolve(&mut self, contact_dir: &Path) -> Result<ContactRef> {
        let mut components = contact_dir.components().rev().filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        });

        let (Some(contact), Some(account), Some(protocol)) =
            (components.next(), components.next(), components.next())
        else {
            return Err(ImportError::InvalidLayout(contact_dir.to_path_buf()));
        };

        Ok(self.resolve_names(&protocol, &account, &contact))
    }

    /// Resolve pre-split path components, creating missing nodes
    pub fn resolve_names(&mut self, protocol: &str, account: &str, dir_name: &str) -> ContactRef {
        let (contact_name, is_group_chat) = match dir_name.strip_suffix(GROUP_CHAT_SUFFIX) {
            Some(room) => (room, true),
            None => (dir_name, false),
        };

        let key = (
            protocol.to_string(),
            account.to_string(),
            contact_name.to_string(),
        );
        if let Some(found) = self.index.get(&key) {
            return *found;
        }

        let protocol_idx = match self.protocols.iter().position(|p| p.name == protocol) {
            Some(idx) => idx,
            None => {
                self.protocols.push(Protocol::new(protocol));
                self.protocols.len() - 1
            }
        };

        let accounts = &mut self.protocols[protocol_idx].accounts;
        let account_idx = match accounts.iter().position(|a| a.name == account) {
            Some(idx) => idx,
            None => {
                accounts.push(Account::new(account));
                accounts.len() - 1
            }
        };

        let contacts = &mut accounts[account_idx].contacts;
        contacts.push(Contact::new(contact_name, is_group_chat));

        let handle = ContactRef {
            protocol: protocol_idx,
            account: account_idx,
            contact: contacts.len() - 1,
        };
        tracing::debug!(protocol, account, contact = contact_name, is_group_chat, "New contact");
        self.index.insert(key, handle);
        handle
    }

    /// Contact behind a handle
    #[must_use]
    pub fn contact(&self, handle: ContactRef) -> &Contact {
        &self.account(handle).contacts[handle.contact]
    }

    /// Mutable contact behind a handle
    pub fn contact_mut(&mut self, handle: ContactRef) -> &mut Contact {
        &mut self.protocols[handle.protocol].accounts[handle.account].contacts[handle.contact]
    }

    /// Account owning the contact behind a handle
    #[must_use]
    pub fn account(&self, handle: ContactRef) -> &Account {
        &self.protocols[handle.protocol].accounts[handle.account]
    }

    /// Protocol owning the contact behind a handle
    #[must_use]
    pub fn protocol(&self, handle: ContactRef) -> &Protocol {
        &self.protocols[handle.protocol]
    }

    /// All protocols in first-seen order
    #[must_use]
    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    /// Look up a protocol by name
    #[must_use]
    pub fn find_protocol(&self, name: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.name == name)
    }

    /// Every contact with the names of its protocol and account
    pub fn contacts(&self) -> impl Iterator<Item = (&str, &str, &Contact)> {
        self.protocols.iter().flat_map(|protocol| {
            protocol.accounts.iter().flat_map(move |account| {
                account
                    .contacts
                    .iter()
                    .map(move |contact| (protocol.name.as_str(), account.name.as_str(), contact))
            })
        })
    }

    /// Every message in the store, mutably
    pub fn messages_mut(&mut self) -> impl Iterator<Item = &mut Message> {
        self.protocols
            .iter_mut()
            .flat_map(|p| p.accounts.iter_mut())
            .flat_map(|a| a.contacts.iter_mut())
            .flat_map(|c| c.messages.iter_mut())
    }

    /// Total number of messages held
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contacts().map(|(_, _, c)| c.messages.len()).sum()
    }
}
