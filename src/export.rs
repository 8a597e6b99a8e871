//! Merge of the parsed log tree into a Gajim history database
//!
//! Only contacts under the `jabber` protocol map onto the destination schema.
//! Every row is checked for an exact existing match before it is inserted,
//! so exporting the same transcripts twice leaves the database unchanged.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Transaction};
use tracing::{info, warn};

use crate::error::{ImportError, Result};
use crate::models::{Contact, MessageKind};
use crate::schema::{jids, logs, HISTORY_SCHEMA};
use crate::store::LogStore;

/// The only protocol whose contacts are exported
pub const EXPORT_PROTOCOL: &str = "jabber";

/// Outcome for one exported contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactExport {
    /// Contact name as written to `jids.jid`
    pub name: String,
    /// True when the contact had no `jids` row yet
    pub created: bool,
    /// Log rows inserted
    pub inserted: usize,
    /// Messages already present in the destination
    pub duplicates: usize,
    /// Messages with a kind that has no destination mapping
    pub skipped: usize,
}

/// Outcome of one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Per-contact results in store order
    pub contacts: Vec<ContactExport>,
}

impl ExportSummary {
    /// Log rows inserted across all contacts
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.contacts.iter().map(|c| c.inserted).sum()
    }

    /// Messages skipped as duplicates across all contacts
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.contacts.iter().map(|c| c.duplicates).sum()
    }

    /// Contacts newly added to `jids`
    #[must_use]
    pub fn created(&self) -> usize {
        self.contacts.iter().filter(|c| c.created).count()
    }
}

/// A Gajim history database opened for merging
pub struct Destination {
    conn: Connection,
}

impl Destination {
    /// Open an existing history database
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(busy_timeout)?;

        let destination = Self { conn };
        destination.check_schema()?;
        Ok(destination)
    }

    /// Create a history database with empty tables at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(HISTORY_SCHEMA)?;
        Ok(Self { conn })
    }

    fn check_schema(&self) -> Result<()> {
        let found: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
            params![jids::TABLE, logs::TABLE],
            |row| row.get(0),
        )?;

        if found == 2 {
            Ok(())
        } else {
            Err(ImportError::SchemaMismatch(format!(
                "expected tables `{}` and `{}`",
                jids::TABLE,
                logs::TABLE
            )))
        }
    }

    /// Borrow the underlying connection
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Merge every exportable contact of `store`, committing once at the end.
    ///
    /// `on_contact` is called with each contact's result as it completes.
    pub fn export(
        &mut self,
        store: &LogStore,
        mut on_contact: impl FnMut(&ContactExport),
    ) -> Result<ExportSummary> {
        let tx = self.conn.transaction()?;
        let mut summary = ExportSummary::default();

        let contacts = store
            .contacts()
            .filter(|(protocol, _, _)| *protocol == EXPORT_PROTOCOL)
            .map(|(_, _, contact)| contact);

        for contact in contacts {
            let result = export_contact(&tx, contact)?;
            on_contact(&result);
            summary.contacts.push(result);
        }

        tx.commit()?;
        info!(
            contacts = summary.contacts.len(),
            created = summary.created(),
            inserted = summary.inserted(),
            duplicates = summary.duplicates(),
            "Export committed"
        );
        Ok(summary)
    }
}

/// Look up the `jid_id` for `contact`, inserting a `jids` row when missing
fn ensure_jid(tx: &Transaction<'_>, contact: &Contact) -> Result<(i64, bool)> {
    let existing: Option<i64> = tx
        .query_row(
            &format!("SELECT {} FROM {} WHERE {} = ?1", jids::JID_ID, jids::TABLE, jids::JID),
            params![contact.name],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(jid_id) = existing {
        return Ok((jid_id, false));
    }

    let jid_type = if contact.is_group_chat {
        jids::TYPE_ROOM
    } else {
        jids::TYPE_NORMAL
    };
    tx.execute(
        &format!("INSERT INTO {} ({}, {}) VALUES (?1, ?2)", jids::TABLE, jids::JID, jids::TYPE),
        params![contact.name, jid_type],
    )?;
    Ok((tx.last_insert_rowid(), true))
}

fn export_contact(tx: &Transaction<'_>, contact: &Contact) -> Result<ContactExport> {
    let (jid_id, created) = ensure_jid(tx, contact)?;
    let mut result = ContactExport {
        name: contact.name.clone(),
        created,
        inserted: 0,
        duplicates: 0,
        skipped: 0,
    };

    // IS instead of = so NULL bodies still compare equal
    let mut room_exists = tx.prepare_cached(&format!(
        "SELECT 1 FROM {} WHERE {} = ?1 AND {} IS ?2 AND {} = ?3 AND {} = ?4 AND {} IS ?5 LIMIT 1",
        logs::TABLE,
        logs::JID_ID,
        logs::CONTACT_NAME,
        logs::TIME,
        logs::KIND,
        logs::MESSAGE
    ))?;
    let mut room_insert = tx.prepare_cached(&format!(
        "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4, ?5)",
        logs::TABLE,
        logs::JID_ID,
        logs::CONTACT_NAME,
        logs::TIME,
        logs::KIND,
        logs::MESSAGE
    ))?;
    let mut direct_exists = tx.prepare_cached(&format!(
        "SELECT 1 FROM {} WHERE {} = ?1 AND {} = ?2 AND {} = ?3 AND {} IS ?4 LIMIT 1",
        logs::TABLE,
        logs::JID_ID,
        logs::TIME,
        logs::KIND,
        logs::MESSAGE
    ))?;
    let mut direct_insert = tx.prepare_cached(&format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4)",
        logs::TABLE,
        logs::JID_ID,
        logs::TIME,
        logs::KIND,
        logs::MESSAGE
    ))?;

    for message in &contact.messages {
        let inserted = match (message.kind, message.kind.code()) {
            (MessageKind::GroupChat, Some(kind)) => {
                let key = params![jid_id, message.sender, message.timestamp, kind, message.body];
                if room_exists.exists(key)? {
                    false
                } else {
                    room_insert.execute(key)?;
                    true
                }
            }
            (MessageKind::Incoming | MessageKind::Outgoing, Some(kind)) => {
                let key = params![jid_id, message.timestamp, kind, message.body];
                if direct_exists.exists(key)? {
                    false
                } else {
                    direct_insert.execute(key)?;
                    true
                }
            }
            _ => {
                result.skipped += 1;
                continue;
            }
        };

        if inserted {
            result.inserted += 1;
        } else {
            result.duplicates += 1;
        }
    }

    if result.skipped > 0 {
        warn!(contact = %contact.name, skipped = result.skipped, "Skipped unclassified messages");
    }
    Ok(result)
}
