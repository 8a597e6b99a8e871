//! Destination database schema definitions
//!
//! Table and column names of Gajim's history database, used with rusqlite.

/// Known conversation partners and rooms
pub mod jids {
    /// Table name
    pub const TABLE: &str = "jids";
    /// Primary key column
    pub const JID_ID: &str = "jid_id";
    /// Bare JID or room address column
    pub const JID: &str = "jid";
    /// 0 for one-to-one partners, 1 for rooms
    pub const TYPE: &str = "type";

    /// `type` value for one-to-one partners
    pub const TYPE_NORMAL: i64 = 0;
    /// `type` value for chat rooms
    pub const TYPE_ROOM: i64 = 1;
}

/// Message log lines
pub mod logs {
    /// Table name
    pub const TABLE: &str = "logs";
    /// Primary key column
    pub const LOG_LINE_ID: &str = "log_line_id";
    /// Foreign key to the jids table
    pub const JID_ID: &str = "jid_id";
    /// Room nickname of the sender (room lines only)
    pub const CONTACT_NAME: &str = "contact_name";
    /// Unix timestamp column
    pub const TIME: &str = "time";
    /// Kind code column
    pub const KIND: &str = "kind";
    /// Presence show column
    pub const SHOW: &str = "show";
    /// Message text column
    pub const MESSAGE: &str = "message";
    /// Subject column
    pub const SUBJECT: &str = "subject";
}

/// DDL for an empty history database with the tables the importer writes to
pub const HISTORY_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS jids(
    jid_id INTEGER PRIMARY KEY AUTOINCREMENT UNIQUE,
    jid TEXT UNIQUE,
    type INTEGER
);

CREATE TABLE IF NOT EXISTS logs(
    log_line_id INTEGER PRIMARY KEY AUTOINCREMENT UNIQUE,
    jid_id INTEGER,
    contact_name TEXT,
    time INTEGER,
    kind INTEGER,
    show INTEGER,
    message TEXT,
    subject TEXT
);

CREATE INDEX IF NOT EXISTS idx_logs_jid_id_time ON logs (jid_id, time DESC);
";
