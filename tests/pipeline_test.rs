use std::fs;
use std::path::Path;
use std::time::Duration;

use proptest::prelude::*;
use rusqlite::Connection;
use tempfile::{tempdir, TempDir};

use pidgin_to_gajim::classify::{classify_ownership, sender_names};
use pidgin_to_gajim::parser::{TextTranscriptParser, TranscriptFormat, TranscriptParser};
use pidgin_to_gajim::{Destination, ImportError, Importer, LogStore, MessageKind};

const BOB_HTML: &str = r##"<html><head><title>Conversation with bob@example.org at Sun 07 May 2023 14:03:00 CEST on me@example.org/home (jabber)</title></head><body><h3>Conversation with bob@example.org</h3>
<font color="#A82F2F"><font size="2">(14:03:22)</font> <b>Bob:</b></font> hi &amp; welcome<br/>
<font color="#16569E"><font size="2">(14:04:01)</font> <b>me:</b></font> thanks<br/>
<font size="2">(14:05:10)</font><b> Bob has signed off.</b><br/>
<font color="#062585"><font size="2">(14:06:00)</font> <b>***Bob</b></font> waves<br/>
</body></html>
"##;

const BOB_TEXT: &str = "Conversation with bob@example.org at Mon 08 May 2023 09:00:00 CEST on me@example.org/home (jabber)
(09:00:00) me: morning
(09:00:05) Bob: hello
second line
(09:01:00) Bob has signed off.
";

const ROOM_TEXT: &str = "Conversation with rust@conference.example.org at Sun 07 May 2023 12:00:00 CEST on me@example.org/home (jabber)
(12:00:00) carol: hi all
(12:00:10) dave: hey
(12:00:20) The following message received from carol was not encrypted: oops
";

const ICQ_TEXT: &str = "(10:00:00) 654321: yo\n";

fn write_transcript(root: &Path, parts: [&str; 3], file_name: &str, content: &str) {
    let dir = root.join(parts[0]).join(parts[1]).join(parts[2]);
    fs::create_dir_all(&dir).expect("Failed to create contact directory");
    fs::write(dir.join(file_name), content).expect("Failed to write transcript");
}

fn transcript_tree() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let root = temp_dir.path();
    let account = "me@example.org";

    write_transcript(root, ["jabber", account, "bob@example.org"], "2023-05-08.090000+0200CEST.txt", BOB_TEXT);
    write_transcript(root, ["jabber", account, "bob@example.org"], "2023-05-07.140300+0200CEST.html", BOB_HTML);
    write_transcript(
        root,
        ["jabber", account, "rust@conference.example.org.chat"],
        "2023-05-07.120000+0200CEST.txt",
        ROOM_TEXT,
    );
    write_transcript(root, ["icq", "123456", "654321"], "2023-05-07.100000+0200CEST.txt", ICQ_TEXT);
    temp_dir
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).expect("Failed to run count query")
}

#[test]
fn test_scan_builds_store_from_tree() {
    let tree = transcript_tree();
    let importer = Importer::new().expect("Failed to build importer");
    let mut store = LogStore::new();

    let mut visited = Vec::new();
    let summary = importer
        .scan_tree(tree.path(), &mut store, |dir| visited.push(dir.to_path_buf()))
        .expect("Failed to scan tree");

    assert_eq!(summary.directories, 3);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.messages, 8);
    assert_eq!(visited.len(), 3);

    let jabber = store.find_protocol("jabber").expect("jabber protocol");
    let account = &jabber.accounts[0];
    assert_eq!(account.name, "me@example.org");

    let bob = account
        .contacts
        .iter()
        .find(|c| c.name == "bob@example.org")
        .expect("bob contact");
    assert!(!bob.is_group_chat);
    let bodies: Vec<_> = bob.messages.iter().map(|m| m.body.as_deref().unwrap_or("")).collect();
    // html before txt, action rewritten, status lines dropped
    assert_eq!(bodies, ["hi & welcome", "thanks", "/me waves", "morning", "hello\nsecond line"]);
    assert_eq!(bob.messages[2].sender, "Bob");

    let room = account
        .contacts
        .iter()
        .find(|c| c.name == "rust@conference.example.org")
        .expect("room contact");
    assert!(room.is_group_chat);
    assert_eq!(room.messages.len(), 2);
    assert!(room.messages.iter().all(|m| m.kind == MessageKind::GroupChat));

    // directories are walked in name order, so icq comes first
    assert_eq!(sender_names(&store), ["654321", "Bob", "me", "carol", "dave"]);
}

#[test]
fn test_full_import_is_idempotent() {
    let tree = transcript_tree();
    let temp_db = tempdir().expect("Failed to create temp directory");
    let db_path = temp_db.path().join("logs.db");
    Destination::create(&db_path).expect("Failed to create history database");

    let importer = Importer::new().expect("Failed to build importer");
    let mut store = LogStore::new();
    importer
        .scan_tree(tree.path(), &mut store, |_| {})
        .expect("Failed to scan tree");

    let classified = classify_ownership(&mut store, &["me".to_string()]);
    assert_eq!(classified.outgoing, 2);
    // the icq contact is classified too, it is only left out of the export
    assert_eq!(classified.incoming, 4);

    let mut destination = Destination::open(&db_path, Duration::from_secs(1)).expect("Failed to open");
    let first = destination.export(&store, |_| {}).expect("First export failed");
    assert_eq!(first.inserted(), 7);
    assert_eq!(first.duplicates(), 0);
    assert_eq!(first.created(), 2);

    let second = destination.export(&store, |_| {}).expect("Second export failed");
    assert_eq!(second.inserted(), 0);
    assert_eq!(second.duplicates(), 7);
    assert_eq!(second.created(), 0);

    let conn = destination.connection();
    assert_eq!(count(conn, "SELECT COUNT(*) FROM logs"), 7);
    assert_eq!(count(conn, "SELECT COUNT(*) FROM jids"), 2);
    assert_eq!(count(conn, "SELECT COUNT(*) FROM logs WHERE kind = 6"), 2);
    assert_eq!(count(conn, "SELECT COUNT(*) FROM logs WHERE kind = 4"), 3);
    assert_eq!(count(conn, "SELECT COUNT(*) FROM logs WHERE kind = 2"), 2);
    assert_eq!(count(conn, "SELECT COUNT(*) FROM jids WHERE jid = '654321'"), 0);

    let first_time: i64 = conn
        .query_row(
            "SELECT time FROM logs WHERE message = 'hi & welcome'",
            [],
            |row| row.get(0),
        )
        .expect("Failed to read time");
    assert_eq!(first_time, 1_683_468_202);
}

#[test]
fn test_file_without_date_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    write_transcript(temp_dir.path(), ["jabber", "me", "bob"], "notes.txt", "(09:00:00) Bob: hi\n");

    let importer = Importer::new().expect("Failed to build importer");
    let mut store = LogStore::new();
    let err = importer
        .scan_tree(temp_dir.path(), &mut store, |_| {})
        .expect_err("Scan should fail");
    assert!(matches!(err, ImportError::MissingDate(_)));
}

#[test]
fn test_other_files_are_ignored() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    write_transcript(temp_dir.path(), ["jabber", "me", "bob"], "notes.log", "not a transcript");
    write_transcript(temp_dir.path(), ["jabber", "me", "bob"], "2023-05-07.txt", "(09:00:00) Bob: hi\n");

    let importer = Importer::new().expect("Failed to build importer");
    let mut store = LogStore::new();
    let summary = importer
        .scan_tree(temp_dir.path(), &mut store, |_| {})
        .expect("Failed to scan tree");
    assert_eq!(summary.files, 1);
    assert_eq!(store.message_count(), 1);
}

proptest! {
    #[test]
    fn continuation_lines_join_into_one_body(lines in prop::collection::vec("[a-z][a-z ]{0,20}", 0..8)) {
        let parser = TextTranscriptParser::new().expect("Failed to build parser");
        let date = chrono::NaiveDate::from_ymd_opt(2023, 5, 7).expect("valid date");

        let mut content = String::from("(09:00:00) Alice: first\n");
        for line in &lines {
            content.push_str(line);
            content.push('\n');
        }
        let source = format!("2023-05-07.{}", TranscriptFormat::Text.extension());
        let records = parser
            .parse_str(date, &content, Path::new(&source))
            .expect("Failed to parse");

        prop_assert_eq!(records.len(), 1);
        let mut expected = vec!["first".to_string()];
        expected.extend(lines.iter().map(|l| l.trim().to_string()));
        let expected_body = expected.join("\n");
        prop_assert_eq!(records[0].body.as_deref(), Some(expected_body.as_str()));
    }
}
