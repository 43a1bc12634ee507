// Session Store
// Persists the currently loaded ledger in a single-slot SQLite table so one
// load can serve many analysis invocations without re-parsing the source.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::{AnalyzerError, Result};
use crate::model::{Ledger, Transaction};

/// Timestamp wire format. `%.f` keeps fractional seconds only when present,
/// so values round-trip exactly.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Open (or create) the session database at the given path.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(conn)
}

/// Persist a ledger as the current session, replacing any prior one.
///
/// Row order, full amount precision (REAL column) and full timestamp
/// precision are preserved so `load` returns the ledger field-for-field.
pub fn save(conn: &Connection, ledger: &Ledger) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS session (
            seq INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount REAL NOT NULL
        )",
        [],
    )?;

    // Last writer wins: the slot holds exactly one ledger.
    conn.execute("DELETE FROM session", [])?;

    let mut stmt = conn.prepare(
        "INSERT INTO session (seq, date, description, amount) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (seq, tx) in ledger.iter().enumerate() {
        stmt.execute(params![
            seq as i64,
            tx.date.format(TIMESTAMP_FORMAT).to_string(),
            tx.description,
            tx.amount,
        ])?;
    }

    Ok(())
}

/// Fetch the current session's ledger.
///
/// No session slot at all is `NoSession`; an existing but empty slot is a
/// valid empty ledger. A stored timestamp that no longer parses means the
/// blob is corrupt, which is a `Persistence` failure, not `Parse`.
pub fn load(conn: &Connection) -> Result<Ledger> {
    if !session_exists(conn)? {
        return Err(AnalyzerError::NoSession);
    }

    let mut stmt =
        conn.prepare("SELECT date, description, amount FROM session ORDER BY seq")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;

    let mut transactions = Vec::new();
    for row in rows {
        let (date_raw, description, amount) = row?;
        let date = NaiveDateTime::parse_from_str(&date_raw, TIMESTAMP_FORMAT)
            .map_err(|_| corrupt(&date_raw))?;
        transactions.push(Transaction::new(date, description, amount));
    }

    Ok(Ledger::new(transactions))
}

/// Discard the current session. No-op when none exists.
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DROP TABLE IF EXISTS session", [])?;
    Ok(())
}

/// Whether a session slot exists at all.
pub fn session_exists(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'session'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn corrupt(value: &str) -> AnalyzerError {
    AnalyzerError::Persistence(rusqlite::Error::InvalidColumnType(
        0,
        format!("corrupt session timestamp '{}'", value),
        rusqlite::types::Type::Text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(y: i32, m: u32, d: u32, description: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            description,
            amount,
        )
    }

    fn sample_ledger() -> Ledger {
        Ledger::new(vec![
            tx(2024, 1, 1, "Coffee", -4.50),
            tx(2024, 1, 2, "Salary", 2000.00),
            tx(2024, 1, 2, "Coffee", -4.50),
        ])
    }

    #[test]
    fn test_load_without_save_is_no_session() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(matches!(load(&conn), Err(AnalyzerError::NoSession)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let ledger = sample_ledger();
        save(&conn, &ledger).unwrap();
        let restored = load(&conn).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_round_trip_preserves_precision() {
        let conn = Connection::open_in_memory().unwrap();
        let odd_amount = 1234.567890123456;
        let with_time = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_milli_opt(13, 45, 30, 250)
                .unwrap(),
            "Wire transfer",
            odd_amount,
        );
        let ledger = Ledger::new(vec![with_time]);
        save(&conn, &ledger).unwrap();
        let restored = load(&conn).unwrap();
        assert_eq!(restored.transactions()[0].amount, odd_amount);
        assert_eq!(restored.transactions()[0].date, ledger.transactions()[0].date);
    }

    #[test]
    fn test_save_replaces_prior_session() {
        let conn = Connection::open_in_memory().unwrap();
        save(&conn, &sample_ledger()).unwrap();
        let replacement = Ledger::new(vec![tx(2025, 6, 1, "Rent", -900.0)]);
        save(&conn, &replacement).unwrap();
        let restored = load(&conn).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.transactions()[0].description, "Rent");
    }

    #[test]
    fn test_empty_ledger_is_a_valid_session() {
        let conn = Connection::open_in_memory().unwrap();
        save(&conn, &Ledger::default()).unwrap();
        let restored = load(&conn).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_clear_removes_session() {
        let conn = Connection::open_in_memory().unwrap();
        save(&conn, &sample_ledger()).unwrap();
        clear(&conn).unwrap();
        assert!(matches!(load(&conn), Err(AnalyzerError::NoSession)));
    }

    #[test]
    fn test_clear_without_session_is_noop() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(clear(&conn).is_ok());
        assert!(clear(&conn).is_ok());
    }

    #[test]
    fn test_corrupt_timestamp_is_persistence_error() {
        let conn = Connection::open_in_memory().unwrap();
        save(&conn, &sample_ledger()).unwrap();
        conn.execute("UPDATE session SET date = 'garbage' WHERE seq = 0", [])
            .unwrap();
        assert!(matches!(load(&conn), Err(AnalyzerError::Persistence(_))));
    }

    #[test]
    fn test_open_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");
        let conn = open(&path).unwrap();
        save(&conn, &sample_ledger()).unwrap();
        drop(conn);

        let reopened = open(&path).unwrap();
        let restored = load(&reopened).unwrap();
        assert_eq!(restored.len(), 3);
    }
}
