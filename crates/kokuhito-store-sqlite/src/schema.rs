//! SQL schema for the Kokuhito SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Both case→person references carry `ON DELETE CASCADE`: deleting a
/// person removes every case naming them as requester or related person.
/// That invariant lives here, not in application code, so no caller can
/// leave a dangling half of it behind.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL CHECK (length(trim(name)) > 0),
    created_at  TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS cases (
    id                 TEXT PRIMARY KEY,
    requester_id       TEXT NOT NULL
                         REFERENCES people(id) ON DELETE CASCADE,
    related_person_id  TEXT NOT NULL
                         REFERENCES people(id) ON DELETE CASCADE,
    vision_1           TEXT,            -- NULL when blank, never ''
    vision_2           TEXT,
    resolution_comment TEXT,
    is_resolved        INTEGER NOT NULL DEFAULT 0,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_requester_idx ON cases(requester_id);
CREATE INDEX IF NOT EXISTS cases_related_idx   ON cases(related_person_id);
CREATE INDEX IF NOT EXISTS cases_created_idx   ON cases(created_at);

PRAGMA user_version = 1;
";
