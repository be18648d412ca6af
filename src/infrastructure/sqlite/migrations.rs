use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS index_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS index_vectors (
            position INTEGER PRIMARY KEY,
            profile_id INTEGER NOT NULL UNIQUE,
            vector BLOB NOT NULL
        );
        "
    ).map_err(|e| format!("Migration failed: {e}"))
}
