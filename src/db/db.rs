use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "pomodoro-grande.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database file in the user's data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let conn = Connection::open(db_file_path)?;

        Ok(Db { conn })
    }

    /// Opens a private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Db> {
        let conn = Connection::open_in_memory()?;

        Ok(Db { conn })
    }
}
