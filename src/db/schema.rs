//! Table bootstrap
//!
//! Creates the `restaurants` table when it is missing. There is no
//! versioning: the schema is fixed.

use crate::core::error::Result;
use rusqlite::Connection;
use tracing::info;

/// `AUTOINCREMENT` keeps ids from ever being handed out twice, even after deletes
const RESTAURANTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    cuisine TEXT NOT NULL,
    rating REAL NOT NULL
)
"#;

pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(RESTAURANTS_TABLE)?;
    info!("Restaurants table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('restaurants') ORDER BY cid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["id", "name", "cuisine", "rating"]);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO restaurants (name, cuisine, rating) VALUES ('a', 'b', 1.0)",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM restaurants WHERE id = 1", []).unwrap();
        conn.execute(
            "INSERT INTO restaurants (name, cuisine, rating) VALUES ('c', 'd', 2.0)",
            [],
        )
        .unwrap();

        let id: i64 = conn
            .query_row("SELECT id FROM restaurants", [], |row| row.get(0))
            .unwrap();
        assert_eq!(id, 2);
    }
}
