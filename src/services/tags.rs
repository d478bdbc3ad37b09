use crate::error::Result;
use crate::models::Tag;
use crate::Database;
use chrono::Utc;
use rusqlite::Connection;

/// Get-or-create a tag by exact name. Names are case-sensitive; repeated
/// calls with the same name return the same id. Takes a connection so
/// post create/update can run it inside their transaction.
pub fn ensure_tag(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (name, created_at) VALUES (?, ?)",
        (name, Utc::now().to_rfc3339()),
    )?;
    let id = conn.query_row("SELECT id FROM tags WHERE name = ?", [name], |row| {
        row.get(0)
    })?;
    Ok(id)
}

pub fn list_tags(db: &Database) -> Result<Vec<Tag>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM tags ORDER BY name")?;
    let tags = stmt
        .query_map([], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}
