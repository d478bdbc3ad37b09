use crate::error::{Error, Result};
use crate::models::{Comment, CreateComment, UpdateComment};
use crate::services::posts;
use crate::Database;
use chrono::Utc;
use rusqlite::OptionalExtension;

const COMMENT_COLUMNS: &str = "id, post_id, text, created_at, updated_at";

pub fn comments_for_post(db: &Database, post_id: i64) -> Result<Vec<Comment>> {
    let conn = db.get()?;
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = ? ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let comments = stmt
        .query_map([post_id], row_to_comment)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(comments)
}

pub fn get_comment(db: &Database, id: i64) -> Result<Option<Comment>> {
    let conn = db.get()?;
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?");
    let comment = conn.query_row(&sql, [id], row_to_comment).optional()?;
    Ok(comment)
}

pub fn create_comment(db: &Database, post_id: i64, input: CreateComment) -> Result<Comment> {
    validate_text(&input.text)?;
    if !posts::exists(db, post_id)? {
        return Err(Error::NotFound("post"));
    }

    let conn = db.get()?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO comments (post_id, text, created_at, updated_at) VALUES (?, ?, ?, ?)",
        (post_id, &input.text, &now, &now),
    )?;
    let id = conn.last_insert_rowid();
    get_comment(db, id)?.ok_or(Error::NotFound("comment"))
}

/// Fails with NotFound before touching the store when the comment id does
/// not exist. A comment cannot be moved to another post; a body postId
/// that contradicts the stored one is rejected.
pub fn update_comment(db: &Database, id: i64, input: UpdateComment) -> Result<Comment> {
    validate_text(&input.text)?;
    let existing = get_comment(db, id)?.ok_or(Error::NotFound("comment"))?;
    if input.post_id.is_some_and(|post_id| post_id != existing.post_id) {
        return Err(Error::Validation(
            "postId in body does not match comment".into(),
        ));
    }

    let conn = db.get()?;
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE comments SET text = ?, updated_at = ? WHERE id = ?",
        (&input.text, &now, existing.id),
    )?;
    get_comment(db, id)?.ok_or(Error::NotFound("comment"))
}

/// Idempotent delete; no existence check.
pub fn delete_comment(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM comments WHERE id = ?", [id])?;
    Ok(())
}

fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Validation("comment text must not be empty".into()));
    }
    Ok(())
}

fn row_to_comment(row: &rusqlite::Row) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
