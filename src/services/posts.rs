use crate::error::{Error, Result};
use crate::models::{CreatePost, Post, UpdatePost};
use crate::services::tags;
use crate::Database;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;

/// Filter parsed from the raw search box input. A leading `#` selects
/// posts carrying that exact tag; anything else matches against titles
/// (empty input matches every post).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    Tag(String),
    Title(String),
}

impl SearchFilter {
    pub fn parse(term: &str) -> Self {
        match term.strip_prefix('#') {
            Some(tag) => Self::Tag(tag.to_string()),
            None => Self::Title(term.to_string()),
        }
    }
}

const POST_COLUMNS: &str = "p.id, p.title, p.text, p.likes_count, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id), \
     p.created_at, p.updated_at";

pub fn create_post(db: &Database, input: CreatePost) -> Result<Post> {
    validate_post(&input.title, &input.text)?;

    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let now = Utc::now().to_rfc3339();
    tx.execute(
        "INSERT INTO posts (title, text, likes_count, created_at, updated_at) VALUES (?, ?, 0, ?, ?)",
        (&input.title, &input.text, &now, &now),
    )?;
    let post_id = tx.last_insert_rowid();
    link_tags(&tx, post_id, &input.tags)?;

    let post = load_post(&tx, post_id)?.ok_or(Error::NotFound("post"))?;
    tx.commit()?;
    Ok(post)
}

pub fn get_post(db: &Database, id: i64) -> Result<Option<Post>> {
    let conn = db.get()?;
    load_post(&conn, id)
}

/// Filtered, ordered page of posts, most recent (highest id) first.
/// `page_number` is 1-based. Title matching uses SQL LIKE and is therefore
/// case-insensitive for ASCII; tag matching is exact.
pub fn search_posts(
    db: &Database,
    term: &str,
    page_number: usize,
    page_size: usize,
) -> Result<Vec<Post>> {
    let conn = db.get()?;
    let offset = page_number.saturating_sub(1) * page_size;

    let mut posts = match SearchFilter::parse(term) {
        SearchFilter::Title(title) => {
            let sql = format!(
                "SELECT {POST_COLUMNS} FROM posts p
                 WHERE p.title LIKE '%' || ?1 || '%' ESCAPE '\\'
                 ORDER BY p.id DESC LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map((escape_like(&title), page_size, offset), row_to_post)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
        SearchFilter::Tag(name) => {
            let sql = format!(
                "SELECT {POST_COLUMNS} FROM posts p
                 JOIN post_tags pt ON pt.post_id = p.id
                 JOIN tags t ON t.id = pt.tag_id
                 WHERE t.name = ?1
                 ORDER BY p.id DESC LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map((name, page_size, offset), row_to_post)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        }
    };

    attach_tags(&conn, &mut posts)?;
    Ok(posts)
}

/// Count of posts matching the same filter as `search_posts`.
pub fn count_posts(db: &Database, term: &str) -> Result<i64> {
    let conn = db.get()?;
    let count = match SearchFilter::parse(term) {
        SearchFilter::Title(title) => conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE title LIKE '%' || ?1 || '%' ESCAPE '\\'",
            [escape_like(&title)],
            |row| row.get(0),
        )?,
        SearchFilter::Tag(name) => conn.query_row(
            "SELECT COUNT(*) FROM posts p
             JOIN post_tags pt ON pt.post_id = p.id
             JOIN tags t ON t.id = pt.tag_id
             WHERE t.name = ?1",
            [name],
            |row| row.get(0),
        )?,
    };
    Ok(count)
}

/// Full replace of title, text and the tag set for an existing post. The
/// old associations are dropped and reinserted from the submitted list,
/// all inside one transaction.
pub fn update_post(db: &Database, id: i64, input: UpdatePost) -> Result<Post> {
    validate_post(&input.title, &input.text)?;

    let mut conn = db.get()?;
    let tx = conn.transaction()?;
    let now = Utc::now().to_rfc3339();
    let changed = tx.execute(
        "UPDATE posts SET title = ?, text = ?, updated_at = ? WHERE id = ?",
        (&input.title, &input.text, &now, id),
    )?;
    if changed == 0 {
        return Err(Error::NotFound("post"));
    }
    tx.execute("DELETE FROM post_tags WHERE post_id = ?", [id])?;
    link_tags(&tx, id, &input.tags)?;

    let post = load_post(&tx, id)?.ok_or(Error::NotFound("post"))?;
    tx.commit()?;
    Ok(post)
}

/// Idempotent delete. Comments and tag associations go with the post via
/// ON DELETE CASCADE; tag rows themselves are left alone.
pub fn delete_post(db: &Database, id: i64) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM posts WHERE id = ?", [id])?;
    Ok(())
}

/// Single atomic increment issued to the store, so concurrent likes from
/// different requests never lose an update. Returns the new count.
pub fn increment_likes(db: &Database, id: i64) -> Result<i64> {
    let conn = db.get()?;
    let count = conn
        .query_row(
            "UPDATE posts SET likes_count = likes_count + 1 WHERE id = ? RETURNING likes_count",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    count.ok_or(Error::NotFound("post"))
}

pub fn exists(db: &Database, id: i64) -> Result<bool> {
    let conn = db.get()?;
    let found = conn
        .query_row("SELECT 1 FROM posts WHERE id = ?", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

// LIKE treats % and _ as wildcards; escape them so the search term only
// matches as a literal substring.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn validate_post(title: &str, text: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".into()));
    }
    if text.trim().is_empty() {
        return Err(Error::Validation("text must not be empty".into()));
    }
    Ok(())
}

fn link_tags(conn: &Connection, post_id: i64, names: &[String]) -> Result<()> {
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let tag_id = tags::ensure_tag(conn, name)?;
        conn.execute(
            "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)",
            (post_id, tag_id),
        )?;
    }
    Ok(())
}

fn row_to_post(row: &rusqlite::Row) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        likes_count: row.get(3)?,
        comments_count: row.get(4)?,
        tags: Vec::new(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn load_post(conn: &Connection, id: i64) -> Result<Option<Post>> {
    let sql = format!("SELECT {POST_COLUMNS} FROM posts p WHERE p.id = ?");
    let post = conn.query_row(&sql, [id], row_to_post).optional()?;
    let Some(mut post) = post else {
        return Ok(None);
    };
    post.tags = tags_for_post(conn, id)?;
    Ok(Some(post))
}

fn tags_for_post(conn: &Connection, post_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name FROM tags t
         JOIN post_tags pt ON t.id = pt.tag_id
         WHERE pt.post_id = ? ORDER BY t.id",
    )?;
    let names = stmt
        .query_map([post_id], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

// Batch fetch the tag names for a whole page of posts in one query.
fn attach_tags(conn: &Connection, posts: &mut [Post]) -> Result<()> {
    if posts.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let placeholders: String = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!(
        "SELECT pt.post_id, t.name FROM tags t
         JOIN post_tags pt ON t.id = pt.tag_id
         WHERE pt.post_id IN ({})
         ORDER BY t.id",
        placeholders
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> =
        ids.iter().map(|id| id as &dyn rusqlite::ToSql).collect();

    let mut by_post: HashMap<i64, Vec<String>> = HashMap::new();
    let rows = stmt.query_map(params.as_slice(), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (post_id, name) = row?;
        by_post.entry(post_id).or_default().push(name);
    }

    for post in posts.iter_mut() {
        post.tags = by_post.remove(&post.id).unwrap_or_default();
    }
    Ok(())
}
