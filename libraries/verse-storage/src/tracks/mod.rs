//! Track catalog queries
//!
//! Rows are unique by `file_path`; the scanner is the only writer of the
//! scanned columns, while `set_lyrics` lets an external lyrics client record
//! results it downloaded.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use verse_core::{error::Result, NewTrack, Track, TrackId, TrackPath, TrackUpdate, VerseError};

const TRACK_COLUMNS: &str = r#"
    id, file_path, filename, title, artist, album, album_artist, genre,
    year, track_number, duration_seconds, file_size, fingerprint,
    has_lyrics, lyrics_source, artwork_path, last_scanned_at,
    created_at, updated_at
"#;

fn map_track(row: &SqliteRow) -> std::result::Result<Track, sqlx::Error> {
    Ok(Track {
        id: row.try_get("id")?,
        file_path: row.try_get("file_path")?,
        filename: row.try_get("filename")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        album_artist: row.try_get("album_artist")?,
        genre: row.try_get("genre")?,
        year: row.try_get::<Option<i64>, _>("year")?.map(|y| y as i32),
        track_number: row
            .try_get::<Option<i64>, _>("track_number")?
            .map(|n| n as i32),
        duration_seconds: row.try_get("duration_seconds")?,
        file_size: row.try_get("file_size")?,
        fingerprint: row.try_get("fingerprint")?,
        has_lyrics: row.try_get("has_lyrics")?,
        lyrics_source: row.try_get("lyrics_source")?,
        artwork_path: row.try_get("artwork_path")?,
        last_scanned_at: row.try_get("last_scanned_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_rows(rows: &[SqliteRow]) -> Result<Vec<Track>> {
    rows.iter()
        .map(|row| map_track(row).map_err(VerseError::from))
        .collect()
}

/// Get all tracks ordered by title
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks ORDER BY title COLLATE NOCASE, id"
    ))
    .fetch_all(pool)
    .await?;

    map_rows(&rows)
}

/// Get track by ID
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("SELECT {TRACK_COLUMNS} FROM tracks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref()
        .map(map_track)
        .transpose()
        .map_err(VerseError::from)
}

/// Get track by exact file path
pub async fn find_by_path(pool: &SqlitePool, file_path: &str) -> Result<Option<Track>> {
    let row = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE file_path = ?"
    ))
    .bind(file_path)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(map_track)
        .transpose()
        .map_err(VerseError::from)
}

/// Get every track's id and path
pub async fn list_paths(pool: &SqlitePool) -> Result<Vec<TrackPath>> {
    let rows = sqlx::query("SELECT id, file_path FROM tracks ORDER BY id")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok(TrackPath {
                id: row.try_get("id")?,
                file_path: row.try_get("file_path")?,
            })
        })
        .collect()
}

/// Search tracks by substring of title, artist, or album
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Track>> {
    let search_pattern = format!("%{}%", query);

    let rows = sqlx::query(&format!(
        r#"
        SELECT {TRACK_COLUMNS}
        FROM tracks
        WHERE title LIKE ?
           OR artist LIKE ?
           OR album LIKE ?
        ORDER BY title COLLATE NOCASE, id
        "#
    ))
    .bind(&search_pattern)
    .bind(&search_pattern)
    .bind(&search_pattern)
    .fetch_all(pool)
    .await?;

    map_rows(&rows)
}

/// Tracks that have no lyrics yet (candidates for a lyrics download)
pub async fn get_without_lyrics(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "SELECT {TRACK_COLUMNS} FROM tracks WHERE has_lyrics = 0 ORDER BY title COLLATE NOCASE, id"
    ))
    .fetch_all(pool)
    .await?;

    map_rows(&rows)
}

/// Insert a new track
pub async fn create(pool: &SqlitePool, track: NewTrack) -> Result<Track> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO tracks (
            file_path, filename, title, artist, album, album_artist, genre,
            year, track_number, duration_seconds, file_size, fingerprint,
            has_lyrics, lyrics_source, artwork_path, last_scanned_at,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&track.file_path)
    .bind(&track.filename)
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.album_artist)
    .bind(&track.genre)
    .bind(track.year)
    .bind(track.track_number)
    .bind(track.duration_seconds)
    .bind(track.file_size)
    .bind(&track.fingerprint)
    .bind(track.has_lyrics)
    .bind(&track.lyrics_source)
    .bind(&track.artwork_path)
    .bind(track.last_scanned_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| VerseError::not_found("Track", id.to_string()))
}

/// Rewrite the scanned fields of a track
pub async fn update(pool: &SqlitePool, id: TrackId, update: TrackUpdate) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        UPDATE tracks
        SET title = ?, artist = ?, album = ?, album_artist = ?, genre = ?,
            year = ?, track_number = ?, duration_seconds = ?, file_size = ?,
            fingerprint = ?, has_lyrics = ?, lyrics_source = ?, artwork_path = ?,
            last_scanned_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&update.title)
    .bind(&update.artist)
    .bind(&update.album)
    .bind(&update.album_artist)
    .bind(&update.genre)
    .bind(update.year)
    .bind(update.track_number)
    .bind(update.duration_seconds)
    .bind(update.file_size)
    .bind(&update.fingerprint)
    .bind(update.has_lyrics)
    .bind(&update.lyrics_source)
    .bind(&update.artwork_path)
    .bind(update.last_scanned_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(VerseError::not_found("Track", id.to_string()));
    }

    Ok(())
}

/// Record that a track was seen unchanged
pub async fn touch_scanned(pool: &SqlitePool, id: TrackId, scanned_at: i64) -> Result<()> {
    let result = sqlx::query("UPDATE tracks SET last_scanned_at = ? WHERE id = ?")
        .bind(scanned_at)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(VerseError::not_found("Track", id.to_string()));
    }

    Ok(())
}

/// Record lyrics found by an external client
pub async fn set_lyrics(
    pool: &SqlitePool,
    id: TrackId,
    has_lyrics: bool,
    lyrics_source: Option<&str>,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE tracks SET has_lyrics = ?, lyrics_source = ?, updated_at = ? WHERE id = ?",
    )
    .bind(has_lyrics)
    .bind(lyrics_source)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(VerseError::not_found("Track", id.to_string()));
    }

    Ok(())
}

/// Delete tracks by id in a single statement
///
/// Callers are expected to bound `ids`; the scanner sends batches of 100.
pub async fn delete_many(pool: &SqlitePool, ids: &[TrackId]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM tracks WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;

    Ok(result.rows_affected())
}

/// Count all tracks
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
