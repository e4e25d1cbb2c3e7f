//! Tests for database initialization
//!
//! Covers automatic database creation on first run, idempotent reopen, and
//! the schema constraints the store relies on (unique accounts, unique
//! playlist membership, cascading deletes).

use mixboard_common::db::init_database;
use tempfile::tempdir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("mixboard.db");

    let result = init_database(&db_path).await;
    assert!(
        result.is_ok(),
        "Database initialization failed: {:?}",
        result.err()
    );
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("mixboard.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Second init must succeed and leave the schema intact
    let pool2 = init_database(&db_path).await;
    assert!(
        pool2.is_ok(),
        "Failed to open existing database: {:?}",
        pool2.err()
    );
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let dir = tempdir().unwrap();
    let pool = init_database(&dir.path().join("mixboard.db")).await.unwrap();

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(version, 1);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let dir = tempdir().unwrap();
    let pool = init_database(&dir.path().join("mixboard.db")).await.unwrap();

    sqlx::query("INSERT INTO users (username, email, password_hash, password_salt) VALUES ('alice', 'a@example.com', 'h', 's')")
        .execute(&pool)
        .await
        .unwrap();

    let dup = sqlx::query("INSERT INTO users (username, email, password_hash, password_salt) VALUES ('alice', 'other@example.com', 'h', 's')")
        .execute(&pool)
        .await;

    assert!(dup.is_err(), "Duplicate username should violate UNIQUE");
}

#[tokio::test]
async fn test_duplicate_playlist_track_rejected() {
    let dir = tempdir().unwrap();
    let pool = init_database(&dir.path().join("mixboard.db")).await.unwrap();

    sqlx::query("INSERT INTO users (username, email, password_hash, password_salt) VALUES ('bob', 'b@example.com', 'h', 's')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO playlists (user_id, name) VALUES (1, 'Mix')")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (1, 'track-a', 0)")
        .execute(&pool)
        .await
        .unwrap();

    // Same track in the same playlist violates the membership invariant
    let dup = sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (1, 'track-a', 1)")
        .execute(&pool)
        .await;
    assert!(dup.is_err(), "Duplicate track id should violate PRIMARY KEY");

    // Same track in a different playlist is fine
    sqlx::query("INSERT INTO playlists (user_id, name) VALUES (1, 'Other')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (2, 'track-a', 0)")
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_playlist_delete_cascades_membership() {
    let dir = tempdir().unwrap();
    let pool = init_database(&dir.path().join("mixboard.db")).await.unwrap();

    sqlx::query("INSERT INTO users (username, email, password_hash, password_salt) VALUES ('carol', 'c@example.com', 'h', 's')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO playlists (user_id, name) VALUES (1, 'Mix')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO playlist_tracks (playlist_id, track_id, position) VALUES (1, 'track-a', 0)")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM playlists WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlist_tracks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0, "Membership rows should cascade on delete");
}
