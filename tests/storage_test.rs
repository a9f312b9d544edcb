//! Tests for storage backends.

use ayu_server::{FileStorage, MemoryStorage, StorageBackend};

#[test]
fn test_memory_storage_round_trip() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());
    assert_eq!(storage.load("Game", "abc").expect("load succeeds"), None);

    storage.save("Game", "abc", b"first").expect("save succeeds");
    storage.save("Game", "abc", b"second").expect("save succeeds");
    storage.save("Other", "abc", b"third").expect("save succeeds");

    assert_eq!(storage.len(), 2);
    assert_eq!(
        storage.load("Game", "abc").expect("load succeeds"),
        Some(b"second".to_vec())
    );
}

#[test]
fn test_file_storage_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage = FileStorage::new(dir.path()).expect("Failed to open storage");

    assert_eq!(storage.load("Game", "abc").expect("load succeeds"), None);
    storage.save("Game", "abc", b"{}").expect("save succeeds");
    assert_eq!(
        storage.load("Game", "abc").expect("load succeeds"),
        Some(b"{}".to_vec())
    );
    assert!(dir.path().join("Game-abc.data").exists());
}

#[test]
fn test_file_storage_overwrites() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage = FileStorage::new(dir.path()).expect("Failed to open storage");

    storage.save("Game", "abc", b"old").expect("save succeeds");
    storage.save("Game", "abc", b"new").expect("save succeeds");
    assert_eq!(
        storage.load("Game", "abc").expect("load succeeds"),
        Some(b"new".to_vec())
    );
    assert!(!dir.path().join("Game-abc.tmp").exists());
}

#[test]
fn test_file_storage_escapes_names() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage = FileStorage::new(dir.path()).expect("Failed to open storage");

    let path = storage.path_for("Game", "../x y");
    assert_eq!(path, dir.path().join("Game-%2e%2e%2fx%20y.data"));

    storage.save("Game", "../x y", b"data").expect("save succeeds");
    assert_eq!(
        storage.load("Game", "../x y").expect("load succeeds"),
        Some(b"data".to_vec())
    );
    assert_eq!(storage.load("Game", "x y").expect("load succeeds"), None);
}

#[test]
fn test_file_storage_creates_directory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let nested = dir.path().join("var").join("games");
    let storage = FileStorage::new(&nested).expect("Failed to open storage");
    assert_eq!(storage.base_dir(), nested.as_path());
    assert!(nested.is_dir());
}

#[test]
fn test_file_storage_reopens_existing_records() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    FileStorage::new(dir.path())
        .expect("Failed to open storage")
        .save("Game", "abc", b"kept")
        .expect("save succeeds");

    let reopened = FileStorage::new(dir.path()).expect("Failed to reopen storage");
    assert_eq!(
        reopened.load("Game", "abc").expect("load succeeds"),
        Some(b"kept".to_vec())
    );
}
