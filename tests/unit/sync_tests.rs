use crate::fakes::{config_rooted_at, FakeFlickr, FakeUser};
use flickr_uploadr::application::models::upload::UploadBatchResult;
use flickr_uploadr::application::services::scheduler::Scheduler;
use flickr_uploadr::application::services::upload_service::UploadEngine;
use flickr_uploadr::config::Config;
use flickr_uploadr::error::AppError;
use flickr_uploadr::session::auth::AuthState;
use flickr_uploadr::storage::ledger::Ledger;
use flickr_uploadr::storage::scanner::scan;
use flickr_uploadr::utils::logger::setup_logger;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

fn photo_dir(names: &[&str]) -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let config = config_rooted_at(dir.path(), "https://flickr.test/services");
    for name in names {
        let path = config.upload.image_dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, format!("bytes of {name}")).unwrap();
    }
    (dir, config)
}

fn cache_token(config: &Config, token: &str) {
    fs::write(&config.storage.token_file, token).unwrap();
}

fn batch(succeeded: usize, failed: usize, skipped: usize) -> UploadBatchResult {
    UploadBatchResult {
        succeeded,
        failed,
        skipped,
    }
}

async fn ledger_keys(config: &Config) -> Vec<(String, Option<String>)> {
    let ledger = Ledger::open(&config.storage.history_file).await.unwrap();
    let mut keys = Vec::new();
    for file in scan(&config.upload.image_dir).unwrap() {
        let id = ledger.photo_id_for(&file.path).await.unwrap();
        keys.push((file.path, id));
    }
    ledger.close().await;
    keys
}

#[tokio::test]
async fn test_three_new_images_are_uploaded_and_recorded() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg", "b.jpg", "c.png"]);
    cache_token(&config, "tok");
    let flickr = Arc::new(FakeFlickr::new("tok"));
    let user = FakeUser::confirming();

    let mut engine = UploadEngine::new(Arc::new(config.clone()), flickr.clone(), user.clone());
    let result = engine.run_once(&config.upload.image_dir).await.unwrap();

    assert_eq!(result, batch(3, 0, 0));
    assert_eq!(flickr.uploaded(), vec!["a.jpg", "b.jpg", "c.png"]);

    let ledger = Ledger::open(&config.storage.history_file).await.unwrap();
    assert_eq!(ledger.len().await.unwrap(), 3);
    for (path, id) in ledger_keys(&config).await {
        let id = id.expect("every uploaded file has a photo id");
        assert!(ledger.contains(&path).await.unwrap());
        assert!(ledger.contains(&id).await.unwrap());
        assert_eq!(ledger.local_path_for(&id).await.unwrap(), Some(path));
    }
}

#[tokio::test]
async fn test_second_run_over_unchanged_directory_uploads_nothing() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg", "nested/deeper/b.gif", "c.png", "notes.txt"]);
    cache_token(&config, "tok");
    let flickr = Arc::new(FakeFlickr::new("tok"));

    let mut engine =
        UploadEngine::new(Arc::new(config.clone()), flickr.clone(), FakeUser::confirming());
    let first = engine.run_once(&config.upload.image_dir).await.unwrap();
    let second = engine.run_once(&config.upload.image_dir).await.unwrap();

    assert_eq!(first, batch(3, 0, 0));
    assert_eq!(second, batch(0, 0, 3));
    assert_eq!(second.skipped, second.total());
    assert_eq!(flickr.uploaded().len(), 3);
}

#[tokio::test]
async fn test_history_survives_a_new_process() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg", "b.jpg"]);
    cache_token(&config, "tok");
    let config = Arc::new(config);

    let first = Arc::new(FakeFlickr::new("tok"));
    let mut engine = UploadEngine::new(config.clone(), first.clone(), FakeUser::confirming());
    assert_eq!(engine.run_once(&config.upload.image_dir).await.unwrap(), batch(2, 0, 0));
    drop(engine);

    let second = Arc::new(FakeFlickr::new("tok"));
    let mut engine = UploadEngine::new(config.clone(), second.clone(), FakeUser::confirming());
    assert_eq!(engine.run_once(&config.upload.image_dir).await.unwrap(), batch(0, 0, 2));
    assert!(second.uploaded().is_empty());
}

#[tokio::test]
async fn test_failed_upload_is_not_recorded_and_retried_next_batch() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg", "b.jpg", "c.png"]);
    cache_token(&config, "tok");
    let flickr = Arc::new(FakeFlickr::new("tok").fail_once("b.jpg"));

    let mut engine =
        UploadEngine::new(Arc::new(config.clone()), flickr.clone(), FakeUser::confirming());

    let first = engine.run_once(&config.upload.image_dir).await.unwrap();
    assert_eq!(first, batch(2, 1, 0));
    let recorded: Vec<bool> = ledger_keys(&config)
        .await
        .into_iter()
        .map(|(_, id)| id.is_some())
        .collect();
    assert_eq!(recorded, vec![true, false, true]);

    let second = engine.run_once(&config.upload.image_dir).await.unwrap();
    assert_eq!(second, batch(1, 0, 2));
    assert_eq!(
        flickr.uploaded(),
        vec!["a.jpg", "b.jpg", "c.png", "b.jpg"]
    );
    assert!(ledger_keys(&config).await.iter().all(|(_, id)| id.is_some()));
}

#[tokio::test]
async fn test_valid_cached_token_skips_the_handshake() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg"]);
    cache_token(&config, "tok");
    let flickr = Arc::new(FakeFlickr::new("tok"));
    let user = FakeUser::confirming();

    let mut engine = UploadEngine::new(Arc::new(config.clone()), flickr.clone(), user.clone());
    engine.run_once(&config.upload.image_dir).await.unwrap();

    assert_eq!(flickr.count("flickr.auth.checkToken"), 1);
    assert_eq!(flickr.count("flickr.auth.getFrob"), 0);
    assert_eq!(flickr.count("flickr.auth.getToken"), 0);
    assert_eq!(user.prompts(), 0);
    assert!(matches!(engine.session().state(), AuthState::TokenValid(_)));
}

#[tokio::test]
async fn test_first_run_handshake_caches_token_for_later_runs() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg"]);
    let config = Arc::new(config);
    let flickr = Arc::new(FakeFlickr::new("fresh-token"));
    let user = FakeUser::confirming();

    let mut engine = UploadEngine::new(config.clone(), flickr.clone(), user.clone());
    assert_eq!(engine.run_once(&config.upload.image_dir).await.unwrap(), batch(1, 0, 0));

    assert_eq!(flickr.count("flickr.auth.getFrob"), 1);
    assert_eq!(flickr.count("flickr.auth.getToken"), 1);
    assert_eq!(user.prompts(), 1);
    let url = &user.urls()[0];
    assert!(url.contains("frob=frob-1"));
    assert!(url.contains("perms=write"));
    assert_eq!(
        fs::read_to_string(&config.storage.token_file).unwrap().trim(),
        "fresh-token"
    );

    // a new process starts from the cached token
    let later = Arc::new(FakeFlickr::new("fresh-token"));
    let mut engine = UploadEngine::new(config.clone(), later.clone(), user.clone());
    engine.run_once(&config.upload.image_dir).await.unwrap();
    assert_eq!(later.count("flickr.auth.getFrob"), 0);
    assert_eq!(user.prompts(), 1);
}

#[tokio::test]
async fn test_rejected_cached_token_is_replaced() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg"]);
    cache_token(&config, "revoked");
    let flickr = Arc::new(FakeFlickr::new("tok"));
    let user = FakeUser::confirming();

    let mut engine = UploadEngine::new(Arc::new(config.clone()), flickr.clone(), user.clone());
    let result = engine.run_once(&config.upload.image_dir).await.unwrap();

    assert_eq!(result, batch(1, 0, 0));
    assert_eq!(user.prompts(), 1);
    assert_eq!(
        fs::read_to_string(&config.storage.token_file).unwrap().trim(),
        "tok"
    );
}

#[tokio::test]
async fn test_declined_authorization_is_fatal_and_uploads_nothing() {
    setup_logger();
    let (_dir, config) = photo_dir(&["a.jpg", "b.png"]);
    let flickr = Arc::new(FakeFlickr::new("tok"));

    let engine = UploadEngine::new(Arc::new(config.clone()), flickr.clone(), FakeUser::declining());
    let mut scheduler = Scheduler::new(engine);
    let err = scheduler.once().await.unwrap_err();

    assert!(matches!(err, AppError::AuthDeclined));
    assert!(err.is_fatal());
    assert!(flickr.uploaded().is_empty());
    assert_eq!(flickr.count("flickr.auth.getToken"), 0);
    assert!(!config.storage.token_file.exists());
    assert!(matches!(scheduler.engine().session().state(), AuthState::Aborted));
}

#[tokio::test]
async fn test_scheduler_once_uses_configured_directory() {
    setup_logger();
    let (_dir, config) = photo_dir(&["x/1.GIF", "x/2.Png", "x/3.jpeg"]);
    cache_token(&config, "tok");
    let flickr = Arc::new(FakeFlickr::new("tok"));

    let engine = UploadEngine::new(Arc::new(config), flickr.clone(), FakeUser::confirming());
    let result = Scheduler::new(engine).once().await.unwrap();

    assert_eq!(result, batch(2, 0, 0));
    assert_eq!(flickr.uploaded(), vec!["1.GIF", "2.Png"]);
}

#[test]
fn test_scanner_selects_images_case_insensitively() {
    let dir = tempdir().unwrap();
    for name in ["a.JPG", "b.txt", "sub/c.png", "d.GIF"] {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    let names: Vec<String> = scan(dir.path())
        .unwrap()
        .iter()
        .map(|f| {
            Path::new(&f.path)
                .strip_prefix(dir.path())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();

    assert_eq!(names, vec!["a.JPG", "d.GIF", "sub/c.png"]);
}
