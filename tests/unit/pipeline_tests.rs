// End-to-end flow with the real file-backed components:
// FileImageProvider -> ImageMarker -> TokioFileSystem

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_test::assert_ok;

use crate::common::{FakeBroker, FakeDevice, RecordingNotifier};
use watermarkize::acquisition::FileImageProvider;
use watermarkize::persistence::{SaveTarget, TokioFileSystem};
use watermarkize::session::{ActionOutcome, CancelToken, Collaborators, SessionController};
use watermarkize::watermark::ImageMarker;

fn write_photo(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("input.png");
    RgbaImage::from_pixel(width, height, Rgba([90, 160, 220, 255]))
        .save(&path)
        .unwrap();
    path
}

fn controller(provider: FileImageProvider, root: &Path) -> (SessionController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = SessionController::new(
        Collaborators {
            permission_broker: Arc::new(FakeBroker::granting()),
            device_info: Arc::new(FakeDevice("13")),
            image_provider: Arc::new(provider),
            marking_engine: Arc::new(ImageMarker::new(root.join("cache"))),
            file_system: Arc::new(TokioFileSystem),
            notifier: notifier.clone(),
        },
        SaveTarget::with_timestamp(root.join("Download"), 1_234),
    );
    (controller, notifier)
}

#[tokio::test]
async fn test_pick_mark_and_save_real_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), 320, 240);
    let (controller, notifier) = controller(
        FileImageProvider::new().with_library_input(&input),
        dir.path(),
    );
    controller.start().await;
    let token = CancelToken::new();

    assert!(controller.open_gallery(&token).await.is_completed());
    let payload = controller.state().payload.unwrap();
    let encoded = payload.strip_prefix("data:image/png;base64,").unwrap();
    let marked = image::load_from_memory(&assert_ok!(STANDARD.decode(encoded))).unwrap();
    assert_eq!((marked.width(), marked.height()), (320, 240));

    assert!(controller.save_to_device(&token).await.is_completed());
    let saved_path = dir.path().join("Download").join("1234.png");
    assert_eq!(controller.save_path(), saved_path);

    let saved = image::open(&saved_path).unwrap().to_rgba8();
    assert_eq!(saved, marked.to_rgba8());
    assert_eq!(notifier.shown.lock().len(), 1);
}

#[tokio::test]
async fn test_unreadable_input_is_silent_failure() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("not-an-image.png");
    std::fs::write(&bogus, b"definitely not png").unwrap();

    let (controller, notifier) = controller(
        FileImageProvider::new().with_capture_input(&bogus),
        dir.path(),
    );
    controller.start().await;

    let outcome = controller.open_camera(&CancelToken::new()).await;
    assert!(matches!(outcome, ActionOutcome::Failed(_)));
    assert!(controller.state().payload.is_none());
    assert!(!controller.state().loading);
    assert!(notifier.shown.lock().is_empty());
}

#[tokio::test]
async fn test_save_into_blocked_directory_notifies_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), 64, 64);
    // A plain file where the downloads directory should be
    std::fs::write(dir.path().join("Download"), b"in the way").unwrap();

    let (controller, notifier) = controller(
        FileImageProvider::new().with_library_input(&input),
        dir.path(),
    );
    controller.start().await;
    let token = CancelToken::new();
    controller.open_gallery(&token).await;

    let outcome = controller.save_to_device(&token).await;
    assert!(matches!(outcome, ActionOutcome::Failed(_)));

    let shown = notifier.shown.lock();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].message.contains("storage permissions"));
}
