#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use forum_images::{
    config::AppConfig,
    models::{Image, NewImage},
    repository::ImageStore,
    services::{
        jwt::JwtService,
        storage::{date_segment, upload_date},
    },
    utils::id::UuidGenerator,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("forum_images=debug")
            .with_test_writer()
            .init();
    });
}

/// In-memory image store. Lookups return records newest first.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: Mutex<Vec<Image>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in insertion order.
    pub fn records(&self) -> Vec<Image> {
        self.images.lock().unwrap().clone()
    }

    fn newest_first(&self, post_id: &str) -> Vec<Image> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|image| image.post_id == post_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn create(&self, image: NewImage) -> Result<Image, sqlx::Error> {
        let record = image.into_image(Uuid::new_v4().to_string(), OffsetDateTime::now_utc());
        self.images.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn get_by_post_id(&self, post_id: &str) -> Result<Option<Image>, sqlx::Error> {
        Ok(self.newest_first(post_id).into_iter().next())
    }

    async fn list_by_post_id(&self, post_id: &str) -> Result<Vec<Image>, sqlx::Error> {
        Ok(self.newest_first(post_id))
    }
}

/// Store whose every operation fails, as if the database were unreachable.
#[derive(Debug, Default)]
pub struct FailingImageStore;

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn create(&self, _image: NewImage) -> Result<Image, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn get_by_post_id(&self, _post_id: &str) -> Result<Option<Image>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn list_by_post_id(&self, _post_id: &str) -> Result<Vec<Image>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

/// A running application with its own temporary static root.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    /// Static root handed to the application.
    pub static_dir: PathBuf,
    _root: TempDir,
    jwt: JwtService,
}

impl TestApp {
    /// Base directory for stored images.
    pub fn image_dir(&self) -> PathBuf {
        self.static_dir.join("uploads/images")
    }

    /// Maps a public `/static/...` URL back onto the file system.
    pub fn disk_path(&self, public_path: &str) -> PathBuf {
        let relative = public_path
            .strip_prefix("/static/")
            .expect("public paths live under /static/");
        self.static_dir.join(relative)
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt
            .issue_access_token(user_id)
            .expect("Failed to issue test token")
    }

    /// Posts `form` to the upload endpoint, authenticated as `user_id` when
    /// given.
    pub async fn upload(&self, user_id: Option<&str>, form: Form) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/api/images/upload", self.address))
            .multipart(form);
        if let Some(user_id) = user_id {
            request = request.bearer_auth(self.token_for(user_id));
        }
        request.send().await.expect("Failed to send upload request")
    }

    /// Every path below the static root, sorted.
    pub fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if self.static_dir.is_dir() {
            collect_paths(&self.static_dir, &mut paths);
        }
        paths.sort();
        paths
    }
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).expect("Failed to read directory") {
        let path = entry.expect("Failed to read entry").path();
        out.push(path.clone());
        if path.is_dir() {
            collect_paths(&path, out);
        }
    }
}

/// Spawns the application backed by a fresh [`MemoryImageStore`].
pub async fn spawn_app() -> (TestApp, Arc<MemoryImageStore>) {
    let store = Arc::new(MemoryImageStore::new());
    let app = spawn_app_with_store(Arc::clone(&store) as Arc<dyn ImageStore>).await;
    (app, store)
}

/// Spawns the application with the given store and a temporary static root.
pub async fn spawn_app_with_store(store: Arc<dyn ImageStore>) -> TestApp {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let static_dir = root.path().join("static");
    std::fs::create_dir(&static_dir).expect("Failed to create static dir");
    spawn(root, static_dir, store).await
}

/// Spawns the application with a static root that is a regular file, so no
/// directory can be created beneath it.
pub async fn spawn_app_with_unwritable_storage() -> (TestApp, Arc<MemoryImageStore>) {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let static_dir = root.path().join("static");
    std::fs::write(&static_dir, b"not a directory").expect("Failed to create blocker file");

    let store = Arc::new(MemoryImageStore::new());
    let app = spawn(root, static_dir, Arc::clone(&store) as Arc<dyn ImageStore>).await;
    (app, store)
}

async fn spawn(root: TempDir, static_dir: PathBuf, store: Arc<dyn ImageStore>) -> TestApp {
    init_tracing_once();

    let config = AppConfig::new(&static_dir, JWT_SECRET);

    // Randomly choose an available port
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port at localhost");
    let port = listener.local_addr().unwrap().port();

    let app = forum_images::app_with_services(&config, store, Arc::new(UuidGenerator));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let address = format!("http://127.0.0.1:{port}");
    let client = reqwest::Client::new();

    // Wait for server to be ready
    for _ in 0..10 {
        if client
            .get(format!("{address}/health-check"))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    TestApp {
        address,
        client,
        static_dir,
        _root: root,
        jwt: JwtService::from_secret(JWT_SECRET.as_bytes()),
    }
}

/// Today's date directory as the server computes it.
pub fn today() -> String {
    date_segment(upload_date())
}

/// Encodes a `width` × `height` two-colour test pattern.
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let pattern = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });

    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(pattern).to_rgb8()),
        _ => DynamicImage::ImageRgba8(pattern),
    };

    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode test image");
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    create_test_image(width, height, ImageFormat::Png)
}

/// File part for the `image` field. `mime` of `None` sends no Content-Type.
pub fn image_part(data: Vec<u8>, filename: Option<&str>, mime: Option<&str>) -> Part {
    let mut part = Part::bytes(data);
    if let Some(filename) = filename {
        part = part.file_name(filename.to_string());
    }
    if let Some(mime) = mime {
        part = part.mime_str(mime).expect("Invalid mime type");
    }
    part
}

/// Builds an upload form with the given fields.
pub fn upload_form(post_id: Option<&str>, image: Option<Part>) -> Form {
    let mut form = Form::new();
    if let Some(post_id) = post_id {
        form = form.text("post_id", post_id.to_string());
    }
    if let Some(image) = image {
        form = form.part("image", image);
    }
    form
}

/// Standard valid PNG upload for `post_id`.
pub fn png_upload(post_id: &str) -> Form {
    upload_form(
        Some(post_id),
        Some(image_part(
            create_test_png(10, 10),
            Some("a.png"),
            Some("image/png"),
        )),
    )
}

/// Final path component of a public URL.
pub fn file_name_of(public_path: &str) -> &str {
    public_path.rsplit('/').next().unwrap_or(public_path)
}
