//! # Image Resources
//!
//! Resolves the image references stored on templates and employees
//! (backgrounds, photos, signatures) into decoded images.
//!
//! Supported reference forms:
//! - `data:<mime>;base64,<payload>` inline images
//! - `http://` and `https://` URLs
//! - `/images/<file>` uploads, looked up under `<root>/images/`
//! - any other path, relative to the root unless absolute
//!
//! Decoded URL and file images are kept in a bounded least-recently-used
//! cache. File entries remember the file's modification time and length and
//! are read again when either changes, so an upload overwritten in place is
//! picked up. Inline data URLs are decoded on every load and never cached.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::DynamicImage;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{CardError, Result};

/// Turns a stored image reference into pixels.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn load(&self, reference: &str) -> Result<DynamicImage>;
}

/// Decoded images a resolver keeps before dropping the least recently used.
pub const CACHE_CAPACITY: usize = 32;

/// Default [`ImageSource`] over inline data, HTTP and the local filesystem.
pub struct ImageResolver {
    http_client: reqwest::Client,
    root: PathBuf,
    cache: Mutex<ImageCache>,
}

impl ImageResolver {
    /// Resolver with relative paths looked up under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent("cardsmith/0.1")
            .build()
            .map_err(|e| CardError::Image(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(http_client, root))
    }

    pub fn with_client(http_client: reqwest::Client, root: impl Into<PathBuf>) -> Self {
        Self {
            http_client,
            root: root.into(),
            cache: Mutex::new(ImageCache::new(CACHE_CAPACITY)),
        }
    }

    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            cache: Mutex::new(ImageCache::new(capacity)),
            ..self
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location for a non-URL reference.
    pub fn local_path(&self, reference: &str) -> PathBuf {
        if let Some(file) = reference.strip_prefix("/images/") {
            return self.root.join("images").join(file);
        }
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    async fn file_stamp(&self, reference: &str) -> Result<FileStamp> {
        let path = self.local_path(reference);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| CardError::Image(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(FileStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }

    async fn fetch(&self, reference: &str) -> Result<DynamicImage> {
        let bytes = if reference.starts_with("data:") {
            decode_data_url(reference)?
        } else if is_url(reference) {
            self.download(reference).await?
        } else {
            let path = self.local_path(reference);
            tokio::fs::read(&path)
                .await
                .map_err(|e| CardError::Image(format!("Failed to read {}: {}", path.display(), e)))?
        };

        image::load_from_memory(&bytes)
            .map_err(|e| CardError::Image(format!("Failed to decode image: {}", e)))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CardError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(CardError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CardError::Image(format!("Failed to read image data: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageSource for ImageResolver {
    async fn load(&self, reference: &str) -> Result<DynamicImage> {
        if reference.starts_with("data:") {
            return self.fetch(reference).await;
        }
        let stamp = if is_url(reference) {
            None
        } else {
            Some(self.file_stamp(reference).await?)
        };

        if let Some(image) = self.cache.lock().await.get(reference, stamp) {
            return Ok(image);
        }

        let image = self.fetch(reference).await?;
        debug!(
            reference = short_ref(reference),
            width = image.width(),
            height = image.height(),
            "image loaded"
        );

        self.cache.lock().await.insert(reference, image.clone(), stamp);
        Ok(image)
    }
}

fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// What a cached file image was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

struct CachedImage {
    image: DynamicImage,
    stamp: Option<FileStamp>,
}

/// Reference-keyed images with least-recently-used eviction.
struct ImageCache {
    entries: HashMap<String, CachedImage>,
    lru: VecDeque<String>,
    capacity: usize,
}

impl ImageCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
        }
    }

    /// A hit only when the entry was decoded from the same file state.
    fn get(&mut self, reference: &str, stamp: Option<FileStamp>) -> Option<DynamicImage> {
        let image = self
            .entries
            .get(reference)
            .filter(|cached| cached.stamp == stamp)
            .map(|cached| cached.image.clone())?;
        self.touch(reference);
        Some(image)
    }

    fn insert(&mut self, reference: &str, image: DynamicImage, stamp: Option<FileStamp>) {
        self.entries
            .insert(reference.to_string(), CachedImage { image, stamp });
        self.touch(reference);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
    }

    fn touch(&mut self, reference: &str) {
        if let Some(pos) = self.lru.iter().position(|r| r == reference) {
            self.lru.remove(pos);
        }
        self.lru.push_back(reference.to_string());
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Payload bytes of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| CardError::Image("Malformed data URL".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(CardError::Image(format!(
            "Unsupported data URL encoding: {}",
            header
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| CardError::Image(format!("Invalid base64 payload: {}", e)))
}

/// Inline data URLs can be megabytes long; keep log lines readable.
pub(crate) fn short_ref(reference: &str) -> &str {
    match reference.char_indices().nth(48) {
        Some((idx, _)) => &reference[..idx],
        None => reference,
    }
}

/// Fixed in-memory images keyed by reference. Unknown references fail.
#[derive(Default)]
pub struct ImageMap {
    images: HashMap<String, DynamicImage>,
}

impl ImageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: &str, image: DynamicImage) -> Self {
        self.images.insert(reference.to_string(), image);
        self
    }
}

#[async_trait]
impl ImageSource for ImageMap {
    async fn load(&self, reference: &str) -> Result<DynamicImage> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| CardError::Image(format!("No image for {}", short_ref(reference))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_data_url_round_trip() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
        let resolver = ImageResolver::new("unused").unwrap();
        let image = resolver.load(&url).await.unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.to_rgba8().get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_malformed_data_urls() {
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_local_paths() {
        let resolver = ImageResolver::new("/srv/data").unwrap();
        assert_eq!(
            resolver.local_path("/images/photo-1.png"),
            PathBuf::from("/srv/data/images/photo-1.png")
        );
        assert_eq!(
            resolver.local_path("bg/front.jpg"),
            PathBuf::from("/srv/data/bg/front.jpg")
        );
        assert_eq!(
            resolver.local_path("/tmp/sig.png"),
            PathBuf::from("/tmp/sig.png")
        );
    }

    fn solid_png(size: u32, px: [u8; 4]) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(size, size, Rgba(px)))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_file_load_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        let file = dir.path().join("images").join("sig.png");
        std::fs::write(&file, png_bytes()).unwrap();

        let resolver = ImageResolver::new(dir.path()).unwrap();
        let first = resolver.load("/images/sig.png").await.unwrap();
        assert_eq!(first.width(), 3);
        assert!(resolver.load("/images/sig.png").await.is_ok());
        assert_eq!(resolver.cache.lock().await.len(), 1);

        // A deleted file is not served from memory.
        std::fs::remove_file(&file).unwrap();
        assert!(resolver.load("/images/sig.png").await.is_err());
        assert!(resolver.load("/images/missing.png").await.is_err());
    }

    #[tokio::test]
    async fn test_overwritten_upload_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        let file = dir.path().join("images").join("ana.png");
        std::fs::write(&file, solid_png(2, [255, 0, 0, 255])).unwrap();

        let resolver = ImageResolver::new(dir.path()).unwrap();
        let before = resolver.load("/images/ana.png").await.unwrap();
        assert_eq!(before.to_rgba8().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));

        std::fs::write(&file, solid_png(3, [0, 0, 255, 255])).unwrap();
        std::fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(SystemTime::now() + std::time::Duration::from_secs(5))
            .unwrap();

        let after = resolver.load("/images/ana.png").await.unwrap();
        assert_eq!(after.to_rgba8().get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(resolver.cache.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_data_urls_are_not_cached() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
        let resolver = ImageResolver::new("unused").unwrap();
        resolver.load(&url).await.unwrap();
        resolver.load(&url).await.unwrap();
        assert_eq!(resolver.cache.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn test_cache_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::write(dir.path().join(format!("{name}.png")), png_bytes()).unwrap();
        }
        let resolver = ImageResolver::new(dir.path()).unwrap().with_cache_capacity(2);
        for name in ["a.png", "b.png", "a.png", "c.png"] {
            resolver.load(name).await.unwrap();
        }

        let cache = resolver.cache.lock().await;
        assert_eq!(cache.len(), 2);
        // "b" was least recently used when "c" arrived.
        assert!(cache.entries.contains_key("a.png"));
        assert!(!cache.entries.contains_key("b.png"));
        assert!(cache.entries.contains_key("c.png"));
    }

    #[tokio::test]
    async fn test_image_map() {
        let map = ImageMap::new().with("bg", DynamicImage::new_rgba8(2, 2));
        assert!(map.load("bg").await.is_ok());
        assert!(matches!(map.load("nope").await, Err(CardError::Image(_))));
    }

    #[test]
    fn test_short_ref() {
        assert_eq!(short_ref("abc"), "abc");
        assert_eq!(short_ref(&"x".repeat(100)).len(), 48);
    }
}
