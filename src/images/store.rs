//! Temp-file storage for downloaded image candidates.
//!
//! Candidates are written under the cache directory as
//! `{url_hash}_{random}.{ext}`, where the extension comes from the decoded
//! payload rather than the URL. Everything with the hash prefix is deleted
//! when the extraction finishes.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};
use tracing::debug;

use crate::fetch::MediaProbe;

/// A candidate image persisted to the cache directory, with its decoded
/// pixel dimensions.
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Location of the temp file.
    pub path: PathBuf,

    /// Decoded pixel width.
    pub width: u32,

    /// Decoded pixel height.
    pub height: u32,

    /// Payload size in bytes.
    pub byte_size: u64,
}

/// Downloads one candidate, verifies it decodes as a usable image, and
/// persists it to the cache directory.
///
/// Returns `None` when the download fails, the payload is smaller than
/// `min_bytes`, or the format is unusable. GIFs are refused outright;
/// animated ones masquerade as article images far too often.
#[must_use]
pub fn store_temp_image(
    probe: &dyn MediaProbe,
    link_hash: &str,
    image_url: &str,
    cache_dir: &Path,
    min_bytes: u64,
) -> Option<StoredImage> {
    let bytes = probe.image_bytes(image_url)?;
    if (bytes.len() as u64) < min_bytes {
        return None;
    }

    let format = image::guess_format(&bytes).ok()?;
    let extension = match format {
        ImageFormat::Jpeg => ".jpg",
        ImageFormat::Png => ".png",
        _ => return None,
    };

    let (width, height) = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;

    let suffix: u32 = rand::random();
    let path = cache_dir.join(format!("{link_hash}_{suffix}{extension}"));
    if let Err(err) = fs::write(&path, &bytes) {
        debug!(?path, %err, "failed to persist image candidate");
        return None;
    }

    Some(StoredImage {
        path,
        width,
        height,
        byte_size: bytes.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::ContentInfo;
    use image::RgbImage;

    struct FixedProbe {
        payload: Option<Vec<u8>>,
    }

    impl MediaProbe for FixedProbe {
        fn content_info(&self, _url: &str) -> ContentInfo {
            ContentInfo::default()
        }

        fn image_bytes(&self, _url: &str) -> Option<Vec<u8>> {
            self.payload.clone()
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .unwrap_or_else(|_| panic!("png encoding failed"));
        out.into_inner()
    }

    #[test]
    fn stores_decodable_png_with_dimensions() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| panic!("tempdir"));
        let probe = FixedProbe { payload: Some(png_bytes(80, 60)) };

        let stored = store_temp_image(&probe, "abc123", "http://x.com/img.png", dir.path(), 0);
        let stored = match stored {
            Some(s) => s,
            None => panic!("expected stored image"),
        };

        assert_eq!((stored.width, stored.height), (80, 60));
        assert!(stored.path.exists());
        let name = stored.path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        assert!(name.starts_with("abc123_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn refuses_payload_below_byte_floor() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| panic!("tempdir"));
        let probe = FixedProbe { payload: Some(png_bytes(80, 60)) };

        assert!(store_temp_image(&probe, "abc", "http://x.com/i.png", dir.path(), 1_000_000).is_none());
    }

    #[test]
    fn refuses_non_image_payload() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| panic!("tempdir"));
        let probe = FixedProbe { payload: Some(b"<html>not an image</html>".to_vec()) };

        assert!(store_temp_image(&probe, "abc", "http://x.com/i.png", dir.path(), 0).is_none());
    }

    #[test]
    fn refuses_failed_download() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| panic!("tempdir"));
        let probe = FixedProbe { payload: None };

        assert!(store_temp_image(&probe, "abc", "http://x.com/i.png", dir.path(), 0).is_none());
    }
}
