use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors raised while capturing or materializing snapshots
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),

    #[error("Failed to decode snapshot: {0}")]
    Decode(String),

    #[error("Not a PNG data URL")]
    DataUrl,
}

/// An immutable PNG capture of a whole render target.
///
/// Cloning only bumps a reference count.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Snapshot {
    png: Arc<[u8]>,
}

impl Snapshot {
    pub fn encode(image: &RgbaImage) -> Result<Self, SnapshotError> {
        let mut bytes = Cursor::new(Vec::new());
        image
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| SnapshotError::Encode(e.to_string()))?;

        Ok(Self {
            png: bytes.into_inner().into(),
        })
    }

    /// Wraps already-encoded bytes. Validity is only checked on decode.
    pub fn from_png_bytes(png: impl Into<Arc<[u8]>>) -> Self {
        Self { png: png.into() }
    }

    pub fn as_png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Decodes and stretches the image to `size` if it differs.
    pub fn decode(&self, size: [u32; 2]) -> Result<RgbaImage, SnapshotError> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?
            .to_rgba8();

        if image.dimensions() == (size[0], size[1]) {
            Ok(image)
        } else {
            Ok(image::imageops::resize(&image, size[0], size[1], FilterType::Triangle))
        }
    }

    pub fn to_data_url(&self) -> String {
        format!("{DATA_URL_PREFIX}{}", BASE64.encode(&self.png))
    }

    pub fn from_data_url(url: &str) -> Result<Self, SnapshotError> {
        let payload = url
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(SnapshotError::DataUrl)?;
        let png = BASE64
            .decode(payload)
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        Ok(Self::from_png_bytes(png))
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("png", &format!("<{} bytes>", self.png.len()))
            .finish()
    }
}

impl TryFrom<String> for Snapshot {
    type Error = SnapshotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_data_url(&value)
    }
}

impl From<Snapshot> for String {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.to_data_url()
    }
}

/// Materializes snapshots for restore. Decoding may complete later than the
/// request; the surface decides whether the result is still wanted.
pub trait SnapshotDecoder {
    fn decode(
        &self,
        snapshot: Snapshot,
        size: [u32; 2],
    ) -> LocalBoxFuture<'static, Result<RgbaImage, SnapshotError>>;
}

/// Decodes PNG snapshots in place with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct PngDecoder;

impl SnapshotDecoder for PngDecoder {
    fn decode(
        &self,
        snapshot: Snapshot,
        size: [u32; 2],
    ) -> LocalBoxFuture<'static, Result<RgbaImage, SnapshotError>> {
        async move { snapshot.decode(size) }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_data_url_round_trip_preserves_pixels() {
        let image = checker(4);
        let snapshot = Snapshot::encode(&image).unwrap();

        let url = snapshot.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let restored = Snapshot::from_data_url(&url).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.decode([4, 4]).unwrap(), image);
    }

    #[test]
    fn test_decode_stretches_to_target_size() {
        let snapshot = Snapshot::encode(&RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]))).unwrap();
        let image = snapshot.decode([6, 4]).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.get_pixel(5, 3), &Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let snapshot = Snapshot::from_png_bytes(vec![1u8, 2, 3]);
        assert!(matches!(snapshot.decode([1, 1]), Err(SnapshotError::Decode(_))));
        assert_eq!(
            Snapshot::from_data_url("data:text/plain,hi"),
            Err(SnapshotError::DataUrl)
        );
    }

    #[test]
    fn test_serde_form_is_data_url() {
        let snapshot = Snapshot::encode(&checker(2)).unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, format!("\"{}\"", snapshot.to_data_url()));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_png_decoder_resolves_immediately() {
        let snapshot = Snapshot::encode(&checker(3)).unwrap();
        let image = futures::executor::block_on(PngDecoder.decode(snapshot, [3, 3])).unwrap();
        assert_eq!(image, checker(3));
    }
}
