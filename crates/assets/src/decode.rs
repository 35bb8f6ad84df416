use crate::{AssetError, AssetEvent, AssetRequest};
use bubbletext_common::{HdrImage, TextureImage};
use std::path::Path;

fn decode_image(path: &Path) -> Result<image::DynamicImage, AssetError> {
    let bytes = std::fs::read(path)?;
    let format =
        image::guess_format(&bytes).map_err(|_| AssetError::Unsupported(path.to_path_buf()))?;
    Ok(image::load_from_memory_with_format(&bytes, format)?)
}

/// Load `request` on the calling thread.
pub fn load_blocking(request: &AssetRequest) -> Result<AssetEvent, AssetError> {
    match request {
        AssetRequest::Font(path) => {
            let bytes = std::fs::read(path)?;
            Ok(AssetEvent::FontReady {
                path: path.clone(),
                bytes,
            })
        }
        AssetRequest::MatcapTexture { index, path } => {
            let rgba = decode_image(path)?.to_rgba8();
            let (width, height) = rgba.dimensions();
            Ok(AssetEvent::MatcapReady {
                index: *index,
                image: TextureImage {
                    width,
                    height,
                    rgba: rgba.into_raw(),
                },
            })
        }
        AssetRequest::Environment(path) => {
            let rgba = decode_image(path)?.to_rgba32f();
            let (width, height) = rgba.dimensions();
            Ok(AssetEvent::EnvironmentReady(HdrImage {
                width,
                height,
                rgba: rgba.into_raw(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, px: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(w, h, image::Rgba(px))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn font_bytes_are_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"not parsed here").unwrap();

        match load_blocking(&AssetRequest::Font(path.clone())).unwrap() {
            AssetEvent::FontReady { path: p, bytes } => {
                assert_eq!(p, path);
                assert_eq!(bytes, b"not parsed here");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn matcap_png_decodes_to_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "3.png", 4, 2, [10, 20, 30, 255]);

        let event = load_blocking(&AssetRequest::MatcapTexture { index: 3, path }).unwrap();
        let AssetEvent::MatcapReady { index, image } = event else {
            panic!("expected matcap");
        };
        assert_eq!(index, 3);
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn environment_decodes_to_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sky.png", 2, 1, [255, 0, 0, 255]);

        let AssetEvent::EnvironmentReady(hdr) =
            load_blocking(&AssetRequest::Environment(path)).unwrap()
        else {
            panic!("expected environment");
        };
        assert_eq!((hdr.width, hdr.height), (2, 1));
        let px = hdr.pixel(1, 0).unwrap();
        assert!((px[0] - 1.0).abs() < 1e-6 && px[1].abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_blocking(&AssetRequest::Font("/nonexistent/font.ttf".into())).unwrap_err();
        assert!(matches!(err, AssetError::Io(_)));
    }

    #[test]
    fn garbage_image_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.png");
        std::fs::write(&path, b"garbage").unwrap();
        let err = load_blocking(&AssetRequest::MatcapTexture { index: 1, path }).unwrap_err();
        assert!(matches!(err, AssetError::Unsupported(_)));
    }
}
