/// Decoded 8-bit RGBA image (sRGB encoded), row-major, tightly packed.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Single-pixel image, useful as a bind-group placeholder.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Decoded linear HDR image as RGBA f32, row-major. Used for equirectangular
/// environment maps.
#[derive(Debug, Clone, PartialEq)]
pub struct HdrImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<f32>,
}

impl HdrImage {
    pub fn solid(rgba: [f32; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 16
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }
}
