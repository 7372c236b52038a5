use crate::foundation::core::Viewport;
use crate::foundation::error::{DeckError, DeckResult};
use crate::render::composite::{fill_in_place, over_in_place};

/// A composited frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag is included to make this
/// explicit at API boundaries; frames produced by the stage are always opaque.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// An opaque frame filled with `rgb`.
    pub fn solid(viewport: Viewport, rgb: [u8; 3]) -> Self {
        let mut data = vec![0u8; (viewport.width as usize) * (viewport.height as usize) * 4];
        fill_in_place(&mut data, [rgb[0], rgb[1], rgb[2], 255]);
        Self {
            width: viewport.width,
            height: viewport.height,
            data,
            premultiplied: true,
        }
    }

    /// Composite a premultiplied layer of the same size over this frame.
    pub fn composite_layer(&mut self, layer: &[u8], opacity: f32) -> DeckResult<()> {
        if layer.len() != self.data.len() {
            return Err(DeckError::surface(format!(
                "layer size mismatch: got {} bytes, expected {}",
                layer.len(),
                self.data.len()
            )));
        }
        over_in_place(&mut self.data, layer, opacity)
    }

    /// Read one pixel, `None` when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}
