//! Frame generator.
//!
//! Paints one 256x224 RGB888 image per emulated frame. The pattern is a
//! pure function of pixel position and frame index:
//!
//! | channel | value            |
//! |---------|------------------|
//! | red     | `(x ^ y ^ frame) & 0xFF` |
//! | green   | `255 - red`      |
//! | blue    | `red >> 1`       |
//!
//! Rendering reads no machine state beyond the frame index, so any frame
//! can be reproduced at any time. The pattern repeats every 256 frames.

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 224;
pub const BYTES_PER_PIXEL: usize = 3;
pub const FRAMEBUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL;

/// Owns the framebuffer and repaints it on demand.
#[derive(Debug, Clone)]
pub struct Ppu {
    framebuffer: Vec<u8>,
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            framebuffer: vec![0; FRAMEBUFFER_SIZE],
        }
    }

    /// Repaint the whole framebuffer for `frame_index`. Row-major order,
    /// three bytes per pixel, no padding between rows.
    pub fn render_frame(&mut self, frame_index: u64) {
        let frame = frame_index & 0xFF;
        let mut offset = 0;
        for y in 0..SCREEN_HEIGHT as u64 {
            for x in 0..SCREEN_WIDTH as u64 {
                let c = ((x ^ y ^ frame) & 0xFF) as u8;
                self.framebuffer[offset] = c;
                self.framebuffer[offset + 1] = 255 - c;
                self.framebuffer[offset + 2] = c >> 1;
                offset += BYTES_PER_PIXEL;
            }
        }
    }

    /// The last rendered image (all zeroes before the first render).
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests_render;

#[cfg(test)]
mod tests_properties;
