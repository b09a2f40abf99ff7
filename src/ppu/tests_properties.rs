//! Property tests for the frame pattern.

use super::*;
use proptest::prelude::*;

fn pixel(ppu: &Ppu, x: usize, y: usize) -> (u8, u8, u8) {
    let offset = (y * SCREEN_WIDTH + x) * BYTES_PER_PIXEL;
    let fb = ppu.framebuffer();
    (fb[offset], fb[offset + 1], fb[offset + 2])
}

proptest! {
    /// Green and blue are fixed functions of red at every pixel.
    #[test]
    fn prop_channel_laws(frame in 0u64..10_000, x in 0usize..SCREEN_WIDTH, y in 0usize..SCREEN_HEIGHT) {
        let mut ppu = Ppu::new();
        ppu.render_frame(frame);
        let (r, g, b) = pixel(&ppu, x, y);
        prop_assert_eq!(g, 255 - r);
        prop_assert_eq!(b, r >> 1);
        prop_assert_eq!(u64::from(r), (x as u64 ^ y as u64 ^ frame) & 0xFF);
    }

    /// Rendering is a pure function of the frame index.
    #[test]
    fn prop_render_is_pure(frame in any::<u64>()) {
        let mut a = Ppu::new();
        let mut b = Ppu::new();
        a.render_frame(frame);
        b.render_frame(12345);
        b.render_frame(frame);
        prop_assert_eq!(a.framebuffer(), b.framebuffer());
    }

    /// Only the low 8 bits of the frame index matter.
    #[test]
    fn prop_frame_index_masked(frame in 0u64..0x1_0000, k in 1u64..1000) {
        let mut a = Ppu::new();
        let mut b = Ppu::new();
        a.render_frame(frame);
        b.render_frame(frame + 256 * k);
        prop_assert_eq!(a.framebuffer(), b.framebuffer());
    }
}
