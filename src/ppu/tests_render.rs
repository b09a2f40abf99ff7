//! Rendering output tests: known pixel values, determinism, animation.

use super::*;

fn pixel(ppu: &Ppu, x: usize, y: usize) -> (u8, u8, u8) {
    let offset = (y * SCREEN_WIDTH + x) * BYTES_PER_PIXEL;
    let fb = ppu.framebuffer();
    (fb[offset], fb[offset + 1], fb[offset + 2])
}

#[test]
fn test_frame_zero_known_pixels() {
    let mut ppu = Ppu::new();
    ppu.render_frame(0);

    assert_eq!(pixel(&ppu, 0, 0), (0, 255, 0));
    assert_eq!(pixel(&ppu, 1, 0), (1, 254, 0));
    assert_eq!(pixel(&ppu, 0, 1), (1, 254, 0));
    assert_eq!(pixel(&ppu, 255, 0), (255, 0, 127));
    // 3 ^ 5 = 6
    assert_eq!(pixel(&ppu, 3, 5), (6, 249, 3));
}

#[test]
fn test_frame_index_shifts_pattern() {
    let mut ppu = Ppu::new();
    ppu.render_frame(1);
    // 0 ^ 0 ^ 1 = 1
    assert_eq!(pixel(&ppu, 0, 0), (1, 254, 0));
    // 1 ^ 0 ^ 1 = 0
    assert_eq!(pixel(&ppu, 1, 0), (0, 255, 0));
}

#[test]
fn test_same_index_same_image() {
    let mut ppu = Ppu::new();
    ppu.render_frame(7);
    let first = ppu.framebuffer().to_vec();

    ppu.render_frame(3);
    assert_ne!(ppu.framebuffer(), first.as_slice());

    ppu.render_frame(7);
    assert_eq!(ppu.framebuffer(), first.as_slice());
}

#[test]
fn test_consecutive_frames_differ() {
    let mut a = Ppu::new();
    let mut b = Ppu::new();
    a.render_frame(0);
    b.render_frame(1);
    assert_ne!(a.framebuffer(), b.framebuffer());
}

#[test]
fn test_pattern_period_is_256() {
    let mut a = Ppu::new();
    let mut b = Ppu::new();
    a.render_frame(2);
    b.render_frame(2 + 256);
    assert_eq!(a.framebuffer(), b.framebuffer());

    b.render_frame(2 + 256 * 1000);
    assert_eq!(a.framebuffer(), b.framebuffer());
}

#[test]
fn test_every_pixel_written() {
    // Frame 255 leaves no channel at its initial zero everywhere:
    // green is 255 - red, so red and green cannot both be zero.
    let mut ppu = Ppu::new();
    ppu.render_frame(255);
    for chunk in ppu.framebuffer().chunks_exact(BYTES_PER_PIXEL) {
        assert!(chunk[0] != 0 || chunk[1] != 0);
    }
}
