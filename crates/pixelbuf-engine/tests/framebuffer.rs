//! Window scenarios. They need a display server and a GPU, and winit allows
//! one event loop per process, so everything runs in a single test:
//!
//! ```sh
//! cargo test -p pixelbuf-engine --test framebuffer -- --ignored
//! ```

use pixelbuf_engine::binding::{ElementType, PixelArray, PixelError};
use pixelbuf_engine::framebuffer::{Framebuffer, FramebufferConfig};
use pixelbuf_engine::logging::DiagnosticLevel;
use pixelbuf_engine::pixels::Rgb;

fn config(width: u32, height: u32) -> FramebufferConfig {
    let mut cfg = FramebufferConfig::new(width, height, "t").with_diagnostics(DiagnosticLevel::Verbose);
    cfg.any_thread = true;
    cfg
}

#[test]
fn zero_size_is_rejected_before_opening_a_window() {
    assert!(Framebuffer::with_config(config(0, 4)).is_err());
    assert!(Framebuffer::with_config(config(4, 0)).is_err());
}

#[test]
#[ignore = "needs a display and a GPU"]
fn four_by_four_session() {
    let mut fb = Framebuffer::with_config(config(4, 4)).expect("framebuffer");
    assert!(!fb.should_close());
    assert!(fb.shader().is_valid());
    assert_eq!((fb.width(), fb.height()), (4, 4));

    // all black
    let black = vec![0u8; 4 * 4 * 3];
    fb.replace_pixels(&PixelArray::rgb8(&black, 4, 4)).expect("black frame");

    // row 0 red
    let mut red_row = black.clone();
    for px in red_row[..4 * 3].chunks_exact_mut(3) {
        px[0] = 255;
    }
    fb.replace_pixels(&PixelArray::rgb8(&red_row, 4, 4)).expect("red row");
    fb.display().expect("display");
    assert_eq!(fb.pixels().get(2, 0), Some(Rgb::RED));
    assert_eq!(fb.pixels().get(2, 1), Some(Rgb::BLACK));
    assert_eq!(fb.frame_time().map(|t| t.frame_index), Some(0));

    // rejected uploads leave the buffer alone
    let wide = vec![0u8; 5 * 4 * 3];
    assert!(matches!(
        fb.replace_pixels(&PixelArray::rgb8(&wide, 5, 4)),
        Err(PixelError::Dimensions { .. })
    ));
    let floats = vec![0u8; 4 * 4 * 3 * 4];
    assert!(matches!(
        fb.replace_pixels(&PixelArray::new(&floats, [4, 4, 3], ElementType::F32)),
        Err(PixelError::Shape { .. })
    ));
    assert_eq!(fb.pixels().get(0, 0), Some(Rgb::RED));

    // uniforms the built-in program does not have are ignored
    assert!(!fb.set_uniform_int("texUNI", 0));
    assert!(fb.set_uniform_int("flip_y", 0));

    for _ in 0..3 {
        fb.display().expect("display");
    }
    assert!(!fb.should_close());
    drop(fb);
}
