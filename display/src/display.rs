use sdl2::pixels::PixelFormatEnum;

use vip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vip8_core::state::FrameBuffer;

const SCALE: usize = 10;

/// # Display
/// The Chip-8 display is 64x32 black/white pixels, held by the machine as
/// one 64-bit word per row with the leftmost pixel in the most
/// significant bit. `render` is only called when the machine hands over a
/// changed frame.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
}

// TODO surface SDL errors to the caller instead of unwrapping
impl Display {
    /// Creates a new display bound to an sdl2 context.
    pub fn new(sdl: &sdl2::Sdl) -> Self {
        let video_subsystem = sdl.video().unwrap();
        let window = video_subsystem
            .window(
                "vip8",
                (DISPLAY_WIDTH * SCALE) as u32,
                (DISPLAY_HEIGHT * SCALE) as u32,
            )
            .position_centered()
            .opengl()
            .build()
            .unwrap();
        let canvas = window.into_canvas().build().unwrap();

        Display { canvas }
    }

    /// Expand the row-word frame buffer into RGB24 texture bytes.
    ///
    /// Rows are walked top to bottom and each row from its most
    /// significant bit (the leftmost pixel) down; every bit becomes three
    /// identical 0/255 channel bytes.
    fn frame_to_sdl_texture(frame: &FrameBuffer) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| (0..DISPLAY_WIDTH).map(move |x| ((row >> (63 - x)) & 1) as u8))
            .flat_map(|bit| std::iter::repeat(bit * 255).take(3))
            .collect()
    }

    /// Formats the frame buffer as an SDL2 RGB24 texture and renders it.
    pub fn render(&mut self, frame: &FrameBuffer) {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .unwrap();

        texture
            .with_lock(None, |buffer: &mut [u8], _pitch: usize| {
                buffer.copy_from_slice(&Display::frame_to_sdl_texture(frame));
            })
            .unwrap();

        self.canvas.copy(&texture, None, None).unwrap();
        self.canvas.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_sdl_texture() {
        let mut frame: FrameBuffer = [0; DISPLAY_HEIGHT];
        // Pixel (1, 0) and pixel (0, 1)
        frame[0] = 1 << 62;
        frame[1] = 1 << 63;
        let texture = Display::frame_to_sdl_texture(&frame);

        let mut expected: Vec<u8> = vec![0; DISPLAY_WIDTH * DISPLAY_HEIGHT * 3];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(texture, expected);
    }
}
