//! Render output buffer and image files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lux_math::{Interval, Vec3};

use crate::error::RenderResult;

/// Linear RGB colour, nominally in [0, 1] per channel.
pub type Color = Vec3;

/// Convert a colour to 8-bit RGBA, clamping each channel to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Row-major image of linear colours.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Convert to RGB bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| {
                let [r, g, b, _] = color_to_rgba(*c);
                [r, g, b]
            })
            .collect()
    }

    /// Write a plain-text (P3) PPM.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> RenderResult<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for row in self.to_rgb().chunks(3 * self.width.max(1) as usize) {
            let line: Vec<String> = row.iter().map(u8::to_string).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
        Ok(())
    }

    /// Save to `path`. `.ppm` files are written as plain-text PPM, anything
    /// else goes through the `image` crate and its extension-based encoders.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RenderResult<()> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut out = BufWriter::new(File::create(path)?);
            self.write_ppm(&mut out)?;
            out.flush()?;
        } else {
            image::save_buffer(path, &self.to_rgb(), self.width, self.height, image::ColorType::Rgb8)?;
        }

        log::debug!("Wrote {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_rgba_clamps_without_gamma() {
        assert_eq!(color_to_rgba(Color::new(0.5, 0.0, 1.0)), [127, 0, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 2.0, 0.2)), [0, 255, 51, 255]);
    }

    #[test]
    fn test_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::ONE);
        assert_eq!(image.get(3, 2), Color::ONE);
        assert_eq!(image.pixels[11], Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgb().len(), 36);
        assert_eq!(&image.to_rgb()[33..], &[255, 255, 255]);
    }

    #[test]
    fn test_write_ppm() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0));
        image.set(1, 0, Color::new(0.0, 1.0, 1.0));

        let mut out = Vec::new();
        image.write_ppm(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n2 1\n255\n255 0 0 0 255 255\n");
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let image = ImageBuffer::new(3, 2);

        let png = dir.path().join("frame.png");
        image.save(&png).unwrap();
        let decoded = image::open(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));

        let ppm = dir.path().join("frame.ppm");
        image.save(&ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n3 2\n"));
    }
}
