//! Text rasterization
//!
//! Messages are laid out (center-aligned word wrap), drawn white-on-black
//! into an intermediate greyscale canvas by the font facility, then
//! thresholded and packed into the page-oriented byte layout the panel
//! expects.
//!
//! The packing loop assembles each byte most-significant-bit-first from the
//! bottom of the page upward (`7 - bit` read order). That lands the page's
//! top row in bit 0, matching the framebuffer layout, and is kept exactly
//! as-is: reordering it would mirror every rendered glyph on the panel.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{
    FONT_10X20, FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X12, FONT_7X13, FONT_7X13_BOLD, FONT_9X18,
    FONT_9X18_BOLD,
};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::text::{Alignment, Text};
use embedded_graphics::Drawable;
use embedded_graphics::Pixel;

/// Intermediate luminance canvas, one byte per pixel, consumed once per
/// text/image call.
pub struct GlyphCanvas {
    width: u32,
    height: u32,
    lum: Vec<u8>,
}

impl GlyphCanvas {
    /// Create a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            lum: vec![0; (width * height) as usize],
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance at `(x, y)` (0-indexed); reads outside the canvas are
    /// black.
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.lum[(y * self.width + x) as usize]
    }

    /// Set the luminance of a single pixel (0-indexed, test/tooling hook).
    pub fn set_luma(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.lum[(y * self.width + x) as usize] = value;
        }
    }
}

impl DrawTarget for GlyphCanvas {
    type Color = Gray8;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
                continue;
            }
            self.lum[(y as u32 * self.width + x as u32) as usize] = color.luma();
        }
        Ok(())
    }
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One selectable face of a family.
pub struct FontFace {
    /// Nominal pixel size the face is selected by.
    pub nominal: u32,
    pub font: &'static MonoFont<'static>,
}

/// A named set of faces.
pub struct FontFamily {
    pub name: &'static str,
    /// Faces ordered by ascending nominal size.
    pub faces: &'static [FontFace],
}

const MONO_FACES: &[FontFace] = &[
    FontFace { nominal: 6, font: &FONT_4X6 },
    FontFace { nominal: 8, font: &FONT_5X8 },
    FontFace { nominal: 10, font: &FONT_6X10 },
    FontFace { nominal: 12, font: &FONT_6X12 },
    FontFace { nominal: 13, font: &FONT_7X13 },
    FontFace { nominal: 18, font: &FONT_9X18 },
    FontFace { nominal: 25, font: &FONT_10X20 },
];

const BOLD_FACES: &[FontFace] = &[
    FontFace { nominal: 13, font: &FONT_7X13_BOLD },
    FontFace { nominal: 18, font: &FONT_9X18_BOLD },
];

const FAMILIES: &[FontFamily] = &[
    FontFamily { name: "panel-mono", faces: MONO_FACES },
    FontFamily { name: "panel-mono-bold", faces: BOLD_FACES },
];

/// Name of the family used when a requested one is unavailable.
pub const DEFAULT_FAMILY: &str = "panel-mono";

/// Built-in font families, selected by name and nominal pixel size.
pub struct FontCatalog {
    families: &'static [FontFamily],
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self { families: FAMILIES }
    }

    /// Select a face by family name and nominal size.
    ///
    /// Unknown families fall back to [`DEFAULT_FAMILY`] (non-fatal, a
    /// warning is logged). Within a family the largest face not exceeding
    /// `size` wins; requests below the smallest face get the smallest.
    pub fn select(&self, family: &str, size: u32) -> &'static MonoFont<'static> {
        let fam = match self.families.iter().find(|f| f.name == family) {
            Some(fam) => fam,
            None => {
                log::warn!("font family {family:?} not available, falling back to {DEFAULT_FAMILY}");
                self.families
                    .iter()
                    .find(|f| f.name == DEFAULT_FAMILY)
                    .unwrap_or(&self.families[0])
            }
        };
        fam.faces
            .iter()
            .rev()
            .find(|f| f.nominal <= size)
            .unwrap_or(&fam.faces[0])
            .font
    }
}

/// Advance of one character cell in pixels.
fn char_advance(font: &MonoFont<'_>) -> u32 {
    font.character_size.width + font.character_spacing
}

/// Greedy center-oriented word wrap to the panel width.
///
/// Words longer than a full line are hard-split. Returns the message with
/// embedded newlines, ready for multi-line drawing.
pub fn wrap_message(message: &str, font: &MonoFont<'_>, columns: u32) -> String {
    let max_cols = (columns / char_advance(font)).max(1) as usize;
    let mut out = String::new();
    let mut line_len = 0usize;

    for word in message.split_whitespace() {
        let mut word = word;
        // hard-split anything that cannot fit a line on its own
        while word.chars().count() > max_cols {
            if line_len > 0 {
                out.push('\n');
                line_len = 0;
            }
            let split = word
                .char_indices()
                .nth(max_cols)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            let (head, tail) = word.split_at(split);
            out.push_str(head);
            out.push('\n');
            word = tail;
        }
        if word.is_empty() {
            continue;
        }
        let word_len = word.chars().count();
        if line_len == 0 {
            out.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= max_cols {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + word_len;
        } else {
            out.push('\n');
            out.push_str(word);
            line_len = word_len;
        }
    }
    out
}

/// Rasterize a message into a fresh canvas: white text on black,
/// center-aligned, wrapped to the panel width, drawn from the top.
pub fn render_message(
    columns: u32,
    rows: u32,
    message: &str,
    font: &'static MonoFont<'static>,
) -> GlyphCanvas {
    let mut canvas = GlyphCanvas::new(columns, rows);
    let wrapped = wrap_message(message, font, columns);
    log::debug!(
        "render {:?}: {} cols/line at {}px advance",
        message,
        columns / char_advance(font),
        char_advance(font)
    );

    let style = MonoTextStyle::new(font, Gray8::new(255));
    let origin = Point::new(columns as i32 / 2, font.baseline as i32);
    let _ = Text::with_alignment(&wrapped, origin, style, Alignment::Center).draw(&mut canvas);
    canvas
}

/// Threshold the canvas (luminance > 0 is on) and pack it into the
/// page-oriented layout, `pages * width` bytes.
pub fn pack_canvas(canvas: &GlyphCanvas, pages: usize) -> Vec<u8> {
    let width = canvas.width() as usize;
    let mut out = Vec::with_capacity(pages * width);

    for page in 0..pages {
        for x in 0..width {
            let mut bits: u8 = 0;
            for bit in 0..8usize {
                bits <<= 1;
                let row = page * 8 + 7 - bit;
                bits |= (canvas.luma(x as u32, row as u32) > 0) as u8;
            }
            out.push(bits);
        }
    }
    out
}
