//! Text placement and image composition.
//!
//! This module computes *where* things go on a monochrome surface and draws
//! them into any [`DrawTarget`] with [`BinaryColor`] pixels, usually the
//! driver's [`Framebuffer`](crate::Framebuffer):
//!
//! - [`layout_text`] / [`draw_text`]: fixed-width text at one of six
//!   [`Anchor`] positions, rasterised with `embedded-graphics`' `FONT_7X13`.
//! - [`scale_nearest_neighbor`] / [`center_on_surface`]: lazy image views
//!   over any [`Raster`]; nothing is copied until the view is rendered.
//! - [`monochrome`] / [`render_monochrome`]: threshold a raster and draw it
//!   onto the target.

use embedded_graphics::{
    image::GetPixel,
    mono_font::{ascii::FONT_7X13, MonoTextStyle},
    pixelcolor::{BinaryColor, Rgb888},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};
use tinybmp::Bmp;

use crate::error::OledError;

/// Horizontal advance of one glyph in pixels.
pub const GLYPH_ADVANCE: u32 = 7;

/// Height of one glyph in pixels.
pub const GLYPH_HEIGHT: u32 = 13;

// ── Anchor ───────────────────────────────────────────────────────────────

/// Where a line of text is pinned on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Every anchor, top row first.
    pub const ALL: [Anchor; 6] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    fn is_bottom(self) -> bool {
        matches!(
            self,
            Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight
        )
    }
}

// ── Text ─────────────────────────────────────────────────────────────────

/// Top-left origin for `text` pinned at `anchor` on a `surface`-sized area.
///
/// The advance is `7 px × character count`. Right and center anchors fall
/// back to `x = 0` when the text is wider than the surface; the text is then
/// left to run off the right edge rather than wrapped or truncated. Bottom
/// anchors put the glyph top at `height - 1 - 13`.
///
/// ```
/// # use embedded_graphics::prelude::*;
/// # use pioled_display_rs::layout::{layout_text, Anchor};
/// let origin = layout_text(Anchor::TopRight, "AB", Size::new(128, 64));
/// assert_eq!(origin, Point::new(114, 0));
/// ```
pub fn layout_text(anchor: Anchor, text: &str, surface: Size) -> Point {
    let advance = (text.chars().count() as u32).saturating_mul(GLYPH_ADVANCE);
    // `None` when the text does not fit.
    let slack = surface.width.checked_sub(advance);

    let x = match anchor {
        Anchor::TopLeft | Anchor::BottomLeft => 0,
        Anchor::TopRight | Anchor::BottomRight => slack.unwrap_or(0),
        Anchor::TopCenter | Anchor::BottomCenter => slack.map_or(0, |s| s / 2),
    };

    let y = if anchor.is_bottom() {
        surface.height as i32 - 1 - GLYPH_HEIGHT as i32
    } else {
        0
    };

    Point::new(x as i32, y)
}

/// Character style used for all text: `FONT_7X13`, lit pixels.
pub fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyle::new(&FONT_7X13, BinaryColor::On)
}

/// Draw `text` at `anchor` on `target`.
///
/// Only lit glyph pixels are drawn; whatever is already on the target
/// stays underneath.
pub fn draw_text<D>(target: &mut D, anchor: Anchor, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let origin = layout_text(anchor, text, target.bounding_box().size);
    Text::with_baseline(text, origin, text_style(), Baseline::Top).draw(target)?;
    Ok(())
}

// ── Raster sources ───────────────────────────────────────────────────────

/// Random-access pixel source.
///
/// `pixel` returns `None` for coordinates outside `size()`.
pub trait Raster {
    /// Pixel color type.
    type Color: PixelColor;

    /// Width and height in pixels.
    fn size(&self) -> Size;

    /// Color at `at`, or `None` outside the raster.
    fn pixel(&self, at: Point) -> Option<Self::Color>;
}

impl<R: Raster + ?Sized> Raster for &R {
    type Color = R::Color;

    fn size(&self) -> Size {
        (**self).size()
    }

    fn pixel(&self, at: Point) -> Option<Self::Color> {
        (**self).pixel(at)
    }
}

/// Borrowed row-major pixel grid.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a, C> {
    size: Size,
    pixels: &'a [C],
}

impl<'a, C: PixelColor> Bitmap<'a, C> {
    /// Wrap `pixels` (row-major, `size.width` per row).
    ///
    /// # Errors
    ///
    /// [`OledError::BufferLength`] if `pixels.len() != width * height`.
    pub fn new(size: Size, pixels: &'a [C]) -> Result<Self, OledError> {
        let expected = (size.width * size.height) as usize;
        if pixels.len() != expected {
            return Err(OledError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { size, pixels })
    }
}

impl<C: PixelColor> Raster for Bitmap<'_, C> {
    type Color = C;

    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, at: Point) -> Option<C> {
        let (x, y) = in_bounds(at, self.size)?;
        self.pixels
            .get((y * self.size.width + x) as usize)
            .copied()
    }
}

/// Decoded BMP files, e.g. `Bmp::<Rgb888>::from_slice(include_bytes!(..))`.
impl Raster for Bmp<'_, Rgb888> {
    type Color = Rgb888;

    fn size(&self) -> Size {
        OriginDimensions::size(self)
    }

    fn pixel(&self, at: Point) -> Option<Rgb888> {
        GetPixel::pixel(self, at)
    }
}

// ── Scaling and centering ────────────────────────────────────────────────

/// Nearest-neighbor view of `src` at `target` size.
///
/// Destination `(x, y)` samples source
/// `((x * src_w + target_w / 2) / target_w, (y * src_h + target_h / 2) / target_h)`,
/// clamped to the last source column and row. The rounding term must stay:
/// output is compared pixel-for-pixel against reference renders.
pub fn scale_nearest_neighbor<R: Raster>(src: R, target: Size) -> Scaled<R> {
    Scaled { src, size: target }
}

/// See [`scale_nearest_neighbor`].
#[derive(Debug, Clone, Copy)]
pub struct Scaled<R> {
    src: R,
    size: Size,
}

impl<R: Raster> Raster for Scaled<R> {
    type Color = R::Color;

    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, at: Point) -> Option<Self::Color> {
        let (x, y) = in_bounds(at, self.size)?;
        let src = self.src.size();
        let sx = nearest(x, src.width, self.size.width);
        let sy = nearest(y, src.height, self.size.height);
        self.src.pixel(Point::new(sx as i32, sy as i32))
    }
}

fn nearest(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    let s = (u64::from(dst) * u64::from(src_len) + u64::from(dst_len / 2)) / u64::from(dst_len);
    (s as u32).min(src_len.saturating_sub(1))
}

/// `img` composited opaquely onto a `surface`-sized blank of `background`.
///
/// The image's top-left lands at
/// `((surface_w - img_w) / 2, (surface_h - img_h) / 2)`. Pixels outside its
/// footprint read as `background`.
pub fn center_on_surface<R: Raster>(img: R, surface: Size, background: R::Color) -> Centered<R> {
    let inner = img.size();
    let offset = Point::new(
        (surface.width as i32 - inner.width as i32) / 2,
        (surface.height as i32 - inner.height as i32) / 2,
    );
    Centered {
        inner: img,
        size: surface,
        offset,
        background,
    }
}

/// See [`center_on_surface`].
#[derive(Debug, Clone, Copy)]
pub struct Centered<R: Raster> {
    inner: R,
    size: Size,
    offset: Point,
    background: R::Color,
}

impl<R: Raster> Centered<R> {
    /// Where the image's top-left corner sits on the surface.
    pub fn offset(&self) -> Point {
        self.offset
    }
}

impl<R: Raster> Raster for Centered<R> {
    type Color = R::Color;

    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, at: Point) -> Option<Self::Color> {
        in_bounds(at, self.size)?;
        Some(self.inner.pixel(at - self.offset).unwrap_or(self.background))
    }
}

// ── Rendering ────────────────────────────────────────────────────────────

/// `true` if any of red, green or blue is non-zero.
///
/// Very dark colors count as lit; there is no luminance threshold.
pub fn is_lit<C: Into<Rgb888>>(color: C) -> bool {
    let c: Rgb888 = color.into();
    c.r() > 0 || c.g() > 0 || c.b() > 0
}

/// Thresholded view of `img`: [`is_lit`] pixels read as [`BinaryColor::On`].
pub fn monochrome<R>(img: R) -> Monochrome<R>
where
    R: Raster,
    R::Color: Into<Rgb888>,
{
    Monochrome { inner: img }
}

/// See [`monochrome`].
#[derive(Debug, Clone, Copy)]
pub struct Monochrome<R> {
    inner: R,
}

impl<R> Raster for Monochrome<R>
where
    R: Raster,
    R::Color: Into<Rgb888>,
{
    type Color = BinaryColor;

    fn size(&self) -> Size {
        self.inner.size()
    }

    fn pixel(&self, at: Point) -> Option<BinaryColor> {
        self.inner.pixel(at).map(|c| BinaryColor::from(is_lit(c)))
    }
}

/// Draw every lit pixel of `img` onto `target` at the origin.
///
/// Black pixels are skipped, so callers clear the target first.
pub fn render_monochrome<D, R>(target: &mut D, img: &R) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
    R: Raster,
    R::Color: Into<Rgb888>,
{
    let lit = Rectangle::new(Point::zero(), img.size())
        .points()
        .filter(|&p| img.pixel(p).is_some_and(is_lit))
        .map(|p| Pixel(p, BinaryColor::On));
    target.draw_iter(lit)
}

fn in_bounds(at: Point, size: Size) -> Option<(u32, u32)> {
    let x = u32::try_from(at.x).ok()?;
    let y = u32::try_from(at.y).ok()?;
    (x < size.width && y < size.height).then_some((x, y))
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::framebuffer::Framebuffer;

    const ON: BinaryColor = BinaryColor::On;
    const OFF: BinaryColor = BinaryColor::Off;

    fn collect<R: Raster>(img: &R) -> Vec<Vec<R::Color>> {
        let size = img.size();
        (0..size.height as i32)
            .map(|y| {
                (0..size.width as i32)
                    .map(|x| img.pixel(Point::new(x, y)).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn glyph_metrics_match_font() {
        assert_eq!(FONT_7X13.character_size, Size::new(GLYPH_ADVANCE, GLYPH_HEIGHT));
        assert_eq!(FONT_7X13.character_spacing, 0);
    }

    #[test]
    fn top_left_is_origin() {
        let p = layout_text(Anchor::TopLeft, "AB", Size::new(128, 64));
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn top_right_subtracts_advance() {
        let p = layout_text(Anchor::TopRight, "AB", Size::new(128, 64));
        assert_eq!(p, Point::new(114, 0));
    }

    #[test]
    fn wide_text_falls_back_to_left_edge() {
        let p = layout_text(
            Anchor::BottomCenter,
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Size::new(40, 64),
        );
        assert_eq!(p, Point::new(0, 50));

        let p = layout_text(Anchor::BottomRight, "ABCDEFGHIJKLMNOPQRSTUVWXYZ", Size::new(40, 64));
        assert_eq!(p, Point::new(0, 50));
    }

    #[test]
    fn centered_and_bottom_anchors() {
        let size = Size::new(128, 64);
        // "Super Google." is 13 chars = 91 px.
        assert_eq!(layout_text(Anchor::TopCenter, "Super Google.", size), Point::new(18, 0));
        assert_eq!(layout_text(Anchor::BottomLeft, "Super Google.", size), Point::new(0, 50));
        assert_eq!(layout_text(Anchor::BottomRight, "Super Google.", size), Point::new(37, 50));
        // Exact fit is not a fallback.
        assert_eq!(layout_text(Anchor::TopRight, "ABCD", Size::new(28, 32)), Point::new(0, 0));
        assert_eq!(layout_text(Anchor::BottomCenter, "AB", Size::new(128, 32)), Point::new(57, 18));
    }

    #[test]
    fn advance_counts_characters_not_bytes() {
        let p = layout_text(Anchor::TopRight, "é", Size::new(128, 64));
        assert_eq!(p, Point::new(121, 0));
    }

    #[test]
    fn draw_text_lights_pixels_inside_the_anchor_box() {
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        draw_text(&mut fb, Anchor::BottomRight, "A").unwrap();

        let mut lit = 0;
        for y in 0..64 {
            for x in 0..128 {
                if fb.pixel(x, y) == Some(true) {
                    lit += 1;
                    assert!((121..128).contains(&x), "x={} outside glyph box", x);
                    assert!((50..63).contains(&y), "y={} outside glyph box", y);
                }
            }
        }
        assert!(lit > 0);
    }

    #[test]
    fn checkerboard_2x2_to_4x4() {
        let src = [ON, OFF, OFF, ON];
        let bmp = Bitmap::new(Size::new(2, 2), &src).unwrap();
        let scaled = scale_nearest_neighbor(&bmp, Size::new(4, 4));

        // Columns and rows map 0 -> 0, 1 -> 1, 2 -> 1, 3 -> 1 (clamped).
        assert_eq!(
            collect(&scaled),
            vec![
                vec![ON, OFF, OFF, OFF],
                vec![OFF, ON, ON, ON],
                vec![OFF, ON, ON, ON],
                vec![OFF, ON, ON, ON],
            ]
        );
    }

    #[test]
    fn downscale_uses_rounding_bias() {
        // 1x4 column 0,1,2,3 (encoded as gray) scaled to 1x2.
        let src = [
            Rgb888::new(0, 0, 0),
            Rgb888::new(1, 0, 0),
            Rgb888::new(2, 0, 0),
            Rgb888::new(3, 0, 0),
        ];
        let bmp = Bitmap::new(Size::new(1, 4), &src).unwrap();
        let scaled = scale_nearest_neighbor(bmp, Size::new(1, 2));
        // y=0 -> (0*4 + 1)/2 = 0, y=1 -> (1*4 + 1)/2 = 2
        assert_eq!(scaled.pixel(Point::new(0, 0)), Some(Rgb888::new(0, 0, 0)));
        assert_eq!(scaled.pixel(Point::new(0, 1)), Some(Rgb888::new(2, 0, 0)));
        assert_eq!(scaled.pixel(Point::new(0, 2)), None);
    }

    #[test]
    fn centering_pads_with_background() {
        let src = [ON; 4];
        let bmp = Bitmap::new(Size::new(2, 2), &src).unwrap();
        let centered = center_on_surface(bmp, Size::new(4, 3), OFF);
        assert_eq!(centered.offset(), Point::new(1, 0));
        assert_eq!(
            collect(&centered),
            vec![
                vec![OFF, ON, ON, OFF],
                vec![OFF, ON, ON, OFF],
                vec![OFF, OFF, OFF, OFF],
            ]
        );
    }

    #[test]
    fn oversized_image_is_cropped_around_center() {
        let src = [OFF, OFF, ON, OFF, OFF];
        let bmp = Bitmap::new(Size::new(5, 1), &src).unwrap();
        let centered = center_on_surface(bmp, Size::new(3, 1), OFF);
        assert_eq!(centered.offset(), Point::new(-1, 0));
        assert_eq!(collect(&centered), vec![vec![OFF, ON, OFF]]);
    }

    #[test]
    fn any_channel_counts_as_lit() {
        assert!(is_lit(Rgb888::new(1, 0, 0)));
        assert!(is_lit(Rgb888::new(0, 0, 1)));
        assert!(!is_lit(Rgb888::new(0, 0, 0)));
        assert!(is_lit(BinaryColor::On));
        assert!(!is_lit(BinaryColor::Off));
    }

    #[test]
    fn monochrome_view_thresholds() {
        let src = [Rgb888::new(0, 0, 0), Rgb888::new(0, 0, 3)];
        let bmp = Bitmap::new(Size::new(2, 1), &src).unwrap();
        let mono = monochrome(bmp);
        assert_eq!(mono.pixel(Point::new(0, 0)), Some(OFF));
        assert_eq!(mono.pixel(Point::new(1, 0)), Some(ON));
        assert_eq!(mono.pixel(Point::new(2, 0)), None);
    }

    #[test]
    fn render_monochrome_thresholds() {
        let src = [
            Rgb888::new(0, 0, 0),
            Rgb888::new(0, 9, 0),
            Rgb888::new(255, 255, 255),
            Rgb888::new(0, 0, 0),
        ];
        let bmp = Bitmap::new(Size::new(2, 2), &src).unwrap();
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        render_monochrome(&mut fb, &bmp).unwrap();
        assert_eq!(fb.pixel(0, 0), Some(false));
        assert_eq!(fb.pixel(1, 0), Some(true));
        assert_eq!(fb.pixel(0, 1), Some(true));
        assert_eq!(fb.pixel(1, 1), Some(false));
    }

    /// 2×1 24-bit BMP: black at x=0, white at x=1.
    const BLACK_WHITE_BMP: [u8; 62] = [
        b'B', b'M', 62, 0, 0, 0, 0, 0, 0, 0, 54, 0, 0, 0, // file header
        40, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 1, 0, 24, 0, // info header
        0, 0, 0, 0, 8, 0, 0, 0, 0x13, 0x0B, 0, 0, 0x13, 0x0B, 0, 0, //
        0, 0, 0, 0, 0, 0, 0, 0, //
        0, 0, 0, 0xFF, 0xFF, 0xFF, 0, 0, // BGR row, padded to 4 bytes
    ];

    #[test]
    fn bmp_is_a_raster() {
        let bmp = Bmp::<Rgb888>::from_slice(&BLACK_WHITE_BMP).unwrap();
        assert_eq!(Raster::size(&bmp), Size::new(2, 1));
        assert_eq!(Raster::pixel(&bmp, Point::new(0, 0)), Some(Rgb888::BLACK));
        assert_eq!(Raster::pixel(&bmp, Point::new(1, 0)), Some(Rgb888::WHITE));
        assert_eq!(Raster::pixel(&bmp, Point::new(2, 0)), None);
    }

    #[test]
    fn bmp_renders_through_scaling() {
        let bmp = Bmp::<Rgb888>::from_slice(&BLACK_WHITE_BMP).unwrap();
        let scaled = scale_nearest_neighbor(&bmp, Size::new(4, 2));
        let mut fb = Framebuffer::new(128, 64, 8).unwrap();
        render_monochrome(&mut fb, &scaled).unwrap();

        // Columns map 0 -> 0, 1 -> 1, 2 -> 1, 3 -> 1 (clamped).
        for y in 0..2 {
            assert_eq!(fb.pixel(0, y), Some(false));
            for x in 1..4 {
                assert_eq!(fb.pixel(x, y), Some(true));
            }
        }
    }

    #[test]
    fn bitmap_checks_length() {
        let src = [ON; 3];
        assert!(matches!(
            Bitmap::new(Size::new(2, 2), &src),
            Err(OledError::BufferLength { expected: 4, actual: 3 })
        ));
    }
}
