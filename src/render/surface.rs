//! Drawing surface over a tiny-skia pixmap
//!
//! A [`Surface`] owns the pixels plus a save/restore stack of transforms, so
//! draw routines can rotate about a pivot or shift for split views without
//! threading a `Transform` through every call.

use image::RgbaImage;
use tiny_skia::{
    BlendMode, ColorU8, FillRule, FilterQuality, IntSize, LineCap, LineJoin, Paint, Path,
    PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash, Transform,
};

use crate::domain::{Bounds, Color, Point};

/// Saved pixel contents for repaint-based previews
#[derive(Clone)]
pub struct Snapshot(Pixmap);

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({}x{})", self.0.width(), self.0.height())
    }
}

pub struct Surface {
    pixmap: Pixmap,
    transform: Transform,
    stack: Vec<Transform>,
}

/// Solid anti-aliased paint for a color
pub fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.into());
    paint.anti_alias = true;
    paint
}

/// Round-capped, round-joined stroke
pub fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width: width.max(0.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

impl Surface {
    /// Transparent surface; `None` for a zero-sized request
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(Self::from_pixmap)
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            transform: Transform::identity(),
            stack: Vec::new(),
        }
    }

    /// Copy a straight-alpha page raster into a new surface
    pub fn from_image(img: &RgbaImage) -> Option<Self> {
        let size = IntSize::from_wh(img.width(), img.height())?;
        let mut data = Vec::with_capacity(img.as_raw().len());
        for px in img.pixels() {
            let c = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Pixmap::from_vec(data, size).map(Self::from_pixmap)
    }

    /// Export the pixels as a straight-alpha raster
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width(), self.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        img
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Straight-alpha RGBA of one pixel, ignoring the transform
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn fill_color(&mut self, color: Color) {
        self.pixmap.fill(color.into());
    }

    // ========================================================================
    // Transform stack
    // ========================================================================

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn save(&mut self) {
        self.stack.push(self.transform);
    }

    /// Pop the last saved transform; an unbalanced restore resets to identity
    pub fn restore(&mut self) {
        self.transform = self.stack.pop().unwrap_or_default();
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    /// Rotate subsequent drawing by `radians` about `pivot`
    pub fn rotate_about(&mut self, pivot: Point, radians: f32) {
        if radians == 0.0 {
            return;
        }
        self.transform = self
            .transform
            .pre_concat(Transform::from_rotate_at(radians.to_degrees(), pivot.x, pivot.y));
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    pub fn stroke_with(&mut self, path: &Path, paint: &Paint, stroke: &Stroke) {
        self.pixmap
            .stroke_path(path, paint, stroke, self.transform, None);
    }

    pub fn fill_with(&mut self, path: &Path, paint: &Paint) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, self.transform, None);
    }

    /// Stroke with round caps and joins
    pub fn stroke(&mut self, path: &Path, color: Color, width: f32) {
        self.stroke_with(path, &solid_paint(color), &round_stroke(width));
    }

    /// Dashed hairline-style stroke for marquees and debug outlines
    pub fn stroke_dashed(&mut self, path: &Path, color: Color, width: f32, dash: &[f32]) {
        let stroke = Stroke {
            width,
            dash: StrokeDash::new(dash.to_vec(), 0.0),
            ..Default::default()
        };
        self.stroke_with(path, &solid_paint(color), &stroke);
    }

    pub fn fill(&mut self, path: &Path, color: Color) {
        self.fill_with(path, &solid_paint(color));
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.fill(&path, color);
        }
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.stroke(&path, color, width);
        }
    }

    /// Remove coverage along `path` (destination-out)
    pub fn erase(&mut self, path: &Path, width: f32) {
        let mut paint = solid_paint(Color::BLACK);
        paint.blend_mode = BlendMode::DestinationOut;
        self.stroke_with(path, &paint, &round_stroke(width));
    }

    // ========================================================================
    // Snapshots and layers
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.pixmap.clone())
    }

    /// Put back pixels captured by [`Surface::snapshot`]
    ///
    /// A snapshot of a different size (the surface was reallocated) is ignored.
    pub fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        if snapshot.0.width() != self.width() || snapshot.0.height() != self.height() {
            log::debug!("Ignoring snapshot of mismatched size");
            return;
        }
        self.pixmap.data_mut().copy_from_slice(snapshot.0.data());
    }

    /// Page-unit box that the current transform maps onto the pixels
    pub fn visible_area(&self) -> Option<Bounds> {
        let inverse = self.transform.invert()?;
        let (w, h) = (self.width() as f32, self.height() as f32);
        let mut corners = [
            tiny_skia::Point::from_xy(0.0, 0.0),
            tiny_skia::Point::from_xy(w, 0.0),
            tiny_skia::Point::from_xy(w, h),
            tiny_skia::Point::from_xy(0.0, h),
        ];
        inverse.map_points(&mut corners);
        Bounds::from_points(&corners.map(|c| Point::new(c.x, c.y)))
    }

    /// Offscreen layer covering `area` (page units of this surface)
    ///
    /// The area is clipped to what is visible on this surface first. The
    /// layer's transform maps page units so that drawing code can be reused
    /// unchanged. Returns the layer and its integer origin.
    pub fn offscreen(&self, area: &Bounds) -> Option<(Surface, Point)> {
        let area = area.intersect(&self.visible_area()?)?;
        let origin = Point::new(area.x.floor(), area.y.floor());
        let width = (area.right() - origin.x).ceil();
        let height = (area.bottom() - origin.y).ceil();
        if !(width >= 1.0 && height >= 1.0) {
            return None;
        }
        let mut layer = Surface::new(width as u32, height as u32)?;
        layer.translate(-origin.x, -origin.y);
        Some((layer, origin))
    }

    /// Draw `image` stretched over `target`
    pub fn draw_image(&mut self, image: &Pixmap, target: &Bounds) {
        let sx = target.width / image.width() as f32;
        let sy = target.height / image.height() as f32;
        if !(sx.is_finite() && sy.is_finite()) || sx <= 0.0 || sy <= 0.0 {
            return;
        }
        let transform = self
            .transform
            .pre_translate(target.x, target.y)
            .pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    /// Composite a layer produced by [`Surface::offscreen`] back at `origin`
    pub fn blit(&mut self, layer: &Surface, origin: Point) {
        let transform = self.transform.pre_translate(origin.x, origin.y);
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.pixmap.as_ref(),
            &PixmapPaint::default(),
            transform,
            None,
        );
    }
}

/// Closed path through `points`
pub fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Open path through `points`; a single point becomes a zero-length segment
pub fn polyline_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    if rest.is_empty() {
        // Round caps render a dot for a degenerate segment
        pb.line_to(first.x + 0.01, first.y);
    }
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.finish()
}

/// Axis-aligned rectangle outline path
pub fn rect_path(b: &Bounds) -> Option<Path> {
    polygon_path(&b.corners())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_round_trip_keeps_opaque_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(1, 2, image::Rgba([10, 20, 30, 255]));
        let surface = Surface::from_image(&img).unwrap();
        assert_eq!(surface.pixel(1, 2), Some([10, 20, 30, 255]));
        assert_eq!(surface.to_image().get_pixel(1, 2), &image::Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_snapshot_restores_pixels() {
        let mut surface = Surface::new(20, 20).unwrap();
        let before = surface.snapshot();
        surface.fill_circle(Point::new(10.0, 10.0), 5.0, Color::BLACK);
        assert_eq!(surface.pixel(10, 10).map(|p| p[3]), Some(255));
        surface.restore_snapshot(&before);
        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_save_restore_transform() {
        let mut surface = Surface::new(10, 10).unwrap();
        surface.save();
        surface.translate(5.0, 0.0);
        assert!(!surface.transform().is_identity());
        surface.restore();
        assert!(surface.transform().is_identity());
    }

    #[test]
    fn test_erase_removes_coverage() {
        let mut surface = Surface::new(20, 20).unwrap();
        surface.fill_color(Color::BLACK);
        let path = polyline_path(&[Point::new(0.0, 10.0), Point::new(20.0, 10.0)]).unwrap();
        surface.erase(&path, 4.0);
        assert_eq!(surface.pixel(10, 10).map(|p| p[3]), Some(0));
        assert_eq!(surface.pixel(10, 2).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_offscreen_layer_blits_in_place() {
        let mut page = Surface::new(40, 40).unwrap();
        let area = Bounds::new(10.5, 10.5, 10.0, 10.0);
        let (mut layer, origin) = page.offscreen(&area).unwrap();
        assert_eq!(origin, Point::new(10.0, 10.0));
        layer.fill_circle(Point::new(15.0, 15.0), 3.0, Color::BLACK);
        page.blit(&layer, origin);
        assert_eq!(page.pixel(15, 15).map(|p| p[3]), Some(255));
        assert_eq!(page.pixel(5, 5).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_offscreen_layer_is_clipped_to_surface() {
        let mut page = Surface::new(40, 40).unwrap();
        let (layer, origin) = page.offscreen(&Bounds::new(-5000.0, 30.0, 1e6, 1e6)).unwrap();
        assert_eq!(origin, Point::new(0.0, 30.0));
        assert_eq!((layer.width(), layer.height()), (40, 10));

        // Split-view shift moves the visible window in page units
        page.translate(100.0, 0.0);
        assert!(page.offscreen(&Bounds::new(50.0, 0.0, 20.0, 20.0)).is_none());
        let (_, origin) = page.offscreen(&Bounds::new(-110.0, 0.0, 20.0, 20.0)).unwrap();
        assert_eq!(origin, Point::new(-100.0, 0.0));
    }

    #[test]
    fn test_zero_sized_offscreen_is_none() {
        let page = Surface::new(10, 10).unwrap();
        assert!(page.offscreen(&Bounds::new(1.0, 1.0, 0.0, 0.0)).is_none());
    }
}
