//! Whole-page rendering: paint order, viewport culling, eraser compositing
//!
//! Paint order within a page is fixed: shapes by ascending z-index (each
//! erased object composited through its own offscreen layer), then
//! selection chrome. Transient overlays such as the marquee are drawn by the
//! caller afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::chrome;
use super::geometry::eraser::LAYER_PADDING;
use super::shapes::{draw_body, draw_caption, draw_object};
use super::surface::{Surface, polyline_path};
use super::text::GlyphPainter;
use crate::domain::{Bounds, DrawingObject, ObjectId, Point, Shape};
use crate::geometry::{hit_test, paint_order, rotated_bounds, rotation_pivot};
use crate::store::{ObjectStore, Viewport};

/// Viewport culling settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CullingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Page units added around the visible area
    #[serde(default = "default_margin")]
    pub margin: f32,
    /// Outline the culling area and log drawn/culled counts
    #[serde(default)]
    pub debug_mode: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_margin() -> f32 {
    100.0
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            margin: default_margin(),
            debug_mode: false,
        }
    }
}

/// Counts from one page render
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
    pub composited: usize,
}

/// Draws pages of drawing objects onto a [`Surface`]
#[derive(Debug)]
pub struct PageRenderer {
    pub culling: CullingConfig,
    viewport: Option<Viewport>,
    glyphs: Option<GlyphPainter>,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(CullingConfig::default())
    }
}

impl PageRenderer {
    /// Renderer drawing text with the bundled font
    pub fn new(culling: CullingConfig) -> Self {
        let glyphs = GlyphPainter::embedded()
            .inspect_err(|e| log::warn!("Bundled font unusable, text will not be drawn: {e:#}"))
            .ok();
        Self {
            culling,
            viewport: None,
            glyphs,
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphPainter) -> Self {
        self.glyphs = Some(glyphs);
        self
    }


    pub fn glyphs(&self) -> Option<&GlyphPainter> {
        self.glyphs.as_ref()
    }

    /// Set the view used for culling; `None` disables culling entirely
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// Page-unit area outside which unselected objects are skipped
    pub fn culling_area(&self) -> Option<Bounds> {
        if !self.culling.enabled {
            return None;
        }
        self.viewport
            .map(|vp| vp.visible_area(self.culling.margin))
    }

    /// Whether an object takes part in drawing and hit-testing
    ///
    /// Selected objects are always included so their chrome stays visible.
    pub fn is_visible(&self, obj: &DrawingObject, selected: bool) -> bool {
        if selected {
            return true;
        }
        match self.culling_area() {
            Some(area) => rotated_bounds(obj).intersects(&area),
            None => true,
        }
    }

    /// Draw one object (and its chrome when selected)
    pub fn render_object(&self, surface: &mut Surface, obj: &DrawingObject, selected: bool) {
        super::shapes::render_object(surface, obj, selected, self.glyphs());
    }

    /// Draw a page from the store, shifted right by `x_offset` for split views
    pub fn render_page(
        &self,
        surface: &mut Surface,
        store: &dyn ObjectStore,
        page: usize,
        x_offset: f32,
    ) -> RenderStats {
        let selection = store.get_selected_indices(page);
        self.render_all(surface, store.get_page_objects(page), &selection, x_offset)
    }

    /// Draw every object of a page in paint order, then selection chrome
    pub fn render_all(
        &self,
        surface: &mut Surface,
        objects: &[DrawingObject],
        selection: &[usize],
        x_offset: f32,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let erasers = linked_erasers(objects);

        surface.save();
        surface.translate(x_offset, 0.0);

        for index in paint_order(objects) {
            let obj = &objects[index];
            if obj.is_eraser() {
                continue;
            }
            if !self.is_visible(obj, selection.contains(&index)) {
                stats.culled += 1;
                continue;
            }
            stats.drawn += 1;

            let linked = obj
                .id
                .and_then(|id| erasers.get(&id))
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if !linked.is_empty() && self.composite_erased(surface, obj, linked) {
                stats.composited += 1;
            } else {
                draw_object(surface, obj, self.glyphs());
            }
        }

        for &index in selection {
            if let Some(obj) = objects.get(index).filter(|o| !o.is_eraser()) {
                chrome::draw_selection(surface, obj);
            }
        }

        if self.culling.debug_mode {
            if let Some(area) = self.culling_area() {
                chrome::draw_culling_outline(surface, &area);
            }
            log::debug!(
                "Rendered page: {} drawn, {} culled, {} composited",
                stats.drawn,
                stats.culled,
                stats.composited
            );
        }

        surface.restore();
        stats
    }

    /// Draw `obj` minus its eraser strokes through an offscreen layer
    ///
    /// The caption annotation is drawn afterwards straight onto `surface`
    /// so erasing never removes it. Returns false when no layer could be
    /// allocated, leaving the caller to draw the object directly.
    fn composite_erased(
        &self,
        surface: &mut Surface,
        obj: &DrawingObject,
        erasers: &[&DrawingObject],
    ) -> bool {
        let widest = erasers
            .iter()
            .map(|e| e.line_width())
            .fold(0.0_f32, f32::max);
        let area = rotated_bounds(obj).expand(widest + LAYER_PADDING);
        let Some((mut layer, origin)) = surface.offscreen(&area) else {
            log::debug!("Eraser layer unavailable for {:?}; drawing directly", obj.id);
            return false;
        };

        draw_body(&mut layer, obj, self.glyphs());
        for eraser in erasers {
            let Some(path) = eraser_path(eraser) else {
                continue;
            };
            layer.save();
            if eraser.is_rotated() {
                layer.rotate_about(rotation_pivot(eraser), eraser.rotation());
            }
            layer.erase(&path, eraser.line_width());
            layer.restore();
        }

        surface.blit(&layer, origin);
        draw_caption(surface, obj, self.glyphs());
        true
    }

    /// Topmost hittable object under `point`
    ///
    /// Culled objects are not hittable; selected ones always are.
    pub fn hit_test_all(
        &self,
        point: Point,
        objects: &[DrawingObject],
        selection: &[usize],
        tolerance: f32,
    ) -> Option<usize> {
        hit_test::hit_test_all_where(point, objects, tolerance, |i| {
            self.is_visible(&objects[i], selection.contains(&i))
        })
    }
}

fn eraser_path(eraser: &DrawingObject) -> Option<tiny_skia::Path> {
    match &eraser.shape {
        Shape::Eraser(e) => polyline_path(&e.points),
        _ => None,
    }
}

/// Eraser strokes keyed by the id of each object they occlude, in paint order
fn linked_erasers(objects: &[DrawingObject]) -> HashMap<ObjectId, Vec<&DrawingObject>> {
    let mut map: HashMap<ObjectId, Vec<&DrawingObject>> = HashMap::new();
    for index in paint_order(objects) {
        let obj = &objects[index];
        if let Shape::Eraser(e) = &obj.shape {
            for id in &e.linked_object_ids {
                map.entry(*id).or_default().push(obj);
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Annotation, Color, Corners, EraserStroke, LeaderLine};

    fn rect_at(x: f32, y: f32, id: u64) -> DrawingObject {
        let mut obj = DrawingObject::new(Shape::Rect(Corners::new(
            Point::new(x, y),
            Point::new(x + 20.0, y + 20.0),
        )))
        .with_line_width(4.0);
        obj.id = Some(ObjectId(id));
        obj
    }

    fn alpha(surface: &Surface, x: u32, y: u32) -> u8 {
        surface.pixel(x, y).map(|p| p[3]).unwrap_or(0)
    }

    fn culling_renderer() -> PageRenderer {
        let mut renderer = PageRenderer::new(CullingConfig {
            enabled: true,
            margin: 0.0,
            debug_mode: false,
        });
        renderer.set_viewport(Some(Viewport::new(100.0, 100.0)));
        renderer
    }

    #[test]
    fn test_offscreen_object_is_culled() {
        let renderer = culling_renderer();
        let mut surface = Surface::new(100, 100).unwrap();
        let objects = vec![rect_at(10.0, 10.0, 1), rect_at(500.0, 500.0, 2)];
        let stats = renderer.render_all(&mut surface, &objects, &[], 0.0);
        assert_eq!((stats.drawn, stats.culled), (1, 1));
    }

    #[test]
    fn test_selected_object_never_culled() {
        let renderer = culling_renderer();
        let mut surface = Surface::new(100, 100).unwrap();
        let objects = vec![rect_at(500.0, 500.0, 1)];
        let stats = renderer.render_all(&mut surface, &objects, &[0], 0.0);
        assert_eq!((stats.drawn, stats.culled), (1, 0));
        assert!(renderer.is_visible(&objects[0], true));
    }

    #[test]
    fn test_culling_disabled_draws_everything() {
        let mut renderer = culling_renderer();
        renderer.culling.enabled = false;
        let mut surface = Surface::new(100, 100).unwrap();
        let objects = vec![rect_at(500.0, 500.0, 1)];
        assert_eq!(renderer.render_all(&mut surface, &objects, &[], 0.0).culled, 0);
    }

    #[test]
    fn test_culled_object_not_hittable() {
        let renderer = culling_renderer();
        let objects = vec![rect_at(500.0, 500.0, 1)];
        let p = Point::new(500.0, 510.0);
        assert_eq!(renderer.hit_test_all(p, &objects, &[], 5.0), None);
        assert_eq!(renderer.hit_test_all(p, &objects, &[0], 5.0), Some(0));
    }

    #[test]
    fn test_x_offset_shifts_drawing() {
        let renderer = PageRenderer::default();
        let mut surface = Surface::new(100, 60).unwrap();
        let objects = vec![rect_at(10.0, 10.0, 1)];
        renderer.render_all(&mut surface, &objects, &[], 50.0);
        assert_eq!(alpha(&surface, 10, 20), 0);
        assert!(alpha(&surface, 60, 20) > 0);
    }

    #[test]
    fn test_eraser_removes_stroke_but_keeps_caption_leader() {
        let renderer = PageRenderer::default();
        let mut surface = Surface::new(120, 120).unwrap();
        let mut line = DrawingObject::new(Shape::Line(Corners::new(
            Point::new(10.0, 20.0),
            Point::new(100.0, 20.0),
        )))
        .with_line_width(4.0)
        .with_color(Color::rgb(255, 0, 0))
        .with_annotation(Annotation {
            leader_line: Some(LeaderLine::new(Point::new(55.0, 20.0), Point::new(55.0, 90.0))),
            ..Annotation::new("", Point::new(55.0, 90.0), 12.0)
        });
        line.id = Some(ObjectId(1));

        let mut stroke = EraserStroke {
            points: vec![Point::new(40.0, 0.0), Point::new(40.0, 110.0)],
            ..Default::default()
        };
        stroke.linked_object_ids.insert(ObjectId(1));
        let mut eraser = DrawingObject::new(Shape::Eraser(stroke)).with_line_width(30.0);
        eraser.id = Some(ObjectId(2));
        // Second eraser wipes across the caption leader's column
        let mut over_leader = EraserStroke {
            points: vec![Point::new(55.0, 40.0), Point::new(55.0, 80.0)],
            ..Default::default()
        };
        over_leader.linked_object_ids.insert(ObjectId(1));
        let mut eraser2 = DrawingObject::new(Shape::Eraser(over_leader)).with_line_width(10.0);
        eraser2.id = Some(ObjectId(3));

        let stats = renderer.render_all(&mut surface, &[line, eraser, eraser2], &[], 0.0);
        assert_eq!(stats.composited, 1);
        // Shape stroke removed under the eraser, kept elsewhere
        assert_eq!(alpha(&surface, 40, 20), 0);
        assert_eq!(alpha(&surface, 80, 20), 255);
        // Caption leader untouched even where an eraser crossed it
        assert_eq!(alpha(&surface, 55, 60), 255);
    }

    #[test]
    fn test_erasing_across_caption_text_leaves_its_pixels() {
        use crate::geometry::bounds::annotation_text_box;

        let renderer = PageRenderer::default();
        let mut line = DrawingObject::new(Shape::Line(Corners::new(
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
        )))
        .with_line_width(4.0)
        .with_color(Color::rgb(0, 0, 255))
        .with_annotation(Annotation {
            leader_line: Some(LeaderLine::new(Point::new(60.0, 20.0), Point::new(40.0, 80.0))),
            ..Annotation::new("Note", Point::new(40.0, 80.0), 20.0)
        });
        line.id = Some(ObjectId(1));
        let caption = line.annotation.clone().unwrap();

        // One wide stroke through both the line and the caption text
        let mut stroke = EraserStroke {
            points: vec![Point::new(50.0, 0.0), Point::new(50.0, 119.0)],
            ..Default::default()
        };
        stroke.linked_object_ids.insert(ObjectId(1));
        let eraser = DrawingObject::new(Shape::Eraser(stroke)).with_line_width(30.0);

        let mut plain = Surface::new(140, 120).unwrap();
        let mut erased = Surface::new(140, 120).unwrap();
        renderer.render_all(&mut plain, std::slice::from_ref(&line), &[], 0.0);
        let stats = renderer.render_all(&mut erased, &[line, eraser], &[], 0.0);
        assert_eq!(stats.composited, 1);
        assert_eq!(alpha(&erased, 50, 20), 0);
        assert_eq!(alpha(&erased, 100, 20), 255);

        let text = annotation_text_box(&caption).expand(6.0);
        let mut inked = 0;
        for y in text.y.max(0.0) as u32..text.bottom().min(119.0) as u32 {
            for x in text.x.max(0.0) as u32..text.right().min(139.0) as u32 {
                assert_eq!(plain.pixel(x, y), erased.pixel(x, y), "caption pixel {x},{y}");
                if alpha(&erased, x, y) > 0 {
                    inked += 1;
                }
            }
        }
        assert!(inked > 50, "caption text was not drawn");
    }

    #[test]
    fn test_rotated_object_composited_in_place() {
        let renderer = PageRenderer::default();
        let mut plain = Surface::new(100, 100).unwrap();
        let mut erased = Surface::new(100, 100).unwrap();
        let mut obj = rect_at(30.0, 30.0, 1).with_rotation(0.5);
        obj.id = Some(ObjectId(1));

        let mut stroke = EraserStroke {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)],
            ..Default::default()
        };
        stroke.linked_object_ids.insert(ObjectId(1));
        let eraser = DrawingObject::new(Shape::Eraser(stroke));

        renderer.render_all(&mut plain, std::slice::from_ref(&obj), &[], 0.0);
        renderer.render_all(&mut erased, &[obj, eraser], &[], 0.0);
        // An eraser far away leaves the object's pixels as they were
        let max_diff = plain
            .pixmap()
            .data()
            .iter()
            .zip(erased.pixmap().data())
            .map(|(a, b)| a.abs_diff(*b))
            .max();
        assert!(max_diff.is_some_and(|d| d <= 1));
    }
}
