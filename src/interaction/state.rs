//! Pointer-driven gesture state machine
//!
//! Turns pointer and key events into committed objects. Previews are drawn
//! by restoring a snapshot of the surface taken when the gesture began and
//! painting the draft on top, so cancelling always puts back the exact
//! pre-gesture pixels.

use tiny_skia::Pixmap;

use super::draft;
use super::events::{Key, Modifiers, Outcome, PointerEvent};
use super::select::{self, SelectGesture};
use super::tool::{Gesture, Tool, ToolOptions};
use crate::domain::{
    Annotation, Color, DrawingObject, ImageData, ImagePlacement, LabeledBox, LeaderLine,
    ObjectId, Point, Shape, TextAlign, TextBlock,
};
use crate::render::shapes::{draw_leader, draw_object};
use crate::render::surface::polyline_path;
use crate::render::{GlyphPainter, PageRenderer, Snapshot, Surface};
use crate::store::ObjectStore;

// ============================================================================
// Collaborators
// ============================================================================

/// What a text prompt is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Caption of a rect, ellipse or line
    Caption,
    /// One-character label of a labeled rect
    Label,
    /// Font name of a font label
    FontName,
    /// Body of a text object
    Text,
    /// Label of an annotated double arrow
    Dimension,
}

/// Text input supplied by the host UI
///
/// `None` means the user cancelled.
pub trait Prompt {
    fn request_text(&mut self, kind: PromptKind) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut(PromptKind) -> Option<String>,
{
    fn request_text(&mut self, kind: PromptKind) -> Option<String> {
        self(kind)
    }
}

/// Everything an event handler may touch
pub struct Context<'a> {
    pub page: usize,
    pub store: &'a mut dyn ObjectStore,
    pub surface: &'a mut Surface,
    pub prompt: &'a mut dyn Prompt,
    /// Culling and glyphs of the page view, when one is attached
    pub renderer: Option<&'a PageRenderer>,
}

impl<'a> Context<'a> {
    pub fn new(
        page: usize,
        store: &'a mut dyn ObjectStore,
        surface: &'a mut Surface,
        prompt: &'a mut dyn Prompt,
    ) -> Self {
        Self {
            page,
            store,
            surface,
            prompt,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: &'a PageRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub(super) fn glyphs(&self) -> Option<&'a GlyphPainter> {
        self.renderer.and_then(|r| r.glyphs())
    }

    pub(super) fn objects(&self) -> &[DrawingObject] {
        self.store.get_page_objects(self.page)
    }

    pub(super) fn object(&self, id: ObjectId) -> Option<&DrawingObject> {
        self.objects().iter().find(|o| o.id == Some(id))
    }

    /// Draw a page-space object at a split-view offset
    pub(super) fn draw_at(&mut self, obj: &DrawingObject, offset: (f32, f32)) {
        let glyphs = self.glyphs();
        self.surface.save();
        self.surface.translate(offset.0, offset.1);
        draw_object(self.surface, obj, glyphs);
        self.surface.restore();
    }
}

// ============================================================================
// States
// ============================================================================

/// A press-drag-release gesture in progress
#[derive(Debug, Clone)]
pub struct Drag {
    pub tool: Tool,
    pub start: Point,
    pub current: Point,
    /// Every pointer position, for freehand tools
    pub points: Vec<Point>,
    pub modifiers: Modifiers,
    pub offset: (f32, f32),
}

/// A committed shape waiting for the click that places its caption
#[derive(Debug, Clone)]
pub struct PendingCaption {
    pub id: ObjectId,
    pub offset: (f32, f32),
}

#[derive(Debug, Clone)]
pub struct PolylineDraft {
    pub points: Vec<Point>,
    pub hover: Option<Point>,
    pub offset: (f32, f32),
}

/// Labeled rect leader being pulled out of its anchor
#[derive(Debug, Clone)]
pub struct LeaderPhase {
    pub anchor: Point,
    pub current: Point,
    pub offset: (f32, f32),
}

/// Labeled rect square being dragged from just past the fixed leader end
#[derive(Debug, Clone)]
pub struct BoxPhase {
    pub leader: LeaderLine,
    /// Corner the square grows from
    pub origin: Point,
    pub current: Point,
    pub offset: (f32, f32),
}

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Idle,
    Dragging(Drag),
    LeaderPending(PendingCaption),
    PolylineCollecting(PolylineDraft),
    LabeledRectLeaderPhase(LeaderPhase),
    LabeledRectBoxPhase(BoxPhase),
    /// Select tool moving, resizing, rotating or marquee-selecting
    Manipulating(SelectGesture),
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Idle => "idle",
            State::Dragging(_) => "dragging",
            State::LeaderPending(_) => "leaderPending",
            State::PolylineCollecting(_) => "polylineCollecting",
            State::LabeledRectLeaderPhase(_) => "labeledRectLeaderPhase",
            State::LabeledRectBoxPhase(_) => "labeledRectBoxPhase",
            State::Manipulating(_) => "manipulating",
        }
    }
}

// ============================================================================
// Machine
// ============================================================================

/// Gesture state machine for one page view
#[derive(Debug, Default)]
pub struct InteractionMachine {
    tool: Tool,
    pub options: ToolOptions,
    state: State,
    snapshot: Option<Snapshot>,
}

impl InteractionMachine {
    pub fn new(options: ToolOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Switch tools, abandoning any gesture in progress
    pub fn set_tool(&mut self, ctx: &mut Context, tool: Tool) -> Outcome {
        let outcome = self.cancel(ctx);
        self.tool = tool;
        outcome
    }

    /// Abandon the current gesture and restore the pre-gesture surface
    pub fn cancel(&mut self, ctx: &mut Context) -> Outcome {
        match std::mem::take(&mut self.state) {
            State::Idle => Outcome::Ignored,
            State::Manipulating(gesture) => {
                gesture.abort(ctx);
                Outcome::Cancelled
            }
            other => {
                log::debug!("Cancelled {} gesture", other.name());
                self.end_preview(ctx.surface);
                Outcome::Cancelled
            }
        }
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn pointer_down(&mut self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        match std::mem::take(&mut self.state) {
            State::Idle => self.begin(ctx, ev),
            State::LeaderPending(pending) => self.finish_caption(ctx, pending, ev.local),
            State::PolylineCollecting(mut poly) => {
                if ev.click_count >= 2 {
                    return self.close_polyline(ctx, poly);
                }
                let vertex = match poly.points.last() {
                    Some(&last) if ev.modifiers.shift => draft::snap_angle(last, ev.local),
                    _ => ev.local,
                };
                poly.points.push(vertex);
                self.state = State::PolylineCollecting(poly);
                Outcome::Handled
            }
            other => {
                self.state = other;
                Outcome::Ignored
            }
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        match &mut self.state {
            State::Idle => return Outcome::Ignored,
            State::Dragging(drag) => {
                drag.current = ev.local;
                drag.modifiers = ev.modifiers;
                if drag.points.last() != Some(&ev.local) {
                    drag.points.push(ev.local);
                }
            }
            State::PolylineCollecting(poly) => poly.hover = Some(ev.local),
            State::LabeledRectLeaderPhase(phase) => {
                phase.current = ev.local;
                let length = self.options.labeled_rect_leader_length;
                if let Some(leader) = draft::labeled_leader(phase.anchor, ev.local, length) {
                    self.state = State::LabeledRectBoxPhase(BoxPhase {
                        origin: draft::labeled_box_origin(&leader),
                        leader,
                        current: ev.local,
                        offset: phase.offset,
                    });
                }
            }
            State::LabeledRectBoxPhase(phase) => phase.current = ev.local,
            State::LeaderPending(_) => {}
            State::Manipulating(gesture) => return gesture.drag(ctx, ev),
        }
        self.repaint_preview(ctx, ev.local);
        Outcome::Handled
    }

    pub fn pointer_up(&mut self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        match std::mem::take(&mut self.state) {
            State::Dragging(mut drag) => {
                drag.current = ev.local;
                drag.modifiers = ev.modifiers;
                if drag.points.last() != Some(&ev.local) {
                    drag.points.push(ev.local);
                }
                self.finish_drag(ctx, drag)
            }
            State::LabeledRectLeaderPhase(_) => {
                log::debug!("Labeled rect released before its leader was complete");
                self.end_preview(ctx.surface);
                Outcome::Cancelled
            }
            State::LabeledRectBoxPhase(phase) => self.finish_labeled_rect(ctx, phase, ev.local),
            State::Manipulating(gesture) => gesture.release(ctx, ev),
            other => {
                self.state = other;
                Outcome::Ignored
            }
        }
    }

    pub fn key_down(&mut self, ctx: &mut Context, key: Key) -> Outcome {
        match (&mut self.state, key) {
            (State::Idle, Key::Delete | Key::Backspace) if self.tool == Tool::Select => {
                select::delete_selection(ctx)
            }
            (State::Idle, Key::Escape) if self.tool == Tool::Select => select::clear_selection(ctx),
            (State::Idle, _) => Outcome::Ignored,
            (_, Key::Escape) => self.cancel(ctx),
            (State::PolylineCollecting(_), Key::Enter) => {
                let State::PolylineCollecting(poly) = std::mem::take(&mut self.state) else {
                    return Outcome::Ignored;
                };
                self.close_polyline(ctx, poly)
            }
            (State::PolylineCollecting(poly), Key::Delete | Key::Backspace) => {
                poly.points.pop();
                if poly.points.len() <= 1 {
                    return self.cancel(ctx);
                }
                let hover = poly.hover.unwrap_or_default();
                self.repaint_preview(ctx, hover);
                Outcome::Handled
            }
            _ => Outcome::Ignored,
        }
    }

    /// Commit an externally decoded image centred on `center`
    pub fn place_image(
        &mut self,
        ctx: &mut Context,
        center: Point,
        pixels: Pixmap,
        source: Option<String>,
    ) -> ObjectId {
        self.cancel(ctx);
        let half_w = pixels.width() as f32 * 0.5;
        let half_h = pixels.height() as f32 * 0.5;
        let placement = ImagePlacement {
            start_pos: center.offset(-half_w, -half_h),
            end_pos: center.offset(half_w, half_h),
            source,
            pixels: Some(ImageData(std::sync::Arc::new(pixels))),
        };
        self.commit(ctx, DrawingObject::new(Shape::Image(placement)), (0.0, 0.0))
    }

    // ========================================================================
    // Gesture start and finish
    // ========================================================================

    fn begin(&mut self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        let offset = ev.surface_offset();
        match self.tool.gesture() {
            Gesture::Select => {
                let (outcome, gesture) = select::press(ctx, &self.options, ev);
                if let Some(gesture) = gesture {
                    self.state = State::Manipulating(gesture);
                }
                outcome
            }
            Gesture::Click => self.place_text(ctx, ev.local),
            Gesture::Vertices => {
                self.snapshot = Some(ctx.surface.snapshot());
                self.state = State::PolylineCollecting(PolylineDraft {
                    points: vec![ev.local],
                    hover: None,
                    offset,
                });
                Outcome::Handled
            }
            Gesture::LeaderThenBox => {
                self.snapshot = Some(ctx.surface.snapshot());
                self.state = State::LabeledRectLeaderPhase(LeaderPhase {
                    anchor: ev.local,
                    current: ev.local,
                    offset,
                });
                Outcome::Handled
            }
            Gesture::TwoCorner | Gesture::Freehand | Gesture::Stamp => {
                self.snapshot = Some(ctx.surface.snapshot());
                self.state = State::Dragging(Drag {
                    tool: self.tool,
                    start: ev.local,
                    current: ev.local,
                    points: vec![ev.local],
                    modifiers: ev.modifiers,
                    offset,
                });
                Outcome::Handled
            }
        }
    }

    fn finish_drag(&mut self, ctx: &mut Context, drag: Drag) -> Outcome {
        let draft = match drag.tool.gesture() {
            Gesture::Stamp => match drag.tool {
                Tool::Stamp(kind) => Some(draft::place_stamp(kind, drag.start, drag.current, &self.options)),
                _ => None,
            },
            Gesture::Freehand => self.freehand_draft(ctx, &drag),
            _ => self.two_corner_draft(ctx, &drag),
        };
        let Some(draft) = draft else {
            log::debug!("Discarded {} gesture", drag.tool.name());
            self.end_preview(ctx.surface);
            return Outcome::Cancelled;
        };

        let id = self.commit(ctx, draft, drag.offset);
        if self.options.annotate && drag.tool.supports_annotation() {
            // The committed shape is part of the caption preview's backdrop
            self.snapshot = Some(ctx.surface.snapshot());
            self.state = State::LeaderPending(PendingCaption {
                id,
                offset: drag.offset,
            });
        }
        Outcome::Committed(id)
    }

    fn two_corner_draft(&self, ctx: &mut Context, drag: &Drag) -> Option<DrawingObject> {
        let (a, b) = draft::corners_for(drag.tool, drag.start, drag.current, drag.modifiers);
        if draft::below_minimum(a, b, &self.options) {
            return None;
        }
        let mut shape =
            draft::two_corner_shape(drag.tool, drag.start, drag.current, drag.modifiers, &self.options)?;
        let mut leader = None;
        match &mut shape {
            Shape::DoubleArrowAnnotated(seg) => {
                seg.text = ctx.prompt.request_text(PromptKind::Dimension)?;
            }
            Shape::FontLabel(label) => {
                label.font_name = non_empty(ctx.prompt.request_text(PromptKind::FontName))?;
                leader = Some(draft::font_label_leader(label.start_pos, label.end_pos));
            }
            _ => {}
        }
        let mut obj = draft::styled(shape, &self.options);
        obj.leader_line = leader;
        Some(obj)
    }

    fn freehand_draft(&self, ctx: &Context, drag: &Drag) -> Option<DrawingObject> {
        let mut shape = draft::freehand_shape(drag.tool, drag.points.clone())?;
        if let Shape::Eraser(eraser) = &mut shape {
            eraser.linked_object_ids =
                draft::eraser_links(&eraser.points, self.options.eraser_width, ctx.objects());
            if eraser.linked_object_ids.is_empty() {
                log::debug!("Eraser stroke touched no erasable object");
                return None;
            }
        }
        Some(draft::styled(shape, &self.options))
    }

    fn finish_caption(&mut self, ctx: &mut Context, pending: PendingCaption, at: Point) -> Outcome {
        self.end_preview(ctx.surface);
        let Some(anchor) = ctx.object(pending.id).map(|obj| draft::leader_anchor(obj, at)) else {
            return Outcome::Ignored;
        };
        let Some(text) = non_empty(ctx.prompt.request_text(PromptKind::Caption)) else {
            log::debug!("Caption prompt declined for {}", pending.id);
            return Outcome::Cancelled;
        };

        let mut annotation = Annotation::new(text, at, self.options.font_size);
        annotation.align = if at.x < anchor.x {
            TextAlign::Right
        } else {
            TextAlign::Left
        };
        annotation.color = Some(self.options.color);
        annotation.leader_line = Some(LeaderLine::new(anchor, at));

        let updated = ctx
            .store
            .update_object_by_id(ctx.page, pending.id, &mut |obj: &mut DrawingObject| {
                obj.annotation = Some(annotation.clone());
            });
        if !updated {
            return Outcome::Ignored;
        }
        if let Some(obj) = ctx.object(pending.id).cloned() {
            ctx.draw_at(&obj, pending.offset);
        }
        ctx.store.request_redraw();
        Outcome::Handled
    }

    fn close_polyline(&mut self, ctx: &mut Context, mut poly: PolylineDraft) -> Outcome {
        // The first press of a double-click lands on the last vertex again
        poly.points.dedup();
        if poly.points.len() < 2 {
            self.end_preview(ctx.surface);
            return Outcome::Cancelled;
        }
        if let Some(&first) = poly.points.first() {
            poly.points.push(first);
        }
        let shape = Shape::Polyline(crate::domain::Freehand {
            points: poly.points,
        });
        let id = self.commit(ctx, draft::styled(shape, &self.options), poly.offset);
        Outcome::Committed(id)
    }

    fn finish_labeled_rect(&mut self, ctx: &mut Context, phase: BoxPhase, at: Point) -> Outcome {
        let origin = phase.origin;
        let corner = draft::labeled_box_corner(origin, at);
        let label = if draft::below_minimum(origin, corner, &self.options) {
            None
        } else {
            non_empty(ctx.prompt.request_text(PromptKind::Label))
        };
        let Some(label) = label else {
            log::debug!("Labeled rect discarded with its leader");
            self.end_preview(ctx.surface);
            return Outcome::Cancelled;
        };

        let label: String = label.chars().take(1).collect();
        let shape = Shape::LabeledRect(LabeledBox {
            start_pos: origin,
            end_pos: corner,
            label,
        });
        let obj = draft::styled(shape, &self.options).with_leader_line(phase.leader);
        Outcome::Committed(self.commit(ctx, obj, phase.offset))
    }

    fn place_text(&mut self, ctx: &mut Context, at: Point) -> Outcome {
        let Some(text) = non_empty(ctx.prompt.request_text(PromptKind::Text)) else {
            return Outcome::Ignored;
        };
        let block = TextBlock {
            start_pos: at,
            text,
            font_size: self.options.font_size,
            align: TextAlign::Left,
            is_vertical: self.options.vertical_text,
        };
        let obj = DrawingObject::new(Shape::Text(block)).with_color(self.options.color);
        Outcome::Committed(self.commit(ctx, obj, (0.0, 0.0)))
    }

    /// Hand a finished draft to the store and show it on the surface
    fn commit(&mut self, ctx: &mut Context, draft: DrawingObject, offset: (f32, f32)) -> ObjectId {
        self.end_preview(ctx.surface);
        ctx.draw_at(&draft, offset);
        let id = ctx.store.add_object(ctx.page, draft);
        ctx.store.request_redraw();
        id
    }

    // ========================================================================
    // Previews
    // ========================================================================

    fn end_preview(&mut self, surface: &mut Surface) {
        if let Some(snapshot) = self.snapshot.take() {
            surface.restore_snapshot(&snapshot);
        }
    }

    fn repaint_preview(&self, ctx: &mut Context, cursor: Point) {
        if let Some(snapshot) = &self.snapshot {
            ctx.surface.restore_snapshot(snapshot);
        }
        let options = &self.options;
        match &self.state {
            State::Dragging(drag) => {
                let preview = match drag.tool {
                    Tool::Stamp(kind) => Some(draft::place_stamp(kind, drag.start, drag.current, options)),
                    Tool::Pen | Tool::Marker => draft::freehand_shape(drag.tool, drag.points.clone())
                        .map(|shape| draft::styled(shape, options)),
                    Tool::Eraser => {
                        draw_eraser_trail(ctx.surface, &drag.points, options.eraser_width, drag.offset);
                        None
                    }
                    tool => draft::two_corner_shape(tool, drag.start, drag.current, drag.modifiers, options)
                        .map(|shape| draft::styled(shape, options)),
                };
                if let Some(obj) = preview {
                    ctx.draw_at(&obj, drag.offset);
                }
            }
            State::PolylineCollecting(poly) => {
                let mut points = poly.points.clone();
                points.extend(poly.hover);
                let obj = draft::styled(Shape::Polyline(crate::domain::Freehand { points }), options);
                ctx.draw_at(&obj, poly.offset);
            }
            State::LeaderPending(pending) => {
                if let Some(anchor) = ctx.object(pending.id).map(|obj| draft::leader_anchor(obj, cursor)) {
                    let leader = LeaderLine::new(anchor, cursor);
                    draw_leader_at(ctx.surface, &leader, options, pending.offset);
                }
            }
            State::LabeledRectLeaderPhase(phase) => {
                let leader = LeaderLine::new(phase.anchor, phase.current);
                draw_leader_at(ctx.surface, &leader, options, phase.offset);
            }
            State::LabeledRectBoxPhase(phase) => {
                let corner = draft::labeled_box_corner(phase.origin, phase.current);
                let shape = Shape::LabeledRect(LabeledBox {
                    start_pos: phase.origin,
                    end_pos: corner,
                    label: String::new(),
                });
                let obj = draft::styled(shape, options).with_leader_line(phase.leader);
                ctx.draw_at(&obj, phase.offset);
            }
            State::Idle | State::Manipulating(_) => {}
        }
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn draw_leader_at(surface: &mut Surface, leader: &LeaderLine, options: &ToolOptions, offset: (f32, f32)) {
    surface.save();
    surface.translate(offset.0, offset.1);
    draw_leader(surface, leader, options.color, options.line_width);
    surface.restore();
}

/// Translucent trail showing where an eraser stroke will cut
fn draw_eraser_trail(surface: &mut Surface, points: &[Point], width: f32, offset: (f32, f32)) {
    let Some(path) = polyline_path(points) else {
        return;
    };
    surface.save();
    surface.translate(offset.0, offset.1);
    surface.stroke(&path, Color::rgba(128, 128, 128, 96), width);
    surface.restore();
}
