//! Select tool: pick, move, resize, rotate, delete and marquee
//!
//! Every manipulation rewrites objects through
//! [`ObjectStore::update_object_by_id`] from a copy taken at press time, so
//! repeated motion events never accumulate rounding and cancelling puts the
//! originals back.

use super::events::{Outcome, PointerEvent};
use super::state::Context;
use super::tool::ToolOptions;
use crate::domain::{Bounds, DrawingObject, Handle, ObjectId, Point, ResizeHandle};
use crate::geometry::bounds::{rotated_bounds, rotation_pivot, shape_bounds};
use crate::geometry::handles::{apply_resize, handle_at, resize_box};
use crate::geometry::hit_test::{hit_test_all, to_object_space};
use crate::render::Snapshot;
use crate::render::chrome::draw_marquee;

/// Rotation snaps to this step while shift is held
const ROTATION_SNAP: f32 = std::f32::consts::PI / 12.0;

/// A marquee narrower and shorter than this is a plain click on empty space
const MARQUEE_MIN: f32 = 2.0;

/// Select-tool gesture in progress
#[derive(Debug, Clone)]
pub enum SelectGesture {
    Moving {
        originals: Vec<DrawingObject>,
        start: Point,
    },
    Resizing {
        original: DrawingObject,
        from: Bounds,
        handle: ResizeHandle,
    },
    Rotating {
        original: DrawingObject,
        pivot: Point,
        grab_angle: f32,
    },
    /// Dragging an endpoint of a leader line
    LeaderEdit {
        original: DrawingObject,
        handle: Handle,
        start: Point,
    },
    Marquee {
        start: Point,
        current: Point,
        offset: (f32, f32),
        additive: bool,
        snapshot: Snapshot,
    },
}

fn angle_from(pivot: Point, p: Point) -> f32 {
    (p.y - pivot.y).atan2(p.x - pivot.x)
}

fn write_back(ctx: &mut Context, obj: &DrawingObject) {
    let Some(id) = obj.id else {
        return;
    };
    ctx.store
        .update_object_by_id(ctx.page, id, &mut |target: &mut DrawingObject| {
            *target = obj.clone();
        });
}

enum Press {
    Delete(ObjectId),
    Grab(Handle, DrawingObject),
    Body(usize),
    Empty,
}

/// Pointer press with the select tool
pub(super) fn press(
    ctx: &mut Context,
    options: &ToolOptions,
    ev: PointerEvent,
) -> (Outcome, Option<SelectGesture>) {
    let p = ev.local;
    let selected = ctx.store.get_selected_indices(ctx.page);

    let press = {
        let objects = ctx.objects();
        let grabbed = selected.iter().rev().find_map(|&i| {
            let obj = objects.get(i)?;
            handle_at(p, obj, options.handle_size).map(|h| (h, obj))
        });
        match grabbed {
            Some((Handle::Delete, obj)) => obj.id.map_or(Press::Empty, Press::Delete),
            Some((handle, obj)) => Press::Grab(handle, obj.clone()),
            None => {
                let hit = match ctx.renderer {
                    Some(renderer) => {
                        renderer.hit_test_all(p, objects, &selected, options.hit_tolerance)
                    }
                    None => hit_test_all(p, objects, options.hit_tolerance),
                };
                hit.map_or(Press::Empty, Press::Body)
            }
        }
    };

    match press {
        Press::Delete(id) => {
            ctx.store.remove_object(ctx.page, id);
            log::debug!("Deleted {} from its delete button", id);
            (Outcome::Handled, None)
        }
        Press::Grab(handle, original) => {
            let gesture = match handle {
                Handle::Resize(handle) => SelectGesture::Resizing {
                    from: shape_bounds(&original),
                    original,
                    handle,
                },
                Handle::Rotate => {
                    let pivot = rotation_pivot(&original);
                    SelectGesture::Rotating {
                        grab_angle: angle_from(pivot, p),
                        original,
                        pivot,
                    }
                }
                handle => SelectGesture::LeaderEdit {
                    original,
                    handle,
                    start: p,
                },
            };
            (Outcome::Handled, Some(gesture))
        }
        Press::Body(index) => {
            let selection = if ev.modifiers.shift {
                let mut toggled = selected.clone();
                match toggled.iter().position(|&i| i == index) {
                    Some(at) => {
                        toggled.remove(at);
                    }
                    None => toggled.push(index),
                }
                toggled
            } else if selected.contains(&index) {
                selected
            } else {
                vec![index]
            };
            ctx.store.set_selected_indices(ctx.page, selection.clone());
            let originals: Vec<DrawingObject> = selection
                .iter()
                .filter_map(|&i| ctx.objects().get(i))
                .filter(|obj| !obj.is_eraser())
                .cloned()
                .collect();
            let gesture = SelectGesture::Moving {
                originals,
                start: p,
            };
            (Outcome::Handled, Some(gesture))
        }
        Press::Empty => {
            if !ev.modifiers.shift {
                ctx.store.set_selected_indices(ctx.page, Vec::new());
            }
            let gesture = SelectGesture::Marquee {
                start: p,
                current: p,
                offset: ev.surface_offset(),
                additive: ev.modifiers.shift,
                snapshot: ctx.surface.snapshot(),
            };
            (Outcome::Handled, Some(gesture))
        }
    }
}

impl SelectGesture {
    pub fn name(&self) -> &'static str {
        match self {
            SelectGesture::Moving { .. } => "moving",
            SelectGesture::Resizing { .. } => "resizing",
            SelectGesture::Rotating { .. } => "rotating",
            SelectGesture::LeaderEdit { .. } => "leaderEdit",
            SelectGesture::Marquee { .. } => "marquee",
        }
    }

    pub(super) fn drag(&mut self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        let p = ev.local;
        match self {
            SelectGesture::Moving { originals, start } => {
                let (dx, dy) = (p.x - start.x, p.y - start.y);
                for original in originals.iter() {
                    let mut moved = original.clone();
                    moved.translate(dx, dy);
                    write_back(ctx, &moved);
                }
            }
            SelectGesture::Resizing {
                original,
                from,
                handle,
            } => {
                let to = resize_box(from, *handle, to_object_space(p, original));
                let mut resized = original.clone();
                apply_resize(&mut resized, from, &to);
                write_back(ctx, &resized);
            }
            SelectGesture::Rotating {
                original,
                pivot,
                grab_angle,
            } => {
                let mut angle = original.rotation() + angle_from(*pivot, p) - *grab_angle;
                if ev.modifiers.shift {
                    angle = (angle / ROTATION_SNAP).round() * ROTATION_SNAP;
                }
                let mut rotated = original.clone();
                rotated.rotation = (angle.abs() > f32::EPSILON).then_some(angle);
                write_back(ctx, &rotated);
            }
            SelectGesture::LeaderEdit {
                original,
                handle,
                start,
            } => {
                let from = to_object_space(*start, original);
                let to = to_object_space(p, original);
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let mut edited = original.clone();
                move_leader_end(&mut edited, *handle, dx, dy);
                write_back(ctx, &edited);
            }
            SelectGesture::Marquee {
                start,
                current,
                offset,
                snapshot,
                ..
            } => {
                *current = p;
                ctx.surface.restore_snapshot(snapshot);
                let area = Bounds::from_corners(*start, *current).translate(offset.0, offset.1);
                draw_marquee(ctx.surface, &area);
                return Outcome::Handled;
            }
        }
        ctx.store.request_redraw();
        Outcome::Handled
    }

    pub(super) fn release(self, ctx: &mut Context, ev: PointerEvent) -> Outcome {
        match self {
            SelectGesture::Marquee {
                start,
                additive,
                snapshot,
                ..
            } => {
                ctx.surface.restore_snapshot(&snapshot);
                let area = Bounds::from_corners(start, ev.local);
                let mut selection: Vec<usize> = if additive {
                    ctx.store.get_selected_indices(ctx.page)
                } else {
                    Vec::new()
                };
                if area.width >= MARQUEE_MIN || area.height >= MARQUEE_MIN {
                    let hits: Vec<usize> = ctx
                        .objects()
                        .iter()
                        .enumerate()
                        .filter(|(_, obj)| !obj.is_eraser())
                        .filter(|(_, obj)| rotated_bounds(obj).intersects(&area))
                        .map(|(i, _)| i)
                        .collect();
                    for i in hits {
                        if !selection.contains(&i) {
                            selection.push(i);
                        }
                    }
                }
                log::debug!("Marquee selected {} objects", selection.len());
                ctx.store.set_selected_indices(ctx.page, selection);
                Outcome::Handled
            }
            mut gesture => {
                let outcome = gesture.drag(ctx, ev);
                log::trace!("Finished {}", gesture.name());
                outcome
            }
        }
    }

    /// Put back every object the gesture touched
    pub(super) fn abort(self, ctx: &mut Context) {
        match self {
            SelectGesture::Moving { originals, .. } => {
                for original in &originals {
                    write_back(ctx, original);
                }
            }
            SelectGesture::Resizing { original, .. }
            | SelectGesture::Rotating { original, .. }
            | SelectGesture::LeaderEdit { original, .. } => write_back(ctx, &original),
            SelectGesture::Marquee { snapshot, .. } => {
                ctx.surface.restore_snapshot(&snapshot);
                return;
            }
        }
        ctx.store.request_redraw();
    }
}

/// Shift one leader endpoint; a caption's text travels with its leader end
fn move_leader_end(obj: &mut DrawingObject, handle: Handle, dx: f32, dy: f32) {
    match handle {
        Handle::LeaderStart => {
            if let Some(leader) = &mut obj.leader_line {
                leader.start = leader.start.offset(dx, dy);
            }
        }
        Handle::LeaderEnd => {
            if let Some(leader) = &mut obj.leader_line {
                leader.end = leader.end.offset(dx, dy);
            }
        }
        Handle::AnnotationLeaderEnd => {
            if let Some(annotation) = &mut obj.annotation {
                annotation.x += dx;
                annotation.y += dy;
                if let Some(leader) = &mut annotation.leader_line {
                    leader.end = leader.end.offset(dx, dy);
                }
            }
        }
        _ => {}
    }
}

/// Remove every selected object
pub(super) fn delete_selection(ctx: &mut Context) -> Outcome {
    let ids: Vec<ObjectId> = ctx
        .store
        .get_selected_indices(ctx.page)
        .into_iter()
        .filter_map(|i| ctx.objects().get(i).and_then(|o| o.id))
        .collect();
    if ids.is_empty() {
        return Outcome::Ignored;
    }
    for id in ids {
        ctx.store.remove_object(ctx.page, id);
    }
    ctx.store.set_selected_indices(ctx.page, Vec::new());
    Outcome::Handled
}

pub(super) fn clear_selection(ctx: &mut Context) -> Outcome {
    if ctx.store.get_selected_indices(ctx.page).is_empty() {
        return Outcome::Ignored;
    }
    ctx.store.set_selected_indices(ctx.page, Vec::new());
    Outcome::Handled
}
