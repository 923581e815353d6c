//! Object storage and viewport collaborators
//!
//! The drawing core never owns the document. It reads and writes per-page
//! object lists through [`ObjectStore`] and asks a [`Viewport`] what part of
//! the page is visible. [`MemoryStore`] is a plain in-memory implementation
//! used by the demo binary and the tests.

use std::collections::HashMap;

use crate::domain::{Bounds, DrawingObject, ObjectId};

/// Per-page object lists plus selection
pub trait ObjectStore {
    /// Objects of a page in insertion order; empty for unknown pages
    fn get_page_objects(&self, page: usize) -> &[DrawingObject];

    /// Commit a draft and return its freshly assigned id
    fn add_object(&mut self, page: usize, draft: DrawingObject) -> ObjectId;

    /// Apply `update` to the object with `id`; false when no such object
    fn update_object_by_id(
        &mut self,
        page: usize,
        id: ObjectId,
        update: &mut dyn FnMut(&mut DrawingObject),
    ) -> bool;

    /// Remove the object with `id`, returning it
    fn remove_object(&mut self, page: usize, id: ObjectId) -> Option<DrawingObject>;

    /// Indices (into `get_page_objects`) of selected objects, ascending
    fn get_selected_indices(&self, page: usize) -> Vec<usize>;

    fn set_selected_indices(&mut self, page: usize, indices: Vec<usize>);

    /// Ask for a page repaint; repeated requests coalesce
    fn request_redraw(&mut self) {}
}

/// Coalesces repaint requests into one pending flag
#[derive(Debug, Default, Clone)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request; true at most once per batch of requests
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Default, Clone)]
struct Page {
    objects: Vec<DrawingObject>,
    selected: Vec<usize>,
}

/// In-memory [`ObjectStore`]
///
/// New objects are placed on top: their z-index becomes one above the
/// page's current maximum unless the draft already sits higher.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pages: HashMap<usize, Page>,
    next_id: u64,
    pub redraw: RedrawScheduler,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert already-committed objects (e.g. loaded from a file)
    ///
    /// Objects without an id get one; existing ids are kept and the id
    /// counter moves past them.
    pub fn load_page(&mut self, page: usize, objects: Vec<DrawingObject>) {
        let mut loaded = Vec::with_capacity(objects.len());
        for mut obj in objects {
            match obj.id {
                Some(ObjectId(n)) => self.next_id = self.next_id.max(n),
                None => obj.id = Some(self.allocate_id()),
            }
            loaded.push(obj);
        }
        self.pages.insert(
            page,
            Page {
                objects: loaded,
                selected: Vec::new(),
            },
        );
        self.redraw.request();
    }

    /// Drop every object on a page
    pub fn clear_page(&mut self, page: usize) {
        self.pages.remove(&page);
        self.redraw.request();
    }

    pub fn index_of(&self, page: usize, id: ObjectId) -> Option<usize> {
        self.get_page_objects(page)
            .iter()
            .position(|o| o.id == Some(id))
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.next_id += 1;
        ObjectId(self.next_id)
    }
}

impl ObjectStore for MemoryStore {
    fn get_page_objects(&self, page: usize) -> &[DrawingObject] {
        self.pages
            .get(&page)
            .map(|p| p.objects.as_slice())
            .unwrap_or(&[])
    }

    fn add_object(&mut self, page: usize, mut draft: DrawingObject) -> ObjectId {
        let id = self.allocate_id();
        let entry = self.pages.entry(page).or_default();
        let top = entry.objects.iter().map(|o| o.z_index).max();
        if let Some(top) = top {
            draft.z_index = draft.z_index.max(top.saturating_add(1));
        }
        draft.id = Some(id);
        log::debug!("Committed {} {} on page {}", draft.type_name(), id, page);
        entry.objects.push(draft);
        self.redraw.request();
        id
    }

    fn update_object_by_id(
        &mut self,
        page: usize,
        id: ObjectId,
        update: &mut dyn FnMut(&mut DrawingObject),
    ) -> bool {
        let Some(obj) = self
            .pages
            .get_mut(&page)
            .and_then(|p| p.objects.iter_mut().find(|o| o.id == Some(id)))
        else {
            return false;
        };
        update(obj);
        // The store owns identity
        obj.id = Some(id);
        self.redraw.request();
        true
    }

    fn remove_object(&mut self, page: usize, id: ObjectId) -> Option<DrawingObject> {
        let entry = self.pages.get_mut(&page)?;
        let index = entry.objects.iter().position(|o| o.id == Some(id))?;
        let removed = entry.objects.remove(index);

        // Keep the selection pointing at the same objects
        entry.selected = entry
            .selected
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();

        // Erasers no longer reference a deleted object
        for obj in &mut entry.objects {
            if let crate::domain::Shape::Eraser(e) = &mut obj.shape {
                e.linked_object_ids.remove(&id);
            }
        }
        self.redraw.request();
        Some(removed)
    }

    fn get_selected_indices(&self, page: usize) -> Vec<usize> {
        self.pages
            .get(&page)
            .map(|p| p.selected.clone())
            .unwrap_or_default()
    }

    fn set_selected_indices(&mut self, page: usize, mut indices: Vec<usize>) {
        let entry = self.pages.entry(page).or_default();
        let len = entry.objects.len();
        indices.retain(|&i| i < len);
        indices.sort_unstable();
        indices.dedup();
        if entry.selected != indices {
            entry.selected = indices;
            self.redraw.request();
        }
    }

    fn request_redraw(&mut self) {
        self.redraw.request();
    }
}

/// Scroll position, visible size and zoom of the page view
///
/// Scroll offsets and sizes are in display pixels; `zoom` maps page units
/// to display pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 0.0,
            height: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn scrolled(mut self, x: f32, y: f32) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    pub fn zoomed(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Visible page area in page units, grown by `margin` on every side
    pub fn visible_area(&self, margin: f32) -> Bounds {
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        };
        Bounds::new(
            self.scroll_x / zoom,
            self.scroll_y / zoom,
            self.width / zoom,
            self.height / zoom,
        )
        .expand(margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Corners, EraserStroke, Point, Shape};

    fn line() -> DrawingObject {
        DrawingObject::new(Shape::Line(Corners::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        )))
    }

    #[test]
    fn test_add_assigns_unique_ids_and_stacks_z() {
        let mut store = MemoryStore::new();
        let a = store.add_object(0, line());
        let b = store.add_object(0, line());
        assert_ne!(a, b);
        let objects = store.get_page_objects(0);
        assert_eq!(objects[0].id, Some(a));
        assert!(objects[1].z_index > objects[0].z_index);
    }

    #[test]
    fn test_unknown_page_is_empty() {
        let store = MemoryStore::new();
        assert!(store.get_page_objects(7).is_empty());
        assert!(store.get_selected_indices(7).is_empty());
    }

    #[test]
    fn test_update_by_id() {
        let mut store = MemoryStore::new();
        let id = store.add_object(1, line());
        assert!(store.update_object_by_id(1, id, &mut |o| o.z_index = 42));
        assert_eq!(store.get_page_objects(1)[0].z_index, 42);
        assert!(!store.update_object_by_id(1, ObjectId(999), &mut |_| {}));
    }

    #[test]
    fn test_remove_remaps_selection_and_eraser_links() {
        let mut store = MemoryStore::new();
        let a = store.add_object(0, line());
        let _b = store.add_object(0, line());
        let mut eraser = EraserStroke::default();
        eraser.linked_object_ids.insert(a);
        store.add_object(0, DrawingObject::new(Shape::Eraser(eraser)));
        store.set_selected_indices(0, vec![1, 2]);

        store.remove_object(0, a);
        assert_eq!(store.get_selected_indices(0), vec![0, 1]);
        match &store.get_page_objects(0)[1].shape {
            Shape::Eraser(e) => assert!(e.linked_object_ids.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_selection_drops_out_of_range() {
        let mut store = MemoryStore::new();
        store.add_object(0, line());
        store.set_selected_indices(0, vec![5, 0, 0]);
        assert_eq!(store.get_selected_indices(0), vec![0]);
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let mut store = MemoryStore::new();
        store.add_object(0, line());
        store.add_object(0, line());
        store.request_redraw();
        assert!(store.redraw.is_pending());
        assert!(store.redraw.take());
        assert!(!store.redraw.take());

        store.clear_page(0);
        assert!(store.get_page_objects(0).is_empty());
        assert!(store.redraw.is_pending());
    }

    #[test]
    fn test_visible_area_scales_with_zoom() {
        let vp = Viewport::new(200.0, 100.0).scrolled(100.0, 50.0).zoomed(2.0);
        assert_eq!(vp.visible_area(0.0), Bounds::new(50.0, 25.0, 100.0, 50.0));
        assert_eq!(vp.visible_area(10.0), Bounds::new(40.0, 15.0, 120.0, 70.0));
    }

    #[test]
    fn test_load_page_keeps_ids_and_advances_counter() {
        let mut store = MemoryStore::new();
        let mut loaded = line();
        loaded.id = Some(ObjectId(10));
        store.load_page(0, vec![loaded, line()]);
        let ids: Vec<_> = store.get_page_objects(0).iter().map(|o| o.id).collect();
        assert_eq!(ids[0], Some(ObjectId(10)));
        assert_eq!(ids[1], Some(ObjectId(11)));
        assert_eq!(store.add_object(0, line()), ObjectId(12));
    }
}
