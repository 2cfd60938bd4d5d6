//! The editable surface: main image, layered objects and interaction settings.

mod object;
mod raster;

use std::collections::HashSet;

use crate::geometry::{Dimensions, Point};

pub use object::{GraphicObject, IconShape, ObjectId, ObjectKind, PathShape, TextShape};
pub use raster::{normalize_angle, FlipSetting, ImageHandle, ImageTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Text,
}

/// Pointer interaction settings the active tool may override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub selection: bool,
    pub cursor: Cursor,
    pub objects_evented: bool,
    pub drawing_mode: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            selection: true,
            cursor: Cursor::Default,
            objects_evented: true,
            drawing_mode: false,
        }
    }
}

/// Object-level changes queued for the editor to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentChange {
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
}

#[derive(Debug)]
pub struct Document {
    image: Option<ImageHandle>,
    transform: ImageTransform,
    objects: Vec<GraphicObject>,
    managed: HashSet<ObjectId>,
    active: Option<ObjectId>,
    interaction: Interaction,
    changes: Vec<DocumentChange>,
    next_id: u64,
    render_generation: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            image: None,
            transform: ImageTransform::default(),
            objects: Vec::new(),
            managed: HashSet::new(),
            active: None,
            interaction: Interaction::default(),
            changes: Vec::new(),
            next_id: 1,
            render_generation: 0,
        }
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn image_name(&self) -> Option<&str> {
        self.image.as_ref().map(ImageHandle::name)
    }

    /// Replaces the main image and resets its orientation.
    pub fn set_image(&mut self, image: Option<ImageHandle>) {
        self.image = image;
        self.transform = ImageTransform::default();
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform
    }

    /// Restores a remembered orientation without touching objects.
    pub fn restore_transform(&mut self, transform: ImageTransform) {
        self.transform = transform;
    }

    pub fn flip_setting(&self) -> FlipSetting {
        self.transform.flip
    }

    pub fn angle(&self) -> f64 {
        self.transform.angle
    }

    pub fn image_dimensions(&self) -> Option<Dimensions> {
        self.image.as_ref().map(ImageHandle::dimensions)
    }

    /// Pixel size of the image as it is shown, with quarter turns applied.
    pub fn oriented_image_dimensions(&self) -> Option<Dimensions> {
        self.image_dimensions()
            .map(|dimensions| self.transform.oriented_dimensions(dimensions))
    }

    /// Size of the surface needed to show the rotated image.
    pub fn surface_dimensions(&self) -> Dimensions {
        self.image_dimensions()
            .map(|dimensions| dimensions.rotated_bounds(self.transform.angle))
            .unwrap_or_default()
    }

    fn pivot(&self) -> Point {
        self.image_dimensions()
            .map(|dimensions| dimensions.center())
            .unwrap_or_default()
    }

    /// Applies `setting`, negating the angle and mirroring every object once
    /// per axis that changes. Returns the resulting angle.
    pub fn apply_flip(&mut self, setting: FlipSetting) -> f64 {
        let current = self.transform.flip;
        let pivot = self.pivot();
        let mut angle = self.transform.angle;

        if current.flip_x != setting.flip_x {
            angle = -angle;
            for object in &mut self.objects {
                object.mirror_x(pivot.x);
            }
        }
        if current.flip_y != setting.flip_y {
            angle = -angle;
            for object in &mut self.objects {
                object.mirror_y(pivot.y);
            }
        }

        self.transform = ImageTransform {
            flip: setting,
            angle: normalize_angle(angle),
        };
        self.request_render();
        self.transform.angle
    }

    /// Sets the image angle; objects orbit the image centre by the delta.
    pub fn set_angle(&mut self, angle: f64) -> f64 {
        let angle = normalize_angle(angle);
        let delta = angle - self.transform.angle;
        if delta != 0.0 {
            let pivot = self.pivot();
            for object in &mut self.objects {
                object.orbit(pivot, delta);
            }
        }
        self.transform.angle = angle;
        self.request_render();
        angle
    }

    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn objects(&self) -> &[GraphicObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GraphicObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut GraphicObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|object| object.id == id)
    }

    /// Appends `object` on top. Returns `false` if it is already present.
    pub fn add_object(&mut self, object: GraphicObject) -> bool {
        let index = self.objects.len();
        self.insert_object(index, object)
    }

    pub fn insert_object(&mut self, index: usize, object: GraphicObject) -> bool {
        if self.contains(object.id) {
            return false;
        }
        let id = object.id;
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
        self.changes.push(DocumentChange::ObjectAdded(id));
        self.request_render();
        true
    }

    /// Removes the object, returning it with the z-index it occupied.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<(usize, GraphicObject)> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        let object = self.objects.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        self.changes.push(DocumentChange::ObjectRemoved(id));
        self.request_render();
        Some((index, object))
    }

    /// Removes every object one by one, bottom first.
    pub fn remove_all(&mut self) -> Vec<GraphicObject> {
        let removed = std::mem::take(&mut self.objects);
        self.active = None;
        self.changes.extend(
            removed
                .iter()
                .map(|object| DocumentChange::ObjectRemoved(object.id)),
        );
        self.request_render();
        removed
    }

    pub fn restore_objects(&mut self, objects: Vec<GraphicObject>) {
        for object in objects {
            self.add_object(object);
        }
    }

    pub fn is_managed(&self, id: ObjectId) -> bool {
        self.managed.contains(&id)
    }

    /// Marks `id` as tracked by the history. Returns `true` if newly marked.
    pub fn mark_managed(&mut self, id: ObjectId) -> bool {
        self.managed.insert(id)
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    pub fn set_active_object(&mut self, id: ObjectId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn discard_active_object(&mut self) {
        self.active = None;
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn reset_interaction(&mut self) {
        self.interaction = Interaction::default();
    }

    pub fn drain_changes(&mut self) -> Vec<DocumentChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn request_render(&mut self) {
        self.render_generation = self.render_generation.wrapping_add(1);
    }

    /// Bumped on every change the host has to redraw.
    pub fn render_generation(&self) -> u64 {
        self.render_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TextStyle;
    use image::DynamicImage;

    fn text(document: &mut Document, at: Point, content: &str) -> GraphicObject {
        let id = document.allocate_id();
        GraphicObject::new(
            id,
            at,
            ObjectKind::Text(TextShape {
                text: content.to_string(),
                style: TextStyle::default(),
            }),
        )
    }

    fn document_with_image(width: u32, height: u32) -> Document {
        let mut document = Document::new();
        document.set_image(Some(ImageHandle::new(
            "base.png",
            DynamicImage::new_rgba8(width, height),
        )));
        document
    }

    fn assert_point_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn add_and_remove_queue_changes_in_order() {
        let mut document = Document::new();
        let first = text(&mut document, Point::new(1.0, 1.0), "a");
        let second = text(&mut document, Point::new(2.0, 2.0), "b");
        let (first_id, second_id) = (first.id, second.id);

        assert!(document.add_object(first.clone()));
        assert!(!document.add_object(first));
        assert!(document.add_object(second));
        let removed = document.remove_object(first_id).expect("present");
        assert_eq!(removed.0, 0);

        assert_eq!(
            document.drain_changes(),
            vec![
                DocumentChange::ObjectAdded(first_id),
                DocumentChange::ObjectAdded(second_id),
                DocumentChange::ObjectRemoved(first_id),
            ]
        );
        assert!(document.drain_changes().is_empty());
    }

    #[test]
    fn insert_object_restores_z_order() {
        let mut document = Document::new();
        let objects: Vec<_> = (0..3)
            .map(|index| text(&mut document, Point::new(f64::from(index), 0.0), "x"))
            .collect();
        for object in objects.clone() {
            document.add_object(object);
        }
        let (index, middle) = document.remove_object(objects[1].id).expect("present");
        document.insert_object(index, middle);
        let ids: Vec<_> = document.objects().iter().map(|object| object.id).collect();
        assert_eq!(ids, objects.iter().map(|object| object.id).collect::<Vec<_>>());
    }

    #[test]
    fn managed_marker_survives_removal() {
        let mut document = Document::new();
        let object = text(&mut document, Point::default(), "a");
        let id = object.id;
        document.add_object(object);
        assert!(document.mark_managed(id));
        assert!(!document.mark_managed(id));
        document.remove_object(id);
        assert!(document.is_managed(id));
    }

    #[test]
    fn removing_active_object_clears_selection() {
        let mut document = Document::new();
        let object = text(&mut document, Point::default(), "a");
        let id = object.id;
        document.add_object(object);
        assert!(document.set_active_object(id));
        document.remove_object(id);
        assert_eq!(document.active_object(), None);
        assert!(!document.set_active_object(id));
    }

    #[test]
    fn set_angle_orbits_objects_around_image_center() {
        let mut document = document_with_image(100, 100);
        let object = text(&mut document, Point::new(100.0, 50.0), "a");
        let id = object.id;
        document.add_object(object);

        assert_eq!(document.set_angle(90.0), 90.0);
        let rotated = document.object(id).expect("present");
        assert_point_close(rotated.position, Point::new(50.0, 100.0));
        assert_eq!(rotated.angle, 90.0);

        document.set_angle(0.0);
        assert_point_close(
            document.object(id).expect("present").position,
            Point::new(100.0, 50.0),
        );
    }

    #[test]
    fn flip_negates_angle_per_toggled_axis_and_mirrors_objects() {
        let mut document = document_with_image(100, 60);
        let object = text(&mut document, Point::new(10.0, 20.0), "a");
        let id = object.id;
        document.add_object(object);
        document.set_angle(30.0);

        let angle = document.apply_flip(FlipSetting::new(true, false));
        assert_eq!(angle, -30.0);
        assert!(document.object(id).expect("present").flip_x);

        let angle = document.apply_flip(FlipSetting::new(false, true));
        assert_eq!(angle, -30.0, "x and y both toggle, negating twice");

        let angle = document.apply_flip(FlipSetting::default());
        assert_eq!(angle, 30.0);
        let restored = document.object(id).expect("present");
        assert!(!restored.flip_x && !restored.flip_y);
    }

    #[test]
    fn surface_dimensions_follow_rotation() {
        let mut document = document_with_image(400, 300);
        assert_eq!(document.surface_dimensions(), Dimensions::new(400, 300));
        document.set_angle(90.0);
        assert_eq!(document.surface_dimensions(), Dimensions::new(300, 400));
        assert_eq!(Document::new().surface_dimensions(), Dimensions::default());
    }

    #[test]
    fn remove_all_then_restore_is_observable() {
        let mut document = Document::new();
        let object = text(&mut document, Point::default(), "a");
        let id = object.id;
        document.add_object(object);
        document.drain_changes();

        let removed = document.remove_all();
        assert_eq!(document.drain_changes(), vec![DocumentChange::ObjectRemoved(id)]);
        document.restore_objects(removed);
        assert_eq!(document.drain_changes(), vec![DocumentChange::ObjectAdded(id)]);
    }
}
