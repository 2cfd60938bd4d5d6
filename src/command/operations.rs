use crate::components::{ImageSource, LoadedImage};
use crate::document::{FlipSetting, GraphicObject, ImageHandle, ImageTransform, ObjectId};

use super::{
    CommandAction, CommandContext, CommandError, CommandKind, CommandOutput, CommandResult,
    FlipType, RotationType,
};

#[derive(Debug)]
struct DocumentSnapshot {
    image: Option<ImageHandle>,
    transform: ImageTransform,
    objects: Vec<GraphicObject>,
}

/// Replaces the main image and clears every object.
#[derive(Debug)]
pub struct LoadImage {
    name: String,
    source: ImageSource,
    previous: Option<DocumentSnapshot>,
}

impl LoadImage {
    pub fn new(name: impl Into<String>, source: ImageSource) -> Self {
        Self {
            name: name.into(),
            source,
            previous: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CommandAction for LoadImage {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let document = &mut *context.document;
        self.previous = Some(DocumentSnapshot {
            image: document.image().cloned(),
            transform: document.transform(),
            objects: document.remove_all(),
        });

        let main = context.components.main_image_mut()?;
        let loaded = main.load(document, &self.name, self.source.clone());
        if loaded.is_some() {
            // Redo reuses the decoded raster.
            if let Some(image) = document.image() {
                self.source = ImageSource::Raster(image.shared_raster());
            }
        }
        Ok(CommandOutput::Image(loaded))
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let snapshot = self
            .previous
            .take()
            .ok_or(CommandError::NotExecuted(CommandKind::LoadImage))?;
        let document = &mut *context.document;
        document.remove_all();

        let main = context.components.main_image_mut()?;
        let restored = match snapshot.image {
            Some(image) => {
                let name = image.name().to_string();
                let loaded = main.load(document, &name, ImageSource::Raster(image.shared_raster()));
                document.restore_transform(snapshot.transform);
                let current = main.adjust_surface(document);
                loaded.map(|loaded| LoadedImage { current, ..loaded })
            }
            None => {
                main.clear(document);
                None
            }
        };
        document.restore_objects(snapshot.objects);
        Ok(CommandOutput::Image(restored))
    }
}

#[derive(Debug, Default)]
pub struct ClearObjects {
    removed: Vec<GraphicObject>,
}

impl ClearObjects {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommandAction for ClearObjects {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        self.removed = context.document.remove_all();
        Ok(CommandOutput::Objects(ids(&self.removed)))
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let removed = std::mem::take(&mut self.removed);
        let restored = ids(&removed);
        context.document.restore_objects(removed);
        Ok(CommandOutput::Objects(restored))
    }
}

fn ids(objects: &[GraphicObject]) -> Vec<ObjectId> {
    objects.iter().map(|object| object.id).collect()
}

#[derive(Debug)]
pub struct AddObject {
    object: GraphicObject,
}

impl AddObject {
    pub fn new(object: GraphicObject) -> Self {
        Self { object }
    }
}

impl CommandAction for AddObject {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let id = self.object.id;
        if !context.document.contains(id) {
            context.document.add_object(self.object.clone());
        }
        Ok(CommandOutput::Object(id))
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let id = self.object.id;
        // Keep edits made after the add so redo brings them back.
        if let Some((_, object)) = context.document.remove_object(id) {
            self.object = object;
        }
        Ok(CommandOutput::Object(id))
    }
}

#[derive(Debug)]
pub struct RemoveObject {
    id: ObjectId,
    removed: Option<(usize, GraphicObject)>,
}

impl RemoveObject {
    pub fn new(id: ObjectId) -> Self {
        Self { id, removed: None }
    }
}

impl CommandAction for RemoveObject {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let removed = context
            .document
            .remove_object(self.id)
            .ok_or(CommandError::ObjectNotFound(self.id))?;
        self.removed = Some(removed);
        Ok(CommandOutput::Object(self.id))
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let (index, object) = self
            .removed
            .take()
            .ok_or(CommandError::NotExecuted(CommandKind::RemoveObject))?;
        context.document.insert_object(index, object);
        Ok(CommandOutput::Object(self.id))
    }
}

#[derive(Debug)]
pub struct Flip {
    flip_type: FlipType,
    previous: Option<FlipSetting>,
}

impl Flip {
    pub fn new(flip_type: FlipType) -> Self {
        Self {
            flip_type,
            previous: None,
        }
    }

    fn apply(
        context: &mut CommandContext<'_>,
        setting: FlipSetting,
    ) -> CommandResult<CommandOutput> {
        let angle = context.document.apply_flip(setting);
        context
            .components
            .main_image_mut()?
            .adjust_surface(context.document);
        Ok(CommandOutput::Flip { setting, angle })
    }
}

impl CommandAction for Flip {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let current = context.document.flip_setting();
        self.previous = Some(current);
        let target = match self.flip_type {
            FlipType::X => FlipSetting::new(!current.flip_x, current.flip_y),
            FlipType::Y => FlipSetting::new(current.flip_x, !current.flip_y),
            FlipType::Reset => FlipSetting::default(),
        };
        Self::apply(context, target)
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let previous = self
            .previous
            .take()
            .ok_or(CommandError::NotExecuted(CommandKind::Flip))?;
        Self::apply(context, previous)
    }
}

#[derive(Debug)]
pub struct Rotate {
    rotation: RotationType,
    previous: Option<f64>,
}

impl Rotate {
    pub fn new(rotation: RotationType) -> Self {
        Self {
            rotation,
            previous: None,
        }
    }

    fn apply(context: &mut CommandContext<'_>, angle: f64) -> CommandResult<CommandOutput> {
        let angle = context.document.set_angle(angle);
        context
            .components
            .main_image_mut()?
            .adjust_surface(context.document);
        Ok(CommandOutput::Angle(angle))
    }
}

impl CommandAction for Rotate {
    fn execute(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let current = context.document.angle();
        self.previous = Some(current);
        let target = match self.rotation {
            RotationType::Rotate(delta) => current + delta,
            RotationType::SetAngle(angle) => angle,
        };
        Self::apply(context, target)
    }

    fn undo(&mut self, context: &mut CommandContext<'_>) -> CommandResult<CommandOutput> {
        let previous = self
            .previous
            .take()
            .ok_or(CommandError::NotExecuted(CommandKind::Rotate))?;
        Self::apply(context, previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{encode_data_url, ExportFormat};
    use crate::config::EditorConfig;
    use crate::document::{Document, DocumentChange, ObjectKind, TextShape};
    use crate::geometry::Point;
    use crate::invoker::ComponentRegistry;
    use image::DynamicImage;

    struct Fixture {
        document: Document,
        components: ComponentRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                document: Document::new(),
                components: ComponentRegistry::with_defaults(&EditorConfig::default()),
            }
        }

        fn context(&mut self) -> CommandContext<'_> {
            CommandContext::new(&mut self.document, &mut self.components)
        }

        fn add_text(&mut self, text: &str, position: Point) -> ObjectId {
            let id = self.document.allocate_id();
            self.document.add_object(GraphicObject::new(
                id,
                position,
                ObjectKind::Text(TextShape {
                    text: text.to_string(),
                    style: Default::default(),
                }),
            ));
            id
        }
    }

    fn png(width: u32, height: u32) -> ImageSource {
        ImageSource::Url(
            encode_data_url(&DynamicImage::new_rgba8(width, height), ExportFormat::Png)
                .expect("encodes"),
        )
    }

    #[test]
    fn rotate_accumulates_and_undo_restores() {
        let mut fixture = Fixture::new();
        let mut first = Rotate::new(RotationType::Rotate(10.0));
        let mut second = Rotate::new(RotationType::Rotate(-95.0));

        let angle = |output: CommandResult<CommandOutput>| output.expect("rotation");
        assert_eq!(angle(first.execute(&mut fixture.context())), CommandOutput::Angle(10.0));
        assert_eq!(angle(second.execute(&mut fixture.context())), CommandOutput::Angle(-85.0));
        assert_eq!(angle(second.undo(&mut fixture.context())), CommandOutput::Angle(10.0));
        assert_eq!(angle(first.undo(&mut fixture.context())), CommandOutput::Angle(0.0));
    }

    #[test]
    fn set_angle_normalises_keeping_sign() {
        let mut fixture = Fixture::new();
        let mut rotate = Rotate::new(RotationType::SetAngle(-370.0));
        assert_eq!(
            rotate.execute(&mut fixture.context()).expect("rotate"),
            CommandOutput::Angle(-10.0)
        );
    }

    #[test]
    fn flip_negates_angle_and_undo_restores_setting() {
        let mut fixture = Fixture::new();
        fixture.document.set_angle(30.0);
        let mut flip = Flip::new(FlipType::X);

        assert_eq!(
            flip.execute(&mut fixture.context()).expect("flip"),
            CommandOutput::Flip {
                setting: FlipSetting::new(true, false),
                angle: -30.0
            }
        );
        assert_eq!(
            flip.undo(&mut fixture.context()).expect("undo"),
            CommandOutput::Flip {
                setting: FlipSetting::default(),
                angle: 30.0
            }
        );
    }

    #[test]
    fn remove_object_reinserts_at_original_index() {
        let mut fixture = Fixture::new();
        let bottom = fixture.add_text("a", Point::default());
        let middle = fixture.add_text("b", Point::default());
        let top = fixture.add_text("c", Point::default());

        let mut remove = RemoveObject::new(middle);
        remove.execute(&mut fixture.context()).expect("remove");
        assert!(!fixture.document.contains(middle));
        remove.undo(&mut fixture.context()).expect("undo");

        let order: Vec<_> = fixture.document.objects().iter().map(|o| o.id).collect();
        assert_eq!(order, vec![bottom, middle, top]);
    }

    #[test]
    fn remove_missing_object_fails_without_effect() {
        let mut fixture = Fixture::new();
        let mut remove = RemoveObject::new(ObjectId::new(42));
        assert!(matches!(
            remove.execute(&mut fixture.context()),
            Err(CommandError::ObjectNotFound(_))
        ));
        assert!(matches!(
            remove.undo(&mut fixture.context()),
            Err(CommandError::NotExecuted(CommandKind::RemoveObject))
        ));
    }

    #[test]
    fn clear_objects_restores_every_object_in_order() {
        let mut fixture = Fixture::new();
        let first = fixture.add_text("a", Point::default());
        let second = fixture.add_text("b", Point::default());
        fixture.document.drain_changes();

        let mut clear = ClearObjects::new();
        clear.execute(&mut fixture.context()).expect("clear");
        assert!(fixture.document.objects().is_empty());
        assert_eq!(
            fixture.document.drain_changes(),
            vec![
                DocumentChange::ObjectRemoved(first),
                DocumentChange::ObjectRemoved(second)
            ]
        );

        assert_eq!(
            clear.undo(&mut fixture.context()).expect("undo"),
            CommandOutput::Objects(vec![first, second])
        );
        assert_eq!(fixture.document.objects().len(), 2);
    }

    #[test]
    fn add_object_undo_keeps_later_edits_for_redo() {
        let mut fixture = Fixture::new();
        let id = fixture.document.allocate_id();
        let object = GraphicObject::new(
            id,
            Point::default(),
            ObjectKind::Text(TextShape {
                text: "draft".to_string(),
                style: Default::default(),
            }),
        );
        let mut add = AddObject::new(object);
        add.execute(&mut fixture.context()).expect("add");
        if let Some(text) = fixture.document.object_mut(id).and_then(GraphicObject::as_text_mut) {
            text.text = "final".to_string();
        }

        add.undo(&mut fixture.context()).expect("undo");
        assert!(!fixture.document.contains(id));
        add.execute(&mut fixture.context()).expect("redo");
        let text = fixture.document.object(id).and_then(GraphicObject::as_text);
        assert_eq!(text.map(|shape| shape.text.as_str()), Some("final"));
    }

    #[test]
    fn load_image_undo_restores_previous_image_and_objects() {
        let mut fixture = Fixture::new();
        let mut first = LoadImage::new("first", png(40, 20));
        first.execute(&mut fixture.context()).expect("load");
        fixture.document.set_angle(90.0);
        let kept = fixture.add_text("keep", Point::default());

        let mut second = LoadImage::new("second", png(8, 8));
        let CommandOutput::Image(Some(loaded)) =
            second.execute(&mut fixture.context()).expect("load")
        else {
            panic!("expected a loaded image");
        };
        assert_eq!(loaded.name, "second");
        assert!(fixture.document.objects().is_empty());
        assert_eq!(fixture.document.angle(), 0.0);

        let CommandOutput::Image(Some(restored)) =
            second.undo(&mut fixture.context()).expect("undo")
        else {
            panic!("expected the previous image");
        };
        assert_eq!(restored.name, "first");
        assert_eq!(fixture.document.angle(), 90.0);
        assert!(fixture.document.contains(kept));
    }

    #[test]
    fn load_image_undo_without_previous_image_clears() {
        let mut fixture = Fixture::new();
        let mut load = LoadImage::new("only", png(4, 4));
        load.execute(&mut fixture.context()).expect("load");
        assert_eq!(
            load.undo(&mut fixture.context()).expect("undo"),
            CommandOutput::Image(None)
        );
        assert!(fixture.document.image().is_none());
    }

    #[test]
    fn failed_load_yields_no_image() {
        let mut fixture = Fixture::new();
        let source = ImageSource::Url("data:image/png;base64,AAAA".into());
        let mut load = LoadImage::new("broken", source);
        assert_eq!(
            load.execute(&mut fixture.context())
                .expect("operational failure is not an error"),
            CommandOutput::Image(None)
        );
    }
}
