use std::collections::HashMap;
use std::path::Path;

use crate::command::{create, CommandOutput, CommandRequest, FlipType, RotationType};
use crate::components::{
    ExportFormat, ImageSource, LoadedImage, SurfaceElement, TextStylePatch,
};
use crate::document::{FlipSetting, ObjectId};
use crate::error::EditorResult;
use crate::geometry::{Color, Dimensions};
use crate::notification::Notification;
use crate::state::EditorMode;

use super::tracking::{flip_notifier, image_notifier, rotate_notifier, Recording};
use super::Editor;

impl Editor {
    pub fn load_image_from_url(
        &mut self,
        url: &str,
        name: &str,
    ) -> EditorResult<Option<LoadedImage>> {
        self.load_image(name, ImageSource::Url(url.to_string()))
    }

    /// Loads a file, named after its stem unless `name` is given.
    pub fn load_image_from_file(
        &mut self,
        path: impl AsRef<Path>,
        name: Option<&str>,
    ) -> EditorResult<Option<LoadedImage>> {
        let path = path.as_ref();
        let name = name.map(str::to_string).unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        self.load_image(&name, ImageSource::File(path.to_path_buf()))
    }

    fn load_image(&mut self, name: &str, source: ImageSource) -> EditorResult<Option<LoadedImage>> {
        let command = create(CommandRequest::LoadImage {
            name: name.to_string(),
            source,
        })
        .with_execute_callback(image_notifier(&self.events))
        .with_undo_callback(image_notifier(&self.events));
        match self.execute(command)? {
            CommandOutput::Image(loaded) => Ok(loaded),
            _ => Ok(None),
        }
    }

    pub fn clear_objects(&mut self) -> EditorResult<()> {
        let events = self.events();
        let command = create(CommandRequest::ClearObjects)
            .with_execute_callback(move |_| events.emit(Notification::ClearObjects));
        self.execute(command)?;
        Ok(())
    }

    pub fn flip_x(&mut self) -> EditorResult<FlipSetting> {
        self.flip(FlipType::X)
    }

    pub fn flip_y(&mut self) -> EditorResult<FlipSetting> {
        self.flip(FlipType::Y)
    }

    pub fn reset_flip(&mut self) -> EditorResult<FlipSetting> {
        self.flip(FlipType::Reset)
    }

    fn flip(&mut self, flip_type: FlipType) -> EditorResult<FlipSetting> {
        let command = create(CommandRequest::Flip(flip_type))
            .with_execute_callback(flip_notifier(&self.events))
            .with_undo_callback(flip_notifier(&self.events));
        self.execute(command)?;
        Ok(self.document.flip_setting())
    }

    /// Rotates by `delta` degrees, returning the normalised angle.
    pub fn rotate(&mut self, delta: f64) -> EditorResult<f64> {
        self.rotation(RotationType::Rotate(delta))
    }

    pub fn set_angle(&mut self, angle: f64) -> EditorResult<f64> {
        self.rotation(RotationType::SetAngle(angle))
    }

    fn rotation(&mut self, rotation: RotationType) -> EditorResult<f64> {
        let command = create(CommandRequest::Rotate(rotation))
            .with_execute_callback(rotate_notifier(&self.events))
            .with_undo_callback(rotate_notifier(&self.events));
        self.execute(command)?;
        Ok(self.document.angle())
    }

    /// Removes the selected object through the history. Returns its id, or
    /// `None` when nothing was selected.
    pub fn remove_active_object(&mut self) -> EditorResult<Option<ObjectId>> {
        let Some(id) = self.document.active_object() else {
            return Ok(None);
        };
        self.end_all()?;
        // Leaving text mode may have swept the selection away.
        if !self.document.contains(id) {
            return Ok(None);
        }
        self.execute(create(CommandRequest::RemoveObject(id)))?;
        Ok(Some(id))
    }

    pub fn select_object(&mut self, id: ObjectId) -> bool {
        self.document.set_active_object(id)
    }

    /// Adds a text object. Outside text mode it is committed right away.
    pub fn add_text(
        &mut self,
        text: &str,
        style: Option<&TextStylePatch>,
    ) -> EditorResult<ObjectId> {
        let id = self
            .invoker
            .components_mut()
            .text_mut()?
            .add(&mut self.document, text, style);
        self.absorb_changes(Recording::Record);
        let id = id?;
        if !self.mode.is(EditorMode::Text) {
            self.commit_texts();
        }
        Ok(id)
    }

    /// Replaces the content of the selected text, if any.
    pub fn change_text(&mut self, text: &str) -> EditorResult<()> {
        let Some(target) = self.document.active_object() else {
            tracing::debug!("change_text without a selected object");
            return Ok(());
        };
        self.invoker
            .components_mut()
            .text_mut()?
            .change(&mut self.document, target, text)?;
        Ok(())
    }

    pub fn change_text_style(&mut self, style: &TextStylePatch) -> EditorResult<()> {
        let Some(target) = self.document.active_object() else {
            tracing::debug!("change_text_style without a selected object");
            return Ok(());
        };
        self.invoker
            .components_mut()
            .text_mut()?
            .set_style(&mut self.document, target, style)?;
        Ok(())
    }

    pub fn add_icon(&mut self, icon_type: &str, angle: Option<f64>) -> EditorResult<ObjectId> {
        let id = self
            .invoker
            .components_mut()
            .icon_mut()?
            .add(&mut self.document, icon_type, angle.unwrap_or(0.0));
        self.absorb_changes(Recording::Record);
        Ok(id?)
    }

    /// Sets the colour for new icons and recolours the selected icon.
    pub fn change_icon_color(&mut self, color: Color) -> EditorResult<()> {
        let target = self.document.active_object();
        self.invoker
            .components_mut()
            .icon_mut()?
            .set_color(&mut self.document, color, target);
        Ok(())
    }

    pub fn register_icons(&mut self, paths: HashMap<String, String>) -> EditorResult<()> {
        self.invoker.components_mut().icon_mut()?.register_paths(paths);
        Ok(())
    }

    /// Exports the oriented main image; `None` uses the configured format.
    pub fn to_data_url(&self, format: Option<ExportFormat>) -> EditorResult<String> {
        let format = format.unwrap_or(self.config.export_format);
        let url = self
            .invoker
            .components()
            .main_image()?
            .to_data_url(&self.document, format)?;
        Ok(url)
    }

    pub fn image_name(&self) -> Option<&str> {
        self.invoker
            .components()
            .main_image()
            .ok()
            .and_then(|main| main.image_name(&self.document))
    }

    /// Displayed size of the surface.
    pub fn surface(&self) -> EditorResult<Dimensions> {
        let main = self.invoker.components().main_image()?;
        Ok(self
            .document
            .surface_dimensions()
            .fit_within(main.max_display_dimensions()))
    }

    pub fn surface_element(&self) -> Option<&SurfaceElement> {
        self.invoker
            .components()
            .main_image()
            .ok()
            .and_then(|main| main.surface_element())
    }

    pub fn set_surface_element(&mut self, element: SurfaceElement) -> EditorResult<()> {
        let main = self.invoker.components_mut().main_image_mut()?;
        main.set_surface_element(element);
        main.adjust_surface(&self.document);
        Ok(())
    }

    pub fn set_max_display_dimensions(&mut self, dimensions: Dimensions) -> EditorResult<()> {
        let main = self.invoker.components_mut().main_image_mut()?;
        main.set_max_display_dimensions(dimensions);
        main.adjust_surface(&self.document);
        Ok(())
    }
}
