use crate::components::{BrushSettings, ComponentError, CropPreset, CropZone, LoadedImage};
use crate::document::ObjectId;
use crate::error::EditorResult;
use crate::geometry::Point;
use crate::notification::{Notification, TextActivation};
use crate::state::{EditorMode, ModeEvent};

use super::tracking::Recording;
use super::Editor;

impl Editor {
    /// Exits text, free drawing and crop (without applying), then drops the
    /// selection. Every step runs; the first failure is reported.
    pub fn end_all(&mut self) -> EditorResult<()> {
        let text = self.end_text_mode();
        let drawing = self.end_free_drawing();
        let crop = self.end_cropping(false);
        self.deactivate_all();
        text?;
        drawing?;
        crop.map(drop)
    }

    pub fn deactivate_all(&mut self) {
        self.document.discard_active_object();
        self.document.request_render();
    }

    pub fn start_cropping(&mut self) -> EditorResult<()> {
        if self.mode.is(EditorMode::Crop) {
            return Ok(());
        }
        self.end_all()?;
        self.invoker
            .components_mut()
            .cropper_mut()?
            .start(&mut self.document)?;
        self.mode.transition(ModeEvent::Enter(EditorMode::Crop))?;
        self.events.emit(Notification::StartCropping);
        Ok(())
    }

    /// Leaves crop mode. With `apply` and a usable zone, the cropped raster is
    /// loaded as a new history entry and its load result returned.
    pub fn end_cropping(&mut self, apply: bool) -> EditorResult<Option<LoadedImage>> {
        if !self.mode.is(EditorMode::Crop) {
            return Ok(None);
        }
        self.mode.transition(ModeEvent::Exit)?;
        let cropped = self
            .invoker
            .components_mut()
            .cropper_mut()?
            .end(&mut self.document, apply)?;
        self.events.emit(Notification::EndCropping);

        match cropped {
            Some(cropped) => self.load_image_from_url(&cropped.url, &cropped.image_name),
            None => Ok(None),
        }
    }

    pub fn set_crop_preset(&mut self, preset: CropPreset) -> EditorResult<()> {
        self.invoker.components_mut().cropper_mut()?.set_preset(preset);
        Ok(())
    }

    /// Sets the pending crop rectangle, returning it after clamping.
    pub fn set_crop_zone(&mut self, zone: CropZone) -> EditorResult<CropZone> {
        let zone = self
            .invoker
            .components_mut()
            .cropper_mut()?
            .set_zone(&self.document, zone)?;
        Ok(zone)
    }

    pub fn start_free_drawing(&mut self, brush: Option<BrushSettings>) -> EditorResult<()> {
        if self.mode.is(EditorMode::FreeDrawing) {
            if let Some(brush) = brush {
                self.set_brush(brush)?;
            }
            return Ok(());
        }
        self.end_all()?;
        self.invoker
            .components_mut()
            .free_drawing_mut()?
            .start(&mut self.document, brush)?;
        self.mode
            .transition(ModeEvent::Enter(EditorMode::FreeDrawing))?;
        self.events.emit(Notification::StartFreeDrawing);
        Ok(())
    }

    pub fn set_brush(&mut self, brush: BrushSettings) -> EditorResult<()> {
        self.invoker
            .components_mut()
            .free_drawing_mut()?
            .set_brush(brush);
        Ok(())
    }

    /// Adds a finished stroke; it becomes an undoable add-object entry.
    pub fn draw_path(&mut self, points: &[Point]) -> EditorResult<Option<ObjectId>> {
        let id = self
            .invoker
            .components_mut()
            .free_drawing_mut()?
            .draw(&mut self.document, points);
        self.absorb_changes(Recording::Record);
        Ok(id?)
    }

    pub fn end_free_drawing(&mut self) -> EditorResult<()> {
        if !self.mode.is(EditorMode::FreeDrawing) {
            return Ok(());
        }
        self.mode.transition(ModeEvent::Exit)?;
        self.invoker
            .components_mut()
            .free_drawing_mut()?
            .end(&mut self.document)?;
        self.events.emit(Notification::EndFreeDrawing);
        Ok(())
    }

    pub fn start_text_mode(&mut self) -> EditorResult<()> {
        if self.mode.is(EditorMode::Text) {
            return Ok(());
        }
        self.end_all()?;
        self.invoker
            .components_mut()
            .text_mut()?
            .start(&mut self.document)?;
        self.mode.transition(ModeEvent::Enter(EditorMode::Text))?;
        Ok(())
    }

    /// Leaves text mode. Empty texts from the session are discarded; the rest
    /// are committed to the history.
    pub fn end_text_mode(&mut self) -> EditorResult<()> {
        if !self.mode.is(EditorMode::Text) {
            return Ok(());
        }
        self.mode.transition(ModeEvent::Exit)?;
        let swept = self
            .invoker
            .components_mut()
            .text_mut()?
            .end(&mut self.document);
        self.absorb_changes(Recording::Record);
        let swept = swept?;
        if !swept.is_empty() {
            tracing::debug!(count = swept.len(), "discarded empty texts");
        }
        self.commit_texts();
        Ok(())
    }

    /// Starts a new text at `origin` in text mode; a no-op in other modes.
    pub fn text_pointer_down(&mut self, origin: Point, client: Point) -> EditorResult<()> {
        if !self.mode.is(EditorMode::Text) {
            return Ok(());
        }
        let styles = self.invoker.components_mut().text_mut()?.pointer_down(origin);
        self.document.discard_active_object();
        self.events.emit(Notification::ActivateText(TextActivation {
            is_new: true,
            text: String::new(),
            styles,
            origin_position: origin,
            client_position: client,
        }));
        Ok(())
    }

    /// Activates an existing text for editing.
    pub fn select_text(&mut self, id: ObjectId, client: Point) -> EditorResult<()> {
        let object = self
            .document
            .object(id)
            .ok_or(ComponentError::ObjectNotFound(id))?;
        let shape = object.as_text().ok_or(ComponentError::NotText(id))?;
        let activation = TextActivation {
            is_new: false,
            text: shape.text.clone(),
            styles: shape.style.clone(),
            origin_position: object.position,
            client_position: client,
        };
        self.document.set_active_object(id);
        self.events.emit(Notification::ActivateText(activation));
        Ok(())
    }
}
