use std::fmt;

/// The editor's exclusive interactive tool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    #[default]
    Normal,
    Crop,
    FreeDrawing,
    Text,
}

impl EditorMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Crop => "CROPPER",
            Self::FreeDrawing => "FREE_DRAWING",
            Self::Text => "TEXT",
        }
    }

    pub const fn is_tool(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
