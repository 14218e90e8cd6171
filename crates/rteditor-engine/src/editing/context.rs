use serde::{Deserialize, Serialize};

use crate::editing::patch::Patch;
use crate::editing::transaction::Step;

/// Colour scheme requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    /// Follow the platform preference
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub mode: ThemeMode,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            mode: ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhTw => "zh-TW",
        }
    }

    /// Accessible label for the block drag handle
    pub fn drag_handle_label(&self) -> &'static str {
        match self {
            Locale::En => "Drag to reorder",
            Locale::ZhTw => "拖曳以重新排序",
        }
    }
}

/// Per-editor presentation context. Each editor instance owns its own, so
/// several editors with different themes or locales can live in one process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorContext {
    pub theme: Theme,
    pub locale: Locale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationUser {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Optional real-time collaboration capability, injected at construction.
///
/// The editor reports every committed document change; transport and
/// merging are the provider's business.
pub trait CollaborationProvider {
    fn user(&self) -> &CollaborationUser;

    fn on_commit(&mut self, patch: &Patch, steps: &[Step]);
}
