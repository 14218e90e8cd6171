//! # Extension Loading
//!
//! Hosts register pluggable units (node types, mark types, behaviours) as a
//! possibly nested list. [`safe_load_extensions`] flattens it and tries
//! every unit on its own, so one broken unit never keeps the editor, or any
//! other unit, from loading.

use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Node,
    Mark,
    Behavior,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtensionError {
    #[error("Extension has no name")]
    MissingName,
    #[error("Extension \"{name}\" is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// A pluggable document unit.
pub trait Extension {
    fn name(&self) -> &str;

    fn kind(&self) -> ExtensionKind {
        ExtensionKind::Behavior
    }

    /// Eager check run once at load time
    fn validate(&self) -> Result<(), ExtensionError> {
        Ok(())
    }
}

/// One entry of the list handed to [`safe_load_extensions`]
pub enum ExtensionEntry {
    Unit(Box<dyn Extension>),
    /// Presets hand over their units as a nested list
    Group(Vec<ExtensionEntry>),
    /// Something that is not an extension at all, described for the log
    Invalid(String),
}

impl ExtensionEntry {
    pub fn unit(extension: impl Extension + 'static) -> Self {
        ExtensionEntry::Unit(Box::new(extension))
    }
}

impl std::fmt::Debug for ExtensionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtensionEntry::Unit(_) => f.write_str("Unit(..)"),
            ExtensionEntry::Group(entries) => f.debug_tuple("Group").field(entries).finish(),
            ExtensionEntry::Invalid(description) => f.debug_tuple("Invalid").field(description).finish(),
        }
    }
}

/// Flattens `entries` depth-first and keeps the units that have a name and
/// pass validation without panicking. Relative order is preserved; every
/// dropped unit is logged at `warn`.
pub fn safe_load_extensions(entries: Vec<ExtensionEntry>) -> Vec<Box<dyn Extension>> {
    let mut loaded = Vec::new();
    load_into(entries, &mut loaded);
    loaded
}

fn load_into(entries: Vec<ExtensionEntry>, loaded: &mut Vec<Box<dyn Extension>>) {
    for entry in entries {
        match entry {
            ExtensionEntry::Group(nested) => load_into(nested, loaded),
            ExtensionEntry::Invalid(description) => {
                log::warn!("Skipping invalid extension, not an extension object: {description}");
            }
            ExtensionEntry::Unit(extension) => {
                let checked = catch_unwind(AssertUnwindSafe(|| check(extension.as_ref())));
                match checked {
                    Ok(Ok(())) => loaded.push(extension),
                    Ok(Err(err)) => log::warn!("Skipping extension: {err}"),
                    Err(_) => log::warn!("Extension panicked during loading and was skipped"),
                }
            }
        }
    }
}

fn check(extension: &dyn Extension) -> Result<(), ExtensionError> {
    if extension.name().trim().is_empty() {
        return Err(ExtensionError::MissingName);
    }
    extension.validate()
}

/// Descriptor for one of the engine's own units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub kind: ExtensionKind,
}

impl Extension for Builtin {
    fn name(&self) -> &str {
        self.name
    }

    fn kind(&self) -> ExtensionKind {
        self.kind
    }
}

pub const COMMENT: Builtin = Builtin {
    name: "comment",
    kind: ExtensionKind::Mark,
};
pub const STAMP: Builtin = Builtin {
    name: "stamp",
    kind: ExtensionKind::Mark,
};
pub const DRAG_HANDLE: Builtin = Builtin {
    name: "dragHandle",
    kind: ExtensionKind::Behavior,
};
pub const MATH: Builtin = Builtin {
    name: "math",
    kind: ExtensionKind::Node,
};
pub const WORD_COUNT: Builtin = Builtin {
    name: "wordCount",
    kind: ExtensionKind::Behavior,
};

/// The engine's units as one group, ready to register
pub fn builtin_extensions() -> ExtensionEntry {
    ExtensionEntry::Group(
        [COMMENT, STAMP, DRAG_HANDLE, MATH, WORD_COUNT]
            .into_iter()
            .map(ExtensionEntry::unit)
            .collect(),
    )
}
