use serde::{Deserialize, Serialize};

use crate::editing::{Editor, Locale, TransformError};
use crate::model::{Node, resolve_top_level_block};
use crate::reorder::commands::move_block;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragHandleOptions {
    pub handle_class: String,
    pub drop_indicator_class: String,
}

impl Default for DragHandleOptions {
    fn default() -> Self {
        Self {
            handle_class: "rte-drag-handle".to_string(),
            drop_indicator_class: "rte-drop-indicator".to_string(),
        }
    }
}

/// Vertical extent of an element in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height() / 2.0
    }
}

/// Coordinate mapping supplied by the host view.
pub trait ViewGeometry {
    /// Document position under a viewport point
    fn pos_at_coords(&self, x: f64, y: f64) -> Option<usize>;

    /// Bounding box of the block whose opening token is at `block_pos`
    fn block_rect(&self, block_pos: usize) -> Option<Rect>;

    /// Bounding box of the element the drop indicator is positioned in
    fn container_rect(&self) -> Option<Rect>;
}

/// Transient state of one drag gesture.
///
/// Only `Dragging` carries indices, so both are absent outside a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: usize,
        target: Option<usize>,
    },
}

/// Data attached to the platform drag event on drag start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub mime_type: &'static str,
    pub data: String,
    pub effect_allowed: &'static str,
}

/// Insertion line the UI draws while dragging
#[derive(Debug, Clone, PartialEq)]
pub struct DropIndicator {
    pub class: String,
    /// Boundary the block would land on: before block `index`
    pub index: usize,
    /// Offset from the container top, in pixels
    pub top: f64,
}

/// A drag handle the UI renders in front of a top-level block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleDecoration {
    pub index: usize,
    pub pos: usize,
    pub class: String,
    pub aria_label: &'static str,
    pub key: String,
}

/// One handle per top-level block; none when the editor is read-only.
pub fn handle_decorations(
    doc: &Node,
    options: &DragHandleOptions,
    locale: Locale,
    editable: bool,
) -> Vec<HandleDecoration> {
    if !editable {
        return Vec::new();
    }
    let mut pos = 0;
    doc.content
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let decoration = HandleDecoration {
                index,
                pos,
                class: options.handle_class.clone(),
                aria_label: locale.drag_handle_label(),
                key: format!("drag-handle-{index}"),
            };
            pos += child.node_size();
            decoration
        })
        .collect()
}

/// Drives the pointer drag/drop gesture: `Idle → Dragging → Idle`.
///
/// Every exit path (drop, drag end, cancel) goes through [`DragController::reset`].
#[derive(Debug, Default)]
pub struct DragController {
    options: DragHandleOptions,
    state: DragState,
    indicator: Option<DropIndicator>,
}

impl DragController {
    pub fn new(options: DragHandleOptions) -> Self {
        Self {
            options,
            state: DragState::Idle,
            indicator: None,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn indicator(&self) -> Option<&DropIndicator> {
        self.indicator.as_ref()
    }

    /// Starts a gesture from a drag handle.
    ///
    /// `class_list` and `block_index` are the raw attributes of the element
    /// the drag started on; anything that is not a handle is ignored.
    pub fn drag_start(&mut self, class_list: &str, block_index: Option<&str>) -> Option<DragPayload> {
        if !class_list
            .split_whitespace()
            .any(|class| class == self.options.handle_class)
        {
            return None;
        }
        let source: usize = block_index?.trim().parse().ok()?;

        self.reset();
        self.state = DragState::Dragging {
            source,
            target: None,
        };
        log::debug!("drag started from block {source}");
        Some(DragPayload {
            mime_type: "text/plain",
            data: source.to_string(),
            effect_allowed: "move",
        })
    }

    /// Updates the drop target for a pointer at `(x, y)`.
    ///
    /// Pointing at the upper half of a block targets the boundary before it,
    /// the lower half the boundary after it.
    pub fn drag_over(&mut self, doc: &Node, view: &impl ViewGeometry, x: f64, y: f64) -> Option<&DropIndicator> {
        let DragState::Dragging { source, .. } = self.state else {
            return None;
        };
        let pos = view.pos_at_coords(x, y)?;
        let block = resolve_top_level_block(doc, pos)?;

        let mut target = block.index;
        if let Some(rect) = view.block_rect(block.pos)
            && let Some(container) = view.container_rect()
        {
            let insert_before = y < rect.mid_y();
            let top = if insert_before {
                rect.top - container.top
            } else {
                target += 1;
                rect.bottom - container.top
            };
            self.indicator = Some(DropIndicator {
                class: self.options.drop_indicator_class.clone(),
                index: target,
                top,
            });
        }
        self.state = DragState::Dragging {
            source,
            target: Some(target),
        };
        self.indicator.as_ref()
    }

    /// Completes the gesture, moving the dragged block in one transaction.
    /// Returns whether the document changed.
    pub fn drop(&mut self, editor: &mut Editor) -> Result<bool, TransformError> {
        let gesture = self.state;
        self.reset();
        let DragState::Dragging {
            source,
            target: Some(target),
        } = gesture
        else {
            return Ok(false);
        };
        log::debug!("dropping block {source} at boundary {target}");
        editor.run(|state| move_block(state, source, target))
    }

    /// Drag ended without a drop on the editor
    pub fn drag_end(&mut self) {
        self.reset();
    }

    /// Escape pressed, pointer capture lost or pointer left the document
    pub fn cancel(&mut self) {
        if self.reset() {
            log::debug!("drag cancelled");
        }
    }

    /// Clears the gesture and the indicator. Returns whether a gesture was active.
    pub fn reset(&mut self) -> bool {
        let active = self.state != DragState::Idle;
        self.state = DragState::Idle;
        self.indicator = None;
        active
    }
}
