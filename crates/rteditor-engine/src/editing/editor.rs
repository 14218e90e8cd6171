use std::sync::Arc;

use crate::editing::context::{CollaborationProvider, EditorContext};
use crate::editing::patch::Patch;
use crate::editing::state::{EditorState, Selection};
use crate::editing::transaction::{Transaction, TransformError};
use crate::editing::CommandResult;
use crate::export::{self, ExportError, MarkdownOptions};
use crate::extensions::{Extension, ExtensionEntry, safe_load_extensions};
use crate::marks::{self, CommentAttrs, Stamp};
use crate::model::{Node, NodeKind};
use crate::reorder;
use crate::stats::DocumentStats;

/// Owns the committed snapshot and serializes every mutation through
/// [`Editor::dispatch`].
///
/// Command methods return `Ok(false)` for expected no-ops (collapsed
/// selection, unknown id, block already at the edge) and only error when a
/// step fails against the document.
pub struct Editor {
    state: EditorState,
    context: EditorContext,
    collaboration: Option<Box<dyn CollaborationProvider>>,
    extensions: Vec<Box<dyn Extension>>,
    editable: bool,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("collaborative", &self.collaboration.is_some())
            .field("extensions", &self.extension_names())
            .field("editable", &self.editable)
            .finish()
    }
}

impl Editor {
    pub fn new(doc: Node) -> Self {
        Self::with_context(doc, EditorContext::default())
    }

    pub fn with_context(doc: Node, context: EditorContext) -> Self {
        Self {
            state: EditorState::new(doc),
            context,
            collaboration: None,
            extensions: Vec::new(),
            editable: true,
        }
    }

    /// Enables collaborative mode. Without a provider the editor is single-user.
    pub fn with_collaboration(mut self, provider: Box<dyn CollaborationProvider>) -> Self {
        self.collaboration = Some(provider);
        self
    }

    /// Registers extensions, silently dropping the ones that fail to load.
    pub fn with_extensions(mut self, entries: Vec<ExtensionEntry>) -> Self {
        self.extensions.extend(safe_load_extensions(entries));
        self
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn doc(&self) -> &Node {
        &self.state.doc
    }

    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    pub fn collaboration(&self) -> Option<&dyn CollaborationProvider> {
        self.collaboration.as_deref()
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), TransformError> {
        let mut tr = self.transaction();
        tr.set_selection(selection)?;
        self.dispatch(tr)?;
        Ok(())
    }

    /// Starts a transaction against the current snapshot.
    pub fn transaction(&self) -> Transaction {
        Transaction::new(&self.state)
    }

    /// Commits `tr` as one new snapshot.
    ///
    /// A transaction built against an older snapshot is rejected, since its
    /// positions were computed for a document that no longer exists.
    pub fn dispatch(&mut self, tr: Transaction) -> Result<Patch, TransformError> {
        if tr.base_version() != self.state.version {
            return Err(TransformError::StaleSnapshot {
                built: tr.base_version(),
                current: self.state.version,
            });
        }
        let (doc, selection, steps, changed) = tr.into_parts();
        let version = self.state.version + 1;
        if !steps.is_empty() {
            self.state.doc = Arc::new(doc);
        }
        self.state.selection = selection;
        self.state.version = version;

        let patch = Patch {
            changed,
            new_selection: selection,
            version,
        };
        log::debug!("committed version {version} ({} steps)", steps.len());
        if patch.doc_changed()
            && let Some(provider) = self.collaboration.as_mut()
        {
            provider.on_commit(&patch, &steps);
        }
        Ok(patch)
    }

    /// Runs a command and dispatches the transaction it produces.
    pub(crate) fn run<F>(&mut self, command: F) -> Result<bool, TransformError>
    where
        F: FnOnce(&EditorState) -> CommandResult,
    {
        match command(&self.state)? {
            Some(tr) => {
                self.dispatch(tr)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether `command` would apply to the current state, without committing anything.
    pub fn can<F>(&self, command: F) -> bool
    where
        F: FnOnce(&EditorState) -> CommandResult,
    {
        matches!(command(&self.state), Ok(Some(_)))
    }

    pub fn move_node_up(&mut self) -> Result<bool, TransformError> {
        self.run(reorder::move_node_up)
    }

    pub fn move_node_down(&mut self) -> Result<bool, TransformError> {
        self.run(reorder::move_node_down)
    }

    pub fn add_comment(&mut self, attrs: &CommentAttrs) -> Result<bool, TransformError> {
        self.run(|state| marks::add_comment(state, attrs))
    }

    pub fn remove_comment(&mut self, comment_id: &str) -> Result<bool, TransformError> {
        self.run(|state| marks::remove_comment(state, comment_id))
    }

    pub fn resolve_comment(&mut self, comment_id: &str) -> Result<bool, TransformError> {
        self.run(|state| marks::resolve_comment(state, comment_id))
    }

    pub fn unresolve_comment(&mut self, comment_id: &str) -> Result<bool, TransformError> {
        self.run(|state| marks::unresolve_comment(state, comment_id))
    }

    pub fn jump_to_next_comment(&mut self) -> Result<bool, TransformError> {
        self.run(marks::jump_to_next_comment)
    }

    pub fn jump_to_previous_comment(&mut self) -> Result<bool, TransformError> {
        self.run(marks::jump_to_previous_comment)
    }

    pub fn set_stamp(&mut self, stamp: &Stamp) -> Result<bool, TransformError> {
        self.run(|state| marks::set_stamp(state, stamp))
    }

    pub fn remove_stamp(&mut self) -> Result<bool, TransformError> {
        self.run(marks::remove_stamp)
    }

    pub fn remove_stamp_by_id(&mut self, stamp_id: &str) -> Result<bool, TransformError> {
        self.run(|state| marks::remove_stamp_by_id(state, stamp_id))
    }

    /// Inserts a math node at the cursor, replacing any selected text.
    /// Display math is a block and goes after the block holding the cursor.
    pub fn insert_math(&mut self, latex: &str, display: bool) -> Result<bool, TransformError> {
        self.run(|state| insert_math(state, latex, display))
    }

    pub fn to_markdown(&self, options: &MarkdownOptions) -> String {
        export::serialize(self.doc(), options)
    }

    pub fn to_html(&self) -> String {
        export::to_html(self.doc())
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        export::to_json(self.doc())
    }

    pub fn stats(&self, words_per_minute: u32) -> DocumentStats {
        DocumentStats::from_doc(self.doc(), words_per_minute)
    }
}

fn insert_math(state: &EditorState, latex: &str, display: bool) -> CommandResult {
    let latex = latex.trim();
    if latex.is_empty() {
        return Ok(None);
    }
    let node = Node::leaf(NodeKind::Math)
        .with_attr("latex", latex)
        .with_attr("display", display);

    let mut tr = Transaction::new(state);
    let selection = state.selection;
    if display {
        let Some(block) = crate::model::resolve_top_level_block(&state.doc, selection.from()) else {
            let end = state.doc.content_size();
            tr.insert(end, vec![node])?;
            return Ok(Some(tr));
        };
        let at = block.end();
        tr.insert(at, vec![node])?
            .set_selection(Selection::cursor(at + 1))?;
    } else {
        let from = selection.from();
        tr.delete(from, selection.to())?
            .insert(from, vec![node])?
            .set_selection(Selection::cursor(from + 1))?;
    }
    Ok(Some(tr))
}
