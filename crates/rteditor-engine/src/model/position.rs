use crate::model::node::Node;

/// A top-level block located by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopLevelBlock<'a> {
    /// Position of the block's opening token
    pub pos: usize,
    pub node: &'a Node,
    pub index: usize,
}

impl TopLevelBlock<'_> {
    pub fn end(&self) -> usize {
        self.pos + self.node.node_size()
    }
}

/// Finds the top-level child of `doc` whose range `[pos, pos + size)` contains `pos`.
///
/// Linear in the number of top-level blocks.
pub fn resolve_top_level_block(doc: &Node, pos: usize) -> Option<TopLevelBlock<'_>> {
    let mut offset = 0;
    for (index, child) in doc.content.iter().enumerate() {
        let end = offset + child.node_size();
        if pos >= offset && pos < end {
            return Some(TopLevelBlock {
                pos: offset,
                node: child,
                index,
            });
        }
        offset = end;
    }
    None
}

/// A position resolved to its innermost non-leaf parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPos {
    pub pos: usize,
    /// Child indices leading from the document to the parent
    pub path: Vec<usize>,
    /// Absolute position of the parent's content start
    pub parent_start: usize,
    /// Offset into the parent's content
    pub parent_offset: usize,
}

impl ResolvedPos {
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn same_parent(&self, other: &ResolvedPos) -> bool {
        self.path == other.path
    }
}

/// Resolves a content position of `doc`. Positions inside text stay in the
/// text's parent; `None` when the position lies outside the document.
pub fn resolve(doc: &Node, pos: usize) -> Option<ResolvedPos> {
    if pos > doc.content_size() {
        return None;
    }
    let mut node = doc;
    let mut path = Vec::new();
    let mut start = 0;
    let mut rel = pos;

    'descend: loop {
        let mut offset = 0;
        for (index, child) in node.content.iter().enumerate() {
            let end = offset + child.node_size();
            if rel > offset && rel < end && !child.is_leaf() {
                path.push(index);
                start += offset + 1;
                rel -= offset + 1;
                node = child;
                continue 'descend;
            }
            if rel < end {
                break;
            }
            offset = end;
        }
        return Some(ResolvedPos {
            pos,
            path,
            parent_start: start,
            parent_offset: rel,
        });
    }
}

/// Walks `path` down from `root`.
pub(crate) fn node_at_path_mut<'a>(root: &'a mut Node, path: &[usize]) -> &'a mut Node {
    let mut node = root;
    for &index in path {
        node = &mut node.content[index];
    }
    node
}
