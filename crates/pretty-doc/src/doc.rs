//! The document node model (component B of the design).
//!
//! A [`Doc`] is a reference-counted handle onto a [`DocKind`]. Containers
//! (`Group`, `Indent`, `Align`, `IfBreak`, `LineSuffix`) hold their children
//! behind a [`Children`] cell so the [`crate::builder::Builder`] can append
//! to a node after it has already been linked into its parent's child list.
//!
//! Debug-printing a [`Doc`] intentionally shows only the node's shape, not a
//! recursive dump of its contents — pretty self-printing of the tree is not
//! part of this crate.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A node's child sequence, shared so a container can be linked into its
/// parent before its own children are known.
pub type Children = Rc<RefCell<Vec<Doc>>>;

pub(crate) fn new_children() -> Children {
    Rc::new(RefCell::new(Vec::new()))
}

/// Returns `true` if every character in `s` is a plain space or tab.
pub(crate) fn is_all_blank(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == ' ' || c == '\t')
}

/// Default column width for a piece of text: byte length for ASCII,
/// character count otherwise. This crate never computes real Unicode
/// display width — widths beyond this default are caller-supplied.
pub(crate) fn default_width(s: &str) -> usize {
    if s.is_ascii() {
        s.len()
    } else {
        s.chars().count()
    }
}

/// A node in the document tree.
///
/// Cheaply cloneable: cloning a `Doc` bumps a reference count rather than
/// copying the subtree, which is what lets [`crate::fits`] take lookahead
/// snapshots of the command stack without deep-copying.
#[derive(Clone)]
pub struct Doc(Rc<DocKind>);

pub(crate) enum DocKind {
    Text(RefCell<TextData>),
    Breakable(BreakableData),
    Group(GroupData),
    Indent(Children),
    Align(isize, Children),
    IfBreak(IfBreakData),
    LineSuffix(LineSuffixData),
    BreakParent,
    Trim,
    /// A bare string or other opaque sink-compatible object, always treated
    /// as zero-width. This is the engine's fallback for unrecognized nodes
    /// (see §7 of the design notes), not a general text-insertion API —
    /// use [`crate::builder::Builder::text`] for that.
    Raw(Rc<dyn fmt::Display>),
}

pub(crate) struct TextData {
    pub parts: Vec<Cow<'static, str>>,
    pub width: usize,
}

impl TextData {
    fn push(&mut self, part: Cow<'static, str>, width: usize) {
        self.parts.push(part);
        self.width += width;
    }
}

pub(crate) struct BreakableData {
    pub sep: Cow<'static, str>,
    pub width: usize,
    pub indent: bool,
    pub force: bool,
}

pub(crate) struct GroupData {
    pub children: Children,
    #[allow(dead_code)] // informational, per spec.md §3
    pub depth: usize,
    pub broken: Cell<bool>,
}

pub(crate) struct IfBreakData {
    pub break_contents: Children,
    pub flat_contents: Children,
}

pub(crate) struct LineSuffixData {
    pub children: Children,
    pub priority: usize,
}

impl Doc {
    pub(crate) fn new_text(part: Cow<'static, str>, width: usize) -> Doc {
        Doc(Rc::new(DocKind::Text(RefCell::new(TextData {
            parts: vec![part],
            width,
        }))))
    }

    pub(crate) fn new_breakable(sep: Cow<'static, str>, width: usize, indent: bool, force: bool) -> Doc {
        Doc(Rc::new(DocKind::Breakable(BreakableData {
            sep,
            width,
            indent,
            force,
        })))
    }

    pub(crate) fn new_group(depth: usize) -> Doc {
        Doc(Rc::new(DocKind::Group(GroupData {
            children: new_children(),
            depth,
            broken: Cell::new(false),
        })))
    }

    pub(crate) fn new_indent() -> Doc {
        Doc(Rc::new(DocKind::Indent(new_children())))
    }

    pub(crate) fn new_align(delta: isize) -> Doc {
        Doc(Rc::new(DocKind::Align(delta, new_children())))
    }

    pub(crate) fn new_align_with(delta: isize, children: Children) -> Doc {
        Doc(Rc::new(DocKind::Align(delta, children)))
    }

    pub(crate) fn new_if_break(break_contents: Children, flat_contents: Children) -> Doc {
        Doc(Rc::new(DocKind::IfBreak(IfBreakData {
            break_contents,
            flat_contents,
        })))
    }

    pub(crate) fn new_line_suffix(priority: usize, children: Children) -> Doc {
        Doc(Rc::new(DocKind::LineSuffix(LineSuffixData { children, priority })))
    }

    pub(crate) fn new_break_parent() -> Doc {
        Doc(Rc::new(DocKind::BreakParent))
    }

    pub(crate) fn new_trim() -> Doc {
        Doc(Rc::new(DocKind::Trim))
    }

    /// Wraps an arbitrary displayable value as a zero-width fallback node.
    ///
    /// This is the escape hatch named in spec §3/§7: a caller embedding an
    /// opaque marker object gets it appended as-is at render time instead of
    /// the engine rejecting or panicking on an unrecognized node.
    pub fn raw(obj: impl fmt::Display + 'static) -> Doc {
        Doc(Rc::new(DocKind::Raw(Rc::new(obj))))
    }

    pub(crate) fn kind(&self) -> &DocKind {
        &self.0
    }

    pub(crate) fn as_text(&self) -> Option<&RefCell<TextData>> {
        match &*self.0 {
            DocKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn group_data(&self) -> Option<&GroupData> {
        match &*self.0 {
            DocKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// The child sequence of any container node, or `None` for leaves.
    pub(crate) fn children_rc(&self) -> Option<Children> {
        match &*self.0 {
            DocKind::Group(g) => Some(g.children.clone()),
            DocKind::Indent(c) => Some(c.clone()),
            DocKind::Align(_, c) => Some(c.clone()),
            DocKind::LineSuffix(ls) => Some(ls.children.clone()),
            _ => None,
        }
    }

    fn append_part(&mut self, part: Cow<'static, str>, width: usize) -> bool {
        match &*self.0 {
            DocKind::Text(data) => {
                data.borrow_mut().push(part, width);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn extend_text_or_push(children: &Children, part: Cow<'static, str>, width: usize) {
        let mut list = children.borrow_mut();
        if let Some(last) = list.last_mut() {
            if last.append_part(part.clone(), width) {
                return;
            }
        }
        list.push(Doc::new_text(part, width));
    }
}

impl fmt::Debug for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &*self.0 {
            DocKind::Text(_) => "Text",
            DocKind::Breakable(_) => "Breakable",
            DocKind::Group(_) => "Group",
            DocKind::Indent(_) => "Indent",
            DocKind::Align(..) => "Align",
            DocKind::IfBreak(_) => "IfBreak",
            DocKind::LineSuffix(_) => "LineSuffix",
            DocKind::BreakParent => "BreakParent",
            DocKind::Trim => "Trim",
            DocKind::Raw(_) => "Raw",
        };
        f.debug_tuple(name).finish()
    }
}

/// Replaces every `Breakable` with a `Text` (its separator, or `replacement`
/// if it was forced) and every `IfBreak` with an `Align(0)` wrapping its flat
/// contents, recursively and in place.
///
/// Used by callers to collapse a sub-tree into an unbreakable form (e.g. a
/// sub-expression embedded where a line break would be illegal).
pub fn remove_breaks(children: &Children, replacement: &str) {
    let mut list = children.borrow_mut();
    for slot in list.iter_mut() {
        match &*slot.0 {
            DocKind::Breakable(b) => {
                let text: Cow<'static, str> = if b.force {
                    Cow::Owned(replacement.to_string())
                } else {
                    b.sep.clone()
                };
                let width = default_width(&text);
                *slot = Doc::new_text(text, width);
            }
            DocKind::IfBreak(ifb) => {
                let flat = ifb.flat_contents.clone();
                *slot = Doc::new_align_with(0, flat.clone());
                remove_breaks(&flat, replacement);
            }
            DocKind::Group(g) => remove_breaks(&g.children, replacement),
            DocKind::Indent(c) => remove_breaks(c, replacement),
            DocKind::Align(_, c) => remove_breaks(c, replacement),
            DocKind::LineSuffix(ls) => remove_breaks(&ls.children, replacement),
            DocKind::Text(_) | DocKind::BreakParent | DocKind::Trim | DocKind::Raw(_) => {}
        }
    }
}

/// Computes the column offset of the last character that would be emitted if
/// `doc` were rendered flat, treating every `Breakable` as resetting the
/// column back to zero. Used by callers doing alignment math before they've
/// committed to a layout.
pub fn last_position(doc: &Doc) -> usize {
    let mut col = 0usize;
    accumulate_last_position(doc, &mut col);
    col
}

fn accumulate_last_position(doc: &Doc, col: &mut usize) {
    match &*doc.0 {
        DocKind::Text(data) => *col += data.borrow().width,
        DocKind::Breakable(_) => *col = 0,
        DocKind::Group(g) => accumulate_children(&g.children, col),
        DocKind::Indent(c) | DocKind::Align(_, c) => accumulate_children(c, col),
        DocKind::IfBreak(ifb) => accumulate_children(&ifb.flat_contents, col),
        DocKind::LineSuffix(_) | DocKind::BreakParent | DocKind::Trim | DocKind::Raw(_) => {}
    }
}

fn accumulate_children(children: &Children, col: &mut usize) {
    for child in children.borrow().iter() {
        accumulate_last_position(child, col);
    }
}
