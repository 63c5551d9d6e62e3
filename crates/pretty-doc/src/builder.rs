//! The stateful document builder (component C).
//!
//! Unlike the node constructors in [`crate::doc`], which are pure, `Builder`
//! tracks two stacks as it walks a caller's construction code: the open
//! `Group`s (so `break_parent` knows how far outward to propagate) and the
//! current insertion target (so nested `group`/`indent`/`align`/`if_break`
//! calls know where freshly built nodes land). Every scope-opening method
//! restores the previous target/group on every exit path, including a panic
//! unwinding out of the caller's closure — see [`Builder::scoped_target`].

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use crate::doc::{default_width, new_children, Children, Doc};
use crate::error::BuilderError;

/// Constructs a [`Doc`] tree by running a closure against a `Builder`.
pub struct Builder {
    root: Doc,
    groups: Vec<Doc>,
    targets: Vec<Children>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        let root = Doc::new_group(0);
        let children = root.children_rc().expect("a freshly built group has children");
        Builder {
            groups: vec![root.clone()],
            targets: vec![children],
            root,
        }
    }

    /// Runs `body` against a fresh builder and returns the resulting tree's
    /// root group.
    pub fn build(body: impl FnOnce(&mut Builder)) -> Doc {
        let mut builder = Builder::new();
        body(&mut builder);
        builder.root.clone()
    }

    /// The root node of the tree under construction.
    pub fn root(&self) -> &Doc {
        &self.root
    }

    /// The innermost currently open group.
    pub fn current_group(&self) -> &Doc {
        self.groups.last().expect("the root group is never popped")
    }

    /// The sequence new nodes are currently appended to.
    pub fn target(&self) -> Children {
        self.targets.last().cloned().expect("the root target is never popped")
    }

    fn current_target(&self) -> Children {
        self.targets.last().cloned().expect("the root target is never popped")
    }

    fn push_node(&mut self, doc: Doc) {
        self.current_target().borrow_mut().push(doc);
    }

    fn innermost_group_broken(&self) -> bool {
        self.current_group()
            .group_data()
            .expect("groups stack only ever holds Group docs")
            .broken
            .get()
    }

    /// Pushes `target`, runs `body`, then restores the previous target —
    /// even if `body` panics, in which case the panic is resumed only after
    /// the target stack has been restored.
    fn scoped_target(&mut self, target: Children, body: impl FnOnce(&mut Builder)) {
        self.targets.push(target);
        let depth = self.targets.len();
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(self)));
        self.targets.truncate(depth - 1);
        if let Err(payload) = result {
            panic::resume_unwind(payload);
        }
    }

    fn scoped_group(&mut self, group: Doc, body: impl FnOnce(&mut Builder)) {
        self.groups.push(group);
        let depth = self.groups.len();
        let result = panic::catch_unwind(AssertUnwindSafe(|| body(self)));
        self.groups.truncate(depth - 1);
        if let Err(payload) = result {
            panic::resume_unwind(payload);
        }
    }

    // ---- text -------------------------------------------------------

    /// Appends text, coalescing into the previous node if it is also text.
    pub fn text(&mut self, s: impl Into<Cow<'static, str>>) {
        let s = s.into();
        let width = default_width(&s);
        self.text_with_width(s, width);
    }

    /// Appends text with an explicit caller-supplied column width.
    pub fn text_with_width(&mut self, s: impl Into<Cow<'static, str>>, width: usize) {
        let s = s.into();
        Doc::extend_text_or_push(&self.current_target(), s, width);
    }

    /// Wraps an arbitrary displayable value as a zero-width fallback node.
    pub fn raw(&mut self, obj: impl std::fmt::Display + 'static) {
        self.push_node(Doc::raw(obj));
    }

    // ---- breakable ----------------------------------------------------

    /// Appends a `Breakable`; if `force` is set, also invokes `break_parent`.
    pub fn breakable(&mut self, sep: impl Into<Cow<'static, str>>, width: Option<usize>, indent: bool, force: bool) {
        let sep = sep.into();
        let width = width.unwrap_or_else(|| default_width(&sep));
        self.push_node(Doc::new_breakable(sep, width, indent, force));
        if force {
            self.break_parent();
        }
    }

    /// A plain space that can become a newline.
    pub fn breakable_space(&mut self) {
        self.breakable(" ", Some(1), true, false);
    }

    /// A break point with no visible flat-mode separator.
    pub fn breakable_empty(&mut self) {
        self.breakable("", Some(0), true, false);
    }

    /// A breakable that always breaks, still indented like a normal one.
    pub fn breakable_force(&mut self) {
        self.breakable(" ", Some(1), true, true);
    }

    /// A forced breakable whose continuation starts at column zero.
    pub fn breakable_return(&mut self) {
        self.breakable("", Some(0), false, true);
    }

    /// `,` followed by a breakable space — the default `seplist` separator.
    pub fn comma_breakable(&mut self) {
        self.text(",");
        self.breakable_space();
    }

    /// A breakable intended for fill-style lists. The engine does not give
    /// fill lists distinct break semantics (no `Fill` node exists in this
    /// tree), so this is a thin naming alias over [`Builder::breakable_space`]
    /// for callers modelling a packed list.
    pub fn fill_breakable(&mut self) {
        self.breakable_space();
    }

    // ---- forced breaks --------------------------------------------------

    /// Appends a `BreakParent` and marks every open enclosing group broken,
    /// stopping at the first one that was already broken (its ancestors are
    /// therefore guaranteed broken too).
    pub fn break_parent(&mut self) {
        self.push_node(Doc::new_break_parent());
        self.propagate_break_parent();
    }

    fn propagate_break_parent(&mut self) {
        for group in self.groups.iter().rev() {
            let data = group.group_data().expect("groups stack only ever holds Group docs");
            if data.broken.get() {
                break;
            }
            data.broken.set(true);
        }
    }

    /// Appends a `Trim` marker: at render time, trims trailing whitespace
    /// already written to the output buffer.
    pub fn trim(&mut self) {
        self.push_node(Doc::new_trim());
    }

    // ---- groups / indent / align ---------------------------------------

    /// Opens a group, optionally wrapping `body` in `indent` spaces of
    /// alignment, optionally surrounded by literal open/close text.
    pub fn group(&mut self, indent: usize, open: &str, close: &str, body: impl FnOnce(&mut Builder)) {
        self.group_with_widths(indent, open, None, close, None, body)
    }

    /// As [`Builder::group`], but with explicit widths for the open/close
    /// text instead of the default length-based width.
    pub fn group_with_widths(
        &mut self,
        indent: usize,
        open: &str,
        open_width: Option<usize>,
        close: &str,
        close_width: Option<usize>,
        body: impl FnOnce(&mut Builder),
    ) {
        if !open.is_empty() {
            let width = open_width.unwrap_or_else(|| default_width(open));
            self.text_with_width(open.to_string(), width);
        }

        let depth = self.groups.len();
        let group_doc = Doc::new_group(depth);
        self.push_node(group_doc.clone());
        let children = group_doc.children_rc().expect("a freshly built group has children");

        self.scoped_group(group_doc, move |b| {
            b.scoped_target(children, move |b2| {
                if indent != 0 {
                    b2.nest(indent as isize, body);
                } else {
                    body(b2);
                }
            });
        });

        if !close.is_empty() {
            let width = close_width.unwrap_or_else(|| default_width(close));
            self.text_with_width(close.to_string(), width);
        }
    }

    /// Runs `body` with a new `Align(delta)` node as the current target.
    pub fn nest(&mut self, delta: isize, body: impl FnOnce(&mut Builder)) {
        let align = Doc::new_align(delta);
        self.push_node(align.clone());
        let children = align.children_rc().expect("a freshly built align has children");
        self.scoped_target(children, body);
    }

    /// Runs `body` with a new `Indent` node as the current target.
    pub fn indent(&mut self, body: impl FnOnce(&mut Builder)) {
        let node = Doc::new_indent();
        self.push_node(node.clone());
        let children = node.children_rc().expect("a freshly built indent has children");
        self.scoped_target(children, body);
    }

    /// Temporarily swaps the current target for an external, caller-owned
    /// child sequence — e.g. a scratch list used to compute
    /// [`crate::doc::last_position`] before it's spliced into the real tree.
    pub fn with_target(&mut self, target: Children, body: impl FnOnce(&mut Builder)) -> Result<(), BuilderError> {
        if target.try_borrow_mut().is_err() {
            return Err(BuilderError::TargetAlreadyBorrowed);
        }
        self.scoped_target(target, body);
        Ok(())
    }

    // ---- conditional content --------------------------------------------

    /// Begins an `IfBreak` node: `body` is built into its break-side
    /// contents. Chain `.if_flat(...)` on the returned handle to also supply
    /// flat-side contents.
    pub fn if_break<'b>(&'b mut self, body: impl FnOnce(&mut Builder)) -> IfBreakHandle<'b> {
        let break_contents = new_children();
        let flat_contents = new_children();
        let node = Doc::new_if_break(break_contents.clone(), flat_contents.clone());
        self.push_node(node);
        self.scoped_target(break_contents, body);
        IfBreakHandle {
            builder: self,
            flat_contents,
        }
    }

    /// A standalone `if_flat`, for contents that should vanish entirely if
    /// the enclosing group breaks, with no corresponding break-side content.
    ///
    /// If the enclosing group has *already* broken by the time this is
    /// called, `body` is still run — into a throwaway group, so that any
    /// `break_parent` nested inside still propagates outward — but its
    /// output is discarded, since a broken group's `IfBreak` children would
    /// never be printed from the flat side anyway.
    pub fn if_flat(&mut self, body: impl FnOnce(&mut Builder)) {
        if self.innermost_group_broken() {
            self.run_discarding_throwaway(body);
            return;
        }
        let flat_contents = new_children();
        let node = Doc::new_if_break(new_children(), flat_contents.clone());
        self.push_node(node);
        self.scoped_target(flat_contents, body);
    }

    fn run_discarding_throwaway(&mut self, body: impl FnOnce(&mut Builder)) {
        let depth = self.groups.len();
        let throwaway = Doc::new_group(depth);
        let children = throwaway
            .children_rc()
            .expect("a freshly built group has children");
        self.scoped_group(throwaway.clone(), move |b| {
            b.scoped_target(children, body);
        });
        if throwaway
            .group_data()
            .expect("just constructed as a Group")
            .broken
            .get()
        {
            self.propagate_break_parent();
        }
    }

    // ---- line suffixes ---------------------------------------------------

    /// Defers `body`'s content until the next newline (or end of output),
    /// at the default priority.
    pub fn line_suffix(&mut self, body: impl FnOnce(&mut Builder)) {
        self.line_suffix_with_priority(1, body);
    }

    /// As [`Builder::line_suffix`], with an explicit flush priority. Higher
    /// priorities flush first; ties flush in reverse insertion order.
    pub fn line_suffix_with_priority(&mut self, priority: usize, body: impl FnOnce(&mut Builder)) {
        let children = new_children();
        let node = Doc::new_line_suffix(priority, children.clone());
        self.push_node(node);
        self.scoped_target(children, body);
    }

    // ---- list helpers -----------------------------------------------------

    /// Runs `body` for each item, calling `separator` between (not before or
    /// after) them. If `items` is empty, `separator` is never called.
    pub fn seplist<I>(
        &mut self,
        items: I,
        mut separator: impl FnMut(&mut Builder),
        mut body: impl FnMut(&mut Builder, I::Item),
    ) where
        I: IntoIterator,
    {
        let mut first = true;
        for item in items {
            if !first {
                separator(self);
            }
            first = false;
            body(self, item);
        }
    }

    /// [`Builder::seplist`] with [`Builder::comma_breakable`] as the
    /// separator.
    pub fn seplist_comma<I>(&mut self, items: I, body: impl FnMut(&mut Builder, I::Item))
    where
        I: IntoIterator,
    {
        self.seplist(items, |b| b.comma_breakable(), body);
    }

    /// The column offset of the last character of `doc` if it were rendered
    /// flat. See [`crate::doc::last_position`].
    pub fn last_position(&self, doc: &Doc) -> usize {
        crate::doc::last_position(doc)
    }
}

/// Returned by [`Builder::if_break`]; chain `.if_flat` to populate the
/// flat-side contents of the `IfBreak` node.
pub struct IfBreakHandle<'b> {
    builder: &'b mut Builder,
    flat_contents: Children,
}

impl<'b> IfBreakHandle<'b> {
    pub fn if_flat(self, body: impl FnOnce(&mut Builder)) {
        if self.builder.innermost_group_broken() {
            self.builder.run_discarding_throwaway(body);
        } else {
            self.builder.scoped_target(self.flat_contents, body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::DocKind;
    use pretty_assertions::assert_eq;

    fn children_of(doc: &Doc) -> Children {
        doc.children_rc().expect("container node")
    }

    #[test]
    fn plain_text_coalesces_across_calls() {
        let root = Builder::build(|b| {
            b.text("foo");
            b.text("bar");
        });
        let children = children_of(&root);
        let list = children.borrow();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn group_nests_body_under_an_align_when_indented() {
        let root = Builder::build(|b| {
            b.group(2, "(", ")", |b| {
                b.text("x");
            });
        });
        let children = children_of(&root);
        let list = children.borrow();
        // open text, group, close text, all landing in the outer target
        assert_eq!(list.len(), 3);
        assert!(matches!(list[1].kind(), DocKind::Group(_)));
        let group_children = children_of(&list[1]);
        let group_list = group_children.borrow();
        assert_eq!(group_list.len(), 1);
        assert!(matches!(group_list[0].kind(), DocKind::Align(..)));
    }

    #[test]
    fn break_parent_marks_open_groups_broken() {
        let mut builder = Builder::new();
        let mut inner: Option<Doc> = None;
        builder.group(0, "", "", |b| {
            inner = Some(b.current_group().clone());
            b.break_parent();
        });
        let inner = inner.unwrap();
        assert!(inner.group_data().unwrap().broken.get());
        assert!(builder.current_group().group_data().unwrap().broken.get());
    }

    #[test]
    fn break_parent_stops_at_an_already_broken_ancestor() {
        let mut builder = Builder::new();
        let mut outer: Option<Doc> = None;
        let mut inner: Option<Doc> = None;
        builder.group(0, "", "", |b| {
            outer = Some(b.current_group().clone());
            b.break_parent();
            b.group(0, "", "", |b2| {
                inner = Some(b2.current_group().clone());
                b2.break_parent();
            });
        });
        assert!(outer.unwrap().group_data().unwrap().broken.get());
        assert!(inner.unwrap().group_data().unwrap().broken.get());
    }

    #[test]
    fn if_break_populates_both_branches() {
        let root = Builder::build(|b| {
            b.if_break(|b| b.text("{")).if_flat(|b| b.text("("));
        });
        let children = children_of(&root);
        let list = children.borrow();
        assert_eq!(list.len(), 1);
        assert!(matches!(list[0].kind(), DocKind::IfBreak(_)));
    }

    #[test]
    fn seplist_skips_separator_for_empty_input() {
        let root = Builder::build(|b| {
            b.seplist_comma(Vec::<i32>::new(), |b, n| b.text(n.to_string()));
        });
        let children = children_of(&root);
        assert!(children.borrow().is_empty());
    }

    #[test]
    fn seplist_calls_separator_between_items_only() {
        let root = Builder::build(|b| {
            b.seplist_comma(vec![1, 2, 3], |b, n| b.text(n.to_string()));
        });
        let children = children_of(&root);
        // 1 , 2 , 3  -> text coalesces within seplist bodies? Each body call
        // starts with b.text(n) which is fresh each time, but comma_breakable
        // emits text "," then a breakable, so items don't merge with commas.
        let list = children.borrow();
        assert_eq!(list.len(), 5);
    }
}
