//! The layout engine (component E) and single-line mode (component F),
//! plus the two public entry points, `format` and `singleline_format`.

use std::borrow::Cow;

use crate::buffer::Sink;
use crate::builder::Builder;
use crate::doc::{Children, Doc, DocKind};
use crate::fits::{fits, push_rev};

/// The fixed indent step applied by a plain `Indent` node. `Align` nodes
/// carry their own caller-chosen delta instead; this constant is the
/// port's equivalent of the original's default nest width.
pub(crate) const INDENT_STEP: isize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Flat,
    Break,
}

#[derive(Clone)]
pub(crate) struct Command {
    pub indent: isize,
    pub mode: Mode,
    pub doc: Doc,
}

fn default_genspace(n: isize) -> String {
    " ".repeat(n.max(0) as usize)
}

/// Rendering parameters. `genspace` is a plain function pointer rather than
/// a boxed closure: the default (and any caller override) is expected to be
/// stateless, which is also what lets it be shared across threads per the
/// concurrency notes.
#[derive(Clone)]
pub struct PrintConfig {
    pub max_width: usize,
    pub newline: Cow<'static, str>,
    pub genspace: fn(isize) -> String,
    pub base_indent: isize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            max_width: 80,
            newline: Cow::Borrowed("\n"),
            genspace: default_genspace,
            base_indent: 0,
        }
    }
}

struct LineSuffixEntry {
    priority: usize,
    seq: usize,
    indent: isize,
    mode: Mode,
    children: Children,
}

/// Sorts pending line suffixes into push order (ascending priority, then
/// ascending insertion order) so that after pushing each one's children in
/// turn, the stack's top ends up holding the highest-priority, most
/// recently inserted entry first — i.e. it pops in the order the design
/// calls for: priority descending, ties broken by reverse insertion order.
fn flush_line_suffixes(stack: &mut Vec<Command>, suffixes: &mut Vec<LineSuffixEntry>) {
    suffixes.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.seq.cmp(&b.seq)));
    for entry in suffixes.drain(..) {
        push_rev(stack, &entry.children, entry.indent, entry.mode);
    }
}

/// Renders `root` into `output` under `config`.
pub fn render<S: Sink + Default>(root: &Doc, config: &PrintConfig, output: &mut S) {
    let mut position = config.base_indent;
    if config.base_indent > 0 {
        output.append(&(config.genspace)(config.base_indent));
    }

    let mut stack = vec![Command {
        indent: config.base_indent,
        mode: Mode::Break,
        doc: root.clone(),
    }];
    let mut should_remeasure = false;
    let mut suffixes: Vec<LineSuffixEntry> = Vec::new();
    let mut next_seq: usize = 0;

    while let Some(cmd) = stack.pop() {
        match cmd.doc.kind() {
            DocKind::Text(data) => {
                let data = data.borrow();
                for part in &data.parts {
                    output.append(part);
                }
                position += data.width as isize;
            }
            DocKind::Raw(obj) => {
                // Per the data model's Raw/unknown-node fallback: emitted
                // as-is but always treated as zero width.
                output.append(&obj.to_string());
            }
            DocKind::BreakParent => {}
            DocKind::Trim => {
                position -= output.trim_trailing() as isize;
            }
            DocKind::LineSuffix(ls) => {
                suffixes.push(LineSuffixEntry {
                    priority: ls.priority,
                    seq: next_seq,
                    indent: cmd.indent,
                    mode: cmd.mode,
                    children: ls.children.clone(),
                });
                next_seq += 1;
            }
            DocKind::Indent(children) => {
                push_rev(&mut stack, children, cmd.indent + INDENT_STEP, cmd.mode);
            }
            DocKind::Align(delta, children) => {
                push_rev(&mut stack, children, cmd.indent + delta, cmd.mode);
            }
            DocKind::IfBreak(ifb) => {
                let branch = if cmd.mode == Mode::Break {
                    &ifb.break_contents
                } else {
                    &ifb.flat_contents
                };
                push_rev(&mut stack, branch, cmd.indent, cmd.mode);
            }
            DocKind::Group(g) => {
                if cmd.mode == Mode::Flat && !should_remeasure {
                    let mode = if g.broken.get() { Mode::Break } else { Mode::Flat };
                    push_rev(&mut stack, &g.children, cmd.indent, mode);
                } else {
                    should_remeasure = false;
                    if g.broken.get() {
                        push_rev(&mut stack, &g.children, cmd.indent, Mode::Break);
                    } else {
                        let seed: Vec<Command> = g
                            .children
                            .borrow()
                            .iter()
                            .rev()
                            .map(|c| Command {
                                indent: cmd.indent,
                                mode: Mode::Flat,
                                doc: c.clone(),
                            })
                            .collect();
                        let remaining = config.max_width as isize - position;
                        if fits::<S>(&seed, &stack, remaining) {
                            push_rev(&mut stack, &g.children, cmd.indent, Mode::Flat);
                        } else {
                            g.broken.set(true);
                            push_rev(&mut stack, &g.children, cmd.indent, Mode::Break);
                        }
                    }
                }
            }
            DocKind::Breakable(b) => {
                let flat_pass = cmd.mode == Mode::Flat && !b.force;
                if flat_pass {
                    output.append(&b.sep);
                    position += b.width as isize;
                } else {
                    if cmd.mode == Mode::Flat {
                        should_remeasure = true;
                    }
                    if !suffixes.is_empty() {
                        stack.push(cmd.clone());
                        flush_line_suffixes(&mut stack, &mut suffixes);
                        continue;
                    }
                    if b.indent {
                        position -= output.trim_trailing() as isize;
                        output.append(&config.newline);
                        output.append(&(config.genspace)(cmd.indent));
                        position = cmd.indent;
                    } else {
                        output.append(&config.newline);
                        position = 0;
                    }
                }
            }
        }

        if stack.is_empty() && !suffixes.is_empty() {
            flush_line_suffixes(&mut stack, &mut suffixes);
        }
    }
}

/// Builds a tree from `body` and renders it into `output`.
pub fn format<S: Sink + Default>(output: &mut S, config: &PrintConfig, body: impl FnOnce(&mut Builder)) {
    let root = Builder::build(body);
    render(&root, config, output);
}

/// As [`format`], but returns a freshly created `String`.
pub fn format_string(config: &PrintConfig, body: impl FnOnce(&mut Builder)) -> String {
    let mut output = String::new();
    format(&mut output, config, body);
    output
}

// ---- single-line mode (F) --------------------------------------------------

/// Builds a tree from `body` and renders it with every break decision
/// collapsed: groups and indentation vanish, forced breaks are ignored, and
/// `if_break` branches are discarded in favor of `if_flat`'s. Line-suffix
/// content is appended, in encounter order, once the rest of the output has
/// been written.
pub fn singleline_format<S: Sink>(output: &mut S, body: impl FnOnce(&mut Builder)) {
    let root = Builder::build(body);
    render_singleline(&root, output);
}

/// As [`singleline_format`], but returns a freshly created `String`.
pub fn singleline_format_string(body: impl FnOnce(&mut Builder)) -> String {
    let mut output = String::new();
    singleline_format(&mut output, body);
    output
}

fn render_singleline<S: Sink>(root: &Doc, output: &mut S) {
    let mut suffixes = String::new();
    walk_singleline(root, output, &mut suffixes);
    output.append(&suffixes);
}

fn walk_singleline(doc: &Doc, out: &mut dyn Sink, suffixes: &mut String) {
    match doc.kind() {
        DocKind::Text(data) => {
            for part in &data.borrow().parts {
                out.append(part);
            }
        }
        DocKind::Breakable(b) => out.append(&b.sep),
        DocKind::Group(g) => walk_children_singleline(&g.children, out, suffixes),
        DocKind::Indent(c) => walk_children_singleline(c, out, suffixes),
        DocKind::Align(_, c) => walk_children_singleline(c, out, suffixes),
        DocKind::IfBreak(ifb) => walk_children_singleline(&ifb.flat_contents, out, suffixes),
        DocKind::LineSuffix(ls) => {
            for child in ls.children.borrow().iter() {
                let mut nested = String::new();
                walk_singleline(child, &mut nested, &mut String::new());
                suffixes.push_str(&nested);
            }
        }
        DocKind::BreakParent => {}
        DocKind::Trim => {
            out.trim_trailing();
        }
        DocKind::Raw(obj) => out.append(&obj.to_string()),
    }
}

fn walk_children_singleline(children: &Children, out: &mut dyn Sink, suffixes: &mut String) {
    for child in children.borrow().iter() {
        walk_singleline(child, out, suffixes);
    }
}
