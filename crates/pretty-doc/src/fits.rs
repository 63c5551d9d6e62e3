//! The fits predicate (component D): bounded lookahead used by the layout
//! engine to decide whether a group can be rendered flat.

use crate::buffer::Sink;
use crate::doc::{Children, DocKind};
use crate::printer::{Command, Mode, INDENT_STEP};

/// Hard cap on lookahead steps, so a pathological tree can't turn a single
/// group's fits-check into an unbounded (or quadratic-across-many-groups)
/// scan. Exceeding it is treated as "does not fit".
const FITS_STEP_LIMIT: usize = 32_768;

/// `seed` is the reverse-DFS command list produced by a Group's provisional
/// flat expansion; `rest` is the engine's own not-yet-consumed command
/// stack, read but never mutated, so lookahead can see past the group being
/// measured into whatever follows it on the line.
pub(crate) fn fits<S: Sink + Default>(seed: &[Command], rest: &[Command], mut remaining: isize) -> bool {
    let mut local: Vec<Command> = seed.to_vec();
    let mut rest_idx = rest.len();
    let mut scratch = S::default();
    let mut steps: usize = 0;

    loop {
        if remaining < 0 {
            return false;
        }

        let cmd = match local.pop() {
            Some(c) => c,
            None => {
                if rest_idx == 0 {
                    return true;
                }
                rest_idx -= 1;
                rest[rest_idx].clone()
            }
        };

        steps += 1;
        if steps > FITS_STEP_LIMIT {
            tracing::trace!(limit = FITS_STEP_LIMIT, "fits() lookahead exceeded step limit; assuming no fit");
            return false;
        }

        match cmd.doc.kind() {
            DocKind::Text(data) => {
                let data = data.borrow();
                remaining -= data.width as isize;
                for part in &data.parts {
                    scratch.append(part);
                }
            }
            DocKind::Breakable(b) => {
                if cmd.mode == Mode::Break || b.force {
                    return true;
                }
                remaining -= b.width as isize;
                scratch.append(&b.sep);
            }
            DocKind::Group(g) => {
                let mode = if g.broken.get() { Mode::Break } else { cmd.mode };
                push_rev(&mut local, &g.children, cmd.indent, mode);
            }
            DocKind::Indent(children) => {
                push_rev(&mut local, children, cmd.indent + INDENT_STEP, cmd.mode);
            }
            DocKind::Align(delta, children) => {
                push_rev(&mut local, children, cmd.indent + delta, cmd.mode);
            }
            DocKind::IfBreak(ifb) => {
                let branch = if cmd.mode == Mode::Break {
                    &ifb.break_contents
                } else {
                    &ifb.flat_contents
                };
                push_rev(&mut local, branch, cmd.indent, cmd.mode);
            }
            DocKind::LineSuffix(_) | DocKind::BreakParent => {}
            DocKind::Trim => {
                remaining += scratch.trim_trailing() as isize;
            }
            DocKind::Raw(obj) => {
                scratch.append(&obj.to_string());
            }
        }
    }
}

pub(crate) fn push_rev(stack: &mut Vec<Command>, children: &Children, indent: isize, mode: Mode) {
    for child in children.borrow().iter().rev() {
        stack.push(Command {
            indent,
            mode,
            doc: child.clone(),
        });
    }
}
