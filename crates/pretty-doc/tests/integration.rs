//! End-to-end coverage of the builder/printer pair, beyond what's already
//! exercised inline in the unit test modules.

use pretty_doc::{format_string, singleline_format_string, Builder, ChunkBuffer, PrintConfig};
use pretty_assertions::assert_eq;

fn narrow(width: usize) -> PrintConfig {
    PrintConfig {
        max_width: width,
        ..PrintConfig::default()
    }
}

#[test]
fn forced_break_propagates_through_every_open_ancestor() {
    // A break_parent two groups deep must force the outer group open too,
    // even though the whole tree would otherwise fit flat at this width.
    let out = format_string(&PrintConfig::default(), |b| {
        b.group(2, "(", ")", |b| {
            b.breakable_empty();
            b.text("a");
            b.group(2, "[", "]", |b| {
                b.breakable_empty();
                b.text("x");
                b.break_parent();
            });
            b.breakable_empty();
        });
    });
    assert_eq!(out, "(\n  a[\n    x]\n  )");
}

#[test]
fn unforced_nested_groups_each_fit_independently() {
    let out = format_string(&narrow(6), |b| {
        b.group(0, "", "", |b| {
            b.text("aa");
            b.breakable_space();
            b.group(0, "", "", |b| {
                b.text("bb");
                b.breakable_space();
                b.text("cc");
            });
        });
    });
    // The outer group doesn't fit on one line at width 6 ("aa bb cc" is
    // 8 columns), so it breaks; the inner group, measured from column 0
    // on its own line, does fit ("bb cc" is 5 columns).
    assert_eq!(out, "aa\nbb cc");
}

#[test]
fn indent_and_align_compose_at_different_depths() {
    let out = format_string(&PrintConfig::default(), |b| {
        b.text("a");
        b.indent(|b| {
            b.breakable_force();
            b.text("b");
            b.nest(5, |b| {
                b.breakable_force();
                b.text("c");
            });
        });
    });
    // indent contributes +2, the nested align adds +5 on top of that.
    assert_eq!(out, "a\n  b\n       c");
}

#[test]
fn align_accepts_a_negative_delta() {
    let out = format_string(&PrintConfig::default(), |b| {
        b.indent(|b| {
            b.breakable_force();
            b.nest(-1, |b| {
                b.breakable_force();
                b.text("x");
            });
        });
    });
    assert_eq!(out, "\n\n x");
}

#[test]
fn line_suffixes_flush_in_priority_then_reverse_insertion_order() {
    let out = format_string(&PrintConfig::default(), |b| {
        b.line_suffix(|b| b.text("low-a"));
        b.line_suffix(|b| b.text("low-b"));
        b.line_suffix_with_priority(5, |b| b.text("high"));
        b.text("x");
        b.breakable_force();
    });
    // priority 5 first, then the two priority-1 suffixes in reverse
    // insertion order (low-b before low-a).
    assert_eq!(out, "xhighlow-blow-a\n");
}

#[test]
fn line_suffix_at_end_of_output_still_flushes() {
    let out = format_string(&PrintConfig::default(), |b| {
        b.text("x");
        b.line_suffix(|b| b.text(" // trailing"));
    });
    assert_eq!(out, "x // trailing");
}

#[test]
fn trim_on_a_chunk_buffer_matches_trim_on_a_string() {
    let string_out = format_string(&PrintConfig::default(), |b| {
        b.indent(|b| {
            b.breakable_force();
            b.text("a");
            b.breakable_space();
            b.trim();
            b.breakable_force();
            b.text("b");
        });
    });

    let mut chunked = ChunkBuffer::new();
    pretty_doc::format(&mut chunked, &PrintConfig::default(), |b| {
        b.indent(|b| {
            b.breakable_force();
            b.text("a");
            b.breakable_space();
            b.trim();
            b.breakable_force();
            b.text("b");
        });
    });

    assert_eq!(string_out, chunked.into_string());
}

#[test]
fn if_break_inside_an_already_broken_outer_group_uses_the_break_side() {
    let out = format_string(&PrintConfig::default(), |b| {
        b.group(0, "", "", |b| {
            b.break_parent();
            b.if_break(|b| b.text("broken")).if_flat(|b| b.text("flat"));
        });
    });
    assert_eq!(out, "broken");
}

#[test]
fn remove_breaks_collapses_a_subtree_to_one_line() {
    let mut builder = Builder::new();
    let mut group_children = None;
    builder.group(0, "", "", |b| {
        group_children = Some(b.target());
        b.text("a");
        b.breakable_space();
        b.text("b");
        b.breakable_force();
        b.text("c");
    });
    let group_children = group_children.unwrap();
    pretty_doc::remove_breaks(&group_children, " ");

    // remove_breaks rewrote every Breakable (forced or not) into plain
    // text in place, so the forced break no longer survives rendering.
    let mut out = String::new();
    pretty_doc::render(builder.root(), &PrintConfig::default(), &mut out);
    assert_eq!(out, "a b c");
}

#[test]
fn last_position_resets_at_each_breakable_and_ignores_break_side_ifbreak() {
    let root = Builder::build(|b| {
        b.text("abc");
        b.breakable_space();
        b.text("de");
        b.if_break(|b| b.text("XXXXXXXXXX")).if_flat(|b| b.text("f"));
    });
    assert_eq!(pretty_doc::last_position(&root), 3);
}

#[test]
fn singleline_format_discards_break_side_ifbreak_content() {
    let out = singleline_format_string(|b| {
        b.if_break(|b| b.text("break-side")).if_flat(|b| b.text("flat-side"));
    });
    assert_eq!(out, "flat-side");
}

#[test]
fn with_target_rejects_a_target_already_borrowed_by_an_outer_call() {
    let children = Builder::new().target();
    let _outer_borrow = children.borrow();
    let mut builder = Builder::new();
    let err = builder.with_target(children.clone(), |_| {}).unwrap_err();
    assert!(matches!(err, pretty_doc::BuilderError::TargetAlreadyBorrowed));
}
