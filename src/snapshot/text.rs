//! Rendered text of snapshot elements, following `innerText`.

use std::collections::HashMap;

use crate::dom::{NodeId, NodeRef};
use crate::tree::Display;

use super::layout::ElementLayout;

/// Rendered text of `node`: hidden subtrees and invisible text are skipped,
/// whitespace runs collapse to one space and block boundaries become line
/// breaks. Lines are trimmed and empty lines dropped.
pub(crate) fn inner_text(node: &NodeRef, layout: &HashMap<NodeId, ElementLayout>) -> String {
    let Some(own) = layout.get(&node.id) else {
        return String::new();
    };
    if own.style.display == Display::None {
        return String::new();
    }

    let mut raw = String::new();
    collect(node, own.style.visible, layout, &mut raw);

    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect(node: &NodeRef, visible: bool, layout: &HashMap<NodeId, ElementLayout>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if visible {
                out.push_str(&child.text());
            }
            continue;
        }
        let Some(child_layout) = layout.get(&child.id) else {
            continue;
        };
        match child_layout.style.display {
            Display::None => {}
            Display::Block => {
                out.push('\n');
                collect(&child, child_layout.style.visible, layout, out);
                out.push('\n');
            }
            Display::Inline => collect(&child, child_layout.style.visible, layout, out),
        }
    }
}
