//! Static layout pass for snapshots.
//!
//! The capturing harness serializes what it measured into inline styles
//! (`left`, `top`, `width`, `height`, `display`, `font-size`, ...). Anything it
//! left out is filled in with a minimal flow model: inline content runs on a
//! line, blocks stack, text gets an estimated line box. Elements with an
//! explicit `left` or `top` are positioned in document coordinates and take
//! no space in their parent's flow.

use std::collections::HashMap;

use crate::dom::{self, Document, NodeId, NodeRef};
use crate::tree::{ComputedStyle, Display, Rect};

const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f64 = 0.5;
const LINE_HEIGHT: f64 = 1.25;

/// Layout facts for one element.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ElementLayout {
    pub rect: Rect,
    pub style: ComputedStyle,
}

/// Dimensions given by the snapshot itself.
#[derive(Debug, Clone, Copy, Default)]
struct Explicit {
    left: Option<f64>,
    top: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

impl Explicit {
    fn is_positioned(&self) -> bool {
        self.left.is_some() || self.top.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum FlowItem {
    Element(usize),
    Text { width: f64, height: f64 },
}

#[derive(Debug)]
struct Frame {
    id: NodeId,
    style: ComputedStyle,
    explicit: Explicit,
    flow: Vec<FlowItem>,
}

impl Frame {
    fn hidden(&self) -> bool {
        self.style.display == Display::None
    }
}

/// Lay out every element of the document.
pub(crate) fn compute(doc: &Document) -> HashMap<NodeId, ElementLayout> {
    let frames = collect_frames(doc);
    let sizes = measure(&frames);
    let positions = place(&frames, &sizes);

    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let rect = if frame.hidden() {
                Rect::default()
            } else {
                let (x, y) = positions[i];
                let (width, height) = sizes[i];
                Rect::new(x, y, width, height)
            };
            (frame.id, ElementLayout { rect, style: frame.style })
        })
        .collect()
}

/// Preorder walk computing styles and recording each element's flow content.
fn collect_frames(doc: &Document) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    let Some(html) = doc.select("html").nodes().first().cloned() else {
        return frames;
    };

    let mut stack: Vec<(NodeRef, Option<usize>)> = vec![(html, None)];
    while let Some((node, parent)) = stack.pop() {
        if node.is_text() {
            let Some(p) = parent else { continue };
            let parent_frame = &frames[p];
            if parent_frame.hidden() {
                continue;
            }
            let chars = node.text().split_whitespace().map(|w| w.chars().count() + 1).sum::<usize>();
            if chars == 0 {
                continue;
            }
            let font_size = parent_frame.style.font_size;
            let item = FlowItem::Text {
                width: (chars - 1) as f64 * font_size * GLYPH_WIDTH,
                height: font_size * LINE_HEIGHT,
            };
            frames[p].flow.push(item);
            continue;
        }
        if !node.is_element() {
            continue;
        }

        let parent_style = parent.map_or_else(root_style, |p| frames[p].style);
        let tag = dom::tag_name(&node).unwrap_or_default();
        let declarations = node
            .attr("style")
            .map(|s| dom::style_declarations(&s))
            .unwrap_or_default();
        let (style, explicit) = resolve(&node, &tag, &declarations, &parent_style);

        let index = frames.len();
        if let Some(p) = parent {
            frames[p].flow.push(FlowItem::Element(index));
        }
        frames.push(Frame {
            id: node.id,
            style,
            explicit,
            flow: Vec::new(),
        });

        for child in node.children().into_iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    frames
}

fn root_style() -> ComputedStyle {
    ComputedStyle {
        display: Display::Block,
        font_size: DEFAULT_FONT_SIZE,
        ..ComputedStyle::default()
    }
}

/// Computed style and explicit geometry of one element.
fn resolve(
    node: &NodeRef,
    tag: &str,
    declarations: &[(String, String)],
    parent: &ComputedStyle,
) -> (ComputedStyle, Explicit) {
    let font_size = declaration(declarations, "font-size")
        .and_then(|v| parse_length(v, parent.font_size))
        .unwrap_or(parent.font_size);

    let hidden = parent.display == Display::None
        || dom::is_non_rendered_tag(tag)
        || node.has_attr("hidden")
        || declaration(declarations, "display").is_some_and(|v| v.eq_ignore_ascii_case("none"));

    let display = if hidden {
        Display::None
    } else {
        match declaration(declarations, "display").map(str::to_ascii_lowercase) {
            Some(v) if v.starts_with("inline") => Display::Inline,
            Some(v) if !v.is_empty() && v != "contents" => Display::Block,
            _ if tag == "br" || dom::is_block_tag(tag) => Display::Block,
            _ => Display::Inline,
        }
    };

    let visible = match declaration(declarations, "visibility").map(str::to_ascii_lowercase) {
        Some(v) if v == "hidden" || v == "collapse" => false,
        Some(v) if v == "visible" => true,
        _ => parent.visible,
    };

    let line_through = dom::is_strike_tag(tag)
        || ["text-decoration", "text-decoration-line"]
            .iter()
            .filter_map(|prop| declaration(declarations, prop))
            .any(|v| v.to_ascii_lowercase().contains("line-through"));

    let length = |prop: &str| declaration(declarations, prop).and_then(|v| parse_length(v, font_size));
    let attribute = |name: &str| node.attr(name).and_then(|v| parse_length(&v, font_size));

    let mut explicit = Explicit {
        left: length("left"),
        top: length("top"),
        width: length("width").or_else(|| attribute("width")),
        height: length("height").or_else(|| attribute("height")),
    };
    // Images without intrinsic size data are assumed square.
    if tag == "img" {
        explicit.width = explicit.width.or(explicit.height);
        explicit.height = explicit.height.or(explicit.width);
    }

    let style = ComputedStyle {
        display,
        visible,
        line_through,
        font_size,
    };
    (style, explicit)
}

/// Last declaration of a property wins.
fn declaration<'a>(declarations: &'a [(String, String)], prop: &str) -> Option<&'a str> {
    declarations
        .iter()
        .rev()
        .find(|(name, _)| name == prop)
        .map(|(_, value)| value.trim_end_matches("!important").trim())
}

/// Absolute length in px. Percentages and keywords are not resolved.
fn parse_length(value: &str, font_size: f64) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, DEFAULT_FONT_SIZE)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, font_size)
    } else {
        (value.as_str(), 1.0)
    };
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n * scale)
}

/// Bottom-up content sizes. Children always follow their parent in preorder.
fn measure(frames: &[Frame]) -> Vec<(f64, f64)> {
    let mut sizes = vec![(0.0, 0.0); frames.len()];
    for i in (0..frames.len()).rev() {
        let frame = &frames[i];
        if frame.hidden() {
            continue;
        }

        let mut content = (0.0_f64, 0.0_f64);
        let mut line = (0.0_f64, 0.0_f64);
        for item in &frame.flow {
            let (width, height, block) = match *item {
                FlowItem::Element(c) => {
                    let child = &frames[c];
                    if child.hidden() || child.explicit.is_positioned() {
                        continue;
                    }
                    (sizes[c].0, sizes[c].1, child.style.display == Display::Block)
                }
                FlowItem::Text { width, height } => (width, height, false),
            };
            if block {
                content = (content.0.max(line.0), content.1 + line.1);
                line = (0.0, 0.0);
                content = (content.0.max(width), content.1 + height);
            } else {
                line = (line.0 + width, line.1.max(height));
            }
        }
        content = (content.0.max(line.0), content.1 + line.1);

        sizes[i] = (
            frame.explicit.width.unwrap_or(content.0),
            frame.explicit.height.unwrap_or(content.1),
        );
    }
    sizes
}

/// Top-down placement of each element's flow children.
fn place(frames: &[Frame], sizes: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut positions = vec![(0.0, 0.0); frames.len()];
    if let Some(root) = frames.first() {
        positions[0] = (root.explicit.left.unwrap_or(0.0), root.explicit.top.unwrap_or(0.0));
    }

    for (i, frame) in frames.iter().enumerate() {
        if frame.hidden() {
            continue;
        }
        let (x, y) = positions[i];
        let mut cursor_y = y;
        let mut line_x = x;
        let mut line_height = 0.0_f64;
        let mut line_open = false;

        for item in &frame.flow {
            match *item {
                FlowItem::Element(c) => {
                    let child = &frames[c];
                    if child.hidden() {
                        continue;
                    }
                    if child.explicit.is_positioned() {
                        positions[c] = (child.explicit.left.unwrap_or(x), child.explicit.top.unwrap_or(y));
                        continue;
                    }
                    let (width, height) = sizes[c];
                    if child.style.display == Display::Block {
                        if line_open {
                            cursor_y += line_height;
                            line_x = x;
                            line_height = 0.0;
                            line_open = false;
                        }
                        positions[c] = (x, cursor_y);
                        cursor_y += height;
                    } else {
                        positions[c] = (line_x, cursor_y);
                        line_x += width;
                        line_height = line_height.max(height);
                        line_open = true;
                    }
                }
                FlowItem::Text { width, height } => {
                    line_x += width;
                    line_height = line_height.max(height);
                    line_open = true;
                }
            }
        }
    }
    positions
}
