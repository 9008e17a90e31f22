//! CSS Cascading and Style Computation
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! cut down to tag and descendant selectors and four inherited properties.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, NodeId, StyleMap};

use crate::parser::{CSSParser, Rule};
use crate::style::{DEFAULT_FONT_SIZE_PX, format_px, parse_px};

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// The inherited properties and their initial values at the root.
pub const INHERITED_PROPERTIES: [(&str, &str); 4] = [
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
///
/// The key rules are ordered by. Equal keys keep source order.
#[must_use]
pub fn cascade_priority(rule: &Rule) -> u32 {
    rule.priority()
}

/// Sort rules by ascending cascade priority. The sort is stable: rules with
/// equal priority keep their source order, so the later one wins.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(cascade_priority);
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// "The cascade takes an unordered list of declared values for a given
/// property on a given element, sorts them by their declaration's
/// precedence..."
///
/// Compute and store the style of every node reachable from the root.
/// Parents are computed before their children, so a child always sees its
/// parent's final values. Styles from an earlier run are dropped first, so
/// nodes no longer reachable from the root end up unstyled.
pub fn apply_styles(tree: &mut DomTree, rules: &[Rule]) {
    tree.clear_styles();

    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| cascade_priority(rule));

    let nodes: Vec<NodeId> = tree.descendants(tree.root()).collect();
    for id in nodes {
        let style = compute_style(tree, id, &ordered);
        tree.set_style(id, style);
    }
}

/// Style for one node whose parent (if any) is already styled.
fn compute_style(tree: &DomTree, id: NodeId, rules: &[&Rule]) -> StyleMap {
    let parent_style = tree.parent(id).and_then(|parent| tree.style(parent));

    // STEP 1: Inherit, or take the initial value at the root.
    let mut style: StyleMap = INHERITED_PROPERTIES
        .iter()
        .map(|&(property, initial)| {
            let value = parent_style
                .and_then(|s| s.get(property))
                .map_or(initial, String::as_str);
            (property.to_string(), value.to_string())
        })
        .collect();

    // STEP 2: Matching rules, lowest priority first.
    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        for (property, value) in &rule.declarations {
            let _ = style.insert(property.clone(), value.clone());
        }
    }

    // STEP 3: The style attribute beats every rule.
    if let Some(inline) = tree.as_element(id).and_then(|e| e.attr("style")) {
        for (property, value) in CSSParser::new(inline).parse_declarations() {
            let _ = style.insert(property, value);
        }
    }

    // STEP 4: Absolute font size against the parent's.
    let parent_px = parent_style
        .and_then(|s| s.get("font-size"))
        .and_then(|v| parse_px(v))
        .unwrap_or(DEFAULT_FONT_SIZE_PX);
    let declared = style
        .get("font-size")
        .map_or_else(|| format_px(parent_px), Clone::clone);
    let px = resolve_font_size(&declared, parent_px).unwrap_or_else(|| {
        warn_once(
            "CSS",
            &format!("unsupported font-size '{declared}', using the inherited size"),
        );
        parent_px
    });
    let _ = style.insert("font-size".to_string(), format_px(px));

    style
}

/// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Percentages: refer to parent element's font size"
///
/// Resolve a declared `font-size` to pixels. `em` counts as a multiple of
/// the parent's size, like a percentage over 100. Returns `None` for
/// anything else than `px`, `%`, `em` and `inherit`.
#[must_use]
pub fn resolve_font_size(value: &str, parent_px: f32) -> Option<f32> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("inherit") {
        return Some(parent_px);
    }
    if let Some(px) = parse_px(value) {
        return Some(px);
    }
    let (number, divisor) = if let Some(pct) = value.strip_suffix('%') {
        (pct, 100.0)
    } else if let Some(em) = value.strip_suffix("em") {
        (em, 1.0)
    } else {
        return None;
    };
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n * parent_px / divisor)
}
