//! Deterministic tree layout for visible members.
//!
//! Members are grouped by (referrer, depth). Each group is centred on x = 0
//! and spread by `sibling_spacing`; deeper groups drift left by
//! `depth_indent` per level. Rows are `level_spacing` apart starting at
//! `base_y`. There is no relaxation step: the same input always yields the
//! same coordinates.

use crate::domain::{ContactId, MemberNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default horizontal distance between siblings.
pub const DEFAULT_SIBLING_SPACING: f64 = 180.0;
/// Default vertical distance between depth levels.
pub const DEFAULT_LEVEL_SPACING: f64 = 150.0;
/// Default y coordinate of depth 0.
pub const DEFAULT_BASE_Y: f64 = 50.0;
/// Default leftward shift per depth level.
pub const DEFAULT_DEPTH_INDENT: f64 = 20.0;

/// Spacing constants for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LayoutConfig {
    /// Horizontal distance between siblings
    pub sibling_spacing: f64,
    /// Vertical distance between depth levels
    pub level_spacing: f64,
    /// y coordinate of depth 0
    pub base_y: f64,
    /// Leftward shift per depth level
    pub depth_indent: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: DEFAULT_SIBLING_SPACING,
            level_spacing: DEFAULT_LEVEL_SPACING,
            base_y: DEFAULT_BASE_Y,
            depth_indent: DEFAULT_DEPTH_INDENT,
        }
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// A member with its assigned coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct PositionedNode<'a> {
    /// The member being placed
    #[serde(flatten)]
    pub node: &'a MemberNode,
    /// Where it goes
    pub position: Position,
}

/// Assign coordinates to `nodes`, preserving their order.
pub fn layout<'a>(nodes: &[&'a MemberNode], config: &LayoutConfig) -> Vec<PositionedNode<'a>> {
    let mut group_sizes: HashMap<(Option<&ContactId>, usize), usize> = HashMap::new();
    for node in nodes.iter().copied() {
        *group_sizes
            .entry((node.referrer.as_ref(), node.depth))
            .or_default() += 1;
    }

    let mut next_slot: HashMap<(Option<&ContactId>, usize), usize> = HashMap::new();
    nodes
        .iter()
        .copied()
        .map(|node| {
            let key = (node.referrer.as_ref(), node.depth);
            let count = group_sizes.get(&key).copied().unwrap_or(1);
            let slot = next_slot.entry(key).or_default();
            let index = *slot;
            *slot += 1;

            let depth = node.depth as f64;
            let offset = index as f64 - (count as f64 - 1.0) / 2.0;
            PositionedNode {
                node,
                position: Position {
                    x: offset * config.sibling_spacing - depth * config.depth_indent,
                    y: config.base_y + depth * config.level_spacing,
                },
            }
        })
        .collect()
}
