//! User-controlled visibility of the genealogy network.
//!
//! [`ViewState`] is owned by whoever renders the network and only changes
//! through its transition methods. Filtering never mutates the genealogy.

use super::Genealogy;
use crate::domain::{ContactId, MemberNode};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Levels shown when no explicit selection has been made.
pub const DEFAULT_LEVELS: [usize; 5] = [0, 1, 2, 3, 4];

/// A referrer -> referral link between two visible members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferralEdge {
    /// The member who made the referral.
    pub from: ContactId,
    /// The member who was referred.
    pub to: ContactId,
}

/// Level selection, expansion and focus for one view of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    visible_levels: BTreeSet<usize>,
    expanded: HashSet<ContactId>,
    focused_level: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_levels(DEFAULT_LEVELS)
    }
}

impl ViewState {
    /// View with the default levels, nothing expanded and no focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// View showing exactly `levels`.
    pub fn with_levels(levels: impl IntoIterator<Item = usize>) -> Self {
        Self {
            visible_levels: levels.into_iter().collect(),
            expanded: HashSet::new(),
            focused_level: None,
        }
    }

    /// Currently selected depth levels.
    pub fn visible_levels(&self) -> &BTreeSet<usize> {
        &self.visible_levels
    }

    /// IDs of expanded members.
    pub fn expanded(&self) -> &HashSet<ContactId> {
        &self.expanded
    }

    /// The focused level, if any.
    pub fn focused_level(&self) -> Option<usize> {
        self.focused_level
    }

    /// True if `id` is currently expanded.
    pub fn is_expanded(&self, id: &ContactId) -> bool {
        self.expanded.contains(id)
    }

    /// Flip the expansion of `id`.
    ///
    /// Only members with at least one referral can be expanded; for leaves
    /// and unknown IDs this is a no-op. Returns whether the state changed.
    pub fn toggle_expansion(&mut self, genealogy: &Genealogy, id: &ContactId) -> bool {
        let Some(node) = genealogy.get(id) else {
            return false;
        };
        if !node.has_referrals() {
            tracing::debug!(member = %id, "Ignoring expansion toggle on a leaf");
            return false;
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(id.clone());
        }
        true
    }

    /// Expand every member that has referrals.
    pub fn expand_all(&mut self, genealogy: &Genealogy) {
        self.expanded = genealogy
            .nodes()
            .iter()
            .filter(|node| node.has_referrals())
            .map(|node| node.id.clone())
            .collect();
    }

    /// Collapse every member.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Add `level` to the selection, or remove it if already selected.
    ///
    /// Returns whether the level is selected afterwards.
    pub fn toggle_level(&mut self, level: usize) -> bool {
        if self.visible_levels.remove(&level) {
            false
        } else {
            self.visible_levels.insert(level);
            true
        }
    }

    /// Show only `level` (`Some`) or return to the level selection (`None`).
    pub fn focus_level(&mut self, level: Option<usize>) {
        self.focused_level = level;
    }

    /// Back to default levels, nothing expanded, no focus.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `node` is shown under this view.
    ///
    /// A focused level overrides everything else. Otherwise the node's depth
    /// must be selected and the node must be a root, expanded itself, or the
    /// referral of an expanded member.
    pub fn is_visible(&self, node: &MemberNode) -> bool {
        if let Some(level) = self.focused_level {
            return node.depth == level;
        }

        self.visible_levels.contains(&node.depth)
            && (node.depth == 0
                || self.expanded.contains(&node.id)
                || node
                    .referrer
                    .as_ref()
                    .is_some_and(|referrer| self.expanded.contains(referrer)))
    }

    /// Visible members in source order.
    pub fn visible_nodes<'a>(&self, genealogy: &'a Genealogy) -> Vec<&'a MemberNode> {
        genealogy
            .nodes()
            .iter()
            .filter(|node| self.is_visible(node))
            .collect()
    }

    /// Referral edges whose endpoints are both visible.
    pub fn visible_edges(&self, genealogy: &Genealogy) -> Vec<ReferralEdge> {
        let visible: HashSet<&ContactId> = self
            .visible_nodes(genealogy)
            .into_iter()
            .map(|node| &node.id)
            .collect();

        genealogy
            .nodes()
            .iter()
            .filter_map(|node| {
                let referrer = node.referrer.as_ref()?;
                (visible.contains(referrer) && visible.contains(&node.id)).then(|| ReferralEdge {
                    from: referrer.clone(),
                    to: node.id.clone(),
                })
            })
            .collect()
    }
}
