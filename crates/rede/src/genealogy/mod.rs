//! The member genealogy network.
//!
//! Built in one synchronous pass from the current contact and cell lists:
//!
//! ```text
//! projection -> derivation -> partition -> visibility filter -> layout
//! ```
//!
//! [`Genealogy::build`] runs the first two stages and keeps the result;
//! partition, filtering and layout are cheap views over it. Whenever the
//! source records change, build a new `Genealogy` rather than patching the
//! old one.
//!
//! # Example
//!
//! ```
//! use rede::domain::ContactRecord;
//! use rede::genealogy::{Genealogy, LayoutConfig, ViewState};
//!
//! let mut bia = ContactRecord::new("bia", "Bia");
//! bia.referred_by = Some("ana".into());
//! let contacts = vec![ContactRecord::new("ana", "Ana"), bia];
//!
//! let genealogy = Genealogy::build(&contacts, &[]).unwrap();
//! let mut view = ViewState::new();
//! view.toggle_expansion(&genealogy, &"ana".into());
//!
//! let rendered = genealogy.render(&view, &LayoutConfig::default());
//! assert_eq!(rendered.nodes.len(), 2);
//! assert_eq!(rendered.edges.len(), 1);
//! ```

pub mod graph;
pub mod layout;
pub mod partition;
pub mod projection;
pub mod view;

pub use graph::{GraphWarning, ReferralGraph, referral_cycle};
pub use layout::{LayoutConfig, Position, PositionedNode};
pub use partition::Partition;
pub use view::{ReferralEdge, ViewState};

use crate::domain::{CellRecord, ContactId, ContactRecord, ContactStatus, MemberNode};
use crate::error::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Derived member nodes plus lookup structures.
#[derive(Debug)]
pub struct Genealogy {
    nodes: Vec<MemberNode>,
    index: HashMap<ContactId, usize>,
    graph: ReferralGraph,
    warnings: Vec<GraphWarning>,
}

/// Positioned nodes and edges for one view.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView<'a> {
    /// Visible members with coordinates, in source order
    pub nodes: Vec<PositionedNode<'a>>,
    /// Referral links between visible members
    pub edges: Vec<ReferralEdge>,
}

/// Summary counts over the whole network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenealogyStats {
    /// All members
    pub total: usize,
    /// Members taking part in a referral edge
    pub connected: usize,
    /// Members with no referral edge
    pub standby: usize,
    /// Members at each depth
    pub by_depth: BTreeMap<usize, usize>,
    /// Pending contacts
    pub pending: usize,
    /// Visitors
    pub visitors: usize,
    /// Members
    pub members: usize,
    /// Deepest level present
    pub max_depth: usize,
}

impl Genealogy {
    /// Project and derive the network from source records.
    ///
    /// # Errors
    ///
    /// Fails on duplicate contact IDs or a referral cycle.
    pub fn build(contacts: &[ContactRecord], cells: &[CellRecord]) -> Result<Self> {
        let projected = projection::project(contacts, cells);
        let derived = graph::derive(projected)?;

        let index = derived
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        Ok(Self {
            nodes: derived.nodes,
            index,
            graph: derived.graph,
            warnings: derived.warnings,
        })
    }

    /// All members in source order.
    pub fn nodes(&self) -> &[MemberNode] {
        &self.nodes
    }

    /// Look up a member by ID.
    pub fn get(&self, id: &ContactId) -> Option<&MemberNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Links dropped while deriving the graph.
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no members.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Connected/standby split.
    pub fn partition(&self) -> Partition<'_> {
        partition::partition(&self.nodes)
    }

    /// Roots of referral trees: connected members without a referrer.
    pub fn roots(&self) -> impl Iterator<Item = &MemberNode> {
        self.nodes
            .iter()
            .filter(|node| node.referrer.is_none() && node.has_referrals())
    }

    /// Direct referrals of `node`, in source order.
    pub fn referrals_of<'a>(&'a self, node: &'a MemberNode) -> impl Iterator<Item = &'a MemberNode> {
        node.referrals.iter().filter_map(|id| self.get(id))
    }

    /// Everyone transitively referred by `id`.
    pub fn subtree(&self, id: &ContactId) -> Option<Vec<&MemberNode>> {
        let ids = self.graph.subtree(id)?;
        Some(ids.iter().filter_map(|id| self.get(id)).collect())
    }

    /// The referrer chain above `id`, nearest first.
    ///
    /// Terminates because [`Genealogy::build`] rejects cycles.
    pub fn lineage(&self, id: &ContactId) -> Vec<&MemberNode> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(referrer) = current
            .and_then(|node| node.referrer.as_ref())
            .and_then(|referrer| self.get(referrer))
        {
            chain.push(referrer);
            current = Some(referrer);
        }
        chain
    }

    /// Filter by `view` and lay out the visible members.
    pub fn render(&self, view: &ViewState, config: &LayoutConfig) -> RenderedView<'_> {
        let visible = view.visible_nodes(self);
        let nodes = layout::layout(&visible, config);
        let edges = view.visible_edges(self);

        tracing::debug!(
            visible = nodes.len(),
            edges = edges.len(),
            total = self.nodes.len(),
            "Rendered genealogy view"
        );

        RenderedView { nodes, edges }
    }

    /// Summary counts.
    pub fn stats(&self) -> GenealogyStats {
        let split = self.partition();
        let mut stats = GenealogyStats {
            total: self.nodes.len(),
            connected: split.connected.len(),
            standby: split.standby.len(),
            ..GenealogyStats::default()
        };

        for node in &self.nodes {
            *stats.by_depth.entry(node.depth).or_default() += 1;
            stats.max_depth = stats.max_depth.max(node.depth);
            match node.status {
                ContactStatus::Pending => stats.pending += 1,
                ContactStatus::Visitor => stats.visitors += 1,
                ContactStatus::Member => stats.members += 1,
            }
        }

        stats
    }
}
