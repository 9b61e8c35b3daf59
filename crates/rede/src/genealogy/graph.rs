//! Referral graph derivation.
//!
//! Fills in each member's referral list, depth and descendant count from the
//! flat `referrer` links produced by projection:
//! - referral lists keep source order (no sorting)
//! - depth walks referrer links to the root with a visited set, so a cycle
//!   fails fast with [`Error::ReferralCycle`] instead of recursing forever
//! - descendant counts come from a DFS over a petgraph `DiGraph` whose edges
//!   point from referrer to referral

use crate::domain::{ContactId, ContactRecord, MemberNode};
use crate::error::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};

/// Non-fatal problems found while deriving the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    /// A contact names a referrer that is not in the contact list.
    ///
    /// **Effect**: the link is dropped and the contact becomes a root.
    DanglingReferrer {
        /// The contact carrying the link.
        member: ContactId,
        /// The unknown referrer ID.
        referrer: ContactId,
    },
}

impl std::fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingReferrer { member, referrer } => {
                write!(f, "{member} names unknown referrer {referrer}; treated as a root")
            }
        }
    }
}

/// Directed referral graph (referrer -> referral) keyed by contact ID.
#[derive(Debug, Default)]
pub struct ReferralGraph {
    graph: DiGraph<ContactId, ()>,
    node_map: HashMap<ContactId, NodeIndex>,
}

impl ReferralGraph {
    /// Build the graph from member nodes whose referrer links are already
    /// known to point at existing members.
    fn from_nodes(nodes: &[MemberNode]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut node_map = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let index = graph.add_node(node.id.clone());
            node_map.insert(node.id.clone(), index);
        }
        for node in nodes {
            if let Some(referrer) = &node.referrer {
                if let (Some(&from), Some(&to)) = (node_map.get(referrer), node_map.get(&node.id)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self { graph, node_map }
    }

    /// Number of members reachable below `id`, or `None` for unknown IDs.
    pub fn descendant_count(&self, id: &ContactId) -> Option<usize> {
        self.subtree(id).map(|members| members.len())
    }

    /// Every member transitively referred by `id`, in DFS order.
    pub fn subtree(&self, id: &ContactId) -> Option<Vec<ContactId>> {
        let start = *self.node_map.get(id)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut members = Vec::new();

        while let Some(index) = dfs.next(&self.graph) {
            if index != start {
                members.push(self.graph[index].clone());
            }
        }
        Some(members)
    }
}

/// Result of [`derive`].
#[derive(Debug)]
pub struct DerivedGraph {
    /// Member nodes with referrals, depth and descendants filled in.
    pub nodes: Vec<MemberNode>,
    /// Referral edges as a graph.
    pub graph: ReferralGraph,
    /// Dropped links.
    pub warnings: Vec<GraphWarning>,
}

/// Compute referral lists, depths and descendant counts.
///
/// # Errors
///
/// - [`Error::DuplicateContact`] if two nodes share an ID
/// - [`Error::ReferralCycle`] if following referrer links revisits a member
pub fn derive(mut nodes: Vec<MemberNode>) -> Result<DerivedGraph> {
    let mut index: HashMap<ContactId, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), i).is_some() {
            return Err(Error::DuplicateContact(node.id.clone()));
        }
    }

    let mut warnings = Vec::new();
    for node in &mut nodes {
        node.referrals.clear();
        let dangling = node
            .referrer
            .as_ref()
            .filter(|referrer| !index.contains_key(*referrer))
            .cloned();
        if let Some(referrer) = dangling {
            tracing::warn!(member = %node.id, referrer = %referrer, "Dropping dangling referrer link");
            node.referrer = None;
            warnings.push(GraphWarning::DanglingReferrer {
                member: node.id.clone(),
                referrer,
            });
        }
    }

    // Referral lists in source order.
    let links: Vec<(usize, ContactId)> = nodes
        .iter()
        .filter_map(|node| {
            let referrer = node.referrer.as_ref()?;
            Some((index[referrer], node.id.clone()))
        })
        .collect();
    for (referrer, referral) in links {
        nodes[referrer].referrals.push(referral);
    }

    let depths = nodes
        .iter()
        .map(|node| depth_of(&nodes, &index, &node.id))
        .collect::<Result<Vec<_>>>()?;

    let graph = ReferralGraph::from_nodes(&nodes);
    for (node, depth) in nodes.iter_mut().zip(depths) {
        node.depth = depth;
        node.descendants = graph.descendant_count(&node.id).unwrap_or(0);
    }

    tracing::debug!(
        members = nodes.len(),
        edges = graph.graph.edge_count(),
        dropped = warnings.len(),
        "Derived referral graph"
    );

    Ok(DerivedGraph {
        nodes,
        graph,
        warnings,
    })
}

/// Depth of `id`: 0 for a root, else one more than its referrer.
///
/// Walks referrer links iteratively with a visited set.
fn depth_of(
    nodes: &[MemberNode],
    index: &HashMap<ContactId, usize>,
    id: &ContactId,
) -> Result<usize> {
    let mut visited: HashSet<&ContactId> = HashSet::new();
    let mut path: Vec<&ContactId> = Vec::new();
    let mut current = id;
    let mut depth = 0;

    loop {
        if !visited.insert(current) {
            path.push(current);
            let start = path.iter().position(|p| *p == current).unwrap_or(0);
            return Err(Error::ReferralCycle {
                path: path[start..].iter().map(|p| (*p).clone()).collect(),
            });
        }
        path.push(current);

        let Some(referrer) = index.get(current).and_then(|&i| nodes[i].referrer.as_ref()) else {
            return Ok(depth);
        };
        depth += 1;
        current = referrer;
    }
}

/// The cycle that pointing `member`'s referrer at `referrer` would close.
///
/// Walks referrer links up from `referrer`. If the walk reaches `member`,
/// returns the loop as it would read after the change, starting and ending
/// with `member` (`member -> referrer -> ... -> member`). Unknown IDs never
/// form a cycle, and `member`'s current referrer is irrelevant.
pub fn referral_cycle(
    contacts: &[ContactRecord],
    member: &ContactId,
    referrer: &ContactId,
) -> Option<Vec<ContactId>> {
    let mut referrers: HashMap<&ContactId, Option<&ContactId>> = HashMap::new();
    for contact in contacts {
        referrers
            .entry(&contact.id)
            .or_insert(contact.referred_by.as_ref());
    }

    let mut path = vec![member.clone()];
    let mut visited = HashSet::new();
    let mut current = referrer;
    loop {
        if current == member {
            path.push(member.clone());
            return Some(path);
        }
        if !visited.insert(current) {
            // An existing loop that does not pass through `member`.
            return None;
        }
        path.push(current.clone());
        current = (*referrers.get(current)?)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactRecord;
    use crate::genealogy::projection::project;

    fn contact(id: &str, referrer: Option<&str>) -> ContactRecord {
        let mut record = ContactRecord::new(id, id.to_uppercase());
        record.referred_by = referrer.map(ContactId::from);
        record
    }

    fn derive_contacts(contacts: &[ContactRecord]) -> Result<DerivedGraph> {
        derive(project(contacts, &[]))
    }

    fn node<'a>(derived: &'a DerivedGraph, id: &str) -> &'a MemberNode {
        derived
            .nodes
            .iter()
            .find(|n| n.id.as_str() == id)
            .expect("node exists")
    }

    #[test]
    fn chain_depths_and_descendants() {
        let derived = derive_contacts(&[
            contact("a", None),
            contact("b", Some("a")),
            contact("c", Some("b")),
        ])
        .unwrap();

        assert_eq!(
            derived.nodes.iter().map(|n| n.depth).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(node(&derived, "a").descendants, 2);
        assert_eq!(node(&derived, "b").descendants, 1);
        assert_eq!(node(&derived, "c").descendants, 0);
    }

    #[test]
    fn referrals_follow_input_order() {
        let derived = derive_contacts(&[
            contact("z", Some("root")),
            contact("root", None),
            contact("m", Some("root")),
            contact("a", Some("root")),
        ])
        .unwrap();

        let ids: Vec<&str> = node(&derived, "root")
            .referrals
            .iter()
            .map(ContactId::as_str)
            .collect();
        assert_eq!(ids, vec!["z", "m", "a"]);
    }

    #[test]
    fn cycle_fails_fast_with_path() {
        let err = derive_contacts(&[
            contact("a", Some("c")),
            contact("b", Some("a")),
            contact("c", Some("b")),
        ])
        .unwrap_err();

        match err {
            Error::ReferralCycle { path } => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 4);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn self_referral_is_a_cycle() {
        let err = derive_contacts(&[contact("a", Some("a"))]).unwrap_err();
        assert!(matches!(err, Error::ReferralCycle { ref path } if path.len() == 2));
    }

    #[test]
    fn cycle_reachable_from_a_tail_is_reported() {
        let err = derive_contacts(&[
            contact("tail", Some("x")),
            contact("x", Some("y")),
            contact("y", Some("x")),
        ])
        .unwrap_err();

        let Error::ReferralCycle { path } = err else {
            panic!("expected cycle error");
        };
        let ids: Vec<&str> = path.iter().map(ContactId::as_str).collect();
        assert_eq!(ids, vec!["x", "y", "x"]);
    }

    #[test]
    fn dangling_referrer_becomes_root_with_warning() {
        let derived = derive_contacts(&[contact("a", Some("ghost")), contact("b", Some("a"))]).unwrap();

        assert_eq!(node(&derived, "a").referrer, None);
        assert_eq!(node(&derived, "a").depth, 0);
        assert_eq!(node(&derived, "b").depth, 1);
        assert_eq!(
            derived.warnings,
            vec![GraphWarning::DanglingReferrer {
                member: "a".into(),
                referrer: "ghost".into(),
            }]
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = derive_contacts(&[contact("a", None), contact("a", None)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateContact(id) if id.as_str() == "a"));
    }

    #[test]
    fn subtree_lists_all_descendants() {
        let derived = derive_contacts(&[
            contact("a", None),
            contact("b", Some("a")),
            contact("c", Some("a")),
            contact("d", Some("c")),
        ])
        .unwrap();

        let mut subtree = derived.graph.subtree(&"a".into()).unwrap();
        subtree.sort();
        assert_eq!(subtree, vec!["b".into(), "c".into(), "d".into()]);
        assert_eq!(derived.graph.subtree(&"missing".into()), None);
    }

    #[test]
    fn referral_cycle_detects_descendant_as_referrer() {
        let contacts = [
            contact("a", None),
            contact("b", Some("a")),
            contact("c", Some("b")),
            contact("d", None),
        ];

        assert!(referral_cycle(&contacts, &"a".into(), &"c".into()).is_some());
        assert!(referral_cycle(&contacts, &"c".into(), &"d".into()).is_none());
        assert!(referral_cycle(&contacts, &"d".into(), &"c".into()).is_none());
        assert!(referral_cycle(&contacts, &"a".into(), &"unknown".into()).is_none());
    }

    #[test]
    fn referral_cycle_reports_the_whole_loop() {
        let contacts = [
            contact("a", None),
            contact("b", Some("a")),
            contact("c", Some("b")),
            contact("e", Some("c")),
        ];

        let path = referral_cycle(&contacts, &"a".into(), &"e".into()).unwrap();
        let ids: Vec<&str> = path.iter().map(ContactId::as_str).collect();
        assert_eq!(ids, vec!["a", "e", "c", "b", "a"]);
    }

    #[test]
    fn self_referral_update_is_a_cycle() {
        let contacts = [contact("b", None)];
        let path = referral_cycle(&contacts, &"b".into(), &"b".into()).unwrap();
        assert_eq!(path, vec![ContactId::from("b"), ContactId::from("b")]);
    }

    #[test]
    fn referral_cycle_ignores_members_current_referrer() {
        // b currently hangs off a; moving b under c (a sibling branch) is fine.
        let contacts = [
            contact("a", None),
            contact("b", Some("a")),
            contact("c", Some("a")),
        ];
        assert!(referral_cycle(&contacts, &"b".into(), &"c".into()).is_none());
    }

    #[test]
    fn existing_loop_elsewhere_is_not_reported() {
        let contacts = [
            contact("a", None),
            contact("x", Some("y")),
            contact("y", Some("x")),
        ];
        assert!(referral_cycle(&contacts, &"a".into(), &"x".into()).is_none());
    }
}
