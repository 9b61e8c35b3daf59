//! Connected/standby partition of member nodes.

use crate::domain::MemberNode;
use serde::Serialize;

/// Members split by whether they take part in any referral edge.
///
/// Both lists keep source order. Every node lands in exactly one of them.
#[derive(Debug, Clone, Serialize)]
pub struct Partition<'a> {
    /// Members with a referrer or at least one referral.
    pub connected: Vec<&'a MemberNode>,
    /// Members with neither.
    pub standby: Vec<&'a MemberNode>,
}

/// True if the member has a referrer or has referred someone.
pub fn is_connected(node: &MemberNode) -> bool {
    node.referrer.is_some() || node.has_referrals()
}

/// Split `nodes` into connected and standby members.
pub fn partition(nodes: &[MemberNode]) -> Partition<'_> {
    let (connected, standby) = nodes.iter().partition(|node| is_connected(node));
    Partition { connected, standby }
}
