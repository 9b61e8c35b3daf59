//! Projection of raw contact and cell records into member nodes.

use crate::domain::{CellId, CellRecord, ContactRecord, MemberFlags, MemberNode, NO_CELL, NO_LEADER};
use std::collections::HashMap;

/// Map contacts to member nodes, resolving cell and leader names.
///
/// Input order is preserved. A contact without a cell, or whose cell ID is
/// not in `cells`, gets the [`NO_CELL`] / [`NO_LEADER`] placeholders. The
/// derived fields (`referrals`, `depth`, `descendants`) are left empty for
/// the graph deriver.
pub fn project(contacts: &[ContactRecord], cells: &[CellRecord]) -> Vec<MemberNode> {
    let cells_by_id: HashMap<&CellId, &CellRecord> =
        cells.iter().map(|cell| (&cell.id, cell)).collect();

    contacts
        .iter()
        .map(|contact| {
            let cell = contact
                .cell_id
                .as_ref()
                .and_then(|id| cells_by_id.get(id).copied());

            if cell.is_none() {
                if let Some(cell_id) = &contact.cell_id {
                    tracing::debug!(contact = %contact.id, cell = %cell_id, "Unknown cell reference");
                }
            }

            MemberNode {
                id: contact.id.clone(),
                name: contact.name.clone(),
                leader_name: cell
                    .map(|c| c.leader_name.clone())
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| NO_LEADER.to_string()),
                cell_name: cell
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| NO_CELL.to_string()),
                status: contact.status,
                referrer: contact.referred_by.clone(),
                referrals: Vec::new(),
                flags: MemberFlags {
                    encounter_with_god: contact.encounter_with_god,
                    baptized: contact.baptized,
                    founder: contact.founder,
                },
                depth: 0,
                descendants: 0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactStatus;

    fn cell(id: &str, name: &str, leader: &str) -> CellRecord {
        CellRecord {
            id: CellId::new(id),
            name: name.to_string(),
            leader_name: leader.to_string(),
        }
    }

    #[test]
    fn resolves_cell_and_leader() {
        let mut ana = ContactRecord::new("c-1", "Ana");
        ana.cell_id = Some(CellId::new("cell-1"));
        ana.status = ContactStatus::Member;
        ana.baptized = true;

        let nodes = project(&[ana], &[cell("cell-1", "Betel", "Marcos")]);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].cell_name, "Betel");
        assert_eq!(nodes[0].leader_name, "Marcos");
        assert_eq!(nodes[0].status, ContactStatus::Member);
        assert!(nodes[0].flags.baptized);
        assert!(!nodes[0].flags.founder);
    }

    #[test]
    fn missing_or_unknown_cell_uses_placeholders() {
        let no_cell = ContactRecord::new("c-1", "Ana");
        let mut unknown = ContactRecord::new("c-2", "Bia");
        unknown.cell_id = Some(CellId::new("gone"));

        let nodes = project(&[no_cell, unknown], &[cell("cell-1", "Betel", "Marcos")]);

        for node in &nodes {
            assert_eq!(node.cell_name, NO_CELL);
            assert_eq!(node.leader_name, NO_LEADER);
        }
    }

    #[test]
    fn blank_leader_uses_placeholder() {
        let mut ana = ContactRecord::new("c-1", "Ana");
        ana.cell_id = Some(CellId::new("cell-1"));

        let nodes = project(&[ana], &[cell("cell-1", "Betel", " ")]);

        assert_eq!(nodes[0].cell_name, "Betel");
        assert_eq!(nodes[0].leader_name, NO_LEADER);
    }

    #[test]
    fn preserves_input_order_and_referrer() {
        let a = ContactRecord::new("a", "A");
        let mut b = ContactRecord::new("b", "B");
        b.referred_by = Some("a".into());

        let nodes = project(&[b, a], &[]);

        assert_eq!(nodes[0].id.as_str(), "b");
        assert_eq!(nodes[0].referrer, Some("a".into()));
        assert_eq!(nodes[1].id.as_str(), "a");
        assert!(nodes.iter().all(|n| n.referrals.is_empty() && n.depth == 0));
    }
}
