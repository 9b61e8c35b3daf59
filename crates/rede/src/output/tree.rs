//! Referral tree rendering for `rede tree`.

use std::io::{self, Write};

use serde::Serialize;

use super::color::{colored_status_icon, colorize_id, dimmed};
use super::{OutputConfig, OutputMode};
use crate::domain::{ContactStatus, MemberNode};
use crate::genealogy::Genealogy;

/// One member and everyone they referred, for JSON output.
#[derive(Debug, Serialize)]
pub struct TreeNode<'a> {
    /// Member ID
    pub id: &'a str,
    /// Display name
    pub name: &'a str,
    /// Community status
    pub status: ContactStatus,
    /// Distance from the root
    pub depth: usize,
    /// Size of the subtree below this member
    pub descendants: usize,
    /// Direct referrals, in source order
    pub referrals: Vec<TreeNode<'a>>,
}

impl<'a> TreeNode<'a> {
    fn build(genealogy: &'a Genealogy, node: &'a MemberNode) -> Self {
        Self {
            id: node.id.as_str(),
            name: &node.name,
            status: node.status,
            depth: node.depth,
            descendants: node.descendants,
            referrals: genealogy
                .referrals_of(node)
                .map(|child| TreeNode::build(genealogy, child))
                .collect(),
        }
    }
}

/// Print every referral tree, one root at a time.
///
/// Renders a forest like:
/// ```text
/// ● ana Ana (+3)
/// ├── ○ bia Bia (+1)
/// │   └── ○ caio Caio
/// └── ◐ duda Duda
/// ```
pub fn print_genealogy_tree(genealogy: &Genealogy, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_tree_text(&mut handle, genealogy, &config),
        OutputMode::Json => {
            let forest: Vec<TreeNode<'_>> = genealogy
                .roots()
                .map(|root| TreeNode::build(genealogy, root))
                .collect();
            let output = serde_json::to_string_pretty(&forest).map_err(io::Error::other)?;
            writeln!(handle, "{}", output)
        }
    }
}

fn print_tree_text<W: Write>(
    w: &mut W,
    genealogy: &Genealogy,
    config: &OutputConfig,
) -> io::Result<()> {
    let mut printed_any = false;
    for root in genealogy.roots() {
        if printed_any {
            writeln!(w)?;
        }
        writeln!(w, "{}", node_label(root, config))?;
        let children: Vec<&MemberNode> = genealogy.referrals_of(root).collect();
        print_tree_children(w, genealogy, &children, &[], config)?;
        printed_any = true;
    }

    if !printed_any {
        writeln!(w, "No referral trees yet.")?;
    }
    Ok(())
}

/// `prefix_segments` records, per ancestor level, whether siblings follow.
fn print_tree_children<W: Write>(
    w: &mut W,
    genealogy: &Genealogy,
    children: &[&MemberNode],
    prefix_segments: &[bool],
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();

        let mut prefix = String::new();
        for &has_more in prefix_segments {
            prefix.push_str(&dimmed(if has_more { pipe } else { space }, config));
        }
        let connector = dimmed(if is_last { corner } else { branch }, config);

        writeln!(w, "{}{}{}", prefix, connector, node_label(child, config))?;

        let grandchildren: Vec<&MemberNode> = genealogy.referrals_of(child).collect();
        if !grandchildren.is_empty() {
            let mut next_segments = prefix_segments.to_vec();
            next_segments.push(!is_last);
            print_tree_children(w, genealogy, &grandchildren, &next_segments, config)?;
        }
    }

    Ok(())
}

fn node_label(node: &MemberNode, config: &OutputConfig) -> String {
    let count = if node.descendants > 0 {
        format!(" {}", dimmed(&format!("(+{})", node.descendants), config))
    } else {
        String::new()
    };
    format!(
        "{} {} {}{}",
        colored_status_icon(node.status, config),
        colorize_id(node.id.as_str(), config),
        node.name,
        count
    )
}
