//! Output formatting for CLI commands.
//!
//! Every printer has a text form for people and a JSON form for scripts.
//! Text printers write to any [`Write`] so tests can render into a buffer.
//!
//! Submodules:
//! - [`color`]: semantic colors and status icons
//! - [`notify`]: console toasts for the edit flow
//! - [`tree`]: referral forest with ASCII/Unicode connectors

pub mod color;
pub mod notify;
pub mod tree;

use crate::domain::{MemberNode, NO_CELL};
use crate::genealogy::{Genealogy, GenealogyStats, GraphWarning, Partition, RenderedView, ViewState};
use crate::storage::LoadWarning;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};
pub use notify::ConsoleNotifier;
pub use tree::print_genealogy_tree;

use color::{bold, colored_status_icon, colorize_id, colorize_status, dimmed};

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Settings that control text output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Read settings from the process environment.
    ///
    /// - `REDE_MAX_WIDTH`: maximum content width (default: 80)
    /// - `REDE_ASCII`: "1" or "true" for ASCII-only icons
    /// - `NO_COLOR`: any value disables colors
    /// - `REDE_COLOR`: "0" or "false" disables colors
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`OutputConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match lookup("REDE_MAX_WIDTH") {
            Some(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "REDE_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("REDE_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "REDE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("REDE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Wrap text to `max_width`, keeping existing line breaks.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width)
                    .into_iter()
                    .map(|s| s.into_owned())
                    .collect()
            }
        })
        .collect()
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", msg)
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

/// Print members with no referral link.
pub fn print_standby(partition: &Partition<'_>, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => print_standby_text(&mut handle, partition, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, &partition.standby),
    }
}

/// Print a filtered, laid-out view.
pub fn print_view(
    rendered: &RenderedView<'_>,
    view: &ViewState,
    total: usize,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => print_view_text(&mut handle, rendered, view, total, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, rendered),
    }
}

/// Print one member with lineage and referrals.
pub fn print_member_details(
    genealogy: &Genealogy,
    member: &MemberNode,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => {
            print_member_details_text(&mut handle, genealogy, member, &OutputConfig::from_env())
        }
        OutputMode::Json => write_json(&mut handle, &MemberDetails::new(genealogy, member)),
    }
}

/// Print summary counts.
pub fn print_stats(stats: &GenealogyStats, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match mode {
        OutputMode::Text => print_stats_text(&mut handle, stats, &OutputConfig::from_env()),
        OutputMode::Json => write_json(&mut handle, stats),
    }
}

/// Print data-file and graph warnings to stderr.
pub fn print_warnings(load: &[LoadWarning], graph: &[GraphWarning]) -> io::Result<()> {
    if load.is_empty() && graph.is_empty() {
        return Ok(());
    }
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    write_warnings(&mut handle, load, graph, &OutputConfig::from_env())
}

#[derive(Serialize)]
struct MemberDetails<'a> {
    #[serde(flatten)]
    member: &'a MemberNode,
    lineage: Vec<&'a str>,
}

impl<'a> MemberDetails<'a> {
    fn new(genealogy: &'a Genealogy, member: &'a MemberNode) -> Self {
        Self {
            member,
            lineage: genealogy
                .lineage(&member.id)
                .into_iter()
                .map(|node| node.id.as_str())
                .collect(),
        }
    }
}

fn print_standby_text<W: Write>(
    w: &mut W,
    partition: &Partition<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    if partition.standby.is_empty() {
        writeln!(w, "No members on standby.")?;
        return Ok(());
    }

    writeln!(w, "{} member(s) on standby:", partition.standby.len())?;
    writeln!(w)?;
    for node in &partition.standby {
        let cell = if node.cell_name == NO_CELL {
            dimmed(&node.cell_name, config)
        } else {
            node.cell_name.clone()
        };
        writeln!(
            w,
            "{} {}  {}  {}",
            colored_status_icon(node.status, config),
            colorize_id(node.id.as_str(), config),
            node.name,
            cell
        )?;
    }
    Ok(())
}

fn print_view_text<W: Write>(
    w: &mut W,
    rendered: &RenderedView<'_>,
    view: &ViewState,
    total: usize,
    config: &OutputConfig,
) -> io::Result<()> {
    let levels: Vec<String> = view.visible_levels().iter().map(ToString::to_string).collect();
    let focus = view
        .focused_level()
        .map(|level| format!(", focus {level}"))
        .unwrap_or_default();
    writeln!(
        w,
        "Showing {} of {} member(s) {}",
        rendered.nodes.len(),
        total,
        dimmed(&format!("(levels {}{})", levels.join(","), focus), config)
    )?;

    if rendered.nodes.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    for placed in &rendered.nodes {
        let node = placed.node;
        let marker = if !node.has_referrals() {
            " "
        } else if view.is_expanded(&node.id) {
            "-"
        } else {
            "+"
        };
        writeln!(
            w,
            "{} {} {} {}  {}",
            marker,
            colored_status_icon(node.status, config),
            colorize_id(node.id.as_str(), config),
            node.name,
            dimmed(
                &format!(
                    "depth {} at ({:.0}, {:.0})",
                    node.depth, placed.position.x, placed.position.y
                ),
                config
            )
        )?;
    }

    if !rendered.edges.is_empty() {
        let arrow = if config.use_ascii { "->" } else { "→" };
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Referrals", config), rendered.edges.len())?;
        for edge in &rendered.edges {
            writeln!(
                w,
                "  {} {} {}",
                colorize_id(edge.from.as_str(), config),
                dimmed(arrow, config),
                colorize_id(edge.to.as_str(), config)
            )?;
        }
    }
    Ok(())
}

fn print_member_details_text<W: Write>(
    w: &mut W,
    genealogy: &Genealogy,
    member: &MemberNode,
    config: &OutputConfig,
) -> io::Result<()> {
    let content_width = get_terminal_width().min(config.max_width);

    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(member.status, config),
        colorize_id(member.id.as_str(), config),
        member.name
    )?;
    writeln!(
        w,
        "{}  {}    {}  {}    {}  {}",
        dimmed("Status:", config),
        colorize_status(member.status, config),
        dimmed("Depth:", config),
        member.depth,
        dimmed("Descendants:", config),
        member.descendants
    )?;
    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Cell:", config),
        member.cell_name,
        dimmed("Leader:", config),
        member.leader_name
    )?;

    let mut flags = Vec::new();
    if member.flags.encounter_with_god {
        flags.push("encounter with god");
    }
    if member.flags.baptized {
        flags.push("baptized");
    }
    if member.flags.founder {
        flags.push("founder");
    }
    if !flags.is_empty() {
        writeln!(w, "{} {}", dimmed("Flags:", config), flags.join(", "))?;
    }

    let lineage = genealogy.lineage(&member.id);
    if !lineage.is_empty() {
        let arrow = if config.use_ascii { " <- " } else { " ← " };
        let chain = lineage
            .iter()
            .map(|node| format!("{} ({})", node.id, node.name))
            .collect::<Vec<_>>()
            .join(arrow);
        writeln!(w)?;
        writeln!(w, "{}:", bold("Referred by", config))?;
        for line in wrap_text(&chain, content_width.saturating_sub(2)) {
            writeln!(w, "  {line}")?;
        }
    }

    let referrals: Vec<&MemberNode> = genealogy.referrals_of(member).collect();
    if !referrals.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Referrals", config), referrals.len())?;
        for child in referrals {
            writeln!(
                w,
                "  {} {} {}",
                colored_status_icon(child.status, config),
                colorize_id(child.id.as_str(), config),
                child.name
            )?;
        }
    }
    Ok(())
}

fn print_stats_text<W: Write>(
    w: &mut W,
    stats: &GenealogyStats,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Network", config))?;
    writeln!(w, "  {} {}", dimmed("Total:", config), stats.total)?;
    writeln!(w, "  {} {}", dimmed("Connected:", config), stats.connected)?;
    writeln!(w, "  {} {}", dimmed("Standby:", config), stats.standby)?;
    writeln!(w, "  {} {}", dimmed("Deepest level:", config), stats.max_depth)?;
    writeln!(w)?;
    writeln!(w, "{}", bold("Status", config))?;
    writeln!(w, "  {} {}", dimmed("Pending:", config), stats.pending)?;
    writeln!(w, "  {} {}", dimmed("Visitors:", config), stats.visitors)?;
    writeln!(w, "  {} {}", dimmed("Members:", config), stats.members)?;

    if !stats.by_depth.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", bold("By depth", config))?;
        for (depth, count) in &stats.by_depth {
            writeln!(w, "  {} {}", dimmed(&format!("{depth}:"), config), count)?;
        }
    }
    Ok(())
}

fn write_warnings<W: Write>(
    w: &mut W,
    load: &[LoadWarning],
    graph: &[GraphWarning],
    config: &OutputConfig,
) -> io::Result<()> {
    let label = warning("warning:", config);
    for item in load {
        writeln!(w, "{} {}", label, item)?;
    }
    for item in graph {
        writeln!(w, "{} {}", label, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellId, CellRecord, ContactId, ContactRecord, ContactStatus};
    use crate::genealogy::LayoutConfig;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, true, false)
    }

    fn sample() -> Genealogy {
        let contact = |id: &str, name: &str, referrer: Option<&str>| {
            let mut record = ContactRecord::new(id, name);
            record.referred_by = referrer.map(ContactId::from);
            record
        };
        let mut ana = contact("ana", "Ana", None);
        ana.status = ContactStatus::Member;
        ana.cell_id = Some(CellId::new("c1"));
        ana.baptized = true;
        ana.founder = true;
        let mut solo = contact("solo", "Solo", None);
        solo.cell_id = Some(CellId::new("c1"));

        Genealogy::build(
            &[
                ana,
                contact("bia", "Bia", Some("ana")),
                contact("caio", "Caio", Some("bia")),
                solo,
                contact("zeca", "Zeca", None),
            ],
            &[CellRecord {
                id: CellId::new("c1"),
                name: "Alpha".to_string(),
                leader_name: "Lia".to_string(),
            }],
        )
        .unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn output_config_from_lookup() {
        let vars: HashMap<&str, &str> = [("REDE_MAX_WIDTH", "120"), ("REDE_ASCII", "1")].into();
        let config = OutputConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config, OutputConfig::new(120, true, true));

        let vars: HashMap<&str, &str> = [("REDE_MAX_WIDTH", "wide"), ("REDE_ASCII", "maybe")].into();
        let config = OutputConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config, OutputConfig::default());
    }

    #[test]
    fn color_can_be_disabled() {
        let config = OutputConfig::from_lookup(|k| (k == "NO_COLOR").then(String::new));
        assert!(!config.use_colors, "NO_COLOR should disable colors");

        for value in ["0", "false", "FALSE"] {
            let config = OutputConfig::from_lookup(|k| (k == "REDE_COLOR").then(|| value.to_string()));
            assert!(!config.use_colors, "REDE_COLOR={value} should disable colors");
        }
    }

    #[test]
    fn wrap_text_respects_width_and_newlines() {
        let wrapped = wrap_text("Check out https://example.com/very/long/path for details", 20);
        assert!(wrapped.iter().all(|line| line.len() <= 20), "{wrapped:?}");

        assert_eq!(wrap_text("one\ntwo\nthree", 50).len(), 3);
    }

    #[test]
    fn standby_text_lists_isolated_members() {
        let genealogy = sample();
        let output = render(|w| print_standby_text(w, &genealogy.partition(), &plain()));

        assert!(output.starts_with("2 member(s) on standby:"));
        assert!(output.contains("o solo  Solo  Alpha"));
        assert!(output.contains("o zeca  Zeca  no cell"));
        assert!(!output.contains("ana"));
    }

    #[test]
    fn standby_text_when_empty() {
        let genealogy = Genealogy::build(&[], &[]).unwrap();
        let output = render(|w| print_standby_text(w, &genealogy.partition(), &plain()));
        assert_eq!(output, "No members on standby.\n");
    }

    #[test]
    fn view_text_shows_positions_and_edges() {
        let genealogy = sample();
        let mut view = ViewState::with_levels([0, 1]);
        view.toggle_expansion(&genealogy, &ContactId::from("ana"));
        let rendered = genealogy.render(&view, &LayoutConfig::default());

        let output = render(|w| print_view_text(w, &rendered, &view, genealogy.len(), &plain()));

        assert!(output.starts_with("Showing 4 of 5 member(s) (levels 0,1)"));
        assert!(output.contains("- * ana Ana  depth 0 at (-180, 50)"));
        assert!(output.contains("  o zeca Zeca  depth 0 at (180, 50)"));
        assert!(output.contains("+ o bia Bia  depth 1 at (-20, 200)"));
        assert!(output.contains("  ana -> bia"));
    }

    #[test]
    fn member_details_text() {
        let genealogy = sample();
        let bia = genealogy.get(&ContactId::from("bia")).unwrap();

        let output = render(|w| print_member_details_text(w, &genealogy, bia, &plain()));

        assert!(output.starts_with("o bia: Bia"));
        assert!(output.contains("Depth:  1"));
        assert!(output.contains("Cell: no cell    Leader: no leader"));
        assert!(output.contains("ana (Ana)"));
        assert!(output.contains("Referrals (1):"));
        assert!(output.contains("caio Caio"));
    }

    #[test]
    fn member_details_flags() {
        let genealogy = sample();
        let ana = genealogy.get(&ContactId::from("ana")).unwrap();

        let output = render(|w| print_member_details_text(w, &genealogy, ana, &plain()));

        assert!(output.contains("Flags: baptized, founder"));
        assert!(output.contains("Cell: Alpha    Leader: Lia"));
        assert!(!output.contains("Referred by"));
    }

    #[test]
    fn member_details_json_includes_lineage() {
        let genealogy = sample();
        let caio = genealogy.get(&ContactId::from("caio")).unwrap();

        let json = serde_json::to_value(MemberDetails::new(&genealogy, caio)).unwrap();

        assert_eq!(json["id"], "caio");
        assert_eq!(json["depth"], 2);
        assert_eq!(json["lineage"], serde_json::json!(["bia", "ana"]));
    }

    #[test]
    fn stats_text() {
        let stats = sample().stats();
        let output = render(|w| print_stats_text(w, &stats, &plain()));

        assert!(output.contains("Total: 5"));
        assert!(output.contains("Connected: 3"));
        assert!(output.contains("Standby: 2"));
        assert!(output.contains("Members: 1"));
        assert!(output.contains("2: 1"));
    }

    #[test]
    fn warnings_are_prefixed() {
        let load = vec![LoadWarning::MalformedJson {
            file: PathBuf::from("contacts.jsonl"),
            line_number: 3,
            error: "eof".to_string(),
        }];
        let graph = vec![GraphWarning::DanglingReferrer {
            member: ContactId::from("a"),
            referrer: ContactId::from("ghost"),
        }];

        let output = render(|w| write_warnings(w, &load, &graph, &plain()));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.starts_with("warning: ")));
        assert!(lines[0].contains("contacts.jsonl:3"));
    }
}
