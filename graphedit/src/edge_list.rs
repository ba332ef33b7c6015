//! Plain-text edge lists, one item per line:
//!
//! ```text
//! A            isolated node
//! A-B          undirected edge, weight 1
//! A-{2.5}-B    weighted undirected edge
//! A->B         directed edge
//! A-{3}->B     weighted directed edge
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::json::{EdgeRecord, GraphRecord, NodeRecord};
use crate::layout::{circle_points, circle_radius};
use crate::model::{Vec2, DEFAULT_NODE_RADIUS, DEFAULT_WEIGHT};
use crate::Graph;

const RESERVED: [char; 4] = ['-', '{', '}', '>'];

fn name(raw: &str, line: usize, what: &str) -> Result<String> {
    let n = raw.trim();
    if n.is_empty() {
        return Err(Error::Parse { line, message: format!("missing {what} node name") });
    }
    if let Some(c) = n.chars().find(|c| RESERVED.contains(c)) {
        return Err(Error::Parse { line, message: format!("unexpected {c:?} in node name {n:?}") });
    }
    Ok(n.to_string())
}

#[derive(Debug, PartialEq)]
enum Item {
    Node(String),
    Edge { src: String, dst: String, weight: f64, directed: bool },
}

fn parse_line(text: &str, line: usize) -> Result<Item> {
    let Some((src, rest)) = text.split_once('-') else {
        return Ok(Item::Node(name(text, line, "source")?));
    };
    let src = name(src, line, "source")?;
    let rest = rest.trim_start();
    let (weight, rest) = match rest.strip_prefix('{') {
        Some(inner) => {
            let Some((w, after)) = inner.split_once('}') else {
                return Err(Error::Parse { line, message: "unterminated weight".into() });
            };
            let w: f64 = w.trim().parse().map_err(|_| Error::Parse {
                line,
                message: format!("invalid weight {:?}", w.trim()),
            })?;
            if !w.is_finite() {
                return Err(Error::Parse { line, message: "weight must be finite".into() });
            }
            let Some(after) = after.trim_start().strip_prefix('-') else {
                return Err(Error::Parse { line, message: "expected '-' after weight".into() });
            };
            (w, after)
        }
        None => (DEFAULT_WEIGHT, rest),
    };
    let (directed, dst) = match rest.strip_prefix('>') {
        Some(dst) => (true, dst),
        None => (false, rest),
    };
    let dst = name(dst, line, "destination")?;
    Ok(Item::Edge { src, dst, weight, directed })
}

fn touch(record: &mut GraphRecord, label: &str) {
    if !record.nodes.iter().any(|n| n.label == label) {
        record.nodes.push(NodeRecord { x: 0.0, y: 0.0, r: DEFAULT_NODE_RADIUS, label: label.to_string() });
    }
}

/// Parses an edge list into a persistence record with every node at the
/// origin. Self loops and repeated edges are skipped; the first malformed
/// line aborts with its 1-based line number.
pub fn parse_edge_list(text: &str) -> Result<GraphRecord> {
    let mut record = GraphRecord::default();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line, i + 1)? {
            Item::Node(n) => touch(&mut record, &n),
            Item::Edge { src, dst, weight, directed } => {
                touch(&mut record, &src);
                touch(&mut record, &dst);
                if src == dst {
                    tracing::debug!(line = i + 1, node = %src, "self loop skipped");
                    continue;
                }
                let dup = record.edges.iter().any(|e| {
                    (e.src == src && e.dst == dst)
                        || ((!directed || !e.directed) && e.src == dst && e.dst == src)
                });
                if dup {
                    tracing::debug!(line = i + 1, src = %src, dst = %dst, "duplicate edge skipped");
                    continue;
                }
                record.edges.push(EdgeRecord { src, dst, weight, directed });
            }
        }
    }
    Ok(record)
}

fn format_weight(w: f64) -> String {
    if w.fract() == 0.0 && w.abs() < 1e15 {
        format!("{}", w as i64)
    } else {
        w.to_string()
    }
}

/// Writes a record back as an edge list. Nodes without edges get their own
/// line.
pub fn to_edge_list(record: &GraphRecord) -> String {
    let mut out = String::new();
    for e in &record.edges {
        out.push_str(&e.src);
        out.push('-');
        if e.weight != DEFAULT_WEIGHT {
            out.push('{');
            out.push_str(&format_weight(e.weight));
            out.push_str("}-");
        }
        if e.directed {
            out.push('>');
        }
        out.push_str(&e.dst);
        out.push('\n');
    }
    for n in &record.nodes {
        if !record.edges.iter().any(|e| e.src == n.label || e.dst == n.label) {
            out.push_str(&n.label);
            out.push('\n');
        }
    }
    out
}

impl Graph {
    /// Replaces the graph with the parsed edge list, nodes placed on a circle.
    /// On a parse error the graph is left untouched.
    pub fn load_edge_list(&mut self, text: &str, cfg: &LayoutConfig) -> Result<()> {
        let mut record = parse_edge_list(text)?;
        let n = record.nodes.len();
        let c = Vec2::new(cfg.canvas_width * 0.5, cfg.canvas_height * 0.5);
        for (node, p) in record.nodes.iter_mut().zip(circle_points(n, c, circle_radius(n, cfg))) {
            node.x = p.x;
            node.y = p.y;
            node.r = self.defaults.node_radius;
        }
        self.load_record(&record)
    }

    pub fn to_edge_list(&self) -> Result<String> {
        Ok(to_edge_list(&self.to_record()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_forms() {
        assert_eq!(parse_line("A", 1).unwrap(), Item::Node("A".into()));
        assert_eq!(
            parse_line("A - {2.5} -> B", 1).unwrap(),
            Item::Edge { src: "A".into(), dst: "B".into(), weight: 2.5, directed: true }
        );
        assert_eq!(
            parse_line("A-B", 1).unwrap(),
            Item::Edge { src: "A".into(), dst: "B".into(), weight: 1.0, directed: false }
        );
    }

    #[test]
    fn malformed_lines_report_their_number() {
        for bad in ["A-", "-B", "A-{x}-B", "A-{3-B", "A-{3}B", "A--B"] {
            let err = parse_edge_list(&format!("# header\nX-Y\n{bad}")).unwrap_err();
            assert!(matches!(err, Error::Parse { line: 3, .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn export_is_reparseable() {
        let rec = parse_edge_list("A-{5}-B\nB->C\nD").unwrap();
        let text = to_edge_list(&rec);
        assert_eq!(text, "A-{5}-B\nB->C\nD\n");
        assert_eq!(parse_edge_list(&text).unwrap(), rec);
    }
}
