//! GraphML export for external graph tools

use anyhow::Result;
use crate::graph::CollabGraph;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the annotated graph as an undirected GraphML file
pub fn save_graphml(graph: &CollabGraph, path: &Path) -> Result<()> {
    log::info!("Writing GraphML to {}", path.display());

    let mut file = BufWriter::new(File::create(path)?);
    write_graphml(graph, &mut file)?;
    file.flush()?;

    Ok(())
}

pub fn write_graphml<W: Write>(graph: &CollabGraph, out: &mut W) -> Result<()> {
    // Header and attribute keys
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(out, "  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>")?;
    writeln!(out, "  <key id=\"role\" for=\"node\" attr.name=\"role\" attr.type=\"string\"/>")?;
    writeln!(out, "  <key id=\"community\" for=\"node\" attr.name=\"community\" attr.type=\"int\"/>")?;
    writeln!(out, "  <key id=\"degree\" for=\"node\" attr.name=\"degree\" attr.type=\"int\"/>")?;
    writeln!(out, "  <key id=\"movies_count\" for=\"node\" attr.name=\"movies_count\" attr.type=\"int\"/>")?;
    writeln!(out, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>")?;
    writeln!(out, "  <key id=\"movies\" for=\"edge\" attr.name=\"movies\" attr.type=\"string\"/>")?;
    writeln!(out, "  <graph id=\"G\" edgedefault=\"undirected\">")?;

    for node in graph.nodes() {
        writeln!(out, "    <node id=\"{}\">", escape(&node.person_id))?;
        writeln!(out, "      <data key=\"label\">{}</data>", escape(&node.name))?;
        writeln!(out, "      <data key=\"role\">{}</data>", escape(&node.role))?;
        if let Some(community) = node.community {
            writeln!(out, "      <data key=\"community\">{}</data>", community)?;
        }
        writeln!(out, "      <data key=\"degree\">{}</data>", node.degree)?;
        writeln!(out, "      <data key=\"movies_count\">{}</data>", node.movies_count)?;
        writeln!(out, "    </node>")?;
    }

    for (edge_id, (a, b, collab)) in graph.edges().enumerate() {
        writeln!(
            out,
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">",
            edge_id,
            escape(&graph.node(a).person_id),
            escape(&graph.node(b).person_id)
        )?;
        writeln!(out, "      <data key=\"weight\">{}</data>", collab.weight)?;
        // GraphML has no list type
        writeln!(out, "      <data key=\"movies\">{}</data>", escape(&collab.movies.join(", ")))?;
        writeln!(out, "    </edge>")?;
    }

    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")?;

    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ParticipationIndex, ParticipationRecord};
    use crate::graph::GraphBuilder;

    #[test]
    fn test_escape() {
        assert_eq!(escape("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
        assert_eq!(escape("봉준호"), "봉준호");
    }

    #[test]
    fn test_write_graphml() {
        let records = vec![
            ParticipationRecord::new("A", "Love & War"),
            ParticipationRecord::new("B", "Love & War"),
            ParticipationRecord::new("A", "Sequel"),
            ParticipationRecord::new("B", "Sequel"),
        ];
        let index = ParticipationIndex::build(&records, "기타");
        let mut graph = GraphBuilder::with_capacity(2).build(&index);
        graph.assign_communities(&[0, 0], Some(0.0));

        let mut buffer = Vec::new();
        write_graphml(&graph, &mut buffer).unwrap();
        let xml = String::from_utf8(buffer).unwrap();

        assert!(xml.contains("edgedefault=\"undirected\""));
        assert_eq!(xml.matches("<node id=").count(), 2);
        assert_eq!(xml.matches("<edge id=").count(), 1);
        assert!(xml.contains("<data key=\"weight\">2</data>"));
        assert!(xml.contains("<data key=\"movies\">Love &amp; War, Sequel</data>"));
        assert!(xml.contains("<data key=\"community\">0</data>"));
        assert!(xml.trim_end().ends_with("</graphml>"));
    }
}
