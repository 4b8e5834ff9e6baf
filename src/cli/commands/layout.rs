//! Layout command: which columns hold which feature block

use clap::Parser;
use serde::Serialize;

use super::super::output::{table_row, write_output};
use super::super::parser::{OutputFormat, TypeArgs};

use crate::FeatureLayout;

/// Show the column layout of the feature vector
#[derive(Parser, Debug)]
pub struct LayoutArgs {
    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Type configuration
    #[command(flatten)]
    pub types: TypeArgs,
}

/// One column group of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroup {
    /// Span length.
    pub n: usize,
    /// Block name.
    pub block: &'static str,
    /// Family that fills the block.
    pub family: &'static str,
    /// First column.
    pub start: usize,
    /// One past the last column.
    pub end: usize,
}

/// Column groups of `layout` in vector order.
pub fn column_groups(layout: &FeatureLayout) -> Vec<ColumnGroup> {
    layout
        .columns()
        .map(|(n, block, range)| ColumnGroup {
            n,
            block: block.name(),
            family: block.family().name(),
            start: range.start,
            end: range.end,
        })
        .collect()
}

/// Render the layout for `labels`.
pub fn render_layout(labels: &[String], layout: &FeatureLayout, format: OutputFormat) -> Result<String, String> {
    let groups = column_groups(layout);
    match format {
        OutputFormat::Json => {
            let doc = serde_json::json!({
                "types": labels,
                "span_width": layout.span_width(),
                "width": layout.width(),
                "columns": groups,
            });
            serde_json::to_string_pretty(&doc)
                .map(|s| s + "\n")
                .map_err(|e| format!("Failed to serialize layout: {}", e))
        }
        OutputFormat::Human => {
            let widths = [3, 14, 8];
            let mut out = format!(
                "Types: {} (T={})\nWidth: {} = 3 x (9T + 3)\n\n",
                labels.join(","),
                layout.num_types(),
                layout.width()
            );
            out.push_str(&table_row(&["n", "block", "family", "columns"], &widths));
            for g in &groups {
                out.push_str(&table_row(
                    &[
                        &g.n.to_string(),
                        g.block,
                        g.family,
                        &format!("{}..{}", g.start, g.end),
                    ],
                    &widths,
                ));
            }
            Ok(out)
        }
    }
}

/// Print the layout for the resolved type list.
pub fn cmd_layout(args: LayoutArgs) -> Result<(), String> {
    let config = args.types.resolve()?;
    let registry = config.registry().map_err(|e| e.to_string())?;
    let layout = FeatureLayout::new(registry.num_types());
    write_output(&render_layout(registry.labels(), &layout, args.format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_tile_the_vector() {
        let layout = FeatureLayout::new(2);
        let groups = column_groups(&layout);
        assert_eq!(groups.len(), 15);
        assert_eq!(groups[0].start, 0);
        for pair in groups.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(groups[14].end, layout.width());
        assert_eq!(groups[14].block, "margins");
        assert_eq!(groups[14].n, 3);
    }

    #[test]
    fn human_rendering_lists_every_group() {
        let labels = vec!["LOC".to_string(), "PER".to_string()];
        let text = render_layout(&labels, &FeatureLayout::new(2), OutputFormat::Human).unwrap();
        assert!(text.contains("Width: 63"));
        assert_eq!(text.matches("top30_counts").count(), 3);
    }

    #[test]
    fn json_rendering() {
        let labels = vec!["LOC".to_string()];
        let text = render_layout(&labels, &FeatureLayout::new(1), OutputFormat::Json).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["width"], 36);
        assert_eq!(doc["columns"][0]["block"], "top1");
    }
}
