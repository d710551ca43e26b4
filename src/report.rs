//! Format comparison results as text or JSON.

use crate::diff::Comparison;
use crate::error::SyncError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline. Respects NO_COLOR and TTY.
fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Human-readable comparison report.
pub fn format_comparison_text(cmp: &Comparison) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading("Notebook Comparison")
    ));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Notebook", "Location"]);
    for path in &cmp.in_both {
        table.add_row(vec![path.as_str(), "both"]);
    }
    for path in &cmp.only_remote {
        table.add_row(vec![path.as_str(), "workspace only"]);
    }
    for path in &cmp.only_local {
        table.add_row(vec![path.as_str(), "local only"]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!(
        "Both: {}  Workspace only: {}  Local only: {}\n",
        cmp.in_both.len(),
        cmp.only_remote.len(),
        cmp.only_local.len()
    ));
    out.push_str(&format!(
        "Workspace has env file: {}\n",
        if cmp.remote_has_envfile { "yes" } else { "no" }
    ));
    out
}

/// Machine-readable comparison report.
pub fn format_comparison_json(cmp: &Comparison) -> Result<String, SyncError> {
    serde_json::to_string_pretty(cmp)
        .map_err(|e| SyncError::Config(format!("failed to serialize comparison: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compare;
    use crate::listing::TreeSnapshot;
    use crate::paths::NotebookPath;

    fn sample() -> Comparison {
        let local: TreeSnapshot = ["a", "b"].iter().map(|p| NotebookPath::new(*p)).collect();
        let remote: TreeSnapshot = ["b", "c"].iter().map(|p| NotebookPath::new(*p)).collect();
        compare(&local, &remote, &NotebookPath::new("_functions/env"))
    }

    #[test]
    fn text_report_mentions_every_partition() {
        let out = format_comparison_text(&sample());
        assert!(out.contains("both"));
        assert!(out.contains("workspace only"));
        assert!(out.contains("local only"));
        assert!(out.contains("env file: no"));
    }

    #[test]
    fn json_report_has_required_fields() {
        let out = format_comparison_json(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["in_both"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["only_remote"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["only_local"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["remote_has_envfile"], serde_json::json!(false));
    }
}
