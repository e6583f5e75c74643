//! Terminal output on stderr.

use std::path::Path;

use fob_surface::{CategoryReport, Report};
use owo_colors::OwoColorize;

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Documentation coverage as a percentage; an empty bucket counts as fully
/// covered.
pub fn coverage(category: &CategoryReport) -> f64 {
    if category.total() == 0 {
        return 100.0;
    }
    category.documented_count() as f64 * 100.0 / category.total() as f64
}

fn category_line(label: &str, category: &CategoryReport) -> String {
    format!(
        "  {} {:<9} {:>5} total, {:>5} documented ({:.1}%)",
        "▸".blue(),
        label,
        category.total(),
        category.documented_count(),
        coverage(category)
    )
}

/// Per-category counts, the report location and any recorded errors.
pub fn print_summary(report: &Report, path: &Path) {
    let width = console::Term::stderr().size().1 as usize;
    let rule = "─".repeat(width.clamp(20, 80));

    eprintln!("\n{}", format!("API surface of {}", report.package).bold().underline());
    eprintln!("{rule}");
    eprintln!("{}", category_line("values", &report.value));
    eprintln!("{}", category_line("types", &report.ty));
    eprintln!("{}", category_line("exposures", &report.exposure));
    eprintln!(
        "  {} {} modules, {} external re-exports, {} externally originated",
        "▸".blue(),
        report.modules.len(),
        report.re_exports.len(),
        report.externally_originated.len()
    );
    eprintln!("{rule}");

    if !report.errors.is_empty() {
        warning(&format!("{} problem(s) recorded in the report", report.errors.len()));
    }
    success(&format!("Report written to {}", path.display()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use fob_surface::{Category, ExportRecord, ReportBuilder};

    #[test]
    fn test_coverage() {
        let mut builder = ReportBuilder::new();
        builder.push(ExportRecord::new("a", Category::Value, true));
        builder.push(ExportRecord::new("b", Category::Value, false));
        builder.push(ExportRecord::new("c", Category::Value, false));
        builder.push(ExportRecord::new("d", Category::Value, true));
        let report = builder.finish("pkg".into(), None, Vec::new());

        assert_eq!(coverage(&report.value), 50.0);
        assert_eq!(coverage(&report.ty), 100.0);
    }
}
