//! Report persistence.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fob_surface::Report;

use crate::error::{Result, ResultExt};

/// `@scope/name` → `scope-name`; anything outside `[A-Za-z0-9._-]` becomes `-`.
pub fn sanitize_package_name(name: &str) -> String {
    let sanitized: String = name
        .trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        "package".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<out_dir>/<sanitized-name>-<YYYYMMDD-HHMMSS>.json`
pub fn report_path(out_dir: &Path, package: &str, now: DateTime<Local>) -> PathBuf {
    out_dir.join(format!(
        "{}-{}.json",
        sanitize_package_name(package),
        now.format("%Y%m%d-%H%M%S")
    ))
}

/// Serialize `report` and write it under `out_dir`. Returns the file path
/// and the JSON text.
pub async fn write_report(out_dir: &Path, report: &Report, now: DateTime<Local>) -> Result<(PathBuf, String)> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::create_dir_all(out_dir)
        .await
        .context(format!("Failed to create output directory {}", out_dir.display()))?;

    let path = report_path(out_dir, &report.package, now);
    tokio::fs::write(&path, &json).await.with_path(&path)?;
    Ok((path, json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fob_surface::ReportBuilder;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_sanitize_package_name() {
        assert_eq!(sanitize_package_name("@acme/ui-kit"), "acme-ui-kit");
        assert_eq!(sanitize_package_name("left-pad"), "left-pad");
        assert_eq!(sanitize_package_name("we ird:name"), "we-ird-name");
        assert_eq!(sanitize_package_name("@/"), "package");
    }

    #[test]
    fn test_report_path_format() {
        let path = report_path(Path::new("reports"), "@acme/ui", fixed_time());
        assert_eq!(path, PathBuf::from("reports/acme-ui-20240309-070501.json"));
    }

    #[tokio::test]
    async fn test_write_report_creates_directory() {
        let temp = TempDir::new().unwrap();
        let out_dir = temp.path().join("nested/reports");
        let report = ReportBuilder::new().finish("pkg".into(), None, Vec::new());

        let (path, json) = write_report(&out_dir, &report, fixed_time()).await.unwrap();
        assert_eq!(path, out_dir.join("pkg-20240309-070501.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["package"], "pkg");
    }
}
