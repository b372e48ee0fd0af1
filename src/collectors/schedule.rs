use crate::collectors::{run_capture, CollectorError};

/// Reads the live crontab and reports which catalog entries appear in it,
/// in catalog order. A non-zero exit or any stderr output from `crontab -l`
/// is a failure; the composer renders that as an unknown status rather than
/// an empty one.
pub async fn audit(catalog: &[&str]) -> Result<Vec<String>, CollectorError> {
    let table = run_capture("crontab", &["-l"], true).await?;
    Ok(match_catalog(catalog, &table))
}

/// Fuzzy containment match: an entry is active iff its string appears
/// anywhere in the raw table text. Deliberately not a cron parse; it
/// tolerates arbitrary schedule expressions and comments around the path.
pub fn match_catalog(catalog: &[&str], table: &str) -> Vec<String> {
    catalog
        .iter()
        .filter(|entry| table.contains(**entry))
        .map(|entry| entry.to_string())
        .collect()
}
