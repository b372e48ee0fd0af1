use crate::collectors::{round2, run_capture, CollectorError};
use crate::report::ProcessRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Pm2Process {
    name: String,
    monit: Pm2Monit,
}

#[derive(Debug, Deserialize)]
struct Pm2Monit {
    memory: u64,
    cpu: f64,
}

/// Queries pm2 for every supervised process. Order is preserved as pm2
/// returned it.
pub async fn census() -> Result<Vec<ProcessRecord>, CollectorError> {
    let raw = run_capture("pm2", &["jlist"], false).await?;
    parse_process_list(&raw)
}

fn parse_process_list(raw: &str) -> Result<Vec<ProcessRecord>, CollectorError> {
    let processes: Vec<Pm2Process> = serde_json::from_str(raw)?;
    Ok(processes
        .into_iter()
        .map(|process| ProcessRecord {
            name: process.name,
            memory_mb: round2(process.monit.memory as f64 / (1024.0 * 1024.0)),
            cpu_percent: round2(process.monit.cpu),
        })
        .collect())
}
