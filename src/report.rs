use crate::collectors::CollectorError;
use chrono::{DateTime, Local};
use tracing::warn;

/// Known cron job paths the schedule auditor checks for. Static catalog,
/// kept in deployment order; extend it when a new job lands on the box.
pub const SCHEDULE_CATALOG: &[&str] = &[
    "/var/www/updateQuotes",
    "/var/www/stopQuotes",
    "/var/www/updateScreener",
    "/var/www/stopScreener",
    "/var/www/updateChartsImages",
    "/var/www/stopChartsImages",
    "/var/www/updateCharts",
    "/var/www/stopCharts",
    "/var/www/updateAnalysts",
    "/var/www/stopAnalysts",
    "/var/www/updateBreakdown",
    "/var/www/stopBreakdown",
    "/var/www/updateCalendars",
    "/var/www/stopCalendars",
    "/var/www/updateCompaniesProfiles",
    "/var/www/stopCompaniesProfiles",
    "/var/www/updateEconomicCalendar",
    "/var/www/stopEconomicCalendar",
    "/var/www/updateEstimates",
    "/var/www/stopEstimates",
    "/var/www/updateEtfs",
    "/var/www/stopEtfs",
    "/var/www/updateIndustries",
    "/var/www/stopIndustries",
    "/var/www/updateInvestors",
    "/var/www/stopInvestors",
    "/var/www/updateLists",
    "/var/www/stopLists",
    "/var/www/updateMacroeconomicMetrics",
    "/var/www/stopMacroeconomicMetrics",
    "/var/www/updateMovers",
    "/var/www/stopMovers",
    "/var/www/updateNews",
    "/var/www/stopNews",
    "/var/www/updateOperations",
    "/var/www/stopOperations",
    "/var/www/updateOverlayingCharts",
    "/var/www/stopOverlayingCharts",
    "/var/www/updateRatings",
    "/var/www/stopRatings",
    "/var/www/updateRatios",
    "/var/www/stopRatios",
    "/var/www/updateReports",
    "/var/www/stopReports",
    "/var/www/stopSentiment",
    "/var/www/updateSentiment",
    "/var/www/updateHealth",
    "/var/www/deleteHealth",
    "/var/www/sendBreakoutsEmails",
    "/var/www/stopBreakoutsEmails",
    "/var/www/restartCrypto",
    "/var/www/cleanCache",
];

#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub hostname: String,
    pub ip_address: String,
    pub os_type: String,
    pub os_platform: String,
    pub os_release: String,
    pub kernel_name: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct MemoryLoad {
    pub total_gb: f64,
    pub free_gb: f64,
    pub load_one: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub name: String,
    pub memory_mb: f64,
    pub cpu_percent: f64,
}

/// Distinguishes "checked, these are active" (possibly none) from "could
/// not read the schedule at all".
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleStatus {
    Checked(Vec<String>),
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogTail {
    Lines(String),
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct LogExcerpt {
    pub service: String,
    pub tail: LogTail,
}

/// One complete health report. Built once per run and never mutated; a
/// failed collector shows up as a placeholder section, never as a missing
/// one.
#[derive(Debug, Clone)]
pub struct Report {
    pub host: HostSnapshot,
    pub memory: MemoryLoad,
    pub processes: Vec<ProcessRecord>,
    pub schedule: ScheduleStatus,
    pub logs: Vec<LogExcerpt>,
    pub generated_at: DateTime<Local>,
}

impl Report {
    /// Merges collector results unconditionally. Each failure is logged
    /// and downgraded to its section's placeholder.
    pub fn compose(
        host: HostSnapshot,
        memory: MemoryLoad,
        processes: Result<Vec<ProcessRecord>, CollectorError>,
        schedule: Result<Vec<String>, CollectorError>,
        log_tails: Vec<(String, Result<String, CollectorError>)>,
        generated_at: DateTime<Local>,
    ) -> Self {
        let processes = match processes {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "process census failed, reporting an empty list");
                Vec::new()
            }
        };

        let schedule = match schedule {
            Ok(active) => ScheduleStatus::Checked(active),
            Err(err) => {
                warn!(error = %err, "schedule audit failed, reporting unknown status");
                ScheduleStatus::Unknown(err.to_string())
            }
        };

        let logs = log_tails
            .into_iter()
            .map(|(service, tail)| {
                let tail = match tail {
                    Ok(lines) => LogTail::Lines(lines),
                    Err(err) => {
                        warn!(service = %service, error = %err, "log tail failed");
                        LogTail::Unavailable(err.to_string())
                    }
                };
                LogExcerpt { service, tail }
            })
            .collect();

        Report {
            host,
            memory,
            processes,
            schedule,
            logs,
            generated_at,
        }
    }
}
