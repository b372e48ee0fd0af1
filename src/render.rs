use crate::report::{LogTail, Report, ScheduleStatus};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Human-readable local timestamp, shared by the report body and the mail
/// subject line.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format("%b %-d, %-I:%M %p").to_string()
}

/// Renders the report as a self-contained HTML document. Pure function of
/// the report; never touches a collector.
pub fn render_html(report: &Report) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>System Health Report</title>\n<style>\n\
         body { font-family: Arial, sans-serif; padding: 20px; background-color: #f0f0f0; }\n\
         table { width: 100%; border-collapse: collapse; background-color: #ffffff; }\n\
         th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }\n\
         th { background-color: #e6f7ff; color: #333; text-align: center; }\n\
         pre { white-space: pre-wrap; margin: 0; }\n\
         </style>\n</head>\n<body>\n<table>\n",
    );

    let _ = writeln!(html, "<tr><th colspan=\"2\">System Health Report</th></tr>");
    let _ = writeln!(
        html,
        "<tr><td colspan=\"2\">Report Time: {}</td></tr>",
        format_timestamp(report.generated_at)
    );

    html.push_str("<tr><th colspan=\"2\">System Information</th></tr>\n");
    host_row(&mut html, "Hostname", &report.host.hostname);
    host_row(&mut html, "IP Address", &report.host.ip_address);
    host_row(&mut html, "OS Type", &report.host.os_type);
    host_row(&mut html, "OS Platform", &report.host.os_platform);
    host_row(&mut html, "OS Release", &report.host.os_release);
    host_row(&mut html, "Kernel Name", &report.host.kernel_name);
    host_row(&mut html, "Username", &report.host.username);

    html.push_str("<tr><th colspan=\"2\">VPS Health Metrics</th></tr>\n");
    let _ = writeln!(
        html,
        "<tr><td><strong>Total Memory:</strong></td><td>{:.2} GB</td></tr>",
        report.memory.total_gb
    );
    let _ = writeln!(
        html,
        "<tr><td><strong>Free Memory:</strong></td><td>{:.2} GB</td></tr>",
        report.memory.free_gb
    );
    let _ = writeln!(
        html,
        "<tr><td><strong>CPU Usage (1-min Load Average):</strong></td><td>{:.2}</td></tr>",
        report.memory.load_one
    );

    html.push_str("<tr><th colspan=\"2\">Managed Processes</th></tr>\n");
    if report.processes.is_empty() {
        html.push_str("<tr><td colspan=\"2\">No processes reported</td></tr>\n");
    } else {
        for process in &report.processes {
            let _ = writeln!(
                html,
                "<tr><th>{}</th><td><strong>Memory Usage:</strong> {:.2} MB<br>\
                 <strong>CPU Usage:</strong> {:.2} %</td></tr>",
                escape_html(&process.name),
                process.memory_mb,
                process.cpu_percent
            );
        }
    }

    html.push_str("<tr><th colspan=\"2\">Cron Jobs Status</th></tr>\n");
    match &report.schedule {
        ScheduleStatus::Checked(active) if active.is_empty() => {
            html.push_str(
                "<tr><td colspan=\"2\"><strong>Active Cron Jobs:</strong> Not Running</td></tr>\n\
                 <tr><td colspan=\"2\">No active cron jobs found</td></tr>\n",
            );
        }
        ScheduleStatus::Checked(active) => {
            html.push_str(
                "<tr><td colspan=\"2\"><strong>Active Cron Jobs:</strong> Running</td></tr>\n\
                 <tr><th colspan=\"2\">Path of Running Cron Jobs</th></tr>\n",
            );
            for path in active {
                let _ = writeln!(html, "<tr><td colspan=\"2\">{}</td></tr>", escape_html(path));
            }
        }
        ScheduleStatus::Unknown(cause) => {
            let _ = writeln!(
                html,
                "<tr><td colspan=\"2\"><strong>Active Cron Jobs:</strong> Unknown \
                 (could not read the schedule: {})</td></tr>",
                escape_html(cause)
            );
        }
    }

    for excerpt in &report.logs {
        let _ = writeln!(
            html,
            "<tr><th colspan=\"2\">{} Logs</th></tr>",
            escape_html(&excerpt.service)
        );
        match &excerpt.tail {
            LogTail::Lines(lines) => {
                let _ = writeln!(
                    html,
                    "<tr><td colspan=\"2\"><pre>{}</pre></td></tr>",
                    escape_html(lines)
                );
            }
            LogTail::Unavailable(cause) => {
                let _ = writeln!(
                    html,
                    "<tr><td colspan=\"2\">Logs unavailable: {}</td></tr>",
                    escape_html(cause)
                );
            }
        }
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn host_row(html: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        html,
        "<tr><td><strong>{label}:</strong></td><td>{}</td></tr>",
        escape_html(value)
    );
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{HostSnapshot, LogExcerpt, MemoryLoad, ProcessRecord};
    use chrono::TimeZone;

    fn sample_report() -> Report {
        Report {
            host: HostSnapshot {
                hostname: "vps-01".to_string(),
                ip_address: "N/A".to_string(),
                os_type: "Ubuntu".to_string(),
                os_platform: "linux".to_string(),
                os_release: "22.04".to_string(),
                kernel_name: "Linux".to_string(),
                username: "deploy".to_string(),
            },
            memory: MemoryLoad {
                total_gb: 16.0,
                free_gb: 4.0,
                load_one: 1.23,
            },
            processes: vec![ProcessRecord {
                name: "api".to_string(),
                memory_mb: 204.8,
                cpu_percent: 5.0,
            }],
            schedule: ScheduleStatus::Checked(vec!["/var/www/updateQuotes".to_string()]),
            logs: vec![LogExcerpt {
                service: "Chart-images.service".to_string(),
                tail: LogTail::Lines("started ok".to_string()),
            }],
            generated_at: Local.with_ymd_and_hms(2026, 8, 25, 15, 4, 0).unwrap(),
        }
    }

    #[test]
    fn renders_every_section() {
        let html = render_html(&sample_report());
        assert!(html.contains("System Information"));
        assert!(html.contains("vps-01"));
        assert!(html.contains("N/A"));
        assert!(html.contains("16.00 GB"));
        assert!(html.contains("4.00 GB"));
        assert!(html.contains("1.23"));
        assert!(html.contains("204.80 MB"));
        assert!(html.contains("5.00 %"));
        assert!(html.contains("/var/www/updateQuotes"));
        assert!(html.contains("Chart-images.service Logs"));
        assert!(html.contains("Report Time: Aug 25, 3:04 PM"));
    }

    #[test]
    fn empty_process_list_gets_a_placeholder_row() {
        let mut report = sample_report();
        report.processes.clear();
        let html = render_html(&report);
        assert!(html.contains("No processes reported"));
    }

    #[test]
    fn checked_empty_and_unknown_schedule_render_differently() {
        let mut report = sample_report();

        report.schedule = ScheduleStatus::Checked(vec![]);
        let empty = render_html(&report);
        assert!(empty.contains("Not Running"));
        assert!(empty.contains("No active cron jobs found"));

        report.schedule = ScheduleStatus::Unknown("crontab -l failed".to_string());
        let unknown = render_html(&report);
        assert!(unknown.contains("Unknown (could not read the schedule"));
        assert!(!unknown.contains("No active cron jobs found"));
    }

    #[test]
    fn unavailable_log_renders_its_cause() {
        let mut report = sample_report();
        report.logs[0].tail = LogTail::Unavailable("unit not found".to_string());
        let html = render_html(&report);
        assert!(html.contains("Logs unavailable: unit not found"));
    }

    #[test]
    fn log_content_is_escaped() {
        let mut report = sample_report();
        report.logs[0].tail = LogTail::Lines("<script>alert(1)</script>".to_string());
        let html = render_html(&report);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
