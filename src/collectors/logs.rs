use crate::collectors::{run_capture, CollectorError};

/// Fetches the last `last_lines` journal lines for one systemd service.
/// A non-zero exit or stderr output is a failure; there is no retry.
pub async fn tail(service: &str, last_lines: u32) -> Result<String, CollectorError> {
    let count = last_lines.to_string();
    run_capture(
        "journalctl",
        &["-u", service, "--no-pager", "-n", &count],
        true,
    )
    .await
}
