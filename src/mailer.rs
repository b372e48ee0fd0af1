use crate::render::format_timestamp;
use chrono::{DateTime, Local};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build the report message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Fully resolved mail settings. Credentials and the recipient are pulled
/// from the environment in `main`; the pipeline itself never reads env
/// vars.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// One-shot SMTP dispatcher. A single send attempt per run, no retry.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: settings.from.parse()?,
            to: settings.to.parse()?,
        })
    }

    /// Sends the rendered report once and returns the transport's response
    /// code as the delivery receipt.
    pub async fn send(
        &self,
        html: String,
        generated_at: DateTime<Local>,
    ) -> Result<String, MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(generated_at))
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        let response = self.transport.send(message).await?;
        Ok(response.code().to_string())
    }
}

pub fn subject(generated_at: DateTime<Local>) -> String {
    format!("VPS Health Report {}", format_timestamp(generated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn subject_carries_the_run_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 8, 25, 15, 4, 0).unwrap();
        assert_eq!(subject(at), "VPS Health Report Aug 25, 3:04 PM");
    }

    #[test]
    fn morning_hours_render_without_padding() {
        let at = Local.with_ymd_and_hms(2026, 1, 2, 9, 5, 0).unwrap();
        assert_eq!(subject(at), "VPS Health Report Jan 2, 9:05 AM");
    }

    #[test]
    fn mailer_rejects_a_malformed_address() {
        let settings = MailSettings {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: "reports@example.com".to_string(),
            password: "secret".to_string(),
            from: "not an address".to_string(),
            to: "ops@example.com".to_string(),
        };
        assert!(matches!(Mailer::new(&settings), Err(MailError::Address(_))));
    }
}
