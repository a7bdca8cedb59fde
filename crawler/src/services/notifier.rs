use crate::models::VideoRecord;
use crate::services::report::generate_html_report;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{error, info, warn};
use std::fmt;

#[derive(Clone, PartialEq)]
pub struct EmailPublisher {
    pub smtp_server: Option<String>,
    pub smtp_port: u16,
    pub email_user: Option<String>,
    pub email_password: Option<String>,
}

impl fmt::Debug for EmailPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailPublisher")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("email_user", &self.email_user)
            .field("email_password", &self.email_password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl EmailPublisher {
    pub fn new(
        smtp_server: Option<String>,
        smtp_port: u16,
        email_user: Option<String>,
        email_password: Option<String>,
    ) -> Self {
        Self {
            smtp_server,
            smtp_port,
            email_user,
            email_password,
        }
    }

    fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_empty(&self.smtp_server)?,
            non_empty(&self.email_user)?,
            non_empty(&self.email_password)?,
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    pub fn default_subject() -> String {
        format!(
            "Weekly AI News Roundup - {}",
            Local::now().format("%B %d, %Y")
        )
    }

    /// Mail the digest. Returns `false` when email is not configured or delivery fails.
    pub async fn send_email_report(
        &self,
        videos: &[VideoRecord],
        recipients: &[String],
        subject: Option<&str>,
    ) -> bool {
        let Some((server, user, password)) = self.credentials() else {
            warn!("Email configuration not set up");
            return false;
        };

        let subject = subject
            .map(String::from)
            .unwrap_or_else(Self::default_subject);
        let html_content = generate_html_report(videos);

        match self
            .deliver(server, user, password, recipients, &subject, html_content)
            .await
        {
            Ok(()) => {
                info!("Email sent to {} recipients", recipients.len());
                true
            }
            Err(e) => {
                error!("Error sending email: {e:?}");
                false
            }
        }
    }

    async fn deliver(
        &self,
        server: &str,
        user: &str,
        password: &str,
        recipients: &[String],
        subject: &str,
        html_content: String,
    ) -> Result<()> {
        let message = build_message(user, recipients, subject, html_content)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
            .with_context(|| format!("Failed to set up STARTTLS relay {server}"))?
            .port(self.smtp_port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        mailer.send(message).await?;
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn build_message(
    from: &str,
    recipients: &[String],
    subject: &str,
    html_content: String,
) -> Result<Message> {
    if recipients.is_empty() {
        return Err(anyhow!("No recipients given"));
    }

    let mut builder = Message::builder()
        .from(from.parse().with_context(|| format!("Invalid sender address {from}"))?)
        .subject(subject);

    for recipient in recipients {
        builder = builder.to(recipient
            .parse()
            .with_context(|| format!("Invalid recipient address {recipient}"))?);
    }

    let message = builder.multipart(
        MultiPart::alternative().singlepart(SinglePart::html(html_content)),
    )?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EmailPublisher {
        EmailPublisher::new(
            Some("smtp.example.com".to_string()),
            587,
            Some("bot@example.com".to_string()),
            Some("secret".to_string()),
        )
    }

    #[tokio::test]
    async fn unset_fields_disable_sending() {
        let recipients = vec!["reader@example.com".to_string()];

        let mut no_server = configured();
        no_server.smtp_server = None;
        let mut no_user = configured();
        no_user.email_user = None;
        let mut no_password = configured();
        no_password.email_password = Some(String::new());

        for publisher in [no_server, no_user, no_password] {
            assert!(!publisher.is_configured());
            assert!(!publisher.send_email_report(&[], &recipients, None).await);
        }
    }

    #[test]
    fn complete_configuration_is_enabled() {
        assert!(configured().is_configured());
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn default_subject_names_the_digest() {
        assert!(EmailPublisher::default_subject().starts_with("Weekly AI News Roundup - "));
    }

    #[test]
    fn message_is_addressed_to_all_recipients() {
        let recipients = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let message =
            build_message("bot@example.com", &recipients, "Digest", "<p>hi</p>".to_string()).unwrap();

        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("To: a@example.com, b@example.com"));
        assert!(formatted.contains("From: bot@example.com"));
        assert!(formatted.contains("Subject: Digest"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/html"));
    }

    #[test]
    fn invalid_addresses_are_errors() {
        assert!(build_message("not an address", &["a@example.com".to_string()], "s", String::new()).is_err());
        assert!(build_message("bot@example.com", &["nope".to_string()], "s", String::new()).is_err());
        assert!(build_message("bot@example.com", &[], "s", String::new()).is_err());
    }
}
