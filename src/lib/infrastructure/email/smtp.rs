//! SMTP delivery service implementation

use std::{ffi::OsStr, fmt, path::Path, sync::Arc};

use async_trait::async_trait;
use clap::Parser;
use lettre::message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart};
use tokio::{fs, time};
use tracing::debug;

use crate::domain::comms::mailer::{errors::DeliveryError, Mailer, Message, DELIVERY_TIMEOUT};

use super::transport::{MailTransport, SmtpRelay};

/// SMTP configuration
#[derive(Clone, Default, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// Display name shown as the sender
    #[clap(long, env = "EMAIL_SENDER_NAME", default_value = "")]
    pub sender_name: String,

    /// Authenticated sender address
    #[clap(long, env = "EMAIL_SENDER_ADDRESS", default_value = "")]
    pub sender_address: String,

    /// Sender account password
    #[clap(long, env = "EMAIL_SENDER_PASSWORD", default_value = "")]
    pub sender_password: String,

    /// Verify the TLS certificate
    #[clap(
        long,
        env = "SMTP_VERIFY_TLS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub verify_tls: bool,
}

impl SmtpConfig {
    /// Whether enough of the sender account is present to attempt delivery.
    pub fn is_configured(&self) -> bool {
        !self.sender_address.is_empty() && !self.sender_password.is_empty()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender_name", &self.sender_name)
            .field("sender_address", &self.sender_address)
            .field("sender_password", &"[redacted]")
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

/// SMTP mailer
///
/// Stages attachments, composes the outbound message, and races the send
/// against [`DELIVERY_TIMEOUT`]. One connection per call, no retries, no
/// state shared between calls.
#[derive(Debug)]
pub struct SmtpMailer<T: MailTransport = SmtpRelay> {
    config: SmtpConfig,
    transport: Arc<T>,
}

// not derived: the transport itself does not need to be Clone
impl<T: MailTransport> Clone for SmtpMailer<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl SmtpMailer {
    /// Create a mailer that delivers through the configured SMTP relay.
    /// Performs no I/O; a connection is only opened inside `deliver`.
    pub fn new(config: SmtpConfig) -> Self {
        let relay = SmtpRelay::new(config.clone());

        Self::with_transport(config, relay)
    }
}

impl<T: MailTransport> SmtpMailer<T> {
    /// Create a mailer over a custom transport, so tests can substitute a
    /// deterministic one without touching the deadline logic.
    pub fn with_transport(config: SmtpConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    fn sender(&self) -> Result<Mailbox, DeliveryError> {
        let mailbox = if self.config.sender_name.is_empty() {
            self.config.sender_address.parse()
        } else {
            format!(
                "{} <{}>",
                self.config.sender_name, self.config.sender_address
            )
            .parse()
        };

        mailbox.map_err(|err: lettre::address::AddressError| DeliveryError::Transport(err.into()))
    }

    /// Reads every attachment and builds the outbound message. Runs before
    /// any network I/O; the first unreadable attachment aborts the call.
    async fn compose(&self, message: &Message) -> Result<lettre::Message, DeliveryError> {
        let mut attachments = Vec::with_capacity(message.attachments.len());

        for path in &message.attachments {
            let content = fs::read(path)
                .await
                .map_err(|source| DeliveryError::Attachment {
                    path: path.clone(),
                    source,
                })?;

            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            attachments.push(Attachment::new(filename).body(content, content_type_for(path)));
        }

        let mut builder = lettre::Message::builder()
            .from(self.sender()?)
            .subject(message.subject.clone());

        for to in &message.to {
            builder = builder.to(parse_address(to)?);
        }

        for cc in &message.cc {
            builder = builder.cc(parse_address(cc)?);
        }

        for bcc in &message.bcc {
            builder = builder.bcc(parse_address(bcc)?);
        }

        let html = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone());

        let email = if attachments.is_empty() {
            builder.singlepart(html)
        } else {
            let mut parts = MultiPart::mixed().singlepart(html);

            for attachment in attachments {
                parts = parts.singlepart(attachment);
            }

            builder.multipart(parts)
        };

        email.map_err(|err| DeliveryError::Transport(err.into()))
    }
}

#[async_trait]
impl<T: MailTransport> Mailer for SmtpMailer<T> {
    async fn deliver(&self, message: Message) -> Result<(), DeliveryError> {
        let email = self.compose(&message).await?;

        debug!(to = ?message.to, "sending email");

        let transport = Arc::clone(&self.transport);
        let send = tokio::spawn(async move { transport.send(email).await });

        tokio::select! {
            joined = send => match joined {
                Ok(result) => result.map_err(DeliveryError::Transport),
                Err(err) => Err(DeliveryError::Transport(err.into())),
            },
            // dropping the join handle detaches the in-flight send
            () = time::sleep(DELIVERY_TIMEOUT) => Err(DeliveryError::Timeout),
        }
    }
}

fn parse_address(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|err: lettre::address::AddressError| DeliveryError::Transport(err.into()))
}

fn content_type_for(path: &Path) -> ContentType {
    ContentType::parse(mime_for(path)).expect("static content type")
}

/// Content type for an attachment, from its file extension.
fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => "text/csv",
        Some("gif") => "image/gif",
        Some("htm" | "html") => "text/html",
        Some("jpeg" | "jpg") => "image/jpeg",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use anyhow::anyhow;
    use testresult::TestResult;
    use tokio::time::Instant;

    use super::*;

    #[derive(Debug, Default)]
    struct StubTransport {
        sends: Arc<AtomicUsize>,
        delay: Option<Duration>,
        fail_with: Option<String>,
    }

    impl StubTransport {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        fn with_failure(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }

        fn sends(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.sends)
        }
    }

    #[async_trait]
    impl MailTransport for StubTransport {
        async fn send(&self, _message: lettre::Message) -> anyhow::Result<()> {
            self.sends.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                time::sleep(delay).await;
            }

            match &self.fail_with {
                Some(message) => Err(anyhow!("{message}")),
                None => Ok(()),
            }
        }
    }

    fn test_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            sender_name: "Relay".to_string(),
            sender_address: "relay@example.com".to_string(),
            sender_password: "hunter2".to_string(),
            verify_tls: true,
        }
    }

    fn test_message() -> Message {
        Message::new("Hi", "<p>hi</p>", vec!["a@x.com".to_string()])
    }

    #[tokio::test]
    async fn test_deliver_success_without_attachments() -> TestResult {
        let stub = StubTransport::default();
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        mailer.deliver(test_message()).await?;

        assert_eq!(sends.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_attachment_fails_before_any_send() -> TestResult {
        let stub = StubTransport::default();
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let mut message = test_message();
        message.attachments = vec![PathBuf::from("/missing/file.txt")];

        let result = mailer.deliver(message).await;

        let Err(DeliveryError::Attachment { path, .. }) = &result else {
            panic!("expected an attachment error, got {result:?}");
        };

        assert_eq!(path, &PathBuf::from("/missing/file.txt"));
        assert_eq!(sends.load(Ordering::SeqCst), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_transport_failure_before_deadline() -> TestResult {
        let stub = StubTransport::with_failure("535 authentication failed");
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let result = mailer.deliver(test_message()).await;

        let Err(DeliveryError::Transport(err)) = &result else {
            panic!("expected a transport error, got {result:?}");
        };

        assert!(err.to_string().contains("535"));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_transport_times_out_at_the_deadline() -> TestResult {
        let stub = StubTransport::with_delay(Duration::from_secs(35));
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let started = Instant::now();
        let result = mailer.deliver(test_message()).await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(DeliveryError::Timeout)));
        // the call returns at the deadline, before the stub's sleep finishes
        assert!(elapsed >= DELIVERY_TIMEOUT);
        assert!(elapsed < Duration::from_secs(35));
        assert_eq!(sends.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_attachment_is_staged_before_a_send_that_times_out() -> TestResult {
        let path = std::env::temp_dir().join("notification-relay-staged-attachment.txt");
        std::fs::write(&path, b"quarterly report")?;

        let stub = StubTransport::with_delay(Duration::from_secs(35));
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let mut message = test_message();
        message.attachments = vec![path.clone()];

        let result = mailer.deliver(message).await;

        assert!(matches!(result, Err(DeliveryError::Timeout)));
        assert_eq!(sends.load(Ordering::SeqCst), 1);

        std::fs::remove_file(&path).ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_recipient_list_is_rejected_by_the_transport_layer() -> TestResult {
        let stub = StubTransport::default();
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let result = mailer.deliver(Message::new("Hi", "<p>hi</p>", vec![])).await;

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
        assert_eq!(sends.load(Ordering::SeqCst), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_deliveries_are_independent() -> TestResult {
        let stub = StubTransport::default();
        let sends = stub.sends();
        let mailer = SmtpMailer::with_transport(test_config(), stub);

        let mut handles = Vec::new();

        for n in 0..8 {
            let mailer = mailer.clone();

            handles.push(tokio::spawn(async move {
                mailer
                    .deliver(Message::new(
                        format!("Hi {n}"),
                        "<p>hi</p>",
                        vec![format!("user{n}@example.com")],
                    ))
                    .await
            }));
        }

        for handle in handles {
            handle.await??;
        }

        assert_eq!(sends.load(Ordering::SeqCst), 8);

        Ok(())
    }

    #[test]
    fn test_config_debug_redacts_the_password() {
        let rendered = format!("{:?}", test_config());

        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_content_type_falls_back_to_octet_stream() {
        assert_eq!(mime_for(Path::new("/tmp/report.pdf")), "application/pdf");
        assert_eq!(
            mime_for(Path::new("/tmp/archive.tar.xz")),
            "application/octet-stream"
        );
    }
}
