//! Tests for the confirmation mail transporter lifecycle.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::mail_config::{EMAIL_PASS_ENV, EMAIL_USER_ENV, MockMailEnv};
use crate::domain::ports::{MailTransportError, MockMailTransport, MockMailTransportFactory};

struct FixtureClock(DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[fixture]
fn clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock(
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    ))
}

fn configured_env() -> MockMailEnv {
    let mut env = MockMailEnv::new();
    env.expect_string().returning(|name| match name {
        EMAIL_USER_ENV => Some("mailer@example.com".to_owned()),
        EMAIL_PASS_ENV => Some("app-password".to_owned()),
        _ => None,
    });
    env
}

fn unconfigured_env() -> MockMailEnv {
    let mut env = MockMailEnv::new();
    env.expect_string().returning(|_| None);
    env
}

fn factory_returning(transport: MockMailTransport) -> MockMailTransportFactory {
    let transport: Arc<dyn MailTransport> = Arc::new(transport);
    let mut factory = MockMailTransportFactory::new();
    factory
        .expect_build()
        .times(1)
        .returning(move |_| Ok(Arc::clone(&transport)));
    factory
}

fn transporter(
    env: MockMailEnv,
    factory: MockMailTransportFactory,
    clock: Arc<dyn Clock>,
) -> MailTransporter {
    MailTransporter::new(Arc::new(env), Arc::new(factory), clock)
}

#[rstest]
#[tokio::test]
async fn starts_uninitialized_without_reading_configuration(clock: Arc<dyn Clock>) {
    let mut env = MockMailEnv::new();
    env.expect_string().never();
    let mut factory = MockMailTransportFactory::new();
    factory.expect_build().never();

    let transporter = transporter(env, factory, clock);
    assert_eq!(transporter.status().await, TransporterStatus::Uninitialized);
}

#[rstest]
#[tokio::test]
async fn missing_credentials_yield_configuration_error(clock: Arc<dyn Clock>) {
    let mut factory = MockMailTransportFactory::new();
    factory.expect_build().never();
    let transporter = transporter(unconfigured_env(), factory, clock);

    let err = transporter.initialize().await.expect_err("credentials missing");
    assert!(matches!(err, MailDeliveryError::Configuration { .. }));
    assert_eq!(
        transporter.status().await,
        TransporterStatus::InitializationFailed
    );
}

#[rstest]
#[tokio::test]
async fn initialize_is_idempotent(clock: Arc<dyn Clock>) {
    let mut transport = MockMailTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    transporter.initialize().await.expect("first initialization");
    transporter.initialize().await.expect("cached initialization");
    assert_eq!(transporter.status().await, TransporterStatus::Initialized);
}

#[rstest]
#[tokio::test]
async fn concurrent_initialization_builds_once(clock: Arc<dyn Clock>) {
    let mut transport = MockMailTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    let (first, second) = tokio::join!(transporter.initialize(), transporter.initialize());
    first.expect("first caller initializes");
    second.expect("second caller reuses transport");
}

#[rstest]
#[tokio::test]
async fn failed_verification_is_retried_on_next_call(clock: Arc<dyn Clock>) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut factory = MockMailTransportFactory::new();
    let counter = Arc::clone(&attempts);
    factory.expect_build().times(2).returning(move |_| {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        let mut transport = MockMailTransport::new();
        transport.expect_verify().returning(move || {
            if attempt == 0 {
                Err(MailTransportError::verify("connection refused"))
            } else {
                Ok(())
            }
        });
        Ok(Arc::new(transport) as Arc<dyn MailTransport>)
    });
    let transporter = transporter(configured_env(), factory, clock);

    let err = transporter.initialize().await.expect_err("first attempt fails");
    assert!(matches!(err, MailDeliveryError::Initialization { .. }));
    assert_eq!(
        transporter.status().await,
        TransporterStatus::InitializationFailed
    );

    transporter.initialize().await.expect("second attempt succeeds");
    assert_eq!(transporter.status().await, TransporterStatus::Initialized);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn build_failure_maps_to_initialization_error(clock: Arc<dyn Clock>) {
    let mut factory = MockMailTransportFactory::new();
    factory
        .expect_build()
        .times(1)
        .returning(|_| Err(MailTransportError::build("unknown relay")));
    let transporter = transporter(configured_env(), factory, clock);

    let err = transporter.initialize().await.expect_err("build fails");
    assert_eq!(
        err,
        MailDeliveryError::initialization("mail transport could not be built: unknown relay")
    );
}

#[rstest]
#[tokio::test]
async fn send_delivers_once_with_rendered_content(clock: Arc<dyn Clock>) {
    let mut transport = MockMailTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));
    transport
        .expect_deliver()
        .times(1)
        .withf(|mail| {
            mail.recipient == "ada@example.com"
                && mail.sender_address == "mailer@example.com"
                && mail.sender_name == "ScriptChain Email System"
                && mail.subject == "Welcome to ScriptChain Email System, Ada!"
                && mail.text.contains("Generated on 2025-06-01 09:30:00 UTC")
        })
        .returning(|_| Ok("<id-1@example.com>".to_owned()));
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    let receipt = transporter
        .send_confirmation(" Ada ", "ADA@example.com")
        .await
        .expect("delivery succeeds");
    assert_eq!(receipt.message_id, "<id-1@example.com>");
    assert_eq!(receipt.recipient.as_ref(), "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn send_failure_is_not_retried(clock: Arc<dyn Clock>) {
    let mut transport = MockMailTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));
    transport
        .expect_deliver()
        .times(1)
        .returning(|_| Err(MailTransportError::delivery("550 mailbox unavailable")));
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    let err = transporter
        .send_confirmation("Ada", "ada@example.com")
        .await
        .expect_err("delivery fails");
    assert!(matches!(err, MailDeliveryError::Send { .. }));
    assert_eq!(err.client_message(), "Failed to send confirmation email");
}

#[rstest]
#[tokio::test]
async fn send_propagates_configuration_failure(clock: Arc<dyn Clock>) {
    let mut factory = MockMailTransportFactory::new();
    factory.expect_build().never();
    let transporter = transporter(unconfigured_env(), factory, clock);

    let err = transporter
        .send_confirmation("Ada", "ada@example.com")
        .await
        .expect_err("configuration missing");
    assert!(matches!(err, MailDeliveryError::Configuration { .. }));
}

#[rstest]
#[tokio::test]
async fn send_revalidates_inputs(clock: Arc<dyn Clock>) {
    let mut transport = MockMailTransport::new();
    transport.expect_verify().times(1).returning(|| Ok(()));
    transport.expect_deliver().never();
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    let err = transporter
        .send_confirmation("", "not-an-email")
        .await
        .expect_err("invalid inputs");
    assert_eq!(
        err,
        MailDeliveryError::validation(
            "Name is required and must be a non-empty string; Email must be a valid email address"
        )
    );
}

#[rstest]
#[case(Ok(()), true)]
#[case(Err(MailTransportError::verify("timeout")), false)]
#[tokio::test]
async fn test_connection_reports_reachability(
    clock: Arc<dyn Clock>,
    #[case] second_verify: Result<(), MailTransportError>,
    #[case] expected: bool,
) {
    let mut transport = MockMailTransport::new();
    let mut seq = mockall::Sequence::new();
    transport
        .expect_verify()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    transport
        .expect_verify()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move || second_verify);
    let transporter = transporter(configured_env(), factory_returning(transport), clock);

    let reachable = transporter
        .test_connection()
        .await
        .expect("transport initializes");
    assert_eq!(reachable, expected);
}

#[rstest]
#[tokio::test]
async fn test_connection_surfaces_setup_failure(clock: Arc<dyn Clock>) {
    let mut factory = MockMailTransportFactory::new();
    factory.expect_build().never();
    let transporter = transporter(unconfigured_env(), factory, clock);

    let result = transporter.test_connection().await;
    assert!(matches!(result, Err(MailDeliveryError::Configuration { .. })));
}
