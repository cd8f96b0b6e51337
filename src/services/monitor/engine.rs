use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::Config;
use crate::modules::homework::{check_response, Homework, HomeworkStatus, LookupError, ValidationError};
use crate::services::monitor::ticker::Ticker;
use crate::services::practicum::{PracticumClient, StatusSource, TransportError};
use crate::services::telegram::{Notifier, TelegramBot};

const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Failure of a single poll; the loop logs it and waits for the next tick
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl PollError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Validation(_) => "validation",
            Self::Lookup(_) => "lookup",
        }
    }
}

/// Result of a poll that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing submitted yet
    NoHomeworks,
    Unchanged(HomeworkStatus),
    Notified(Homework),
    /// Telegram rejected the message; the transition is retried next tick
    DeliveryFailed(Homework),
}

/// Process-local loop state, rebuilt on every start
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    pub last_status: Option<HomeworkStatus>,
    pub last_message: String,
    pub cursor: i64,
    /// Time of the last poll that completed without error
    pub last_polled_at: Option<DateTime<Utc>>,
    pub poll_count: u64,
}

pub struct MonitorEngine {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    report_errors: bool,
    state: LoopState,
}

impl MonitorEngine {
    pub fn new(source: Arc<dyn StatusSource>, notifier: Arc<dyn Notifier>, start_cursor: i64) -> Self {
        Self {
            source,
            notifier,
            report_errors: true,
            state: LoopState {
                cursor: start_cursor,
                ..LoopState::default()
            },
        }
    }

    /// Wire the production HTTP clients from configuration
    pub fn from_config(config: &Config) -> Self {
        let source = PracticumClient::new(
            config.practicum_token.clone(),
            config.endpoint.clone(),
            config.request_timeout,
        );
        let notifier = TelegramBot::new(
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            config.telegram_chat_id.clone(),
            config.request_timeout,
        );

        Self::new(Arc::new(source), Arc::new(notifier), config.start_cursor)
            .with_error_reports(config.report_errors)
    }

    pub fn with_error_reports(mut self, enabled: bool) -> Self {
        self.report_errors = enabled;
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Poll on every tick until the ticker is exhausted
    pub async fn run<T: Ticker>(&mut self, mut ticker: T) {
        tracing::info!(cursor = self.state.cursor, "Homework status monitor started");

        while ticker.tick().await {
            match self.poll_once().await {
                Ok(PollOutcome::NoHomeworks) => {
                    tracing::info!("No homework under review yet");
                }
                Ok(PollOutcome::Unchanged(status)) => {
                    tracing::info!(%status, polled_at = ?self.state.last_polled_at, "Homework status unchanged");
                }
                Ok(PollOutcome::Notified(homework)) => {
                    tracing::info!(
                        homework = %homework.name,
                        status = %homework.status,
                        polled_at = ?self.state.last_polled_at,
                        "Status change delivered"
                    );
                }
                Ok(PollOutcome::DeliveryFailed(homework)) => {
                    tracing::warn!(homework = %homework.name, "Status change not delivered, will retry");
                }
                Err(e) => {
                    tracing::error!(kind = e.kind(), error = %e, "Poll failed");
                    self.report_failure(&e).await;
                }
            }
        }

        tracing::info!(polls = self.state.poll_count, "Homework status monitor stopped");
    }

    /// One fetch → validate → format → notify pass.
    ///
    /// Errors leave the state untouched so the next tick repeats the same
    /// request with the same cursor.
    pub async fn poll_once(&mut self) -> Result<PollOutcome, PollError> {
        let body = self.source.fetch(self.state.cursor).await?;
        let response = check_response(&body)?;

        let Some(record) = response.latest() else {
            self.commit(response.current_date);
            return Ok(PollOutcome::NoHomeworks);
        };

        let homework = Homework::from_record(record)?;
        if self.state.last_status == Some(homework.status) {
            self.commit(response.current_date);
            return Ok(PollOutcome::Unchanged(homework.status));
        }

        let message = homework.message();
        match self.notifier.send_message(&message).await {
            Ok(()) => {
                self.state.last_status = Some(homework.status);
                self.state.last_message = message;
                self.commit(response.current_date);
                Ok(PollOutcome::Notified(homework))
            }
            Err(_) => Ok(PollOutcome::DeliveryFailed(homework)),
        }
    }

    fn commit(&mut self, current_date: Option<i64>) {
        if let Some(cursor) = current_date {
            self.state.cursor = cursor;
        }
        self.state.last_polled_at = Some(Utc::now());
        self.state.poll_count += 1;
    }

    async fn report_failure(&mut self, error: &PollError) {
        if !self.report_errors {
            return;
        }

        let message = format!("{}: {}", FAILURE_PREFIX, error);
        if message == self.state.last_message {
            return;
        }

        match self.notifier.send_message(&message).await {
            Ok(()) => self.state.last_message = message,
            Err(e) => tracing::error!(error = %e, "Failed to report poll failure"),
        }
    }
}
