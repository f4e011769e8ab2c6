//! Long-poll runner
//!
//! Fetches updates in a loop and handles every message on its own task, so a
//! slow send or a panicking handler never stalls the loop. On shutdown the
//! loop stops polling and gives in-flight messages a short grace period.

use crate::config::BotConfig;
use crate::error::Result;
use crate::handler::MessageHandler;
use crate::retry::RetryPolicy;
use crate::telegram::{OutgoingMessage, Update, User};
use crate::transport::Transport;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Drives a [`Transport`] with a [`MessageHandler`]
pub struct BotRunner {
    transport: Arc<dyn Transport>,
    handler: Arc<MessageHandler>,
    poll_timeout: Duration,
    shutdown_grace: Duration,
    poll_retry: RetryPolicy,
    send_retry: RetryPolicy,
}

impl BotRunner {
    /// Create a runner using timeouts from `config`
    pub fn new(
        transport: Arc<dyn Transport>,
        handler: Arc<MessageHandler>,
        config: &BotConfig,
    ) -> Self {
        Self {
            transport,
            handler,
            poll_timeout: config.poll_timeout,
            shutdown_grace: config.shutdown_grace,
            poll_retry: RetryPolicy::polling(),
            send_retry: RetryPolicy::default(),
        }
    }

    /// Override the pacing used after failed polls
    pub fn with_poll_retry(mut self, policy: RetryPolicy) -> Self {
        self.poll_retry = policy;
        self
    }

    /// Override the retry policy for outgoing messages
    pub fn with_send_retry(mut self, policy: RetryPolicy) -> Self {
        self.send_retry = policy;
        self
    }

    /// Check the credentials and return the bot's own identity
    pub async fn authenticate(&self) -> Result<User> {
        let me = self.transport.get_me().await?;
        info!("Authorized as {}", me.handle());
        Ok(me)
    }

    /// Run until `shutdown` completes
    ///
    /// Only a failed authentication ends the run with an error. Poll failures
    /// are logged and retried with backoff.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        self.authenticate().await?;
        info!("Bot started, waiting for messages");

        tokio::pin!(shutdown);
        let mut tasks = JoinSet::new();
        let mut offset = 0_i64;
        let mut failures = 0_u32;

        loop {
            while let Some(finished) = tasks.try_join_next() {
                log_task_result(finished);
            }

            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown signal received, stopping");
                    break;
                }
                polled = self.transport.get_updates(offset, self.poll_timeout) => match polled {
                    Ok(updates) => {
                        failures = 0;
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            self.dispatch(&mut tasks, update);
                        }
                    }
                    Err(e) => {
                        failures = failures.saturating_add(1);
                        let backoff = self.poll_retry.backoff_duration(failures);
                        warn!("Failed to fetch updates (attempt {}): {}. Retrying in {:?}", failures, e, backoff);
                        tokio::select! {
                            () = &mut shutdown => {
                                info!("Shutdown signal received, stopping");
                                break;
                            }
                            () = sleep(backoff) => {}
                        }
                    }
                }
            }
        }

        self.drain(tasks).await;
        info!("Bot stopped");
        Ok(())
    }

    fn dispatch(&self, tasks: &mut JoinSet<()>, update: Update) {
        let Some(message) = update.message else {
            debug!(update_id = update.update_id, "Skipping update without message");
            return;
        };
        let Some(text) = message.text.clone() else {
            debug!(update_id = update.update_id, "Skipping message without text");
            return;
        };

        let transport = Arc::clone(&self.transport);
        let handler = Arc::clone(&self.handler);
        let send_retry = self.send_retry.clone();

        tasks.spawn(async move {
            let Some(reply) = handler.handle(&text) else {
                return;
            };

            let outgoing = OutgoingMessage::reply_to(&message, reply);
            if let Err(e) = send_retry
                .execute("sendMessage", || transport.send_message(outgoing.clone()))
                .await
            {
                error!(chat_id = message.chat.id, "Failed to send reply: {}", e);
            }
        });
    }

    async fn drain(&self, mut tasks: JoinSet<()>) {
        if tasks.is_empty() {
            return;
        }

        info!(pending = tasks.len(), "Waiting for in-flight messages");
        let finished = tokio::time::timeout(self.shutdown_grace, async {
            while let Some(result) = tasks.join_next().await {
                log_task_result(result);
            }
        })
        .await;

        if finished.is_err() {
            warn!(
                aborted = tasks.len(),
                "Grace period elapsed, aborting remaining messages"
            );
            tasks.abort_all();
        }
    }
}

fn log_task_result(result: std::result::Result<(), JoinError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_panic() => error!("Panic while handling message: {}", e),
        Err(e) => debug!("Message task cancelled: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::replies::Language;
    use crate::telegram::{Chat, Message};
    use crate::transport::MockTransport;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;
    use tokio::sync::Notify;

    fn bot_user() -> User {
        User {
            id: 1,
            is_bot: true,
            first_name: "Calc".to_string(),
            username: Some("calc_bot".to_string()),
        }
    }

    fn text_update(update_id: i64, message_id: i64, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id,
                chat: Chat {
                    id: 42,
                    kind: "private".to_string(),
                    username: None,
                },
                from: None,
                date: 0,
                text: Some(text.to_string()),
            }),
        }
    }

    fn bad_gateway() -> BotError {
        BotError::ApiError {
            code: 502,
            description: "Bad Gateway".to_string(),
        }
    }

    fn runner(mock: MockTransport) -> BotRunner {
        runner_with(Arc::new(mock), Duration::from_secs(2))
    }

    fn runner_with(transport: Arc<dyn Transport>, shutdown_grace: Duration) -> BotRunner {
        let config = BotConfig::builder()
            .token("t")
            .shutdown_grace(shutdown_grace)
            .build()
            .unwrap();
        let handler = Arc::new(MessageHandler::new(Language::English, 100).unwrap());
        BotRunner::new(transport, handler, &config)
            .with_poll_retry(RetryPolicy::fast())
            .with_send_retry(RetryPolicy::fast())
    }

    /// Serves update batches in order, then fails every poll
    struct ScriptedTransport {
        batches: Mutex<VecDeque<Vec<Update>>>,
        send_delay: Duration,
        panic_on_reply: Option<&'static str>,
        sent: Mutex<Vec<OutgoingMessage>>,
        send_started: Notify,
        delivered: Notify,
    }

    impl ScriptedTransport {
        fn new(batches: Vec<Vec<Update>>) -> Self {
            Self {
                batches: Mutex::new(batches.into()),
                send_delay: Duration::ZERO,
                panic_on_reply: None,
                sent: Mutex::new(Vec::new()),
                send_started: Notify::new(),
                delivered: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get_me(&self) -> Result<User> {
            Ok(bot_user())
        }

        async fn get_updates(&self, _offset: i64, _timeout: Duration) -> Result<Vec<Update>> {
            let batch = self.batches.lock().unwrap().pop_front();
            batch.ok_or_else(bad_gateway)
        }

        async fn send_message(&self, message: OutgoingMessage) -> Result<()> {
            self.send_started.notify_one();
            if let Some(reply) = self.panic_on_reply {
                assert_ne!(message.text, reply, "send crashed");
            }
            sleep(self.send_delay).await;
            self.sent.lock().unwrap().push(message);
            self.delivered.notify_one();
            Ok(())
        }
    }

    /// Record sent messages and wake the shutdown future after `expected` sends.
    fn record_sends(
        mock: &mut MockTransport,
        expected: usize,
    ) -> (Arc<Mutex<Vec<OutgoingMessage>>>, Arc<Notify>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(Notify::new());

        let sent_clone = Arc::clone(&sent);
        let done_clone = Arc::clone(&done);
        mock.expect_send_message().returning(move |msg| {
            let mut sent = sent_clone.lock().unwrap();
            sent.push(msg);
            if sent.len() == expected {
                done_clone.notify_one();
            }
            Ok(())
        });

        (sent, done)
    }

    #[tokio::test]
    async fn test_replies_to_each_message() {
        let mut mock = MockTransport::new();
        mock.expect_get_me().returning(|| Ok(bot_user()));
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 0)
            .times(1)
            .returning(|_, _| Ok(vec![text_update(10, 7, "2+3"), text_update(11, 8, "1/0")]));
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 12)
            .returning(|_, _| Err(bad_gateway()));
        let (sent, done) = record_sends(&mut mock, 2);

        runner(mock)
            .run(async move { done.notified().await })
            .await
            .unwrap();

        let mut sent = sent.lock().unwrap().clone();
        sent.sort_by_key(|m| m.reply_parameters.as_ref().map(|r| r.message_id));
        assert_eq!(sent.len(), 2);

        assert_eq!(sent[0].chat_id, 42);
        assert_eq!(sent[0].text, "✅ Result: 5");
        assert_eq!(sent[0].reply_parameters.as_ref().unwrap().message_id, 7);

        assert!(sent[1].text.starts_with("❌ Error: division by zero"));
        assert_eq!(sent[1].reply_parameters.as_ref().unwrap().message_id, 8);
    }

    #[tokio::test]
    async fn test_offset_skips_updates_without_text() {
        let mut mock = MockTransport::new();
        mock.expect_get_me().returning(|| Ok(bot_user()));
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 0)
            .times(1)
            .returning(|_, _| {
                let mut no_text = text_update(5, 1, "");
                if let Some(message) = no_text.message.as_mut() {
                    message.text = None;
                }
                Ok(vec![
                    Update {
                        update_id: 4,
                        message: None,
                    },
                    no_text,
                    text_update(6, 2, "/help"),
                ])
            });
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 7)
            .returning(|_, _| Err(bad_gateway()));
        let (sent, done) = record_sends(&mut mock, 1);

        runner(mock)
            .run(async move { done.notified().await })
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("How to use"));
    }

    #[tokio::test]
    async fn test_authentication_failure_is_fatal() {
        let mut mock = MockTransport::new();
        mock.expect_get_me().returning(|| {
            Err(BotError::ApiError {
                code: 401,
                description: "Unauthorized".to_string(),
            })
        });
        mock.expect_get_updates().times(0);

        let result = runner(mock).run(std::future::pending()).await;
        assert!(matches!(result, Err(BotError::ApiError { code: 401, .. })));
    }

    #[tokio::test]
    async fn test_shutdown_while_polling_fails() {
        let mut mock = MockTransport::new();
        mock.expect_get_me().returning(|| Ok(bot_user()));
        mock.expect_get_updates().returning(|_, _| Err(bad_gateway()));
        mock.expect_send_message().times(0);

        let result = runner(mock)
            .run(sleep(Duration::from_millis(50)))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_failure_does_not_stop_loop() {
        let mut mock = MockTransport::new();
        mock.expect_get_me().returning(|| Ok(bot_user()));
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 0)
            .times(1)
            .returning(|_, _| Ok(vec![text_update(1, 1, "2^3")]));
        mock.expect_get_updates()
            .withf(|offset, _| *offset == 2)
            .returning(|_, _| Err(bad_gateway()));

        let done = Arc::new(Notify::new());
        let done_clone = Arc::clone(&done);
        mock.expect_send_message().times(1).returning(move |_| {
            done_clone.notify_one();
            Err(BotError::ApiError {
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_string(),
            })
        });

        let result = runner(mock).run(async move { done.notified().await }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_aborts_after_grace_period() {
        let mut scripted = ScriptedTransport::new(vec![vec![text_update(1, 1, "2+3")]]);
        scripted.send_delay = Duration::from_secs(60);
        let transport = Arc::new(scripted);

        let waiter = Arc::clone(&transport);
        let started = Instant::now();
        runner_with(transport.clone(), Duration::from_millis(50))
            .run(async move { waiter.send_started.notified().await })
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_send_does_not_stop_loop() {
        let mut scripted = ScriptedTransport::new(vec![
            vec![text_update(1, 1, "2+3")],
            vec![text_update(2, 2, "2^3")],
        ]);
        scripted.panic_on_reply = Some("✅ Result: 5");
        let transport = Arc::new(scripted);

        let waiter = Arc::clone(&transport);
        runner_with(transport.clone(), Duration::from_secs(2))
            .run(async move { waiter.delivered.notified().await })
            .await
            .unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "✅ Result: 8");
    }
}
