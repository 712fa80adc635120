//! Batch Dispatcher - Concurrent fan-out of one batch of chats
//!
//! Every chat in a batch runs on its own task; the batch size is the
//! concurrency bound. Results are joined by correlation ID, never by order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::domain::entities::Chat;
use crate::ports::CompletionService;

/// Sends batches of chats to a completion service
#[derive(Clone)]
pub struct BatchDispatcher {
    service: Arc<dyn CompletionService>,
}

impl BatchDispatcher {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<dyn CompletionService> {
        &self.service
    }

    /// Complete all chats concurrently and wait for every one to finish
    ///
    /// Each entry carries either the response or the error message, plus the
    /// time spent on that chat. A chat whose task died without reporting has
    /// no entry at all; callers must handle that separately from an error.
    pub async fn dispatch(&self, chats: Vec<Chat>) -> HashMap<String, Chat> {
        let batch_size = chats.len();
        let tasks: Vec<_> = chats
            .into_iter()
            .map(|chat| {
                let service = Arc::clone(&self.service);
                tokio::spawn(async move {
                    let started = Instant::now();
                    let result = service.complete(&chat.request).await;
                    let millis = started.elapsed().as_millis() as u64;
                    match result {
                        Ok(response) => chat.completed(response, millis),
                        Err(e) => chat.failed(e.to_string(), millis),
                    }
                })
            })
            .collect();

        let results = join_all(tasks).await;

        let mut chats = HashMap::with_capacity(batch_size);
        for result in results {
            match result {
                Ok(chat) => {
                    if let Some(previous) = chats.insert(chat.id.clone(), chat) {
                        tracing::warn!(
                            "⚠️  Duplicate chat id {}, keeping one outcome",
                            previous.id
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!("❌ Chat task join failed: {}", e);
                }
            }
        }

        tracing::debug!(
            "Dispatched {} chats to {}, {} returned",
            batch_size,
            self.service.provider_name(),
            chats.len()
        );
        chats
    }
}
