//! # Mock Framework & Testing Guide
//!
//! The `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a
//! queue of expectations instead of a running actor. It lets you test the logic *around* a
//! client (error mapping, orchestration in the booking coordinator, ...) deterministically.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **State** | No real state (expectations) | Real state management |
//! | **Error Injection** | Easy (`return_err`) | Hard (requires specific state) |
//!
//! ## Wiring a mock into a registry
//!
//! ```rust,ignore
//! let mut mock = MockClient::<ShowHolds>::new();
//! mock.expect_action().return_err(FrameworkError::ActorDropped);
//! registry.attach(show_id, mock.client()).await;
//! // every request for `show_id` now hits the mock
//! mock.verify();
//! ```
//!
//! Use [`create_mock_client`] when you need to inspect the raw requests yourself.

use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use super::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected request to the mock client.
enum Expectation<T: ActorEntity> {
    Get {
        response: Result<T, FrameworkError>,
    },
    Action {
        response: Result<T::ActionResult, FrameworkError>,
    },
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests that do not match the next queued expectation (or arrive when none is queued)
/// are answered with [`FrameworkError::ActorDropped`] and counted as unexpected, which makes
/// [`MockClient::verify`] fail.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    unexpected: Arc<Mutex<usize>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let unexpected = Arc::new(Mutex::new(0usize));
        let expectations_clone = Arc::clone(&expectations);
        let unexpected_clone = Arc::clone(&unexpected);

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Some(Expectation::Action { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        *unexpected_clone.lock().unwrap_or_else(|e| e.into_inner()) += 1;
                        request.reject(FrameworkError::ActorDropped);
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` request.
    pub fn expect_get(&mut self) -> GetExpectationBuilder<T> {
        GetExpectationBuilder {
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Expects an `action` request.
    pub fn expect_action(&mut self) -> ActionExpectationBuilder<T> {
        ActionExpectationBuilder {
            expectations: Arc::clone(&self.expectations),
        }
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    ///
    /// # Panics
    /// Panics when expectations remain or unexpected requests were received.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap_or_else(|e| e.into_inner()).len();
        let unexpected = *self.unexpected.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(remaining, 0, "Not all expectations were met. {} remaining", remaining);
        assert_eq!(unexpected, 0, "{} unexpected requests received", unexpected);
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> GetExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Expectation::Get { response: Ok(value) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Expectation::Get { response: Err(error) });
    }

    fn push(self, expectation: Expectation<T>) {
        self.expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(expectation);
    }
}

/// Builder for `action` expectations.
pub struct ActionExpectationBuilder<T: ActorEntity> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: ActorEntity> ActionExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, result: T::ActionResult) {
        self.push(Expectation::Action { response: Ok(result) });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Expectation::Action { response: Err(error) });
    }

    fn push(self, expectation: Expectation<T>) {
        self.expectations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(expectation);
    }
}

/// Creates a mock client and a receiver for asserting requests.
///
/// Instead of spinning up a `ResourceActor`, the test owns the receiving end of the
/// mailbox, inspects every request and answers it however the scenario needs.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { action, respond_to }) => Some((action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Tally {
        total: u32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Add(u32),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Tally error")]
    struct TallyError;

    #[async_trait]
    impl ActorEntity for Tally {
        type Id = u32;
        type Action = TallyAction;
        type ActionResult = u32;
        type Context = ();
        type Error = TallyError;

        fn from_id(_id: u32) -> Self {
            Self { total: 0 }
        }

        async fn handle_action(&mut self, action: TallyAction, _ctx: &()) -> Result<u32, TallyError> {
            let TallyAction::Add(n) = action;
            self.total += n;
            Ok(self.total)
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Tally>(10);

        let task = tokio::spawn(async move { client.perform_action(TallyAction::Add(3)).await });

        let (action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert!(matches!(action, TallyAction::Add(3)));
        responder.send(Ok(3)).unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Ok(3)));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Tally>::new();
        mock.expect_action().return_ok(5);
        mock.expect_get().return_ok(Tally { total: 5 });
        mock.expect_action().return_err(FrameworkError::ActorDropped);

        let client = mock.client();
        assert_eq!(client.perform_action(TallyAction::Add(5)).await.unwrap(), 5);
        assert_eq!(client.get().await.unwrap(), Tally { total: 5 });
        assert!(matches!(
            client.perform_action(TallyAction::Add(1)).await,
            Err(FrameworkError::ActorDropped)
        ));

        mock.verify();
    }
}
