//! UI-facing state for the dog list, driven by events.
//!
//! `DogListStore` owns a [`DogListState`] and reduces events into new state.
//! Each load runs the fetcher on a spawned task; completions come back over a
//! channel and are applied by the owner in the order they finish.
//!
//! # Example
//!
//! ```ignore
//! let mut store = DogListStore::from_use_case(Arc::new(get_dogs));
//! store.handle_event(DogListEvent::LoadDogs);
//!
//! // In event loop tick
//! if store.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! match store.state().phase() {
//!     Phase::Loading => render_spinner(),
//!     Phase::Failed(message) => render_error(message),
//!     Phase::Loaded(dogs) => render_list(dogs),
//! }
//! ```

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dogs::{Dog, DogRepository, GetDogs};
use crate::error::{Error, Result};

/// Snapshot of what the list screen shows.
///
/// The fields are independent; [`DogListState::reduce`] keeps them in one of
/// the three visual modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogListState {
  pub dogs: Vec<Dog>,
  pub is_loading: bool,
  pub error_message: Option<String>,
}

impl Default for DogListState {
  /// Starts in the loading posture, before any event has been seen.
  fn default() -> Self {
    Self {
      dogs: Vec::new(),
      is_loading: true,
      error_message: None,
    }
  }
}

/// The visual mode a state renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
  Loading,
  Failed(&'a str),
  Loaded(&'a [Dog]),
}

/// Input events from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogListEvent {
  LoadDogs,
  RetryLoadDogs,
}

/// A step of a load, as seen by the reducer.
#[derive(Debug)]
pub enum Transition {
  Started,
  Succeeded(Vec<Dog>),
  Failed(Error),
}

impl DogListState {
  pub fn phase(&self) -> Phase<'_> {
    if self.is_loading {
      Phase::Loading
    } else if let Some(message) = &self.error_message {
      Phase::Failed(message)
    } else {
      Phase::Loaded(&self.dogs)
    }
  }

  /// Pure reducer: the state that follows `transition`.
  pub fn reduce(self, transition: Transition) -> Self {
    match transition {
      Transition::Started => Self {
        is_loading: true,
        error_message: None,
        ..self
      },
      Transition::Succeeded(dogs) => Self {
        dogs,
        is_loading: false,
        error_message: None,
      },
      Transition::Failed(error) => Self {
        is_loading: false,
        error_message: Some(error.user_message()),
        ..self
      },
    }
  }
}

type FetcherFn = Box<dyn Fn() -> BoxFuture<'static, Result<Vec<Dog>>> + Send + Sync>;

/// Single-owner holder of [`DogListState`].
///
/// Overlapping loads are not cancelled or tagged: every load completes and
/// the last one to finish decides the final state.
pub struct DogListStore {
  state: DogListState,
  fetcher: FetcherFn,
  tx: mpsc::UnboundedSender<Result<Vec<Dog>>>,
  rx: mpsc::UnboundedReceiver<Result<Vec<Dog>>>,
  in_flight: usize,
}

impl DogListStore {
  /// Create a store around a fetcher closure.
  ///
  /// The fetcher is called once per load event.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Dog>>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      state: DogListState::default(),
      fetcher: Box::new(move || Box::pin(fetcher())),
      tx,
      rx,
      in_flight: 0,
    }
  }

  /// Create a store that loads through the given use case.
  pub fn from_use_case<R>(use_case: Arc<GetDogs<R>>) -> Self
  where
    R: DogRepository + 'static,
  {
    Self::new(move || {
      let use_case = Arc::clone(&use_case);
      async move { use_case.execute().await }
    })
  }

  pub fn state(&self) -> &DogListState {
    &self.state
  }

  /// Number of loads started but not yet applied.
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  pub fn handle_event(&mut self, event: DogListEvent) {
    match event {
      DogListEvent::LoadDogs | DogListEvent::RetryLoadDogs => self.load_dogs(event),
    }
  }

  /// Apply every completed load without blocking.
  ///
  /// Returns `true` if the state changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(result) = self.rx.try_recv() {
      self.apply(result);
      changed = true;
    }
    changed
  }

  /// Wait for the next load to complete and apply it.
  ///
  /// Returns `false` straight away when nothing is in flight.
  #[cfg(test)]
  pub async fn next_update(&mut self) -> bool {
    if self.in_flight == 0 {
      return false;
    }
    match self.rx.recv().await {
      Some(result) => {
        self.apply(result);
        true
      }
      None => false,
    }
  }

  fn load_dogs(&mut self, event: DogListEvent) {
    debug!(?event, in_flight = self.in_flight(), "Loading dogs");
    self.transition(Transition::Started);
    self.in_flight += 1;

    let future = (self.fetcher)();
    let tx = self.tx.clone();
    tokio::spawn(async move {
      // A panicking load still has to report back, or it stays in flight forever.
      let result = match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(Error::Unknown(panic_message(payload.as_ref()))),
      };
      // The receiver lives as long as the store; a send error means it is gone.
      let _ = tx.send(result);
    });
  }

  fn apply(&mut self, result: Result<Vec<Dog>>) {
    self.in_flight = self.in_flight.saturating_sub(1);
    match result {
      Ok(dogs) => {
        debug!(count = dogs.len(), "Dogs loaded");
        self.transition(Transition::Succeeded(dogs));
      }
      Err(error) => {
        warn!(%error, "Failed to load dogs");
        self.transition(Transition::Failed(error));
      }
    }
  }

  fn transition(&mut self, transition: Transition) {
    let current = std::mem::take(&mut self.state);
    self.state = current.reduce(transition);
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
  payload
    .downcast_ref::<&str>()
    .map(|message| message.to_string())
    .or_else(|| payload.downcast_ref::<String>().cloned())
}

impl std::fmt::Debug for DogListStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DogListStore")
      .field("state", &self.state)
      .field("in_flight", &self.in_flight)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dogs::repository::fakes::dog;
  use crate::error::{NetworkError, UNKNOWN_ERROR};
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  fn sample_dogs() -> Vec<Dog> {
    vec![
      dog(Some(1), "Buddy", "A friendly golden retriever", 3),
      dog(Some(2), "Luna", "A playful husky", 2),
    ]
  }

  async fn panicking_fetch() -> Result<Vec<Dog>> {
    panic!("boom")
  }

  async fn silent_panicking_fetch() -> Result<Vec<Dog>> {
    std::panic::panic_any(42_u8)
  }

  #[test]
  fn test_initial_state_is_loading() {
    let store = DogListStore::new(|| async { Ok(Vec::new()) });
    let state = store.state();
    assert!(state.is_loading);
    assert!(state.dogs.is_empty());
    assert_eq!(state.error_message, None);
    assert_eq!(state.phase(), Phase::Loading);
  }

  #[test]
  fn test_reduce_started_keeps_dogs_and_clears_error() {
    let state = DogListState {
      dogs: sample_dogs(),
      is_loading: false,
      error_message: Some("old".to_string()),
    };
    let next = state.reduce(Transition::Started);
    assert!(next.is_loading);
    assert_eq!(next.error_message, None);
    assert_eq!(next.dogs, sample_dogs());
  }

  #[test]
  fn test_reduce_failure_keeps_dogs() {
    let state = DogListState {
      dogs: sample_dogs(),
      is_loading: true,
      error_message: None,
    };
    let next = state.reduce(Transition::Failed(Error::Unknown(Some("nope".to_string()))));
    assert_eq!(next.phase(), Phase::Failed("nope"));
    assert_eq!(next.dogs, sample_dogs());
  }

  #[tokio::test]
  async fn test_load_dogs_success() {
    let mut store = DogListStore::new(|| async { Ok(sample_dogs()) });

    store.handle_event(DogListEvent::LoadDogs);
    assert!(store.state().is_loading);
    assert!(store.next_update().await);

    let state = store.state();
    assert!(!state.is_loading);
    assert_eq!(state.dogs, sample_dogs());
    assert_eq!(state.error_message, None);
    assert_eq!(state.phase(), Phase::Loaded(&sample_dogs()));
  }

  #[tokio::test]
  async fn test_load_dogs_error_uses_message() {
    let mut store = DogListStore::new(|| async {
      Err(Error::Network(NetworkError::Status {
        status: 500,
        body: "Network error".to_string(),
      }))
    });

    store.handle_event(DogListEvent::LoadDogs);
    store.next_update().await;

    let state = store.state();
    assert!(!state.is_loading);
    assert!(state.dogs.is_empty());
    assert_eq!(
      state.error_message.as_deref(),
      Some("Server returned 500: Network error")
    );
  }

  #[tokio::test]
  async fn test_load_dogs_unknown_error() {
    let mut store = DogListStore::new(|| async { Err(Error::Unknown(None)) });

    store.handle_event(DogListEvent::LoadDogs);
    store.next_update().await;

    assert_eq!(store.state().error_message.as_deref(), Some(UNKNOWN_ERROR));
  }

  #[tokio::test]
  async fn test_panicking_load_becomes_failure() {
    let mut store = DogListStore::new(panicking_fetch);

    store.handle_event(DogListEvent::LoadDogs);
    let applied = tokio::time::timeout(Duration::from_millis(500), store.next_update())
      .await
      .expect("load never reported back");

    assert!(applied);
    assert_eq!(store.in_flight(), 0);
    assert_eq!(store.state().phase(), Phase::Failed("boom"));
  }

  #[tokio::test]
  async fn test_panic_without_message_is_unknown_error() {
    let mut store = DogListStore::new(silent_panicking_fetch);

    store.handle_event(DogListEvent::LoadDogs);
    store.next_update().await;

    assert!(!store.state().is_loading);
    assert_eq!(store.state().error_message.as_deref(), Some(UNKNOWN_ERROR));
  }

  #[tokio::test]
  async fn test_retry_clears_previous_error() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let mut store = DogListStore::new(move || {
      let attempt = counter.fetch_add(1, Ordering::SeqCst);
      async move {
        if attempt == 0 {
          Err(Error::Unknown(Some("Network error".to_string())))
        } else {
          Ok(sample_dogs())
        }
      }
    });

    store.handle_event(DogListEvent::LoadDogs);
    store.next_update().await;
    assert_eq!(store.state().error_message.as_deref(), Some("Network error"));

    store.handle_event(DogListEvent::RetryLoadDogs);
    assert!(store.state().is_loading);
    assert_eq!(store.state().error_message, None);
    store.next_update().await;

    assert_eq!(store.state().error_message, None);
    assert_eq!(store.state().dogs, sample_dogs());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_last_completion_wins() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let mut store = DogListStore::new(move || {
      let attempt = counter.fetch_add(1, Ordering::SeqCst);
      async move {
        if attempt == 0 {
          // First load is slow and finishes last
          tokio::time::sleep(Duration::from_millis(50)).await;
          Ok(vec![dog(Some(1), "Slow", "", 1)])
        } else {
          Ok(vec![dog(Some(2), "Fast", "", 1)])
        }
      }
    });

    store.handle_event(DogListEvent::LoadDogs);
    store.handle_event(DogListEvent::RetryLoadDogs);
    assert_eq!(store.in_flight(), 2);

    store.next_update().await;
    assert_eq!(store.state().dogs[0].name, "Fast");
    assert!(!store.state().is_loading);

    store.next_update().await;
    assert_eq!(store.state().dogs[0].name, "Slow");
    assert_eq!(store.in_flight(), 0);
  }

  #[tokio::test]
  async fn test_poll_applies_completed_loads() {
    let mut store = DogListStore::new(|| async { Ok(sample_dogs()) });
    assert!(!store.poll());

    store.handle_event(DogListEvent::LoadDogs);
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(store.poll());
    assert_eq!(store.state().dogs, sample_dogs());
    assert!(!store.poll());
  }

  #[tokio::test]
  async fn test_next_update_without_load_returns_false() {
    let mut store = DogListStore::new(|| async { Ok(Vec::new()) });
    assert!(!store.next_update().await);
  }

  #[tokio::test]
  async fn test_from_use_case_runs_repository() {
    use crate::cache::DogRecord;
    use crate::dogs::repository::fakes::{FakeRemote, FakeStore};
    use crate::dogs::CachedDogRepository;

    let cached = vec![DogRecord::from_dog(&sample_dogs()[0])];
    let store = Arc::new(FakeStore::with_records(cached));
    let repo = CachedDogRepository::new(store, FakeRemote::failing(503));
    let mut list = DogListStore::from_use_case(Arc::new(GetDogs::new(repo)));

    list.handle_event(DogListEvent::LoadDogs);
    list.next_update().await;

    assert_eq!(list.state().dogs, vec![sample_dogs()[0].clone()]);
  }
}
