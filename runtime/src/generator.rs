//! Per-movie event stream generation.
//!
//! Each subscription gets its own producer task that emits one
//! [`MovieEvent`] per interval until the subscriber goes away.
//!
//! # Architecture
//!
//! ```text
//! Producer task                     channel (cap 1)          Subscriber
//!   │                                     │                      │
//!   ├─ reserve() ◄── cancel/closed? ─┐    │                      │
//!   ├─ sleep(interval) ◄── ditto ────┤    │                      │
//!   ├─ send(MovieEvent { now() }) ───┼───>│──── poll_next() ────>│
//!   └─ loop ─────────────────────────┘    │                      │
//!                                         │◄──── drop() ─────────┤
//!   ◄──────────────── CancellationToken::cancel() ───── cancel() ┘
//! ```
//!
//! A producer stops for one of two reasons. An explicit
//! [`MovieEventStream::cancel`] ends it with [`StreamTermination::Cancelled`].
//! Dropping the stream closes the channel, which the producer observes as
//! [`StreamTermination::Disconnected`]. This is what a closed SSE connection
//! looks like.
//!
//! The producer waits for a free channel slot before it starts the next
//! interval, so a slow subscriber stalls the producer instead of events
//! piling up. The event is stamped when its interval elapses, so
//! consecutive timestamps are always at least one interval apart and a
//! stalled subscriber never receives a catch-up burst.

use crate::metrics::StreamMetrics;
use fluxflix_core::environment::Clock;
use fluxflix_core::movie::{Movie, MovieEvent, MovieId};
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Default spacing between two events of one stream.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Why a stream stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTermination {
    /// The subscriber called [`MovieEventStream::cancel`].
    Cancelled,
    /// The subscriber dropped the stream, closing the channel.
    Disconnected,
}

impl StreamTermination {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for StreamTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Called exactly once when a stream's producer stops.
pub trait CompletionHook: Send + Sync {
    /// Record that the stream for `movie` ended.
    fn on_complete(&self, movie: &Movie, termination: StreamTermination);
}

/// Default hook: logs the movie and the termination reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCompletionHook;

impl CompletionHook for LoggingCompletionHook {
    fn on_complete(&self, movie: &Movie, termination: StreamTermination) {
        tracing::info!(
            movie_id = %movie.id,
            title = %movie.title,
            reason = %termination,
            "Streaming info on '{}' ended: {}",
            movie.title,
            termination
        );
    }
}

/// Produces time-paced event streams for single movies.
///
/// Cloning is cheap; the generator itself holds no per-stream state.
///
/// # Example
///
/// ```no_run
/// use fluxflix_core::environment::SystemClock;
/// use fluxflix_core::movie::{Movie, MovieId};
/// use fluxflix_runtime::generator::EventStreamGenerator;
/// use futures::StreamExt;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() {
/// let generator = EventStreamGenerator::new(Duration::from_secs(1), Arc::new(SystemClock));
/// let mut events = generator.generate(Movie::new(MovieId::new("m1"), "Flux Gordon"));
///
/// let first = events.next().await;
/// drop(events); // stops the producer
/// # }
/// ```
#[derive(Clone)]
pub struct EventStreamGenerator {
    interval: Duration,
    clock: Arc<dyn Clock>,
    hook: Arc<dyn CompletionHook>,
}

impl EventStreamGenerator {
    /// Create a generator with the logging completion hook.
    #[must_use]
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            clock,
            hook: Arc::new(LoggingCompletionHook),
        }
    }

    /// Replace the completion hook.
    #[must_use]
    pub fn with_completion_hook(mut self, hook: Arc<dyn CompletionHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Spacing between events.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a stream for `movie`.
    ///
    /// The movie is a snapshot: every event carries this exact value, even
    /// if the stored record changes while the stream is open.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime (the producer is spawned).
    #[must_use]
    pub fn generate(&self, movie: Movie) -> MovieEventStream {
        let (tx, rx) = mpsc::channel(1);
        let token = CancellationToken::new();
        let movie_id = movie.id.clone();

        let producer = Producer {
            movie,
            interval: self.interval,
            clock: Arc::clone(&self.clock),
            hook: Arc::clone(&self.hook),
            tx,
            token: token.clone(),
        };
        tokio::spawn(producer.run());

        MovieEventStream {
            movie_id,
            rx,
            token,
        }
    }
}

impl fmt::Debug for EventStreamGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStreamGenerator")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Subscriber side of one movie's event stream.
///
/// Unbounded: yields events until dropped or cancelled. Either one stops
/// the producer before its next tick; dropping reports
/// [`StreamTermination::Disconnected`], [`cancel`](Self::cancel) reports
/// [`StreamTermination::Cancelled`].
#[derive(Debug)]
pub struct MovieEventStream {
    movie_id: MovieId,
    rx: mpsc::Receiver<MovieEvent>,
    token: CancellationToken,
}

impl MovieEventStream {
    /// Movie this stream reports on.
    #[must_use]
    pub const fn movie_id(&self) -> &MovieId {
        &self.movie_id
    }

    /// Stop the producer. Events already handed over may still be read,
    /// after which the stream ends.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Stream for MovieEventStream {
    type Item = MovieEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

struct Producer {
    movie: Movie,
    interval: Duration,
    clock: Arc<dyn Clock>,
    hook: Arc<dyn CompletionHook>,
    tx: mpsc::Sender<MovieEvent>,
    token: CancellationToken,
}

impl Producer {
    async fn run(self) {
        StreamMetrics::record_started();
        tracing::debug!(
            movie_id = %self.movie.id,
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "Event stream started"
        );

        let termination = loop {
            let permit = tokio::select! {
                biased;
                () = self.token.cancelled() => break StreamTermination::Cancelled,
                permit = self.tx.reserve() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break StreamTermination::Disconnected,
                },
            };

            tokio::select! {
                biased;
                () = self.token.cancelled() => break StreamTermination::Cancelled,
                () = self.tx.closed() => break StreamTermination::Disconnected,
                () = tokio::time::sleep(self.interval) => {}
            }

            permit.send(MovieEvent::new(self.movie.clone(), self.clock.now()));
            StreamMetrics::record_event();
            tracing::trace!(movie_id = %self.movie.id, "Event emitted");
        };

        StreamMetrics::record_completed(termination.as_str());
        self.hook.on_complete(&self.movie, termination);
    }
}
