//! Capture of PostgreSQL `NOTICE` messages
//!
//! sqlx does not hand notices back to the caller; it emits them as tracing
//! events under the `sqlx::postgres::notice` target. [`NoticeLayer`] picks
//! those events up and appends their message to a shared [`NoticeBuffer`],
//! which the portal drains after a stored-procedure call.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::filter::{filter_fn, FilterFn};
use tracing_subscriber::layer::{Context, Layer};

/// Target sqlx uses for server notices
pub const NOTICE_TARGET: &str = "sqlx::postgres::notice";

/// Shared list of notices not yet shown to the user
#[derive(Debug, Clone, Default)]
pub struct NoticeBuffer {
    inner: Arc<Mutex<Vec<String>>>,
}

impl NoticeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: impl Into<String>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.into());
    }

    /// Take every buffered notice, leaving the buffer empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Tracing layer that records sqlx notice events into a [`NoticeBuffer`]
pub struct NoticeLayer {
    buffer: NoticeBuffer,
}

impl NoticeLayer {
    pub fn new(buffer: NoticeBuffer) -> Self {
        Self { buffer }
    }
}

/// Per-layer filter admitting only notice events at any level.
///
/// Attach it with `NoticeLayer::new(buf).with_filter(notice_filter())` so
/// notices are captured no matter what `RUST_LOG` says for console output.
pub fn notice_filter() -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    filter_fn(|metadata: &Metadata<'_>| metadata.target() == NOTICE_TARGET)
}

impl<S: Subscriber> Layer<S> for NoticeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != NOTICE_TARGET {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            let message = message.trim();
            if !message.is_empty() {
                self.buffer.push(message);
            }
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" && self.message.is_none() {
            self.message = Some(format!("{:?}", value));
        }
    }
}
