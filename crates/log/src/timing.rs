//! Operation timing reported through [`Logger::performance`]

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use pin_project::pin_project;

use crate::event::Metadata;
use crate::logger::Logger;

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Measures one operation and logs it on [`finish`](Self::finish) or drop
#[derive(Debug)]
pub struct OperationTimer {
    logger: Logger,
    operation: String,
    context: Option<String>,
    meta: Metadata,
    threshold: Option<Duration>,
    start: Instant,
    reported: bool,
}

impl OperationTimer {
    fn new(logger: Logger, operation: String) -> Self {
        Self {
            logger,
            operation,
            context: None,
            meta: Metadata::new(),
            threshold: None,
            start: Instant::now(),
            reported: false,
        }
    }

    /// Context for the report
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Extra fields for the report
    #[must_use]
    pub fn meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }

    /// Only report if the operation took at least `threshold`
    #[must_use]
    pub fn threshold(mut self, threshold: Duration) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Time since the timer started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop and report
    pub fn finish(mut self) -> Duration {
        self.report()
    }

    fn report(&mut self) -> Duration {
        let elapsed = self.elapsed();
        if self.reported {
            return elapsed;
        }
        self.reported = true;

        if self.threshold.is_some_and(|threshold| elapsed < threshold) {
            return elapsed;
        }
        self.logger.performance(
            &self.operation,
            millis(elapsed),
            self.context.as_deref(),
            std::mem::take(&mut self.meta),
        );
        elapsed
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.report();
    }
}

impl Logger {
    /// Start timing `operation`
    pub fn start_timer(&self, operation: impl Into<String>) -> OperationTimer {
        OperationTimer::new(self.clone(), operation.into())
    }
}

/// Future wrapper reporting its run time when it completes
#[pin_project]
#[derive(Debug)]
pub struct TimedFuture<F> {
    #[pin]
    inner: F,
    logger: Logger,
    operation: String,
    start: Option<Instant>,
}

impl<F: Future> Future for TimedFuture<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let start = *this.start.get_or_insert_with(Instant::now);

        match this.inner.poll(cx) {
            Poll::Ready(output) => {
                this.logger
                    .performance(this.operation, millis(start.elapsed()), None, Metadata::new());
                Poll::Ready(output)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Extension for timing futures
pub trait Timed: Future + Sized {
    /// Report this future's run time (first poll to completion) through `logger`
    fn timed(self, logger: &Logger, operation: impl Into<String>) -> TimedFuture<Self> {
        TimedFuture {
            inner: self,
            logger: logger.clone(),
            operation: operation.into(),
            start: None,
        }
    }
}

impl<F: Future> Timed for F {}
