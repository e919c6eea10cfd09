//! Tracing system for Semantium traversals.
//!
//! Records every chain created, forked, appended to, and finalized, with
//! zero overhead when disabled. Supports both human-readable and JSON
//! output formats.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use semantium_debug::{SharedTracer, Tracer, TracerConfig};
//!
//! let tracer = SharedTracer::new(Tracer::new(TracerConfig::new().enabled()));
//! let observer: Rc<dyn semantium_recording::TraversalObserver> = Rc::new(tracer.clone());
//! // semantic.with_observer(observer) ...
//! # drop(observer);
//! assert!(tracer.borrow().buffer().is_empty());
//! ```

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{DEFAULT_CAPACITY, TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{TraceEvent, TraceRecord};

use std::cell::{Ref, RefCell, RefMut};
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;

use semantium_foundation::Error;
use semantium_recording::{ChainElement, ChainId, TraversalObserver};

// =============================================================================
// Configuration
// =============================================================================

/// Where records go besides the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// Buffer only.
    #[default]
    None,
    /// Also print each record to stderr as it arrives.
    Stderr,
}

/// How the tracer renders records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceFormat {
    /// One line of prose per record.
    #[default]
    Human,
    /// One JSON object per record, a JSON array for many.
    Json,
}

/// Settings for a [`Tracer`]. Off by default.
#[derive(Clone, Debug)]
#[must_use]
pub struct TracerConfig {
    /// Master switch.
    pub enabled: bool,
    /// Records kept before the oldest are evicted.
    pub capacity: usize,
    /// Live output destination.
    pub output: TraceOutput,
    /// Rendering used by the tracer's own format methods.
    pub format: TraceFormat,
    /// Event tags to keep; empty keeps all.
    pub events: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: DEFAULT_CAPACITY,
            output: TraceOutput::None,
            format: TraceFormat::Human,
            events: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Same as [`TracerConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns recording on.
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Keeps at most `capacity` records.
    pub fn with_buffer_size(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Echoes records to stderr.
    pub fn to_stderr(mut self) -> Self {
        self.output = TraceOutput::Stderr;
        self
    }

    /// Renders as JSON.
    pub fn json(mut self) -> Self {
        self.format = TraceFormat::Json;
        self
    }

    /// Keeps only the given event tags, e.g. `"chain-forked"`.
    pub fn filter_events<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = tags.into_iter().map(Into::into).collect();
        self
    }

    fn keeps(&self, event: &TraceEvent) -> bool {
        self.events.is_empty() || self.events.iter().any(|tag| tag == event.event_type())
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Collects traversal events. Recording is a no-op while disabled.
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    epoch: Instant,
}

impl Tracer {
    /// A tracer using `config`.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            buffer: TraceBuffer::new(config.capacity),
            config,
            epoch: Instant::now(),
        }
    }

    /// A tracer that records nothing until enabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// Whether events are currently recorded.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Starts recording.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Stops recording. Buffered records stay.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Changes the rendering used by [`Tracer::format_record`].
    pub fn set_format(&mut self, format: TraceFormat) {
        self.config.format = format;
    }

    /// Stores `event` for `chain` unless disabled or filtered out.
    #[inline]
    pub fn record(&mut self, chain: ChainId, event: TraceEvent) {
        if self.config.enabled && self.config.keeps(&event) {
            self.store(chain, event);
        }
    }

    fn store(&mut self, chain: ChainId, event: TraceEvent) {
        let elapsed = u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX);
        let id = self.buffer.push(chain, elapsed, event);

        if self.config.output == TraceOutput::Stderr {
            if let Some(record) = self.buffer.get(id) {
                let line = self.format_record(record);
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    fn formatter(&self) -> Box<dyn TraceFormatter> {
        match self.config.format {
            TraceFormat::Human => Box::new(HumanFormatter::new()),
            TraceFormat::Json => Box::new(JsonFormatter::new()),
        }
    }

    /// Renders one record in the configured format.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        self.formatter().format(record)
    }

    /// Renders several records in the configured format.
    #[must_use]
    pub fn format_records(&self, records: &[&TraceRecord]) -> String {
        self.formatter().format_many(records)
    }

    /// Renders everything one chain recorded.
    #[must_use]
    pub fn format_chain(&self, chain: ChainId) -> String {
        self.format_records(&self.buffer.records_for_chain(chain))
    }

    /// The records collected so far.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Empties the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Shorthand for `buffer().stats()`.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.buffer.stats()
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}

// =============================================================================
// Shared Tracer
// =============================================================================

/// A tracer shared between a semantic and its owner.
///
/// Implements [`TraversalObserver`] so it can be attached with
/// `Semantic::with_observer`, while the owner keeps a clone to read the
/// buffer back.
#[derive(Clone, Default)]
pub struct SharedTracer(Rc<RefCell<Tracer>>);

impl SharedTracer {
    /// Wraps a tracer.
    #[must_use]
    pub fn new(tracer: Tracer) -> Self {
        Self(Rc::new(RefCell::new(tracer)))
    }

    /// Borrows the tracer.
    ///
    /// # Panics
    ///
    /// Panics if the tracer is currently borrowed mutably.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Tracer> {
        self.0.borrow()
    }

    /// Borrows the tracer mutably.
    ///
    /// # Panics
    ///
    /// Panics if the tracer is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Tracer> {
        self.0.borrow_mut()
    }

    // Events arriving while the owner holds a borrow are dropped.
    fn record(&self, chain: ChainId, event: impl FnOnce() -> TraceEvent) {
        if let Ok(mut tracer) = self.0.try_borrow_mut() {
            if tracer.is_enabled() {
                tracer.record(chain, event());
            }
        }
    }
}

impl TraversalObserver for SharedTracer {
    fn chain_created(&self, chain: ChainId) {
        self.record(chain, || TraceEvent::ChainCreated);
    }

    fn chain_forked(&self, parent: ChainId, child: ChainId, depth: usize) {
        self.record(child, || TraceEvent::ChainForked { parent, depth });
    }

    fn word_used(&self, chain: ChainId, element: &ChainElement) {
        self.record(chain, || TraceEvent::word_used(element));
    }

    fn finalized(&self, chain: ChainId, depth: usize) {
        self.record(chain, || TraceEvent::Finalized { depth });
    }

    fn resolution_failed(&self, chain: ChainId, error: &Error) {
        self.record(chain, || TraceEvent::resolution_failed(error));
    }
}

impl std::fmt::Debug for SharedTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.try_borrow() {
            Ok(tracer) => f
                .debug_struct("SharedTracer")
                .field("enabled", &tracer.is_enabled())
                .field("records", &tracer.buffer().len())
                .finish(),
            Err(_) => f.write_str("SharedTracer(<borrowed>)"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
