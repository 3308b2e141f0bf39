//! Log sinks: where finished entries go.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::field::debug;
use tracing::{Dispatch, Level};

use super::entry::{Entry, Value, field};

/// Receives finished log entries.
///
/// Sinks are shared by every request in flight, so implementations must be
/// safe to call concurrently. Emission is infallible from the caller's point
/// of view; a sink that can fail deals with it internally.
pub trait Sink: Send + Sync + 'static {
    fn emit(&self, level: Level, message: &str, entry: &Entry);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn emit(&self, level: Level, message: &str, entry: &Entry) {
        (**self).emit(level, message, entry)
    }
}

// ── TracingSink ───────────────────────────────────────────────────────────────

/// Forwards entries to `tracing` as events under the `reqlog::access` target.
///
/// The access-log fields become event fields of the same name; fields an
/// entry does not carry are left out of the event. Output format and
/// destination belong to whatever subscriber receives the event.
///
/// The default sink looks the dispatcher up on every emit, so a subscriber
/// installed after the sink was built still receives its entries. A sink
/// built with [`TracingSink::new`] always emits to the dispatcher it was
/// given.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    dispatch: Option<Dispatch>,
}

impl TracingSink {
    /// Pins the sink to `dispatch`.
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch: Some(dispatch) }
    }

    /// Emits to the thread's scoped dispatcher if one is set, else the
    /// global default, resolved at emit time.
    pub fn global() -> Self {
        Self { dispatch: None }
    }

    /// Pins the dispatcher that is current right now.
    pub fn current() -> Self {
        Self::new(tracing::dispatcher::get_default(Dispatch::clone))
    }
}

impl Sink for TracingSink {
    fn emit(&self, level: Level, message: &str, entry: &Entry) {
        match &self.dispatch {
            Some(dispatch) => {
                tracing::dispatcher::with_default(dispatch, || record(level, message, entry))
            }
            None => record(level, message, entry),
        }
    }
}

fn record(level: Level, message: &str, entry: &Entry) {
    let text = |name: &str| entry.get(name).and_then(Value::as_str);

    let request = text(field::REQUEST);
    let method = text(field::METHOD);
    let remote = text(field::REMOTE);
    let request_id = text(field::REQUEST_ID);
    let status = entry.get(field::STATUS).and_then(Value::as_int);
    let text_status = text(field::TEXT_STATUS);
    let took = entry.get(field::TOOK).and_then(Value::as_duration).map(debug);

    // Event levels are part of the static callsite, hence one arm per level.
    macro_rules! access_event {
        ($level:expr) => {
            tracing::event!(
                target: "reqlog::access",
                $level,
                request,
                method,
                remote,
                request_id,
                status,
                text_status,
                took,
                "{}",
                message
            )
        };
    }

    match level {
        Level::ERROR => access_event!(Level::ERROR),
        Level::WARN => access_event!(Level::WARN),
        Level::INFO => access_event!(Level::INFO),
        Level::DEBUG => access_event!(Level::DEBUG),
        _ => access_event!(Level::TRACE),
    }
}

// ── RecordingSink ─────────────────────────────────────────────────────────────

/// One entry as a [`RecordingSink`] saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub entry: Entry,
}

/// Keeps every emitted entry in memory, in emission order.
///
/// Meant for tests and for embedding applications that want to inspect
/// access records themselves.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<Record>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn len(&self) -> usize { self.lock().len() }
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // Poisoning is ignored: a push either happened or it did not.
    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for RecordingSink {
    fn emit(&self, level: Level, message: &str, entry: &Entry) {
        self.lock().push(Record { level, message: message.to_owned(), entry: entry.clone() });
    }
}

/// In-memory subscriber output for tests.
#[cfg(test)]
pub(crate) mod capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::{Dispatch, Level};

    /// Collects formatted subscriber output in memory.
    #[derive(Clone, Default)]
    pub(crate) struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// A plain-text `fmt` subscriber writing into a fresh [`Buffer`].
    pub(crate) fn dispatch() -> (Dispatch, Buffer) {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        (Dispatch::new(subscriber), buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::capture::{self, Buffer};
    use super::*;

    fn pinned() -> (TracingSink, Buffer) {
        let (dispatch, buffer) = capture::dispatch();
        (TracingSink::new(dispatch), buffer)
    }

    #[test]
    fn tracing_sink_writes_fields_and_level() {
        let (sink, buffer) = pinned();
        let entry = Entry::new()
            .with(field::REQUEST, "/missing")
            .with(field::METHOD, "GET")
            .with(field::STATUS, 404u16)
            .with(field::TEXT_STATUS, "Not Found")
            .with(field::TOOK, Duration::from_micros(250));

        sink.emit(Level::WARN, "completed handling request", &entry);

        let out = buffer.contents();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("reqlog::access"), "{out}");
        assert!(out.contains("completed handling request"), "{out}");
        assert!(out.contains("/missing"), "{out}");
        assert!(out.contains("status=404"), "{out}");
        assert!(out.contains("took=250µs"), "{out}");
        assert!(!out.contains("request_id"), "{out}");
    }

    #[test]
    fn tracing_sink_uses_its_own_dispatcher() {
        let (sink, buffer) = pinned();
        let other = Dispatch::new(tracing_subscriber::fmt().with_writer(io::sink).finish());

        tracing::dispatcher::with_default(&other, || {
            sink.emit(Level::INFO, "started handling request", &Entry::new());
        });

        assert!(buffer.contents().contains("started handling request"));
    }

    #[test]
    fn global_sink_resolves_the_dispatcher_when_emitting() {
        let sink = TracingSink::global();
        let (dispatch, buffer) = capture::dispatch();

        tracing::dispatcher::with_default(&dispatch, || {
            sink.emit(Level::INFO, "started handling request", &Entry::new());
        });
        assert!(buffer.contents().contains("started handling request"));

        let (later, later_buffer) = capture::dispatch();
        tracing::dispatcher::with_default(&later, || {
            sink.emit(Level::WARN, "completed handling request", &Entry::new());
        });
        assert!(later_buffer.contents().contains("completed handling request"));
        assert!(!buffer.contents().contains("completed handling request"));
    }

    #[test]
    fn recording_sink_keeps_emission_order() {
        let sink = Arc::new(RecordingSink::new());
        sink.emit(Level::INFO, "first", &Entry::new());
        sink.emit(Level::WARN, "second", &Entry::new().with(field::STATUS, 404u16));

        assert_eq!(sink.messages(), ["first", "second"]);
        assert_eq!(sink.records()[1].level, Level::WARN);

        sink.clear();
        assert!(sink.is_empty());
    }
}
