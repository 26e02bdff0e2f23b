//! Shared test utilities used across the agglo crates.

pub mod tracing {
    //! A [`Layer`] that keeps every closed span and every event in memory so
    //! tests can assert on instrumentation.
    use std::collections::HashMap;
    use std::fmt;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    /// Recorded field values, rendered to strings.
    pub type Fields = HashMap<String, String>;

    /// Collects spans and events for later inspection.
    ///
    /// Clones share storage, so keep one handle and install the other:
    ///
    /// ```
    /// use agglo_test_support::tracing::RecordingLayer;
    /// use tracing::Level;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || {
    ///     let _span = tracing::info_span!("core.slink", objects = 3).entered();
    ///     tracing::warn!(objects = 3, "hierarchy incomplete");
    ///     tracing::info!("hierarchy incomplete");
    /// });
    ///
    /// let warnings = layer.events_with_message(Level::WARN, "hierarchy incomplete");
    /// assert_eq!(warnings.len(), 1);
    /// assert_eq!(warnings[0].fields.get("objects").map(String::as_str), Some("3"));
    /// assert_eq!(layer.spans_named("core.slink").len(), 1);
    /// ```
    #[derive(Clone, Default)]
    pub struct RecordingLayer {
        spans: Arc<Mutex<Vec<SpanRecord>>>,
        events: Arc<Mutex<Vec<EventRecord>>>,
    }

    fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl RecordingLayer {
        /// Closed spans, in the order they closed.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            lock(&self.spans).clone()
        }

        /// Events, in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            lock(&self.events).clone()
        }

        /// Closed spans called `name`.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
            lock(&self.spans)
                .iter()
                .filter(|span| span.name == name)
                .cloned()
                .collect()
        }

        /// Events at `level` whose message equals `message`.
        #[must_use]
        pub fn events_with_message(&self, level: Level, message: &str) -> Vec<EventRecord> {
            lock(&self.events)
                .iter()
                .filter(|event| event.level == level && event.message() == Some(message))
                .cloned()
                .collect()
        }
    }

    /// A span as it looked when it closed.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Fields recorded at creation or later through `Span::record`.
        pub fields: Fields,
    }

    /// A single emitted event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// Event fields, including `message`.
        pub fields: Fields,
    }

    impl EventRecord {
        /// The formatted event message, if the event carried one.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.fields.get("message").map(String::as_str)
        }
    }

    /// Per-span storage kept in the registry extensions until close.
    struct OpenSpan(SpanRecord);

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut fields = Fields::new();
            attrs.record(&mut Collector(&mut fields));
            span.extensions_mut().insert(OpenSpan(SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields,
            }));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id)
                && let Some(open) = span.extensions_mut().get_mut::<OpenSpan>()
            {
                values.record(&mut Collector(&mut open.0.fields));
            }
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(&id)
                && let Some(OpenSpan(record)) = span.extensions_mut().remove::<OpenSpan>()
            {
                lock(&self.spans).push(record);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut Collector(&mut fields));
            let metadata = event.metadata();
            lock(&self.events).push(EventRecord {
                level: *metadata.level(),
                target: metadata.target().to_owned(),
                fields,
            });
        }
    }

    struct Collector<'a>(&'a mut Fields);

    impl Collector<'_> {
        fn put(&mut self, field: &Field, value: String) {
            self.0.insert(field.name().to_owned(), value);
        }
    }

    macro_rules! record_with_display {
        ($($method:ident: $ty:ty),* $(,)?) => {
            $(
                fn $method(&mut self, field: &Field, value: $ty) {
                    self.put(field, value.to_string());
                }
            )*
        };
    }

    impl Visit for Collector<'_> {
        record_with_display!(
            record_bool: bool,
            record_i64: i64,
            record_u64: u64,
            record_i128: i128,
            record_u128: u128,
            record_f64: f64,
            record_str: &str,
            record_error: &(dyn std::error::Error + 'static),
        );

        fn record_bytes(&mut self, field: &Field, value: &[u8]) {
            let hex = value.iter().fold(String::new(), |mut out, byte| {
                use std::fmt::Write as _;
                let _ = write!(out, "{byte:02x}");
                out
            });
            self.put(field, hex);
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.put(field, format!("{value:?}"));
        }
    }
}

pub mod ci;
