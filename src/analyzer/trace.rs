use serde::Serialize;

/// Diagnostic events emitted while walking a file. Recoverable skips
/// and recovered facts land here instead of stderr so callers decide
/// what to surface.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    DeclarationSkipped {
        line: i64,
        reason: String,
    },
    CallSiteFound {
        line: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        verb: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    StatusInferred {
        line: i64,
        status: String,
    },
}

pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

/// Discards every event. Used by batch annotation.
#[derive(Debug, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Buffers events for later reporting.
#[derive(Debug, Default)]
pub struct BufferTrace {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for BufferTrace {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
