//! Update tracing for debugging layout changes.
//!
//! Keeps a ring buffer of recent `update` outcomes so a presenter can dump
//! what the layout engine saw over a session.

use std::collections::VecDeque;
use std::time::Instant;

use serde::Serialize;

use crate::layout::RegionLayout;
use crate::source::RegionSource;
use crate::types::SplitKind;

/// Maximum number of updates to keep in the trace buffer
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// One recorded layout update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateLogEntry {
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub emulating: bool,
    pub region_count: usize,
    pub split_kind: SplitKind,
    pub changed: bool,
}

/// Update tracer with ring buffer storage
pub struct UpdateTracer {
    entries: VecDeque<UpdateLogEntry>,
    max_entries: usize,
    sequence: u64,
    start_time: Instant,
}

impl UpdateTracer {
    /// Create a new tracer with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a new tracer with specified capacity
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries),
            max_entries,
            sequence: 0,
            start_time: Instant::now(),
        }
    }

    fn timestamp(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Record the state of `layout` right after an update returned `changed`
    pub fn trace_update<S: RegionSource>(&mut self, layout: &RegionLayout<S>, changed: bool) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }

        self.sequence += 1;
        let entry = UpdateLogEntry {
            sequence: self.sequence,
            timestamp_ms: self.timestamp(),
            emulating: layout.is_emulating(),
            region_count: layout.region_count(),
            split_kind: layout.split_kind(),
            changed,
        };
        self.entries.push_back(entry);
    }

    /// Get the last N entries
    pub fn get_last(&self, n: usize) -> Vec<UpdateLogEntry> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start).cloned().collect()
    }

    pub fn get_all(&self) -> Vec<UpdateLogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Number of recorded updates that reported a change
    pub fn change_count(&self) -> usize {
        self.entries.iter().filter(|e| e.changed).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.sequence = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for UpdateTracer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use crate::types::Rect;

    fn layout() -> RegionLayout<ScriptedSource> {
        let client = Rect::new(0, 0, 800, 480);
        RegionLayout::new(ScriptedSource::with_regions(
            client,
            &[Rect::new(0, 0, 400, 480), Rect::new(400, 0, 800, 480)],
        ))
    }

    #[test]
    fn test_trace_update() {
        let mut layout = layout();
        let mut tracer = UpdateTracer::new();

        let changed = layout.update(1);
        tracer.trace_update(&layout, changed);

        let entries = tracer.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].region_count, 2);
        assert_eq!(entries[0].split_kind, SplitKind::Vertical);
        assert!(entries[0].changed);
        assert!(!entries[0].emulating);
    }

    #[test]
    fn test_ring_buffer_overflow() {
        let mut layout = layout();
        let mut tracer = UpdateTracer::with_capacity(3);

        for _ in 0..4 {
            let changed = layout.update(1);
            tracer.trace_update(&layout, changed);
        }

        let entries = tracer.get_all();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].sequence, 2);
        assert_eq!(entries[2].sequence, 4);
        // Only the first update changed anything, and it was evicted
        assert_eq!(tracer.change_count(), 0);
    }

    #[test]
    fn test_get_last_and_clear() {
        let mut layout = layout();
        let mut tracer = UpdateTracer::new();

        for _ in 0..5 {
            let changed = layout.update(1);
            tracer.trace_update(&layout, changed);
        }

        let last = tracer.get_last(2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[1].sequence, 5);
        assert_eq!(tracer.get_last(10).len(), 5);

        tracer.clear();
        assert!(tracer.is_empty());
        assert_eq!(tracer.len(), 0);
    }

    #[test]
    fn test_records_emulation() {
        let mut layout = layout();
        let mut tracer = UpdateTracer::new();

        layout.emulate_screens(2, SplitKind::Horizontal);
        let changed = layout.update(1);
        tracer.trace_update(&layout, changed);

        let entry = &tracer.get_all()[0];
        assert!(entry.emulating);
        assert_eq!(entry.split_kind, SplitKind::Horizontal);
    }
}
