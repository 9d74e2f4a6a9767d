use std::fmt;
use std::io::Read;

use crate::transformer::TransformerQueue;

/// An input stream attached to an operation by the caller.
pub type AttachedStream = Box<dyn Read + Send>;

/// The per-unit-of-work scope a deployment operation executes in.
///
/// A context carries the caller's attached input streams and the queue of
/// deferred transformations that are replayed when the operation is
/// forwarded to subordinate nodes. Each unit of work owns its own context;
/// nothing here is shared between concurrent units of work.
pub trait ExecutionContext {
    /// Number of attached stream slots. Valid indexes are `0..count`.
    fn attached_stream_count(&self) -> usize;

    /// Hand over the stream at `index`, leaving the slot empty.
    ///
    /// Returns `None` if the slot is empty or out of range. The receiver
    /// owns the stream from then on and releases it by dropping it.
    fn take_attached_stream(&mut self, index: usize) -> Option<AttachedStream>;

    /// The deferred transformations queued so far, if any.
    fn transformers(&self) -> Option<&TransformerQueue>;

    /// Storage slot for the deferred transformation queue.
    fn transformer_slot(&mut self) -> &mut Option<TransformerQueue>;

    /// The deferred transformation queue, created on first use.
    fn transformers_or_init(&mut self) -> &mut TransformerQueue {
        self.transformer_slot().get_or_insert_with(TransformerQueue::new)
    }
}

/// A single unit of work: attached streams plus its transformation queue.
#[derive(Default)]
pub struct UnitOfWork {
    streams: Vec<Option<AttachedStream>>,
    transformers: Option<TransformerQueue>,
}

impl UnitOfWork {
    /// A context with no attached streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose streams occupy indexes `0..streams.len()`.
    pub fn with_streams(streams: Vec<AttachedStream>) -> Self {
        Self {
            streams: streams.into_iter().map(Some).collect(),
            transformers: None,
        }
    }

    /// Attach a stream, returning its index.
    pub fn attach_stream(&mut self, stream: impl Read + Send + 'static) -> usize {
        self.streams.push(Some(Box::new(stream)));
        self.streams.len() - 1
    }

    /// Reserve an index whose slot yields no stream.
    pub fn attach_empty_slot(&mut self) -> usize {
        self.streams.push(None);
        self.streams.len() - 1
    }

    /// Remove and return the transformation queue, ending this context's
    /// ownership of it.
    pub fn take_transformers(&mut self) -> Option<TransformerQueue> {
        self.transformers.take()
    }
}

impl ExecutionContext for UnitOfWork {
    fn attached_stream_count(&self) -> usize {
        self.streams.len()
    }

    fn take_attached_stream(&mut self, index: usize) -> Option<AttachedStream> {
        self.streams.get_mut(index).and_then(Option::take)
    }

    fn transformers(&self) -> Option<&TransformerQueue> {
        self.transformers.as_ref()
    }

    fn transformer_slot(&mut self) -> &mut Option<TransformerQueue> {
        &mut self.transformers
    }
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available = self.streams.iter().filter(|s| s.is_some()).count();
        f.debug_struct("UnitOfWork")
            .field("stream_slots", &self.streams.len())
            .field("streams_available", &available)
            .field("transformers", &self.transformers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transformer::CompositeOperationAwareTransformer;
    use dcp_types::ModelNode;

    #[test]
    fn attach_assigns_sequential_indexes() {
        let mut ctx = UnitOfWork::new();
        assert_eq!(ctx.attach_stream(&b"a"[..]), 0);
        assert_eq!(ctx.attach_empty_slot(), 1);
        assert_eq!(ctx.attach_stream(&b"c"[..]), 2);
        assert_eq!(ctx.attached_stream_count(), 3);
    }

    #[test]
    fn take_empties_the_slot_but_keeps_the_count() {
        let stream: AttachedStream = Box::new(&b"payload"[..]);
        let mut ctx = UnitOfWork::with_streams(vec![stream]);
        let mut stream = ctx.take_attached_stream(0).expect("stream attached");
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"payload");

        assert!(ctx.take_attached_stream(0).is_none());
        assert_eq!(ctx.attached_stream_count(), 1);
    }

    #[test]
    fn empty_and_out_of_range_slots_yield_nothing() {
        let mut ctx = UnitOfWork::new();
        ctx.attach_empty_slot();
        assert!(ctx.take_attached_stream(0).is_none());
        assert!(ctx.take_attached_stream(5).is_none());
    }

    #[test]
    fn transformer_queue_is_created_lazily() {
        let mut ctx = UnitOfWork::new();
        assert!(ctx.transformers().is_none());

        ctx.transformers_or_init()
            .push(CompositeOperationAwareTransformer::new(ModelNode::object()));
        ctx.transformers_or_init()
            .push(CompositeOperationAwareTransformer::new(ModelNode::object()));
        assert_eq!(ctx.transformers().map(TransformerQueue::len), Some(2));

        let queue = ctx.take_transformers().unwrap();
        assert_eq!(queue.len(), 2);
        assert!(ctx.transformers().is_none());
    }

    #[test]
    fn debug_reports_slots() {
        let mut ctx = UnitOfWork::new();
        ctx.attach_stream(&b"x"[..]);
        ctx.attach_empty_slot();
        let debug = format!("{ctx:?}");
        assert!(debug.contains("stream_slots: 2"));
        assert!(debug.contains("streams_available: 1"));
    }
}
