//! Handler, successor, and chain primitives.
//!
//! A chain is an ordered list of handlers followed by a terminal sink.
//! Successor wiring is explicit: each handler receives a [`Next`] that
//! covers the remaining handlers plus the sink, so forwarding past the
//! last handler deposits the item into the sink. A fresh sink backs
//! every `Chain::handle` invocation; results of separate invocations
//! never mix.

use crate::error::ExtractError;

/// A single processing stage in a chain.
///
/// The only externally observable effect of `handle` is zero or more
/// calls to `next.forward`. A handler must not retain the item beyond
/// the call. Rejecting an item is normal control flow: decline to
/// forward it and return `Ok(())`. Errors propagate synchronously and
/// abort the current chain invocation.
pub trait Handler<T> {
    /// Process one item, forwarding zero or more items to the successor.
    fn handle(&self, item: T, next: &mut Next<'_, T>) -> Result<(), ExtractError>;
}

/// Terminal accumulator of a chain; preserves arrival order.
#[derive(Debug)]
pub struct Sink<T> {
    items: Vec<T>,
}

impl<T> Sink<T> {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Accumulated items, in arrival order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the sink, yielding the accumulated items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    fn accept(&mut self, item: T) {
        self.items.push(item);
    }
}

impl<T> Default for Sink<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The successor slot handed to a handler.
///
/// Borrows the remaining handler slice and the chain's sink for the
/// duration of one dispatch.
pub struct Next<'a, T> {
    rest: &'a [Box<dyn Handler<T>>],
    sink: &'a mut Sink<T>,
}

impl<'a, T> Next<'a, T> {
    /// A successor that forwards straight into `sink`.
    ///
    /// Lets a single handler be exercised without building a chain.
    pub fn terminal(sink: &'a mut Sink<T>) -> Self {
        Self { rest: &[], sink }
    }

    /// Forward an item to the next stage.
    pub fn forward(&mut self, item: T) -> Result<(), ExtractError> {
        match self.rest.split_first() {
            None => {
                self.sink.accept(item);
                Ok(())
            }
            Some((head, rest)) => {
                let mut next = Next {
                    rest,
                    sink: &mut *self.sink,
                };
                head.handle(item, &mut next)
            }
        }
    }
}

/// Ordered sequence of handlers terminated by a sink.
///
/// Built once and reused across many `handle` calls; each call gets its
/// own sink, so a failing handler only loses that one invocation's
/// partial results.
pub struct Chain<T> {
    handlers: Vec<Box<dyn Handler<T>>>,
}

impl<T> Chain<T> {
    /// Build a chain from an ordered handler list (possibly empty).
    pub fn new(handlers: Vec<Box<dyn Handler<T>>>) -> Self {
        Self { handlers }
    }

    /// Number of handler stages (excluding the sink).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain has no handler stages.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Feed one item through the chain and return the sink's contents.
    ///
    /// An empty chain echoes the item back as a one-element sequence, so
    /// callers never special-case chain length.
    pub fn handle(&self, item: T) -> Result<Vec<T>, ExtractError> {
        let mut sink = Sink::new();
        match self.handlers.split_first() {
            None => sink.accept(item),
            Some((head, rest)) => {
                let mut next = Next {
                    rest,
                    sink: &mut sink,
                };
                head.handle(item, &mut next)?;
            }
        }
        Ok(sink.into_items())
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
