//! Command queue between the byte receiver and the worker.
//!
//! Single producer (receiver), single consumer (worker). A put never blocks;
//! when the queue is full the line is handed back to the caller and dropped
//! there.

use heapless::spsc::{Consumer, Producer, Queue};

use super::line_buffer::Line;
use crate::config::QUEUE_DEPTH;

/// heapless keeps one slot free to tell full from empty.
const SLOTS: usize = QUEUE_DEPTH + 1;

/// Backing storage for the queue. Create once, then [`split`](Self::split).
pub struct CommandQueue {
    inner: Queue<Line, SLOTS>,
}

/// Receiver end.
pub type LineProducer<'q> = Producer<'q, Line, SLOTS>;

/// Worker end.
pub type LineConsumer<'q> = Consumer<'q, Line, SLOTS>;

impl CommandQueue {
    pub const fn new() -> Self {
        Self { inner: Queue::new() }
    }

    pub fn split(&mut self) -> (LineProducer<'_>, LineConsumer<'_>) {
        self.inner.split()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
