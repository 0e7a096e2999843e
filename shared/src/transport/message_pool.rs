/// Recycles payload buffers between dispatches.
///
/// Handlers only ever borrow a payload for one dispatch. The owner hands the
/// buffer back with [`MessagePool::release`] right after.
pub struct MessagePool {
    free: Vec<Vec<u8>>,
    capacity: usize,
    allocated: usize,
    released: usize,
}

impl Default for MessagePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

pub const DEFAULT_POOL_CAPACITY: usize = 256;

// buffers that grew past this are dropped instead of kept around
const MAX_RETAINED_BUFFER: usize = 64 * 1024;

impl MessagePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
            allocated: 0,
            released: 0,
        }
    }

    /// An empty buffer, reused when one is free
    pub fn allocate(&mut self) -> Vec<u8> {
        self.allocated += 1;
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, mut buffer: Vec<u8>) {
        self.released += 1;
        if self.free.len() < self.capacity && buffer.capacity() <= MAX_RETAINED_BUFFER {
            buffer.clear();
            self.free.push(buffer);
        }
    }

    pub fn free_buffers(&self) -> usize {
        self.free.len()
    }

    /// Buffers handed out and not yet released
    pub fn outstanding(&self) -> usize {
        self.allocated.saturating_sub(self.released)
    }
}
