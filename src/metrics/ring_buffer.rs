/// Fixed-capacity circular buffer. Once full, each push overwrites the oldest
/// slot; the write index wraps modulo capacity.
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy> {
    slots: Vec<T>,
    capacity: usize,
    next: usize,
}

impl<T: Copy> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            next: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(item);
        } else {
            self.slots[self.next] = item;
        }
        self.next = (self.next + 1) % self.capacity;
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let split = if self.slots.len() < self.capacity {
            0
        } else {
            self.next
        };
        self.slots[split..].iter().chain(self.slots[..split].iter())
    }

    pub fn latest(&self) -> Option<T> {
        if self.slots.is_empty() {
            return None;
        }
        let index = (self.next + self.capacity - 1) % self.capacity;
        self.slots.get(index).copied()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.next = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
