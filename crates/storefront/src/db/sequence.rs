//! Identity sequence.

/// Issues unique, monotonically increasing identifiers.
///
/// The sequence has no lock of its own. It lives inside [`super::Tables`] and
/// advances only through `&mut`, i.e. while the caller holds the store's
/// write lock, which makes every issued value unique across threads.
#[derive(Debug)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// Start a sequence whose first ID is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue the next ID.
    pub const fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The ID the next call to [`Self::next_id`] will return.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one_and_increments() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.peek(), 1);
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.next_id(), 3);
        assert_eq!(seq.peek(), 4);
    }
}
