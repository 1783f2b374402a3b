use ulid::{Generator, Ulid};

/// Produces opaque, unique ids for boards, lists and cards.
///
/// Ids are ULIDs: a millisecond timestamp prefix followed by a random
/// suffix. The generator is monotonic, so two ids from the same generator
/// never collide even within one millisecond.
pub struct IdGenerator {
    inner: Generator,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            inner: Generator::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        match self.inner.generate() {
            Ok(id) => id.to_string(),
            // Random part overflowed within one millisecond
            Err(_) => new_id(),
        }
    }
}

/// A fresh id without a generator. Unique with overwhelming probability.
pub fn new_id() -> String {
    Ulid::new().to_string()
}
