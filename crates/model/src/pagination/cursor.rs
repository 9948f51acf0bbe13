use serde::{Deserialize, Serialize};

/// Keyset cursor over a strictly increasing identifier column: the
/// identifier of the last row consumed. Zero means "before the first row".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct PageCursor(u64);

impl PageCursor {
    pub fn start() -> Self {
        PageCursor(0)
    }

    pub fn after(id: u64) -> Self {
        PageCursor(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Advances the cursor. A stale identifier never moves it backwards.
    pub fn advance_to(&mut self, id: u64) {
        if id > self.0 {
            self.0 = id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let mut cursor = PageCursor::start();
        cursor.advance_to(100);
        assert_eq!(cursor.value(), 100);
        cursor.advance_to(50);
        assert_eq!(cursor.value(), 100);
        cursor.advance_to(250);
        assert_eq!(cursor.value(), 250);
    }

    #[test]
    fn starts_before_first_row() {
        assert_eq!(PageCursor::start().value(), 0);
        assert_eq!(PageCursor::after(200).value(), 200);
    }
}
