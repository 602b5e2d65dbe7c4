//! One-shot completion detection.

/// Fires once, the first time a single live group remains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionDetector {
    done: bool,
}

impl CompletionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether completion has already fired. Never resets.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Evaluate the live group count.
    ///
    /// Returns true only on the call that transitions to done; the caller
    /// delivers the solved signal exactly then.
    pub fn check_done(&mut self, live_groups: usize) -> bool {
        if self.done || live_groups != 1 {
            return false;
        }
        self.done = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_one_group() {
        let mut detector = CompletionDetector::new();
        assert!(!detector.check_done(3));
        assert!(!detector.check_done(2));
        assert!(!detector.is_done());
        assert!(detector.check_done(1));
        assert!(detector.is_done());
        assert!(!detector.check_done(1));
        assert!(detector.is_done());
    }

    #[test]
    fn test_zero_groups_is_not_solved() {
        let mut detector = CompletionDetector::new();
        assert!(!detector.check_done(0));
        assert!(!detector.is_done());
    }
}
