use chrono::Utc;

/// Generates fresh element ids of the form `<prefix>-<n>`
///
/// `n` is the current time in milliseconds, bumped so that it strictly
/// increases between calls on the same generator.
#[derive(Debug, Clone, Default)]
pub struct ElementIdGenerator {
    last: u64,
}

impl ElementIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose next suffix is at least `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            last: start.saturating_sub(1),
        }
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last.saturating_add(1));
        format!("{}-{}", prefix, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_fast_calls() {
        let mut ids = ElementIdGenerator::new();
        let a = ids.next_id("text");
        let b = ids.next_id("text");
        assert_ne!(a, b);
        assert!(a.starts_with("text-"));
    }

    #[test]
    fn test_suffix_never_goes_backwards() {
        let mut ids = ElementIdGenerator::starting_at(u64::MAX / 2);
        assert_eq!(ids.next_id("button"), format!("button-{}", u64::MAX / 2));
        assert_eq!(ids.next_id("button"), format!("button-{}", u64::MAX / 2 + 1));
    }

    #[test]
    fn test_suffix_saturates_at_max() {
        let mut ids = ElementIdGenerator::starting_at(u64::MAX);
        assert_eq!(ids.next_id("text"), format!("text-{}", u64::MAX));
        assert_eq!(ids.next_id("text"), format!("text-{}", u64::MAX));
    }
}
