//! Positive results.

/// Trait for check answers that are either a finding or nothing.
///
/// # Default Implementations
///
/// - `bool` → `true` is a finding
/// - `String`, `&'static str` → a non-empty string is a finding (the text is
///   the reason)
/// - `Option<T>` → `Some` holding a finding
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a check answer",
    label = "missing `Positive` implementation",
    note = "Implement `Positive` to tell the evaluator when to stop."
)]
pub trait Positive: Send + 'static {
    /// Whether evaluation should stop on this answer.
    fn is_positive(&self) -> bool;
}

impl Positive for bool {
    fn is_positive(&self) -> bool {
        *self
    }
}

impl Positive for String {
    fn is_positive(&self) -> bool {
        !self.is_empty()
    }
}

impl Positive for &'static str {
    fn is_positive(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Positive> Positive for Option<T> {
    fn is_positive(&self) -> bool {
        self.as_ref().is_some_and(Positive::is_positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_answers() {
        assert!(!false.is_positive());
        assert!(!String::new().is_positive());
        assert!(!"".is_positive());
        assert!(!None::<bool>.is_positive());
        assert!(!Some(false).is_positive());
    }

    #[test]
    fn test_truthy_answers() {
        assert!(true.is_positive());
        assert!("no starring webhook posts".to_string().is_positive());
        assert!(Some("reason").is_positive());
    }
}
