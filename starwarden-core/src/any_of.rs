//! The "any-of" evaluator.
//!
//! [`AnyOf`] owns an ordered list of named checks. Evaluation walks the list in
//! insertion order, one check at a time, and returns the first positive answer
//! together with the name of the step that produced it. Later steps are never
//! invoked once a finding exists, so cheap checks belong in front of expensive
//! ones.

use crate::{
    check::{Check, DynCheck},
    error::{BoxError, CheckError},
    event::Event,
    positive::Positive,
};
use std::borrow::Cow;

/// The first positive answer of an [`AnyOf`] evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<T> {
    /// Name of the step that answered.
    pub step: Cow<'static, str>,
    /// The answer itself.
    pub value: T,
}

impl<T: Positive> Positive for Finding<T> {
    fn is_positive(&self) -> bool {
        self.value.is_positive()
    }
}

struct Step<E: Event, T> {
    name: Cow<'static, str>,
    check: Box<dyn DynCheck<E, T>>,
}

/// An ordered, short-circuiting chain of named checks.
///
/// Built once, then shared by every evaluation. The evaluator holds no
/// per-event state, so concurrent evaluations are independent.
///
/// # Example
///
/// ```rust,ignore
/// let gate = AnyOf::builder()
///     .step("USER-BLOCK", BlockedStarrers::new(rules))
///     .step("SELF-STAR", SelfStar)
///     .build();
///
/// if let Some(finding) = gate.evaluate(&event).await? {
///     println!("rejected by {}", finding.step);
/// }
/// ```
pub struct AnyOf<E: Event, T> {
    steps: Vec<Step<E, T>>,
}

impl<E: Event, T: Positive> AnyOf<E, T> {
    /// Start building a chain.
    pub fn builder() -> AnyOfBuilder<E, T> {
        AnyOfBuilder::new()
    }

    /// Step names in evaluation order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|step| step.name.as_ref())
    }

    /// Whether a step with this name was compiled in.
    pub fn contains(&self, name: &str) -> bool {
        self.step_names().any(|step| step == name)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps; such a chain never finds anything.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order and return the first finding.
    ///
    /// A step error stops evaluation and is returned as [`CheckError`]; the
    /// chain itself stays usable for the next event.
    pub async fn evaluate(&self, event: &E) -> Result<Option<Finding<T>>, CheckError> {
        for step in &self.steps {
            let value = step
                .check
                .check_dyn(event)
                .await
                .map_err(|source| CheckError::from_step(step.name.clone(), source))?;
            if value.is_positive() {
                return Ok(Some(Finding {
                    step: step.name.clone(),
                    value,
                }));
            }
        }
        Ok(None)
    }
}

// An AnyOf is itself a check, so chains can be nested.
impl<E: Event, T: Positive> Check<E> for AnyOf<E, T> {
    type Output = Option<Finding<T>>;

    async fn check(&self, event: &E) -> Result<Self::Output, BoxError> {
        Ok(self.evaluate(event).await?)
    }
}

/// Builder for constructing an [`AnyOf`].
pub struct AnyOfBuilder<E: Event, T> {
    steps: Vec<Step<E, T>>,
}

impl<E: Event, T: Positive> Default for AnyOfBuilder<E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event, T: Positive> AnyOfBuilder<E, T> {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a named check. Steps run in the order they were added.
    pub fn step<C>(mut self, name: impl Into<Cow<'static, str>>, check: C) -> Self
    where
        C: Check<E, Output = T>,
    {
        self.steps.push(Step {
            name: name.into(),
            check: Box::new(check),
        });
        self
    }

    /// Build the chain.
    pub fn build(self) -> AnyOf<E, T> {
        AnyOf { steps: self.steps }
    }
}
