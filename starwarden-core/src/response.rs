//! Response conversion traits.

use crate::{error::BoxError, hook::HookResult};

/// Trait for converting a handler's output into a [`HookResult`].
///
/// `bool` converts directly: `true` = Stop, `false` = Next. Domain outcome
/// types implement it to say whether later hooks should still see the event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "IntoResponse must implement the `into_response` method."
)]
pub trait IntoResponse {
    /// Convert the output into propagation behavior and optional error.
    fn into_response(self) -> Result<HookResult, BoxError>;
}

impl IntoResponse for bool {
    fn into_response(self) -> Result<HookResult, BoxError> {
        Ok(if self {
            HookResult::Stop
        } else {
            HookResult::Next
        })
    }
}
