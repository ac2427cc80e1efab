//! Standard check wrappers.

#[cfg(feature = "timeout")]
pub mod timeout;
pub mod traced;

#[cfg(feature = "timeout")]
pub use timeout::TimeoutCheck;
pub use traced::TracedCheck;
