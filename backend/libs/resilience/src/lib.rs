/// Resilience patterns for service-to-service calls
///
/// - **Timeout**: Enforces a deadline on a single outbound attempt
/// - **Retry**: Bounded exponential backoff with jitter for transient failures
///
/// # Example: bounded retry around a fallible call
///
/// ```rust,no_run
/// use resilience::{with_retry_if, with_timeout, RetryConfig};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = RetryConfig::default();
///
///     let result = with_retry_if(&config, |_: &String| true, || async {
///         with_timeout(Duration::from_secs(2), async { Ok::<_, String>(42) })
///             .await
///             .map_err(|e| e.to_string())?
///     })
///     .await;
/// }
/// ```

pub mod retry;
pub mod timeout;

pub use retry::{with_retry, with_retry_if, RetryConfig, RetryError};
pub use timeout::{with_timeout, TimeoutError};
