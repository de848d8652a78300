use std::future::Future;

/// The operation failed on its final permitted attempt, or with an error the
/// caller marked as not worth retrying.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Runs `op` up to `max_attempts` times (at least once), stopping at the first
/// success or at the first error `is_retryable` rejects. `op` receives the
/// 1-based attempt number. Nothing is logged here; callers log from `op`.
pub async fn retry_bounded<T, E, F, Fut, P>(
    max_attempts: u32,
    is_retryable: P,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_attempts && is_retryable(&error) => attempt += 1,
            Err(error) => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_succeeds_after_one_retry() {
        let calls = Cell::new(0);
        let result = retry_bounded(
            2,
            |_: &&str| true,
            |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt == 1 {
                        Err("bad json")
                    } else {
                        Ok(attempt)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_bounded(
            2,
            |_: &&str| true,
            |_| {
                calls.set(calls.get() + 1);
                async { Err("bad json") }
            },
        )
        .await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 2);
        assert_eq!(exhausted.last_error, "bad json");
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_bounded(
            5,
            |e: &&str| *e != "fatal",
            |_| {
                calls.set(calls.get() + 1);
                async { Err("fatal") }
            },
        )
        .await;
        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_zero_budget_still_runs_once() {
        let result = retry_bounded(0, |_: &()| true, |_| async { Ok::<_, ()>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
