//! Run blocking closures or futures uniformly from async code
use ojd_core::{JobDetailsError, Outcome};
use std::future::Future;
use std::pin::Pin;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Unit of work handed to [`run_in_executor`].
pub enum Work<T> {
    /// Plain closure, run on the blocking thread pool.
    Blocking(Box<dyn FnOnce() -> T + Send + 'static>),
    /// Future awaited in place.
    Deferred(BoxFuture<T>),
}

impl<T: Send + 'static> Work<T> {
    pub fn blocking<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::Blocking(Box::new(f))
    }

    /// An already created future.
    pub fn deferred<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// A closure producing a future, called when the work runs.
    pub fn lazy<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self::Deferred(Box::pin(async move { f().await }))
    }
}

/// Await `work` without stalling the runtime.
///
/// Blocking closures go through `spawn_blocking`; a panic inside one is
/// resumed on the caller.
pub async fn run_in_executor<T: Send + 'static>(work: Work<T>) -> Outcome<T> {
    match work {
        Work::Deferred(future) => Ok(future.await),
        Work::Blocking(f) => match tokio::task::spawn_blocking(f).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(JobDetailsError::Executor(e.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn sync_add(x: i32, y: i32) -> i32 {
        x + y
    }

    async fn async_add(x: i32, y: i32) -> i32 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        x + y
    }

    #[tokio::test]
    async fn test_sync_callable() {
        let result = run_in_executor(Work::blocking(|| sync_add(2, 3))).await.unwrap();
        assert_eq!(result, 5);
    }

    #[tokio::test]
    async fn test_async_callable() {
        let result = run_in_executor(Work::lazy(|| async_add(4, 6))).await.unwrap();
        assert_eq!(result, 10);
    }

    #[tokio::test]
    async fn test_future_object() {
        let future = async_add(1, 2);
        let result = run_in_executor(Work::deferred(future)).await.unwrap();
        assert_eq!(result, 3);
    }

    #[tokio::test]
    async fn test_execution_order_is_preserved() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let push = |value: &'static str| {
            let log = Arc::clone(&log);
            move || {
                std::thread::sleep(Duration::from_millis(50));
                log.lock().unwrap().push(value);
            }
        };

        run_in_executor(Work::blocking(push("validate"))).await.unwrap();
        let async_log = Arc::clone(&log);
        run_in_executor(Work::lazy(move || async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            async_log.lock().unwrap().push("run");
        }))
        .await
        .unwrap();
        run_in_executor(Work::blocking(push("save"))).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["validate", "run", "save"]);
    }

    #[tokio::test]
    async fn test_errors_are_values() {
        let result: Outcome<Result<(), String>> =
            run_in_executor(Work::blocking(|| Err("sync error".to_string()))).await;
        assert_eq!(result.unwrap(), Err("sync error".to_string()));
    }

    #[tokio::test]
    #[should_panic(expected = "boom")]
    async fn test_panic_propagates_from_blocking() {
        let _ = run_in_executor::<()>(Work::blocking(|| panic!("boom"))).await;
    }
}
