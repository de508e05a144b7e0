//! Batch orchestration
//!
//! A batch is dispatched member by member through
//! [`dispatch_request`](crate::dispatcher::dispatch_request). Responses come
//! back in input order, notification outcomes are dropped, and a batch with
//! nothing left to say produces [`DispatchOutput::NoResponse`] rather than an
//! empty array.
//!
//! # Batch Modes
//!
//! - **Sequential**: one member at a time, in order (the default)
//! - **Parallel**: all members polled concurrently on the calling task;
//!   responses are still emitted in input order
//!
//! ```rust
//! use rpcdisp_engine::{BatchMode, DispatchOptions};
//!
//! let options = DispatchOptions::default().batch_mode(BatchMode::Parallel);
//! assert_eq!("sequential".parse::<BatchMode>().unwrap(), BatchMode::Sequential);
//! ```

use crate::config::ConfigError;
use crate::dispatcher::dispatch_request;
use crate::methods::Methods;
use crate::options::DispatchOptions;
use futures::future::try_join_all;
use rpcdisp_core::{DispatchOutput, Request, Result};
use std::fmt;
use std::str::FromStr;

/// How the members of a batch are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Evaluate members one after another, in input order
    #[default]
    Sequential,

    /// Evaluate all members concurrently
    ///
    /// Members must be independent of each other. A cancellation raised by
    /// any member drops the others and propagates.
    Parallel,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::Sequential => "sequential",
            BatchMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(BatchMode::Sequential),
            "parallel" => Ok(BatchMode::Parallel),
            _ => Err(ConfigError::InvalidBatchMode(s.to_string())),
        }
    }
}

/// Dispatch a batch of requests
///
/// Only [`Error::Cancelled`](rpcdisp_core::Error::Cancelled) escapes; every
/// other failure is already a response.
#[tracing::instrument(skip_all, fields(batch_size = requests.len(), mode = %options.batch_mode))]
pub async fn dispatch_batch(
    methods: &Methods,
    requests: Vec<Request>,
    options: &DispatchOptions,
) -> Result<DispatchOutput> {
    if let Some(metrics) = &options.metrics {
        metrics.record_batch(requests.len() as u64, options.batch_mode.as_str());
    }

    let outcomes = match options.batch_mode {
        BatchMode::Sequential => {
            let mut outcomes = Vec::with_capacity(requests.len());
            for request in requests {
                outcomes.push(dispatch_request(methods, request, options).await?);
            }
            outcomes
        }
        BatchMode::Parallel => {
            try_join_all(
                requests
                    .into_iter()
                    .map(|request| dispatch_request(methods, request, options)),
            )
            .await?
        }
    };

    let responses: Vec<_> = outcomes.into_iter().flatten().collect();
    tracing::debug!(response_count = responses.len(), "batch dispatched");

    if responses.is_empty() {
        Ok(DispatchOutput::NoResponse)
    } else {
        Ok(DispatchOutput::Batch(responses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Signature;
    use crate::handler::{from_fn, MethodResult};
    use rpcdisp_core::{Error, Id, Params};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn registry() -> Methods {
        Methods::new()
            .with(
                "sleep_echo",
                Signature::new(["ms", "value"]),
                from_fn(|_ctx, args| async move {
                    let ms: u64 = args.get_as("ms")?;
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(MethodResult::Success(args.get("value").cloned().unwrap_or_default()))
                }),
            )
            .with(
                "cancel",
                Signature::empty(),
                from_fn(|_ctx, _args| async { Err(Error::Cancelled) }),
            )
    }

    fn sleep_echo(ms: u64, value: i64, id: i64) -> Request {
        Request::new("sleep_echo", vec![json!(ms), json!(value)], Id::from(id))
    }

    #[test]
    fn test_parse_batch_mode() {
        assert_eq!("Parallel".parse::<BatchMode>().unwrap(), BatchMode::Parallel);
        assert_eq!(" sequential ".parse::<BatchMode>().unwrap(), BatchMode::Sequential);
        assert!("both".parse::<BatchMode>().is_err());
        assert_eq!(BatchMode::default(), BatchMode::Sequential);
    }

    #[tokio::test]
    async fn test_sequential_batch() {
        let requests = vec![sleep_echo(0, 1, 1), sleep_echo(0, 2, 2)];
        let output = dispatch_batch(&registry(), requests, &DispatchOptions::default())
            .await
            .unwrap();

        let DispatchOutput::Batch(responses) = output else {
            panic!("Expected batch output");
        };
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].result(), Some(&json!(1)));
        assert_eq!(responses[1].result(), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_parallel_batch_keeps_input_order() {
        // First member finishes last.
        let requests = vec![sleep_echo(50, 1, 1), sleep_echo(0, 2, 2), sleep_echo(10, 3, 3)];
        let options = DispatchOptions::default().batch_mode(BatchMode::Parallel);
        let output = dispatch_batch(&registry(), requests, &options).await.unwrap();

        let DispatchOutput::Batch(responses) = output else {
            panic!("Expected batch output");
        };
        let ids: Vec<_> = responses.iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec![Id::from(1i64), Id::from(2i64), Id::from(3i64)]);
    }

    #[tokio::test]
    async fn test_all_notifications_no_response() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let methods = Methods::new().with(
            "count",
            Signature::empty(),
            from_fn(move |_ctx, _args| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(MethodResult::Success(json!(null)))
                }
            }),
        );
        let requests = vec![
            Request::notification("count", Params::Empty),
            Request::notification("count", Params::Empty),
        ];

        let output = dispatch_batch(&methods, requests, &DispatchOptions::default())
            .await
            .unwrap();
        assert_eq!(output, DispatchOutput::NoResponse);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_no_response() {
        let output = dispatch_batch(&registry(), vec![], &DispatchOptions::default())
            .await
            .unwrap();
        assert_eq!(output, DispatchOutput::NoResponse);
    }

    #[tokio::test]
    async fn test_cancellation_propagates_from_batch() {
        for mode in [BatchMode::Sequential, BatchMode::Parallel] {
            let requests = vec![
                sleep_echo(0, 1, 1),
                Request::new("cancel", Params::Empty, Id::from(2i64)),
            ];
            let options = DispatchOptions::default().batch_mode(mode);
            let result = dispatch_batch(&registry(), requests, &options).await;
            assert!(matches!(result, Err(Error::Cancelled)), "{}", mode);
        }
    }
}
