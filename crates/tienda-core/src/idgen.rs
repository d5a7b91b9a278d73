//! Human-readable sequential identifiers (`cat-000001`, `var-000042`).
//!
//! One counter per namespace, behind the injectable [`CounterStore`] seam:
//! the in-memory store reproduces process-local counters (reset on
//! restart), while `tienda-db` provides a durable Postgres-backed store so
//! uniqueness survives restarts and multi-process deployment.
//!
//! The generator keeps a process-local set of every id it has issued and
//! re-checks membership before returning, looping until an unused value is
//! found. This guards against counter corruption in the backing store
//! (e.g. a manual reset), not against cross-process collisions.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::constants::{MAX_SEQUENCE, SEQUENCE_WIDTH};
use crate::error::AppError;

/// Atomic per-namespace counter reservation.
///
/// `reserve` hands out 1, 2, 3, … for each namespace independently, and
/// must never return the same value twice for one namespace (within the
/// store's lifetime).
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn reserve(&self, namespace: &str) -> Result<u64, AppError>;
}

/// Process-local counter store: a mutex-guarded map.
///
/// Counters start over at 1 on every process start, so two processes
/// sharing a namespace can collide unless the consuming table enforces
/// uniqueness. Use the durable store for production.
#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn reserve(&self, namespace: &str) -> Result<u64, AppError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| AppError::Internal("counter store mutex poisoned".to_string()))?;
        let counter = counters.entry(namespace.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

/// Generator of formatted text identifiers: `{namespace}-{counter:06}`.
pub struct TextIdGenerator {
    store: Arc<dyn CounterStore>,
    issued: Mutex<HashMap<String, HashSet<String>>>,
}

impl TextIdGenerator {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self {
            store,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Generator backed by process-local counters.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCounterStore::new()))
    }

    /// Issue the next identifier for `namespace`.
    ///
    /// Strictly increasing numeric suffix per namespace; never returns the
    /// same string twice from one generator instance. Fails with
    /// [`AppError::NamespaceExhausted`] once the counter no longer fits in
    /// six digits rather than silently widening the padding.
    pub async fn next(&self, namespace: &str) -> Result<String, AppError> {
        if namespace.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "identifier namespace must not be empty".to_string(),
            ));
        }

        loop {
            let value = self.store.reserve(namespace).await?;
            if value > MAX_SEQUENCE {
                return Err(AppError::NamespaceExhausted {
                    namespace: namespace.to_string(),
                });
            }

            let id = format!("{}-{:0width$}", namespace, value, width = SEQUENCE_WIDTH);

            let mut issued = self
                .issued
                .lock()
                .map_err(|_| AppError::Internal("issued-id mutex poisoned".to_string()))?;
            if issued.entry(namespace.to_string()).or_default().insert(id.clone()) {
                return Ok(id);
            }

            // Backing counter handed out a value we already formatted;
            // keep reserving until an unused one comes back.
            tracing::warn!(namespace = %namespace, id = %id, "duplicate identifier from counter store, retrying");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_sequential_ids_per_namespace() {
        let gen = TextIdGenerator::in_memory();
        assert_eq!(gen.next("cat").await.unwrap(), "cat-000001");
        assert_eq!(gen.next("cat").await.unwrap(), "cat-000002");
        assert_eq!(gen.next("cat").await.unwrap(), "cat-000003");
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let gen = TextIdGenerator::in_memory();
        assert_eq!(gen.next("variante").await.unwrap(), "variante-000001");
        assert_eq!(gen.next("producto").await.unwrap(), "producto-000001");
        assert_eq!(gen.next("variante").await.unwrap(), "variante-000002");
    }

    #[tokio::test]
    async fn test_suffix_increments_by_one() {
        let gen = TextIdGenerator::in_memory();
        let first = gen.next("det-var").await.unwrap();
        let second = gen.next("det-var").await.unwrap();
        let suffix = |id: &str| id.rsplit('-').next().unwrap().parse::<u64>().unwrap();
        assert_eq!(suffix(&second), suffix(&first) + 1);
    }

    #[tokio::test]
    async fn test_empty_namespace_rejected() {
        let gen = TextIdGenerator::in_memory();
        assert!(matches!(
            gen.next("  ").await,
            Err(AppError::InvalidInput(_))
        ));
    }

    /// Store that repeats a value once before advancing, simulating an
    /// externally reset counter.
    struct StutteringStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CounterStore for StutteringStore {
        async fn reserve(&self, _namespace: &str) -> Result<u64, AppError> {
            // Sequence of reservations: 1, 1, 2, 3, ...
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if call == 0 { 1 } else { call as u64 })
        }
    }

    #[tokio::test]
    async fn test_retry_loop_skips_already_issued_ids() {
        let gen = TextIdGenerator::new(Arc::new(StutteringStore {
            calls: AtomicUsize::new(0),
        }));
        assert_eq!(gen.next("var").await.unwrap(), "var-000001");
        // Second call sees the stale "1" again and must loop past it.
        assert_eq!(gen.next("var").await.unwrap(), "var-000002");
    }

    /// Store pinned past the six-digit ceiling.
    struct ExhaustedStore;

    #[async_trait]
    impl CounterStore for ExhaustedStore {
        async fn reserve(&self, _namespace: &str) -> Result<u64, AppError> {
            Ok(MAX_SEQUENCE + 1)
        }
    }

    #[tokio::test]
    async fn test_namespace_exhaustion_fails_loudly() {
        let gen = TextIdGenerator::new(Arc::new(ExhaustedStore));
        match gen.next("cat").await {
            Err(AppError::NamespaceExhausted { namespace }) => assert_eq!(namespace, "cat"),
            other => panic!("expected NamespaceExhausted, got {:?}", other),
        }
    }

    /// Regression for the unsynchronized-counter race: parallel callers on
    /// one namespace must never observe a duplicate identifier.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_callers_get_unique_ids() {
        const TASKS: usize = 16;
        const IDS_PER_TASK: usize = 50;

        let gen = Arc::new(TextIdGenerator::in_memory());
        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let gen = Arc::clone(&gen);
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::with_capacity(IDS_PER_TASK);
                for _ in 0..IDS_PER_TASK {
                    ids.push(gen.next("var").await.unwrap());
                }
                ids
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id.clone()), "duplicate identifier issued: {}", id);
            }
        }
        assert_eq!(seen.len(), TASKS * IDS_PER_TASK);
    }
}
