//! Test doubles shared by the worker and orchestrator tests

use crate::response::Completion;
use crate::traits::{DriverError, RemoteError, RequestDriver, Sampler, SamplerError};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Round-robin sampler over a fixed list of paths
pub struct MockSampler {
    name: String,
    paths: Vec<PathBuf>,
    cursor: AtomicUsize,
}

impl MockSampler {
    pub fn new(count: usize) -> Self {
        Self {
            name: "mock-corpus".to_string(),
            paths: (0..count)
                .map(|i| PathBuf::from(format!("/corpus/page_{i}.png")))
                .collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Sampler for MockSampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.paths.len()
    }

    fn sample(&self) -> Result<&Path, SamplerError> {
        if self.paths.is_empty() {
            return Err(SamplerError::Empty(self.name.clone()));
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.paths.len();
        Ok(&self.paths[i])
    }
}

/// Driver returning a fixed completion, optionally slow or failing
pub struct MockDriver {
    completion: Completion,
    delay: Option<Duration>,
    fail_first: usize,
    fail_every: Option<usize>,
    always_fail: bool,
    calls: AtomicUsize,
    successes: AtomicUsize,
}

impl MockDriver {
    pub fn new(duration: Duration, tokens: u64) -> Self {
        Self {
            completion: Completion::new(duration, tokens),
            delay: None,
            fail_first: 0,
            fail_every: None,
            always_fail: false,
            calls: AtomicUsize::new(0),
            successes: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the first `n` calls
    pub fn with_fail_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    /// Fail every `n`th call (calls n, 2n, ...)
    pub fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    /// Fail every call
    pub fn failing() -> Self {
        let mut driver = Self::new(Duration::ZERO, 0);
        driver.always_fail = true;
        driver
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestDriver for MockDriver {
    fn driver_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn execute(&self, path: &Path) -> Result<Completion, DriverError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let fail = self.always_fail
            || call <= self.fail_first
            || self.fail_every.is_some_and(|n| call % n == 0);
        if fail {
            if call % 2 == 0 {
                return Err(DriverError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "simulated"),
                ));
            }
            return Err(RemoteError::Status {
                status: 500,
                body: "simulated failure".to_string(),
            }
            .into());
        }

        self.successes.fetch_add(1, Ordering::SeqCst);
        Ok(self.completion)
    }
}
