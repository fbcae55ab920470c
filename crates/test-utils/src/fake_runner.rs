use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use pollwatch::errors::{PollwatchError, Result};
use pollwatch::exec::{CommandRunner, CommandSpec};

/// Shared log of every spec a [`FakeRunner`] was asked to run.
pub type Invocations = Arc<Mutex<Vec<CommandSpec>>>;

/// A fake command runner that:
/// - records every invocation
/// - replies with scripted results in order, then with `default_output`.
pub struct FakeRunner {
    invocations: Invocations,
    script: VecDeque<Result<Vec<u8>>>,
    default_output: Vec<u8>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            script: VecDeque::new(),
            default_output: Vec::new(),
        }
    }

    /// Output returned once the script is exhausted.
    pub fn with_default_output(mut self, output: impl Into<Vec<u8>>) -> Self {
        self.default_output = output.into();
        self
    }

    /// Queue a successful run.
    pub fn then_ok(mut self, output: impl Into<Vec<u8>>) -> Self {
        self.script.push_back(Ok(output.into()));
        self
    }

    /// Queue a spawn failure.
    pub fn then_spawn_error(mut self, command: &str) -> Self {
        self.script.push_back(Err(PollwatchError::CommandSpawn {
            command: command.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }));
        self
    }

    /// Queue any error, e.g. a `CommandFailed` built from a real exit status.
    pub fn then_err(mut self, err: PollwatchError) -> Self {
        self.script.push_back(Err(err));
        self
    }

    /// Handle to the invocation log; stays valid after the runner is moved.
    pub fn invocations(&self) -> Invocations {
        Arc::clone(&self.invocations)
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        {
            let mut guard = self.invocations.lock().unwrap();
            guard.push(spec.clone());
        }

        let result = self
            .script
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_output.clone()));

        Box::pin(async move { result })
    }
}
