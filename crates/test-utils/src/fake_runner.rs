use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use makedag::errors::RecipeError;
use makedag::exec::backend::{CommandRunner, RecipeInvocation, RunFuture};
use makedag::fs::FileSystem;
use makedag::fs::mock::MockFileSystem;

#[derive(Debug, Default)]
struct FakeState {
    executed: Vec<(String, String)>,
    failing: HashSet<String>,
    in_flight: usize,
    max_in_flight: usize,
}

/// A fake command runner that:
/// - records every `(target, command)` it is asked to run
/// - treats `touch <path>` as creating `<path>` on a `MockFileSystem`
/// - fails commands registered with [`FakeRunner::fail_on`] with exit code 1
/// - tracks the highest number of commands running at the same time
#[derive(Debug, Clone)]
pub struct FakeRunner {
    fs: MockFileSystem,
    delay: Option<Duration>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeRunner {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            delay: None,
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Keep every command "running" for `delay` so overlap is observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_on(&self, command: &str) {
        self.lock().failing.insert(command.to_string());
    }

    /// Commands in the order they were started.
    pub fn commands(&self) -> Vec<String> {
        self.lock().executed.iter().map(|(_, c)| c.clone()).collect()
    }

    /// Targets that ran at least one command, in first-start order.
    pub fn targets(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for (target, _) in self.lock().executed.iter() {
            if !out.contains(target) {
                out.push(target.clone());
            }
        }
        out
    }

    pub fn max_in_flight(&self) -> usize {
        self.lock().max_in_flight
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl CommandRunner for FakeRunner {
    fn run_command<'a>(&'a self, invocation: &'a RecipeInvocation) -> RunFuture<'a> {
        Box::pin(async move {
            let fails = {
                let mut state = self.lock();
                state
                    .executed
                    .push((invocation.target.clone(), invocation.command.clone()));
                state.in_flight += 1;
                state.max_in_flight = state.max_in_flight.max(state.in_flight);
                state.failing.contains(&invocation.command)
            };

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.lock().in_flight -= 1;

            if let Some(path) = invocation.command.strip_prefix("touch ") {
                self.fs
                    .write(Path::new(path.trim()), b"")
                    .map_err(|e| RecipeError::Aborted(e.to_string()))?;
            }

            if fails {
                Err(RecipeError::ExitCode(1))
            } else {
                Ok(())
            }
        })
    }
}
