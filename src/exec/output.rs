// src/exec/output.rs

//! Where a recipe's stdout and stderr go.

use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::{info, warn};

use crate::rules::Rule;

/// Destination for one output stream of a recipe process.
#[derive(Debug, Clone, Default)]
pub enum OutputSink {
    /// Share this process's own stream.
    #[default]
    Inherit,
    /// Discard.
    Null,
    /// Emit every line as a `tracing` event at `info`.
    Log,
    /// Append the raw bytes to an in-memory buffer.
    Buffer(CaptureBuffer),
}

impl OutputSink {
    pub(crate) fn stdio(&self) -> Stdio {
        match self {
            OutputSink::Inherit => Stdio::inherit(),
            OutputSink::Null => Stdio::null(),
            OutputSink::Log | OutputSink::Buffer(_) => Stdio::piped(),
        }
    }
}

/// Shared byte buffer; clones append to the same storage.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, data: &[u8]) {
        self.lock().extend_from_slice(data);
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Buffer contents, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Output routing for every recipe of one rule.
#[derive(Debug, Clone, Default)]
pub struct RuleOutput {
    pub stdout: OutputSink,
    pub stderr: OutputSink,
}

impl RuleOutput {
    pub fn new(stdout: OutputSink, stderr: OutputSink) -> Self {
        Self { stdout, stderr }
    }

    /// Capture both streams into the given buffers.
    pub fn capture(stdout: &CaptureBuffer, stderr: &CaptureBuffer) -> Self {
        Self {
            stdout: OutputSink::Buffer(stdout.clone()),
            stderr: OutputSink::Buffer(stderr.clone()),
        }
    }
}

/// Picks the output sinks for a rule's recipes.
///
/// Any `Fn(&dyn Rule) -> RuleOutput` closure is a router.
pub trait OutputRouter: Send + Sync {
    fn route(&self, rule: &dyn Rule) -> RuleOutput;
}

impl<F> OutputRouter for F
where
    F: Fn(&dyn Rule) -> RuleOutput + Send + Sync,
{
    fn route(&self, rule: &dyn Rule) -> RuleOutput {
        self(rule)
    }
}

/// Default router: every rule writes to this process's stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritOutput;

impl OutputRouter for InheritOutput {
    fn route(&self, _rule: &dyn Rule) -> RuleOutput {
        RuleOutput::default()
    }
}

/// Drain a piped child stream into its sink until EOF.
pub(crate) async fn pump<R>(reader: R, sink: OutputSink, target: String, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    match sink {
        OutputSink::Log => {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => info!(target = %target, stream, "{}", line),
                    Ok(None) => break,
                    Err(e) => {
                        warn!(target = %target, stream, error = %e, "failed reading recipe output");
                        break;
                    }
                }
            }
        }
        OutputSink::Buffer(buf) => {
            let mut reader = reader;
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => buf.append(&chunk[..n]),
                    Err(e) => {
                        warn!(target = %target, stream, error = %e, "failed reading recipe output");
                        break;
                    }
                }
            }
        }
        OutputSink::Inherit | OutputSink::Null => {
            let mut reader = reader;
            if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                warn!(target = %target, stream, error = %e, "failed draining recipe output");
            }
        }
    }
}
