use super::{decode_line, encode_response};
use crate::engine::AnalysisEngine;
use crate::error::{QueryError, QueryResult};
use crate::resolver::SymbolResolver;
use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

/// Per-session counters, logged when the input closes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    /// Request lines read
    pub received: u64,
    /// Answered with a name
    pub resolved: u64,
    /// Answered with `null` because nothing was found
    pub null: u64,
    /// Answered with `null` after a failure
    pub failed: u64,
}

/// The request loop: one response line per request line, in order.
pub struct Worker<E> {
    resolver: SymbolResolver<E>,
    stats: WorkerStats,
}

impl<E: AnalysisEngine> Worker<E> {
    pub fn new(engine: E) -> Self {
        Self {
            resolver: SymbolResolver::new(engine),
            stats: WorkerStats::default(),
        }
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    pub fn resolver(&self) -> &SymbolResolver<E> {
        &self.resolver
    }

    /// Serve until `input` ends.
    ///
    /// Every line is answered and flushed before the next one is read. Only
    /// a failure to write a response ends the loop early, since the host is
    /// gone at that point.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> io::Result<WorkerStats> {
        let mut line = Vec::new();

        loop {
            line.clear();
            match input.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::error!("failed to read request: {e}");
                    break;
                }
            }

            let raw = strip_terminator(&line);
            let response = self.handle_line(raw);

            output.write_all(encode_response(response.as_deref()).as_bytes())?;
            output.write_all(b"\n")?;
            output.flush()?;
        }

        let stats = self.stats;
        tracing::info!(
            received = stats.received,
            resolved = stats.resolved,
            null = stats.null,
            failed = stats.failed,
            "input closed, shutting down"
        );
        Ok(stats)
    }

    /// Answer one request line. Never panics and never fails: every problem
    /// becomes a `None` response and a diagnostic on stderr.
    pub fn handle_line(&mut self, raw: &[u8]) -> Option<String> {
        self.stats.received += 1;

        let resolver = &mut self.resolver;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> QueryResult<Option<String>> {
            let query = decode_line(raw)?;
            resolver.resolve(&query)
        }));
        let result =
            outcome.unwrap_or_else(|payload| Err(QueryError::Panic(panic_message(&*payload))));

        match result {
            Ok(Some(name)) => {
                self.stats.resolved += 1;
                Some(name)
            }
            Ok(None) => {
                self.stats.null += 1;
                None
            }
            Err(err) => {
                self.stats.failed += 1;
                tracing::error!(
                    status = err.status_code(),
                    request = %String::from_utf8_lossy(raw),
                    "{}",
                    err.detail()
                );
                None
            }
        }
    }
}

/// Drop a trailing `\n` or `\r\n`
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
