//! Engine subprocess lifecycle
//!
//! [`ProcessHandle`] launches one engine process, writes sentences to its
//! stdin and runs a background thread that feeds every stdout line through
//! the dialect's parser into the shared [`SignalSlots`]. A second thread
//! forwards stderr to `tracing`.
//!
//! ```text
//!   caller ── send() ──────────────► stdin ┐
//!                                           │ engine process
//!   caller ◄─ get_*() ── SignalSlots ◄── reader thread ◄── stdout
//! ```

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use super::config::EngineConfig;
use super::dialect::{Dialect, LineParser, SentObservation};
use super::ona::Ona;
use super::opennars::OpenNars;
use super::signals::{Anticipation, SignalSlots};
use super::traits::{EngineState, ReasoningEngine};
use super::transcript::Transcript;
use crate::actions::ActionMapper;
use crate::error::EngineError;
use crate::narsese;

/// Interval between process and reader polls while stopping.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to an ONA shell process
pub type OnaEngine = ProcessHandle<Ona>;

/// Handle to an OpenNARS jar process
pub type OpenNarsEngine = ProcessHandle<OpenNars>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the handle and its reader thread
#[derive(Debug)]
struct Shared {
    slots: SignalSlots,
    state: Mutex<EngineState>,
    last_sent: Mutex<Option<SentObservation>>,
    shutdown: AtomicBool,
}

impl Shared {
    fn new() -> Self {
        Self {
            slots: SignalSlots::new(),
            state: Mutex::new(EngineState::Idle),
            last_sent: Mutex::new(None),
            shutdown: AtomicBool::new(false),
        }
    }

    fn state(&self) -> EngineState {
        *lock(&self.state)
    }

    fn set_state(&self, state: EngineState) {
        *lock(&self.state) = state;
    }

    /// Move `Running` to `Inert`; false if the handle was not running.
    fn mark_inert(&self) -> bool {
        let mut state = lock(&self.state);
        if *state == EngineState::Running {
            *state = EngineState::Inert;
            true
        } else {
            false
        }
    }

    fn last_sent(&self) -> Option<SentObservation> {
        lock(&self.last_sent).clone()
    }
}

/// Process handle for one engine dialect.
///
/// A handle that cannot launch its program, loses its stdin or sees its
/// stdout end turns [`EngineState::Inert`]; from then on `send` does nothing
/// and the `get_*` methods return empty values.
pub struct ProcessHandle<D: Dialect> {
    dialect: D,
    config: EngineConfig,
    mapper: ActionMapper,
    shared: Arc<Shared>,
    transcript: Transcript,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    reader: Option<JoinHandle<()>>,
    next_seq: u64,
}

impl<D: Dialect> ProcessHandle<D> {
    /// Create an idle handle; the transcript, if configured, is opened now.
    pub fn new(dialect: D, config: EngineConfig, mapper: ActionMapper) -> Self {
        let transcript = Transcript::open(config.log_path.as_deref());
        Self {
            dialect,
            config,
            mapper,
            shared: Arc::new(Shared::new()),
            transcript,
            child: None,
            stdin: None,
            reader: None,
            next_seq: 0,
        }
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    /// Process id while the engine is running
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Whether the output transcript is still open
    pub fn is_logging(&self) -> bool {
        self.transcript.is_open()
    }

    /// Executable this handle launches
    pub fn program(&self) -> PathBuf {
        self.config
            .program
            .clone()
            .unwrap_or_else(|| self.dialect.default_program())
    }

    /// Build the launch command with all three standard streams piped.
    pub fn build_command(&self) -> Command {
        let args = self
            .config
            .args
            .clone()
            .unwrap_or_else(|| self.dialect.default_args());

        let mut cmd = Command::new(self.program());
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }

        cmd
    }

    fn spawn(&mut self) -> Result<(), EngineError> {
        let program = self.program();
        let mut child = self.build_command().spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => EngineError::NotFound(program.clone()),
            _ => EngineError::SpawnFailed(e),
        })?;

        let Some(stdout) = child.stdout.take() else {
            reap(&mut child);
            return Err(EngineError::MissingPipe("stdout"));
        };
        let Some(stdin) = child.stdin.take() else {
            reap(&mut child);
            return Err(EngineError::MissingPipe("stdin"));
        };
        if let Some(stderr) = child.stderr.take() {
            drain_stderr(stderr, self.dialect.name());
        }

        self.shared.set_state(EngineState::Running);

        let parser = self.dialect.parser(&self.config.surprise);
        let shared = Arc::clone(&self.shared);
        let transcript = self.transcript.clone();
        let reader = thread::Builder::new()
            .name(format!("{}-reader", self.dialect.name()))
            .spawn(move || read_output(stdout, parser, &shared, &transcript));

        match reader {
            Ok(reader) => {
                info!(
                    dialect = self.dialect.name(),
                    program = %program.display(),
                    pid = child.id(),
                    "Engine started"
                );
                self.reader = Some(reader);
                self.stdin = Some(stdin);
                self.child = Some(child);
                Ok(())
            }
            Err(e) => {
                self.shared.set_state(EngineState::Idle);
                drop(stdin);
                reap(&mut child);
                Err(EngineError::SpawnFailed(e))
            }
        }
    }

    /// Close stdin, give the engine the grace period to exit, then kill it.
    fn terminate(&mut self, mut child: Child) {
        drop(self.stdin.take());

        let deadline = Instant::now() + self.config.stop_grace_period;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    info!(dialect = self.dialect.name(), status = ?status, "Engine exited");
                    return;
                }
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to poll engine process");
                    break;
                }
            }
        }

        if let Err(e) = child.kill() {
            debug!(error = %e, "Engine kill failed");
        }
        match child.wait() {
            Ok(status) => info!(
                dialect = self.dialect.name(),
                status = ?status,
                "Engine killed after grace period"
            ),
            Err(e) => warn!(error = %e, "Failed to reap engine process"),
        }
    }

    fn join_reader(&self, reader: JoinHandle<()>) {
        let deadline = Instant::now() + self.config.reader_join_timeout;
        while !reader.is_finished() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }

        if !reader.is_finished() {
            warn!(
                timeout = ?self.config.reader_join_timeout,
                "Engine reader still blocked, detaching it"
            );
            return;
        }
        if reader.join().is_err() {
            error!("Engine reader panicked");
        }
    }
}

impl<D: Dialect> ReasoningEngine for ProcessHandle<D> {
    fn name(&self) -> &'static str {
        self.dialect.name()
    }

    fn start(&mut self) {
        if self.state() != EngineState::Idle {
            debug!(state = %self.state(), "Engine already started, skipping start");
            return;
        }

        if let Err(e) = self.spawn() {
            warn!(
                dialect = self.dialect.name(),
                error = %e,
                "Engine failed to launch, handle is inert"
            );
            self.shared.set_state(EngineState::Inert);
            self.transcript.close();
            return;
        }

        for sentence in self.dialect.preamble() {
            self.send(&sentence);
        }
    }

    fn state(&self) -> EngineState {
        self.shared.state()
    }

    fn send(&mut self, sentence: &str) {
        if !self.is_running() {
            return;
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return;
        };

        if let Some(term) = narsese::observed_term(sentence) {
            self.next_seq += 1;
            *lock(&self.shared.last_sent) = Some(SentObservation {
                term,
                seq: self.next_seq,
            });
        }

        let mut line = sentence.to_string();
        if !line.ends_with('\n') {
            line.push('\n');
        }

        trace!(sentence = line.trim_end(), "Sending to engine");
        if let Err(e) = stdin
            .write_all(line.as_bytes())
            .and_then(|()| stdin.flush())
        {
            warn!(error = %e, "Engine input closed, handle is inert");
            self.stdin = None;
            self.shared.mark_inert();
        }
    }

    fn send_action(&mut self, action_id: i32) {
        let sentence = self.dialect.goal_sentence(self.mapper.op_for(action_id));
        self.send(&sentence);
    }

    fn get_action(&self) -> Option<String> {
        self.shared.slots.take_action()
    }

    fn get_prediction_error(&self) -> f64 {
        self.shared.slots.take_error()
    }

    fn get_derived(&self) -> Vec<String> {
        self.shared.slots.take_derived()
    }

    fn get_anticipations(&self) -> Vec<Anticipation> {
        self.shared.slots.take_anticipations()
    }

    fn stop(&mut self) {
        if self.state() == EngineState::Stopped {
            return;
        }

        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(child) = self.child.take() {
            info!(dialect = self.dialect.name(), "Stopping engine");
            self.terminate(child);
        }
        self.stdin = None;
        self.transcript.close();

        if let Some(reader) = self.reader.take() {
            self.join_reader(reader);
        }
        self.shared.set_state(EngineState::Stopped);
    }
}

impl<D: Dialect> Drop for ProcessHandle<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Reader thread body: parse stdout line by line until it ends or the
/// handle stops.
fn read_output<P: LineParser>(
    stdout: ChildStdout,
    mut parser: P,
    shared: &Shared,
    transcript: &Transcript,
) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    while !shared.shutdown.load(Ordering::Acquire) {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                debug!("Engine output ended");
                break;
            }
            Ok(_) => {
                let Ok(text) = std::str::from_utf8(&buf) else {
                    trace!(bytes = buf.len(), "Skipping non-UTF-8 engine line");
                    continue;
                };
                let line = text.trim();
                if line.is_empty() {
                    continue;
                }

                transcript.write_line(line);
                trace!(line, "Engine output");

                let last_sent = shared.last_sent();
                for signal in parser.parse(line, last_sent.as_ref()) {
                    debug!(signal = ?signal, "Engine signal");
                    shared.slots.apply(signal);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                warn!(error = %e, "Failed to read engine output");
                break;
            }
        }
    }

    if shared.mark_inert() {
        warn!("Engine output closed, handle is inert");
    }
}

/// Forward engine stderr to `tracing`, classified by level markers.
fn drain_stderr(stderr: ChildStderr, dialect: &'static str) {
    let spawned = thread::Builder::new()
        .name(format!("{dialect}-stderr"))
        .spawn(move || {
            let reader = BufReader::new(stderr);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let is_error = line.contains(" ERROR ")
                            || line.starts_with("ERROR ")
                            || line.contains("Exception");
                        let is_warn = line.contains(" WARN ")
                            || line.starts_with("WARN ")
                            || line.starts_with("WARNING");

                        if is_error {
                            error!(target: "engine", dialect, "{}", line);
                        } else if is_warn {
                            warn!(target: "engine", dialect, "{}", line);
                        } else {
                            debug!(target: "engine", dialect, "{}", line);
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::InvalidData => {}
                    Err(e) => {
                        debug!("Error reading engine stderr: {}", e);
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to spawn engine stderr reader");
    }
}
