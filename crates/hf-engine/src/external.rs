//! Adapter for an EPANET-compatible command-line engine.
//!
//! The engine is invoked as `<executable> <input.inp> <report.rpt> <output.out>`
//! inside a scratch directory, bounded by a timeout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use hf_network::{BuiltNetwork, RunOptions, write_description};
use hf_results::RunResults;
use hf_sim::{CancelToken, ControllerEvent, RunPhase};
use tracing::{debug, info};

use crate::engine::{HydraulicEngine, ProgressFn};
use crate::report::parse_report;
use crate::{EngineError, EngineResult};

/// Environment variable naming the external executable.
pub const EPANET_ENV_VAR: &str = "HYDROFLOW_EPANET";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalEngineConfig {
    pub executable: PathBuf,
    /// Wall-clock bound on one engine invocation
    pub timeout: Duration,
    /// Keep the scratch directory (description, report) after the run
    pub keep_workdir: bool,
}

impl ExternalEngineConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: DEFAULT_TIMEOUT,
            keep_workdir: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn keep_workdir(mut self, keep: bool) -> Self {
        self.keep_workdir = keep;
        self
    }

    /// Executable from [`EPANET_ENV_VAR`], if set and non-empty.
    pub fn from_env() -> Option<Self> {
        std::env::var_os(EPANET_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }
}

#[derive(Debug, Clone)]
pub struct ExternalEngine {
    config: ExternalEngineConfig,
}

impl ExternalEngine {
    pub fn new(config: ExternalEngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExternalEngineConfig {
        &self.config
    }

    fn check_executable(&self) -> EngineResult<()> {
        let path = &self.config.executable;
        let meta = fs::metadata(path).map_err(|e| {
            EngineError::unavailable(format!("executable {} not found: {e}", path.display()))
        })?;
        if !meta.is_file() {
            return Err(EngineError::unavailable(format!(
                "{} is not a file",
                path.display()
            )));
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if meta.permissions().mode() & 0o111 == 0 {
                return Err(EngineError::unavailable(format!(
                    "{} is not executable",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    fn spawn(&self, workdir: &Path, inp: &Path, rpt: &Path, out: &Path) -> EngineResult<Child> {
        Command::new(&self.config.executable)
            .arg(inp)
            .arg(rpt)
            .arg(out)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                EngineError::unavailable(format!(
                    "failed to start {}: {e}",
                    self.config.executable.display()
                ))
            })
    }

    /// Poll the child until it exits, the timeout passes, or the run is
    /// cancelled. The child is killed in the latter two cases.
    fn wait(&self, child: &mut Child, cancel: &CancelToken) -> EngineResult<ExitStatus> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    kill(child);
                    return Err(EngineError::unavailable(format!(
                        "lost track of engine process: {e}"
                    )));
                }
            }
            if cancel.is_cancelled() {
                kill(child);
                return Err(EngineError::Cancelled);
            }
            if started.elapsed() >= self.config.timeout {
                kill(child);
                return Err(EngineError::unavailable(format!(
                    "engine timed out after {:?}",
                    self.config.timeout
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

impl HydraulicEngine for ExternalEngine {
    fn name(&self) -> &'static str {
        "external"
    }

    fn run(
        &mut self,
        built: &BuiltNetwork,
        options: &RunOptions,
        cancel: &CancelToken,
        progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<RunResults> {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        self.check_executable()?;

        let workdir = tempfile::Builder::new()
            .prefix("hydroflow-")
            .tempdir()
            .map_err(|e| EngineError::unavailable(format!("cannot create work directory: {e}")))?;
        let inp = workdir.path().join("network.inp");
        let rpt = workdir.path().join("network.rpt");
        let out = workdir.path().join("network.out");

        fs::write(&inp, write_description(&built.network, options))
            .map_err(|e| EngineError::unavailable(format!("cannot write description: {e}")))?;

        debug!(
            executable = %self.config.executable.display(),
            workdir = %workdir.path().display(),
            "starting external engine"
        );
        let started = Instant::now();
        let mut child = self.spawn(workdir.path(), &inp, &rpt, &out)?;
        let status = self.wait(&mut child, cancel)?;
        if !status.success() {
            return Err(EngineError::unavailable(format!(
                "engine exited with {status}"
            )));
        }

        let report = fs::read_to_string(&rpt)
            .map_err(|e| EngineError::unavailable(format!("cannot read report: {e}")))?;
        let results = parse_report(&report, &built.network, options, self.name())
            .map_err(|e| EngineError::unavailable(format!("unusable report: {e}")))?;

        if self.config.keep_workdir {
            let kept = workdir.keep();
            info!(path = %kept.display(), "kept engine work directory");
        }
        info!(
            steps = results.time_steps.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "external engine finished"
        );

        if let Some(on_event) = progress {
            on_event(&ControllerEvent {
                phase: RunPhase::Done,
                total_steps: results.time_steps.len(),
                sim_hours: f64::from(options.duration_hours),
                iterations: None,
            });
        }
        Ok(results)
    }
}
