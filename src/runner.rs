//! External command execution with transcript capture
//!
//! Commands are described as structured program + argument lists and spawned
//! directly, never through a shell, so configuration-sourced values (branch
//! names, ignore patterns) cannot smuggle extra commands in.
//!
//! Every command's output is folded into a plain-text transcript: the echoed
//! command line, then stdout, then stderr. Sequences stop at the first
//! failing command and end with a `SUCCESS` or `FAILURE` summary line, which
//! is exactly what gets archived as the build log.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Exit code reported when the command could not be spawned at all
/// (missing binary, permission denied). Matches the shell convention.
const SPAWN_FAILURE_CODE: i32 = 127;

/// A single external command: program, arguments, optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if needs_quoting(arg) {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// The echo line is informational, but an argument with whitespace would
/// read as several arguments without quoting.
fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || arg.contains('\'') || arg.chars().any(char::is_whitespace)
}

/// Outcome of one command or a whole sequence
#[derive(Debug, Clone)]
pub struct CmdOutcome {
    /// Exit code; 0 means success, -1 means killed by a signal
    pub code: i32,
    /// Captured output in execution order
    pub transcript: String,
}

impl CmdOutcome {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run one command, capturing stdout and stderr into a transcript prefixed
/// by the echoed command line.
///
/// Spawn failures are folded into the transcript with a non-zero code
/// instead of surfacing as a distinct error: to the operator reading the
/// build log, a missing binary is just another failed step.
pub fn run(cmd: &Cmd) -> CmdOutcome {
    debug!(command = %cmd, "running external command");

    let mut process = Command::new(&cmd.program);
    process
        .args(&cmd.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &cmd.cwd {
        process.current_dir(dir);
    }

    let mut transcript = format!("> {cmd}\n");
    match process.output() {
        Ok(output) => {
            transcript.push_str(&String::from_utf8_lossy(&output.stdout));
            transcript.push('\n');
            transcript.push_str(&String::from_utf8_lossy(&output.stderr));
            CmdOutcome {
                code: output.status.code().unwrap_or(-1),
                transcript,
            }
        }
        Err(err) => {
            transcript.push_str(&format!("failed to spawn {}: {err}", cmd.program));
            CmdOutcome {
                code: SPAWN_FAILURE_CODE,
                transcript,
            }
        }
    }
}

/// Run commands in order, stopping at the first non-zero exit.
///
/// The aggregate transcript concatenates each command's transcript and ends
/// with a summary line: `SUCCESS`, or the failing return code and `FAILURE`.
pub fn run_sequence(cmds: &[Cmd]) -> CmdOutcome {
    let mut code = 0;
    let mut transcript = String::new();

    for cmd in cmds {
        let outcome = run(cmd);
        transcript.push_str(&outcome.transcript);
        transcript.push('\n');
        code = outcome.code;
        if code != 0 {
            debug!(command = %cmd, code, "command failed, aborting sequence");
            break;
        }
    }

    if code != 0 {
        transcript.push_str(&format!("\nreturn code {code}\nFAILURE"));
    } else {
        transcript.push_str("\nSUCCESS");
    }

    CmdOutcome { code, transcript }
}
