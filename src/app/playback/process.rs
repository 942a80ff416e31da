use std::io;
use std::process::{Command as ProcessCommand, Output, Stdio};

use super::{CommandOutput, CommandRunner};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

#[cfg(unix)]
struct ScopedSigaction {
    signum: libc::c_int,
    old_action: libc::sigaction,
}

#[cfg(unix)]
impl ScopedSigaction {
    fn install(signum: libc::c_int, handler: libc::sighandler_t) -> io::Result<Self> {
        unsafe {
            let mut new_action: libc::sigaction = std::mem::zeroed();
            new_action.sa_sigaction = handler;
            libc::sigemptyset(&mut new_action.sa_mask);
            new_action.sa_flags = 0;

            let mut old_action: libc::sigaction = std::mem::zeroed();
            if libc::sigaction(signum, &new_action, &mut old_action) != 0 {
                return Err(io::Error::last_os_error());
            }

            Ok(Self { signum, old_action })
        }
    }

    fn ignore(signum: libc::c_int) -> io::Result<Self> {
        Self::install(signum, libc::SIG_IGN)
    }
}

#[cfg(unix)]
impl Drop for ScopedSigaction {
    fn drop(&mut self) {
        unsafe {
            let _ = libc::sigaction(self.signum, &self.old_action, std::ptr::null_mut());
        }
    }
}

#[cfg(unix)]
extern "C" fn exit_quietly(_signum: libc::c_int) {
    // Only async-signal-safe calls here.
    unsafe { libc::_exit(0) }
}

#[cfg(unix)]
pub(crate) fn with_sigint_ignored<F, R>(f: F) -> io::Result<R>
where
    F: FnOnce() -> io::Result<R>,
{
    let _sigint_guard = ScopedSigaction::ignore(libc::SIGINT)?;
    f()
}

#[cfg(not(unix))]
pub(crate) fn with_sigint_ignored<F, R>(f: F) -> io::Result<R>
where
    F: FnOnce() -> io::Result<R>,
{
    f()
}

#[cfg(unix)]
pub(crate) fn with_interrupt_exiting<F, R>(f: F) -> io::Result<R>
where
    F: FnOnce() -> io::Result<R>,
{
    let handler = exit_quietly as extern "C" fn(libc::c_int) as libc::sighandler_t;
    let _sigint_guard = ScopedSigaction::install(libc::SIGINT, handler)?;
    f()
}

#[cfg(not(unix))]
pub(crate) fn with_interrupt_exiting<F, R>(f: F) -> io::Result<R>
where
    F: FnOnce() -> io::Result<R>,
{
    f()
}

#[cfg(unix)]
fn shell_command(command: &str) -> ProcessCommand {
    let mut cmd = ProcessCommand::new("sh");
    cmd.arg("-c").arg(command);
    unsafe {
        cmd.pre_exec(|| {
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            libc::signal(libc::SIGQUIT, libc::SIG_DFL);
            Ok(())
        });
    }
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> ProcessCommand {
    let mut cmd = ProcessCommand::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Self {
            success: output.status.success(),
            status: output.status.to_string(),
            output: combined,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<CommandOutput> {
        with_sigint_ignored(|| {
            let output = shell_command(command)
                .stdin(Stdio::inherit())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()?;
            Ok(CommandOutput::from(output))
        })
    }
}
