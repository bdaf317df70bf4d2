//! Runs the external lookup executable.

use super::errors::*;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Starts one run of an executable and waits for it.
pub trait Launch {
    /// Runs `args[0]` with the remaining arguments and returns its stdout.
    ///
    /// Fails with `Launch` if the process cannot be started, `ExitStatus` if
    /// it exits unsuccessfully and `Timeout` if it runs past its budget.
    fn launch(&mut self, args: &[String]) -> Result<Vec<u8>>;
}

/// Launches real child processes with a wall-clock budget.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    timeout: Duration,
    poll: Duration,
}

impl ProcessLauncher {
    /// A launcher that kills children running longer than `timeout`.
    pub fn new(timeout: Duration) -> ProcessLauncher {
        ProcessLauncher {
            timeout: timeout,
            poll: Duration::from_millis(50),
        }
    }

    /// Changes how often a running child is checked.
    pub fn poll_interval(mut self, poll: Duration) -> ProcessLauncher {
        self.poll = poll;
        self
    }
}

impl Launch for ProcessLauncher {
    fn launch(&mut self, args: &[String]) -> Result<Vec<u8>> {
        let (exe, rest) = match args.split_first() {
            Some(split) => split,
            None => bail!(ErrorKind::Launch(String::new())),
        };

        let mut child = Command::new(exe)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .chain_err(|| ErrorKind::Launch(exe.clone()))?;
        trace!("spawned {} (pid {})", exe, child.id());

        // Drain stdout concurrently, a full pipe would stall the child.
        let mut stdout = child.stdout.take();
        let reader = thread::spawn(move || -> ::std::io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            if let Some(ref mut out) = stdout {
                out.read_to_end(&mut buf)?;
            }
            Ok(buf)
        });

        // A budget too large for the clock means no deadline.
        let deadline = Instant::now().checked_add(self.timeout);
        let status = loop {
            let polled = match child.try_wait() {
                Ok(polled) => polled,
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e.into());
                }
            };
            if let Some(status) = polled {
                break status;
            }
            if deadline.map_or(false, |d| Instant::now() >= d) {
                warn!("{} exceeded {:?}, killing pid {}", exe, self.timeout, child.id());
                // The child may exit between the check and the kill.
                let _ = child.kill();
                child.wait()?;
                if reader.join().is_err() {
                    warn!("stdout reader of {} panicked", exe);
                }
                bail!(ErrorKind::Timeout(self.timeout.as_secs()));
            }
            thread::sleep(self.poll);
        };

        let output = match reader.join() {
            Ok(read) => read?,
            Err(_) => bail!("stdout reader of {} panicked", exe),
        };

        if !status.success() {
            bail!(ErrorKind::ExitStatus(status.code()));
        }
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command line running `body` with `/bin/sh`.
    fn script(dir: &TempDir, name: &str, body: &str) -> Vec<String> {
        let path = dir.path().join(name);
        fs::write(&path, format!("{}\n", body)).unwrap();
        vec!["/bin/sh".to_string(), path.to_string_lossy().into_owned()]
    }

    fn launcher(secs: u64) -> ProcessLauncher {
        ProcessLauncher::new(Duration::from_secs(secs)).poll_interval(Duration::from_millis(10))
    }

    #[test]
    fn captures_stdout_and_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = script(&dir, "echo.sh", "echo \"$1 $2 $5\"");
        for a in &["in.json", "3", "out.txt", "7", "5"] {
            args.push(a.to_string());
        }
        let out = launcher(10).launch(&args).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "in.json 3 5\n");
    }

    #[test]
    fn large_output_does_not_block() {
        let dir = tempfile::tempdir().unwrap();
        let exe = script(&dir, "big.sh", "i=0; while [ $i -lt 20000 ]; do echo 0123456789; i=$((i+1)); done");
        let out = launcher(30).launch(&exe).unwrap();
        assert_eq!(out.len(), 20000 * 11);
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let exe = script(&dir, "fail.sh", "exit 3");
        let err = launcher(10).launch(&exe).unwrap_err();
        match *err.kind() {
            ErrorKind::ExitStatus(Some(3)) => {}
            ref k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn slow_child_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let exe = script(&dir, "slow.sh", "exec sleep 30");
        let start = Instant::now();
        let err = ProcessLauncher::new(Duration::from_millis(200))
            .poll_interval(Duration::from_millis(10))
            .launch(&exe)
            .unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(10));
        match *err.kind() {
            ErrorKind::Timeout(_) => {}
            ref k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn unbounded_budget_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let exe = script(&dir, "quick.sh", "echo ok");
        let out = ProcessLauncher::new(Duration::from_secs(::std::u64::MAX))
            .poll_interval(Duration::from_millis(5))
            .launch(&exe)
            .unwrap();
        assert_eq!(out, b"ok\n".to_vec());
    }

    #[test]
    fn timed_out_child_with_pending_output() {
        let dir = tempfile::tempdir().unwrap();
        let exe = script(&dir, "chatty.sh", "echo started; exec sleep 30");
        let err = ProcessLauncher::new(Duration::from_millis(200))
            .poll_interval(Duration::from_millis(10))
            .launch(&exe)
            .unwrap_err();
        match *err.kind() {
            ErrorKind::Timeout(0) => {}
            ref k => panic!("unexpected error {:?}", k),
        }
    }

    #[test]
    fn missing_executable() {
        let err = launcher(1)
            .launch(&["/nonexistent/exp-lookup".to_string()])
            .unwrap_err();
        match *err.kind() {
            ErrorKind::Launch(ref exe) => assert_eq!(exe, "/nonexistent/exp-lookup"),
            ref k => panic!("unexpected error {:?}", k),
        }
    }
}
