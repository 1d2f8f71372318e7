// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External tool execution under a deadline. The child is polled until it
// exits or the deadline passes, in which case it is killed and reaped.

use std::io::{self, Read};
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Run `cmd` to completion, or kill it once `timeout` has elapsed.
///
/// Returns `Ok(None)` when the deadline killed the process. Spawn failures
/// (including a missing binary) come back as the raw `io::Error` so callers
/// can word them for their tool.
pub fn output_within(cmd: &mut Command, timeout: Duration) -> io::Result<Option<Output>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes on their own threads so a chatty child never blocks
    // on a full pipe while we poll.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if Instant::now() >= deadline {
            kill(&mut child);
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = join(stdout);
    let stderr = join(stderr);
    Ok(status.map(|status| Output {
        status,
        stdout,
        stderr,
    }))
}

fn kill(child: &mut Child) {
    warn!(pid = child.id(), "Deadline passed; killing child process");
    if let Err(err) = child.kill() {
        warn!(error = %err, "Could not kill child process");
    }
    let _ = child.wait();
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
