//! PHP built-in server supervision.
//!
//! The child's stdout and stderr are drained by capture threads that
//! forward each line into a channel; consumers read them via `logs()`.
//! The supervisor itself never renders text to the user.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{info, warn};

use crate::errors::{ServerError, ServerResult};
use crate::port::{find_available_port, port_in_use};

/// How many consecutive ports to try starting at the requested one.
const PORT_SCAN_ATTEMPTS: u16 = 10;

/// Version line of the PHP interpreter on PATH, if any.
pub fn php_version() -> Option<String> {
    let output = Command::new("php").arg("-v").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout.lines().next().map(|line| line.trim().to_string())
}

/// Supervisor for the `php -S` development server.
pub struct PhpServer {
    child: Option<Child>,
    capture: Vec<JoinHandle<()>>,
    log_tx: Sender<String>,
    log_rx: Receiver<String>,
    port: u16,
    document_root: PathBuf,
}

impl PhpServer {
    pub fn new() -> Self {
        let (log_tx, log_rx) = unbounded();
        Self {
            child: None,
            capture: Vec::new(),
            log_tx,
            log_rx,
            port: 8000,
            document_root: PathBuf::from("."),
        }
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => child.try_wait().map(|status| status.is_none()).unwrap_or(false),
            None => false,
        }
    }

    /// Receiver for the server's log lines.
    pub fn logs(&self) -> Receiver<String> {
        self.log_rx.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Start serving `document_root` on `port`, scanning upward for a
    /// free port when the requested one is taken.
    pub fn start(&mut self, document_root: impl Into<PathBuf>, port: u16) -> ServerResult<()> {
        if self.is_running() {
            return Err(ServerError::AlreadyRunning { port: self.port });
        }

        let requested = port;
        let port = if port_in_use(requested) {
            let found = find_available_port(requested, PORT_SCAN_ATTEMPTS).ok_or(
                ServerError::PortsExhausted {
                    start: requested,
                    end: requested.saturating_add(PORT_SCAN_ATTEMPTS - 1),
                },
            )?;
            info!(requested, using = found, "port busy, moved to next free port");
            found
        } else {
            requested
        };

        let document_root = document_root.into();
        let mut child = Command::new("php")
            .arg("-S")
            .arg(format!("localhost:{port}"))
            .arg("-t")
            .arg(&document_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ServerError::PhpNotFound,
                _ => ServerError::Io(e),
            })?;

        if let Some(stdout) = child.stdout.take() {
            self.capture
                .push(spawn_capture("php-stdout", stdout, self.log_tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            self.capture
                .push(spawn_capture("php-stderr", stderr, self.log_tx.clone()));
        }

        self.child = Some(child);
        self.port = port;
        self.document_root = document_root;

        info!(port, root = %self.document_root.display(), "php server started");
        let _ = self.log_tx.send(format!(
            "[ember] serving {} at http://localhost:{port}",
            self.document_root.display()
        ));
        Ok(())
    }

    /// Stop the server. Idempotent; safe when nothing is running.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                warn!(error = %e, "failed to kill php server");
            }
            let _ = child.wait();
            info!("php server stopped");
            let _ = self.log_tx.send("[ember] server stopped".to_string());
        }
        // Pipes close once the child is gone, so the capture threads hit
        // EOF and exit.
        for handle in self.capture.drain(..) {
            let _ = handle.join();
        }
    }

    /// Stop and start again with the retained settings.
    pub fn restart(&mut self) -> ServerResult<()> {
        let root = self.document_root.clone();
        let port = self.port;
        self.stop();
        self.start(root, port)
    }
}

impl Default for PhpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PhpServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_capture<R>(name: &str, pipe: R, tx: Sender<String>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            for line in BufReader::new(pipe).lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "log capture ended");
                        break;
                    }
                }
            }
        })
        .expect("failed to spawn log capture thread")
}
