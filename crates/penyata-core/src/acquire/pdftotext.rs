//! Text acquisition via an external pdftotext-compatible tool.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::error::AcquireError;
use crate::models::config::AcquireConfig;

use super::{Result, TextAcquirer};

/// Acquirer that shells out to pdftotext.
pub struct PdftotextAcquirer {
    config: AcquireConfig,
}

impl PdftotextAcquirer {
    pub fn new(config: &AcquireConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn run(&self, path: &Path) -> Result<String> {
        // The tool writes to a file, not stdout, so there is no pipe to
        // drain while polling for the deadline.
        let output = NamedTempFile::new()
            .map_err(|e| AcquireError::Tool(format!("could not create output file: {}", e)))?;

        let mut command = Command::new(&self.config.pdftotext_path);
        if self.config.layout {
            command.arg("-layout");
        }
        command
            .arg("-enc")
            .arg("UTF-8")
            .arg(path)
            .arg(output.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!("Running {:?}", command);

        let mut child = command.spawn().map_err(|e| {
            AcquireError::Tool(format!(
                "could not start {}: {}",
                self.config.pdftotext_path.display(),
                e
            ))
        })?;

        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(AcquireError::Tool(format!(
                            "timed out after {}s",
                            self.config.timeout_secs
                        )));
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => return Err(AcquireError::Tool(format!("wait failed: {}", e))),
            }
        };

        if !status.success() {
            return Err(AcquireError::Tool(format!("exited with {}", status)));
        }

        let text = std::fs::read_to_string(output.path())
            .map_err(|e| AcquireError::Tool(format!("could not read output: {}", e)))?;

        trace!("pdftotext produced {} characters", text.len());

        if text.trim().len() < self.config.min_text_length {
            return Err(AcquireError::Tool("produced no text".to_string()));
        }

        Ok(text)
    }
}

impl TextAcquirer for PdftotextAcquirer {
    fn acquire(&self, path: &Path) -> Result<String> {
        self.run(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_tool(tool: &str) -> AcquireConfig {
        AcquireConfig {
            pdftotext_path: PathBuf::from(tool),
            ..AcquireConfig::default()
        }
    }

    #[test]
    fn test_missing_tool_reports_start_failure() {
        let acquirer = PdftotextAcquirer::new(&config_with_tool("/nonexistent/pdftotext"));

        let err = acquirer.acquire(Path::new("statement.pdf")).unwrap_err();
        match err {
            AcquireError::Tool(msg) => assert!(msg.contains("could not start")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_nonzero_exit_is_reported() {
        let acquirer = PdftotextAcquirer::new(&config_with_tool("/bin/false"));

        let err = acquirer.acquire(Path::new("statement.pdf")).unwrap_err();
        match err {
            AcquireError::Tool(msg) => assert!(msg.contains("exited with")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_empty_output_is_rejected() {
        // /bin/true exits cleanly without writing the output file.
        let acquirer = PdftotextAcquirer::new(&config_with_tool("/bin/true"));

        let err = acquirer.acquire(Path::new("statement.pdf")).unwrap_err();
        match err {
            AcquireError::Tool(msg) => assert!(msg.contains("produced no text")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_slow_tool_is_killed_at_deadline() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-pdftotext");
        let mut file = std::fs::File::create(&script).unwrap();
        writeln!(file, "#!/bin/sh\nsleep 5").unwrap();
        drop(file);
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = config_with_tool(script.to_str().unwrap());
        config.timeout_secs = 1;
        let acquirer = PdftotextAcquirer::new(&config);

        let start = Instant::now();
        let err = acquirer.acquire(Path::new("statement.pdf")).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(4));
        match err {
            AcquireError::Tool(msg) => assert!(msg.contains("timed out after 1s")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
