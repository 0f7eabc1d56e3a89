use super::executor::execute_command;
use super::JdkToolsError;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const GC_RUN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Available { path: PathBuf },
    NotFound,
    NotExecutable { path: PathBuf },
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolStatus::Available { .. })
    }
}

pub fn detect_jcmd() -> ToolStatus {
    let java_home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
    detect_tool("jcmd", java_home.as_deref())
}

fn detect_tool(name: &str, java_home: Option<&Path>) -> ToolStatus {
    let candidates = java_home
        .map(|home| {
            let mut path = home.join("bin").join(name);
            if cfg!(target_os = "windows") {
                path.set_extension("exe");
            }
            path
        })
        .into_iter()
        .chain(std::iter::once(PathBuf::from(name)));

    for path in candidates {
        match Command::new(&path).arg("-h").output() {
            Ok(output) if output.status.success() || output.status.code() == Some(1) => {
                return ToolStatus::Available { path };
            }
            Ok(_) => return ToolStatus::NotExecutable { path },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(_) => return ToolStatus::NotExecutable { path },
        }
    }

    ToolStatus::NotFound
}

/// Requests an explicit full collection from a running JVM via `jcmd <pid> GC.run`.
#[derive(Debug, Clone)]
pub struct GcTrigger {
    jcmd: PathBuf,
    pid: u32,
}

impl GcTrigger {
    pub fn new(jcmd: PathBuf, pid: u32) -> Self {
        Self { jcmd, pid }
    }

    pub fn locate(pid: Option<u32>) -> Result<Self, JdkToolsError> {
        let pid = pid.ok_or(JdkToolsError::NoTargetPid)?;
        match detect_jcmd() {
            ToolStatus::Available { path } => Ok(Self::new(path, pid)),
            _ => Err(JdkToolsError::JcmdNotFound),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// The command `run` executes, as shown to the user before confirming.
    pub fn command_line(&self) -> String {
        format!("{} {} GC.run", self.jcmd.display(), self.pid)
    }

    pub async fn run(&self) -> Result<String, JdkToolsError> {
        let pid = self.pid.to_string();
        let output = execute_command(&self.jcmd, &[&pid, "GC.run"], Some(GC_RUN_TIMEOUT)).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool_is_not_found() {
        let status = detect_tool("gc-pulse-no-such-jcmd", None);
        assert_eq!(status, ToolStatus::NotFound);
        assert!(!status.is_available());
    }

    #[test]
    fn test_locate_requires_pid() {
        assert!(matches!(
            GcTrigger::locate(None),
            Err(JdkToolsError::NoTargetPid)
        ));
    }

    #[test]
    fn test_command_line() {
        let trigger = GcTrigger::new(PathBuf::from("/opt/jdk/bin/jcmd"), 31337);
        assert_eq!(trigger.command_line(), "/opt/jdk/bin/jcmd 31337 GC.run");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_passes_pid_and_command() {
        let trigger = GcTrigger::new(PathBuf::from("echo"), 4242);
        let output = trigger.run().await.unwrap();
        assert_eq!(output, "4242 GC.run");
        assert_eq!(trigger.pid(), 4242);
    }
}
