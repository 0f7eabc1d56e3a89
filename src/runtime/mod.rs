//! The monitored runtime: where its GC log comes from, and how to ask it for
//! an explicit collection.

pub mod executor;
pub mod jcmd;
pub mod source;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JdkToolsError {
    #[error("jcmd not found in PATH or JAVA_HOME")]
    JcmdNotFound,

    #[error("No target process id for jcmd")]
    NoTargetPid,

    #[error("Failed to execute {command}: {source}")]
    ExecutionFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command timed out: {command}")]
    Timeout { command: String },

    #[error("{command} exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
}
