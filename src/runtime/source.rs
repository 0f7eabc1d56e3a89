use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::fmt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncSeekExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// JVM unified logging flag that routes one line per collection to stdout.
pub const JVM_GC_LOG_FLAG: &str = "-Xlog:gc:stdout";

const DEFAULT_TAIL_POLL: Duration = Duration::from_millis(100);

/// A stream of raw diagnostic lines from a managed runtime.
#[async_trait]
pub trait LogSource: Send {
    fn describe(&self) -> String;

    async fn open(&mut self) -> Result<()>;

    /// Waits for the next line. `Ok(None)` means the stream has ended.
    async fn next_line(&mut self) -> Result<Option<String>>;

    fn target_pid(&self) -> Option<u32> {
        None
    }
}

fn unavailable(source: &dyn LogSource, reason: impl ToString) -> AppError {
    AppError::ListenerUnavailable {
        source_name: source.describe(),
        reason: reason.to_string(),
    }
}

/// Runs the runtime as a child process and reads its stdout and stderr.
pub struct ChildProcessSource {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    lines: Option<mpsc::UnboundedReceiver<String>>,
}

impl ChildProcessSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let mut args = args;

        if is_java_launcher(&program) && !has_gc_logging(&args) {
            args.insert(0, JVM_GC_LOG_FLAG.to_string());
        }

        Self {
            program,
            args,
            child: None,
            lines: None,
        }
    }

    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn is_java_launcher(program: &str) -> bool {
    Path::new(program)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == "java")
}

fn has_gc_logging(args: &[String]) -> bool {
    args.iter()
        .any(|arg| arg.starts_with("-Xlog:gc") || arg == "-verbose:gc")
}

/// Strips the line ending and decodes the rest. Runtimes may print
/// arbitrary bytes, so invalid UTF-8 is replaced instead of ending the stream.
fn decode_line(raw: &[u8], origin: impl fmt::Display) -> String {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let raw = &raw[..end];

    match std::str::from_utf8(raw) {
        Ok(line) => line.to_string(),
        Err(e) => {
            tracing::warn!(%origin, error = %e, "log line is not valid UTF-8");
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}

fn forward_lines<R>(reader: R, stream: &'static str, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(decode_line(&buf, stream)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(stream, error = %e, "reading child output failed");
                    break;
                }
            }
        }
    });
}

#[async_trait]
impl LogSource for ChildProcessSource {
    fn describe(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
            .trim_end()
            .to_string()
    }

    async fn open(&mut self) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| unavailable(self, e))?;

        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, "stdout", tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, "stderr", tx);
        }

        self.child = Some(child);
        self.lines = Some(rx);
        Ok(())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.as_mut() {
            Some(rx) => Ok(rx.recv().await),
            None => Err(unavailable(self, "process not started")),
        }
    }

    fn target_pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|child| child.id())
    }
}

/// Follows a GC log file that another process keeps appending to.
pub struct FileTailSource {
    path: PathBuf,
    from_start: bool,
    poll_interval: Duration,
    reader: Option<BufReader<File>>,
    pending: Vec<u8>,
}

impl FileTailSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            from_start: false,
            poll_interval: DEFAULT_TAIL_POLL,
            reader: None,
            pending: Vec::new(),
        }
    }

    /// Replay lines already in the file instead of starting at its end.
    pub fn from_start(mut self, from_start: bool) -> Self {
        self.from_start = from_start;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[async_trait]
impl LogSource for FileTailSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn open(&mut self) -> Result<()> {
        let mut file = File::open(&self.path)
            .await
            .map_err(|e| unavailable(self, e))?;

        if !self.from_start {
            file.seek(SeekFrom::End(0))
                .await
                .map_err(|e| unavailable(self, e))?;
        }

        self.reader = Some(BufReader::new(file));
        Ok(())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        let poll_interval = self.poll_interval;
        let Some(reader) = self.reader.as_mut() else {
            return Err(unavailable(self, "file not opened"));
        };

        loop {
            let read = reader.read_until(b'\n', &mut self.pending).await?;

            if read > 0 && self.pending.ends_with(b"\n") {
                let line = decode_line(&self.pending, self.path.display());
                self.pending.clear();
                return Ok(Some(line));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// In-process line feed, for embedding and tests.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<String>,
}

impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl LogSource for ChannelSource {
    fn describe(&self) -> String {
        "in-process channel".to_string()
    }

    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.rx.recv().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::time::timeout;

    #[test]
    fn test_java_launcher_gets_gc_logging() {
        let source = ChildProcessSource::new(
            "/usr/lib/jvm/bin/java",
            vec!["-jar".to_string(), "app.jar".to_string()],
        );
        assert_eq!(source.args()[0], JVM_GC_LOG_FLAG);
        assert_eq!(source.args().len(), 3);
    }

    #[test]
    fn test_existing_gc_flag_is_kept() {
        let args = vec!["-Xlog:gc*:file=gc.log".to_string(), "Main".to_string()];
        let source = ChildProcessSource::new("java", args.clone());
        assert_eq!(source.args(), args.as_slice());

        let other = ChildProcessSource::new("dotnet", vec!["run".to_string()]);
        assert_eq!(other.args(), ["run".to_string()]);
    }

    #[test]
    fn test_from_command_line() {
        assert!(ChildProcessSource::from_command_line(&[]).is_none());
        let source =
            ChildProcessSource::from_command_line(&["node".to_string(), "app.js".to_string()])
                .unwrap();
        assert_eq!(source.program(), "node");
        assert_eq!(source.describe(), "node app.js");
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let mut source = ChildProcessSource::new("gc-pulse-no-such-runtime", vec![]);
        let err = source.open().await.unwrap_err();
        assert!(matches!(err, AppError::ListenerUnavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_process_lines_from_both_streams() {
        let mut source = ChildProcessSource::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo 'GC(0) Pause 1.0ms'; echo 'GC(1) Pause 2.0ms' >&2".to_string(),
            ],
        );
        source.open().await.unwrap();
        assert!(source.target_pid().is_some());

        let mut lines = Vec::new();
        while let Some(line) = timeout(Duration::from_secs(5), source.next_line())
            .await
            .unwrap()
            .unwrap()
        {
            lines.push(line);
        }
        lines.sort();
        assert_eq!(lines, vec!["GC(0) Pause 1.0ms", "GC(1) Pause 2.0ms"]);
    }

    #[tokio::test]
    async fn test_file_tail_follows_appended_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[0.1s][info][gc] old line before open").unwrap();
        file.flush().unwrap();

        let mut source =
            FileTailSource::new(file.path()).poll_interval(Duration::from_millis(10));
        source.open().await.unwrap();

        write!(file, "[1.0s][info][gc] GC(0) Pause").unwrap();
        file.flush().unwrap();
        writeln!(file, " Young 3.0ms").unwrap();
        file.flush().unwrap();

        let line = timeout(Duration::from_secs(5), source.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            line.as_deref(),
            Some("[1.0s][info][gc] GC(0) Pause Young 3.0ms")
        );
    }

    #[test]
    fn test_decode_line_replaces_invalid_bytes() {
        assert_eq!(decode_line(b"GC(0) Pause 1.0ms\r\n", "test"), "GC(0) Pause 1.0ms");
        assert_eq!(decode_line(b"\xff\xfe junk\n", "test"), "\u{FFFD}\u{FFFD} junk");
    }

    #[tokio::test]
    async fn test_file_tail_survives_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut source = FileTailSource::new(file.path())
            .from_start(true)
            .poll_interval(Duration::from_millis(10));
        source.open().await.unwrap();

        file.write_all(b"GC(0) Pause 1.0ms\n\xff\xfe junk\nGC(1) Pause 2.0ms\n")
            .unwrap();
        file.flush().unwrap();

        let mut lines = Vec::new();
        for _ in 0..3 {
            let line = timeout(Duration::from_secs(5), source.next_line())
                .await
                .unwrap()
                .unwrap();
            lines.push(line.unwrap());
        }
        assert_eq!(
            lines,
            vec!["GC(0) Pause 1.0ms", "\u{FFFD}\u{FFFD} junk", "GC(1) Pause 2.0ms"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_output_survives_invalid_utf8() {
        let mut source = ChildProcessSource::new(
            "sh",
            vec![
                "-c".to_string(),
                "printf 'GC(0) Pause 1.0ms\\n\\377\\376 junk\\nGC(1) Pause 2.0ms\\n'".to_string(),
            ],
        );
        source.open().await.unwrap();

        let mut lines = Vec::new();
        while let Some(line) = timeout(Duration::from_secs(5), source.next_line())
            .await
            .unwrap()
            .unwrap()
        {
            lines.push(line);
        }
        assert_eq!(
            lines,
            vec!["GC(0) Pause 1.0ms", "\u{FFFD}\u{FFFD} junk", "GC(1) Pause 2.0ms"]
        );
    }

    #[tokio::test]
    async fn test_file_tail_from_start() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first").unwrap();
        file.flush().unwrap();

        let mut source = FileTailSource::new(file.path()).from_start(true);
        source.open().await.unwrap();
        let line = timeout(Duration::from_secs(5), source.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let mut source = FileTailSource::new("/nonexistent/gc-pulse/gc.log");
        assert!(matches!(
            source.open().await,
            Err(AppError::ListenerUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_channel_source_ends_when_sender_drops() {
        let (tx, mut source) = ChannelSource::new();
        source.open().await.unwrap();
        tx.send("GC pause 1ms".to_string()).unwrap();
        drop(tx);

        assert_eq!(
            source.next_line().await.unwrap().as_deref(),
            Some("GC pause 1ms")
        );
        assert_eq!(source.next_line().await.unwrap(), None);
    }
}
