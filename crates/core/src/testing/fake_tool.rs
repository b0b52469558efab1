//! Shell script fakes for balcon and ffmpeg.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::stage::{BalconSynthesizer, EncoderConfig, FfmpegEncoder, SynthesizerConfig};

/// What a fake tool does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeToolBehavior {
    /// Append `chunks` blocks of `chunk_bytes` zeros to the output, pausing between them.
    Succeed {
        chunks: u32,
        chunk_bytes: u32,
        delay_ms: u32,
    },
    /// Exit with `exit_code` without writing anything.
    Fail { exit_code: i32 },
    /// Sleep for `secs` seconds, then exit 0 without output.
    Hang { secs: u32 },
}

impl FakeToolBehavior {
    /// Four 4 KiB chunks, 20 ms apart.
    pub fn succeed() -> Self {
        Self::Succeed {
            chunks: 4,
            chunk_bytes: 4096,
            delay_ms: 20,
        }
    }

    pub fn fail(exit_code: i32) -> Self {
        Self::Fail { exit_code }
    }
}

/// A fake tool script on disk.
#[derive(Debug, Clone)]
pub struct FakeTool {
    path: PathBuf,
    log: PathBuf,
}

impl FakeTool {
    /// Writes a fake balcon into `dir`. The output is the value after `-w`.
    pub fn synthesizer(dir: &Path, behavior: FakeToolBehavior) -> io::Result<Self> {
        let locate = r#"out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-w" ]; then out="$arg"; fi
  prev="$arg"
done"#;
        Self::write(dir, "fake-balcon", locate, behavior)
    }

    /// Writes a fake ffmpeg into `dir`. The output is the last argument.
    pub fn encoder(dir: &Path, behavior: FakeToolBehavior) -> io::Result<Self> {
        let locate = r#"out=""
for arg in "$@"; do out="$arg"; done"#;
        Self::write(dir, "fake-ffmpeg", locate, behavior)
    }

    fn write(dir: &Path, name: &str, locate: &str, behavior: FakeToolBehavior) -> io::Result<Self> {
        let path = dir.join(name);
        let log = dir.join(format!("{name}.log"));

        let action = match behavior {
            FakeToolBehavior::Succeed {
                chunks,
                chunk_bytes,
                delay_ms,
            } => {
                let delay = format!("{}.{:03}", delay_ms / 1000, delay_ms % 1000);
                format!(
                    r#"i=0
while [ "$i" -lt {chunks} ]; do
  head -c {chunk_bytes} /dev/zero >> "$out"
  sleep {delay}
  i=$((i + 1))
done
exit 0"#
                )
            }
            FakeToolBehavior::Fail { exit_code } => format!("exit {exit_code}"),
            FakeToolBehavior::Hang { secs } => format!("sleep {secs}\nexit 0"),
        };

        let script = format!(
            "#!/bin/sh\necho \"$@\" >> '{log}'\n{locate}\n{action}\n",
            log = log.display()
        );
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

        Ok(Self { path, log })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One line per invocation, holding the space separated arguments.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// A synthesizer running this script.
    pub fn balcon(&self) -> BalconSynthesizer {
        BalconSynthesizer::new(SynthesizerConfig::with_path(self.path.clone()))
    }

    /// An encoder running this script.
    pub fn ffmpeg(&self) -> FfmpegEncoder {
        FfmpegEncoder::new(EncoderConfig::with_path(self.path.clone()))
    }
}
