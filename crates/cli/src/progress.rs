//! Console rendering of job events.

use std::io::Write;

use tokio::sync::mpsc;
use txt2mp3_core::{JobEvent, StageKind};

fn stage_label(stage: StageKind) -> &'static str {
    match stage {
        StageKind::Synthesis => "Converting from txt to wav",
        StageKind::Encode => "Converting from wav to mp3",
    }
}

/// Text to print for an event. Progress lines rewrite themselves with `\r`.
pub fn render(event: &JobEvent) -> Option<String> {
    match event {
        JobEvent::Started { input_file } => Some(format!("Input: {input_file}\n")),
        JobEvent::Stage(progress) => {
            let mut line = format!("\r{}: {}%", stage_label(progress.stage), progress.percent);
            if progress.percent == 100 {
                line.push('\n');
                if progress.stage == StageKind::Encode {
                    line.push('\n');
                }
            }
            Some(line)
        }
        JobEvent::CleanupFailed { path, reason } => Some(format!(
            "Error deleting working_dir: {} - {}.\n",
            path.display(),
            reason
        )),
        JobEvent::Archived { .. } => None,
    }
}

/// Prints events to stdout until the channel closes.
pub async fn render_events(mut rx: mpsc::Receiver<JobEvent>) {
    let mut stdout = std::io::stdout();
    while let Some(event) = rx.recv().await {
        if let Some(text) = render(&event) {
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }
}
