use dltraj::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner()
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_prefix(name);
                    pb_guard.set_message("Frame 0...");
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message(format!("✓ Done ({} frames)", pb_guard.position()));
                }
                Progress::FrameStarted { frame } => {
                    pb_guard.set_position(frame);
                    pb_guard.set_message(format!("Frame {}...", frame));
                }
                Progress::ChunkFlushed { lines } => {
                    pb_guard.set_message(format!(
                        "Frame {}... ({} lines written)",
                        pb_guard.position(),
                        lines
                    ));
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix}: {msg} [{elapsed}]")
            .expect("Failed to create spinner style template")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.position(), 0);
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_frames() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Converting frames",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.prefix(), "Converting frames");
            assert!(!pb.is_finished());
        }

        callback(Progress::FrameStarted { frame: 3 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 3);
            assert_eq!(pb.message(), "Frame 3...");
        }

        callback(Progress::ChunkFlushed { lines: 1000 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Frame 3... (1000 lines written)");
        }

        callback(Progress::PhaseFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ Done (3 frames)");
        }
    }

    #[test]
    fn messages_do_not_replace_the_frame_status() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Converting" });
        callback(Progress::FrameStarted { frame: 2 });
        callback(Progress::Message(
            "Frame 1 has 1 atom records, header declares 2".to_string(),
        ));
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Frame 2...");
        }

        callback(Progress::PhaseFinish);
        callback(Progress::Message("Frame 2 has 0 atom records, header declares 2".to_string()));
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.message(), "Frame 2 has 0 atom records, header declares 2");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Thread Test",
            });
            callback(Progress::FrameStarted { frame: 1 });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Done (1 frames)");
    }
}
