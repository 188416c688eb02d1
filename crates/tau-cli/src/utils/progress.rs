use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use tausim::engine::progress::{Progress, ProgressCallback};
use tracing::warn;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::bar_style());
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
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
                Progress::RunStart { total_timepoints } => {
                    Self::restart(&pb_guard, total_timepoints, "Evolving");
                }
                Progress::TimepointLogged {
                    time,
                    aggregation_state,
                } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!("t={time:<8.2} {aggregation_state}"));
                }
                Progress::EnsembleStart { replicates } => {
                    Self::restart(&pb_guard, replicates, "Replicates");
                }
                Progress::ReplicateFinish => {
                    pb_guard.inc(1);
                }
                Progress::RunFinish | Progress::EnsembleFinish => {
                    if let Some(len) = pb_guard.length() {
                        pb_guard.set_position(len);
                    }
                    pb_guard.finish();
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

    fn restart(pb: &ProgressBar, length: u64, message: &'static str) {
        pb.reset();
        pb.set_length(length);
        pb.set_position(0);
        pb.set_style(Self::bar_style());
        pb.set_message(message);
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
