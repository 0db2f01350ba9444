use std::time::Duration;

use calmpath_core::breathing::CYCLE_SECS;
use calmpath_core::storage::PacerConfig;
use calmpath_core::{BreathingSnapshot, Config, Event, Pacer, Phase, MAX_CYCLES};
use clap::Subcommand;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{runtime, CmdResult};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Run a guided session until it finishes or Ctrl-C is pressed
    Run {
        /// Override the tick period (milliseconds)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Print events as JSON lines instead of progress frames
        #[arg(long)]
        json: bool,
    },
    /// Print phases, durations and the cycle limit as JSON
    Plan,
}

#[derive(Serialize)]
struct PhasePlan {
    phase: Phase,
    prompt: &'static str,
    duration_secs: u32,
}

#[derive(Serialize)]
struct Plan {
    phases: Vec<PhasePlan>,
    cycle_secs: u32,
    max_cycles: u32,
}

pub fn run(action: BreatheAction) -> CmdResult {
    match action {
        BreatheAction::Plan => {
            let plan = Plan {
                phases: Phase::ALL
                    .iter()
                    .map(|&phase| PhasePlan {
                        phase,
                        prompt: phase.prompt(),
                        duration_secs: phase.duration_secs(),
                    })
                    .collect(),
                cycle_secs: CYCLE_SECS,
                max_cycles: MAX_CYCLES,
            };
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        BreatheAction::Run { interval_ms, json } => {
            let config = Config::load_or_default();
            let period = interval_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.pacer.tick_interval());
            runtime()?.block_on(run_session(period, json, &config.pacer))
        }
    }
}

async fn run_session(period: Duration, json: bool, style: &PacerConfig) -> CmdResult {
    let mut pacer = Pacer::new(period);
    let mut events = pacer.take_events().ok_or("breathing event stream unavailable")?;
    let mut frames = pacer.subscribe();

    pacer.start();
    let first = frames.borrow_and_update().clone();
    emit(&mut events, &first, json, style, false)?;

    loop {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                emit(&mut events, &frame, json, style, false)?;
                if !frame.is_running {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                pacer.stop();
                let frame = pacer.snapshot();
                emit(&mut events, &frame, json, style, true)?;
                break;
            }
        }
    }

    pacer.wait().await;
    Ok(())
}

/// Print whatever the pacer produced since the last frame. JSON mode prints
/// the queued events; text mode prints one line for the frame.
fn emit(
    events: &mut UnboundedReceiver<Event>,
    frame: &BreathingSnapshot,
    json: bool,
    style: &PacerConfig,
    aborted: bool,
) -> CmdResult {
    if json {
        while let Ok(event) = events.try_recv() {
            println!("{}", serde_json::to_string(&event)?);
        }
    } else {
        while events.try_recv().is_ok() {}
        println!("{}", text_line(frame, style, aborted));
    }
    Ok(())
}

fn text_line(frame: &BreathingSnapshot, style: &PacerConfig, aborted: bool) -> String {
    if aborted {
        "stopped".to_string()
    } else if frame.is_running {
        render_frame(frame, style)
    } else {
        "done".to_string()
    }
}

fn render_frame(frame: &BreathingSnapshot, style: &PacerConfig) -> String {
    let mut line = format!("{:<14} {}", frame.prompt, frame.seconds_into_phase);
    if style.show_progress_bar {
        let width = style.progress_bar_width as usize;
        let filled = ((frame.progress_pct / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        line.push_str(&format!("  [{}{}]", "#".repeat(filled), ".".repeat(width - filled)));
    }
    line.push_str(&format!(
        "  cycle {}/{}",
        frame.cycles_completed + 1,
        frame.max_cycles
    ));
    line
}
