//! Tick-trace harness for deterministic, tick-based tests.
//!
//! A trace steps a tiny simulation for a fixed number of ticks and records a
//! snapshot of selected state after each step. Tests then assert on the frames
//! directly or on [`TickTrace::transitions`].

use autosleep_core::SimTick;
use serde::Serialize;

/// Single snapshot frame captured at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Snapshot payload.
    pub snapshot: S,
}

/// Recorded frames of one run.
#[derive(Debug, Clone, Serialize)]
pub struct TickTrace<S> {
    /// Frames, starting with the initial state at tick 0.
    pub frames: Vec<TraceFrame<S>>,
}

impl<S: PartialEq> TickTrace<S> {
    /// Frames whose snapshot differs from the previous frame (the first frame included).
    pub fn transitions(&self) -> Vec<&TraceFrame<S>> {
        let mut out = Vec::new();
        let mut previous: Option<&S> = None;
        for frame in &self.frames {
            if previous != Some(&frame.snapshot) {
                out.push(frame);
            }
            previous = Some(&frame.snapshot);
        }
        out
    }

    /// Last recorded snapshot.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }
}

/// Run a tick trace.
///
/// Captures the initial snapshot at tick 0, then steps `ticks` times, capturing a
/// snapshot after each step (so the trace contains `ticks + 1` frames).
pub fn run_tick_trace<State, Snapshot, StepFn, SnapFn>(
    ticks: u64,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> TickTrace<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(TraceFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(TraceFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    TickTrace { frames }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_has_initial_frame_and_transitions() {
        let trace = run_tick_trace(5, 0u32, |_, n| *n += 1, |_, n| *n / 2);
        assert_eq!(trace.frames.len(), 6);
        let ticks: Vec<u64> = trace.transitions().iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![0, 2, 4]);
        assert_eq!(trace.last(), Some(&2));
    }
}
