use std::collections::HashMap;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::fixtures::{BadPoint, Priority};
use crate::state::{Delta, DraftResult, ProviderCommand};

// Upper bound on a single wait so a quiet worker still notices disconnects.
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Pending analysis deadlines keyed by job id.
#[derive(Debug, Default)]
pub struct AnalysisSchedule {
    pending: HashMap<u64, Instant>,
}

impl AnalysisSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, job: u64, due: Instant) {
        self.pending.insert(job, due);
    }

    pub fn cancel(&mut self, job: u64) -> bool {
        self.pending.remove(&job).is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Remove and return every job due at `now`, oldest deadline first.
    pub fn take_due(&mut self, now: Instant) -> Vec<u64> {
        let mut due: Vec<(Instant, u64)> = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(job, at)| (*at, *job))
            .collect();
        due.sort();
        for (_, job) in &due {
            self.pending.remove(job);
        }
        due.into_iter().map(|(_, job)| job).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

pub fn spawn_mock_analyst(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut schedule = AnalysisSchedule::new();
        loop {
            let wait = schedule
                .next_deadline()
                .map(|at| at.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_WAIT)
                .min(IDLE_WAIT);

            match cmd_rx.recv_timeout(wait) {
                Ok(ProviderCommand::StartAnalysis { job, delay }) => {
                    schedule.schedule(job, Instant::now() + delay);
                }
                Ok(ProviderCommand::CancelAnalysis { job }) => {
                    if schedule.cancel(job) {
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] Analyst dropped job {job}"
                        )));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            for job in schedule.take_due(Instant::now()) {
                let draft = mock_draft_result();
                if tx.send(Delta::AnalysisReady { job, draft }).is_err() {
                    return;
                }
            }
        }
    })
}

/// The canned result every simulated run produces.
pub fn mock_draft_result() -> DraftResult {
    DraftResult {
        overall_summary: "Based on the simulated video, the athlete shows great potential with a solid offensive game. The primary area for improvement is defense, particularly in transitioning from a defensive position to an offensive one. The backhand technique is strong, but can be more consistent under pressure.".to_string(),
        strengths: vec![
            "Powerful forehand drive with excellent top-spin.".to_string(),
            "Aggressive net play and effective volley placement.".to_string(),
            "Strong serves with high accuracy.".to_string(),
        ],
        weaknesses: vec![
            BadPoint {
                text: "Inconsistent footwork when moving laterally, affecting defensive reach."
                    .to_string(),
                priority: Priority::High,
            },
            BadPoint {
                text: "Recovery to the center of the court is sometimes slow after a shot."
                    .to_string(),
                priority: Priority::Medium,
            },
            BadPoint {
                text: "Padel face is slightly too open on defensive backhands, leading to shots with less depth.".to_string(),
                priority: Priority::Low,
            },
        ],
        drills: vec![
            "Lateral Shuffle Drills: Practice quick side-to-side movements.".to_string(),
            "Split Step Drills: Focus on a proper split step before every shot.".to_string(),
            "Deep Lob Practice: Work on hitting deep defensive lobs to reset the point."
                .to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_releases_jobs_in_deadline_order() {
        let base = Instant::now();
        let mut schedule = AnalysisSchedule::new();
        schedule.schedule(7, base + Duration::from_millis(30));
        schedule.schedule(3, base + Duration::from_millis(10));
        schedule.schedule(9, base + Duration::from_secs(60));

        assert_eq!(schedule.next_deadline(), Some(base + Duration::from_millis(10)));
        assert!(schedule.take_due(base).is_empty());
        assert_eq!(schedule.take_due(base + Duration::from_millis(40)), vec![3, 7]);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn cancelled_job_never_comes_due() {
        let base = Instant::now();
        let mut schedule = AnalysisSchedule::new();
        schedule.schedule(1, base);
        assert!(schedule.cancel(1));
        assert!(!schedule.cancel(1));
        assert!(schedule.take_due(base + Duration::from_secs(5)).is_empty());
        assert!(schedule.is_empty());
    }
}
