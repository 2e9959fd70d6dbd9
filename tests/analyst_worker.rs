use std::sync::mpsc;
use std::time::{Duration, Instant};

use padel_analyst::mock_analyst::{mock_draft_result, spawn_mock_analyst};
use padel_analyst::state::{Delta, ProviderCommand};

fn ready_jobs_within(rx: &mpsc::Receiver<Delta>, window: Duration) -> Vec<u64> {
    let deadline = Instant::now() + window;
    let mut jobs = Vec::new();
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return jobs;
        }
        match rx.recv_timeout(left) {
            Ok(Delta::AnalysisReady { job, .. }) => jobs.push(job),
            Ok(Delta::Log(_)) => {}
            Err(_) => return jobs,
        }
    }
}

#[test]
fn worker_fires_each_job_exactly_once() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_mock_analyst(tx, cmd_rx);

    cmd_tx
        .send(ProviderCommand::StartAnalysis {
            job: 1,
            delay: Duration::from_millis(20),
        })
        .unwrap();

    match rx.recv_timeout(Duration::from_secs(3)) {
        Ok(Delta::AnalysisReady { job, draft }) => {
            assert_eq!(job, 1);
            assert_eq!(draft, mock_draft_result());
        }
        other => panic!("expected a result, got {other:?}"),
    }
    assert!(ready_jobs_within(&rx, Duration::from_millis(300)).is_empty());

    drop(cmd_tx);
    handle.join().expect("worker should exit cleanly");
}

#[test]
fn cancelled_job_never_reports() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_mock_analyst(tx, cmd_rx);

    cmd_tx
        .send(ProviderCommand::StartAnalysis {
            job: 2,
            delay: Duration::from_millis(150),
        })
        .unwrap();
    cmd_tx
        .send(ProviderCommand::StartAnalysis {
            job: 3,
            delay: Duration::from_millis(150),
        })
        .unwrap();
    cmd_tx.send(ProviderCommand::CancelAnalysis { job: 2 }).unwrap();

    assert_eq!(ready_jobs_within(&rx, Duration::from_millis(900)), vec![3]);

    drop(cmd_tx);
    handle.join().expect("worker should exit cleanly");
}
