use futures::StreamExt;
use futures::executor::block_on;
use narwhal::algo::force;
use narwhal::{Edge, Error, ForceJob, ForceOptions, ForceWorker, Graph, Node, WorkerEvent, finish};

fn ring(n: usize) -> Graph {
    Graph::new(
        (0..n).map(|i| Node::new(format!("n{i}"))).collect(),
        (0..n)
            .map(|i| Edge::directed(format!("e{i}"), format!("n{i}"), format!("n{}", (i + 1) % n)))
            .collect(),
    )
}

fn job(n: usize, iterations: usize) -> ForceJob {
    ForceJob {
        graph: ring(n),
        options: ForceOptions {
            iterations,
            ..Default::default()
        },
    }
}

#[test]
fn worker_reports_progress_every_ten_iterations_and_at_the_end() {
    let mut worker = ForceWorker::new();
    let events: Vec<WorkerEvent> = block_on(worker.start(job(5, 25)).collect());

    let progress: Vec<(usize, f64)> = events
        .iter()
        .filter_map(|e| match e {
            WorkerEvent::Progress {
                iteration,
                progress,
                positions,
            } => {
                assert_eq!(positions.len(), 5);
                Some((*iteration, *progress))
            }
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(10, 0.4), (20, 0.8), (25, 1.0)]);
    assert!(matches!(events.last(), Some(WorkerEvent::Complete { .. })));
}

#[test]
fn worker_result_matches_the_synchronous_layout() {
    let j = job(8, 60);
    let expected = force::layout(&j.graph, &j.options).positions;
    let mut worker = ForceWorker::new();
    let positions = block_on(finish(worker.start(j))).expect("worker result");
    assert_eq!(positions, expected);
}

#[test]
fn stopped_worker_reports_stopped_with_positions() {
    let mut worker = ForceWorker::new();
    let events = worker.start(job(40, 1_000_000));
    worker.stop();
    let all: Vec<WorkerEvent> = block_on(events.collect());
    match all.last() {
        Some(WorkerEvent::Stopped { positions }) => assert_eq!(positions.len(), 40),
        other => panic!("unexpected terminal event: {other:?}"),
    }
}

#[test]
fn finish_maps_stop_to_an_error() {
    let mut worker = ForceWorker::new();
    let events = worker.start(job(40, 1_000_000));
    worker.stop();
    assert!(matches!(block_on(finish(events)), Err(Error::WorkerStopped)));
}

#[test]
fn starting_again_supersedes_the_previous_run() {
    let mut worker = ForceWorker::new();
    let first = worker.start(job(40, 1_000_000));
    let second = worker.start(job(4, 15));

    let first_events: Vec<WorkerEvent> = block_on(first.collect());
    assert!(
        first_events
            .iter()
            .all(|e| matches!(e, WorkerEvent::Progress { .. }))
    );
    let positions = block_on(finish(second)).expect("second run completes");
    assert_eq!(positions.len(), 4);
}

#[test]
fn worker_is_idle_before_start() {
    let worker = ForceWorker::new();
    assert!(!worker.is_running());
    worker.stop();
}
