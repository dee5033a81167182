/*!
 * Kernel Orchestrator Tests
 * End-to-end behaviour of create, step, kill and the background driver
 */

use paging_kernel::memory::AccessOutcome;
use paging_kernel::{KernelBuilder, KernelError, PageKey, ProcessState};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn kernel(frames: usize) -> paging_kernel::Kernel {
    KernelBuilder::new()
        .with_phys_frames(frames)
        .with_page_size(64)
        .build()
        .unwrap()
}

#[test]
fn test_higher_priority_runs_first() {
    let k = kernel(4);
    let low = k.create_process("low", 64, 1, false).unwrap();
    let high = k.create_process("high", 64, 2, false).unwrap();

    assert_eq!(k.step().unwrap().pid, high);
    assert_eq!(k.step().unwrap().pid, high);

    k.block(high).unwrap();
    assert_eq!(k.step().unwrap().pid, low);
}

#[test]
fn test_new_arrival_wins_next_quantum() {
    let k = kernel(4);
    let low = k.create_process("low", 64, 1, false).unwrap();
    assert_eq!(k.step().unwrap().pid, low);
    assert_eq!(k.inspect().scheduler.running, None);

    let high = k.create_process("high", 64, 5, false).unwrap();
    assert_eq!(k.step().unwrap().pid, high);
    assert_eq!(k.inspect().scheduler.stats.preemptions, 0);
}

#[test]
fn test_round_robin_within_priority() {
    let k = kernel(4);
    let a = k.create_process("a", 64, 1, false).unwrap();
    let b = k.create_process("b", 64, 1, false).unwrap();

    let order: Vec<_> = (0..4).map(|_| k.step().unwrap().pid).collect();
    assert_eq!(order, vec![a, b, a, b]);
}

#[test]
fn test_thrashing_processes_evict_each_other() {
    let k = kernel(2);
    let a = k.create_process("a", 128, 1, false).unwrap();
    let b = k.create_process("b", 128, 1, false).unwrap();

    let first = k.step().unwrap();
    assert_eq!(first.faults(), 2);

    let second = k.step().unwrap();
    assert_eq!(second.pid, b);
    assert_eq!(
        second.accesses[0].outcome,
        AccessOutcome::Fault {
            frame: 0,
            evicted: Some(PageKey::new(a, 0))
        }
    );

    let snapshot = k.inspect();
    assert_eq!(snapshot.memory.swap_index.len(), 2);
    assert_eq!(snapshot.memory.stats.evictions, 2);
}

#[test]
fn test_kill_reclaims_and_excludes() {
    let k = kernel(2);
    let a = k.create_process("a", 128, 1, false).unwrap();
    let b = k.create_process("b", 64, 1, false).unwrap();
    k.step();
    k.step();

    k.kill_process(a).unwrap();
    k.kill_process(a).unwrap();

    let snapshot = k.inspect();
    assert!(snapshot.memory.frames.iter().all(|f| f.pid != Some(a)));
    assert!(snapshot.memory.swap_index.iter().all(|e| e.pid != a));
    assert!(snapshot.memory.lru_order.iter().all(|key| key.pid != a));
    let state = snapshot
        .processes
        .iter()
        .find(|p| p.pid == a)
        .map(|p| p.state);
    assert_eq!(state, Some(ProcessState::Terminated));

    for _ in 0..3 {
        assert_eq!(k.step().unwrap().pid, b);
    }

    assert_eq!(k.unblock(a), Ok(()));
    assert_eq!(k.step().unwrap().pid, b);
}

#[test]
fn test_unknown_pid_errors() {
    let k = kernel(1);
    assert_eq!(k.kill_process(9), Err(KernelError::UnknownProcess(9)));
    assert_eq!(k.block(9), Err(KernelError::UnknownProcess(9)));
    assert_eq!(k.unblock(9), Err(KernelError::UnknownProcess(9)));
}

#[test]
fn test_zero_sized_process_runs_without_accesses() {
    let k = kernel(1);
    let pid = k.create_process("empty", 0, 1, false).unwrap();
    let report = k.step().unwrap();
    assert_eq!(report.pid, pid);
    assert!(report.accesses.is_empty());
}

#[test]
fn test_snapshot_serializes() {
    let k = kernel(2);
    k.create_process("a", 100, 1, true).unwrap();
    k.step();

    let json = serde_json::to_value(k.inspect()).unwrap();
    assert_eq!(json["memory"]["frames"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["processes"][0]["state"], "ready");
    assert_eq!(json["scheduler"]["running"], serde_json::Value::Null);
}

#[test]
fn test_concurrent_inspection_sees_consistent_state() {
    let k = Arc::new(kernel(3));
    for i in 0..4 {
        k.create_process(&format!("p{}", i), 64 * (i + 1), (i % 2) as i32, false)
            .unwrap();
    }

    let stepper = {
        let k = Arc::clone(&k);
        thread::spawn(move || {
            for _ in 0..200 {
                k.step();
            }
        })
    };

    for _ in 0..200 {
        let snapshot = k.inspect();
        let resident: Vec<_> = snapshot
            .memory
            .frames
            .iter()
            .filter_map(|f| f.occupant())
            .collect();
        assert_eq!(resident.len(), snapshot.memory.lru_order.len());
        assert!(snapshot.scheduler.running.is_none());
        for key in &resident {
            assert!(snapshot.memory.lru_order.contains(key));
            assert!(snapshot.memory.swap_index.iter().all(|e| PageKey::new(e.pid, e.vpn) != *key));
        }
    }

    stepper.join().unwrap();
}

#[tokio::test]
async fn test_driver_runs_until_shutdown() {
    let k = kernel(2);
    let pid = k.create_process("bg", 64, 1, false).unwrap();

    let driver = k.run(Duration::from_millis(5));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let steps = driver.shutdown().await;
    assert!(steps >= 1);

    // No further steps after shutdown
    let before = k.inspect().scheduler.stats.total_scheduled;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(k.inspect().scheduler.stats.total_scheduled, before);

    tokio_test::assert_ok!(k.kill_process(pid));
}
