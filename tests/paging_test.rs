/*!
 * Paging Engine Tests
 * Fault, eviction and teardown behaviour of the LRU paging engine
 */

use paging_kernel::memory::{AccessOutcome, MemoryError, PagingEngine};
use paging_kernel::{PageKey, Process};
use pretty_assertions::assert_eq;

fn process(pid: u32, size: usize) -> Process {
    Process::new(pid, format!("p{}", pid), size, 1, false)
}

fn fault(frame: usize, evicted: Option<(u32, usize)>) -> AccessOutcome {
    AccessOutcome::Fault {
        frame,
        evicted: evicted.map(PageKey::from),
    }
}

#[test]
fn test_two_frame_scenario() {
    let mut engine = PagingEngine::new(2, 64).unwrap();
    let mut a = process(1, 100);
    let mut b = process(2, 64);
    assert_eq!(engine.allocate(&mut a).unwrap(), 2);
    assert_eq!(engine.allocate(&mut b).unwrap(), 1);

    assert_eq!(engine.access(&a, 0, false).unwrap(), fault(0, None));
    assert_eq!(engine.access(&a, 1, false).unwrap(), fault(1, None));
    assert_eq!(engine.access(&b, 0, false).unwrap(), fault(0, Some((1, 0))));
    assert_eq!(engine.access(&a, 0, false).unwrap(), fault(1, Some((1, 1))));

    let status = engine.status();
    let occupants: Vec<_> = status.frames.iter().map(|f| f.occupant()).collect();
    assert_eq!(
        occupants,
        vec![Some(PageKey::new(2, 0)), Some(PageKey::new(1, 0))]
    );
    assert_eq!(status.lru_order, vec![PageKey::new(2, 0), PageKey::new(1, 0)]);

    // A.vpn1 is the only page left in swap; A.vpn0's old slot was dropped on reload
    let swapped: Vec<_> = status.swap_index.iter().map(|e| (e.pid, e.vpn)).collect();
    assert_eq!(swapped, vec![(1, 1)]);
    assert_eq!(status.stats.faults, 4);
    assert_eq!(status.stats.evictions, 2);
}

#[test]
fn test_hit_refreshes_recency() {
    let mut engine = PagingEngine::new(2, 64).unwrap();
    let mut a = process(1, 192);
    engine.allocate(&mut a).unwrap();

    engine.access(&a, 0, false).unwrap();
    engine.access(&a, 1, false).unwrap();
    assert_eq!(
        engine.access(&a, 0, false).unwrap(),
        AccessOutcome::Hit { frame: 0 }
    );

    // vpn 1 is now the stalest page
    assert_eq!(engine.access(&a, 2, false).unwrap(), fault(1, Some((1, 1))));
}

#[test]
fn test_write_flag_does_not_change_behaviour() {
    let run = |write: bool| {
        let mut engine = PagingEngine::new(2, 64).unwrap();
        let mut a = process(1, 256);
        engine.allocate(&mut a).unwrap();
        let outcomes: Vec<_> = [0, 1, 2, 0, 3, 1]
            .iter()
            .map(|&vpn| engine.access(&a, vpn, write).unwrap())
            .collect();
        (outcomes, engine.status())
    };

    assert_eq!(run(false), run(true));
}

#[test]
fn test_out_of_range_vpn() {
    let mut engine = PagingEngine::new(2, 64).unwrap();
    let mut a = process(1, 100);
    engine.allocate(&mut a).unwrap();

    let err = engine.access(&a, 2, false).unwrap_err();
    assert_eq!(
        err,
        MemoryError::InvalidAddress {
            pid: 1,
            vpn: 2,
            page_count: 2
        }
    );
    assert_eq!(engine.status().stats.faults, 0);
}

#[test]
fn test_free_process_reclaims_frames_and_swap() {
    let mut engine = PagingEngine::new(2, 64).unwrap();
    let mut a = process(1, 192);
    let mut b = process(2, 64);
    engine.allocate(&mut a).unwrap();
    engine.allocate(&mut b).unwrap();

    for vpn in 0..3 {
        engine.access(&a, vpn, false).unwrap();
    }
    engine.access(&b, 0, false).unwrap();
    assert!(engine.swapped_pages(1) > 0);

    engine.free_process(1);

    let status = engine.status();
    assert_eq!(engine.resident_pages(1), 0);
    assert_eq!(engine.swapped_pages(1), 0);
    assert_eq!(status.lru_order, vec![PageKey::new(2, 0)]);
    assert_eq!(status.free_frames(), 1);
    assert!(status.swap_index.iter().all(|e| e.pid != 1));

    // Freed process can no longer be accessed
    assert_eq!(
        engine.access(&a, 0, false).unwrap_err(),
        MemoryError::UnknownProcess(1)
    );
}

#[test]
fn test_free_frame_is_reused_before_eviction() {
    let mut engine = PagingEngine::new(2, 64).unwrap();
    let mut a = process(1, 64);
    let mut b = process(2, 64);
    let mut c = process(3, 64);
    engine.allocate(&mut a).unwrap();
    engine.allocate(&mut b).unwrap();
    engine.allocate(&mut c).unwrap();

    engine.access(&a, 0, false).unwrap();
    engine.access(&b, 0, false).unwrap();
    engine.free_process(1);

    assert_eq!(engine.access(&c, 0, false).unwrap(), fault(0, None));
    assert_eq!(engine.stats().evictions, 0);
}

#[test]
fn test_status_does_not_mutate() {
    let mut engine = PagingEngine::new(1, 64).unwrap();
    let mut a = process(1, 128);
    engine.allocate(&mut a).unwrap();
    engine.access(&a, 0, false).unwrap();
    engine.access(&a, 1, false).unwrap();

    let first = engine.status();
    let second = engine.status();
    assert_eq!(first, second);
}
