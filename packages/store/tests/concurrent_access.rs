//! Structures shared across threads through a single grid.

use std::sync::Arc;
use std::thread;

use kvgrid_store::{Grid, NativeValue, StructureKind};

#[test]
fn counters_and_maps_are_consistent_across_threads() {
    let grid = Arc::new(Grid::new("concurrency"));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let grid = Arc::clone(&grid);
            thread::spawn(move || {
                for i in 0..100 {
                    grid.counter("hits").unwrap().increment_and_get();
                    grid.map("seen")
                        .unwrap()
                        .put(format!("{}-{}", t, i), NativeValue::from(i as i64));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(grid.counter("hits").unwrap().get(), 800);
    assert_eq!(grid.map("seen").unwrap().size(), 800);
}

#[test]
fn racing_creators_agree_on_one_kind() {
    let grid = Arc::new(Grid::new("race"));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let grid = Arc::clone(&grid);
            thread::spawn(move || {
                if t % 2 == 0 {
                    grid.queue("contested").is_ok()
                } else {
                    grid.list("contested").is_ok()
                }
            })
        })
        .collect();
    let winners: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let kind = grid.kind_of("contested").unwrap();
    assert!(kind == StructureKind::Queue || kind == StructureKind::List);
    assert_eq!(winners.iter().filter(|ok| **ok).count(), 4);
}

#[test]
fn topic_subscribers_see_messages_published_from_other_threads() {
    let grid = Arc::new(Grid::new("pubsub"));
    let inbox = grid.topic("events").unwrap().subscribe();

    let publisher = {
        let grid = Arc::clone(&grid);
        thread::spawn(move || {
            for i in 0..3 {
                grid.topic("events").unwrap().publish(NativeValue::from(i as i64));
            }
        })
    };
    publisher.join().unwrap();

    let received: Vec<_> = inbox.try_iter().collect();
    assert_eq!(
        received,
        vec![
            NativeValue::from(0i64),
            NativeValue::from(1i64),
            NativeValue::from(2i64)
        ]
    );
}
