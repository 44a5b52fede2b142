// HistoryStore scenarios driven through the public API only

use script_console::HistoryStore;

fn commit_all(store: &mut HistoryStore, lines: &[&str]) {
    for line in lines {
        store.update(line);
        store.commit();
    }
}

#[test]
fn test_round_trip_of_non_empty_commits() {
    let lines = ["a=1", "b = a + 1", "  indented", "print(b)"];
    let mut store = HistoryStore::new();
    commit_all(&mut store, &lines);

    let mut expected: Vec<&str> = lines.to_vec();
    expected.push("");
    assert_eq!(store.entries().collect::<Vec<_>>(), expected);
    assert_eq!(store.transcript().as_str(), "a=1\nb = a + 1\n  indented\nprint(b)\n");
    assert_eq!(store.cursor(), lines.len());
    assert_eq!(store.transcript().line_count(), lines.len());
}

#[test]
fn test_commit_without_update_after_commit_is_blank() {
    let mut store = HistoryStore::new();
    commit_all(&mut store, &["x=1"]);
    store.commit();

    assert_eq!(store.len(), 2);
    assert_eq!(store.transcript().as_str(), "x=1\n\n");
}

#[test]
fn test_blank_commit_scenario() {
    let mut store = HistoryStore::new();
    commit_all(&mut store, &["x=1", "", "y=2"]);

    assert_eq!(store.entries().collect::<Vec<_>>(), vec!["x=1", "y=2", ""]);
    assert_eq!(store.transcript().as_str(), "x=1\n\ny=2\n");
    assert_eq!(store.cursor(), 2);
}

#[test]
fn test_get_is_stable_past_bounds() {
    let mut store = HistoryStore::new();
    commit_all(&mut store, &["first", "second"]);

    while store.prev() {}
    for _ in 0..10 {
        assert!(!store.prev());
        assert_eq!(store.get(), "first");
    }

    while store.next() {}
    for _ in 0..10 {
        assert!(!store.next());
        assert_eq!(store.get(), "");
    }
}

#[test]
fn test_buffer_line_survives_navigation() {
    let mut store = HistoryStore::new();
    commit_all(&mut store, &["old"]);
    store.update("typing");

    assert!(store.prev());
    assert_eq!(store.get(), "old");
    assert_eq!(store.buffer_line(), "typing");
    assert!(!store.is_at_buffer());

    // committing from an older position seals the live buffer, not the viewed entry
    store.commit();
    assert_eq!(store.committed(), ["old", "typing"]);
    assert!(store.is_at_buffer());
}

#[test]
fn test_store_can_be_shared_behind_a_mutex() {
    use std::sync::{Arc, Mutex};
    use std::thread;

    let store = Arc::new(Mutex::new(HistoryStore::new()));
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut store = store.lock().unwrap();
                store.update(&format!("line {n}"));
                store.commit();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let store = store.lock().unwrap();
    assert_eq!(store.len(), 5);
    assert_eq!(store.transcript().line_count(), 4);
}
