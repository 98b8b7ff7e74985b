//! Integration tests for data item bindings.

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lumen::binding::{BindingEvent, DataItemsBinding};
use lumen::model::{aspects, AspectSet, ChangedAspect, DataItem, ImageData, Observable};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing_subscriber::EnvFilter;

const VALUES: [&str; 6] = ["DEF", "ABC", "GHI", "DFG", "ACD", "GIJ"];
const INDEXES: [usize; 6] = [0, 0, 1, 1, 2, 4];
const RESULT: [&str; 6] = ["ABC", "DFG", "ACD", "GHI", "GIJ", "DEF"];

/// Route binding logs to the test output, e.g. `RUST_LOG=lumen::binding=trace`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn data_item(title: &str) -> Arc<DataItem> {
    Arc::new(DataItem::new(ImageData::zeros((16, 16))).with_title(title))
}

/// Items acquired one second apart, oldest first.
fn acquired_items(count: usize) -> Vec<Arc<DataItem>> {
    (0..count)
        .map(|i| {
            let acquired = DateTime::<Utc>::from_timestamp(1_700_000_000 + i as i64, 0).unwrap();
            Arc::new(DataItem::new(ImageData::zeros((16, 16))).with_datetime_original(acquired))
        })
        .collect()
}

fn titles(binding: &DataItemsBinding<DataItem>) -> Vec<String> {
    binding.items().iter().map(|item| item.title()).collect()
}

fn position(items: &[Arc<DataItem>], item: &DataItem) -> usize {
    items
        .iter()
        .position(|candidate| std::ptr::eq(Arc::as_ptr(candidate), item))
        .unwrap_or(usize::MAX)
}

fn same_items(a: &[Arc<DataItem>], b: &[Arc<DataItem>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

#[test]
fn inserting_at_index_zero_with_sort_key_sorts_items() {
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| item.title());
    for value in VALUES {
        binding.insert(data_item(value), 0, false);
    }
    assert_eq!(titles(&binding), sorted(titles(&binding)));
    assert_eq!(binding.len(), 6);
}

#[test]
fn inserting_with_reversed_sort_key_sorts_descending() {
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| item.title());
    binding.set_sort_reverse(true);
    for value in VALUES {
        binding.insert(data_item(value), 0, false);
    }
    let mut expected = sorted(titles(&binding));
    expected.reverse();
    assert_eq!(titles(&binding), expected);
}

#[test]
fn inserting_with_sort_key_and_filter_sorts_accepted_items() {
    let binding = DataItemsBinding::new();
    binding.set_filter(|item: &DataItem| !item.title().starts_with('D'));
    binding.set_sort_key(|item: &DataItem| item.title());
    for value in VALUES {
        binding.insert(data_item(value), 0, false);
    }
    assert_eq!(titles(&binding), vec!["ABC", "ACD", "GHI", "GIJ"]);
}

#[test]
fn inserting_without_sort_key_keeps_source_order() {
    let binding = DataItemsBinding::new();
    for (value, index) in VALUES.into_iter().zip(INDEXES) {
        binding.insert(data_item(value), index, false);
    }
    assert_eq!(titles(&binding), RESULT);
}

#[test]
fn inserting_without_sort_key_but_with_filter_keeps_source_order() {
    let binding = DataItemsBinding::new();
    binding.set_filter(|item: &DataItem| !item.title().starts_with('D'));
    for (value, index) in VALUES.into_iter().zip(INDEXES) {
        binding.insert(data_item(value), index, false);
    }
    let expected: Vec<&str> = RESULT.into_iter().filter(|v| !v.starts_with('D')).collect();
    assert_eq!(expected, vec!["ABC", "ACD", "GHI", "GIJ"]);
    assert_eq!(titles(&binding), expected);

    binding.clear_filter();
    assert_eq!(titles(&binding), RESULT);
}

#[test]
fn filter_binding_follows_binding() {
    let binding = DataItemsBinding::new();
    let chain = DataItemsBinding::filtered(&binding);
    binding.set_sort_key(|item: &DataItem| item.title());
    for value in VALUES {
        binding.insert(data_item(value), 0, false);
    }
    assert_eq!(titles(&binding), sorted(titles(&binding)));
    assert_eq!(titles(&binding), titles(&chain));
}

#[test]
fn filter_binding_inits_with_source_binding() {
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| item.title());
    for value in VALUES {
        binding.insert(data_item(value), 0, false);
    }
    let chain = DataItemsBinding::filtered(&binding);
    assert_eq!(titles(&binding), titles(&chain));
    assert!(same_items(&binding.items(), &chain.master_items()));
}

#[test]
fn sorted_binding_updates_when_item_goes_live() {
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| (item.is_live(), item.datetime_original()));
    binding.set_sort_reverse(true);
    for item in acquired_items(6) {
        binding.insert(item, 0, false);
    }

    let live_item = binding.items()[2].clone();
    let _live = live_item.live();
    assert_eq!(binding.index_of(&live_item), Some(0));
}

#[test]
fn sorted_filtered_binding_updates_when_item_enters_filter() {
    let binding = DataItemsBinding::new();
    binding.set_filter(|item: &DataItem| item.is_live());
    binding.set_sort_key(|item: &DataItem| item.datetime_original());
    let items = acquired_items(4);
    for item in &items {
        binding.insert(item.clone(), 0, false);
    }
    assert!(binding.is_empty());

    let _first = items[0].live();
    binding.content_changed(&items[0], &aspects([ChangedAspect::Metadata]));
    assert_eq!(binding.len(), 1);
    {
        let _third = items[2].live();
        binding.content_changed(&items[2], &aspects([ChangedAspect::Metadata]));
        assert_eq!(binding.len(), 2);
        assert!(binding.index_of(&items[0]).unwrap() < binding.index_of(&items[2]).unwrap());
    }
    assert_eq!(binding.len(), 1);
}

#[test]
fn unsorted_filtered_binding_updates_when_item_enters_filter() {
    let binding = DataItemsBinding::new();
    binding.set_filter(|item: &DataItem| item.is_live());
    let items = acquired_items(4);
    for item in &items {
        binding.insert(item.clone(), 0, false);
    }
    assert!(binding.is_empty());

    let _first = items[0].live();
    binding.content_changed(&items[0], &aspects([ChangedAspect::Metadata]));
    assert_eq!(binding.len(), 1);
    let _third = items[2].live();
    binding.content_changed(&items[2], &aspects([ChangedAspect::Metadata]));
    assert_eq!(binding.len(), 2);
}

#[test]
fn sorted_filtered_binding_updates_when_item_exits_filter() {
    let binding = DataItemsBinding::new();
    binding.set_filter(|item: &DataItem| !item.is_live());
    binding.set_sort_key(|item: &DataItem| item.datetime_original());
    let items = acquired_items(4);
    for item in &items {
        binding.insert(item.clone(), 0, false);
    }
    assert_eq!(binding.len(), 4);

    let _first = items[0].live();
    binding.content_changed(&items[0], &aspects([ChangedAspect::Metadata]));
    assert_eq!(binding.len(), 3);
    assert!(!binding.contains(&items[0]));
}

#[test]
fn filtered_binding_updates_when_source_item_updates() {
    let binding = DataItemsBinding::new();
    let items = acquired_items(4);
    for item in &items {
        binding.insert(item.clone(), 0, false);
    }
    assert_eq!(binding.len(), 4);

    let chain = DataItemsBinding::filtered(&binding);
    chain.set_filter(|item: &DataItem| item.is_live());
    assert!(chain.is_empty());

    let _live = items[0].live();
    binding.content_changed(&items[0], &aspects([ChangedAspect::Metadata]));
    assert_eq!(binding.len(), 4);
    assert!(chain.contains(&items[0]));
    assert_eq!(chain.len(), 1);
}

#[test]
fn random_filter_swaps_in_batch_reach_chained_binding() {
    let mut rng = rand::thread_rng();
    let count = 30;
    let items = Arc::new(acquired_items(count));

    let binding = DataItemsBinding::new();
    for item in items.iter() {
        binding.insert(item.clone(), 0, false);
    }
    let chain = DataItemsBinding::filtered(&binding);

    for _ in 0..10 {
        let first: HashSet<usize> = (0..count).filter(|_| rng.gen_bool(0.5)).collect();
        let second: HashSet<usize> = (0..count).filter(|_| rng.gen_range(0..=100) > 20).collect();

        let sort_items = items.clone();
        binding.set_sort_key(move |item: &DataItem| position(&sort_items, item));
        {
            let _changes = binding.changes();
            let filter_items = items.clone();
            binding.set_filter(move |item: &DataItem| {
                first.contains(&position(&filter_items, item))
            });
            let filter_items = items.clone();
            let accepted = second.clone();
            binding.set_filter(move |item: &DataItem| {
                accepted.contains(&position(&filter_items, item))
            });
        }

        let chained: HashSet<usize> = chain
            .items()
            .iter()
            .map(|item| position(&items, item))
            .collect();
        assert_eq!(chained, second);
    }
}

#[test]
fn equal_sort_keys_keep_master_order_for_any_insertion_order() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let binding = DataItemsBinding::new();
        binding.set_sort_key(|item: &DataItem| item.title().chars().next());

        let mut titles_in = vec!["a1", "b1", "a2", "b2", "a3", "b3", "a4"];
        titles_in.shuffle(&mut rng);
        for title in titles_in {
            let index = rng.gen_range(0..=binding.master_items().len());
            binding.insert(data_item(title), index, false);
        }

        let master = binding.master_items();
        let ordered = binding.items();
        for group in ['a', 'b'] {
            let in_master: Vec<String> = master
                .iter()
                .map(|item| item.title())
                .filter(|title| title.starts_with(group))
                .collect();
            let in_ordered: Vec<String> = ordered
                .iter()
                .map(|item| item.title())
                .filter(|title| title.starts_with(group))
                .collect();
            assert_eq!(in_master, in_ordered);
        }
    }
}

/// Recompute the ordered items from the master items the slow way.
fn expected_items(
    master: &[Arc<DataItem>],
    accept: impl Fn(&DataItem) -> bool,
    reverse: bool,
) -> Vec<Arc<DataItem>> {
    let mut expected: Vec<Arc<DataItem>> =
        master.iter().filter(|item| accept(item)).cloned().collect();
    expected.sort_by(|a, b| {
        let order = a.title().cmp(&b.title());
        if reverse {
            order.reverse()
        } else {
            order
        }
    });
    expected
}

fn random_title(rng: &mut impl Rng) -> String {
    let letters = ['a', 'b', 'c', 'x'];
    (0..2).map(|_| letters[rng.gen_range(0..letters.len())]).collect()
}

#[test]
fn random_operations_keep_ordered_items_consistent() {
    init_tracing();
    let mut rng = rand::thread_rng();
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| item.title());
    binding.set_filter(|item: &DataItem| !item.title().starts_with('x'));
    let chain = DataItemsBinding::filtered(&binding);
    chain.set_filter(|item: &DataItem| !item.title().ends_with('x'));

    let replayed = Arc::new(Mutex::new(Vec::new()));
    let replayed_clone = replayed.clone();
    let (snapshot, _subscription) =
        binding.subscribe_with_snapshot(move |event: &BindingEvent<DataItem>| {
            event.apply(&mut replayed_clone.lock());
        });
    *replayed.lock() = snapshot.to_vec();

    let mut reverse = false;
    for step in 0..400 {
        let master = binding.master_items();
        match rng.gen_range(0..10) {
            0..=3 => {
                let index = rng.gen_range(0..=master.len());
                binding.insert(data_item(&random_title(&mut rng)), index, false);
            }
            4 | 5 if !master.is_empty() => {
                let item = &master[rng.gen_range(0..master.len())];
                binding.remove(item);
            }
            6 | 7 if !master.is_empty() => {
                let item = &master[rng.gen_range(0..master.len())];
                item.set_title(random_title(&mut rng));
            }
            8 => {
                reverse = !reverse;
                binding.set_sort_reverse(reverse);
            }
            _ => {
                let _changes = binding.changes();
                binding.set_sort_reverse(!reverse);
                binding.set_sort_reverse(reverse);
            }
        }

        let master = binding.master_items();
        let expected = expected_items(&master, |item| !item.title().starts_with('x'), reverse);
        assert!(same_items(&binding.items(), &expected), "root diverged at step {step}");
        assert!(same_items(&replayed.lock(), &binding.items()), "replay diverged at step {step}");

        let chain_expected: Vec<Arc<DataItem>> = binding
            .items()
            .iter()
            .filter(|item| !item.title().ends_with('x'))
            .cloned()
            .collect();
        assert!(same_items(&chain.items(), &chain_expected), "chain diverged at step {step}");
    }
}

#[test]
fn threaded_content_changes_during_inserts() {
    init_tracing();
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let count = 30;
        let items = Arc::new(acquired_items(count));
        let accepted: HashSet<usize> = (0..count).filter(|_| rng.gen_bool(0.5)).collect();

        let binding = DataItemsBinding::new();
        let sort_items = items.clone();
        binding.set_sort_key(move |item: &DataItem| position(&sort_items, item));
        let chain = DataItemsBinding::filtered(&binding);
        let filter_items = items.clone();
        let filter_accepted = accepted.clone();
        chain.set_filter(move |item: &DataItem| {
            filter_accepted.contains(&position(&filter_items, item))
        });

        binding.insert(items[0].clone(), 0, false);
        let updater = {
            let binding = binding.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..count {
                    let master = binding.master_items();
                    if let Some(item) = master.choose(&mut rng) {
                        binding.content_changed(item, &AspectSet::new());
                    }
                }
            })
        };
        for (index, item) in items.iter().enumerate().skip(1) {
            binding.insert(item.clone(), index, false);
        }
        updater.join().unwrap();

        assert_eq!(binding.len(), count);
        let mut expected: Vec<usize> = accepted.into_iter().collect();
        expected.sort_unstable();
        let actual: Vec<usize> = chain.items().iter().map(|item| position(&items, item)).collect();
        assert_eq!(actual, expected);

        chain.close();
        binding.close();
    }
}

#[test]
fn concurrent_content_changes_never_corrupt_items() {
    init_tracing();
    let items: Vec<Arc<DataItem>> = (0..40).map(|i| data_item(&format!("{i:02}"))).collect();
    let binding = DataItemsBinding::new();
    binding.set_sort_key(|item: &DataItem| item.title());
    for (index, item) in items.iter().enumerate() {
        binding.insert(item.clone(), index, false);
    }

    let replayed = Arc::new(Mutex::new(Vec::new()));
    let replayed_clone = replayed.clone();
    let (snapshot, _subscription) =
        binding.subscribe_with_snapshot(move |event: &BindingEvent<DataItem>| {
            event.apply(&mut replayed_clone.lock());
        });
    *replayed.lock() = snapshot.to_vec();

    let items = Arc::new(items);
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let binding = binding.clone();
            let items = items.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..200 {
                    let item = &items[rng.gen_range(0..items.len())];
                    if rng.gen_bool(0.5) {
                        item.set_title(format!("{:02}", rng.gen_range(0..100)));
                    } else {
                        binding.content_changed(item, &aspects([ChangedAspect::Data]));
                    }
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let ordered = binding.items();
    assert_eq!(ordered.len(), items.len());
    let unique: HashSet<usize> = ordered.iter().map(|item| Arc::as_ptr(item) as usize).collect();
    assert_eq!(unique.len(), items.len());
    assert!(items.iter().all(|item| binding.contains(item)));
    assert!(same_items(&replayed.lock(), &ordered));

    // A final pass settles any item whose key changed while another was
    // being placed.
    for item in items.iter() {
        binding.content_changed(item, &AspectSet::new());
    }
    let titles = titles(&binding);
    assert_eq!(titles, sorted(titles.clone()));
}

#[test]
fn listeners_run_on_the_mutating_thread() {
    let binding = DataItemsBinding::new();
    let chain = DataItemsBinding::filtered(&binding);

    let deliveries = Arc::new(Mutex::new(Vec::new()));
    let recorded = deliveries.clone();
    let (started, wait_started) = mpsc::channel();
    let started = Mutex::new(started);
    let _subscription = binding.subscribe(move |event: &BindingEvent<DataItem>| {
        let BindingEvent::Inserted { item, .. } = event else {
            return;
        };
        let title = item.title();
        let thread_name = thread::current().name().map(str::to_owned);
        recorded.lock().push((title.clone(), thread_name));
        if title == "slow" {
            let _ = started.lock().send(());
            thread::sleep(Duration::from_millis(200));
        }
    });

    let slow = {
        let binding = binding.clone();
        thread::Builder::new()
            .name("slow-writer".into())
            .spawn(move || binding.insert(data_item("slow"), 0, false))
            .unwrap()
    };
    wait_started.recv().unwrap();

    let fast = {
        let binding = binding.clone();
        let chain = chain.clone();
        thread::Builder::new()
            .name("fast-writer".into())
            .spawn(move || {
                let item = data_item("fast");
                binding.insert(item.clone(), 0, false);
                chain.contains(&item)
            })
            .unwrap()
    };

    assert!(fast.join().unwrap(), "chain was stale after insert returned");
    slow.join().unwrap();
    assert_eq!(
        *deliveries.lock(),
        vec![
            ("slow".to_owned(), Some("slow-writer".to_owned())),
            ("fast".to_owned(), Some("fast-writer".to_owned())),
        ]
    );
    assert_eq!(titles(&chain), vec!["fast", "slow"]);
}

#[test]
fn closed_binding_ignores_source_and_releases_items() {
    let binding = DataItemsBinding::new();
    let chain = DataItemsBinding::filtered(&binding);
    let item = data_item("a");
    binding.insert(item.clone(), 0, false);
    assert_eq!(chain.len(), 1);

    chain.close();
    binding.close();
    binding.close();

    assert_eq!(item.content_changed_signal().connection_count(), 0);
    binding.insert(data_item("b"), 1, false);
    binding.remove(&item);
    assert_eq!(binding.len(), 1);
    assert_eq!(chain.len(), 1);
}

#[test]
#[should_panic(expected = "out of range")]
fn insert_past_end_panics() {
    let binding = DataItemsBinding::new();
    binding.insert(data_item("a"), 1, false);
}
