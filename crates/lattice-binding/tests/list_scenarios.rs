//! End-to-end scenarios for sorted and filtered lists.

use std::sync::Arc;

use lattice_binding::prelude::*;
use parking_lot::Mutex;

#[derive(Properties, Clone, Debug, Default, PartialEq)]
struct Person {
    #[property(rename = "Name")]
    name: String,
    #[property(rename = "Age")]
    age: u32,
    /// Insertion order, used to observe stability.
    #[property(rename = "Seq")]
    seq: usize,
}

fn people(names: &[&str]) -> BindingList<Person> {
    BindingList::new(
        names
            .iter()
            .enumerate()
            .map(|(seq, name)| Person {
                name: name.to_string(),
                age: 20,
                seq,
            })
            .collect(),
    )
}

fn names<L: ObservableList<Item = Person>>(list: &L) -> Vec<String> {
    list.to_vec().into_iter().map(|p| p.name).collect()
}

fn record<L: ObservableList>(list: &L) -> Arc<Mutex<Vec<ListChange>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    list.signals()
        .list_changed
        .connect(move |change| sink.lock().push(change.clone()));
    events
}

#[test]
fn sort_by_name_ascending() {
    let list = people(&["Bob", "Ann"]);
    list.apply_sort(("Name", SortDirection::Ascending)).unwrap();
    assert_eq!(names(&list), ["Ann", "Bob"]);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let list = people(&["d", "a", "c", "b", "e"]);
    for (i, age) in [30, 10, 30, 10, 30].into_iter().enumerate() {
        list.modify(i, |p| p.age = age).unwrap();
    }

    list.apply_sort(SortDescriptor::ascending("Age")).unwrap();

    let seqs: Vec<_> = list.to_vec().into_iter().map(|p| p.seq).collect();
    assert_eq!(seqs, [1, 3, 0, 2, 4]);
}

#[test]
fn sort_preserves_elements() {
    let list = people(&["m", "c", "x", "a", "c", "q"]);
    let mut before = names(&list);

    list.apply_sort("Name desc, Seq".parse::<SortDescriptor>().unwrap()).unwrap();

    let mut after = names(&list);
    assert_eq!(after, ["x", "q", "m", "c", "c", "a"]);
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn find_by_name() {
    let list = people(&["Bob", "Ann", "Cid"]);
    assert_eq!(list.find("Name", "Ann").unwrap(), Some(1));
    assert_eq!(list.find("Name", "Zed").unwrap(), None);
}

#[test]
fn begin_new_then_commit_takes_sorted_position() {
    let list = people(&["Ann", "Cid", "Eve"]);
    list.apply_sort(SortDescriptor::ascending("Name")).unwrap();

    let n = list.len();
    let index = list.begin_new().unwrap();
    assert_eq!(index, n);
    assert_eq!(list.len(), n + 1);
    assert_eq!(list.get(index).unwrap().name, "");

    list.modify_property(index, "Name", |p| p.name = "Dan".into()).unwrap();
    assert!(list.commit_new(index));

    assert_eq!(names(&list), ["Ann", "Cid", "Dan", "Eve"]);
}

#[test]
fn begin_new_then_cancel_restores() {
    let list = people(&["Bob", "Ann"]);
    list.apply_sort(SortDescriptor::ascending("Name")).unwrap();
    let before = list.to_vec();

    let index = list.begin_new().unwrap();
    list.modify_property(index, "Name", |p| p.name = "Aaa".into()).unwrap();
    assert!(list.cancel_new(index));

    assert_eq!(list.to_vec(), before);
    assert!(list.is_sorted());
}

#[test]
fn filter_tracks_source() {
    let source = Arc::new(BindingList::with_registry(
        vec![1, 2, 3, 4, 5],
        PropertyRegistry::builder().property("Value", |v: &i32| *v).build(),
    ));
    let filtered = FilteredList::builder()
        .source(source.clone())
        .predicate(|v: &i32| v % 2 == 0)
        .build();
    assert_eq!(filtered.to_vec(), [2, 4]);

    source.add(6);
    assert_eq!(filtered.to_vec(), [2, 4, 6]);

    let index = source.find("Value", 2).unwrap().unwrap();
    source.remove_at(index).unwrap();
    assert_eq!(filtered.to_vec(), [4, 6]);
}

#[test]
fn filter_over_sorted_list() {
    let source = Arc::new(people(&["Eve", "Bob", "Dan", "Ann"]));
    for (i, age) in [17, 40, 15, 33].into_iter().enumerate() {
        source.modify(i, |p| p.age = age).unwrap();
    }
    let adults = FilteredList::builder()
        .source(source.clone())
        .predicate(|p: &Person| p.age >= 18)
        .build();
    assert_eq!(names(&adults), ["Bob", "Ann"]);

    let events = record(&adults);
    source.apply_sort(SortDescriptor::ascending("Name")).unwrap();
    assert_eq!(names(&adults), ["Ann", "Bob"]);
    assert_eq!(*events.lock(), [ListChange::Reset]);

    source.add(Person {
        name: "Cat".into(),
        age: 50,
        seq: 9,
    });
    assert_eq!(names(&adults), ["Ann", "Bob", "Cat"]);

    // aging into the filter is reported as an addition
    let eve = source.find("Name", "Eve").unwrap().unwrap();
    source.modify_property(eve, "Age", |p| p.age = 18).unwrap();
    assert_eq!(names(&adults), ["Ann", "Bob", "Cat", "Eve"]);
}

#[test]
fn bulk_add_with_suppressed_events() {
    let list = people(&[]);
    let events = record(&list);

    list.set_raise_list_changed_events(false);
    for (seq, name) in ["c", "a", "b"].into_iter().enumerate() {
        list.add(Person {
            name: name.into(),
            age: 1,
            seq,
        });
    }
    list.set_raise_list_changed_events(true);
    list.reset_bindings();

    assert_eq!(list.len(), 3);
    assert_eq!(*events.lock(), [ListChange::Reset]);
}

#[test]
fn config_round_trips_through_json() {
    let config = BindingListConfig::new()
        .with_allow_new(false)
        .with_list_changed_events(false);
    let json = serde_json::to_string(&config).unwrap();
    let parsed: BindingListConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let list = people(&["a"]).with_config(parsed);
    assert!(!list.raises_list_changed_events());
    assert!(matches!(list.begin_new(), Err(BindingError::NotAllowed(_))));
}
