use rand::SeedableRng;
use rand::rngs::StdRng;
use spinwheel::config::WheelConfig;
use spinwheel::store::{EnablementStore, FileStore, MemoryStore, PersistKey};
use spinwheel::wheel::enablement::{self, EnablementMap};
use spinwheel::wheel::layout::{sector_angle, sector_midpoint};
use spinwheel::wheel::spin::normalize_degrees;
use spinwheel::wheel::{Action, Effect, Item, RenderModel, Session};

fn items(labels: &[&str]) -> Vec<Item> {
    labels.iter().map(|s| Item::from(*s)).collect()
}

fn session_with(labels: &[&str], persisted: Option<&EnablementMap>, seed: u64) -> Session<StdRng> {
    let config = WheelConfig {
        items: items(labels),
        ..WheelConfig::default()
    };
    Session::begin(config, persisted, StdRng::seed_from_u64(seed))
}

fn spin_once(session: &mut Session<StdRng>) -> (f64, usize, Item) {
    let to = match session.apply(Action::StartSpin).as_slice() {
        [Effect::Animate { to, .. }] => *to,
        other => panic!("spin refused: {other:?}"),
    };
    match session.apply(Action::Settle).as_slice() {
        [Effect::Selected(selection)] => (to, selection.index, selection.item.clone()),
        other => panic!("no selection: {other:?}"),
    }
}

#[test]
fn frequencies_stay_near_uniform() {
    let labels = ["a", "b", "c", "d", "e", "f", "g"];
    let mut session = session_with(&labels, None, 2024);
    let trials = 14_000;
    let mut counts = [0usize; 7];
    for _ in 0..trials {
        let (_, index, _) = spin_once(&mut session);
        counts[index] += 1;
    }

    let expected = trials as f64 / labels.len() as f64;
    for (i, &count) in counts.iter().enumerate() {
        let deviation = (count as f64 - expected).abs() / expected;
        assert!(deviation < 0.1, "index {i}: {count} hits vs {expected}");
    }
}

#[test]
fn every_spin_lands_on_its_sector_and_moves_forward() {
    let labels = ["Alice", "Bob", "Carol", "Dave", "Eve"];
    let mut session = session_with(&labels, None, 99);
    let angle = sector_angle(labels.len());
    for _ in 0..500 {
        let before = session.rotation();
        let (to, index, item) = spin_once(&mut session);
        assert!(to > before);
        assert_eq!(item.as_str(), labels[index]);
        let landed = normalize_degrees(-to);
        assert!((landed - sector_midpoint(index, angle)).abs() < 1e-6);
    }
}

#[test]
fn landing_tracks_a_shrinking_active_set() {
    let labels = ["a", "b", "c", "d", "e", "f"];
    let mut session = session_with(&labels, None, 5);
    for excluded in ["b", "d", "f", "a", "c"] {
        let (to, index, item) = spin_once(&mut session);
        let active = session.active_items();
        assert_eq!(active[index], item);
        let landed = normalize_degrees(-to);
        let expected = sector_midpoint(index, sector_angle(active.len()));
        assert!((landed - expected).abs() < 1e-6);

        session.apply(Action::ToggleItem(Item::from(excluded)));
    }
    assert_eq!(session.active_items(), items(&["e"]));
}

#[test]
fn persisted_flags_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let key = PersistKey::default();

    {
        let store = EnablementStore::new(FileStore::new(&path));
        let mut session = session_with(&["Alice", "Bob", "Carol"], store.load(&key).as_ref(), 1);
        for effect in session.apply(Action::ToggleItem(Item::from("Bob"))) {
            if let Effect::Persist(map) = effect {
                store.save(&key, &map);
            }
        }
    }

    let store = EnablementStore::new(FileStore::new(&path));
    let persisted = store.load(&key);
    let session = session_with(&["Alice", "Bob", "Carol", "Dan"], persisted.as_ref(), 1);
    assert_eq!(session.active_items(), items(&["Alice", "Carol", "Dan"]));
}

#[test]
fn round_trip_is_restricted_to_current_items() {
    let store = EnablementStore::new(MemoryStore::new());
    let key = PersistKey::new("wheel:test");
    let old_items = items(&["x", "y", "z"]);
    let mut map = enablement::initialize(&old_items, None);
    map.insert(Item::from("y"), false);
    store.save(&key, &map);

    let current = items(&["y", "z"]);
    let loaded = enablement::initialize(&current, store.load(&key).as_ref());
    let expected: EnablementMap = [(Item::from("y"), false), (Item::from("z"), true)]
        .into_iter()
        .collect();
    assert_eq!(loaded, expected);
}

#[test]
fn empty_wheel_disables_trigger() {
    let mut session = session_with(&[], None, 3);
    let model = RenderModel::build(&session, &Default::default());
    assert!(!model.trigger_enabled);
    assert!(model.labels.is_empty());
    assert!(session.apply(Action::StartSpin).is_empty());
    assert!(session.apply(Action::Settle).is_empty());
}

#[test]
fn all_excluded_refuses_to_spin() {
    let mut session = session_with(&["a", "b"], None, 3);
    session.apply(Action::ToggleItem(Item::from("a")));
    session.apply(Action::ToggleItem(Item::from("b")));
    assert!(!session.can_spin());
    assert!(session.apply(Action::StartSpin).is_empty());
}
