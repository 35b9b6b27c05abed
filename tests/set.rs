use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slotset::{AllocError, Config, OrderedSet, Pool};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn set_with_capacity<T>(cap: usize) -> OrderedSet<T> {
    OrderedSet::with_config(Config::new(cap).unwrap()).unwrap()
}

#[test]
fn recycles_last_removed_first() {
    init_logger();
    let mut set = set_with_capacity(4);
    for value in 0..4 {
        set.insert(value).unwrap();
    }
    set.remove(0);
    set.remove(2);
    assert_eq!(set.insert(10).unwrap(), 2);
    assert_eq!(set.insert(11).unwrap(), 0);
    assert_eq!(set.insert(12).unwrap(), 4);
}

#[test]
fn grows_past_initial_capacity() {
    init_logger();
    for cap in [1, 2, 3, 8] {
        let mut set = set_with_capacity(cap);
        let handles = (0..=cap).map(|v| set.insert(v * 3).unwrap()).collect::<Vec<_>>();
        assert_eq!(handles, (0..=cap).collect::<Vec<_>>());
        for (value, handle) in handles.into_iter().enumerate() {
            assert_eq!(set.get(handle), Some(&(value * 3)));
        }
        assert!(set.capacity() >= cap + 1);
    }
}

#[test]
fn addresses_survive_growth_and_churn() {
    init_logger();
    let mut set = set_with_capacity(1);
    let kept = set.insert(String::from("clk")).unwrap();
    let address = set.get(kept).unwrap() as *const String;
    for round in 0..200 {
        let other = set.insert(format!("n{round}")).unwrap();
        if round % 3 == 0 {
            set.remove(other);
        }
        assert_eq!(set.get(kept).map(|s| s as *const String), Some(address));
    }
    assert_eq!(set.get(kept).map(String::as_str), Some("clk"));
}

#[test]
fn never_issued_and_repeated_removal_are_inert() {
    init_logger();
    let mut set = set_with_capacity(2);
    set.remove(0);
    assert_eq!(set.num_indices(), 0);
    let a = set.insert('x').unwrap();
    set.remove(a);
    let before = (set.len(), set.num_indices(), set.free_count());
    set.remove(a);
    set.remove(usize::MAX);
    assert_eq!((set.len(), set.num_indices(), set.free_count()), before);
    assert_eq!(set.get(a), None);
}

#[test]
fn iteration_skips_removed_slots() {
    init_logger();
    let mut set = set_with_capacity(8);
    for name in ["a", "b", "c", "d", "e"] {
        set.insert(name).unwrap();
    }
    set.remove(1);
    set.remove(3);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "c", "e"]);
}

#[test]
fn randomized_churn_matches_model() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut set = set_with_capacity(3);
    let mut model: Vec<Option<u64>> = Vec::new();
    let mut freed: Vec<usize> = Vec::new();

    for step in 0..5_000_u64 {
        if model.is_empty() || rng.gen_bool(0.6) {
            let index = set.insert(step).unwrap();
            match freed.pop() {
                Some(expected) => assert_eq!(index, expected),
                None => assert_eq!(index, model.len()),
            }
            if index == model.len() {
                model.push(Some(step));
            } else {
                model[index] = Some(step);
            }
        } else {
            let index = rng.gen_range(0..model.len() + 2);
            set.remove(index);
            if let Some(slot) = model.get_mut(index) {
                if slot.take().is_some() {
                    freed.push(index);
                }
            }
        }

        let live = model.iter().flatten().count();
        assert_eq!(set.len(), live);
        assert_eq!(set.num_indices(), model.len());
        assert_eq!(set.free_count() + live, model.len());
    }

    let expected = model.iter().enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect::<Vec<_>>();
    let actual = set.entries().map(|(i, v)| (i, *v)).collect::<Vec<_>>();
    assert_eq!(actual, expected);
}

#[test]
fn pooled_strategy_is_reachable() {
    init_logger();
    let mut pool = Pool::with_limit(16);
    pool.prefill(4).unwrap();
    let mut set = OrderedSet::with_config_in(Config::default(), pool).unwrap();
    for value in 0..4_u32 {
        set.insert(value).unwrap();
    }
    assert_eq!(set.allocation_strategy().cached(), 0);
    set.remove(0);
    set.remove(1);
    assert_eq!(set.allocation_strategy().cached(), 2);
    set.allocation_strategy_mut().prefill(8).unwrap();
    assert_eq!(set.allocation_strategy().cached(), 10);
}

#[test]
fn out_of_memory_is_displayable() {
    let err = AllocError::OutOfMemory { layout: std::alloc::Layout::new::<u64>() };
    assert_eq!(err.to_string(), "Failed to allocate 8 bytes (align 8).");
}
