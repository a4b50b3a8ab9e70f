//! Cache Behavior Scenarios
//!
//! Exercises the public cache API the way an application host does:
//! register types, write, look up, and run the eviction passes.

use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use policy_cache::cache::{CacheKey, Cacheable, ManualClock, MemoryCache, TypeTag};
use policy_cache::CacheError;
use uuid::Uuid;

// == Fixtures ==

#[derive(Debug, Clone, PartialEq)]
struct Customer {
    id: Uuid,
    name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Invoice {
    id: Uuid,
    total_cents: u64,
}

/// Two distinct cached types behind one cache, tagged by variant.
#[derive(Debug, Clone, PartialEq)]
enum Entity {
    Customer(Customer),
    Invoice(Invoice),
}

impl Cacheable for Entity {
    fn cache_key(&self) -> CacheKey {
        match self {
            Entity::Customer(c) => c.id,
            Entity::Invoice(i) => i.id,
        }
    }

    fn type_tag(&self) -> TypeTag {
        match self {
            Entity::Customer(_) => TypeTag::from("customer"),
            Entity::Invoice(_) => TypeTag::from("invoice"),
        }
    }
}

fn customer(n: usize) -> Entity {
    Entity::Customer(Customer {
        id: Uuid::new_v4(),
        name: format!("customer-{n}"),
    })
}

fn invoice(n: u64) -> Entity {
    Entity::Invoice(Invoice {
        id: Uuid::new_v4(),
        total_cents: n * 100,
    })
}

fn manual_cache() -> (MemoryCache<Entity, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let cache = MemoryCache::with_clock(clock.clone());
    cache.register_cache_type("customer", 10, None);
    cache.register_cache_type("invoice", 10, None);
    (cache, clock)
}

// == Insertion ==

#[test]
fn test_insertion_count_invariant() {
    let (cache, _) = manual_cache();

    for i in 0..100 {
        cache.add_update_entry(customer(i)).unwrap();
    }

    assert_eq!(cache.size(), 100);
    assert_eq!(cache.size_of_type("customer"), 100);
}

#[test]
fn test_known_key_retrieval() {
    let (cache, clock) = manual_cache();
    cache.set_min_age(Duration::ZERO);
    let entity = customer(1);
    let key = entity.cache_key();

    cache.add_update_entry(entity.clone()).unwrap();
    assert_eq!(*cache.try_get_entry(&key).unwrap(), entity);

    // newer writes push it out of the size budget
    clock.advance(Duration::from_secs(1));
    for i in 0..10 {
        cache.add_update_entry(customer(i)).unwrap();
    }
    assert!(cache.try_get_entry(&key).is_some());

    cache.reduce_pressure();
    assert!(cache.try_get_entry(&key).is_none());
}

#[test]
fn test_update_replaces_value_in_place() {
    let (cache, _) = manual_cache();
    let id = Uuid::new_v4();

    cache
        .add_update_entry(Entity::Invoice(Invoice { id, total_cents: 1 }))
        .unwrap();
    cache
        .add_update_entry(Entity::Invoice(Invoice { id, total_cents: 2 }))
        .unwrap();

    assert_eq!(cache.size(), 1);
    assert_eq!(
        *cache.try_get_entry(&id).unwrap(),
        Entity::Invoice(Invoice { id, total_cents: 2 })
    );
}

#[test]
fn test_caller_reference_outlives_eviction() {
    let (cache, clock) = manual_cache();
    cache.register_cache_type("invoice", 10, Some(Duration::from_secs(1)));
    let entity = invoice(7);
    let key = entity.cache_key();
    cache.add_update_entry(entity).unwrap();

    let held = cache.try_get_entry(&key).unwrap();
    clock.advance(Duration::from_secs(1));
    assert_eq!(cache.clean(), 1);

    assert!(matches!(&*held, Entity::Invoice(i) if i.total_cents == 700));
}

#[test]
fn test_nil_key_rejected() {
    let (cache, _) = manual_cache();
    let result = cache.add_update_entry(Entity::Customer(Customer {
        id: Uuid::nil(),
        name: "ghost".to_string(),
    }));

    assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    assert_eq!(cache.size(), 0);
}

// == Reduce Pressure ==

#[test]
fn test_no_premature_eviction() {
    let (cache, _) = manual_cache();

    for i in 0..100 {
        cache.add_update_entry(customer(i)).unwrap();
    }
    cache.add_update_entry(invoice(1)).unwrap();
    assert_eq!(cache.size(), 101);

    assert_eq!(cache.reduce_pressure(), 0);
    assert_eq!(cache.size(), 101);
}

#[test]
fn test_age_gated_shrink() {
    let (cache, clock) = manual_cache();
    let mut keys = Vec::new();

    for i in 0..101 {
        let entity = customer(i);
        keys.push(entity.cache_key());
        cache.add_update_entry(entity).unwrap();
        clock.advance(Duration::from_millis(1));
    }
    assert_eq!(cache.reduce_pressure(), 0);

    cache.set_min_age(Duration::from_secs(1));
    clock.advance(Duration::from_secs(1));

    assert_eq!(cache.reduce_pressure(), 91);
    assert_eq!(cache.size_of_type("customer"), 10);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(cache.try_get_entry(key).is_some(), i >= 91, "entry {i}");
    }
}

#[test]
fn test_age_gated_shrink_on_wall_clock() {
    let cache: MemoryCache<Entity> = MemoryCache::new();
    cache.register_cache_type("customer", 10, None);
    cache.register_cache_type("invoice", 10, None);

    for i in 0..101 {
        cache.add_update_entry(customer(i)).unwrap();
    }
    cache.add_update_entry(invoice(1)).unwrap();

    cache.reduce_pressure();
    assert_eq!(cache.size(), 102);

    cache.set_min_age(Duration::from_secs(1));
    sleep(Duration::from_millis(1100));

    cache.reduce_pressure();
    assert_eq!(cache.size_of_type("customer"), 10);
    assert_eq!(cache.size_of_type("invoice"), 1);
    assert_eq!(cache.size(), 11);
}

#[test]
fn test_update_protects_entry_from_pressure() {
    let (cache, clock) = manual_cache();
    cache.register_cache_type("customer", 1, None);
    cache.set_min_age(Duration::ZERO);

    let first = customer(0);
    let second = customer(1);
    cache.add_update_entry(first.clone()).unwrap();
    clock.advance(Duration::from_secs(1));
    cache.add_update_entry(second.clone()).unwrap();
    clock.advance(Duration::from_secs(1));
    cache.add_update_entry(first.clone()).unwrap();

    assert_eq!(cache.reduce_pressure(), 1);
    assert!(cache.try_get_entry(&first.cache_key()).is_some());
    assert!(cache.try_get_entry(&second.cache_key()).is_none());
}

// == Clean ==

#[test]
fn test_hard_age_expiry() {
    let (cache, clock) = manual_cache();
    cache.register_cache_type("invoice", 10, Some(Duration::from_secs(5)));

    for i in 0..50 {
        cache.add_update_entry(invoice(i)).unwrap();
    }
    clock.advance(Duration::from_millis(5100));
    let survivor = invoice(99);
    cache.add_update_entry(survivor.clone()).unwrap();
    assert_eq!(cache.size(), 51);

    assert_eq!(cache.clean(), 50);
    assert_eq!(cache.size_of_type("invoice"), 1);
    assert!(cache.try_get_entry(&survivor.cache_key()).is_some());
}

#[test]
fn test_clean_leaves_other_types_alone() {
    let (cache, clock) = manual_cache();
    cache.register_cache_type("invoice", 10, Some(Duration::from_secs(5)));

    for i in 0..3 {
        cache.add_update_entry(invoice(i)).unwrap();
        cache.add_update_entry(customer(i as usize)).unwrap();
    }
    clock.advance(Duration::from_secs(60));

    assert_eq!(cache.clean(), 3);
    assert_eq!(cache.size_of_type("customer"), 3);

    let stats = cache.stats();
    assert_eq!(stats.expirations, 3);
    assert_eq!(stats.pressure_evictions, 0);
}

// == Clear ==

#[test]
fn test_idempotent_clear() {
    let (cache, _) = manual_cache();
    for i in 0..20 {
        cache.add_update_entry(customer(i)).unwrap();
    }

    cache.clear();
    assert_eq!(cache.size(), 0);
    cache.clear();
    assert_eq!(cache.size(), 0);

    assert_eq!(cache.policy("customer").unwrap().max_size, 10);
}

// == Concurrency ==

#[test]
fn test_concurrent_insert_safety() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let cache: Arc<MemoryCache<Entity>> = Arc::new(MemoryCache::new());
    cache.register_cache_type("customer", 10, None);

    std::thread::scope(|scope| {
        for t in 0..THREADS {
            let cache = &cache;
            scope.spawn(move || {
                for i in 0..PER_THREAD {
                    cache.add_update_entry(customer(t * PER_THREAD + i)).unwrap();
                }
            });
        }

        let reader = &cache;
        scope.spawn(move || {
            let mut last = 0;
            while last < THREADS * PER_THREAD {
                let size = reader.size();
                assert!(size >= last, "size went backwards: {size} < {last}");
                assert!(size <= THREADS * PER_THREAD);
                last = size;
            }
        });
    });

    assert_eq!(cache.size(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_passes_and_writers() {
    let cache: Arc<MemoryCache<Entity>> = Arc::new(MemoryCache::new());
    cache.register_cache_type("invoice", 5, Some(Duration::from_secs(3600)));
    cache.set_min_age(Duration::ZERO);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let cache = &cache;
            scope.spawn(move || {
                for i in 0..200 {
                    cache.add_update_entry(invoice(i)).unwrap();
                }
            });
        }
        let sweeper = &cache;
        scope.spawn(move || {
            for _ in 0..200 {
                sweeper.reduce_pressure();
                sweeper.clean();
            }
        });
    });

    cache.reduce_pressure();
    assert_eq!(cache.size(), 5);
}
