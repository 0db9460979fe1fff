//! # ACS Verification Tests
//!
//! End-to-end checks of the storage guarantees:
//!
//! 1. **Sparse sets**: add/set/remove against a reference model
//! 2. **Views**: exact intersection regardless of which array is smallest
//! 3. **Observers**: registration order, deferred flush, idempotent destroy
//! 4. **Scenario**: Position/Velocity actors through spawn, view and removal
//!
//! Run with: cargo test --package arc_acs --test acs_verification
//! Packed layout: cargo test --package arc_acs --features pack

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use arc_acs::{
    AcsConfig, AcsError, ActorId, ActorLifecycle, ActorManager, ComponentEvent,
    ComponentProvider, ComponentView, SparseSet,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position(f64, f64);
arc_acs::component!(Position, 0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity(f64, f64);
arc_acs::component!(Velocity, 1);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Mass(u32);
arc_acs::component!(Mass, 2);

/// Small deterministic generator so failures reproduce.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, n: u64) -> u32 {
        u32::try_from(self.next() % n).unwrap()
    }
}

// ============================================================================
// SECTION 1: SPARSE SET
// ============================================================================

#[test]
fn verify_sparse_set_matches_model() {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    let mut set: SparseSet<u64> = SparseSet::new();
    let mut model: HashMap<u32, u64> = HashMap::new();

    for step in 0..20_000_u64 {
        let index = rng.below(512);
        match rng.below(3) {
            0 => {
                let added = set.add(index, step);
                assert_eq!(added, !model.contains_key(&index));
                model.entry(index).or_insert(step);
            }
            1 => {
                assert_eq!(set.set(index, step), model.insert(index, step));
            }
            _ => {
                let before = set.len();
                let removed = set.try_remove(index);
                assert_eq!(removed, model.remove(&index));
                if removed.is_some() {
                    assert_eq!(set.len(), before - 1);
                }
            }
        }

        assert_eq!(set.contains(index), model.contains_key(&index));
        assert_eq!(set.len(), model.len());
    }

    for (&index, &value) in &model {
        assert_eq!(set.get(index), Ok(&value));
    }
    let keys: BTreeSet<u32> = set.keys().collect();
    assert_eq!(keys, model.keys().copied().collect());
}

#[test]
fn verify_swap_remove_leaves_others_untouched() {
    let mut set: SparseSet<String> = SparseSet::new();
    for i in [4_u32, 9, 1, 30, 7] {
        set.add(i, format!("v{i}"));
    }

    assert_eq!(set.remove(9), Ok("v9".to_string()));
    assert_eq!(set.len(), 4);
    for i in [4_u32, 1, 30, 7] {
        assert_eq!(set.get(i).map(String::as_str), Ok(format!("v{i}").as_str()));
    }
    assert_eq!(set.remove(9), Err(AcsError::InvalidIndex { index: 9 }));
}

// ============================================================================
// SECTION 2: VIEWS
// ============================================================================

#[test]
fn verify_view_intersection_any_distribution() {
    for seed in 1..=8_u64 {
        let mut rng = XorShift(seed.wrapping_mul(0x2545_F491_4F6C_DD1D));
        let mut provider = ComponentProvider::default();
        provider.create_array::<Position>().unwrap();
        provider.create_array::<Velocity>().unwrap();
        provider.create_array::<Mass>().unwrap();

        // Skew densities per seed so either array can be the smaller one.
        let (p_rate, v_rate) = if seed % 2 == 0 { (9, 3) } else { (3, 9) };
        let mut expected = BTreeSet::new();
        for i in 0..300_u32 {
            let actor = ActorId::from_index(i);
            let has_p = rng.below(10) < p_rate;
            let has_v = rng.below(10) < v_rate;
            if has_p {
                provider.add_component(actor, Position(f64::from(i), 0.0)).unwrap();
            }
            if has_v {
                provider.add_component(actor, Velocity(0.0, f64::from(i))).unwrap();
            }
            if rng.below(2) == 0 {
                provider.add_component(actor, Mass(i)).unwrap();
            }
            if has_p && has_v {
                expected.insert(i);
            }
        }

        let view = ComponentView::<(Position, Velocity)>::new(&mut provider).unwrap();
        let mut yielded = BTreeSet::new();
        for (actor, (pos, vel)) in view.iter() {
            assert_eq!(pos.0, f64::from(actor.index()));
            assert_eq!(vel.1, f64::from(actor.index()));
            assert!(yielded.insert(actor.index()), "actor yielded twice");
        }
        assert_eq!(yielded, expected, "seed {seed}");

        let reversed: BTreeSet<u32> = view.iter().rev().map(|(a, _)| a.index()).collect();
        assert_eq!(reversed, expected);
    }
}

// ============================================================================
// SECTION 3: OBSERVERS
// ============================================================================

#[test]
fn verify_observer_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ActorManager::default();
    manager.register_component::<Mass>().unwrap();

    for tag in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        manager
            .observe::<Mass>(ComponentEvent::Created, move |_, _| {
                order.lock().unwrap().push(tag);
            })
            .unwrap();
    }

    manager.spawn_custom(|ch| ch.add(Mass(1)).map(drop)).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn verify_invoke_all_is_one_shot() {
    let count = Arc::new(Mutex::new(0));
    let mut manager = ActorManager::default();
    manager.register_component::<Mass>().unwrap();
    {
        let count = Arc::clone(&count);
        manager
            .observe::<Mass>(ComponentEvent::Created, move |_, _| *count.lock().unwrap() += 1)
            .unwrap();
    }

    manager.spawn_custom(|ch| ch.add(Mass(1)).map(drop)).unwrap();
    assert_eq!(*count.lock().unwrap(), 1);

    // The spawn flushed the queue; flushing again runs nothing.
    let mut provider = ComponentProvider::default();
    assert_eq!(manager.observer_mut().pending_len(), 0);
    assert_eq!(manager.observer_mut().invoke_all(&mut provider), Ok(0));
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn verify_destroy_is_idempotent() {
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let mut manager = ActorManager::default();
    manager.register_component::<Position>().unwrap();
    manager.register_component::<Mass>().unwrap();
    for _ in 0..2 {
        let destroyed = Arc::clone(&destroyed);
        manager
            .observe::<Mass>(ComponentEvent::Destroyed, move |mass, actor| {
                destroyed.lock().unwrap().push((actor, mass.0));
            })
            .unwrap();
    }

    let actor = manager
        .spawn_custom(|ch| {
            ch.add(Position(0.0, 0.0))?;
            ch.add(Mass(42))?;
            Ok(())
        })
        .unwrap();

    assert_eq!(manager.destroy(actor), Ok(2));
    assert_eq!(*destroyed.lock().unwrap(), vec![(actor, 42), (actor, 42)]);
    assert_eq!(manager.destroy(actor), Ok(0));
    assert_eq!(manager.destroy(ActorId::from_index(1_000)), Ok(0));
    assert_eq!(destroyed.lock().unwrap().len(), 2);
    assert_eq!(manager.lifecycle(actor), ActorLifecycle::Destroyed);
}

// ============================================================================
// SECTION 4: POSITION / VELOCITY SCENARIO
// ============================================================================

const STILL: u32 = 1;
const MOVING: u32 = 2;

#[test]
fn verify_position_velocity_scenario() {
    let config = AcsConfig::from_toml_str("max_components = 8\nsparse_reserve = 16").unwrap();
    let mut manager = ActorManager::new(config).unwrap();
    manager.register_component::<Position>().unwrap();
    manager.register_component::<Velocity>().unwrap();

    manager.register_actor(STILL, |ch| ch.add(Position(1.0, 1.0)).map(drop));
    manager.register_actor(MOVING, |ch| {
        ch.add(Position(0.0, 0.0))?;
        ch.add(Velocity(2.0, 3.0))?;
        Ok(())
    });

    let still = manager.spawn(STILL).unwrap();
    let moving = manager.spawn(MOVING).unwrap();

    let hits: Vec<ActorId> = manager
        .view::<(Position, Velocity)>()
        .unwrap()
        .iter()
        .map(|(actor, _)| actor)
        .collect();
    assert_eq!(hits, vec![moving]);

    for (_, (pos, vel)) in &mut manager.view::<(Position, Velocity)>().unwrap() {
        pos.0 += vel.0;
        pos.1 += vel.1;
    }
    assert_eq!(manager.get_component::<Position>(moving), Ok(&Position(2.0, 3.0)));
    assert_eq!(manager.get_component::<Position>(still), Ok(&Position(1.0, 1.0)));

    assert_eq!(manager.remove_component::<Velocity>(moving), Ok(Velocity(2.0, 3.0)));
    let view = manager.view_const::<(Position, Velocity)>().unwrap();
    assert!(view.is_empty());
    assert_eq!(view.iter().count(), 0);
}

#[test]
fn verify_collected_view_items_stay_valid() {
    let mut manager = ActorManager::default();
    manager.register_component::<Position>().unwrap();
    manager.register_component::<Velocity>().unwrap();
    for i in 0..16_u32 {
        let speed = f64::from(i);
        manager
            .spawn_custom(|ch| {
                ch.add(Position(0.0, 0.0))?;
                if i % 3 != 0 {
                    ch.add(Velocity(speed, -speed))?;
                }
                Ok(())
            })
            .unwrap();
    }

    {
        let mut view = manager.view::<(Position, Velocity)>().unwrap();
        // Hold every item past the iterator before writing through any of them.
        let items: Vec<_> = view.iter_mut().rev().collect();
        assert_eq!(items.len(), 10);
        for (_, (pos, vel)) in items {
            pos.0 += vel.0;
            pos.1 += vel.1;
        }
    }

    for actor in manager.actors().collect::<Vec<_>>() {
        let i = f64::from(actor.index());
        let expected = if actor.index() % 3 == 0 {
            Position(0.0, 0.0)
        } else {
            Position(i, -i)
        };
        assert_eq!(manager.get_component::<Position>(actor), Ok(&expected));
    }
}

#[test]
fn verify_unregistered_component_in_blueprint_rolls_back() {
    let mut manager = ActorManager::default();
    manager.register_component::<Position>().unwrap();
    manager.register_actor(MOVING, |ch| {
        ch.add(Position(0.0, 0.0))?;
        ch.add(Velocity(1.0, 1.0))?;
        Ok(())
    });

    assert!(matches!(
        manager.spawn(MOVING),
        Err(AcsError::ComponentNotRegistered { id: 1, .. })
    ));
    assert_eq!(manager.alive_count(), 0);
    assert_eq!(manager.provider().total_components(), 0);
}
