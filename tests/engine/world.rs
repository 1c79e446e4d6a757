//! Integration tests for the World façade
//!
//! Tests configuration, spawning, and systems driving storage through ticks.

use std::rc::Rc;

use stratum_engine::{FnSystem, SystemContext, World, WorldConfig};
use stratum_foundation::{ErrorKind, Value};
use stratum_storage::{ComponentData, ComponentSchema, Schema, Store};

fn schema() -> Schema {
    Schema::new()
        .with_component(
            ComponentSchema::new("Position")
                .with_field("x", 0.0)
                .with_field("y", 0.0),
        )
        .with_component(
            ComponentSchema::new("Velocity")
                .with_field("dx", 0.0)
                .with_field("dy", 0.0),
        )
        .with_component(ComponentSchema::new("Health").with_field("hp", 10))
}

fn world(capacity: usize) -> World {
    World::new(&schema(), &WorldConfig::new().with_capacity(capacity)).unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn default_config_holds_a_thousand_entities() {
    let mut world = World::with_schema(&schema()).unwrap();
    for _ in 0..1000 {
        world.create().unwrap();
    }
    assert!(matches!(
        world.create().unwrap_err().kind,
        ErrorKind::CapacityExceeded { capacity: 1000 }
    ));
}

#[test]
fn too_many_component_types_fails() {
    let schema: Schema = (0..33).map(|i| ComponentSchema::new(format!("T{i}"))).collect();
    let err = World::with_schema(&schema).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn worlds_do_not_share_handles() {
    let mut a = world(4);
    let b = world(4);
    let e = a.create().unwrap();
    let foreign = b.handle("Position").unwrap();

    assert!(matches!(
        a.add(e, &foreign, None).unwrap_err().kind,
        ErrorKind::ForeignHandle { .. }
    ));
}

// =============================================================================
// Spawn
// =============================================================================

#[test]
fn spawn_is_all_or_nothing() {
    let mut world = world(4);
    let health = world.handle("Health").unwrap();
    let position = world.handle("Position").unwrap();

    let err = world
        .spawn([
            (&position, ComponentData::new()),
            (&health, ComponentData::new().with("hp", "full")),
        ])
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert_eq!(world.count(), 0);
    assert!(world.query([&position]).unwrap().is_empty());
}

#[test]
fn spawn_fails_when_full() {
    let mut world = world(1);
    let health = world.handle("Health").unwrap();
    world.spawn([(&health, ComponentData::new())]).unwrap();

    let err = world.spawn([(&health, ComponentData::new())]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CapacityExceeded { .. }));
}

// =============================================================================
// Systems over Storage
// =============================================================================

#[test]
fn movement_system_integrates_velocity() {
    let mut world = world(10);
    let position = world.handle("Position").unwrap();
    let velocity = world.handle("Velocity").unwrap();

    let mover = world
        .spawn([
            (&position, ComponentData::new().with("x", 1.0)),
            (&velocity, ComponentData::new().with("dx", 4.0).with("dy", 2.0)),
        ])
        .unwrap();
    let still = world
        .spawn([(&position, ComponentData::new().with("x", 9.0))])
        .unwrap();

    let (p, v) = (position.clone(), velocity.clone());
    world
        .register(
            FnSystem::new("movement", move |ctx: &mut SystemContext<'_, Store>, dt| {
                let moving = ctx.query([&p, &v])?;
                let x = moving.column::<f64>(&p, "x")?;
                let y = moving.column::<f64>(&p, "y")?;
                let dx = moving.column::<f64>(&v, "dx")?;
                let dy = moving.column::<f64>(&v, "dy")?;
                for id in moving.entities() {
                    x.update(*id, |x| *x += dx.get(*id) * dt);
                    y.update(*id, |y| *y += dy.get(*id) * dt);
                }
                Ok(())
            }),
            0,
        )
        .unwrap();

    world.tick(0.5).unwrap();

    let moved = world.get(mover, &position).unwrap();
    assert_eq!(moved.get("x"), Some(&Value::Float(3.0)));
    assert_eq!(moved.get("y"), Some(&Value::Float(1.0)));
    assert_eq!(world.get(still, &position).unwrap().get("x"), Some(&Value::Float(9.0)));
}

#[test]
fn structural_changes_inside_systems() {
    let mut world = world(10);
    let health = world.handle("Health").unwrap();
    for hp in [0, 5, 0] {
        world
            .spawn([(&health, ComponentData::new().with("hp", hp))])
            .unwrap();
    }

    let h = health.clone();
    world
        .register(
            FnSystem::new("reaper", move |ctx: &mut SystemContext<'_, Store>, _| {
                let alive = ctx.query([&h])?;
                let hp = alive.column::<i64>(&h, "hp")?;
                let dead: Vec<_> = alive
                    .entities()
                    .iter()
                    .copied()
                    .filter(|id| hp.get(*id) <= 0)
                    .collect();
                for id in dead {
                    ctx.destroy(id)?;
                }
                Ok(())
            }),
            0,
        )
        .unwrap();

    let before = world.query([&health]).unwrap();
    world.tick(0.016).unwrap();
    let after = world.query([&health]).unwrap();

    assert_eq!(world.count(), 1);
    assert_eq!(after.len(), 1);
    assert!(!Rc::ptr_eq(&before, &after));
}

#[test]
fn systems_can_register_systems_through_the_world() {
    let mut world = world(4);
    world
        .register(
            FnSystem::new("bootstrap", |ctx: &mut SystemContext<'_, Store>, _| {
                if !ctx.has_system("spawner") {
                    ctx.register(
                        FnSystem::new("spawner", |ctx: &mut SystemContext<'_, Store>, _| {
                            ctx.create().map(|_| ())
                        }),
                        0,
                    )?;
                }
                Ok(())
            }),
            10,
        )
        .unwrap();

    world.tick(0.016).unwrap();
    assert_eq!(world.count(), 0);
    assert_eq!(world.system_names(), vec!["bootstrap", "spawner"]);

    world.tick(0.016).unwrap();
    assert_eq!(world.count(), 1);

    world.teardown_all().unwrap();
    assert!(world.system_names().is_empty());
}
