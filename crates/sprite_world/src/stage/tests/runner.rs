use super::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn run_with_no_sprites_finishes_immediately() {
    let runner = runner_with(World::new());
    let metrics = runner.run_all_scripts().await;
    assert_eq!(metrics, RunMetrics::default());
    assert!(!runner.store().is_running().await);
}

#[tokio::test]
async fn hero_mode_off_never_exchanges() {
    // Fully overlapping sprites with programs, but hero mode stays off.
    let mut world = world_with(vec![
        sprite_at("cat1", 0.0, 0.0, 80.0),
        sprite_at("dog1", 5.0, 0.0, 80.0),
    ]);
    push_script(&mut world, "cat1", Instruction::MoveX { steps: 5.0 });
    push_script(&mut world, "dog1", Instruction::Turn { degrees: 90.0 });

    let runner = runner_with(world);
    let metrics = runner.run_all_scripts().await;

    assert_eq!(metrics.collisions_flagged, 0);
    assert_eq!(metrics.exchanges_completed, 0);
    assert_eq!(metrics.instructions_executed, 2);

    // Programs stayed with their owners.
    let cat = runner.store().get("cat1").await.unwrap();
    let dog = runner.store().get("dog1").await.unwrap();
    assert_eq!(cat.scripts[0].op, Instruction::MoveX { steps: 5.0 });
    assert_eq!(dog.scripts[0].op, Instruction::Turn { degrees: 90.0 });
}

#[tokio::test]
async fn collision_exchanges_programs_and_restarts() {
    // Only the cat starts with a program. A collision hands it to the dog,
    // whose executor restarts at cursor 0 and runs it; while the pair stays
    // overlapped, further collisions may bounce the program back, so the
    // assertions cover conservation and eventual separation rather than a
    // specific interleaving.
    let mut world = world_with(vec![
        sprite_at("cat1", 0.0, 0.0, 80.0),
        sprite_at("dog1", 10.0, 0.0, 80.0),
    ]);
    world.set_hero_mode(true);
    push_script(&mut world, "cat1", Instruction::MoveX { steps: 100.0 });

    let runner = Arc::new(runner_with(world));
    let store = runner.store().clone();
    let run = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run_all_scripts().await }
    });

    let separated = {
        let store = store.clone();
        eventually(5_000, move || {
            let store = store.clone();
            async move {
                let (Some(cat), Some(dog)) =
                    (store.try_get("cat1").await, store.try_get("dog1").await)
                else {
                    return false;
                };
                (cat.pos.x - dog.pos.x).abs() > 40.0
            }
        })
        .await
    };
    assert!(separated, "the exchanged program never ran");

    runner.stop().await;
    let metrics = run.await.unwrap();

    assert!(metrics.collisions_flagged >= 1);
    assert!(metrics.exchanges_completed >= 1);

    let cat = store.get("cat1").await.unwrap();
    let dog = store.get("dog1").await.unwrap();
    // Exchanges move the single program around; they never duplicate or
    // drop it.
    assert_eq!(cat.scripts.len() + dog.scripts.len(), 1);
    // Whoever held the program only ever stepped 100 to the right.
    assert_eq!(cat.pos.x.rem_euclid(100.0), 0.0);
    assert_eq!((dog.pos.x - 10.0).rem_euclid(100.0), 0.0);
    // Post-run cleanup.
    assert_eq!(cat.current_index, 0);
    assert_eq!(dog.current_index, 0);
    assert!(!cat.collision_cooldown && !dog.collision_cooldown);
    assert!(cat.pending_swap_with.is_none() && dog.pending_swap_with.is_none());
}

#[tokio::test]
async fn overlapping_pair_with_identical_programs_swaps_and_reruns() {
    // Both sprites sit inside the collision threshold from the start; the
    // detector fires before either completes a move, the (identical)
    // programs are exchanged, and both restart from cursor 0.
    let mut world = world_with(vec![
        sprite_at("cat1", 0.0, 0.0, 80.0),
        sprite_at("dog1", 10.0, 0.0, 80.0),
    ]);
    world.set_hero_mode(true);
    push_script(&mut world, "cat1", Instruction::MoveX { steps: 20.0 });
    push_script(&mut world, "dog1", Instruction::MoveX { steps: 20.0 });

    let runner = Arc::new(runner_with(world));
    let run = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run_all_scripts().await }
    });

    let swapped_and_ran = {
        let runner = Arc::clone(&runner);
        eventually(5_000, move || {
            let runner = Arc::clone(&runner);
            async move {
                let metrics = runner.metrics();
                metrics.exchanges_completed >= 1 && metrics.instructions_executed >= 2
            }
        })
        .await
    };
    assert!(swapped_and_ran, "no exchange before the programs ran");

    runner.stop().await;
    run.await.unwrap();

    let cat = runner.store().get("cat1").await.unwrap();
    let dog = runner.store().get("dog1").await.unwrap();
    // Exchanges move programs around but never duplicate or drop them.
    assert_eq!(cat.scripts.len(), 1);
    assert_eq!(dog.scripts.len(), 1);
    // Each executed instruction pushed one of the two 20 steps to the right.
    assert!(cat.pos.x + dog.pos.x >= 10.0 + 40.0);
}

#[tokio::test]
async fn run_all_scripts_is_a_noop_while_running() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);
    world.set_hero_mode(true); // empty program + hero mode: runs until stopped

    let runner = Arc::new(runner_with(world));
    let run = tokio::spawn({
        let runner = Arc::clone(&runner);
        async move { runner.run_all_scripts().await }
    });

    let store = runner.store().clone();
    let started = eventually(2_000, || {
        let store = store.clone();
        async move { store.is_running().await }
    })
    .await;
    assert!(started);

    // A second start must return without spawning a second run.
    let second = tokio::time::timeout(Duration::from_secs(1), runner.run_all_scripts()).await;
    assert!(second.is_ok(), "second start should be a no-op");
    assert!(runner.store().is_running().await);

    runner.stop().await;
    run.await.unwrap();
    assert!(!runner.store().is_running().await);
}
