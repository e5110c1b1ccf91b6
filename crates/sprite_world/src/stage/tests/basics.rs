use super::*;
use crate::geometry::{StageSize, SPAWN_PADDING};

#[test]
fn add_sprite_allocates_ids_and_names() {
    let mut world = World::new();
    world.set_stage_size(StageSize::new(400.0, 300.0)).unwrap();

    let first = world.add_sprite(SpriteKind::Cat);
    let second = world.add_sprite(SpriteKind::Cat);
    let third = world.add_sprite(SpriteKind::Dog);

    assert_eq!(first, "cat1");
    assert_eq!(second, "cat2");
    assert_eq!(third, "dog3");
    assert_eq!(world.sprite(&first).unwrap().name, "Cat 1");
    assert_eq!(world.sprite(&second).unwrap().name, "Cat 2");
    assert_eq!(world.sprite(&third).unwrap().name, "Dog 1");
}

#[test]
fn add_sprite_id_survives_removal_gaps() {
    let mut world = World::new();
    world.add_sprite(SpriteKind::Cat);
    let second = world.add_sprite(SpriteKind::Cat);
    world.remove_sprite("cat1").unwrap();

    // len + 1 collides with the surviving "cat2"; the allocator probes past it.
    let third = world.add_sprite(SpriteKind::Cat);
    assert_eq!(second, "cat2");
    assert_ne!(third, second);
    assert!(world.sprite(&third).is_ok());
}

#[test]
fn spawn_position_respects_stage_bounds() {
    let mut world = World::new();
    world.set_stage_size(StageSize::new(200.0, 100.0)).unwrap();

    for _ in 0..20 {
        let id = world.add_sprite(SpriteKind::Rabbit);
        let sprite = world.sprite(&id).unwrap();
        assert!(sprite.pos.x.abs() <= 100.0 - SPAWN_PADDING);
        assert!(sprite.pos.y.abs() <= 50.0 - SPAWN_PADDING);
    }
}

#[test]
fn set_stage_size_rejects_non_finite() {
    let mut world = World::new();
    world.set_stage_size(StageSize::new(200.0, 100.0)).unwrap();

    let err = world
        .set_stage_size(StageSize::new(f64::NAN, 100.0))
        .unwrap_err();
    assert!(matches!(err, WorldError::InvalidNumber { field: "width", .. }));

    let err = world
        .set_stage_size(StageSize::new(200.0, f64::INFINITY))
        .unwrap_err();
    assert!(matches!(err, WorldError::InvalidNumber { field: "height", .. }));

    assert_eq!(world.stage_size(), StageSize::new(200.0, 100.0));
}

#[test]
fn spawn_with_non_finite_stage_falls_back_to_origin() {
    // A NaN half-extent must not reach the rng's range argument.
    let mut world = World::new();
    world.stage_size = StageSize::new(f64::NAN, 100.0);

    let id = world.add_sprite(SpriteKind::Cat);
    assert_eq!(world.sprite(&id).unwrap().pos, StagePos::ORIGIN);
}

#[test]
fn spawn_position_defaults_to_origin_without_stage() {
    let mut world = World::new();
    let id = world.add_sprite(SpriteKind::Bird);
    assert_eq!(world.sprite(&id).unwrap().pos, StagePos::ORIGIN);
}

#[test]
fn rename_trims_whitespace() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);
    world.rename_sprite("cat1", "  Whiskers  ").unwrap();
    assert_eq!(world.sprite("cat1").unwrap().name, "Whiskers");
}

#[test]
fn resize_rejects_invalid_and_keeps_prior_value() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);

    for bad in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
        let err = world.resize_sprite("cat1", bad).unwrap_err();
        assert!(matches!(err, WorldError::InvalidSize { .. }));
        assert_eq!(world.sprite("cat1").unwrap().size, 80.0);
    }

    world.resize_sprite("cat1", 120.0).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().size, 120.0);
}

#[test]
fn rotation_and_position_reject_non_finite() {
    let mut world = world_with(vec![sprite_at("cat1", 1.0, 2.0, 80.0)]);

    let err = world.set_rotation("cat1", f64::NAN).unwrap_err();
    assert!(matches!(err, WorldError::InvalidNumber { field: "rotation", .. }));
    assert_eq!(world.sprite("cat1").unwrap().rotation, 0.0);

    let err = world.set_position("cat1", f64::INFINITY, 0.0).unwrap_err();
    assert!(matches!(err, WorldError::InvalidNumber { field: "x", .. }));
    assert_eq!(world.sprite("cat1").unwrap().pos, StagePos::new(1.0, 2.0));

    world.set_rotation("cat1", 370.0).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().rotation, 370.0);
}

#[test]
fn toggle_visibility_flips() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);
    assert!(!world.toggle_visibility("cat1").unwrap());
    assert!(world.toggle_visibility("cat1").unwrap());
}

#[test]
fn missing_sprite_reports_not_found() {
    let mut world = World::new();
    let err = world.move_x("ghost", 10.0).unwrap_err();
    assert!(matches!(err, WorldError::SpriteNotFound { .. }));
}

#[test]
fn script_queue_append_remove_reorder() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);

    let a = world
        .add_script("cat1", Instruction::MoveX { steps: 10.0 })
        .unwrap();
    let b = world
        .add_script("cat1", Instruction::Turn { degrees: 15.0 })
        .unwrap();
    let c = world
        .add_script(
            "cat1",
            Instruction::Say {
                text: "Hi".into(),
                seconds: 1.0,
            },
        )
        .unwrap();
    assert_ne!(a, b);
    assert_eq!(world.sprite("cat1").unwrap().scripts.len(), 3);

    world.reorder_scripts("cat1", 2, 0).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().scripts[0].id, c);

    world.remove_script("cat1", &b).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().scripts.len(), 2);

    let err = world.remove_script("cat1", &b).unwrap_err();
    assert!(matches!(err, WorldError::ScriptNotFound { .. }));

    let err = world.reorder_scripts("cat1", 5, 0).unwrap_err();
    assert!(matches!(err, WorldError::InvalidIndex { index: 5, len: 2 }));
}

#[test]
fn instruction_defaults_fill_missing_params() {
    let say: Instruction = serde_json::from_str(r#"{"type": "say", "data": {}}"#).unwrap();
    assert_eq!(
        say,
        Instruction::Say {
            text: DEFAULT_SAY_TEXT.to_string(),
            seconds: DEFAULT_DISPLAY_SECONDS,
        }
    );

    let move_x: Instruction = serde_json::from_str(r#"{"type": "move_x", "data": {}}"#).unwrap();
    assert_eq!(move_x, Instruction::MoveX { steps: DEFAULT_MOVE_STEPS });
}

#[test]
fn unrecognized_instruction_tag_becomes_unknown() {
    let op: Instruction = serde_json::from_str(r#"{"type": "wiggle"}"#).unwrap();
    assert_eq!(op, Instruction::Unknown);
    assert_eq!(op.kind(), "unknown");
}

#[test]
fn bubble_prefers_speech_over_thought() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);
    world.think("cat1", "pondering", 2.0).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().bubble(), Some("pondering"));

    world.say("cat1", "speaking", 2.0).unwrap();
    assert_eq!(world.sprite("cat1").unwrap().bubble(), Some("speaking"));

    world.clear_say("cat1").unwrap();
    assert_eq!(world.sprite("cat1").unwrap().bubble(), Some("pondering"));
}

#[test]
fn reset_run_state_clears_collision_bookkeeping() {
    let mut world = world_with(vec![sprite_at("cat1", 0.0, 0.0, 80.0)]);
    {
        let sprite = world.sprites.get_mut("cat1").unwrap();
        sprite.current_index = 3;
        sprite.has_collided = true;
        sprite.collision_cooldown = true;
        sprite.pending_swap_with = Some("dog1".into());
    }

    world.reset_run_state();

    let sprite = world.sprite("cat1").unwrap();
    assert_eq!(sprite.current_index, 0);
    assert!(!sprite.has_collided);
    assert!(!sprite.collision_cooldown);
    assert!(sprite.pending_swap_with.is_none());
}

#[test]
fn engine_config_sanitized_clamps_zeroes() {
    let config = EngineConfig {
        step_pacing_ms: 0,
        move_anim_ms: 0,
        turn_anim_ms: 0,
        goto_anim_ms: 0,
        poll_interval_ms: 0,
        exchange_backoff_ms: 0,
        cooldown_pause_ms: 0,
        exchange_settle_ms: 0,
    }
    .sanitized();
    assert_eq!(config, EngineConfig::fast());
}
