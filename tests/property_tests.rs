//! Property tests over paths, movement and player state.

use glam::Vec2;
use proptest::prelude::*;

use rust_pathquest::core::{BoardRng, CategoryRules, MovementConfig, PlayerState};
use rust_pathquest::effects::EffectResolver;
use rust_pathquest::movement::{MoveMode, MovementController};
use rust_pathquest::path::{layout, Path, TileCategory};

fn line(len: usize) -> Path {
    let coords: Vec<Vec2> = (0..len).map(|i| Vec2::new(i as f32, 0.0)).collect();
    Path::build(&coords).unwrap()
}

/// Run a movement to completion with a fixed frame length.
fn run(controller: &mut MovementController, path: &Path, state: &mut PlayerState) -> usize {
    for _ in 0..100_000 {
        if controller.tick(0.05, path, state).is_some() {
            break;
        }
    }
    state.current_tile_index
}

proptest! {
    #[test]
    fn prop_generated_paths_are_well_formed(
        len in 2usize..80,
        seed in any::<u64>(),
        checkpoint_interval in 0usize..30,
        minigame_interval in 0usize..20,
        event_chance in 0.0f64..=1.0,
        min_event_tiles in 0usize..15,
    ) {
        let rules = CategoryRules::plain()
            .with_checkpoint_interval(checkpoint_interval)
            .with_minigame_interval(minigame_interval)
            .with_event_chance(event_chance)
            .with_min_event_tiles(min_event_tiles);
        let mut rng = BoardRng::new(seed);
        let path = line(len).assign_categories(&rules, &mut rng);

        prop_assert_eq!(path.len(), len);
        for (i, tile) in path.iter().enumerate() {
            prop_assert_eq!(tile.index, i);
        }
        prop_assert_eq!(path.tiles()[0].category, TileCategory::Checkpoint);
        prop_assert_eq!(path.tiles()[len - 1].category, TileCategory::Checkpoint);

        let events = path.count(TileCategory::Event);
        let normal = path.count(TileCategory::Normal);
        prop_assert!(events >= min_event_tiles || normal == 0);
    }

    #[test]
    fn prop_category_assignment_is_seeded(len in 2usize..60, seed in any::<u64>()) {
        let rules = CategoryRules::default();
        let a = line(len).assign_categories(&rules, &mut BoardRng::new(seed));
        let b = line(len).assign_categories(&rules, &mut BoardRng::new(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_corrective_movement_clamps(
        len in 2usize..40,
        start in 0usize..40,
        steps in -60i64..60,
    ) {
        let path = line(len);
        let start = start.min(path.final_index());
        let mut state = PlayerState::new();
        state.arrive_at(start, path.position_of(start));

        let mut controller = MovementController::new(MovementConfig::default().without_delays(), 100);
        controller.start(steps, MoveMode::Corrective).unwrap();
        let end = run(&mut controller, &path, &mut state);

        let expected = path.clamp_index(start as i64 + steps);
        prop_assert_eq!(end, expected);
        prop_assert!(!controller.is_moving());
    }

    #[test]
    fn prop_roll_never_passes_a_minigame(
        len in 3usize..40,
        minigame in 1usize..39,
        steps in 1i64..20,
    ) {
        let minigame = minigame.min(len - 2);
        let path = line(len).with_category(minigame, TileCategory::Minigame).unwrap();
        let mut state = PlayerState::new();

        let mut controller = MovementController::new(MovementConfig::default(), 100);
        controller.start(steps, MoveMode::Roll).unwrap();
        let end = run(&mut controller, &path, &mut state);

        prop_assert_eq!(end, path.clamp_index(steps).min(minigame));
    }

    #[test]
    fn prop_score_never_negative(deltas in prop::collection::vec(-500i64..500, 0..50)) {
        let mut state = PlayerState::new();
        for delta in deltas {
            let before = state.score();
            let applied = state.add_score(delta);
            prop_assert!(state.score() >= 0);
            prop_assert_eq!(state.score(), before + applied);
        }
    }

    #[test]
    fn prop_buff_expires_after_duration(duration in 1u32..10, magnitude in -5i64..5) {
        let mut state = PlayerState::new();
        state.add_buff("Luck", magnitude, duration);

        for _ in 1..duration {
            state.decay_buffs();
            prop_assert!(state.has_buff("Luck"));
        }
        let expired = state.decay_buffs();
        prop_assert_eq!(expired.len(), 1);
        prop_assert!(!state.has_buff("Luck"));
    }

    #[test]
    fn prop_percentage_follows_change_sign(
        change in -100i64..100,
        pct in 0u32..200,
        current in 0i64..10_000,
    ) {
        let delta = EffectResolver::resource_delta(change, Some(pct), current);
        if change < 0 {
            prop_assert!(delta <= 0);
        } else {
            prop_assert!(delta >= 0);
        }
        prop_assert!(delta.abs() <= current * i64::from(pct) / 100 + 1);
    }

    #[test]
    fn prop_serpentine_spacing(len in 1usize..100, columns in 0usize..12) {
        let coords = layout::serpentine(len, columns, 2.0);
        prop_assert_eq!(coords.len(), len);
        for pair in coords.windows(2) {
            prop_assert!((pair[0].distance(pair[1]) - 2.0).abs() < 1e-4);
        }
    }
}
