//! Per-frame simulation step
//!
//! The single place rocks move. Collision detection runs after motion in the
//! same step so hits reflect this frame's positions.

use super::collision;
use super::input::Direction;
use super::state::GameState;
use super::viewport::Viewport;
use crate::tuning::{MovementMode, Tuning};

/// Input sampled for a single step
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Direction held (only used in hold mode)
    pub held: Option<Direction>,
}

/// Advance the playfield by `dt_ms` and return the id of a rock hitting the player
pub fn step(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f32,
    viewport: &Viewport,
    tuning: &Tuning,
) -> Option<u32> {
    let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

    // Rocks fall, and leave the active set once fully past the bottom edge
    let fall = dt * tuning.obstacle_speed_percent_per_ms;
    for rock in &mut state.obstacles {
        rock.y += fall;
    }
    state.obstacles.retain(|rock| rock.y < 100.0);

    state.background_offset += dt * tuning.background_speed_px_per_ms;

    if tuning.movement == MovementMode::Hold {
        if let Some(dir) = input.held {
            state.player.x += dir.sign() * tuning.hold_speed_percent_per_ms * dt;
        }
    }
    // Re-clamp every frame: the viewport may have shrunk since the last one
    let (lo, hi) = viewport.player_bounds(tuning);
    state.player.x = state.player.x.clamp(lo, hi);

    collision::detect(state, viewport, tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::{InputTracker, apply_press};
    use crate::sim::state::RockKind;
    use proptest::prelude::*;

    fn state() -> GameState {
        GameState::new(12345, 60, 3)
    }

    #[test]
    fn test_rocks_fall_and_despawn() {
        let tuning = Tuning::default();
        let vp = Viewport::NOMINAL;
        let mut state = state();
        // Far from the player's column
        state.spawn_obstacle_at(12.0, 10.0, RockKind::Granite);
        state.spawn_obstacle_at(70.0, 99.0, RockKind::Basalt);

        let hit = step(&mut state, &TickInput::default(), 16.0, &vp, &tuning);
        assert_eq!(hit, None);
        assert_eq!(state.obstacles.len(), 1);
        assert!((state.obstacles[0].y - (10.0 + 16.0 * 0.11)).abs() < 1e-4);
        assert!((state.background_offset - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_rock_reaching_100_is_removed() {
        let tuning = Tuning::default();
        let mut state = state();
        // 99 + 0.11 * 10 crosses the bottom edge
        state.spawn_obstacle_at(12.0, 99.0, RockKind::Slate);
        step(&mut state, &TickInput::default(), 10.0, &Viewport::NOMINAL, &tuning);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_step_detects_current_frame_collision() {
        let tuning = Tuning::default();
        let vp = Viewport::NOMINAL;
        let mut state = state();
        let id = state.spawn_obstacle_at(50.0, 0.0, RockKind::Granite);

        // Before the step the rock is far above the player
        assert_eq!(collision::detect(&state, &vp, &tuning), None);
        // 700ms * 0.11 = 77% -> rock hitbox 313..353px vs player 324..356px
        let hit = step(&mut state, &TickInput::default(), 700.0, &vp, &tuning);
        assert_eq!(hit, Some(id));
    }

    #[test]
    fn test_bad_dt_does_nothing() {
        let tuning = Tuning::default();
        let mut state = state();
        state.spawn_obstacle_at(12.0, 10.0, RockKind::Granite);
        step(&mut state, &TickInput::default(), f32::NAN, &Viewport::NOMINAL, &tuning);
        step(&mut state, &TickInput::default(), -30.0, &Viewport::NOMINAL, &tuning);
        assert_eq!(state.obstacles[0].y, 10.0);
        assert_eq!(state.background_offset, 0.0);
    }

    #[test]
    fn test_hold_mode_moves_with_dt() {
        let mut tuning = Tuning::default();
        tuning.movement = MovementMode::Hold;
        let mut state = state();
        let input = TickInput {
            held: Some(Direction::Left),
        };
        step(&mut state, &input, 50.0, &Viewport::NOMINAL, &tuning);
        assert!((state.player.x - (50.0 - 0.06 * 50.0)).abs() < 1e-4);

        // Same distance in many small frames
        let mut other = GameState::new(1, 60, 3);
        for _ in 0..5 {
            step(&mut other, &input, 10.0, &Viewport::NOMINAL, &tuning);
        }
        assert!((other.player.x - state.player.x).abs() < 1e-3);
    }

    #[test]
    fn test_press_mode_ignores_held_key() {
        let tuning = Tuning::default();
        let mut state = state();
        let input = TickInput {
            held: Some(Direction::Right),
        };
        step(&mut state, &input, 50.0, &Viewport::NOMINAL, &tuning);
        assert_eq!(state.player.x, 50.0);
    }

    #[test]
    fn test_viewport_shrink_reclamps_player() {
        let tuning = Tuning::default();
        let mut state = state();
        let wide = Viewport::new(2000.0, 400.0);
        for _ in 0..30 {
            apply_press(&mut state.player, Direction::Right, &wide, &tuning);
        }
        assert!(state.player.x > 90.0);
        step(&mut state, &TickInput::default(), 16.0, &Viewport::NOMINAL, &tuning);
        let (_, hi) = Viewport::NOMINAL.player_bounds(&tuning);
        assert!((state.player.x - hi).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_rocks_never_rise_and_exit_at_100(
            ys in prop::collection::vec(-5.0f32..99.0, 1..20),
            dts in prop::collection::vec(0.0f32..=50.0, 1..40),
        ) {
            let tuning = Tuning::default();
            let vp = Viewport::NOMINAL;
            let mut state = state();
            for y in ys {
                state.spawn_obstacle_at(12.0, y, RockKind::Granite);
            }
            for dt in dts {
                let before: Vec<(u32, f32)> = state.obstacles.iter().map(|r| (r.id, r.y)).collect();
                step(&mut state, &TickInput::default(), dt, &vp, &tuning);
                for rock in &state.obstacles {
                    prop_assert!(rock.y < 100.0);
                    if let Some((_, prev)) = before.iter().find(|(id, _)| *id == rock.id) {
                        prop_assert!(rock.y >= *prev);
                    }
                }
            }
        }

        #[test]
        fn prop_player_stays_in_bounds(
            presses in prop::collection::vec(any::<bool>(), 0..200),
            width in 200.0f32..2000.0,
            hold in any::<bool>(),
        ) {
            let mut tuning = Tuning::default();
            if hold {
                tuning.movement = MovementMode::Hold;
            }
            let vp = Viewport::new(width, 400.0);
            let (lo, hi) = vp.player_bounds(&tuning);
            let mut state = state();
            let mut input = InputTracker::new();
            for right in presses {
                let dir = if right { Direction::Right } else { Direction::Left };
                input.key_down(dir, &mut state.player, &vp, &tuning);
                let tick_input = TickInput { held: input.held() };
                step(&mut state, &tick_input, 16.0, &vp, &tuning);
                prop_assert!(state.player.x >= lo - 1e-4 && state.player.x <= hi + 1e-4);
            }
        }
    }
}
