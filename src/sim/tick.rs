//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Velocities are
//! stored per tick, so there is no `dt` here; the host's accumulator decides
//! how many ticks a frame is worth.

use super::collision::{circles_touch, hits_any_wall};
use super::entity::Direction;
use super::pursuit::update_pursuer;
use super::state::{GameEvent, GamePhase, GameState, Outcome};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Newly requested player direction, replaces any buffered one
    pub intent: Option<Direction>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(dir) = input.intent {
        state.set_intent(dir);
    }

    match state.phase {
        GamePhase::Menu | GamePhase::Over => return,
        GamePhase::Paused => {
            service_reset_timer(state);
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    steer_player(state);
    collect_pickups(state);
    state.player.advance();

    let tile = state.tuning.tile_size;
    let target = state.player.pos;
    update_pursuer(
        &mut state.pursuer,
        target,
        &state.maze,
        &state.walls,
        state.pursuer_speed,
        tile,
    );

    check_pursuer_contact(state);
    check_cleared(state);
}

/// Count down the post-death freeze and resume play when it expires
fn service_reset_timer(state: &mut GameState) {
    state.reset_ticks = state.reset_ticks.saturating_sub(1);
    if state.reset_ticks > 0 {
        return;
    }

    state.respawn_entities();
    state.phase = GamePhase::Playing;
    log::debug!("Respawned, {} lives left", state.lives);
    state.push_event(GameEvent::PhaseChanged(GamePhase::Playing));
}

/// Apply the buffered intent if the move is clear, then stop at walls
fn steer_player(state: &mut GameState) {
    let tile = state.tuning.tile_size;
    let player = &mut state.player;

    // Intent stays buffered until it fits (cornering)
    if let Some(dir) = state.intent {
        let vel = dir.to_vec2() * state.tuning.player_speed;
        if !hits_any_wall(player.pos, player.radius, vel, &state.walls, tile) {
            player.vel = vel;
            player.heading = dir;
        }
    }

    if hits_any_wall(player.pos, player.radius, player.vel, &state.walls, tile) {
        player.stop();
    }
}

/// Consume every pickup the player currently overlaps
fn collect_pickups(state: &mut GameState) {
    // Reverse so removals don't shift unvisited indices
    for i in (0..state.pickups.len()).rev() {
        let pickup = &state.pickups[i];
        if !circles_touch(pickup.pos, pickup.radius, state.player.pos, state.player.radius) {
            continue;
        }
        let pickup = state.pickups.remove(i);
        state.score += pickup.value;
        state.push_event(GameEvent::PickupConsumed {
            kind: pickup.kind,
            pos: pickup.pos,
        });
        state.push_event(GameEvent::ScoreChanged(state.score));
    }
}

fn check_pursuer_contact(state: &mut GameState) {
    let (player, pursuer) = (&state.player, &state.pursuer);
    if !circles_touch(player.pos, player.radius, pursuer.pos, pursuer.radius) {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    log::info!("Caught by the pursuer, {} lives left", state.lives);
    state.push_event(GameEvent::LivesChanged(state.lives));

    if state.lives == 0 {
        state.end_session(Outcome::Loss);
        return;
    }

    state.player.stop();
    state.pursuer.stop();
    state.reset_ticks = state.tuning.reset_delay_ticks();
    state.phase = GamePhase::Paused;
    state.push_event(GameEvent::PhaseChanged(GamePhase::Paused));
}

/// Board cleared; also cancels a pending respawn from this same tick
fn check_cleared(state: &mut GameState) {
    let live = matches!(state.phase, GamePhase::Playing | GamePhase::Paused);
    if live && state.pickups.is_empty() {
        state.end_session(Outcome::Win);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::sim::maze::Maze;
    use crate::sim::state::PickupKind;
    use crate::tuning::{Difficulty, Tuning};
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(layout: &str, tuning: Tuning) -> GameState {
        let maze: Maze = layout.parse().unwrap();
        let mut state = GameState::new(maze, tuning, HighScore::default());
        assert!(state.start(Difficulty::Easy));
        state.drain_events();
        state
    }

    fn run(state: &mut GameState, ticks: usize) {
        for _ in 0..ticks {
            tick(state, &TickInput::default());
        }
    }

    fn steer(dir: Direction) -> TickInput {
        TickInput { intent: Some(dir) }
    }

    #[test]
    fn test_menu_and_over_do_not_tick() {
        let mut state = GameState::new(Maze::default(), Tuning::default(), HighScore::default());
        let before = state.player.pos;
        tick(&mut state, &steer(Direction::Right));
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, before);
        assert_eq!(state.intent, None);

        state.start(Difficulty::Easy);
        state.end_session(Outcome::Loss);
        state.drain_events();
        let (ticks, pursuer) = (state.time_ticks, state.pursuer.pos);
        for _ in 0..30 {
            tick(&mut state, &steer(Direction::Right));
        }
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.pursuer.pos, pursuer);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_clearing_last_pickup_wins() {
        // Pursuer shut in its own pocket on the right
        let mut state = playing("#######\n#P.#G #\n#######", Tuning::default());
        tick(&mut state, &steer(Direction::Right));
        run(&mut state, 9);

        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.outcome, Some(Outcome::Win));
        assert_eq!(state.score, 10);
        assert!(state.pickups.is_empty());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged(10)));
        assert!(matches!(
            events.last(),
            Some(GameEvent::SessionEnded { outcome: Outcome::Win, score: 10, .. })
        ));
    }

    #[test]
    fn test_blocked_intent_keeps_player_still() {
        let mut state = playing("#####\n#P.G#\n#####", Tuning::default());
        let start = state.player.pos;

        tick(&mut state, &steer(Direction::Up));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.pos, start);

        // Already moving into a wall with nothing buffered
        state.intent = None;
        state.player.vel = Vec2::new(-3.2, 0.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.pos, start);
    }

    #[test]
    fn test_buffered_intent_turns_at_opening() {
        let tuning = Tuning {
            player_speed: 4.0,
            ..Tuning::default()
        };
        // Pursuer boxed in bottom-left, never moves
        let mut state = playing("######\n#P...#\n###.##\n#G#.##\n######", tuning);

        tick(&mut state, &steer(Direction::Right));
        tick(&mut state, &steer(Direction::Down));
        // Down is refused until the player reaches column 3
        run(&mut state, 8);
        assert_eq!(state.player.vel, Vec2::new(4.0, 0.0));
        assert_eq!(state.player.heading, Direction::Right);

        run(&mut state, 1);
        assert_eq!(state.player.pos, Vec2::new(70.0, 34.0));
        assert_eq!(state.player.vel, Vec2::new(0.0, 4.0));
        assert_eq!(state.player.heading, Direction::Down);
        assert_eq!(state.intent, Some(Direction::Down));
        assert_eq!(state.score, 20);
    }

    #[test]
    fn test_contact_costs_a_life_and_respawns_after_delay() {
        let mut state = playing("#####\n#P.G#\n#####", Tuning::default());
        state.pursuer.pos = state.player.pos;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.reset_ticks, 90);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LivesChanged(2)));

        // Input during the freeze is buffered, then dropped at respawn
        tick(&mut state, &steer(Direction::Right));
        assert_eq!(state.intent, Some(Direction::Right));
        run(&mut state, 88);
        assert_eq!(state.phase, GamePhase::Paused);

        run(&mut state, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, state.player.spawn);
        assert_eq!(state.pursuer.pos, Vec2::new(70.0, 30.0));
        assert_eq!(state.intent, None);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_ends_session_immediately() {
        let mut state = playing("#####\n#P.G#\n#####", Tuning::default());
        state.lives = 1;
        state.score = 70;
        state.pursuer.pos = state.player.pos;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.outcome, Some(Outcome::Loss));
        assert_eq!(state.high_score.best, 70);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::HighScoreBeaten(70)));
        assert!(!events.contains(&GameEvent::PhaseChanged(GamePhase::Paused)));

        // Nothing moves afterwards
        run(&mut state, 5);
        assert_eq!(state.lives, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_win_cancels_pending_respawn() {
        let mut state = playing("#####\n#P.G#\n#####", Tuning::default());
        let dot = state.pickups[0].pos;
        state.player.pos = dot;
        state.pursuer.pos = dot;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.outcome, Some(Outcome::Win));
        assert_eq!(state.reset_ticks, 0);
    }

    #[test]
    fn test_deterministic() {
        let mut a = playing(&crate::sim::maze::DEFAULT_LAYOUT.join("\n"), Tuning::default());
        let mut b = a.clone();
        let inputs = [Direction::Right, Direction::Down, Direction::Left, Direction::Down];

        for i in 0..600 {
            let input = steer(inputs[(i / 40) % inputs.len()]);
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.pursuer.pos, b.pursuer.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_session_invariants(
            hard in any::<bool>(),
            script in proptest::collection::vec((0usize..5, 1usize..60), 1..20),
        ) {
            let mut state = GameState::new(Maze::default(), Tuning::default(), HighScore::default());
            let difficulty = if hard { Difficulty::Hard } else { Difficulty::Easy };
            state.start(difficulty);
            let initial = state.remaining_value();

            for (choice, hold) in script {
                let intent = Direction::ALL.get(choice).copied();
                for step in 0..hold {
                    let input = TickInput { intent: if step == 0 { intent } else { None } };
                    let (score, lives, left) = (state.score, state.lives, state.pickups.len());
                    tick(&mut state, &input);

                    prop_assert!(state.score >= score);
                    prop_assert!(state.lives <= lives);
                    prop_assert!(state.pickups.len() <= left);
                    prop_assert_eq!(state.score + state.remaining_value(), initial);

                    let eaten: u64 = state
                        .drain_events()
                        .iter()
                        .filter_map(|e| match e {
                            GameEvent::PickupConsumed { kind, .. } => Some(match kind {
                                PickupKind::Dot => 10,
                                PickupKind::Power => 50,
                            }),
                            _ => None,
                        })
                        .sum();
                    prop_assert_eq!(state.score - score, eaten);

                    let v = state.pursuer.vel;
                    prop_assert!(v.x == 0.0 || v.y == 0.0);
                    if state.lives == 0 {
                        prop_assert_eq!(state.phase, GamePhase::Over);
                        prop_assert_eq!(state.outcome, Some(Outcome::Loss));
                    }
                }
            }
        }
    }
}
