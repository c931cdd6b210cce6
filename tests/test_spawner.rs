mod support;

use approx::assert_relative_eq;

use side_shooter::entities::{EnemyId, EnemyKind, Player, Tilt};
use side_shooter::events::{GameEvent, Sound, Track};
use side_shooter::spawner::{SpawnController, SpawnPhase, SpawnTimer};

use support::{count, running_spawner, seeded_rng, spawner_with_boss, tuning};

fn player_at(y: f32) -> Player {
    Player {
        x: tuning().player_x,
        y,
        tilt: Tilt::Level,
    }
}

// ── Normal spawning ───────────────────────────────────────────────────────────

#[test]
fn first_spawn_tick_places_a_normal_enemy_and_rearms() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    let mut events = Vec::new();

    spawner.advance_timers(1.0, &mut state, &mut rng, &mut events);
    assert!(spawner.enemies().is_empty());

    spawner.advance_timers(0.5, &mut state, &mut rng, &mut events);
    assert_eq!(spawner.enemies().len(), 1);
    let e = &spawner.enemies()[0];
    assert_eq!(e.kind, EnemyKind::Normal);
    assert_relative_eq!(e.x, t.spawn_x);
    assert!(e.y >= t.min_y && e.y <= t.max_y);
    assert_eq!(e.current_health, 1);
    assert_eq!(e.max_health, 1);

    let next = spawner.timers().remaining(SpawnTimer::SpawnTick).unwrap();
    assert_relative_eq!(next, f64::from(state.spawn_delay(&t)));
    assert!(events.is_empty());
}

#[test]
fn spawned_health_follows_score_and_bonus() {
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    state.score = 50;
    state.normal_enemy_health_bonus = 1;

    spawner.advance_timers(1.5, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.enemies()[0].current_health, 4);
}

#[test]
fn spawn_is_skipped_when_every_lane_is_taken() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();

    // Neighbours every 2 units; each blocks 2.7 units either side.
    let mut y = t.min_y;
    while y <= t.max_y {
        spawner.spawn_enemy(EnemyKind::Normal, 18.0, y, 1);
        y += 2.0;
    }
    let crowd = spawner.enemies().len();

    spawner.advance_timers(1.5, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.enemies().len(), crowd);
    // Still re-armed: a skipped tick is not an error.
    assert!(spawner.timers().is_armed(SpawnTimer::SpawnTick));
}

#[test]
fn enemies_left_of_the_spawn_region_do_not_block() {
    let t = tuning();
    let (mut spawner, _) = running_spawner();
    let mut rng = seeded_rng();
    let mut y = t.min_y;
    while y <= t.max_y {
        spawner.spawn_enemy(EnemyKind::Normal, 10.0, y, 1);
        y += 1.0;
    }
    assert!(spawner.find_spawn_y(&mut rng).is_some());
}

#[test]
fn spawn_keeps_clear_of_a_nearby_enemy() {
    let t = tuning();
    let (mut spawner, _) = running_spawner();
    let mut rng = seeded_rng();
    spawner.spawn_enemy(EnemyKind::Normal, 19.0, 0.0, 1);

    for _ in 0..50 {
        if let Some(y) = spawner.find_spawn_y(&mut rng) {
            assert!(y.abs() >= t.enemy_size * t.spawn_gap_factor);
        }
    }
}

// ── Boss warning ──────────────────────────────────────────────────────────────

#[test]
fn boss_warning_waits_for_the_kill_floor() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    let mut events = Vec::new();
    state.score = t.boss_spawn_score_initial;
    state.enemies_killed_since_boss = t.min_enemies_before_boss - 1;

    spawner.advance_timers(1.5, &mut state, &mut rng, &mut events);
    assert_eq!(spawner.phase(), SpawnPhase::SpawningNormal);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::ScreenShake { .. })), 0);
    let before = spawner.enemies().len();
    assert_eq!(before, 1);

    state.enemies_killed_since_boss += 1;
    spawner.advance_timers(2.0, &mut state, &mut rng, &mut events);
    assert_eq!(spawner.phase(), SpawnPhase::BossWarning);
    assert_eq!(spawner.enemies().len(), before);
    assert!(events.contains(&GameEvent::ScreenShake {
        duration: 2.0,
        magnitude: 2.0
    }));
    assert!(events.contains(&GameEvent::StopLoop(Track::Background)));
    assert!(events.contains(&GameEvent::StartLoop(Track::Boss)));
    assert!(spawner.timers().is_armed(SpawnTimer::BossArrival));
    assert!(!spawner.timers().is_armed(SpawnTimer::SpawnTick));
}

#[test]
fn boss_warning_is_suppressed_below_threshold() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    state.score = t.boss_spawn_score_initial - 1;
    state.enemies_killed_since_boss = 50;

    spawner.advance_timers(1.5, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.phase(), SpawnPhase::SpawningNormal);
}

#[test]
fn boss_arrives_after_the_warning_delay() {
    let t = tuning();
    let mut rng = seeded_rng();
    let (spawner, state, events) = spawner_with_boss(&mut rng);

    let boss = spawner.boss().unwrap();
    assert_eq!(boss.current_health, t.boss_health_base);
    assert_eq!(boss.max_health, t.boss_health_base);
    assert_relative_eq!(boss.x, t.spawn_x);
    assert!(boss.y >= t.min_y + 2.0 && boss.y <= t.max_y - 2.0);
    assert!(state.has_boss_spawned);
    assert!(events.contains(&GameEvent::BossHealth(t.boss_health_base)));
    assert!(events.contains(&GameEvent::BossHealthVisible(true)));
}

#[test]
fn normal_spawning_idles_while_boss_is_out() {
    let mut rng = seeded_rng();
    let (mut spawner, mut state, _) = spawner_with_boss(&mut rng);

    for _ in 0..5 {
        spawner.advance_timers(2.0, &mut state, &mut rng, &mut Vec::new());
        assert_eq!(spawner.enemies().len(), 1);
        assert!(spawner.timers().is_armed(SpawnTimer::SpawnTick));
    }
}

// ── Boss resolution ───────────────────────────────────────────────────────────

#[test]
fn boss_defeat_bonus_lands_on_every_second_defeat() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut bonuses = Vec::new();
    for _ in 0..6 {
        state.has_boss_spawned = true;
        state.enemies_killed_since_boss = 7;
        state.score += 13;
        spawner.on_boss_defeated(&mut state, &mut Vec::new());

        assert!(!state.has_boss_spawned);
        assert_eq!(state.enemies_killed_since_boss, 0);
        assert_eq!(state.boss_spawn_score_threshold, state.score + t.min_enemies_before_boss);
        bonuses.push(state.normal_enemy_health_bonus);
    }
    assert_eq!(bonuses, vec![0, 1, 1, 2, 2, 3]);
    assert_eq!(state.bosses_defeated_count, 6);
}

#[test]
fn boss_defeat_resumes_normal_spawning() {
    let t = tuning();
    let mut rng = seeded_rng();
    let (mut spawner, mut state, _) = spawner_with_boss(&mut rng);
    let id = spawner.boss().unwrap().id;
    spawner.remove_enemy(id);

    let mut events = Vec::new();
    spawner.on_boss_defeated(&mut state, &mut events);

    assert_eq!(spawner.phase(), SpawnPhase::SpawningNormal);
    assert!(events.contains(&GameEvent::BossHealthVisible(false)));
    assert!(events.contains(&GameEvent::StopLoop(Track::Boss)));
    assert!(events.contains(&GameEvent::StartLoop(Track::Background)));
    let next = spawner.timers().remaining(SpawnTimer::SpawnTick).unwrap();
    assert_relative_eq!(next, f64::from(t.resume_spawn_delay));
}

#[test]
fn boss_escape_costs_health_but_not_progress() {
    let t = tuning();
    let mut rng = seeded_rng();
    let (mut spawner, mut state, _) = spawner_with_boss(&mut rng);
    let id = spawner.boss().unwrap().id;
    {
        let boss = spawner.enemy_mut(id).unwrap();
        boss.x = t.escape_x + 0.1;
        boss.y = t.min_y + 2.0;
    }
    let player = player_at(t.max_y);

    let mut events = Vec::new();
    let died = spawner.update(0.5, &mut state, &player, &mut events);

    assert!(!died);
    assert!(spawner.boss().is_none());
    assert_eq!(state.health, t.initial_health - t.boss_damage);
    assert_eq!(state.bosses_defeated_count, 0);
    assert_eq!(state.normal_enemy_health_bonus, 0);
    assert!(!state.has_boss_spawned);
    assert_eq!(spawner.phase(), SpawnPhase::SpawningNormal);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Explosion { .. })), 0);
    assert!(!events.contains(&GameEvent::PlaySound(Sound::BossDie)));
    assert!(events.contains(&GameEvent::Hearts(state.health)));
    assert!(events.contains(&GameEvent::BossHealthVisible(false)));

    // Spawning is back within one resume delay.
    spawner.advance_timers(t.resume_spawn_delay, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.enemies().len(), 1);
    assert!(!spawner.enemies()[0].is_boss());
}

// ── Enemy advance ─────────────────────────────────────────────────────────────

#[test]
fn enemies_move_left_at_score_speed() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let id = spawner.spawn_enemy(EnemyKind::Normal, 10.0, -5.0, 1);
    let boss = spawner.spawn_enemy(EnemyKind::Boss, 10.0, 5.0, 20);

    spawner.update(0.5, &mut state, &player_at(0.0), &mut Vec::new());
    let x_of = |sp: &SpawnController, id: EnemyId| {
        sp.enemies().iter().find(|e| e.id == id).unwrap().x
    };
    assert_relative_eq!(x_of(&spawner, id), 10.0 - t.min_fly_speed * 0.5);
    assert_relative_eq!(x_of(&spawner, boss), 10.0 - t.min_boss_speed * 0.5);
}

#[test]
fn ramming_enemy_explodes_and_costs_one_heart() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let player = player_at(0.0);
    spawner.spawn_enemy(EnemyKind::Normal, player.x + 0.5, player.y, 3);

    let mut events = Vec::new();
    let died = spawner.update(0.01, &mut state, &player, &mut events);

    assert!(!died);
    assert!(spawner.enemies().is_empty());
    assert_eq!(state.health, t.initial_health - 1);
    assert_eq!(state.score, 0);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Explosion { .. })), 1);
    assert!(events.contains(&GameEvent::PlaySound(Sound::EnemyKill)));
    assert!(events.contains(&GameEvent::PlaySound(Sound::PlayerDamage)));
    assert!(events.contains(&GameEvent::DamageFlash));
    assert!(events.contains(&GameEvent::PlayerShake));
}

#[test]
fn ramming_boss_counts_as_a_defeat() {
    let t = tuning();
    let mut rng = seeded_rng();
    let (mut spawner, mut state, _) = spawner_with_boss(&mut rng);
    let player = player_at(0.0);
    let id = spawner.boss().unwrap().id;
    {
        let boss = spawner.enemy_mut(id).unwrap();
        boss.x = player.x + 1.0;
        boss.y = player.y;
    }

    let mut events = Vec::new();
    spawner.update(0.01, &mut state, &player, &mut events);

    assert!(spawner.boss().is_none());
    assert_eq!(state.bosses_defeated_count, 1);
    assert_eq!(state.health, t.initial_health - t.boss_damage);
    assert!(events.contains(&GameEvent::PlaySound(Sound::BossDie)));
    assert_eq!(spawner.phase(), SpawnPhase::SpawningNormal);
}

#[test]
fn escaping_enemy_hurts_without_explosion() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    spawner.spawn_enemy(EnemyKind::Normal, t.escape_x + 0.1, t.min_y, 1);

    let mut events = Vec::new();
    spawner.update(0.1, &mut state, &player_at(t.max_y), &mut events);

    assert!(spawner.enemies().is_empty());
    assert_eq!(state.health, t.initial_health - 1);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Explosion { .. })), 0);
    assert!(!events.contains(&GameEvent::PlayerShake));
}

#[test]
fn simultaneous_rams_each_deal_damage() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let player = player_at(0.0);
    for dy in [-0.5, 0.0, 0.5] {
        spawner.spawn_enemy(EnemyKind::Normal, player.x, player.y + dy, 1);
    }

    let mut events = Vec::new();
    spawner.update(0.01, &mut state, &player, &mut events);

    assert_eq!(state.health, t.initial_health - 3);
    assert_eq!(count(&events, |e| matches!(e, GameEvent::Hearts(_))), 3);
}

#[test]
fn death_stops_the_advance_mid_tick() {
    let (mut spawner, mut state) = running_spawner();
    let player = player_at(0.0);
    state.health = 1;
    spawner.spawn_enemy(EnemyKind::Normal, player.x, player.y, 1);
    spawner.spawn_enemy(EnemyKind::Normal, player.x, player.y, 1);

    let died = spawner.update(0.01, &mut state, &player, &mut Vec::new());

    assert!(died);
    assert_eq!(state.health, 0);
    assert_eq!(spawner.enemies().len(), 1);
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn reset_clears_enemies_and_timers() {
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    spawner.spawn_enemy(EnemyKind::Normal, 5.0, 0.0, 1);
    spawner.reset();

    assert!(spawner.enemies().is_empty());
    assert_eq!(spawner.phase(), SpawnPhase::Idle);
    spawner.advance_timers(10.0, &mut state, &mut rng, &mut Vec::new());
    assert!(spawner.enemies().is_empty());
}

#[test]
fn pause_keeps_the_remaining_delay() {
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();

    spawner.advance_timers(0.5, &mut state, &mut rng, &mut Vec::new());
    spawner.pause();
    spawner.advance_timers(30.0, &mut state, &mut rng, &mut Vec::new());
    assert!(spawner.enemies().is_empty());

    spawner.resume();
    assert_relative_eq!(spawner.timers().remaining(SpawnTimer::SpawnTick).unwrap(), 1.0);
    spawner.advance_timers(1.0, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.enemies().len(), 1);
}

#[test]
fn resume_arms_a_fresh_tick_when_none_is_pending() {
    let t = tuning();
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    state.score = t.boss_spawn_score_initial;
    state.enemies_killed_since_boss = t.min_enemies_before_boss;
    spawner.advance_timers(1.5, &mut state, &mut rng, &mut Vec::new());
    assert!(!spawner.timers().is_armed(SpawnTimer::SpawnTick));

    spawner.advance_timers(0.5, &mut state, &mut rng, &mut Vec::new());
    spawner.pause();
    spawner.resume();

    assert_relative_eq!(
        spawner.timers().remaining(SpawnTimer::SpawnTick).unwrap(),
        f64::from(t.resume_spawn_delay)
    );
    assert_relative_eq!(spawner.timers().remaining(SpawnTimer::BossArrival).unwrap(), 1.5);
    // The fresh tick only idles during the warning; it must not start a second one.
    spawner.advance_timers(1.0, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.phase(), SpawnPhase::BossWarning);
    spawner.advance_timers(0.5, &mut state, &mut rng, &mut Vec::new());
    assert_eq!(spawner.phase(), SpawnPhase::BossActive);
    assert_eq!(spawner.enemies().iter().filter(|e| e.is_boss()).count(), 1);
}

#[test]
fn stop_cancels_everything() {
    let (mut spawner, mut state) = running_spawner();
    let mut rng = seeded_rng();
    spawner.stop();
    spawner.resume();
    spawner.advance_timers(10.0, &mut state, &mut rng, &mut Vec::new());
    assert!(spawner.enemies().is_empty());
    assert_eq!(spawner.phase(), SpawnPhase::Idle);
}
