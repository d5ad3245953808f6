//! Wolfgrid Headless Simulation Harness
//!
//! Validates level data and game logic without a renderer or input device.
//! Loads the bundled level, checks its structure, exercises collision,
//! pathfinding and raycasting against it, then plays a scripted input
//! sequence through the full engine.
//!
//! Usage:
//!   cargo run -p wolfgrid-simtest
//!   cargo run -p wolfgrid-simtest -- --verbose
//!   RUST_LOG=wolfgrid_core=debug cargo run -p wolfgrid-simtest

use std::collections::HashSet;

use serde::Deserialize;
use wolfgrid_core::prelude::*;
use wolfgrid_logic::collision::{BoundingBox, LocalExtent};
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::constants::player;
use wolfgrid_logic::level::{cell_of, FieldKind, Level, LevelError};
use wolfgrid_logic::math::{Vector2, Vector3};
use wolfgrid_logic::movement::{CameraController, InputState};
use wolfgrid_logic::pathfinding::Pathfinder;
use wolfgrid_logic::raycast::GridRaycaster;
use wolfgrid_logic::transform::Transform;

// ── Bundled level data ──────────────────────────────────────────────────
const LEVEL_JSON: &str = include_str!("../../../data/levels/level1.json");
const SCRIPT_JSON: &str = include_str!("../../../data/levels/level1_script.json");

/// One step of the scripted play-through.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ScriptStep {
    note: String,
    forward: f32,
    strafe: f32,
    turn: f32,
    interact: bool,
    shoot: bool,
    ticks: u32,
}

impl Default for ScriptStep {
    fn default() -> Self {
        Self {
            note: String::new(),
            forward: 0.0,
            strafe: 0.0,
            turn: 0.0,
            interact: false,
            shoot: false,
            ticks: 1,
        }
    }
}

impl ScriptStep {
    fn input(&self) -> InputState {
        InputState {
            direction: Vector3::new(self.strafe, 0.0, self.forward),
            rotation: self.turn,
            interacting: self.interact,
            shooting: self.shoot,
        }
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    println!("=== Wolfgrid Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Level structure
    let level = match Level::from_json(LEVEL_JSON) {
        Ok(level) => level,
        Err(e) => {
            println!("  ✗ level_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_level(&level, verbose));

    // 2. Level validation errors
    results.extend(validate_level_errors(verbose));

    // 3. Collision against level walls
    results.extend(validate_collision(&level, verbose));

    // 4. Pathfinding from every enemy
    results.extend(validate_pathfinding(&level, verbose));

    // 5. Raycasting
    results.extend(validate_raycast(&level, verbose));

    // 6. Scripted engine run
    results.extend(validate_engine_script(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Level ────────────────────────────────────────────────────────────

fn validate_level(level: &Level, verbose: bool) -> Vec<TestResult> {
    println!("--- Level Structure ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "level_dimensions".into(),
        passed: level.width() == 12 && level.height() == 10,
        detail: format!("{}x{}", level.width(), level.height()),
    });

    let walls = level.walls().count();
    let doors = level.doors().count();
    let enemies = level.enemies().count();
    let pickups = level.pickups().count();
    let decorations = level.decorations().count();
    results.push(TestResult {
        name: "level_field_counts".into(),
        passed: walls == 50 && doors == 2 && enemies == 2 && pickups == 5 && decorations == 1,
        detail: format!(
            "walls={} doors={} enemies={} pickups={} decorations={}",
            walls, doors, enemies, pickups, decorations
        ),
    });

    // The bundled level carries one unknown tag that must be dropped
    results.push(TestResult {
        name: "level_unknown_fields_dropped".into(),
        passed: level.fields().len() == 61,
        detail: format!("{} recognised fields", level.fields().len()),
    });

    let start = level.player();
    results.push(TestResult {
        name: "level_player_start".into(),
        passed: start.cell() == (1, 1) && start.rotation == Some(90.0),
        detail: format!("player at {:?}, rotation {:?}", start.cell(), start.rotation),
    });

    // Border must be closed
    let mut open_border = Vec::new();
    for x in 0..level.width() as i32 {
        for y in [0, level.height() as i32 - 1] {
            if !is_wall(level, x, y) {
                open_border.push((x, y));
            }
        }
    }
    for y in 0..level.height() as i32 {
        for x in [0, level.width() as i32 - 1] {
            if !is_wall(level, x, y) {
                open_border.push((x, y));
            }
        }
    }
    results.push(TestResult {
        name: "level_closed_border".into(),
        passed: open_border.is_empty(),
        detail: if open_border.is_empty() {
            "border fully walled".into()
        } else {
            format!("open border cells: {:?}", open_border)
        },
    });

    // Every wall beside a door points at it
    let mut bad_adjacency = Vec::new();
    for wall in level.walls() {
        if let Some([dx, dy]) = wall.wall_direction {
            let target = level.field_at(wall.x + dx, wall.y + dy);
            if !target.is_some_and(|f| f.kind == FieldKind::Door) {
                bad_adjacency.push(wall.cell());
            }
        }
    }
    let tagged = level.walls().filter(|w| w.is_near_door()).count();
    results.push(TestResult {
        name: "level_door_adjacency".into(),
        passed: bad_adjacency.is_empty() && tagged == 4,
        detail: format!("{} walls tagged, {} bad", tagged, bad_adjacency.len()),
    });

    let yaws: Vec<(i32, i32, f32)> = level
        .doors()
        .map(|d| (d.x, d.y, level.door_yaw(d).to_degrees().round()))
        .collect();
    results.push(TestResult {
        name: "level_door_orientation".into(),
        passed: yaws.contains(&(4, 2, 90.0)) && yaws.contains(&(2, 4, 0.0)),
        detail: format!("{:?}", yaws),
    });

    if verbose {
        println!("  Grid:");
        for y in 0..level.height() as i32 {
            let row: String = (0..level.width() as i32)
                .map(|x| match level.field_at(x, y).map(|f| f.kind) {
                    Some(FieldKind::Wall(_)) => '#',
                    Some(FieldKind::Door) => 'D',
                    Some(FieldKind::Player) => 'P',
                    Some(FieldKind::Enemy) => 'E',
                    Some(FieldKind::Pickup(_)) => '$',
                    Some(FieldKind::Lamp) => 'L',
                    None => '.',
                })
                .collect();
            println!("    {}", row);
        }
    }

    results
}

fn is_wall(level: &Level, x: i32, y: i32) -> bool {
    level
        .field_at(x, y)
        .is_some_and(|f| matches!(f.kind, FieldKind::Wall(_)))
}

// ── 2. Level errors ─────────────────────────────────────────────────────

fn validate_level_errors(_verbose: bool) -> Vec<TestResult> {
    println!("--- Level Validation ---");
    let mut results = Vec::new();

    let cases: [(&str, &str, fn(&LevelError) -> bool); 5] = [
        ("reject_malformed_json", "{ not json", |e| {
            matches!(e, LevelError::Json(_))
        }),
        (
            "reject_empty_grid",
            r#"{"width":0,"height":4,"fields":[]}"#,
            |e| matches!(e, LevelError::EmptyGrid { .. }),
        ),
        (
            "reject_missing_player",
            r#"{"width":2,"height":2,"fields":[{"x":0,"y":0,"value":"wall"}]}"#,
            |e| matches!(e, LevelError::MissingPlayer),
        ),
        (
            "reject_two_players",
            r#"{"width":2,"height":2,"fields":[
                {"x":0,"y":0,"value":"player"},{"x":1,"y":1,"value":"player"}]}"#,
            |e| matches!(e, LevelError::MultiplePlayers(2)),
        ),
        (
            "reject_out_of_bounds",
            r#"{"width":2,"height":2,"fields":[
                {"x":0,"y":0,"value":"player"},{"x":5,"y":0,"value":"wall"}]}"#,
            |e| matches!(e, LevelError::OutOfBounds { x: 5, .. }),
        ),
    ];

    for (name, json, expected) in cases {
        let outcome = Level::from_json(json);
        results.push(TestResult {
            name: name.into(),
            passed: outcome.as_ref().err().is_some_and(expected),
            detail: match outcome {
                Ok(_) => "accepted".into(),
                Err(e) => e.to_string(),
            },
        });
    }

    results
}

// ── 3. Collision ────────────────────────────────────────────────────────

fn validate_collision(level: &Level, _verbose: bool) -> Vec<TestResult> {
    println!("--- Collision ---");
    let mut results = Vec::new();
    let config = GameConfig::default();
    let cs = config.cell_size;

    let boxes: Vec<BoundingBox> = level
        .walls()
        .map(|w| {
            BoundingBox::new(
                &Transform::at(w.world_position(cs)),
                &LocalExtent::cuboid(cs, cs, cs),
            )
        })
        .collect();

    let all_contain_centre = boxes.iter().all(|b| b.is_colliding(b.center()));
    let all_half_cell = boxes
        .iter()
        .all(|b| (b.half_size().x - cs / 2.0).abs() < 1e-3);
    results.push(TestResult {
        name: "collision_wall_boxes".into(),
        passed: all_contain_centre && all_half_cell,
        detail: format!("{} wall boxes, half size {}", boxes.len(), cs / 2.0),
    });

    let empty = BoundingBox::new(&Transform::default(), &LocalExtent::from_vertices(&[]));
    results.push(TestResult {
        name: "collision_degenerate_box".into(),
        passed: empty.is_degenerate() && !empty.is_colliding(Vector3::new(1.0, 0.0, 0.0)),
        detail: "empty vertex data yields a zero-size box".into(),
    });

    // Run into the east wall of the start room for two seconds
    let mut camera = CameraController::from_config(
        level.player().world_position(cs),
        &config,
    );
    camera.rotate(std::f32::consts::FRAC_PI_2 / config.rotation_speed, 1.0);
    let mut entered = None;
    for _ in 0..120 {
        camera.check_collisions(boxes.iter());
        camera.move_by(Vector3::new(0.0, 0.0, 1.0), 1.0 / 60.0);
        let cell = cell_of(camera.position().horizontal(), cs);
        if is_wall(level, cell.0, cell.1) {
            entered = Some(cell);
            break;
        }
    }
    results.push(TestResult {
        name: "collision_camera_stops_at_wall".into(),
        passed: entered.is_none(),
        detail: format!(
            "camera stopped at x={:.1}, entered wall: {:?}",
            camera.position().x,
            entered
        ),
    });

    results
}

// ── 4. Pathfinding ──────────────────────────────────────────────────────

fn validate_pathfinding(level: &Level, verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();
    let config = GameConfig::default();
    let cs = config.cell_size;
    let mut pathfinder = Pathfinder::from_config(&config);
    pathfinder.prepare_level(level);

    let player = level.player().world_position(cs).horizontal();
    for enemy in level.enemies() {
        let from = enemy.world_position(cs).horizontal();
        let waypoints = pathfinder.get_waypoints(from, player);
        let all_walkable = waypoints.iter().all(|w| pathfinder.is_walkable(w.cell));
        let increasing = waypoints.windows(2).all(|p| p[1].cost > p[0].cost);
        let reaches = waypoints
            .last()
            .is_some_and(|w| w.position.distance(&player) < config.sub_cell_size());
        results.push(TestResult {
            name: format!("path_enemy_{}_{}_to_player", enemy.x, enemy.y),
            passed: all_walkable && increasing && reaches,
            detail: format!(
                "{} waypoints, cost {}",
                waypoints.len(),
                waypoints.last().map_or(0, |w| w.cost)
            ),
        });
        if verbose {
            let cells: Vec<(i32, i32)> = waypoints
                .iter()
                .map(|w| cell_of(w.position, cs))
                .collect();
            println!("  enemy ({}, {}) path cells: {:?}", enemy.x, enemy.y, cells);
        }
    }

    let same_cell = pathfinder.get_path(player, player + Vector2::new(1.0, 1.0));
    results.push(TestResult {
        name: "path_same_cell_empty".into(),
        passed: same_cell.is_empty(),
        detail: format!("{} waypoints", same_cell.len()),
    });

    let into_wall = pathfinder.get_path(player, Vector2::new(50.0, 50.0));
    results.push(TestResult {
        name: "path_into_wall_empty".into(),
        passed: into_wall.is_empty(),
        detail: format!("{} waypoints", into_wall.len()),
    });

    let outside = pathfinder.get_path(player, Vector2::new(-500.0, 150.0));
    results.push(TestResult {
        name: "path_out_of_bounds_empty".into(),
        passed: outside.is_empty(),
        detail: format!("{} waypoints", outside.len()),
    });

    results
}

// ── 5. Raycasting ───────────────────────────────────────────────────────

fn validate_raycast(level: &Level, _verbose: bool) -> Vec<TestResult> {
    println!("--- Raycasting ---");
    let mut results = Vec::new();
    let cs = GameConfig::default().cell_size;
    let shapes: Vec<_> = level.fields().iter().filter(|f| f.kind.is_obstacle()).collect();
    let origin = level.player().world_position(cs).horizontal();

    // Facing east from (1, 1) the first obstacle is the wall at (4, 1)
    let mut ray = GridRaycaster::from_direction(origin, Vector2::new(1.0, 0.0), cs);
    let hit = ray.next_shape(&shapes, |f| f.world_position(cs).horizontal());
    results.push(TestResult {
        name: "raycast_east_hits_wall".into(),
        passed: hit.is_some_and(|f| f.cell() == (4, 1)),
        detail: format!("hit {:?}", hit.map(|f| (f.kind, f.cell()))),
    });

    let a: Vec<Vector2> = GridRaycaster::from_direction(origin, Vector2::new(0.4, 0.9), cs)
        .take(12)
        .collect();
    let b: Vec<Vector2> = GridRaycaster::from_direction(origin, Vector2::new(0.4, 0.9), cs)
        .take(12)
        .collect();
    results.push(TestResult {
        name: "raycast_reproducible".into(),
        passed: a == b,
        detail: "same origin and direction, same cells".into(),
    });

    let stalled = GridRaycaster::from_direction(origin, Vector2::ZERO, cs).count();
    results.push(TestResult {
        name: "raycast_zero_direction".into(),
        passed: stalled == 1,
        detail: format!("{} cells yielded", stalled),
    });

    let mut bounded =
        GridRaycaster::from_direction(origin, Vector2::new(0.0, -1.0), cs).with_limit(5);
    let none: [Vector2; 0] = [];
    let found = bounded.next_shape(&none, |p| *p);
    results.push(TestResult {
        name: "raycast_bounded".into(),
        passed: found.is_none() && bounded.cell() == (1, -8),
        detail: format!("stopped in cell {:?}", bounded.cell()),
    });

    results
}

// ── 6. Engine script ────────────────────────────────────────────────────

fn validate_engine_script(verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Engine Run ---");
    let mut results = Vec::new();

    let script: Vec<ScriptStep> = match serde_json::from_str(SCRIPT_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "script_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
    if let Err(e) = engine.load_level_str(LEVEL_JSON) {
        results.push(TestResult {
            name: "script_load".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }
    let cs = engine.config().cell_size;
    let walls: HashSet<(i32, i32)> = engine
        .grid_fields()
        .iter()
        .filter(|f| matches!(f.kind, FieldKind::Wall(_)))
        .map(|f| f.cell())
        .collect();

    let dt = 1.0 / 60.0;
    let mut events = Vec::new();
    let mut wall_entries = Vec::new();
    let mut ticks = 0u32;
    for step in &script {
        if verbose {
            println!("  [{:>4}] {}", ticks, step.note);
        }
        let input = step.input();
        for _ in 0..step.ticks {
            engine.update(dt, &input);
            ticks += 1;
            let cell = cell_of(engine.camera_transform().position.horizontal(), cs);
            if walls.contains(&cell) {
                wall_entries.push((ticks, cell));
            }
        }
        events.extend(engine.drain_events());
    }

    results.push(TestResult {
        name: "script_camera_outside_walls".into(),
        passed: wall_entries.is_empty(),
        detail: if wall_entries.is_empty() {
            format!("{} ticks without entering a wall cell", ticks)
        } else {
            format!("entered walls: {:?}", wall_entries)
        },
    });

    let opened = events
        .iter()
        .any(|e| matches!(e, GameEvent::DoorOpened(_)));
    results.push(TestResult {
        name: "script_door_opened".into(),
        passed: opened,
        detail: format!("door opened: {}", opened),
    });

    let status = *engine.player_status();
    let shots = events
        .iter()
        .filter(|e| matches!(e, GameEvent::ShotFired { .. }))
        .count() as u32;
    results.push(TestResult {
        name: "script_ammo_accounting".into(),
        passed: shots == 2 && status.ammo == player::START_AMMO - shots,
        detail: format!("{} shots, {} ammo left", shots, status.ammo),
    });

    let damage: u32 = events
        .iter()
        .map(|e| match e {
            GameEvent::PlayerDamaged { amount, .. } => *amount,
            _ => 0,
        })
        .sum();
    let died = events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerDied { .. }));
    results.push(TestResult {
        name: "script_health_accounting".into(),
        passed: died || status.health == player::START_HEALTH - damage,
        detail: format!("{} damage taken, {} health", damage, status.health),
    });

    if verbose {
        println!("  {} events:", events.len());
        for event in &events {
            println!("    {:?}", event);
        }
    }

    results
}
