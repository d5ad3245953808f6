use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wolfgrid_logic::level::{Level, LevelDescription, RawField};
use wolfgrid_logic::math::Vector2;
use wolfgrid_logic::pathfinding::Pathfinder;

/// 32x32 level with a comb of wall rows, each with a gap at alternating ends.
fn comb_level() -> Level {
    let mut fields = Vec::new();
    for row in (4..32).step_by(4) {
        let gap = if (row / 4) % 2 == 0 { 0 } else { 31 };
        for x in (0..32).filter(|&x| x != gap) {
            fields.push(RawField {
                x,
                y: row,
                value: "wall".into(),
                rotation: None,
            });
        }
    }
    fields.push(RawField {
        x: 1,
        y: 1,
        value: "player".into(),
        rotation: None,
    });
    Level::from_description(LevelDescription {
        width: 32,
        height: 32,
        fields,
    })
    .unwrap()
}

fn bench_get_path(c: &mut Criterion) {
    let level = comb_level();
    let mut pathfinder = Pathfinder::new(3, 100.0, 1_000_000);
    pathfinder.prepare_level(&level);
    let from = Vector2::new(150.0, 150.0);
    let to = Vector2::new(3050.0, 3150.0);

    c.bench_function("get_path_comb_32x32", |b| {
        b.iter(|| pathfinder.get_path(black_box(from), black_box(to)))
    });
}

criterion_group!(benches, bench_get_path);
criterion_main!(benches);
