use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use room_mapper::{
    Exit, Exits, GlyphSet, Logger, MapRenderer, MapStore, Mapper, MapperConfig, NullSink,
    RenderOptions, RoomData, RoomId, RoomObservation, Size, assemble, find_path,
};

const SIDE: usize = 40;

fn id(x: usize, y: usize) -> RoomId {
    RoomId::new(format!("{x}:{y}"))
}

/// Square grid of rooms linked in all four compass directions, split into
/// four zones.
fn grid_world() -> MapStore {
    let mut store = MapStore::new();
    for y in 0..SIDE {
        for x in 0..SIDE {
            let mut exits = Exits::new();
            if y > 0 {
                exits.insert("n".into(), Exit::to(id(x, y - 1)));
            }
            if y + 1 < SIDE {
                exits.insert("s".into(), Exit::to(id(x, y + 1)));
            }
            if x > 0 {
                exits.insert("w".into(), Exit::to(id(x - 1, y)));
            }
            if x + 1 < SIDE {
                exits.insert("e".into(), Exit::to(id(x + 1, y)));
            }
            let zone = format!("zone-{}", (x * 2 / SIDE) + 2 * (y * 2 / SIDE));
            store.replace_room(id(x, y), Some(format!("Room {x},{y}")), RoomData::new(zone, "field"), exits);
        }
    }
    store
}

fn path_across_grid(c: &mut Criterion) {
    let store = grid_world();
    let from = id(0, 0);
    let to = id(SIDE - 1, SIDE - 1);
    c.bench_function("find_path_corner_to_corner", |b| {
        b.iter(|| {
            let raw = find_path(black_box(&store), &from, &to);
            black_box(raw.map(|segments| assemble(&segments)))
        });
    });
}

fn render_grid_center(c: &mut Criterion) {
    let store = grid_world();
    let center = id(SIDE / 2, SIDE / 2);
    let options = RenderOptions::new(Size::new(80, 40)).with_draw_areas(true);
    let renderer = match MapRenderer::new(GlyphSet::unicode()) {
        Ok(renderer) => renderer,
        Err(err) => panic!("glyph set rejected: {err}"),
    };
    c.bench_function("render_grid_80x40", |b| {
        b.iter(|| black_box(renderer.render(black_box(&store), &center, options)));
    });
}

fn observe_and_route(c: &mut Criterion) {
    let config = MapperConfig::default()
        .with_logger(Logger::new(NullSink))
        .with_view_size(Size::new(80, 40));
    let mut mapper = match Mapper::with_store(grid_world(), config) {
        Ok(mapper) => mapper,
        Err(err) => panic!("mapper rejected config: {err}"),
    };
    let observation = RoomObservation::new(id(0, 0).as_str(), "Room 0,0", "zone-0")
        .with_terrain("field")
        .with_exit("E", id(1, 0))
        .with_exit("S", id(0, 1));
    let target = id(SIDE - 1, SIDE - 1);
    c.bench_function("observe_then_route_and_render", |b| {
        b.iter(|| {
            let outcome = mapper.observe(black_box(observation.clone()));
            let lines = mapper.go_to_room(&target);
            let view = mapper.render_current_view(None, None);
            black_box((outcome.is_ok(), lines.is_ok(), view.is_ok()))
        });
    });
}

criterion_group!(benches, path_across_grid, render_grid_center, observe_and_route);
criterion_main!(benches);
