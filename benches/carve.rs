// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use seamgraph::energy::energy_map;
use seamgraph::{Axis, AxisMode, CarveConfig, CarvingEngine, PixelGrid, SeamFinder};

fn sample(width: u32, height: u32) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| {
            let (x, y) = (i % width, i / width);
            vec![(x * 13 % 256) as u8, (y * 29 % 256) as u8, ((x ^ y) % 256) as u8, 255]
        })
        .collect()
}

fn bench_energy(c: &mut Criterion) {
    let rgba = sample(128, 96);
    c.bench_function("energy map 128x96", |b| {
        b.iter_batched(
            || PixelGrid::from_rgba(128, 96, &rgba).unwrap(),
            |grid| black_box(energy_map(&grid)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_find(c: &mut Criterion) {
    let rgba = sample(128, 96);
    let mut grid = PixelGrid::from_rgba(128, 96, &rgba).unwrap();
    c.bench_function("vertical seam 128x96", |b| {
        b.iter(|| black_box(grid.find_seam(Axis::Vertical)))
    });
    c.bench_function("horizontal seam 128x96", |b| {
        b.iter(|| black_box(grid.find_seam(Axis::Horizontal)))
    });
}

fn bench_resize(c: &mut Criterion) {
    let rgba = sample(96, 64);
    let config = CarveConfig::default()
        .with_mode(AxisMode::WeightedRandom)
        .with_seed(1)
        .with_verify(false);
    c.bench_function("resize 96x64 to 64x48", |b| {
        b.iter_batched(
            || CarvingEngine::from_rgba(96, 64, &rgba, config.clone()).unwrap(),
            |mut engine| {
                engine.resize_to_target(64, 48).unwrap();
                engine
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_energy, bench_find, bench_resize);
criterion_main!(benches);
