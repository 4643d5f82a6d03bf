use criterion::{Criterion, black_box, criterion_group, criterion_main};
use smoothgrid::{Blob, Chunk, ChunkPosition, CodecOptions, Material, Voxel, VoxelCoordinates};

/// A strip of terrain-like chunks: rock below a wavy surface, air above.
fn terrain_blob(chunk_count: i32) -> Blob {
    let mut blob = Blob::default();
    for i in 0..chunk_count {
        let position = ChunkPosition::new(i, 0, 0).expect("in range");
        let mut chunk = Chunk::new(position, 5).expect("valid size");
        for z in 0..32u16 {
            for x in 0..32u16 {
                let height = 12 + ((x + z + i as u16) % 7);
                for y in 0..height {
                    chunk.set_voxel(
                        VoxelCoordinates::new(x, y, z),
                        Voxel::new(Material::ROCK, 1.0),
                    );
                }
                chunk.set_voxel(
                    VoxelCoordinates::new(x, height, z),
                    Voxel::with_water(Material::GRASS, 0.4, 0.2),
                );
            }
        }
        blob.push_chunk(chunk).expect("matching size");
    }
    blob
}

fn bench_codec(c: &mut Criterion) {
    let blob = terrain_blob(32);
    let bytes = blob.encode();
    let parallel = CodecOptions::default();
    let sequential = CodecOptions::sequential();

    c.bench_function("decode_sequential", |b| {
        b.iter(|| Blob::decode_with(black_box(&bytes), &sequential))
    });
    c.bench_function("decode_parallel", |b| {
        b.iter(|| Blob::decode_with(black_box(&bytes), &parallel))
    });
    c.bench_function("encode_sequential", |b| {
        b.iter(|| black_box(&blob).encode_with(&sequential))
    });
    c.bench_function("encode_parallel", |b| {
        b.iter(|| black_box(&blob).encode_with(&parallel))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
