//! Codec benchmarks: encoding and parsing the packets a controller sends
//! most often.

#![allow(missing_docs)]

use artnet_dmx::{
    build_packet, parse_packet, ArtDmx, ArtNetMessage, ArtPollReply, PacketContent, Universe,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_dmx_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("dmx_encode");

    for len in [2usize, 64, 512] {
        let dmx = ArtDmx::new(1, vec![0xAA; len]);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &dmx, |b, dmx| {
            b.iter(|| black_box(dmx).to_packet());
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_packet");

    let dmx = build_packet(&ArtDmx::new(1, vec![0x55; 512]).into());
    group.bench_function("dmx_512", |b| {
        b.iter(|| parse_packet(black_box(&dmx)));
    });

    let reply = build_packet(&ArtNetMessage::from(ArtPollReply::default()));
    group.bench_function("poll_reply", |b| {
        b.iter(|| parse_packet(black_box(&reply)));
    });

    group.finish();
}

fn bench_universe_write(c: &mut Criterion) {
    let values: Vec<u8> = (0..=255).collect();
    c.bench_function("universe_write_take", |b| {
        let mut universe = Universe::new();
        let mut offset = 0u8;
        b.iter(|| {
            offset = offset.wrapping_add(1);
            universe.write(usize::from(offset), black_box(&values));
            universe.take_payload(false)
        });
    });
}

criterion_group!(benches, bench_dmx_encode, bench_parse, bench_universe_write);
criterion_main!(benches);
