//! This bench validates a large CSV schedule, with a mix of accepted and
//! rejected rows, and then runs a range query over the accepted flights.

#![allow(missing_docs)]

use std::fmt::Write;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use flightsched::{Field, Ingest, Matcher, Query, RecordValidator};

const ORIGINS: [&str; 4] = ["LHR", "RIX", "OSL", "ZZZ"];

/// Generates a schedule where every fourth row departs from an unknown origin
fn schedule(rows: usize) -> String {
    let mut csv =
        String::from("flightid,origin,destination,departuredatetime,arrivaldatetime,price\n");
    for i in 0..rows {
        let hour = i % 20;
        writeln!(
            csv,
            "FL{i},{},JFK,2025-11-14 {hour:02}00,2025-11-14 {:02}30,{}.00",
            ORIGINS[i % ORIGINS.len()],
            hour + 1,
            100 + i % 400,
        )
        .unwrap();
    }
    csv
}

fn ingest(c: &mut Criterion) {
    let input = schedule(10_000);
    c.bench_function("ingest 10k rows", |b| {
        b.iter_batched(
            || Ingest::new(RecordValidator::default()),
            |mut ingest| ingest.ingest_reader(input.as_bytes()).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

fn query(c: &mut Criterion) {
    let mut ingest = Ingest::new(RecordValidator::default());
    ingest.ingest_reader(schedule(10_000).as_bytes()).unwrap();
    let (store, _) = ingest.into_parts();
    let query = Query::new()
        .with(Field::Origin, "LHR")
        .with(Field::Departure, "2025-11-14 08:00")
        .with(Field::Price, "300");
    let matcher = Matcher::default();

    c.bench_function("range query", |b| {
        b.iter(|| store.query(&query, &matcher).count());
    });
}

criterion_group!(benches, ingest, query);
criterion_main!(benches);
