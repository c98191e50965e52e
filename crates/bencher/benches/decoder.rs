use std::hint::black_box;

use bencher::{Fixture, TestGroup};
use booky_protocol::codec::RequestDecoder;
use booky_protocol::parser::{Lifecycle, RequestParser};
use bytes::BytesMut;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tokio_util::codec::Decoder;

static FIXTURES: [Fixture; 2] = [
    Fixture::small("sync_small.bin", include_bytes!("../resources/request/sync_small.bin")),
    Fixture::large("upload_large.bin", include_bytes!("../resources/request/upload_large.bin")),
];

const CAPACITIES: [usize; 3] = [16, 512, 4096];

fn fixtures_of(group: TestGroup) -> impl Iterator<Item = &'static Fixture> {
    FIXTURES.iter().filter(move |fixture| fixture.group() == group)
}

fn benchmark_request_decoder(criterion: &mut Criterion) {
    for test_group in [TestGroup::Small, TestGroup::Large] {
        let mut group = criterion.benchmark_group(format!("request_decoder/{}", test_group.as_str()));

        for fixture in fixtures_of(test_group) {
            group.throughput(Throughput::Bytes(fixture.wire().len() as u64));
            group.bench_with_input(BenchmarkId::from_parameter(fixture.file_name()), fixture, |b, fixture| {
                b.iter_batched_ref(
                    || (RequestDecoder::new(), BytesMut::from(fixture.wire())),
                    |(decoder, bytes_mut)| {
                        let request = decoder.decode(bytes_mut).expect("input should be a valid booky request").unwrap();
                        black_box(request);
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        group.finish();
    }
}

fn benchmark_request_parser(criterion: &mut Criterion) {
    for test_group in [TestGroup::Small, TestGroup::Large] {
        let mut group = criterion.benchmark_group(format!("request_parser/{}", test_group.as_str()));

        for fixture in fixtures_of(test_group) {
            group.throughput(Throughput::Bytes(fixture.wire().len() as u64));
            for capacity in CAPACITIES {
                let id = BenchmarkId::new(fixture.file_name(), capacity);
                group.bench_with_input(id, fixture, |b, fixture| {
                    b.iter(|| {
                        let mut parser = RequestParser::with_capacity(fixture.wire(), capacity);
                        parser.on_success(|request| {
                            black_box(request);
                        });
                        assert_eq!(parser.parse(), Lifecycle::Finished);
                    });
                });
            }
        }

        group.finish();
    }
}

criterion_group!(decoder, benchmark_request_decoder, benchmark_request_parser);
criterion_main!(decoder);
