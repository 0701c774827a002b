use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use micro_fields::auth::AuthList;
use std::hint::black_box;

static BASIC: TestFile = TestFile::new("basic.txt", include_str!("../resources/auth/basic.txt"));
static BEARER: TestFile = TestFile::new("bearer.txt", include_str!("../resources/auth/bearer.txt"));
static MULTIPLE: TestFile = TestFile::new("multiple.txt", include_str!("../resources/auth/multiple.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::small("basic_challenge", BASIC), TestCase::small("bearer_credentials", BEARER), TestCase::normal("multiple_challenges", MULTIPLE)]
}

fn benchmark_auth_list(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("auth_list");

    for case in test_cases {
        let input = case.file().content().trim_end();
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new(format!("{:?}", case.group()).to_lowercase(), case.name()), &input, |b, input| {
            b.iter(|| {
                let list = AuthList::new(black_box(input));
                for challenge in list {
                    black_box(challenge.token68());
                    for param in challenge.params() {
                        black_box(param);
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(auth, benchmark_auth_list);
criterion_main!(auth);
