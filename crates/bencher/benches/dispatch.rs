use bencher::{TestCase, TestGroup, ROUTES};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use futures::executor::block_on;
use micro_router::matcher::PathTree;
use micro_router::middleware::extend_locals;
use micro_router::{handler_fn, BoxError, Context, Locals, Router};
use std::hint::black_box;

static CASES: [TestCase; 5] = [
    TestCase::matched("static", "/health"),
    TestCase::matched("one_param", "/users/42"),
    TestCase::matched("two_params", "/teams/core/members/7"),
    TestCase::matched("wildcard", "/static/css/site/main.css"),
    TestCase::unmatched("not_found", "/users/42/comments/9"),
];

async fn ok(_ctx: Context) -> Result<&'static str, BoxError> {
    Ok("ok")
}

fn create_router() -> Router {
    let mut builder = Router::builder()
        .middleware(extend_locals(|_| Locals::new().with("a", 1)))
        .middleware(extend_locals(|ctx| Locals::new().with("path", ctx.uri().path())));
    for pattern in ROUTES {
        builder = builder.get(pattern, handler_fn(ok));
    }
    builder.build().expect("benchmark routes should be valid")
}

fn benchmark_path_tree(criterion: &mut Criterion) {
    let mut tree = PathTree::new();
    for (i, pattern) in ROUTES.iter().enumerate() {
        tree.insert(pattern, i).expect("benchmark routes should be valid");
    }

    let mut group = criterion.benchmark_group("path_tree");
    for case in CASES.iter().filter(|case| matches!(case.group(), TestGroup::Matched)) {
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), case, |b, case| {
            b.iter(|| black_box(tree.at(black_box(case.path())).map(|matched| *matched.payload())));
        });
    }
    group.finish();
}

fn benchmark_dispatch(criterion: &mut Criterion) {
    let router = create_router();

    let mut group = criterion.benchmark_group("dispatch");
    for case in &CASES {
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), case, |b, case| {
            b.iter(|| {
                let request = http::Request::get(case.path()).body(Bytes::new()).expect("valid request");
                let response = block_on(router.handle(request)).expect("dispatch should not fail");
                black_box(response.status())
            });
        });
    }
    group.finish();
}

criterion_group!(dispatch, benchmark_path_tree, benchmark_dispatch);
criterion_main!(dispatch);
