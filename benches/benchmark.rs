use criterion::{criterion_group, criterion_main, Criterion};
use school_access::{AccessEngine, RequestContext, Role, SecondaryAffiliation};
use std::hint::black_box;

fn bench_permission_check(c: &mut Criterion) {
    let engine = AccessEngine::new();
    let context = RequestContext::for_user("bench-user");

    c.bench_function("permission_check", |b| {
        b.iter(|| {
            black_box(engine.has_permission(
                Role::Teacher,
                None,
                "academic.grades.view",
                &context,
            ))
        })
    });
}

fn bench_affiliation_check(c: &mut Criterion) {
    let engine = AccessEngine::new();
    let context = RequestContext::for_user("bench-user");

    c.bench_function("affiliation_check", |b| {
        b.iter(|| {
            black_box(engine.has_permission(
                Role::Teacher,
                Some(SecondaryAffiliation::VicePrincipal),
                "admin.settings.edit",
                &context,
            ))
        })
    });
}

fn bench_any_permission(c: &mut Criterion) {
    let engine = AccessEngine::new();
    let context = RequestContext::for_user("bench-user");
    let candidates = [
        "admin.users.delete",
        "council.activities.manage",
        "academic.grades.view",
    ];

    c.bench_function("any_permission", |b| {
        b.iter(|| {
            black_box(engine.has_any_permission(Role::Student, None, &candidates, &context))
        })
    });
}

criterion_group!(
    benches,
    bench_permission_check,
    bench_affiliation_check,
    bench_any_permission
);
criterion_main!(benches);
