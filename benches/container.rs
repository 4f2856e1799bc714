use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use wirebox::{Args, Container, Factory, Register, ServiceKey};

struct Logger;
struct Repository {
    _logger: Arc<Logger>,
}
struct Service {
    _repository: Arc<Repository>,
}

fn chain(scope_singleton: bool) -> Container {
    let container = Container::new();

    let logger = Register::factory(Factory::new(|_args| Ok(Logger)));
    let logger = if scope_singleton { logger.singleton() } else { logger };

    container
        .register(ServiceKey::of::<Logger>(), logger)
        .unwrap()
        .register(
            ServiceKey::of::<Repository>(),
            Register::factory(
                Factory::new(|args: &mut Args| {
                    Ok(Repository {
                        _logger: args.take("logger")?,
                    })
                })
                .needs::<Logger>("logger"),
            ),
        )
        .unwrap()
        .register(
            ServiceKey::of::<Service>(),
            Register::factory(
                Factory::new(|args: &mut Args| {
                    Ok(Service {
                        _repository: args.take("repository")?,
                    })
                })
                .needs::<Repository>("repository"),
            ),
        )
        .unwrap();

    container
}

fn resolve_singleton(c: &mut Criterion) {
    let container = Container::new();
    container
        .register(
            ServiceKey::of::<Logger>(),
            Register::factory(Factory::new(|_args| Ok(Logger))).singleton(),
        )
        .unwrap();
    container.resolve::<Logger>().unwrap();

    c.bench_function("resolve_singleton_hit", |b| {
        b.iter(|| black_box(container.resolve::<Logger>().unwrap()));
    });
}

fn resolve_transient_chain(c: &mut Criterion) {
    let container = chain(false);

    c.bench_function("resolve_transient_chain", |b| {
        b.iter(|| black_box(container.resolve::<Service>().unwrap()));
    });
}

fn resolve_chain_over_singleton(c: &mut Criterion) {
    let container = chain(true);
    container.resolve::<Service>().unwrap();

    c.bench_function("resolve_chain_over_singleton", |b| {
        b.iter(|| black_box(container.resolve::<Service>().unwrap()));
    });
}

criterion_group!(benches, resolve_singleton, resolve_transient_chain, resolve_chain_over_singleton);
criterion_main!(benches);
