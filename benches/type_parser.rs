//! Benchmarks for docblock tokenizing and type parsing.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use phpdoc_types::{
    ClassKind, ClassTable, Config, DeclarationContext, DiagnosticLog, DocAnnotations, DocTagKind,
    TypeEnv, TypeRuleParser, UseAliasResolver, find_tag,
};

const TYPES: &[(&str, &str)] = &[
    ("primitive", "int"),
    ("union", "string|int[]|false"),
    ("nested", "(string|(int|false))[]"),
    ("tuple", "tuple<int, \\App\\User, future<string[]>>"),
    ("classes", "\\App\\User[]|\\App\\Repo|Unknown\\Thing|null"),
];

const DOC: &str = "*
 * Loads users.
 *
 * @kphp-inline
 * @param int[] $ids the ids to load
 * @param \\App\\Repo|false $repo
 * @return \\App\\User[]
 ";

fn bench_parse_type(c: &mut Criterion) {
    let classes = ClassTable::new();
    classes.declare("App\\User", ClassKind::Class);
    classes.declare("App\\Repo", ClassKind::Interface);
    let config = Config::default();
    let env = TypeEnv::new(&classes, &UseAliasResolver, &config);
    let ctx = DeclarationContext::new().with_namespace("App");

    let mut group = c.benchmark_group("parse_type");
    for &(name, type_str) in TYPES {
        group.bench_with_input(BenchmarkId::from_parameter(name), type_str, |b, s| {
            b.iter(|| TypeRuleParser::new(&ctx, env).parse_from_type_string(black_box(s)))
        });
    }
    group.finish();
}

fn bench_docblock(c: &mut Criterion) {
    let classes = ClassTable::new();
    classes.declare("App\\User", ClassKind::Class);
    classes.declare("App\\Repo", ClassKind::Interface);
    let config = Config::default();
    let env = TypeEnv::new(&classes, &UseAliasResolver, &config);
    let ctx = DeclarationContext::new().at_line(20);

    c.bench_function("find_tag", |b| {
        b.iter(|| find_tag(black_box(DOC), DocTagKind::Param, 1))
    });
    c.bench_function("collect_annotations", |b| {
        b.iter(|| {
            let log = DiagnosticLog::new();
            DocAnnotations::collect(black_box(DOC), &ctx, env, &log)
        })
    });
}

criterion_group!(benches, bench_parse_type, bench_docblock);
criterion_main!(benches);
