use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::sync::Arc;
use tablefilter::*;

fn make_rows(schema: &FilterSchema, n: i64) -> Vec<MapRecord> {
    (0..n)
        .map(|i| {
            MapRecord::new()
                .with("name", format!("user{i}"), schema)
                .and_then(|r| r.with("age", i % 90, schema))
                .and_then(|r| r.with("status", if i % 3 == 0 { "Open" } else { "Closed" }, schema))
                .unwrap()
        })
        .collect()
}

fn bench_compile_execute(c: &mut Criterion) {
    let schema = Arc::new(
        FilterSchemaBuilder::new()
            .field("Name", FieldType::String)
            .field("Age", FieldType::Int)
            .field("Status", FieldType::String)
            .build(),
    );
    let rows = make_rows(&schema, 10_000);
    let request: TableFilterRequest = serde_json::from_value(json!({
        "first": 0,
        "rows": 50,
        "multiSortMeta": [{ "field": "age", "order": 1 }, { "field": "name", "order": -1 }],
        "filters": {
            "status": { "value": ["Open"], "matchMode": "in" },
            "age": [
                { "value": 18, "matchMode": "gte", "operator": "and" },
                { "value": 65, "matchMode": "lt", "operator": "and" }
            ],
            "name": { "value": "9", "matchMode": "notContains" }
        }
    }))
    .unwrap();

    c.bench_function("compile", |b| {
        b.iter(|| {
            let mut compiler = QueryCompiler::new(Vec::<MapRecord>::new(), schema.clone());
            compiler
                .add_predicate("age", black_box(&json!(18)), MatchMode::GreaterOrEqual, Combinator::None, false)
                .unwrap();
            compiler
                .add_predicate("name", black_box(&json!("9")), MatchMode::Contains, Combinator::And, true)
                .unwrap();
            compiler.add_sort_key("age", SortDirection::Asc, true).unwrap();
            black_box(compiler.expression().cloned())
        })
    });
    c.bench_function("apply_request", |b| {
        b.iter(|| {
            let borrowed: Vec<&MapRecord> = rows.iter().collect();
            let page = TableFilter::apply(borrowed, schema.clone(), black_box(&request)).unwrap();
            black_box(page.total_records)
        })
    });
}

criterion_group!(benches, bench_compile_execute);
criterion_main!(benches);
