use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;
use tokio::runtime::Runtime;

use gearbase_app::{
    CategoryRepository, CreateItemInput, CreateItemUseCase, SubdivideItemInput,
    SubdivideItemUseCase, SubdivisionSpec,
};
use gearbase_catalog::{
    Category, CategoryName, FieldDef, FieldType, MetadataRecord, MetadataSchema, NewCategory,
};
use gearbase_core::{OrganizationId, UserId};
use gearbase_infra::{FixedCurrentUser, InMemoryImageStorage, InMemoryStore, SystemClock};
use gearbase_items::{ItemIdentifier, ItemStatus};

struct Bench {
    rt: Runtime,
    org: OrganizationId,
    category: Category,
    create_item: CreateItemUseCase,
    subdivide: SubdivideItemUseCase,
}

fn setup() -> Bench {
    let rt = Runtime::new().expect("tokio runtime");
    let org = OrganizationId::new();
    let store = Arc::new(InMemoryStore::new());
    let images = Arc::new(InMemoryImageStorage::new());
    let current_user = Arc::new(FixedCurrentUser::new(UserId::new()));
    let clock = Arc::new(SystemClock);

    let category = rt
        .block_on(CategoryRepository::create(
            store.as_ref(),
            NewCategory {
                organization_id: org,
                name: CategoryName::parse("Cuerdas").expect("valid name"),
                requires_unique_numbering: false,
                can_be_composite: false,
                can_be_subdivided: true,
                metadata_schema: MetadataSchema::new().with_field(
                    "length",
                    FieldDef {
                        field_type: FieldType::Number,
                        required: true,
                        ..Default::default()
                    },
                ),
                quantity_field: None,
            },
        ))
        .expect("seed category");

    let create_item = CreateItemUseCase::new(
        store.clone(),
        store.clone(),
        images.clone(),
        store.clone(),
    );
    let subdivide = SubdivideItemUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        current_user,
        clock,
        store.clone(),
    );

    Bench {
        rt,
        org,
        category,
        create_item,
        subdivide,
    }
}

fn rope_input(bench: &Bench, base: &str, quantity: u32) -> CreateItemInput {
    let mut metadata = MetadataRecord::new();
    metadata.insert("length".to_string(), json!(50.0));
    CreateItemInput {
        organization_id: bench.org,
        category_id: bench.category.id,
        name: "Cuerda dinámica".to_string(),
        brand: None,
        model: None,
        identifier_base: base.to_string(),
        quantity,
        has_unique_numbering: quantity > 1,
        status: ItemStatus::Available,
        metadata,
        image: None,
    }
}

fn bench_identifier_parsing(c: &mut Criterion) {
    c.bench_function("identifier_parse_numbered", |b| {
        b.iter(|| ItemIdentifier::parse(black_box("rope-0042")))
    });
    c.bench_function("identifier_generate_unique", |b| {
        b.iter(|| ItemIdentifier::generate_unique(black_box("ROPE"), black_box(42)))
    });
}

fn bench_create_item(c: &mut Criterion) {
    let bench = setup();
    let mut n = 0u64;
    c.bench_function("create_item_single", |b| {
        b.iter(|| {
            n += 1;
            bench
                .rt
                .block_on(bench.create_item.execute(rope_input(&bench, &format!("BENCH-R{n}"), 1)))
                .expect("create")
        })
    });

    let batch = setup();
    let mut m = 0u64;
    c.bench_function("create_item_batch_of_10", |b| {
        b.iter(|| {
            m += 1;
            batch
                .rt
                .block_on(batch.create_item.execute(rope_input(&batch, &format!("BATCH-R{m}"), 10)))
                .expect("create batch")
        })
    });
}

fn bench_subdivide(c: &mut Criterion) {
    let bench = setup();
    let mut n = 0u64;
    c.bench_function("subdivide_into_two", |b| {
        b.iter(|| {
            n += 1;
            let source = bench
                .rt
                .block_on(bench.create_item.execute(rope_input(&bench, &format!("SUB-R{n}"), 1)))
                .expect("create source")
                .remove(0);
            bench
                .rt
                .block_on(bench.subdivide.execute(SubdivideItemInput {
                    source_item_id: source.id,
                    subdivisions: vec![
                        SubdivisionSpec {
                            identifier: format!("SUB-R{n}-A"),
                            value: 20.0,
                        },
                        SubdivisionSpec {
                            identifier: format!("SUB-R{n}-B"),
                            value: 30.0,
                        },
                    ],
                    unit: "m".to_string(),
                    reason: "bench".to_string(),
                    notes: None,
                }))
                .expect("subdivide")
        })
    });
}

criterion_group!(
    benches,
    bench_identifier_parsing,
    bench_create_item,
    bench_subdivide
);
criterion_main!(benches);
