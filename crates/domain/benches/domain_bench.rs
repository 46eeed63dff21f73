use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use domain::{
    BuyerId, CancelOrder, CreateOrder, LineItemInput, Money, OrderService, ShippingInput,
};
use order_store::InMemoryOrderStore;
use pricing::InMemoryPriceResolver;

fn shipping() -> ShippingInput {
    ShippingInput {
        name: Some("Bench".to_string()),
        address: Some("1 Bench Rd".to_string()),
        city: Some("Benchville".to_string()),
        state: Some("CA".to_string()),
        zip: Some("90000".to_string()),
        country: Some("US".to_string()),
        phone: Some("555-0000".to_string()),
    }
}

fn items(count: usize) -> Vec<LineItemInput> {
    (0..count)
        .map(|i| LineItemInput::new(format!("SKU-{}", i % 10), 1 + i as i64 % 3))
        .collect()
}

fn resolver() -> InMemoryPriceResolver {
    InMemoryPriceResolver::with_prices(
        (0..10).map(|i| (format!("SKU-{i}"), Money::from_cents(100 + i * 25))),
    )
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("domain/create_order");

    for count in [1, 10, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let service = OrderService::new(InMemoryOrderStore::new(), resolver());
            b.iter(|| {
                rt.block_on(async {
                    service
                        .create_order(CreateOrder::new("bench", items(count), shipping()))
                        .await
                        .unwrap();
                });
            });
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    c.bench_function("domain/validate", |b| {
        b.iter(|| {
            CreateOrder::new("bench", items(10), shipping())
                .validate()
                .unwrap();
        });
    });
}

fn bench_list_and_cancel(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = OrderService::new(InMemoryOrderStore::new(), resolver());
    let buyer = BuyerId::new("bench");
    let order_ids: Vec<_> = rt.block_on(async {
        let mut ids = Vec::new();
        for _ in 0..100 {
            let summary = service
                .create_order(CreateOrder::new("bench", items(3), shipping()))
                .await
                .unwrap();
            ids.push(summary.order_id);
        }
        ids
    });

    c.bench_function("domain/list_orders_for_buyer", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.list_orders_for_buyer(&buyer).await.unwrap();
            });
        });
    });

    c.bench_function("domain/cancel_rejected", |b| {
        rt.block_on(async {
            service
                .cancel_order(CancelOrder::new(order_ids[0]))
                .await
                .unwrap();
        });
        b.iter(|| {
            rt.block_on(async {
                let _ = service.cancel_order(CancelOrder::new(order_ids[0])).await;
            });
        });
    });
}

criterion_group!(benches, bench_create_order, bench_validate, bench_list_and_cancel);
criterion_main!(benches);
