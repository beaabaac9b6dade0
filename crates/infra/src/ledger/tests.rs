//! Ledger behavior end to end: store transactions, stock mirror, events.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;

use stockledger_core::{CustomerId, DomainError, OrderId, ProductId, ReportId};
use stockledger_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use stockledger_inventory::InventoryEvent;
use stockledger_parties::CustomerDetails;
use stockledger_products::{Product, ProductDetails};
use stockledger_sales::{OrderLine, OrderStatus};

use super::{InventoryLedger, LedgerConfig};
use crate::directory::Directory;
use crate::error::LedgerError;
use crate::reports::{Report, ReportData, ReportPeriod, ReportRequest};
use crate::store::{InMemoryStore, Store, Transaction};

type Bus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;
type TestLedger = InventoryLedger<InMemoryStore, Bus>;

struct Fixture {
    ledger: TestLedger,
    directory: Directory<InMemoryStore>,
    events: Subscription<EventEnvelope<JsonValue>>,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let bus: Bus = Arc::new(InMemoryEventBus::new());
    let events = bus.subscribe();
    Fixture {
        ledger: InventoryLedger::new(Arc::clone(&store), bus, LedgerConfig::default()),
        directory: Directory::new(store),
        events,
    }
}

fn code(err: &LedgerError) -> &'static str {
    err.as_domain().map(DomainError::code).unwrap_or("store")
}

fn event_types(events: &Subscription<EventEnvelope<JsonValue>>) -> Vec<String> {
    events
        .drain()
        .iter()
        .map(|e| e.event_type().to_string())
        .collect()
}

impl Fixture {
    fn product(&self, name: &str, price: u64, quantity: i64, reorder_level: i64) -> Product {
        self.ledger
            .register_product(ProductDetails::new(name, price), quantity, Some(reorder_level))
            .unwrap()
    }

    fn customer(&self) -> CustomerId {
        self.directory
            .add_customer(CustomerDetails::new("Ada", "Lovelace", "ada@example.com"))
            .unwrap()
            .id_typed()
    }

    fn quantity(&self, product_id: ProductId) -> i64 {
        self.ledger.get_stock(product_id).unwrap().quantity()
    }

    /// Both sides of the mirror, asserting they agree.
    fn assert_mirrored(&self, product_id: ProductId, expected: i64) {
        let stock = self.ledger.get_stock(product_id).unwrap();
        let product = self.ledger.get_product(product_id).unwrap();
        assert_eq!(stock.quantity(), expected);
        assert_eq!(product.stock_level(), expected);
    }
}

#[test]
fn widget_low_stock_then_insufficient() {
    let fx = fixture();
    let widget = fx.product("Widget", 1_000, 50, 10);
    fx.events.drain();

    assert_eq!(fx.ledger.adjust_quantity(widget.id_typed(), -45).unwrap(), 5);
    assert_eq!(
        event_types(&fx.events),
        vec!["inventory.stock.adjusted", "inventory.stock.low"]
    );

    let err = fx.ledger.adjust_quantity(widget.id_typed(), -10).unwrap_err();
    match err.as_domain() {
        Some(DomainError::InsufficientStock {
            product,
            available,
            requested,
            ..
        }) => {
            assert_eq!(product, "Widget");
            assert_eq!(*available, 5);
            assert_eq!(*requested, 10);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    fx.assert_mirrored(widget.id_typed(), 5);
    assert!(fx.events.drain().is_empty(), "failed writes publish nothing");
}

#[test]
fn zero_delta_is_accepted_and_changes_nothing() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 40, 5);

    assert_eq!(fx.ledger.adjust_quantity(bolt.id_typed(), 0).unwrap(), 40);
    fx.assert_mirrored(bolt.id_typed(), 40);
}

#[test]
fn registering_same_name_is_additive() {
    let fx = fixture();
    let first = fx.product("Gadget", 250, 20, 5);
    let second = fx
        .ledger
        .register_product(ProductDetails::new("Gadget", 250), 30, None)
        .unwrap();

    assert_eq!(first.id_typed(), second.id_typed());
    assert_eq!(second.stock_level(), 50);
    assert_eq!(fx.ledger.list_products().unwrap().len(), 1);
    assert_eq!(fx.ledger.list_stock().unwrap().len(), 1);
    fx.assert_mirrored(first.id_typed(), 50);
}

#[test]
fn registration_validates_input() {
    let fx = fixture();
    let blank = fx
        .ledger
        .register_product(ProductDetails::new("  ", 10), 1, None)
        .unwrap_err();
    assert_eq!(code(&blank), "validation_error");

    let negative = fx
        .ledger
        .register_product(ProductDetails::new("Nut", 10), -1, None)
        .unwrap_err();
    assert_eq!(code(&negative), "invalid_adjustment");
    assert!(fx.ledger.list_products().unwrap().is_empty());
}

#[test]
fn default_reorder_level_applies_when_absent_or_negative() {
    let fx = fixture();
    let a = fx
        .ledger
        .register_product(ProductDetails::new("A", 1), 100, None)
        .unwrap();
    let b = fx
        .ledger
        .register_product(ProductDetails::new("B", 1), 100, Some(-3))
        .unwrap();

    assert_eq!(fx.ledger.get_stock(a.id_typed()).unwrap().reorder_level(), 5);
    assert_eq!(fx.ledger.get_stock(b.id_typed()).unwrap().reorder_level(), 5);
}

#[test]
fn initialize_stock_creates_missing_record_and_adds_to_existing() {
    let fx = fixture();

    // A product with no stock record yet.
    let mut bare = Product::create(ProductId::new(), ProductDetails::new("Bare", 99)).unwrap();
    {
        let mut tx = fx.ledger.store().begin().unwrap();
        tx.products.save(bare.clone());
        tx.commit().unwrap();
    }
    let err = fx.ledger.get_stock(bare.id_typed()).unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::NotFound { entity: "stock", .. })
    ));

    bare = fx.ledger.initialize_stock(bare.id_typed(), 7, Some(2)).unwrap();
    assert_eq!(bare.stock_level(), 7);

    bare = fx.ledger.initialize_stock(bare.id_typed(), 3, None).unwrap();
    assert_eq!(bare.stock_level(), 10);
    assert_eq!(fx.ledger.get_stock(bare.id_typed()).unwrap().reorder_level(), 2);
    fx.assert_mirrored(bare.id_typed(), 10);

    let missing = fx.ledger.initialize_stock(ProductId::new(), 1, None).unwrap_err();
    assert_eq!(code(&missing), "not_found");
}

#[test]
fn create_stock_conflicts_when_record_exists() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 5, 1);

    let err = fx.ledger.create_stock(bolt.id_typed(), 1, Some(1)).unwrap_err();
    assert_eq!(code(&err), "conflict");
    fx.assert_mirrored(bolt.id_typed(), 5);
}

#[test]
fn update_stock_is_all_or_nothing() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 5, 1);

    let err = fx
        .ledger
        .update_stock(bolt.id_typed(), Some(50), Some(-1))
        .unwrap_err();
    assert_eq!(code(&err), "invalid_adjustment");
    fx.assert_mirrored(bolt.id_typed(), 5);

    let err = fx.ledger.set_absolute_quantity(bolt.id_typed(), -2).unwrap_err();
    assert_eq!(code(&err), "invalid_adjustment");

    let stock = fx
        .ledger
        .update_stock(bolt.id_typed(), Some(50), Some(20))
        .unwrap();
    assert_eq!((stock.quantity(), stock.reorder_level()), (50, 20));
    fx.assert_mirrored(bolt.id_typed(), 50);

    let stock = fx.ledger.set_reorder_level(bolt.id_typed(), 3).unwrap();
    assert_eq!(stock.reorder_level(), 3);
}

#[test]
fn repeated_reads_are_identical() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 5, 1);

    let first = fx.ledger.get_stock(bolt.id_typed()).unwrap();
    let second = fx.ledger.get_stock(bolt.id_typed()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failed_order_line_rolls_back_the_whole_order() {
    let fx = fixture();
    let customer = fx.customer();
    let p1 = fx.product("P1", 100, 10, 0);
    let p2 = fx.product("P2", 100, 5, 0);
    fx.events.drain();

    let err = fx
        .ledger
        .fulfill_order(
            customer,
            &[
                OrderLine::new(p1.id_typed(), 2),
                OrderLine::new(p2.id_typed(), 999_999),
            ],
        )
        .unwrap_err();

    match err.as_domain() {
        Some(DomainError::InsufficientStock { product, .. }) => assert_eq!(product, "P2"),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    fx.assert_mirrored(p1.id_typed(), 10);
    fx.assert_mirrored(p2.id_typed(), 5);
    assert!(fx.ledger.list_orders().unwrap().is_empty());
    assert!(fx.events.drain().is_empty());
}

#[test]
fn fulfill_order_decrements_and_records_items() {
    let fx = fixture();
    let customer = fx.customer();
    let widget = fx.product("Widget", 1_000, 10, 2);
    let gadget = fx.product("Gadget", 250, 4, 3);
    fx.events.drain();

    let order = fx
        .ledger
        .fulfill_order(
            customer,
            &[
                OrderLine::new(widget.id_typed(), 2),
                OrderLine::new(gadget.id_typed(), 3),
            ],
        )
        .unwrap();

    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.customer_id(), customer);
    assert_eq!(order.items().len(), 2);
    assert_eq!(order.total_amount(), 2_750);
    fx.assert_mirrored(widget.id_typed(), 8);
    fx.assert_mirrored(gadget.id_typed(), 1);
    assert_eq!(fx.ledger.get_order(order.id_typed()).unwrap(), order);

    // Gadget dropped to 1 with reorder level 3.
    let events = fx.events.drain();
    let low: Vec<InventoryEvent> = events
        .iter()
        .filter(|e| e.event_type() == "inventory.stock.low")
        .map(|e| e.decode().unwrap())
        .collect();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].product_id(), gadget.id_typed());
    assert!(events.iter().any(|e| e.event_type() == "sales.order.placed"));
}

#[test]
fn repeated_product_draws_on_running_quantity() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 5, 0);

    let err = fx
        .ledger
        .fulfill_order(
            customer,
            &[OrderLine::new(bolt.id_typed(), 3), OrderLine::new(bolt.id_typed(), 3)],
        )
        .unwrap_err();
    assert_eq!(code(&err), "insufficient_stock");
    fx.assert_mirrored(bolt.id_typed(), 5);

    fx.ledger
        .fulfill_order(
            customer,
            &[OrderLine::new(bolt.id_typed(), 3), OrderLine::new(bolt.id_typed(), 2)],
        )
        .unwrap();
    fx.assert_mirrored(bolt.id_typed(), 0);
}

#[test]
fn fulfill_order_rejects_bad_requests() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 5, 0);

    let cases: Vec<(CustomerId, Vec<OrderLine>, &str)> = vec![
        (customer, vec![], "validation_error"),
        (customer, vec![OrderLine::new(bolt.id_typed(), 0)], "validation_error"),
        (CustomerId::new(), vec![OrderLine::new(bolt.id_typed(), 1)], "not_found"),
        (customer, vec![OrderLine::new(ProductId::new(), 1)], "not_found"),
    ];
    for (customer_id, lines, expected) in cases {
        let err = fx.ledger.fulfill_order(customer_id, &lines).unwrap_err();
        assert_eq!(code(&err), expected, "{lines:?}");
    }
    fx.assert_mirrored(bolt.id_typed(), 5);
    assert!(fx.ledger.list_orders().unwrap().is_empty());
}

#[test]
fn order_keeps_price_snapshot() {
    let fx = fixture();
    let customer = fx.customer();
    let widget = fx.product("Widget", 1_000, 10, 0);

    let order = fx
        .ledger
        .fulfill_order(customer, &[OrderLine::new(widget.id_typed(), 1)])
        .unwrap();
    fx.ledger
        .update_product_details(widget.id_typed(), ProductDetails::new("Widget", 2_000))
        .unwrap();

    let stored = fx.ledger.get_order(order.id_typed()).unwrap();
    assert_eq!(stored.items()[0].price_at_order(), 1_000);
    assert_eq!(fx.ledger.get_product(widget.id_typed()).unwrap().price(), 2_000);
    // Editing details never touches stock.
    fx.assert_mirrored(widget.id_typed(), 9);
}

#[test]
fn cancelling_restores_stock_and_terminal_states_are_final() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 10, 0);

    let order = fx
        .ledger
        .fulfill_order(customer, &[OrderLine::new(bolt.id_typed(), 4)])
        .unwrap();
    fx.assert_mirrored(bolt.id_typed(), 6);

    let cancelled = fx.ledger.cancel_order(order.id_typed()).unwrap();
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    fx.assert_mirrored(bolt.id_typed(), 10);

    let err = fx
        .ledger
        .update_order_status(order.id_typed(), OrderStatus::Pending)
        .unwrap_err();
    assert_eq!(code(&err), "invalid_transition");

    let err = fx.ledger.cancel_order(order.id_typed()).unwrap_err();
    assert_eq!(code(&err), "invalid_transition");
    fx.assert_mirrored(bolt.id_typed(), 10);
}

#[test]
fn delivered_order_cannot_go_back_to_pending() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 10, 0);
    let order = fx
        .ledger
        .fulfill_order(customer, &[OrderLine::new(bolt.id_typed(), 1)])
        .unwrap();

    let err = fx
        .ledger
        .update_order_status(order.id_typed(), OrderStatus::Pending)
        .unwrap_err();
    assert_eq!(code(&err), "invalid_transition", "same-status change is rejected");

    fx.ledger
        .update_order_status(order.id_typed(), OrderStatus::Shipped)
        .unwrap();
    fx.ledger
        .update_order_status(order.id_typed(), OrderStatus::Delivered)
        .unwrap();

    let err = fx
        .ledger
        .update_order_status(order.id_typed(), OrderStatus::Pending)
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InvalidTransition { from, to }) if from == "DELIVERED" && to == "PENDING"
    ));
    assert_eq!(
        fx.ledger.get_order(order.id_typed()).unwrap().status(),
        OrderStatus::Delivered
    );

    let missing = fx.ledger.cancel_order(OrderId::new()).unwrap_err();
    assert_eq!(code(&missing), "not_found");
}

#[test]
fn cancel_skips_items_whose_product_is_gone() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 10, 0);
    let nut = fx.product("Nut", 10, 10, 0);
    let order = fx
        .ledger
        .fulfill_order(
            customer,
            &[OrderLine::new(bolt.id_typed(), 2), OrderLine::new(nut.id_typed(), 3)],
        )
        .unwrap();

    fx.ledger.delete_product(bolt.id_typed()).unwrap();
    fx.ledger.cancel_order(order.id_typed()).unwrap();

    fx.assert_mirrored(nut.id_typed(), 10);
}

#[test]
fn restock_that_stays_low_raises_the_signal() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 3, 10);
    let line = [OrderLine::new(bolt.id_typed(), 1)];

    let order = fx.ledger.fulfill_order(customer, &line).unwrap();
    fx.events.drain();
    fx.ledger.cancel_order(order.id_typed()).unwrap();
    fx.assert_mirrored(bolt.id_typed(), 3);
    assert_eq!(
        event_types(&fx.events),
        vec![
            "inventory.stock.adjusted",
            "inventory.stock.low",
            "sales.order.status_changed"
        ]
    );

    let order = fx.ledger.fulfill_order(customer, &line).unwrap();
    fx.events.drain();
    fx.ledger.delete_order(order.id_typed()).unwrap();
    fx.assert_mirrored(bolt.id_typed(), 3);
    assert_eq!(
        event_types(&fx.events),
        vec![
            "inventory.stock.adjusted",
            "inventory.stock.low",
            "sales.order.deleted"
        ]
    );
}

#[test]
fn deleting_an_open_order_restocks_but_a_delivered_one_does_not() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 10, 0);

    let open = fx
        .ledger
        .fulfill_order(customer, &[OrderLine::new(bolt.id_typed(), 3)])
        .unwrap();
    fx.ledger.delete_order(open.id_typed()).unwrap();
    fx.assert_mirrored(bolt.id_typed(), 10);

    let done = fx
        .ledger
        .fulfill_order(customer, &[OrderLine::new(bolt.id_typed(), 3)])
        .unwrap();
    fx.ledger
        .update_order_status(done.id_typed(), OrderStatus::Shipped)
        .unwrap();
    fx.ledger
        .update_order_status(done.id_typed(), OrderStatus::Delivered)
        .unwrap();
    fx.ledger.delete_order(done.id_typed()).unwrap();
    fx.assert_mirrored(bolt.id_typed(), 7);

    assert!(fx.ledger.list_orders().unwrap().is_empty());
    assert_eq!(code(&fx.ledger.delete_order(done.id_typed()).unwrap_err()), "not_found");
}

#[test]
fn product_names_stay_unique_on_update() {
    let fx = fixture();
    fx.product("Bolt", 10, 1, 0);
    let nut = fx.product("Nut", 10, 1, 0);

    let err = fx
        .ledger
        .update_product_details(nut.id_typed(), ProductDetails::new("Bolt", 10))
        .unwrap_err();
    assert_eq!(code(&err), "conflict");
    assert_eq!(fx.ledger.get_product(nut.id_typed()).unwrap().name(), "Nut");
}

#[test]
fn deleting_a_product_cascades_its_stock() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 4, 0);
    fx.events.drain();

    fx.ledger.delete_product(bolt.id_typed()).unwrap();

    assert_eq!(code(&fx.ledger.get_product(bolt.id_typed()).unwrap_err()), "not_found");
    assert!(fx.ledger.list_stock().unwrap().is_empty());
    assert_eq!(event_types(&fx.events), vec!["inventory.stock.removed"]);
    assert_eq!(code(&fx.ledger.delete_product(bolt.id_typed()).unwrap_err()), "not_found");
}

#[test]
fn events_carry_increasing_sequence_numbers() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 100, 0);
    fx.ledger.adjust_quantity(bolt.id_typed(), 5).unwrap();
    fx.ledger.adjust_quantity(bolt.id_typed(), -5).unwrap();

    let events = fx.events.drain();
    assert!(events.len() >= 3);
    let sequences: Vec<u64> = events.iter().map(|e| e.sequence_number()).collect();
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));

    let stock = fx.ledger.get_stock(bolt.id_typed()).unwrap();
    assert!(events.iter().all(|e| e.aggregate_id() == *stock.id_typed().as_uuid()));
}

#[test]
fn sequence_order_matches_commit_order_across_threads() {
    use std::thread;

    let bus: Bus = Arc::new(InMemoryEventBus::new());
    let events = bus.subscribe();
    let ledger: Arc<TestLedger> = Arc::new(InventoryLedger::new(
        Arc::new(InMemoryStore::new()),
        bus,
        LedgerConfig::default(),
    ));
    let product_id = ledger
        .register_product(ProductDetails::new("Bolt", 10), 50, Some(0))
        .unwrap()
        .id_typed();
    events.drain();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for i in 0..50 {
                    let delta = if i % 2 == 0 { -1 } else { 2 };
                    ledger.adjust_quantity(product_id, delta).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut adjustments: Vec<(u64, i64, i64)> = events
        .drain()
        .iter()
        .filter_map(|e| match e.decode::<InventoryEvent>() {
            Ok(InventoryEvent::StockAdjusted(a)) => Some((e.sequence_number(), a.delta, a.new_quantity)),
            _ => None,
        })
        .collect();
    assert_eq!(adjustments.len(), 200);
    adjustments.sort_by_key(|(sequence, _, _)| *sequence);

    // Replaying in sequence order must reproduce every intermediate quantity.
    let mut quantity = 50;
    for (sequence, delta, new_quantity) in adjustments {
        quantity += delta;
        assert_eq!(new_quantity, quantity, "adjustment #{sequence} out of commit order");
    }
    assert_eq!(quantity, ledger.get_stock(product_id).unwrap().quantity());
}

#[test]
fn inventory_report_reflects_committed_state() {
    let fx = fixture();
    let bolt = fx.product("Bolt", 10, 3, 5);
    fx.product("Nut", 5, 100, 5);

    let report = fx.ledger.inventory_report().unwrap();
    assert_eq!(report.rows.len(), 2);
    let low: Vec<ProductId> = report.low_stock().map(|r| r.product_id).collect();
    assert_eq!(low, vec![bolt.id_typed()]);
}

#[test]
fn generated_reports_are_kept_unchanged() {
    let fx = fixture();
    let customer = fx.customer();
    let bolt = fx.product("Bolt", 10, 20, 5);
    fx.ledger
        .fulfill_order(customer, &[OrderLine::new(bolt.id_typed(), 2)])
        .unwrap();

    let today = Utc::now().date_naive();
    let period = ReportPeriod::new(today.pred_opt().unwrap(), today.succ_opt().unwrap()).unwrap();
    let orders = fx.ledger.generate_report(ReportRequest::Orders(period)).unwrap();
    let inventory = fx.ledger.generate_report(ReportRequest::Inventory).unwrap();
    assert_eq!(orders.kind(), "orders");

    fx.ledger.adjust_quantity(bolt.id_typed(), -10).unwrap();

    let stored = fx.ledger.get_report(inventory.id_typed()).unwrap();
    assert_eq!(stored, inventory);
    match stored.data() {
        ReportData::Inventory(report) => assert_eq!(report.rows[0].quantity, Some(18)),
        other => panic!("expected an inventory report, got {other:?}"),
    }
    match orders.data() {
        ReportData::Orders(report) => assert_eq!(report.rows.len(), 1),
        other => panic!("expected an order report, got {other:?}"),
    }

    let ids: Vec<ReportId> = fx
        .ledger
        .list_reports()
        .unwrap()
        .iter()
        .map(Report::id_typed)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&orders.id_typed()) && ids.contains(&inventory.id_typed()));

    let err = fx.ledger.get_report(ReportId::new()).unwrap_err();
    assert_eq!(code(&err), "not_found");
}

#[test]
fn concurrent_decrements_never_lose_updates() {
    use std::thread;

    let store = Arc::new(InMemoryStore::new());
    let ledger: Arc<TestLedger> = Arc::new(InventoryLedger::new(
        store,
        Arc::new(InMemoryEventBus::new()),
        LedgerConfig::default(),
    ));
    let product_id = ledger
        .register_product(ProductDetails::new("Bolt", 10), 100, Some(0))
        .unwrap()
        .id_typed();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                (0..30)
                    .filter(|_| ledger.adjust_quantity(product_id, -1).is_ok())
                    .count()
            })
        })
        .collect();
    let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // 120 attempts against 100 units.
    assert_eq!(succeeded, 100);
    assert_eq!(ledger.get_stock(product_id).unwrap().quantity(), 0);
    assert_eq!(ledger.get_product(product_id).unwrap().stock_level(), 0);
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Adjust(usize, i64),
        Order(usize, i64),
        Cancel(usize),
        Set(usize, i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, -60i64..60).prop_map(|(p, d)| Op::Adjust(p, d)),
            (0usize..3, 1i64..30).prop_map(|(p, q)| Op::Order(p, q)),
            (0usize..8).prop_map(Op::Cancel),
            (0usize..3, 0i64..80).prop_map(|(p, q)| Op::Set(p, q)),
        ]
    }

    proptest! {
        /// Property: whatever mix of operations runs (and fails), every stock
        /// record stays non-negative and mirrored onto its product.
        #[test]
        fn quantity_stays_mirrored_and_non_negative(
            initial in proptest::collection::vec(0i64..50, 3),
            ops in proptest::collection::vec(op(), 1..40),
        ) {
            let fx = fixture();
            let customer = fx.customer();
            let products: Vec<ProductId> = initial
                .iter()
                .enumerate()
                .map(|(i, q)| fx.product(&format!("P{i}"), 10, *q, 5).id_typed())
                .collect();
            let mut orders: Vec<OrderId> = Vec::new();

            for op in ops {
                match op {
                    Op::Adjust(p, delta) => {
                        let _ = fx.ledger.adjust_quantity(products[p], delta);
                    }
                    Op::Order(p, qty) => {
                        if let Ok(order) = fx.ledger.fulfill_order(customer, &[OrderLine::new(products[p], qty)]) {
                            orders.push(order.id_typed());
                        }
                    }
                    Op::Cancel(i) => {
                        if let Some(order_id) = orders.get(i) {
                            let _ = fx.ledger.cancel_order(*order_id);
                        }
                    }
                    Op::Set(p, qty) => {
                        let _ = fx.ledger.set_absolute_quantity(products[p], qty);
                    }
                }

                for product_id in &products {
                    let stock = fx.ledger.get_stock(*product_id).unwrap();
                    let product = fx.ledger.get_product(*product_id).unwrap();
                    prop_assert!(stock.quantity() >= 0);
                    prop_assert_eq!(stock.quantity(), product.stock_level());
                }
            }
        }
    }
}
