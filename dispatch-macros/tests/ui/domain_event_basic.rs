use dispatch_domain::DomainEvent;
use dispatch_macros::domain_event;

#[domain_event]
struct OrderCreated {
    order_id: String,
}

#[domain_event(name = "order.cancelled")]
#[derive(PartialEq)]
struct OrderCancelled(String);

#[domain_event(name = "stock.changed")]
#[derive(Debug)]
enum StockChanged {
    Reserved { sku: String, qty: u32 },
    Released(String),
    Exhausted,
}

fn name_of<E: DomainEvent>(_: &E) -> &'static str {
    E::NAME
}

fn main() {
    let created = OrderCreated {
        order_id: "o-1".into(),
    };
    assert_eq!(name_of(&created.clone()), "OrderCreated");
    assert_eq!(created.order_id, "o-1");

    let cancelled = OrderCancelled("o-1".into());
    assert_eq!(cancelled.clone(), cancelled);
    assert_eq!(OrderCancelled::NAME, "order.cancelled");

    let changed = StockChanged::Released("sku-1".into());
    assert_eq!(name_of(&changed), "stock.changed");
    let _ = format!("{:?}", StockChanged::Exhausted);
    let _ = StockChanged::Reserved {
        sku: "sku-1".into(),
        qty: 1,
    };
}
