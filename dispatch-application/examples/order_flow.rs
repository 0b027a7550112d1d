use async_trait::async_trait;
use dispatch_application::{
    Dispatcher, DomainEventHandler, DomainEventRegistration, EventDispatcher, EventHandler,
    EventRegistration,
};
use dispatch_domain::DispatchContext;
use dispatch_macros::{domain_event, event};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[domain_event(name = "order.placed")]
struct OrderPlaced {
    order_id: String,
    amount: u64,
}

#[domain_event(name = "stock.reserved")]
struct StockReserved {
    sku: String,
    qty: u32,
}

#[event(name = "receipt.requested")]
struct ReceiptRequested {
    order_id: String,
}

struct OrderPlacedHandler;

#[async_trait]
impl DomainEventHandler<OrderPlaced> for OrderPlacedHandler {
    async fn handle(&self, ctx: &DispatchContext, event: OrderPlaced) -> anyhow::Result<()> {
        println!(
            "order placed: id={}, amount={}, correlation={:?}",
            event.order_id,
            event.amount,
            ctx.correlation_id()
        );
        Ok(())
    }
}

struct StockReservedHandler;

#[async_trait]
impl DomainEventHandler<StockReserved> for StockReservedHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: StockReserved) -> anyhow::Result<()> {
        println!("stock reserved: sku={}, qty={}", event.sku, event.qty);
        Ok(())
    }
}

struct ReceiptRequestedHandler;

#[async_trait]
impl EventHandler<ReceiptRequested> for ReceiptRequestedHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: ReceiptRequested) -> anyhow::Result<()> {
        println!("receipt requested: order={}", event.order_id);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    // 装配：两组注册列表由调用方构造
    let dispatcher = Arc::new(EventDispatcher::new(
        vec![
            DomainEventRegistration::new::<OrderPlaced, _>(Arc::new(OrderPlacedHandler)),
            DomainEventRegistration::new::<StockReserved, _>(Arc::new(StockReservedHandler)),
        ],
        vec![EventRegistration::new::<ReceiptRequested, _>(Arc::new(
            ReceiptRequestedHandler,
        ))],
        Default::default(),
    )?);

    println!(
        "registered: domain_events={:?}, events={:?}",
        dispatcher.registered_domain_events(),
        dispatcher.registered_events()
    );

    let ctx = DispatchContext::builder()
        .correlation_id("cor-1".into())
        .actor_type("user".into())
        .actor_id("u-1".into())
        .build();

    // 一次工作单元：业务规则产生领域事件，先入队
    dispatcher.add_domain_event(OrderPlaced {
        order_id: "o-1".into(),
        amount: 1200,
    });
    dispatcher.add_domain_event(StockReserved {
        sku: "sku-9".into(),
        qty: 2,
    });
    dispatcher.add_event(ReceiptRequested {
        order_id: "o-1".into(),
    });

    // 提交点
    let n = dispatcher.commit_domain_events(&ctx).await?;
    println!("✅ committed {n} domain event(s)");
    let n = dispatcher.commit_events(&ctx).await?;
    println!("✅ committed {n} event(s)");

    // 立即分发
    dispatcher
        .dispatch_event(
            &ctx,
            ReceiptRequested {
                order_id: "o-2".into(),
            },
        )
        .await?;

    Ok(())
}
