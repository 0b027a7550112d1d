use async_trait::async_trait;
use dispatch_application::{
    ChannelKind, DispatchError, Dispatcher, DispatcherConfig, DomainEventHandler,
    DomainEventRegistration, EventDispatcher, EventHandler, EventRegistration, FailurePolicy,
};
use dispatch_domain::DispatchContext;
use dispatch_macros::{domain_event, event};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};

#[domain_event]
struct OrderCreated {
    order_id: String,
}

#[domain_event(name = "order.confirmed")]
struct OrderConfirmed {
    order_id: String,
}

#[event]
struct OrderShipped {
    order_id: String,
}

#[event]
struct OrderCreatedNotice {
    order_id: String,
}

#[event(name = "email.requested")]
struct EmailRequested {
    to: String,
}

type Log = Arc<Mutex<Vec<String>>>;

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

struct OrderCreatedHandler {
    log: Log,
    // 处理时追加后续领域事件，用于验证重入语义
    dispatcher: OnceLock<Weak<EventDispatcher>>,
}

#[async_trait]
impl DomainEventHandler<OrderCreated> for OrderCreatedHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: OrderCreated) -> anyhow::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("created:{}", event.order_id));

        if let Some(dispatcher) = self.dispatcher.get().and_then(Weak::upgrade) {
            dispatcher.add_domain_event(OrderConfirmed {
                order_id: event.order_id,
            });
        }
        Ok(())
    }
}

struct OrderConfirmedHandler {
    log: Log,
}

#[async_trait]
impl DomainEventHandler<OrderConfirmed> for OrderConfirmedHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: OrderConfirmed) -> anyhow::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("confirmed:{}", event.order_id));
        Ok(())
    }
}

struct OrderShippedHandler {
    log: Log,
}

#[async_trait]
impl EventHandler<OrderShipped> for OrderShippedHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: OrderShipped) -> anyhow::Result<()> {
        if event.order_id.is_empty() {
            anyhow::bail!("missing order id");
        }
        self.log
            .lock()
            .unwrap()
            .push(format!("shipped:{}", event.order_id));
        Ok(())
    }
}

struct EmailRequestedHandler {
    log: Log,
    cancelled_seen: AtomicUsize,
}

#[async_trait]
impl EventHandler<EmailRequested> for EmailRequestedHandler {
    async fn handle(&self, ctx: &DispatchContext, event: EmailRequested) -> anyhow::Result<()> {
        if ctx.is_cancelled() {
            self.cancelled_seen.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("cancelled before sending to {}", event.to);
        }
        self.log.lock().unwrap().push(format!("email:{}", event.to));
        Ok(())
    }
}

struct Fixture {
    log: Log,
    dispatcher: Arc<EventDispatcher>,
    email: Arc<EmailRequestedHandler>,
}

fn fixture(config: DispatcherConfig) -> Fixture {
    let log: Log = Arc::default();

    let created = Arc::new(OrderCreatedHandler {
        log: log.clone(),
        dispatcher: OnceLock::new(),
    });
    let email = Arc::new(EmailRequestedHandler {
        log: log.clone(),
        cancelled_seen: AtomicUsize::new(0),
    });

    let dispatcher = Arc::new(
        EventDispatcher::new(
            vec![
                DomainEventRegistration::new::<OrderCreated, _>(created.clone()),
                DomainEventRegistration::new::<OrderConfirmed, _>(Arc::new(
                    OrderConfirmedHandler { log: log.clone() },
                )),
            ],
            vec![
                EventRegistration::new::<OrderShipped, _>(Arc::new(OrderShippedHandler {
                    log: log.clone(),
                })),
                EventRegistration::new::<EmailRequested, _>(email.clone()),
            ],
            config,
        )
        .unwrap(),
    );

    let _ = created.dispatcher.set(Arc::downgrade(&dispatcher));

    Fixture {
        log,
        dispatcher,
        email,
    }
}

fn shipped(id: &str) -> OrderShipped {
    OrderShipped {
        order_id: id.to_string(),
    }
}

#[tokio::test]
async fn commit_events_dispatches_each_once_in_insertion_order() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::default();

    for id in ["a", "b", "c"] {
        f.dispatcher.add_event(shipped(id));
    }
    f.dispatcher.add_event(EmailRequested {
        to: "ops@example.com".into(),
    });

    let dispatched = f.dispatcher.commit_events(&ctx).await.unwrap();

    assert_eq!(dispatched, 4);
    assert_eq!(
        entries(&f.log),
        vec!["shipped:a", "shipped:b", "shipped:c", "email:ops@example.com"]
    );
    assert_eq!(f.dispatcher.pending_events(), 0);
}

#[tokio::test]
async fn dispatch_event_is_independent_of_queue_state() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::default();

    f.dispatcher.add_event(shipped("queued"));

    f.dispatcher
        .dispatch_event(&ctx, shipped("now"))
        .await
        .unwrap();

    assert_eq!(entries(&f.log), vec!["shipped:now"]);
    assert_eq!(f.dispatcher.pending_events(), 1);

    f.dispatcher.commit_events(&ctx).await.unwrap();
    assert_eq!(entries(&f.log), vec!["shipped:now", "shipped:queued"]);
}

#[tokio::test]
async fn second_commit_without_additions_does_nothing() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::default();

    f.dispatcher.add_event(shipped("a"));
    f.dispatcher.add_domain_event(OrderConfirmed {
        order_id: "a".into(),
    });

    assert_eq!(f.dispatcher.commit_events(&ctx).await.unwrap(), 1);
    assert_eq!(f.dispatcher.commit_domain_events(&ctx).await.unwrap(), 1);

    assert_eq!(f.dispatcher.commit_events(&ctx).await.unwrap(), 0);
    assert_eq!(f.dispatcher.commit_domain_events(&ctx).await.unwrap(), 0);
    assert_eq!(entries(&f.log), vec!["shipped:a", "confirmed:a"]);
}

struct NoticeHandler {
    log: Log,
}

#[async_trait]
impl EventHandler<OrderCreatedNotice> for NoticeHandler {
    async fn handle(&self, _ctx: &DispatchContext, event: OrderCreatedNotice) -> anyhow::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("notice:{}", event.order_id));
        Ok(())
    }
}

fn notice_only(log: &Log) -> EventDispatcher {
    EventDispatcher::builder()
        .event_handler::<OrderCreatedNotice, _>(Arc::new(NoticeHandler { log: log.clone() }))
        .unwrap()
        .build()
}

#[tokio::test]
async fn resolves_registered_type_by_identity() {
    let log: Log = Arc::default();
    let dispatcher = notice_only(&log);

    dispatcher
        .dispatch_event(
            &DispatchContext::default(),
            OrderCreatedNotice {
                order_id: "o-1".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(entries(&log), vec!["notice:o-1"]);
    assert_eq!(dispatcher.registered_events(), vec!["OrderCreatedNotice"]);
}

// OrderShipped 与 OrderCreatedNotice 名称相近，但类型不同，不得被解析到同一处理器
#[tokio::test]
#[should_panic(expected = "handler not found: kind=event, event=OrderShipped")]
async fn dispatching_unregistered_event_panics() {
    let log: Log = Arc::default();
    let dispatcher = notice_only(&log);

    let _ = dispatcher
        .dispatch_event(&DispatchContext::default(), shipped("o-1"))
        .await;
}

#[test]
#[should_panic(expected = "handler not found: kind=event, event=OrderShipped")]
fn adding_unregistered_event_panics() {
    let log: Log = Arc::default();
    notice_only(&log).add_event(shipped("o-2"));
}

#[test]
#[should_panic(expected = "handler not found: kind=domain_event, event=order.confirmed")]
fn adding_event_to_the_wrong_channel_panics() {
    // 只注册了事件通道
    let log: Log = Arc::default();
    notice_only(&log).add_domain_event(OrderConfirmed {
        order_id: "o-3".into(),
    });
}

#[tokio::test]
async fn adding_never_dispatches_synchronously() {
    let f = fixture(DispatcherConfig::default());

    f.dispatcher.add_domain_event(OrderCreated {
        order_id: "o-1".into(),
    });
    f.dispatcher.add_event(shipped("o-1"));

    assert!(entries(&f.log).is_empty());
    assert_eq!(f.dispatcher.pending_domain_events(), 1);
    assert_eq!(f.dispatcher.pending_events(), 1);
}

#[tokio::test]
async fn second_registration_for_same_event_is_rejected() {
    struct Named(&'static str, Log);

    #[async_trait]
    impl EventHandler<OrderShipped> for Named {
        fn handler_name(&self) -> &str {
            self.0
        }

        async fn handle(&self, _ctx: &DispatchContext, _event: OrderShipped) -> anyhow::Result<()> {
            self.1.lock().unwrap().push(self.0.to_string());
            Ok(())
        }
    }

    let log: Log = Arc::default();
    let first = Arc::new(Named("first", log.clone()));
    let second = Arc::new(Named("second", log.clone()));

    let err = EventDispatcher::builder()
        .event_handler::<OrderShipped, _>(first.clone())
        .unwrap()
        .event_handler::<OrderShipped, _>(second)
        .unwrap_err();
    match err {
        DispatchError::AlreadyRegistered {
            kind,
            event,
            existing,
        } => {
            assert_eq!(kind, ChannelKind::Event);
            assert_eq!(event, "OrderShipped");
            assert_eq!(existing, "first");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let dispatcher = EventDispatcher::builder()
        .event_handler::<OrderShipped, _>(first)
        .unwrap()
        .build();
    dispatcher
        .dispatch_event(&DispatchContext::default(), shipped("x"))
        .await
        .unwrap();
    assert_eq!(entries(&log), vec!["first"]);
}

#[tokio::test]
async fn events_added_during_commit_wait_for_next_commit() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::default();

    for id in ["o-1", "o-2"] {
        f.dispatcher.add_domain_event(OrderCreated {
            order_id: id.into(),
        });
    }

    assert_eq!(f.dispatcher.commit_domain_events(&ctx).await.unwrap(), 2);
    assert_eq!(entries(&f.log), vec!["created:o-1", "created:o-2"]);
    assert_eq!(f.dispatcher.pending_domain_events(), 2);

    assert_eq!(f.dispatcher.commit_domain_events(&ctx).await.unwrap(), 2);
    assert_eq!(
        entries(&f.log),
        vec!["created:o-1", "created:o-2", "confirmed:o-1", "confirmed:o-2"]
    );
    assert_eq!(f.dispatcher.pending_domain_events(), 0);
}

#[tokio::test]
async fn halt_policy_consumes_failed_entry_and_requeues_the_rest_first() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::default();

    for id in ["a", "", "b"] {
        f.dispatcher.add_event(shipped(id));
    }

    let err = f.dispatcher.commit_events(&ctx).await.unwrap_err();
    match &err {
        DispatchError::Handler { event, source, .. } => {
            assert_eq!(*event, "OrderShipped");
            assert_eq!(source.to_string(), "missing order id");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());

    assert_eq!(entries(&f.log), vec!["shipped:a"]);
    assert_eq!(f.dispatcher.pending_events(), 1);

    // 失败后新入队的事件排在被放回的事件之后
    f.dispatcher.add_event(shipped("c"));
    assert_eq!(f.dispatcher.commit_events(&ctx).await.unwrap(), 2);
    assert_eq!(entries(&f.log), vec!["shipped:a", "shipped:b", "shipped:c"]);
}

#[tokio::test]
async fn continue_policy_drains_everything_and_reports_failures() {
    let config = DispatcherConfig::builder()
        .failure_policy(FailurePolicy::Continue)
        .build();
    let f = fixture(config);
    let ctx = DispatchContext::default();

    for id in ["", "a", "", "b"] {
        f.dispatcher.add_event(shipped(id));
    }

    let err = f.dispatcher.commit_events(&ctx).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "commit finished with 2 failure(s) out of 4 dispatched event(s)"
    );
    let DispatchError::Commit { failures, .. } = err else {
        panic!("expected commit error");
    };
    assert!(
        failures
            .iter()
            .all(|e| matches!(e, DispatchError::Handler { event: "OrderShipped", .. }))
    );

    assert_eq!(entries(&f.log), vec!["shipped:a", "shipped:b"]);
    assert_eq!(f.dispatcher.pending_events(), 0);
    assert_eq!(f.dispatcher.commit_events(&ctx).await.unwrap(), 0);
}

#[tokio::test]
async fn context_cancellation_is_left_to_handlers() {
    let f = fixture(DispatcherConfig::default());
    let ctx = DispatchContext::builder()
        .correlation_id("cor-1".into())
        .build();
    ctx.cancel();

    f.dispatcher.add_event(shipped("a"));
    f.dispatcher.add_event(EmailRequested {
        to: "a@example.com".into(),
    });

    // 调度器不检查取消：不关心取消的处理器照常执行
    let err = f.dispatcher.commit_events(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("cancelled before sending"));
    assert_eq!(entries(&f.log), vec!["shipped:a"]);
    assert_eq!(f.email.cancelled_seen.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_dispatcher_accepts_concurrent_additions() {
    let f = fixture(DispatcherConfig::default());

    let mut tasks = Vec::new();
    for i in 0..50 {
        let dispatcher = f.dispatcher.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.add_event(shipped(&format!("o-{i}")));
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(f.dispatcher.pending_events(), 50);
    let dispatched = f
        .dispatcher
        .commit_events(&DispatchContext::default())
        .await
        .unwrap();
    assert_eq!(dispatched, 50);

    let mut seen = entries(&f.log);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 50);
}
