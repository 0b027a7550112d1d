use crate::error::DispatchError;
use crate::handler::{DomainEventHandler, EventHandler};
use dispatch_domain::{DispatchContext, DomainEvent, Event};
use std::any::{Any, TypeId};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub(crate) type BoxAnySend = Box<dyn Any + Send>;

pub(crate) type HandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), DispatchError>> + Send + 'a>>;

pub(crate) type HandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a DispatchContext) -> HandlerFuture<'a> + Send + Sync>;

// 借助泛型约束推导闭包的高阶生命周期签名
fn erase<F>(f: F) -> HandlerFn
where
    F: for<'a> Fn(BoxAnySend, &'a DispatchContext) -> HandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 类型擦除后的「事件类型 → 处理器」绑定
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) event_type: TypeId,
    pub(crate) event_name: &'static str,
    pub(crate) handler_name: String,
    pub(crate) invoke: HandlerFn,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("event_name", &self.event_name)
            .field("handler_name", &self.handler_name)
            .finish_non_exhaustive()
    }
}

/// 一条领域事件处理器注册
///
/// 调用方（例如装配代码或容器）预先构造两组注册列表，交给
/// [`EventDispatcher::new`](crate::EventDispatcher::new)；列表顺序即注册顺序。
///
/// ```ignore
/// let registrations = vec![
///     DomainEventRegistration::new::<OrderCreated, _>(Arc::new(OrderCreatedHandler)),
///     DomainEventRegistration::new::<OrderPaid, _>(Arc::new(OrderPaidHandler)),
/// ];
/// ```
#[derive(Clone, Debug)]
pub struct DomainEventRegistration(pub(crate) Registration);

impl DomainEventRegistration {
    pub fn new<E, H>(handler: Arc<H>) -> Self
    where
        E: DomainEvent,
        H: DomainEventHandler<E> + ?Sized + 'static,
    {
        let handler_name = handler.handler_name().to_string();

        let invoke = {
            let handler_name = handler_name.clone();

            erase(move |boxed, ctx| {
                let handler = handler.clone();
                let handler_name = handler_name.clone();

                Box::pin(async move {
                    // 键与闭包来自同一泛型 E，正常情况下 downcast 不会失败
                    let event = boxed.downcast::<E>().map_err(|_| DispatchError::TypeMismatch {
                        expected: E::NAME,
                        found: "unknown",
                    })?;

                    handler
                        .handle(ctx, *event)
                        .await
                        .map_err(|source| DispatchError::Handler {
                            handler: handler_name,
                            event: E::NAME,
                            source,
                        })
                })
            })
        };

        Self(Registration {
            event_type: TypeId::of::<E>(),
            event_name: E::NAME,
            handler_name,
            invoke,
        })
    }

    pub fn event_name(&self) -> &'static str {
        self.0.event_name
    }

    pub fn handler_name(&self) -> &str {
        &self.0.handler_name
    }
}

/// 一条事件处理器注册
#[derive(Clone, Debug)]
pub struct EventRegistration(pub(crate) Registration);

impl EventRegistration {
    pub fn new<E, H>(handler: Arc<H>) -> Self
    where
        E: Event,
        H: EventHandler<E> + ?Sized + 'static,
    {
        let handler_name = handler.handler_name().to_string();

        let invoke = {
            let handler_name = handler_name.clone();

            erase(move |boxed, ctx| {
                let handler = handler.clone();
                let handler_name = handler_name.clone();

                Box::pin(async move {
                    let event = boxed.downcast::<E>().map_err(|_| DispatchError::TypeMismatch {
                        expected: E::NAME,
                        found: "unknown",
                    })?;

                    handler
                        .handle(ctx, *event)
                        .await
                        .map_err(|source| DispatchError::Handler {
                            handler: handler_name,
                            event: E::NAME,
                            source,
                        })
                })
            })
        };

        Self(Registration {
            event_type: TypeId::of::<E>(),
            event_name: E::NAME,
            handler_name,
            invoke,
        })
    }

    pub fn event_name(&self) -> &'static str {
        self.0.event_name
    }

    pub fn handler_name(&self) -> &str {
        &self.0.handler_name
    }
}
