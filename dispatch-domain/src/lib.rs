//! 事件调度的领域层基础（dispatch-domain）
//!
//! 定义被调度载荷需要实现的最小接口与贯穿每次调度的上下文：
//! - 领域事件（`DomainEvent`）：业务规则执行时产生，在一次工作单元结束后批量提交；
//! - 事件（`Event`）：通用通知，可单独立即分发，也可排队批量提交；
//! - 调度上下文（`DispatchContext`）：关联追踪、执行主体与取消信号。
//!
//! 载荷对调度器是不透明的，路由只依赖载荷的运行时类型。
//! 处理器、注册与队列见 `dispatch-application`；`dispatch-macros` 提供
//! `#[domain_event]` / `#[event]` 宏以免手写 trait 实现。
//!
pub mod context;
pub mod domain_event;
pub mod event;

pub use context::DispatchContext;
pub use domain_event::DomainEvent;
pub use event::Event;

// 允许在本 crate 内部通过 ::dispatch_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::dispatch_domain 路径。
extern crate self as dispatch_domain;
