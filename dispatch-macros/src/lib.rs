//! 事件载荷宏（dispatch-macros）
//!
//! - `#[domain_event]`：为结构体/枚举实现 `::dispatch_domain::DomainEvent`
//! - `#[event]`：为结构体/枚举实现 `::dispatch_domain::Event`
//!
//! 两者参数一致：`name = "..."` 覆写事件的稳定名称（默认取类型名），
//! 并为目标类型合并默认派生 `Debug, Clone`。
use proc_macro::TokenStream;

mod derive_utils;
mod event_marker;

use event_marker::MarkerKind;

/// 领域事件宏
///
/// ```ignore
/// #[domain_event(name = "order.created")]
/// struct OrderCreated { order_id: String }
///
/// assert_eq!(OrderCreated::NAME, "order.created");
/// ```
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    event_marker::expand(MarkerKind::DomainEvent, attr, item)
}

/// 事件宏
///
/// ```ignore
/// #[event]
/// struct UserSignedIn { user_id: String }
///
/// assert_eq!(UserSignedIn::NAME, "UserSignedIn");
/// ```
#[proc_macro_attribute]
pub fn event(attr: TokenStream, item: TokenStream) -> TokenStream {
    event_marker::expand(MarkerKind::Event, attr, item)
}
