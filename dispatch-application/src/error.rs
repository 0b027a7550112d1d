use crate::channel::ChannelKind;

/// 调度错误
///
/// - 注册期错误（`AlreadyRegistered`）在构造调度器时立即返回；
/// - 为未注册的事件类型入队或分发属于装配错误，直接 panic，不经过此枚举；
/// - `Handler` 携带处理器自身的错误，调度器不重试；
/// - `Commit` 仅在 `FailurePolicy::Continue` 下出现，汇总一次提交中的全部失败。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("handler already registered: kind={kind}, event={event}, existing={existing}")]
    AlreadyRegistered {
        kind: ChannelKind,
        event: &'static str,
        existing: String,
    },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("handler failed: handler={handler}, event={event}: {source}")]
    Handler {
        handler: String,
        event: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(
        "commit finished with {} failure(s) out of {dispatched} dispatched event(s)",
        .failures.len()
    )]
    Commit {
        dispatched: usize,
        failures: Vec<DispatchError>,
    },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
