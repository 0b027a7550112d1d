use bon::Builder;

/// 提交过程中处理器失败时的策略
///
/// 两种策略下，已分发的事件（包括失败的那一条）都视为已消费，不会重试。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 遇到第一个失败即停止；尚未分发的事件按原顺序放回队首，错误立即返回
    #[default]
    Halt,
    /// 继续分发剩余事件，结束后以 `DispatchError::Commit` 汇总全部失败
    Continue,
}

/// 默认的队列预留容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// 调度器配置
#[derive(Builder, Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// 处理器失败时的提交策略
    #[builder(default)]
    pub failure_policy: FailurePolicy,
    /// 每次提交后新队列预留的容量
    #[builder(default = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Halt,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
