use crate::channel::ChannelKind;
use crate::error::DispatchError;
use crate::registration::Registration;
use std::any::TypeId;
use std::collections::HashMap;

/// 处理器注册表
///
/// - 以事件的 `TypeId` 为键，O(1) 解析；
/// - 构造期校验：同一事件类型重复注册立即报错；
/// - 名称只用于日志与错误信息，不参与路由，也不要求唯一
///   （同一泛型事件的不同实例共享默认名称）；
/// - 构造完成后只读。
#[derive(Debug)]
pub(crate) struct HandlerRegistry {
    kind: ChannelKind,
    by_type: HashMap<TypeId, Registration>,
    // 注册顺序，仅用于只读视图
    order: Vec<&'static str>,
}

impl HandlerRegistry {
    pub(crate) fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            by_type: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub(crate) fn insert(&mut self, registration: Registration) -> Result<(), DispatchError> {
        if let Some(existing) = self.by_type.get(&registration.event_type) {
            return Err(DispatchError::AlreadyRegistered {
                kind: self.kind,
                event: registration.event_name,
                existing: existing.handler_name.clone(),
            });
        }

        self.order.push(registration.event_name);
        self.by_type.insert(registration.event_type, registration);

        Ok(())
    }

    pub(crate) fn contains(&self, event_type: TypeId) -> bool {
        self.by_type.contains_key(&event_type)
    }

    pub(crate) fn get(&self, event_type: TypeId) -> Option<&Registration> {
        self.by_type.get(&event_type)
    }

    /// 已注册的事件名称（按注册顺序）
    pub(crate) fn event_names(&self) -> Vec<&'static str> {
        self.order.clone()
    }
}
