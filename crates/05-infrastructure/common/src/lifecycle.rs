//! 依赖生命周期

/// 依赖生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 每次解析都返回同一个存储值
    Singleton,
    /// 瞬时模式 - 每次解析都构造新实例
    #[default]
    Transient,
}

impl Lifetime {
    /// 由布尔标记得到生命周期
    pub fn from_single(single: bool) -> Self {
        if single {
            Self::Singleton
        } else {
            Self::Transient
        }
    }

    /// 是否为单例
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }
}
