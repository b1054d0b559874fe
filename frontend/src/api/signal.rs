//! 全局 "unauthorized" 广播
//!
//! API 客户端每收到一次 401 就广播一次；会话上下文订阅后强制登出。
//! 支持任意数量的监听者。

use std::sync::{Arc, Mutex};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct SignalInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// 广播信号，克隆后共享同一组监听者
#[derive(Clone, Default)]
pub struct UnauthorizedSignal {
    inner: Arc<Mutex<SignalInner>>,
}

impl UnauthorizedSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> ListenerId {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// 取消订阅，返回该监听者是否存在
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() != before
    }

    /// 通知所有监听者，返回被通知的数量
    ///
    /// 调用监听者前先释放锁，监听者内部可以安全地订阅/取消订阅。
    pub fn notify(&self) -> usize {
        let listeners: Vec<Listener> = {
            let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .listeners
            .len()
    }
}

impl std::fmt::Debug for UnauthorizedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedSignal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_broadcast_reaches_every_listener() {
        let signal = UnauthorizedSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            signal.subscribe(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(signal.notify(), 3);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let signal = UnauthorizedSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = signal.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        assert_eq!(signal.notify(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let signal = UnauthorizedSignal::new();
        let handle = signal.clone();
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));
        let slot_in = Arc::clone(&slot);
        let id = signal.subscribe(move || {
            if let Some(id) = *slot_in.lock().unwrap() {
                handle.unsubscribe(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        assert_eq!(signal.notify(), 1);
        assert_eq!(signal.listener_count(), 0);
    }
}
