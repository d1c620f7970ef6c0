//! Notifications
//!
//! Transient toasts. Every surfaced error and every confirmed write ends up
//! here; each toast dismisses itself after the configured lifetime.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::error::{ApiError, ErrorKind};

/// Oldest toasts are dropped beyond this
pub const MAX_VISIBLE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

impl ToastLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Info => "toast toast-info",
            Self::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub level: ToastLevel,
    pub message: String,
}

/// Ordered toasts, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    items: Vec<Toast>,
    next_id: u32,
}

impl ToastQueue {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        self.items.push(Toast { id, level, message: message.into() });
        if self.items.len() > MAX_VISIBLE {
            let overflow = self.items.len() - MAX_VISIBLE;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn dismiss(&mut self, id: u32) {
        self.items.retain(|toast| toast.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Title shown above an error message
pub fn error_title(error: &ApiError) -> &'static str {
    match error.kind() {
        ErrorKind::Validation => "Invalid input",
        ErrorKind::Auth => "Not allowed",
        ErrorKind::NotFound => "Not found",
        ErrorKind::Server => "Server error",
        ErrorKind::Transport => "Connection problem",
    }
}

/// Reactive handle to the toast queue
#[derive(Clone, Copy)]
pub struct Notifier {
    queue: RwSignal<ToastQueue>,
    ttl_ms: u32,
}

impl Notifier {
    pub fn new(ttl_ms: u32) -> Self {
        Self { queue: RwSignal::new(ToastQueue::default()), ttl_ms }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.with(|q| q.items().to_vec())
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        let mut id = 0;
        self.queue.update(|q| id = q.push(level, message));

        let queue = self.queue;
        let ttl = self.ttl_ms;
        spawn_local(async move {
            TimeoutFuture::new(ttl).await;
            queue.update(|q| q.dismiss(id));
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn error(&self, error: &ApiError) {
        self.push(ToastLevel::Error, format!("{}: {}", error_title(error), error));
    }

    pub fn dismiss(&self, id: u32) {
        self.queue.update(|q| q.dismiss(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_queue_keeps_newest() {
        let mut queue = ToastQueue::default();
        for n in 0..6 {
            queue.push(ToastLevel::Info, format!("msg {n}"));
        }
        let messages: Vec<&str> = queue.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["msg 2", "msg 3", "msg 4", "msg 5"]);
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastLevel::Success, "saved");
        let second = queue.push(ToastLevel::Error, "failed");
        assert_ne!(first, second);

        queue.dismiss(first);
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].id, second);

        queue.dismiss(999);
        assert_eq!(queue.items().len(), 1);
    }

    #[test]
    fn test_error_titles() {
        assert_eq!(error_title(&ApiError::validation("x")), "Invalid input");
        assert_eq!(error_title(&ApiError::from_response(403, &Value::Null)), "Not allowed");
        assert_eq!(error_title(&ApiError::transport("Failed to fetch")), "Connection problem");
    }
}
