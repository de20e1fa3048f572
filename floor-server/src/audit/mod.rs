//! 审计日志模块 — 追加式操作追踪
//!
//! # 架构
//!
//! ```text
//! 敏感操作触发
//!   └─ AuditService::log() → mpsc → AuditWorker → DurableStore (audit 集合)
//! ```
//!
//! Append-only: no delete/update interface. Failures are fully silent
//! toward callers — a full channel or a failed write never blocks or
//! surfaces; the worker logs at `debug` and moves on.

pub mod service;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use types::{AuditAction, AuditEntry};
pub use worker::AuditWorker;
