//! 审计日志服务
//!
//! `AuditService` 通过 mpsc 通道异步接收日志请求；写入由
//! [`super::AuditWorker`] 在后台完成。调用方永不阻塞、永不感知失败。

use super::types::{AuditAction, AuditEntry};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 发送到 AuditService 的日志请求
#[derive(Debug)]
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// 审计日志服务
pub struct AuditService {
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// 创建审计服务
    ///
    /// Returns the service plus the receiver half for the worker.
    pub fn new(buffer_size: usize) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Arc::new(Self { tx }), rx)
    }

    /// 记录一条审计日志
    ///
    /// Best-effort: a full or closed channel drops the entry silently.
    pub fn log(
        &self,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        operator_id: Option<i64>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) {
        let request = AuditLogRequest {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            operator_id,
            operator_name,
            details,
        };
        if let Err(e) = self.tx.try_send(request) {
            tracing::debug!(error = %e, "Audit entry dropped");
        }
    }
}

impl From<AuditLogRequest> for AuditEntry {
    fn from(req: AuditLogRequest) -> Self {
        AuditEntry {
            id: uuid::Uuid::new_v4().to_string(),
            action: req.action,
            resource_type: req.resource_type,
            resource_id: req.resource_id,
            operator_id: req.operator_id,
            operator_name: req.operator_name,
            details: req.details,
            created_at: shared::util::now_millis(),
        }
    }
}
