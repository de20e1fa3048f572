//! 审计日志后台 Worker
//!
//! 从 mpsc 通道消费 AuditLogRequest，写入 DurableStore。
//! 通道关闭时自动退出。

use super::service::AuditLogRequest;
use super::types::AuditEntry;
use crate::db::DurableStore;
use std::sync::Arc;

/// 审计日志后台 Worker
pub struct AuditWorker {
    store: Arc<dyn DurableStore>,
}

impl AuditWorker {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    /// 运行 worker（阻塞直到通道关闭）
    pub async fn run(self, mut rx: tokio::sync::mpsc::Receiver<AuditLogRequest>) {
        tracing::info!("Audit log worker started");

        while let Some(req) = rx.recv().await {
            let entry: AuditEntry = req.into();
            match self.store.append_audit(entry.clone()).await {
                Ok(()) => {
                    tracing::debug!(
                        audit_id = %entry.id,
                        action = %entry.action,
                        resource = %entry.resource_type,
                        "Audit entry recorded"
                    );
                }
                Err(e) => {
                    // 审计失败静默处理：不上报、不阻塞
                    tracing::debug!(error = %e, "Failed to write audit entry");
                }
            }
        }

        tracing::info!("Audit log channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditAction, AuditService};
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn entries_flow_through_worker() {
        let store = Arc::new(MemoryStore::new());
        let (service, rx) = AuditService::new(8);
        let worker = AuditWorker::new(store.clone());
        let handle = tokio::spawn(worker.run(rx));

        service.log(
            AuditAction::TableSat,
            "reservation",
            "RES1",
            Some(1),
            Some("Owner".into()),
            serde_json::json!({ "table": 3 }),
        );

        drop(service);
        handle.await.unwrap();

        let entries = store.audit_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::TableSat);
        assert_eq!(entries[0].resource_id, "RES1");
    }
}
