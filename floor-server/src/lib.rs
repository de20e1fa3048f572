//! Floor Server - 场馆前厅协调核心
//!
//! # 架构概述
//!
//! This crate is the front-of-house core for a venue: member-to-staff
//! messaging, reservation intake, and table seating. It is a pure state
//! and logic layer — hosts embed it in-process and render the stores
//! themselves; no wire protocol is defined here.
//!
//! - **消息路由** (`threads`): thread store, visibility engine, keyword
//!   auto-classification, move/retag operations
//! - **预订生命周期** (`reservations`): pending → confirmed → sat state
//!   machine with staged table selection and seat-commit conflict checks
//! - **销售流水线** (`sales`): calendar stamping, member notifications,
//!   thread mirroring on seat/comp events
//! - **回访调度** (`followup`): recovery-safe next-morning follow-up jobs
//! - **审计** (`audit`): append-only, never-blocking audit trail
//!
//! # 模块结构
//!
//! ```text
//! floor-server/src/
//! ├── core/          # 配置、状态
//! ├── roster/        # 会员、员工、推广员名册
//! ├── threads/       # 消息线程 + 路由引擎
//! ├── reservations/  # 预订状态机 + 桌台视图
//! ├── sales/         # 销售与通知流水线
//! ├── followup/      # 9AM 回访调度器
//! ├── audit/         # 审计日志
//! ├── db/            # 持久化边界 (trait)
//! └── utils/         # 日志工具
//! ```
//!
//! # Data Flow
//!
//! 1. Member or staff action reaches a manager (`threads`, `reservations`)
//! 2. The manager validates and mutates the in-memory store (the session's
//!    source of truth) under its writer lock
//! 3. The sale pipeline fans out calendar + message + routing side effects
//! 4. A domain event is broadcast; persistence is fire-and-forget
//! 5. The host re-reads the stores to render

pub mod audit;
pub mod core;
pub mod db;
pub mod followup;
pub mod reservations;
pub mod roster;
pub mod sales;
pub mod threads;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, VenueState};
pub use audit::{AuditAction, AuditService};
pub use db::{DurableStore, MemoryStore, Persist};
pub use followup::FollowUpScheduler;
pub use reservations::{FloorPlan, ReservationError, ReservationsManager, TableStatus};
pub use roster::RosterStore;
pub use sales::{SalePipeline, SalesLog};
pub use threads::{RoutingError, ThreadStore, ThreadsManager};

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
