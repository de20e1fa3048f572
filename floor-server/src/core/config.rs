/// 前厅核心配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/floor | 工作目录（日志等） |
/// | TABLE_COUNT | 10 | 桌台数量 (1..=N) |
/// | FOLLOW_UP_HOUR | 9 | 回访消息本地发送小时 |
/// | FOLLOW_UP_TICK_SECS | 60 | 回访调度器轮询间隔（秒） |
/// | AUDIT_BUFFER | 256 | 审计通道容量 |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 事件广播通道容量 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/floor FOLLOW_UP_HOUR=10 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储日志等文件
    pub work_dir: String,
    /// 桌台数量（编号 1..=table_count）
    pub table_count: u8,
    /// 回访消息发送的本地小时（0-23）
    pub follow_up_hour: u32,
    /// 回访调度器轮询间隔（秒）
    pub follow_up_tick_secs: u64,
    /// 审计日志通道容量
    pub audit_buffer: usize,
    /// 事件广播通道容量
    pub event_channel_capacity: usize,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 读取 `.env` 后从环境变量加载配置
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/floor".into()),
            table_count: std::env::var("TABLE_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            follow_up_hour: std::env::var("FOLLOW_UP_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(9),
            follow_up_tick_secs: std::env::var("FOLLOW_UP_TICK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            audit_buffer: std::env::var("AUDIT_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/floor".into(),
            table_count: 10,
            follow_up_hour: 9,
            follow_up_tick_secs: 60,
            audit_buffer: 256,
            event_channel_capacity: 1024,
            environment: "development".into(),
        }
    }
}
