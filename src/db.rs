// ==========================================
// 制衣生产跟踪系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表: 每张表对应一个文档集合（标量键列 + JSON 文档列）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema
///
/// 嵌套数组字段（工序实例、日产量条目、订单产品列表、尺码产能表）
/// 统一以 JSON 文档列存储，按键查询走标量列。
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- 款式: 款名 → 有序工序列表
        CREATE TABLE IF NOT EXISTS styles (
            style_name      TEXT PRIMARY KEY,
            processes_json  TEXT NOT NULL,
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 产能表: 工序名 → 尺码产能列表 (null 产能 = 已知缺口)
        CREATE TABLE IF NOT EXISTS production_rates (
            process_name    TEXT PRIMARY KEY,
            sizes_json      TEXT NOT NULL,
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 产品: 订单内一条款式/尺码/颜色行项
        CREATE TABLE IF NOT EXISTS products (
            product_id      TEXT PRIMARY KEY,
            sr_no           TEXT NOT NULL,
            buyer           TEXT NOT NULL DEFAULT '',
            buyer_po        TEXT NOT NULL DEFAULT '',
            color           TEXT NOT NULL DEFAULT '',
            image           TEXT,
            ex_factory_date TEXT,
            style_name      TEXT NOT NULL,
            size            TEXT NOT NULL,
            quantity        INTEGER NOT NULL DEFAULT 0,
            completed       INTEGER NOT NULL DEFAULT 0,
            processes_json  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_sr_no ON products(sr_no);
        CREATE INDEX IF NOT EXISTS idx_products_style_name ON products(style_name);
        CREATE INDEX IF NOT EXISTS idx_products_size ON products(size);

        -- 订单: 同一 sr_no 下的产品分组
        CREATE TABLE IF NOT EXISTS orders (
            order_id        TEXT PRIMARY KEY,
            sr_no           TEXT NOT NULL UNIQUE,
            buyer           TEXT NOT NULL DEFAULT '',
            buyer_po        TEXT NOT NULL DEFAULT '',
            ex_factory_date TEXT,
            week            INTEGER,
            completed       INTEGER NOT NULL DEFAULT 0,
            products_json   TEXT NOT NULL
        );

        -- 买家名录: insert-if-absent
        CREATE TABLE IF NOT EXISTS buyers (
            name            TEXT PRIMARY KEY,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 用户: 鉴权闸口的最小主体记录 (凭证单独存 auth_tokens)
        CREATE TABLE IF NOT EXISTS users (
            user_id         TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            user_type       TEXT NOT NULL
        );

        -- 凭证: bearer token → 用户 (闸口第一跳)
        CREATE TABLE IF NOT EXISTS auth_tokens (
            token           TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            issued_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- 待定款式暂存区: 按导入批次隔离 (batch_id 作用域)
        CREATE TABLE IF NOT EXISTS pending_imports (
            pending_id      TEXT PRIMARY KEY,
            batch_id        TEXT NOT NULL,
            style_name      TEXT NOT NULL,
            product_json    TEXT NOT NULL,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pending_imports_batch ON pending_imports(batch_id);
        "#,
    )?;
    Ok(())
}

/// 打开连接并确保 schema 就绪（应用启动入口）
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
