use std::sync::{Arc, Mutex, OnceLock};

use axum::{extract::State, http::StatusCode, Json};
use sysinfo::System;
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::state::AppState;
use crate::ws::connctx;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Aggregate registry sizes, live connections and system stats
pub async fn diagnostics(
    State(app_state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticsResponse>) {
    let n_sessions = app_state.presence.active_session_count().await as u32;
    let n_presence = app_state.presence.entry_count().await as u32;
    let n_locks = app_state.locks.lock_count().await as u32;
    let n_roles = app_state.roles.entry_count().await as u32;
    let n_permission_sets = app_state.permissions.entry_count().await as u32;
    let n_history = app_state.history.entry_count().await as u32;
    let n_audit = app_state.audit.entry_count().await as u32;

    // Live WebSocket connections
    let n_conn = connctx::get_conn_ctx_cache().entry_count() as u32;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Sessions: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        n_conn,
        n_sessions
    );

    (
        StatusCode::OK,
        Json(DiagnosticsResponse {
            n_sessions,
            n_presence,
            n_locks,
            n_roles,
            n_permission_sets,
            n_history,
            n_audit,
            n_conn,
            cpu_usage,
            memory_alloc,
            memory_total,
            memory_free,
        }),
    )
}
