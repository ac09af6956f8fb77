//! Call log routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{CallLog, CallType};
use serde::Serialize;

use crate::error::Result;
use crate::routes::LimitQuery;
use crate::state::AppState;

/// Call counts and talk time for a child.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct CallStats {
    pub total: i64,
    pub incoming: i64,
    pub outgoing: i64,
    pub missed: i64,
    pub rejected: i64,
    /// Total talk time in seconds.
    pub total_duration: i64,
}

impl CallStats {
    fn from_counts(counts: &[(CallType, i64)], total_duration: i64) -> Self {
        let mut stats = CallStats {
            total_duration,
            ..Default::default()
        };
        for (call_type, count) in counts {
            match call_type {
                CallType::Incoming => stats.incoming = *count,
                CallType::Outgoing => stats.outgoing = *count,
                CallType::Missed => stats.missed = *count,
                CallType::Rejected => stats.rejected = *count,
            }
            stats.total += count;
        }
        stats
    }
}

/// List a child's calls, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Query(limit): Query<LimitQuery>,
) -> Result<Json<Vec<CallLog>>> {
    let child = state.owned_child(&child_id).await?;
    let calls = database::call_log::list_calls(state.db.pool(), &child.id, limit.resolve()?).await?;
    Ok(Json(calls))
}

/// Call statistics for a child.
pub async fn stats_api(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> Result<Json<CallStats>> {
    let child = state.owned_child(&child_id).await?;
    let pool = state.db.pool();

    let counts = database::call_log::count_calls_by_type(pool, &child.id).await?;
    let total_duration = database::call_log::total_duration(pool, &child.id).await?;

    Ok(Json(CallStats::from_counts(&counts, total_duration)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{add_child, test_state, PARENT};

    #[tokio::test]
    async fn test_calls_and_stats() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;
        let pool = state.db.pool();

        for (call_type, duration, at) in [
            (CallType::Incoming, 120, "2024-05-01 08:00:00"),
            (CallType::Outgoing, 45, "2024-05-01 09:00:00"),
            (CallType::Missed, 0, "2024-05-01 10:00:00"),
            (CallType::Incoming, 30, "2024-05-01 11:00:00"),
        ] {
            database::call_log::record_call(pool, &child, "+6281234567890", call_type, duration, Some(at))
                .await
                .unwrap();
        }

        let Json(calls) = list_api(State(state.clone()), Path(child.clone()), Query(LimitQuery::default()))
            .await
            .unwrap();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0].timestamp, "2024-05-01 11:00:00");

        let Json(stats) = stats_api(State(state), Path(child)).await.unwrap();
        assert_eq!(
            stats,
            CallStats {
                total: 4,
                incoming: 2,
                outgoing: 1,
                missed: 1,
                rejected: 0,
                total_duration: 195,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_without_calls() {
        let state = test_state().await;
        let child = add_child(&state, PARENT, "Ayu").await;
        let Json(stats) = stats_api(State(state), Path(child)).await.unwrap();
        assert_eq!(stats, CallStats::default());
    }
}
