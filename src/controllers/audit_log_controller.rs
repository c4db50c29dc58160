//! Consulta administrativa de la bitácora
//!
//! Listado paginado y filtrable, orden de timestamp descendente. Es
//! una capacidad de reporte: la bitácora solo se escribe desde
//! AuditLogger y nunca se modifica desde aquí.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::audit_log_dto::{AuditLogEntryResponse, AuditLogPageResponse, AuditLogQuery};
use crate::repositories::audit_log_repository::{AuditLogFilter, AuditLogRepository};
use crate::utils::errors::AppError;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;

pub struct AuditLogController {
    logs: AuditLogRepository,
}

/// Los filtros de fecha llegan como YYYY-MM-DD (o ISO con hora, de la
/// que solo cuenta el día). `end_of_day` cubre el día entero.
fn parse_day(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    let date_part = value.split('T').next()?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        date.and_hms_micro_opt(23, 59, 59, 999_999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(time.and_utc())
}

impl AuditLogController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            logs: AuditLogRepository::new(pool),
        }
    }

    pub async fn list(&self, query: AuditLogQuery) -> Result<AuditLogPageResponse, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        let mut filter = AuditLogFilter {
            username: query.user_username,
            action: query.action,
            entity_type: query.entity_type,
            ..Default::default()
        };

        if let Some(user_id) = &query.user_id {
            filter.user_id = Some(Uuid::parse_str(user_id).map_err(|_| {
                AppError::BadRequest("Invalid userId format. Must be a valid UUID.".to_string())
            })?);
        }
        if let Some(entity_id) = &query.entity_id {
            filter.entity_id = Some(Uuid::parse_str(entity_id).map_err(|_| {
                AppError::BadRequest("Invalid entityId format. Must be a valid UUID.".to_string())
            })?);
        }
        if let Some(start_date) = &query.start_date {
            filter.from = Some(parse_day(start_date, false).ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid startDate format. Use YYYY-MM-DD or ISO format e.g., YYYY-MM-DDTHH:MM:SSZ"
                        .to_string(),
                )
            })?);
        }
        if let Some(end_date) = &query.end_date {
            filter.to = Some(parse_day(end_date, true).ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid endDate format. Use YYYY-MM-DD or ISO format e.g., YYYY-MM-DDTHH:MM:SSZ"
                        .to_string(),
                )
            })?);
        }

        let total = self.logs.count(&filter).await?;
        let entries = self
            .logs
            .search(&filter, per_page, (page - 1) * per_page)
            .await?;

        Ok(AuditLogPageResponse {
            logs: entries
                .into_iter()
                .map(AuditLogEntryResponse::from)
                .collect(),
            page,
            per_page,
            total,
            total_pages: (total + per_page - 1) / per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_day_start() {
        let parsed = parse_day("2024-03-10", false).unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn test_parse_day_end_covers_whole_day() {
        let parsed = parse_day("2024-03-10", true).unwrap();
        assert_eq!(parsed.hour(), 23);
        assert_eq!(parsed.minute(), 59);
        assert_eq!(parsed.second(), 59);
    }

    #[test]
    fn test_parse_day_accepts_iso_datetime() {
        // De un ISO con hora solo cuenta la parte de fecha
        let parsed = parse_day("2024-03-10T15:30:00Z", false).unwrap();
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(parse_day("10/03/2024", false).is_none());
        assert!(parse_day("not-a-date", true).is_none());
    }
}
