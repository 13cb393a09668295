use crate::schema::scrape_runs;
use chrono::{DateTime, Utc};
use common::types::{ParseScrapeStatusError, ScrapeRun, ScrapeStatus};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scrape_runs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScrapeRunRow {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub listings_scraped: Option<i32>,
    pub status: String,
    pub error_msg: Option<String>,
}

impl TryFrom<ScrapeRunRow> for ScrapeRun {
    type Error = ParseScrapeStatusError;

    fn try_from(row: ScrapeRunRow) -> Result<Self, Self::Error> {
        Ok(ScrapeRun {
            id: row.id,
            started_at: row.started_at,
            completed_at: row.completed_at,
            listings_scraped: row.listings_scraped,
            status: row.status.parse()?,
            error_msg: row.error_msg,
        })
    }
}

/// 成功した実行のうち完了時刻が最も新しいもの
pub fn latest_success(conn: &mut PgConnection) -> QueryResult<Option<ScrapeRunRow>> {
    scrape_runs::table
        .filter(scrape_runs::status.eq(ScrapeStatus::Success.as_str()))
        .order(scrape_runs::completed_at.desc().nulls_last())
        .select(ScrapeRunRow::as_select())
        .first(conn)
        .optional()
}
