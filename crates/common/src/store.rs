use crate::Result;
use crate::types::{
    GeocodedLocation, Listing, ListingFilter, ListingPage, ListingQuery, LocationSummary, Page,
    ScrapeRun,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// 物件データストアへの読み取り専用アクセス
///
/// 予測モデルはこのトレイトを使わない。画面側がライブデータを補うためだけに使う。
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// 成功した最新のスクレイプ実行
    async fn latest_run(&self) -> Result<Option<ScrapeRun>>;

    /// 集計日の新しい順、同日内は affordability_rank の昇順
    async fn recent_summaries(
        &self,
        filter: ListingFilter,
        limit: i64,
    ) -> Result<Vec<LocationSummary>>;

    /// `since` 以降の地域集計を日付の古い順で返す
    async fn location_trend(
        &self,
        location: &str,
        filter: ListingFilter,
        since: NaiveDate,
    ) -> Result<Vec<LocationSummary>>;

    /// お買い得フラグ付きの物件を新しい順に
    async fn deals(&self, page: Page) -> Result<Vec<Listing>>;

    /// 条件で絞り込んだ物件と、ページングなしの総件数
    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage>;

    async fn geocodes(&self, locations: &[String]) -> Result<Vec<GeocodedLocation>>;

    /// 掲載元サイトの数。集計できなかった場合は `None`
    async fn count_distinct_sources(&self) -> Result<Option<i64>>;
}

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
