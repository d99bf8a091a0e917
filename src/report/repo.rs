//! Funnel report queries.
//!
//! Raw SQL over the analytics warehouse. Two statements: one row per
//! clicked banner with its click/registration/activity counts, plus one
//! totals row over the whole range. Excluded users are filtered out of
//! every stage.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::errors::{BannerlinkerError, Result};
use crate::report::aggregate::FunnelRow;
use crate::report::task::QueryEngine;
use crate::utils::time::msk_offset;

/// 报表日期格式（上报端与展示端一致）
const REPORT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Half-open UTC time range, `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Parse the display-format dates of a report request. Both dates are
    /// Moscow calendar days; the end day is included in the range.
    pub fn from_report_dates(from_date: &str, to_date: &str) -> Result<Self> {
        let parse = |value: &str| -> Result<NaiveDate> {
            NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).map_err(|e| {
                BannerlinkerError::report_query(format!("Bad report date \"{}\": {}", value, e))
            })
        };

        let from_day = parse(from_date)?;
        let to_day = parse(to_date)?;
        if to_day < from_day {
            return Err(BannerlinkerError::report_query(format!(
                "Report range is inverted: {} > {}",
                from_date, to_date
            )));
        }

        let offset = msk_offset();
        let msk_midnight = |day: NaiveDate| {
            let local = day.and_hms_opt(0, 0, 0).expect("midnight is valid");
            offset
                .from_local_datetime(&local)
                .single()
                .expect("fixed offset has no gaps")
                .with_timezone(&Utc)
        };

        Ok(Self {
            from: msk_midnight(from_day),
            to: msk_midnight(to_day) + Duration::days(1),
        })
    }

    /// Render the range as a SQL predicate over `column`.
    pub fn as_sql(&self, column: &str) -> String {
        format!(
            "{col} >= '{from}' and {col} < '{to}'",
            col = column,
            from = self.from.format("%Y-%m-%d %H:%M:%S%z"),
            to = self.to.format("%Y-%m-%d %H:%M:%S%z"),
        )
    }
}

/// Per-banner funnel query.
pub fn funnel_query(tr: &TimeRange) -> String {
    format!(
        r#"with excluded as (
    select user_id from analytics.excluded_course_students
    union
    select user_id from stat.excluded_users
),
clicked_banners as (
    select distinct banner_id
    from noopolis.metrics_banner_click
    where {clicks_range}
),
banners_new as (
    select
        blm.banner_id,
        blm.link,
        blm.title,
        blm.publication_type,
        blm.channel,
        blm.partner,
        blm.is_outer as partner_type,
        blm.time_created
    from analytics.banner_links_media blm
    where banner_id in (select banner_id from clicked_banners)
      and not blm.is_deleted
),
banners_old as (
    select
        mb.id as banner_id,
        mb.link_reference as link,
        mb.description as title,
        null::text as publication_type,
        null::text as channel,
        null::text as partner,
        null::boolean as partner_type,
        mb.time_created
    from noopolis.metrics_banner mb
    where id in (select banner_id from clicked_banners)
      and mb.type = 'link'
      and mb.description like 'Соцсеть:%'
),
banners as (
    select * from banners_new
    union all
    select o.*
    from banners_old o
    where not exists (
        select 1 from banners_new n where n.banner_id = o.banner_id
    )
),
banner_clicks_ordered as (
    select
        m.banner_id,
        m.time_follow,
        row_number() over (partition by m.banner_id order by m.time_follow asc) as rnk
    from noopolis.metrics_banner_click m
    where m.banner_id in (select banner_id from banners)
      and {m_clicks_range}
),
fact_pub_date as (
    select banner_id, time_follow as fact_publication_date
    from banner_clicks_ordered
    where rnk = 5
),
clicks as (
    select
        coalesce(user_id, 0) as user_id,
        banner_id,
        time_follow
    from noopolis.metrics_banner_click
    where banner_id in (select banner_id from banners)
      and {clicks_range}
      and coalesce(user_id, 0) not in (select user_id from excluded)
),
cnt_clicks as (
    select banner_id, count(*) as clicks
    from clicks
    group by banner_id
),
regs as (
    select
        ucp.user_id,
        ucp.course_id,
        ucp.id,
        c.banner_id
    from clicks c
        join noopolis.user_course_progress ucp
          on c.user_id = ucp.user_id
    where ucp.time_created > c.time_follow
      and (ucp.time_created - c.time_follow) <= interval '30 minutes'
      and ucp.user_id not in (select user_id from excluded)
),
cnt_regs as (
    select banner_id, count(distinct id) as regs
    from regs
    group by banner_id
),
active as (
    select
        ump.user_id,
        ump.course_id,
        ump.id,
        r.banner_id
    from regs r
        join noopolis.user_module_progress ump
          on ump.course_progress_id = r.id
        join noopolis.course_module cm
          on cm.id = ump.course_module_id
    where cm.type = 'ordinary'
      and cm.level = 1
      and not cm.is_deleted
      and not ump.is_deleted
      and ump.is_achieved = true
      and (ump.is_available or ump.time_updated is not null)
      and r.user_id not in (select user_id from excluded)
),
cnt_active as (
    select banner_id, count(distinct (user_id, course_id)) as active
    from active
    group by banner_id
)
select
    b.banner_id as id,
    b.link,
    b.channel,
    b.partner,
    b.partner_type,
    b.publication_type,
    fp.fact_publication_date,
    b.title,
    coalesce(c.clicks, 0) as clicks,
    coalesce(r.regs, 0) as regs,
    coalesce(a.active, 0) as active
from banners b
    left join fact_pub_date fp on fp.banner_id = b.banner_id
    left join cnt_clicks c on c.banner_id = b.banner_id
    left join cnt_regs r on r.banner_id = b.banner_id
    left join cnt_active a on a.banner_id = b.banner_id"#,
        clicks_range = tr.as_sql("time_follow"),
        m_clicks_range = tr.as_sql("m.time_follow"),
    )
}

/// Totals query over the whole range, ignoring banner attribution.
pub fn totals_query(tr: &TimeRange) -> String {
    format!(
        r#"with excluded as (
    select user_id from analytics.excluded_course_students
    union
    select user_id from stat.excluded_users
),
clicks as (
    select
        coalesce(user_id, 0) as user_id,
        time_follow
    from noopolis.metrics_banner_click
    where {clicks_range}
      and coalesce(user_id, 0) not in (select user_id from excluded)
),
total_clicks as (
    select count(*) as total_clicks from clicks
),
regs as (
    select
        ucp.id,
        ucp.user_id,
        ucp.course_id
    from clicks c
        join noopolis.user_course_progress ucp
          on c.user_id = ucp.user_id
    where ucp.time_created > c.time_follow
      and (ucp.time_created - c.time_follow) <= interval '30 minutes'
      and ucp.user_id not in (select user_id from excluded)
),
total_regs as (
    select count(distinct id) as total_regs from regs
),
active as (
    select
        r.id,
        ump.user_id,
        ump.course_id
    from regs r
        join noopolis.user_module_progress ump
          on ump.course_progress_id = r.id
        join noopolis.course_module cm
          on cm.id = ump.course_module_id
    where cm.type = 'ordinary'
      and cm.level = 1
      and not cm.is_deleted
      and not ump.is_deleted
      and ump.is_achieved = true
      and (ump.is_available or ump.time_updated is not null)
      and r.user_id not in (select user_id from excluded)
),
total_active as (
    select count(distinct id) as total_active from active
)
select
    'Итог' as id,
    (select total_clicks from total_clicks) as clicks,
    (select total_regs from total_regs) as regs,
    (select total_active from total_active) as active"#,
        clicks_range = tr.as_sql("time_follow"),
    )
}

pub struct SeaOrmQueryEngine {
    db: DatabaseConnection,
}

impl SeaOrmQueryEngine {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn wrap(e: sea_orm::DbErr) -> BannerlinkerError {
        BannerlinkerError::report_query(e.to_string())
    }
}

#[async_trait]
impl QueryEngine for SeaOrmQueryEngine {
    async fn funnel_rows(&self, tr: &TimeRange) -> Result<Vec<FunnelRow>> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, funnel_query(tr));
        let rows = self.db.query_all_raw(stmt).await.map_err(Self::wrap)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            // 老横幅的维度列都是 null
            let partner_type = match row
                .try_get::<Option<bool>>("", "partner_type")
                .map_err(Self::wrap)?
            {
                Some(true) => "внешний".to_string(),
                Some(false) => "внутренний".to_string(),
                None => String::new(),
            };

            let text =
                |col: &str| -> Result<String> {
                    Ok(row
                        .try_get::<Option<String>>("", col)
                        .map_err(Self::wrap)?
                        .unwrap_or_default())
                };

            out.push(FunnelRow {
                id: row.try_get::<i64>("", "id").map_err(Self::wrap)?.to_string(),
                link: text("link")?,
                channel: text("channel")?,
                partner: text("partner")?,
                partner_type,
                publication_type: text("publication_type")?,
                fact_publication_date: row
                    .try_get::<Option<DateTime<Utc>>>("", "fact_publication_date")
                    .map_err(Self::wrap)?,
                title: text("title")?,
                clicks: row.try_get::<i64>("", "clicks").map_err(Self::wrap)?,
                regs: row.try_get::<i64>("", "regs").map_err(Self::wrap)?,
                active: row.try_get::<i64>("", "active").map_err(Self::wrap)?,
            });
        }

        Ok(out)
    }

    async fn funnel_totals(&self, tr: &TimeRange) -> Result<FunnelRow> {
        let stmt = Statement::from_string(DatabaseBackend::Postgres, totals_query(tr));
        let row = self
            .db
            .query_one_raw(stmt)
            .await
            .map_err(Self::wrap)?
            .ok_or_else(|| BannerlinkerError::report_query("totals query returned no row"))?;

        Ok(FunnelRow {
            id: row.try_get::<String>("", "id").map_err(Self::wrap)?,
            clicks: row.try_get::<i64>("", "clicks").map_err(Self::wrap)?,
            regs: row.try_get::<i64>("", "regs").map_err(Self::wrap)?,
            active: row.try_get::<i64>("", "active").map_err(Self::wrap)?,
            ..Default::default()
        })
    }
}
