//! Report table layout.
//!
//! Takes the queried funnel rows plus the totals row and lays out the
//! final export table: caption enrichment, display dates, sorting,
//! conversion columns and the trailing totals line.

use chrono::{DateTime, Utc};

use crate::report::parsing;
use crate::utils::time::format_report_date;

/// 报表表头（与上传端的列名改写保持一致）
pub const REPORT_HEADER: [&str; 13] = [
    "id",
    "Ссылка",
    "Канал",
    "Партнёр",
    "Тип партнёра",
    "Тип публикации",
    "Фактическая дата публикации",
    "Название публикации",
    "Переходы",
    "Регистрации",
    "Активные",
    "Переходы -> Регистрации",
    "Регистрации -> Активные",
];

/// One funnel row as queried, before layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunnelRow {
    pub id: String,
    pub link: String,
    pub channel: String,
    pub partner: String,
    pub partner_type: String,
    pub publication_type: String,
    pub fact_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub clicks: i64,
    pub regs: i64,
    pub active: i64,
}

/// Final table, ready for CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Percentage conversion, rounded half-to-even. Zero denominator gives
/// zero.
pub fn conversion_pct(numer: i64, denom: i64) -> i64 {
    if denom == 0 {
        return 0;
    }
    let pct = numer as f64 / denom as f64 * 100.0;
    let floor = pct.floor();
    // .5 取偶数，和历史报表的输出保持一致
    if pct - floor == 0.5 {
        let low = floor as i64;
        if low % 2 == 0 { low } else { low + 1 }
    } else {
        pct.round() as i64
    }
}

fn layout_row(row: &FunnelRow, display_date: &str) -> Vec<String> {
    vec![
        row.id.clone(),
        row.link.clone(),
        row.channel.clone(),
        row.partner.clone(),
        row.partner_type.clone(),
        row.publication_type.clone(),
        display_date.to_string(),
        row.title.clone(),
        row.clicks.to_string(),
        row.regs.to_string(),
        row.active.to_string(),
        conversion_pct(row.regs, row.clicks).to_string(),
        conversion_pct(row.active, row.regs).to_string(),
    ]
}

/// Build the export table.
///
/// Rows are sorted by the display date string (empty dates first); the
/// totals row always closes the table, with its own conversions.
pub fn build_report(mut rows: Vec<FunnelRow>, total: FunnelRow) -> ReportTable {
    for row in rows.iter_mut() {
        parsing::apply(row);
    }

    let mut dated: Vec<(String, FunnelRow)> = rows
        .into_iter()
        .map(|row| {
            let display_date = row
                .fact_publication_date
                .as_ref()
                .map(format_report_date)
                .unwrap_or_default();
            (display_date, row)
        })
        .collect();
    dated.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out: Vec<Vec<String>> = dated
        .iter()
        .map(|(display_date, row)| layout_row(row, display_date))
        .collect();
    out.push(layout_row(&total, ""));

    ReportTable {
        header: REPORT_HEADER.iter().map(|s| s.to_string()).collect(),
        rows: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(id: &str, date: Option<DateTime<Utc>>, clicks: i64, regs: i64, active: i64) -> FunnelRow {
        FunnelRow {
            id: id.to_string(),
            link: format!("https://example.com/{}", id),
            channel: "ВК".to_string(),
            partner: "Сириус".to_string(),
            partner_type: "внутренний".to_string(),
            publication_type: "пост".to_string(),
            fact_publication_date: date,
            title: "Анонс".to_string(),
            clicks,
            regs,
            active,
        }
    }

    fn total(clicks: i64, regs: i64, active: i64) -> FunnelRow {
        FunnelRow {
            id: "Итог".to_string(),
            clicks,
            regs,
            active,
            ..Default::default()
        }
    }

    #[test]
    fn test_conversion_pct() {
        assert_eq!(conversion_pct(50, 200), 25);
        assert_eq!(conversion_pct(1, 3), 33);
        assert_eq!(conversion_pct(10, 0), 0);
        assert_eq!(conversion_pct(0, 10), 0);
    }

    #[test]
    fn test_conversion_pct_rounds_ties_to_even() {
        // 12.5 -> 12, 37.5 -> 38, 62.5 -> 62
        assert_eq!(conversion_pct(1, 8), 12);
        assert_eq!(conversion_pct(3, 8), 38);
        assert_eq!(conversion_pct(5, 8), 62);
        assert_eq!(conversion_pct(1, 2), 50);
    }

    #[test]
    fn test_empty_dates_sort_first_and_total_is_last() {
        let d1 = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap();
        let d2 = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let table = build_report(
            vec![
                row("2", Some(d2), 10, 5, 1),
                row("1", Some(d1), 20, 4, 2),
                row("3", None, 0, 0, 0),
            ],
            total(30, 9, 3),
        );

        let ids: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2", "Итог"]);
        assert_eq!(table.rows[0][6], "");
        assert_eq!(table.rows[1][6], "01.02.2024");
    }

    #[test]
    fn test_date_sort_is_lexicographic_on_display_format() {
        // 05.03 排在 10.02 之前：按字符串而不是按日期排序
        let feb = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        let table = build_report(
            vec![row("feb", Some(feb), 1, 0, 0), row("mar", Some(mar), 1, 0, 0)],
            total(2, 0, 0),
        );
        let ids: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(ids, vec!["mar", "feb", "Итог"]);
    }

    #[test]
    fn test_total_row_has_conversions() {
        let table = build_report(Vec::new(), total(200, 50, 25));
        let last = table.rows.last().unwrap();
        assert_eq!(last[0], "Итог");
        assert_eq!(last[11], "25");
        assert_eq!(last[12], "50");
    }

    #[test]
    fn test_legacy_caption_enriches_row() {
        let mut legacy = row("9", None, 5, 1, 0);
        legacy.channel = String::new();
        legacy.partner = String::new();
        legacy.partner_type = String::new();
        legacy.publication_type = String::new();
        legacy.title = "Соцсеть: Дзен. Паблик/профиль: Грамота.ру. Тип публикации: статья. \
                        Дата публикации: 2024-01-05. Название публикации: Разбор."
            .to_string();

        let table = build_report(vec![legacy], total(5, 1, 0));
        let first = &table.rows[0];
        assert_eq!(first[2], "Дзен");
        assert_eq!(first[3], "Грамота.ру");
        assert_eq!(first[4], "внутренний");
        assert_eq!(first[7], "Разбор");
    }

    #[test]
    fn test_header_shape() {
        let table = build_report(Vec::new(), total(0, 0, 0));
        assert_eq!(table.header.len(), 13);
        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0].len() == table.header.len());
    }
}
