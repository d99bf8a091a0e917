//! CSV 读写共享逻辑
//!
//! 上传表使用俄文表头，内部统一用英文列名；报表输出端把聚合结果
//! 写成带表头的 CSV 文件。

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::errors::{BannerlinkerError, Result};
use crate::report::aggregate::ReportTable;
use crate::services::Record;

/// 上传表头 → 内部列名
pub const COLUMN_RENAMES: [(&str, &str); 7] = [
    ("Ссылка", "link"),
    ("Канал", "channel"),
    ("Партнёр", "partner"),
    ("Тип публикации", "publication_type"),
    ("Название публикации", "description"),
    ("Тип партнёра", "partner_type"),
    ("Техническая ссылка", "is_technical"),
];

fn internal_column_name(header: &str) -> String {
    COLUMN_RENAMES
        .iter()
        .find(|(display, _)| *display == header.trim())
        .map(|(_, internal)| internal.to_string())
        .unwrap_or_else(|| header.trim().to_string())
}

/// Read an uploaded banner-links CSV into records, renaming display headers
/// to internal column names. Rows with every cell empty are dropped.
pub fn read_input_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let file = File::open(path.as_ref())
        .map_err(|e| BannerlinkerError::file_operation(format!("Failed to open file: {}", e)))?;
    let reader = BufReader::new(file);
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| BannerlinkerError::cant_parse_file(e.to_string()))?
        .iter()
        .map(internal_column_name)
        .collect();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(|e| BannerlinkerError::cant_parse_file(e.to_string()))?;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let mut record: Record = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            record.insert(
                header.clone(),
                row.get(idx).unwrap_or_default().to_string(),
            );
        }
        records.push(record);
    }

    Ok(records)
}

/// 把报表写成 CSV 文件（带表头）
pub fn write_table<P: AsRef<Path>>(table: &ReportTable, path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|e| BannerlinkerError::file_operation(format!("Failed to create file: {}", e)))?;
    let writer = BufWriter::new(file);
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(&table.header)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }

    csv_writer
        .flush()
        .map_err(|e| BannerlinkerError::file_operation(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_input_csv_renames_headers() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            "Ссылка,Канал,Партнёр,Тип публикации,Название публикации,Тип партнёра,Техническая ссылка"
        )
        .unwrap();
        writeln!(
            temp_file,
            "https://example.com/course,ВК,Сириус,пост,Анонс курса,,нет"
        )
        .unwrap();

        let records = read_input_csv(temp_file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["link"], "https://example.com/course");
        assert_eq!(records[0]["channel"], "ВК");
        assert_eq!(records[0]["publication_type"], "пост");
        assert_eq!(records[0]["partner_type"], "");
    }

    #[test]
    fn test_read_input_csv_drops_empty_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Ссылка,Канал").unwrap();
        writeln!(temp_file, ",").unwrap();
        writeln!(temp_file, "https://example.com,Сайт").unwrap();

        let records = read_input_csv(temp_file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["channel"], "Сайт");
    }

    #[test]
    fn test_write_table_roundtrip() {
        let table = ReportTable {
            header: vec!["id".to_string(), "Переходы".to_string()],
            rows: vec![
                vec!["1".to_string(), "200".to_string()],
                vec!["Итог".to_string(), "200".to_string()],
            ],
        };

        let temp_file = NamedTempFile::new().unwrap();
        write_table(&table, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "id,Переходы");
        assert_eq!(lines.next().unwrap(), "1,200");
        assert_eq!(lines.next().unwrap(), "Итог,200");
    }
}
