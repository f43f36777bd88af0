// ==========================================
// 课表导入集成测试
// ==========================================
// 测试目标: 文件 → 候选记录 → 冲突标注 全流程（SQLite 快照）
// ==========================================


use class_schedule::api::{ApiError, ScheduleApi};
use class_schedule::config::config_keys;
use class_schedule::domain::types::Weekday;
use class_schedule::logging;
use chrono::NaiveTime;
use std::io::Write;
use test_helpers::{
    create_test_db, insert_config, insert_default_programs, insert_schedule,
    open_test_connection, write_csv_with_width, write_schedule_csv, write_schedule_xlsx, SheetRow,
};
use rust_xlsxwriter::{ExcelDateTime, Format};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn test_import_maps_clean_rows() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_default_programs(&conn).unwrap();

    let file = write_schedule_csv(&[
        SheetRow::new("01418111")
            .midterm("15/3/2566", "9:00", "12:00")
            .final_exam("", "13:00", "16:00"),
        SheetRow::new("01418112")
            .program("วิศวกรรมคอมพิวเตอร์")
            .day("Tuesday")
            .room("SC45", "102"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).expect("Failed to open api");
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.summary.problem_rows, 0);

    let first = &report.records[0];
    assert_eq!(first.course_id, "01418111");
    assert_eq!(first.program_id, 1);
    assert_eq!(first.room_key, "SC45101");
    assert_eq!(first.day, Some(Weekday::Monday));
    assert_eq!(first.start_time, Some(t(9, 0)));
    assert_eq!(first.row_number, 2);
    let midterm = first.midterm.as_ref().unwrap();
    assert_eq!(midterm.date, "2023-3-15");
    assert!(first.final_exam.is_none());

    let second = &report.records[1];
    assert_eq!(second.program_id, 2);
    assert_eq!(second.day, Some(Weekday::Tuesday));
    assert_eq!(second.room_key, "SC45102");
}

#[tokio::test]
async fn test_wrong_column_count_is_malformed() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ScheduleApi::open(&db_path).unwrap();

    for width in [28, 30] {
        let file = write_csv_with_width(width, &[SheetRow::new("01418111")]).unwrap();
        let result = api.read_table(&[file.path()]).await;

        match result {
            Err(ApiError::MalformedInput(msg)) => {
                assert!(msg.contains("wrong column layout"));
            }
            other => panic!("Expected MalformedInput, got {:?}", other.map(|r| r.records.len())),
        }
    }
}

#[tokio::test]
async fn test_non_spreadsheet_file_is_malformed() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ScheduleApi::open(&db_path).unwrap();

    let mut text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(text, "hello").unwrap();

    let result = api.read_table(&[text.path()]).await;
    assert!(matches!(result, Err(ApiError::MalformedInput(_))));
}

#[tokio::test]
async fn test_empty_course_rows_are_skipped() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let file = write_schedule_csv(&[
        SheetRow::new("01418111"),
        SheetRow::new(""),
        SheetRow::new("01418113").room("LH", "1"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    let ids: Vec<&str> = report.records.iter().map(|r| r.course_id.as_str()).collect();
    assert_eq!(ids, vec!["01418111", "01418113"]);
    assert_eq!(report.summary.total_rows, 3);
    assert_eq!(report.summary.skipped_rows, 1);
    assert_eq!(report.records[1].row_number, 4);
}

#[tokio::test]
async fn test_overlapping_rows_in_same_file() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let file = write_schedule_csv(&[
        SheetRow::new("01418111").time("9:00", "12:00"),
        SheetRow::new("01418112").time("11:00", "13:00"),
        SheetRow::new("01418113").time("12:00", "13:00"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert!(report.records[0].problems.is_empty());
    assert_eq!(
        report.records[1].problem_messages(),
        vec!["duplicate time with some row in excel"]
    );
    // 第三行与第二行重叠（12:00-13:00 vs 11:00-13:00）
    assert_eq!(
        report.records[2].problem_messages(),
        vec!["duplicate time with some row in excel"]
    );
    assert_eq!(report.summary.conflict_rows, 2);
}

#[tokio::test]
async fn test_overlap_with_committed_schedule() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_schedule(&conn, 42, "SC45101", "MONDAY", "11:00:00", "13:00:00").unwrap();
    insert_schedule(&conn, 43, "SC45101", "TUESDAY", "09:00:00", "12:00:00").unwrap();

    let file = write_schedule_csv(&[
        SheetRow::new("01418111").time("10:00", "11:30"),
        SheetRow::new("01418112").time("13:00", "14:00"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(
        report.records[0].problem_messages(),
        vec!["duplicate time with id:42"]
    );
    assert!(report.records[1].problems.is_empty());
}

#[tokio::test]
async fn test_import_is_repeatable() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_default_programs(&conn).unwrap();
    insert_schedule(&conn, 42, "SC45101", "MONDAY", "08:00:00", "09:30:00").unwrap();

    let file = write_schedule_csv(&[
        SheetRow::new("01418111"),
        SheetRow::new("01418112").time("10:00", "11:00"),
        SheetRow::new("01418113").day("??"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let first = api.read_table(&[file.path()]).await.unwrap();
    let second = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(first.records, second.records);
    assert_ne!(first.batch_id, second.batch_id);
}

#[tokio::test]
async fn test_bom_prefixed_csv() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let plain = write_schedule_csv(&[SheetRow::new("01418111")]).unwrap();
    let content = std::fs::read(plain.path()).unwrap();

    let mut with_bom = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    with_bom.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
    with_bom.write_all(&content).unwrap();
    with_bom.flush().unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[with_bom.path()]).await.unwrap();
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_config_overrides_layout_and_era() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::EXPECTED_COLUMNS, "30").unwrap();
    insert_config(&conn, config_keys::ERA_OFFSET, "0").unwrap();

    let file = write_csv_with_width(
        30,
        &[SheetRow::new("01418111").midterm("1/4/2024", "", "")],
    )
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].midterm.as_ref().unwrap().date, "2024-4-1");
}

#[tokio::test]
async fn test_row_problems_are_reported_not_fatal() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let file = write_schedule_csv(&[
        SheetRow::new("01418111").time("13:00", "9:00"),
        SheetRow::new("01418112").midterm("2566-03-15", "", ""),
        SheetRow::new("01418113").time("9:00", "13:00").room("LH", "2"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.summary.problem_rows, 2);
    assert!(report.records[0].problem_messages()[0].contains("not before"));
    assert!(report.records[1].problem_messages()[0].contains("invalid midterm date"));
    assert!(report.records[2].problems.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["records"][2]["type"], "บรรยาย");
    assert_eq!(json["records"][2]["start_time"], "09:00");
}

#[tokio::test]
async fn test_xlsx_numeric_times_drive_conflicts() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_schedule(&conn, 42, "SC45101", "MONDAY", "13:00:00", "14:00:00").unwrap();

    // 时刻按 H.MM 数值录入
    let file = write_schedule_xlsx(
        29,
        &[
            SheetRow::new("01418111").time("", ""),
            SheetRow::new("01418112").time("", ""),
        ],
        |ws| {
            ws.write_number(1, 11, 9.30)?;
            ws.write_number(1, 12, 13.00)?;
            ws.write_number(2, 11, 12.45)?;
            ws.write_number(2, 12, 13.30)?;
            Ok(())
        },
    )
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    let first = &report.records[0];
    assert_eq!(first.start_time, Some(t(9, 30)));
    assert_eq!(first.end_time, Some(t(13, 0)));
    // 13:00 结束与 42 的 13:00 开始相接，不冲突
    assert!(first.problems.is_empty());

    let second = &report.records[1];
    assert_eq!(second.start_time, Some(t(12, 45)));
    assert_eq!(second.end_time, Some(t(13, 30)));
    assert_eq!(second.problem_messages(), vec!["duplicate time with id:42"]);
}

#[tokio::test]
async fn test_xlsx_date_and_time_cells() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_default_programs(&conn).unwrap();

    let file = write_schedule_xlsx(
        29,
        &[SheetRow::new("01418111").time("", "")],
        |ws| {
            let clock = Format::new().set_num_format("hh:mm");
            let date = Format::new().set_num_format("d/m/yyyy");
            ws.write_datetime_with_format(1, 11, &ExcelDateTime::from_hms(9, 30, 0)?, &clock)?;
            ws.write_datetime_with_format(1, 12, &ExcelDateTime::from_hms(12, 0, 0)?, &clock)?;
            ws.write_datetime_with_format(1, 17, &ExcelDateTime::from_ymd(2023, 3, 15)?, &date)?;
            ws.write_datetime_with_format(1, 18, &ExcelDateTime::from_hms(9, 0, 0)?, &clock)?;
            ws.write_number(1, 19, 12.00)?;
            Ok(())
        },
    )
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert!(record.problems.is_empty(), "{:?}", record.problem_messages());
    assert_eq!(record.program_id, 1);
    assert_eq!(record.start_time, Some(t(9, 30)));
    assert_eq!(record.end_time, Some(t(12, 0)));

    let midterm = record.midterm.as_ref().unwrap();
    assert_eq!(midterm.date, "2023-3-15");
    assert_eq!(midterm.start_time, Some(t(9, 0)));
    assert_eq!(midterm.end_time, Some(t(12, 0)));
}

#[tokio::test]
async fn test_xlsx_out_of_range_minutes_are_row_problems() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let file = write_schedule_xlsx(29, &[SheetRow::new("01418111").time("", "12:00")], |ws| {
        ws.write_number(1, 11, 9.75)?;
        Ok(())
    })
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records[0].start_time, None);
    assert_eq!(
        report.records[0].problem_messages(),
        vec!["invalid start time: 9.75"]
    );
}

#[tokio::test]
async fn test_single_digit_minutes_are_row_problems() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let file = write_schedule_csv(&[SheetRow::new("01418111").time("9.3", "12.00")]).unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records[0].start_time, None);
    assert_eq!(report.records[0].end_time, Some(t(12, 0)));
    assert_eq!(
        report.records[0].problem_messages(),
        vec!["invalid start time: 9.3"]
    );
}

#[tokio::test]
async fn test_xlsx_wrong_column_count_is_malformed() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ScheduleApi::open(&db_path).unwrap();

    for width in [28u16, 30] {
        let file = write_schedule_xlsx(width, &[SheetRow::new("01418111")], |_| Ok(())).unwrap();
        let result = api.read_table(&[file.path()]).await;
        assert!(matches!(result, Err(ApiError::MalformedInput(_))));
    }
}

#[tokio::test]
async fn test_cells_are_trimmed_before_lookup() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_default_programs(&conn).unwrap();

    let file = write_schedule_csv(&[
        SheetRow::new(" 01418111 ").program("  วิศวกรรมคอมพิวเตอร์ "),
        SheetRow::new("   ").room("LH", "1"),
    ])
    .unwrap();

    let api = ScheduleApi::open(&db_path).unwrap();
    let report = api.read_table(&[file.path()]).await.unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].course_id, "01418111");
    assert_eq!(report.records[0].program_id, 2);
    assert_eq!(report.summary.skipped_rows, 1);
}
