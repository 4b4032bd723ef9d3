//! CSV adapters: roster import and the two exports.
//!
//! The import reads header-keyed rows and passes them through unchanged;
//! rows with missing columns decode with empty strings and columns the roster
//! does not use are ignored. Only an unreadable file or a missing header line
//! is rejected.

use crate::error::CheckinError;
use crate::manager::Manager;
use common::model::attendance::AttendanceRecord;
use common::model::roster::{RosterEntry, RosterRow};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use std::io::Read;

const ROSTER_EXPORT_HEADER: [&str; 5] = [
    "ID",
    "Patient Name",
    "Hospital Name",
    "Major",
    "QR Code URL",
];
const ATTENDANCE_EXPORT_HEADER: [&str; 6] = [
    "ID",
    "Patient Name",
    "Hospital Name",
    "Major",
    "Status",
    "Time",
];

/// A roster needs a header line naming at least one column. Unknown columns
/// are ignored.
fn check_header_line(headers: &StringRecord) -> Result<(), CheckinError> {
    if headers.iter().all(str::is_empty) {
        return Err(CheckinError::Input("CSV file has no header line".to_string()));
    }
    Ok(())
}

/// Positions of the roster columns within the header line.
struct Columns {
    id: Option<usize>,
    patient_name: Option<usize>,
    hospital_name: Option<usize>,
    major: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Columns {
            id: find("id"),
            patient_name: find("patient_name"),
            hospital_name: find("hospital_name"),
            major: find("major"),
        }
    }

    fn row(&self, record: &StringRecord) -> RosterRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        RosterRow {
            id: cell(self.id),
            patient_name: cell(self.patient_name),
            hospital_name: cell(self.hospital_name),
            major: cell(self.major),
        }
    }
}

fn parse_failed(err: csv::Error) -> CheckinError {
    CheckinError::Input(format!("Error parsing CSV: {err}"))
}

/// Decodes roster rows from CSV with a header line.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<RosterRow>, CheckinError> {
    let mut csv = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = csv.headers().map_err(parse_failed)?.clone();
    check_header_line(&headers)?;
    let columns = Columns::locate(&headers);

    csv.records()
        .map(|record| record.map(|r| columns.row(&r)).map_err(parse_failed))
        .collect()
}

/// Roster export: one line per entry with the URL its code encodes.
pub fn write_roster_codes(
    entries: &[RosterEntry],
    base_url: &str,
) -> Result<Vec<u8>, CheckinError> {
    let mut csv = Writer::from_writer(Vec::new());
    csv.write_record(ROSTER_EXPORT_HEADER).map_err(write_failed)?;
    for entry in entries {
        let url = Manager::code_url_for(entry, base_url);
        csv.write_record([
            entry.id.as_str(),
            entry.patient_name.as_str(),
            entry.hospital_name.as_str(),
            entry.major.as_str(),
            url.as_str(),
        ])
        .map_err(write_failed)?;
    }
    finish(csv)
}

pub fn write_attendance(records: &[AttendanceRecord]) -> Result<Vec<u8>, CheckinError> {
    let mut csv = Writer::from_writer(Vec::new());
    csv.write_record(ATTENDANCE_EXPORT_HEADER)
        .map_err(write_failed)?;
    for record in records {
        csv.write_record([
            record.member_id.as_str(),
            record.patient_name.as_str(),
            record.hospital_name.as_str(),
            record.major.as_str(),
            record.status.as_str(),
            record.time.as_str(),
        ])
        .map_err(write_failed)?;
    }
    finish(csv)
}

fn finish(csv: Writer<Vec<u8>>) -> Result<Vec<u8>, CheckinError> {
    csv.into_inner()
        .map_err(|e| CheckinError::Internal(format!("CSV export failed: {}", e.error())))
}

fn write_failed(err: csv::Error) -> CheckinError {
    CheckinError::Internal(format!("CSV export failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::attendance::AttendanceStatus;
    use rstest::rstest;

    #[test]
    fn reads_rows_by_header_name() {
        let input = "major,id,patient_name,hospital_name\nCS,1,A,H1\nLaw,2,B,H2\n";

        let rows = read_roster(input.as_bytes()).expect("rows");

        assert_eq!(
            rows,
            vec![
                RosterRow {
                    id: "1".into(),
                    patient_name: "A".into(),
                    hospital_name: "H1".into(),
                    major: "CS".into(),
                },
                RosterRow {
                    id: "2".into(),
                    patient_name: "B".into(),
                    hospital_name: "H2".into(),
                    major: "Law".into(),
                },
            ]
        );
    }

    #[test]
    fn short_rows_pass_through_with_empty_fields() {
        let input = "id,patient_name,hospital_name,major\n1,A\n2,\"B, Jr.\",H2,CS,extra\n";

        let rows = read_roster(input.as_bytes()).expect("rows");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].patient_name, "A");
        assert_eq!(rows[0].hospital_name, "");
        assert_eq!(rows[0].major, "");
        assert_eq!(rows[1].patient_name, "B, Jr.");
        assert_eq!(rows[1].major, "CS");
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = read_roster("id,patient_name,hospital_name,major\n".as_bytes()).expect("rows");
        assert!(rows.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case(",,\n1,2,3\n")]
    fn rejects_missing_header_line(#[case] input: &str) {
        assert!(matches!(
            read_roster(input.as_bytes()),
            Err(CheckinError::Input(_))
        ));
    }

    #[rstest]
    #[case("id,patient_name,hospital_name,major,Phone No.\n1,A,H1,CS,555\n")]
    #[case("Email (work),id,patient_name,hospital_name,major\na@b.c,1,A,H1,CS\n")]
    #[case("id,patient_name,,hospital_name,major\n1,A,x,H1,CS\n")]
    fn extra_columns_are_ignored(#[case] input: &str) {
        let rows = read_roster(input.as_bytes()).expect("rows");

        assert_eq!(
            rows,
            vec![RosterRow {
                id: "1".into(),
                patient_name: "A".into(),
                hospital_name: "H1".into(),
                major: "CS".into(),
            }]
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let input = b"id,patient_name\n1,\xff\xfe\n";
        assert!(matches!(
            read_roster(&input[..]),
            Err(CheckinError::Input(_))
        ));
    }

    #[test]
    fn roster_export_quotes_and_links() {
        let entries = vec![RosterEntry {
            id: "1".into(),
            patient_name: "Doe, Jane".into(),
            hospital_name: "H1".into(),
            major: "CS".into(),
            token: "abc".into(),
        }];

        let bytes = write_roster_codes(&entries, "http://host:3000").expect("export");

        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "ID,Patient Name,Hospital Name,Major,QR Code URL\n\
             1,\"Doe, Jane\",H1,CS,http://host:3000/scan?token=abc\n"
        );
    }

    #[test]
    fn attendance_export_lists_each_record() {
        let records = vec![AttendanceRecord {
            id: "r1".into(),
            member_id: "1".into(),
            patient_name: "A".into(),
            hospital_name: "H1".into(),
            major: "CS".into(),
            status: AttendanceStatus::Present,
            time: "2026-10-18 09:30:00".into(),
        }];

        let bytes = write_attendance(&records).expect("export");

        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "ID,Patient Name,Hospital Name,Major,Status,Time\n\
             1,A,H1,CS,Present,2026-10-18 09:30:00\n"
        );
    }
}
