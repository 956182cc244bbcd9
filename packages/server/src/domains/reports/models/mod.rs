mod report;

pub use report::{NewReport, ReportCreateOutcome, ReportRecord, STATUS_PENDING};
