use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::{AttendanceRecord, AttendanceStatus, Department, Employee, RecordId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodaySummary {
    pub present: u32,
    pub absent: u32,
}

impl TodaySummary {
    pub fn total(&self) -> u32 {
        self.present + self.absent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub present: u32,
    pub absent: u32,
}

impl DayCount {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            present: 0,
            absent: 0,
        }
    }

    fn count(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.absent
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    pub total_employees: usize,
    pub today_present: u32,
    pub today_absent: u32,
    /// Ascending by date, one entry per distinct date.
    pub date_series: Vec<DayCount>,
    pub department_presence: BTreeMap<Department, u32>,
}

/// Counts the records dated `today`, whether or not their employee is in the
/// loaded roster.
pub fn today_summary(attendance: &[AttendanceRecord], today: NaiveDate) -> TodaySummary {
    let mut summary = TodaySummary::default();
    for record in attendance.iter().filter(|record| record.date == today) {
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
        }
    }
    summary
}

pub fn date_series(attendance: &[AttendanceRecord]) -> Vec<DayCount> {
    let mut by_date: BTreeMap<NaiveDate, DayCount> = BTreeMap::new();
    for record in attendance {
        by_date
            .entry(record.date)
            .or_insert_with(|| DayCount::empty(record.date))
            .count(record.status);
    }
    by_date.into_values().collect()
}

/// Every department of the loaded roster gets a bucket, zero included.
/// Present records whose employee is not in the roster are skipped.
pub fn department_presence(
    employees: &[Employee],
    attendance: &[AttendanceRecord],
) -> BTreeMap<Department, u32> {
    let mut presence: BTreeMap<Department, u32> = BTreeMap::new();
    let mut departments: HashMap<&RecordId, Department> = HashMap::with_capacity(employees.len());
    for employee in employees {
        presence.entry(employee.department).or_insert(0);
        departments.insert(&employee.id, employee.department);
    }

    for record in attendance
        .iter()
        .filter(|record| record.status == AttendanceStatus::Present)
    {
        if let Some(department) = departments.get(&record.employee) {
            *presence.entry(*department).or_insert(0) += 1;
        }
    }
    presence
}

pub fn derive_metrics(
    employees: &[Employee],
    attendance: &[AttendanceRecord],
    today: NaiveDate,
) -> DerivedMetrics {
    let today_counts = today_summary(attendance, today);
    DerivedMetrics {
        total_employees: employees.len(),
        today_present: today_counts.present,
        today_absent: today_counts.absent,
        date_series: date_series(attendance),
        department_presence: department_presence(employees, attendance),
    }
}
