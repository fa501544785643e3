use crate::engine::error::EngineError;
use crate::report::scope::EmployeeScope;
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

const TOP_N: usize = 5;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct TenureEntry {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "2020-03-15", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[schema(example = 70)]
    pub tenure_months: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenureBucket {
    #[schema(example = "1-2 years")]
    pub label: String,
    #[schema(example = 14)]
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenureStatistics {
    #[schema(example = 27.4)]
    pub average_months: f64,
    pub distribution: Vec<TenureBucket>,
    pub longest_serving: Vec<TenureEntry>,
    pub newest_employees: Vec<TenureEntry>,
}

/// Whole months of service, `TIMESTAMPDIFF(MONTH, ...)` semantics: a month
/// counts only once the day-of-month has been reached.
pub fn months_between(hire_date: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut months = (as_of.year() - hire_date.year()) * 12 + as_of.month() as i32
        - hire_date.month() as i32;
    if as_of.day() < hire_date.day() {
        months -= 1;
    }
    months.max(0)
}

fn bucket_label(months: i32) -> &'static str {
    match months {
        m if m < 6 => "0-6 months",
        m if m < 12 => "6-12 months",
        m if m < 24 => "1-2 years",
        m if m < 60 => "2-5 years",
        _ => "5+ years",
    }
}

const BUCKET_ORDER: [&str; 5] = [
    "0-6 months",
    "6-12 months",
    "1-2 years",
    "2-5 years",
    "5+ years",
];

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenureSource {
    pub employee_id: u64,
    pub name: String,
    pub hire_date: NaiveDate,
}

pub fn compute_tenure(rows: &[TenureSource], as_of: NaiveDate) -> TenureStatistics {
    let mut entries: Vec<TenureEntry> = rows
        .iter()
        .map(|r| TenureEntry {
            employee_id: r.employee_id,
            name: r.name.clone(),
            hire_date: r.hire_date,
            tenure_months: months_between(r.hire_date, as_of),
        })
        .collect();

    let average_months = if entries.is_empty() {
        0.0
    } else {
        entries.iter().map(|e| e.tenure_months as f64).sum::<f64>() / entries.len() as f64
    };

    let distribution = BUCKET_ORDER
        .iter()
        .map(|label| TenureBucket {
            label: label.to_string(),
            count: entries
                .iter()
                .filter(|e| bucket_label(e.tenure_months) == *label)
                .count() as u64,
        })
        .collect();

    entries.sort_by(|a, b| a.hire_date.cmp(&b.hire_date).then(a.employee_id.cmp(&b.employee_id)));
    let longest_serving: Vec<TenureEntry> = entries.iter().take(TOP_N).cloned().collect();
    let newest_employees: Vec<TenureEntry> = entries.iter().rev().take(TOP_N).cloned().collect();

    TenureStatistics {
        average_months,
        distribution,
        longest_serving,
        newest_employees,
    }
}

pub async fn tenure_statistics(
    pool: &MySqlPool,
    scope: &EmployeeScope,
) -> Result<TenureStatistics, EngineError> {
    let ids = match scope {
        EmployeeScope::All => None,
        EmployeeScope::Ids(ids) if ids.is_empty() => {
            return Ok(compute_tenure(&[], Local::now().date_naive()))
        }
        EmployeeScope::Ids(ids) => Some(ids),
    };

    let mut sql = String::from(
        "SELECT id AS employee_id, CONCAT(first_name, ' ', last_name) AS name, hire_date \
         FROM employees WHERE status = 'active'",
    );
    if let Some(ids) = ids {
        let placeholders = vec!["?"; ids.len()].join(", ");
        sql.push_str(&format!(" AND id IN ({})", placeholders));
    }

    let mut query = sqlx::query_as::<_, TenureSource>(&sql);
    if let Some(ids) = ids {
        for id in ids {
            query = query.bind(id);
        }
    }

    let rows = query.fetch_all(pool).await?;
    Ok(compute_tenure(&rows, Local::now().date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn src(id: u64, name: &str, hire: &str) -> TenureSource {
        TenureSource {
            employee_id: id,
            name: name.into(),
            hire_date: d(hire),
        }
    }

    #[test]
    fn whole_month_semantics() {
        assert_eq!(months_between(d("2025-01-15"), d("2026-01-14")), 11);
        assert_eq!(months_between(d("2025-01-15"), d("2026-01-15")), 12);
        assert_eq!(months_between(d("2026-01-15"), d("2026-01-20")), 0);
    }

    #[test]
    fn buckets_cover_ranges() {
        assert_eq!(bucket_label(0), "0-6 months");
        assert_eq!(bucket_label(6), "6-12 months");
        assert_eq!(bucket_label(12), "1-2 years");
        assert_eq!(bucket_label(24), "2-5 years");
        assert_eq!(bucket_label(60), "5+ years");
    }

    #[test]
    fn average_distribution_and_top_lists() {
        let rows = vec![
            src(1, "Oldest Hand", "2018-01-01"),
            src(2, "Mid Tenure", "2024-06-01"),
            src(3, "New Joiner", "2025-12-01"),
        ];
        let as_of = d("2026-01-05");
        let stats = compute_tenure(&rows, as_of);

        assert_eq!(stats.longest_serving[0].employee_id, 1);
        assert_eq!(stats.newest_employees[0].employee_id, 3);

        let by_label: std::collections::HashMap<_, _> = stats
            .distribution
            .iter()
            .map(|b| (b.label.as_str(), b.count))
            .collect();
        assert_eq!(by_label["5+ years"], 1);
        assert_eq!(by_label["1-2 years"], 1);
        assert_eq!(by_label["0-6 months"], 1);

        let expected_avg = (months_between(d("2018-01-01"), as_of) as f64
            + months_between(d("2024-06-01"), as_of) as f64
            + months_between(d("2025-12-01"), as_of) as f64)
            / 3.0;
        assert!((stats.average_months - expected_avg).abs() < 1e-9);
    }

    #[test]
    fn empty_population_is_all_zeroes() {
        let stats = compute_tenure(&[], d("2026-01-05"));
        assert_eq!(stats.average_months, 0.0);
        assert!(stats.longest_serving.is_empty());
        assert!(stats.distribution.iter().all(|b| b.count == 0));
    }
}
