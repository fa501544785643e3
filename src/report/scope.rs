use crate::engine::error::EngineError;
use sqlx::MySqlPool;

/// Employee/department narrowing requested by a report query.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeFilter {
    pub employee_id: Option<u64>,
    pub department_id: Option<u64>,
}

/// Resolved set of employees a report may cover.
///
/// `Ids(vec![])` is a legitimate outcome: a filter that lands outside the
/// caller's permitted scope produces an empty report, never an error and
/// never a silently widened one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeScope {
    All,
    Ids(Vec<u64>),
}

impl EmployeeScope {
    pub fn is_empty(&self) -> bool {
        matches!(self, EmployeeScope::Ids(ids) if ids.is_empty())
    }
}

/// Pure scope arithmetic: a single-employee filter narrows (and overrides) a
/// department filter; everything is clipped to `accessible` when the caller
/// is restricted.
pub fn narrow(
    filter: &ScopeFilter,
    accessible: Option<&[u64]>,
    department_members: Option<Vec<u64>>,
) -> EmployeeScope {
    if let Some(employee_id) = filter.employee_id {
        let permitted = accessible
            .map(|ids| ids.contains(&employee_id))
            .unwrap_or(true);
        return if permitted {
            EmployeeScope::Ids(vec![employee_id])
        } else {
            EmployeeScope::Ids(Vec::new())
        };
    }

    if let Some(members) = department_members {
        let clipped = match accessible {
            Some(ids) => members.into_iter().filter(|m| ids.contains(m)).collect(),
            None => members,
        };
        return EmployeeScope::Ids(clipped);
    }

    match accessible {
        Some(ids) => EmployeeScope::Ids(ids.to_vec()),
        None => EmployeeScope::All,
    }
}

/// Resolve a request filter against the directory. `accessible` carries the
/// caller's permitted employee ids when restricted (`None` = unrestricted).
pub async fn resolve(
    pool: &MySqlPool,
    filter: &ScopeFilter,
    accessible: Option<&[u64]>,
) -> Result<EmployeeScope, EngineError> {
    let department_members = match (filter.employee_id, filter.department_id) {
        // Employee filter wins; no need to expand the department.
        (Some(_), _) | (None, None) => None,
        (None, Some(department_id)) => {
            let members: Vec<u64> = sqlx::query_scalar(
                "SELECT id FROM employees WHERE department_id = ? AND status = 'active'",
            )
            .bind(department_id)
            .fetch_all(pool)
            .await?;
            Some(members)
        }
    };

    Ok(narrow(filter, accessible, department_members))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_filter_overrides_department() {
        let filter = ScopeFilter {
            employee_id: Some(7),
            department_id: Some(3),
        };
        let scope = narrow(&filter, None, Some(vec![1, 2, 3]));
        assert_eq!(scope, EmployeeScope::Ids(vec![7]));
    }

    #[test]
    fn out_of_scope_employee_yields_empty_not_error() {
        let filter = ScopeFilter {
            employee_id: Some(99),
            department_id: None,
        };
        let scope = narrow(&filter, Some(&[1, 2, 3]), None);
        assert!(scope.is_empty());
    }

    #[test]
    fn department_members_are_clipped_to_accessible() {
        let filter = ScopeFilter {
            employee_id: None,
            department_id: Some(3),
        };
        let scope = narrow(&filter, Some(&[2, 4]), Some(vec![1, 2, 3]));
        assert_eq!(scope, EmployeeScope::Ids(vec![2]));
    }

    #[test]
    fn unfiltered_unrestricted_is_all() {
        let scope = narrow(&ScopeFilter::default(), None, None);
        assert_eq!(scope, EmployeeScope::All);
    }

    #[test]
    fn unfiltered_restricted_falls_back_to_accessible() {
        let scope = narrow(&ScopeFilter::default(), Some(&[5, 6]), None);
        assert_eq!(scope, EmployeeScope::Ids(vec![5, 6]));
    }
}
