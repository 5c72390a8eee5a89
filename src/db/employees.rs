//! Employee/department/project queries.
//!
//! The `phone_dir_*` functions build the same directory four ways so the
//! statement counts can be compared: lazy per-row navigation (N+1), an inner
//! join returning plain tuples, an inner join returning records, and a left
//! outer join that keeps employees without a department.

use super::Pool;
use crate::model::{
    is_state_code, Assignment, Department, Employee, EmployeeProject, Member, NewEmployee,
    PhoneDirStrategy, PhoneDirectory, PhoneEntry, Project,
};
use anyhow::{bail, Result};
use sqlx::sqlite::{SqliteExecutor, SqliteRow};
use sqlx::Row;
use tracing::{debug, instrument};

/// Employees paired with their (possibly absent) department.
pub type EmployeeDepartments = Vec<(Employee, Option<Department>)>;

#[instrument(skip_all)]
pub async fn list_employees(pool: &Pool) -> sqlx::Result<Vec<Employee>> {
    sqlx::query_as::<_, Employee>("SELECT id, name, state, dept_code FROM employees ORDER BY id")
        .fetch_all(pool)
        .await
}

#[instrument(skip_all)]
pub async fn list_departments(pool: &Pool) -> sqlx::Result<Vec<Department>> {
    sqlx::query_as::<_, Department>(
        "SELECT dept_code, dept_name, phone FROM departments ORDER BY dept_code",
    )
    .fetch_all(pool)
    .await
}

#[instrument(skip_all)]
pub async fn list_projects(pool: &Pool) -> sqlx::Result<Vec<Project>> {
    sqlx::query_as::<_, Project>("SELECT proj_code, proj_name FROM projects ORDER BY proj_code")
        .fetch_all(pool)
        .await
}

#[instrument(skip(pool))]
pub async fn get_employee(pool: &Pool, id: i64) -> sqlx::Result<Option<Employee>> {
    sqlx::query_as::<_, Employee>("SELECT id, name, state, dept_code FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[instrument(skip(pool))]
pub async fn get_department(pool: &Pool, dept_code: &str) -> sqlx::Result<Option<Department>> {
    sqlx::query_as::<_, Department>(
        "SELECT dept_code, dept_name, phone FROM departments WHERE dept_code = ?",
    )
    .bind(dept_code)
    .fetch_optional(pool)
    .await
}

#[instrument(skip(pool))]
pub async fn get_project(pool: &Pool, proj_code: &str) -> sqlx::Result<Option<Project>> {
    sqlx::query_as::<_, Project>("SELECT proj_code, proj_name FROM projects WHERE proj_code = ?")
        .bind(proj_code)
        .fetch_optional(pool)
        .await
}

pub async fn insert_department<'c>(conn: impl SqliteExecutor<'c>, dept: &Department) -> Result<()> {
    sqlx::query("INSERT INTO departments (dept_code, dept_name, phone) VALUES (?, ?, ?)")
        .bind(&dept.dept_code)
        .bind(&dept.dept_name)
        .bind(dept.phone.as_deref())
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn insert_employee<'c>(conn: impl SqliteExecutor<'c>, emp: &NewEmployee) -> Result<i64> {
    let state = emp.resolved_state();
    if !is_state_code(state) {
        bail!("invalid state code '{}' for {}", state, emp.name);
    }
    let id = sqlx::query_scalar(
        "INSERT INTO employees (name, state, dept_code) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&emp.name)
    .bind(state)
    .bind(emp.dept_code.as_deref())
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn insert_project<'c>(conn: impl SqliteExecutor<'c>, project: &Project) -> Result<()> {
    sqlx::query("INSERT INTO projects (proj_code, proj_name) VALUES (?, ?)")
        .bind(&project.proj_code)
        .bind(&project.proj_name)
        .execute(conn)
        .await?;
    Ok(())
}

/// Put an employee on a project, recording their role on it.
pub async fn assign<'c>(conn: impl SqliteExecutor<'c>, link: &EmployeeProject) -> Result<()> {
    sqlx::query("INSERT INTO employees_projects (emp_id, proj_code, role) VALUES (?, ?, ?)")
        .bind(link.emp_id)
        .bind(&link.proj_code)
        .bind(link.role.as_deref())
        .execute(conn)
        .await?;
    Ok(())
}

/// Department → employees (one-to-many).
#[instrument(skip(pool))]
pub async fn department_employees(pool: &Pool, dept_code: &str) -> sqlx::Result<Vec<Employee>> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, state, dept_code FROM employees WHERE dept_code = ? ORDER BY id",
    )
    .bind(dept_code)
    .fetch_all(pool)
    .await
}

/// Employee → projects, skipping over the association table.
#[instrument(skip(pool))]
pub async fn employee_projects(pool: &Pool, emp_id: i64) -> sqlx::Result<Vec<Project>> {
    sqlx::query_as::<_, Project>(
        "SELECT p.proj_code, p.proj_name
         FROM projects p
         JOIN employees_projects ep ON ep.proj_code = p.proj_code
         WHERE ep.emp_id = ?
         ORDER BY p.proj_code",
    )
    .bind(emp_id)
    .fetch_all(pool)
    .await
}

/// Employee → association rows, each with the project it points at.
#[instrument(skip(pool))]
pub async fn employee_assignments(pool: &Pool, emp_id: i64) -> sqlx::Result<Vec<Assignment>> {
    let rows = sqlx::query(
        "SELECT p.proj_code, p.proj_name, ep.role
         FROM employees_projects ep
         JOIN projects p ON p.proj_code = ep.proj_code
         WHERE ep.emp_id = ?
         ORDER BY p.proj_code",
    )
    .bind(emp_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| Assignment {
            project: Project {
                proj_code: row.get("proj_code"),
                proj_name: row.get("proj_name"),
            },
            role: row.get("role"),
        })
        .collect())
}

/// Project → employees (the reverse side of the many-to-many).
#[instrument(skip(pool))]
pub async fn project_members(pool: &Pool, proj_code: &str) -> sqlx::Result<Vec<Member>> {
    let rows = sqlx::query(
        "SELECT e.id, e.name, e.state, e.dept_code, ep.role
         FROM employees e
         JOIN employees_projects ep ON ep.emp_id = e.id
         WHERE ep.proj_code = ?
         ORDER BY e.id",
    )
    .bind(proj_code)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| Member {
            employee: employee_from_row(row),
            role: row.get("role"),
        })
        .collect())
}

/// N+1: one query for the employees, then one per employee that has a
/// department. Returns the pairs and the number of statements issued.
#[instrument(skip_all)]
pub async fn phone_dir_nav(pool: &Pool) -> sqlx::Result<(EmployeeDepartments, usize)> {
    let emps = list_employees(pool).await?;
    let mut queries = 1;
    let mut out = Vec::with_capacity(emps.len());
    for emp in emps {
        let dept = match emp.dept_code.as_deref() {
            Some(code) => {
                queries += 1;
                get_department(pool, code).await?
            }
            None => None,
        };
        out.push((emp, dept));
    }
    debug!(queries, "phone directory via navigation");
    Ok((out, queries))
}

/// Inner join returning `(name, dept_name, phone)` tuples.
#[instrument(skip_all)]
pub async fn phone_dir_join(pool: &Pool) -> sqlx::Result<Vec<(String, String, Option<String>)>> {
    sqlx::query_as::<_, (String, String, Option<String>)>(
        "SELECT e.name, d.dept_name, d.phone
         FROM employees e
         JOIN departments d ON d.dept_code = e.dept_code
         ORDER BY e.id",
    )
    .fetch_all(pool)
    .await
}

/// Inner join returning whole records instead of bare values.
#[instrument(skip_all)]
pub async fn phone_dir_join_class(pool: &Pool) -> sqlx::Result<Vec<(Employee, Department)>> {
    let rows = sqlx::query(
        "SELECT e.id, e.name, e.state, e.dept_code,
                d.dept_code AS d_code, d.dept_name, d.phone
         FROM employees e
         JOIN departments d ON d.dept_code = e.dept_code
         ORDER BY e.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| {
            let dept = Department {
                dept_code: row.get("d_code"),
                dept_name: row.get("dept_name"),
                phone: row.get("phone"),
            };
            (employee_from_row(row), dept)
        })
        .collect())
}

/// Left outer join; employees without a department come back with `None`.
#[instrument(skip_all)]
pub async fn phone_dir_outerjoin(pool: &Pool) -> sqlx::Result<EmployeeDepartments> {
    let rows = sqlx::query(
        "SELECT e.id, e.name, e.state, e.dept_code,
                d.dept_code AS d_code, d.dept_name, d.phone
         FROM employees e
         LEFT JOIN departments d ON d.dept_code = e.dept_code
         ORDER BY e.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows
        .iter()
        .map(|row| {
            let dept = row
                .get::<Option<String>, _>("d_code")
                .map(|dept_code| Department {
                    dept_code,
                    dept_name: row.get("dept_name"),
                    phone: row.get("phone"),
                });
            (employee_from_row(row), dept)
        })
        .collect())
}

/// Build the phone directory with the given strategy.
pub async fn phone_directory(pool: &Pool, strategy: PhoneDirStrategy) -> sqlx::Result<PhoneDirectory> {
    let (entries, queries) = match strategy {
        PhoneDirStrategy::Nav => {
            let (pairs, queries) = phone_dir_nav(pool).await?;
            let entries = pairs
                .iter()
                .map(|(emp, dept)| PhoneEntry::from_pair(emp, dept.as_ref()))
                .collect();
            (entries, queries)
        }
        PhoneDirStrategy::Join => {
            let entries = phone_dir_join(pool)
                .await?
                .into_iter()
                .map(|(name, dept_name, phone)| PhoneEntry {
                    name,
                    dept_code: None,
                    dept_name: Some(dept_name),
                    phone,
                })
                .collect();
            (entries, 1)
        }
        PhoneDirStrategy::JoinClass => {
            let entries = phone_dir_join_class(pool)
                .await?
                .iter()
                .map(|(emp, dept)| PhoneEntry::from_pair(emp, Some(dept)))
                .collect();
            (entries, 1)
        }
        PhoneDirStrategy::OuterJoin => {
            let entries = phone_dir_outerjoin(pool)
                .await?
                .iter()
                .map(|(emp, dept)| PhoneEntry::from_pair(emp, dept.as_ref()))
                .collect();
            (entries, 1)
        }
    };
    Ok(PhoneDirectory {
        strategy,
        entries,
        queries,
    })
}

fn employee_from_row(row: &SqliteRow) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        state: row.get("state"),
        dept_code: row.get("dept_code"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::model::Demo;

    async fn setup() -> Pool {
        let pool = connect_in_memory(Demo::Employees).await.unwrap();
        insert_department(
            &pool,
            &Department {
                dept_code: "legal".into(),
                dept_name: "Legal".into(),
                phone: Some("555-2222".into()),
            },
        )
        .await
        .unwrap();
        for (name, dept) in [("Liz", Some("legal")), ("Nadine", None)] {
            insert_employee(
                &pool,
                &NewEmployee {
                    name: name.into(),
                    state: None,
                    dept_code: dept.map(str::to_string),
                },
            )
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn nav_counts_one_query_per_department_lookup() {
        let pool = setup().await;
        let (pairs, queries) = phone_dir_nav(&pool).await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(queries, 2);
        assert_eq!(pairs[0].1.as_ref().map(|d| d.dept_name.as_str()), Some("Legal"));
        assert!(pairs[1].1.is_none());
    }

    #[tokio::test]
    async fn inner_join_drops_employees_without_department() {
        let pool = setup().await;
        let rows = phone_dir_join(&pool).await.unwrap();
        assert_eq!(
            rows,
            vec![("Liz".to_string(), "Legal".to_string(), Some("555-2222".to_string()))]
        );
        let pairs = phone_dir_join_class(&pool).await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.name, "Liz");
        assert_eq!(pairs[0].1.dept_code, "legal");
    }

    #[tokio::test]
    async fn outer_join_keeps_everyone() {
        let pool = setup().await;
        let pairs = phone_dir_outerjoin(&pool).await.unwrap();
        let names: Vec<_> = pairs.iter().map(|(e, d)| (e.name.as_str(), d.is_some())).collect();
        assert_eq!(names, vec![("Liz", true), ("Nadine", false)]);
        assert_eq!(pairs[1].0.state, "CA");
    }

    #[tokio::test]
    async fn bad_state_is_rejected() {
        let pool = setup().await;
        let err = insert_employee(
            &pool,
            &NewEmployee {
                name: "Zed".into(),
                state: Some("california".into()),
                dept_code: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid state code"));
    }

    #[tokio::test]
    async fn unknown_department_violates_foreign_key() {
        let pool = setup().await;
        let res = insert_employee(
            &pool,
            &NewEmployee {
                name: "Ghost".into(),
                state: None,
                dept_code: Some("nope".into()),
            },
        )
        .await;
        assert!(res.is_err());
    }
}
