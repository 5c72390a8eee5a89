//! Reset a demo database to its fixed sample rows.
use crate::db::employees::{assign, insert_department, insert_employee, insert_project};
use crate::db::pets::insert_pet;
use crate::db::Pool;
use crate::model::{Demo, Department, EmployeeProject, NewEmployee, NewPet, Project};
use anyhow::{Context, Result};
use sqlx::{Sqlite, Transaction};
use tracing::{info, instrument};

/// Delete every row of the demo's tables and insert the sample data, all in
/// one transaction. Autoincrement counters restart so ids begin at 1.
#[instrument(skip(pool))]
pub async fn seed(pool: &Pool, demo: Demo) -> Result<()> {
    let mut tx = pool.begin().await?;
    match demo {
        Demo::Intro => {}
        Demo::Pets => seed_pets(&mut tx).await.context("seeding pets")?,
        Demo::Employees => seed_employees(&mut tx)
            .await
            .context("seeding employees")?,
    }
    tx.commit().await?;
    info!(%demo, "seeded");
    Ok(())
}

async fn reset_tables(tx: &mut Transaction<'_, Sqlite>, tables: &[&str]) -> Result<()> {
    for table in tables {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = ?")
            .bind(*table)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn seed_pets(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    reset_tables(tx, &["pets"]).await?;

    let pets = [
        ("Whiskey", "dog", None),
        ("Bowser", "dog", Some(10)),
        ("Spike", "porcupine", None),
    ];
    for (name, species, hunger) in pets {
        let pet = NewPet {
            name: name.into(),
            species: Some(species.into()),
            hunger,
        };
        insert_pet(&mut **tx, &pet).await?;
    }
    Ok(())
}

async fn seed_employees(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    // children first so foreign keys hold while deleting
    reset_tables(
        tx,
        &["employees_projects", "employees", "projects", "departments"],
    )
    .await?;

    let departments = [
        ("fin", "Finance", "555-1000"),
        ("legal", "Legal", "555-2222"),
        ("mktg", "Marketing", "555-9999"),
    ];
    for (code, name, phone) in departments {
        let dept = Department {
            dept_code: code.into(),
            dept_name: name.into(),
            phone: Some(phone.into()),
        };
        insert_department(&mut **tx, &dept).await?;
    }

    let employees = [
        ("Leonard", None, Some("legal")),
        ("Liz", None, Some("legal")),
        ("Maggie", Some("DC"), Some("mktg")),
        ("Nadine", None, None),
    ];
    let mut ids = Vec::with_capacity(employees.len());
    for (name, state, dept) in employees {
        let emp = NewEmployee {
            name: name.into(),
            state: state.map(str::to_string),
            dept_code: dept.map(str::to_string),
        };
        ids.push(insert_employee(&mut **tx, &emp).await?);
    }

    for (code, name) in [("car", "Design Car"), ("server", "Deploy Server")] {
        let project = Project {
            proj_code: code.into(),
            proj_name: name.into(),
        };
        insert_project(&mut **tx, &project).await?;
    }

    let (liz, maggie) = (ids[1], ids[2]);
    let links = [
        (liz, "car", Some("Chair")),
        (liz, "server", None),
        (maggie, "server", Some("Auditor")),
    ];
    for (emp_id, proj_code, role) in links {
        let link = EmployeeProject {
            emp_id,
            proj_code: proj_code.into(),
            role: role.map(str::to_string),
        };
        assign(&mut **tx, &link).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect_in_memory, employees, pets};

    #[tokio::test]
    async fn reseeding_leaves_only_sample_pets() {
        let pool = connect_in_memory(Demo::Pets).await.unwrap();
        seed(&pool, Demo::Pets).await.unwrap();
        insert_pet(
            &pool,
            &NewPet {
                name: "Extra".into(),
                species: None,
                hunger: None,
            },
        )
        .await
        .unwrap();
        seed(&pool, Demo::Pets).await.unwrap();

        let all = pets::list_pets(&pool).await.unwrap();
        let rows: Vec<_> = all
            .iter()
            .map(|p| (p.id, p.name.as_str(), p.species.as_deref(), p.hunger))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "Whiskey", Some("dog"), 20),
                (2, "Bowser", Some("dog"), 10),
                (3, "Spike", Some("porcupine"), 20),
            ]
        );
    }

    #[tokio::test]
    async fn reseeding_employees_is_idempotent() {
        let pool = connect_in_memory(Demo::Employees).await.unwrap();
        seed(&pool, Demo::Employees).await.unwrap();
        seed(&pool, Demo::Employees).await.unwrap();

        let emps = employees::list_employees(&pool).await.unwrap();
        let names: Vec<_> = emps.iter().map(|e| (e.id, e.name.as_str())).collect();
        assert_eq!(
            names,
            vec![(1, "Leonard"), (2, "Liz"), (3, "Maggie"), (4, "Nadine")]
        );
        assert_eq!(employees::list_departments(&pool).await.unwrap().len(), 3);
        assert_eq!(employees::list_projects(&pool).await.unwrap().len(), 2);

        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees_projects")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links, 3);
    }

    #[tokio::test]
    async fn intro_seed_is_a_no_op() {
        let pool = connect_in_memory(Demo::Intro).await.unwrap();
        seed(&pool, Demo::Intro).await.unwrap();
    }
}
