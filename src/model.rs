use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hunger given to pets created without one.
pub const DEFAULT_HUNGER: i64 = 20;

/// Region code given to employees created without one.
pub const DEFAULT_STATE: &str = "CA";

static STATE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// The demo apps shipped by this crate. Each owns its own SQLite database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Demo {
    Intro,
    Pets,
    Employees,
}

impl Demo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Demo::Intro => "intro",
            Demo::Pets => "pets",
            Demo::Employees => "employees",
        }
    }

    /// File name of the demo's database inside `app.data_dir`.
    pub fn database_file(&self) -> &'static str {
        match self {
            Demo::Intro => "movies_example.db",
            Demo::Pets => "pet_shop.db",
            Demo::Employees => "employees.db",
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub species: Option<String>,
    pub hunger: i64,
}

impl Pet {
    pub fn greet(&self) -> String {
        format!(
            "I'm {} the {}!",
            self.name,
            self.species.as_deref().unwrap_or("thing")
        )
    }
}

/// Fields accepted when creating a pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub species: Option<String>,
    pub hunger: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    pub dept_code: String,
    pub dept_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub dept_code: Option<String>,
}

/// Fields accepted when creating an employee. `state` falls back to [`DEFAULT_STATE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub state: Option<String>,
    pub dept_code: Option<String>,
}

impl NewEmployee {
    pub fn resolved_state(&self) -> &str {
        self.state.as_deref().unwrap_or(DEFAULT_STATE)
    }
}

/// Returns true for two-letter upper-case region codes such as `CA`.
pub fn is_state_code(s: &str) -> bool {
    STATE_CODE.is_match(s)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub proj_code: String,
    pub proj_name: String,
}

/// Row of the `employees_projects` association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeProject {
    pub emp_id: i64,
    pub proj_code: String,
    pub role: Option<String>,
}

/// An employee's assignment joined with the project it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub project: Project,
    pub role: Option<String>,
}

/// A project member as seen from the project side, with their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub employee: Employee,
    pub role: Option<String>,
}

/// How the phone directory is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhoneDirStrategy {
    /// One query for employees, then one per employee with a department.
    Nav,
    /// Inner join, returning plain value tuples.
    Join,
    /// Inner join, returning (employee, department) records.
    JoinClass,
    /// Left outer join; employees without a department are kept.
    OuterJoin,
}

impl PhoneDirStrategy {
    pub const ALL: [PhoneDirStrategy; 4] = [
        PhoneDirStrategy::Nav,
        PhoneDirStrategy::Join,
        PhoneDirStrategy::JoinClass,
        PhoneDirStrategy::OuterJoin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneDirStrategy::Nav => "nav",
            PhoneDirStrategy::Join => "join",
            PhoneDirStrategy::JoinClass => "join-class",
            PhoneDirStrategy::OuterJoin => "outer-join",
        }
    }
}

impl fmt::Display for PhoneDirStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhoneDirStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| format!("unknown strategy '{}'", s))
    }
}

/// One line of the phone directory. Department fields are `None` for
/// employees without a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub name: String,
    pub dept_code: Option<String>,
    pub dept_name: Option<String>,
    pub phone: Option<String>,
}

impl PhoneEntry {
    pub fn from_pair(emp: &Employee, dept: Option<&Department>) -> Self {
        Self {
            name: emp.name.clone(),
            dept_code: dept.map(|d| d.dept_code.clone()),
            dept_name: dept.map(|d| d.dept_name.clone()),
            phone: dept.and_then(|d| d.phone.clone()),
        }
    }
}

/// A rendered directory plus the number of SQL statements it took to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneDirectory {
    pub strategy: PhoneDirStrategy,
    pub entries: Vec<PhoneEntry>,
    pub queries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greet_uses_species() {
        let pet = Pet {
            id: 1,
            name: "Whiskey".into(),
            species: Some("dog".into()),
            hunger: 20,
        };
        assert_eq!(pet.greet(), "I'm Whiskey the dog!");

        let pet = Pet { species: None, ..pet };
        assert_eq!(pet.greet(), "I'm Whiskey the thing!");
    }

    #[test]
    fn strategy_parses_kebab_names() {
        for strategy in PhoneDirStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<PhoneDirStrategy>().unwrap(), strategy);
        }
        assert!("outerjoin".parse::<PhoneDirStrategy>().is_err());
    }

    #[test]
    fn state_codes() {
        assert!(is_state_code("CA"));
        assert!(is_state_code("DC"));
        assert!(!is_state_code("ca"));
        assert!(!is_state_code("CAL"));
        assert!(!is_state_code(""));
    }

    #[test]
    fn new_employee_defaults_state() {
        let emp = NewEmployee {
            name: "Nadine".into(),
            state: None,
            dept_code: None,
        };
        assert_eq!(emp.resolved_state(), "CA");
    }
}
