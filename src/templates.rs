//! Page templates, embedded at compile time and compiled once at startup.
use crate::error::AppResult;
use axum::response::Html;
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("intro/home.html", include_str!("../templates/intro/home.html")),
    ("pets/list.html", include_str!("../templates/pets/list.html")),
    ("pets/detail.html", include_str!("../templates/pets/detail.html")),
    ("employees/phones.html", include_str!("../templates/employees/phones.html")),
    ("employees/department.html", include_str!("../templates/employees/department.html")),
    ("employees/employee.html", include_str!("../templates/employees/employee.html")),
    ("employees/project.html", include_str!("../templates/employees/project.html")),
];

/// Compile every embedded template. `.html` templates are autoescaped.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

pub fn render(tera: &Tera, name: &str, ctx: &Context) -> AppResult<Html<String>> {
    Ok(Html(tera.render(name, ctx)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pet;

    #[test]
    fn all_templates_compile() {
        let tera = load().unwrap();
        for (name, _) in TEMPLATES {
            assert!(tera.get_template_names().any(|n| n == *name), "{name} missing");
        }
    }

    #[test]
    fn pet_names_are_escaped() {
        let tera = load().unwrap();
        let pet = Pet {
            id: 1,
            name: "<script>".into(),
            species: None,
            hunger: 20,
        };
        let mut ctx = Context::new();
        ctx.insert("pet", &pet);
        ctx.insert("greeting", &pet.greet());
        let html = render(&tera, "pets/detail.html", &ctx).unwrap().0;
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
