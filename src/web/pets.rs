//! Pet shop routes: list + add form, create, detail, species filter.

use super::AppState;
use crate::db::pets;
use crate::error::{AppError, AppResult};
use crate::model::NewPet;
use crate::templates::render;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tera::Context;
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pets).post(create_pet))
        .route("/species/{species}", get(pets_by_species))
        .route("/{id}", get(show_pet))
}

/// Raw form fields; everything arrives as text and may be blank.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub hunger: Option<String>,
}

impl PetForm {
    pub fn into_new_pet(self) -> AppResult<NewPet> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Pet name cannot be empty".into()));
        }
        let species = non_blank(self.species);
        let hunger = match non_blank(self.hunger) {
            None => None,
            Some(raw) => {
                let value: i64 = raw.parse().map_err(|_| {
                    AppError::BadRequest(format!("Hunger must be a whole number, got '{}'", raw))
                })?;
                if value < 0 {
                    return Err(AppError::BadRequest("Hunger cannot be negative".into()));
                }
                Some(value)
            }
        };
        Ok(NewPet {
            name: name.to_string(),
            species,
            hunger,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET / - List pets and show the add form
async fn list_pets(State(state): State<AppState>) -> AppResult<Html<String>> {
    let pets = pets::list_pets(state.pool()).await?;
    let mut ctx = Context::new();
    ctx.insert("pets", &pets);
    ctx.insert("species", &None::<String>);
    render(state.templates(), "pets/list.html", &ctx)
}

/// POST / - Create a pet from the form, then redirect to its page
async fn create_pet(
    State(state): State<AppState>,
    Form(form): Form<PetForm>,
) -> AppResult<Redirect> {
    let pet = form.into_new_pet()?;
    let id = pets::insert_pet(state.pool(), &pet)
        .await
        .map_err(|e| AppError::from_insert(e, &format!("Pet '{}'", pet.name)))?;
    info!(id, name = %pet.name, "pet created");
    Ok(Redirect::to(&format!("/{}", id)))
}

/// GET /{id} - Show one pet; anything that is not a known id is a 404
async fn show_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let pet_id: i64 = id.parse().map_err(|_| AppError::not_found("Pet", &id))?;
    let pet = pets::get_pet(state.pool(), pet_id)
        .await?
        .ok_or_else(|| AppError::not_found("Pet", pet_id))?;

    let mut ctx = Context::new();
    ctx.insert("greeting", &pet.greet());
    ctx.insert("pet", &pet);
    render(state.templates(), "pets/detail.html", &ctx)
}

/// GET /species/{species} - Pets of one species
async fn pets_by_species(
    State(state): State<AppState>,
    Path(species): Path<String>,
) -> AppResult<Html<String>> {
    let pets = pets::pets_by_species(state.pool(), &species).await?;
    let mut ctx = Context::new();
    ctx.insert("pets", &pets);
    ctx.insert("species", &species);
    render(state.templates(), "pets/list.html", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, species: Option<&str>, hunger: Option<&str>) -> PetForm {
        PetForm {
            name: name.into(),
            species: species.map(str::to_string),
            hunger: hunger.map(str::to_string),
        }
    }

    #[test]
    fn blank_fields_become_none() {
        let pet = form(" Fluffy ", Some(""), Some("  ")).into_new_pet().unwrap();
        assert_eq!(
            pet,
            NewPet {
                name: "Fluffy".into(),
                species: None,
                hunger: None
            }
        );
    }

    #[test]
    fn hunger_is_parsed() {
        let pet = form("Rex", Some("dog"), Some("7")).into_new_pet().unwrap();
        assert_eq!(pet.hunger, Some(7));
        assert_eq!(pet.species.as_deref(), Some("dog"));
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(matches!(form("", None, None).into_new_pet(), Err(AppError::BadRequest(_))));
        assert!(matches!(
            form("Rex", None, Some("lots")).into_new_pet(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            form("Rex", None, Some("-1")).into_new_pet(),
            Err(AppError::BadRequest(_))
        ));
    }
}
