use super::Pool;
use crate::model::{NewPet, Pet, DEFAULT_HUNGER};
use sqlx::sqlite::SqliteExecutor;
use tracing::instrument;

#[instrument(skip_all)]
pub async fn list_pets(pool: &Pool) -> sqlx::Result<Vec<Pet>> {
    sqlx::query_as::<_, Pet>("SELECT id, name, species, hunger FROM pets ORDER BY id")
        .fetch_all(pool)
        .await
}

#[instrument(skip(pool))]
pub async fn get_pet(pool: &Pool, id: i64) -> sqlx::Result<Option<Pet>> {
    sqlx::query_as::<_, Pet>("SELECT id, name, species, hunger FROM pets WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[instrument(skip(pool))]
pub async fn pets_by_species(pool: &Pool, species: &str) -> sqlx::Result<Vec<Pet>> {
    sqlx::query_as::<_, Pet>(
        "SELECT id, name, species, hunger FROM pets WHERE species = ? ORDER BY id",
    )
    .bind(species)
    .fetch_all(pool)
    .await
}

/// Insert a pet and return its generated id.
#[instrument(skip(conn))]
pub async fn insert_pet<'c>(conn: impl SqliteExecutor<'c>, pet: &NewPet) -> sqlx::Result<i64> {
    sqlx::query_scalar("INSERT INTO pets (name, species, hunger) VALUES (?, ?, ?) RETURNING id")
        .bind(&pet.name)
        .bind(pet.species.as_deref())
        .bind(pet.hunger.unwrap_or(DEFAULT_HUNGER))
        .fetch_one(conn)
        .await
}
