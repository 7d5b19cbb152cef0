//! implementation of the user store port

use crate::{PgDb, map_db_err, schema::users};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::{
    AsChangeset, ExpressionMethods, Insertable, OptionalExtension, QueryDsl, Queryable,
};
use diesel_async::RunQueryDsl;
use tournament_core::{DbError, DbResult, DbpUser, Role, User};
use tracing::{info, instrument};
use uuid::Uuid;

fn role_to_text(r: Role) -> &'static str {
    match r {
        Role::Admin => "admin",
        Role::Judge => "judge",
        Role::Scorer => "scorer",
        Role::Registrar => "registrar",
        Role::Competitor => "competitor",
        Role::Spectator => "spectator",
    }
}

fn role_from_text(s: &str) -> DbResult<Role> {
    match s {
        "admin" => Ok(Role::Admin),
        "judge" => Ok(Role::Judge),
        "scorer" => Ok(Role::Scorer),
        "registrar" => Ok(Role::Registrar),
        "competitor" => Ok(Role::Competitor),
        "spectator" => Ok(Role::Spectator),
        other => Err(DbError::Other(anyhow::anyhow!("unknown role {other}"))),
    }
}

#[derive(Debug, Queryable)]
struct DbUser {
    id: Uuid,
    version: i64,
    username: String,
    password_hash: String,
    role: String,
    tournament_id: Option<Uuid>,
    competitor_id: Option<Uuid>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = DbError;

    fn try_from(r: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
            role: role_from_text(&r.role)?,
            tournament_id: r.tournament_id,
            competitor_id: r.competitor_id,
            version: r.version,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = users)]
struct WriteDbUser<'a> {
    id: Uuid,
    username: &'a str,
    password_hash: &'a str,
    role: &'static str,
    tournament_id: Option<Uuid>,
    competitor_id: Option<Uuid>,
}

impl<'a> From<&'a User> for WriteDbUser<'a> {
    fn from(u: &'a User) -> Self {
        WriteDbUser {
            id: u.id,
            username: &u.username,
            password_hash: &u.password_hash,
            role: role_to_text(u.role),
            tournament_id: u.tournament_id,
            competitor_id: u.competitor_id,
        }
    }
}

#[async_trait]
impl DbpUser for PgDb {
    #[instrument(name = "db.user.get", skip(self), fields(id = %id))]
    async fn get_user(&self, id: Uuid) -> DbResult<Option<User>> {
        use crate::schema::users::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::users
            .filter(dsl::id.eq(id))
            .first::<DbUser>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(User::try_from).transpose()
    }

    #[instrument(name = "db.user.find_by_username", skip(self, username))]
    async fn find_user_by_username(&self, username: &str) -> DbResult<Option<User>> {
        use crate::schema::users::dsl;
        let mut conn = self.new_connection().await?;
        let row = dsl::users
            .filter(dsl::username.eq(username))
            .first::<DbUser>(&mut conn)
            .await
            .optional()
            .map_err(map_db_err)?;

        row.map(User::try_from).transpose()
    }

    #[instrument(name = "db.user.save", skip(self, user), fields(id = %user.id))]
    async fn save_user(&self, user: &User) -> DbResult<User> {
        use crate::schema::users::dsl;
        let mut conn = self.new_connection().await?;
        let w = WriteDbUser::from(user);

        let row = diesel::insert_into(dsl::users)
            .values(&w)
            .on_conflict(dsl::id)
            .do_update()
            .set(&w)
            .get_result::<DbUser>(&mut conn)
            .await
            .map_err(map_db_err)?;

        info!(saved_id = %row.id, "user_saved");
        User::try_from(row)
    }
}
