use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper, insert_into,
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error as DieselError},
};
use salvo::async_trait;

use crate::core::{
    database::schema::users,
    entities::models::{NewUser, User},
    types::errors::{general::GeneralError, user_error::UserError},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, UserError>;
    async fn get_user_by_id(&self, user_id: i32) -> Result<User, UserError>;
    async fn create_user(&self, user: NewUser<'_>) -> Result<User, UserError>;
}

#[derive(Debug, Clone)]
pub struct UserRepositoryImpl {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl UserRepositoryImpl {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }

    fn get_conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, GeneralError> {
        self.pool.get().map_err(|_| GeneralError::DbConnectionError)
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_all(&self) -> Result<Vec<User>, UserError> {
        let mut conn = self.get_conn()?;

        let users = users::table
            .select(User::as_select())
            .load(&mut conn)
            .map_err(GeneralError::from)?;

        Ok(users)
    }

    async fn get_user_by_id(&self, user_id: i32) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        let user = users::table
            .filter(users::id.eq(user_id))
            .select(User::as_select())
            .first(&mut conn);

        match user {
            Ok(user) => Ok(user),
            Err(DieselError::NotFound) => Err(UserError::UserNotFound(user_id)),
            Err(e) => Err(GeneralError::from(e).into()),
        }
    }

    async fn create_user(&self, user: NewUser<'_>) -> Result<User, UserError> {
        let mut conn = self.get_conn()?;

        let created = insert_into(users::table)
            .values(&user)
            .returning(User::as_returning())
            .get_result(&mut conn);

        match created {
            Ok(user) => Ok(user),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(UserError::EmailTaken)
            }
            Err(e) => Err(GeneralError::from(e).into()),
        }
    }
}
