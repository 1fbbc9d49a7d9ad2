use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{NewUser, User};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub fullname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub age: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            fullname: model.fullname,
            email: model.email,
            age: model.age,
            bio: model.bio,
        }
    }
}

// Insert leaves the id to the serial column
impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        ActiveModel {
            id: NotSet,
            fullname: Set(input.fullname),
            email: Set(input.email),
            age: Set(input.age),
            bio: Set(input.bio),
        }
    }
}

impl ActiveModel {
    /// Full replacement of an existing row's fields
    pub fn replacing(id: i32, input: NewUser) -> Self {
        ActiveModel {
            id: Unchanged(id),
            ..input.into()
        }
    }
}
