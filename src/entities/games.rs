use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One listed downloadable item (game or program).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "games")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub image_url: String,

    pub download_url: String,

    /// 'Android', 'PC', 'Programs' by convention; not a closed set.
    pub category: String,

    pub developer: Option<String>,

    pub description: Option<String>,

    pub youtube_url: Option<String>,

    /// Display order, higher = shown first.
    pub order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
