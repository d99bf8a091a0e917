use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "banner_links_media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub banner_id: i64,
    #[sea_orm(column_type = "Text")]
    pub banner_link: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    pub publication_type: String,
    pub is_outer: bool,
    pub channel: String,
    #[sea_orm(column_type = "Text")]
    pub link: String,
    pub is_technical: bool,
    pub partner: String,
    pub is_deleted: bool,
    pub time_created: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
