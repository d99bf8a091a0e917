use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 banner_links_media 表（append-only 事实表）
        manager
            .create_table(
                Table::create()
                    .table(BannerLinkMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BannerLinkMedia::BannerId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BannerLinkMedia::BannerLink)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BannerLinkMedia::Title).text().not_null())
                    .col(
                        ColumnDef::new(BannerLinkMedia::PublicationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BannerLinkMedia::IsOuter)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BannerLinkMedia::Channel).string().not_null())
                    .col(ColumnDef::new(BannerLinkMedia::Link).text().not_null())
                    .col(
                        ColumnDef::new(BannerLinkMedia::IsTechnical)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BannerLinkMedia::Partner).string().not_null())
                    .col(
                        ColumnDef::new(BannerLinkMedia::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BannerLinkMedia::TimeCreated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 报表按 channel / time_created 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_banner_links_channel")
                    .table(BannerLinkMedia::Table)
                    .col(BannerLinkMedia::Channel)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_banner_links_time_created")
                    .table(BannerLinkMedia::Table)
                    .col(BannerLinkMedia::TimeCreated)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_banner_links_time_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_banner_links_channel").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BannerLinkMedia::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BannerLinkMedia {
    #[sea_orm(iden = "banner_links_media")]
    Table,
    BannerId,
    BannerLink,
    Title,
    PublicationType,
    IsOuter,
    Channel,
    Link,
    IsTechnical,
    Partner,
    IsDeleted,
    TimeCreated,
}
