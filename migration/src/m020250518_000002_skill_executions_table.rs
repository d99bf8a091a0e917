use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 skill_executions 运行登记表
        manager
            .create_table(
                Table::create()
                    .table(SkillExecution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SkillExecution::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SkillExecution::SkillName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SkillExecution::Payload).text().not_null())
                    .col(ColumnDef::new(SkillExecution::Status).string().not_null())
                    .col(ColumnDef::new(SkillExecution::Result).text().null())
                    .col(
                        ColumnDef::new(SkillExecution::TimeCreated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SkillExecution::TimeUpdated)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_skill_executions_name")
                    .table(SkillExecution::Table)
                    .col(SkillExecution::SkillName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_skill_executions_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SkillExecution::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SkillExecution {
    #[sea_orm(iden = "skill_executions")]
    Table,
    Id,
    SkillName,
    Payload,
    Status,
    Result,
    TimeCreated,
    TimeUpdated,
}
