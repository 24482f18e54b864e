//! Initial schema migration.
//!
//! - `users`: authentication, with the superuser flag
//! - `charity_projects`: fundraising targets, unique by normalized name
//! - `donations`: money given by users
//!
//! Both money tables keep `0 <= invested_amount <= full_amount` and
//! `full_amount > 0` as CHECK constraints.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    IsSuperuser,
}

#[derive(Iden)]
enum CharityProjects {
    Table,
    Id,
    Name,
    NameNorm,
    Description,
    FullAmount,
    InvestedAmount,
    FullyInvested,
    CreateDate,
    CloseDate,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    UserId,
    Comment,
    FullAmount,
    InvestedAmount,
    FullyInvested,
    CreateDate,
    CloseDate,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // Charity projects
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CharityProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CharityProjects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CharityProjects::Name).string_len(100).not_null())
                    .col(ColumnDef::new(CharityProjects::NameNorm).string().not_null())
                    .col(ColumnDef::new(CharityProjects::Description).text().not_null())
                    .col(
                        ColumnDef::new(CharityProjects::FullAmount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(CharityProjects::FullAmount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::InvestedAmount)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(CharityProjects::InvestedAmount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::FullyInvested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CharityProjects::CreateDate)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CharityProjects::CloseDate).timestamp())
                    .check(
                        Expr::col(CharityProjects::InvestedAmount)
                            .lte(Expr::col(CharityProjects::FullAmount)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-name_norm-unique")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-fully_invested-create_date")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::FullyInvested)
                    .col(CharityProjects::CreateDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // Donations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::UserId).string().not_null())
                    .col(ColumnDef::new(Donations::Comment).text())
                    .col(
                        ColumnDef::new(Donations::FullAmount)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Donations::FullAmount).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Donations::InvestedAmount)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Donations::InvestedAmount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Donations::FullyInvested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Donations::CreateDate).timestamp().not_null())
                    .col(ColumnDef::new(Donations::CloseDate).timestamp())
                    .check(
                        Expr::col(Donations::InvestedAmount).lte(Expr::col(Donations::FullAmount)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-user_id")
                            .from(Donations::Table, Donations::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-fully_invested-create_date")
                    .table(Donations::Table)
                    .col(Donations::FullyInvested)
                    .col(Donations::CreateDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .col(Donations::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CharityProjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
