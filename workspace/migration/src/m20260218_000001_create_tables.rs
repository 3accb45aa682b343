use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create category_groups table
        manager
            .create_table(
                Table::create()
                    .table(CategoryGroups::Table)
                    .if_not_exists()
                    .col(pk_auto(CategoryGroups::Id))
                    .col(uuid(CategoryGroups::UserId))
                    .col(string(CategoryGroups::Name))
                    .col(string_len(CategoryGroups::Kind, 16))
                    .col(integer(CategoryGroups::SortOrder).default(0))
                    .col(boolean(CategoryGroups::IsArchived).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_category_groups_user_kind_name")
                    .table(CategoryGroups::Table)
                    .col(CategoryGroups::UserId)
                    .col(CategoryGroups::Kind)
                    .col(CategoryGroups::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create accounts table (budgeting categories)
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(uuid(Accounts::UserId))
                    .col(string(Accounts::Name))
                    .col(string_len(Accounts::Kind, 16))
                    .col(string_null(Accounts::GroupName))
                    .col(integer_null(Accounts::GroupId))
                    .col(boolean(Accounts::IsFixed).default(false))
                    .col(decimal_len(Accounts::Budget, 14, 2).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_group")
                            .from(Accounts::Table, Accounts::GroupId)
                            .to(CategoryGroups::Table, CategoryGroups::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::AccountId))
                    .col(uuid(Transactions::UserId))
                    .col(date(Transactions::Date))
                    .col(decimal_len(Transactions::Amount, 14, 2))
                    .col(string_null(Transactions::Note))
                    .col(string_len(Transactions::Status, 16))
                    .col(boolean(Transactions::IsAuto).default(false))
                    .col(timestamp_with_time_zone(Transactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Read paths filter by (user, date) constantly
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // Create budget_plan_months table
        manager
            .create_table(
                Table::create()
                    .table(BudgetPlanMonths::Table)
                    .if_not_exists()
                    .col(pk_auto(BudgetPlanMonths::Id))
                    .col(uuid(BudgetPlanMonths::UserId))
                    .col(integer(BudgetPlanMonths::Year))
                    .col(integer(BudgetPlanMonths::Month))
                    .col(decimal_len(BudgetPlanMonths::ForecastDisposableIncome, 14, 2).default(0))
                    .col(boolean(BudgetPlanMonths::UseGrossIncomeBase).default(false))
                    .col(timestamp_with_time_zone(BudgetPlanMonths::CreatedAt))
                    .col(timestamp_with_time_zone(BudgetPlanMonths::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_budget_plan_months_user_year_month")
                    .table(BudgetPlanMonths::Table)
                    .col(BudgetPlanMonths::UserId)
                    .col(BudgetPlanMonths::Year)
                    .col(BudgetPlanMonths::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create budget_plan_group_allocations table
        manager
            .create_table(
                Table::create()
                    .table(Allocations::Table)
                    .if_not_exists()
                    .col(pk_auto(Allocations::Id))
                    .col(uuid(Allocations::UserId))
                    .col(integer(Allocations::PlanMonthId))
                    .col(integer(Allocations::GroupId))
                    .col(string_len(Allocations::InputMode, 16))
                    .col(decimal_len(Allocations::PlannedPercent, 9, 4).default(0))
                    .col(decimal_len(Allocations::PlannedAmount, 14, 2).default(0))
                    .col(integer(Allocations::Priority).default(0))
                    .col(timestamp_with_time_zone(Allocations::CreatedAt))
                    .col(timestamp_with_time_zone(Allocations::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_plan_month")
                            .from(Allocations::Table, Allocations::PlanMonthId)
                            .to(BudgetPlanMonths::Table, BudgetPlanMonths::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_group")
                            .from(Allocations::Table, Allocations::GroupId)
                            .to(CategoryGroups::Table, CategoryGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_allocations_plan_month_group")
                    .table(Allocations::Table)
                    .col(Allocations::PlanMonthId)
                    .col(Allocations::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Allocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BudgetPlanMonths::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CategoryGroups::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CategoryGroups {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    SortOrder,
    IsArchived,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    GroupName,
    GroupId,
    IsFixed,
    Budget,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    AccountId,
    UserId,
    Date,
    Amount,
    Note,
    Status,
    IsAuto,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BudgetPlanMonths {
    Table,
    Id,
    UserId,
    Year,
    Month,
    ForecastDisposableIncome,
    UseGrossIncomeBase,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Allocations {
    #[sea_orm(iden = "budget_plan_group_allocations")]
    Table,
    Id,
    UserId,
    PlanMonthId,
    GroupId,
    InputMode,
    PlannedPercent,
    PlannedAmount,
    Priority,
    CreatedAt,
    UpdatedAt,
}
