use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_outlets_table::Migration),
            Box::new(m20240601_000002_create_users_table::Migration),
            Box::new(m20240601_000003_create_leaves_table::Migration),
            Box::new(m20240601_000004_create_leave_balances_table::Migration),
            Box::new(m20240601_000005_create_signup_requests_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240601_000001_create_outlets_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_outlets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Outlets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Outlets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Outlets::Name).string().not_null())
                        .col(ColumnDef::new(Outlets::Address).string().not_null())
                        .col(ColumnDef::new(Outlets::City).string().not_null())
                        .col(ColumnDef::new(Outlets::ManagerId).uuid().null())
                        .col(
                            ColumnDef::new(Outlets::EmployeeCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Outlets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Outlets::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Outlets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Outlets {
        Table,
        Id,
        Name,
        Address,
        City,
        ManagerId,
        EmployeeCount,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000002_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .unique_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Users::EmployeeId)
                                .string()
                                .unique_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::Mobile).string().not_null())
                        .col(ColumnDef::new(Users::OutletId).uuid().null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_outlet_id")
                        .table(Users::Table)
                        .col(Users::OutletId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        Name,
        Role,
        EmployeeId,
        Mobile,
        OutletId,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000003_create_leaves_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_leaves_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Leaves::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Leaves::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Leaves::EmployeeId).uuid().not_null())
                        .col(ColumnDef::new(Leaves::EmployeeName).string().not_null())
                        .col(ColumnDef::new(Leaves::OutletId).uuid().not_null())
                        .col(ColumnDef::new(Leaves::OutletName).string().not_null())
                        .col(ColumnDef::new(Leaves::LeaveType).string_len(16).not_null())
                        .col(ColumnDef::new(Leaves::StartDate).date().not_null())
                        .col(ColumnDef::new(Leaves::EndDate).date().not_null())
                        .col(ColumnDef::new(Leaves::Reason).text().not_null())
                        .col(ColumnDef::new(Leaves::Status).string_len(16).not_null())
                        .col(ColumnDef::new(Leaves::AppliedOn).date().not_null())
                        .col(ColumnDef::new(Leaves::Document).string().null())
                        .col(ColumnDef::new(Leaves::Remarks).string().null())
                        .col(ColumnDef::new(Leaves::ReviewedBy).string().null())
                        .col(ColumnDef::new(Leaves::ReviewedOn).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_leaves_employee_id")
                        .table(Leaves::Table)
                        .col(Leaves::EmployeeId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_leaves_outlet_id")
                        .table(Leaves::Table)
                        .col(Leaves::OutletId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Leaves::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Leaves {
        Table,
        Id,
        EmployeeId,
        EmployeeName,
        OutletId,
        OutletName,
        LeaveType,
        StartDate,
        EndDate,
        Reason,
        Status,
        AppliedOn,
        Document,
        Remarks,
        ReviewedBy,
        ReviewedOn,
    }
}

mod m20240601_000004_create_leave_balances_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_leave_balances_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(LeaveBalances::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(LeaveBalances::UserId)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(LeaveBalances::Casual).integer().not_null())
                        .col(ColumnDef::new(LeaveBalances::Sick).integer().not_null())
                        .col(ColumnDef::new(LeaveBalances::Paid).integer().not_null())
                        .col(
                            ColumnDef::new(LeaveBalances::Emergency)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(LeaveBalances::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(LeaveBalances::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum LeaveBalances {
        Table,
        UserId,
        Casual,
        Sick,
        Paid,
        Emergency,
        UpdatedAt,
    }
}

mod m20240601_000005_create_signup_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_signup_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SignupRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SignupRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SignupRequests::FullName).string().not_null())
                        .col(ColumnDef::new(SignupRequests::Email).string().not_null())
                        .col(ColumnDef::new(SignupRequests::Mobile).string().not_null())
                        .col(
                            ColumnDef::new(SignupRequests::PasswordHash)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SignupRequests::OutletId).uuid().not_null())
                        .col(
                            ColumnDef::new(SignupRequests::Department)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SignupRequests::Designation)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SignupRequests::Status)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(SignupRequests::AppliedOn).date().not_null())
                        .col(ColumnDef::new(SignupRequests::Remarks).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SignupRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SignupRequests {
        Table,
        Id,
        FullName,
        Email,
        Mobile,
        PasswordHash,
        OutletId,
        Department,
        Designation,
        Status,
        AppliedOn,
        Remarks,
    }
}
