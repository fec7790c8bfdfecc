use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::TaxId)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::Street).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::Neighborhood).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::City).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::State).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::PostalCode).string_len(10).not_null())
                    .col(ColumnDef::new(Companies::Contact).string_len(100).not_null())
                    .col(ColumnDef::new(Companies::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Companies::Phone).string_len(20).not_null())
                    .col(ColumnDef::new(Companies::Logo).string_len(255))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::StationId)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Stations::Notes).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ingredients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ingredients::IngredientId)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ingredients::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Ingredients::UnitSize).decimal_len(12, 3).not_null())
                    .col(ColumnDef::new(Ingredients::Notes).text())
                    .col(
                        ColumnDef::new(Ingredients::Weighed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Formulas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Formulas::FormulaId)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Formulas::BatchCode).string_len(20))
                    .col(ColumnDef::new(Formulas::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FormulaLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormulaLines::LineId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormulaLines::Quantity).decimal_len(12, 3).not_null())
                    .col(ColumnDef::new(FormulaLines::Tolerance).integer().not_null())
                    .col(ColumnDef::new(FormulaLines::FormulaId).string_len(20).not_null())
                    .col(ColumnDef::new(FormulaLines::IngredientId).string_len(20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formula_line_formula")
                            .from(FormulaLines::Table, FormulaLines::FormulaId)
                            .to(Formulas::Table, Formulas::FormulaId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_formula_line_ingredient")
                            .from(FormulaLines::Table, FormulaLines::IngredientId)
                            .to(Ingredients::Table, Ingredients::IngredientId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    // One line per ingredient within a formula
                    .index(
                        Index::create()
                            .name("formula_lines_formula_ingredient_unique")
                            .col(FormulaLines::FormulaId)
                            .col(FormulaLines::IngredientId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Rfid)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Operators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operators::Rfid)
                            .string_len(50)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Operators::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Operators::Password).string_len(255).not_null())
                    .col(ColumnDef::new(Operators::StationId).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Operators::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operator_station")
                            .from(Operators::Table, Operators::StationId)
                            .to(Stations::Table, Stations::StationId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductionOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionOrders::Folio)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductionOrders::OrderTag).string_len(50).not_null())
                    .col(ColumnDef::new(ProductionOrders::FormulaId).string_len(20))
                    .col(ColumnDef::new(ProductionOrders::Lot).string_len(50))
                    .col(ColumnDef::new(ProductionOrders::TargetWeight).decimal_len(12, 3))
                    .col(
                        ColumnDef::new(ProductionOrders::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductionOrders::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ProductionOrders::UserId).string_len(50))
                    // Deleting a formula or user keeps the production history
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_formula")
                            .from(ProductionOrders::Table, ProductionOrders::FormulaId)
                            .to(Formulas::Table, Formulas::FormulaId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_user")
                            .from(ProductionOrders::Table, ProductionOrders::UserId)
                            .to(Users::Table, Users::Rfid)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductionDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionDetails::DetailId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductionDetails::Folio).integer().not_null())
                    .col(ColumnDef::new(ProductionDetails::IngredientId).string_len(20).not_null())
                    .col(ColumnDef::new(ProductionDetails::WeighedAmount).decimal_len(12, 3))
                    .col(ColumnDef::new(ProductionDetails::MaxWeight).decimal_len(12, 3))
                    .col(ColumnDef::new(ProductionDetails::MinWeight).decimal_len(12, 3))
                    .col(
                        ColumnDef::new(ProductionDetails::Weighed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_detail_order")
                            .from(ProductionDetails::Table, ProductionDetails::Folio)
                            .to(ProductionOrders::Table, ProductionOrders::Folio)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_production_detail_ingredient")
                            .from(ProductionDetails::Table, ProductionDetails::IngredientId)
                            .to(Ingredients::Table, Ingredients::IngredientId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_status_timestamp")
                    .table(ProductionOrders::Table)
                    .col(ProductionOrders::Status)
                    .col(ProductionOrders::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_production_details_folio")
                    .table(ProductionDetails::Table)
                    .col(ProductionDetails::Folio)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductionDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductionOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Operators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormulaLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Formulas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Companies {
    #[sea_orm(iden = "Empresa")]
    Table,
    #[sea_orm(iden = "rfc")]
    TaxId,
    #[sea_orm(iden = "nombre")]
    Name,
    #[sea_orm(iden = "calle")]
    Street,
    #[sea_orm(iden = "colonia")]
    Neighborhood,
    #[sea_orm(iden = "ciudad")]
    City,
    #[sea_orm(iden = "estado")]
    State,
    #[sea_orm(iden = "cp")]
    PostalCode,
    #[sea_orm(iden = "contacto")]
    Contact,
    #[sea_orm(iden = "correo")]
    Email,
    #[sea_orm(iden = "telefono")]
    Phone,
    #[sea_orm(iden = "logotipo")]
    Logo,
}

#[derive(DeriveIden)]
enum Stations {
    #[sea_orm(iden = "Estaciones")]
    Table,
    #[sea_orm(iden = "idest")]
    StationId,
    #[sea_orm(iden = "nombre")]
    Name,
    #[sea_orm(iden = "obs")]
    Notes,
}

#[derive(DeriveIden)]
enum Ingredients {
    #[sea_orm(iden = "Ingredientes")]
    Table,
    #[sea_orm(iden = "iding")]
    IngredientId,
    #[sea_orm(iden = "nombre")]
    Name,
    #[sea_orm(iden = "presentacion")]
    UnitSize,
    #[sea_orm(iden = "observaciones")]
    Notes,
    #[sea_orm(iden = "pesado")]
    Weighed,
}

#[derive(DeriveIden)]
enum Formulas {
    #[sea_orm(iden = "Formulas")]
    Table,
    #[sea_orm(iden = "idform")]
    FormulaId,
    #[sea_orm(iden = "folio")]
    BatchCode,
    #[sea_orm(iden = "nombre")]
    Name,
}

#[derive(DeriveIden)]
enum FormulaLines {
    #[sea_orm(iden = "Detalle_Formula")]
    Table,
    #[sea_orm(iden = "iddetalle")]
    LineId,
    #[sea_orm(iden = "cantidad")]
    Quantity,
    #[sea_orm(iden = "tolerancia")]
    Tolerance,
    #[sea_orm(iden = "idform")]
    FormulaId,
    #[sea_orm(iden = "iding")]
    IngredientId,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "Usuarios")]
    Table,
    #[sea_orm(iden = "rfid")]
    Rfid,
    #[sea_orm(iden = "nombre")]
    Name,
    #[sea_orm(iden = "correo")]
    Email,
    #[sea_orm(iden = "password")]
    Password,
    #[sea_orm(iden = "rol")]
    Role,
    #[sea_orm(iden = "activo")]
    Active,
}

#[derive(DeriveIden)]
enum Operators {
    #[sea_orm(iden = "Operadores")]
    Table,
    #[sea_orm(iden = "rfid")]
    Rfid,
    #[sea_orm(iden = "nombre")]
    Name,
    #[sea_orm(iden = "password")]
    Password,
    #[sea_orm(iden = "idest")]
    StationId,
    #[sea_orm(iden = "activo")]
    Active,
}

#[derive(DeriveIden)]
enum ProductionOrders {
    #[sea_orm(iden = "Produccion")]
    Table,
    #[sea_orm(iden = "folio")]
    Folio,
    #[sea_orm(iden = "op")]
    OrderTag,
    #[sea_orm(iden = "IdForm")]
    FormulaId,
    #[sea_orm(iden = "lote")]
    Lot,
    #[sea_orm(iden = "pesform")]
    TargetWeight,
    #[sea_orm(iden = "estatus")]
    Status,
    #[sea_orm(iden = "fecha")]
    Timestamp,
    #[sea_orm(iden = "IdUsu")]
    UserId,
}

#[derive(DeriveIden)]
enum ProductionDetails {
    #[sea_orm(iden = "Detalle_Produccion")]
    Table,
    #[sea_orm(iden = "iddetalleproduccion")]
    DetailId,
    #[sea_orm(iden = "FolioProduccion")]
    Folio,
    #[sea_orm(iden = "IdIng")]
    IngredientId,
    #[sea_orm(iden = "pesing")]
    WeighedAmount,
    #[sea_orm(iden = "pmax")]
    MaxWeight,
    #[sea_orm(iden = "pmin")]
    MinWeight,
    #[sea_orm(iden = "pesado")]
    Weighed,
}
