#![allow(dead_code)]

use symbiosis::{
    ColumnDeclaration, ColumnType, Connection, ConnectionOptions, Entity, EntityDeclaration,
    NamingStrategy, RelationDeclaration,
};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `{ id: PrimaryColumn(String), foo: Column(Number), subTest: OneToMany(SubTestEntity) }`
pub struct TestEntity;

impl Entity for TestEntity {
    const NAME: &'static str = "TestEntity";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .column(ColumnDeclaration::primary("id", ColumnType::String))
            .column(ColumnDeclaration::column("foo", ColumnType::Number))
            .relation(RelationDeclaration::one_to_many::<SubTestEntity>(
                "subTest", "id", "testId",
            ))
    }
}

/// Target of `TestEntity.subTest`, registered as a table without being listed
pub struct SubTestEntity;

impl Entity for SubTestEntity {
    const NAME: &'static str = "SubTestEntity";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .column(ColumnDeclaration::primary("id", ColumnType::String))
            .column(ColumnDeclaration::column("testId", ColumnType::String))
    }
}

/// `{ id: PrimaryGeneratedColumn(uuid), foo: Column(Number) }`
pub struct User;

impl Entity for User {
    const NAME: &'static str = "User";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .column(ColumnDeclaration::primary_generated("id", ColumnType::String))
            .column(ColumnDeclaration::column("foo", ColumnType::Number))
    }
}

/// Every date column kind plus an explicit column and table name
pub struct Article;

impl Entity for Article {
    const NAME: &'static str = "Article";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .table_name("articles")
            .column(ColumnDeclaration::primary_generated("id", ColumnType::String))
            .column(ColumnDeclaration::column("title", ColumnType::String).name("article_title"))
            .column(ColumnDeclaration::column("views", ColumnType::Number))
            .column(ColumnDeclaration::save_date("createdAt"))
            .column(ColumnDeclaration::update_date("updatedAt"))
            .column(ColumnDeclaration::delete_date("deletedAt"))
    }
}

/// Embedded in `Person`, never listed on its own
pub struct Address;

impl Entity for Address {
    const NAME: &'static str = "Address";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .column(ColumnDeclaration::column("streetName", ColumnType::String))
            .column(ColumnDeclaration::column("zipCode", ColumnType::String).name("postal_code"))
    }
}

/// `{ id, homeAddress: Address, pastAddresses: Array<Address> }`
pub struct Person;

impl Entity for Person {
    const NAME: &'static str = "Person";

    fn declare() -> EntityDeclaration {
        EntityDeclaration::new()
            .column(ColumnDeclaration::primary("id", ColumnType::String))
            .column(ColumnDeclaration::embedded::<Address>("homeAddress"))
            .column(ColumnDeclaration::embedded_many::<Address>("pastAddresses"))
    }
}

pub fn person_connection() -> Connection {
    init_logger();
    Connection::new(
        ConnectionOptions::new()
            .entity::<Person>()
            .column_naming(NamingStrategy::UpperCase),
    )
    .unwrap()
}

pub fn connection_options() -> ConnectionOptions {
    ConnectionOptions::new()
        .entity::<TestEntity>()
        .entity::<User>()
        .entity::<Article>()
        .column_naming(NamingStrategy::UpperCase)
}

pub fn setup_connection() -> Connection {
    init_logger();
    Connection::new(connection_options()).unwrap()
}
