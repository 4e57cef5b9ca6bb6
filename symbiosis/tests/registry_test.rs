mod helpers;

use helpers::{
    person_connection, setup_connection, Address, Article, Person, SubTestEntity, TestEntity, User,
};
use symbiosis::{
    AutoGenerationType, ColumnDeclaration, ColumnType, Connection, ConnectionOptions, Entity,
    EntityDeclaration, EntityRef, ErrorCode, ErrorKind, ErrorOrigin, Event, NamingStrategy,
    RelationDeclaration,
};

mod naming_tests {
    use super::*;

    #[test]
    fn test_strategy_applied_without_override() {
        let connection = setup_connection();
        let manager = connection.entity_manager();

        let foo = manager
            .get_column_metadata(EntityRef::of::<User>(), "foo")
            .unwrap();
        assert_eq!(foo.database_name, "FOO");
        assert!(!foo.is_name_already_formatted);

        let created_at = manager
            .get_column_metadata(EntityRef::of::<Article>(), "createdAt")
            .unwrap();
        assert_eq!(created_at.database_name, "CREATED_AT");
    }

    #[test]
    fn test_explicit_name_is_used_verbatim() {
        let connection = setup_connection();
        let manager = connection.entity_manager();

        let title = manager
            .get_column_metadata(EntityRef::of::<Article>(), "title")
            .unwrap();
        assert_eq!(title.database_name, "article_title");
        assert!(title.is_name_already_formatted);

        let article = manager
            .get_entity_metadata(EntityRef::of::<Article>())
            .unwrap();
        assert_eq!(article.database_name, "articles");
        assert!(article.is_name_already_formatted);

        let user = manager.get_entity_metadata(EntityRef::of::<User>()).unwrap();
        assert_eq!(user.database_name, "User");
        assert!(!user.is_name_already_formatted);
    }

    #[test]
    fn test_table_naming_strategy() {
        let connection = Connection::new(
            ConnectionOptions::new()
                .entity::<User>()
                .table_naming(NamingStrategy::SnakeCase),
        )
        .unwrap();
        let user = connection
            .entity_manager()
            .get_entity_metadata(EntityRef::of::<User>())
            .unwrap();
        assert_eq!(user.database_name, "user");

        // Column strategy left at its default keeps logical names
        assert_eq!(user.column("foo").unwrap().database_name, "foo");
    }
}

mod metadata_tests {
    use super::*;

    #[test]
    fn test_primary_generated_column_metadata() {
        let connection = setup_connection();
        let id = connection
            .entity_manager()
            .get_column_metadata(EntityRef::of::<User>(), "id")
            .unwrap();

        assert!(id.primary);
        assert!(id.is_auto_generated);
        assert_eq!(id.column_type, ColumnType::String);
        assert_eq!(id.auto_generate.as_deref(), Some("uuid"));
        assert_eq!(id.auto_generate_only_on_events, vec![Event::Save]);
        assert_eq!(
            id.auto_generation_type,
            Some(AutoGenerationType::EntityToDatabase)
        );
    }

    #[test]
    fn test_date_columns_metadata() {
        let connection = setup_connection();
        let article = connection
            .entity_manager()
            .get_entity_metadata(EntityRef::of::<Article>())
            .unwrap();

        let created_at = article.column("createdAt").unwrap();
        assert_eq!(created_at.auto_generate.as_deref(), Some("date"));
        assert_eq!(
            created_at.auto_generate_only_on_events,
            vec![Event::Save, Event::Insert]
        );

        let updated_at = article.column("updatedAt").unwrap();
        assert_eq!(
            updated_at.auto_generate_only_on_events,
            vec![Event::Save, Event::Insert, Event::Update, Event::Upsert]
        );

        let deleted_at = article.delete_date_column().unwrap();
        assert_eq!(deleted_at.name, "deletedAt");
        assert!(!deleted_at.is_auto_generated);
        assert!(deleted_at.auto_generate_only_on_events.is_empty());
    }

    #[test]
    fn test_database_generated_columns() {
        struct Invoice;
        impl Entity for Invoice {
            const NAME: &'static str = "Invoice";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(
                        ColumnDeclaration::primary_generated("id", ColumnType::Number)
                            .strategy("serial")
                            .database_generated(),
                    )
                    .column(ColumnDeclaration::update_date("updatedAt").database_generated())
                    .column(ColumnDeclaration::column("total", ColumnType::Number).database_generated())
            }
        }

        // No generator is needed for a strategy the database applies
        helpers::init_logger();
        let connection = Connection::new(ConnectionOptions::new().entity::<Invoice>()).unwrap();
        let manager = connection.entity_manager();
        let invoice = manager.get_entity_metadata(EntityRef::of::<Invoice>()).unwrap();

        for name in ["id", "updatedAt"] {
            let column = invoice.column(name).unwrap();
            assert!(column.is_auto_generated);
            assert_eq!(
                column.auto_generation_type,
                Some(AutoGenerationType::DatabaseToEntity)
            );
            assert_eq!(column.auto_generate, None);
            assert!(column.auto_generate_only_on_events.is_empty());
            assert!(!column.generates_on(Event::Save));
        }
        let total = invoice.column("total").unwrap();
        assert!(!total.is_auto_generated);
        assert_eq!(total.auto_generation_type, None);

        let data = manager
            .auto_generate_entity_to_database(
                EntityRef::of::<Invoice>(),
                &Default::default(),
                Event::Update,
            )
            .unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_primary_columns_in_declaration_order() {
        let connection = setup_connection();
        let manager = connection.entity_manager();

        let primary = manager
            .get_entity_primary_columns(EntityRef::of::<TestEntity>())
            .unwrap();
        assert_eq!(
            primary.iter().map(|column| column.name.as_str()).collect::<Vec<_>>(),
            vec!["id"]
        );
    }

    #[test]
    fn test_entity_without_primary_columns() {
        struct Log;
        impl Entity for Log {
            const NAME: &'static str = "Log";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new().column(ColumnDeclaration::column("line", ColumnType::String))
            }
        }

        let connection = Connection::new(ConnectionOptions::new().entity::<Log>()).unwrap();
        let primary = connection
            .entity_manager()
            .get_entity_primary_columns(EntityRef::of::<Log>())
            .unwrap();
        assert!(primary.is_empty());
    }
}

mod lookup_tests {
    use super::*;

    struct Ghost;
    impl Entity for Ghost {
        const NAME: &'static str = "Ghost";
        fn declare() -> EntityDeclaration {
            EntityDeclaration::new()
        }
    }

    #[test]
    fn test_unregistered_entity() {
        let connection = setup_connection();
        let err = connection
            .entity_manager()
            .get_entity_metadata(EntityRef::of::<Ghost>())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::EntityNotRegistered);
        assert_eq!(err.code, ErrorCode::EntityError);
        assert_eq!(err.origin, ErrorOrigin::Symbiosis);
        assert_eq!(err.message, "Entity not Registered");
        assert_eq!(err.details, vec!["Entity: Ghost"]);

        assert!(connection.repository::<Ghost>().is_err());
    }

    #[test]
    fn test_unknown_column() {
        let connection = setup_connection();
        let err = connection
            .entity_manager()
            .get_column_metadata(EntityRef::of::<User>(), "bar")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
        assert_eq!(err.message, "Column not found");
        assert_eq!(err.details, vec!["Entity: User", "Column: bar"]);
    }

    #[test]
    fn test_lookup_by_name_accepts_module_path() {
        let connection = setup_connection();
        let manager = connection.entity_manager();

        assert_eq!(
            manager.get_entity_metadata_by_name("User").unwrap().class_name,
            "User"
        );
        assert_eq!(
            manager
                .get_entity_metadata_by_name("app::models::User")
                .unwrap()
                .class_name,
            "User"
        );
        assert!(manager.get_entity_metadata_by_name("app::Ghost").is_err());
    }
}

mod sub_entity_tests {
    use super::*;

    #[test]
    fn test_relation_targets_registered_as_tables() {
        let connection = setup_connection();
        let manager = connection.entity_manager();

        let sub = manager
            .get_entity_metadata(EntityRef::of::<SubTestEntity>())
            .unwrap();
        assert!(!sub.is_sub_entity);
        assert_eq!(sub.column("testId").unwrap().database_name, "TEST_ID");

        let all: Vec<&str> = manager
            .get_all_entities_metadata()
            .iter()
            .map(|entity| entity.class_name.as_str())
            .collect();
        assert_eq!(all, vec!["TestEntity", "User", "Article", "SubTestEntity"]);

        let tables: Vec<&str> = manager
            .get_all_tables_metadata()
            .into_iter()
            .map(|entity| entity.class_name.as_str())
            .collect();
        assert_eq!(tables, vec!["TestEntity", "User", "Article", "SubTestEntity"]);
    }

    #[test]
    fn test_embedded_columns_register_sub_entities() {
        let connection = person_connection();
        let manager = connection.entity_manager();

        let address = manager
            .get_entity_metadata(EntityRef::of::<Address>())
            .unwrap();
        assert!(address.is_sub_entity);
        assert_eq!(address.column("streetName").unwrap().database_name, "STREET_NAME");

        let person = manager.get_entity_metadata(EntityRef::of::<Person>()).unwrap();
        let home = person.column("homeAddress").unwrap();
        assert_eq!(home.sub_entity, Some(EntityRef::of::<Address>()));
        assert_eq!(home.column_type, ColumnType::custom("Address"));
        let past = person.column("pastAddresses").unwrap();
        assert_eq!(past.sub_entity, Some(EntityRef::of::<Address>()));
        assert_eq!(
            past.column_type,
            ColumnType::array_of(ColumnType::custom("Address"))
        );
        assert_eq!(person.column("id").unwrap().sub_entity, None);

        assert_eq!(manager.get_all_entities_metadata().len(), 2);
        let tables: Vec<&str> = manager
            .get_all_tables_metadata()
            .into_iter()
            .map(|entity| entity.class_name.as_str())
            .collect();
        assert_eq!(tables, vec!["Person"]);
    }

    #[test]
    fn test_relation_to_entity_listed_later() {
        // The target appears after the entity referencing it
        let connection = Connection::new(
            ConnectionOptions::new()
                .entity::<TestEntity>()
                .entity::<SubTestEntity>(),
        )
        .unwrap();
        let sub = connection
            .entity_manager()
            .get_entity_metadata(EntityRef::of::<SubTestEntity>())
            .unwrap();
        assert!(!sub.is_sub_entity);
        assert_eq!(connection.entity_manager().get_all_tables_metadata().len(), 2);
    }

    #[test]
    fn test_nested_sub_entities_are_followed() {
        struct Leaf;
        impl Entity for Leaf {
            const NAME: &'static str = "Leaf";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::primary("id", ColumnType::Number))
                    .column(ColumnDeclaration::column("branchId", ColumnType::Number))
            }
        }
        struct Branch;
        impl Entity for Branch {
            const NAME: &'static str = "Branch";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::primary("id", ColumnType::Number))
                    .column(ColumnDeclaration::column("treeId", ColumnType::Number))
                    .relation(RelationDeclaration::one_to_many::<Leaf>("leaves", "id", "branchId"))
            }
        }
        struct Tree;
        impl Entity for Tree {
            const NAME: &'static str = "Tree";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::primary("id", ColumnType::Number))
                    .relation(RelationDeclaration::one_to_many::<Branch>("branches", "id", "treeId"))
            }
        }

        let connection = Connection::new(ConnectionOptions::new().entity::<Tree>()).unwrap();
        let manager = connection.entity_manager();
        assert!(manager.is_registered(EntityRef::of::<Branch>()));
        assert!(manager.is_registered(EntityRef::of::<Leaf>()));
        assert_eq!(manager.get_all_tables_metadata().len(), 3);
    }

    #[test]
    fn test_embedded_entities_are_followed() {
        struct Coordinates;
        impl Entity for Coordinates {
            const NAME: &'static str = "Coordinates";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::column("latDeg", ColumnType::Number))
                    .column(ColumnDeclaration::column("lngDeg", ColumnType::Number))
            }
        }
        struct Place;
        impl Entity for Place {
            const NAME: &'static str = "Place";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::column("label", ColumnType::String))
                    .column(ColumnDeclaration::embedded::<Coordinates>("geoPosition"))
            }
        }
        struct Trip;
        impl Entity for Trip {
            const NAME: &'static str = "Trip";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::primary("id", ColumnType::String))
                    .column(ColumnDeclaration::embedded_many::<Place>("stopList"))
            }
        }

        helpers::init_logger();
        let connection = Connection::new(
            ConnectionOptions::new()
                .entity::<Trip>()
                .column_naming(NamingStrategy::SnakeCase),
        )
        .unwrap();
        let manager = connection.entity_manager();
        assert!(manager.get_entity_metadata(EntityRef::of::<Place>()).unwrap().is_sub_entity);
        assert!(
            manager
                .get_entity_metadata(EntityRef::of::<Coordinates>())
                .unwrap()
                .is_sub_entity
        );
        assert_eq!(manager.get_all_tables_metadata().len(), 1);

        let data = manager
            .convert_entity_to_database(
                EntityRef::of::<Trip>(),
                &symbiosis::record! {
                    "id": "t1",
                    "stopList": [{ "label": "home", "geoPosition": { "latDeg": 1, "lngDeg": 2 } }],
                },
            )
            .unwrap();
        assert_eq!(
            data,
            symbiosis::record! {
                "id": "t1",
                "stop_list": [{ "label": "home", "geo_position": { "lat_deg": 1, "lng_deg": 2 } }],
            }
        );
    }

    #[test]
    fn test_relation_map_must_reference_declared_columns() {
        struct Orphan;
        impl Entity for Orphan {
            const NAME: &'static str = "Orphan";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::primary("id", ColumnType::String))
                    .relation(RelationDeclaration::one_to_many::<SubTestEntity>(
                        "children", "id", "parentId",
                    ))
            }
        }

        let err = Connection::new(ConnectionOptions::new().entity::<Orphan>()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
        assert_eq!(
            err.details,
            vec!["Entity: SubTestEntity", "Column: parentId", "Relation: children"]
        );
    }
}

mod validation_tests {
    use super::*;

    macro_rules! entity_with_primary {
        ($name:ident, $column_type:expr) => {
            struct $name;
            impl Entity for $name {
                const NAME: &'static str = "Test";
                fn declare() -> EntityDeclaration {
                    EntityDeclaration::new().column(ColumnDeclaration::primary("foo", $column_type))
                }
            }
        };
    }

    #[test]
    fn test_primary_column_types_rejected() {
        entity_with_primary!(WithArray, ColumnType::array_of(ColumnType::String));
        entity_with_primary!(WithDate, ColumnType::Date);
        entity_with_primary!(WithObject, ColumnType::Object);
        entity_with_primary!(WithCustom, ColumnType::custom("CustomType"));

        for options in [
            ConnectionOptions::new().entity::<WithArray>(),
            ConnectionOptions::new().entity::<WithDate>(),
            ConnectionOptions::new().entity::<WithObject>(),
            ConnectionOptions::new().entity::<WithCustom>(),
        ] {
            let err = Connection::new(options).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParamType);
            assert_eq!(err.code, ErrorCode::InvalidParamType);
            assert_eq!(err.origin, ErrorOrigin::Symbiosis);
            assert_eq!(err.message, "Column type isn't supported");
            assert_eq!(err.details, vec!["Entity: Test", "Column: foo"]);
        }
    }

    #[test]
    fn test_primary_column_simple_types_accepted() {
        entity_with_primary!(WithString, ColumnType::String);
        entity_with_primary!(WithNumber, ColumnType::Number);
        entity_with_primary!(WithBoolean, ColumnType::Boolean);

        assert!(Connection::new(ConnectionOptions::new().entity::<WithString>()).is_ok());
        assert!(Connection::new(ConnectionOptions::new().entity::<WithNumber>()).is_ok());
        assert!(Connection::new(ConnectionOptions::new().entity::<WithBoolean>()).is_ok());
    }

    #[test]
    fn test_duplicated_entity() {
        let err = Connection::new(ConnectionOptions::new().entity::<User>().entity::<User>())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatedEntity);
        assert_eq!(err.details, vec!["Entity: User"]);
    }

    #[test]
    fn test_duplicated_columns() {
        struct SameLogical;
        impl Entity for SameLogical {
            const NAME: &'static str = "SameLogical";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::column("foo", ColumnType::Number))
                    .column(ColumnDeclaration::column("foo", ColumnType::String))
            }
        }
        struct SamePhysical;
        impl Entity for SamePhysical {
            const NAME: &'static str = "SamePhysical";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new()
                    .column(ColumnDeclaration::column("fooBar", ColumnType::Number))
                    .column(ColumnDeclaration::column("foo_bar", ColumnType::Number))
            }
        }

        let err = Connection::new(ConnectionOptions::new().entity::<SameLogical>()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatedColumn);
        assert_eq!(err.details, vec!["Entity: SameLogical", "Column: foo"]);

        let err = Connection::new(
            ConnectionOptions::new()
                .entity::<SamePhysical>()
                .column_naming(NamingStrategy::UpperCase),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatedColumn);
        assert_eq!(err.details, vec!["Entity: SamePhysical", "Column: FOO_BAR"]);
    }

    #[test]
    fn test_generation_strategies_checked_at_registration() {
        struct Counter;
        impl Entity for Counter {
            const NAME: &'static str = "Counter";
            fn declare() -> EntityDeclaration {
                EntityDeclaration::new().column(
                    ColumnDeclaration::primary_generated("id", ColumnType::Number)
                        .strategy("increment"),
                )
            }
        }

        let err = Connection::new(ConnectionOptions::new().entity::<Counter>()).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownGenerationStrategy);
        assert_eq!(
            err.details,
            vec!["Entity: Counter", "Column: id", "Strategy: increment"]
        );

        let connection = Connection::new(
            ConnectionOptions::new()
                .entity::<Counter>()
                .generator("increment", || serde_json::Value::from(1)),
        )
        .unwrap();
        let id = connection
            .entity_manager()
            .get_column_metadata(EntityRef::of::<Counter>(), "id")
            .unwrap();
        assert_eq!(id.auto_generate.as_deref(), Some("increment"));
    }
}
