use chrono::NaiveDate;
use launch_ledger::db::{Database, Store};
use launch_ledger::models::*;
use rust_decimal::Decimal;
use speculate2::speculate;

fn provider(name: &str, year: i32, country: &str) -> LaunchServiceProvider {
    LaunchServiceProvider::new(name, year, country).expect("valid provider")
}

fn rocket(name: &str, manufacturer: &LaunchServiceProvider) -> Rocket {
    Rocket::new(name, "USA", manufacturer.clone()).expect("valid rocket")
}

fn launch(date: &str, vehicle: &Rocket, price: i64) -> Launch {
    Launch::new(LaunchDetails {
        launch_date: date.parse().expect("valid date"),
        vehicle: vehicle.clone(),
        provider: vehicle.manufacturer().clone(),
        launch_site: "VAFB SLC-3E".to_string(),
        orbit: "LEO".to_string(),
        function: None,
        price: Decimal::from(price),
        outcome: LaunchOutcome::Successful,
    })
    .expect("valid launch")
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "providers" {
        it "assigns an id on first save" {
            let saved = db.save_provider(provider("ULA", 1990, "USA")).expect("save failed");
            assert!(saved.id().is_some());
            assert_eq!(saved.name(), "ULA");
        }

        it "upserts on name, year founded, and country" {
            let first = db.save_provider(provider("ULA", 1990, "USA")).expect("save failed");
            let again = provider("ULA", 1990, "USA")
                .with_headquarters("Centennial, Colorado")
                .expect("valid headquarters");
            let second = db.save_provider(again).expect("save failed");

            assert_eq!(first.id(), second.id());
            let all = db.get_all_providers().expect("list failed");
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].headquarters(), Some("Centennial, Colorado"));
        }

        it "returns None for an unknown id" {
            let found = db.get_provider(uuid::Uuid::new_v4()).expect("lookup failed");
            assert!(found.is_none());
        }

        it "lists each provider with its rockets" {
            let ula = db.save_provider(provider("ULA", 1990, "USA")).expect("save failed");
            db.save_rocket(rocket("Atlas V", &ula)).expect("save failed");
            db.save_rocket(rocket("Delta IV", &ula)).expect("save failed");

            let all = db.get_all_providers().expect("list failed");
            assert_eq!(all.len(), 1);
            let names: Vec<&str> = all[0].rockets().iter().map(|r| r.name()).collect();
            assert_eq!(names, vec!["Atlas V", "Delta IV"]);
        }

        it "cascades a provider delete to its rockets and launches" {
            let ula = db.save_provider(provider("ULA", 1990, "USA")).expect("save failed");
            let atlas = db.save_rocket(rocket("Atlas V", &ula)).expect("save failed");
            db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");

            let deleted = db.delete_provider(ula.id().expect("saved provider has an id"))
                .expect("delete failed");
            assert!(deleted);
            assert!(db.get_all_rockets().expect("list failed").is_empty());
            assert!(db.get_all_launches().expect("list failed").is_empty());
        }
    }

    describe "rockets" {
        it "saves the manufacturer along with the rocket" {
            let saved = db.save_rocket(rocket("Falcon 9", &provider("SpaceX", 2002, "USA")))
                .expect("save failed");

            assert!(saved.id().is_some());
            assert!(saved.manufacturer().id().is_some());
            let providers = db.get_all_providers().expect("list failed");
            assert_eq!(providers.len(), 1);
            assert_eq!(providers[0].name(), "SpaceX");
        }

        it "dedups rockets that compare equal" {
            let spacex = provider("SpaceX", 2002, "USA");
            db.save_rocket(rocket("Falcon 9", &spacex)).expect("save failed");
            let with_mass = rocket("Falcon 9", &spacex)
                .with_mass_to_leo(Some(22_800))
                .expect("mass in range");
            db.save_rocket(with_mass).expect("save failed");

            let rockets = db.get_all_rockets().expect("list failed");
            assert_eq!(rockets.len(), 1);
            assert_eq!(rockets[0].mass_to_leo(), Some(22_800));
            assert_eq!(db.get_all_providers().expect("list failed").len(), 1);
        }

        it "round-trips attribute updates through re-saving" {
            let saved = db.save_rocket(rocket("Falcon 9", &provider("SpaceX", 2002, "USA")))
                .expect("save failed");
            let id = saved.id().expect("saved rocket has an id");

            let updated = saved
                .with_wiki_link("https://en.wikipedia.org/wiki/Falcon_9")
                .expect("valid wiki link");
            db.save_rocket(updated).expect("save failed");

            let found = db.get_rocket(id).expect("lookup failed").expect("rocket exists");
            assert_eq!(found.wiki_link(), Some("https://en.wikipedia.org/wiki/Falcon_9"));
        }

        it "keeps the manufacturer when a rocket is deleted" {
            let saved = db.save_rocket(rocket("Falcon 9", &provider("SpaceX", 2002, "USA")))
                .expect("save failed");

            let deleted = db.delete_rocket(saved.id().expect("saved rocket has an id"))
                .expect("delete failed");
            assert!(deleted);
            assert!(db.get_all_rockets().expect("list failed").is_empty());
            assert_eq!(db.get_all_providers().expect("list failed").len(), 1);
        }

        it "returns false when deleting an unknown rocket" {
            let deleted = db.delete_rocket(uuid::Uuid::new_v4()).expect("delete failed");
            assert!(!deleted);
        }
    }

    describe "launches" {
        it "saves the vehicle and provider along with the launch" {
            let atlas = rocket("Atlas V", &provider("ULA", 1990, "USA"));
            let saved = db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");

            assert!(saved.id().is_some());
            assert_eq!(db.get_all_rockets().expect("list failed").len(), 1);
            assert_eq!(db.get_all_providers().expect("list failed").len(), 1);
        }

        it "materializes nested records on load" {
            let atlas = rocket("Atlas V", &provider("ULA", 1990, "USA"));
            let saved = db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");

            let found = db.get_launch(saved.id().expect("saved launch has an id"))
                .expect("lookup failed")
                .expect("launch exists");
            assert_eq!(found.launch_date(), NaiveDate::from_ymd_opt(2017, 5, 1).expect("valid date"));
            assert_eq!(found.vehicle().name(), "Atlas V");
            assert_eq!(found.vehicle().manufacturer().name(), "ULA");
            assert_eq!(found.provider().name(), "ULA");
            assert_eq!(found.price(), Decimal::from(7000));
            assert_eq!(found.outcome(), LaunchOutcome::Successful);
        }

        it "upserts on date, vehicle, provider, and orbit" {
            let atlas = rocket("Atlas V", &provider("ULA", 1990, "USA"));
            let first = db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");
            let repriced = launch("2017-05-01", &atlas, 9000)
                .with_function("Communications")
                .expect("valid function");
            let second = db.save_launch(repriced).expect("save failed");

            assert_eq!(first.id(), second.id());
            let all = db.get_all_launches().expect("list failed");
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].price(), Decimal::from(9000));
            assert_eq!(all[0].function(), Some("Communications"));
        }

        it "keeps the vehicle when a launch is deleted" {
            let atlas = rocket("Atlas V", &provider("ULA", 1990, "USA"));
            let saved = db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");

            let deleted = db.delete_launch(saved.id().expect("saved launch has an id"))
                .expect("delete failed");
            assert!(deleted);
            assert!(db.get_all_launches().expect("list failed").is_empty());
            assert_eq!(db.get_all_rockets().expect("list failed").len(), 1);
        }

        it "cascades a rocket delete to its launches" {
            let atlas = rocket("Atlas V", &provider("ULA", 1990, "USA"));
            let saved = db.save_launch(launch("2017-05-01", &atlas, 7000)).expect("save failed");

            db.delete_rocket(saved.vehicle().id().expect("saved rocket has an id"))
                .expect("delete failed");
            assert!(db.get_all_launches().expect("list failed").is_empty());
            assert_eq!(db.get_all_providers().expect("list failed").len(), 1);
        }
    }

    describe "users" {
        it "assigns an id and round-trips the account" {
            let user = User::new("Neil", "Armstrong", "neil@nasa.gov", "Tranquility1")
                .expect("valid user");
            let saved = db.save_user(user).expect("save failed");

            let found = db.get_user(saved.id().expect("saved user has an id"))
                .expect("lookup failed")
                .expect("user exists");
            assert_eq!(found.email(), "neil@nasa.gov");
            assert!(found.matches_password("Tranquility1"));
        }

        it "upserts by email" {
            let user = User::new("Neil", "Armstrong", "neil@nasa.gov", "Tranquility1")
                .expect("valid user");
            db.save_user(user).expect("save failed");
            let renamed = User::new("Neil A.", "Armstrong", "neil@nasa.gov", "Tranquility1")
                .expect("valid user");
            db.save_user(renamed).expect("save failed");

            let all = db.get_all_users().expect("list failed");
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].first_name(), "Neil A.");
        }

        it "deletes an account" {
            let user = User::new("Neil", "Armstrong", "neil@nasa.gov", "Tranquility1")
                .expect("valid user");
            let saved = db.save_user(user).expect("save failed");

            let deleted = db.delete_user(saved.id().expect("saved user has an id"))
                .expect("delete failed");
            assert!(deleted);
            assert!(db.get_all_users().expect("list failed").is_empty());
        }
    }
}

#[test]
fn file_backed_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ledger.db");

    {
        let db = Database::open(path.clone()).expect("Failed to open database");
        db.migrate().expect("Failed to run migrations");
        db.save_provider(provider("ULA", 1990, "USA")).expect("save failed");
    }

    let reopened = Database::open(path).expect("Failed to reopen database");
    reopened.migrate().expect("Failed to run migrations");
    let all = reopened.get_all_providers().expect("list failed");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name(), "ULA");
}
