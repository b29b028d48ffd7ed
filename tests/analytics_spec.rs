use chrono::{Datelike, NaiveDate};
use launch_ledger::analytics::Analytics;
use launch_ledger::db::{Database, Store};
use launch_ledger::models::*;
use rust_decimal::Decimal;
use speculate2::speculate;

fn provider(name: &str, year: i32, country: &str) -> LaunchServiceProvider {
    LaunchServiceProvider::new(name, year, country).expect("valid provider")
}

// Ten launches across 2017: five rockets split between two providers,
// plus a provider with no launches at all. rocket_4 never flies.
fn seeded_analytics(db: &Database) -> Analytics<Database> {
    let ula = provider("ULA", 1990, "USA");
    let spacex = provider("SpaceX", 2002, "USA");
    db.save_provider(provider("ESA", 1975, "Europe"))
        .expect("save failed");

    let rockets: Vec<Rocket> = (0..5)
        .map(|i| {
            let manufacturer = if i < 3 { &ula } else { &spacex };
            Rocket::new(&format!("rocket_{i}"), "USA", manufacturer.clone())
                .expect("valid rocket")
        })
        .collect();

    let months: [u32; 10] = [1, 6, 4, 3, 4, 11, 6, 5, 12, 5];
    let vehicles: [usize; 10] = [0, 0, 0, 0, 1, 1, 1, 2, 2, 3];
    let prices: [i64; 10] = [7000, 9000, 8000, 5000, 4000, 3000, 2000, 5000, 8000, 12000];
    let outcomes = [
        LaunchOutcome::Failed,
        LaunchOutcome::Successful,
        LaunchOutcome::Successful,
        LaunchOutcome::Failed,
        LaunchOutcome::Successful,
        LaunchOutcome::Failed,
        LaunchOutcome::Successful,
        LaunchOutcome::Successful,
        LaunchOutcome::Failed,
        LaunchOutcome::Successful,
    ];

    for i in 0..10 {
        let vehicle = &rockets[vehicles[i]];
        let launch = Launch::new(LaunchDetails {
            launch_date: NaiveDate::from_ymd_opt(2017, months[i], 1).expect("valid date"),
            vehicle: vehicle.clone(),
            provider: vehicle.manufacturer().clone(),
            launch_site: "VAFB SLC-3E".to_string(),
            orbit: "LEO".to_string(),
            function: None,
            price: Decimal::from(prices[i]),
            outcome: outcomes[i],
        })
        .expect("valid launch");
        db.save_launch(launch).expect("save failed");
    }

    Analytics::new(db.clone())
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "most_launched_rockets" {
        it "ranks rockets by launch count, most-launched first" {
            let analytics = seeded_analytics(&db);
            let rockets = analytics.most_launched_rockets(2).expect("query failed");
            let names: Vec<&str> = rockets.iter().map(|r| r.name()).collect();
            assert_eq!(names, vec!["rocket_0", "rocket_1"]);
        }

        it "omits rockets that never launched" {
            let analytics = seeded_analytics(&db);
            let rockets = analytics.most_launched_rockets(10).expect("query failed");
            let names: Vec<&str> = rockets.iter().map(|r| r.name()).collect();
            assert_eq!(names, vec!["rocket_0", "rocket_1", "rocket_2", "rocket_3"]);
        }

        it "matches the per-rocket tallies in the record" {
            let analytics = seeded_analytics(&db);
            let launches = db.get_all_launches().expect("query failed");
            let count = |name: &str| {
                launches.iter().filter(|l| l.vehicle().name() == name).count()
            };

            let ranked = analytics.most_launched_rockets(10).expect("query failed");
            let tallies: Vec<usize> = ranked.iter().map(|r| count(r.name())).collect();
            assert_eq!(tallies, vec![4, 3, 2, 1]);
            assert_eq!(tallies.iter().sum::<usize>(), launches.len());
        }

        it "returns an empty ranking for k of zero" {
            let analytics = seeded_analytics(&db);
            assert!(analytics.most_launched_rockets(0).expect("query failed").is_empty());
        }
    }

    describe "most_reliable_providers" {
        it "ranks providers by their own success ratio" {
            let analytics = seeded_analytics(&db);
            let providers = analytics.most_reliable_providers(2).expect("query failed");
            let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
            // SpaceX is 1 for 1; ULA is 5 for 9.
            assert_eq!(names, vec!["SpaceX", "ULA"]);
        }

        it "excludes providers with no launches on record" {
            let analytics = seeded_analytics(&db);
            let providers = analytics.most_reliable_providers(5).expect("query failed");
            assert_eq!(providers.len(), 2);
            assert!(providers.iter().all(|p| p.name() != "ESA"));
        }
    }

    describe "most_recent_launches" {
        it "returns the newest launches first" {
            let analytics = seeded_analytics(&db);
            let launches = analytics.most_recent_launches(3).expect("query failed");
            let months: Vec<u32> = launches.iter().map(|l| l.launch_date().month()).collect();
            assert_eq!(months, vec![12, 11, 6]);
            // Two launches share the June date; the pricier one wins.
            assert_eq!(launches[2].vehicle().name(), "rocket_0");
            assert_eq!(launches[2].price(), Decimal::from(9000));
        }

        it "orders the whole record by date descending" {
            let analytics = seeded_analytics(&db);
            let launches = analytics.most_recent_launches(20).expect("query failed");
            assert_eq!(launches.len(), 10);
            for pair in launches.windows(2) {
                assert!(pair[0].launch_date() >= pair[1].launch_date());
            }
        }
    }

    describe "dominant_country" {
        it "names the country launching most often into the orbit" {
            let analytics = seeded_analytics(&db);
            let country = analytics.dominant_country("LEO").expect("query failed");
            assert_eq!(country.as_deref(), Some("USA"));
        }

        it "returns None when no launch matches the orbit" {
            let analytics = seeded_analytics(&db);
            assert_eq!(analytics.dominant_country("GTO").expect("query failed"), None);
        }
    }

    describe "most_expensive_launches" {
        it "returns the priciest launch first" {
            let analytics = seeded_analytics(&db);
            let launches = analytics.most_expensive_launches(1).expect("query failed");
            assert_eq!(launches.len(), 1);
            assert_eq!(launches[0].price(), Decimal::from(12000));
            assert_eq!(launches[0].vehicle().name(), "rocket_3");
        }

        it "orders the whole record by price descending" {
            let analytics = seeded_analytics(&db);
            let launches = analytics.most_expensive_launches(20).expect("query failed");
            assert_eq!(launches.len(), 10);
            for pair in launches.windows(2) {
                assert!(pair[0].price() >= pair[1].price());
            }
            assert_eq!(launches[9].price(), Decimal::from(2000));
        }
    }

    describe "highest_revenue_providers" {
        it "sums launch prices per provider within the year" {
            let analytics = seeded_analytics(&db);
            let providers = analytics.highest_revenue_providers(1, 2017).expect("query failed");
            let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
            // ULA took 51000 across nine launches; SpaceX 12000 on one.
            assert_eq!(names, vec!["ULA"]);
        }

        it "ranks every provider that earned in the year" {
            let analytics = seeded_analytics(&db);
            let providers = analytics.highest_revenue_providers(5, 2017).expect("query failed");
            let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
            assert_eq!(names, vec!["ULA", "SpaceX"]);
        }

        it "returns an empty ranking for a year with no launches" {
            let analytics = seeded_analytics(&db);
            assert!(analytics.highest_revenue_providers(5, 2018).expect("query failed").is_empty());
        }
    }

    describe "with no launch records" {
        it "returns empty rankings" {
            let analytics = Analytics::new(db.clone());
            assert!(analytics.most_launched_rockets(5).expect("query failed").is_empty());
            assert!(analytics.most_reliable_providers(5).expect("query failed").is_empty());
            assert!(analytics.most_recent_launches(5).expect("query failed").is_empty());
            assert!(analytics.most_expensive_launches(5).expect("query failed").is_empty());
            assert!(analytics.highest_revenue_providers(5, 2017).expect("query failed").is_empty());
        }

        it "finds no dominant country" {
            let analytics = Analytics::new(db.clone());
            assert_eq!(analytics.dominant_country("LEO").expect("query failed"), None);
        }
    }
}
