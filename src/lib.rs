#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{AnalysisFairing, ConfigFairing, DatabaseFairing};
use crate::logging::LoggerFairing;

pub mod aggregation;
pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod model;

/// The fully configured server, ready to ignite.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(AnalysisFairing)
}

/// Connect to the database named in the config, for tests.
#[cfg(test)]
pub(crate) async fn db_client() -> mongodb::Client {
    let db_uri = rocket::Config::figment()
        .extract_inner::<String>("db_uri")
        .expect("`db_uri` not set");
    mongodb::Client::with_uri_str(&db_uri)
        .await
        .expect("Could not connect to the test database")
}

/// A fresh database name for one test.
#[cfg(test)]
pub(crate) fn database() -> String {
    config::get_database_name()
}

/// A server using the given database instead of connecting its own.
#[cfg(test)]
pub(crate) async fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    let db = client.database(db_name);
    model::mongodb::ensure_indexes_exist(&db)
        .await
        .expect("Could not create indexes");
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(AnalysisFairing)
        .manage(client)
        .manage(db)
}
