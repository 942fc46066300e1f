//! Shared harness for the integration tests: a fresh, migrated in-memory
//! SQLite database per test plus helpers to seed the game catalog.

#![allow(dead_code)] // Some helpers are used by different test files

use chrono::{Local, NaiveDate, NaiveDateTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};

use game_tracker_lib::database::TrackerService;
use game_tracker_lib::database::db;
use game_tracker_lib::database::dto::NewUser;
use game_tracker_lib::entity::{
    company, game_developer, game_genre, game_platform, game_publisher, genre, platform, plays,
    videogame,
};
use game_tracker_lib::session::Session;

pub const PASSWORD: &str = "correct horse";

pub struct TestHarness {
    pub service: TrackerService,
}

impl TestHarness {
    /// Create a harness backed by a new in-memory database.
    pub async fn new() -> Self {
        let conn = db::connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        db::run_migrations(&conn)
            .await
            .expect("Failed to run migrations");
        Self {
            service: TrackerService::new(conn),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.service.connection()
    }

    pub fn new_user(username: &str) -> NewUser {
        NewUser {
            first_name: format!("{}-first", username),
            last_name: format!("{}-last", username),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            password: PASSWORD.to_string(),
        }
    }

    /// Register a user and log them in.
    pub async fn user(&self, username: &str) -> Session {
        self.service
            .register(&Self::new_user(username))
            .await
            .expect("Failed to register user");
        self.service
            .login(username, PASSWORD)
            .await
            .expect("Failed to log in")
    }

    pub async fn game(&self, title: &str, esrb: Option<&str>) -> i32 {
        videogame::ActiveModel {
            id: NotSet,
            title: Set(title.to_string()),
            esrb_rating: Set(esrb.map(str::to_string)),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert game")
        .id
    }

    pub async fn platform(&self, name: &str) -> i32 {
        platform::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert platform")
        .id
    }

    pub async fn company(&self, name: &str) -> i32 {
        company::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert company")
        .id
    }

    pub async fn genre(&self, name: &str) -> i32 {
        genre::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert genre")
        .id
    }

    /// Release a game on a platform.
    pub async fn release(
        &self,
        game_id: i32,
        platform_id: i32,
        date: Option<NaiveDate>,
        price: Option<f64>,
    ) {
        game_platform::ActiveModel {
            game_id: Set(game_id),
            platform_id: Set(platform_id),
            release_date: Set(date),
            price: Set(price),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert release");
    }

    pub async fn developed_by(&self, game_id: i32, company_id: i32) {
        game_developer::ActiveModel {
            game_id: Set(game_id),
            company_id: Set(company_id),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert developer");
    }

    pub async fn published_by(&self, game_id: i32, company_id: i32) {
        game_publisher::ActiveModel {
            game_id: Set(game_id),
            company_id: Set(company_id),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert publisher");
    }

    pub async fn in_genre(&self, game_id: i32, genre_id: i32) {
        game_genre::ActiveModel {
            game_id: Set(game_id),
            genre_id: Set(genre_id),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert genre edge");
    }

    /// Insert a play session at a fixed time (the service always uses now).
    pub async fn play_at(&self, user_id: i32, game_id: i32, at: NaiveDateTime, minutes: i32) {
        plays::ActiveModel {
            user_id: Set(user_id),
            game_id: Set(game_id),
            play_date_time: Set(at),
            duration: Set(minutes),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert play");
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn days_ago(days: i64) -> NaiveDateTime {
    Local::now().naive_local() - chrono::Duration::days(days)
}
