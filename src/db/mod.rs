use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{games, users};

pub mod migrator;
pub mod repositories;

pub use repositories::admin::Admin;
pub use repositories::game::{GamePatch, NewGame};
pub use repositories::user::UpsertUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn game_repo(&self) -> repositories::game::GameRepository {
        repositories::game::GameRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // -- catalog --

    pub async fn list_games(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<games::Model>> {
        self.game_repo().list(category, search).await
    }

    pub async fn get_game(&self, id: i32) -> Result<Option<games::Model>> {
        self.game_repo().get(id).await
    }

    pub async fn create_game(&self, input: NewGame) -> Result<games::Model> {
        self.game_repo().create(input).await
    }

    pub async fn update_game(&self, id: i32, patch: GamePatch) -> Result<Option<games::Model>> {
        self.game_repo().update(id, patch).await
    }

    pub async fn delete_game(&self, id: i32) -> Result<()> {
        self.game_repo().delete(id).await
    }

    pub async fn set_game_order(&self, id: i32, order: i32) -> Result<()> {
        self.game_repo().set_order(id, order).await
    }

    pub async fn count_games(&self) -> Result<u64> {
        self.game_repo().count().await
    }

    // -- admins --

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.admin_repo().get_by_email(email).await
    }

    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.admin_repo().list().await
    }

    pub async fn verify_admin_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Admin>> {
        self.admin_repo().verify_password(email, password).await
    }

    pub async fn create_admin(
        &self,
        email: &str,
        password: &str,
        is_super_admin: bool,
        config: &SecurityConfig,
    ) -> Result<Admin> {
        self.admin_repo()
            .create(email, password, is_super_admin, config)
            .await
    }

    pub async fn update_admin_password(
        &self,
        email: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.admin_repo()
            .update_password(email, new_password, config)
            .await
    }

    pub async fn delete_admin_by_email(&self, email: &str) -> Result<()> {
        self.admin_repo().delete_by_email(email).await
    }

    // -- users --

    pub async fn get_user(&self, id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn upsert_user(&self, input: UpsertUser) -> Result<users::Model> {
        self.user_repo().upsert(input).await
    }

    pub async fn set_user_admin_by_email(&self, email: &str, is_admin: bool) -> Result<()> {
        self.user_repo().set_admin_by_email(email, is_admin).await
    }

    /// Populate the catalog with default entries when the table is empty.
    /// Runs once at process start; not guarded against two instances racing
    /// on an empty store.
    pub async fn seed_default_games(&self) -> Result<()> {
        if self.count_games().await? > 0 {
            return Ok(());
        }

        for game in default_games() {
            self.create_game(game).await?;
        }

        info!("Database seeded with default games");
        Ok(())
    }
}

fn default_games() -> Vec<NewGame> {
    let entry = |title: &str, image: &str, download: &str, category: &str, developer: &str, description: &str| NewGame {
        title: title.to_string(),
        image_url: image.to_string(),
        download_url: download.to_string(),
        category: category.to_string(),
        developer: Some(developer.to_string()),
        description: Some(description.to_string()),
        youtube_url: None,
        order: None,
    };

    vec![
        entry(
            "Grand Theft Auto 5",
            "https://images.unsplash.com/photo-1593305841991-05c297bb45ec?auto=format&fit=crop&q=80&w=1000",
            "https://www.rockstargames.com/gta-v",
            "PC",
            "From: FitGirl",
            "The biggest open world game ever created.",
        ),
        entry(
            "Elder Scrolls 4: Oblivion Remaster",
            "https://images.unsplash.com/photo-1627856013091-fed6e4e30025?auto=format&fit=crop&q=80&w=1000",
            "https://bethesda.net",
            "PC",
            "From: FitGirl",
            "A classic RPG remastered for modern systems.",
        ),
        entry(
            "The Last of Us: Part 1",
            "https://images.unsplash.com/photo-1552820728-8b83bb6b773f?auto=format&fit=crop&q=80&w=1000",
            "https://www.playstation.com",
            "PC",
            "From: FitGirl",
            "Experience the emotional storytelling and unforgettable characters.",
        ),
        entry(
            "The Last of Us: Part 2 Remastered",
            "https://images.unsplash.com/photo-1509198397868-475647b2a1e5?auto=format&fit=crop&q=80&w=1000",
            "https://www.playstation.com",
            "PC",
            "From: FitGirl",
            "Five years after their dangerous journey across the post-pandemic United States...",
        ),
        entry(
            "Minecraft Pocket Edition",
            "https://images.unsplash.com/photo-1607853202273-797f1c22a38e?auto=format&fit=crop&q=80&w=1000",
            "https://www.minecraft.net",
            "Android",
            "Mojang",
            "Build anything you can imagine.",
        ),
        entry(
            "Adobe Photoshop 2024",
            "https://images.unsplash.com/photo-1563986768609-322da13575f3?auto=format&fit=crop&q=80&w=1000",
            "https://www.adobe.com",
            "Programs",
            "Adobe",
            "The world's best imaging and graphic design software.",
        ),
    ]
}
