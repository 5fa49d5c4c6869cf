//! Integration tests for the Daily Bugle news site
//!
//! These tests verify the full workflow from configuration loading
//! through database setup and the HTTP handlers.

use std::io::Write;
use tempfile::NamedTempFile;

mod common {
    use std::sync::Arc;

    use axum_test::TestServer;
    use daily_bugle::config::CategoryConfig;
    use daily_bugle::db::Database;
    use daily_bugle::routes::{router, AppState};
    use tempfile::TempDir;

    /// Create a temporary directory for test databases
    pub fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    /// Create a test database path
    pub fn create_db_path(temp_dir: &TempDir) -> String {
        let db_path = temp_dir.path().join("test.db");
        format!("sqlite:{}?mode=rwc", db_path.display())
    }

    pub fn categories(titles: &[&str]) -> Vec<CategoryConfig> {
        titles
            .iter()
            .map(|title| CategoryConfig {
                title: title.to_string(),
            })
            .collect()
    }

    pub async fn create_database(db_url: &str, titles: &[&str]) -> Arc<Database> {
        let db = Database::new(db_url).await.unwrap();
        db.initialize().await.unwrap();
        db.sync_categories(&categories(titles)).await.unwrap();
        Arc::new(db)
    }

    pub fn create_server(db: Arc<Database>) -> TestServer {
        TestServer::new(router(Arc::new(AppState { db }))).unwrap()
    }
}

#[cfg(test)]
mod config_integration_tests {
    use super::*;
    use daily_bugle::config::Config;

    #[test]
    fn test_load_actual_bugle_config() {
        // Test loading the actual bugle.toml from the project
        let config = Config::load("bugle.toml");
        assert!(config.is_ok(), "Failed to load bugle.toml: {:?}", config.err());

        let config = config.unwrap();
        assert!(
            !config.categories.is_empty(),
            "bugle.toml should seed at least one category"
        );
        assert!(!config.listen_addr.is_empty());
    }

    #[test]
    fn test_config_from_file() {
        let toml_content = r#"
            listen_addr = "127.0.0.1:4000"

            [[categories]]
            title = "Sports"

            [[categories]]
            title = "Weather"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:4000");
        assert_eq!(config.database_url, "sqlite:daily_bugle.db?mode=rwc");
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[1].title, "Weather");
    }
}

#[cfg(test)]
mod database_integration_tests {
    use super::common::*;
    use daily_bugle::db::{Database, NewArticle};

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);

        // Create database and add data
        {
            let db = create_database(&db_url, &["Sports"]).await;
            let categories = db.get_all_categories().await.unwrap();
            db.insert_article(&NewArticle {
                title: "Persistent Article".to_string(),
                content: "Still here".to_string(),
                category_id: categories[0].id,
                is_published: true,
            })
            .await
            .unwrap();
        }

        // Reopen database and verify data persists
        {
            let db = Database::new(&db_url).await.unwrap();
            // Don't reinitialize - just use existing data

            let categories = db.get_all_categories().await.unwrap();
            assert_eq!(categories.len(), 1);
            assert_eq!(categories[0].title, "Sports");

            let articles = db.get_published_articles().await.unwrap();
            assert_eq!(articles.len(), 1);
            assert_eq!(articles[0].title, "Persistent Article");
            assert_eq!(articles[0].category_title, "Sports");
        }
    }

    #[tokio::test]
    async fn test_reseeding_keeps_category_ids() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);

        let db = create_database(&db_url, &["Sports", "Culture"]).await;
        let before = db.get_all_categories().await.unwrap();

        // Simulate a restart with one more category in the config
        db.initialize().await.unwrap();
        db.sync_categories(&categories(&["Sports", "Culture", "Science"]))
            .await
            .unwrap();

        let after = db.get_all_categories().await.unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(before[0].id, after[0].id);
        assert_eq!(before[1].id, after[1].id);
        assert_eq!(after[2].title, "Science");
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::common::*;
    use axum::http::{header, StatusCode};
    use daily_bugle::db::NewArticle;

    #[tokio::test]
    async fn test_submit_then_browse() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);
        let db = create_database(&db_url, &["Sports", "Politics"]).await;
        let sports = db.get_all_categories().await.unwrap()[0].id;
        let server = create_server(db.clone());

        // Nothing published yet, so the category page is a 404
        let response = server.get(&format!("/category/{}", sports)).await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/add-news")
            .form(&[
                ("title", "Home win"),
                ("content", "Three goals in the second half."),
                ("category", sports.to_string().as_str()),
                ("is_published", "on"),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let location = response.header(header::LOCATION);
        let location = location.to_str().unwrap().to_string();
        assert!(location.starts_with("/news/"));

        let response = server.get(&location).await;
        response.assert_status_ok();
        assert!(response.text().contains("Three goals in the second half."));

        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("Home win"));

        let response = server.get(&format!("/category/{}", sports)).await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("<title>Sports"));
        assert!(body.contains("Home win"));
    }

    #[tokio::test]
    async fn test_sports_scenario() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);
        let db = create_database(&db_url, &["Sports"]).await;
        let sports = db.get_all_categories().await.unwrap()[0].id;

        for (title, is_published) in [
            ("Opening day", true),
            ("Closing day", true),
            ("Secret signing", false),
        ] {
            db.insert_article(&NewArticle {
                title: title.to_string(),
                content: String::new(),
                category_id: sports,
                is_published,
            })
            .await
            .unwrap();
        }

        let server = create_server(db);
        let response = server.get(&format!("/category/{}", sports)).await;
        response.assert_status_ok();

        let body = response.text();
        assert!(body.contains("<title>Sports"));
        assert_eq!(body.matches("class=\"news-card\"").count(), 2);
        assert!(body.contains("Opening day"));
        assert!(body.contains("Closing day"));
        assert!(!body.contains("Secret signing"));
    }

    #[tokio::test]
    async fn test_empty_title_creates_nothing() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);
        let db = create_database(&db_url, &["Sports"]).await;
        let sports = db.get_all_categories().await.unwrap()[0].id;
        let server = create_server(db.clone());

        let response = server
            .post("/add-news")
            .form(&[("title", ""), ("category", sports.to_string().as_str())])
            .await;

        response.assert_status_ok();
        assert!(response.text().contains("This field is required."));
        assert_eq!(db.get_article_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_not_found_page() {
        let temp_dir = create_temp_dir();
        let db_url = create_db_path(&temp_dir);
        let db = create_database(&db_url, &[]).await;
        let server = create_server(db);

        let response = server.get("/news/1").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }
}
