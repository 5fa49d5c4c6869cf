use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, SqlitePool};

use crate::config::CategoryConfig;

#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub category_title: String,
    pub is_published: bool,
    pub created_at: String,
}

impl Article {
    /// Creation time formatted for display, falling back to the stored text.
    pub fn created_display(&self) -> String {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| self.created_at.clone())
    }
}

/// A validated article that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub is_published: bool,
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn initialize(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL UNIQUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL REFERENCES categories(id),
                is_published INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_articles_category_published
            ON articles(category_id, is_published)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn sync_categories(&self, configs: &[CategoryConfig]) -> anyhow::Result<()> {
        for config in configs {
            sqlx::query(
                r#"
                INSERT INTO categories (title)
                VALUES (?)
                ON CONFLICT(title) DO NOTHING
                "#,
            )
            .bind(&config.title)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    pub async fn get_all_categories(&self) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn get_category(&self, category_id: i64) -> anyhow::Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    pub async fn get_published_articles(&self) -> anyhow::Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.id, a.title, a.content, a.category_id,
                   c.title AS category_title, a.is_published, a.created_at
            FROM articles a
            JOIN categories c ON c.id = a.category_id
            WHERE a.is_published = 1
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    pub async fn get_published_articles_for_category(
        &self,
        category_id: i64,
    ) -> anyhow::Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.id, a.title, a.content, a.category_id,
                   c.title AS category_title, a.is_published, a.created_at
            FROM articles a
            JOIN categories c ON c.id = a.category_id
            WHERE a.category_id = ? AND a.is_published = 1
            ORDER BY a.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    /// Fetch an article by id regardless of its published state.
    pub async fn get_article(&self, article_id: i64) -> anyhow::Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>(
            r#"
            SELECT a.id, a.title, a.content, a.category_id,
                   c.title AS category_title, a.is_published, a.created_at
            FROM articles a
            JOIN categories c ON c.id = a.category_id
            WHERE a.id = ?
            "#,
        )
        .bind(article_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(article)
    }

    pub async fn get_article_count(&self) -> anyhow::Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn insert_article(&self, article: &NewArticle) -> anyhow::Result<Article> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, content, category_id, is_published, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(&article.content)
        .bind(article.category_id)
        .bind(article.is_published)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_article(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Article {} missing after insert", id))
    }
}
