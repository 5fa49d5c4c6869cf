use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{debug, info};

use crate::db::{Article, Category, Database};
use crate::error::AppError;
use crate::forms::{ArticleForm, FormErrors, NON_FIELD_ERRORS};

const HOME_TITLE: &str = "News";

pub struct AppState {
    pub db: Arc<Database>,
}

// Template structs
#[derive(Template)]
#[template(path = "news_list.html")]
pub struct NewsListTemplate {
    pub title: String,
    pub news: Vec<Article>,
}

#[derive(Template)]
#[template(path = "view_news.html")]
pub struct ViewNewsTemplate {
    pub news_item: Article,
}

#[derive(Template)]
#[template(path = "add_news.html")]
pub struct AddNewsTemplate {
    pub form: ArticleForm,
    pub errors: FormErrors,
    pub categories: Vec<Category>,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_news))
        .route("/category/:category_id", get(news_by_category))
        .route("/news/:news_id", get(view_news))
        .route("/add-news", get(add_news_form).post(add_news))
        .route("/health", get(health))
        .with_state(state)
}

/// Path ids that are not plain digit strings never name a record.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound);
    }
    raw.parse().map_err(|_| AppError::NotFound)
}

// Route handlers
pub async fn home_news(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let news = state.db.get_published_articles().await?;

    Ok(HtmlTemplate(NewsListTemplate {
        title: HOME_TITLE.to_string(),
        news,
    }))
}

pub async fn news_by_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category_id = parse_id(&category_id)?;
    let category = state
        .db
        .get_category(category_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let news = state
        .db
        .get_published_articles_for_category(category.id)
        .await?;
    if news.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(HtmlTemplate(NewsListTemplate {
        title: category.title,
        news,
    }))
}

pub async fn view_news(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let news_id = parse_id(&news_id)?;
    let news_item = state
        .db
        .get_article(news_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HtmlTemplate(ViewNewsTemplate { news_item }))
}

pub async fn add_news_form(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.db.get_all_categories().await?;

    Ok(HtmlTemplate(AddNewsTemplate {
        form: ArticleForm::default(),
        errors: FormErrors::default(),
        categories,
    }))
}

pub async fn add_news(
    State(state): State<Arc<AppState>>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    let categories = state.db.get_all_categories().await?;

    let form = match body {
        Ok(Form(pairs)) => ArticleForm::from_pairs(pairs),
        Err(rejection) => {
            debug!("Unreadable article form: {}", rejection.body_text());
            let mut errors = FormErrors::default();
            errors.add(NON_FIELD_ERRORS, "The submitted form could not be read.");
            return Ok(HtmlTemplate(AddNewsTemplate {
                form: ArticleForm::default(),
                errors,
                categories,
            })
            .into_response());
        }
    };

    match form.validate(&categories) {
        Ok(new_article) => {
            let article = state.db.insert_article(&new_article).await?;
            info!("Created article {} ({})", article.id, article.title);
            Ok(Redirect::to(&format!("/news/{}", article.id)).into_response())
        }
        Err(errors) => {
            debug!("Rejected article form: {}", errors);
            Ok(HtmlTemplate(AddNewsTemplate {
                form,
                errors,
                categories,
            })
            .into_response())
        }
    }
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
