//! HTTP client for the notes and categories endpoints.

use std::future::Future;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::{normalize_api_base_url, ClientConfig};
use crate::error::{Error, Result};
use crate::models::{Category, CategoryId, Note, NoteId, NotePayload};
use crate::session::{SessionContext, TokenStore};
use crate::util::parse_api_error;

/// Remote note resource the editor reconciles against
pub trait NoteRemote: Send + Sync + 'static {
    /// Fetch a single note by ID
    fn fetch_note(&self, id: NoteId) -> impl Future<Output = Result<Note>> + Send;

    /// Create a note, returning it with its server-assigned ID
    fn create_note(&self, payload: &NotePayload) -> impl Future<Output = Result<Note>> + Send;

    /// Replace an existing note's fields
    fn update_note(
        &self,
        id: NoteId,
        payload: &NotePayload,
    ) -> impl Future<Output = Result<Note>> + Send;
}

#[derive(Clone)]
pub struct NotesApi<S: TokenStore> {
    api_base_url: String,
    client: Client,
    session: SessionContext<S>,
}

impl<S: TokenStore> NotesApi<S> {
    pub fn new(config: &ClientConfig, session: SessionContext<S>) -> Result<Self> {
        let api_base_url = normalize_api_base_url(&config.api_base_url)?;
        Ok(Self {
            api_base_url,
            client: Client::builder().timeout(config.request_timeout()).build()?,
            session,
        })
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let request = self
            .client
            .get(format!("{}/categories/", self.api_base_url));
        self.send_authorized(request).await
    }

    /// List notes, optionally only those in `category`.
    pub async fn list_notes(&self, category: Option<CategoryId>) -> Result<Vec<Note>> {
        let mut request = self.client.get(format!("{}/notes/", self.api_base_url));
        if let Some(category) = category {
            request = request.query(&[("category_id", category.get())]);
        }
        self.send_authorized(request).await
    }

    pub async fn get_note(&self, id: NoteId) -> Result<Note> {
        let request = self
            .client
            .get(format!("{}/notes/{id}/", self.api_base_url));
        self.send_authorized(request).await
    }

    pub async fn create_note(&self, payload: &NotePayload) -> Result<Note> {
        let request = self
            .client
            .post(format!("{}/notes/", self.api_base_url))
            .json(payload);
        self.send_authorized(request).await
    }

    pub async fn update_note(&self, id: NoteId, payload: &NotePayload) -> Result<Note> {
        let request = self
            .client
            .put(format!("{}/notes/{id}/", self.api_base_url))
            .json(payload);
        self.send_authorized(request).await
    }

    async fn send_authorized<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.session.require_access_token()?;
        let response = request.bearer_auth(token).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch {
                status: status.as_u16(),
                message: parse_api_error(status, &body),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

impl<S: TokenStore> NoteRemote for NotesApi<S> {
    async fn fetch_note(&self, id: NoteId) -> Result<Note> {
        self.get_note(id).await
    }

    async fn create_note(&self, payload: &NotePayload) -> Result<Note> {
        Self::create_note(self, payload).await
    }

    async fn update_note(&self, id: NoteId, payload: &NotePayload) -> Result<Note> {
        Self::update_note(self, id, payload).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::HexColor;
    use crate::session::{MemoryTokenStore, Session};
    use crate::test_support::spawn_one_shot_server;

    fn api_for(base_url: &str, logged_in: bool) -> NotesApi<MemoryTokenStore> {
        let config = ClientConfig {
            api_base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        let session = SessionContext::new(MemoryTokenStore::new());
        if logged_in {
            session
                .store_session(&Session {
                    access: "acc-1".to_string(),
                    refresh: "ref-1".to_string(),
                })
                .unwrap();
        }
        NotesApi::new(&config, session).unwrap()
    }

    #[tokio::test]
    async fn list_categories_sends_bearer_token() {
        let (url, server) = spawn_one_shot_server(
            "200 OK",
            r##"[{"id": 1, "name": "Random Thoughts", "color": "#F4E1B2"},
                 {"id": 2, "name": "Personal"}]"##,
        )
        .await;
        let api = api_for(&url, true);

        let categories = api.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].color, HexColor::new(0xF4, 0xE1, 0xB2));

        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/categories/");
        assert_eq!(
            requests[0].header("authorization").as_deref(),
            Some("Bearer acc-1")
        );
    }

    #[tokio::test]
    async fn list_notes_filters_by_category() {
        let (url, server) = spawn_one_shot_server(
            "200 OK",
            r#"[{"id": 7, "title": "Groceries", "content": "milk",
                 "created_at": "2024-01-05T15:07:12Z", "category": 2}]"#,
        )
        .await;
        let api = api_for(&url, true);

        let notes = api.list_notes(Some(CategoryId::new(2))).await.unwrap();
        assert_eq!(notes[0].id, NoteId::new(7));
        assert_eq!(
            server.await.unwrap()[0].path,
            "/api/notes/?category_id=2"
        );
    }

    #[tokio::test]
    async fn create_note_posts_payload() {
        let (url, server) = spawn_one_shot_server(
            "201 Created",
            r#"{"id": 11, "title": "Groceries", "content": "milk, eggs",
                "created_at": "2024-01-05T15:07:12Z", "category": 2}"#,
        )
        .await;
        let api = api_for(&url, true);

        let created = api
            .create_note(&NotePayload {
                title: "Groceries".to_string(),
                content: "milk, eggs".to_string(),
                category: CategoryId::new(2),
            })
            .await
            .unwrap();
        assert_eq!(created.id, NoteId::new(11));

        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/api/notes/");
        assert_eq!(
            requests[0].json(),
            json!({"title": "Groceries", "content": "milk, eggs", "category": 2})
        );
    }

    #[tokio::test]
    async fn update_note_puts_to_note_path() {
        let (url, server) = spawn_one_shot_server(
            "200 OK",
            r#"{"id": 11, "title": "Groceries", "content": "milk, eggs, bread", "category": 2}"#,
        )
        .await;
        let api = api_for(&url, true);

        api.update_note(
            NoteId::new(11),
            &NotePayload {
                title: "Groceries".to_string(),
                content: "milk, eggs, bread".to_string(),
                category: CategoryId::new(2),
            },
        )
        .await
        .unwrap();

        let requests = server.await.unwrap();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/api/notes/11/");
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let (url, _server) =
            spawn_one_shot_server("404 Not Found", r#"{"detail": "Not found."}"#).await;
        let api = api_for(&url, true);

        let error = api.get_note(NoteId::new(99)).await.unwrap_err();
        assert_eq!(error.status(), Some(404));
        assert!(error.to_string().contains("Not found."));
    }

    #[tokio::test]
    async fn missing_token_fails_before_request() {
        let api = api_for("http://127.0.0.1:9/api", false);
        let error = api.list_notes(None).await.unwrap_err();
        assert!(matches!(error, Error::Auth(ref message) if message == "No access token found"));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let (url, server) = spawn_one_shot_server("200 OK", "[]").await;
        server.abort();
        let _ = server.await;
        let api = api_for(&url, true);

        let error = api.list_categories().await.unwrap_err();
        assert!(matches!(error, Error::Network(_)));
    }
}
