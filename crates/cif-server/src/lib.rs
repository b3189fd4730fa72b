//! HTTP server assembly for the person registry.
//!
//! Mounts the [`cif_api`] router under `/v1/person` with permissive CORS and
//! request tracing. The binary in `main.rs` owns configuration and startup.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use cif_core::{PersonService, password::Credentials, store::PersonStore};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Path prefix every person endpoint lives under.
pub const PERSON_PREFIX: &str = "/v1/person";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CIF_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub const DEFAULT_HOST: &'static str = "127.0.0.1";
  pub const DEFAULT_PORT: u16 = 8080;
  pub const DEFAULT_STORE_PATH: &'static str = "cif.db";

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `service`.
pub fn app<S, C>(service: Arc<PersonService<S, C>>) -> Router
where
  S: PersonStore + 'static,
  C: Credentials + 'static,
{
  Router::new()
    .nest(PERSON_PREFIX, cif_api::person_router(service))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use cif_api::Argon2Credentials;
  use cif_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const THERAPIST_CPF: &str = "52998224725";
  const PATIENT_CPF: &str = "11144477735";

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let service = PersonService::new(Arc::new(store), Argon2Credentials);
    app(Arc::new(service))
  }

  async fn send(
    app:     &Router,
    method:  &str,
    uri:     &str,
    headers: Vec<(&str, &str)>,
    body:    Option<Value>,
  ) -> Response {
    let mut builder = Request::builder()
      .method(method)
      .uri(format!("{PERSON_PREFIX}{uri}"));
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn therapist_body() -> Value {
    json!({
      "cpf": THERAPIST_CPF,
      "email": "ana@clinic.com",
      "name": "Ana",
      "role": "therapist",
      "password": "secret1",
    })
  }

  fn patient_body(therapist_id: &str) -> Value {
    json!({
      "cpf": PATIENT_CPF,
      "email": "bruno@mail.com",
      "name": "Bruno",
      "role": "patient",
      "password": "secret2",
      "therapist_id": therapist_id,
    })
  }

  /// Register a therapist and return its id.
  async fn register_therapist(app: &Router) -> String {
    let resp = send(app, "POST", "/register", vec![], Some(therapist_body())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["id"].as_str().unwrap().to_string()
  }

  // ── Register ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_201_without_password_hash() {
    let app  = make_app().await;
    let resp = send(&app, "POST", "/register", vec![], Some(therapist_body())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json_body(resp).await;
    assert_eq!(body["cpf"], THERAPIST_CPF);
    assert_eq!(body["role"], "therapist");
    assert_eq!(body["active"], true);
    assert!(body.get("password_hash").is_none(), "{body}");
    assert!(body.get("password").is_none(), "{body}");
  }

  #[tokio::test]
  async fn register_with_invalid_cpf_returns_400() {
    let app = make_app().await;
    let mut body = therapist_body();
    body["cpf"] = json!("12345678900");

    let resp = send(&app, "POST", "/register", vec![], Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "INVALID_CPF");
  }

  #[tokio::test]
  async fn register_with_unknown_therapist_returns_422() {
    let app  = make_app().await;
    let body = patient_body(&Uuid::new_v4().to_string());

    let resp = send(&app, "POST", "/register", vec![], Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["error"], "THERAPIST_NOT_FOUND");
  }

  #[tokio::test]
  async fn duplicate_registration_returns_409() {
    let app = make_app().await;
    register_therapist(&app).await;

    let resp = send(&app, "POST", "/register", vec![], Some(therapist_body())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["error"], "CPF_ALREADY_REGISTERED");

    let mut same_email = therapist_body();
    same_email["cpf"] = json!(PATIENT_CPF);
    let resp = send(&app, "POST", "/register", vec![], Some(same_email)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["error"], "EMAIL_ALREADY_REGISTERED");
  }

  // ── Lookups ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn therapist_and_patient_listings() {
    let app = make_app().await;
    let tid = register_therapist(&app).await;

    let resp = send(&app, "POST", "/register", vec![], Some(patient_body(&tid))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let patient = json_body(resp).await;
    assert_eq!(patient["therapist_id"], tid.as_str());

    let therapists = json_body(send(&app, "GET", "/listAllTherapist", vec![], None).await).await;
    assert_eq!(therapists.as_array().unwrap().len(), 1);

    let patients = json_body(send(&app, "GET", "/listAllPatient", vec![], None).await).await;
    assert_eq!(patients.as_array().unwrap().len(), 1);

    let linked = json_body(
      send(&app, "GET", &format!("/findPatientsByTherapist/{tid}"), vec![], None).await,
    )
    .await;
    assert_eq!(linked[0]["id"], patient["id"]);
  }

  #[tokio::test]
  async fn find_by_id_and_cpf() {
    let app = make_app().await;
    let tid = register_therapist(&app).await;

    let resp = send(&app, "GET", &format!("/findById/{tid}"), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "GET", "/findbycpf/529.982.247-25", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["id"], tid.as_str());

    let resp = send(&app, "GET", &format!("/findById/{}", Uuid::new_v4()), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["error"], "PERSON_NOT_FOUND");

    let resp = send(&app, "GET", "/findbycpf/11111111111", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn malformed_path_id_returns_400() {
    let app  = make_app().await;
    let resp = send(&app, "GET", "/findById/not-a-uuid", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_uses_the_path_id() {
    let app = make_app().await;
    let tid = register_therapist(&app).await;

    let body = json!({
      "id": Uuid::new_v4(),
      "cpf": THERAPIST_CPF,
      "email": "ana.silva@clinic.com",
      "name": "Ana Silva",
    });
    let resp = send(&app, "PUT", &format!("/updatePerson/{tid}"), vec![], Some(body)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = json_body(resp).await;
    assert_eq!(updated["id"], tid.as_str());
    assert_eq!(updated["name"], "Ana Silva");
  }

  #[tokio::test]
  async fn update_missing_person_returns_404() {
    let app  = make_app().await;
    let body = json!({ "cpf": THERAPIST_CPF, "email": "a@x.com", "name": "A" });
    let resp = send(
      &app,
      "PUT",
      &format!("/updatePerson/{}", Uuid::new_v4()),
      vec![],
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Password / login ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_password_enforces_length_and_login_uses_it() {
    let app = make_app().await;
    register_therapist(&app).await;
    let uri = format!("/updatePassword/{THERAPIST_CPF}");

    for bad in ["12345", "123456789"] {
      let resp = send(&app, "PUT", &uri, vec![("password", bad)], None).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{bad}");
    }
    let resp = send(&app, "PUT", &uri, vec![], None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&app, "PUT", &uri, vec![("password", "newpass")], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_body(resp).await.get("password_hash").is_none());

    let resp = send(
      &app,
      "GET",
      "/login",
      vec![("userLogin", THERAPIST_CPF), ("password", "newpass")],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
      &app,
      "GET",
      "/login",
      vec![("userLogin", "ana@clinic.com"), ("password", "secret1")],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["error"], "UNAUTHORIZED");
  }

  #[tokio::test]
  async fn update_password_for_unknown_cpf_returns_404() {
    let app  = make_app().await;
    let resp = send(
      &app,
      "PUT",
      &format!("/updatePassword/{PATIENT_CPF}"),
      vec![("password", "newpass")],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn login_without_headers_returns_401() {
    let app  = make_app().await;
    let resp = send(&app, "GET", "/login", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn forgot_password_acknowledges_known_cpf() {
    let app = make_app().await;
    register_therapist(&app).await;

    let resp = send(&app, "GET", &format!("/forgotPassword/{THERAPIST_CPF}"), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "GET", &format!("/forgotPassword/{PATIENT_CPF}"), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Lifecycle ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_is_soft_and_reactivate_restores() {
    let app = make_app().await;
    let tid = register_therapist(&app).await;

    let resp = send(&app, "DELETE", &format!("/delete/{tid}"), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let found = json_body(send(&app, "GET", &format!("/findById/{tid}"), vec![], None).await).await;
    assert_eq!(found["active"], false);

    let resp = send(
      &app,
      "GET",
      "/login",
      vec![("userLogin", THERAPIST_CPF), ("password", "secret1")],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, "PUT", &format!("/reactivatePerson/{tid}"), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["active"], true);
  }

  #[tokio::test]
  async fn delete_unknown_returns_404() {
    let app  = make_app().await;
    let resp = send(&app, "DELETE", &format!("/delete/{}", Uuid::new_v4()), vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── CORS ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn any_origin_is_allowed() {
    let app  = make_app().await;
    let resp = send(
      &app,
      "GET",
      "/listAllPatient",
      vec![("origin", "http://elsewhere.example")],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }
}
