use std::sync::Arc;

use academia::{
    http::{AppState, router},
    repository::Repository,
};
use academia_store::store::DocumentStore;
use academia_store_memory::InMemoryStore;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use bson::oid::ObjectId;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let repository = Repository::new(DocumentStore::from_backend(InMemoryStore::new()));
    repository.ensure_indexes().await.unwrap();
    router(AppState::new(Arc::new(repository)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send_text(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, String::from_utf8(bytes).unwrap())
}

async fn create_ana(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/estudiantes",
        Some(json!({ "nombre": "Ana", "correo": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["_id"].as_str().unwrap().to_string()
}

async fn create_math(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/cursos",
        Some(json!({ "titulo": "Math", "descripcion": "Algebra" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    for uri in ["/api", "/api/"] {
        let (status, body) = send_text(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, "¡API funcionando!", "{uri}");
    }
}

#[tokio::test]
async fn test_create_student_then_list() {
    let app = app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/estudiantes",
        Some(json!({ "nombre": "  Ana  ", "correo": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["nombre"], "Ana");
    assert_eq!(body["cursos"], json!([]));
    assert_eq!(body["_id"].as_str().unwrap().len(), 24);

    let (status, list) = send_json(&app, Method::GET, "/api/estudiantes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        list,
        json!([{ "_id": body["_id"], "nombre": "Ana", "correo": "ana@x.com", "cursos": [] }])
    );
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = app().await;
    create_ana(&app).await;

    let (status, body) = send_text(
        &app,
        Method::POST,
        "/api/estudiantes",
        Some(json!({ "nombre": "Otra Ana", "correo": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "Ya existe un registro con correo ana@x.com");

    let (_, list) = send_json(&app, Method::GET, "/api/estudiantes", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_validation_failures_are_bad_requests() {
    let app = app().await;

    let (status, body) = send_text(
        &app,
        Method::POST,
        "/api/estudiantes",
        Some(json!({ "nombre": "Ana", "correo": "ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#""correo" must be a valid email"#);

    let (status, body) = send_text(&app, Method::POST, "/api/cursos", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#""titulo" is required"#);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/cursos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let app = app().await;
    let missing = ObjectId::new().to_hex();
    let course = json!({ "titulo": "Math" });
    let student = json!({ "nombre": "Ana", "correo": "ana@x.com" });

    let cases = [
        (Method::PUT, format!("/api/estudiantes/{missing}"), Some(student), "Estudiante no encontrado"),
        (Method::DELETE, format!("/api/estudiantes/{missing}"), None, "Estudiante no encontrado"),
        (Method::PUT, format!("/api/cursos/{missing}"), Some(course), "Curso no encontrado"),
        (Method::DELETE, "/api/cursos/not-an-id".to_string(), None, "Curso no encontrado"),
        (
            Method::POST,
            format!("/api/cursos/{missing}/inscribir/{missing}"),
            None,
            "Curso o estudiante no encontrado",
        ),
        (
            Method::POST,
            format!("/api/cursos/{missing}/remover/{missing}"),
            None,
            "Curso o estudiante no encontrado",
        ),
    ];

    for (method, uri, body, message) in cases {
        let (status, text) = send_text(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(text, message, "{uri}");
    }
}

#[tokio::test]
async fn test_enroll_expands_both_sides() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/cursos/{course_id}/inscribir/{student_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Estudiante inscrito");
    assert_eq!(body["course"]["estudiantes"], json!([student_id]));
    assert_eq!(body["student"]["cursos"], json!([course_id]));

    let (_, courses) = send_json(&app, Method::GET, "/api/cursos", None).await;
    assert_eq!(
        courses[0]["estudiantes"],
        json!([{ "_id": student_id, "nombre": "Ana", "correo": "ana@x.com" }])
    );

    let (_, students) = send_json(&app, Method::GET, "/api/estudiantes", None).await;
    assert_eq!(
        students[0]["cursos"],
        json!([{ "_id": course_id, "titulo": "Math", "descripcion": "Algebra" }])
    );
}

#[tokio::test]
async fn test_remove_restores_lists() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    send_json(&app, Method::POST, &format!("/api/cursos/{course_id}/inscribir/{student_id}"), None).await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/cursos/{course_id}/remover/{student_id}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Estudiante removido del curso");
    assert_eq!(body["course"]["estudiantes"], json!([]));
    assert_eq!(body["student"]["cursos"], json!([]));
}

#[tokio::test]
async fn test_remove_never_enrolled_is_ok() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/cursos/{course_id}/remover/{student_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course"]["estudiantes"], json!([]));
}

#[tokio::test]
async fn test_update_and_delete_course() {
    let app = app().await;
    let course_id = create_math(&app).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/cursos/{course_id}"),
        Some(json!({ "titulo": " Geometry " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["titulo"], "Geometry");
    assert_eq!(body["descripcion"], "Algebra");

    let (status, body) = send_json(&app, Method::DELETE, &format!("/api/cursos/{course_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], course_id);

    let (_, courses) = send_json(&app, Method::GET, "/api/cursos", None).await;
    assert_eq!(courses, json!([]));
}

#[tokio::test]
async fn test_deleted_student_is_dropped_from_course_listing() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    send_json(&app, Method::POST, &format!("/api/cursos/{course_id}/inscribir/{student_id}"), None).await;
    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/estudiantes/{student_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, courses) = send_json(&app, Method::GET, "/api/cursos", None).await;
    assert_eq!(courses[0]["estudiantes"], json!([]));
}

#[tokio::test]
async fn test_update_student() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/estudiantes/{student_id}"),
        Some(json!({ "nombre": " Ana María ", "correo": "ana.maria@x.com", "cursos": [course_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "_id": student_id, "nombre": "Ana María", "correo": "ana.maria@x.com", "cursos": [course_id] })
    );

    let (_, students) = send_json(&app, Method::GET, "/api/estudiantes", None).await;
    assert_eq!(students[0]["correo"], "ana.maria@x.com");
    assert_eq!(students[0]["cursos"][0]["titulo"], "Math");
}

#[tokio::test]
async fn test_update_is_validated_like_create() {
    let app = app().await;
    let student_id = create_ana(&app).await;
    let course_id = create_math(&app).await;

    let (status, body) = send_text(
        &app,
        Method::PUT,
        &format!("/api/estudiantes/{student_id}"),
        Some(json!({ "nombre": "Ana", "correo": "ana@x.com", "cursos": ["123"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#""cursos[0]" length must be 24 characters long"#);

    let (status, body) = send_text(
        &app,
        Method::PUT,
        &format!("/api/cursos/{course_id}"),
        Some(json!({ "titulo": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#""titulo" is not allowed to be empty"#);

    let (_, students) = send_json(&app, Method::GET, "/api/estudiantes", None).await;
    assert_eq!(students[0]["cursos"], json!([]));
}

#[tokio::test]
async fn test_update_student_to_taken_email_conflicts() {
    let app = app().await;
    create_ana(&app).await;
    let (_, bea) = send_json(
        &app,
        Method::POST,
        "/api/estudiantes",
        Some(json!({ "nombre": "Bea", "correo": "bea@x.com" })),
    )
    .await;

    let (status, _) = send_text(
        &app,
        Method::PUT,
        &format!("/api/estudiantes/{}", bea["_id"].as_str().unwrap()),
        Some(json!({ "nombre": "Bea", "correo": "ana@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
