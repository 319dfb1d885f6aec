use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};
use teamtree_admin::api::auth::BearerToken;
use teamtree_admin::api::RosterClient;
use teamtree_admin::handlers;
use teamtree_admin::state::AppState;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_for(server: &MockServer, feedback_ms: i64) -> web::Data<AppState> {
    let client = RosterClient::new(
        Url::parse(&server.uri()).unwrap(),
        BearerToken::new("test-token").unwrap(),
    );
    web::Data::new(AppState::new(Arc::new(client), Duration::milliseconds(feedback_ms)).unwrap())
}

fn team(id: &str, name: &str, parent: Option<&str>) -> Value {
    json!({"id": id, "name": name, "parent_team_id": parent})
}

fn employee(id: &str, name: &str, team_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "surname": "Testová",
        "position": "Analyst",
        "created_at": "2024-03-01T10:00:00",
        "start_date": "2024-03-04T00:00:00Z",
        "end_date": null,
        "team_id": team_id
    })
}

async fn mount_list(server: &MockServer, collection: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", collection)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

fn post(uri: &str) -> test::TestRequest {
    test::TestRequest::post().uri(uri)
}

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[actix_web::test]
async fn board_shows_roots_and_expands_into_subteams() {
    let server = MockServer::start().await;
    mount_list(
        &server,
        "teams",
        json!([
            team("a", "Alpha", None),
            team("b", "Beta", Some("a")),
            team("c", "Gamma", Some("missing")),
        ]),
    )
    .await;
    mount_list(&server, "employees", json!([employee("e1", "Eva", "b")])).await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;

    let resp = test::call_service(&app, get("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Alpha"));
    assert!(html.contains("Gamma"));
    assert!(html.contains("1 tím"));
    assert!(!html.contains("Beta"));

    let resp = test::call_service(&app, post("/teams/a/expand").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    test::call_service(&app, post("/teams/b/expand").to_request()).await;

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Beta"));
    assert!(html.contains("1 zamestnanec"));
    assert!(html.contains("Eva Testová"));
    assert!(html.contains("Start: 4. 3. 2024"));
}

#[actix_web::test]
async fn empty_roster_invites_first_team() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([])).await;
    mount_list(&server, "employees", json!([])).await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("No teams found. Create your first team!"));
}

#[actix_web::test]
async fn api_outage_is_a_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_list(&server, "employees", json!([])).await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    let resp = test::call_service(&app, get("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn small_employee_lists_open_automatically() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([team("t2", "Dvojka", None), team("t5", "Pätka", None)])).await;
    let mut employees: Vec<Value> = (0..2).map(|i| employee(&format!("two-{}", i), &format!("Dva{}", i), "t2")).collect();
    employees.extend((0..5).map(|i| employee(&format!("five-{}", i), &format!("Pat{}", i), "t5")));
    mount_list(&server, "employees", Value::Array(employees)).await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    test::call_service(&app, post("/teams/t2/expand").to_request()).await;
    test::call_service(&app, post("/teams/t5/expand").to_request()).await;

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Dva0 Testová"));
    assert!(html.contains("Dva1 Testová"));
    assert!(html.contains("Zamestnanci (5)"));
    assert!(!html.contains("Pat0 Testová"));

    test::call_service(&app, post("/teams/t5/employees/expand").to_request()).await;
    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Pat4 Testová"));
}

#[actix_web::test]
async fn deleting_a_team_refetches_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            team("a", "Alpha", None),
            team("b", "Beta", None),
        ])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([team("a", "Alpha", None)])))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, "employees", json!([])).await;
    Mock::given(method("DELETE"))
        .and(path("/teams/b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Beta"));

    test::call_service(&app, post("/edit-mode").to_request()).await;
    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Hotovo"));
    assert!(html.contains("/teams/b/delete"));

    let resp = test::call_service(&app, post("/teams/b/delete").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(!html.contains("Beta"));
    assert!(html.contains("Alpha"));
}

#[actix_web::test]
async fn failed_team_delete_flashes_error() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([team("a", "Alpha", None)])).await;
    mount_list(&server, "employees", json!([])).await;
    Mock::given(method("DELETE"))
        .and(path("/teams/a"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 60_000)).configure(handlers::configure)).await;
    test::call_service(&app, post("/teams/a/delete").to_request()).await;

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Error deleting team"));
    assert!(html.contains("Alpha"));
}

#[actix_web::test]
async fn bulk_delete_clears_selection_on_success() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([team("t", "Tím", None)])).await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            employee("e1", "Eva", "t"),
            employee("e2", "Ema", "t"),
            employee("e3", "Ida", "t"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_list(&server, "employees", json!([employee("e3", "Ida", "t")])).await;
    for id in ["e1", "e2"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/employees/{}", id)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/employees/e3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    for id in ["e1", "e2", "ghost"] {
        let req = test::TestRequest::post()
            .uri(&format!("/employees/{}/select", id))
            .set_form([("checked", "true")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);
    }

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Vymazať zamestnancov (2)"));

    let resp = test::call_service(&app, post("/employees/delete-selected").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(!html.contains("Vymazať zamestnancov"));
    assert!(!html.contains("Error deleting employees"));
}

#[actix_web::test]
async fn bulk_delete_failure_keeps_selection() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([team("t", "Tím", None)])).await;
    mount_list(&server, "employees", json!([employee("e1", "Eva", "t"), employee("e2", "Ema", "t")])).await;
    Mock::given(method("DELETE"))
        .and(path("/employees/e1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/employees/e2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 60_000)).configure(handlers::configure)).await;
    for id in ["e1", "e2"] {
        let req = test::TestRequest::post()
            .uri(&format!("/employees/{}/select", id))
            .set_form([("checked", "true")])
            .to_request();
        test::call_service(&app, req).await;
    }
    test::call_service(&app, post("/employees/delete-selected").to_request()).await;

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Error deleting employees"));
    assert!(html.contains("Vymazať zamestnancov (2)"));
}

#[actix_web::test]
async fn bulk_delete_with_unreadable_employees_flashes_error() {
    let server = MockServer::start().await;
    mount_list(&server, "teams", json!([team("t", "Tím", None)])).await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, "employees", json!([employee("e1", "Eva", "t")])).await;
    Mock::given(method("DELETE"))
        .and(path("/employees/e1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 60_000)).configure(handlers::configure)).await;
    let req = test::TestRequest::post()
        .uri("/employees/e1/select")
        .set_form([("checked", "true")])
        .to_request();
    test::call_service(&app, req).await;

    let resp = test::call_service(&app, post("/employees/delete-selected").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let html = body_text(test::call_service(&app, get("/").to_request()).await).await;
    assert!(html.contains("Error deleting employees"));
    assert!(html.contains("Vymazať zamestnancov (1)"));
}

#[actix_web::test]
async fn bulk_delete_without_selection_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = test::init_service(App::new().app_data(state_for(&server, 2000)).configure(handlers::configure)).await;
    let resp = test::call_service(&app, post("/employees/delete-selected").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
