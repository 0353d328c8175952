// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};
use usergrid_api::{Client, Submitter};
use usergrid_app::{
    CellValue, ControllerState, FilterSpec, GridCommand, GridController, GridEvent, PageRequest,
    PageResponse, RecordId, SortDirection, SortSpec, SubmitOutcome, UpdateBatch, UpdateKey,
};
use usergrid_testkit::{DemoServer, fixture_user};

fn json_header() -> Header {
    Header::from_bytes("Content-Type", "application/json").expect("valid content type header")
}

fn client_for(server: &Server) -> Result<Client> {
    let base = format!("http://{}", server.server_addr());
    Client::new(
        &format!("{base}/api/users"),
        &format!("{base}/api/update-user"),
        Duration::from_secs(2),
    )
}

/// Loads record 5, selects it, edits the email, and confirms, returning
/// the controller together with the captured batch.
fn pending_email_edit() -> (GridController, UpdateBatch) {
    let mut controller = GridController::new(200);
    controller.dispatch(GridCommand::PageLoaded(PageResponse {
        data: vec![fixture_user(4), fixture_user(5)],
        last_page: Some(1),
    }));
    controller.dispatch(GridCommand::ToggleSelect(RecordId::new(5)));
    controller.dispatch(GridCommand::EditCell {
        id: RecordId::new(5),
        key: UpdateKey::Email,
        value: CellValue::Text("a@b.com".to_owned()),
    });
    assert!(controller.submit_affordance().is_enabled());

    controller.dispatch(GridCommand::SubmitClicked);
    let batch = controller
        .dispatch(GridCommand::Confirm)
        .into_iter()
        .find_map(|event| match event {
            GridEvent::SubmitRequested(batch) => Some(batch),
            _ => None,
        })
        .expect("confirm should request a submit");
    (controller, batch)
}

#[test]
fn fetch_page_sends_encoded_query_and_decodes_page() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let client = client_for(&server)?;
    let demo = DemoServer::seeded(40, 3);
    let request = PageRequest {
        sorts: vec![SortSpec::new("name", SortDirection::Asc)],
        filters: vec![FilterSpec::new("gender", "male")],
        ..PageRequest::first(200)
    };
    let expected = demo.fetch(&request)?;
    let body = serde_json::to_string(&expected)?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(*request.method(), Method::Get);
        assert_eq!(
            request.url(),
            "/api/users?page=1&per_page=200&sort_by=name%3Aasc&gender=male"
        );
        let response = Response::from_string(body)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let page = client.fetch_page(&request)?;
    assert_eq!(page, expected);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_page_surfaces_server_error() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let client = client_for(&server)?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"error":"bad sort field"}"#)
            .with_status_code(400)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let error = client
        .fetch_page(&PageRequest::first(200))
        .expect_err("400 should fail the fetch");
    assert_eq!(error.to_string(), "server error (400): bad sort field");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn fetch_page_connection_error_names_config_key() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/api/users",
        "http://127.0.0.1:1/api/update-user",
        Duration::from_millis(50),
    )?;
    let error = client
        .fetch_page(&PageRequest::first(200))
        .expect_err("unreachable endpoint should fail");
    assert!(error.to_string().contains("api.fetch_url"));
    Ok(())
}

#[test]
fn accepted_batch_clears_flag_and_deselects() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let client = client_for(&server)?;
    let (mut controller, batch) = pending_email_edit();

    let handle = thread::spawn(move || -> serde_json::Value {
        let mut request = server.recv().expect("request expected");
        assert_eq!(*request.method(), Method::Post);
        assert_eq!(request.url(), "/api/update-user");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("request body should be readable");
        let response = Response::from_string(r#"{"updated":1}"#)
            .with_status_code(200)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
        serde_json::from_str(&body).expect("request body should be json")
    });

    let outcome = client.submit(&batch);
    assert_eq!(
        outcome,
        SubmitOutcome::Success(serde_json::json!({"updated": 1}))
    );

    let posted = handle.join().expect("server thread should join");
    let updates = posted["updates"]
        .as_array()
        .ok_or_else(|| anyhow!("updates should be an array"))?;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0]["id"], 5);
    assert_eq!(updates[0]["email"], "a@b.com");
    assert_eq!(updates[0]["isModified"], true);

    controller.dispatch(GridCommand::SubmitCompleted(outcome));
    let record = &controller.grid().records()[1];
    assert_eq!(record.id, RecordId::new(5));
    assert!(!record.is_modified);
    assert!(!controller.grid().is_record_selected(RecordId::new(5)));
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(controller.notice(), Some("Records updated successfully"));
    Ok(())
}

#[test]
fn rejected_batch_keeps_selection_and_surfaces_reason() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let client = client_for(&server)?;
    let (mut controller, batch) = pending_email_edit();

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let response = Response::from_string(r#"{"error":"db locked"}"#)
            .with_status_code(500)
            .with_header(json_header());
        request.respond(response).expect("response should succeed");
    });

    let outcome = client.submit_updates(&batch);
    assert_eq!(outcome, SubmitOutcome::Failure("db locked".to_owned()));
    handle.join().expect("server thread should join");

    let events = controller.dispatch(GridCommand::SubmitCompleted(outcome));
    assert_eq!(events, vec![GridEvent::SubmitFailed("db locked".to_owned())]);
    assert_eq!(controller.notice(), Some("db locked"));
    let record = &controller.grid().records()[1];
    assert!(record.is_modified);
    assert!(controller.grid().is_record_selected(RecordId::new(5)));
    Ok(())
}

#[test]
fn non_ok_success_status_counts_as_failure() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let client = client_for(&server)?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(Response::empty(204))
            .expect("response should succeed");
    });

    let outcome = client.submit_updates(&UpdateBatch {
        records: vec![fixture_user(1)],
    });
    assert_eq!(outcome, SubmitOutcome::Failure("Something went wrong".to_owned()));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn transport_failure_becomes_generic_failure() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/api/users",
        "http://127.0.0.1:1/api/update-user",
        Duration::from_millis(50),
    )?;
    let outcome = client.submit_updates(&UpdateBatch {
        records: vec![fixture_user(1)],
    });
    assert_eq!(outcome, SubmitOutcome::Failure("Something went wrong".to_owned()));
    Ok(())
}
