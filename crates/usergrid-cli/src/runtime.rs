// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, warn};
use usergrid_api::{Client, Submitter};
use usergrid_app::{PageRequest, PageResponse, SubmitOutcome, UpdateBatch};
use usergrid_testkit::DemoServer;
use usergrid_tui::{GridRuntime, InternalEvent};

/// Talks to the remote user service. Fetches and submits run on worker
/// threads so the grid keeps drawing while a request is outstanding.
pub struct HttpRuntime {
    client: Client,
}

impl HttpRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl GridRuntime for HttpRuntime {
    fn fetch_page(&mut self, request: &PageRequest) -> Result<PageResponse> {
        self.client.fetch_page(request)
    }

    fn submit_updates(&mut self, batch: &UpdateBatch) -> SubmitOutcome {
        self.client.submit(batch)
    }

    fn spawn_fetch(
        &mut self,
        token: u64,
        request: &PageRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let request = request.clone();
        thread::Builder::new()
            .name("usergrid-fetch".to_owned())
            .spawn(move || {
                let result = client
                    .fetch_page(&request)
                    .map_err(|error| format!("{error:#}"));
                if tx.send(InternalEvent::PageFetched { token, result }).is_err() {
                    debug!(token, "grid closed before page arrived");
                }
            })
            .context("spawn fetch worker")?;
        Ok(())
    }

    fn spawn_submit(&mut self, batch: &UpdateBatch, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        let batch = batch.clone();
        thread::Builder::new()
            .name("usergrid-submit".to_owned())
            .spawn(move || {
                let outcome = client.submit(&batch);
                if tx.send(InternalEvent::SubmitFinished(outcome)).is_err() {
                    warn!(count = batch.len(), "grid closed before submit finished");
                }
            })
            .context("spawn submit worker")?;
        Ok(())
    }
}

/// Serves generated users in-process for `--demo`.
pub struct DemoRuntime {
    server: DemoServer,
}

impl DemoRuntime {
    pub fn new(server: DemoServer) -> Self {
        Self { server }
    }
}

impl GridRuntime for DemoRuntime {
    fn fetch_page(&mut self, request: &PageRequest) -> Result<PageResponse> {
        self.server.fetch(request)
    }

    fn submit_updates(&mut self, batch: &UpdateBatch) -> SubmitOutcome {
        match self.server.apply_updates(batch) {
            Ok(updated) => SubmitOutcome::Success(serde_json::json!({ "updated": updated })),
            Err(error) => SubmitOutcome::Failure(error.to_string()),
        }
    }
}
