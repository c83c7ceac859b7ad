// Background fetching
//
// Backend requests run on a small tokio runtime; results come back to the
// UI loop over a channel. Every IP-history request carries a ticket so the
// app can tell a current response from one that was superseded while it
// was in flight.

use crate::api::{ApiClient, ApiError};
use crate::sighting::{SightingRecord, User};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::debug;

/// Identity of one IP-history request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    /// Monotonic request number
    pub seq: u64,
    pub user_id: u64,
}

/// A completed request
#[derive(Debug)]
pub enum FetchOutcome {
    Users(Result<Vec<User>, ApiError>),
    UserIps {
        ticket: RequestTicket,
        user: User,
        result: Result<Vec<SightingRecord>, ApiError>,
    },
}

/// Source of backend data for the dashboard
pub trait Fetcher {
    /// Start loading the user list
    fn request_users(&mut self);

    /// Start loading `user`'s history; supersedes any history request
    /// still in flight
    fn request_user_ips(&mut self, ticket: RequestTicket, user: User, limit: u32);

    /// Outcomes completed since the last poll
    fn poll(&mut self) -> Vec<FetchOutcome>;
}

/// Fetcher backed by the HTTP API
pub struct HttpFetcher {
    runtime: Runtime,
    api: ApiClient,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    in_flight: Option<JoinHandle<()>>,
}

impl HttpFetcher {
    pub fn new(api: ApiClient) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ipwatch-fetch")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            runtime,
            api,
            tx,
            rx,
            in_flight: None,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn request_users(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = api.fetch_users().await;
            let _ = tx.send(FetchOutcome::Users(result));
        });
    }

    fn request_user_ips(&mut self, ticket: RequestTicket, user: User, limit: u32) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let result = api.fetch_user_ips(ticket.user_id, limit).await;
            let _ = tx.send(FetchOutcome::UserIps {
                ticket,
                user,
                result,
            });
        });

        if let Some(previous) = self.in_flight.replace(handle) {
            if !previous.is_finished() {
                debug!(seq = ticket.seq, "Aborting superseded IP history request");
                previous.abort();
            }
        }
    }

    fn poll(&mut self) -> Vec<FetchOutcome> {
        self.rx.try_iter().collect()
    }
}
