//! In-memory [`Platform`] for exercising the worker logic off the browser.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use pwa_common::{NotificationAction, NotificationPayload, PageMessage, WorkerMessage};

use crate::error::SwError;
use crate::http::{RequestLike, ResponseLike};
use crate::platform::Platform;

#[derive(Debug, Clone)]
pub struct MemoryRequest {
    pub url: String,
    pub method: &'static str,
    pub navigate: bool,
}

impl MemoryRequest {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: "GET",
            navigate: false,
        }
    }

    pub fn navigate(url: &str) -> Self {
        Self {
            navigate: true,
            ..Self::get(url)
        }
    }

    pub fn post(url: &str) -> Self {
        Self {
            method: "POST",
            ..Self::get(url)
        }
    }
}

impl RequestLike for MemoryRequest {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn method(&self) -> String {
        self.method.to_string()
    }

    fn is_navigation(&self) -> bool {
        self.navigate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResponse {
    pub status: u16,
    pub same_origin: bool,
    pub body: String,
}

impl MemoryResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            same_origin: true,
            body: body.to_string(),
        }
    }

    pub fn cross_origin(body: &str) -> Self {
        Self {
            same_origin: false,
            ..Self::ok(body)
        }
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            ..Self::ok(body)
        }
    }
}

impl ResponseLike for MemoryResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn is_same_origin(&self) -> bool {
        self.same_origin
    }

    fn duplicate(&self) -> Result<Self, SwError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Waiting,
    Active,
}

#[derive(Default)]
pub struct MemoryPlatform {
    caches: RefCell<BTreeMap<String, BTreeMap<String, MemoryResponse>>>,
    network: RefCell<HashMap<String, MemoryResponse>>,
    offline: Cell<bool>,
    undeletable: RefCell<HashSet<String>>,
    fetches: Cell<usize>,
    state: Cell<Option<WorkerState>>,
    claimed: Cell<bool>,
    inboxes: RefCell<Vec<Vec<WorkerMessage>>>,
    waiting_inbox: RefCell<Option<Vec<PageMessage>>>,
    focused: RefCell<Vec<String>>,
    notifications: RefCell<Vec<(NotificationPayload, Vec<NotificationAction>)>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.state.set(Some(WorkerState::Installing));
        platform
    }

    pub fn serve(self, url: &str, response: MemoryResponse) -> Self {
        self.network.borrow_mut().insert(url.to_string(), response);
        self
    }

    pub fn with_cache(self, name: &str, entries: &[(&str, MemoryResponse)]) -> Self {
        self.caches.borrow_mut().insert(
            name.to_string(),
            entries
                .iter()
                .map(|(url, response)| (url.to_string(), response.clone()))
                .collect(),
        );
        self
    }

    pub fn with_undeletable_cache(self, name: &str) -> Self {
        self.undeletable.borrow_mut().insert(name.to_string());
        self.with_cache(name, &[])
    }

    pub fn with_windows(self, count: usize) -> Self {
        *self.inboxes.borrow_mut() = vec![Vec::new(); count];
        self
    }

    pub fn waiting(self) -> Self {
        self.state.set(Some(WorkerState::Waiting));
        *self.waiting_inbox.borrow_mut() = Some(Vec::new());
        self
    }

    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.get()
    }

    pub fn state(&self) -> Option<WorkerState> {
        self.state.get()
    }

    pub fn claimed(&self) -> bool {
        self.claimed.get()
    }

    pub fn cache_keys(&self, name: &str) -> Option<Vec<String>> {
        self.caches
            .borrow()
            .get(name)
            .map(|entries| entries.keys().cloned().collect())
    }

    pub fn inboxes(&self) -> Vec<Vec<WorkerMessage>> {
        self.inboxes.borrow().clone()
    }

    pub fn waiting_inbox(&self) -> Option<Vec<PageMessage>> {
        self.waiting_inbox.borrow().clone()
    }

    pub fn focused(&self) -> Vec<String> {
        self.focused.borrow().clone()
    }

    pub fn notifications(&self) -> Vec<(NotificationPayload, Vec<NotificationAction>)> {
        self.notifications.borrow().clone()
    }

    fn network_fetch(&self, url: &str) -> Result<MemoryResponse, SwError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.offline.get() {
            return Err(SwError::Network(url.to_string()));
        }
        self.network
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| SwError::Network(url.to_string()))
    }
}

#[async_trait(?Send)]
impl Platform for MemoryPlatform {
    type Request = MemoryRequest;
    type Response = MemoryResponse;

    async fn cache_names(&self) -> Result<Vec<String>, SwError> {
        Ok(self.caches.borrow().keys().cloned().collect())
    }

    async fn delete_cache(&self, name: &str) -> Result<bool, SwError> {
        if self.undeletable.borrow().contains(name) {
            return Err(SwError::Js(format!("cannot delete {name}")));
        }
        Ok(self.caches.borrow_mut().remove(name).is_some())
    }

    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), SwError> {
        self.caches.borrow_mut().entry(cache.to_string()).or_default();

        let mut fetched = Vec::with_capacity(urls.len());
        for url in urls {
            let response = self.network_fetch(url)?;
            if !(200..300).contains(&response.status) {
                return Err(SwError::Js(format!("{url} answered {}", response.status)));
            }
            fetched.push((url.clone(), response));
        }

        self.caches
            .borrow_mut()
            .entry(cache.to_string())
            .or_default()
            .extend(fetched);
        Ok(())
    }

    async fn match_request(
        &self,
        cache: &str,
        request: &MemoryRequest,
    ) -> Result<Option<MemoryResponse>, SwError> {
        self.match_url(cache, &request.url).await
    }

    async fn match_url(&self, cache: &str, url: &str) -> Result<Option<MemoryResponse>, SwError> {
        Ok(self
            .caches
            .borrow()
            .get(cache)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    fn put_detached(&self, cache: &str, request: &MemoryRequest, response: MemoryResponse) {
        self.caches
            .borrow_mut()
            .entry(cache.to_string())
            .or_default()
            .insert(request.url.clone(), response);
    }

    async fn fetch(&self, request: &MemoryRequest) -> Result<MemoryResponse, SwError> {
        self.network_fetch(&request.url)
    }

    async fn skip_waiting(&self) -> Result<(), SwError> {
        self.state.set(Some(WorkerState::Active));
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), SwError> {
        self.claimed.set(true);
        Ok(())
    }

    async fn broadcast(&self, message: &WorkerMessage) -> Result<usize, SwError> {
        let mut inboxes = self.inboxes.borrow_mut();
        for inbox in inboxes.iter_mut() {
            inbox.push(message.clone());
        }
        Ok(inboxes.len())
    }

    async fn post_to_waiting(&self, message: &PageMessage) -> Result<bool, SwError> {
        match self.waiting_inbox.borrow_mut().as_mut() {
            Some(inbox) => {
                inbox.push(message.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn focus_or_open(&self, url: &str) -> Result<(), SwError> {
        self.focused.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn show_notification(
        &self,
        payload: &NotificationPayload,
        actions: &[NotificationAction],
    ) -> Result<(), SwError> {
        self.notifications
            .borrow_mut()
            .push((payload.clone(), actions.to_vec()));
        Ok(())
    }
}
