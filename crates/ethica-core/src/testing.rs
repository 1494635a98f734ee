//! Scripted in-memory gateway for core tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use ethica_types::chat::{
    ChatReply, ChatRequest, ConversationDetail, ConversationId, SaveConversationRequest,
    SavedConversation,
};
use ethica_types::error::GatewayError;
use ethica_types::event::ConversationEvent;
use ethica_types::status::ServiceStatus;
use tokio::sync::broadcast;

use crate::gateway::Gateway;

type Script<T> = Mutex<VecDeque<Result<T, GatewayError>>>;

fn unscripted<T>(call: &str) -> Result<T, GatewayError> {
    Err(GatewayError::Transport(format!("unscripted {call} call")))
}

fn next<T>(script: &Script<T>, call: &str) -> Result<T, GatewayError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| unscripted(call))
}

/// Gateway answering from per-endpoint queues and recording every call.
///
/// An endpoint with an empty queue answers with a transport error.
#[derive(Default)]
pub struct MockGateway {
    chat: Script<ChatReply>,
    clear: Script<()>,
    create: Script<ConversationId>,
    list: Script<Vec<SavedConversation>>,
    get: Script<ConversationDetail>,
    delete: Script<()>,
    status: Script<ServiceStatus>,
    chat_stalled: AtomicBool,

    chat_requests: Mutex<Vec<ChatRequest>>,
    save_requests: Mutex<Vec<SaveConversationRequest>>,
    clear_calls: Mutex<usize>,
    fetched: Mutex<Vec<ConversationId>>,
    deleted: Mutex<Vec<ConversationId>>,

    observer: Mutex<Option<broadcast::Receiver<ConversationEvent>>>,
    seen_at_chat: Mutex<Vec<Vec<ConversationEvent>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next chat call is recorded and then never answers.
    pub fn with_stalled_chat(self) -> Self {
        self.chat_stalled.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_chat(self, reply: Result<ChatReply, GatewayError>) -> Self {
        self.chat.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_clear(self, result: Result<(), GatewayError>) -> Self {
        self.clear.lock().unwrap().push_back(result);
        self
    }

    pub fn with_create(self, result: Result<ConversationId, GatewayError>) -> Self {
        self.create.lock().unwrap().push_back(result);
        self
    }

    pub fn with_list(self, result: Result<Vec<SavedConversation>, GatewayError>) -> Self {
        self.list.lock().unwrap().push_back(result);
        self
    }

    pub fn with_get(self, result: Result<ConversationDetail, GatewayError>) -> Self {
        self.get.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delete(self, result: Result<(), GatewayError>) -> Self {
        self.delete.lock().unwrap().push_back(result);
        self
    }

    pub fn with_status(self, result: Result<ServiceStatus, GatewayError>) -> Self {
        self.status.lock().unwrap().push_back(result);
        self
    }

    /// Record, at each chat call, the events published so far on `rx`.
    pub fn observe(&self, rx: broadcast::Receiver<ConversationEvent>) {
        *self.observer.lock().unwrap() = Some(rx);
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn save_requests(&self) -> Vec<SaveConversationRequest> {
        self.save_requests.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) -> usize {
        *self.clear_calls.lock().unwrap()
    }

    pub fn fetched(&self) -> Vec<ConversationId> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<ConversationId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn seen_at_chat(&self) -> Vec<Vec<ConversationEvent>> {
        self.seen_at_chat.lock().unwrap().clone()
    }
}

impl Gateway for MockGateway {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        if let Some(rx) = self.observer.lock().unwrap().as_mut() {
            let mut seen = Vec::new();
            while let Ok(event) = rx.try_recv() {
                seen.push(event);
            }
            self.seen_at_chat.lock().unwrap().push(seen);
        }
        self.chat_requests.lock().unwrap().push(request.clone());
        if self.chat_stalled.swap(false, Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        next(&self.chat, "chat")
    }

    async fn clear(&self) -> Result<(), GatewayError> {
        *self.clear_calls.lock().unwrap() += 1;
        next(&self.clear, "clear")
    }

    async fn create_conversation(
        &self,
        request: &SaveConversationRequest,
    ) -> Result<ConversationId, GatewayError> {
        self.save_requests.lock().unwrap().push(request.clone());
        next(&self.create, "create_conversation")
    }

    async fn list_conversations(&self) -> Result<Vec<SavedConversation>, GatewayError> {
        next(&self.list, "list_conversations")
    }

    async fn get_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<ConversationDetail, GatewayError> {
        self.fetched.lock().unwrap().push(id.clone());
        next(&self.get, "get_conversation")
    }

    async fn delete_conversation(&self, id: &ConversationId) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push(id.clone());
        next(&self.delete, "delete_conversation")
    }

    async fn status(&self) -> Result<ServiceStatus, GatewayError> {
        next(&self.status, "status")
    }
}
