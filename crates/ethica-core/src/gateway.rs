//! Gateway trait definition.
//!
//! The thin contract to the backend's chat, clear, status and conversation
//! persistence endpoints. Follows the same RPITIT pattern as the rest of the
//! core ports: implementations live in ethica-infra (e.g. `HttpGateway`).

use ethica_types::chat::{
    ChatReply, ChatRequest, ConversationDetail, ConversationId, SaveConversationRequest,
    SavedConversation,
};
use ethica_types::error::GatewayError;
use ethica_types::status::ServiceStatus;

/// Port to the remote text-generation and conversation store service.
///
/// Every call is a self-contained request/response round trip. There is no
/// cancellation: a call resolves only when the backend answers or the
/// transport reports a failure.
pub trait Gateway: Send + Sync {
    /// `POST /chat` -- generate a reply for one user message.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatReply, GatewayError>> + Send;

    /// `POST /clear` -- clear the backend's view of the live conversation.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// `POST /conversations` -- store a transcript. Returns the store-assigned id.
    fn create_conversation(
        &self,
        request: &SaveConversationRequest,
    ) -> impl std::future::Future<Output = Result<ConversationId, GatewayError>> + Send;

    /// `GET /conversations` -- summaries of every stored conversation, in the
    /// store's order.
    fn list_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SavedConversation>, GatewayError>> + Send;

    /// `GET /conversations/{id}` -- the full stored transcript.
    fn get_conversation(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<ConversationDetail, GatewayError>> + Send;

    /// `DELETE /conversations/{id}`.
    fn delete_conversation(
        &self,
        id: &ConversationId,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;

    /// `GET /status` -- backend health report.
    fn status(&self) -> impl std::future::Future<Output = Result<ServiceStatus, GatewayError>> + Send;
}
