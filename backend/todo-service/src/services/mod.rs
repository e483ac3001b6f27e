/// Business logic layer for Todo Service
pub mod id_client;
pub mod todos;

pub use id_client::{IdClientConfig, IdGenerator, IdReply, IdServiceClient, IdServiceError};
#[cfg(test)]
pub use id_client::MockIdGenerator;
pub use todos::TodoService;
