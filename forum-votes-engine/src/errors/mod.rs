mod engine;
mod request;

pub use engine::EngineError;
pub use request::VoteRequestError;
