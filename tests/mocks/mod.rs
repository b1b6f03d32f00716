pub mod captions;
pub mod llm;
