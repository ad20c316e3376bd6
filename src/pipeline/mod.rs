pub mod composer;
pub mod prompt;

pub use composer::AnswerPipeline;
