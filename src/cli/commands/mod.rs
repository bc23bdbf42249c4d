mod command_result;
mod context;
pub mod extract;
pub mod init;
mod pipeline;
pub mod transform;

pub use command_result::{
    CommandResult, CommandSummary, ExtractSummary, FileChange, FileFailure, InitSummary,
    LocaleChange, TransformSummary,
};
