//! In-memory completion provider adapters.

mod scripted;

pub use scripted::{
    CallKind, FragmentStep, RecordedCall, ScriptedCompletionProvider, ScriptedReply,
};
