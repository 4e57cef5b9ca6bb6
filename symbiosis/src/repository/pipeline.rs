//! Stage tracking for a single repository call.
//!
//! Every operation goes through `before` (entity shape to database shape),
//! `delegate` (the database client) and `after` (back to entity shape), in that
//! order and once each. A failing stage moves the pipeline to `Failed` and the
//! error is returned as is: nothing is retried or rolled back here.

use std::future::Future;

use super::Repository;
use crate::types::{SymbiosisError, SymbiosisResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Save,
    Insert,
    Update,
    Upsert,
    Find,
    FindOne,
    Delete,
    SoftDelete,
    Recover,
    Count,
    PerformativeCount,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Save => "save",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Upsert => "upsert",
            Operation::Find => "find",
            Operation::FindOne => "find_one",
            Operation::Delete => "delete",
            Operation::SoftDelete => "soft_delete",
            Operation::Recover => "recover",
            Operation::Count => "count",
            Operation::PerformativeCount => "performative_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Pending,
    BeforeApplied,
    Delegated,
    AfterApplied,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Pending => "PENDING",
            PipelineState::BeforeApplied => "BEFORE_APPLIED",
            PipelineState::Delegated => "DELEGATED",
            PipelineState::AfterApplied => "AFTER_APPLIED",
            PipelineState::Failed => "FAILED",
        }
    }
}

pub struct HookPipeline<'r> {
    repository: &'r Repository,
    operation: Operation,
    state: PipelineState,
}

impl<'r> HookPipeline<'r> {
    pub(crate) fn new(repository: &'r Repository, operation: Operation) -> Self {
        Self {
            repository,
            operation,
            state: PipelineState::Pending,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn expect(&self, expected: PipelineState) -> SymbiosisResult<()> {
        if self.state == expected {
            return Ok(());
        }
        Err(SymbiosisError::invalid_pipeline_state(
            self.operation.as_str(),
            expected.as_str(),
            self.state.as_str(),
        ))
    }

    fn advance<T>(&mut self, result: SymbiosisResult<T>, next: PipelineState) -> SymbiosisResult<T> {
        self.state = match result {
            Ok(_) => next,
            Err(_) => PipelineState::Failed,
        };
        log::trace!(
            target: "symbiosis",
            "{} pipeline of {} -> {}",
            self.operation.as_str(),
            self.repository.entity().name(),
            self.state.as_str()
        );
        result
    }

    /// Run the before hook
    pub fn before<O>(
        &mut self,
        hook: impl FnOnce(&Repository) -> SymbiosisResult<O>,
    ) -> SymbiosisResult<O> {
        self.expect(PipelineState::Pending)?;
        let result = hook(self.repository);
        self.advance(result, PipelineState::BeforeApplied)
    }

    /// Hand the database-shape payload to the database client
    pub async fn delegate<T, F, Fut>(&mut self, call: F) -> SymbiosisResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SymbiosisResult<T>>,
    {
        self.expect(PipelineState::BeforeApplied)?;
        let result = call().await;
        self.advance(result, PipelineState::Delegated)
    }

    /// Run the after hook
    pub fn after<O>(
        &mut self,
        hook: impl FnOnce(&Repository) -> SymbiosisResult<O>,
    ) -> SymbiosisResult<O> {
        self.expect(PipelineState::Delegated)?;
        let result = hook(self.repository);
        self.advance(result, PipelineState::AfterApplied)
    }
}
