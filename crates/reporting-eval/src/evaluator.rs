//! Evaluator trait implemented per query kind

use crate::context::EvaluationContext;
use crate::error::EvalResult;
use crate::query::{EncounterQuery, QueryKind};
use crate::result::EncounterQueryResult;
use async_trait::async_trait;

/// Evaluates one kind of encounter query
///
/// Evaluators are stateless apart from the collaborators they are built with
/// and may be shared between concurrent evaluations.
#[async_trait]
pub trait EncounterQueryEvaluator: Send + Sync {
    /// The query kind this evaluator handles
    fn kind(&self) -> QueryKind;

    async fn evaluate(
        &self,
        query: &EncounterQuery,
        ctx: &EvaluationContext,
    ) -> EvalResult<EncounterQueryResult>;
}
