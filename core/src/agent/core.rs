//! AgentCore implementation

use super::config::AgentConfig;
use super::prompt::build_system_content;
use crate::agent::AgentExecution;
use crate::error::Result;
use crate::llm::{
    ChatOptions, ContentBlock, LlmClient, LlmMessage, LlmResponse, ToolChoice, ToolDefinition,
};
use crate::tools::{ToolCall, ToolRegistry, ToolResult};
use crate::trajectory::{TrajectoryEntry, TrajectoryRecorder};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Drives one query through a bounded number of tool-calling rounds
///
/// The agent holds no per-query state: every call to
/// [`AgentCore::generate_response`] builds its own message list and drops it
/// on return, so one agent can serve any number of queries.
pub struct AgentCore {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    trajectory_recorder: Option<Arc<TrajectoryRecorder>>,
}

impl AgentCore {
    /// Create a new agent around an LLM client
    pub fn new(config: AgentConfig, llm_client: Arc<dyn LlmClient>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            llm_client,
            trajectory_recorder: None,
        })
    }

    /// Attach a trajectory recorder
    pub fn with_trajectory_recorder(mut self, recorder: Arc<TrajectoryRecorder>) -> Self {
        self.trajectory_recorder = Some(recorder);
        self
    }

    /// Get agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Get the LLM client
    pub fn llm_client(&self) -> &dyn LlmClient {
        self.llm_client.as_ref()
    }

    /// Answer a query, calling tools when the model asks for them
    ///
    /// `history` is rendered conversation text appended to the system prompt.
    /// Without tool definitions a single request is made. Only failures of
    /// the LLM call itself are returned as `Err`; tool failures are handed
    /// back to the model as text.
    pub async fn generate_response(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
    ) -> Result<String> {
        let execution = self
            .generate_response_with_stats(query, history, tools, registry)
            .await?;
        Ok(execution.answer)
    }

    /// Same as [`AgentCore::generate_response`], with execution statistics
    pub async fn generate_response_with_stats(
        &self,
        query: &str,
        history: Option<&str>,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
    ) -> Result<AgentExecution> {
        let start_time = Instant::now();
        let system = build_system_content(self.config.effective_system_prompt(), history);

        self.record(TrajectoryEntry::query_start(query.to_string(), system.clone()))
            .await;

        let mut execution = AgentExecution::default();
        let tools = tools.filter(|definitions| !definitions.is_empty());

        let answer = match self
            .run_loop(&system, query, tools, registry, &mut execution)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                self.record(TrajectoryEntry::error(
                    e.to_string(),
                    Some("LLM request failed".to_string()),
                    execution.rounds,
                ))
                .await;
                return Err(e);
            }
        };

        execution.answer = answer;
        execution.duration_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            rounds = execution.rounds,
            requests = execution.requests,
            tool_calls = execution.tool_calls,
            forced = execution.forced_completion,
            duration_ms = execution.duration_ms,
            "query answered"
        );

        self.record(TrajectoryEntry::query_complete(
            execution.answer.clone(),
            execution.requests,
            execution.duration_ms,
            execution.rounds,
        ))
        .await;

        Ok(execution)
    }

    async fn run_loop(
        &self,
        system: &str,
        query: &str,
        tools: Option<&[ToolDefinition]>,
        registry: Option<&ToolRegistry>,
        execution: &mut AgentExecution,
    ) -> Result<String> {
        let mut messages = vec![LlmMessage::user(query)];

        let Some(definitions) = tools else {
            let response = self.request(system, &messages, None, 0, execution).await?;
            return Ok(response.text());
        };

        while execution.rounds < self.config.max_tool_rounds {
            let round = execution.rounds + 1;
            let response = self
                .request(system, &messages, Some(definitions), round, execution)
                .await?;

            if !response.wants_tools() {
                return Ok(response.text());
            }

            let Some(registry) = registry else {
                debug!(round, "tool use requested without a registry, returning text");
                return Ok(response.text());
            };

            let results = self
                .execute_tool_uses(&response, registry, round, execution)
                .await;

            messages.push(response.message);
            messages.push(LlmMessage::tool_results(results));
            execution.rounds = round;
        }

        info!(
            max_tool_rounds = self.config.max_tool_rounds,
            "tool round budget exhausted, requesting answer without tools"
        );
        self.record(TrajectoryEntry::forced_completion(
            self.config.max_tool_rounds,
        ))
        .await;
        execution.forced_completion = true;

        let response = self
            .request(system, &messages, None, execution.rounds, execution)
            .await?;
        Ok(response.text())
    }

    /// Issue one LLM request; tool choice is only sent along with tools
    async fn request(
        &self,
        system: &str,
        messages: &[LlmMessage],
        tools: Option<&[ToolDefinition]>,
        round: usize,
        execution: &mut AgentExecution,
    ) -> Result<LlmResponse> {
        self.record(TrajectoryEntry::llm_request(
            messages.to_vec(),
            tools,
            self.llm_client.model_name().to_string(),
            self.llm_client.provider_name().to_string(),
            round,
        ))
        .await;

        let options = ChatOptions {
            tool_choice: tools.map(|_| ToolChoice::Auto),
            ..Default::default()
        };

        debug!(
            round,
            messages = messages.len(),
            tools = tools.map_or(0, |definitions| definitions.len()),
            "sending LLM request"
        );
        execution.requests += 1;

        let response = match self
            .llm_client
            .chat_completion(
                system,
                messages.to_vec(),
                tools.map(|definitions| definitions.to_vec()),
                Some(options),
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("LLM request failed in round {}: {}", round, e);
                return Err(e);
            }
        };

        debug!(round, finish_reason = ?response.finish_reason, "received LLM response");
        self.record(TrajectoryEntry::llm_response(
            response.message.clone(),
            response.usage.clone(),
            response.finish_reason.as_ref().map(|r| format!("{:?}", r)),
            round,
        ))
        .await;

        Ok(response)
    }

    /// Execute every tool-use block of a response in order
    ///
    /// Produces exactly one tool result per block, with the block's id.
    async fn execute_tool_uses(
        &self,
        response: &LlmResponse,
        registry: &ToolRegistry,
        round: usize,
        execution: &mut AgentExecution,
    ) -> Vec<ContentBlock> {
        let mut results = Vec::new();

        for block in response.blocks() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            let call = ToolCall::new(id.clone(), name.clone(), input.clone());
            self.record(TrajectoryEntry::tool_call(call.clone(), round))
                .await;

            debug!(tool = %name, id = %id, round, "executing tool");
            let result = match AssertUnwindSafe(registry.execute(call)).catch_unwind().await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    warn!(tool = %name, "tool execution failed: {}", e);
                    ToolResult::error(
                        id.clone(),
                        format!("Tool execution error: {}", e),
                    )
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    warn!(tool = %name, "tool panicked: {}", message);
                    ToolResult::error(
                        id.clone(),
                        format!("Tool execution error: {}", message),
                    )
                }
            };
            execution.tool_calls += 1;

            self.record(TrajectoryEntry::tool_result(result.clone(), round))
                .await;

            results.push(ContentBlock::ToolResult {
                tool_use_id: id.clone(),
                content: result.content,
                is_error: (!result.success).then_some(true),
            });
        }

        results
    }

    /// Best-effort: a recorder failure never fails the query
    async fn record(&self, entry: TrajectoryEntry) {
        if let Some(recorder) = &self.trajectory_recorder {
            if let Err(e) = recorder.record(entry).await {
                warn!("failed to record trajectory entry: {}", e);
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool panicked".to_string()
    }
}
