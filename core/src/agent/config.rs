//! Agent configuration structures

use crate::config::{Protocol, ResolvedLlmConfig};
use crate::error::{AgentError, Result};
use crate::llm::{AnthropicClient, LlmClient};
use crate::trajectory::TrajectoryRecorder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_max_tool_rounds() -> usize {
    2
}

/// Configuration for the conversation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of tool rounds before a tool-less answer is forced
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,

    /// Custom system prompt for the agent (optional)
    /// If not provided, the default system prompt will be used
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl AgentConfig {
    /// Check that the configuration can drive a query
    pub fn validate(&self) -> Result<()> {
        if self.max_tool_rounds == 0 {
            return Err(AgentError::InvalidRoundBudget {
                max_tool_rounds: self.max_tool_rounds,
            }
            .into());
        }
        Ok(())
    }

    /// The system prompt in effect, custom or default
    pub fn effective_system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(super::prompt::SYSTEM_PROMPT)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            system_prompt: None,
        }
    }
}

/// Builder for creating agents
pub struct AgentBuilder {
    llm_client: Arc<dyn LlmClient>,
    agent_config: AgentConfig,
    trajectory_recorder: Option<Arc<TrajectoryRecorder>>,
}

impl AgentBuilder {
    /// Create a new agent builder around an existing LLM client
    pub fn new(llm_client: Arc<dyn LlmClient>) -> Self {
        Self {
            llm_client,
            agent_config: AgentConfig::default(),
            trajectory_recorder: None,
        }
    }

    /// Create a builder whose client is chosen by the configured protocol
    pub fn from_llm_config(llm_config: &ResolvedLlmConfig) -> Result<Self> {
        llm_config.validate()?;

        let llm_client: Arc<dyn LlmClient> = match llm_config.protocol {
            Protocol::Anthropic => Arc::new(AnthropicClient::new(llm_config)?),
        };

        Ok(Self::new(llm_client))
    }

    /// Set agent configuration
    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Set the tool round budget
    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.agent_config.max_tool_rounds = max_tool_rounds;
        self
    }

    /// Set system prompt
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.agent_config.system_prompt = system_prompt;
        self
    }

    /// Record every query into the given trajectory recorder
    pub fn with_trajectory_recorder(mut self, recorder: Arc<TrajectoryRecorder>) -> Self {
        self.trajectory_recorder = Some(recorder);
        self
    }

    /// Build the agent
    pub fn build(self) -> Result<super::AgentCore> {
        let agent = super::AgentCore::new(self.agent_config, self.llm_client)?;
        Ok(match self.trajectory_recorder {
            Some(recorder) => agent.with_trajectory_recorder(recorder),
            None => agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.max_tool_rounds, 2);
        assert_eq!(config.system_prompt, None);
        assert!(config.validate().is_ok());
        assert!(config.effective_system_prompt().contains("course materials"));
    }

    #[test]
    fn test_zero_round_budget_is_rejected() {
        let config = AgentConfig {
            max_tool_rounds: 0,
            system_prompt: None,
        };

        assert!(matches!(
            config.validate(),
            Err(Error::Agent(AgentError::InvalidRoundBudget { max_tool_rounds: 0 }))
        ));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"system_prompt": "Custom"}"#).unwrap();
        assert_eq!(config.max_tool_rounds, 2);
        assert_eq!(config.effective_system_prompt(), "Custom");
    }

    #[test]
    fn test_from_llm_config_rejects_invalid_config() {
        let config = ResolvedLlmConfig::new(
            Protocol::Anthropic,
            Protocol::Anthropic.default_base_url().to_string(),
            String::new(),
            "claude-test".to_string(),
        );

        assert!(AgentBuilder::from_llm_config(&config).is_err());
    }
}
