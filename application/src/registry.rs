//! Per-request agent registry.
//!
//! The registry caches one [`SpecializedAgent`] per specialization and
//! reconfigures it in place on resolve instead of reconstructing. It is
//! deliberately NOT shared state: construct one per top-level request.
//! Reusing a registry across unrelated concurrent requests would let one
//! request's config overwrite another's.

use std::collections::HashMap;
use std::sync::Arc;

use trinity_domain::{AgentSpecialization, ExecutionConfig};

use crate::agent::SpecializedAgent;
use crate::ports::llm_gateway::LlmGateway;

pub struct AgentRegistry<G> {
    gateway: Arc<G>,
    agents: HashMap<AgentSpecialization, SpecializedAgent<G>>,
}

impl<G: LlmGateway> AgentRegistry<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            agents: HashMap::new(),
        }
    }

    /// Resolve the enabled agents for `config`, in registration order.
    ///
    /// Existing instances are updated in place; missing ones are created.
    /// Returned agents are cheap clones (the gateway is shared via `Arc`).
    pub fn resolve(&mut self, config: &ExecutionConfig) -> Vec<SpecializedAgent<G>> {
        let mut resolved = Vec::new();
        for spec in AgentSpecialization::ALL {
            let Some(agent_config) = config.agents.get(&spec) else {
                continue;
            };
            match self.agents.get_mut(&spec) {
                Some(existing) => existing.set_config(agent_config.clone()),
                None => {
                    self.agents.insert(
                        spec,
                        SpecializedAgent::new(agent_config.clone(), Arc::clone(&self.gateway)),
                    );
                }
            }
            if agent_config.enabled {
                resolved.push(self.agents[&spec].clone());
            }
        }
        resolved
    }
}
