//! Stream Trinity use case
//!
//! Streaming variant of the engine: agents are launched concurrently with
//! staggered starts, but their output is delivered agent-by-agent in
//! registration order so the consumer sees coherent per-agent text rather
//! than interleaved fragments. Once every agent settles, the blended
//! answer is emitted as orchestrator chunks, ending with one terminal
//! event.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trinity_domain::util::epoch_millis;
use trinity_domain::{
    confidence_score, AgentAttribution, AgentResult, CompositeResult, ExecutionConfig,
    ExecutionMeta, FinishReason, Message, PromptTemplate, Provider, StreamEvent, TokenUsage,
};

use crate::agent::{AgentContext, SpecializedAgent};
use crate::orchestrator::Orchestrator;
use crate::ports::credentials::CredentialStore;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::registry::AgentRegistry;
use crate::use_cases::run_trinity::{
    compose, resolve_credentials, RunTrinityInput, TrinityError, STAGGER_INTERVAL,
};

/// Buffer size of the outgoing event channel.
const EVENT_BUFFER: usize = 64;

/// Target word count per orchestrator output chunk.
const CHUNK_WORDS: usize = 12;

/// Message from one agent's producer task to the drain loop.
enum AgentStreamMsg {
    Chunk {
        delta: String,
        content: String,
    },
    Done {
        content: String,
        usage: TokenUsage,
        finish_reason: FinishReason,
        elapsed_ms: u64,
    },
    Failed {
        message: String,
        elapsed_ms: u64,
    },
}

/// Use case for running one Trinity execution with incremental output.
pub struct StreamTrinityUseCase<G> {
    gateway: Arc<G>,
    credentials: Arc<dyn CredentialStore>,
}

impl<G: LlmGateway + 'static> StreamTrinityUseCase<G> {
    pub fn new(gateway: Arc<G>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    /// Start a streaming execution.
    ///
    /// Precondition failures (bad config, no agents, missing credentials)
    /// return `Err` before any event is produced. After that, all
    /// failures are reported in-band and the stream always ends with a
    /// terminal event. Dropping the receiver cancels the in-flight work.
    pub async fn execute(
        &self,
        input: RunTrinityInput,
    ) -> Result<mpsc::Receiver<StreamEvent>, TrinityError> {
        input.config.validate()?;

        let mut registry = AgentRegistry::new(Arc::clone(&self.gateway));
        let agents = registry.resolve(&input.config);
        if agents.is_empty() {
            return Err(TrinityError::NoEnabledAgents);
        }
        let keys = resolve_credentials(self.credentials.as_ref(), &input, &agents).await?;

        let started = Instant::now();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let question = input.question().to_string();
        let history = Arc::new(input.history.clone());

        info!(agents = agents.len(), "starting streaming trinity execution");

        // One producer per agent, launched up front with staggered starts.
        let mut streams = Vec::with_capacity(agents.len());
        for (index, agent) in agents.iter().cloned().enumerate() {
            let (agent_tx, agent_rx) = mpsc::channel(32);
            let api_key = keys
                .get(&agent.config().provider)
                .cloned()
                .unwrap_or_default();
            tokio::spawn(run_producer(
                agent.clone(),
                Arc::clone(&history),
                api_key,
                input.config.timeout_ms,
                STAGGER_INTERVAL * index as u32,
                cancel.child_token(),
                agent_tx,
            ));
            streams.push((agent, agent_rx));
        }

        let driver = StreamDriver {
            gateway: Arc::clone(&self.gateway),
            tx,
            cancel,
            streams,
            config: input.config,
            keys,
            history,
            question,
            started,
        };
        tokio::spawn(driver.run());

        Ok(rx)
    }
}

/// Producer task for one agent: forwards transport chunks, then exactly
/// one `Done` or `Failed`, racing the configured timeout.
async fn run_producer<G: LlmGateway>(
    agent: SpecializedAgent<G>,
    history: Arc<Vec<Message>>,
    api_key: String,
    timeout_ms: u64,
    stagger: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<AgentStreamMsg>,
) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = sleep(stagger) => {
            let started = Instant::now();
            let raced = timeout(
                Duration::from_millis(timeout_ms),
                produce(&agent, &history, &api_key, started, &tx),
            );
            tokio::select! {
                _ = cancel.cancelled() => {}
                outcome = raced => {
                    if outcome.is_err() {
                        let _ = tx
                            .send(AgentStreamMsg::Failed {
                                message: format!("timed out after {timeout_ms}ms"),
                                elapsed_ms: started.elapsed().as_millis() as u64,
                            })
                            .await;
                    }
                }
            }
        }
    }
}

async fn produce<G: LlmGateway>(
    agent: &SpecializedAgent<G>,
    history: &[Message],
    api_key: &str,
    started: Instant,
    tx: &mpsc::Sender<AgentStreamMsg>,
) {
    let ctx = AgentContext::new(api_key, &[]);
    let mut handle = match agent.stream(history, &ctx).await {
        Ok(handle) => handle,
        Err(e) => {
            let _ = tx
                .send(AgentStreamMsg::Failed {
                    message: e.to_string(),
                    elapsed_ms: started.elapsed().as_millis() as u64,
                })
                .await;
            return;
        }
    };

    let mut usage = TokenUsage::default();
    let mut finish_reason = FinishReason::Stop;
    while let Some(chunk) = handle.receiver.recv().await {
        if let Some(u) = chunk.usage {
            usage = u;
        }
        if let Some(f) = chunk.finish_reason {
            finish_reason = f;
        }
        if chunk.is_complete {
            let _ = tx
                .send(AgentStreamMsg::Done {
                    content: chunk.content,
                    usage,
                    finish_reason,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                })
                .await;
            return;
        }
        let forwarded = tx
            .send(AgentStreamMsg::Chunk {
                delta: chunk.delta,
                content: chunk.content,
            })
            .await;
        if forwarded.is_err() {
            return;
        }
    }

    // Transport closed without a terminal chunk.
    let _ = tx
        .send(AgentStreamMsg::Failed {
            message: GatewayError::TransportClosed.to_string(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
        .await;
}

/// Owns the outgoing event channel: announces the agents, drains them in
/// registration order, blends, and emits the terminal event.
struct StreamDriver<G> {
    gateway: Arc<G>,
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
    streams: Vec<(SpecializedAgent<G>, mpsc::Receiver<AgentStreamMsg>)>,
    config: ExecutionConfig,
    keys: HashMap<Provider, String>,
    history: Arc<Vec<Message>>,
    question: String,
    started: Instant,
}

impl<G: LlmGateway + 'static> StreamDriver<G> {
    async fn run(mut self) {
        // Every launch is announced before any content is delivered.
        let specs: Vec<_> = self
            .streams
            .iter()
            .map(|(agent, _)| agent.specialization())
            .collect();
        for spec in specs {
            if !self
                .emit(StreamEvent::AgentStart {
                    specialization: spec,
                    timestamp: epoch_millis(),
                })
                .await
            {
                return;
            }
        }

        let streams = std::mem::take(&mut self.streams);
        let mut results = Vec::with_capacity(streams.len());
        for (agent, mut rx) in streams {
            let spec = agent.specialization();
            let mut settled = false;
            while let Some(msg) = rx.recv().await {
                match msg {
                    AgentStreamMsg::Chunk { delta, content } => {
                        if !self
                            .emit(StreamEvent::AgentChunk {
                                specialization: spec,
                                delta,
                                content,
                                timestamp: epoch_millis(),
                            })
                            .await
                        {
                            return;
                        }
                    }
                    AgentStreamMsg::Done {
                        content,
                        usage,
                        finish_reason,
                        elapsed_ms,
                    } => {
                        let confidence =
                            confidence_score(spec, &content, Some(&finish_reason));
                        let metadata = agent.metadata(Some(finish_reason));
                        if !self
                            .emit(StreamEvent::AgentComplete {
                                specialization: spec,
                                content: content.clone(),
                                metadata: metadata.clone(),
                                timestamp: epoch_millis(),
                            })
                            .await
                        {
                            return;
                        }
                        results.push(AgentResult::new(
                            spec, content, confidence, elapsed_ms, usage, metadata,
                        ));
                        settled = true;
                        break;
                    }
                    AgentStreamMsg::Failed {
                        message,
                        elapsed_ms,
                    } => {
                        warn!(specialization = %spec, %message, "agent stream failed");
                        let result = AgentResult::failure(
                            spec,
                            &message,
                            elapsed_ms,
                            agent.metadata(None),
                        );
                        if !self
                            .emit(StreamEvent::AgentComplete {
                                specialization: spec,
                                content: result.content.clone(),
                                metadata: result.metadata.clone(),
                                timestamp: epoch_millis(),
                            })
                            .await
                        {
                            return;
                        }
                        results.push(result);
                        settled = true;
                        break;
                    }
                }
            }
            if !settled {
                // Producer vanished without settling (cancelled or panicked).
                results.push(AgentResult::failure(
                    spec,
                    "agent stream ended unexpectedly",
                    0,
                    agent.metadata(None),
                ));
            }
        }

        let successes: Vec<AgentResult> =
            results.into_iter().filter(|r| !r.is_error()).collect();

        let composite = if successes.is_empty() {
            if !self.config.fallback_to_single_agent {
                self.fail(TrinityError::AllAgentsFailed.to_string()).await;
                return;
            }
            match self.fallback().await {
                Ok(composite) => composite,
                Err(e) => {
                    self.fail(e.to_string()).await;
                    return;
                }
            }
        } else {
            debug!(successes = successes.len(), "streamed agents done, blending");
            let orchestrator = Orchestrator::new(
                self.config.orchestrator.clone(),
                Arc::clone(&self.gateway),
            );
            let api_key = self
                .keys
                .get(&self.config.orchestrator.provider)
                .cloned()
                .unwrap_or_default();
            match orchestrator
                .orchestrate(successes, &self.question, &api_key)
                .await
            {
                Ok(outcome) => compose(outcome, &self.config, self.started),
                Err(e) => {
                    self.fail(e.to_string()).await;
                    return;
                }
            }
        };

        // The blend itself is not incremental, so re-chunk the final text
        // to keep the consumer's rendering path uniform.
        let mut delivered = String::new();
        for delta in text_chunks(&composite.final_response) {
            delivered.push_str(&delta);
            if !self
                .emit(StreamEvent::OrchestratorChunk {
                    delta,
                    content: delivered.clone(),
                    timestamp: epoch_millis(),
                })
                .await
            {
                return;
            }
        }

        self.emit(StreamEvent::TrinityComplete {
            result: Box::new(composite),
            timestamp: epoch_millis(),
        })
        .await;
    }

    /// Send one event; on a dropped receiver, cancel the producers.
    async fn emit(&self, event: StreamEvent) -> bool {
        if self.tx.send(event).await.is_err() {
            debug!("event receiver dropped, cancelling stream");
            self.cancel.cancel();
            return false;
        }
        true
    }

    async fn fail(&self, message: String) {
        warn!(%message, "streaming execution failed");
        self.emit(StreamEvent::Error {
            message,
            timestamp: epoch_millis(),
        })
        .await;
    }

    /// Single-agent retry when every stream failed; not streamed itself.
    async fn fallback(&self) -> Result<CompositeResult, TrinityError> {
        let Some(chosen) = self.config.highest_weight_agent() else {
            return Err(TrinityError::NoEnabledAgents);
        };
        warn!(
            specialization = %chosen.specialization,
            "all agent streams failed, falling back to single agent"
        );

        let agent = SpecializedAgent::new(chosen.clone(), Arc::clone(&self.gateway));
        let api_key = self.keys.get(&chosen.provider).cloned().unwrap_or_default();
        let ctx = AgentContext::new(&api_key, &[]);
        let outcome = timeout(
            Duration::from_millis(self.config.timeout_ms),
            agent.invoke(&self.history, &ctx),
        )
        .await;

        let result = match outcome {
            Ok(result) if !result.is_error() => result,
            Ok(result) => return Err(TrinityError::FallbackExhausted(result.content)),
            Err(_elapsed) => {
                return Err(TrinityError::FallbackExhausted(format!(
                    "fallback agent timed out after {}ms",
                    self.config.timeout_ms
                )));
            }
        };

        let attribution = HashMap::from([(
            result.specialization,
            AgentAttribution::sole_contributor(PromptTemplate::fallback_insight()),
        )]);
        Ok(CompositeResult {
            final_response: result.content.clone(),
            meta: ExecutionMeta {
                blending_strategy: self.config.orchestrator.blending_strategy,
                execution_mode: self.config.mode,
                total_execution_time_ms: self.started.elapsed().as_millis() as u64,
                token_usage: result.token_usage,
            },
            agent_results: vec![result],
            attribution,
        })
    }
}

/// Split text into deltas of roughly [`CHUNK_WORDS`] words, preserving
/// whitespace so the concatenation reproduces the input exactly.
fn text_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut words = 0;
    for piece in text.split_inclusive(' ') {
        current.push_str(piece);
        words += 1;
        if words == CHUNK_WORDS {
            chunks.push(std::mem::take(&mut current));
            words = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use trinity_domain::{AgentConfig, AgentSpecialization, ExecutionMode};

    use crate::ports::llm_gateway::{ChunkEvent, LlmRequest, LlmResponse, StreamHandle};

    const ANALYTICAL_MODEL: &str = "model-analytical";
    const CREATIVE_MODEL: &str = "model-creative";
    const FACTUAL_MODEL: &str = "model-factual";
    const ORCHESTRATOR_MODEL: &str = "model-orchestrator";

    /// Gateway scripted per model: streaming deltas for agents, plain
    /// replies for the orchestrator and the fallback path.
    struct ScriptedStreamGateway {
        deltas: Mutex<HashMap<String, Vec<String>>>,
        broken_streams: Mutex<HashSet<String>>,
        replies: Mutex<HashMap<String, String>>,
    }

    impl ScriptedStreamGateway {
        fn new() -> Self {
            Self {
                deltas: Mutex::new(HashMap::new()),
                broken_streams: Mutex::new(HashSet::new()),
                replies: Mutex::new(HashMap::new()),
            }
        }

        fn streaming(self, model: &str, deltas: &[&str]) -> Self {
            self.deltas.lock().unwrap().insert(
                model.to_string(),
                deltas.iter().map(|d| d.to_string()).collect(),
            );
            self
        }

        fn broken(self, model: &str) -> Self {
            self.broken_streams
                .lock()
                .unwrap()
                .insert(model.to_string());
            self
        }

        fn replying(self, model: &str, content: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(model.to_string(), content.to_string());
            self
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedStreamGateway {
        async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, GatewayError> {
            match self.replies.lock().unwrap().get(&request.model) {
                Some(content) => Ok(LlmResponse {
                    content: content.clone(),
                    usage: TokenUsage::new(10, 20),
                    finish_reason: FinishReason::Stop,
                }),
                None => Err(GatewayError::RequestFailed(format!(
                    "no scripted reply for {}",
                    request.model
                ))),
            }
        }

        async fn invoke_streaming(
            &self,
            request: LlmRequest,
        ) -> Result<StreamHandle, GatewayError> {
            if self.broken_streams.lock().unwrap().contains(&request.model) {
                // Channel closes without ever producing a terminal chunk.
                let (tx, rx) = mpsc::channel::<ChunkEvent>(1);
                drop(tx);
                return Ok(StreamHandle::new(rx));
            }

            let deltas = self
                .deltas
                .lock()
                .unwrap()
                .get(&request.model)
                .cloned()
                .unwrap_or_default();
            let (tx, rx) = mpsc::channel(deltas.len() + 1);
            let mut content = String::new();
            for (i, delta) in deltas.iter().enumerate() {
                content.push_str(delta);
                let is_last = i + 1 == deltas.len();
                let _ = tx
                    .send(ChunkEvent {
                        delta: delta.clone(),
                        content: content.clone(),
                        is_complete: is_last,
                        usage: is_last.then(|| TokenUsage::new(10, 20)),
                        finish_reason: is_last.then_some(FinishReason::Stop),
                    })
                    .await;
            }
            Ok(StreamHandle::new(rx))
        }
    }

    struct StaticCredentials;

    #[async_trait]
    impl CredentialStore for StaticCredentials {
        async fn resolve(
            &self,
            _user_id: &str,
            _provider: &Provider,
        ) -> Result<Option<String>, crate::ports::credentials::CredentialError> {
            Ok(Some("test-key".to_string()))
        }
    }

    fn test_config() -> ExecutionConfig {
        let mut config = ExecutionConfig::default().with_mode(ExecutionMode::Parallel);
        for (spec, model) in [
            (AgentSpecialization::Analytical, ANALYTICAL_MODEL),
            (AgentSpecialization::Creative, CREATIVE_MODEL),
            (AgentSpecialization::Factual, FACTUAL_MODEL),
        ] {
            config = config.with_agent(
                AgentConfig::default_for(spec)
                    .with_model(model)
                    .with_provider(Provider::OpenAi),
            );
        }
        config.orchestrator.model = ORCHESTRATOR_MODEL.to_string();
        config.orchestrator.provider = Provider::OpenAi;
        config
    }

    fn input() -> RunTrinityInput {
        RunTrinityInput::new(
            vec![Message::user("What is the answer?")],
            test_config(),
            "user-1",
        )
    }

    async fn collect(
        mut rx: mpsc::Receiver<StreamEvent>,
    ) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }

    fn use_case(
        gateway: ScriptedStreamGateway,
    ) -> StreamTrinityUseCase<ScriptedStreamGateway> {
        StreamTrinityUseCase::new(Arc::new(gateway), Arc::new(StaticCredentials))
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_arrive_in_registration_order() {
        let gateway = ScriptedStreamGateway::new()
            .streaming(ANALYTICAL_MODEL, &["the analysis ", "shows a clear pattern"])
            .streaming(CREATIVE_MODEL, &["imagine a vivid ", "unexpected framing"])
            .streaming(FACTUAL_MODEL, &["according to research, ", "the data agrees"])
            .replying(ORCHESTRATOR_MODEL, "the blended answer");

        let rx = use_case(gateway).execute(input()).await.unwrap();
        let events = collect(rx).await;

        // three starts first, in registration order
        let starts: Vec<_> = events[..3]
            .iter()
            .map(|e| e.specialization().unwrap())
            .collect();
        assert_eq!(
            starts,
            vec![
                AgentSpecialization::Analytical,
                AgentSpecialization::Creative,
                AgentSpecialization::Factual
            ]
        );
        assert!(events[..3]
            .iter()
            .all(|e| matches!(e, StreamEvent::AgentStart { .. })));

        // per-agent chunks never interleave: every content event belongs
        // to the first agent that has not completed yet
        let order = [
            AgentSpecialization::Analytical,
            AgentSpecialization::Creative,
            AgentSpecialization::Factual,
        ];
        let mut completed = 0;
        for event in &events[3..] {
            match event {
                StreamEvent::AgentChunk { specialization, .. } => {
                    assert_eq!(*specialization, order[completed]);
                }
                StreamEvent::AgentComplete { specialization, .. } => {
                    assert_eq!(*specialization, order[completed]);
                    completed += 1;
                }
                _ => break,
            }
        }
        assert_eq!(completed, 3);

        // orchestrator output follows, then exactly one terminal event
        let orchestrator_chunks: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::OrchestratorChunk { delta, .. } => Some(delta.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(orchestrator_chunks.concat(), "the blended answer");
        assert!(matches!(
            events.last(),
            Some(StreamEvent::TrinityComplete { .. })
        ));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_agent_chunks_accumulate_content() {
        let gateway = ScriptedStreamGateway::new()
            .streaming(ANALYTICAL_MODEL, &["hel", "lo ", "world"])
            .streaming(CREATIVE_MODEL, &["done"])
            .streaming(FACTUAL_MODEL, &["done"])
            .replying(ORCHESTRATOR_MODEL, "blend");

        let rx = use_case(gateway).execute(input()).await.unwrap();
        let events = collect(rx).await;

        let analytical_chunks: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::AgentChunk {
                    specialization: AgentSpecialization::Analytical,
                    delta,
                    content,
                    ..
                } => Some((delta.clone(), content.clone())),
                _ => None,
            })
            .collect();
        // the terminal chunk becomes AgentComplete, not AgentChunk
        assert_eq!(
            analytical_chunks,
            vec![
                ("hel".to_string(), "hel".to_string()),
                ("lo ".to_string(), "hello ".to_string()),
            ]
        );
        let complete = events.iter().find_map(|e| match e {
            StreamEvent::AgentComplete {
                specialization: AgentSpecialization::Analytical,
                content,
                ..
            } => Some(content.clone()),
            _ => None,
        });
        assert_eq!(complete.as_deref(), Some("hello world"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_broken_stream_yields_error_shaped_completion() {
        let gateway = ScriptedStreamGateway::new()
            .broken(ANALYTICAL_MODEL)
            .streaming(CREATIVE_MODEL, &["a creative and vivid framing of it"])
            .streaming(FACTUAL_MODEL, &["according to research, the data agrees"])
            .replying(ORCHESTRATOR_MODEL, "blend of two");

        let rx = use_case(gateway).execute(input()).await.unwrap();
        let events = collect(rx).await;

        let analytical_complete = events.iter().find_map(|e| match e {
            StreamEvent::AgentComplete {
                specialization: AgentSpecialization::Analytical,
                content,
                ..
            } => Some(content.clone()),
            _ => None,
        });
        assert!(analytical_complete.unwrap().starts_with("Error:"));

        let Some(StreamEvent::TrinityComplete { result, .. }) = events.last() else {
            panic!("expected TrinityComplete");
        };
        assert_eq!(result.agent_results.len(), 2);
        assert_eq!(result.final_response, "blend of two");
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_streams_fail_falls_back_to_single_agent() {
        // Streams all break; the non-streaming fallback retry succeeds.
        let gateway = ScriptedStreamGateway::new()
            .broken(ANALYTICAL_MODEL)
            .broken(CREATIVE_MODEL)
            .broken(FACTUAL_MODEL)
            .replying(ANALYTICAL_MODEL, "the fallback answer, analysis included");

        let rx = use_case(gateway).execute(input()).await.unwrap();
        let events = collect(rx).await;

        let Some(StreamEvent::TrinityComplete { result, .. }) = events.last() else {
            panic!("expected TrinityComplete");
        };
        assert_eq!(result.agent_results.len(), 1);
        assert_eq!(
            result.agent_results[0].specialization,
            AgentSpecialization::Analytical
        );
        assert_eq!(
            result.attribution[&AgentSpecialization::Analytical].contribution_percentage,
            1.0
        );
        // the fallback text was still delivered incrementally
        assert!(events
            .iter()
            .any(|e| matches!(e, StreamEvent::OrchestratorChunk { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_streams_fail_without_fallback_emits_error() {
        let gateway = ScriptedStreamGateway::new()
            .broken(ANALYTICAL_MODEL)
            .broken(CREATIVE_MODEL)
            .broken(FACTUAL_MODEL);

        let mut run_input = input();
        run_input.config.fallback_to_single_agent = false;

        let rx = use_case(gateway).execute(run_input).await.unwrap();
        let events = collect(rx).await;

        assert!(matches!(events.last(), Some(StreamEvent::Error { .. })));
        // every agent still settled visibly before the terminal error
        let completions = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::AgentComplete { .. }))
            .count();
        assert_eq!(completions, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_precondition_failure_returns_before_any_event() {
        struct NoCredentials;

        #[async_trait]
        impl CredentialStore for NoCredentials {
            async fn resolve(
                &self,
                _user_id: &str,
                _provider: &Provider,
            ) -> Result<Option<String>, crate::ports::credentials::CredentialError>
            {
                Ok(None)
            }
        }

        let use_case = StreamTrinityUseCase::new(
            Arc::new(ScriptedStreamGateway::new()),
            Arc::new(NoCredentials),
        );
        let error = use_case.execute(input()).await.unwrap_err();
        assert!(matches!(error, TrinityError::MissingCredential(_)));
    }

    #[test]
    fn test_text_chunks_reassemble_exactly() {
        let text = "one two three four five six seven eight nine ten \
                    eleven twelve thirteen fourteen";
        let chunks = text_chunks(text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_text_chunks_empty_input() {
        assert!(text_chunks("").is_empty());
    }
}
