//! Hunter tactics: advisory target suggestions from an external provider
//!
//! The provider is polled on a fixed tick cadence and answers out of band.
//! Replies land in a single-consumer inbox that the simulation drains at
//! the top of each tick, so all entity mutation stays on the tick owner.
//! Replies are stamped with the round nonce; anything from a previous
//! round is discarded on arrival.

use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::error::{GameError, Result};
use crate::core::types::{tile_origin, EntityId, Tick, Vec2, MAP_HEIGHT, MAP_WIDTH};
use crate::entity::Entity;
use crate::llm::client::LlmClient;

/// Snapshot handed to the provider: everything in grid coordinates
#[derive(Debug, Clone)]
pub struct TacticsRequest {
    pub player: (i32, i32),
    pub hunters: Vec<(EntityId, (i32, i32))>,
}

/// Suggested target tile per hunter. May cover any subset of hunters.
pub type TacticsPlan = AHashMap<EntityId, (i32, i32)>;

/// External advisor suggesting hunter destinations
///
/// Advisory only: failures are swallowed by the caller and an empty plan
/// is always acceptable.
#[async_trait]
pub trait TacticsProvider: Send + Sync {
    async fn suggest_targets(&self, request: TacticsRequest) -> Result<TacticsPlan>;
}

const TACTICS_SYSTEM_PROMPT: &str = "\
You are the coordinator for a team of hunters in a tile-based tag game on \
a 40x40 grid. Your goal is to surround and catch the runner. Given the \
runner's grid position and each hunter's grid position, assign every \
hunter a target grid coordinate. Mix strategies: some hunters chase \
directly, some cut off the runner's likely path, some guard the center or \
corners when the runner is far. Respond with only a JSON object mapping \
hunter id to {\"x\": <0-39>, \"y\": <0-39>}.";

/// LLM-backed tactics provider
pub struct LlmTactics {
    client: LlmClient,
}

impl LlmTactics {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TacticsProvider for LlmTactics {
    async fn suggest_targets(&self, request: TacticsRequest) -> Result<TacticsPlan> {
        let user = serde_json::json!({
            "runner": { "x": request.player.0, "y": request.player.1 },
            "hunters": request.hunters.iter().map(|(id, (x, y))| {
                serde_json::json!({ "id": id.to_string(), "x": x, "y": y })
            }).collect::<Vec<_>>(),
        })
        .to_string();

        let text = self.client.complete(TACTICS_SYSTEM_PROMPT, &user).await?;
        parse_plan(&text)
    }
}

#[derive(Deserialize)]
struct GridPoint {
    x: i32,
    y: i32,
}

/// Parse the provider's JSON reply into a plan.
///
/// Tolerates markdown code fences and skips malformed ids and
/// out-of-range coordinates instead of failing the whole plan.
pub fn parse_plan(text: &str) -> Result<TacticsPlan> {
    let body = strip_code_fence(text);
    let raw: AHashMap<String, GridPoint> = serde_json::from_str(body)
        .map_err(|e| GameError::Provider(format!("malformed tactics reply: {e}")))?;

    let mut plan = TacticsPlan::default();
    for (key, point) in raw {
        let Ok(uuid) = key.parse::<uuid::Uuid>() else {
            tracing::debug!(id = %key, "skipping unparseable hunter id in tactics reply");
            continue;
        };
        if (0..MAP_WIDTH).contains(&point.x) && (0..MAP_HEIGHT).contains(&point.y) {
            plan.insert(EntityId(uuid), (point.x, point.y));
        }
    }
    Ok(plan)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end_matches('`').trim()
}

/// A tactics reply in flight, stamped with the round it was computed for
#[derive(Debug)]
pub struct TacticsEnvelope {
    pub round: u64,
    pub outcome: Result<TacticsPlan>,
}

/// Connects a session to its tactics provider.
///
/// Owns the request cadence, the reply inbox, and the quota backoff
/// window. All methods run on the simulation thread; only the spawned
/// request tasks live elsewhere, and they communicate exclusively through
/// the channel.
pub struct TacticsLink {
    provider: Option<Arc<dyn TacticsProvider>>,
    tx: UnboundedSender<TacticsEnvelope>,
    rx: UnboundedReceiver<TacticsEnvelope>,
    backoff_until: Option<Instant>,
    last_dispatch: Option<Tick>,
}

impl TacticsLink {
    pub fn with_provider(provider: Arc<dyn TacticsProvider>) -> Self {
        Self::build(Some(provider))
    }

    /// A link with no provider: dispatch is a no-op, drain sees nothing
    pub fn disconnected() -> Self {
        Self::build(None)
    }

    fn build(provider: Option<Arc<dyn TacticsProvider>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            tx,
            rx,
            backoff_until: None,
            last_dispatch: None,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Forget the poll cadence at round start. The backoff window is kept:
    /// quota exhaustion outlives any single round.
    pub fn reset_round(&mut self) {
        self.last_dispatch = None;
    }

    fn in_backoff(&self) -> bool {
        self.backoff_until.is_some_and(|until| Instant::now() < until)
    }

    /// Fire a tactics request if the cadence allows it.
    ///
    /// Never blocks: the request runs on a spawned task and answers
    /// through the inbox. Skipped entirely while the backoff window is
    /// armed.
    pub fn maybe_dispatch(
        &mut self,
        round: u64,
        tick: Tick,
        poll_ticks: u64,
        player_pos: Vec2,
        entities: &[Entity],
    ) {
        let Some(provider) = self.provider.clone() else {
            return;
        };
        if self.in_backoff() {
            return;
        }
        if let Some(last) = self.last_dispatch {
            if tick.saturating_sub(last) < poll_ticks {
                return;
            }
        }
        self.last_dispatch = Some(tick);

        let request = TacticsRequest {
            player: player_pos.tile(),
            hunters: entities
                .iter()
                .filter(|e| e.is_hunter())
                .map(|e| (e.id, e.position.tile()))
                .collect(),
        };

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = provider.suggest_targets(request).await;
            // The receiver may be gone after session teardown
            let _ = tx.send(TacticsEnvelope { round, outcome });
        });
    }

    /// Drain every pending reply into hunter patrol targets.
    ///
    /// Apply-by-id: a suggestion for a hunter that no longer exists is a
    /// no-op, and a reply stamped with a stale round nonce is dropped
    /// whole. Quota errors arm the backoff window.
    pub fn drain(
        &mut self,
        round: u64,
        backoff: std::time::Duration,
        entities: &mut [Entity],
    ) {
        while let Ok(envelope) = self.rx.try_recv() {
            if envelope.round != round {
                tracing::debug!(
                    got = envelope.round,
                    current = round,
                    "discarding tactics reply from a previous round"
                );
                continue;
            }
            match envelope.outcome {
                Ok(plan) => apply_plan(&plan, entities),
                Err(GameError::RateLimited) => {
                    tracing::warn!(
                        "tactics provider quota exceeded, backing off {:?}",
                        backoff
                    );
                    self.backoff_until = Some(Instant::now() + backoff);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "tactics request failed, no suggestions this cycle");
                }
            }
        }
    }
}

fn apply_plan(plan: &TacticsPlan, entities: &mut [Entity]) {
    for entity in entities.iter_mut() {
        let Some(&(tx, ty)) = plan.get(&entity.id) else {
            continue;
        };
        if let Some(hunter) = entity.hunter_state_mut() {
            hunter.target = Some(tile_origin(tx, ty));
        }
    }
}
