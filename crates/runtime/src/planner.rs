//! Off-thread path planning.
//!
//! A grid search can take several frames on large maps, so each request runs
//! on its own short-lived OS thread. The thread only owns a snapshot of its
//! inputs and reports back through a oneshot channel; the controller polls
//! that channel once per tick and is the only party that touches its path.
use std::collections::HashSet;
use std::sync::Arc;

use nav_core::{ActorId, EndOfPathAction, Layer, MovementMode, TilePosition, TilemapOracle};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::api::{Result, RuntimeError};
use crate::scheduling::CancellationScope;

/// Everything a planning request needs, captured when the command arrives.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub actor: ActorId,
    pub from: TilePosition,
    pub to: TilePosition,
    pub layer: Layer,
    pub obstacles: HashSet<TilePosition>,
    pub mode: MovementMode,
    pub end_of_path_action: EndOfPathAction,
    /// Walk straight to the destination when no route exists.
    pub fallback_to_direct: bool,
    /// Animation to play instead of the mode's locomotion action.
    pub action: Option<String>,
    pub scope: CancellationScope,
}

/// Result of polling a [`PendingPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanPoll {
    Pending,
    Found(Vec<TilePosition>),
    NotFound,
}

/// A planning request whose worker thread may still be running.
#[derive(Debug)]
pub struct PendingPlan {
    request: PlanRequest,
    result_rx: oneshot::Receiver<Vec<TilePosition>>,
}

impl PendingPlan {
    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    /// Non-blocking check for the worker's result.
    ///
    /// A worker that died without reporting counts as "no path".
    pub fn poll(&mut self) -> PlanPoll {
        match self.result_rx.try_recv() {
            Ok(tiles) if tiles.is_empty() => PlanPoll::NotFound,
            Ok(tiles) => PlanPoll::Found(tiles),
            Err(TryRecvError::Empty) => PlanPoll::Pending,
            Err(TryRecvError::Closed) => {
                tracing::warn!(actor = %self.request.actor, "path planner exited without a result");
                PlanPoll::NotFound
            }
        }
    }

    pub fn into_request(self) -> PlanRequest {
        self.request
    }
}

/// Spawns planning threads against a shared tilemap.
#[derive(Clone)]
pub struct PathPlanner {
    tilemap: Arc<dyn TilemapOracle>,
}

impl PathPlanner {
    pub fn new(tilemap: Arc<dyn TilemapOracle>) -> Self {
        Self { tilemap }
    }

    pub fn spawn(&self, request: PlanRequest) -> Result<PendingPlan> {
        let (result_tx, result_rx) = oneshot::channel();
        let tilemap = Arc::clone(&self.tilemap);
        let (from, to, layer) = (request.from, request.to, request.layer);
        let obstacles = request.obstacles.clone();

        std::thread::Builder::new()
            .name(format!("nav-planner-{}", request.actor.0))
            .spawn(move || {
                let tiles = tilemap.find_path(from, to, layer, &obstacles);
                // The controller may have dropped the request in the meantime.
                let _ = result_tx.send(tiles);
            })
            .map_err(RuntimeError::PlannerSpawn)?;

        tracing::debug!(actor = %request.actor, %from, %to, %layer, "path planning started");
        Ok(PendingPlan { request, result_rx })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::oracle::{GridLayer, GridTilemap};

    fn request(to: TilePosition, scope: &CancellationScope) -> PlanRequest {
        PlanRequest {
            actor: ActorId(7),
            from: TilePosition::new(0, 0),
            to,
            layer: Layer::GROUND,
            obstacles: HashSet::new(),
            mode: MovementMode::Walk,
            end_of_path_action: EndOfPathAction::Idle,
            fallback_to_direct: false,
            action: None,
            scope: scope.clone(),
        }
    }

    fn wait_for(pending: &mut PendingPlan) -> PlanPoll {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match pending.poll() {
                PlanPoll::Pending if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(1));
                }
                outcome => return outcome,
            }
        }
    }

    #[test]
    fn planner_thread_reports_route() {
        let planner = PathPlanner::new(Arc::new(GridTilemap::flat(6, 1)));
        let scope = CancellationScope::new();

        let mut pending = planner
            .spawn(request(TilePosition::new(3, 0), &scope))
            .expect("spawn planner");

        let expected = (1..=3).map(|x| TilePosition::new(x, 0)).collect();
        assert_eq!(wait_for(&mut pending), PlanPoll::Found(expected));
        assert_eq!(pending.request().to, TilePosition::new(3, 0));
    }

    #[test]
    fn unreachable_goal_is_not_found() {
        let layer = GridLayer::flat(3, 1, 0.0).with_obstacle(TilePosition::new(1, 0));
        let planner = PathPlanner::new(Arc::new(GridTilemap::new(vec![layer])));
        let scope = CancellationScope::new();

        let mut pending = planner
            .spawn(request(TilePosition::new(2, 0), &scope))
            .expect("spawn planner");

        assert_eq!(wait_for(&mut pending), PlanPoll::NotFound);
    }
}
