//! Combat session registry
//!
//! One owning store maps `CombatId -> session`. Each session sits behind
//! its own mutex, so independent combats resolve in parallel while rounds
//! inside one combat stay strictly sequential.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ai::personality::{load_personality_from, AiPersonality, PERSONALITY_DIR};
use crate::ai::strategy::{AIStrategy, AdaptiveStrategy, DecisionContext, NullStrategy};
use crate::ai::EnemyMind;
use crate::combat::combatant::CombatantType;
use crate::combat::constants::FALLBACK_MOVE_NAME;
use crate::combat::move_type::MoveType;
use crate::combat::moves::{standard_library, CombatMove, MoveCost, MoveLibrary};
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{CombatId, CombatantId, Round};
use crate::environment::state::{Environment, InteractionOutcome};
use crate::environment::tags::EnvironmentTag;
use crate::resolution::dice::{RollSource, SeededDice};
use crate::resolution::engine::CombatSystem;
use crate::resolution::result::RoundResult;
use crate::session::snapshot::CombatantSnapshot;
use crate::session::state::{CombatSession, CombatStatus, LogKind};
use crate::status::system::ApplicationResult;

/// Everything needed to open a combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatSetup {
    pub player: CombatantSnapshot,
    pub enemies: Vec<CombatantSnapshot>,
    #[serde(default)]
    pub allies: Vec<CombatantSnapshot>,
    #[serde(default)]
    pub objects: Vec<CombatantSnapshot>,
    #[serde(default)]
    pub tags: Vec<EnvironmentTag>,
    /// Overrides the configured seed
    #[serde(default)]
    pub seed: Option<u64>,
}

impl CombatSetup {
    pub fn duel(player: CombatantSnapshot, enemy: CombatantSnapshot) -> Self {
        Self {
            player,
            enemies: vec![enemy],
            allies: Vec::new(),
            objects: Vec::new(),
            tags: Vec::new(),
            seed: None,
        }
    }

    pub fn with_tags(mut self, tags: &[EnvironmentTag]) -> Self {
        self.tags = tags.to_vec();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// The player's choice for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub move_name: String,
    #[serde(default)]
    pub target: Option<CombatantId>,
    /// Environment interaction used before the exchange
    #[serde(default)]
    pub interaction: Option<String>,
    /// All-out: the roll is perturbed
    #[serde(default)]
    pub desperate: bool,
    /// Careful: low dice are nudged up
    #[serde(default)]
    pub calculated: bool,
}

impl PlayerAction {
    pub fn new(move_name: impl Into<String>) -> Self {
        Self {
            move_name: move_name.into(),
            target: None,
            interaction: None,
            desperate: false,
            calculated: false,
        }
    }

    pub fn at(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_interaction(mut self, name: impl Into<String>) -> Self {
        self.interaction = Some(name.into());
        self
    }

    pub fn desperate(mut self) -> Self {
        self.desperate = true;
        self
    }

    pub fn calculated(mut self) -> Self {
        self.calculated = true;
        self
    }

    /// Carry over the per-use flags of an already chosen move
    pub fn with_flags_of(mut self, combat_move: &CombatMove) -> Self {
        self.desperate = combat_move.desperate;
        self.calculated = combat_move.calculated;
        self
    }
}

/// What `end_combat` hands back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalState {
    pub id: CombatId,
    pub status: CombatStatus,
    /// Rounds actually resolved
    pub rounds: Round,
    pub survivors: Vec<String>,
    pub session: CombatSession,
}

struct ActiveCombat {
    session: CombatSession,
    dice: Box<dyn RollSource>,
}

pub struct CombatRegistry {
    system: CombatSystem,
    strategy: Box<dyn AIStrategy>,
    library: MoveLibrary,
    personality_dir: PathBuf,
    sessions: RwLock<AHashMap<CombatId, Arc<Mutex<ActiveCombat>>>>,
}

impl Default for CombatRegistry {
    fn default() -> Self {
        Self::with_system(CombatSystem::default())
    }
}

impl CombatRegistry {
    /// Fails with `InvalidConfig` when the config does not validate
    pub fn new(config: CombatConfig) -> Result<Self> {
        Ok(Self::with_system(CombatSystem::new(config)?))
    }

    fn with_system(system: CombatSystem) -> Self {
        let config = system.config();
        let strategy: Box<dyn AIStrategy> = if config.adaptive_ai {
            Box::new(AdaptiveStrategy::new(config.clone()))
        } else {
            Box::new(NullStrategy)
        };
        Self {
            system,
            strategy,
            library: standard_library().clone(),
            personality_dir: PathBuf::from(PERSONALITY_DIR),
            sessions: RwLock::new(AHashMap::new()),
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn AIStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_library(mut self, library: MoveLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn with_personality_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.personality_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn config(&self) -> &CombatConfig {
        self.system.config()
    }

    pub fn library(&self) -> &MoveLibrary {
        &self.library
    }

    pub fn strategy(&self) -> &dyn AIStrategy {
        self.strategy.as_ref()
    }

    /// Number of combats currently held
    pub fn len(&self) -> usize {
        self.sessions.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a one-on-one combat
    pub fn start_combat(
        &self,
        player: CombatantSnapshot,
        enemy: CombatantSnapshot,
        tags: &[EnvironmentTag],
    ) -> Result<CombatId> {
        self.start_combat_with(CombatSetup::duel(player, enemy).with_tags(tags))
    }

    /// Open a combat with seeded dice
    pub fn start_combat_with(&self, setup: CombatSetup) -> Result<CombatId> {
        let seed = setup.seed.or(self.config().seed);
        let dice = match seed {
            Some(seed) => SeededDice::new(seed),
            None => SeededDice::from_entropy(),
        };
        let seed = dice.seed();
        self.start_combat_with_dice(setup, Box::new(dice), seed)
    }

    /// Open a combat with caller-supplied dice (scripted replays, tests)
    pub fn start_combat_with_dice(
        &self,
        setup: CombatSetup,
        mut dice: Box<dyn RollSource>,
        seed: u64,
    ) -> Result<CombatId> {
        if setup.enemies.is_empty() {
            return Err(CombatError::InvalidConfig("a combat needs at least one enemy".into()));
        }

        let mut combatants = Vec::new();
        let mut personalities = Vec::new();

        let mut player = setup.player.to_combatant(&self.library);
        player.kind = CombatantType::Player;
        combatants.push(player);

        for snapshot in &setup.enemies {
            let mut enemy = snapshot.to_combatant(&self.library);
            enemy.kind = CombatantType::Enemy;
            personalities.push((enemy.id, self.personality_for(snapshot)));
            combatants.push(enemy);
        }
        for snapshot in &setup.allies {
            let mut ally = snapshot.to_combatant(&self.library);
            ally.kind = CombatantType::Ally;
            combatants.push(ally);
        }
        for snapshot in &setup.objects {
            let mut object = snapshot.to_combatant(&self.library);
            object.kind = CombatantType::Object;
            combatants.push(object);
        }

        let id = CombatId::new();
        let mut session = CombatSession::new(id, combatants, Environment::new(setup.tags.iter().copied()), seed);
        let memory_size = self.config().memory_size;
        session.minds = personalities
            .into_iter()
            .map(|(combatant, personality)| EnemyMind::new(combatant, personality, memory_size))
            .collect();

        let names: Vec<String> = session.combatants.iter().map(|c| c.name.clone()).collect();
        session.push_log(LogKind::Start, format!("Combat begins: {}", names.join(", ")));
        self.plan_enemy_moves(&mut session, dice.as_mut());

        tracing::info!(
            combat = %id,
            seed,
            combatants = session.combatants.len(),
            tags = ?setup.tags,
            "combat started"
        );

        let mut sessions = self.sessions.write().map_err(|_| CombatError::StatePoisoned)?;
        sessions.insert(id, Arc::new(Mutex::new(ActiveCombat { session, dice })));
        Ok(id)
    }

    fn personality_for(&self, snapshot: &CombatantSnapshot) -> AiPersonality {
        let Some(name) = snapshot.personality.as_deref() else {
            return AiPersonality::default();
        };
        match load_personality_from(&self.personality_dir, name) {
            Ok(personality) => personality,
            Err(e) => {
                tracing::warn!(personality = name, error = %e, "falling back to default personality");
                AiPersonality::default()
            }
        }
    }

    fn entry(&self, id: CombatId) -> Result<Arc<Mutex<ActiveCombat>>> {
        let sessions = self.sessions.read().map_err(|_| CombatError::StatePoisoned)?;
        sessions.get(&id).cloned().ok_or(CombatError::CombatNotFound(id))
    }

    /// Snapshot of a combat's current state
    pub fn get_state(&self, id: CombatId) -> Result<CombatSession> {
        let entry = self.entry(id)?;
        let guard = entry.lock().map_err(|_| CombatError::StatePoisoned)?;
        Ok(guard.session.clone())
    }

    /// Resolve one round: the player's move against the target's planned move
    ///
    /// Caller errors (unknown combat, finished combat, unknown move, bad
    /// target, unaffordable move, unavailable interaction) leave the session
    /// untouched.
    pub fn submit_action(&self, id: CombatId, action: PlayerAction) -> Result<RoundResult> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| CombatError::StatePoisoned)?;
        let ActiveCombat { session, dice } = &mut *guard;

        if !session.is_active() {
            return Err(CombatError::CombatAlreadyResolved(id));
        }
        let player = session
            .player()
            .ok_or(CombatError::CombatAlreadyResolved(id))?
            .clone();
        if player.is_defeated() {
            return Err(CombatError::CombatAlreadyResolved(id));
        }

        let mut player_move = match player.find_move(&action.move_name) {
            Some(m) => m.fresh(),
            None if action.move_name.trim().eq_ignore_ascii_case(FALLBACK_MOVE_NAME) => CombatMove::struggle(),
            None => {
                return Err(CombatError::UnknownMove {
                    combatant: player.name.clone(),
                    move_name: action.move_name.clone(),
                })
            }
        };
        if action.desperate {
            player_move = player_move.desperate();
        }
        if action.calculated {
            player_move = player_move.calculated();
        }

        let target_id = action
            .target
            .or(player_move.target)
            .or_else(|| session.first_standing_enemy())
            .ok_or(CombatError::CombatAlreadyResolved(id))?;
        let target = session
            .combatant(target_id)
            .filter(|t| matches!(t.kind, CombatantType::Enemy | CombatantType::Object))
            .ok_or(CombatError::InvalidTarget { combat: id, target: target_id })?;
        if target.is_defeated() {
            return Err(CombatError::InvalidTarget { combat: id, target: target_id });
        }

        if !player.can_afford(&player_move.cost) {
            return Err(CombatError::InsufficientResources {
                combatant: player.name.clone(),
                move_name: player_move.name.clone(),
            });
        }

        // Last fallible step before the round starts mutating
        let interaction = match action.interaction.as_deref() {
            Some(name) => {
                let outcome = session.environment.use_interaction(name, &player)?;
                session.push_log(LogKind::Interaction, outcome.hook.clone());
                Some(outcome)
            }
            None => None,
        };

        let target_move = self.target_move(session, target_id, dice.as_mut());

        let mut result = self.system.resolve(
            session,
            player.id,
            &player_move,
            target_id,
            &target_move,
            dice.as_mut(),
        )?;

        if let Some(outcome) = &interaction {
            self.area_strike(session, outcome, &mut result);
        }
        result.interaction = interaction;

        // End of round
        result.tick = self.system.tick_statuses(session);
        session.environment.tick();
        for defeated in result.tick.defeated() {
            let name = session.combatant(defeated).map(|c| c.name.clone()).unwrap_or_default();
            session.push_log(LogKind::Defeat, format!("{} succumbs", name));
        }
        result.outcome = session.refresh_status();
        result.actor_defeated = session.combatant(player.id).is_some_and(|c| c.is_defeated());
        result.target_defeated = session.combatant(target_id).is_some_and(|c| c.is_defeated());

        for mind in session.minds.iter_mut() {
            mind.memory.record(player_move.move_type);
            if result.success && mind.combatant == target_id {
                mind.memory.record_defeat_by(player_move.move_type);
            }
        }
        session.player_last_move = Some(player_move.move_type);

        if session.is_active() {
            self.plan_enemy_moves(session, dice.as_mut());
        } else {
            tracing::info!(combat = %id, outcome = ?session.status, rounds = session.round, "combat decided");
            session.push_log(LogKind::End, format!("Combat ends: {:?}", session.status));
        }

        session.round += 1;
        Ok(result)
    }

    /// Close a combat and drop it from the registry
    pub fn end_combat(&self, id: CombatId) -> Result<FinalState> {
        let entry = {
            let mut sessions = self.sessions.write().map_err(|_| CombatError::StatePoisoned)?;
            sessions.remove(&id).ok_or(CombatError::CombatNotFound(id))?
        };
        let mut guard = entry.lock().map_err(|_| CombatError::StatePoisoned)?;
        let session = &mut guard.session;

        if session.status == CombatStatus::Active {
            session.status = CombatStatus::Neutral;
            session.push_log(LogKind::End, "Combat ends without a decision");
        }
        tracing::info!(combat = %id, status = ?session.status, "combat ended");

        Ok(FinalState {
            id,
            status: session.status,
            rounds: session.round.saturating_sub(1),
            survivors: session
                .combatants
                .iter()
                .filter(|c| !c.is_defeated())
                .map(|c| c.name.clone())
                .collect(),
            session: session.clone(),
        })
    }

    /// Planned move of the target, re-chosen if it can no longer be paid for
    fn target_move(&self, session: &CombatSession, target: CombatantId, dice: &mut dyn RollSource) -> CombatMove {
        let planned = session.mind(target).and_then(|m| m.planned.clone());
        let affordable = |m: &CombatMove| session.combatant(target).is_some_and(|c| c.can_afford(&m.cost));
        match planned {
            Some(m) if affordable(&m) => m,
            Some(_) => self.choose_for(session, target, dice).unwrap_or_else(CombatMove::struggle),
            None => match session.combatant(target) {
                // Enemies without a mind and objects just weather the blow
                Some(c) if c.kind == CombatantType::Enemy => {
                    self.choose_for(session, target, dice).unwrap_or_else(CombatMove::struggle)
                }
                _ => CombatMove::new("Stand Fast", MoveType::Utility, &[], MoveCost::free()),
            },
        }
    }

    fn choose_for(&self, session: &CombatSession, enemy: CombatantId, dice: &mut dyn RollSource) -> Option<CombatMove> {
        let enemy_c = session.combatant(enemy)?;
        let player = session.player()?;
        let default_mind;
        let mind = match session.mind(enemy) {
            Some(m) => m,
            None => {
                default_mind = EnemyMind::new(enemy, AiPersonality::default(), self.config().memory_size);
                &default_mind
            }
        };
        let context = DecisionContext {
            enemy: enemy_c,
            player,
            player_last_move: session.player_last_move,
            memory: &mind.memory,
            personality: &mind.personality,
        };
        Some(self.strategy.choose_move(&context, dice).combat_move)
    }

    fn plan_enemy_moves(&self, session: &mut CombatSession, dice: &mut dyn RollSource) {
        for i in 0..session.minds.len() {
            let enemy = session.minds[i].combatant;
            let standing = session.combatant(enemy).is_some_and(|c| !c.is_defeated());
            let planned = if standing {
                self.choose_for(session, enemy, dice)
            } else {
                None
            };
            session.minds[i].planned = planned;
        }
    }

    /// Area damage from an interaction lands on every standing enemy
    fn area_strike(&self, session: &mut CombatSession, outcome: &InteractionOutcome, result: &mut RoundResult) {
        let Some(area) = &outcome.area else {
            return;
        };
        let thresholds = self.config().tier_thresholds;
        let provider = self.system.status_provider();
        for enemy in session
            .combatants
            .iter_mut()
            .filter(|c| c.kind == CombatantType::Enemy && !c.is_defeated())
        {
            let dealt = enemy.take_damage(area.damage);
            if enemy.id == result.target {
                result.damage_to_target += dealt;
            }
            result
                .narrative_hooks
                .push(format!("{} is caught by {} for {}", enemy.name, outcome.name, dealt));
            let Some(status) = &area.status else {
                continue;
            };
            let severity = provider.select_tier(0, enemy, thresholds);
            match provider.apply(status, severity, enemy) {
                Ok(ApplicationResult::Applied { label, .. }) => {
                    result.status_applied.push(format!("{}: {}", enemy.name, label));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(combatant = %enemy.name, status = %status, error = %e, "status application failed");
                    result.status_failures.push(format!("{}: {}", status, e));
                }
            }
        }
    }
}
