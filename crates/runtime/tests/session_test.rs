use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{
    AttackType, BattleConfig, BattleEngine, Combatant, CombatantId, HandsLedger, OutcomeKind,
    PredictionInput, ResponseType, Roster, Side, StatBlock,
};
use battle_runtime::{
    BattleEvent, BattleSession, FileSaveRepository, HeuristicAi, InMemorySaveRepo,
    PassiveProvider, ReservationChoice, RuntimeError, ScriptedProvider, Topic,
};
use tempfile::TempDir;
use tokio::sync::broadcast::Receiver;

const HERO: CombatantId = CombatantId(1);
const BANDIT: CombatantId = CombatantId(10);

fn fighter(id: CombatantId, side: Side, speed: i32) -> Combatant {
    let mut base = StatBlock::with_max_hp(60).with_hands(HandsLedger::new([2, 2, 2]));
    base.attack = 12;
    base.defense = 2;
    base.speed = speed;
    base.max_reservation_per_turn = 3;
    Combatant::from_base(id, format!("{id}"), side, &base, Vec::new())
}

fn duel() -> BattleEngine {
    let roster = Roster::from_combatants([
        fighter(HERO, Side::Player, 8),
        fighter(BANDIT, Side::Enemy, 11),
    ])
    .unwrap();
    BattleEngine::new(BattleConfig::default(), roster)
}

fn embedded_session() -> BattleSession {
    let bundle = ContentFactory::builtin().load_bundle().unwrap();
    let engine = BattleEngine::new(bundle.config, bundle.roster);
    let ai = Arc::new(HeuristicAi::default());
    BattleSession::new(engine)
        .with_provider(Side::Player, ai.clone())
        .with_provider(Side::Enemy, ai)
}

fn drain(rx: &mut Receiver<BattleEvent>) -> Vec<BattleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn scripted_turn_publishes_every_step() {
    let attacker = ScriptedProvider::new().with_reservations(vec![
        ReservationChoice::new(AttackType::Slash, BANDIT),
        ReservationChoice::new(AttackType::Thrust, BANDIT),
    ]);
    let defender = ScriptedProvider::new()
        .with_predictions(vec![PredictionInput::new(0, ResponseType::CounterSlash)]);

    let mut session = BattleSession::new(duel())
        .with_provider(Side::Player, Arc::new(attacker))
        .with_provider(Side::Enemy, Arc::new(defender));
    let mut turn_rx = session.events().subscribe(Topic::Turn);
    let mut input_rx = session.events().subscribe(Topic::Input);
    let mut resolution_rx = session.events().subscribe(Topic::Resolution);

    let summary = session.run_turn(HERO).await.unwrap();

    assert_eq!(summary.turn_number, 1);
    assert_eq!(summary.target, BANDIT);
    assert_eq!(summary.resolution.slots.len(), 2);
    assert_eq!(summary.resolution.slots[0].outcome.kind, OutcomeKind::Countered);
    assert_eq!(summary.resolution.slots[1].outcome.kind, OutcomeKind::Hit);

    let hero = session.engine().roster().get(HERO).unwrap();
    let bandit = session.engine().roster().get(BANDIT).unwrap();
    assert!(hero.stats.residual_hp() < hero.stats.max_hp());
    assert!(bandit.stats.residual_hp() < bandit.stats.max_hp());
    assert!(session.engine().context().is_none());

    let turn_events = drain(&mut turn_rx);
    assert_eq!(turn_events.len(), 2);
    assert!(matches!(turn_events[0], BattleEvent::TurnStarted { actor: HERO, .. }));
    assert!(matches!(
        &turn_events[1],
        BattleEvent::TurnEnded { slots: 2, unanswered, .. } if unanswered == &vec![1]
    ));

    let input_events = drain(&mut input_rx);
    let accepted = input_events
        .iter()
        .filter(|e| matches!(e, BattleEvent::ReservationAccepted { .. }))
        .count();
    assert_eq!(accepted, 2);
    assert!(input_events.iter().any(|e| matches!(e, BattleEvent::PredictionAccepted { .. })));

    assert_eq!(drain(&mut resolution_rx).len(), 2);
}

#[tokio::test]
async fn rejected_choices_are_reported_and_skipped() {
    // Only two thrust hands: the third thrust is refused.
    let attacker = ScriptedProvider::new().with_reservations(vec![
        ReservationChoice::new(AttackType::Thrust, BANDIT),
        ReservationChoice::new(AttackType::Thrust, BANDIT),
        ReservationChoice::new(AttackType::Thrust, BANDIT),
    ]);
    let defender = ScriptedProvider::new().with_predictions(vec![
        PredictionInput::new(5, ResponseType::Evade),
        PredictionInput::new(0, ResponseType::Evade),
    ]);

    let mut session = BattleSession::new(duel())
        .with_provider(Side::Player, Arc::new(attacker))
        .with_provider(Side::Enemy, Arc::new(defender));
    let mut rx = session.events().subscribe(Topic::Input);

    let summary = session.run_turn(HERO).await.unwrap();
    assert_eq!(summary.resolution.slots.len(), 2);

    let events = drain(&mut rx);
    let reservation_codes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::ReservationRejected { error_code, .. } => Some(error_code.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(reservation_codes.len(), 1);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, BattleEvent::PredictionRejected { input, .. } if input.slot_index == 5))
    );
}

#[tokio::test]
async fn exhausted_script_abandons_the_turn() {
    let attacker = ScriptedProvider::new()
        .with_reservations(vec![ReservationChoice::new(AttackType::Down, BANDIT)]);
    let defender = ScriptedProvider::new();

    let mut session = BattleSession::new(duel())
        .with_provider(Side::Player, Arc::new(attacker))
        .with_provider(Side::Enemy, Arc::new(defender));

    let err = session.run_turn(HERO).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Provider { .. }));

    let engine = session.engine();
    assert!(engine.context().is_none());
    assert_eq!(engine.turn_number(), 0);
    let hero = engine.roster().get(HERO).unwrap();
    assert_eq!(hero.stats.remaining_hands(AttackType::Down), 2);
}

#[tokio::test]
async fn missing_provider_is_an_error() {
    let mut session = BattleSession::new(duel());
    session.set_reservation_provider(Side::Player, Arc::new(PassiveProvider));

    let err = session.run_turn(HERO).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::ProviderNotSet { side: Side::Enemy, .. }
    ));
    assert!(session.engine().context().is_none());
}

#[tokio::test]
async fn passive_battle_ends_in_a_draw_at_the_turn_limit() {
    let mut engine = duel();
    let mut config = engine.config().clone();
    config.max_turns = 4;
    engine = BattleEngine::new(config, engine.into_roster());

    let mut session = BattleSession::new(engine)
        .with_provider(Side::Player, Arc::new(PassiveProvider))
        .with_provider(Side::Enemy, Arc::new(PassiveProvider));
    let mut rx = session.events().subscribe(Topic::Battle);

    let report = session.run_battle().await.unwrap();
    assert_eq!(report.winner, None);
    assert_eq!(report.turns, 4);
    assert_eq!(
        rx.try_recv().unwrap(),
        BattleEvent::BattleFinished {
            winner: None,
            turns: 4
        }
    );
}

#[tokio::test]
async fn ai_battle_over_embedded_content_is_deterministic() {
    let mut first = embedded_session();
    let mut second = embedded_session();

    let report_a = first.run_battle().await.unwrap();
    let report_b = second.run_battle().await.unwrap();

    assert_eq!(report_a, report_b);
    assert!(report_a.turns > 0);
    assert!(report_a.turns <= first.engine().config().max_turns);
    assert_eq!(first.engine().roster(), second.engine().roster());
    if report_a.winner.is_some() {
        assert!(first.engine().is_over());
    }
}

#[tokio::test]
async fn save_and_restore_through_the_file_repository() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(FileSaveRepository::new(dir.path()).unwrap());

    let attacker = ScriptedProvider::new()
        .with_reservations(vec![ReservationChoice::new(AttackType::Slash, BANDIT)]);
    let defender = ScriptedProvider::new().with_predictions(Vec::new());
    let mut session = BattleSession::new(duel())
        .with_provider(Side::Player, Arc::new(attacker))
        .with_provider(Side::Enemy, Arc::new(defender))
        .with_repository(repo.clone());

    session.run_turn(HERO).await.unwrap();
    session.save("after-turn-1").unwrap();
    let wounded = session.engine().roster().clone();

    let mut fresh = BattleSession::new(duel()).with_repository(repo);
    assert_ne!(fresh.engine().roster(), &wounded);
    assert!(fresh.restore("after-turn-1").unwrap());
    assert_eq!(fresh.engine().turn_number(), 1);

    let restored = fresh.engine().roster().get(BANDIT).unwrap();
    let expected = wounded.get(BANDIT).unwrap();
    assert_eq!(restored.stats.residual_hp(), expected.stats.residual_hp());
    assert_eq!(restored.stats.fatal_hp(), expected.stats.fatal_hp());
    assert!(!fresh.restore("missing").unwrap());
}

#[tokio::test]
async fn save_without_repository_fails() {
    let session = BattleSession::new(duel());
    assert!(matches!(
        session.save("slot"),
        Err(RuntimeError::RepositoryNotSet)
    ));

    let mut with_memory =
        BattleSession::new(duel()).with_repository(Arc::new(InMemorySaveRepo::new()));
    with_memory.save("slot").unwrap();
    assert!(with_memory.restore("slot").unwrap());
}

#[tokio::test]
async fn restored_battle_keeps_its_turn_budget() {
    let repo = Arc::new(InMemorySaveRepo::new());
    let attacker = ScriptedProvider::new()
        .with_reservations(vec![ReservationChoice::new(AttackType::Thrust, BANDIT)]);
    let defender = ScriptedProvider::new().with_predictions(Vec::new());
    let mut first = BattleSession::new(duel())
        .with_provider(Side::Player, Arc::new(attacker))
        .with_provider(Side::Enemy, Arc::new(defender))
        .with_repository(repo.clone());
    first.run_turn(HERO).await.unwrap();
    first.save("midway").unwrap();

    let mut engine = duel();
    let mut config = engine.config().clone();
    config.max_turns = 3;
    engine = BattleEngine::new(config, engine.into_roster());
    let mut resumed = BattleSession::new(engine)
        .with_provider(Side::Player, Arc::new(PassiveProvider))
        .with_provider(Side::Enemy, Arc::new(PassiveProvider))
        .with_repository(repo);
    assert!(resumed.restore("midway").unwrap());

    let report = resumed.run_battle().await.unwrap();
    assert_eq!(report.turns, 3);
}
