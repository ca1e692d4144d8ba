use super::*;
use crate::dispatcher::{HALT_PATH, MISSION_ASSIGN_PATH};
use crate::fetcher::{Fetched, GAME_STATE_PATH, GRAPH_NODES_PATH};
use crate::model::SystemStatus;
use crate::sample::sample_system_state;
use crate::test_support::{game_state_json, graph_json, ScriptedTransport};

const SETTLE: Duration = Duration::from_secs(2);

fn sync_with(transport: &Arc<ScriptedTransport>) -> LiveSync {
    LiveSync::new(transport.clone(), Duration::from_secs(5))
}

#[test]
fn tick_fires_once_per_interval() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut sync = sync_with(&transport);
    let start = Instant::now();

    assert!(sync.tick(start));
    assert!(!sync.tick(start + Duration::from_secs(1)));
    assert_eq!(
        sync.time_until_tick(start + Duration::from_secs(1)),
        Duration::from_secs(4)
    );
    assert!(sync.tick(start + Duration::from_secs(5)));
    assert!(sync.settle(SETTLE));

    let gets = transport
        .calls()
        .into_iter()
        .filter(|call| call.method == "GET")
        .count();
    assert_eq!(gets, 4);
}

#[test]
fn unreachable_backend_resolves_to_samples() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut sync = sync_with(&transport);
    assert!(sync.poll(ResourceKey::GameState).is_none());

    sync.tick(Instant::now());
    assert!(sync.settle(SETTLE));

    let polled = sync.poll(ResourceKey::GameState).expect("fallback");
    assert!(!polled.is_live);
    assert!(sync.poll(ResourceKey::GraphNodes).is_some());
    assert!(!sync.is_live());
}

#[test]
fn live_backend_reports_live() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(GAME_STATE_PATH, game_state_json("OPERATIONAL"));
    transport.push_ok(GRAPH_NODES_PATH, graph_json());
    let mut sync = sync_with(&transport);

    sync.tick(Instant::now());
    assert!(sync.settle(SETTLE));

    assert!(sync.is_live());
    assert_eq!(sync.system_state().expect("state").party[0].id, "live-agent");
    assert_eq!(sync.state_revision(), 1);
    assert_eq!(sync.graph_revision(), 1);
}

#[test]
fn late_result_overwrites_newer_one() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut sync = sync_with(&transport);

    let mut newer = sample_system_state();
    newer.status = SystemStatus::Degraded;
    let older = sample_system_state();
    for state in [newer, older] {
        sync.in_flight += 1;
        sync.tx
            .send(SyncMessage::Fetched(FetchResult {
                key: ResourceKey::GameState,
                outcome: Ok(Fetched::GameState(state)),
            }))
            .expect("send");
    }

    assert_eq!(sync.drain(), 2);
    assert_eq!(
        sync.system_state().expect("state").status,
        SystemStatus::Operational
    );
    assert_eq!(sync.in_flight(), 0);
}

#[test]
fn halt_marks_halted_before_round_trip() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_down(HALT_PATH);
    let mut sync = sync_with(&transport);

    assert_eq!(sync.request_halt(), Dispatch::Sent);
    assert!(sync.is_halted());

    assert!(sync.settle(SETTLE));
    assert!(sync.is_halted());
    assert!(sync
        .notices()
        .any(|notice| notice.level == NoticeLevel::Warning));
}

#[test]
fn halt_is_idempotent_once_halted() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(HALT_PATH, r#"{"status":"HALTED"}"#);
    let mut sync = sync_with(&transport);

    assert_eq!(sync.request_halt(), Dispatch::Sent);
    assert_eq!(sync.request_halt(), Dispatch::Suppressed);
    assert!(sync.settle(SETTLE));
    assert_eq!(sync.request_halt(), Dispatch::Suppressed);

    let halts = transport
        .calls()
        .into_iter()
        .filter(|call| call.path == HALT_PATH)
        .count();
    assert_eq!(halts, 1);
    assert_eq!(sync.notices().count(), 0);
}

#[test]
fn invalid_mission_is_rejected_without_network() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut sync = sync_with(&transport);

    let err = sync
        .request_mission(MissionDraft::new("coder", "", "ship it"))
        .expect_err("validation");

    assert!(err.is_validation());
    assert!(transport.calls().is_empty());
    assert_eq!(sync.in_flight(), 0);
    assert!(sync.notices().any(|notice| notice.message.contains("repo_id")));
}

#[test]
fn successful_mission_triggers_state_refetch() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(MISSION_ASSIGN_PATH, r#"{"status":"ok"}"#);
    transport.push_ok(GAME_STATE_PATH, game_state_json("OPERATIONAL"));
    let mut sync = sync_with(&transport);

    let dispatch = sync
        .request_mission(MissionDraft::new("coder", "synapse", "Fix flaky test"))
        .expect("dispatch");
    assert_eq!(dispatch, Dispatch::Sent);
    assert!(sync.settle(SETTLE));

    let paths: Vec<_> = transport.calls().into_iter().map(|call| call.path).collect();
    assert_eq!(paths, vec![MISSION_ASSIGN_PATH.to_string(), GAME_STATE_PATH.to_string()]);
    assert_eq!(sync.system_state().expect("state").party[0].id, "live-agent");
}

#[test]
fn failed_mission_leaves_state_untouched() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_down(MISSION_ASSIGN_PATH);
    let mut sync = sync_with(&transport);
    let revision = sync.state_revision();

    sync.request_mission(MissionDraft::new("coder", "synapse", "Fix flaky test"))
        .expect("dispatch");
    assert!(sync.settle(SETTLE));

    assert_eq!(sync.state_revision(), revision);
    assert!(sync.system_state().is_none());
    assert!(sync
        .notices()
        .any(|notice| notice.level == NoticeLevel::Error));
}

#[test]
fn missions_are_suppressed_while_halted() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut cache = StateCache::default();
    cache.mark_halted();
    let mut sync = LiveSync::with_cache(transport.clone(), Duration::from_secs(5), cache);

    let dispatch = sync
        .request_mission(MissionDraft::new("coder", "synapse", "task"))
        .expect("valid");

    assert_eq!(dispatch, Dispatch::Suppressed);
    assert!(transport.calls().is_empty());
}

#[test]
fn notices_expire_after_ttl() {
    let transport = Arc::new(ScriptedTransport::default());
    let mut sync = sync_with(&transport);
    sync.notify(NoticeLevel::Info, "hello".to_string());

    sync.expire_notices(Instant::now());
    assert_eq!(sync.notices().count(), 1);

    sync.expire_notices(Instant::now() + NOTICE_TTL);
    assert_eq!(sync.notices().count(), 0);
}
