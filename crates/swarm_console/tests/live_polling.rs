mod common;

use std::net::TcpListener;
use std::time::{Duration, Instant};

use common::{game_state_body, graph_body, StubResponse, StubServer};
use swarm_console::{
    project, ConsoleConfig, Dispatch, GraphScene, LiveSync, MissionDraft, ResourceKey,
    SystemStatus, ViewportSize, GAME_STATE_PATH, GRAPH_NODES_PATH, HALT_PATH,
    MISSION_ASSIGN_PATH,
};

const SETTLE: Duration = Duration::from_secs(5);

fn config_for(base_url: String) -> ConsoleConfig {
    ConsoleConfig {
        base_url,
        request_timeout_ms: 2_000,
        ..ConsoleConfig::default()
    }
}

fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn live_backend_feeds_graph_and_projection() {
    let server = StubServer::start(2, |_, path| match path {
        GAME_STATE_PATH => StubResponse::json(game_state_body("OPERATIONAL")),
        GRAPH_NODES_PATH => StubResponse::json(graph_body()),
        _ => StubResponse::status(404),
    });
    let mut sync = LiveSync::from_config(&config_for(server.base_url())).expect("sync");

    assert!(sync.tick(Instant::now()));
    assert!(sync.settle(SETTLE));
    server.join();

    assert!(sync.is_live());
    let polled = sync.poll(ResourceKey::GameState).expect("state");
    assert!(polled.is_live);

    let state = sync.system_state().expect("state");
    assert_eq!(state.status, SystemStatus::Operational);
    assert_eq!(state.party.len(), 2);

    let projection = project(state);
    assert_eq!(projection.buildings.len(), 1);
    assert_eq!(projection.agents.len(), 2);
    assert_eq!(projection.assignments(), project(state).assignments());

    let mut scene = GraphScene::new();
    scene.render(sync.graph().expect("graph"), ViewportSize::new(640.0, 480.0));
    assert_eq!(scene.nodes().len(), 2);
    assert_eq!(scene.edges().len(), 1);
    assert!(scene.emphasis("gateway").active);
}

#[test]
fn server_errors_fall_back_to_samples() {
    let server = StubServer::start(2, |_, _| StubResponse::status(503));
    let mut sync = LiveSync::from_config(&config_for(server.base_url())).expect("sync");

    sync.tick(Instant::now());
    assert!(sync.settle(SETTLE));
    server.join();

    assert!(!sync.is_live());
    assert!(sync.cache().is_sample(ResourceKey::GameState));
    assert!(sync.cache().is_sample(ResourceKey::GraphNodes));
    assert!(sync.graph().is_some());
}

#[test]
fn unreachable_backend_still_halts_locally() {
    let mut sync = LiveSync::from_config(&config_for(closed_port_url())).expect("sync");

    assert_eq!(sync.request_halt(), Dispatch::Sent);
    assert!(sync.is_halted());

    assert!(sync.settle(SETTLE));
    assert!(sync.is_halted());
    assert_eq!(sync.request_halt(), Dispatch::Suppressed);
}

#[test]
fn halt_is_posted_without_body() {
    let server = StubServer::start(1, |_, path| match path {
        HALT_PATH => StubResponse::json(r#"{"status":"HALTED"}"#),
        _ => StubResponse::status(404),
    });
    let mut sync = LiveSync::from_config(&config_for(server.base_url())).expect("sync");

    sync.request_halt();
    assert!(sync.settle(SETTLE));
    let seen = server.join();

    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, HALT_PATH);
    assert!(seen[0].body.is_empty());
    assert!(sync.is_halted());
    assert_eq!(sync.notices().count(), 0);
}

#[test]
fn mission_assignment_posts_body_then_refetches_state() {
    let server = StubServer::start(2, |method, path| match (method, path) {
        ("POST", MISSION_ASSIGN_PATH) => StubResponse::json(r#"{"status":"assigned"}"#),
        ("GET", GAME_STATE_PATH) => StubResponse::json(game_state_body("DEGRADED")),
        _ => StubResponse::status(404),
    });
    let mut sync = LiveSync::from_config(&config_for(server.base_url())).expect("sync");

    let dispatch = sync
        .request_mission(MissionDraft::new("coder-1", "synapse", "Harden gateway"))
        .expect("valid");
    assert_eq!(dispatch, Dispatch::Sent);
    assert!(sync.settle(SETTLE));
    let seen = server.join();

    assert_eq!(seen[0].path, MISSION_ASSIGN_PATH);
    let body: serde_json::Value = serde_json::from_str(&seen[0].body).expect("json body");
    assert_eq!(
        body,
        serde_json::json!({"agent_id": "coder-1", "repo_id": "synapse", "task": "Harden gateway"})
    );
    assert_eq!(seen[1].path, GAME_STATE_PATH);
    assert_eq!(
        sync.system_state().expect("state").status,
        SystemStatus::Degraded
    );
}
