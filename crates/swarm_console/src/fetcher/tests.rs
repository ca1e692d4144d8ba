use super::*;
use crate::test_support::{game_state_json, graph_json, ScriptedTransport};

fn fetcher_with(transport: &Arc<ScriptedTransport>) -> StateFetcher {
    StateFetcher::new(transport.clone())
}

#[test]
fn cache_reads_connecting_until_first_tick() {
    let cache = StateCache::default();
    assert!(cache.poll(ResourceKey::GameState).is_none());
    assert!(cache.poll(ResourceKey::GraphNodes).is_none());
    assert!(!cache.is_resolved());
    assert!(!cache.is_live());
}

#[test]
fn failed_first_tick_serves_sample_and_not_live() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_down(GAME_STATE_PATH);
    let fetcher = fetcher_with(&transport);
    let mut cache = StateCache::default();

    let live = cache.apply(fetcher.fetch(ResourceKey::GameState));

    assert!(!live);
    let polled = cache.poll(ResourceKey::GameState).expect("fallback");
    assert!(!polled.is_live);
    assert_eq!(
        polled.data,
        Snapshot::GameState(&crate::sample::sample_system_state())
    );
    assert!(cache.is_sample(ResourceKey::GameState));
    assert!(matches!(
        cache.last_error(ResourceKey::GameState),
        Some(FetchError::Transport(_))
    ));
}

#[test]
fn failure_after_success_keeps_last_known_good() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(GAME_STATE_PATH, game_state_json("OPERATIONAL"));
    transport.push(
        GAME_STATE_PATH,
        Err(TransportError::HttpStatus {
            code: 503,
            message: "busy".to_string(),
        }),
    );
    let fetcher = fetcher_with(&transport);
    let mut cache = StateCache::default();

    assert!(cache.apply(fetcher.fetch(ResourceKey::GameState)));
    assert!(!cache.apply(fetcher.fetch(ResourceKey::GameState)));

    let state = cache.system_state().expect("state");
    assert_eq!(state.party[0].id, "live-agent");
    assert!(!cache.is_sample(ResourceKey::GameState));
}

#[test]
fn malformed_body_is_treated_like_transport_failure() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(GRAPH_NODES_PATH, "{not json");
    let fetcher = fetcher_with(&transport);
    let mut cache = StateCache::default();

    assert!(!cache.apply(fetcher.fetch(ResourceKey::GraphNodes)));
    assert!(matches!(
        cache.last_error(ResourceKey::GraphNodes),
        Some(FetchError::Decode { .. })
    ));
    assert!(cache.graph().is_some());
}

#[test]
fn liveness_is_and_of_latest_outcomes() {
    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(GAME_STATE_PATH, game_state_json("OPERATIONAL"));
    transport.push_ok(GRAPH_NODES_PATH, graph_json());
    transport.push_down(GRAPH_NODES_PATH);
    transport.push_ok(GRAPH_NODES_PATH, graph_json());
    let fetcher = fetcher_with(&transport);
    let mut cache = StateCache::default();

    cache.apply(fetcher.fetch(ResourceKey::GameState));
    cache.apply(fetcher.fetch(ResourceKey::GraphNodes));
    assert!(cache.is_live());

    cache.apply(fetcher.fetch(ResourceKey::GraphNodes));
    assert!(!cache.is_live());
    assert!(cache.is_resource_live(ResourceKey::GameState));

    cache.apply(fetcher.fetch(ResourceKey::GraphNodes));
    assert!(cache.is_live());
}

#[test]
fn never_empty_after_any_outcome_sequence() {
    let outcomes = [true, false, false, true, false, true, true, false];
    let transport = Arc::new(ScriptedTransport::default());
    for ok in outcomes {
        if ok {
            transport.push_ok(GAME_STATE_PATH, game_state_json("DEGRADED"));
            transport.push_ok(GRAPH_NODES_PATH, graph_json());
        } else {
            transport.push_down(GAME_STATE_PATH);
            transport.push_ok(GRAPH_NODES_PATH, "null");
        }
    }
    let fetcher = fetcher_with(&transport);
    let mut cache = StateCache::default();

    for ok in outcomes {
        for key in ResourceKey::ALL {
            cache.apply(fetcher.fetch(key));
            assert!(cache.poll(key).is_some());
        }
        assert_eq!(cache.is_live(), ok);
    }
}

#[test]
fn mark_halted_applies_before_first_tick() {
    let mut cache = StateCache::default();
    cache.mark_halted();
    assert!(cache.is_halted());
    assert!(!cache.is_live());

    let transport = Arc::new(ScriptedTransport::default());
    transport.push_ok(GAME_STATE_PATH, game_state_json("OPERATIONAL"));
    cache.apply(fetcher_with(&transport).fetch(ResourceKey::GameState));
    assert!(!cache.is_halted());
}

#[test]
fn resource_paths_match_backend_routes() {
    assert_eq!(ResourceKey::GameState.path(), "/api/v1/game-state");
    assert_eq!(ResourceKey::GraphNodes.path(), "/api/v1/graph-nodes");
}
