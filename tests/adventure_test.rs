//! Level map traversal, unlocking, and playing a level end to end.

use coral_match::adventure::{catalog, LevelMap, LevelNode, MapError, Position, Selection};
use coral_match::core::{AnimationTiming, MatchSession};
use coral_match::types::{Difficulty, Direction, EngineEvent, Outcome};

fn three_node_map() -> LevelMap {
    LevelMap::new(vec![
        LevelNode::new(1, "A", Position::new(0.0, 0.0))
            .with_neighbors([2, 3])
            .unlocked(),
        LevelNode::new(2, "B", Position::new(100.0, 0.0)).with_neighbors([1]),
        LevelNode::new(3, "C", Position::new(0.0, 100.0)).with_neighbors([1]),
    ])
    .unwrap()
}

#[test]
fn focus_follows_the_best_aligned_neighbor() {
    let mut map = three_node_map();
    assert_eq!(map.focused_node().unwrap().name, "A");

    assert!(map.move_focus(Direction::Right));
    assert_eq!(map.focused_node().unwrap().name, "B");

    map.select(0).unwrap();
    assert!(map.move_focus(Direction::Down));
    assert_eq!(map.focused_node().unwrap().name, "C");

    map.select(0).unwrap();
    assert!(!map.move_focus(Direction::Up));
    assert!(!map.move_focus(Direction::Left));
    assert_eq!(map.focused_node().unwrap().name, "A");
}

#[test]
fn locked_levels_hold_focus_but_cannot_be_entered() {
    let mut map = three_node_map();
    map.move_focus(Direction::Right);
    assert_eq!(map.select_focused().unwrap().unwrap(), Selection::Locked);
    assert_eq!(map.focused(), Some(1));

    assert_eq!(map.complete_level(1, 120).unwrap(), vec![2, 3]);
    match map.select(1).unwrap() {
        Selection::Entered(node) => assert_eq!(node.id, 2),
        other => panic!("expected to enter B, got {:?}", other),
    }
    assert!(matches!(map.select(7), Err(MapError::UnknownIndex(7))));
}

#[test]
fn invalid_maps_are_rejected() {
    let dup = LevelMap::new(vec![
        LevelNode::new(1, "A", Position::new(0.0, 0.0)),
        LevelNode::new(1, "B", Position::new(1.0, 0.0)),
    ]);
    assert!(matches!(dup, Err(MapError::DuplicateId(1))));

    let dangling = LevelMap::new(vec![
        LevelNode::new(1, "A", Position::new(0.0, 0.0)).with_neighbors([9])
    ]);
    assert!(matches!(
        dangling,
        Err(MapError::UnknownNeighbor {
            node: 1,
            neighbor: 9
        })
    ));

    let bad_goal = LevelMap::new(vec![
        LevelNode::new(1, "A", Position::new(0.0, 0.0)).with_goal(Difficulty::Easy, 0, 100)
    ]);
    assert!(matches!(bad_goal, Err(MapError::InvalidLevel { id: 1, .. })));
}

#[test]
fn map_survives_a_json_round_trip_with_progress() {
    let mut map = catalog::default_map();
    map.complete_level(1, 420).unwrap();

    let json = catalog::to_json(&map).unwrap();
    let loaded = catalog::from_json(&json).unwrap();
    assert_eq!(loaded.nodes(), map.nodes());
    assert_eq!(loaded.node_by_id(1).unwrap().best_score, Some(420));
    assert!(!loaded.node_by_id(2).unwrap().locked);

    assert!(matches!(
        catalog::from_json("{\"levels\": [}"),
        Err(MapError::Parse(_))
    ));
}

#[test]
fn winning_a_level_unlocks_its_neighbors() {
    let mut map = LevelMap::new(vec![
        LevelNode::new(1, "Lagoon", Position::new(0.0, 0.0))
            .with_goal(Difficulty::Easy, 10, 30)
            .with_neighbors([2])
            .with_reward("lagoon-shell")
            .unlocked(),
        LevelNode::new(2, "Reef", Position::new(10.0, 0.0)).with_neighbors([1]),
    ])
    .unwrap();

    let Selection::Entered(node) = map.select_focused().unwrap().unwrap() else {
        panic!("first level should be open");
    };
    let config = node.session_config().with_timing(AnimationTiming::instant());
    let mut session = MatchSession::seeded(config, 5).unwrap();

    // Any match clears at least three tiles, which meets a target of 30.
    let (a, b) = session.hint().unwrap();
    session.swap(a, b).unwrap();
    assert_eq!(session.outcome(), Some(Outcome::Won));

    let events = session.drain_events();
    assert!(events.contains(&EngineEvent::RewardRequested {
        item: "lagoon-shell".to_string()
    }));
    let unlocked = map.complete_level(node.id, session.score()).unwrap();
    assert_eq!(unlocked, vec![2]);
    assert_eq!(map.completed_count(), 1);
}

#[test]
fn default_map_walks_the_reef() {
    let mut map = catalog::default_map();
    assert_eq!(map.len(), 6);
    assert_eq!(map.focused_node().unwrap().id, 1);

    for id in [1, 2, 4, 5] {
        map.complete_level(id, 1_000).unwrap();
    }
    assert!(map.move_focus(Direction::Right));
    assert!(map.move_focus(Direction::Down));
    assert!(map.move_focus(Direction::Right));
    assert!(map.move_focus(Direction::Right));
    let node = map.focused_node().unwrap();
    assert_eq!(node.name, "Abyssal Trench");
    assert!(!node.locked);
}
